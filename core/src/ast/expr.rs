use crate::{
    ast::{AstNode, AstNodeKind, BinaryOperator, MinicErrorExt, Rule, err::SyntaxError, rules},
    script,
};

pub(crate) fn parse_expression_rule(
    pair: pest::iterators::Pair<Rule>,
    script: &script::Script,
) -> Result<AstNode, Box<dyn MinicErrorExt>> {
    match pair.as_rule() {
        Rule::expression => parse_binary_chain(pair, script, parse_additive_rule),
        other => Err(SyntaxError::with(
            crate::Level::Error,
            format!("Unexpected expression type: {:?}", other),
            "minic.ast.expr.parse_expression_rule".into(),
            rules::get_location_from_pair(&pair, script),
            rules::get_span_from_pair(&pair, script),
        )
        .into()),
    }
}

fn parse_additive_rule(
    pair: pest::iterators::Pair<Rule>,
    script: &script::Script,
) -> Result<AstNode, Box<dyn MinicErrorExt>> {
    parse_binary_chain(pair, script, parse_term_rule)
}

fn parse_term_rule(
    pair: pest::iterators::Pair<Rule>,
    script: &script::Script,
) -> Result<AstNode, Box<dyn MinicErrorExt>> {
    parse_binary_chain(pair, script, parse_unary_rule)
}

/// Folds `operand (op operand)*` into a left-associative `BinaryOp` tree.
fn parse_binary_chain(
    pair: pest::iterators::Pair<Rule>,
    script: &script::Script,
    parse_operand: fn(pest::iterators::Pair<Rule>, &script::Script) -> Result<AstNode, Box<dyn MinicErrorExt>>,
) -> Result<AstNode, Box<dyn MinicErrorExt>> {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);

    let left_pair = rules::fetch_next_pair(&mut inner_pairs, &location, &span)?;
    let mut node = parse_operand(left_pair, script)?;

    while let Some(op_pair) = inner_pairs.next() {
        let op = match BinaryOperator::from_symbol(op_pair.as_str()) {
            Some(op) => op,
            None => {
                return Err(SyntaxError::with(
                    crate::Level::Error,
                    format!("Invalid binary operator '{}'.", op_pair.as_str()),
                    "minic.ast.expr.parse_binary_chain".into(),
                    rules::get_location_from_pair(&op_pair, script),
                    rules::get_span_from_pair(&op_pair, script),
                )
                .into());
            }
        };
        let right_pair = match inner_pairs.next() {
            Some(rp) => rp,
            None => {
                return Err(SyntaxError::with(
                    crate::Level::Error,
                    format!("Missing right-hand operand for '{}'.", op),
                    "minic.ast.expr.parse_binary_chain".into(),
                    location.clone(),
                    span.clone(),
                )
                .into());
            }
        };
        let right_node = parse_operand(right_pair, script)?;

        node = AstNode::new(
            AstNodeKind::BinaryOp { op, left: Box::new(node), right: Box::new(right_node) },
            rules::get_location_from_pair(&op_pair, script),
            rules::get_span_from_pair(&op_pair, script),
        );
    }

    Ok(node)
}

/// Unary minus has no IR counterpart and is desugared to `0 - operand`.
fn parse_unary_rule(
    pair: pest::iterators::Pair<Rule>,
    script: &script::Script,
) -> Result<AstNode, Box<dyn MinicErrorExt>> {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    let first = rules::fetch_next_pair(&mut inner_pairs, &location, &span)?;
    match first.as_rule() {
        Rule::neg => {
            let operand = parse_unary_rule(
                rules::fetch_next_pair(&mut inner_pairs, &location, &span)?,
                script,
            )?;
            Ok(AstNode::new(
                AstNodeKind::BinaryOp {
                    op: BinaryOperator::Sub,
                    left: Box::new(AstNode::new(AstNodeKind::Integer { value: 0 }, location.clone(), span.clone())),
                    right: Box::new(operand),
                },
                location,
                span,
            ))
        }
        Rule::primary => parse_primary_rule(first, script),
        other => Err(SyntaxError::with(
            crate::Level::Error,
            format!("Unexpected unary operand: {:?}", other),
            "minic.ast.expr.parse_unary_rule".into(),
            location,
            span,
        )
        .into()),
    }
}

fn parse_primary_rule(
    pair: pest::iterators::Pair<Rule>,
    script: &script::Script,
) -> Result<AstNode, Box<dyn MinicErrorExt>> {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    let next_rule = rules::fetch_next_pair(&mut inner_pairs, &location, &span)?;
    match next_rule.as_rule() {
        Rule::integer => parse_integer_rule(next_rule, script),
        Rule::identifier => Ok(AstNode::new(
            AstNodeKind::Identifier { name: next_rule.as_str().to_string() },
            location,
            span,
        )),
        Rule::call => parse_call_rule(next_rule, script),
        Rule::expression => parse_expression_rule(next_rule, script),
        other => Err(SyntaxError::with(
            crate::Level::Error,
            format!("Unexpected primary expression: {:?}", other),
            "minic.ast.expr.parse_primary_rule".into(),
            location,
            span,
        )
        .into()),
    }
}

fn parse_integer_rule(
    pair: pest::iterators::Pair<Rule>,
    script: &script::Script,
) -> Result<AstNode, Box<dyn MinicErrorExt>> {
    let location = rules::get_location_from_pair(&pair, script);
    let span = rules::get_span_from_pair(&pair, script);
    match pair.as_str().parse::<i64>() {
        Ok(value) => Ok(AstNode::new(AstNodeKind::Integer { value }, location, span)),
        Err(_) => Err(SyntaxError::with(
            crate::Level::Error,
            format!("Integer literal '{}' does not fit in 64 bits.", pair.as_str()),
            "minic.ast.expr.parse_integer_rule".into(),
            location,
            span,
        )
        .into()),
    }
}

pub(crate) fn parse_call_rule(
    pair: pest::iterators::Pair<Rule>,
    script: &script::Script,
) -> Result<AstNode, Box<dyn MinicErrorExt>> {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    let name = rules::fetch_next_pair(&mut inner_pairs, &location, &span)?.as_str().to_string();
    let args = match inner_pairs.next() {
        Some(arg_list) => arg_list
            .into_inner()
            .map(|arg| parse_expression_rule(arg, script))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    Ok(AstNode::new(AstNodeKind::Call { name, args }, location, span))
}
