//! file: core/src/ast/stmt.rs
//! description: parsing helpers for the program, function definitions and statements.
//!
//! Each helper consumes one `pest` pair and returns the matching `AstNode`,
//! attaching `Location`/`Span` metadata from the `rules` helpers so later
//! stages can point diagnostics back at the source.
//!
use crate::{
    ast::{AstNode, AstNodeKind, MinicErrorExt, Rule, err::SyntaxError, expr, rules},
    script,
};

/// Parse the `script` rule into a `Program` node.
pub(crate) fn parse_script_rule(
    pair: pest::iterators::Pair<Rule>,
    script: &script::Script,
) -> Result<AstNode, Box<dyn MinicErrorExt>> {
    let (inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    let mut items = Vec::new();
    for item in inner_pairs {
        match item.as_rule() {
            Rule::item => items.push(parse_item_rule(item, script)?),
            Rule::EOI => break,
            other => {
                return Err(SyntaxError::with(
                    crate::Level::Error,
                    format!("Unexpected rule at top level: {:?}", other),
                    "minic.ast.stmt.parse_script_rule".into(),
                    rules::get_location_from_pair(&item, script),
                    rules::get_span_from_pair(&item, script),
                )
                .into());
            }
        }
    }
    Ok(AstNode::new(AstNodeKind::Program { items }, location, span))
}

fn parse_item_rule(
    pair: pest::iterators::Pair<Rule>,
    script: &script::Script,
) -> Result<AstNode, Box<dyn MinicErrorExt>> {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    let next_rule = rules::fetch_next_pair(&mut inner_pairs, &location, &span)?;
    match next_rule.as_rule() {
        Rule::func_def => parse_func_def_rule(next_rule, script),
        Rule::statement => parse_statement_rule(next_rule, script),
        other => Err(SyntaxError::with(
            crate::Level::Error,
            format!("Unexpected rule in item parsing: {:?}", other),
            "minic.ast.stmt.parse_item_rule".into(),
            location,
            span,
        )
        .into()),
    }
}

fn parse_func_def_rule(
    pair: pest::iterators::Pair<Rule>,
    script: &script::Script,
) -> Result<AstNode, Box<dyn MinicErrorExt>> {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    let name = rules::fetch_next_pair(&mut inner_pairs, &location, &span)?.as_str().to_string();

    let mut params = Vec::new();
    let mut next = rules::fetch_next_pair(&mut inner_pairs, &location, &span)?;
    if next.as_rule() == Rule::param_list {
        params = next.into_inner().map(|p| p.as_str().to_string()).collect();
        next = rules::fetch_next_pair(&mut inner_pairs, &location, &span)?;
    }
    let body = parse_block_rule(next, script)?;

    Ok(AstNode::new(
        AstNodeKind::FuncDef { name, params, body: Box::new(body) },
        location,
        span,
    ))
}

fn parse_block_rule(
    pair: pest::iterators::Pair<Rule>,
    script: &script::Script,
) -> Result<AstNode, Box<dyn MinicErrorExt>> {
    let (inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    let statements = inner_pairs
        .map(|stmt| parse_statement_rule(stmt, script))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(AstNode::new(AstNodeKind::Block { statements }, location, span))
}

pub(crate) fn parse_statement_rule(
    pair: pest::iterators::Pair<Rule>,
    script: &script::Script,
) -> Result<AstNode, Box<dyn MinicErrorExt>> {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    let next_rule = rules::fetch_next_pair(&mut inner_pairs, &location, &span)?;
    match next_rule.as_rule() {
        Rule::block => parse_block_rule(next_rule, script),
        Rule::if_stmt => parse_if_rule(next_rule, script),
        Rule::while_stmt => parse_while_rule(next_rule, script),
        Rule::return_stmt => parse_return_rule(next_rule, script),
        Rule::print_stmt => parse_print_rule(next_rule, script),
        Rule::assignment_stmt => parse_assignment_rule(next_rule, script),
        Rule::call_stmt => {
            let (mut call_pairs, location, span) = rules::get_data_from_rule(&next_rule, script);
            let call = rules::fetch_next_pair(&mut call_pairs, &location, &span)?;
            expr::parse_call_rule(call, script)
        }
        other => Err(SyntaxError::with(
            crate::Level::Error,
            format!("Unexpected statement type: {:?}", other),
            "minic.ast.stmt.parse_statement_rule".into(),
            location,
            span,
        )
        .into()),
    }
}

fn parse_if_rule(
    pair: pest::iterators::Pair<Rule>,
    script: &script::Script,
) -> Result<AstNode, Box<dyn MinicErrorExt>> {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    let condition = expr::parse_expression_rule(
        rules::fetch_next_pair(&mut inner_pairs, &location, &span)?,
        script,
    )?;
    let then_branch = parse_statement_rule(
        rules::fetch_next_pair(&mut inner_pairs, &location, &span)?,
        script,
    )?;
    let else_branch = match rules::next_optional_pair(&mut inner_pairs) {
        Some(else_pair) => Some(Box::new(parse_statement_rule(else_pair, script)?)),
        None => None,
    };
    Ok(AstNode::new(
        AstNodeKind::If {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch,
        },
        location,
        span,
    ))
}

fn parse_while_rule(
    pair: pest::iterators::Pair<Rule>,
    script: &script::Script,
) -> Result<AstNode, Box<dyn MinicErrorExt>> {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    let condition = expr::parse_expression_rule(
        rules::fetch_next_pair(&mut inner_pairs, &location, &span)?,
        script,
    )?;
    let body = parse_statement_rule(
        rules::fetch_next_pair(&mut inner_pairs, &location, &span)?,
        script,
    )?;
    Ok(AstNode::new(
        AstNodeKind::While { condition: Box::new(condition), body: Box::new(body) },
        location,
        span,
    ))
}

fn parse_return_rule(
    pair: pest::iterators::Pair<Rule>,
    script: &script::Script,
) -> Result<AstNode, Box<dyn MinicErrorExt>> {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    let value = match rules::next_optional_pair(&mut inner_pairs) {
        Some(expr_pair) => Some(Box::new(expr::parse_expression_rule(expr_pair, script)?)),
        None => None,
    };
    Ok(AstNode::new(AstNodeKind::Return { value }, location, span))
}

fn parse_print_rule(
    pair: pest::iterators::Pair<Rule>,
    script: &script::Script,
) -> Result<AstNode, Box<dyn MinicErrorExt>> {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    let value = expr::parse_expression_rule(
        rules::fetch_next_pair(&mut inner_pairs, &location, &span)?,
        script,
    )?;
    Ok(AstNode::new(AstNodeKind::Print { value: Box::new(value) }, location, span))
}

fn parse_assignment_rule(
    pair: pest::iterators::Pair<Rule>,
    script: &script::Script,
) -> Result<AstNode, Box<dyn MinicErrorExt>> {
    let (mut inner_pairs, location, span) = rules::get_data_from_rule(&pair, script);
    let target = rules::fetch_next_pair(&mut inner_pairs, &location, &span)?.as_str().to_string();
    let value = expr::parse_expression_rule(
        rules::fetch_next_pair(&mut inner_pairs, &location, &span)?,
        script,
    )?;
    Ok(AstNode::new(AstNodeKind::Assign { target, value: Box::new(value) }, location, span))
}
