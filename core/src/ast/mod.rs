pub mod err;
pub mod expr;
pub mod kind;
pub mod node;
pub mod rules;
pub mod stmt;

pub use crate::error::MinicErrorExt;
pub use kind::{AstNodeKind, BinaryOperator};
pub use node::AstNode;
pub use rules::{Rule, RulesParser};

use pest::Parser;

/// Run the pest parser over a script, mapping failures to diagnostics.
fn parse_pairs(script: &crate::script::Script) -> Result<pest::iterators::Pairs<'_, Rule>, Box<dyn MinicErrorExt>> {
    if script.is_empty() {
        return Err(err::EmptyScriptError::new(
            "minic.ast.generate_ast_from_source".into(),
            Some(crate::location::Location::line_start(&script.name, 1)),
            None,
        )
        .into());
    }

    RulesParser::parse(Rule::script, &script.content).map_err(|e| {
        let (line, column) = match e.line_col {
            pest::error::LineColLocation::Pos(pos) => pos,
            pest::error::LineColLocation::Span(start, _) => start,
        };
        Box::<dyn MinicErrorExt>::from(err::SyntaxError::with(
            crate::Level::Error,
            format!("Syntax error: {}", e.variant.message()),
            "minic.ast.generate_ast_from_source".into(),
            Some(crate::location::Location::new(script.name.clone(), line, column)),
            None,
        ))
    })
}

/// Parse a script into a `Program` node.
///
/// Empty (whitespace-only) input is rejected with `EmptyScriptError`; input
/// the grammar does not accept yields a `SyntaxError` located at the point
/// where `pest` gave up.
pub fn generate_ast_from_source(script: &crate::script::Script) -> Result<AstNode, Box<dyn MinicErrorExt>> {
    let mut pairs = parse_pairs(script)?;
    let script_pair = rules::fetch_next_pair(&mut pairs, &None, &None)?;
    let program = stmt::parse_script_rule(script_pair, script)?;
    log::debug!("parsed {} into {} top-level items", script.name, match &program.kind {
        AstNodeKind::Program { items } => items.len(),
        _ => 0,
    });
    Ok(program)
}

/// A leaf of the parse tree: a keyword, name, literal or operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub rule: Rule,
    pub lexeme: String,
    pub location: crate::location::Location,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} {:?} '{}'", self.location.line, self.location.column, self.rule, self.lexeme)
    }
}

fn is_token_rule(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::kw_func
            | Rule::kw_if
            | Rule::kw_else
            | Rule::kw_while
            | Rule::kw_return
            | Rule::kw_print
            | Rule::identifier
            | Rule::integer
            | Rule::rel_op
            | Rule::add_op
            | Rule::mul_op
            | Rule::neg
    )
}

/// The token stream of a script in source order. Punctuation the grammar
/// matches as bare literals has no rule of its own and is not listed.
pub fn tokenize(script: &crate::script::Script) -> Result<Vec<Token>, Box<dyn MinicErrorExt>> {
    let pairs = parse_pairs(script)?;
    let tokens = pairs
        .flatten()
        .filter(|pair| is_token_rule(pair.as_rule()))
        .map(|pair| {
            let (line, column) = pair.as_span().start_pos().line_col();
            Token {
                rule: pair.as_rule(),
                lexeme: pair.as_str().to_string(),
                location: crate::location::Location::new(script.name.clone(), line, column),
            }
        })
        .collect();
    Ok(tokens)
}
