use pest_derive::Parser;

use crate::error::MinicErrorExt;
use crate::location;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct RulesParser;

pub(crate) fn is_keyword(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::kw_func | Rule::kw_if | Rule::kw_else | Rule::kw_while | Rule::kw_return | Rule::kw_print
    )
}

/// Next inner pair, skipping keyword tokens.
pub(crate) fn fetch_next_pair<'a>(
    pairs: &mut pest::iterators::Pairs<'a, Rule>,
    location: &Option<location::Location>,
    span: &Option<location::Span>,
) -> Result<pest::iterators::Pair<'a, Rule>, Box<dyn MinicErrorExt>> {
    for pair in pairs.by_ref() {
        if !is_keyword(pair.as_rule()) {
            return Ok(pair);
        }
    }
    Err(crate::ast::err::SyntaxError::with(
        crate::Level::Error,
        "Expected more inner pairs but found none.".into(),
        "minic.ast.rules.fetch_next_pair".into(),
        location.clone(),
        span.clone(),
    )
    .into())
}

/// Like `fetch_next_pair` but an exhausted iterator is not an error.
pub(crate) fn next_optional_pair<'a>(
    pairs: &mut pest::iterators::Pairs<'a, Rule>,
) -> Option<pest::iterators::Pair<'a, Rule>> {
    pairs.by_ref().find(|pair| !is_keyword(pair.as_rule()))
}

pub(crate) fn get_data_from_rule<'a>(
    rule: &pest::iterators::Pair<'a, Rule>,
    script: &crate::script::Script,
) -> (
    pest::iterators::Pairs<'a, Rule>,
    Option<location::Location>,
    Option<location::Span>,
) {
    let inner_rules = rule.clone().into_inner();
    let span = get_span_from_pair(rule, script);
    let location = get_location_from_pair(rule, script);
    (inner_rules, location, span)
}

pub fn get_location_from_pair(
    rule: &pest::iterators::Pair<Rule>,
    script: &crate::script::Script,
) -> Option<location::Location> {
    let (line, column) = rule.as_span().start_pos().line_col();
    Some(location::Location::new(script.name.clone(), line, column))
}

pub fn get_span_from_pair(
    rule: &pest::iterators::Pair<Rule>,
    script: &crate::script::Script,
) -> Option<location::Span> {
    Some(location::Span::from_pest(rule.as_span(), &script.name))
}
