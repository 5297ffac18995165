use crate::error::{Level, impl_error_ext};
use crate::location::{Location, Span};

#[derive(Debug, Clone)]
pub struct EmptyScriptError {
    level: Level,
    message: String,
    issuer: String,
    location: Option<Location>,
    span: Option<Span>,
}

impl EmptyScriptError {
    pub fn new(issuer: String, location: Option<Location>, span: Option<Span>) -> Self {
        EmptyScriptError {
            level: Level::Error,
            message: "The provided script is empty.".to_string(),
            issuer,
            location,
            span,
        }
    }
}

impl std::fmt::Display for EmptyScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{} (at {})", self.message, loc),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for EmptyScriptError {}

impl_error_ext!(EmptyScriptError);

#[derive(Debug, Clone)]
pub struct SyntaxError {
    level: Level,
    message: String,
    issuer: String,
    location: Option<Location>,
    span: Option<Span>,
}

impl SyntaxError {
    pub fn new(issuer: String, location: Option<Location>, span: Option<Span>) -> Self {
        SyntaxError {
            level: Level::Error,
            message: "There was a syntax error in the script.".to_string(),
            issuer,
            location,
            span,
        }
    }

    pub fn with(level: Level, message: String, issuer: String, location: Option<Location>, span: Option<Span>) -> Self {
        SyntaxError { level, message, issuer, location, span }
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{} (at {})", self.message, loc),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for SyntaxError {}

impl_error_ext!(SyntaxError);
