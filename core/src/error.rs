use std::fmt;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level_str = match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        };
        write!(f, "{}", level_str)
    }
}

/// Common surface of every diagnostic produced by the compiler and the VM.
pub trait MinicErrorExt {
    fn level(&self) -> Level;
    fn message(&self) -> String;
    fn issuer(&self) -> String;
    fn span(&self) -> Option<crate::location::Span>;
    fn location(&self) -> Option<crate::location::Location>;
}

impl fmt::Debug for dyn MinicErrorExt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loc_str = match self.location() {
            Some(loc) => loc.to_string(),
            None => "unknown".to_string(),
        };

        let span_str = match self.span() {
            Some(span) => span.to_string(),
            None => "span:none".to_string(),
        };

        write!(
            f,
            "MINIC | {} | {} | {} | {} | {}",
            self.level(),
            loc_str,
            self.issuer(),
            span_str,
            self.message()
        )
    }
}

impl fmt::Display for dyn MinicErrorExt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Implements `MinicErrorExt` and the boxing conversion for an error struct
/// carrying the usual `level`/`message`/`issuer`/`location`/`span` fields.
macro_rules! impl_error_ext {
    ($ty:ty) => {
        impl $crate::error::MinicErrorExt for $ty {
            fn level(&self) -> $crate::error::Level {
                self.level
            }

            fn message(&self) -> String {
                self.message.clone()
            }

            fn issuer(&self) -> String {
                self.issuer.clone()
            }

            fn span(&self) -> Option<$crate::location::Span> {
                self.span.clone()
            }

            fn location(&self) -> Option<$crate::location::Location> {
                self.location.clone()
            }
        }

        impl From<$ty> for Box<dyn $crate::error::MinicErrorExt> {
            fn from(err: $ty) -> Self {
                Box::new(err)
            }
        }
    };
}

pub(crate) use impl_error_ext;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;

    #[derive(Debug)]
    struct SampleError {
        level: Level,
        message: String,
        issuer: String,
        location: Option<Location>,
        span: Option<crate::location::Span>,
    }

    impl_error_ext!(SampleError);

    #[test]
    fn dyn_debug_contains_every_field() {
        let err: Box<dyn MinicErrorExt> = SampleError {
            level: Level::Critical,
            message: "boom".into(),
            issuer: "minic.test".into(),
            location: Some(Location::new("t.mc".into(), 3, 7)),
            span: None,
        }
        .into();
        let rendered = format!("{}", err);
        assert_eq!(rendered, "MINIC | CRITICAL | t.mc:3:7 | minic.test | span:none | boom");
    }
}
