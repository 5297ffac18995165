/// An IR operand: a literal integer or a symbolic name.
///
/// User variables, temporaries (`_t<N>`), argument slots (`_arg<I>`) and the
/// return slot (`_ret`) all share one flat namespace at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operand {
    Int(i64),
    Name(String),
}

impl Operand {
    pub fn name(name: &str) -> Self {
        Operand::Name(name.to_string())
    }

    /// Decode a textual operand token: anything `i64` accepts is a literal,
    /// everything else is a name.
    pub fn parse(token: &str) -> Self {
        match token.parse::<i64>() {
            Ok(v) => Operand::Int(v),
            Err(_) => Operand::Name(token.to_string()),
        }
    }
}

impl From<i64> for Operand {
    fn from(v: i64) -> Self {
        Operand::Int(v)
    }
}

impl From<&str> for Operand {
    fn from(n: &str) -> Self {
        Operand::Name(n.to_string())
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Int(v) => write!(f, "{}", v),
            Operand::Name(n) => write!(f, "{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_distinguishes_literals_from_names() {
        assert_eq!(Operand::parse("-12"), Operand::Int(-12));
        assert_eq!(Operand::parse("_t3"), Operand::name("_t3"));
        assert_eq!(Operand::parse("x1"), Operand::name("x1"));
    }
}
