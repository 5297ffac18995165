
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Location {
    /// The file (or pseudo file such as `<machine code>`) the location refers to.
    pub file: String,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
}

impl Location {
    pub fn new(file: String, line: usize, column: usize) -> Self {
        Self { file, line, column }
    }

    /// Location of the first character of a whole line.
    pub fn line_start(file: &str, line: usize) -> Self {
        Self { file: file.to_string(), line, column: 1 }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// Build a span from a pest span inside the named file.
    pub fn from_pest(span: pest::Span<'_>, file: &str) -> Self {
        let (sl, sc) = span.start_pos().line_col();
        let (el, ec) = span.end_pos().line_col();
        Self {
            start: Location::new(file.to_string(), sl, sc),
            end: Location::new(file.to_string(), el, ec),
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}
