use std::path::PathBuf;

use crate::error::{Level, impl_error_ext};
use crate::location::{Location, Span};

/// A named source text handed to the front end.
#[derive(Debug, Clone)]
pub struct Script {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

impl Script {
    pub fn new(path: PathBuf) -> Result<Self, MissingScriptError> {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let content = std::fs::read_to_string(&path).map_err(|e| MissingScriptError::new(path.clone(), e))?;
        log::debug!("loaded script {} ({} bytes)", name, content.len());
        Ok(Script { name, path, content })
    }

    /// Build a script from in-memory text; the name is used in diagnostics.
    pub fn from_source(name: &str, content: &str) -> Self {
        Script {
            name: name.to_string(),
            path: PathBuf::from(name),
            content: content.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Script: {} at {:?}", self.name, self.path)
    }
}

#[derive(Debug, Clone)]
pub struct MissingScriptError {
    pub path: PathBuf,
    level: Level,
    message: String,
    issuer: String,
    location: Option<Location>,
    span: Option<Span>,
}

impl MissingScriptError {
    fn new(path: PathBuf, cause: std::io::Error) -> Self {
        MissingScriptError {
            message: format!("Cannot read script at {:?}: {}", path, cause),
            path,
            level: Level::Error,
            issuer: "minic.script".to_string(),
            location: None,
            span: None,
        }
    }
}

impl std::fmt::Display for MissingScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for MissingScriptError {}

impl_error_ext!(MissingScriptError);

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_script_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "x = 1;").expect("write");
        let script = Script::new(file.path().to_path_buf()).expect("load");
        assert_eq!(script.content.trim(), "x = 1;");
        assert!(!script.is_empty());
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Script::new(dir.path().join("nope.mc")).unwrap_err();
        assert!(err.path.ends_with("nope.mc"));
        assert!(err.to_string().contains("nope.mc"));
    }
}
