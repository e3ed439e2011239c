use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line={}, column={}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptErrorCode {
    UnknownEvent,
    InvalidAction,
    InvalidActionStructure,
    UnknownStateTarget,
    UnknownInitialState,
    UnknownDyingState,
}

/// A problem found while loading a script. The offending action, event or
/// setting is skipped and loading goes on.
#[derive(Debug, Clone)]
pub struct ScriptDiagnostic {
    pub code: ScriptErrorCode,
    pub message: String,
    pub mob_type: String,
    pub file_path: PathBuf,
    pub location: Option<SourceLocation>,
}

impl fmt::Display for ScriptDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(
                f,
                "{:?}: {} (type={}, file={}, {})",
                self.code,
                self.message,
                self.mob_type,
                self.file_path.display(),
                loc
            ),
            None => write!(
                f,
                "{:?}: {} (type={}, file={})",
                self.code,
                self.message,
                self.mob_type,
                self.file_path.display()
            ),
        }
    }
}

impl std::error::Error for ScriptDiagnostic {}

#[derive(Debug, Clone, Default)]
pub struct ScriptDiagnostics {
    items: Vec<ScriptDiagnostic>,
}

impl ScriptDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: ScriptDiagnostic) {
        warn!(
            code = ?diagnostic.code,
            mob_type = %diagnostic.mob_type,
            file = %diagnostic.file_path.display(),
            "script_diagnostic: {}",
            diagnostic.message
        );
        self.items.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScriptDiagnostic> {
        self.items.iter()
    }

    pub fn with_code(&self, code: ScriptErrorCode) -> impl Iterator<Item = &ScriptDiagnostic> {
        self.items.iter().filter(move |item| item.code == code)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<ScriptDiagnostic> {
        self.items
    }
}

/// A content file that could not be loaded at all.
#[derive(Debug, Error)]
pub enum ContentLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed XML in {path} ({location}): {message}")]
    Xml {
        path: PathBuf,
        location: SourceLocation,
        message: String,
    },
    #[error("root element of {path} must be <{expected}> ({location})")]
    InvalidRoot {
        path: PathBuf,
        expected: &'static str,
        location: SourceLocation,
    },
    #[error("missing required field {field} in {path} ({location})")]
    MissingField {
        path: PathBuf,
        field: String,
        location: SourceLocation,
    },
    #[error("unknown field <{field}> in {path} ({location})")]
    UnknownField {
        path: PathBuf,
        field: String,
        location: SourceLocation,
    },
    #[error("invalid value '{value}' for {field} in {path} ({location})")]
    InvalidValue {
        path: PathBuf,
        field: String,
        value: String,
        location: SourceLocation,
    },
    #[error("unknown mob category '{category}' in {path} ({location})")]
    UnknownCategory {
        path: PathBuf,
        category: String,
        location: SourceLocation,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_type_file_and_position() {
        let diagnostic = ScriptDiagnostic {
            code: ScriptErrorCode::UnknownStateTarget,
            message: "unknown state \"flying\"".to_string(),
            mob_type: "Bulborb".to_string(),
            file_path: PathBuf::from("bulborb.xml"),
            location: Some(SourceLocation { line: 4, column: 9 }),
        };
        assert_eq!(
            diagnostic.to_string(),
            "UnknownStateTarget: unknown state \"flying\" (type=Bulborb, file=bulborb.xml, line=4, column=9)"
        );
    }

    #[test]
    fn diagnostics_filter_by_code() {
        let mut diagnostics = ScriptDiagnostics::new();
        for code in [ScriptErrorCode::UnknownEvent, ScriptErrorCode::InvalidAction] {
            diagnostics.push(ScriptDiagnostic {
                code,
                message: String::new(),
                mob_type: "Bulborb".to_string(),
                file_path: PathBuf::new(),
                location: None,
            });
        }
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.with_code(ScriptErrorCode::UnknownEvent).count(), 1);
    }
}
