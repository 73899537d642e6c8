use std::fmt;

#[derive(Debug)]
pub enum LoadError {
    /// File could not be opened or read.
    Io(String),
    /// Malformed delimited data.
    Csv { line: Option<u64>, message: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Csv { line: Some(line), message } => write!(f, "line {line}: {message}"),
            Self::Csv { line: None, message } => write!(f, "CSV error: {message}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<csv::Error> for LoadError {
    fn from(e: csv::Error) -> Self {
        let line = e.position().map(|p| p.line());
        if let csv::ErrorKind::Io(io) = e.kind() {
            return Self::Io(io.to_string());
        }
        Self::Csv { line, message: e.to_string() }
    }
}
