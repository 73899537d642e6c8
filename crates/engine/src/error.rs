use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Correction target row doesn't exist in the current store.
    IndexOutOfRange { index: usize, len: usize },
    /// TOML parse / deserialization error in a rules file.
    RulesParse(String),
    /// Rules file parsed but is unusable (empty field name, no rules, etc.).
    RulesValidation(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "row index {index} out of range (store has {len} rows)")
            }
            Self::RulesParse(msg) => write!(f, "rules parse error: {msg}"),
            Self::RulesValidation(msg) => write!(f, "rules validation error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
