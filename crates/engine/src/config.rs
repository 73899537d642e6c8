//! Rules file: an ordered list of field rules in TOML.
//!
//! ```toml
//! [[rule]]
//! kind = "non_negative_number"
//! field = "sales"
//!
//! [[rule]]
//! kind = "email"
//! field = "email"
//! ```

use serde::Deserialize;

use crate::error::EngineError;
use crate::rules::{EmailRule, NonNegativeNumberRule, RuleSet};

#[derive(Debug, Clone, Deserialize)]
pub struct RulesConfig {
    #[serde(rename = "rule", default)]
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    pub kind: RuleKind,
    pub field: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    NonNegativeNumber,
    Email,
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonNegativeNumber => write!(f, "non_negative_number"),
            Self::Email => write!(f, "email"),
        }
    }
}

impl RulesConfig {
    /// Parse and validate a rules file.
    pub fn from_toml(s: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(s).map_err(|e| EngineError::RulesParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), EngineError> {
        if self.rules.is_empty() {
            return Err(EngineError::RulesValidation("no [[rule]] entries".into()));
        }
        for (i, rule) in self.rules.iter().enumerate() {
            if rule.field.trim().is_empty() {
                return Err(EngineError::RulesValidation(format!(
                    "rule {} ({}): field must not be empty",
                    i + 1,
                    rule.kind
                )));
            }
        }
        Ok(())
    }

    /// Build the rule set, preserving file order.
    pub fn build(&self) -> RuleSet {
        let mut set = RuleSet::new();
        for rule in &self.rules {
            match rule.kind {
                RuleKind::NonNegativeNumber => {
                    set.push(Box::new(NonNegativeNumberRule::new(rule.field.as_str())))
                }
                RuleKind::Email => set.push(Box::new(EmailRule::new(rule.field.as_str()))),
            }
        }
        set
    }
}
