// Application settings
// Loaded from ~/.config/rowcheck/settings.json (or $ROWCHECK_CONFIG)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV: &str = "ROWCHECK_CONFIG";
pub const PREVIEW_ID_ENV: &str = "ROWCHECK_PREVIEW_ID";
pub const PREVIEW_SECRET_ENV: &str = "ROWCHECK_PREVIEW_SECRET_SHA256";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Preview
    /// Data rows shown by the preview.
    #[serde(rename = "preview.rowLimit")]
    pub preview_row_limit: usize,

    /// Identity allowed to open the preview. None = preview locked.
    #[serde(rename = "preview.identity")]
    pub preview_identity: Option<String>,

    /// Hex SHA-256 of the preview secret (see `rowcheck hash-secret`)
    #[serde(rename = "preview.secretSha256")]
    pub preview_secret_sha256: Option<String>,

    // Input
    /// Single-character delimiter. None = sniff from file contents.
    #[serde(rename = "csv.delimiter")]
    pub csv_delimiter: Option<char>,

    // Rules
    /// TOML rules file. None = built-in sales/email rules.
    #[serde(rename = "rules.path")]
    pub rules_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preview_row_limit: 10,
            preview_identity: None,
            preview_secret_sha256: None,
            csv_delimiter: None,
            rules_path: None,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rowcheck")
            .join("settings.json")
    }

    /// Load settings from the default path plus environment overrides.
    pub fn load() -> Self {
        let mut settings = Self::load_from(&Self::config_path());
        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }

    /// Load settings from `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                log::warn!("error parsing {}: {e}; using default settings", path.display());
                Self::default()
            }),
            Err(e) => {
                log::warn!("error reading {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned).map_err(|e| e.to_string())
    }

    /// Apply `ROWCHECK_PREVIEW_*` overrides. `lookup` is `std::env::var` in
    /// production and a map in tests.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(id) = lookup(PREVIEW_ID_ENV).filter(|v| !v.is_empty()) {
            self.preview_identity = Some(id);
        }
        if let Some(digest) = lookup(PREVIEW_SECRET_ENV).filter(|v| !v.is_empty()) {
            self.preview_secret_sha256 = Some(digest);
        }
    }

    /// Both halves of the preview credential are configured.
    pub fn preview_configured(&self) -> bool {
        self.preview_identity.is_some() && self.preview_secret_sha256.is_some()
    }

    /// Delimiter as a byte, if configured and ASCII.
    pub fn delimiter_byte(&self) -> Option<u8> {
        self.csv_delimiter.filter(char::is_ascii).map(|c| c as u8)
    }

    /// Get the config file path for display
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}
