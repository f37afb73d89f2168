//! Category map loading.
//!
//! A category map is an ordered list of rules, each naming a destination
//! folder and the lowercase extensions that belong in it. The map comes either
//! from the built-in table or from a plain-text configuration file.
//!
//! # Configuration File Format
//!
//! One rule per line:
//!
//! ```text
//! Documents:.pdf,.docx,.txt
//! Images:.jpg,.png
//! ```
//!
//! Lines that do not split into exactly two parts on `:` are skipped without
//! complaint. Extensions are trimmed and lowercased but no leading dot is
//! added, so `Images:jpg` will never match `photo.jpg`.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading the category map.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// The file exists but could not be read (permissions, not a file, ...).
    #[error("Error reading configuration file '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Built-in categories, in the order they are matched.
const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    ("Documents", &[".pdf", ".docx", ".txt", ".doc", ".odt", ".rtf"]),
    (
        "Images",
        &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".svg"],
    ),
    ("Spreadsheets", &[".xlsx", ".xls", ".csv", ".ods"]),
    ("Presentations", &[".pptx", ".ppt", ".odp"]),
    ("Audio", &[".mp3", ".wav", ".flac", ".aac", ".ogg"]),
    ("Videos", &[".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv"]),
    ("Archives", &[".zip", ".rar", ".7z", ".tar", ".gz"]),
];

/// A named destination folder and the extensions routed into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    /// Folder name under the destination root.
    pub name: String,
    /// Lowercase extensions, unique within the rule.
    pub extensions: Vec<String>,
}

impl CategoryRule {
    /// Creates a rule, lowercasing and de-duplicating the extensions.
    pub fn new<I, S>(name: impl Into<String>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rule = Self {
            name: name.into(),
            extensions: Vec::new(),
        };
        for ext in extensions {
            let ext = ext.as_ref().trim().to_lowercase();
            if !ext.is_empty() && !rule.extensions.contains(&ext) {
                rule.extensions.push(ext);
            }
        }
        rule
    }

    /// Returns true if `ext` (already lowercased) belongs to this rule.
    pub fn matches(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e == ext)
    }
}

/// Ordered, immutable set of category rules. First match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMap {
    rules: Vec<CategoryRule>,
}

impl CategoryMap {
    /// Loads the category map.
    ///
    /// With no path the built-in table is returned. With a path, the file is
    /// parsed line by line; see the module docs for the format.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if the file does not exist and
    /// `ConfigError::Unreadable` if it cannot be read.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        })?;

        let map = Self::parse(&content);
        debug!(
            config = %path.display(),
            categories = map.len(),
            "loaded category map"
        );
        Ok(map)
    }

    /// Parses configuration text. Malformed lines are ignored.
    ///
    /// A leading UTF-8 byte order mark is dropped.
    pub fn parse(content: &str) -> Self {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut map = Self { rules: Vec::new() };

        for line in content.lines() {
            let parts: Vec<&str> = line.split(':').collect();
            if parts.len() != 2 {
                continue;
            }

            let name = parts[0].trim();
            if name.is_empty() {
                continue;
            }

            map.insert(CategoryRule::new(name, parts[1].split(',')));
        }

        map
    }

    /// Adds a rule, replacing the extensions of an existing rule with the
    /// same name while keeping its position.
    pub fn insert(&mut self, rule: CategoryRule) {
        match self.rules.iter_mut().find(|r| r.name == rule.name) {
            Some(existing) => existing.extensions = rule.extensions,
            None => self.rules.push(rule),
        }
    }

    /// Iterates the rules in match order.
    pub fn rules(&self) -> impl Iterator<Item = &CategoryRule> {
        self.rules.iter()
    }

    /// Iterates the category names in match order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name.as_str())
    }

    /// Looks up a rule by folder name.
    pub fn get(&self, name: &str) -> Option<&CategoryRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for CategoryMap {
    fn default() -> Self {
        Self {
            rules: DEFAULT_CATEGORIES
                .iter()
                .map(|(name, exts)| CategoryRule::new(*name, exts.iter()))
                .collect(),
        }
    }
}
