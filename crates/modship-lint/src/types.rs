//! Lint result types

use std::path::PathBuf;

use serde::Serialize;

use modship_core::error::LintError;

/// Category of a lint violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Direct network primitive outside the proxy wrapper
    ForbiddenCall,
    /// Reference to a third-party CDN or API host
    ForbiddenCdn,
    /// Hardcoded live secret key
    ForbiddenSecret,
    /// Output of an unescaped variable
    Escaping,
    /// Unsanitized superglobal access
    Sanitization,
}

impl Category {
    /// Returns the string representation of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForbiddenCall => "FORBIDDEN_CALL",
            Self::ForbiddenCdn => "FORBIDDEN_CDN",
            Self::ForbiddenSecret => "FORBIDDEN_SECRET",
            Self::Escaping => "ESCAPING",
            Self::Sanitization => "SANITIZATION",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = LintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "FORBIDDEN_CALL" => Ok(Self::ForbiddenCall),
            "FORBIDDEN_CDN" | "CDN" => Ok(Self::ForbiddenCdn),
            "FORBIDDEN_SECRET" | "SECRET" => Ok(Self::ForbiddenSecret),
            "ESCAPING" => Ok(Self::Escaping),
            "SANITIZATION" => Ok(Self::Sanitization),
            _ => Err(LintError::UnknownCategory(s.to_string())),
        }
    }
}

/// A single rule hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// File, relative to the project root when known
    pub file: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// Rule category
    pub category: Category,
    /// Rule message
    pub message: String,
    /// Text that triggered the rule
    pub matched: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}:{} - {}",
            self.category,
            self.file.display(),
            self.line,
            self.message
        )?;
        if !self.matched.is_empty() {
            write!(f, " ({})", self.matched)?;
        }
        Ok(())
    }
}

/// Result of linting a set of files
#[derive(Debug, Clone, Default, Serialize)]
pub struct LintReport {
    /// Number of files scanned
    pub files_checked: usize,
    /// Every violation in file then line order
    pub violations: Vec<Violation>,
    /// Files that could not be read
    pub unreadable: Vec<PathBuf>,
}

impl LintReport {
    /// Whether the gate passes
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations in a category
    pub fn count(&self, category: Category) -> usize {
        self.violations
            .iter()
            .filter(|v| v.category == category)
            .count()
    }
}
