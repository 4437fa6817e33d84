//! modship lint - pre-flight security linter for plugin sources
//!
//! Scans source files line by line against a fixed, declarative rule table:
//! forbidden network primitives, CDN references, hardcoded secrets,
//! unescaped output and unsanitized superglobal reads.

mod linter;
pub mod rules;
pub mod types;

pub use linter::{is_comment_line, PatternLinter};
pub use rules::{build_rules, Exemption, LineScope, Rule, RuleSpec, DEFAULT_RULES};
pub use types::{Category, LintReport, Violation};
