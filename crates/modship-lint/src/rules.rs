//! Declarative rule table
//!
//! Each rule is a trigger pattern, an optional mitigation pattern that
//! suppresses the trigger when it appears on the same line, a category and a
//! message. The scanner in [`crate::linter`] knows nothing about individual
//! rules.

use regex::{Regex, RegexBuilder};

use modship_core::config::ExtraRuleConfig;
use modship_core::error::LintError;

use crate::types::Category;

/// Which lines a rule looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineScope {
    /// Every line, comments included
    AllLines,
    /// Only lines that are not comments
    CodeOnly,
}

/// Files a rule does not apply to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exemption {
    /// Applies everywhere
    None,
    /// Not applied inside the configured network proxy wrapper
    ProxyFile,
}

/// Uncompiled rule definition
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    pub category: Category,
    pub trigger: &'static str,
    pub mitigation: Option<&'static str>,
    pub scope: LineScope,
    pub exemption: Exemption,
    pub message: &'static str,
}

/// Built-in rules
pub const DEFAULT_RULES: &[RuleSpec] = &[
    RuleSpec {
        category: Category::ForbiddenCall,
        trigger: r"\b(wp_remote_get|wp_remote_post|wp_remote_request|wp_remote_head|curl_init|curl_exec|fsockopen|stream_socket_client)\s*\(",
        mitigation: None,
        scope: LineScope::AllLines,
        exemption: Exemption::ProxyFile,
        message: "Direct network call is forbidden, route it through the proxy wrapper",
    },
    RuleSpec {
        category: Category::ForbiddenCdn,
        trigger: r"https?://(cdn\.|unpkg\.|fonts\.googleapis|ajax\.googleapis)|cdn\.jsdelivr\.net|cdnjs\.cloudflare\.com|googleapis\.com|unpkg\.com",
        mitigation: None,
        scope: LineScope::AllLines,
        exemption: Exemption::None,
        message: "External asset detected, CDNs are forbidden",
    },
    RuleSpec {
        category: Category::ForbiddenSecret,
        trigger: r#"['"](sk|rk)_live_[A-Za-z0-9]+['"]"#,
        mitigation: None,
        scope: LineScope::AllLines,
        exemption: Exemption::None,
        message: "Hardcoded secret key detected",
    },
    RuleSpec {
        category: Category::Escaping,
        trigger: r"(\b(echo|print)\s+|<\?=\s*)\$[A-Za-z_][A-Za-z0-9_]*",
        mitigation: Some(r"\b(esc_html|esc_attr|esc_url|esc_js|esc_textarea|wp_kses|wp_kses_post|json_encode|wp_json_encode)\b"),
        scope: LineScope::CodeOnly,
        exemption: Exemption::None,
        message: "Potential unescaped output",
    },
    RuleSpec {
        category: Category::Sanitization,
        trigger: r"\$_(POST|GET|REQUEST)\b",
        mitigation: Some(r"(\bsanitize_|\bfilter_input\b|\bwp_verify_nonce\b|\bcheck_admin_referer\b|\bcheck_ajax_referer\b|\babsint\b)"),
        scope: LineScope::CodeOnly,
        exemption: Exemption::None,
        message: "Direct superglobal access without visible sanitization",
    },
];

/// A compiled rule
#[derive(Debug, Clone)]
pub struct Rule {
    pub category: Category,
    pub scope: LineScope,
    pub exemption: Exemption,
    pub message: String,
    trigger: Regex,
    mitigation: Option<Regex>,
}

fn compile(category: Category, pattern: &str) -> Result<Regex, LintError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| LintError::InvalidPattern {
            rule: category.to_string(),
            reason: e.to_string(),
        })
}

impl Rule {
    /// Compile a built-in rule
    pub fn from_spec(spec: &RuleSpec) -> Result<Self, LintError> {
        Ok(Self {
            category: spec.category,
            scope: spec.scope,
            exemption: spec.exemption,
            message: spec.message.to_string(),
            trigger: compile(spec.category, spec.trigger)?,
            mitigation: spec
                .mitigation
                .map(|m| compile(spec.category, m))
                .transpose()?,
        })
    }

    /// Compile a rule from configuration.
    ///
    /// Configured FORBIDDEN_CALL rules inherit the proxy-file exemption.
    pub fn from_config(config: &ExtraRuleConfig) -> Result<Self, LintError> {
        let category: Category = config.category.parse()?;
        let exemption = if category == Category::ForbiddenCall {
            Exemption::ProxyFile
        } else {
            Exemption::None
        };

        Ok(Self {
            category,
            scope: if config.code_only {
                LineScope::CodeOnly
            } else {
                LineScope::AllLines
            },
            exemption,
            message: config.message.clone(),
            trigger: compile(category, &config.pattern)?,
            mitigation: config
                .mitigation
                .as_deref()
                .map(|m| compile(category, m))
                .transpose()?,
        })
    }

    /// Evaluate the rule against one line; returns the triggering text on a hit
    pub fn check<'l>(&self, line: &'l str) -> Option<&'l str> {
        let hit = self.trigger.find(line)?;
        if let Some(mitigation) = &self.mitigation {
            if mitigation.is_match(line) {
                return None;
            }
        }
        Some(hit.as_str())
    }
}

/// Compile the built-in table plus any configured extras
pub fn build_rules(extra: &[ExtraRuleConfig]) -> Result<Vec<Rule>, LintError> {
    DEFAULT_RULES
        .iter()
        .map(Rule::from_spec)
        .chain(extra.iter().map(Rule::from_config))
        .collect()
}
