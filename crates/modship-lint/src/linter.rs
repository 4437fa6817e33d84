//! Line scanner that applies the rule table

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use modship_core::config::{LintConfig, ProjectPaths};
use modship_core::error::LintError;
use modship_core::FileWalker;

use crate::rules::{build_rules, Exemption, LineScope, Rule};
use crate::types::{LintReport, Violation};

/// Best-effort comment detection: the trimmed line opens with a comment marker.
///
/// This is not a tokenizer; code after a trailing `//` is still scanned and a
/// `#[Attribute]` line counts as a comment.
pub fn is_comment_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    ["//", "#", "/*", "*"]
        .iter()
        .any(|marker| trimmed.starts_with(marker))
}

/// Scans source files against the rule table
pub struct PatternLinter {
    rules: Vec<Rule>,
    proxy_file: String,
    extensions: Vec<String>,
}

impl PatternLinter {
    /// Build a linter from configuration
    pub fn new(config: &LintConfig) -> Result<Self, LintError> {
        let rules = build_rules(&config.extra_rules)?;
        debug!(rules = rules.len(), proxy_file = %config.proxy_file, "linter ready");
        Ok(Self {
            rules,
            proxy_file: config.proxy_file.clone(),
            extensions: config.extensions.clone(),
        })
    }

    /// Compiled rules in evaluation order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    fn is_proxy_file(&self, file: &Path) -> bool {
        !self.proxy_file.is_empty()
            && file
                .file_name()
                .is_some_and(|name| name.to_string_lossy() == self.proxy_file.as_str())
    }

    /// Lint already-decoded file content. Pure function of its inputs.
    pub fn lint_source(&self, file: &Path, content: &str) -> Vec<Violation> {
        let in_proxy = self.is_proxy_file(file);
        let mut violations = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let comment = is_comment_line(line);

            for rule in &self.rules {
                if rule.scope == LineScope::CodeOnly && comment {
                    continue;
                }
                if rule.exemption == Exemption::ProxyFile && in_proxy {
                    continue;
                }
                if let Some(matched) = rule.check(line) {
                    violations.push(Violation {
                        file: file.to_path_buf(),
                        line: index + 1,
                        category: rule.category,
                        message: rule.message.clone(),
                        matched: matched.trim().to_string(),
                    });
                }
            }
        }

        violations
    }

    /// Lint files on disk; paths in the report are shown relative to `root`.
    ///
    /// Invalid UTF-8 is replaced rather than rejected. Files that cannot be
    /// read are listed in the report and skipped.
    #[instrument(skip(self, files), fields(files = files.len()))]
    pub fn lint_files(&self, root: &Path, files: &[PathBuf]) -> LintReport {
        let mut report = LintReport::default();

        for path in files {
            let rel_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();
            let bytes = match std::fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(file = %rel_path.display(), error = %e, "could not read file, skipping");
                    report.unreadable.push(rel_path);
                    continue;
                }
            };

            let content = String::from_utf8_lossy(&bytes);
            let found = self.lint_source(&rel_path, &content);
            if !found.is_empty() {
                debug!(file = %rel_path.display(), violations = found.len(), "violations found");
            }
            report.violations.extend(found);
            report.files_checked += 1;
        }

        info!(
            files_checked = report.files_checked,
            violations = report.violations.len(),
            "lint complete"
        );
        report
    }

    /// Lint every file with a recognized extension under the project's source tree
    pub fn lint_tree(&self, paths: &ProjectPaths) -> LintReport {
        let files = FileWalker::new()
            .with_extensions(self.extensions.iter().cloned())
            .enumerate(&paths.source_dir);
        self.lint_files(&paths.root, &files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use modship_core::config::{ExtraRuleConfig, PathsConfig};
    use tempfile::TempDir;

    fn linter() -> PatternLinter {
        PatternLinter::new(&LintConfig::default()).unwrap()
    }

    #[test]
    fn test_network_call_outside_proxy() {
        let v = linter().lint_source(Path::new("src/Admin/Pingback.php"), "<?php\n$ch = curl_init($url);\n");
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].category, Category::ForbiddenCall);
        assert_eq!(v[0].line, 2);
    }

    #[test]
    fn test_network_call_inside_proxy() {
        let v = linter().lint_source(
            Path::new("src/Utils/ProxyRequest.php"),
            "<?php\n$response = wp_remote_post(self::$url, $args);\n",
        );
        assert!(v.is_empty());
    }

    #[test]
    fn test_proxy_file_still_checked_for_secrets() {
        let v = linter().lint_source(
            Path::new("src/Utils/ProxyRequest.php"),
            "$key = 'sk_live_123abc';",
        );
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].category, Category::ForbiddenSecret);
    }

    #[test]
    fn test_echo_without_escaping() {
        let v = linter().lint_source(Path::new("view.php"), "echo $x;");
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].category, Category::Escaping);
        assert_eq!(v[0].line, 1);
    }

    #[test]
    fn test_echo_with_escaping() {
        let v = linter().lint_source(Path::new("view.php"), "echo esc_html($x);");
        assert!(v.is_empty());
    }

    #[test]
    fn test_superglobal_without_sanitization() {
        let v = linter().lint_source(Path::new("form.php"), "$name = $_POST['x'];");
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].category, Category::Sanitization);
    }

    #[test]
    fn test_superglobal_with_sanitization() {
        let v = linter().lint_source(
            Path::new("form.php"),
            "$name = sanitize_text_field($_POST['x']);",
        );
        assert!(v.is_empty());
    }

    #[test]
    fn test_comment_lines_exempt_from_code_rules_only() {
        let source = "// echo $x;\n * $_GET['debug']\n# echo $y;\n// https://cdn.jsdelivr.net/x.js\n";
        let v = linter().lint_source(Path::new("a.php"), source);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].category, Category::ForbiddenCdn);
        assert_eq!(v[0].line, 4);
    }

    #[test]
    fn test_multiple_rules_on_one_line() {
        let v = linter().lint_source(Path::new("a.php"), "echo $_GET['q'];");
        let categories: Vec<Category> = v.iter().map(|v| v.category).collect();
        assert_eq!(categories, vec![Category::Escaping, Category::Sanitization]);
    }

    #[test]
    fn test_is_comment_line() {
        assert!(is_comment_line("   // note"));
        assert!(is_comment_line("\t* docblock"));
        assert!(is_comment_line("/* block"));
        assert!(!is_comment_line("echo $x; // trailing"));
    }

    #[test]
    fn test_extra_rules_apply() {
        let mut config = LintConfig::default();
        config.extra_rules.push(ExtraRuleConfig {
            category: "FORBIDDEN_CALL".to_string(),
            pattern: r"\beval\s*\(".to_string(),
            mitigation: None,
            message: "eval is forbidden".to_string(),
            code_only: true,
        });
        let linter = PatternLinter::new(&config).unwrap();
        let v = linter.lint_source(Path::new("a.php"), "eval($code);\n// eval($code);");
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].message, "eval is forbidden");
    }

    #[test]
    fn test_lint_tree_filters_extensions_and_relativizes() {
        let temp = TempDir::new().unwrap();
        let paths = PathsConfig::default().resolve(temp.path());
        std::fs::create_dir_all(paths.source_dir.join("Admin")).unwrap();
        std::fs::write(paths.source_dir.join("Admin/Page.php"), "<?php\necho $title;\n").unwrap();
        std::fs::write(paths.source_dir.join("app.js"), "echo $title;").unwrap();
        std::fs::write(paths.source_dir.join("clean.php"), "<?php echo esc_html($t);").unwrap();

        let report = linter().lint_tree(&paths);
        assert_eq!(report.files_checked, 2);
        assert!(!report.passed());
        assert_eq!(report.count(Category::Escaping), 1);
        assert_eq!(
            report.violations[0].to_string(),
            "[ESCAPING] src/Admin/Page.php:2 - Potential unescaped output (echo $title)"
        );
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let temp = TempDir::new().unwrap();
        let paths = PathsConfig::default().resolve(temp.path());
        std::fs::create_dir_all(&paths.source_dir).unwrap();
        let mut bytes = b"<?php\n\xff\xfe\n".to_vec();
        bytes.extend_from_slice(b"echo $x;\n");
        std::fs::write(paths.source_dir.join("bin.php"), bytes).unwrap();

        let report = linter().lint_tree(&paths);
        assert_eq!(report.files_checked, 1);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].line, 3);
    }

    #[test]
    fn test_missing_source_tree_passes() {
        let temp = TempDir::new().unwrap();
        let paths = PathsConfig::default().resolve(temp.path());
        let report = linter().lint_tree(&paths);
        assert!(report.passed());
        assert_eq!(report.files_checked, 0);
    }
}
