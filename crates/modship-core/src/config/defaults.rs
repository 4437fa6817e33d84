//! Default configuration values

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "modship.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "modship.yaml";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".modship.toml",
        ".modship.yaml",
    ]
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# modship configuration

[paths]
metadata = "module.json"
source_dir = "src"
release_notes = "release.md"
credentials = ".env"

[lint]
enabled = true
extensions = ["php"]
proxy_file = "ProxyRequest.php"

[versioning]
tag_format = "v{version}"

[git]
enabled = true
remote = "origin"
commit_message = "Release {tag}"
push = true

[registry]
enabled = true
endpoint = "https://zentrale.kiwerke.com/api/v1/register"
timeout_secs = 10
user_key = "KIW_CENTRAL_USER"
password_key = "KIW_CENTRAL_PASS"

[release_notes]
cms = "WordPress"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{validate_config, Config};

    #[test]
    fn test_template_parses_and_validates() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.lint.proxy_file, "ProxyRequest.php");
    }
}
