//! Default configuration values


/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "bumpkit.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "bumpkit.yaml";

/// Config file names searched for, in order of preference
pub fn config_file_names() -> [&'static str; 4] {
    [
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".bumpkit.toml",
        ".bumpkit.yaml",
    ]
}

/// Default configuration written by `bumpkit init`
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# bumpkit configuration

[workspace]
# Manifest file read in the root and in every workspace member
manifest = "package.json"
# Files that never count towards a package, e.g. ["**/*.md"]
ignore = []

[git]
# Branch releases are cut from
branch = "main"
require_clean = true
tag_format = "v{version}"

[commits]
# Set to false to leave merge commits out of release plans
include_merges = true
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_template_matches_defaults() {
        let parsed: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
