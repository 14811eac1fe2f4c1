use crate::document_model::DEFAULT_MAX_SNAPSHOTS;
use log::{debug, warn};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const RC_FILE_NAME: &str = ".pieceeditrc";

#[derive(Debug, Clone, PartialEq)]
pub struct RcConfig {
    pub tab_stop: usize,
    pub show_line_numbers: bool,
    pub history_limit: usize,
    pub case_sensitive: bool,
    pub auto_pairs: bool,
}

impl Default for RcConfig {
    fn default() -> Self {
        Self {
            tab_stop: 4,
            show_line_numbers: false,
            history_limit: DEFAULT_MAX_SNAPSHOTS,
            case_sensitive: true,
            auto_pairs: true,
        }
    }
}

pub struct RcLoader;

impl RcLoader {
    /// Get the path to the RC file
    /// Looks for .pieceeditrc in:
    /// 1. Current directory
    /// 2. Home directory (~/.pieceeditrc)
    pub fn get_rc_path() -> Option<PathBuf> {
        let current_rc = Path::new(RC_FILE_NAME);
        if current_rc.exists() {
            return Some(current_rc.to_path_buf());
        }

        if let Ok(home) = env::var("HOME") {
            let home_rc = Path::new(&home).join(RC_FILE_NAME);
            if home_rc.exists() {
                return Some(home_rc);
            }
        }

        None
    }

    /// Load and parse the RC file, preferring `explicit` over the search path.
    /// A missing or unreadable file yields the defaults.
    pub fn load_config(explicit: Option<&Path>) -> RcConfig {
        let mut config = RcConfig::default();

        let rc_path = explicit.map(Path::to_path_buf).or_else(Self::get_rc_path);
        if let Some(rc_path) = rc_path {
            match fs::read_to_string(&rc_path) {
                Ok(content) => {
                    debug!("loading config from {}", rc_path.display());
                    Self::parse_config_content(&content, &mut config);
                }
                Err(err) => warn!("could not read {}: {err}", rc_path.display()),
            }
        }

        config
    }

    pub fn parse_config_content(content: &str, config: &mut RcConfig) {
        for line in content.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') || line.starts_with('"') {
                continue;
            }

            Self::parse_config_line(line, config);
        }
    }

    fn parse_config_line(line: &str, config: &mut RcConfig) {
        let line = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        }
        .trim();

        // "set name" / "set noname" / "set name=value", or bare "name=value"
        let setting = line.strip_prefix("set ").unwrap_or(line).trim();

        if let Some((key, value)) = setting.split_once('=') {
            Self::apply_value(key.trim(), value.trim(), config);
            return;
        }

        let (name, enabled) = match setting.strip_prefix("no") {
            Some(rest) => (rest, false),
            None => (setting, true),
        };
        match name {
            "nu" | "number" => config.show_line_numbers = enabled,
            "autopairs" | "ap" => config.auto_pairs = enabled,
            // ignorecase inverts the stored flag
            "ignorecase" | "ic" => config.case_sensitive = !enabled,
            _ => debug!("ignoring unknown setting {setting:?}"),
        }
    }

    fn apply_value(key: &str, value: &str, config: &mut RcConfig) {
        let flag = || matches!(value, "true" | "1" | "yes");
        match key {
            "tabstop" | "tab_stop" | "ts" => {
                if let Ok(tab_stop) = value.parse::<usize>() {
                    if (1..=16).contains(&tab_stop) {
                        config.tab_stop = tab_stop;
                    }
                }
            }
            "history" | "undolevels" | "history_limit" => {
                if let Ok(limit) = value.parse::<usize>() {
                    if limit >= 2 {
                        config.history_limit = limit;
                    }
                }
            }
            "ignorecase" | "ignore_case" => config.case_sensitive = !flag(),
            "autopairs" | "auto_pairs" => config.auto_pairs = flag(),
            "number" | "line_numbers" => config.show_line_numbers = flag(),
            _ => debug!("ignoring unknown setting {key:?}"),
        }
    }

    /// Generate a sample RC file content
    pub fn generate_sample_rc() -> String {
        r#"# piece-edit configuration file (.pieceeditrc)
# Lines starting with # or " are comments

set nu                 # Show line numbers (or set nonu)
set tabstop=4          # Tab width
set history=1000       # Maximum undo snapshots kept per document
set noignorecase       # Case-sensitive search (or set ignorecase)
set autopairs          # Insert the closing bracket when typing an opening one

# Alternative key=value syntax:
# history_limit=500
# ignore_case=false
# auto_pairs=true
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vim_style_config() {
        let mut config = RcConfig::default();
        let content = r#"
            set nu
            set tabstop=8
            set history=50
            set ignorecase
            set noautopairs
        "#;

        RcLoader::parse_config_content(content, &mut config);

        assert!(config.show_line_numbers);
        assert_eq!(config.tab_stop, 8);
        assert_eq!(config.history_limit, 50);
        assert!(!config.case_sensitive);
        assert!(!config.auto_pairs);
    }

    #[test]
    fn test_parse_key_value_config() {
        let mut config = RcConfig::default();
        let content = r#"
            tabstop=2
            line_numbers=yes
            history_limit=20
            ignore_case=false
            auto_pairs=1
        "#;

        RcLoader::parse_config_content(content, &mut config);

        assert!(config.show_line_numbers);
        assert_eq!(config.tab_stop, 2);
        assert_eq!(config.history_limit, 20);
        assert!(config.case_sensitive);
        assert!(config.auto_pairs);
    }

    #[test]
    fn test_comments_are_skipped() {
        let mut config = RcConfig::default();
        let content = r#"
            # set nu
            " set ignorecase
            set history=30         # inline comment
        "#;

        RcLoader::parse_config_content(content, &mut config);

        assert!(!config.show_line_numbers);
        assert!(config.case_sensitive);
        assert_eq!(config.history_limit, 30);
    }

    #[test]
    fn test_invalid_values_ignored() {
        let mut config = RcConfig::default();
        let content = r#"
            set tabstop=0
            set tabstop=20
            set history=1
            history=lots
            unknown_setting=value
            set bogus
        "#;

        RcLoader::parse_config_content(content, &mut config);

        assert_eq!(config, RcConfig::default());
    }

    #[test]
    fn test_sample_round_trips() {
        let mut config = RcConfig::default();
        RcLoader::parse_config_content(&RcLoader::generate_sample_rc(), &mut config);
        assert!(config.show_line_numbers);
        assert_eq!(config.history_limit, 1000);
        assert!(config.case_sensitive);
        assert!(config.auto_pairs);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RC_FILE_NAME);
        fs::write(&path, "set history=7\n").unwrap();
        assert_eq!(RcLoader::load_config(Some(&path)).history_limit, 7);

        let missing = dir.path().join("missing");
        assert_eq!(RcLoader::load_config(Some(&missing)), RcConfig::default());
    }
}
