use marionette_compiler::{CompileOptions, ROOT_ADAPTER_NAME};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "marionette.config.json";

/// Marionette configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Text repeated once per nesting level in compiled markup
    #[serde(default = "default_indent")]
    pub indent: String,

    /// Registry name the root adapter is installed under
    #[serde(default = "default_root_adapter_name")]
    pub root_adapter_name: String,

    /// Alias table applied when `--aliases` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<String>,
}

fn default_indent() -> String {
    "  ".to_string()
}

fn default_root_adapter_name() -> String {
    ROOT_ADAPTER_NAME.to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Absolute path of the default alias table, if one is configured
    pub fn aliases_path(&self, cwd: &str) -> Option<PathBuf> {
        self.aliases.as_ref().map(|path| PathBuf::from(cwd).join(path))
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            indent: self.indent.clone(),
            root_adapter_name: self.root_adapter_name.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            root_adapter_name: default_root_adapter_name(),
            aliases: None,
        }
    }
}
