//! Configuration for driving the network-configuration tool
//!
//! Every field has a default, so an empty TOML file is a valid config:
//!
//! ```toml
//! program = "wicked"
//! interfaces_args = ["show-xml"]
//! configurations_args = ["show-config"]
//! show_args = ["show-xml"]
//! reload_args = ["ifreload"]
//! elevate = ["sudo", "-n"]
//! wrap_output = true
//! list_tags = ["addresses"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::fold::ListTags;

pub const DEFAULT_PROGRAM: &str = "wicked";

/// How to invoke the external tool and fold its output
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Executable of the network-configuration tool
    pub program: String,
    /// Arguments for "enumerate interfaces"
    pub interfaces_args: Vec<String>,
    /// Arguments for "enumerate configurations"
    pub configurations_args: Vec<String>,
    /// Arguments for a single-interface lookup; the interface name is appended
    pub show_args: Vec<String>,
    /// Arguments for re-applying configuration; the identifier is appended
    pub reload_args: Vec<String>,
    /// Command prefix used to elevate privilege for reloads. Empty disables it.
    pub elevate: Vec<String>,
    /// The tool prints records at top level rather than under a root
    /// element; each captured output is wrapped in one before extraction
    pub wrap_output: bool,
    /// Tags folded into sequences
    pub list_tags: Vec<String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            interfaces_args: strings(&["show-xml"]),
            configurations_args: strings(&["show-config"]),
            show_args: strings(&["show-xml"]),
            reload_args: strings(&["ifreload"]),
            elevate: strings(&["sudo", "-n"]),
            wrap_output: true,
            list_tags: Vec::new(),
        }
    }
}

impl ToolConfig {
    /// Parse a config from TOML text
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the text is not valid TOML for this shape.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load a config file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading tool config");
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn list_tags(&self) -> ListTags {
        self.list_tags.iter().collect()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() -> Result<()> {
        assert_eq!(ToolConfig::from_toml_str("")?, ToolConfig::default());
        Ok(())
    }

    #[test]
    fn test_partial_override() -> Result<()> {
        let config = ToolConfig::from_toml_str(
            r#"
            program = "/usr/sbin/wicked"
            elevate = []
            wrap_output = false
            list_tags = ["ip-addresses"]
            "#,
        )?;
        assert_eq!(config.program, "/usr/sbin/wicked");
        assert!(config.elevate.is_empty());
        assert!(!config.wrap_output);
        assert_eq!(config.reload_args, vec!["ifreload".to_string()]);
        assert!(config.list_tags().contains("ip_addresses"));
        Ok(())
    }

    #[test]
    fn test_invalid_toml() {
        let result = ToolConfig::from_toml_str("program = [");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = ToolConfig::load(Path::new("/nonexistent/netfold.toml"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
