use serde::{Deserialize, Serialize};

use crate::serial::SerialError;

/// Per-block tool configuration supplied by the host.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolConfig {
    /// Display-only block: every editing command is ignored.
    pub read_only: bool,
    /// Hint shown in an empty item.
    pub placeholder: Option<String>,
}

impl ToolConfig {
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    pub fn from_json(source: &str) -> Result<Self, SerialError> {
        Ok(serde_json::from_str(source)?)
    }
}
