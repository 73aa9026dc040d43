use serde::{Deserialize, Serialize};

/// What `remove` does for an identifier that is not present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingRemovePolicy {
    /// Silently succeed.
    #[default]
    Ignore,
    /// Fail with `DriverError::NotFound`.
    Error,
}

/// Settings shared by the shipped drivers. `version` is stamped into each
/// marker `FileDriver` writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    pub version: String,
    #[serde(default)]
    pub on_missing_remove: MissingRemovePolicy,
}

impl DriverConfig {
    pub fn v0() -> Self {
        Self {
            version: "1".into(),
            on_missing_remove: MissingRemovePolicy::Ignore,
        }
    }

    pub fn strict() -> Self {
        Self {
            on_missing_remove: MissingRemovePolicy::Error,
            ..Self::v0()
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::v0()
    }
}
