//! Evaluation configuration.
//!
//! Controls how access control lists resolve abstention, i.e. a requested
//! action that no applicable entry grants and none denies. Configuration is
//! loaded from environment variables with a closed-by-default fallback.

use serde::{Deserialize, Serialize};

/// Environment variable controlling [`AclConfig::grant_on_abstention`].
pub const GRANT_ON_ABSTENTION_ENV: &str = "WARDEN_GRANT_ON_ABSTENTION";

/// Access control list configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclConfig {
    /// Outcome for an action no entry decides.
    ///
    /// When `false` (the default) an undecided action is not granted. When
    /// `true` it is granted. Denials override either way.
    #[serde(default)]
    pub grant_on_abstention: bool,
}

impl Default for AclConfig {
    /// Returns the closed configuration: abstention does not grant.
    fn default() -> Self {
        Self {
            grant_on_abstention: false,
        }
    }
}

impl AclConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `WARDEN_GRANT_ON_ABSTENTION`: grant undecided actions (default: false)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            grant_on_abstention: std::env::var(GRANT_ON_ABSTENTION_ENV)
                .map(|s| parse_flag(&s))
                .unwrap_or(default.grant_on_abstention),
        }
    }

    /// Configuration that grants undecided actions.
    pub fn open() -> Self {
        Self {
            grant_on_abstention: true,
        }
    }
}

fn parse_flag(s: &str) -> bool {
    matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
