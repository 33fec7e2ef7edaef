//! Session policy configuration.
//!
//! Who we are in the session (host or client) and which inbound-update
//! policies are active. Loadable from a TOML file so server operators can
//! lock down appearance changes without a rebuild.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Our role in the multiplayer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Session authority: applies inbound updates and relays them.
    Host,
    /// Regular peer: applies updates from the host, never relays.
    #[default]
    Client,
}

/// Inbound-update policy for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionPolicy {
    /// Our session role.
    pub role: Role,
    /// Drop every inbound update without applying or relaying.
    pub ignore_updates: bool,
    /// Host only: drop updates that did not originate from the host.
    pub prevent_changes: bool,
}

impl SessionPolicy {
    /// Parses a policy from TOML text. Missing fields take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a policy from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Convenience constructor for a host with default policies.
    #[must_use]
    pub fn host() -> Self {
        Self {
            role: Role::Host,
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_policy() {
        let policy = SessionPolicy::default();
        assert_eq!(policy.role, Role::Client);
        assert!(!policy.ignore_updates);
        assert!(!policy.prevent_changes);
    }

    #[test]
    fn test_parse_full_policy() {
        let policy = SessionPolicy::from_toml_str(
            r#"
            role = "host"
            ignore_updates = false
            prevent_changes = true
            "#,
        )
        .unwrap();
        assert_eq!(policy.role, Role::Host);
        assert!(policy.prevent_changes);
    }

    #[test]
    fn test_parse_partial_policy_uses_defaults() {
        let policy = SessionPolicy::from_toml_str("ignore_updates = true").unwrap();
        assert_eq!(policy.role, Role::Client);
        assert!(policy.ignore_updates);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "role = \"host\"").unwrap();
        let policy = SessionPolicy::load(file.path()).unwrap();
        assert_eq!(policy.role, Role::Host);
    }

    #[test]
    fn test_parse_bad_toml_errors() {
        assert!(SessionPolicy::from_toml_str("role = 7").is_err());
    }
}
