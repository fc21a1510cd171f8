//! Presence Status
//!
//! The single online/offline flag stored on every user. It is written as a
//! lowercase string both in the database and on the wire.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

/// Online/offline flag of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Online,
    /// Every account starts offline
    #[default]
    Offline,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            other => Err(SharedError::unknown_status(other)),
        }
    }
}

impl TryFrom<String> for UserStatus {
    type Error = SharedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_offline() {
        assert_eq!(UserStatus::default(), UserStatus::Offline);
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("online".parse::<UserStatus>().unwrap(), UserStatus::Online);
        assert_eq!("offline".parse::<UserStatus>().unwrap(), UserStatus::Offline);
        assert!("Online".parse::<UserStatus>().is_err());
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&UserStatus::Online).unwrap();
        assert_eq!(json, "\"online\"");
    }
}
