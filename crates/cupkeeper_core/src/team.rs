//! Teams, slots and participant identities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Which of the two draft seats a team occupies. Slot A always acts first.
///
/// The slot assignment is randomized once at match creation so neither team
/// systematically gets the first-mover advantage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSlot {
    A,
    B,
}

impl TeamSlot {
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

impl fmt::Display for TeamSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// Opaque, comparable team identity supplied by the platform layer
/// (a Discord role id, in practice).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamId(pub String);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TeamId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TeamId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One side of a match. Bound at creation, identity never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: TeamId,
    /// Display name used in announcements.
    pub name: String,
    /// Mention/reference rendered by the Notifier target (e.g. `<@&role>`).
    pub mention: String,
}

impl Team {
    pub fn new(
        id: impl Into<TeamId>,
        name: impl Into<String>,
        mention: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mention: mention.into(),
        }
    }
}

/// A participant as seen by the draft engine: how to address them, and which
/// team (if any) the permission layer resolved them to. The engine never
/// resolves identities itself.
#[derive(Debug, Clone)]
pub struct Actor {
    pub mention: String,
    pub team: Option<TeamId>,
}

impl Actor {
    pub fn for_team(mention: impl Into<String>, team: TeamId) -> Self {
        Self {
            mention: mention.into(),
            team: Some(team),
        }
    }

    /// An actor with no team binding, e.g. a referee acting with `force`.
    pub fn unaffiliated(mention: impl Into<String>) -> Self {
        Self {
            mention: mention.into(),
            team: None,
        }
    }
}

/// Starting side on a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Attack,
    Defend,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Self::Attack => Self::Defend,
            Self::Defend => Self::Attack,
        }
    }
}

impl FromStr for Side {
    type Err = CoreError;

    /// Tokens are expected pre-normalized, but a third value must still be
    /// rejected here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "attack" => Ok(Self::Attack),
            "defend" => Ok(Self::Defend),
            _ => Err(CoreError::InvalidSide {
                side: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attack => write!(f, "attack"),
            Self::Defend => write!(f, "defend"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_parses_case_insensitively() {
        assert_eq!("Attack".parse::<Side>().unwrap(), Side::Attack);
        assert_eq!("DEFEND".parse::<Side>().unwrap(), Side::Defend);
    }

    #[test]
    fn side_rejects_third_values() {
        assert!("middle".parse::<Side>().is_err());
        assert!("".parse::<Side>().is_err());
    }

    #[test]
    fn slot_other_flips() {
        assert_eq!(TeamSlot::A.other(), TeamSlot::B);
        assert_eq!(TeamSlot::B.other(), TeamSlot::A);
    }
}
