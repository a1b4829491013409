use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a participant in a shared expense group.
///
/// Participants are identified by their display name, which must be
/// unique within a group. The registry trims names before storing them.
///
/// # Examples
///
/// ```
/// use expense_splitter::core::participant::ParticipantId;
///
/// let alice = ParticipantId::new("Alice");
/// let bob = ParticipantId::new("Bob");
/// assert_ne!(alice, bob);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the participant's name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
