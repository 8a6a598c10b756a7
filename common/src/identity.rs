use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque user identifier (a uuid on the wire).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        UserId(value.to_string())
    }
}

/// A marketplace user as seen by the feed: enough to name them and draw an avatar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub display_name: String,
    /// Initials supplied by the profile service, if any.
    #[serde(default)]
    pub abbreviated_name: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: UserId(id.into()),
            display_name: display_name.into(),
            abbreviated_name: None,
        }
    }

    /// Avatar initials. Falls back to the first letter of each name part (max two).
    pub fn initials(&self) -> String {
        if let Some(abbr) = self.abbreviated_name.as_deref().filter(|a| !a.is_empty()) {
            return abbr.to_string();
        }
        self.display_name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// The two parties of a transaction. Transitions are attributed to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionActor {
    Customer,
    Provider,
}

impl TransitionActor {
    pub fn counterpart(self) -> Self {
        match self {
            TransitionActor::Customer => TransitionActor::Provider,
            TransitionActor::Provider => TransitionActor::Customer,
        }
    }
}

impl fmt::Display for TransitionActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionActor::Customer => write!(f, "customer"),
            TransitionActor::Provider => write!(f, "provider"),
        }
    }
}
