use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a directed follow edge. A pair holds at most one edge at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeKind {
    /// Pending follow awaiting the followee's decision.
    Requested,
    /// Active follow.
    Approved,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Requested => "REQUESTED",
            EdgeKind::Approved => "APPROVED",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which end of an edge a neighbor query walks from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `username -> neighbor` (who the user follows / has requested).
    Outgoing,
    /// `neighbor -> username` (followers / incoming requests).
    Incoming,
}

/// Observable state of an ordered (follower, followee) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FollowState {
    None,
    Requested,
    Approved,
}

impl From<Option<EdgeKind>> for FollowState {
    fn from(kind: Option<EdgeKind>) -> Self {
        match kind {
            None => FollowState::None,
            Some(EdgeKind::Requested) => FollowState::Requested,
            Some(EdgeKind::Approved) => FollowState::Approved,
        }
    }
}

/// Demographic filter used by business accounts to pick an audience.
///
/// Empty `town`/`gender` match anything. Ages are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TargetGroupFilter {
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(rename = "min-age", alias = "minAge")]
    pub min_age: i32,
    #[serde(rename = "max-age", alias = "maxAge")]
    pub max_age: i32,
}

impl TargetGroupFilter {
    /// Drop blank text criteria so they behave as wildcards.
    pub fn normalized(mut self) -> Self {
        self.town = self.town.filter(|t| !t.trim().is_empty());
        self.gender = self.gender.filter(|g| !g.trim().is_empty());
        self
    }

    /// Inclusive year-of-birth window matching the age range at `current_year`.
    pub fn birth_year_range(&self, current_year: i32) -> (i32, i32) {
        (current_year - self.max_age, current_year - self.min_age)
    }
}
