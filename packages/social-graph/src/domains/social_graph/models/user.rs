use serde::{Deserialize, Serialize};

/// A node in the follow graph.
///
/// `username` is the identity and is never reused. The demographic fields are
/// filled in by registration; a user materialized implicitly by a follow keeps
/// the defaults until registration upserts over them.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub town: String,
    pub gender: String,
    pub year_of_birth: i32,
    #[serde(rename = "private")]
    #[sqlx(rename = "private")]
    pub is_private: bool,
}

impl User {
    /// Minimal node carrying only the identity (public, no demographics).
    pub fn minimal(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            town: String::new(),
            gender: String::new(),
            year_of_birth: 0,
            is_private: false,
        }
    }

    pub fn with_privacy(mut self, is_private: bool) -> Self {
        self.is_private = is_private;
        self
    }
}
