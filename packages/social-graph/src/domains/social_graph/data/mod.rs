//! Request and response bodies for the HTTP surface.

use serde::{Deserialize, Serialize};

/// Body of `PATCH /follow-requests/:username`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct FollowRequestDecision {
    pub approved: bool,
}

/// Body of `PATCH /internal/users/me`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct PrivacyUpdate {
    pub private: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CountResponse {
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct VisibilityResponse {
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FollowerNamesResponse {
    pub usernames: Vec<String>,
}
