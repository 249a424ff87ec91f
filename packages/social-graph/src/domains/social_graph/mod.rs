//! Social graph domain - follows, visibility and recommendations.

pub mod activities;
pub mod data;
pub mod error;
pub mod models;

pub use error::{SocialGraphError, SocialGraphResult};
