// Social Graph Service - Core
//
// Maintains the follow graph of the social network: privacy-gated follow
// approval, visibility checks, profile recommendations, and the social graph
// step of the distributed user-registration saga.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
