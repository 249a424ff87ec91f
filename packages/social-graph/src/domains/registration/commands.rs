//! Wire types shared with the registration coordinator.
//!
//! The coordinator encodes enums as bare integers and struct fields in
//! PascalCase, so everything here is shaped to match that JSON exactly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domains::social_graph::models::User;

/// Subject the coordinator publishes saga commands on.
pub const REGISTER_COMMAND: &str = "register.command";
/// Subject this service replies on.
pub const REGISTER_REPLY: &str = "register.reply";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum RegisterUserCommandType {
    SaveProfile,
    RollbackProfile,
    SaveSocialGraph,
    RollbackSocialGraph,
    ConfirmAuth,
    RollbackAuth,
}

impl TryFrom<i8> for RegisterUserCommandType {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::SaveProfile),
            1 => Ok(Self::RollbackProfile),
            2 => Ok(Self::SaveSocialGraph),
            3 => Ok(Self::RollbackSocialGraph),
            4 => Ok(Self::ConfirmAuth),
            5 => Ok(Self::RollbackAuth),
            other => Err(format!("unknown register command {}", other)),
        }
    }
}

impl From<RegisterUserCommandType> for i8 {
    fn from(kind: RegisterUserCommandType) -> Self {
        match kind {
            RegisterUserCommandType::SaveProfile => 0,
            RegisterUserCommandType::RollbackProfile => 1,
            RegisterUserCommandType::SaveSocialGraph => 2,
            RegisterUserCommandType::RollbackSocialGraph => 3,
            RegisterUserCommandType::ConfirmAuth => 4,
            RegisterUserCommandType::RollbackAuth => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum RegisterUserReplyType {
    ProfileSuccess,
    ProfileFail,
    ProfileRollback,
    SocialGraphSuccess,
    SocialGraphFail,
}

impl TryFrom<i8> for RegisterUserReplyType {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::ProfileSuccess),
            1 => Ok(Self::ProfileFail),
            2 => Ok(Self::ProfileRollback),
            3 => Ok(Self::SocialGraphSuccess),
            4 => Ok(Self::SocialGraphFail),
            other => Err(format!("unknown register reply {}", other)),
        }
    }
}

impl From<RegisterUserReplyType> for i8 {
    fn from(kind: RegisterUserReplyType) -> Self {
        match kind {
            RegisterUserReplyType::ProfileSuccess => 0,
            RegisterUserReplyType::ProfileFail => 1,
            RegisterUserReplyType::ProfileRollback => 2,
            RegisterUserReplyType::SocialGraphSuccess => 3,
            RegisterUserReplyType::SocialGraphFail => 4,
        }
    }
}

/// Typed view over the coordinator's user object. Only a handful of fields are
/// persisted; replies echo the original JSON, not this view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SagaUserPayload {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub town: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub year_of_birth: Option<i32>,
}

impl SagaUserPayload {
    /// The persisted subset of the payload.
    pub fn to_user(&self) -> User {
        User {
            username: self.username.clone(),
            town: self.town.clone(),
            gender: self.gender.clone(),
            year_of_birth: self.year_of_birth.unwrap_or(0),
            is_private: self.private,
        }
    }
}

/// A saga command. `user` is kept exactly as the coordinator sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterUserCommand {
    pub command: RegisterUserCommandType,
    pub user: Value,
}

impl RegisterUserCommand {
    pub fn payload(&self) -> Result<SagaUserPayload, serde_json::Error> {
        SagaUserPayload::deserialize(&self.user)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterUserReply {
    pub reply: RegisterUserReplyType,
    pub user: Value,
}
