//! Saga participant for user registration.
//!
//! Reacts to `SaveSocialGraph` by materialising the user node and replying
//! with the outcome, and to `RollbackSocialGraph` by removing the node again.
//! Every other command kind belongs to another participant.

use std::time::Duration;

use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::domains::registration::commands::{
    RegisterUserCommand, RegisterUserCommandType, RegisterUserReply, RegisterUserReplyType,
    SagaUserPayload, REGISTER_REPLY,
};
use crate::domains::registration::trace::TraceContext;
use crate::kernel::{MessageHeaders, ServerDeps};

/// Deadline for a single command when none is configured.
pub const DEFAULT_HANDLER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct RegisterUserHandler {
    deps: ServerDeps,
    timeout: Duration,
}

impl RegisterUserHandler {
    pub fn new(deps: ServerDeps) -> Self {
        Self {
            deps,
            timeout: DEFAULT_HANDLER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Handle one raw message from the command subject.
    pub async fn handle_message(&self, payload: &[u8], headers: &MessageHeaders) {
        let trace = TraceContext::from_headers(headers);
        let span = info_span!(
            "register_user_command",
            trace_id = %trace.trace_id,
            span_id = %trace.span_id,
        );

        async {
            let command: RegisterUserCommand = match serde_json::from_slice(payload) {
                Ok(command) => command,
                Err(e) => {
                    warn!(error = %e, "Dropping malformed register command");
                    return;
                }
            };
            let user = match command.payload() {
                Ok(user) => user,
                Err(e) => {
                    warn!(error = %e, command = ?command.command, "Dropping register command with malformed user");
                    return;
                }
            };

            match command.command {
                RegisterUserCommandType::SaveSocialGraph => {
                    self.save_social_graph(&user, command.user, &trace).await
                }
                RegisterUserCommandType::RollbackSocialGraph => {
                    self.rollback_social_graph(&user).await
                }
                other => {
                    debug!(command = ?other, username = %user.username, "Ignoring command for another participant");
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Persist the user and reply with the outcome. `raw_user` is echoed in the
    /// reply exactly as received.
    async fn save_social_graph(&self, user: &SagaUserPayload, raw_user: Value, trace: &TraceContext) {
        let result = tokio::time::timeout(self.timeout, self.deps.graph.upsert_user(&user.to_user())).await;

        let reply = match result {
            Ok(Ok(())) => {
                info!(username = %user.username, "Social graph user saved");
                RegisterUserReplyType::SocialGraphSuccess
            }
            Ok(Err(e)) => {
                error!(error = %e, username = %user.username, "Failed to save social graph user");
                RegisterUserReplyType::SocialGraphFail
            }
            Err(_) => {
                error!(
                    username = %user.username,
                    timeout_secs = self.timeout.as_secs(),
                    "Timed out saving social graph user"
                );
                RegisterUserReplyType::SocialGraphFail
            }
        };

        let reply = RegisterUserReply {
            reply,
            user: raw_user,
        };
        self.send_reply(reply, &user.username, trace).await;
    }

    async fn rollback_social_graph(&self, user: &SagaUserPayload) {
        match tokio::time::timeout(self.timeout, self.deps.graph.delete_user(&user.username)).await {
            Ok(Ok(true)) => info!(username = %user.username, "Social graph user rolled back"),
            Ok(Ok(false)) => debug!(username = %user.username, "Nothing to roll back"),
            Ok(Err(e)) => error!(error = %e, username = %user.username, "Failed to roll back social graph user"),
            Err(_) => error!(username = %user.username, "Timed out rolling back social graph user"),
        }
    }

    async fn send_reply(&self, reply: RegisterUserReply, username: &str, trace: &TraceContext) {
        let payload = match serde_json::to_vec(&reply) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "Failed to encode register reply");
                return;
            }
        };

        let headers = trace.child().to_headers();
        if let Err(e) = self
            .deps
            .nats
            .publish(REGISTER_REPLY.to_string(), headers, Bytes::from(payload))
            .await
        {
            error!(
                error = %e,
                reply = ?reply.reply,
                username = %username,
                "Failed to publish register reply"
            );
        }
    }
}
