//! Registration saga participant.

pub mod commands;
pub mod handler;
pub mod listener;
pub mod trace;

pub use commands::{
    RegisterUserCommand, RegisterUserCommandType, RegisterUserReply, RegisterUserReplyType,
    SagaUserPayload, REGISTER_COMMAND, REGISTER_REPLY,
};
pub use handler::{RegisterUserHandler, DEFAULT_HANDLER_TIMEOUT};
pub use listener::{consume_register_commands, run_register_listener, CommandMessage};
pub use trace::{TraceContext, SPAN_ID_HEADER, TRACE_ID_HEADER};
