//! NATS subscription driving [`RegisterUserHandler`].

use anyhow::{Context, Result};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domains::registration::commands::REGISTER_COMMAND;
use crate::domains::registration::handler::RegisterUserHandler;
use crate::kernel::{headers_from_message, MessageHeaders};

/// One delivery from the command subject.
#[derive(Debug, Clone)]
pub struct CommandMessage {
    pub payload: Bytes,
    pub headers: MessageHeaders,
}

/// Consume the command subject until the subscription closes or `shutdown`
/// is cancelled, then wait for commands already being handled.
pub async fn run_register_listener(
    client: async_nats::Client,
    handler: RegisterUserHandler,
    shutdown: CancellationToken,
) -> Result<()> {
    let subscriber = client
        .subscribe(REGISTER_COMMAND)
        .await
        .context("Failed to subscribe to register commands")?;

    info!(subject = REGISTER_COMMAND, "Listening for register commands");

    let messages = subscriber.map(|message| CommandMessage {
        headers: headers_from_message(&message),
        payload: message.payload,
    });
    consume_register_commands(messages, handler, shutdown).await;
    Ok(())
}

/// Each message is handled on its own task so a slow store call never holds
/// up the rest of the stream. On shutdown the stream is dropped (which
/// unsubscribes) and in-flight tasks run to completion, replies included.
pub async fn consume_register_commands<S>(
    mut messages: S,
    handler: RegisterUserHandler,
    shutdown: CancellationToken,
) where
    S: Stream<Item = CommandMessage> + Unpin,
{
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                info!(subject = REGISTER_COMMAND, "Stopping register listener");
                break;
            }
            next = messages.next() => match next {
                Some(message) => {
                    let handler = handler.clone();
                    in_flight.spawn(async move {
                        handler.handle_message(&message.payload, &message.headers).await;
                    });
                }
                None => {
                    warn!(subject = REGISTER_COMMAND, "Register command subscription closed");
                    break;
                }
            },
            Some(finished) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = finished {
                    warn!(error = %e, "Register command task failed");
                }
            }
        }
    }

    drop(messages);
    if !in_flight.is_empty() {
        info!(in_flight = in_flight.len(), "Draining register commands");
    }
    while let Some(finished) = in_flight.join_next().await {
        if let Err(e) = finished {
            warn!(error = %e, "Register command task failed");
        }
    }
}
