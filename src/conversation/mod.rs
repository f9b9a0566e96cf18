//! The guided conversation loop shared by every wizard step.
//!
//! The loop has two states, waiting for operator input and done. It moves to
//! done only when the caller's completion predicate accepts an agent reply.
//! There are no retries and no timeouts at this level.

mod console;

pub use console::{Console, ScriptedConsole, StdConsole};

use tracing::debug;

use crate::agent::{Agent, AgentResponse};
use crate::error::{Result, WizardError};

/// Re-prompt shown when a required answer is left empty
pub const REQUIRED_NOTICE: &str = "La pregunta es obligatoria. Por favor, responde.";

/// Anything that answers a user message with a typed reply
pub trait Conversation<R> {
    fn send(&mut self, message: &str) -> Result<R>;
}

impl<R: AgentResponse> Conversation<R> for Agent<'_, R> {
    fn send(&mut self, message: &str) -> Result<R> {
        Agent::send(self, message)
    }
}

/// How a loop starts
#[derive(Debug, Clone, Copy)]
pub enum Opening<'a> {
    /// Send an instruction to the agent and show its reply
    Instruct(&'a str),
    /// Show a prompt locally without contacting the agent
    Prompt(&'a str),
}

/// What an empty operator line means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPolicy {
    /// Re-prompt until something is typed
    Required,
    /// End the loop without a result
    Optional,
}

/// How a loop ended
#[derive(Debug)]
pub enum LoopOutcome<R> {
    Completed {
        response: R,
        /// Operator lines forwarded to the agent
        turns: usize,
    },
    Skipped,
}

impl<R> LoopOutcome<R> {
    pub fn into_response(self) -> Option<R> {
        match self {
            Self::Completed { response, .. } => Some(response),
            Self::Skipped => None,
        }
    }
}

/// Run a conversation until `is_done` accepts a reply.
///
/// The reply to an [`Opening::Instruct`] is shown but never tested against
/// `is_done`.
pub fn run_loop<R, C>(
    conversation: &mut C,
    console: &mut dyn Console,
    opening: Opening<'_>,
    policy: InputPolicy,
    is_done: impl Fn(&R) -> bool,
) -> Result<LoopOutcome<R>>
where
    R: AgentResponse,
    C: Conversation<R> + ?Sized,
{
    match opening {
        Opening::Instruct(instruction) => {
            let reply = conversation.send(instruction)?;
            console.say(reply.message());
        }
        Opening::Prompt(prompt) => console.say(prompt),
    }

    let mut turns = 0;
    loop {
        let line = console.read_line()?.ok_or(WizardError::InputClosed)?;
        let line = line.trim();

        if line.is_empty() {
            match policy {
                InputPolicy::Required => {
                    console.notice(REQUIRED_NOTICE);
                    continue;
                }
                InputPolicy::Optional => {
                    debug!("optional answer left empty");
                    return Ok(LoopOutcome::Skipped);
                }
            }
        }

        let reply = conversation.send(line)?;
        turns += 1;
        console.say(reply.message());

        if is_done(&reply) {
            debug!(turns, "conversation complete");
            return Ok(LoopOutcome::Completed {
                response: reply,
                turns,
            });
        }

        if let Some(progress) = reply.progress() {
            console.notice(&progress);
        }
    }
}
