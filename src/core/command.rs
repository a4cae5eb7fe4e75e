//! Command result aggregation
//!
//! A single command string may contain several semicolon-separated
//! sub-commands; the window manager answers with one reply per sub-command.
//! Trellis never parses the command string itself — it only reshapes the
//! reply list, preserving order and count, so a caller can see exactly which
//! sub-command failed.

use std::fmt::Display;

use serde::Serialize;

/// Result of one sub-command, in execution order.
///
/// A failed sub-command is a normal outcome, not an operation error; only an
/// IPC-level failure aborts the whole command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandOutcome {
    pub fn from_reply<E: Display>(reply: Result<(), E>) -> Self {
        match reply {
            Ok(()) => Self { success: true, error: None },
            Err(e) => Self { success: false, error: Some(e.to_string()) },
        }
    }
}

/// Map the window manager's per-sub-command replies 1:1 into outcomes.
pub fn collect_outcomes<E: Display>(replies: Vec<Result<(), E>>) -> Vec<CommandOutcome> {
    replies.into_iter().map(CommandOutcome::from_reply).collect()
}
