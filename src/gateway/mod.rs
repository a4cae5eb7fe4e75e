//! Window manager gateway abstraction
//!
//! This module provides the capability boundary to the window manager's IPC
//! interface: four operations, one production implementation speaking the
//! i3/Sway protocol, injected into the server at construction time.

mod sway;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::core::command::CommandOutcome;
use crate::core::tree::{LayoutTree, VersionInfo, Workspace};

pub use sway::SwayGateway;

/// Errors from the window manager IPC boundary.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Establishing the IPC connection failed (no socket, window manager not
    /// running, wrong permissions).
    #[error("failed to connect to window manager IPC: {0}")]
    Connect(#[source] swayipc_async::Error),

    /// A single request failed after the connection was established.
    #[error("window manager IPC request failed: {0}")]
    Request(#[source] swayipc_async::Error),

    /// The window manager is unreachable or rejected the request.
    #[error("window manager unavailable: {message}")]
    Unavailable { message: String },
}

/// Capability trait over the window manager IPC.
///
/// Each call issues exactly one IPC request and returns its result as-is;
/// there are no retries and no cached state between calls. Implementations
/// serialize concurrent calls internally, so a shared handle is safe.
#[async_trait]
pub trait WmGateway: Send + Sync {
    /// Query the window manager version. Used once at startup to fail fast
    /// when the window manager is unreachable.
    async fn get_version(&self) -> Result<VersionInfo, GatewayError>;

    /// Fetch a fresh snapshot of the layout tree.
    async fn get_tree(&self) -> Result<LayoutTree, GatewayError>;

    /// Fetch the current workspaces, in the window manager's order.
    async fn get_workspaces(&self) -> Result<Vec<Workspace>, GatewayError>;

    /// Execute a command string verbatim; one outcome per sub-command, in
    /// execution order.
    async fn run_command(&self, command: &str) -> Result<Vec<CommandOutcome>, GatewayError>;
}

/// Connect to the window manager for the current session.
pub async fn connect() -> Result<Arc<dyn WmGateway>, GatewayError> {
    if let Ok(socket) = std::env::var("SWAYSOCK") {
        tracing::info!("Using sway IPC socket (SWAYSOCK={})", socket);
    } else if let Ok(socket) = std::env::var("I3SOCK") {
        tracing::info!("Using i3 IPC socket (I3SOCK={})", socket);
    }

    Ok(Arc::new(SwayGateway::connect().await?))
}
