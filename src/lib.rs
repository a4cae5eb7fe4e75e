//! Trellis - i3/Sway window manager MCP server
//!
//! This library provides an MCP (Model Context Protocol) server that bridges
//! tool calls from AI assistants to the i3/Sway window manager's IPC
//! interface.
//!
//! ## Tools
//!
//! - Layout tree and workspace inspection
//! - Window search by name, class, or instance
//! - Window manager command execution with per-sub-command results
//!
//! The window manager is reached through a [`gateway::WmGateway`] capability,
//! injected at construction; everything above it is deterministic and
//! testable without a running window manager.

pub mod core;
pub mod gateway;
pub mod server;
