//! Domain logic: the layout tree model, window search, and command result
//! aggregation. Everything in here is pure and synchronous; IPC lives in
//! [`crate::gateway`].

pub mod command;
pub mod matcher;
pub mod tree;
