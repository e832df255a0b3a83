//! `tracker` - command-line front end for the project tracker store.
//!
//! The state itself (entities, board order, links, commands, persistence)
//! lives in `tracker-lib`. This crate adds what a terminal user needs on top:
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Layered configuration (user file, workspace file, env, flags)
//! - [`format`] - Output formatting (text, JSON)
//! - [`logging`] - tracing subscriber setup

#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod format;
pub mod logging;

pub use cli::run;
