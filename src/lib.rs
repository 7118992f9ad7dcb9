//! Moodline is a terminal-first client for a mood-aware support chat
//! service.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns runtime state: the session and auth flow, the
//!   conversation log, the mood-trend series, and the action dispatcher
//!   that applies user intents and network completions to that state.
//! - [`api`] defines the wire payloads and the [`api::Backend`] boundary
//!   behind which the remote auth, chat, and trend services sit.
//! - [`auth`] persists the session token in the OS keyring behind an
//!   injectable store interface.
//! - [`ui`] renders the terminal interface, runs the interactive event
//!   loop, and owns the mood chart's create/destroy lifecycle.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into
//! [`ui::chat_loop::run_chat`] for interactive sessions.

pub mod api;
pub mod auth;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
