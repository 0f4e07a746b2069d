//! Parley is a full-screen terminal chat client for a small chat server.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns runtime state: the persisted chat log, theme preference,
//!   voice and camera capabilities, and the action reducer that drives them.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that turns key presses and async completions into actions.
//! - [`commands`] implements slash-command parsing used by the chat loop.
//! - [`api`] defines the server contract (`/chat`, `/upload`, `/logout`) and
//!   the HTTP backend that speaks it.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which loads configuration and dispatches into
//! [`ui::chat_loop`] for interactive sessions.

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
