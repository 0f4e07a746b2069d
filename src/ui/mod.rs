//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: the interaction loop that turns key presses into
//!   [`crate::core::app::AppAction`]s and runs the resulting side effects.
//! - [`renderer`]: transcript, camera preview, status line, input box and
//!   overlays.
//! - [`theme`]: the dark and light palettes.
//! - [`help`]: the `/help` overlay text.
//!
//! This layer presents and captures interaction state; [`crate::core`] owns
//! the chat log, preferences and devices.

pub mod chat_loop;
pub mod help;
pub mod renderer;
pub mod theme;
