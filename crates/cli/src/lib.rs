//! `docchat` command-line front end.
//!
//! Terminal presentation over [`dc_sessions::Conversation`]: an
//! interactive REPL, a one-shot `ask` command and config utilities.

pub mod cli;
pub mod render;
