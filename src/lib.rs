//! Transcript Translator - batched translation of call transcripts
//!
//! Flags transcript segments that are not in English, translates all of them
//! with a single chat-completion request, and splices the answers back into
//! the transcript by position.

pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod logging;
pub mod server;
pub mod transcript;
pub mod translate;
