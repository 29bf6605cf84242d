//! Persona chat relay — single-session HTTP front end for a hosted LLM.
//!
//! The crate composes a persona template, an in-process conversation
//! transcript, and a generation provider behind one `POST /api/chat`
//! endpoint. The binary entry point is `src/main.rs`; everything is
//! exposed here for integration tests.

pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod logger;
pub mod memory;
pub mod persona;
pub mod relay;
