// src/generation/mod.rs

//! Notes to flashcards.
//!
//! The [`orchestrator`] asks a [`backend`] for a `Q:`/`A:` reply and reads it
//! with the [`parser`]. When that fails it falls back to the rule-based
//! [`fallback`] generator, which runs the [`rules`] over sentences from the
//! [`splitter`].

pub mod backend;
pub mod fallback;
pub mod orchestrator;
pub mod parser;
pub mod rules;
pub mod splitter;

pub use backend::{BackendError, DisabledBackend, GenerationBackend, HuggingFaceBackend};
pub use orchestrator::{CardSource, GenerationError, Generated, Orchestrator};
