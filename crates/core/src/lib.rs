//! Domain logic for the ragdesk support assistant.
//!
//! This crate has no I/O: it owns the knowledge item model, the keyword
//! heuristics, the retrieval scorer, prompt construction and the answer
//! consistency check. Storage lives in `ragdesk-db`, the LLM client in
//! `ragdesk-llm`, and the HTTP surface in `ragdesk-api`.

pub mod consistency;
pub mod error;
pub mod keywords;
pub mod knowledge;
pub mod prompt;
pub mod retrieval;
pub mod types;
