//! Row structs and request DTOs.

pub mod knowledge_item;
