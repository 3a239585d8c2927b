pub mod analysis;
pub mod chat;
pub mod knowledge;
pub mod rag_search;
