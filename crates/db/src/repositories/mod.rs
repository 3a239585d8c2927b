//! Repository layer: one zero-sized struct per table with async query methods.

pub mod knowledge_repo;

pub use knowledge_repo::KnowledgeRepo;
