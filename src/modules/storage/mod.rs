//! Storage module for record persistence
//!
//! Provides the generic [`Repository`] contract and its Postgres and
//! in-memory implementations. Resources describe their own table layout
//! through [`Resource::COLUMNS`], so a single implementation serves every
//! collection.

mod memory;
mod postgres;
mod repository;
mod resource;
mod sql;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;
pub use repository::Repository;
pub use resource::{
    from_document, patch_assignments, to_document, Column, ColumnKind, Document, Resource,
};
