//! Task storage for the Task API
//!
//! This crate provides a storage abstraction for task records. It ships a
//! document-style in-memory store and a relational store backed by SQLite;
//! both implement [`TaskStore`] and are interchangeable behind it.

mod error;
mod memory;
mod sqlite;
mod traits;

pub use error::*;
pub use memory::*;
pub use sqlite::*;
pub use traits::*;
