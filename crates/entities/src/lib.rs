//! Core entity definitions for the Task API.
//!
//! This crate defines the `Task` record, its status and priority
//! enumerations, the payloads used to create and update tasks, and the
//! schema constraints every store enforces on them.

mod task;
mod validation;

pub use task::*;
pub use validation::*;
