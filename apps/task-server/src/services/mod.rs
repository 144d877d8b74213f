//! Application services.

pub mod task;
