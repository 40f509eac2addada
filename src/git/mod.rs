//! Git operations using git2-rs.

pub mod staged;

pub use staged::{collect_staged, open_repository};
