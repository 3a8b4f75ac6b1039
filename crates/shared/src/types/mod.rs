//! Common value types shared across crates.

pub mod id;

pub use id::{UserId, WorkspaceId};
