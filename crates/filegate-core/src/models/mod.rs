//! Data models for file storage and access
//!
//! Rules describe what may be attached to an entity slot, stored files are the
//! metadata records produced by the orchestrator, links bind a stored file to a
//! slot, and tickets scope access to one resource.

mod file;
mod rule;
mod ticket;

pub use file::*;
pub use rule::*;
pub use ticket::*;
