//! Infrastructure adapters for Churn.
//!
//! Implements the ports of `churn_core::application::ports`. All real I/O
//! (disk writes, spawning package managers) lives here.

pub mod filesystem;
pub mod process;

pub use filesystem::{FsOperation, LocalFilesystem, MemoryFilesystem};
pub use process::{RecordingProcessRunner, SystemProcessRunner};
