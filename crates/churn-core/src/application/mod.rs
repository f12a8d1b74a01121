//! Application layer for Churn.
//!
//! - **Services**: the scaffold orchestrator
//! - **Ports**: traits the orchestrator needs from the outside world
//! - **Errors**: orchestration failures
//!
//! Decisions about *what* to generate live in `crate::domain`; this layer
//! only decides *how* a plan is carried out and which failures are fatal.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    InstallOutcome, InstallReport, ScaffoldOptions, ScaffoldReport, ScaffoldService,
    ScaffoldStage,
};

pub use ports::{Filesystem, ProcessRunner};

pub use error::ApplicationError;
