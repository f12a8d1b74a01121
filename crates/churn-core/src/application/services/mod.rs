//! Application services.

pub mod scaffold_service;

pub use scaffold_service::{
    InstallOutcome, InstallReport, ScaffoldOptions, ScaffoldReport, ScaffoldService,
    ScaffoldStage,
};
