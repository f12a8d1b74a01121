//! Churn Core - scaffolding engine for backend and smart-contract projects.
//!
//! Follows the same hexagonal split as the CLI expects:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            churn-cli (CLI)              │
//! │   flags / prompts -> ConfigurationDraft │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │            (ScaffoldService)            │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │      (Filesystem, ProcessRunner)        │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     churn-adapters (Infrastructure)     │
//! └─────────────────────────────────────────┘
//!
//!   Domain (pure): Configuration, resolution pipeline,
//!   generators, ScaffoldPlan
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use churn_core::{
//!     application::{Filesystem, ProcessRunner, ScaffoldOptions, ScaffoldService},
//!     domain::ConfigurationDraft,
//!     error::ChurnResult,
//! };
//!
//! fn scaffold(filesystem: Box<dyn Filesystem>, runner: Box<dyn ProcessRunner>) -> ChurnResult<()> {
//!     let config = ConfigurationDraft {
//!         project_name: Some("my-api".into()),
//!         ..Default::default()
//!     }
//!     .resolve()?;
//!
//!     let service = ScaffoldService::new(filesystem, runner);
//!     let report = service.scaffold(&config, &ScaffoldOptions::default())?;
//!     println!("{} files written", report.files_written.len());
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod domain;
pub mod error;

pub mod prelude {
    pub use crate::application::{
        InstallOutcome, ScaffoldOptions, ScaffoldReport, ScaffoldService, ScaffoldStage,
        ports::{Filesystem, ProcessRunner},
    };
    pub use crate::domain::{
        Configuration, ConfigurationDraft, InstallCommand, ScaffoldPlan, generators,
    };
    pub use crate::error::{ChurnError, ChurnResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
