//! Core domain layer for Churn.
//!
//! Pure logic: no filesystem, no processes. Everything here maps a
//! [`Configuration`] to data; the application layer performs the I/O.
//!
//! - `value_objects`: one enum per configuration axis
//! - `configuration` / `resolution`: draft -> resolved configuration
//! - `generators`: configuration -> file contents, grouped into bundles
//! - `plan`: the [`ScaffoldPlan`] handed to the orchestrator

pub mod configuration;
pub mod error;
pub mod generators;
pub mod naming;
pub mod plan;
pub mod render;
pub mod resolution;
pub mod value_objects;

pub use configuration::{Configuration, ConfigurationDraft, SolidityOptions};
pub use error::{DomainError, ErrorCategory};
pub use naming::{to_pascal_case, validate_interactive_name, validate_project_name};
pub use plan::{Bundle, DirectoryToCreate, FileToWrite, FsEntry, InstallCommand, PlanKind, ScaffoldPlan};
pub use render::RenderContext;
pub use resolution::{DEFAULT_PROJECT_NAME, RESOLUTION_STAGES, ResolutionStage};
pub use value_objects::{
    AuthStrategy, CiProvider, ContractType, Database, EvmFramework, Language, Orm,
    PackageManager, Protocol, ProxyPattern, TestingFramework, TokenStandard,
};
