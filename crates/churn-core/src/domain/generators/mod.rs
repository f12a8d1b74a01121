//! Template generators.
//!
//! Every generator is a pure function of the [`Configuration`]. Optional
//! concerns are dispatched through static tables ([`ConcernDef`] rows), so
//! adding an ORM, auth strategy or CI provider means adding one row.
//!
//! [`plan`] assembles the generators' output into a [`ScaffoldPlan`].

pub mod ancillary;
pub mod auth;
pub mod cicd;
pub mod docker;
pub mod entrypoint;
pub mod env;
pub mod linting;
pub mod manifest;
pub mod orm;
pub mod solidity;
pub mod testing;
pub mod tsconfig;

use tracing::debug;

use crate::domain::configuration::Configuration;
use crate::domain::plan::{Bundle, PlanKind, ScaffoldPlan};
use crate::domain::render::RenderContext;
use crate::error::ChurnResult;

pub use manifest::{Contribution, PackageManifest};

/// A file produced by a concern, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// One row of a concern table.
pub struct ConcernDef<K: 'static> {
    pub key: K,
    /// Bundle name reported in plans and logs.
    pub bundle: &'static str,
    /// Directories created before any file of the bundle is written.
    pub directories: &'static [&'static str],
    pub files: fn(&Configuration, &RenderContext) -> Vec<GeneratedFile>,
    pub manifest: fn(&Configuration) -> Contribution,
}

impl<K> ConcernDef<K> {
    pub fn bundle(&self, config: &Configuration, ctx: &RenderContext) -> Bundle {
        let mut bundle = Bundle::new(self.bundle);
        for dir in self.directories {
            bundle.add_directory(*dir);
        }
        for file in (self.files)(config, ctx) {
            bundle.add_file(file.path, file.content);
        }
        bundle
    }
}

/// Looks up the row for `key`. Absent rows mean "concern inactive".
pub(crate) fn find<K: PartialEq + Copy>(
    table: &'static [ConcernDef<K>],
    key: K,
) -> Option<&'static ConcernDef<K>> {
    table.iter().find(|def| def.key == key)
}

/// No manifest contribution.
pub(crate) fn no_contribution(config: &Configuration) -> Contribution {
    Contribution::for_config(config)
}

/// Variables shared by every template.
pub fn context_for(config: &Configuration) -> RenderContext {
    let pm = config.package_manager();
    RenderContext::new()
        .with_variable("PROJECT_NAME", config.project_name())
        .with_variable("CONTRACT_NAME", solidity::contract_name(config.project_name()))
        .with_variable("EXT", config.ext())
        .with_variable("LANGUAGE_NAME", config.language().display_name())
        .with_variable("PM", pm.as_str())
        .with_variable("INSTALL_CMD", pm.install_command().to_string())
        .with_variable("DEV_CMD", pm.run_script("dev"))
        .with_variable("BUILD_CMD", pm.run_script("build"))
        .with_variable("START_CMD", pm.run_script("start"))
        .with_variable("TEST_CMD", pm.run_script("test"))
        .with_variable("EXEC", pm.exec_prefix())
}

/// Build the complete plan for a configuration.
///
/// Solidity configurations take the contract branch and never consult the
/// backend tables.
pub fn plan(config: &Configuration) -> ChurnResult<ScaffoldPlan> {
    let ctx = context_for(config);
    let plan = match config.solidity() {
        Some(options) => solidity::plan(config, options, &ctx)?,
        None => backend_plan(config, &ctx)?,
    };
    plan.validate()?;

    debug!(
        files = plan.file_count(),
        bundles = plan.bundles().len(),
        installs = plan.installs().len(),
        "Scaffold plan assembled"
    );
    Ok(plan)
}

fn backend_plan(config: &Configuration, ctx: &RenderContext) -> ChurnResult<ScaffoldPlan> {
    let mut core = Bundle::new("core");
    core.add_file("package.json", manifest::render_backend(config)?);
    if config.is_typescript() {
        core.add_directory("src");
        core.add_file(config.entry_path(), entrypoint::generate(config));
        core.add_file("tsconfig.json", tsconfig::generate(config)?);
        core.add_file("src/env.ts", env::validation_module(config));
    } else {
        core.add_file(config.entry_path(), entrypoint::generate(config));
    }
    core.add_file(".env.example", env::example(config));
    core.add_file(".gitignore", ancillary::gitignore(config));
    core.add_file("README.md", ancillary::readme(config, ctx));

    let mut plan = ScaffoldPlan::new(config.target_dir(), PlanKind::Backend, core);

    if let Some(def) = orm::def(config.orm()) {
        plan.push_bundle(def.concern.bundle(config, ctx));
    }
    if let Some(def) = find(auth::AUTH_STRATEGIES, config.auth()) {
        plan.push_bundle(def.bundle(config, ctx));
    }
    if let Some(def) = find(testing::TESTING_FRAMEWORKS, config.testing()) {
        plan.push_bundle(def.bundle(config, ctx));
    }
    if config.linting() {
        plan.push_bundle(linting::LINTING.bundle(config, ctx));
    }
    if config.docker() {
        plan.push_bundle(docker::DOCKER.bundle(config, ctx));
    }
    if let Some(def) = find(cicd::CI_PROVIDERS, config.cicd()) {
        plan.push_bundle(def.bundle(config, ctx));
    }

    plan.push_install(config.package_manager().install_command());
    Ok(plan)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::configuration::{Configuration, ConfigurationDraft};

    /// Scenario A from the product brief.
    pub fn full_stack() -> ConfigurationDraft {
        use crate::domain::value_objects::*;
        ConfigurationDraft {
            project_name: Some("full-app".into()),
            language: Some(Language::Ts),
            package_manager: Some(PackageManager::Bun),
            protocol: Some(Protocol::Http),
            cors: Some(true),
            orm: Some(Orm::Prisma),
            database: Some(Database::Postgresql),
            aliases: Some(true),
            auth: Some(AuthStrategy::Jwt),
            testing: Some(TestingFramework::Jest),
            linting: Some(true),
            docker: Some(true),
            cicd: Some(CiProvider::Github),
            ..Default::default()
        }
    }

    /// Scenario B: the minimal JavaScript backend.
    pub fn minimal_js() -> ConfigurationDraft {
        use crate::domain::value_objects::*;
        ConfigurationDraft {
            project_name: Some("mini".into()),
            language: Some(Language::Js),
            package_manager: Some(PackageManager::Npm),
            protocol: Some(Protocol::Http),
            cors: Some(false),
            orm: Some(Orm::None),
            auth: Some(AuthStrategy::None),
            testing: Some(TestingFramework::None),
            linting: Some(false),
            docker: Some(false),
            cicd: Some(CiProvider::None),
            ..Default::default()
        }
    }

    pub fn resolve(draft: ConfigurationDraft) -> Configuration {
        draft.resolve().expect("test configuration resolves")
    }

    /// A Solidity project named `my-token` with the given contract axes.
    pub fn solidity(draft: ConfigurationDraft) -> Configuration {
        resolve(ConfigurationDraft {
            project_name: Some("my-token".into()),
            language: Some(crate::domain::value_objects::Language::Solidity),
            ..draft
        })
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::domain::value_objects::*;
    use crate::domain::ConfigurationDraft;

    #[test]
    fn minimal_javascript_produces_exactly_the_core_files() {
        let plan = plan(&resolve(minimal_js())).unwrap();
        let mut paths: Vec<_> = plan
            .file_paths()
            .into_iter()
            .map(|p| p.display().to_string())
            .collect();
        paths.sort();
        assert_eq!(
            paths,
            vec![".env.example", ".gitignore", "README.md", "index.js", "package.json"]
        );
        assert!(plan.bundles().is_empty());
    }

    #[test]
    fn typescript_core_adds_compiler_files() {
        let config = resolve(ConfigurationDraft {
            orm: Some(Orm::None),
            linting: Some(false),
            ..Default::default()
        });
        let plan = plan(&config).unwrap();
        assert!(plan.file("tsconfig.json").is_some());
        assert!(plan.file("src/index.ts").is_some());
        assert!(plan.file("index.js").is_none());
    }

    #[test]
    fn bundles_follow_a_fixed_order() {
        let plan = plan(&resolve(full_stack())).unwrap();
        let names: Vec<_> = plan.bundles().iter().map(|b| b.name()).collect();
        assert_eq!(
            names,
            vec!["orm:prisma", "auth:jwt", "testing:jest", "linting", "docker", "cicd:github"]
        );
    }

    #[test]
    fn backend_installs_with_the_package_manager() {
        let plan = plan(&resolve(minimal_js())).unwrap();
        assert_eq!(plan.installs().len(), 1);
        assert_eq!(plan.installs()[0].to_string(), "npm install");
    }

    #[test]
    fn plans_are_deterministic() {
        let config = resolve(full_stack());
        assert_eq!(plan(&config).unwrap(), plan(&config).unwrap());
    }
}
