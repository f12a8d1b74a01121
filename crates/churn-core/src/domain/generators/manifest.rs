//! `package.json` generation.
//!
//! The manifest is an associative merge: each active concern contributes
//! dependencies and scripts, and an existing key is never overwritten.
//! Solidity projects use their own table and never touch the backend rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::configuration::{Configuration, SolidityOptions};
use crate::domain::generators::{auth, find, orm, testing};
use crate::domain::value_objects::{EvmFramework, PackageManager, Protocol};
use crate::error::{ChurnResult, Context};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub module_type: Option<String>,
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    pub author: String,
    pub license: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl PackageManifest {
    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies.contains_key(name)
    }

    pub fn has_dev_dependency(&self, name: &str) -> bool {
        self.dev_dependencies.contains_key(name)
    }

    pub fn mentions(&self, name: &str) -> bool {
        self.has_dependency(name) || self.has_dev_dependency(name)
    }
}

/// Dependencies and scripts one concern adds to the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contribution {
    typescript: bool,
    pub dependencies: Vec<(String, String)>,
    pub dev_dependencies: Vec<(String, String)>,
    pub scripts: Vec<(String, String)>,
}

impl Contribution {
    pub fn for_config(config: &Configuration) -> Self {
        Self {
            typescript: config.is_typescript(),
            ..Self::default()
        }
    }

    pub fn dep(mut self, name: &str, version: &str) -> Self {
        self.dependencies.push((name.into(), version.into()));
        self
    }

    pub fn dev(mut self, name: &str, version: &str) -> Self {
        self.dev_dependencies.push((name.into(), version.into()));
        self
    }

    /// Dev dependency added only for TypeScript projects (typings, loaders).
    pub fn ts_dev(self, name: &str, version: &str) -> Self {
        if self.typescript {
            self.dev(name, version)
        } else {
            self
        }
    }

    pub fn script(mut self, name: &str, command: impl Into<String>) -> Self {
        self.scripts.push((name.into(), command.into()));
        self
    }

    /// Merge into `manifest` without overwriting keys already present.
    pub fn apply(self, manifest: &mut PackageManifest) {
        for (name, version) in self.dependencies {
            manifest.dependencies.entry(name).or_insert(version);
        }
        for (name, version) in self.dev_dependencies {
            manifest.dev_dependencies.entry(name).or_insert(version);
        }
        for (name, command) in self.scripts {
            manifest.scripts.entry(name).or_insert(command);
        }
    }
}

/// Build the manifest for any configuration.
///
/// Returns `None` for Foundry, which has no JavaScript manifest.
pub fn build(config: &Configuration) -> Option<PackageManifest> {
    if let Some(options) = config.solidity() {
        return solidity_manifest(config, options);
    }
    Some(backend_manifest(config))
}

/// Serialized backend manifest.
pub fn render_backend(config: &Configuration) -> ChurnResult<String> {
    serialize(&backend_manifest(config))
}

pub fn serialize(manifest: &PackageManifest) -> ChurnResult<String> {
    let mut json =
        serde_json::to_string_pretty(manifest).context("serializing package.json")?;
    json.push('\n');
    Ok(json)
}

fn backend_manifest(config: &Configuration) -> PackageManifest {
    let mut manifest = PackageManifest {
        name: config.project_name().to_string(),
        version: "1.0.0".into(),
        description: format!(
            "A Churn backend project built with {}",
            config.language().display_name()
        ),
        main: Some(if config.is_typescript() {
            "dist/index.js".into()
        } else {
            "index.js".into()
        }),
        module_type: Some("module".into()),
        keywords: vec![
            "churn".into(),
            "backend".into(),
            "api".into(),
            config.protocol().to_string(),
        ],
        author: "Your Name".into(),
        license: "MIT".into(),
        ..PackageManifest::default()
    };

    let contributions = [
        language_contribution(config),
        protocol_contribution(config),
        orm::def(config.orm()).map_or_else(Contribution::default, |d| (d.concern.manifest)(config)),
        find(auth::AUTH_STRATEGIES, config.auth())
            .map_or_else(Contribution::default, |d| (d.manifest)(config)),
        find(testing::TESTING_FRAMEWORKS, config.testing())
            .map_or_else(Contribution::default, |d| (d.manifest)(config)),
        if config.linting() {
            (super::linting::LINTING.manifest)(config)
        } else {
            Contribution::default()
        },
        aliases_contribution(config),
    ];
    for contribution in contributions {
        contribution.apply(&mut manifest);
    }

    // Base scripts go last so an alias-aware build from a concern wins.
    base_scripts(config).apply(&mut manifest);
    manifest
}

fn language_contribution(config: &Configuration) -> Contribution {
    let c = Contribution::for_config(config);
    if !config.is_typescript() {
        return c;
    }
    let c = c.dev("typescript", "^5.3.0").dep("zod", "^3.22.0");
    match config.package_manager() {
        PackageManager::Bun => c.dev("bun-types", "latest"),
        _ => c.dev("tsx", "^4.7.0").dev("@types/node", "^20.10.0"),
    }
}

fn protocol_contribution(config: &Configuration) -> Contribution {
    let c = Contribution::for_config(config);
    match config.protocol() {
        Protocol::Http => {
            let c = c
                .dep("express", "^4.18.2")
                .ts_dev("@types/express", "^4.17.21");
            if config.cors() {
                c.dep("cors", "^2.8.5").ts_dev("@types/cors", "^2.8.17")
            } else {
                c
            }
        }
        Protocol::Ws => c.dep("ws", "^8.16.0").ts_dev("@types/ws", "^8.5.10"),
    }
}

fn aliases_contribution(config: &Configuration) -> Contribution {
    let c = Contribution::for_config(config);
    if !config.uses_path_aliases() || config.package_manager() == PackageManager::Bun {
        return c;
    }
    c.dev("tsc-alias", "^1.8.8")
        .script("build", "tsc && tsc-alias -p tsconfig.json")
}

fn base_scripts(config: &Configuration) -> Contribution {
    let pm = config.package_manager();
    let c = Contribution::for_config(config);

    let (dev, build, start) = match (config.is_typescript(), pm) {
        (true, PackageManager::Bun) => (
            "bun run --watch src/index.ts".to_string(),
            "bun build src/index.ts --outdir ./dist --target node".to_string(),
            "bun run src/index.ts".to_string(),
        ),
        (true, PackageManager::Npm) => (
            "tsx watch src/index.ts".to_string(),
            "tsc".to_string(),
            "node dist/index.js".to_string(),
        ),
        (true, pm) => (
            format!("{pm} tsx watch src/index.ts"),
            "tsc".to_string(),
            "node dist/index.js".to_string(),
        ),
        (false, PackageManager::Bun) => (
            "bun --watch index.js".to_string(),
            "echo \"No build needed for JavaScript\"".to_string(),
            "bun index.js".to_string(),
        ),
        (false, _) => (
            "node --watch index.js".to_string(),
            "echo \"No build needed for JavaScript\"".to_string(),
            "node index.js".to_string(),
        ),
    };

    let c = c.script("dev", dev).script("build", build).script("start", start);
    if config.is_typescript() {
        c.script("typecheck", "tsc --noEmit")
    } else {
        c
    }
    .script("test", "echo \"No tests configured\"")
}

fn solidity_manifest(config: &Configuration, options: &SolidityOptions) -> Option<PackageManifest> {
    let mut manifest = PackageManifest {
        name: config.project_name().to_string(),
        version: "1.0.0".into(),
        private: Some(true),
        author: "Your Name".into(),
        license: "MIT".into(),
        keywords: vec!["churn".into(), "solidity".into(), "smart-contracts".into()],
        ..PackageManifest::default()
    };

    let c = Contribution::default().dep("@openzeppelin/contracts", "^5.0.0");
    let c = if options.proxy().is_upgradeable() {
        c.dep("@openzeppelin/contracts-upgradeable", "^5.0.0")
    } else {
        c
    };

    let c = match options.evm_framework() {
        EvmFramework::Foundry => return None,
        EvmFramework::Hardhat => {
            manifest.description = "Smart contract project built with Hardhat".into();
            let c = c
                .dev("hardhat", "^2.19.0")
                .dev("@nomicfoundation/hardhat-toolbox", "^4.0.0")
                .dev("dotenv", "^16.3.1")
                .script("compile", "hardhat compile")
                .script("test", "hardhat test")
                .script("test:coverage", "hardhat coverage")
                .script("node", "hardhat node")
                .script("deploy", "hardhat run scripts/deploy.js --network localhost")
                .script("deploy:sepolia", "hardhat run scripts/deploy.js --network sepolia")
                .script("clean", "hardhat clean");
            if options.proxy().is_upgradeable() {
                c.dev("@openzeppelin/hardhat-upgrades", "^3.0.0")
            } else {
                c
            }
        }
        EvmFramework::None => {
            manifest.description = "Smart contract project compiled with solc-js".into();
            c.dev("solc", "0.8.24")
                .script("compile", "node scripts/compile.js")
                .script("clean", "node -e \"require('fs').rmSync('build', { recursive: true, force: true })\"")
        }
    };
    c.apply(&mut manifest);
    Some(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigurationDraft;
    use crate::domain::generators::test_support::*;
    use crate::domain::value_objects::*;

    fn manifest(draft: ConfigurationDraft) -> PackageManifest {
        build(&resolve(draft)).unwrap()
    }

    #[test]
    fn full_stack_manifest_merges_every_concern() {
        let m = manifest(full_stack());
        for dep in ["express", "cors", "@prisma/client", "jsonwebtoken"] {
            assert!(m.has_dependency(dep), "missing dependency {dep}");
        }
        for dev in ["prisma", "jest", "eslint", "typescript", "bun-types"] {
            assert!(m.has_dev_dependency(dev), "missing devDependency {dev}");
        }
        assert_eq!(m.scripts["db:generate"], "prisma generate");
        assert!(m.scripts["test"].contains("jest"));
    }

    #[test]
    fn no_cors_means_no_cors_anywhere() {
        let m = manifest(ConfigurationDraft {
            cors: Some(false),
            ..full_stack()
        });
        assert!(!m.mentions("cors"));
        assert!(!m.mentions("@types/cors"));
    }

    #[test]
    fn websocket_drops_express_and_cors() {
        let m = manifest(ConfigurationDraft {
            protocol: Some(Protocol::Ws),
            ..full_stack()
        });
        assert!(m.has_dependency("ws"));
        assert!(!m.mentions("express"));
        assert!(!m.mentions("cors"));
    }

    #[test]
    fn javascript_skips_typings() {
        let m = manifest(ConfigurationDraft {
            language: Some(Language::Js),
            ..full_stack()
        });
        assert!(!m.mentions("typescript"));
        assert!(!m.mentions("@types/express"));
        assert_eq!(m.main.as_deref(), Some("index.js"));
        assert_eq!(m.scripts["build"], "echo \"No build needed for JavaScript\"");
    }

    #[test]
    fn scripts_follow_the_package_manager() {
        let m = manifest(ConfigurationDraft {
            package_manager: Some(PackageManager::Pnpm),
            aliases: Some(false),
            ..full_stack()
        });
        assert_eq!(m.scripts["dev"], "pnpm tsx watch src/index.ts");
        assert_eq!(m.scripts["build"], "tsc");
        assert!(m.has_dev_dependency("tsx"));
    }

    #[test]
    fn aliases_switch_the_build_for_node_toolchains() {
        let m = manifest(ConfigurationDraft {
            package_manager: Some(PackageManager::Npm),
            ..full_stack()
        });
        assert_eq!(m.scripts["build"], "tsc && tsc-alias -p tsconfig.json");
        assert!(m.has_dev_dependency("tsc-alias"));
    }

    #[test]
    fn drizzle_adds_the_database_driver() {
        let m = manifest(ConfigurationDraft {
            orm: Some(Orm::Drizzle),
            database: Some(Database::Mysql),
            ..full_stack()
        });
        assert!(m.has_dependency("drizzle-orm"));
        assert!(m.has_dependency("mysql2"));
        assert!(!m.mentions("@prisma/client"));
    }

    #[test]
    fn hardhat_manifest_uses_the_contract_table() {
        let m = manifest(ConfigurationDraft {
            language: Some(Language::Solidity),
            proxy: Some(ProxyPattern::Uups),
            ..full_stack()
        });
        assert!(m.has_dev_dependency("hardhat"));
        assert!(m.has_dev_dependency("@openzeppelin/hardhat-upgrades"));
        assert!(m.has_dependency("@openzeppelin/contracts-upgradeable"));
        assert!(!m.mentions("express"));
        assert!(!m.mentions("jest"));
    }

    #[test]
    fn foundry_has_no_manifest() {
        let config = resolve(ConfigurationDraft {
            language: Some(Language::Solidity),
            evm_framework: Some(EvmFramework::Foundry),
            ..Default::default()
        });
        assert!(build(&config).is_none());
    }

    #[test]
    fn serialized_manifest_is_pretty_json() {
        let json = render_backend(&resolve(minimal_js())).unwrap();
        assert!(json.starts_with("{\n  \"name\": \"mini\""));
        assert!(json.contains("\"type\": \"module\""));
        assert!(json.ends_with("}\n"));
    }
}
