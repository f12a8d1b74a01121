//! The scaffold request.
//!
//! [`ConfigurationDraft`] is what flags or prompts produce: every axis
//! optional. [`ConfigurationDraft::resolve`] runs the ordered pipeline in
//! [`crate::domain::resolution`] and yields an immutable [`Configuration`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::resolution;
use crate::domain::value_objects::{
    AuthStrategy, CiProvider, ContractType, Database, EvmFramework, Language, Orm,
    PackageManager, Protocol, ProxyPattern, TestingFramework, TokenStandard,
};

/// Partial, unvalidated input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigurationDraft {
    pub project_name: Option<String>,
    pub language: Option<Language>,
    pub package_manager: Option<PackageManager>,
    pub protocol: Option<Protocol>,
    pub cors: Option<bool>,
    pub orm: Option<Orm>,
    pub database: Option<Database>,
    pub aliases: Option<bool>,
    pub auth: Option<AuthStrategy>,
    pub testing: Option<TestingFramework>,
    pub linting: Option<bool>,
    pub docker: Option<bool>,
    pub cicd: Option<CiProvider>,
    pub evm_framework: Option<EvmFramework>,
    pub contract_type: Option<ContractType>,
    pub token_standard: Option<TokenStandard>,
    pub proxy: Option<ProxyPattern>,
}

impl ConfigurationDraft {
    /// Fill defaults and check consistency. Performs no I/O.
    pub fn resolve(self) -> Result<Configuration, DomainError> {
        resolution::resolve(self)
    }

    /// `true` when no axis has been chosen yet.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Solidity-only axes, present iff `language = solidity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolidityOptions {
    pub(crate) evm_framework: EvmFramework,
    pub(crate) contract_type: ContractType,
    pub(crate) token_standard: TokenStandard,
    pub(crate) proxy: ProxyPattern,
}

impl SolidityOptions {
    pub fn evm_framework(&self) -> EvmFramework {
        self.evm_framework
    }

    pub fn contract_type(&self) -> ContractType {
        self.contract_type
    }

    pub fn token_standard(&self) -> TokenStandard {
        self.token_standard
    }

    pub fn proxy(&self) -> ProxyPattern {
        self.proxy
    }

    /// Standard used by the NFT contract when one is generated.
    pub fn nft_standard(&self) -> TokenStandard {
        match self.token_standard {
            TokenStandard::Erc1155 => TokenStandard::Erc1155,
            _ => TokenStandard::Erc721,
        }
    }
}

/// A fully resolved, internally consistent scaffold request.
///
/// Constructed only through [`ConfigurationDraft::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub(crate) project_name: String,
    pub(crate) language: Language,
    pub(crate) package_manager: PackageManager,
    pub(crate) protocol: Protocol,
    pub(crate) cors: bool,
    pub(crate) orm: Orm,
    pub(crate) database: Option<Database>,
    pub(crate) aliases: bool,
    pub(crate) auth: AuthStrategy,
    pub(crate) testing: TestingFramework,
    pub(crate) linting: bool,
    pub(crate) docker: bool,
    pub(crate) cicd: CiProvider,
    pub(crate) solidity: Option<SolidityOptions>,
}

impl Configuration {
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn package_manager(&self) -> PackageManager {
        self.package_manager
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn cors(&self) -> bool {
        self.cors
    }

    pub fn orm(&self) -> Orm {
        self.orm
    }

    pub fn database(&self) -> Option<Database> {
        self.database
    }

    /// The raw aliases choice. See [`Self::uses_path_aliases`].
    pub fn aliases(&self) -> bool {
        self.aliases
    }

    /// Path aliases only take effect for TypeScript.
    pub fn uses_path_aliases(&self) -> bool {
        self.aliases && self.is_typescript()
    }

    pub fn auth(&self) -> AuthStrategy {
        self.auth
    }

    pub fn testing(&self) -> TestingFramework {
        self.testing
    }

    pub fn linting(&self) -> bool {
        self.linting
    }

    pub fn docker(&self) -> bool {
        self.docker
    }

    pub fn cicd(&self) -> CiProvider {
        self.cicd
    }

    pub fn solidity(&self) -> Option<&SolidityOptions> {
        self.solidity.as_ref()
    }

    pub fn is_typescript(&self) -> bool {
        self.language == Language::Ts
    }

    /// Extension of generated backend sources (`ts` or `js`).
    pub fn ext(&self) -> &'static str {
        self.language.source_extension()
    }

    /// Backend entrypoint, relative to the project root.
    pub fn entry_path(&self) -> &'static str {
        if self.is_typescript() {
            "src/index.ts"
        } else {
            "index.js"
        }
    }

    /// Write root: `./<projectName>`.
    pub fn target_dir(&self) -> PathBuf {
        PathBuf::from(".").join(&self.project_name)
    }
}
