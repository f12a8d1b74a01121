//! Ordered, named default-filling pipeline.
//!
//! Each stage may read axes filled by earlier stages, so the order in
//! [`RESOLUTION_STAGES`] is part of the contract: `cors` needs `protocol`,
//! `database` needs `orm`, the compatibility check needs both.

use tracing::trace;

use crate::domain::configuration::{Configuration, ConfigurationDraft, SolidityOptions};
use crate::domain::error::DomainError;
use crate::domain::naming::validate_project_name;
use crate::domain::value_objects::{
    AuthStrategy, CiProvider, ContractType, Database, EvmFramework, Language, Orm,
    PackageManager, Protocol, ProxyPattern, TestingFramework, TokenStandard,
};

pub const DEFAULT_PROJECT_NAME: &str = "my-churn-app";

type StageFn = fn(&mut ConfigurationDraft) -> Result<(), DomainError>;

/// One step of the pipeline.
#[derive(Clone, Copy)]
pub struct ResolutionStage {
    pub name: &'static str,
    apply: StageFn,
}

impl ResolutionStage {
    pub fn apply(&self, draft: &mut ConfigurationDraft) -> Result<(), DomainError> {
        (self.apply)(draft)
    }
}

impl std::fmt::Debug for ResolutionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionStage")
            .field("name", &self.name)
            .finish()
    }
}

pub static RESOLUTION_STAGES: &[ResolutionStage] = &[
    ResolutionStage { name: "project-name", apply: project_name },
    ResolutionStage { name: "language", apply: language },
    ResolutionStage { name: "package-manager", apply: package_manager },
    ResolutionStage { name: "protocol", apply: protocol },
    ResolutionStage { name: "cors", apply: cors },
    ResolutionStage { name: "orm", apply: orm },
    ResolutionStage { name: "database", apply: database },
    ResolutionStage { name: "orm-database-compatibility", apply: orm_database_compatibility },
    ResolutionStage { name: "aliases", apply: aliases },
    ResolutionStage { name: "optional-concerns", apply: optional_concerns },
    ResolutionStage { name: "solidity", apply: solidity },
];

/// Run every stage in order, then freeze the draft.
pub fn resolve(mut draft: ConfigurationDraft) -> Result<Configuration, DomainError> {
    for stage in RESOLUTION_STAGES {
        trace!(stage = stage.name, "resolving");
        stage.apply(&mut draft)?;
    }
    freeze(draft)
}

fn project_name(d: &mut ConfigurationDraft) -> Result<(), DomainError> {
    let name = d
        .project_name
        .get_or_insert_with(|| DEFAULT_PROJECT_NAME.to_string());
    validate_project_name(name)
}

fn language(d: &mut ConfigurationDraft) -> Result<(), DomainError> {
    d.language.get_or_insert(Language::Ts);
    Ok(())
}

fn package_manager(d: &mut ConfigurationDraft) -> Result<(), DomainError> {
    d.package_manager.get_or_insert(PackageManager::Bun);
    Ok(())
}

fn protocol(d: &mut ConfigurationDraft) -> Result<(), DomainError> {
    d.protocol.get_or_insert(Protocol::Http);
    Ok(())
}

fn cors(d: &mut ConfigurationDraft) -> Result<(), DomainError> {
    let http = d.protocol == Some(Protocol::Http);
    d.cors = Some(http && d.cors.unwrap_or(true));
    Ok(())
}

fn orm(d: &mut ConfigurationDraft) -> Result<(), DomainError> {
    d.orm.get_or_insert(Orm::Prisma);
    Ok(())
}

fn database(d: &mut ConfigurationDraft) -> Result<(), DomainError> {
    d.database = match d.orm {
        Some(Orm::None) | None => None,
        Some(Orm::Mongoose) => Some(Database::Mongodb),
        Some(_) => Some(d.database.unwrap_or(Database::Postgresql)),
    };
    Ok(())
}

fn orm_database_compatibility(d: &mut ConfigurationDraft) -> Result<(), DomainError> {
    if d.language == Some(Language::Solidity) {
        return Ok(());
    }
    match (d.orm, d.database) {
        (Some(orm), Some(db)) if !orm.supports(db) => Err(DomainError::UnsupportedCombination {
            orm: orm.to_string(),
            database: db.to_string(),
        }),
        _ => Ok(()),
    }
}

fn aliases(d: &mut ConfigurationDraft) -> Result<(), DomainError> {
    d.aliases.get_or_insert(true);
    Ok(())
}

fn optional_concerns(d: &mut ConfigurationDraft) -> Result<(), DomainError> {
    d.auth.get_or_insert(AuthStrategy::None);
    d.testing.get_or_insert(TestingFramework::None);
    d.linting.get_or_insert(true);
    d.docker.get_or_insert(false);
    d.cicd.get_or_insert(CiProvider::None);
    Ok(())
}

fn solidity(d: &mut ConfigurationDraft) -> Result<(), DomainError> {
    if d.language != Some(Language::Solidity) {
        d.evm_framework = None;
        d.contract_type = None;
        d.token_standard = None;
        d.proxy = None;
        return Ok(());
    }

    d.evm_framework.get_or_insert(EvmFramework::Hardhat);
    let contract_type = *d.contract_type.get_or_insert(ContractType::Token);
    d.token_standard = Some(match (contract_type, d.token_standard) {
        (ContractType::Token, _) => TokenStandard::Erc20,
        (ContractType::Nft | ContractType::Both, Some(TokenStandard::Erc1155)) => {
            TokenStandard::Erc1155
        }
        (ContractType::Nft | ContractType::Both, _) => TokenStandard::Erc721,
        (ContractType::None, explicit) => explicit.unwrap_or(TokenStandard::Erc20),
    });
    d.proxy.get_or_insert(ProxyPattern::None);
    Ok(())
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, DomainError> {
    value.ok_or(DomainError::MissingRequiredField { field })
}

fn freeze(d: ConfigurationDraft) -> Result<Configuration, DomainError> {
    let language = required(d.language, "language")?;
    let solidity = if language == Language::Solidity {
        Some(SolidityOptions {
            evm_framework: required(d.evm_framework, "evmFramework")?,
            contract_type: required(d.contract_type, "contractType")?,
            token_standard: required(d.token_standard, "tokenStandard")?,
            proxy: required(d.proxy, "proxy")?,
        })
    } else {
        None
    };

    Ok(Configuration {
        project_name: required(d.project_name, "projectName")?,
        language,
        package_manager: required(d.package_manager, "packageManager")?,
        protocol: required(d.protocol, "protocol")?,
        cors: required(d.cors, "cors")?,
        orm: required(d.orm, "orm")?,
        database: d.database,
        aliases: required(d.aliases, "aliases")?,
        auth: required(d.auth, "auth")?,
        testing: required(d.testing, "testing")?,
        linting: required(d.linting, "linting")?,
        docker: required(d.docker, "docker")?,
        cicd: required(d.cicd, "cicd")?,
        solidity,
    })
}
