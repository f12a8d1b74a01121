//! One flag per configuration value.
//!
//! Flags of the same axis override each other, so the last one given wins
//! (`--npm --pnpm` selects pnpm). Every flag left out stays `None` in the
//! draft and is filled by the resolution pipeline.

use clap::Args;

use churn_core::domain::{
    AuthStrategy, CiProvider, ConfigurationDraft, ContractType, Database, EvmFramework, Language,
    Orm, PackageManager, Protocol, ProxyPattern, TestingFramework, TokenStandard,
};

#[derive(Debug, Default, Args)]
pub struct ConfigFlags {
    // ── language ──────────────────────────────────────────────────────────
    #[arg(long, visible_alias = "typescript", overrides_with_all = ["js", "solidity"], help_heading = "Language", help = "TypeScript backend (default)")]
    pub ts: bool,
    #[arg(long, visible_alias = "javascript", overrides_with_all = ["ts", "solidity"], help_heading = "Language", help = "JavaScript backend")]
    pub js: bool,
    #[arg(long, visible_alias = "sol", overrides_with_all = ["ts", "js"], help_heading = "Language", help = "Solidity smart contracts")]
    pub solidity: bool,

    // ── package manager ───────────────────────────────────────────────────
    #[arg(long, overrides_with_all = ["npm", "yarn", "pnpm"], help_heading = "Package manager", help = "Bun (default)")]
    pub bun: bool,
    #[arg(long, overrides_with_all = ["bun", "yarn", "pnpm"], help_heading = "Package manager")]
    pub npm: bool,
    #[arg(long, overrides_with_all = ["bun", "npm", "pnpm"], help_heading = "Package manager")]
    pub yarn: bool,
    #[arg(long, overrides_with_all = ["bun", "npm", "yarn"], help_heading = "Package manager")]
    pub pnpm: bool,

    // ── protocol ──────────────────────────────────────────────────────────
    #[arg(long, overrides_with = "ws", help_heading = "Server", help = "Express HTTP server (default)")]
    pub http: bool,
    #[arg(long, visible_alias = "websocket", overrides_with = "http", help_heading = "Server", help = "WebSocket echo server")]
    pub ws: bool,
    #[arg(long, overrides_with = "no_cors", help_heading = "Server", help = "Enable CORS (HTTP only, default)")]
    pub cors: bool,
    #[arg(long, overrides_with = "cors", help_heading = "Server")]
    pub no_cors: bool,

    // ── orm ───────────────────────────────────────────────────────────────
    #[arg(long, overrides_with_all = ["drizzle", "typeorm", "sequelize", "mongoose", "no_orm"], help_heading = "Database", help = "Prisma (default)")]
    pub prisma: bool,
    #[arg(long, overrides_with_all = ["prisma", "typeorm", "sequelize", "mongoose", "no_orm"], help_heading = "Database")]
    pub drizzle: bool,
    #[arg(long, overrides_with_all = ["prisma", "drizzle", "sequelize", "mongoose", "no_orm"], help_heading = "Database")]
    pub typeorm: bool,
    #[arg(long, overrides_with_all = ["prisma", "drizzle", "typeorm", "mongoose", "no_orm"], help_heading = "Database")]
    pub sequelize: bool,
    #[arg(long, overrides_with_all = ["prisma", "drizzle", "typeorm", "sequelize", "no_orm"], help_heading = "Database", help = "Mongoose (implies MongoDB)")]
    pub mongoose: bool,
    #[arg(long, overrides_with_all = ["prisma", "drizzle", "typeorm", "sequelize", "mongoose"], help_heading = "Database", help = "No ORM and no database")]
    pub no_orm: bool,

    // ── database ──────────────────────────────────────────────────────────
    #[arg(long, visible_alias = "postgres", overrides_with_all = ["mysql", "sqlite", "mongodb"], help_heading = "Database", help = "PostgreSQL (default)")]
    pub postgresql: bool,
    #[arg(long, overrides_with_all = ["postgresql", "sqlite", "mongodb"], help_heading = "Database")]
    pub mysql: bool,
    #[arg(long, overrides_with_all = ["postgresql", "mysql", "mongodb"], help_heading = "Database")]
    pub sqlite: bool,
    #[arg(long, overrides_with_all = ["postgresql", "mysql", "sqlite"], help_heading = "Database")]
    pub mongodb: bool,

    // ── typescript ────────────────────────────────────────────────────────
    #[arg(long, overrides_with = "no_aliases", help_heading = "Features", help = "`@/*` path aliases (TypeScript, default)")]
    pub aliases: bool,
    #[arg(long, overrides_with = "aliases", help_heading = "Features")]
    pub no_aliases: bool,

    // ── auth ──────────────────────────────────────────────────────────────
    #[arg(long, overrides_with_all = ["oauth", "session", "no_auth"], help_heading = "Features", help = "JWT issuance and verification")]
    pub jwt: bool,
    #[arg(long, overrides_with_all = ["jwt", "session", "no_auth"], help_heading = "Features", help = "OAuth provider stub")]
    pub oauth: bool,
    #[arg(long, overrides_with_all = ["jwt", "oauth", "no_auth"], help_heading = "Features", help = "Cookie sessions")]
    pub session: bool,
    #[arg(long, overrides_with_all = ["jwt", "oauth", "session"], help_heading = "Features", help = "No auth module (default)")]
    pub no_auth: bool,

    // ── testing ───────────────────────────────────────────────────────────
    #[arg(long, overrides_with_all = ["vitest", "no_testing"], help_heading = "Features")]
    pub jest: bool,
    #[arg(long, overrides_with_all = ["jest", "no_testing"], help_heading = "Features")]
    pub vitest: bool,
    #[arg(long, overrides_with_all = ["jest", "vitest"], help_heading = "Features", help = "No test runner (default)")]
    pub no_testing: bool,

    // ── tooling ───────────────────────────────────────────────────────────
    #[arg(long, overrides_with = "no_linting", help_heading = "Features", help = "ESLint, Prettier and lint-staged (default)")]
    pub linting: bool,
    #[arg(long, overrides_with = "linting", help_heading = "Features")]
    pub no_linting: bool,
    #[arg(long, overrides_with = "no_docker", help_heading = "Features", help = "Dockerfile and docker-compose")]
    pub docker: bool,
    #[arg(long, overrides_with = "docker", help_heading = "Features", help = "No container files (default)")]
    pub no_docker: bool,

    // ── ci ────────────────────────────────────────────────────────────────
    #[arg(long, overrides_with_all = ["gitlab", "circleci", "no_cicd"], help_heading = "CI/CD", help = "GitHub Actions")]
    pub github: bool,
    #[arg(long, overrides_with_all = ["github", "circleci", "no_cicd"], help_heading = "CI/CD", help = "GitLab CI")]
    pub gitlab: bool,
    #[arg(long, overrides_with_all = ["github", "gitlab", "no_cicd"], help_heading = "CI/CD", help = "CircleCI")]
    pub circleci: bool,
    #[arg(long, overrides_with_all = ["github", "gitlab", "circleci"], help_heading = "CI/CD", help = "No pipeline (default)")]
    pub no_cicd: bool,

    // ── solidity ──────────────────────────────────────────────────────────
    #[arg(long, overrides_with_all = ["foundry", "no_framework"], help_heading = "Solidity", help = "Hardhat (default)")]
    pub hardhat: bool,
    #[arg(long, overrides_with_all = ["hardhat", "no_framework"], help_heading = "Solidity")]
    pub foundry: bool,
    #[arg(long, overrides_with_all = ["hardhat", "foundry"], help_heading = "Solidity", help = "Plain solc-js compile script")]
    pub no_framework: bool,

    #[arg(long, overrides_with_all = ["nft", "both_contracts", "no_contracts"], help_heading = "Solidity", help = "Fungible token (default)")]
    pub token: bool,
    #[arg(long, overrides_with_all = ["token", "both_contracts", "no_contracts"], help_heading = "Solidity")]
    pub nft: bool,
    #[arg(long, overrides_with_all = ["token", "nft", "no_contracts"], help_heading = "Solidity", help = "Token and NFT contracts")]
    pub both_contracts: bool,
    #[arg(long, overrides_with_all = ["token", "nft", "both_contracts"], help_heading = "Solidity", help = "Project skeleton without contracts")]
    pub no_contracts: bool,

    #[arg(long, overrides_with_all = ["erc721", "erc1155"], help_heading = "Solidity")]
    pub erc20: bool,
    #[arg(long, overrides_with_all = ["erc20", "erc1155"], help_heading = "Solidity")]
    pub erc721: bool,
    #[arg(long, overrides_with_all = ["erc20", "erc721"], help_heading = "Solidity")]
    pub erc1155: bool,

    #[arg(long, overrides_with_all = ["transparent", "no_proxy"], help_heading = "Solidity", help = "UUPS upgradeable proxy")]
    pub uups: bool,
    #[arg(long, overrides_with_all = ["uups", "no_proxy"], help_heading = "Solidity", help = "Transparent upgradeable proxy")]
    pub transparent: bool,
    #[arg(long, overrides_with_all = ["uups", "transparent"], help_heading = "Solidity", help = "Plain contracts (default)")]
    pub no_proxy: bool,
}

/// The single selected value of an axis, if any.
fn pick<T: Copy>(choices: &[(bool, T)]) -> Option<T> {
    choices.iter().rev().find(|(set, _)| *set).map(|(_, v)| *v)
}

fn toggle(on: bool, off: bool) -> Option<bool> {
    pick(&[(on, true), (off, false)])
}

impl ConfigFlags {
    /// `true` when no configuration flag was given.
    pub fn is_empty(&self) -> bool {
        self.to_draft(None).is_empty()
    }

    pub fn to_draft(&self, project_name: Option<String>) -> ConfigurationDraft {
        ConfigurationDraft {
            project_name,
            language: pick(&[
                (self.ts, Language::Ts),
                (self.js, Language::Js),
                (self.solidity, Language::Solidity),
            ]),
            package_manager: pick(&[
                (self.bun, PackageManager::Bun),
                (self.npm, PackageManager::Npm),
                (self.yarn, PackageManager::Yarn),
                (self.pnpm, PackageManager::Pnpm),
            ]),
            protocol: pick(&[(self.http, Protocol::Http), (self.ws, Protocol::Ws)]),
            cors: toggle(self.cors, self.no_cors),
            orm: pick(&[
                (self.prisma, Orm::Prisma),
                (self.drizzle, Orm::Drizzle),
                (self.typeorm, Orm::Typeorm),
                (self.sequelize, Orm::Sequelize),
                (self.mongoose, Orm::Mongoose),
                (self.no_orm, Orm::None),
            ]),
            database: pick(&[
                (self.postgresql, Database::Postgresql),
                (self.mysql, Database::Mysql),
                (self.sqlite, Database::Sqlite),
                (self.mongodb, Database::Mongodb),
            ]),
            aliases: toggle(self.aliases, self.no_aliases),
            auth: pick(&[
                (self.jwt, AuthStrategy::Jwt),
                (self.oauth, AuthStrategy::Oauth),
                (self.session, AuthStrategy::Session),
                (self.no_auth, AuthStrategy::None),
            ]),
            testing: pick(&[
                (self.jest, TestingFramework::Jest),
                (self.vitest, TestingFramework::Vitest),
                (self.no_testing, TestingFramework::None),
            ]),
            linting: toggle(self.linting, self.no_linting),
            docker: toggle(self.docker, self.no_docker),
            cicd: pick(&[
                (self.github, CiProvider::Github),
                (self.gitlab, CiProvider::Gitlab),
                (self.circleci, CiProvider::Circleci),
                (self.no_cicd, CiProvider::None),
            ]),
            evm_framework: pick(&[
                (self.hardhat, EvmFramework::Hardhat),
                (self.foundry, EvmFramework::Foundry),
                (self.no_framework, EvmFramework::None),
            ]),
            contract_type: pick(&[
                (self.token, ContractType::Token),
                (self.nft, ContractType::Nft),
                (self.both_contracts, ContractType::Both),
                (self.no_contracts, ContractType::None),
            ]),
            token_standard: pick(&[
                (self.erc20, TokenStandard::Erc20),
                (self.erc721, TokenStandard::Erc721),
                (self.erc1155, TokenStandard::Erc1155),
            ]),
            proxy: pick(&[
                (self.uups, ProxyPattern::Uups),
                (self.transparent, ProxyPattern::Transparent),
                (self.no_proxy, ProxyPattern::None),
            ]),
        }
    }
}
