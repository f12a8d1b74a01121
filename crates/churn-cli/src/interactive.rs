//! Interactive question flow.
//!
//! Questions follow the resolution order and skip anything the earlier
//! answers make irrelevant. The flow only talks to a [`Prompter`], so it is
//! driven by dialoguer on a terminal and by a script in tests.

use churn_core::domain::{
    AuthStrategy, CiProvider, ConfigurationDraft, ContractType, Database, EvmFramework, Language,
    Orm, PackageManager, Protocol, ProxyPattern, TestingFramework, TokenStandard,
    validate_interactive_name,
};

use crate::error::{CliError, CliResult};

/// Source of answers.
pub trait Prompter {
    /// The project name. An empty answer cancels the run.
    fn project_name(&mut self) -> CliResult<String>;

    /// Index of the chosen item.
    fn select(&mut self, prompt: &str, items: &[&str], default: usize) -> CliResult<usize>;

    fn confirm(&mut self, prompt: &str, default: bool) -> CliResult<bool>;
}

fn choose<T: Copy + PartialEq>(
    prompter: &mut dyn Prompter,
    prompt: &str,
    options: &[(&str, T)],
    preferred: Option<T>,
) -> CliResult<T> {
    let labels: Vec<&str> = options.iter().map(|(label, _)| *label).collect();
    let default = preferred
        .and_then(|p| options.iter().position(|(_, v)| *v == p))
        .unwrap_or(0);
    let index = prompter.select(prompt, &labels, default)?;
    options
        .get(index)
        .map(|(_, v)| *v)
        .ok_or_else(|| CliError::Prompt {
            message: format!("no option {index} for '{prompt}'"),
        })
}

/// Ask for every open axis of `draft`.
///
/// Returns `None` when the user cancels with an empty project name.
pub fn collect(
    prompter: &mut dyn Prompter,
    mut draft: ConfigurationDraft,
) -> CliResult<Option<ConfigurationDraft>> {
    if draft.project_name.is_none() {
        let name = prompter.project_name()?;
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        validate_interactive_name(name).map_err(|e| CliError::InvalidInput {
            message: e.to_string(),
            source: Some(Box::new(e)),
        })?;
        draft.project_name = Some(name.to_string());
    }

    let language = choose(
        prompter,
        "Which language would you like to use?",
        &[
            ("TypeScript (recommended)", Language::Ts),
            ("JavaScript", Language::Js),
            ("Solidity (smart contracts)", Language::Solidity),
        ],
        draft.language,
    )?;
    draft.language = Some(language);

    if language == Language::Solidity {
        solidity_questions(prompter, &mut draft)?;
    } else {
        backend_questions(prompter, &mut draft, language)?;
    }

    Ok(Some(draft))
}

fn package_manager(prompter: &mut dyn Prompter, draft: &mut ConfigurationDraft) -> CliResult<()> {
    draft.package_manager = Some(choose(
        prompter,
        "Which package manager would you like to use?",
        &[
            ("Bun (recommended)", PackageManager::Bun),
            ("Yarn", PackageManager::Yarn),
            ("pnpm", PackageManager::Pnpm),
            ("npm", PackageManager::Npm),
        ],
        draft.package_manager,
    )?);
    Ok(())
}

fn backend_questions(
    prompter: &mut dyn Prompter,
    draft: &mut ConfigurationDraft,
    language: Language,
) -> CliResult<()> {
    package_manager(prompter, draft)?;

    let protocol = choose(
        prompter,
        "Which protocol would you like to use?",
        &[
            (Protocol::Http.display_name(), Protocol::Http),
            (Protocol::Ws.display_name(), Protocol::Ws),
        ],
        None,
    )?;
    draft.protocol = Some(protocol);
    if protocol == Protocol::Http {
        draft.cors = Some(prompter.confirm("Enable CORS?", true)?);
    }

    let orm = choose(
        prompter,
        "Which ORM would you like to use?",
        &[
            ("Prisma (recommended)", Orm::Prisma),
            ("Drizzle", Orm::Drizzle),
            ("TypeORM", Orm::Typeorm),
            ("Sequelize", Orm::Sequelize),
            ("Mongoose (MongoDB)", Orm::Mongoose),
            ("None (no database)", Orm::None),
        ],
        None,
    )?;
    draft.orm = Some(orm);

    if !matches!(orm, Orm::None | Orm::Mongoose) {
        let databases: Vec<(&str, Database)> = [
            ("PostgreSQL", Database::Postgresql),
            ("MySQL", Database::Mysql),
            ("SQLite", Database::Sqlite),
            ("MongoDB", Database::Mongodb),
        ]
        .into_iter()
        .filter(|(_, db)| orm.supports(*db))
        .collect();
        draft.database = Some(choose(
            prompter,
            "Which database would you like to use?",
            &databases,
            None,
        )?);
    }

    if language == Language::Ts {
        draft.aliases = Some(prompter.confirm("Would you like to use path aliases (@/*)?", true)?);
    }

    draft.auth = Some(choose(
        prompter,
        "Add authentication?",
        &[
            ("None", AuthStrategy::None),
            ("JWT", AuthStrategy::Jwt),
            ("OAuth", AuthStrategy::Oauth),
            ("Session", AuthStrategy::Session),
        ],
        None,
    )?);

    draft.testing = Some(choose(
        prompter,
        "Add a test runner?",
        &[
            ("None", TestingFramework::None),
            ("Jest", TestingFramework::Jest),
            ("Vitest", TestingFramework::Vitest),
        ],
        None,
    )?);

    draft.linting = Some(prompter.confirm("Add ESLint and Prettier?", true)?);
    draft.docker = Some(prompter.confirm("Add Docker files?", false)?);

    draft.cicd = Some(choose(
        prompter,
        "Add a CI/CD pipeline?",
        &[
            ("None", CiProvider::None),
            ("GitHub Actions", CiProvider::Github),
            ("GitLab CI", CiProvider::Gitlab),
            ("CircleCI", CiProvider::Circleci),
        ],
        None,
    )?);

    Ok(())
}

fn solidity_questions(prompter: &mut dyn Prompter, draft: &mut ConfigurationDraft) -> CliResult<()> {
    let framework = choose(
        prompter,
        "Which development framework would you like to use?",
        &[
            ("Hardhat (recommended)", EvmFramework::Hardhat),
            ("Foundry", EvmFramework::Foundry),
            ("None (solc-js only)", EvmFramework::None),
        ],
        None,
    )?;
    draft.evm_framework = Some(framework);

    // Foundry fetches libraries with forge; no package manager involved.
    if framework != EvmFramework::Foundry {
        package_manager(prompter, draft)?;
    }

    let contract_type = choose(
        prompter,
        "Which contracts should be generated?",
        &[
            ("Token", ContractType::Token),
            ("NFT", ContractType::Nft),
            ("Token and NFT", ContractType::Both),
            ("None", ContractType::None),
        ],
        None,
    )?;
    draft.contract_type = Some(contract_type);

    match contract_type {
        ContractType::Token => draft.token_standard = Some(TokenStandard::Erc20),
        ContractType::Nft | ContractType::Both => {
            draft.token_standard = Some(choose(
                prompter,
                "Which NFT standard?",
                &[
                    ("ERC-721", TokenStandard::Erc721),
                    ("ERC-1155", TokenStandard::Erc1155),
                ],
                None,
            )?);
        }
        ContractType::None => return Ok(()),
    }

    draft.proxy = Some(choose(
        prompter,
        "Make the contracts upgradeable?",
        &[
            ("No", ProxyPattern::None),
            ("UUPS proxy", ProxyPattern::Uups),
            ("Transparent proxy", ProxyPattern::Transparent),
        ],
        None,
    )?);

    Ok(())
}

#[cfg(feature = "interactive")]
pub use terminal::DialoguerPrompter;

#[cfg(feature = "interactive")]
mod terminal {
    use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

    use super::Prompter;
    use crate::error::{CliError, CliResult};
    use churn_core::domain::validate_interactive_name;

    /// Prompts on the terminal with dialoguer's colourful theme.
    pub struct DialoguerPrompter {
        theme: ColorfulTheme,
    }

    impl DialoguerPrompter {
        pub fn new() -> Self {
            Self {
                theme: ColorfulTheme::default(),
            }
        }
    }

    fn prompt_error(e: dialoguer::Error) -> CliError {
        CliError::Prompt {
            message: e.to_string(),
        }
    }

    impl Prompter for DialoguerPrompter {
        fn project_name(&mut self) -> CliResult<String> {
            Input::<String>::with_theme(&self.theme)
                .with_prompt("What is your project name? (empty to cancel)")
                .allow_empty(true)
                .validate_with(|input: &String| -> Result<(), String> {
                    if input.trim().is_empty() {
                        return Ok(());
                    }
                    validate_interactive_name(input.trim()).map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_error)
        }

        fn select(&mut self, prompt: &str, items: &[&str], default: usize) -> CliResult<usize> {
            Select::with_theme(&self.theme)
                .with_prompt(prompt)
                .items(items)
                .default(default)
                .interact()
                .map_err(prompt_error)
        }

        fn confirm(&mut self, prompt: &str, default: bool) -> CliResult<bool> {
            Confirm::with_theme(&self.theme)
                .with_prompt(prompt)
                .default(default)
                .interact()
                .map_err(prompt_error)
        }
    }
}
