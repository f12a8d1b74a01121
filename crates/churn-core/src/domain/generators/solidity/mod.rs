//! Smart-contract projects.
//!
//! A Solidity configuration never touches the backend tables. The EVM
//! framework picks the layout (Hardhat, Foundry or plain solc-js) and the
//! contract type picks which OpenZeppelin-based contracts are emitted.

pub mod contracts;
pub mod foundry;
pub mod hardhat;
pub mod vanilla;

use crate::domain::configuration::{Configuration, SolidityOptions};
use crate::domain::naming::to_pascal_case;
use crate::domain::plan::ScaffoldPlan;
use crate::domain::render::RenderContext;
use crate::domain::value_objects::{ContractType, EvmFramework, ProxyPattern, TokenStandard};
use crate::error::ChurnResult;

pub const TOKEN_SYMBOL: &str = "MTK";
pub const NFT_SYMBOL: &str = "MNFT";
/// Whole tokens minted to the deployer.
pub const INITIAL_SUPPLY: u64 = 1_000_000;
pub const METADATA_URI: &str = "https://api.example.com/metadata/{id}.json";

/// Solidity identifier derived from the project name.
///
/// Names that do not start with a letter get a `Contract` prefix.
pub fn contract_name(project_name: &str) -> String {
    let name = to_pascal_case(project_name);
    match name.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => name,
        Some(_) => format!("Contract{name}"),
        None => "MyContract".to_string(),
    }
}

/// One contract to generate, together with how it is deployed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSpec {
    pub name: String,
    pub standard: TokenStandard,
    pub proxy: ProxyPattern,
}

impl ContractSpec {
    pub fn file_name(&self) -> String {
        format!("{}.sol", self.name)
    }

    /// On-chain `name()` for ERC20 and ERC721 contracts.
    pub fn display_name(&self) -> String {
        match self.standard {
            TokenStandard::Erc20 => format!("{} Token", self.name),
            _ => self.name.clone(),
        }
    }

    /// Local variable used for the deployed instance in scripts and tests.
    pub fn var(&self) -> &'static str {
        match self.standard {
            TokenStandard::Erc20 => "token",
            _ => "nft",
        }
    }

    /// Constructor or initializer arguments as Solidity expressions.
    pub fn sol_args(&self) -> String {
        match self.standard {
            TokenStandard::Erc20 => format!(
                "\"{}\", \"{TOKEN_SYMBOL}\", {INITIAL_SUPPLY} * 10 ** 18",
                self.display_name()
            ),
            TokenStandard::Erc721 => format!("\"{}\", \"{NFT_SYMBOL}\"", self.display_name()),
            TokenStandard::Erc1155 => format!("\"{METADATA_URI}\""),
        }
    }

    /// The same arguments as JavaScript (ethers v6) expressions.
    pub fn js_args(&self) -> String {
        match self.standard {
            TokenStandard::Erc20 => format!(
                "\"{}\", \"{TOKEN_SYMBOL}\", ethers.parseEther(\"{INITIAL_SUPPLY}\")",
                self.display_name()
            ),
            _ => self.sol_args(),
        }
    }

    pub fn init_signature(&self) -> &'static str {
        match self.standard {
            TokenStandard::Erc20 => "initialize(string,string,uint256)",
            TokenStandard::Erc721 => "initialize(string,string)",
            TokenStandard::Erc1155 => "initialize(string)",
        }
    }
}

/// Contracts for the configured contract type, token first.
pub fn contract_specs(config: &Configuration, options: &SolidityOptions) -> Vec<ContractSpec> {
    let base = contract_name(config.project_name());
    let proxy = options.proxy();
    let token = || ContractSpec {
        name: base.clone(),
        standard: TokenStandard::Erc20,
        proxy,
    };
    let nft = |name: String| ContractSpec {
        name,
        standard: options.nft_standard(),
        proxy,
    };
    match options.contract_type() {
        ContractType::Token => vec![token()],
        ContractType::Nft => vec![nft(base.clone())],
        ContractType::Both => vec![token(), nft(format!("{base}NFT"))],
        ContractType::None => Vec::new(),
    }
}

/// Build the contract project plan for the selected framework.
pub fn plan(
    config: &Configuration,
    options: &SolidityOptions,
    ctx: &RenderContext,
) -> ChurnResult<ScaffoldPlan> {
    let specs = contract_specs(config, options);
    match options.evm_framework() {
        EvmFramework::Hardhat => hardhat::plan(config, options, &specs, ctx),
        EvmFramework::Foundry => Ok(foundry::plan(config, options, &specs, ctx)),
        EvmFramework::None => vanilla::plan(config, options, &specs, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigurationDraft;
    use crate::domain::generators::test_support::solidity;

    #[test]
    fn contract_names_are_valid_identifiers() {
        assert_eq!(contract_name("my-token"), "MyToken");
        assert_eq!(contract_name("42-app"), "Contract42App");
        assert_eq!(contract_name("---"), "MyContract");
    }

    #[test]
    fn both_emits_token_then_nft() {
        let config = solidity(ConfigurationDraft {
            contract_type: Some(ContractType::Both),
            ..Default::default()
        });
        let specs = contract_specs(&config, config.solidity().unwrap());
        let names: Vec<_> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["MyToken", "MyTokenNFT"]);
        assert_eq!(specs[0].standard, TokenStandard::Erc20);
        assert_eq!(specs[1].standard, TokenStandard::Erc721);
    }

    #[test]
    fn none_emits_no_contracts() {
        let config = solidity(ConfigurationDraft {
            contract_type: Some(ContractType::None),
            ..Default::default()
        });
        assert!(contract_specs(&config, config.solidity().unwrap()).is_empty());
    }

    #[test]
    fn arguments_match_the_standard() {
        let contract = ContractSpec {
            name: "MyToken".into(),
            standard: TokenStandard::Erc20,
            proxy: ProxyPattern::None,
        };
        assert_eq!(contract.sol_args(), "\"MyToken Token\", \"MTK\", 1000000 * 10 ** 18");
        assert!(contract.js_args().contains("ethers.parseEther(\"1000000\")"));

        let nft = ContractSpec {
            standard: TokenStandard::Erc1155,
            ..contract
        };
        assert_eq!(nft.init_signature(), "initialize(string)");
        assert_eq!(nft.sol_args(), format!("\"{METADATA_URI}\""));
    }
}
