//! Hardhat layout: CommonJS config, ethers v6 deploy script and
//! chai tests, installed through the package manager.

use super::{ContractSpec, INITIAL_SUPPLY, NFT_SYMBOL, TOKEN_SYMBOL, contracts};
use crate::domain::configuration::{Configuration, SolidityOptions};
use crate::domain::generators::manifest;
use crate::domain::plan::{Bundle, PlanKind, ScaffoldPlan};
use crate::domain::render::RenderContext;
use crate::domain::value_objects::{ContractType, TokenStandard};
use crate::error::{ChurnError, ChurnResult};

pub fn plan(
    config: &Configuration,
    options: &SolidityOptions,
    specs: &[ContractSpec],
    ctx: &RenderContext,
) -> ChurnResult<ScaffoldPlan> {
    let manifest = manifest::build(config).ok_or_else(|| ChurnError::Internal {
        message: "hardhat project without a manifest".into(),
    })?;

    let mut core = Bundle::new("core")
        .with_file("package.json", manifest::serialize(&manifest)?)
        .with_file("hardhat.config.js", config_file(options))
        .with_directory("contracts")
        .with_directory("scripts")
        .with_directory("test");
    for contract in specs {
        core.add_file(format!("contracts/{}", contract.file_name()), contracts::source(contract));
        core.add_file(format!("test/{}.test.js", contract.name), test_file(contract));
    }
    core.add_file("scripts/deploy.js", deploy_script(options, specs));
    core.add_file(".env.example", ENV_EXAMPLE);
    core.add_file(".gitignore", GITIGNORE);
    core.add_file("README.md", readme(options, ctx));

    let mut plan = ScaffoldPlan::new(config.target_dir(), PlanKind::Contract, core);
    plan.push_install(config.package_manager().install_command());
    Ok(plan)
}

fn config_file(options: &SolidityOptions) -> String {
    let upgrades = if options.proxy().is_upgradeable() {
        "require(\"@openzeppelin/hardhat-upgrades\");\n"
    } else {
        ""
    };
    format!(
        r#"require("@nomicfoundation/hardhat-toolbox");
{upgrades}require("dotenv").config();

const accounts = process.env.PRIVATE_KEY ? [process.env.PRIVATE_KEY] : [];

/** @type import('hardhat/config').HardhatUserConfig */
module.exports = {{
  solidity: {{
    version: "0.8.24",
    settings: {{
      optimizer: {{
        enabled: true,
        runs: 200,
      }},
    }},
  }},
  networks: {{
    hardhat: {{
      chainId: 31337,
    }},
    localhost: {{
      url: "http://127.0.0.1:8545",
    }},
    sepolia: {{
      url: process.env.SEPOLIA_RPC_URL || "",
      accounts,
      chainId: 11155111,
    }},
    mainnet: {{
      url: process.env.MAINNET_RPC_URL || "",
      accounts,
      chainId: 1,
    }},
  }},
  etherscan: {{
    apiKey: process.env.ETHERSCAN_API_KEY || "",
  }},
  gasReporter: {{
    enabled: process.env.REPORT_GAS === "true",
    currency: "USD",
  }},
}};
"#
    )
}

fn deploy_step(contract: &ContractSpec) -> String {
    let var = contract.var();
    let deploy = if contract.proxy.is_upgradeable() {
        format!(
            "await upgrades.deployProxy(factory, [{}], {{ kind: \"{}\" }})",
            contract.js_args(),
            contract.proxy
        )
    } else {
        format!("await factory.deploy({})", contract.js_args())
    };
    format!(
        r#"  {{
    console.log("Deploying {name} ({standard})...");
    const factory = await ethers.getContractFactory("{name}");
    const {var} = {deploy};
    await {var}.waitForDeployment();
    console.log("{name} deployed to:", await {var}.getAddress());
  }}
"#,
        name = contract.name,
        standard = contract.standard.display_name(),
    )
}

pub fn deploy_script(options: &SolidityOptions, specs: &[ContractSpec]) -> String {
    let import = if options.proxy().is_upgradeable() {
        "const { ethers, upgrades } = require(\"hardhat\");"
    } else {
        "const { ethers } = require(\"hardhat\");"
    };
    let body = if options.contract_type() == ContractType::None {
        "  // Add deployment steps for your contracts here.\n".to_string()
    } else {
        let mut body = String::from(
            "  const [deployer] = await ethers.getSigners();\n  console.log(\"Deployer:\", deployer.address);\n\n",
        );
        body.push_str(&specs.iter().map(deploy_step).collect::<Vec<_>>().join("\n"));
        body
    };
    format!(
        r#"{import}

async function main() {{
{body}}}

main()
  .then(() => process.exit(0))
  .catch((error) => {{
    console.error(error);
    process.exit(1);
  }});
"#
    )
}

fn test_cases(contract: &ContractSpec) -> &'static str {
    match contract.standard {
        TokenStandard::Erc20 => {
            r#"  it("has the configured name and symbol", async function () {
    expect(await token.name()).to.equal(NAME);
    expect(await token.symbol()).to.equal(SYMBOL);
  });

  it("mints the initial supply to the deployer", async function () {
    expect(await token.balanceOf(owner.address)).to.equal(SUPPLY);
  });

  it("lets the owner mint", async function () {
    await token.mint(alice.address, ethers.parseEther("1000"));
    expect(await token.balanceOf(alice.address)).to.equal(ethers.parseEther("1000"));
  });

  it("rejects minting from other accounts", async function () {
    await expect(token.connect(alice).mint(alice.address, 1)).to.be.reverted;
  });

  it("transfers between accounts", async function () {
    await token.transfer(alice.address, ethers.parseEther("50"));
    await token.connect(alice).transfer(bob.address, ethers.parseEther("25"));
    expect(await token.balanceOf(bob.address)).to.equal(ethers.parseEther("25"));
  });
"#
        }
        TokenStandard::Erc721 => {
            r#"  it("has the configured name and symbol", async function () {
    expect(await nft.name()).to.equal(NAME);
    expect(await nft.symbol()).to.equal(SYMBOL);
  });

  it("mints with a token URI", async function () {
    await nft.safeMint(alice.address, "https://example.com/token/0");
    expect(await nft.ownerOf(0)).to.equal(alice.address);
    expect(await nft.tokenURI(0)).to.equal("https://example.com/token/0");
  });

  it("transfers tokens", async function () {
    await nft.safeMint(alice.address, "https://example.com/token/0");
    await nft.connect(alice).transferFrom(alice.address, bob.address, 0);
    expect(await nft.ownerOf(0)).to.equal(bob.address);
  });
"#
        }
        TokenStandard::Erc1155 => {
            r#"  it("mints a single id", async function () {
    await nft.mint(alice.address, 1, 10, "0x");
    expect(await nft.balanceOf(alice.address, 1)).to.equal(10);
  });

  it("mints in batches", async function () {
    await nft.mintBatch(alice.address, [1, 2], [10, 20], "0x");
    expect(await nft.balanceOf(alice.address, 1)).to.equal(10);
    expect(await nft.balanceOf(alice.address, 2)).to.equal(20);
  });

  it("transfers balances", async function () {
    await nft.mint(alice.address, 1, 10, "0x");
    await nft.connect(alice).safeTransferFrom(alice.address, bob.address, 1, 5, "0x");
    expect(await nft.balanceOf(bob.address, 1)).to.equal(5);
  });
"#
        }
    }
}

pub fn test_file(contract: &ContractSpec) -> String {
    let var = contract.var();
    let upgradeable = contract.proxy.is_upgradeable();
    let import = if upgradeable {
        "const { ethers, upgrades } = require(\"hardhat\");"
    } else {
        "const { ethers } = require(\"hardhat\");"
    };
    let constants = match contract.standard {
        TokenStandard::Erc20 => format!(
            "const NAME = \"{}\";\nconst SYMBOL = \"{TOKEN_SYMBOL}\";\nconst SUPPLY = ethers.parseEther(\"{INITIAL_SUPPLY}\");\n",
            contract.display_name()
        ),
        TokenStandard::Erc721 => format!(
            "const NAME = \"{}\";\nconst SYMBOL = \"{NFT_SYMBOL}\";\n",
            contract.display_name()
        ),
        TokenStandard::Erc1155 => String::new(),
    };
    let deploy = if upgradeable {
        format!(
            "upgrades.deployProxy(factory, [{}], {{ kind: \"{}\" }})",
            contract.js_args(),
            contract.proxy
        )
    } else {
        format!("factory.deploy({})", contract.js_args())
    };
    let upgrade_case = if upgradeable {
        format!(
            r#"
  it("upgrades in place", async function () {{
    const address = await {var}.getAddress();
    const next = await ethers.getContractFactory("{name}");
    const upgraded = await upgrades.upgradeProxy(address, next);
    expect(await upgraded.getAddress()).to.equal(address);
  }});
"#,
            name = contract.name
        )
    } else {
        String::new()
    };

    format!(
        r#"const {{ expect }} = require("chai");
{import}

{constants}
describe("{name}", function () {{
  let {var};
  let owner;
  let alice;
  let bob;

  beforeEach(async function () {{
    [owner, alice, bob] = await ethers.getSigners();
    const factory = await ethers.getContractFactory("{name}");
    {var} = await {deploy};
    await {var}.waitForDeployment();
  }});

{cases}{upgrade_case}}});
"#,
        name = contract.name,
        cases = test_cases(contract),
    )
}

const ENV_EXAMPLE: &str = "# Network RPC URLs
SEPOLIA_RPC_URL=https://eth-sepolia.g.alchemy.com/v2/YOUR_API_KEY
MAINNET_RPC_URL=https://eth-mainnet.g.alchemy.com/v2/YOUR_API_KEY

# Deployer private key (never commit a real one)
PRIVATE_KEY=your_private_key_here

# Contract verification
ETHERSCAN_API_KEY=your_etherscan_api_key

# Gas reporter
REPORT_GAS=false
";

const GITIGNORE: &str = "node_modules/
.env

# Hardhat
cache/
artifacts/
typechain-types/
coverage/
coverage.json
gas-report.txt

.DS_Store
";

fn readme(options: &SolidityOptions, ctx: &RenderContext) -> String {
    let what = match options.contract_type() {
        ContractType::Token => "an ERC20 token",
        ContractType::Nft => "an NFT collection",
        ContractType::Both => "an ERC20 token and an NFT collection",
        ContractType::None => "smart contracts",
    };
    let template = format!(
        r#"# {{{{PROJECT_NAME}}}}

Hardhat project for {what}, built on OpenZeppelin Contracts.

## Getting Started

```bash
{{{{INSTALL_CMD}}}}
cp .env.example .env
```

## Commands

| Task | Command |
| --- | --- |
| Compile | `{{{{EXEC}}}} hardhat compile` |
| Test | `{{{{EXEC}}}} hardhat test` |
| Gas report | `REPORT_GAS=true {{{{EXEC}}}} hardhat test` |
| Local node | `{{{{EXEC}}}} hardhat node` |
| Deploy (local) | `{{{{EXEC}}}} hardhat run scripts/deploy.js --network localhost` |
| Deploy (Sepolia) | `{{{{EXEC}}}} hardhat run scripts/deploy.js --network sepolia` |

## Layout

```
contracts/   Solidity sources
scripts/     deployment scripts
test/        Mocha + Chai tests
```

Never commit `.env` or private keys, and audit contracts before mainnet deployment.
"#
    );
    ctx.render(&template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigurationDraft;
    use crate::domain::generators::plan as build_plan;
    use crate::domain::generators::test_support::solidity;
    use crate::domain::value_objects::ProxyPattern;

    #[test]
    fn default_solidity_project_is_a_hardhat_token() {
        let plan = build_plan(&solidity(ConfigurationDraft::default())).unwrap();
        assert_eq!(plan.kind(), PlanKind::Contract);
        for path in [
            "package.json",
            "hardhat.config.js",
            "contracts/MyToken.sol",
            "scripts/deploy.js",
            "test/MyToken.test.js",
            ".env.example",
            "README.md",
            ".gitignore",
        ] {
            assert!(plan.file(path).is_some(), "missing {path}");
        }
        assert_eq!(plan.installs()[0].to_string(), "bun install");
        assert!(plan.file("tsconfig.json").is_none());
    }

    #[test]
    fn proxy_configs_load_the_upgrades_plugin() {
        let config = solidity(ConfigurationDraft {
            proxy: Some(ProxyPattern::Uups),
            ..Default::default()
        });
        let plan = build_plan(&config).unwrap();
        let hh = &plan.file("hardhat.config.js").unwrap().content;
        assert!(hh.contains("require(\"@openzeppelin/hardhat-upgrades\");"));
        let deploy = &plan.file("scripts/deploy.js").unwrap().content;
        assert!(deploy.contains("upgrades.deployProxy(factory"));
        assert!(deploy.contains("{ kind: \"uups\" }"));
        let test = &plan.file("test/MyToken.test.js").unwrap().content;
        assert!(test.contains("upgrades in place"));
    }

    #[test]
    fn both_emits_two_contracts_and_tests() {
        let plan = build_plan(&solidity(ConfigurationDraft {
            contract_type: Some(ContractType::Both),
            ..Default::default()
        }))
        .unwrap();
        assert!(plan.file("contracts/MyTokenNFT.sol").is_some());
        assert!(plan.file("test/MyTokenNFT.test.js").is_some());
        let deploy = &plan.file("scripts/deploy.js").unwrap().content;
        assert!(deploy.contains("getContractFactory(\"MyToken\")"));
        assert!(deploy.contains("getContractFactory(\"MyTokenNFT\")"));
    }

    #[test]
    fn contract_type_none_keeps_an_empty_deploy_script() {
        let plan = build_plan(&solidity(ConfigurationDraft {
            contract_type: Some(ContractType::None),
            ..Default::default()
        }))
        .unwrap();
        assert!(plan.files().all(|f| !f.path.starts_with("test/")));
        assert!(plan.files().all(|f| f.path.extension().is_none_or(|e| e != "sol")));
        let deploy = &plan.file("scripts/deploy.js").unwrap().content;
        assert!(deploy.contains("async function main() {"));
        assert!(!deploy.contains("getContractFactory"));
    }
}
