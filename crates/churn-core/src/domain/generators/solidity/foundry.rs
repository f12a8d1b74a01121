//! Foundry layout: `forge` config, Solidity deploy script and tests.
//! Libraries are fetched with `forge install` instead of a package manager.

use super::{ContractSpec, INITIAL_SUPPLY, METADATA_URI, NFT_SYMBOL, TOKEN_SYMBOL, contracts};
use crate::domain::configuration::{Configuration, SolidityOptions};
use crate::domain::plan::{Bundle, InstallCommand, PlanKind, ScaffoldPlan};
use crate::domain::render::RenderContext;
use crate::domain::value_objects::{ProxyPattern, TokenStandard};

pub fn plan(
    config: &Configuration,
    options: &SolidityOptions,
    specs: &[ContractSpec],
    ctx: &RenderContext,
) -> ScaffoldPlan {
    let mut core = Bundle::new("core")
        .with_file("foundry.toml", FOUNDRY_TOML)
        .with_file("remappings.txt", remappings(options.proxy()))
        .with_directory("src")
        .with_directory("script")
        .with_directory("test")
        .with_directory("lib");
    for contract in specs {
        core.add_file(format!("src/{}", contract.file_name()), contracts::source(contract));
        core.add_file(format!("test/{}.t.sol", contract.name), test_file(contract));
    }
    core.add_file("script/Deploy.s.sol", deploy_script(options.proxy(), specs));
    core.add_file(".env.example", ENV_EXAMPLE);
    core.add_file(".gitignore", GITIGNORE);
    core.add_file("README.md", ctx.render(README));

    let mut plan = ScaffoldPlan::new(config.target_dir(), PlanKind::Contract, core);
    for command in installs(options.proxy()) {
        plan.push_install(command);
    }
    plan
}

/// `forge install` commands; upgradeable contracts only with a proxy.
pub fn installs(proxy: ProxyPattern) -> Vec<InstallCommand> {
    let mut libraries = vec!["OpenZeppelin/openzeppelin-contracts"];
    if proxy.is_upgradeable() {
        libraries.push("OpenZeppelin/openzeppelin-contracts-upgradeable");
    }
    libraries.push("foundry-rs/forge-std");
    libraries
        .into_iter()
        .map(|lib| InstallCommand::new("forge", ["install", lib, "--no-git"]))
        .collect()
}

const FOUNDRY_TOML: &str = r#"[profile.default]
src = "src"
out = "out"
libs = ["lib"]
solc_version = "0.8.24"
optimizer = true
optimizer_runs = 200

[profile.ci]
fuzz = { runs = 5000 }
invariant = { runs = 1000 }

[rpc_endpoints]
sepolia = "${SEPOLIA_RPC_URL}"
mainnet = "${MAINNET_RPC_URL}"
"#;

fn remappings(proxy: ProxyPattern) -> String {
    let mut out = String::from("@openzeppelin/contracts/=lib/openzeppelin-contracts/contracts/\n");
    if proxy.is_upgradeable() {
        out.push_str(
            "@openzeppelin/contracts-upgradeable/=lib/openzeppelin-contracts-upgradeable/contracts/\n",
        );
    }
    out.push_str("forge-std/=lib/forge-std/src/\n");
    out
}

fn proxy_import(proxy: ProxyPattern) -> Option<&'static str> {
    match proxy {
        ProxyPattern::Uups => Some(
            "import {ERC1967Proxy} from \"@openzeppelin/contracts/proxy/ERC1967/ERC1967Proxy.sol\";",
        ),
        ProxyPattern::Transparent => Some(
            "import {TransparentUpgradeableProxy} from \"@openzeppelin/contracts/proxy/transparent/TransparentUpgradeableProxy.sol\";",
        ),
        ProxyPattern::None => None,
    }
}

/// Statements deploying `contract` into a local named after its variable.
/// `owner` is the Solidity expression for the proxy admin owner.
fn deploy_statements(contract: &ContractSpec, owner: &str, indent: &str) -> Vec<String> {
    let name = &contract.name;
    let var = contract.var();
    let lines = match contract.proxy {
        ProxyPattern::None => vec![format!("{var} = new {name}({});", contract.sol_args())],
        proxy => {
            let init = format!(
                "abi.encodeWithSignature(\"{}\", {})",
                contract.init_signature(),
                contract.sol_args()
            );
            let proxy_expr = if proxy == ProxyPattern::Uups {
                format!("new ERC1967Proxy(implementation, {init})")
            } else {
                format!("new TransparentUpgradeableProxy(implementation, {owner}, {init})")
            };
            vec![
                "{".to_string(),
                format!("    address implementation = address(new {name}());"),
                format!("    {var} = {name}(address({proxy_expr}));"),
                "}".to_string(),
            ]
        }
    };
    lines.into_iter().map(|l| format!("{indent}{l}")).collect()
}

pub fn deploy_script(proxy: ProxyPattern, specs: &[ContractSpec]) -> String {
    let mut imports = vec!["import {Script, console} from \"forge-std/Script.sol\";".to_string()];
    for contract in specs {
        imports.push(format!(
            "import {{{name}}} from \"../src/{file}\";",
            name = contract.name,
            file = contract.file_name()
        ));
    }
    if !specs.is_empty() {
        imports.extend(proxy_import(proxy).map(String::from));
    }

    let mut body = vec![
        "        uint256 deployerPrivateKey = vm.envUint(\"PRIVATE_KEY\");".to_string(),
        "        vm.startBroadcast(deployerPrivateKey);".into(),
    ];
    if specs.is_empty() {
        body.push("        // Add deployment steps for your contracts here.".into());
    } else {
        body.push("        address deployer = vm.addr(deployerPrivateKey);".into());
    }
    for contract in specs {
        body.push(String::new());
        body.push(format!("        {} {};", contract.name, contract.var()));
        body.extend(deploy_statements(contract, "deployer", "        "));
        body.push(format!(
            "        console.log(\"{} deployed at:\", address({}));",
            contract.name,
            contract.var()
        ));
    }
    body.push(String::new());
    body.push("        vm.stopBroadcast();".into());

    format!(
        "// SPDX-License-Identifier: MIT\npragma solidity ^0.8.20;\n\n{}\n\ncontract DeployScript is Script {{\n    function run() external {{\n{}\n    }}\n}}\n",
        imports.join("\n"),
        body.join("\n")
    )
}

fn test_cases(contract: &ContractSpec) -> String {
    let name = contract.display_name();
    match contract.standard {
        TokenStandard::Erc20 => format!(
            r#"    function test_InitialSupply() public view {{
        assertEq(token.totalSupply(), {INITIAL_SUPPLY} * 10 ** 18);
        assertEq(token.balanceOf(owner), {INITIAL_SUPPLY} * 10 ** 18);
    }}

    function test_Metadata() public view {{
        assertEq(token.name(), "{name}");
        assertEq(token.symbol(), "{TOKEN_SYMBOL}");
    }}

    function test_OwnerCanMint() public {{
        token.mint(user1, 1000 * 10 ** 18);
        assertEq(token.balanceOf(user1), 1000 * 10 ** 18);
    }}

    function test_RevertWhen_NonOwnerMints() public {{
        vm.prank(user1);
        vm.expectRevert();
        token.mint(user1, 1);
    }}

    function test_Transfer() public {{
        token.transfer(user1, 100 * 10 ** 18);
        assertEq(token.balanceOf(user1), 100 * 10 ** 18);
    }}

    function test_Burn() public {{
        token.burn(1000 * 10 ** 18);
        assertEq(token.totalSupply(), ({INITIAL_SUPPLY} - 1000) * 10 ** 18);
    }}
"#
        ),
        TokenStandard::Erc721 => format!(
            r#"    function test_Metadata() public view {{
        assertEq(nft.name(), "{name}");
        assertEq(nft.symbol(), "{NFT_SYMBOL}");
    }}

    function test_SafeMint() public {{
        nft.safeMint(user1, "https://example.com/token/0");
        assertEq(nft.ownerOf(0), user1);
        assertEq(nft.tokenURI(0), "https://example.com/token/0");
    }}

    function test_BalanceOf() public {{
        nft.safeMint(user1, "https://example.com/token/0");
        nft.safeMint(user1, "https://example.com/token/1");
        assertEq(nft.balanceOf(user1), 2);
    }}
"#
        ),
        TokenStandard::Erc1155 => format!(
            r#"    function test_Mint() public {{
        nft.mint(user1, 1, 10, "");
        assertEq(nft.balanceOf(user1, 1), 10);
    }}

    function test_MintBatch() public {{
        uint256[] memory ids = new uint256[](2);
        ids[0] = 1;
        ids[1] = 2;
        uint256[] memory amounts = new uint256[](2);
        amounts[0] = 10;
        amounts[1] = 20;
        nft.mintBatch(user1, ids, amounts, "");
        assertEq(nft.balanceOf(user1, 1), 10);
        assertEq(nft.balanceOf(user1, 2), 20);
    }}

    function test_Transfer() public {{
        nft.mint(user1, 1, 10, "");
        vm.prank(user1);
        nft.safeTransferFrom(user1, user2, 1, 5, "");
        assertEq(nft.balanceOf(user2, 1), 5);
    }}

    function test_Uri() public view {{
        assertEq(nft.uri(1), "{METADATA_URI}");
    }}
"#
        ),
    }
}

pub fn test_file(contract: &ContractSpec) -> String {
    let mut imports = vec![
        "import {Test} from \"forge-std/Test.sol\";".to_string(),
        format!("import {{{}}} from \"../src/{}\";", contract.name, contract.file_name()),
    ];
    imports.extend(proxy_import(contract.proxy).map(String::from));

    let setup = deploy_statements(contract, "owner", "        ").join("\n");
    format!(
        r#"// SPDX-License-Identifier: MIT
pragma solidity ^0.8.20;

{imports}

contract {name}Test is Test {{
    {name} public {var};
    address public owner = address(this);
    address public user1 = address(0x1);
    address public user2 = address(0x2);

    function setUp() public {{
{setup}
    }}

{cases}}}
"#,
        imports = imports.join("\n"),
        name = contract.name,
        var = contract.var(),
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
";

const GITIGNORE: &str = "# Foundry
cache/
out/
broadcast/

.env
.DS_Store
";

const README: &str = r#"# {{PROJECT_NAME}}

Foundry project built on OpenZeppelin Contracts.

## Getting Started

```bash
forge install OpenZeppelin/openzeppelin-contracts --no-git
forge install foundry-rs/forge-std --no-git
cp .env.example .env
```

## Commands

| Task | Command |
| --- | --- |
| Build | `forge build` |
| Test | `forge test -vvv` |
| Gas report | `forge test --gas-report` |
| Coverage | `forge coverage` |
| Local node | `anvil` |
| Deploy (local) | `forge script script/Deploy.s.sol --rpc-url http://localhost:8545 --broadcast` |
| Deploy (Sepolia) | `forge script script/Deploy.s.sol --rpc-url sepolia --broadcast --verify` |

## Layout

```
src/      Solidity sources
script/   deployment scripts
test/     forge tests
lib/      dependencies installed by forge
```

See the [Foundry Book](https://book.getfoundry.sh/).
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigurationDraft;
    use crate::domain::generators::plan as build_plan;
    use crate::domain::generators::test_support::solidity;
    use crate::domain::value_objects::{ContractType, EvmFramework};

    fn scenario_d() -> Configuration {
        solidity(ConfigurationDraft {
            evm_framework: Some(EvmFramework::Foundry),
            contract_type: Some(ContractType::Nft),
            token_standard: Some(TokenStandard::Erc1155),
            proxy: Some(ProxyPattern::None),
            ..Default::default()
        })
    }

    #[test]
    fn nft_erc1155_project_layout() {
        let plan = build_plan(&scenario_d()).unwrap();
        for path in [
            "foundry.toml",
            "remappings.txt",
            "src/MyToken.sol",
            "script/Deploy.s.sol",
            "test/MyToken.t.sol",
        ] {
            assert!(plan.file(path).is_some(), "missing {path}");
        }
        assert!(plan.file("package.json").is_none());

        let contract = &plan.file("src/MyToken.sol").unwrap().content;
        assert!(contract.contains("is ERC1155, Ownable"));
        assert!(contract.contains("function mintBatch("));
    }

    #[test]
    fn installs_skip_upgradeable_without_proxy() {
        let plan = build_plan(&scenario_d()).unwrap();
        let installs: Vec<_> = plan.installs().iter().map(ToString::to_string).collect();
        assert_eq!(
            installs,
            vec![
                "forge install OpenZeppelin/openzeppelin-contracts --no-git",
                "forge install foundry-rs/forge-std --no-git",
            ]
        );
        let remap = &plan.file("remappings.txt").unwrap().content;
        assert!(!remap.contains("upgradeable"));
    }

    #[test]
    fn proxies_fetch_upgradeable_contracts() {
        let installs = installs(ProxyPattern::Transparent);
        assert_eq!(installs.len(), 3);
        assert_eq!(installs[1].args[1], "OpenZeppelin/openzeppelin-contracts-upgradeable");
    }

    #[test]
    fn uups_deploy_wraps_in_erc1967_proxy() {
        let contract = ContractSpec {
            name: "MyToken".into(),
            standard: TokenStandard::Erc20,
            proxy: ProxyPattern::Uups,
        };
        let script = deploy_script(ProxyPattern::Uups, std::slice::from_ref(&contract));
        assert!(script.contains("import {ERC1967Proxy}"));
        assert!(script.contains("address implementation = address(new MyToken());"));
        assert!(script.contains("initialize(string,string,uint256)"));

        let test = test_file(&contract);
        assert!(test.contains("contract MyTokenTest is Test {"));
        assert!(test.contains("new ERC1967Proxy(implementation"));
    }

    #[test]
    fn transparent_proxies_name_an_admin_owner() {
        let contract = ContractSpec {
            name: "MyToken".into(),
            standard: TokenStandard::Erc721,
            proxy: ProxyPattern::Transparent,
        };
        let test = test_file(&contract);
        assert!(test.contains("new TransparentUpgradeableProxy(implementation, owner, "));
    }
}
