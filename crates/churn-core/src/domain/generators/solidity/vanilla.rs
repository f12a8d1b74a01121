//! No framework: contracts compiled by a small solc-js script.

use super::{ContractSpec, contracts};
use crate::domain::configuration::{Configuration, SolidityOptions};
use crate::domain::generators::manifest;
use crate::domain::plan::{Bundle, PlanKind, ScaffoldPlan};
use crate::domain::render::RenderContext;
use crate::error::{ChurnError, ChurnResult};

pub fn plan(
    config: &Configuration,
    _options: &SolidityOptions,
    specs: &[ContractSpec],
    ctx: &RenderContext,
) -> ChurnResult<ScaffoldPlan> {
    let manifest = manifest::build(config).ok_or_else(|| ChurnError::Internal {
        message: "solc-js project without a manifest".into(),
    })?;

    let mut core = Bundle::new("core")
        .with_file("package.json", manifest::serialize(&manifest)?)
        .with_directory("contracts")
        .with_directory("scripts");
    for contract in specs {
        core.add_file(format!("contracts/{}", contract.file_name()), contracts::source(contract));
    }
    core.add_file("scripts/compile.js", COMPILE_SCRIPT);
    core.add_file(".gitignore", GITIGNORE);
    let ctx = ctx
        .clone()
        .with_variable("COMPILE_CMD", config.package_manager().run_script("compile"));
    core.add_file("README.md", ctx.render(README));

    let mut plan = ScaffoldPlan::new(config.target_dir(), PlanKind::Contract, core);
    plan.push_install(config.package_manager().install_command());
    Ok(plan)
}

/// Compiles every `.sol` under `contracts/` and writes ABI plus bytecode
/// to `build/<Contract>.json`. OpenZeppelin imports resolve from
/// `node_modules`.
const COMPILE_SCRIPT: &str = r#"const fs = require("fs");
const path = require("path");
const solc = require("solc");

const root = path.resolve(__dirname, "..");
const contractsDir = path.join(root, "contracts");
const buildDir = path.join(root, "build");

function findImports(importPath) {
  const candidates = [
    path.join(root, "node_modules", importPath),
    path.join(contractsDir, importPath),
  ];
  for (const candidate of candidates) {
    if (fs.existsSync(candidate)) {
      return { contents: fs.readFileSync(candidate, "utf8") };
    }
  }
  return { error: `File not found: ${importPath}` };
}

const sources = {};
for (const file of fs.readdirSync(contractsDir)) {
  if (file.endsWith(".sol")) {
    sources[file] = { content: fs.readFileSync(path.join(contractsDir, file), "utf8") };
  }
}

if (Object.keys(sources).length === 0) {
  console.log("No contracts found in contracts/");
  process.exit(0);
}

const input = {
  language: "Solidity",
  sources,
  settings: {
    optimizer: { enabled: true, runs: 200 },
    outputSelection: {
      "*": { "*": ["abi", "evm.bytecode.object"] },
    },
  },
};

const output = JSON.parse(solc.compile(JSON.stringify(input), { import: findImports }));

let failed = false;
for (const error of output.errors || []) {
  console.error(error.formattedMessage);
  if (error.severity === "error") {
    failed = true;
  }
}
if (failed) {
  process.exit(1);
}

fs.mkdirSync(buildDir, { recursive: true });
for (const file of Object.keys(sources)) {
  for (const [name, contract] of Object.entries(output.contracts[file] || {})) {
    const artifact = {
      contractName: name,
      abi: contract.abi,
      bytecode: `0x${contract.evm.bytecode.object}`,
    };
    fs.writeFileSync(path.join(buildDir, `${name}.json`), JSON.stringify(artifact, null, 2));
    console.log(`Compiled ${name}`);
  }
}
"#;

const GITIGNORE: &str = "node_modules/
build/

.env
.DS_Store
";

const README: &str = r#"# {{PROJECT_NAME}}

Solidity contracts compiled with [solc-js](https://github.com/ethereum/solc-js).

## Getting Started

```bash
{{INSTALL_CMD}}
{{COMPILE_CMD}}
```

Artifacts (ABI and bytecode) are written to `build/`.

## Layout

```
contracts/          Solidity sources
scripts/compile.js  compiler driver
```

Add a framework such as Hardhat or Foundry when you need testing and deployment.
"#;
