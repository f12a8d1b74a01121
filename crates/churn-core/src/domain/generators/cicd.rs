//! CI/CD pipelines.
//!
//! Every provider renders the same [`Pipeline`]: install, then the checks
//! the configuration enables, then a deploy job gated on `main`.

use crate::domain::configuration::Configuration;
use crate::domain::generators::{ConcernDef, GeneratedFile, no_contribution};
use crate::domain::render::RenderContext;
use crate::domain::value_objects::{CiProvider, PackageManager, TestingFramework};

pub static CI_PROVIDERS: &[ConcernDef<CiProvider>] = &[
    ConcernDef {
        key: CiProvider::Github,
        bundle: "cicd:github",
        directories: &[".github/workflows"],
        files: github_files,
        manifest: no_contribution,
    },
    ConcernDef {
        key: CiProvider::Gitlab,
        bundle: "cicd:gitlab",
        directories: &[],
        files: gitlab_files,
        manifest: no_contribution,
    },
    ConcernDef {
        key: CiProvider::Circleci,
        bundle: "cicd:circleci",
        directories: &[".circleci"],
        files: circleci_files,
        manifest: no_contribution,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub name: &'static str,
    pub run: String,
}

/// Provider-neutral description of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub package_manager: PackageManager,
    pub install: String,
    /// Checks run after install, in order.
    pub checks: Vec<Step>,
    /// Lint runs as its own job.
    pub lint: Option<Step>,
}

impl Pipeline {
    pub fn for_config(config: &Configuration) -> Self {
        let pm = config.package_manager();
        let mut checks = Vec::new();
        if config.is_typescript() {
            checks.push(Step {
                name: "Type check",
                run: pm.run_script("typecheck"),
            });
        }
        if config.testing() != TestingFramework::None {
            checks.push(Step {
                name: "Run tests",
                run: pm.run_script("test"),
            });
        }
        if config.is_typescript() {
            checks.push(Step {
                name: "Build",
                run: pm.run_script("build"),
            });
        }
        let lint = config.linting().then(|| Step {
            name: "Run linter",
            run: pm.run_script("lint"),
        });
        Self {
            package_manager: pm,
            install: pm.frozen_install().to_string(),
            checks,
            lint,
        }
    }

    fn image(&self) -> &'static str {
        match self.package_manager {
            PackageManager::Bun => "oven/bun:1",
            _ => "node:20-alpine",
        }
    }

    /// Shell preamble for yarn/pnpm on stock node images.
    fn corepack(&self) -> Option<&'static str> {
        matches!(self.package_manager, PackageManager::Yarn | PackageManager::Pnpm)
            .then_some("corepack enable")
    }
}

fn github_setup(pipeline: &Pipeline) -> Vec<String> {
    let mut out = vec![
        "      - name: Checkout".to_string(),
        "        uses: actions/checkout@v4".into(),
    ];
    match pipeline.package_manager {
        PackageManager::Bun => {
            out.push("      - name: Setup Bun".into());
            out.push("        uses: oven-sh/setup-bun@v1".into());
            out.push("        with:".into());
            out.push("          bun-version: latest".into());
        }
        pm => {
            if pm == PackageManager::Pnpm {
                out.push("      - name: Setup pnpm".into());
                out.push("        uses: pnpm/action-setup@v2".into());
                out.push("        with:".into());
                out.push("          version: 8".into());
            }
            out.push("      - name: Setup Node.js".into());
            out.push("        uses: actions/setup-node@v4".into());
            out.push("        with:".into());
            out.push("          node-version: '20'".into());
            out.push(format!("          cache: '{pm}'"));
        }
    }
    out.push("      - name: Install dependencies".into());
    out.push(format!("        run: {}", pipeline.install));
    out
}

fn github_files(config: &Configuration, _ctx: &RenderContext) -> Vec<GeneratedFile> {
    let pipeline = Pipeline::for_config(config);
    let mut out = vec![
        "name: CI/CD".to_string(),
        String::new(),
        "on:".into(),
        "  push:".into(),
        "    branches: [main, develop]".into(),
        "  pull_request:".into(),
        "    branches: [main, develop]".into(),
        String::new(),
        "jobs:".into(),
        "  test:".into(),
        "    runs-on: ubuntu-latest".into(),
        "    steps:".into(),
    ];
    out.extend(github_setup(&pipeline));
    for step in &pipeline.checks {
        out.push(format!("      - name: {}", step.name));
        out.push(format!("        run: {}", step.run));
    }

    let mut needs = vec!["test"];
    if let Some(lint) = &pipeline.lint {
        out.push(String::new());
        out.push("  lint:".into());
        out.push("    runs-on: ubuntu-latest".into());
        out.push("    steps:".into());
        out.extend(github_setup(&pipeline));
        out.push(format!("      - name: {}", lint.name));
        out.push(format!("        run: {}", lint.run));
        needs.push("lint");
    }

    out.push(String::new());
    out.push("  deploy:".into());
    out.push(format!("    needs: [{}]", needs.join(", ")));
    out.push("    runs-on: ubuntu-latest".into());
    out.push("    if: github.ref == 'refs/heads/main'".into());
    out.push("    steps:".into());
    out.push("      - name: Checkout".into());
    out.push("        uses: actions/checkout@v4".into());
    out.push("      - name: Deploy".into());
    out.push("        run: echo \"Add your deployment steps here\"".into());
    out.push("        env:".into());
    out.push("          DEPLOY_TOKEN: ${{ secrets.DEPLOY_TOKEN }}".into());

    vec![GeneratedFile::new(
        ".github/workflows/ci-cd.yml",
        out.join("\n") + "\n",
    )]
}

fn gitlab_files(config: &Configuration, _ctx: &RenderContext) -> Vec<GeneratedFile> {
    let pipeline = Pipeline::for_config(config);
    let mut before = vec![];
    if let Some(cmd) = pipeline.corepack() {
        before.push(format!("    - {cmd}"));
    }
    before.push(format!("    - {}", pipeline.install));

    let mut out = vec![
        format!("image: {}", pipeline.image()),
        String::new(),
        "stages:".into(),
        "  - check".into(),
    ];
    if pipeline.lint.is_some() {
        out.push("  - lint".into());
    }
    out.push("  - deploy".into());
    out.push(String::new());
    out.push("cache:".into());
    out.push("  key:".into());
    out.push("    files:".into());
    out.push(format!("      - {}", pipeline.package_manager.lockfile()));
    out.push("  paths:".into());
    out.push("    - node_modules/".into());
    out.push(String::new());
    out.push("default:".into());
    out.push("  before_script:".into());
    out.extend(before);
    out.push(String::new());

    out.push("check:".into());
    out.push("  stage: check".into());
    out.push("  script:".into());
    if pipeline.checks.is_empty() {
        out.push("    - echo \"No checks configured\"".into());
    }
    for step in &pipeline.checks {
        out.push(format!("    - {}", step.run));
    }
    out.push(String::new());

    if let Some(lint) = &pipeline.lint {
        out.push("lint:".into());
        out.push("  stage: lint".into());
        out.push("  script:".into());
        out.push(format!("    - {}", lint.run));
        out.push(String::new());
    }

    out.push("deploy:".into());
    out.push("  stage: deploy".into());
    out.push("  script:".into());
    out.push("    - echo \"Add your deployment steps here\"".into());
    out.push("  rules:".into());
    out.push("    - if: $CI_COMMIT_BRANCH == \"main\"".into());

    vec![GeneratedFile::new(".gitlab-ci.yml", out.join("\n") + "\n")]
}

fn circleci_files(config: &Configuration, _ctx: &RenderContext) -> Vec<GeneratedFile> {
    let pipeline = Pipeline::for_config(config);
    let image = match pipeline.package_manager {
        PackageManager::Bun => "oven/bun:1",
        _ => "cimg/node:20.10",
    };
    let lockfile = pipeline.package_manager.lockfile();

    let mut out = vec![
        "version: 2.1".to_string(),
        String::new(),
        "executors:".into(),
        "  app:".into(),
        "    docker:".into(),
        format!("      - image: {image}"),
        String::new(),
        "commands:".into(),
        "  install:".into(),
        "    steps:".into(),
        "      - checkout".into(),
        "      - restore_cache:".into(),
        "          keys:".into(),
        format!("            - deps-{{{{ checksum \"{lockfile}\" }}}}"),
    ];
    if let Some(cmd) = pipeline.corepack() {
        out.push(format!("      - run: sudo {cmd}"));
    }
    out.push(format!("      - run: {}", pipeline.install));
    out.push("      - save_cache:".into());
    out.push(format!(
        "          key: deps-{{{{ checksum \"{lockfile}\" }}}}"
    ));
    out.push("          paths:".into());
    out.push("            - node_modules".into());
    out.push(String::new());

    out.push("jobs:".into());
    out.push("  check:".into());
    out.push("    executor: app".into());
    out.push("    steps:".into());
    out.push("      - install".into());
    for step in &pipeline.checks {
        out.push("      - run:".into());
        out.push(format!("          name: {}", step.name));
        out.push(format!("          command: {}", step.run));
    }
    if let Some(lint) = &pipeline.lint {
        out.push(String::new());
        out.push("  lint:".into());
        out.push("    executor: app".into());
        out.push("    steps:".into());
        out.push("      - install".into());
        out.push("      - run:".into());
        out.push(format!("          name: {}", lint.name));
        out.push(format!("          command: {}", lint.run));
    }
    out.push(String::new());
    out.push("  deploy:".into());
    out.push("    executor: app".into());
    out.push("    steps:".into());
    out.push("      - checkout".into());
    out.push("      - run: echo \"Add your deployment steps here\"".into());
    out.push(String::new());

    out.push("workflows:".into());
    out.push("  ci-cd:".into());
    out.push("    jobs:".into());
    out.push("      - check".into());
    let mut requires = vec!["check"];
    if pipeline.lint.is_some() {
        out.push("      - lint".into());
        requires.push("lint");
    }
    out.push("      - deploy:".into());
    out.push(format!("          requires: [{}]", requires.join(", ")));
    out.push("          filters:".into());
    out.push("            branches:".into());
    out.push("              only: main".into());

    vec![GeneratedFile::new(".circleci/config.yml", out.join("\n") + "\n")]
}
