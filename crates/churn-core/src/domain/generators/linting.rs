//! ESLint, Prettier and lint-staged setup.

use serde_json::json;

use crate::domain::configuration::Configuration;
use crate::domain::generators::{ConcernDef, Contribution, GeneratedFile};
use crate::domain::render::RenderContext;

pub static LINTING: ConcernDef<()> = ConcernDef {
    key: (),
    bundle: "linting",
    directories: &[],
    files: linting_files,
    manifest: linting_manifest,
};

const PRETTIERRC: &str = r#"{
  "semi": true,
  "trailingComma": "es5",
  "singleQuote": true,
  "printWidth": 100,
  "tabWidth": 2,
  "useTabs": false,
  "arrowParens": "always",
  "endOfLine": "lf"
}
"#;

const PRETTIERIGNORE: &str = "node_modules/
dist/
build/
coverage/
.env*
*.log
*.tsbuildinfo
*.db
*.sqlite
prisma/migrations/
";

fn eslintrc(config: &Configuration) -> String {
    let doc = if config.is_typescript() {
        json!({
            "root": true,
            "parser": "@typescript-eslint/parser",
            "parserOptions": {
                "ecmaVersion": 2022,
                "sourceType": "module",
                "project": "./tsconfig.json"
            },
            "plugins": ["@typescript-eslint", "prettier"],
            "extends": [
                "eslint:recommended",
                "plugin:@typescript-eslint/recommended",
                "prettier"
            ],
            "rules": {
                "prettier/prettier": "error",
                "@typescript-eslint/no-unused-vars": ["error", { "argsIgnorePattern": "^_" }],
                "@typescript-eslint/no-explicit-any": "warn",
                "no-console": "off"
            },
            "env": { "node": true, "es2022": true },
            "ignorePatterns": ["dist/", "node_modules/", "*.config.*"]
        })
    } else {
        json!({
            "root": true,
            "parserOptions": { "ecmaVersion": 2022, "sourceType": "module" },
            "plugins": ["prettier"],
            "extends": ["eslint:recommended", "prettier"],
            "rules": {
                "prettier/prettier": "error",
                "no-unused-vars": ["error", { "argsIgnorePattern": "^_" }],
                "no-console": "off"
            },
            "env": { "node": true, "es2022": true, "jest": true },
            "ignorePatterns": ["node_modules/", "coverage/"]
        })
    };
    // Serializing a json! literal cannot fail.
    serde_json::to_string_pretty(&doc).unwrap_or_default() + "\n"
}

fn lintstagedrc(config: &Configuration) -> String {
    let pattern = if config.is_typescript() {
        "*.{ts,tsx}"
    } else {
        "*.{js,jsx}"
    };
    let doc = json!({
        pattern: ["eslint --fix", "prettier --write"],
        "*.{json,md}": ["prettier --write"]
    });
    serde_json::to_string_pretty(&doc).unwrap_or_default() + "\n"
}

fn linting_files(config: &Configuration, _ctx: &RenderContext) -> Vec<GeneratedFile> {
    vec![
        GeneratedFile::new(".eslintrc.json", eslintrc(config)),
        GeneratedFile::new(".prettierrc", PRETTIERRC),
        GeneratedFile::new(".prettierignore", PRETTIERIGNORE),
        GeneratedFile::new(".lintstagedrc.json", lintstagedrc(config)),
    ]
}

fn linting_manifest(config: &Configuration) -> Contribution {
    let target = if config.is_typescript() {
        "src/**/*.ts"
    } else {
        "**/*.js"
    };
    Contribution::for_config(config)
        .dev("eslint", "^8.55.0")
        .dev("prettier", "^3.1.0")
        .dev("eslint-plugin-prettier", "^5.0.1")
        .dev("eslint-config-prettier", "^9.1.0")
        .dev("lint-staged", "^15.2.0")
        .dev("husky", "^8.0.3")
        .ts_dev("@typescript-eslint/parser", "^6.15.0")
        .ts_dev("@typescript-eslint/eslint-plugin", "^6.15.0")
        .script("lint", format!("eslint \"{target}\""))
        .script("lint:fix", format!("eslint \"{target}\" --fix"))
        .script("format", "prettier --write .")
        .script("prepare", "husky install")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigurationDraft;
    use crate::domain::generators::context_for;
    use crate::domain::generators::test_support::*;

    #[test]
    fn emits_four_config_files() {
        let config = resolve(full_stack());
        let files = (LINTING.files)(&config, &context_for(&config));
        let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![".eslintrc.json", ".prettierrc", ".prettierignore", ".lintstagedrc.json"]
        );
    }

    #[test]
    fn typescript_uses_the_typescript_parser() {
        let ts = eslintrc(&resolve(full_stack()));
        assert!(ts.contains("@typescript-eslint/parser"));

        let js = eslintrc(&resolve(ConfigurationDraft {
            linting: Some(true),
            ..minimal_js()
        }));
        assert!(!js.contains("@typescript-eslint"));
    }

    #[test]
    fn lint_staged_pattern_follows_language() {
        let out: serde_json::Value =
            serde_json::from_str(&lintstagedrc(&resolve(full_stack()))).unwrap();
        assert!(out.get("*.{ts,tsx}").is_some());
    }
}
