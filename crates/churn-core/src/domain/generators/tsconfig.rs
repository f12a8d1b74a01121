//! `tsconfig.json`.
//!
//! Bun projects type-check only (`noEmit`) and let Bun transpile. Node
//! toolchains compile `src/` into `dist/` with NodeNext resolution.

use serde_json::{Value, json};

use crate::domain::configuration::Configuration;
use crate::domain::value_objects::{Orm, PackageManager};
use crate::error::{ChurnResult, Context};

pub fn generate(config: &Configuration) -> ChurnResult<String> {
    let mut json = serde_json::to_string_pretty(&document(config))
        .context("serializing tsconfig.json")?;
    json.push('\n');
    Ok(json)
}

fn document(config: &Configuration) -> Value {
    let bun = config.package_manager() == PackageManager::Bun;

    let mut options = json!({
        "target": "ES2022",
        "strict": true,
        "esModuleInterop": true,
        "skipLibCheck": true,
        "forceConsistentCasingInFileNames": true,
        "resolveJsonModule": true,
        "isolatedModules": true,
        "noUnusedLocals": true,
        "noUnusedParameters": true,
        "noFallthroughCasesInSwitch": true,
    });

    let extra = if bun {
        json!({
            "module": "ESNext",
            "moduleResolution": "bundler",
            "noEmit": true,
            "types": ["bun-types"],
        })
    } else {
        json!({
            "module": "NodeNext",
            "moduleResolution": "NodeNext",
            "outDir": "./dist",
            "rootDir": "./src",
            "sourceMap": true,
            "types": ["node"],
        })
    };
    merge(&mut options, extra);

    if config.orm() == Orm::Typeorm {
        merge(
            &mut options,
            json!({ "experimentalDecorators": true, "emitDecoratorMetadata": true }),
        );
    }

    if config.uses_path_aliases() {
        merge(
            &mut options,
            json!({ "baseUrl": ".", "paths": { "@/*": ["src/*"] } }),
        );
    }

    let include = if bun {
        json!(["src/**/*.ts", "__tests__/**/*.ts"])
    } else {
        json!(["src/**/*.ts"])
    };

    json!({
        "compilerOptions": options,
        "include": include,
        "exclude": ["node_modules", "dist"],
    })
}

fn merge(target: &mut Value, extra: Value) {
    if let (Value::Object(target), Value::Object(extra)) = (target, extra) {
        target.extend(extra);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigurationDraft;
    use crate::domain::generators::test_support::*;

    fn options(draft: ConfigurationDraft) -> Value {
        document(&resolve(draft))["compilerOptions"].clone()
    }

    #[test]
    fn aliases_add_the_src_path_mapping() {
        let opts = options(full_stack());
        assert_eq!(opts["baseUrl"], ".");
        assert_eq!(opts["paths"]["@/*"], json!(["src/*"]));
    }

    #[test]
    fn aliases_disabled_leave_no_paths() {
        let opts = options(ConfigurationDraft {
            aliases: Some(false),
            ..full_stack()
        });
        assert!(opts.get("paths").is_none());
        assert!(opts.get("baseUrl").is_none());
    }

    #[test]
    fn node_toolchains_emit_into_dist() {
        let opts = options(ConfigurationDraft {
            package_manager: Some(PackageManager::Npm),
            ..full_stack()
        });
        assert_eq!(opts["outDir"], "./dist");
        assert_eq!(opts["module"], "NodeNext");
        assert!(opts.get("noEmit").is_none());
    }

    #[test]
    fn typeorm_enables_decorators() {
        let opts = options(ConfigurationDraft {
            orm: Some(Orm::Typeorm),
            ..full_stack()
        });
        assert_eq!(opts["experimentalDecorators"], true);
    }

    #[test]
    fn output_is_valid_json() {
        let text = generate(&resolve(full_stack())).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["compilerOptions"]["strict"], true);
    }
}
