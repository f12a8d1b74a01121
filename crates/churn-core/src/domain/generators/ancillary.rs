//! `.gitignore` and `README.md` for backend projects.

use crate::domain::configuration::Configuration;
use crate::domain::render::RenderContext;
use crate::domain::value_objects::{Database, Orm, Protocol};

const GITIGNORE_BASE: &str = "# Dependencies
node_modules/

# Build output
dist/
build/

# Environment
.env
.env.local
.env.*.local

# Logs
logs/
*.log
npm-debug.log*
yarn-debug.log*
yarn-error.log*
pnpm-debug.log*

# Coverage
coverage/
.nyc_output/

# Caches
.cache/
.eslintcache

# Editors
.vscode/
.idea/
*.swp
*.swo

# OS
.DS_Store
Thumbs.db
";

pub fn gitignore(config: &Configuration) -> String {
    let mut out = GITIGNORE_BASE.to_string();
    if config.is_typescript() {
        out.push_str("\n# TypeScript\n*.tsbuildinfo\n");
    }
    match config.orm() {
        Orm::Prisma => out.push_str("\n# Prisma\nprisma/migrations/\n"),
        Orm::Drizzle => out.push_str("\n# Drizzle\ndrizzle/\n"),
        _ => {}
    }
    if config.database() == Some(Database::Sqlite) {
        out.push_str("\n# SQLite\n*.db\n*.db-journal\n");
    }
    out
}

const README: &str = "# {{PROJECT_NAME}}

A Churn backend project built with {{LANGUAGE_NAME}}.

## Stack

{{FEATURES}}
## Getting Started

1. Install dependencies:

   ```bash
   {{INSTALL_CMD}}
   ```

2. Copy the environment template and adjust it:

   ```bash
   cp .env.example .env
   ```

3. Start the development server:

   ```bash
   {{DEV_CMD}}
   ```
{{DATABASE_SECTION}}
## Available Scripts

- `{{DEV_CMD}}` - start the development server
- `{{BUILD_CMD}}` - build for production
- `{{START_CMD}}` - start the production server
- `{{TEST_CMD}}` - run the test suite

## Learn More

- [Churn](https://github.com/Basharkhan7776/Churn)
";

pub fn readme(config: &Configuration, ctx: &RenderContext) -> String {
    let mut features = vec![
        format!("- **Language**: {}", config.language().display_name()),
        format!("- **Package Manager**: {}", config.package_manager()),
        format!("- **Protocol**: {}", config.protocol().display_name()),
    ];
    if config.protocol() == Protocol::Http {
        features.push(format!("- **CORS**: {}", on_off(config.cors())));
    }
    if let Some(db) = config.database() {
        features.push(format!(
            "- **ORM**: {} ({})",
            config.orm().display_name(),
            db.display_name()
        ));
    }
    if config.is_typescript() {
        features.push(format!("- **Path Aliases**: {}", on_off(config.aliases())));
    }
    features.push(format!("- **Authentication**: {}", config.auth()));
    features.push(format!("- **Testing**: {}", config.testing()));
    features.push(format!("- **Linting**: {}", on_off(config.linting())));
    features.push(format!("- **Docker**: {}", on_off(config.docker())));
    features.push(format!("- **CI/CD**: {}", config.cicd()));

    let database_section = match config.orm() {
        Orm::Prisma => "\n## Database\n\nEdit `prisma/schema.prisma`, then run:\n\n```bash\n{{EXEC}} prisma migrate dev\n```\n".to_string(),
        Orm::Drizzle => format!(
            "\n## Database\n\nEdit `src/db/schema.{{{{EXT}}}}`, then push the schema:\n\n```bash\n{}\n```\n",
            config.package_manager().run_script("db:push")
        ),
        Orm::None => String::new(),
        orm => format!(
            "\n## Database\n\nSet `DATABASE_URL` in `.env`. {} models live under `src/`.\n",
            orm.display_name()
        ),
    };

    let template = README
        .replace("{{FEATURES}}", &(features.join("\n") + "\n"))
        .replace("{{DATABASE_SECTION}}", &database_section);
    ctx.render(&template)
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}
