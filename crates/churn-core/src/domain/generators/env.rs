//! `.env.example` and the zod-validated `src/env.ts`.

use crate::domain::configuration::Configuration;
use crate::domain::value_objects::{AuthStrategy, Database, Orm, Protocol};

/// Example `DATABASE_URL`. Prisma wants a `file:` URL for SQLite.
fn database_url(config: &Configuration) -> Option<String> {
    let db = config.database()?;
    Some(match (config.orm(), db) {
        (Orm::Prisma, Database::Sqlite) => "file:./dev.db".to_string(),
        _ => db.url_example().to_string(),
    })
}

fn wants_cors_origin(config: &Configuration) -> bool {
    config.protocol() == Protocol::Http && config.cors()
}

pub fn example(config: &Configuration) -> String {
    let mut out = String::from("# Application\nNODE_ENV=development\nPORT=3000\n");

    if let Some(url) = database_url(config) {
        out.push_str("\n# Database\n");
        out.push_str(&format!("DATABASE_URL={url}\n"));
    }

    match config.auth() {
        AuthStrategy::Jwt => out.push_str(
            "\n# JWT\nJWT_SECRET=your-super-secret-jwt-key-change-this-in-production\nJWT_EXPIRES_IN=7d\n",
        ),
        AuthStrategy::Oauth => out.push_str(
            "\n# OAuth\n\
             GOOGLE_CLIENT_ID=your-google-client-id\n\
             GOOGLE_CLIENT_SECRET=your-google-client-secret\n\
             GITHUB_CLIENT_ID=your-github-client-id\n\
             GITHUB_CLIENT_SECRET=your-github-client-secret\n\
             OAUTH_CALLBACK_URL=http://localhost:3000/auth/callback\n",
        ),
        AuthStrategy::Session => out.push_str(
            "\n# Session\nSESSION_SECRET=your-super-secret-session-key-change-this-in-production\n",
        ),
        AuthStrategy::None => {}
    }

    if wants_cors_origin(config) {
        out.push_str("\n# CORS\nCORS_ORIGIN=http://localhost:3000,http://localhost:5173\n");
    }
    out
}

/// `src/env.ts`: parses `process.env` once at startup.
pub fn validation_module(config: &Configuration) -> String {
    let mut fields = vec![
        "  NODE_ENV: z.enum(['development', 'production', 'test']).default('development'),",
        "  PORT: z.coerce.number().default(3000),",
    ];
    if config.database().is_some() {
        fields.push("  DATABASE_URL: z.string().optional(),");
    }
    match config.auth() {
        AuthStrategy::Jwt => {
            fields.push("  JWT_SECRET: z.string().optional(),");
            fields.push("  JWT_EXPIRES_IN: z.string().default('7d'),");
        }
        AuthStrategy::Oauth => {
            fields.push("  GOOGLE_CLIENT_ID: z.string().optional(),");
            fields.push("  GOOGLE_CLIENT_SECRET: z.string().optional(),");
            fields.push("  GITHUB_CLIENT_ID: z.string().optional(),");
            fields.push("  GITHUB_CLIENT_SECRET: z.string().optional(),");
            fields.push("  OAUTH_CALLBACK_URL: z.string().optional(),");
        }
        AuthStrategy::Session => fields.push("  SESSION_SECRET: z.string().optional(),"),
        AuthStrategy::None => {}
    }
    if wants_cors_origin(config) {
        fields.push("  CORS_ORIGIN: z.string().optional(),");
    }

    format!(
        "import {{ z }} from 'zod';\n\n\
         const envSchema = z.object({{\n{}\n}});\n\n\
         export const env = envSchema.parse(process.env);\n\n\
         export type Env = z.infer<typeof envSchema>;\n",
        fields.join("\n")
    )
}
