//! Container setup: multi-stage `Dockerfile`, `docker-compose.yml` with a
//! database service when one applies, and `.dockerignore`.

use crate::domain::configuration::Configuration;
use crate::domain::generators::{ConcernDef, GeneratedFile, no_contribution};
use crate::domain::render::RenderContext;
use crate::domain::value_objects::{AuthStrategy, Database, Orm, PackageManager, Protocol};

pub static DOCKER: ConcernDef<()> = ConcernDef {
    key: (),
    bundle: "docker",
    directories: &[],
    files: docker_files,
    manifest: no_contribution,
};

const DOCKERIGNORE: &str = "node_modules/
npm-debug.log
yarn-error.log
dist/
build/
coverage/
.env
.env.*
!.env.example
.git/
.vscode/
.idea/
.DS_Store
__tests__/
**/*.test.*
Dockerfile
docker-compose.yml
.dockerignore
*.db
*.sqlite
logs/
*.log
";

fn docker_files(config: &Configuration, _ctx: &RenderContext) -> Vec<GeneratedFile> {
    vec![
        GeneratedFile::new("Dockerfile", dockerfile(config)),
        GeneratedFile::new("docker-compose.yml", compose(config)),
        GeneratedFile::new(".dockerignore", DOCKERIGNORE),
    ]
}

fn production_install(pm: PackageManager) -> &'static str {
    match pm {
        PackageManager::Bun => "bun install --production --frozen-lockfile",
        PackageManager::Yarn => "yarn install --production --frozen-lockfile",
        PackageManager::Pnpm => "pnpm install --prod --frozen-lockfile",
        PackageManager::Npm => "npm ci --omit=dev",
    }
}

/// JavaScript projects only have a `src/` tree when a concern put one there.
fn has_src_tree(config: &Configuration) -> bool {
    config.is_typescript() || config.orm() != Orm::None || config.auth() != AuthStrategy::None
}

pub fn dockerfile(config: &Configuration) -> String {
    let pm = config.package_manager();
    let bun = pm == PackageManager::Bun;
    let compiles = config.is_typescript() && !bun;
    let image = if bun { "oven/bun:1" } else { "node:20-alpine" };
    let corepack = matches!(pm, PackageManager::Yarn | PackageManager::Pnpm);

    let mut out = Vec::new();
    let stage_header = |out: &mut Vec<String>, from: String| {
        out.push(from);
        out.push(String::new());
        out.push("WORKDIR /app".into());
        if corepack {
            out.push("RUN corepack enable".into());
        }
        out.push(String::new());
    };

    out.push("# Build stage".into());
    stage_header(&mut out, format!("FROM {image} AS builder"));
    out.push(format!("COPY package.json {} ./", pm.lockfile()));
    out.push(format!("RUN {}", pm.frozen_install()));
    out.push(String::new());
    out.push("COPY . .".into());
    if config.orm() == Orm::Prisma {
        out.push(format!("RUN {} prisma generate", pm.exec_prefix()));
    }
    if compiles {
        out.push(format!("RUN {}", pm.run_script("build")));
    }
    out.push(String::new());

    out.push("# Production stage".into());
    stage_header(&mut out, format!("FROM {image}"));
    out.push("ENV NODE_ENV=production".into());
    out.push(String::new());
    out.push(format!("COPY package.json {} ./", pm.lockfile()));
    out.push(format!("RUN {}", production_install(pm)));
    out.push(String::new());

    if compiles {
        out.push("COPY --from=builder /app/dist ./dist".into());
    } else {
        if has_src_tree(config) {
            out.push("COPY --from=builder /app/src ./src".into());
        }
        if !config.is_typescript() {
            out.push("COPY --from=builder /app/index.js ./index.js".into());
        }
    }
    if config.orm() == Orm::Prisma {
        out.push("COPY --from=builder /app/prisma ./prisma".into());
        out.push("COPY --from=builder /app/node_modules/.prisma ./node_modules/.prisma".into());
    }
    out.push(String::new());
    out.push("EXPOSE 3000".into());
    out.push(String::new());

    if config.protocol() == Protocol::Http {
        let probe = if bun {
            "bun -e \"fetch('http://localhost:3000/health').then((r) => process.exit(r.ok ? 0 : 1)).catch(() => process.exit(1))\""
        } else {
            "node -e \"fetch('http://localhost:3000/health').then((r) => process.exit(r.ok ? 0 : 1)).catch(() => process.exit(1))\""
        };
        out.push("HEALTHCHECK --interval=30s --timeout=3s --start-period=5s --retries=3 \\".into());
        out.push(format!("  CMD {probe}"));
        out.push(String::new());
    }

    let cmd = match (bun, config.is_typescript()) {
        (true, true) => r#"CMD ["bun", "run", "src/index.ts"]"#,
        (true, false) => r#"CMD ["bun", "index.js"]"#,
        (false, true) => r#"CMD ["node", "dist/index.js"]"#,
        (false, false) => r#"CMD ["node", "index.js"]"#,
    };
    out.push(cmd.into());
    out.join("\n") + "\n"
}

/// Compose service for databases that run in their own container.
struct DbService {
    image: &'static str,
    suffix: &'static str,
    port: u16,
    volume: &'static str,
    mount: &'static str,
    env: &'static [&'static str],
    healthcheck: &'static str,
}

fn db_service(db: Database) -> Option<DbService> {
    match db {
        Database::Postgresql => Some(DbService {
            image: "postgres:16-alpine",
            suffix: "postgres",
            port: 5432,
            volume: "postgres-data",
            mount: "/var/lib/postgresql/data",
            env: &[
                "POSTGRES_USER=${DB_USER:-user}",
                "POSTGRES_PASSWORD=${DB_PASSWORD:-password}",
                "POSTGRES_DB=${DB_NAME:-{{PROJECT_NAME}}}",
            ],
            healthcheck: r#"["CMD-SHELL", "pg_isready -U ${DB_USER:-user}"]"#,
        }),
        Database::Mysql => Some(DbService {
            image: "mysql:8",
            suffix: "mysql",
            port: 3306,
            volume: "mysql-data",
            mount: "/var/lib/mysql",
            env: &[
                "MYSQL_ROOT_PASSWORD=${DB_ROOT_PASSWORD:-rootpassword}",
                "MYSQL_USER=${DB_USER:-user}",
                "MYSQL_PASSWORD=${DB_PASSWORD:-password}",
                "MYSQL_DATABASE=${DB_NAME:-{{PROJECT_NAME}}}",
            ],
            healthcheck: r#"["CMD", "mysqladmin", "ping", "-h", "localhost"]"#,
        }),
        Database::Mongodb => Some(DbService {
            image: "mongo:7",
            suffix: "mongodb",
            port: 27017,
            volume: "mongodb-data",
            mount: "/data/db",
            env: &[
                "MONGO_INITDB_ROOT_USERNAME=${DB_USER:-admin}",
                "MONGO_INITDB_ROOT_PASSWORD=${DB_PASSWORD:-password}",
                "MONGO_INITDB_DATABASE=${DB_NAME:-{{PROJECT_NAME}}}",
            ],
            healthcheck: r#"["CMD", "mongosh", "--eval", "db.adminCommand('ping')"]"#,
        }),
        Database::Sqlite => None,
    }
}

pub fn compose(config: &Configuration) -> String {
    let name = config.project_name();
    let service = config.database().and_then(db_service);

    let mut out = vec![
        "services:".to_string(),
        "  app:".into(),
        "    build:".into(),
        "      context: .".into(),
        "      dockerfile: Dockerfile".into(),
        format!("    container_name: {name}"),
        "    ports:".into(),
        "      - \"3000:3000\"".into(),
        "    environment:".into(),
        "      - NODE_ENV=production".into(),
        "      - PORT=3000".into(),
    ];
    if config.database().is_some() {
        out.push("      - DATABASE_URL=${DATABASE_URL}".into());
    }

    match service {
        Some(db) => {
            out.push("    depends_on:".into());
            out.push("      db:".into());
            out.push("        condition: service_healthy".into());
            out.push("    networks:".into());
            out.push("      - app-network".into());
            out.push(String::new());
            out.push("  db:".into());
            out.push(format!("    image: {}", db.image));
            out.push(format!("    container_name: {name}-{}", db.suffix));
            out.push("    environment:".into());
            for var in db.env {
                out.push(format!("      - {}", var.replace("{{PROJECT_NAME}}", name)));
            }
            out.push("    ports:".into());
            out.push(format!("      - \"{0}:{0}\"", db.port));
            out.push("    volumes:".into());
            out.push(format!("      - {}:{}", db.volume, db.mount));
            out.push("    networks:".into());
            out.push("      - app-network".into());
            out.push("    healthcheck:".into());
            out.push(format!("      test: {}", db.healthcheck));
            out.push("      interval: 10s".into());
            out.push("      timeout: 5s".into());
            out.push("      retries: 5".into());
            out.push(String::new());
            out.push("volumes:".into());
            out.push(format!("  {}:", db.volume));
            out.push(String::new());
            out.push("networks:".into());
            out.push("  app-network:".into());
            out.push("    driver: bridge".into());
        }
        None => out.push("    restart: unless-stopped".into()),
    }
    out.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigurationDraft;
    use crate::domain::generators::test_support::*;

    #[test]
    fn bun_image_runs_typescript_directly() {
        let out = dockerfile(&resolve(full_stack()));
        assert!(out.contains("FROM oven/bun:1 AS builder"));
        assert!(out.contains("COPY package.json bun.lockb ./"));
        assert!(out.contains("RUN bun install --frozen-lockfile"));
        assert!(out.contains(r#"CMD ["bun", "run", "src/index.ts"]"#));
        assert!(out.contains("RUN bunx prisma generate"));
    }

    #[test]
    fn node_toolchains_build_and_copy_dist() {
        let out = dockerfile(&resolve(ConfigurationDraft {
            package_manager: Some(PackageManager::Pnpm),
            ..full_stack()
        }));
        assert!(out.contains("FROM node:20-alpine"));
        assert!(out.contains("RUN corepack enable"));
        assert!(out.contains("RUN pnpm build"));
        assert!(out.contains("COPY --from=builder /app/dist ./dist"));
        assert!(out.contains(r#"CMD ["node", "dist/index.js"]"#));
    }

    #[test]
    fn compose_adds_the_database_service() {
        let out = compose(&resolve(full_stack()));
        assert!(out.contains("image: postgres:16-alpine"));
        assert!(out.contains("POSTGRES_DB=${DB_NAME:-full-app}"));
        assert!(out.contains("condition: service_healthy"));
        assert!(!out.contains("restart: unless-stopped"));
    }

    #[test]
    fn sqlite_has_no_database_container() {
        let out = compose(&resolve(ConfigurationDraft {
            database: Some(Database::Sqlite),
            ..full_stack()
        }));
        assert!(!out.contains("  db:"));
        assert!(out.contains("restart: unless-stopped"));
        assert!(out.contains("DATABASE_URL"));
    }

    #[test]
    fn websocket_images_skip_the_http_healthcheck() {
        let out = dockerfile(&resolve(ConfigurationDraft {
            protocol: Some(Protocol::Ws),
            ..full_stack()
        }));
        assert!(!out.contains("HEALTHCHECK"));
    }
}
