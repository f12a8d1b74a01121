//! Server entrypoint (`src/index.ts` or `index.js`).
//!
//! The file is assembled from fragments: imports, setup, middleware, routes
//! and the listen tail. ORM rows contribute a [`HealthProbe`] that turns
//! `/health` into a database check.

use crate::domain::configuration::Configuration;
use crate::domain::generators::orm;
use crate::domain::value_objects::Protocol;

/// Database check spliced into the `/health` handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthProbe {
    pub imports: Vec<String>,
    pub setup: Vec<String>,
    /// Statements run inside the handler's `try` block.
    pub check: Vec<String>,
}

/// Import specifier for a project module, as seen from the entrypoint.
///
/// `module` is relative to `src/` and has no extension. Specifiers carry
/// `.js` so they resolve under Node ESM, Bun and TypeScript alike.
pub fn import_path(config: &Configuration, module: &str) -> String {
    if config.is_typescript() {
        format!("./{module}.js")
    } else {
        format!("./src/{module}.js")
    }
}

pub fn generate(config: &Configuration) -> String {
    let out = match config.protocol() {
        Protocol::Http => http_server(config),
        Protocol::Ws => ws_server(config),
    };
    out.join("\n") + "\n"
}

fn http_server(config: &Configuration) -> Vec<String> {
    let ts = config.is_typescript();
    let probe = orm::def(config.orm()).map(|def| (def.probe)(config));
    let params = if ts {
        "(_req: Request, res: Response)"
    } else {
        "(_req, res)"
    };

    let mut out = vec!["import express from 'express';".to_string()];
    if ts {
        out.push("import type { Request, Response } from 'express';".into());
    }
    if config.cors() {
        out.push("import cors from 'cors';".into());
    }
    if let Some(probe) = &probe {
        out.extend(probe.imports.iter().cloned());
    }
    if ts {
        out.push(format!("import {{ env }} from '{}';", import_path(config, "env")));
    }
    out.push(String::new());

    if let Some(probe) = probe.as_ref().filter(|p| !p.setup.is_empty()) {
        out.extend(probe.setup.iter().cloned());
        out.push(String::new());
    }

    out.push("const app = express();".into());
    out.push(port_line(config));
    out.push(String::new());

    if config.cors() {
        out.push("app.use(cors());".into());
    }
    out.push("app.use(express.json());".into());
    out.push(String::new());

    out.push(format!("app.get('/', {params} => {{"));
    out.push("  res.json({ message: 'Hello from Churn!' });".into());
    out.push("});".into());
    out.push(String::new());

    match &probe {
        Some(probe) => {
            out.push(format!("app.get('/health', async {params} => {{"));
            out.push("  try {".into());
            out.extend(probe.check.iter().map(|line| format!("    {line}")));
            out.push("    res.json({ status: 'ok', database: 'connected' });".into());
            out.push("  } catch (error) {".into());
            out.push("    console.error('Health check failed:', error);".into());
            out.push(
                "    res.status(500).json({ status: 'error', message: 'Database connection failed' });"
                    .into(),
            );
            out.push("  }".into());
            out.push("});".into());
        }
        None => {
            out.push(format!("app.get('/health', {params} => {{"));
            out.push("  res.json({ status: 'ok' });".into());
            out.push("});".into());
        }
    }
    out.push(String::new());

    out.push("if (process.env.NODE_ENV !== 'test') {".into());
    out.push("  app.listen(PORT, () => {".into());
    out.push("    console.log(`Server running on http://localhost:${PORT}`);".into());
    out.push("  });".into());
    out.push("}".into());
    out.push(String::new());
    out.push("export { app };".into());
    out
}

fn ws_server(config: &Configuration) -> Vec<String> {
    let ts = config.is_typescript();
    let mut out = vec!["import { WebSocketServer } from 'ws';".to_string()];
    if ts {
        out.push("import type { RawData, WebSocket } from 'ws';".into());
        out.push(format!("import {{ env }} from '{}';", import_path(config, "env")));
    }
    out.push(String::new());
    out.push(port_line(config));
    out.push("const wss = new WebSocketServer({ port: Number(PORT) });".into());
    out.push(String::new());

    let (socket, data) = if ts {
        ("(ws: WebSocket)", "(data: RawData)")
    } else {
        ("(ws)", "(data)")
    };
    out.push(format!("wss.on('connection', {socket} => {{"));
    out.push("  console.log('Client connected');".into());
    out.push(String::new());
    out.push(format!("  ws.on('message', {data} => {{"));
    out.push("    ws.send(data.toString());".into());
    out.push("  });".into());
    out.push(String::new());
    out.push("  ws.on('close', () => {".into());
    out.push("    console.log('Client disconnected');".into());
    out.push("  });".into());
    out.push("});".into());
    out.push(String::new());
    out.push("console.log(`WebSocket server running on ws://localhost:${PORT}`);".into());
    out.push(String::new());
    out.push("export { wss };".into());
    out
}

fn port_line(config: &Configuration) -> String {
    if config.is_typescript() {
        "const PORT = env.PORT;".into()
    } else {
        "const PORT = process.env.PORT || 3000;".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigurationDraft;
    use crate::domain::generators::test_support::*;
    use crate::domain::value_objects::*;

    #[test]
    fn full_stack_entry_probes_prisma() {
        let src = generate(&resolve(full_stack()));
        assert!(src.contains("import cors from 'cors';"));
        assert!(src.contains("app.use(cors());"));
        assert!(src.contains("import { PrismaClient } from '@prisma/client';"));
        assert!(src.contains("await prisma.$queryRaw`SELECT 1`;"));
        assert!(src.contains("'Database connection failed'"));
        assert!(src.contains("process.env.NODE_ENV !== 'test'"));
        assert!(src.contains("export { app };"));
    }

    #[test]
    fn cors_disabled_leaves_no_trace() {
        let src = generate(&resolve(ConfigurationDraft {
            cors: Some(false),
            ..full_stack()
        }));
        assert!(!src.contains("cors"));
    }

    #[test]
    fn minimal_entry_has_plain_health_route() {
        let src = generate(&resolve(minimal_js()));
        assert!(src.contains("app.get('/health', (_req, res) => {"));
        assert!(src.contains("const PORT = process.env.PORT || 3000;"));
        assert!(!src.contains("Request"));
        assert!(!src.contains("Database"));
    }

    #[test]
    fn websocket_entry_echoes_messages() {
        let src = generate(&resolve(ConfigurationDraft {
            protocol: Some(Protocol::Ws),
            ..full_stack()
        }));
        assert!(src.contains("new WebSocketServer"));
        assert!(src.contains("ws.send(data.toString());"));
        assert!(src.contains("export { wss };"));
        assert!(!src.contains("express"));
        assert!(!src.contains("cors"));
    }

    #[test]
    fn mongodb_prisma_pings_instead_of_select() {
        let src = generate(&resolve(ConfigurationDraft {
            database: Some(Database::Mongodb),
            ..full_stack()
        }));
        assert!(src.contains("$runCommandRaw({ ping: 1 })"));
        assert!(!src.contains("SELECT 1"));
    }

    #[test]
    fn javascript_imports_reach_into_src() {
        let config = resolve(ConfigurationDraft {
            language: Some(Language::Js),
            orm: Some(Orm::Sequelize),
            ..full_stack()
        });
        assert_eq!(import_path(&config, "db/index"), "./src/db/index.js");
        assert!(generate(&config).contains("from './src/config/database.js'"));
    }
}
