//! Test framework bundles: runner config plus `__tests__/api.test.<ext>`.

use crate::domain::configuration::Configuration;
use crate::domain::generators::{ConcernDef, Contribution, GeneratedFile};
use crate::domain::render::RenderContext;
use crate::domain::value_objects::{Orm, Protocol, TestingFramework};

pub static TESTING_FRAMEWORKS: &[ConcernDef<TestingFramework>] = &[
    ConcernDef {
        key: TestingFramework::Jest,
        bundle: "testing:jest",
        directories: &["__tests__"],
        files: jest_files,
        manifest: jest_manifest,
    },
    ConcernDef {
        key: TestingFramework::Vitest,
        bundle: "testing:vitest",
        directories: &["__tests__"],
        files: vitest_files,
        manifest: vitest_manifest,
    },
];

/// Jest needs the VM modules flag to load ESM packages.
const JEST_ESM: &str = "node --experimental-vm-modules node_modules/jest/bin/jest.js";

fn jest_files(config: &Configuration, _ctx: &RenderContext) -> Vec<GeneratedFile> {
    let jest_config = if config.is_typescript() {
        let alias = if config.uses_path_aliases() {
            "\n    '^@/(.*)\\\\.js$': '<rootDir>/src/$1',\n    '^@/(.*)$': '<rootDir>/src/$1',"
        } else {
            ""
        };
        format!(
            r#"/** @type {{import('jest').Config}} */
export default {{
  preset: 'ts-jest/presets/default-esm',
  testEnvironment: 'node',
  extensionsToTreatAsEsm: ['.ts'],
  testMatch: ['**/__tests__/**/*.test.ts'],
  moduleNameMapper: {{{alias}
    '^(\\.{{1,2}}/.*)\\.js$': '$1',
  }},
  transform: {{
    '^.+\\.ts$': ['ts-jest', {{ useESM: true }}],
  }},
  collectCoverageFrom: ['src/**/*.ts', '!src/**/*.d.ts'],
  coverageDirectory: 'coverage',
  coverageReporters: ['text', 'lcov', 'html'],
}};
"#
        )
    } else {
        r#"/** @type {import('jest').Config} */
export default {
  testEnvironment: 'node',
  testMatch: ['**/__tests__/**/*.test.js'],
  transform: {},
  collectCoverageFrom: ['**/*.js', '!**/node_modules/**', '!**/coverage/**', '!*.config.js'],
  coverageDirectory: 'coverage',
  coverageReporters: ['text', 'lcov', 'html'],
};
"#
        .to_string()
    };
    vec![
        GeneratedFile::new("jest.config.js", jest_config),
        api_test(config, TestingFramework::Jest),
    ]
}

fn jest_manifest(config: &Configuration) -> Contribution {
    Contribution::for_config(config)
        .dev("jest", "^29.7.0")
        .dev("supertest", "^6.3.3")
        .ts_dev("ts-jest", "^29.1.0")
        .ts_dev("@types/jest", "^29.5.0")
        .ts_dev("@types/supertest", "^6.0.0")
        .script("test", JEST_ESM)
        .script("test:coverage", format!("{JEST_ESM} --coverage"))
}

fn vitest_files(config: &Configuration, _ctx: &RenderContext) -> Vec<GeneratedFile> {
    let (header, alias) = if config.uses_path_aliases() {
        (
            "import { fileURLToPath } from 'node:url';\nimport { defineConfig } from 'vitest/config';\n",
            "\n  resolve: {\n    alias: {\n      '@': fileURLToPath(new URL('./src', import.meta.url)),\n    },\n  },",
        )
    } else {
        ("import { defineConfig } from 'vitest/config';\n", "")
    };
    let vitest_config = format!(
        r#"{header}
export default defineConfig({{{alias}
  test: {{
    globals: true,
    environment: 'node',
    include: ['__tests__/**/*.test.{{ts,js}}'],
    coverage: {{
      provider: 'v8',
      reporter: ['text', 'json', 'html'],
      exclude: ['node_modules/', 'dist/', '**/*.d.ts', '__tests__/**'],
    }},
  }},
}});
"#
    );
    vec![
        GeneratedFile::new("vitest.config.ts", vitest_config),
        api_test(config, TestingFramework::Vitest),
    ]
}

fn vitest_manifest(config: &Configuration) -> Contribution {
    Contribution::for_config(config)
        .dev("vitest", "^1.0.0")
        .dev("@vitest/coverage-v8", "^1.0.0")
        .dev("supertest", "^6.3.3")
        .ts_dev("@types/supertest", "^6.0.0")
        .script("test", "vitest run")
        .script("test:watch", "vitest")
        .script("test:coverage", "vitest run --coverage")
}

/// Entrypoint import as seen from `__tests__/`.
fn entry_import(config: &Configuration) -> &'static str {
    if config.is_typescript() {
        "../src/index.js"
    } else {
        "../index.js"
    }
}

fn api_test(config: &Configuration, framework: TestingFramework) -> GeneratedFile {
    let path = format!("__tests__/api.test.{}", config.ext());
    let globals = match (framework, config.protocol()) {
        (TestingFramework::Vitest, Protocol::Http) => {
            "import { describe, it, expect } from 'vitest';\n"
        }
        (TestingFramework::Vitest, Protocol::Ws) => {
            "import { describe, it, expect, afterAll } from 'vitest';\n"
        }
        _ => "",
    };

    let body = match config.protocol() {
        Protocol::Http => {
            let health = if config.orm() == Orm::None {
                "    expect(response.status).toBe(200);\n    expect(response.body.status).toBe('ok');"
            } else {
                "    expect([200, 500]).toContain(response.status);\n    expect(response.body).toHaveProperty('status');"
            };
            format!(
                r#"{globals}import request from 'supertest';
import {{ app }} from '{entry}';

describe('GET /', () => {{
  it('returns the greeting', async () => {{
    const response = await request(app).get('/');
    expect(response.status).toBe(200);
    expect(response.body).toHaveProperty('message');
  }});
}});

describe('GET /health', () => {{
  it('reports service status', async () => {{
    const response = await request(app).get('/health');
{health}
  }});
}});
"#,
                entry = entry_import(config),
            )
        }
        Protocol::Ws => {
            let promise = if config.is_typescript() {
                "new Promise<string>"
            } else {
                "new Promise"
            };
            format!(
                r#"{globals}import WebSocket from 'ws';
import {{ wss }} from '{entry}';

const url = `ws://localhost:${{process.env.PORT || 3000}}`;

afterAll(() => {{
  wss.close();
}});

describe('WebSocket server', () => {{
  it('echoes messages back', async () => {{
    const ws = new WebSocket(url);
    const reply = await {promise}((resolve, reject) => {{
      ws.on('open', () => ws.send('ping'));
      ws.on('message', (data) => resolve(data.toString()));
      ws.on('error', reject);
    }});
    ws.close();
    expect(reply).toBe('ping');
  }});
}});
"#,
                entry = entry_import(config),
            )
        }
    };
    GeneratedFile::new(path, body)
}
