//! ORM bundles: schema, client module, driver dependencies and the health
//! probe spliced into the HTTP entrypoint.

use crate::domain::configuration::Configuration;
use crate::domain::generators::entrypoint::{HealthProbe, import_path};
use crate::domain::generators::{ConcernDef, Contribution, GeneratedFile};
use crate::domain::render::RenderContext;
use crate::domain::value_objects::{Database, Orm};

/// An ORM row: the generic concern plus its `/health` check.
pub struct OrmDef {
    pub concern: ConcernDef<Orm>,
    pub probe: fn(&Configuration) -> HealthProbe,
}

pub static ORMS: &[OrmDef] = &[
    OrmDef {
        concern: ConcernDef {
            key: Orm::Prisma,
            bundle: "orm:prisma",
            directories: &["prisma"],
            files: prisma_files,
            manifest: prisma_manifest,
        },
        probe: prisma_probe,
    },
    OrmDef {
        concern: ConcernDef {
            key: Orm::Drizzle,
            bundle: "orm:drizzle",
            directories: &["src/db"],
            files: drizzle_files,
            manifest: drizzle_manifest,
        },
        probe: drizzle_probe,
    },
    OrmDef {
        concern: ConcernDef {
            key: Orm::Typeorm,
            bundle: "orm:typeorm",
            directories: &["src/config", "src/entities"],
            files: typeorm_files,
            manifest: typeorm_manifest,
        },
        probe: typeorm_probe,
    },
    OrmDef {
        concern: ConcernDef {
            key: Orm::Sequelize,
            bundle: "orm:sequelize",
            directories: &["src/config", "src/models"],
            files: sequelize_files,
            manifest: sequelize_manifest,
        },
        probe: sequelize_probe,
    },
    OrmDef {
        concern: ConcernDef {
            key: Orm::Mongoose,
            bundle: "orm:mongoose",
            directories: &["src/db", "src/models"],
            files: mongoose_files,
            manifest: mongoose_manifest,
        },
        probe: mongoose_probe,
    },
];

/// Row for `orm`, or `None` when no ORM is selected.
pub fn def(orm: Orm) -> Option<&'static OrmDef> {
    ORMS.iter().find(|def| def.concern.key == orm)
}

/// Resolution always pairs an ORM with a database; postgres is the fallback.
fn database(config: &Configuration) -> Database {
    config.database().unwrap_or(Database::Postgresql)
}

fn lines(src: &[&str]) -> Vec<String> {
    src.iter().map(|line| line.to_string()).collect()
}

// Prisma

fn prisma_files(config: &Configuration, _ctx: &RenderContext) -> Vec<GeneratedFile> {
    let db = database(config);
    let id = if db == Database::Mongodb {
        "String   @id @default(auto()) @map(\"_id\") @db.ObjectId"
    } else {
        "Int      @id @default(autoincrement())"
    };
    let schema = format!(
        r#"// Prisma schema. Docs: https://pris.ly/d/prisma-schema

generator client {{
  provider = "prisma-client-js"
}}

datasource db {{
  provider = "{provider}"
  url      = env("DATABASE_URL")
}}

model User {{
  id        {id}
  email     String   @unique
  name      String?
  createdAt DateTime @default(now())
  updatedAt DateTime @updatedAt
}}
"#,
        provider = db.as_str(),
    );
    vec![GeneratedFile::new("prisma/schema.prisma", schema)]
}

fn prisma_manifest(config: &Configuration) -> Contribution {
    Contribution::for_config(config)
        .dep("@prisma/client", "^5.0.0")
        .dev("prisma", "^5.0.0")
        .script("db:generate", "prisma generate")
        .script("db:push", "prisma db push")
        .script("db:migrate", "prisma migrate dev")
        .script("db:studio", "prisma studio")
}

fn prisma_probe(config: &Configuration) -> HealthProbe {
    let check = if database(config) == Database::Mongodb {
        "await prisma.$runCommandRaw({ ping: 1 });"
    } else {
        "await prisma.$queryRaw`SELECT 1`;"
    };
    HealthProbe {
        imports: lines(&["import { PrismaClient } from '@prisma/client';"]),
        setup: lines(&["const prisma = new PrismaClient();"]),
        check: lines(&[check]),
    }
}

// Drizzle

/// drizzle-kit dialect suffix and driver name.
fn drizzle_kit(db: Database) -> (&'static str, &'static str) {
    match db {
        Database::Mysql => ("mysql", "mysql2"),
        Database::Sqlite => ("sqlite", "better-sqlite3"),
        _ => ("pg", "pg"),
    }
}

fn drizzle_files(config: &Configuration, _ctx: &RenderContext) -> Vec<GeneratedFile> {
    let db = database(config);
    let ext = config.ext();

    let schema = match db {
        Database::Mysql => {
            r#"import { mysqlTable, serial, varchar, timestamp } from 'drizzle-orm/mysql-core';

export const users = mysqlTable('users', {
  id: serial('id').primaryKey(),
  name: varchar('name', { length: 255 }).notNull(),
  email: varchar('email', { length: 255 }).notNull().unique(),
  createdAt: timestamp('created_at').defaultNow().notNull(),
});
"#
        }
        Database::Sqlite => {
            r#"import { sqliteTable, integer, text } from 'drizzle-orm/sqlite-core';

export const users = sqliteTable('users', {
  id: integer('id').primaryKey({ autoIncrement: true }),
  name: text('name').notNull(),
  email: text('email').notNull().unique(),
  createdAt: integer('created_at', { mode: 'timestamp' }).notNull(),
});
"#
        }
        _ => {
            r#"import { pgTable, serial, text, timestamp } from 'drizzle-orm/pg-core';

export const users = pgTable('users', {
  id: serial('id').primaryKey(),
  name: text('name').notNull(),
  email: text('email').notNull().unique(),
  createdAt: timestamp('created_at').defaultNow().notNull(),
});
"#
        }
    };

    let client = match db {
        Database::Mysql => {
            r#"import { drizzle } from 'drizzle-orm/mysql2';
import mysql from 'mysql2/promise';
import * as schema from './schema.js';

const poolConnection = mysql.createPool({
  uri: process.env.DATABASE_URL,
});

export const db = drizzle(poolConnection, { schema, mode: 'default' });
"#
        }
        Database::Sqlite => {
            r#"import { drizzle } from 'drizzle-orm/better-sqlite3';
import Database from 'better-sqlite3';
import * as schema from './schema.js';

const sqlite = new Database(process.env.DATABASE_URL || './sqlite.db');

export const db = drizzle(sqlite, { schema });
"#
        }
        _ => {
            r#"import { drizzle } from 'drizzle-orm/node-postgres';
import pg from 'pg';
import * as schema from './schema.js';

const pool = new pg.Pool({
  connectionString: process.env.DATABASE_URL,
});

export const db = drizzle(pool, { schema });
"#
        }
    };

    let (_, driver) = drizzle_kit(db);
    let credentials = if db == Database::Sqlite {
        "url: process.env.DATABASE_URL || './sqlite.db',"
    } else {
        "connectionString: process.env.DATABASE_URL!,"
    };
    let drizzle_config = format!(
        r#"import type {{ Config }} from 'drizzle-kit';

export default {{
  schema: './src/db/schema.{ext}',
  out: './drizzle',
  driver: '{driver}',
  dbCredentials: {{
    {credentials}
  }},
}} satisfies Config;
"#
    );

    vec![
        GeneratedFile::new(format!("src/db/schema.{ext}"), schema),
        GeneratedFile::new(format!("src/db/index.{ext}"), client),
        GeneratedFile::new("drizzle.config.ts", drizzle_config),
    ]
}

fn drizzle_manifest(config: &Configuration) -> Contribution {
    let db = database(config);
    let (dialect, _) = drizzle_kit(db);
    let c = Contribution::for_config(config)
        .dep("drizzle-orm", "^0.29.0")
        .dev("drizzle-kit", "^0.20.0")
        .script("db:generate", format!("drizzle-kit generate:{dialect}"))
        .script("db:push", format!("drizzle-kit push:{dialect}"))
        .script("db:studio", "drizzle-kit studio");
    match db {
        Database::Mysql => c.dep("mysql2", "^3.6.0"),
        Database::Sqlite => c
            .dep("better-sqlite3", "^9.2.0")
            .ts_dev("@types/better-sqlite3", "^7.6.8"),
        _ => c.dep("pg", "^8.11.0").ts_dev("@types/pg", "^8.10.9"),
    }
}

fn drizzle_probe(config: &Configuration) -> HealthProbe {
    let check = if database(config) == Database::Sqlite {
        "db.run(sql`SELECT 1`);"
    } else {
        "await db.execute(sql`SELECT 1`);"
    };
    HealthProbe {
        imports: vec![
            "import { sql } from 'drizzle-orm';".into(),
            format!("import {{ db }} from '{}';", import_path(config, "db/index")),
        ],
        setup: Vec::new(),
        check: lines(&[check]),
    }
}

// TypeORM

fn typeorm_type(db: Database) -> &'static str {
    match db {
        Database::Mysql => "mysql",
        Database::Sqlite => "better-sqlite3",
        Database::Mongodb => "mongodb",
        Database::Postgresql => "postgres",
    }
}

fn typeorm_files(config: &Configuration, _ctx: &RenderContext) -> Vec<GeneratedFile> {
    let db = database(config);
    let ext = config.ext();
    let target = if db == Database::Sqlite {
        "database: process.env.DATABASE_URL || './sqlite.db',"
    } else {
        "url: process.env.DATABASE_URL,"
    };
    let data_source = format!(
        r#"import 'reflect-metadata';
import {{ DataSource }} from 'typeorm';
import {{ User }} from '../entities/User.js';

export const AppDataSource = new DataSource({{
  type: '{kind}',
  {target}
  synchronize: process.env.NODE_ENV !== 'production',
  logging: process.env.NODE_ENV === 'development',
  entities: [User],
  migrations: ['src/migrations/**/*.{ext}'],
  subscribers: [],
}});
"#,
        kind = typeorm_type(db),
    );

    let entity = match (config.is_typescript(), db == Database::Mongodb) {
        (true, false) => {
            r#"import { Entity, PrimaryGeneratedColumn, Column, CreateDateColumn } from 'typeorm';

@Entity('users')
export class User {
  @PrimaryGeneratedColumn()
  id!: number;

  @Column({ type: 'varchar', length: 255 })
  name!: string;

  @Column({ type: 'varchar', length: 255, unique: true })
  email!: string;

  @CreateDateColumn()
  createdAt!: Date;
}
"#
        }
        (true, true) => {
            r#"import { Entity, ObjectIdColumn, ObjectId, Column, CreateDateColumn } from 'typeorm';

@Entity('users')
export class User {
  @ObjectIdColumn()
  _id!: ObjectId;

  @Column()
  name!: string;

  @Column({ unique: true })
  email!: string;

  @CreateDateColumn()
  createdAt!: Date;
}
"#
        }
        (false, mongo) => {
            if mongo {
                r#"import { EntitySchema } from 'typeorm';

export const User = new EntitySchema({
  name: 'User',
  tableName: 'users',
  columns: {
    _id: { type: 'objectId', objectId: true, primary: true },
    name: { type: String },
    email: { type: String, unique: true },
    createdAt: { type: Date, createDate: true },
  },
});
"#
            } else {
                r#"import { EntitySchema } from 'typeorm';

export const User = new EntitySchema({
  name: 'User',
  tableName: 'users',
  columns: {
    id: { type: Number, primary: true, generated: true },
    name: { type: 'varchar', length: 255 },
    email: { type: 'varchar', length: 255, unique: true },
    createdAt: { type: Date, createDate: true },
  },
});
"#
            }
        }
    };

    vec![
        GeneratedFile::new(format!("src/config/data-source.{ext}"), data_source),
        GeneratedFile::new(format!("src/entities/User.{ext}"), entity),
    ]
}

fn typeorm_manifest(config: &Configuration) -> Contribution {
    let c = Contribution::for_config(config)
        .dep("typeorm", "^0.3.17")
        .dep("reflect-metadata", "^0.1.13")
        .script("db:migration:generate", "typeorm migration:generate")
        .script("db:migration:run", "typeorm migration:run")
        .script("db:migration:revert", "typeorm migration:revert");
    match database(config) {
        Database::Mysql => c.dep("mysql2", "^3.6.0"),
        Database::Sqlite => c.dep("better-sqlite3", "^9.2.0"),
        Database::Mongodb => c.dep("mongodb", "^5.9.2"),
        Database::Postgresql => c.dep("pg", "^8.11.0"),
    }
}

fn typeorm_probe(config: &Configuration) -> HealthProbe {
    let mut check = lines(&[
        "if (!AppDataSource.isInitialized) {",
        "  await AppDataSource.initialize();",
        "}",
    ]);
    if database(config) != Database::Mongodb {
        check.push("await AppDataSource.query('SELECT 1');".into());
    }
    HealthProbe {
        imports: vec![
            "import 'reflect-metadata';".into(),
            format!(
                "import {{ AppDataSource }} from '{}';",
                import_path(config, "config/data-source")
            ),
        ],
        setup: Vec::new(),
        check,
    }
}

// Sequelize

fn sequelize_files(config: &Configuration, _ctx: &RenderContext) -> Vec<GeneratedFile> {
    let ext = config.ext();
    let dialect = match database(config) {
        Database::Mysql => "mysql",
        Database::Sqlite => "sqlite",
        _ => "postgres",
    };
    let connection = format!(
        r#"import {{ Sequelize }} from 'sequelize';

export const sequelize = new Sequelize(process.env.DATABASE_URL || '', {{
  dialect: '{dialect}',
  logging: process.env.NODE_ENV === 'development' ? console.log : false,
}});

export async function connectDB() {{
  try {{
    await sequelize.authenticate();
    console.log('[+] Database connection established successfully.');
  }} catch (error) {{
    console.error('[x] Unable to connect to the database:', error);
    process.exit(1);
  }}
}}
"#
    );

    let fields = if config.is_typescript() {
        "\n  declare id: number;\n  declare name: string;\n  declare email: string;\n  declare createdAt: Date;\n  declare updatedAt: Date;\n"
    } else {
        ""
    };
    let model = format!(
        r#"import {{ DataTypes, Model }} from 'sequelize';
import {{ sequelize }} from '../config/database.js';

export class User extends Model {{{fields}}}

User.init(
  {{
    id: {{
      type: DataTypes.INTEGER,
      autoIncrement: true,
      primaryKey: true,
    }},
    name: {{
      type: DataTypes.STRING(255),
      allowNull: false,
    }},
    email: {{
      type: DataTypes.STRING(255),
      allowNull: false,
      unique: true,
    }},
  }},
  {{
    sequelize,
    tableName: 'users',
    timestamps: true,
  }}
);
"#
    );

    vec![
        GeneratedFile::new(format!("src/config/database.{ext}"), connection),
        GeneratedFile::new(format!("src/models/User.{ext}"), model),
    ]
}

fn sequelize_manifest(config: &Configuration) -> Contribution {
    let c = Contribution::for_config(config)
        .dep("sequelize", "^6.35.0")
        .script("db:migrate", "sequelize db:migrate")
        .script("db:seed", "sequelize db:seed:all");
    match database(config) {
        Database::Mysql => c.dep("mysql2", "^3.6.0"),
        Database::Sqlite => c.dep("sqlite3", "^5.1.6"),
        _ => c.dep("pg", "^8.11.0").dep("pg-hstore", "^2.3.4"),
    }
}

fn sequelize_probe(config: &Configuration) -> HealthProbe {
    HealthProbe {
        imports: vec![format!(
            "import {{ sequelize }} from '{}';",
            import_path(config, "config/database")
        )],
        setup: Vec::new(),
        check: lines(&["await sequelize.authenticate();"]),
    }
}

// Mongoose

fn mongoose_files(config: &Configuration, _ctx: &RenderContext) -> Vec<GeneratedFile> {
    let ext = config.ext();
    let connection = r#"import mongoose from 'mongoose';

export async function connectDB() {
  try {
    await mongoose.connect(process.env.DATABASE_URL || 'mongodb://localhost:27017/churn');
    console.log('[+] MongoDB connected successfully');
  } catch (error) {
    console.error('[x] MongoDB connection error:', error);
    process.exit(1);
  }
}

mongoose.connection.on('disconnected', () => {
  console.log('MongoDB disconnected');
});

process.on('SIGINT', async () => {
  await mongoose.connection.close();
  process.exit(0);
});
"#;

    let model = if config.is_typescript() {
        r#"import mongoose, { Schema, Document } from 'mongoose';

export interface IUser extends Document {
  name: string;
  email: string;
  createdAt: Date;
}

const UserSchema = new Schema<IUser>(
  {
    name: { type: String, required: true },
    email: { type: String, required: true, unique: true },
  },
  { timestamps: true }
);

export const User = mongoose.model<IUser>('User', UserSchema);
"#
    } else {
        r#"import mongoose, { Schema } from 'mongoose';

const UserSchema = new Schema(
  {
    name: { type: String, required: true },
    email: { type: String, required: true, unique: true },
  },
  { timestamps: true }
);

export const User = mongoose.model('User', UserSchema);
"#
    };

    vec![
        GeneratedFile::new(format!("src/db/connection.{ext}"), connection),
        GeneratedFile::new(format!("src/models/User.{ext}"), model),
    ]
}

fn mongoose_manifest(config: &Configuration) -> Contribution {
    Contribution::for_config(config).dep("mongoose", "^8.0.0")
}

fn mongoose_probe(config: &Configuration) -> HealthProbe {
    HealthProbe {
        imports: vec![
            "import mongoose from 'mongoose';".into(),
            format!(
                "import {{ connectDB }} from '{}';",
                import_path(config, "db/connection")
            ),
        ],
        setup: lines(&["if (process.env.NODE_ENV !== 'test') {", "  connectDB();", "}"]),
        check: lines(&[
            "if (mongoose.connection.readyState !== 1) {",
            "  throw new Error('Database not connected');",
            "}",
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigurationDraft;
    use crate::domain::generators::context_for;
    use crate::domain::generators::test_support::*;
    use crate::domain::value_objects::Language;

    fn files(orm: Orm, db: Option<Database>, language: Language) -> Vec<GeneratedFile> {
        let config = resolve(ConfigurationDraft {
            orm: Some(orm),
            database: db,
            language: Some(language),
            ..full_stack()
        });
        let def = def(orm).unwrap();
        (def.concern.files)(&config, &context_for(&config))
    }

    fn paths(files: &[GeneratedFile]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn none_has_no_row() {
        assert!(def(Orm::None).is_none());
    }

    #[test]
    fn every_row_names_its_bundle_after_the_orm() {
        for row in ORMS {
            assert_eq!(row.concern.bundle, format!("orm:{}", row.concern.key));
        }
    }

    #[test]
    fn prisma_schema_uses_the_selected_provider() {
        let out = files(Orm::Prisma, Some(Database::Mysql), Language::Ts);
        assert_eq!(paths(&out), vec!["prisma/schema.prisma"]);
        assert!(out[0].content.contains("provider = \"mysql\""));
        assert!(out[0].content.contains("url      = env(\"DATABASE_URL\")"));
    }

    #[test]
    fn prisma_on_mongodb_uses_object_ids() {
        let out = files(Orm::Prisma, Some(Database::Mongodb), Language::Ts);
        assert!(out[0].content.contains("@db.ObjectId"));
    }

    #[test]
    fn drizzle_files_follow_the_language_extension() {
        let out = files(Orm::Drizzle, Some(Database::Sqlite), Language::Js);
        assert_eq!(
            paths(&out),
            vec!["src/db/schema.js", "src/db/index.js", "drizzle.config.ts"]
        );
        assert!(out[0].content.contains("sqliteTable"));
        assert!(out[2].content.contains("driver: 'better-sqlite3'"));
    }

    #[test]
    fn drizzle_scripts_track_the_dialect() {
        let config = resolve(ConfigurationDraft {
            orm: Some(Orm::Drizzle),
            database: Some(Database::Mysql),
            ..full_stack()
        });
        let c = drizzle_manifest(&config);
        assert!(c.scripts.contains(&("db:push".into(), "drizzle-kit push:mysql".into())));
        assert!(c.dependencies.contains(&("mysql2".into(), "^3.6.0".into())));
    }

    #[test]
    fn typeorm_maps_postgresql_to_the_postgres_driver() {
        let out = files(Orm::Typeorm, Some(Database::Postgresql), Language::Ts);
        assert!(out[0].content.contains("type: 'postgres'"));
        assert!(out[1].content.contains("@Entity('users')"));
    }

    #[test]
    fn typeorm_javascript_avoids_decorators() {
        let out = files(Orm::Typeorm, Some(Database::Mysql), Language::Js);
        assert!(out[1].content.contains("new EntitySchema"));
        assert!(!out[1].content.contains('@'));
    }

    #[test]
    fn typeorm_mongodb_probe_skips_sql() {
        let config = resolve(ConfigurationDraft {
            orm: Some(Orm::Typeorm),
            database: Some(Database::Mongodb),
            ..full_stack()
        });
        let probe = typeorm_probe(&config);
        assert!(probe.check.iter().all(|l| !l.contains("SELECT")));
    }

    #[test]
    fn sequelize_declares_fields_only_for_typescript() {
        let ts = files(Orm::Sequelize, Some(Database::Postgresql), Language::Ts);
        let js = files(Orm::Sequelize, Some(Database::Postgresql), Language::Js);
        assert!(ts[1].content.contains("declare email: string;"));
        assert!(!js[1].content.contains("declare"));
        assert!(ts[0].content.contains("dialect: 'postgres'"));
    }

    #[test]
    fn mongoose_generates_connection_and_model() {
        let out = files(Orm::Mongoose, None, Language::Ts);
        assert_eq!(
            paths(&out),
            vec!["src/db/connection.ts", "src/models/User.ts"]
        );
        assert!(out[1].content.contains("interface IUser"));
    }
}
