//! Authentication bundles: one module under `src/auth/`.

use crate::domain::configuration::Configuration;
use crate::domain::generators::{ConcernDef, Contribution, GeneratedFile};
use crate::domain::render::RenderContext;
use crate::domain::value_objects::AuthStrategy;

pub static AUTH_STRATEGIES: &[ConcernDef<AuthStrategy>] = &[
    ConcernDef {
        key: AuthStrategy::Jwt,
        bundle: "auth:jwt",
        directories: &["src/auth"],
        files: jwt_files,
        manifest: jwt_manifest,
    },
    ConcernDef {
        key: AuthStrategy::Oauth,
        bundle: "auth:oauth",
        directories: &["src/auth"],
        files: oauth_files,
        manifest: oauth_manifest,
    },
    ConcernDef {
        key: AuthStrategy::Session,
        bundle: "auth:session",
        directories: &["src/auth"],
        files: session_files,
        manifest: session_manifest,
    },
];

/// Type annotation emitted only for TypeScript.
fn ty<'a>(config: &Configuration, annotation: &'a str) -> &'a str {
    if config.is_typescript() { annotation } else { "" }
}

fn middleware_params(config: &Configuration) -> String {
    format!(
        "req{}, res{}, next{}",
        ty(config, ": Request"),
        ty(config, ": Response"),
        ty(config, ": NextFunction")
    )
}

fn jwt_files(config: &Configuration, _ctx: &RenderContext) -> Vec<GeneratedFile> {
    let header = if config.is_typescript() {
        r#"import jwt from 'jsonwebtoken';
import type { SignOptions } from 'jsonwebtoken';
import type { Request, Response, NextFunction } from 'express';

export interface JWTPayload {
  userId: string;
  email: string;
}

declare global {
  namespace Express {
    interface Request {
      user?: JWTPayload;
    }
  }
}
"#
    } else {
        "import jwt from 'jsonwebtoken';\n"
    };
    let expires_cast = ty(config, " as SignOptions['expiresIn']");
    let body = format!(
        r#"{header}
const JWT_SECRET = process.env.JWT_SECRET || 'change-me';
const JWT_EXPIRES_IN = process.env.JWT_EXPIRES_IN || '7d';

export function generateToken(payload{payload}){ret_str} {{
  return jwt.sign(payload, JWT_SECRET, {{ expiresIn: JWT_EXPIRES_IN{expires_cast} }});
}}

export function verifyToken(token{token}){ret_payload} {{
  try {{
    return jwt.verify(token, JWT_SECRET){cast};
  }} catch {{
    return null;
  }}
}}

export function authMiddleware({params}) {{
  const authHeader = req.headers.authorization;

  if (!authHeader || !authHeader.startsWith('Bearer ')) {{
    return res.status(401).json({{ error: 'No token provided' }});
  }}

  const payload = verifyToken(authHeader.substring(7));
  if (!payload) {{
    return res.status(401).json({{ error: 'Invalid or expired token' }});
  }}

  req.user = payload;
  next();
}}
"#,
        payload = ty(config, ": JWTPayload"),
        ret_str = ty(config, ": string"),
        token = ty(config, ": string"),
        ret_payload = ty(config, ": JWTPayload | null"),
        cast = ty(config, " as JWTPayload"),
        params = middleware_params(config),
    );
    vec![GeneratedFile::new(format!("src/auth/jwt.{}", config.ext()), body)]
}

fn jwt_manifest(config: &Configuration) -> Contribution {
    Contribution::for_config(config)
        .dep("jsonwebtoken", "^9.0.2")
        .ts_dev("@types/jsonwebtoken", "^9.0.5")
}

fn oauth_files(config: &Configuration, _ctx: &RenderContext) -> Vec<GeneratedFile> {
    let header = if config.is_typescript() {
        r#"import axios from 'axios';

export type OAuthProvider = 'google' | 'github';

interface ProviderConfig {
  clientId?: string;
  clientSecret?: string;
  redirectUri: string;
  authUrl: string;
  tokenUrl: string;
  userInfoUrl: string;
  scope: string;
}
"#
    } else {
        "import axios from 'axios';\n"
    };
    let body = format!(
        r#"{header}
const callbackUrl = process.env.OAUTH_CALLBACK_URL || 'http://localhost:3000/auth/callback';

export const oauthConfig{config_ty} = {{
  google: {{
    clientId: process.env.GOOGLE_CLIENT_ID,
    clientSecret: process.env.GOOGLE_CLIENT_SECRET,
    redirectUri: `${{callbackUrl}}/google`,
    authUrl: 'https://accounts.google.com/o/oauth2/v2/auth',
    tokenUrl: 'https://oauth2.googleapis.com/token',
    userInfoUrl: 'https://www.googleapis.com/oauth2/v2/userinfo',
    scope: 'openid email profile',
  }},
  github: {{
    clientId: process.env.GITHUB_CLIENT_ID,
    clientSecret: process.env.GITHUB_CLIENT_SECRET,
    redirectUri: `${{callbackUrl}}/github`,
    authUrl: 'https://github.com/login/oauth/authorize',
    tokenUrl: 'https://github.com/login/oauth/access_token',
    userInfoUrl: 'https://api.github.com/user',
    scope: 'read:user user:email',
  }},
}};

export function authorizationUrl(provider{provider_ty}){ret_str} {{
  const p = oauthConfig[provider];
  const params = new URLSearchParams({{
    client_id: p.clientId ?? '',
    redirect_uri: p.redirectUri,
    response_type: 'code',
    scope: p.scope,
  }});
  return `${{p.authUrl}}?${{params.toString()}}`;
}}

export async function exchangeCode(provider{provider_ty}, code{code_ty}) {{
  const p = oauthConfig[provider];
  const {{ data }} = await axios.post(
    p.tokenUrl,
    {{
      client_id: p.clientId,
      client_secret: p.clientSecret,
      redirect_uri: p.redirectUri,
      grant_type: 'authorization_code',
      code,
    }},
    {{ headers: {{ Accept: 'application/json' }} }}
  );
  return data;
}}

export async function fetchProfile(provider{provider_ty}, accessToken{code_ty}) {{
  const {{ data }} = await axios.get(oauthConfig[provider].userInfoUrl, {{
    headers: {{ Authorization: `Bearer ${{accessToken}}` }},
  }});
  return data;
}}
"#,
        config_ty = ty(config, ": Record<OAuthProvider, ProviderConfig>"),
        provider_ty = ty(config, ": OAuthProvider"),
        ret_str = ty(config, ": string"),
        code_ty = ty(config, ": string"),
    );
    vec![GeneratedFile::new(format!("src/auth/oauth.{}", config.ext()), body)]
}

fn oauth_manifest(config: &Configuration) -> Contribution {
    Contribution::for_config(config).dep("axios", "^1.6.0")
}

fn session_files(config: &Configuration, _ctx: &RenderContext) -> Vec<GeneratedFile> {
    let header = if config.is_typescript() {
        r#"import session from 'express-session';
import type { Request, Response, NextFunction } from 'express';

declare module 'express-session' {
  interface SessionData {
    userId?: string;
    email?: string;
  }
}
"#
    } else {
        "import session from 'express-session';\n"
    };
    let body = format!(
        r#"{header}
const WEEK_MS = 1000 * 60 * 60 * 24 * 7;

export const sessionMiddleware = session({{
  secret: process.env.SESSION_SECRET || 'change-me',
  resave: false,
  saveUninitialized: false,
  cookie: {{
    secure: process.env.NODE_ENV === 'production',
    httpOnly: true,
    maxAge: WEEK_MS,
  }},
}});

export function requireSession({params}) {{
  if (!req.session.userId) {{
    return res.status(401).json({{ error: 'Not authenticated' }});
  }}
  next();
}}
"#,
        params = middleware_params(config),
    );
    vec![GeneratedFile::new(format!("src/auth/session.{}", config.ext()), body)]
}

fn session_manifest(config: &Configuration) -> Contribution {
    Contribution::for_config(config)
        .dep("express-session", "^1.17.3")
        .ts_dev("@types/express-session", "^1.17.10")
}
