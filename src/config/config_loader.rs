use anyhow::{Context, Result};

use super::{
    config_model::{Auth, Database, DotEnvyConfig, Server},
    stage::Stage,
};

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{key} is invalid"))
}

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: required("SERVER_PORT")?.parse()?,
        body_limit: required("SERVER_BODY_LIMIT")?.parse()?,
        timeout: required("SERVER_TIMEOUT")?.parse()?,
    };

    let database = Database {
        url: required("DATABASE_URL")?,
        max_connections: match std::env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(value) => value.parse()?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        },
    };

    let auth = Auth {
        jwt_secret: get_jwt_secret()?,
    };

    Ok(DotEnvyConfig {
        server,
        database,
        auth,
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or_default();
    Stage::try_from(&stage_str).unwrap_or_default()
}

pub fn get_jwt_secret() -> Result<String> {
    dotenvy::dotenv().ok();

    required("JWT_SECRET")
}
