// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! Configuration parameters affecting the behaviour of this library.
//!
//! A single environment variable, `MC_DOTENV_PATH`, names the `.env`-format
//! file to load; w/o it a `.env` in the working directory is tried. The
//! file (or the plain environment) provides:
//!
//! * `MCDB_DSN` -- DSN of the relational materials store,
//! * `MCDB_MAX_CONNECTIONS` -- connection pool cap (default 5).
//!

use dotenvy::var;
use std::sync::OnceLock;
use tracing::debug;

/// Library configuration values, loaded once.
#[derive(Debug)]
pub struct Config {
    db_dsn: String,
    pg_max_connections: u32,
}

static CONFIG: OnceLock<Config> = OnceLock::new();
/// This library configuration Singleton.
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

impl Default for Config {
    fn default() -> Self {
        // an explicit dotenv path wins; otherwise a ./.env is picked up if
        // one exists. either way plain environment variables still apply...
        match std::env::var("MC_DOTENV_PATH") {
            Ok(path) => {
                if let Err(x) = dotenvy::from_path(&path) {
                    debug!("failed loading dotenv file {path}: {x}");
                }
            }
            Err(_) => {
                let _ = dotenvy::dotenv();
            }
        }

        let db_dsn = var("MCDB_DSN").unwrap_or_default();
        let pg_max_connections = var("MCDB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Self {
            db_dsn,
            pg_max_connections,
        }
    }
}

impl Config {
    /// Return the configured DSN of the relational store. Empty when
    /// neither the dotenv file nor the environment provides one; connecting
    /// will then fail w/ an SQL error.
    pub fn db_dsn(&self) -> &str {
        &self.db_dsn
    }

    /// Return the configured connection pool cap.
    pub fn pg_max_connections(&self) -> u32 {
        self.pg_max_connections
    }
}
