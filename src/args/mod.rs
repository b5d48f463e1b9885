use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::fs;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::warn;

pub mod database;
pub mod types;
pub mod validation;

pub use types::{Args, CleanArgs};

/// Parses and validates the command line, exiting with a usage error when it's invalid.
#[must_use]
pub fn args_checks() -> CleanArgs {
    let mut xx = Args::parse();
    if let Err(e) = xx.validate() {
        Args::command().error(ErrorKind::ValueValidation, e).exit();
    }
    CleanArgs::new(xx)
}

impl CleanArgs {
    #[must_use]
    pub fn new(args: Args) -> Self {
        let mut combined_sql_script = String::new();
        if let Some(db_startup_script) = &args.db_startup_script {
            for file in db_startup_script.split(';') {
                let file = file.trim();
                if file.is_empty() {
                    continue;
                }

                match fs::read_to_string(file) {
                    Ok(script) => {
                        combined_sql_script.push_str(&script);
                        // push a newline just in case
                        combined_sql_script.push('\n');
                    }
                    Err(e) => {
                        // keep going with the other files
                        warn!(file, error = %e, "failed to read sql startup script");
                    }
                }
            }
        }
        CleanArgs {
            db_name: args.db_name,
            db_startup_script: args.db_startup_script,
            db_populate_json: args.db_populate_json,
            combined_sql_script,
            bind: args.bind,
            port: args.port,
            session_idle_timeout: Duration::from_secs(args.session_idle_secs),
        }
    }

    #[must_use]
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
