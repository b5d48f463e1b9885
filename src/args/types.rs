use clap::Parser;
use serde_json::Value;
use std::net::IpAddr;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The sqlite database file. `:memory:` keeps everything in memory.
    #[arg(short = 'n', long, value_name = "DATABASE_NAME", default_value = "darts.db")]
    pub db_name: String,
    /// If specified, this sql is run on program startup. Separate several files with `;`.
    #[arg(long, value_name = "DATABASE_STARTUP_SCRIPT", value_parser = crate::args::validation::check_readable_file)]
    pub db_startup_script: Option<String>,
    /// Players to seed the directory with, `[{"id", "first_name", "last_name"}, ...]`.
    #[arg(
        long,
        value_name = "PLAYERS_JSON",
        value_parser = crate::args::validation::check_readable_file_and_json
    )]
    pub db_populate_json: Option<Value>,
    #[arg(short = 'b', long, value_name = "ADDRESS", default_value = "0.0.0.0")]
    pub bind: IpAddr,
    #[arg(short = 'p', long, value_name = "PORT", default_value_t = 8081)]
    pub port: u16,
    /// Seconds an untouched entry session is kept in memory before its slot is freed.
    #[arg(long, value_name = "SECONDS", default_value_t = 1800)]
    pub session_idle_secs: u64,
}

#[derive(Debug, Clone)]
pub struct CleanArgs {
    pub db_name: String,
    pub db_startup_script: Option<String>,
    pub db_populate_json: Option<Value>,
    pub combined_sql_script: String,
    pub bind: IpAddr,
    pub port: u16,
    pub session_idle_timeout: Duration,
}
