use rusty_darts::args;
use rusty_darts::controller::db_prefill;
use rusty_darts::storage::SqliteStore;
use rusty_darts::{Sessions, configure};

use actix_files::Files;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let args = args::args_checks();

    let store = SqliteStore::open(&args.db_name)?;
    run_startup_tasks(&args, &store).await?;

    let sessions = Sessions::new(Arc::new(store.clone()), Arc::new(store))
        .with_idle_timeout(args.session_idle_timeout);
    let addr = args.listen_addr();
    info!(%addr, db = %args.db_name, "starting darts stats server");

    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(sessions.clone()))
            .configure(configure)
            .service(Files::new("/static", "./static")) // Serve the static files
    })
    .bind(addr)?
    .run()
    .await?;
    Ok(())
}

async fn run_startup_tasks(
    args: &args::CleanArgs,
    store: &SqliteStore,
) -> Result<(), Box<dyn std::error::Error>> {
    if !args.combined_sql_script.trim().is_empty() {
        store.execute_batch(&args.combined_sql_script).await?;
        info!("ran sql startup script");
    }

    if let Some(json_data) = &args.db_populate_json {
        db_prefill::db_prefill(json_data, store).await?;
    }

    Ok(())
}
