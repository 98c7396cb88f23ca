use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use app_api::{AppState, handlers};
use biz_service::biz_service::{Repositories, Services};
use common::config::AppConfig;
use common::repository::db::Db;
use log::{LevelFilter, info, warn};
use std::str::FromStr;

const DEFAULT_CONFIG_FILE: &str = "app-config.toml";

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config_file = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
    let app_cfg = AppConfig::new(&config_file)?;
    init_log(&app_cfg);

    let db_cfg = app_cfg.get_database();
    let db = if db_cfg.is_memory() { None } else { Some(Db::connect(&db_cfg).await?) };
    let repos = match &db {
        Some(db) => Repositories::mongo(db).await.context("failed to prepare mongo repositories")?,
        None => Repositories::memory(),
    };

    let sys = app_cfg.get_sys();
    let services = Services::new(&repos, &app_cfg.get_session(), &sys);
    if sys.reconcile_on_start {
        let repaired = services.friends.reconcile_accepted().await.context("friend reconciliation failed")?;
        info!("startup reconciliation repaired {} friend edges", repaired);
    }

    let state = web::Data::new(AppState { services, session: app_cfg.get_session() });
    let server = app_cfg.get_server();
    let address_and_port = format!("{}:{}", server.host, server.port);
    warn!("Starting server on {}", address_and_port);

    HttpServer::new(move || {
        let state = state.clone();
        App::new().wrap(Logger::default()).configure(move |cfg| handlers::configure(cfg, state))
    })
    .keep_alive(actix_web::http::KeepAlive::Timeout(std::time::Duration::from_secs(600)))
    .bind(&address_and_port)
    .with_context(|| format!("failed to bind {address_and_port}"))?
    .run()
    .await?;

    if let Some(db) = db {
        db.shutdown().await;
    }
    info!("server stopped");
    Ok(())
}

fn init_log(config: &AppConfig) {
    let log_level = config.get_sys().log_level;
    let level = LevelFilter::from_str(&log_level).unwrap_or(LevelFilter::Info);
    env_logger::Builder::new().filter(None, level).init();
}
