use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use portier::auth::{load_session_key, SessionManager};
use portier::db::UserRepository;
use portier::template::TemplateEngine;
use portier::web::{AppState, WebServer};
use portier::{Config, Database};

/// Views the handlers render.
const REQUIRED_VIEWS: &[&str] = &["login", "register", "main"];

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    // Load configuration
    let config = match Config::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    if let Err(e) = portier::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        portier::logging::init_console_only(&config.logging.level);
    }

    info!("Portier - session-authenticated web login");

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> portier::Result<()> {
    config.validate()?;

    let key = load_session_key(&config.session.key_file)?;
    let sessions = Arc::new(SessionManager::new(key, &config.session)?);
    info!("Session key loaded from {}", config.session.key_file);

    let views = TemplateEngine::load_dir(&config.templates.path)?;
    views.ensure_views(REQUIRED_VIEWS)?;
    info!("Loaded {} view templates", views.template_names().len());

    let db = Database::open(&config.database.path).await?;
    info!("Database ready at {}", config.database.path);

    let state = AppState::new(
        Arc::new(UserRepository::new(db.pool().clone())),
        sessions,
        Arc::new(views),
    );

    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );
    let result = WebServer::new(&config.server, state, &config.web.static_path)?
        .run()
        .await;

    db.close().await;
    result
}
