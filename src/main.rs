use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use oxitodo::domain::entities::Credentials;
use oxitodo::infrastructure::{
    AppConfig, CliArgs, ConfigFile, FirebaseAuthClient, FirestoreTodoStore, KeyringSessionStorage,
};
use oxitodo::presentation::App;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config() -> Result<AppConfig> {
    let args = CliArgs::parse();
    let mut config = ConfigFile::locate(args.config.as_deref())?.load()?;
    config.merge_with_args(args);
    Ok(config)
}

fn create_app() -> Result<(App, Option<Credentials>)> {
    let config = load_config()?;

    init_logging(&config)?;

    info!(version = oxitodo::VERSION, "Starting Oxitodo");

    if !config.firebase.is_complete() {
        return Err(eyre!(
            "Firebase API key and project id are required (--api-key / --project-id or the config file)"
        ));
    }

    let auth_client = Arc::new(FirebaseAuthClient::new(&config.firebase)?);
    let todo_store = Arc::new(FirestoreTodoStore::new(
        &config.firebase,
        auth_client.clone(),
    )?);
    let session_storage = Arc::new(KeyringSessionStorage::for_project(
        &config.firebase.project_id,
    ));

    let credentials = match (&config.email, &config.password) {
        (Some(email), Some(password)) => Some(Credentials::new(email, password)),
        _ => None,
    };

    let app = App::new(
        auth_client,
        todo_store,
        session_storage,
        config.session.remember,
    );

    Ok((app, credentials))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;

    let (app, credentials) = create_app()?;

    let mut terminal = ratatui::init();

    let result = app.run(&mut terminal, credentials).await;

    ratatui::restore();

    result
}
