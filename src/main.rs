use anyhow::{bail, Context};
use std::path::Path;
use std::sync::Arc;
use tasklist::{
    app,
    auth::{
        jwt::TokenCodec,
        password::{Argon2PasswordHasher, KeyedDigestHasher, PasswordHasher},
    },
    cli::{
        self,
        init::{InitConfig, InitResult},
        output::Output,
        Cli, Commands,
    },
    db::{SequenceIdGenerator, SnowflakeIdGenerator, UserIdGenerator},
    utils::toml_config::{IdGeneratorKind, LogFormat, PasswordScheme, ServerConfig},
    AppState, TaskListConfig,
};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Secrets referenced by the config may come from .env
    dotenvy::dotenv().ok();

    let args = Cli::parse_args();
    let output = if args.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match args.command {
        Some(Commands::Init {
            path,
            force,
            host,
            port,
        }) => {
            let config = InitConfig {
                path,
                force,
                host,
                port,
            };
            match cli::init::run(config, &output) {
                InitResult::Success | InitResult::AlreadyExists => Ok(()),
                InitResult::Error(e) => bail!("init failed: {}", e),
            }
        }
        Some(Commands::Config { validate }) => {
            if let Err(e) = cli::config::run(&args.config, validate, &output) {
                output.error(&e.to_string());
                return Err(e.into());
            }
            Ok(())
        }
        None => serve(&args.config, args.verbose, &output).await,
    }
}

async fn serve(config_path: &Path, verbose: bool, output: &Output) -> anyhow::Result<()> {
    let config = TaskListConfig::load(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    init_tracing(&config.server, verbose);
    output.banner();

    let state = build_state(config).await?;
    let addr = state.config.bind_addr();

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "tasklist-server listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("tasklist-server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig, verbose: bool) {
    let default_directive = if verbose {
        "debug".to_string()
    } else {
        server.log_level.clone()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let registry = tracing_subscriber::registry().with(filter);
    match server.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn build_state(config: TaskListConfig) -> anyhow::Result<AppState> {
    let db = config
        .database_provider()
        .create_client()
        .await
        .context("Failed to open database")?;
    info!(url = %config.database.url, "database ready");

    let hasher: Arc<dyn PasswordHasher> = match config.auth.password_scheme {
        PasswordScheme::Argon2 => Arc::new(Argon2PasswordHasher::new()?),
        PasswordScheme::KeyedDigest => {
            warn!("keyed-digest password scheme is unsalted; prefer argon2");
            Arc::new(KeyedDigestHasher::new(config.password_secret()?))
        }
    };

    let ids: Arc<dyn UserIdGenerator> = match config.database.id_generator {
        IdGeneratorKind::Sequence => {
            let last = db.max_user_id().await?.unwrap_or(0);
            Arc::new(SequenceIdGenerator::starting_after(last))
        }
        IdGeneratorKind::Snowflake => Arc::new(SnowflakeIdGenerator::new(config.database.node_id)),
    };

    let token_codec = TokenCodec::new(
        config.jwt_secret()?.as_bytes(),
        config.auth.token_lifetime_secs,
        config.auth.issuer.clone(),
    );
    info!(
        issuer = %config.auth.issuer,
        lifetime_secs = token_codec.lifetime_secs(),
        "session tokens enabled"
    );

    Ok(AppState::new(config, db, hasher, ids, token_codec))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
