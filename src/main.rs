use academy_core::application::{
    ports::{ClockPort, CodeGeneratorPort, PasswordHasherPort, TokenIssuerPort},
    services::ApplicationServices,
};
use academy_core::config::AppConfig;
use academy_core::domain::{
    activation::ActivationCodeRepository, course::CourseRepository,
    enrollment::EnrollmentRepository, session::RefreshTokenRepository, user::UserRepository,
};
use academy_core::infrastructure::{
    database, maintenance,
    repositories::{
        PostgresActivationCodeRepository, PostgresCourseRepository, PostgresEnrollmentRepository,
        PostgresRefreshTokenRepository, PostgresUserRepository,
    },
    security::{password::Argon2PasswordHasher, token::JwtTokenIssuer},
    time::SystemClock,
    util::RandomCodeGenerator,
};
use academy_core::presentation::http::{routes::build_router, state::HttpState};
use anyhow::Result;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    let pool = database::init_pool(config.database_url()).await?;
    database::run_migrations(&pool).await?;

    let user_repo: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(pool.clone()));
    let course_repo: Arc<dyn CourseRepository> =
        Arc::new(PostgresCourseRepository::new(pool.clone()));
    let refresh_token_repo: Arc<dyn RefreshTokenRepository> =
        Arc::new(PostgresRefreshTokenRepository::new(pool.clone()));
    let activation_code_repo: Arc<dyn ActivationCodeRepository> =
        Arc::new(PostgresActivationCodeRepository::new(pool.clone()));
    let enrollment_repo: Arc<dyn EnrollmentRepository> =
        Arc::new(PostgresEnrollmentRepository::new(pool.clone()));

    let clock: Arc<ClockPort> = Arc::new(SystemClock);
    let password_hasher: Arc<PasswordHasherPort> =
        Arc::new(Argon2PasswordHasher::new(config.password_settings())?);
    let token_issuer: Arc<TokenIssuerPort> = Arc::new(JwtTokenIssuer::new(
        &config.token_settings(),
        Arc::clone(&clock),
    )?);
    let code_generator: Arc<CodeGeneratorPort> =
        Arc::new(RandomCodeGenerator::new(config.activation_code_format()));

    let services = Arc::new(ApplicationServices::new(
        Arc::clone(&user_repo),
        Arc::clone(&course_repo),
        Arc::clone(&refresh_token_repo),
        Arc::clone(&activation_code_repo),
        Arc::clone(&enrollment_repo),
        Arc::clone(&password_hasher),
        Arc::clone(&token_issuer),
        Arc::clone(&code_generator),
        Arc::clone(&clock),
        config.redemption_settings(),
    ));

    let shutdown = CancellationToken::new();
    let sweep = tokio::spawn(maintenance::run_retention_sweep(
        Arc::clone(&refresh_token_repo),
        Arc::clone(&enrollment_repo),
        Arc::clone(&clock),
        config.retention_sweep_interval(),
        shutdown.clone(),
    ));

    let state = HttpState {
        services: Arc::clone(&services),
    };
    let app = build_router(state, &config.router_settings());

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    let server_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            server_shutdown.cancel();
        })
        .await?;

    shutdown.cancel();
    if let Err(err) = sweep.await {
        tracing::warn!(error = %err, "retention sweep task ended abnormally");
    }
    pool.close().await;

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for CTRL+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
