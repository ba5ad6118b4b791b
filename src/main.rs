use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use forumflow::identity::HttpIdentityVerifier;
use forumflow::{AppError, AppState, Config};
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting forumflow v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // The database must be reachable at startup; there is no
    // partial-service mode.
    let database = match forumflow::db::connect(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Database connection failed: {:#}", e);
            eprintln!("ERROR: Failed to connect to MongoDB: {:#}", e);
            std::process::exit(1);
        }
    };

    let verifier = Arc::new(HttpIdentityVerifier::new(
        config.identity.lookup_url.clone(),
        config.identity.api_key.clone(),
    ));
    let state = web::Data::new(AppState::new(database, verifier));

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Server ForumFlow is running on {}", bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(state.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::BadRequest(format!("malformed JSON body: {}", err)).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                AppError::BadRequest(format!("invalid query string: {}", err)).into()
            }))
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(forumflow::routes::configure_routes)
    })
    .bind(&bind_address)?
    .run();

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(server);

    tokio::select! {
        result = &mut server_task => {
            result.map_err(|e| io::Error::new(io::ErrorKind::Other, e))??;
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received, draining in-flight requests");
            server_handle.stop(true).await;
            let _ = server_task.await;
        }
    }

    tracing::info!("ForumFlow shutting down");
    Ok(())
}
