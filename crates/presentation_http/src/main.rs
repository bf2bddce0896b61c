//! voicebridge HTTP server
//!
//! Main entry point for the relay server.

use std::{sync::Arc, time::Duration};

use axum::extract::DefaultBodyLimit;
use cloud_speech::{
    CloudSpeechClient, Credentials, RealtimeRecognizer, Transcoder,
    ports::{RecognitionEngine, StreamingRecognition, SynthesisEngine, Transcode},
};
use presentation_http::{AppConfig, AppState, routes};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voicebridge_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("voicebridge v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    info!(
        host = %config.server.host,
        port = %config.server.port,
        language = %config.speech.language_code,
        "Configuration loaded"
    );

    // Credentials must be present before the server comes up; without
    // them there is nothing to relay to.
    let credentials = Arc::new(Credentials::load_from_env().map_err(|e| {
        anyhow::anyhow!("Cannot start without engine credentials: {e}")
    })?);

    let config = Arc::new(config);
    let speech_config = Arc::new(config.speech.clone());

    // Engine clients
    let rest_client = CloudSpeechClient::new(Arc::clone(&speech_config), Arc::clone(&credentials))
        .map_err(|e| anyhow::anyhow!("Failed to initialize speech client: {e}"))?;
    let synthesis: Arc<dyn SynthesisEngine> = Arc::new(rest_client.clone());
    let recognition: Arc<dyn RecognitionEngine> = Arc::new(rest_client);
    let streaming: Arc<dyn StreamingRecognition> =
        Arc::new(RealtimeRecognizer::new(speech_config, credentials));

    let transcoder = Transcoder::new();
    if !transcoder.is_available().await {
        warn!("FFmpeg not found on PATH; transcription uploads will fail");
    }
    let transcoder: Arc<dyn Transcode> = Arc::new(transcoder);

    let state = AppState {
        synthesis,
        recognition,
        streaming,
        transcoder,
        config: Arc::clone(&config),
    };

    // Build router
    let app = routes::create_router(state);

    // Development-friendly CORS; the relay carries no cookies or auth
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Add middleware (order matters: first added = outermost)
    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(DefaultBodyLimit::max(config.server.max_upload_bytes));

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    info!("🚀 Server listening on http://{}", addr);

    let shutdown_timeout =
        Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM) and handle graceful shutdown
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        // Log error but continue waiting - this is a best-effort signal handler
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {:?} for connections to close...", timeout);
    // The actual connection draining is handled by axum's graceful_shutdown
}
