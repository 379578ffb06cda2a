use crate::api_state::ApiContext;
use crate::create_router;
use app_state::{AppSettings, StorageBackend, UploadSettings};
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get_service;
use axum::{Router, middleware};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use common_services::api::error::ApiError;
use common_services::api::storage::service::file_too_large;
use common_services::blob::blob_store_from_settings;
use common_services::database::{DataStore, PgDataStore};
use common_services::identity::GoogleIdentityVerifier;
use http::{HeaderValue, header};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Wire up the gateways from settings and serve until Ctrl-C or SIGTERM.
pub async fn serve(settings: AppSettings) -> Result<()> {
    // --- Server Startup ---
    info!("🚀 Initializing server...");
    let store = PgDataStore::connect_lazy(&settings.secrets.database_url, &settings.database)?;
    if settings.database.run_migrations {
        store.migrate().await?;
    }
    let store: Arc<dyn DataStore> = Arc::new(store);

    let api_state = ApiContext {
        store: store.clone(),
        blobs: blob_store_from_settings(&settings)?,
        identity: Arc::new(GoogleIdentityVerifier::new(&settings.identity)?),
        settings: settings.clone(),
    };

    let addr: SocketAddr = format!("{}:{}", settings.api.host, settings.api.port)
        .parse()
        .map_err(|e| eyre!("Invalid address: {}", e))?;
    let listener = TcpListener::bind(addr).await?;
    info!("🐸 Server listening on http://{}", addr);

    serve_on(listener, api_state, shutdown_signal()).await?;

    store.close().await;
    info!("Database pool closed, bye.");
    Ok(())
}

/// Serve the app on an already bound listener until `shutdown` resolves.
pub async fn serve_on(
    listener: TcpListener,
    api_state: ApiContext,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = build_app(api_state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// The router with CORS, tracing and body limits applied, plus `/blobs` for the local backend.
pub fn build_app(api_state: ApiContext) -> Router {
    let settings = api_state.settings.clone();

    // --- CORS Configuration ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = create_router(api_state);

    if settings.storage.backend == StorageBackend::Local {
        let cache_layer = SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=31536000, immutable"),
        );
        let serve_dir = ServeDir::new(&settings.storage.local_root);
        app = app.nest_service("/blobs", get_service(serve_dir).layer(cache_layer));
    }

    app.layer(RequestBodyLimitLayer::new(settings.api.max_request_bytes))
        .layer(middleware::map_response_with_state(
            settings.uploads.clone(),
            json_body_limit,
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Turn the plain text 413 of the body limit layer into a json 400.
async fn json_body_limit(
    State(uploads): State<UploadSettings>,
    uri: Uri,
    response: Response,
) -> Response {
    if response.status() != StatusCode::PAYLOAD_TOO_LARGE {
        return response;
    }
    if uri.path().ends_with("/storage/upload") {
        file_too_large(&uploads).into_response()
    } else {
        ApiError::validation("Request body too large").into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Could not listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutting down...");
}
