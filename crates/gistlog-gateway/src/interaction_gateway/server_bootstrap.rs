//! Interaction server bootstrap and router wiring.

use super::*;

/// Runtime configuration for the interaction HTTP server.
#[derive(Clone)]
pub struct InteractionServerConfig {
    pub bind: String,
    pub verification_token: String,
    pub sessions: SessionStore,
    pub activity_source: Arc<dyn ActivitySource>,
}

pub(super) struct InteractionServerState {
    pub(super) dispatcher: InteractionDispatcher,
    pub(super) supervisor: HistoryJobSupervisor,
}

pub async fn run_interaction_server(config: InteractionServerConfig) -> Result<()> {
    let bind_addr = config
        .bind
        .parse::<SocketAddr>()
        .with_context(|| format!("invalid interaction server bind '{}'", config.bind))?;
    let poster = CallbackPoster::new(&config.verification_token)
        .context("failed to create callback poster")?;
    let dispatcher = InteractionDispatcher::new(
        &config.verification_token,
        config.sessions,
        config.activity_source,
        poster,
    );

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind interaction server on {bind_addr}"))?;
    let local_addr = listener
        .local_addr()
        .context("failed to resolve bound interaction server address")?;
    tracing::info!(
        endpoint = INTERACTION_ENDPOINT,
        addr = %local_addr,
        "interaction server listening"
    );

    let (supervisor, reaper) = HistoryJobSupervisor::start();
    let state = Arc::new(InteractionServerState {
        dispatcher,
        supervisor,
    });
    let app = build_interaction_router(state);
    let serve_result = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;
    reaper.abort();
    serve_result.context("interaction server exited unexpectedly")?;
    tracing::info!("interaction server stopped");
    Ok(())
}

pub(super) fn build_interaction_router(state: Arc<InteractionServerState>) -> Router {
    Router::new()
        .route(INTERACTION_ENDPOINT, post(handle_interaction))
        .with_state(state)
}

async fn handle_interaction(
    State(state): State<Arc<InteractionServerState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            return reject_interaction(InteractionError::TransportRead(rejection.body_text()))
        }
    };
    let payload = match parse_interaction_body(&body) {
        Ok(payload) => payload,
        Err(error) => return reject_interaction(error),
    };

    match state.dispatcher.dispatch(payload) {
        Ok(outcome) => {
            if let Some(job) = outcome.job {
                state.supervisor.adopt(job);
            }
            (StatusCode::OK, Json(outcome.prompt)).into_response()
        }
        Err(error) => reject_interaction(error),
    }
}

fn reject_interaction(error: InteractionError) -> Response {
    match &error {
        InteractionError::Unauthorized | InteractionError::Decode(_) => {
            tracing::warn!(error = %error, "interaction rejected")
        }
        _ => tracing::error!(error = %error, "interaction failed"),
    }
    error.into_response()
}
