use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use gistlog_github::{fetch_history_report, ActivitySource, FetchError, HistoryPeriod};
use gistlog_session::{ConfirmedFetch, SessionAction, SessionError, SessionKey, SessionStore};
use gistlog_slack_runtime::{
    cancellation_title, render_confirmation_prompt, render_terminal_prompt, SlackPromptMessage,
    RETRIEVING_TITLE,
};
use tokio::net::TcpListener;

mod callback_poster;
mod history_jobs;
mod interaction_dispatcher;
mod server_bootstrap;
mod types;

pub use callback_poster::{CallbackPoster, DeliveryError};
pub use history_jobs::{HistoryJobError, HistoryJobHandle, HistoryJobReport, HistoryJobSupervisor};
pub use interaction_dispatcher::{DispatchOutcome, InteractionDispatcher};
pub use server_bootstrap::{run_interaction_server, InteractionServerConfig};
pub use types::{
    parse_interaction_body, InteractionAction, InteractionChannel, InteractionError,
    InteractionPayload, InteractionSelectedOption, InteractionUser,
};

use history_jobs::spawn_history_job;
use server_bootstrap::{build_interaction_router, InteractionServerState};

pub const INTERACTION_ENDPOINT: &str = "/interaction";
