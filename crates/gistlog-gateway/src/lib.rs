//! HTTP side of the gistlog bot.
//!
//! Receives Slack interactive callbacks on `/interaction`, advances the
//! session of the prompt that was clicked, and runs confirmed history
//! requests as supervised background jobs that deliver the report to the
//! callback's response URL.

pub mod interaction_gateway;

pub use interaction_gateway::{
    parse_interaction_body, run_interaction_server, CallbackPoster, DeliveryError, DispatchOutcome,
    HistoryJobError, HistoryJobHandle, HistoryJobReport, HistoryJobSupervisor, InteractionAction,
    InteractionChannel, InteractionDispatcher, InteractionError, InteractionPayload,
    InteractionSelectedOption, InteractionServerConfig, InteractionUser, INTERACTION_ENDPOINT,
};
