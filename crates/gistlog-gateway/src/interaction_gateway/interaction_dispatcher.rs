//! Authenticates interactive callbacks and drives the session state machine.

use super::*;

/// Result of a dispatched callback: the rewritten prompt and, for a
/// confirmation, the job fetching and delivering the report.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub prompt: SlackPromptMessage,
    pub job: Option<HistoryJobHandle>,
}

#[derive(Clone)]
pub struct InteractionDispatcher {
    verification_token: String,
    sessions: SessionStore,
    source: Arc<dyn ActivitySource>,
    poster: CallbackPoster,
}

impl InteractionDispatcher {
    pub fn new(
        verification_token: &str,
        sessions: SessionStore,
        source: Arc<dyn ActivitySource>,
        poster: CallbackPoster,
    ) -> Self {
        Self {
            verification_token: verification_token.to_string(),
            sessions,
            source,
            poster,
        }
    }

    /// Applies one callback. The token is checked before the session is
    /// looked up, so a rejected callback never touches session state.
    pub fn dispatch(&self, payload: InteractionPayload) -> Result<DispatchOutcome, InteractionError> {
        if payload.token != self.verification_token {
            return Err(InteractionError::Unauthorized);
        }
        let action = payload
            .actions
            .first()
            .ok_or_else(|| InteractionError::Decode("missing actions".to_string()))?;
        let session_action = SessionAction::parse(&action.name)
            .ok_or_else(|| InteractionError::InvalidAction(action.name.clone()))?;
        let key = payload.session_key();

        match session_action {
            SessionAction::Select => {
                let keyword = action
                    .selected_options
                    .first()
                    .map(|option| option.value.as_str())
                    .ok_or_else(|| InteractionError::Decode("missing selected option".to_string()))?;
                let period = HistoryPeriod::from_keyword(keyword);
                self.sessions.record_period(&key, period.clone())?;
                tracing::info!(prompt = %key, period = period.keyword(), "period selected");
                Ok(DispatchOutcome {
                    prompt: render_confirmation_prompt(payload.original_message, &period),
                    job: None,
                })
            }
            SessionAction::Start => {
                let confirmed = self.sessions.confirm(&key)?;
                tracing::info!(
                    prompt = %key,
                    account = %confirmed.target_account,
                    requested_by = %confirmed.requested_by,
                    period = confirmed.period.keyword(),
                    "history request confirmed"
                );
                let job = spawn_history_job(
                    Arc::clone(&self.source),
                    self.poster.clone(),
                    confirmed,
                    payload.response_url,
                );
                Ok(DispatchOutcome {
                    prompt: render_terminal_prompt(payload.original_message, RETRIEVING_TITLE),
                    job: Some(job),
                })
            }
            SessionAction::Cancel => {
                let cancelled = self.sessions.cancel(&key)?;
                tracing::info!(
                    prompt = %key,
                    account = %cancelled.target_account,
                    requested_by = %cancelled.requested_by,
                    user = %payload.user.name,
                    "history request cancelled"
                );
                Ok(DispatchOutcome {
                    prompt: render_terminal_prompt(
                        payload.original_message,
                        &cancellation_title(&payload.user.name),
                    ),
                    job: None,
                })
            }
        }
    }
}
