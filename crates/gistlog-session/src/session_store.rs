//! In-memory session store shared by the chat listener and the interaction gateway.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use gistlog_core::{current_unix_timestamp_ms, is_older_than_ms};
use gistlog_github::HistoryPeriod;

use crate::{
    ConfirmedFetch, SessionAction, SessionError, SessionIntent, SessionKey, SessionState,
};

type SessionMap = HashMap<SessionKey, SessionIntent>;

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<SessionMap>>,
    ttl_ms: Option<u64>,
}

impl SessionStore {
    /// Store whose sessions never expire.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that drops sessions older than `ttl` the next time it is used.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            ttl_ms: Some(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)),
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_ms.map(Duration::from_millis)
    }

    /// Locks the map and evicts expired sessions before handing it out.
    fn lock(&self) -> MutexGuard<'_, SessionMap> {
        // Transitions never panic while holding the guard, so a poisoned map is still consistent.
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(ttl_ms) = self.ttl_ms {
            evict_expired(&mut sessions, current_unix_timestamp_ms(), ttl_ms);
        }
        sessions
    }

    /// Registers the session for a freshly posted picker. A session already
    /// bound to the same prompt is replaced.
    pub fn open(&self, intent: SessionIntent) {
        let key = intent.key.clone();
        if self.lock().insert(key.clone(), intent).is_some() {
            tracing::warn!(session = %key, "replaced existing session for prompt");
        }
    }

    pub fn get(&self, key: &SessionKey) -> Option<SessionIntent> {
        self.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Records the chosen period and moves the session to
    /// `AwaitingConfirmation`.
    pub fn record_period(
        &self,
        key: &SessionKey,
        period: HistoryPeriod,
    ) -> Result<SessionIntent, SessionError> {
        let mut sessions = self.lock();
        let session = sessions
            .get_mut(key)
            .ok_or_else(|| SessionError::NotFound(key.clone()))?;
        let next = checked_next(session.state, SessionAction::Select)?;
        session.period = Some(period);
        session.state = next;
        Ok(session.clone())
    }

    /// Confirms the session and removes it from the store. Fails without
    /// mutation when the session has no account or period yet.
    pub fn confirm(&self, key: &SessionKey) -> Result<ConfirmedFetch, SessionError> {
        let mut sessions = self.lock();
        let session = sessions
            .get(key)
            .ok_or_else(|| SessionError::NotFound(key.clone()))?;
        checked_next(session.state, SessionAction::Start)?;
        if session.target_account.is_empty() {
            return Err(SessionError::Incomplete {
                key: key.clone(),
                missing: "target account",
            });
        }
        let Some(period) = session.period.clone() else {
            return Err(SessionError::Incomplete {
                key: key.clone(),
                missing: "period",
            });
        };
        let session = sessions
            .remove(key)
            .ok_or_else(|| SessionError::NotFound(key.clone()))?;
        Ok(ConfirmedFetch {
            key: session.key,
            target_account: session.target_account,
            requested_by: session.requested_by,
            period,
        })
    }

    /// Cancels the session and removes it from the store.
    pub fn cancel(&self, key: &SessionKey) -> Result<SessionIntent, SessionError> {
        let mut sessions = self.lock();
        let state = sessions
            .get(key)
            .map(|session| session.state)
            .ok_or_else(|| SessionError::NotFound(key.clone()))?;
        let next = checked_next(state, SessionAction::Cancel)?;
        let mut cancelled = sessions
            .remove(key)
            .ok_or_else(|| SessionError::NotFound(key.clone()))?;
        cancelled.state = next;
        Ok(cancelled)
    }
}

fn evict_expired(sessions: &mut SessionMap, now_unix_ms: u64, ttl_ms: u64) {
    let before = sessions.len();
    sessions.retain(|_, session| !is_older_than_ms(session.created_unix_ms, now_unix_ms, ttl_ms));
    let evicted = before - sessions.len();
    if evicted > 0 {
        tracing::info!(evicted, remaining = sessions.len(), "expired unanswered sessions");
    }
}

fn checked_next(state: SessionState, action: SessionAction) -> Result<SessionState, SessionError> {
    state.next(action).ok_or(SessionError::InvalidTransition {
        action: action.as_str(),
        state: state.as_str(),
    })
}
