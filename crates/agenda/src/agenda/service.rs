use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{info, warn};

use super::classify::{timeline_entries, TimelineEntry};
use super::domain::{Appointment, RequestId, VisitRequest};
use super::source::{load_agenda, AgendaSource, SourceError};
use super::state::{AgendaAction, AgendaState, Transition};
use super::timeline::OverlapPolicy;

/// Service owning the canonical agenda state behind a single lock.
pub struct AgendaService<S> {
    source: Arc<S>,
    state: Mutex<AgendaState>,
    loaded: AtomicBool,
    policy: OverlapPolicy,
}

/// Read model for the agenda screen.
#[derive(Debug, Clone, Serialize)]
pub struct AgendaOverview {
    pub loaded: bool,
    pub pending_requests: Vec<VisitRequest>,
    pub appointments: Vec<Appointment>,
}

impl<S> AgendaService<S>
where
    S: AgendaSource + 'static,
{
    pub fn new(source: Arc<S>, policy: OverlapPolicy) -> Self {
        Self {
            source,
            state: Mutex::new(AgendaState::new()),
            loaded: AtomicBool::new(false),
            policy,
        }
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Fetches both collections and replaces the state once both arrive. On
    /// failure the state is left untouched.
    pub async fn load(&self) -> Result<Transition, AgendaServiceError> {
        let snapshot = match load_agenda(self.source.as_ref()).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "agenda load failed; state unchanged");
                return Err(err.into());
            }
        };

        let transition = self
            .lock()
            .dispatch(AgendaAction::SetInitialData(snapshot));
        self.loaded.store(true, Ordering::Release);
        info!(?transition, policy = self.policy.label(), "agenda loaded");
        Ok(transition)
    }

    pub fn accept(&self, request_id: RequestId) -> Result<Transition, AgendaServiceError> {
        self.dispatch(AgendaAction::AcceptRequest { request_id })
    }

    pub fn reject(&self, request_id: RequestId) -> Result<Transition, AgendaServiceError> {
        self.dispatch(AgendaAction::RejectRequest { request_id })
    }

    fn dispatch(&self, action: AgendaAction) -> Result<Transition, AgendaServiceError> {
        self.ensure_loaded()?;
        Ok(self.lock().dispatch(action))
    }

    pub fn overview(&self) -> AgendaOverview {
        let state = self.lock();
        AgendaOverview {
            loaded: self.is_loaded(),
            pending_requests: state.pending_requests().into_iter().cloned().collect(),
            appointments: state.appointments().cloned().collect(),
        }
    }

    pub fn timeline(&self) -> Result<Vec<TimelineEntry>, AgendaServiceError> {
        self.ensure_loaded()?;
        let appointments: Vec<Appointment> = self.lock().appointments().cloned().collect();
        Ok(timeline_entries(&appointments, self.policy))
    }

    pub fn state(&self) -> AgendaState {
        self.lock().clone()
    }

    fn ensure_loaded(&self) -> Result<(), AgendaServiceError> {
        if self.is_loaded() {
            Ok(())
        } else {
            Err(AgendaServiceError::NotLoaded)
        }
    }

    // A reducer step cannot leave the state half-applied, so a poisoned lock
    // still guards a consistent value.
    fn lock(&self) -> MutexGuard<'_, AgendaState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AgendaServiceError {
    #[error("agenda has not been loaded yet")]
    NotLoaded,
    #[error(transparent)]
    Source(#[from] SourceError),
}
