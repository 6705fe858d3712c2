use std::future::Future;
use std::time::Duration;

use tracing::debug;

use super::domain::{AgendaError, AgendaSnapshot, Appointment, VisitRequest};

/// Simulated network latency of the mock source.
pub const DEFAULT_MOCK_DELAY_MS: u64 = 500;

/// Supplier of the raw agenda data. Both fetches are awaited together before
/// anything reaches the reducer.
pub trait AgendaSource: Send + Sync {
    fn fetch_appointments(&self)
        -> impl Future<Output = Result<Vec<Appointment>, SourceError>> + Send;

    fn fetch_visit_requests(
        &self,
    ) -> impl Future<Output = Result<Vec<VisitRequest>, SourceError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("agenda source unavailable: {0}")]
    Unavailable(String),
    #[error("agenda source returned invalid data: {0}")]
    Invalid(#[from] AgendaError),
}

/// Fetches appointments and visit requests concurrently and validates the
/// combined payload. Either failure aborts the load.
pub async fn load_agenda<S>(source: &S) -> Result<AgendaSnapshot, SourceError>
where
    S: AgendaSource,
{
    let (appointments, visit_requests) =
        tokio::try_join!(source.fetch_appointments(), source.fetch_visit_requests())?;

    let snapshot = AgendaSnapshot {
        appointments,
        visit_requests,
    };
    snapshot.validate()?;

    debug!(
        appointments = snapshot.appointments.len(),
        visit_requests = snapshot.visit_requests.len(),
        "agenda payload fetched"
    );
    Ok(snapshot)
}

/// Source backed by a fixed snapshot, answering after `delay`.
#[derive(Debug, Clone)]
pub struct InMemoryAgendaSource {
    snapshot: AgendaSnapshot,
    delay: Duration,
    failure: Option<String>,
}

impl InMemoryAgendaSource {
    pub fn new(snapshot: AgendaSnapshot) -> Self {
        Self {
            snapshot,
            delay: Duration::from_millis(DEFAULT_MOCK_DELAY_MS),
            failure: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Makes the visit-request fetch fail with `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    async fn respond<T: Clone>(&self, data: &T) -> T {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        data.clone()
    }
}

impl AgendaSource for InMemoryAgendaSource {
    async fn fetch_appointments(&self) -> Result<Vec<Appointment>, SourceError> {
        debug!("fetching mock appointments");
        Ok(self.respond(&self.snapshot.appointments).await)
    }

    async fn fetch_visit_requests(&self) -> Result<Vec<VisitRequest>, SourceError> {
        debug!("fetching mock visit requests");
        let requests = self.respond(&self.snapshot.visit_requests).await;
        match &self.failure {
            Some(message) => Err(SourceError::Unavailable(message.clone())),
            None => Ok(requests),
        }
    }
}
