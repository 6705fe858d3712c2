//! Agent agenda: visit-request decisions, timeline grouping and conflict
//! classification.

pub mod classify;
pub mod domain;
pub mod router;
pub mod seed;
pub mod service;
pub mod source;
pub mod state;
pub mod timeline;

#[cfg(test)]
mod tests;

pub use classify::{
    classify, timeline_entries, Emphasis, TimelineCounts, TimelineEntry, VisitClass,
};
pub use domain::{
    AgendaError, AgendaSnapshot, Appointment, AppointmentId, AppointmentKind, Participants,
    Property, PropertyId, RequestConflict, RequestId, RequestStatus, User, UserId, VisitRequest,
    DEFAULT_VISIT_MINUTES,
};
pub use router::agenda_router;
pub use service::{AgendaOverview, AgendaService, AgendaServiceError};
pub use source::{load_agenda, AgendaSource, InMemoryAgendaSource, SourceError};
pub use state::{AgendaAction, AgendaState, IgnoredReason, Transition};
pub use timeline::{group_and_slot, group_and_slot_with, Cluster, OverlapPolicy, TimelineItem};
