use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a visit created from an accepted request.
pub const DEFAULT_VISIT_MINUTES: i64 = 60;

/// Identifier wrapper for listed properties.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub String);

/// Identifier wrapper for buyers requesting or attending visits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for confirmed appointments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AppointmentId(pub String);

/// Identifier wrapper for pending visit requests.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

macro_rules! display_id {
    ($($name:ident),+) => {
        $(impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        })+
    };
}

display_id!(PropertyId, UserId, AppointmentId, RequestId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Who attends an appointment. Standalone visits start as `Single` and only
/// become `Group` through a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Participants {
    Single { client: User },
    Group { clients: Vec<User> },
}

impl Participants {
    pub fn single(client: User) -> Self {
        Self::Single { client }
    }

    pub fn clients(&self) -> &[User] {
        match self {
            Self::Single { client } => std::slice::from_ref(client),
            Self::Group { clients } => clients,
        }
    }

    pub fn len(&self) -> usize {
        self.clients().len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients().is_empty()
    }

    /// Union of the current participants and `incoming`, keyed by user id.
    /// Always yields the `Group` variant, even when `incoming` adds nobody.
    pub fn merge<'a, I>(self, incoming: I) -> Self
    where
        I: IntoIterator<Item = &'a User>,
    {
        let mut clients = match self {
            Self::Single { client } => vec![client],
            Self::Group { clients } => clients,
        };

        for user in incoming {
            if !clients.iter().any(|existing| existing.id == user.id) {
                clients.push(user.clone());
            }
        }

        Self::Group { clients }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentKind {
    Standard,
    Group,
    Conflict,
    Extended,
}

impl AppointmentKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Group => "group",
            Self::Conflict => "conflict",
            Self::Extended => "extended",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub property: Property,
    pub participants: Participants,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_minutes: i64,
    pub kind: AppointmentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Appointment {
    /// Builds an appointment, deriving `duration_minutes` from the interval.
    pub fn new(
        id: AppointmentId,
        property: Property,
        participants: Participants,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        kind: AppointmentKind,
    ) -> Result<Self, AgendaError> {
        if start_time >= end_time {
            return Err(AgendaError::InvalidInterval {
                appointment_id: id,
                start_time,
                end_time,
            });
        }
        if participants.is_empty() {
            return Err(AgendaError::NoParticipants(id));
        }

        Ok(Self {
            id,
            property,
            participants,
            start_time,
            end_time,
            duration_minutes: (end_time - start_time).num_minutes(),
            kind,
            notes: None,
        })
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Checks the interval and duration invariants on data that bypassed
    /// [`Appointment::new`], e.g. deserialized payloads.
    pub fn validate(&self) -> Result<(), AgendaError> {
        if self.start_time >= self.end_time {
            return Err(AgendaError::InvalidInterval {
                appointment_id: self.id.clone(),
                start_time: self.start_time,
                end_time: self.end_time,
            });
        }
        let expected = (self.end_time - self.start_time).num_minutes();
        if self.duration_minutes != expected {
            return Err(AgendaError::DurationMismatch {
                appointment_id: self.id.clone(),
                declared: self.duration_minutes,
                expected,
            });
        }
        if self.participants.is_empty() {
            return Err(AgendaError::NoParticipants(self.id.clone()));
        }
        Ok(())
    }
}

/// Lifecycle of a visit request. `Pending` and `Conflicting` are open;
/// accepting or rejecting resolves the request and removes it from the
/// agenda, so `Confirmed` and `Declined` only appear on source data and are
/// dropped when it is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Confirmed,
    Declined,
    Conflicting,
}

impl RequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Declined => "declined",
            Self::Conflicting => "conflicting",
        }
    }

    pub const fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::Conflicting)
    }
}

/// Clash flagged by the backend when the request was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestConflict {
    pub conflicting_appointment_id: AppointmentId,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRequest {
    pub id: RequestId,
    pub property: Property,
    pub potential_clients: Vec<User>,
    pub requested_time: NaiveDateTime,
    pub status: RequestStatus,
    #[serde(default)]
    pub is_group_opportunity: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict: Option<RequestConflict>,
}

impl VisitRequest {
    pub fn pending(
        id: RequestId,
        property: Property,
        potential_clients: Vec<User>,
        requested_time: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            property,
            potential_clients,
            requested_time,
            status: RequestStatus::Pending,
            is_group_opportunity: false,
            conflict: None,
        }
    }

    pub fn as_group_opportunity(mut self) -> Self {
        self.is_group_opportunity = true;
        self
    }

    pub fn with_conflict(mut self, conflict: RequestConflict) -> Self {
        self.status = RequestStatus::Conflicting;
        self.conflict = Some(conflict);
        self
    }

    /// Interval a confirmed visit for this request would occupy.
    pub fn proposed_end_time(&self) -> NaiveDateTime {
        self.requested_time + Duration::minutes(DEFAULT_VISIT_MINUTES)
    }
}

/// Raw agenda payload as delivered by a source, before it is loaded into
/// the reducer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaSnapshot {
    pub appointments: Vec<Appointment>,
    pub visit_requests: Vec<VisitRequest>,
}

impl AgendaSnapshot {
    /// Rejects malformed appointments so downstream grouping stays total.
    pub fn validate(&self) -> Result<(), AgendaError> {
        self.appointments.iter().try_for_each(Appointment::validate)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AgendaError {
    #[error("appointment {appointment_id} must start before it ends ({start_time} >= {end_time})")]
    InvalidInterval {
        appointment_id: AppointmentId,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    },
    #[error("appointment {appointment_id} declares {declared} minutes but spans {expected}")]
    DurationMismatch {
        appointment_id: AppointmentId,
        declared: i64,
        expected: i64,
    },
    #[error("appointment {0} has no participants")]
    NoParticipants(AppointmentId),
}
