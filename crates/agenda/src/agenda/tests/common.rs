use std::sync::Arc;
use std::time::Duration as StdDuration;

use axum::response::Response;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::agenda::domain::{
    AgendaSnapshot, Appointment, AppointmentId, AppointmentKind, Participants, Property,
    PropertyId, RequestId, User, UserId, VisitRequest,
};
use crate::agenda::seed::{self, sample_agenda};
use crate::agenda::service::AgendaService;
use crate::agenda::source::InMemoryAgendaSource;
use crate::agenda::timeline::OverlapPolicy;

pub(super) fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 6).expect("valid date")
}

pub(super) fn at(hour: i64, minute: i64) -> NaiveDateTime {
    seed::at(day(), hour, minute)
}

pub(super) fn property(id: &str) -> Property {
    Property {
        id: PropertyId(id.to_string()),
        address: format!("{id} address"),
        image_url: None,
    }
}

pub(super) fn user(id: &str) -> User {
    User {
        id: UserId(id.to_string()),
        name: format!("Client {id}"),
        avatar_url: None,
    }
}

pub(super) fn appointment(
    id: &str,
    property_id: &str,
    client_id: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Appointment {
    Appointment::new(
        AppointmentId(id.to_string()),
        property(property_id),
        Participants::single(user(client_id)),
        start,
        end,
        AppointmentKind::Standard,
    )
    .expect("valid appointment")
}

pub(super) fn request(
    id: &str,
    property_id: &str,
    client_ids: &[&str],
    requested_time: NaiveDateTime,
) -> VisitRequest {
    VisitRequest::pending(
        RequestId(id.to_string()),
        property(property_id),
        client_ids.iter().map(|client| user(client)).collect(),
        requested_time,
    )
}

pub(super) fn request_id(id: &str) -> RequestId {
    RequestId(id.to_string())
}

pub(super) fn snapshot(
    appointments: Vec<Appointment>,
    visit_requests: Vec<VisitRequest>,
) -> AgendaSnapshot {
    AgendaSnapshot {
        appointments,
        visit_requests,
    }
}

pub(super) fn instant_source(snapshot: AgendaSnapshot) -> InMemoryAgendaSource {
    InMemoryAgendaSource::new(snapshot).with_delay(StdDuration::ZERO)
}

pub(super) fn sample_service() -> Arc<AgendaService<InMemoryAgendaSource>> {
    Arc::new(AgendaService::new(
        Arc::new(instant_source(sample_agenda(day()))),
        OverlapPolicy::AnchorOnly,
    ))
}

pub(super) fn minutes(value: i64) -> Duration {
    Duration::minutes(value)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("valid json")
}
