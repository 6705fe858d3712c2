use super::common::*;
use crate::agenda::classify::{TimelineCounts, TimelineEntry};
use crate::agenda::seed::sample_agenda;
use crate::agenda::service::{AgendaService, AgendaServiceError};
use crate::agenda::source::{load_agenda, SourceError};
use crate::agenda::state::Transition;
use crate::agenda::timeline::OverlapPolicy;
use crate::agenda::AgendaError;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::test]
async fn load_joins_both_fetches() {
    let source = instant_source(sample_agenda(day())).with_delay(Duration::from_millis(200));

    let started = Instant::now();
    let snapshot = load_agenda(&source).await.expect("load succeeds");

    assert_eq!(snapshot.appointments.len(), 5);
    assert_eq!(snapshot.visit_requests.len(), 4);
    assert!(
        started.elapsed() < Duration::from_millis(390),
        "fetches should run concurrently"
    );
}

#[tokio::test]
async fn failed_fetch_leaves_state_untouched() {
    let source = instant_source(sample_agenda(day())).failing("backend offline");
    let service = AgendaService::new(Arc::new(source), OverlapPolicy::AnchorOnly);

    match service.load().await {
        Err(AgendaServiceError::Source(SourceError::Unavailable(message))) => {
            assert_eq!(message, "backend offline")
        }
        other => panic!("expected unavailable source, got {other:?}"),
    }
    assert!(!service.is_loaded());
    assert_eq!(service.state().appointment_count(), 0);
}

#[tokio::test]
async fn malformed_appointments_are_rejected_at_ingestion() {
    let mut broken = appointment("a", "prop-1", "u1", at(9, 0), at(10, 0));
    broken.end_time = broken.start_time;
    let source = instant_source(snapshot(vec![broken], Vec::new()));

    match load_agenda(&source).await {
        Err(SourceError::Invalid(AgendaError::InvalidInterval { .. })) => {}
        other => panic!("expected invalid interval, got {other:?}"),
    }
}

#[tokio::test]
async fn declared_duration_must_match_interval() {
    let mut drifted = appointment("a", "prop-1", "u1", at(9, 0), at(10, 0));
    drifted.duration_minutes = 45;
    let source = instant_source(snapshot(vec![drifted], Vec::new()));

    assert!(matches!(
        load_agenda(&source).await,
        Err(SourceError::Invalid(AgendaError::DurationMismatch { expected: 60, .. }))
    ));
}

#[test]
fn actions_before_load_are_refused() {
    let service = sample_service();

    assert!(matches!(
        service.accept(request_id("req-1")),
        Err(AgendaServiceError::NotLoaded)
    ));
    assert!(matches!(service.timeline(), Err(AgendaServiceError::NotLoaded)));
    assert!(!service.overview().loaded);
}

#[tokio::test]
async fn accepting_sample_request_merges_into_group_visit() {
    let service = sample_service();
    service.load().await.expect("load succeeds");

    let transition = service.accept(request_id("req-1")).expect("loaded");

    assert!(matches!(
        transition,
        Transition::Merged {
            participants: 2,
            ..
        }
    ));
    let overview = service.overview();
    assert_eq!(overview.appointments.len(), 5);
    assert_eq!(overview.pending_requests.len(), 3);
}

#[tokio::test]
async fn accepting_group_opportunity_adds_a_group_block() {
    let service = sample_service();
    service.load().await.expect("load succeeds");

    service.accept(request_id("req-2")).expect("loaded");
    service.reject(request_id("req-4")).expect("loaded");

    let entries = service.timeline().expect("timeline");
    let counts = TimelineCounts::tally(&entries);
    assert_eq!(counts.group, 1);
    assert_eq!(counts.single, 2);
    assert_eq!(counts.empty_slots, 3);

    let last = entries.last().expect("entries present");
    let TimelineEntry::Event { clients, .. } = last else {
        panic!("timeline ends with an event");
    };
    assert_eq!(clients.len(), 2);
    assert_eq!(service.overview().pending_requests.len(), 2);
}
