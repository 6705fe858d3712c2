//! Sample agenda used by the in-memory source and the CLI demo.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use super::domain::{
    AgendaSnapshot, Appointment, AppointmentId, AppointmentKind, Participants, Property,
    PropertyId, RequestConflict, RequestId, User, UserId, VisitRequest,
};

pub fn property(id: &str, address: &str) -> Property {
    Property {
        id: PropertyId(id.to_string()),
        address: address.to_string(),
        image_url: Some(format!("https://picsum.photos/seed/{id}/800/600")),
    }
}

pub fn client(id: &str, name: &str) -> User {
    User {
        id: UserId(id.to_string()),
        name: name.to_string(),
        avatar_url: None,
    }
}

/// Wall-clock instant on `day`.
pub fn at(day: NaiveDate, hour: i64, minute: i64) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN) + Duration::minutes(hour * 60 + minute)
}

fn visit(
    id: &str,
    property: Property,
    client: User,
    start_time: NaiveDateTime,
    minutes: i64,
    kind: AppointmentKind,
) -> Appointment {
    Appointment {
        id: AppointmentId(id.to_string()),
        property,
        participants: Participants::single(client),
        start_time,
        end_time: start_time + Duration::minutes(minutes),
        duration_minutes: minutes,
        kind,
        notes: None,
    }
}

/// A working day with one group visit, one double booking, an extended
/// viewing and four open requests.
pub fn sample_agenda(day: NaiveDate) -> AgendaSnapshot {
    let villa = property("prop-1", "Via dei Giardini 1, Como");
    let shop = property("prop-2", "Corso Italia 45, Milano");
    let warehouse = property("prop-3", "Zona Industriale 3, Bergamo");
    let land = property("prop-4", "Via delle Querce 78, Monza");
    let flat = property("prop-5", "Via Roma 101, Firenze");

    let appointments = vec![
        visit(
            "app-seed-1",
            villa.clone(),
            client("user-1", "Giulia Bianchi"),
            at(day, 9, 0),
            60,
            AppointmentKind::Standard,
        ),
        visit(
            "app-seed-2",
            villa.clone(),
            client("user-2", "Luca Ferri"),
            at(day, 9, 30),
            60,
            AppointmentKind::Standard,
        ),
        visit(
            "app-seed-3",
            shop.clone(),
            client("user-3", "Sara Conti"),
            at(day, 11, 0),
            60,
            AppointmentKind::Standard,
        ),
        visit(
            "app-seed-4",
            warehouse.clone(),
            client("user-4", "Paolo Greco"),
            at(day, 11, 30),
            60,
            AppointmentKind::Conflict,
        ),
        visit(
            "app-seed-5",
            land.clone(),
            client("user-5", "Elena Russo"),
            at(day, 14, 0),
            90,
            AppointmentKind::Extended,
        )
        .with_notes("Walk the full plot boundary with the surveyor"),
    ];

    let visit_requests = vec![
        VisitRequest::pending(
            RequestId("req-1".to_string()),
            villa,
            vec![client("user-6", "Marco Esposito")],
            at(day, 9, 0),
        ),
        VisitRequest::pending(
            RequestId("req-2".to_string()),
            flat,
            vec![
                client("user-7", "Chiara Romano"),
                client("user-8", "Davide Colombo"),
            ],
            at(day, 16, 0),
        )
        .as_group_opportunity(),
        VisitRequest::pending(
            RequestId("req-3".to_string()),
            warehouse,
            vec![client("user-9", "Franco Ricci")],
            at(day, 11, 0),
        )
        .with_conflict(RequestConflict {
            conflicting_appointment_id: AppointmentId("app-seed-3".to_string()),
            reason: "Overlapping time slot".to_string(),
        }),
        VisitRequest::pending(
            RequestId("req-4".to_string()),
            land,
            vec![client("user-10", "Anna Marino")],
            at(day, 17, 0),
        ),
    ];

    AgendaSnapshot {
        appointments,
        visit_requests,
    }
}
