use crate::infra::{mock_agenda_service, parse_date, parse_policy, MockAgendaService};
use chrono::{NaiveDate, NaiveDateTime};
use clap::Args;
use dieti_agenda::agenda::{
    IgnoredReason, OverlapPolicy, RequestId, TimelineCounts, TimelineEntry, Transition,
    VisitRequest,
};
use dieti_agenda::config::AppConfig;
use dieti_agenda::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct TimelineArgs {
    /// Day to build the sample agenda for (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) day: Option<NaiveDate>,
    /// Overlap policy override: `anchor` or `running`.
    #[arg(long, value_parser = parse_policy)]
    pub(crate) policy: Option<OverlapPolicy>,
    /// Print the timeline as JSON instead of text.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Day to build the sample agenda for (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) day: Option<NaiveDate>,
    /// Overlap policy override: `anchor` or `running`.
    #[arg(long, value_parser = parse_policy)]
    pub(crate) policy: Option<OverlapPolicy>,
}

pub(crate) async fn run_timeline(args: TimelineArgs) -> Result<(), AppError> {
    let TimelineArgs { day, policy, json } = args;

    let config = AppConfig::load()?;
    let service = mock_agenda_service(&config.agenda, day, policy);
    service.load().await?;

    let entries = service.timeline()?;
    if json {
        match serde_json::to_string_pretty(&entries) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("Timeline payload unavailable: {err}"),
        }
        return Ok(());
    }

    println!("Confirmed schedule ({} policy)", service.policy().label());
    render_timeline(&entries);
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { day, policy } = args;

    let config = AppConfig::load()?;
    let service = mock_agenda_service(&config.agenda, day, policy);

    println!("Agent agenda demo");
    match service.load().await? {
        Transition::Loaded {
            appointments,
            visit_requests,
        } => println!("- Loaded {appointments} appointments and {visit_requests} visit requests"),
        other => println!("- Unexpected load outcome: {other:?}"),
    }

    println!("\nPending requests");
    render_requests(&service);

    println!("\nConfirmed schedule before decisions");
    render_timeline(&service.timeline()?);

    println!("\nDecisions");
    let script = [
        ("req-1", true),
        ("req-2", true),
        ("req-4", false),
        ("req-4", false),
        ("req-3", true),
    ];
    for (id, accept) in script {
        let request_id = RequestId(id.to_string());
        let (verb, transition) = if accept {
            ("accept", service.accept(request_id)?)
        } else {
            ("reject", service.reject(request_id)?)
        };
        println!("- {verb} {id}: {}", describe(&transition));
    }

    println!("\nPending requests after decisions");
    render_requests(&service);

    println!("\nConfirmed schedule after decisions");
    render_timeline(&service.timeline()?);
    Ok(())
}

fn describe(transition: &Transition) -> String {
    match transition {
        Transition::Loaded { .. } => "agenda reloaded".to_string(),
        Transition::Created { appointment_id, .. } => {
            format!("new appointment {appointment_id}")
        }
        Transition::Merged {
            appointment_id,
            participants,
            ..
        } => format!("joined {appointment_id} ({participants} clients)"),
        Transition::Declined { .. } => "declined".to_string(),
        Transition::Ignored {
            reason: IgnoredReason::UnknownRequest,
            ..
        } => "no-op (already handled)".to_string(),
        Transition::Ignored { reason, .. } => format!("no-op ({})", reason.label()),
    }
}

fn render_requests(service: &MockAgendaService) {
    let overview = service.overview();
    if overview.pending_requests.is_empty() {
        println!("  none");
        return;
    }
    for request in &overview.pending_requests {
        println!("  - {}", request_line(request));
    }
}

fn request_line(request: &VisitRequest) -> String {
    let note = if let Some(conflict) = &request.conflict {
        format!(
            "conflicts with {} ({})",
            conflict.conflicting_appointment_id, conflict.reason
        )
    } else if request.is_group_opportunity {
        format!(
            "group opportunity, {} interested clients",
            request.potential_clients.len()
        )
    } else {
        "standard request".to_string()
    };
    format!(
        "{} {} - {} [{}]",
        request.id,
        hhmm(request.requested_time),
        request.property.address,
        note
    )
}

fn render_timeline(entries: &[TimelineEntry]) {
    if entries.is_empty() {
        println!("  ...");
        return;
    }

    for entry in entries {
        match entry {
            TimelineEntry::Empty {
                start_time,
                end_time,
            } => println!(
                "  {}-{}  No appointments",
                hhmm(*start_time),
                hhmm(*end_time)
            ),
            TimelineEntry::Event {
                label,
                weight,
                start_time,
                end_time,
                clients,
                appointments,
                ..
            } => {
                let names: Vec<&str> = clients.iter().map(|client| client.name.as_str()).collect();
                println!(
                    "  {}-{}  {} [{:?}] {}",
                    hhmm(*start_time),
                    hhmm(*end_time),
                    label,
                    weight,
                    names.join(", ")
                );
                for appointment in appointments.appointments() {
                    println!(
                        "      {} {}-{} {} ({})",
                        appointment.id,
                        hhmm(appointment.start_time),
                        hhmm(appointment.end_time),
                        appointment.property.address,
                        appointment.kind.label()
                    );
                }
            }
        }
    }

    let counts = TimelineCounts::tally(entries);
    println!(
        "  {} single | {} group | {} conflict | {} free slots",
        counts.single, counts.group, counts.conflict, counts.empty_slots
    );
}

fn hhmm(value: NaiveDateTime) -> String {
    value.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dieti_agenda::agenda::seed::sample_agenda;

    #[test]
    fn request_lines_describe_conflicts_and_opportunities() {
        let day = NaiveDate::from_ymd_opt(2025, 10, 6).expect("valid date");
        let snapshot = sample_agenda(day);

        let lines: Vec<String> = snapshot.visit_requests.iter().map(request_line).collect();

        assert!(lines[0].starts_with("req-1 09:00"));
        assert!(lines[1].contains("group opportunity, 2 interested clients"));
        assert!(lines[2].contains("conflicts with app-seed-3"));
        assert!(lines[3].ends_with("[standard request]"));
    }

    #[test]
    fn describe_flags_repeated_decisions_as_no_ops() {
        let transition = Transition::Ignored {
            request_id: RequestId("req-4".to_string()),
            reason: IgnoredReason::UnknownRequest,
        };
        assert_eq!(describe(&transition), "no-op (already handled)");
    }
}
