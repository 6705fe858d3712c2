use chrono::{Local, NaiveDate};
use dieti_agenda::agenda::seed::sample_agenda;
use dieti_agenda::agenda::{AgendaService, InMemoryAgendaSource, OverlapPolicy};
use dieti_agenda::config::AgendaConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type MockAgendaService = AgendaService<InMemoryAgendaSource>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Agenda service over the in-memory sample day.
pub(crate) fn mock_agenda_service(
    config: &AgendaConfig,
    day: Option<NaiveDate>,
    policy: Option<OverlapPolicy>,
) -> Arc<MockAgendaService> {
    let day = day.unwrap_or_else(|| Local::now().date_naive());
    let source = InMemoryAgendaSource::new(sample_agenda(day)).with_delay(config.mock_delay);
    Arc::new(AgendaService::new(
        Arc::new(source),
        policy.unwrap_or(config.overlap_policy),
    ))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_policy(raw: &str) -> Result<OverlapPolicy, String> {
    OverlapPolicy::parse(raw)
        .ok_or_else(|| format!("unknown overlap policy '{raw}' (anchor|running)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn parse_date_reports_bad_input() {
        assert_eq!(
            parse_date("2025-10-06"),
            Ok(NaiveDate::from_ymd_opt(2025, 10, 6).expect("valid"))
        );
        assert!(parse_date("06/10/2025").unwrap_err().contains("YYYY-MM-DD"));
    }

    #[test]
    fn explicit_policy_overrides_config() {
        let config = AgendaConfig {
            overlap_policy: OverlapPolicy::AnchorOnly,
            mock_delay: Duration::ZERO,
        };
        let service = mock_agenda_service(&config, None, Some(OverlapPolicy::RunningEnd));
        assert_eq!(service.policy(), OverlapPolicy::RunningEnd);
        assert!(!service.is_loaded());
    }
}
