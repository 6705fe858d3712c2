use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::domain::{Appointment, User};

/// How the grouper decides that a candidate belongs to the current cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Candidates must start before the cluster's earliest member ends.
    #[default]
    AnchorOnly,
    /// Candidates must start before the latest end seen in the cluster so far.
    RunningEnd,
}

impl OverlapPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "anchor" | "anchor_only" | "first" => Some(Self::AnchorOnly),
            "running" | "running_end" | "max" => Some(Self::RunningEnd),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AnchorOnly => "anchor_only",
            Self::RunningEnd => "running_end",
        }
    }
}

/// Non-empty run of appointments ordered by start time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cluster(Vec<Appointment>);

impl Cluster {
    pub fn new(appointments: Vec<Appointment>) -> Option<Self> {
        if appointments.is_empty() {
            None
        } else {
            Some(Self(appointments))
        }
    }

    pub fn first(&self) -> &Appointment {
        &self.0[0]
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.first().start_time
    }

    /// Latest end among the members, not necessarily the last member's.
    pub fn end_time(&self) -> NaiveDateTime {
        self.0
            .iter()
            .map(|appointment| appointment.end_time)
            .max()
            .unwrap_or(self.first().end_time)
    }

    /// Every client attending any member, first occurrence wins.
    pub fn clients(&self) -> Vec<&User> {
        let mut clients: Vec<&User> = Vec::new();
        for user in self.0.iter().flat_map(|a| a.participants.clients()) {
            if !clients.iter().any(|seen| seen.id == user.id) {
                clients.push(user);
            }
        }
        clients
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimelineItem {
    Event {
        appointments: Cluster,
    },
    Empty {
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    },
}

impl TimelineItem {
    pub fn as_event(&self) -> Option<&Cluster> {
        match self {
            Self::Event { appointments } => Some(appointments),
            Self::Empty { .. } => None,
        }
    }

    pub fn is_empty_slot(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}

/// [`group_and_slot_with`] using [`OverlapPolicy::AnchorOnly`].
pub fn group_and_slot(appointments: &[Appointment]) -> Vec<TimelineItem> {
    group_and_slot_with(appointments, OverlapPolicy::AnchorOnly)
}

/// Sorts appointments, clusters overlapping runs and inserts empty slots for
/// the uncovered time between clusters.
///
/// Comparisons are strict: back-to-back appointments land in separate
/// clusters and a zero-length gap is never emitted. No slot precedes the
/// first event or follows the last one.
pub fn group_and_slot_with(
    appointments: &[Appointment],
    policy: OverlapPolicy,
) -> Vec<TimelineItem> {
    let mut sorted: Vec<&Appointment> = appointments.iter().collect();
    sorted.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));

    let Some(first) = sorted.first() else {
        return Vec::new();
    };

    let mut items = Vec::new();
    let mut cursor_end = first.start_time;
    let mut i = 0;

    while i < sorted.len() {
        let anchor = sorted[i];
        if anchor.start_time > cursor_end {
            items.push(TimelineItem::Empty {
                start_time: cursor_end,
                end_time: anchor.start_time,
            });
        }

        let mut members = vec![anchor.clone()];
        let mut cluster_end = anchor.end_time;
        let mut j = i + 1;
        while j < sorted.len() {
            let candidate = sorted[j];
            let limit = match policy {
                OverlapPolicy::AnchorOnly => anchor.end_time,
                OverlapPolicy::RunningEnd => cluster_end,
            };
            if candidate.start_time >= limit {
                break;
            }
            cluster_end = cluster_end.max(candidate.end_time);
            members.push(candidate.clone());
            j += 1;
        }

        cursor_end = cursor_end.max(cluster_end);
        items.push(TimelineItem::Event {
            appointments: Cluster(members),
        });
        i = j;
    }

    items
}
