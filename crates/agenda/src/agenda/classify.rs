use chrono::NaiveDateTime;
use serde::Serialize;

use super::domain::{Appointment, User};
use super::timeline::{group_and_slot_with, Cluster, OverlapPolicy, TimelineItem};

/// Interpretation of a timeline cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitClass {
    /// One appointment on its own.
    Single,
    /// Several appointments at the same property, visited together.
    Group,
    /// Overlapping appointments at different properties.
    Conflict,
}

/// Visual weight the day view gives a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    Standard,
    Elevated,
    Critical,
}

impl VisitClass {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Single => "Single visit",
            Self::Group => "Group visit",
            Self::Conflict => "Scheduling conflict",
        }
    }

    pub const fn weight(self) -> Emphasis {
        match self {
            Self::Single => Emphasis::Standard,
            Self::Group => Emphasis::Elevated,
            Self::Conflict => Emphasis::Critical,
        }
    }
}

pub fn classify(cluster: &Cluster) -> VisitClass {
    let members = cluster.appointments();
    if members.len() == 1 {
        return VisitClass::Single;
    }

    let property = &cluster.first().property.id;
    if members.iter().all(|appointment| &appointment.property.id == property) {
        VisitClass::Group
    } else {
        VisitClass::Conflict
    }
}

/// Renderable row of the day view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimelineEntry {
    Event {
        class: VisitClass,
        weight: Emphasis,
        label: &'static str,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        clients: Vec<User>,
        appointments: Cluster,
    },
    Empty {
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    },
}

impl From<TimelineItem> for TimelineEntry {
    fn from(item: TimelineItem) -> Self {
        match item {
            TimelineItem::Empty {
                start_time,
                end_time,
            } => Self::Empty {
                start_time,
                end_time,
            },
            TimelineItem::Event { appointments } => {
                let class = classify(&appointments);
                Self::Event {
                    class,
                    weight: class.weight(),
                    label: class.label(),
                    start_time: appointments.start_time(),
                    end_time: appointments.end_time(),
                    clients: appointments.clients().into_iter().cloned().collect(),
                    appointments,
                }
            }
        }
    }
}

/// Groups and classifies `appointments` in one pass.
pub fn timeline_entries(appointments: &[Appointment], policy: OverlapPolicy) -> Vec<TimelineEntry> {
    group_and_slot_with(appointments, policy)
        .into_iter()
        .map(TimelineEntry::from)
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimelineCounts {
    pub single: usize,
    pub group: usize,
    pub conflict: usize,
    pub empty_slots: usize,
}

impl TimelineCounts {
    pub fn tally(entries: &[TimelineEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut counts, entry| {
            match entry {
                TimelineEntry::Empty { .. } => counts.empty_slots += 1,
                TimelineEntry::Event { class, .. } => match class {
                    VisitClass::Single => counts.single += 1,
                    VisitClass::Group => counts.group += 1,
                    VisitClass::Conflict => counts.conflict += 1,
                },
            }
            counts
        })
    }
}
