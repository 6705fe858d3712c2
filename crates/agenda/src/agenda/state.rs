use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{
    AgendaSnapshot, Appointment, AppointmentId, AppointmentKind, Participants, PropertyId,
    RequestId, VisitRequest, DEFAULT_VISIT_MINUTES,
};

/// Actions accepted by [`AgendaState::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgendaAction {
    SetInitialData(AgendaSnapshot),
    AcceptRequest { request_id: RequestId },
    RejectRequest { request_id: RequestId },
}

/// What a dispatch did to the state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Transition {
    Loaded {
        appointments: usize,
        visit_requests: usize,
    },
    Created {
        request_id: RequestId,
        appointment_id: AppointmentId,
    },
    Merged {
        request_id: RequestId,
        appointment_id: AppointmentId,
        participants: usize,
    },
    Declined {
        request_id: RequestId,
    },
    Ignored {
        request_id: RequestId,
        reason: IgnoredReason,
    },
}

impl Transition {
    pub fn changed_state(&self) -> bool {
        !matches!(self, Self::Ignored { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoredReason {
    UnknownRequest,
    NoPotentialClients,
}

impl IgnoredReason {
    pub const fn label(self) -> &'static str {
        match self {
            Self::UnknownRequest => "unknown request",
            Self::NoPotentialClients => "request has no potential clients",
        }
    }
}

type SlotKey = (PropertyId, NaiveDateTime);

/// Canonical `(appointments, visit_requests)` pair owned by the agenda.
///
/// Both collections are keyed by id; `slots` indexes appointments by
/// property and start time so accepting a request does not scan the list.
/// Only open requests are held: a request leaves the state as soon as it is
/// resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgendaState {
    appointments: BTreeMap<AppointmentId, Appointment>,
    visit_requests: BTreeMap<RequestId, VisitRequest>,
    slots: HashMap<SlotKey, AppointmentId>,
    sequence: u64,
}

impl AgendaState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: AgendaSnapshot) -> Self {
        let mut state = Self::default();
        state.dispatch(AgendaAction::SetInitialData(snapshot));
        state
    }

    /// Pure form of [`AgendaState::dispatch`]: leaves `self` untouched.
    pub fn reduce(&self, action: AgendaAction) -> (Self, Transition) {
        let mut next = self.clone();
        let transition = next.dispatch(action);
        (next, transition)
    }

    pub fn dispatch(&mut self, action: AgendaAction) -> Transition {
        match action {
            AgendaAction::SetInitialData(snapshot) => self.load(snapshot),
            AgendaAction::AcceptRequest { request_id } => self.accept(request_id),
            AgendaAction::RejectRequest { request_id } => self.reject(request_id),
        }
    }

    pub fn appointments(&self) -> impl Iterator<Item = &Appointment> {
        self.appointments.values()
    }

    pub fn appointment(&self, id: &AppointmentId) -> Option<&Appointment> {
        self.appointments.get(id)
    }

    pub fn appointment_count(&self) -> usize {
        self.appointments.len()
    }

    pub fn visit_requests(&self) -> impl Iterator<Item = &VisitRequest> {
        self.visit_requests.values()
    }

    pub fn visit_request(&self, id: &RequestId) -> Option<&VisitRequest> {
        self.visit_requests.get(id)
    }

    /// Requests still awaiting a decision, earliest requested time first.
    pub fn pending_requests(&self) -> Vec<&VisitRequest> {
        let mut pending: Vec<&VisitRequest> = self
            .visit_requests
            .values()
            .filter(|request| request.status.is_open())
            .collect();
        pending.sort_by(|a, b| {
            a.requested_time
                .cmp(&b.requested_time)
                .then_with(|| a.id.cmp(&b.id))
        });
        pending
    }

    pub fn snapshot(&self) -> AgendaSnapshot {
        AgendaSnapshot {
            appointments: self.appointments.values().cloned().collect(),
            visit_requests: self.visit_requests.values().cloned().collect(),
        }
    }

    fn load(&mut self, snapshot: AgendaSnapshot) -> Transition {
        let AgendaSnapshot {
            appointments,
            visit_requests,
        } = snapshot;

        self.slots = index_slots(&appointments);
        self.appointments = appointments
            .into_iter()
            .map(|appointment| (appointment.id.clone(), appointment))
            .collect();

        let received = visit_requests.len();
        self.visit_requests = visit_requests
            .into_iter()
            .filter(|request| request.status.is_open())
            .map(|request| (request.id.clone(), request))
            .collect();
        let discarded = received - self.visit_requests.len();
        if discarded > 0 {
            debug!(discarded, "resolved visit requests dropped on load");
        }

        Transition::Loaded {
            appointments: self.appointments.len(),
            visit_requests: self.visit_requests.len(),
        }
    }

    fn accept(&mut self, request_id: RequestId) -> Transition {
        let Some(request) = self.visit_requests.get(&request_id) else {
            return ignored(request_id, IgnoredReason::UnknownRequest);
        };
        if request.potential_clients.is_empty() {
            return ignored(request_id, IgnoredReason::NoPotentialClients);
        }

        let Some(request) = self.visit_requests.remove(&request_id) else {
            return ignored(request_id, IgnoredReason::UnknownRequest);
        };
        let slot = (request.property.id.clone(), request.requested_time);

        if let Some(appointment) = self
            .slots
            .get(&slot)
            .and_then(|id| self.appointments.get_mut(id))
            .filter(|appointment| {
                appointment.property.id == slot.0 && appointment.start_time == slot.1
            })
        {
            let participants = std::mem::replace(
                &mut appointment.participants,
                Participants::Group {
                    clients: Vec::new(),
                },
            );
            appointment.participants = participants.merge(&request.potential_clients);
            appointment.kind = AppointmentKind::Group;

            let transition = Transition::Merged {
                request_id,
                appointment_id: appointment.id.clone(),
                participants: appointment.participants.len(),
            };
            info!(?transition, "visit request merged into existing appointment");
            return transition;
        }

        let Some(appointment) = self.appointment_from_request(request) else {
            return ignored(request_id, IgnoredReason::NoPotentialClients);
        };
        let appointment_id = appointment.id.clone();
        self.slots.insert(slot, appointment_id.clone());
        self.appointments.insert(appointment_id.clone(), appointment);

        let transition = Transition::Created {
            request_id,
            appointment_id,
        };
        info!(?transition, "visit request confirmed as new appointment");
        transition
    }

    fn reject(&mut self, request_id: RequestId) -> Transition {
        if self.visit_requests.remove(&request_id).is_none() {
            return ignored(request_id, IgnoredReason::UnknownRequest);
        }

        let transition = Transition::Declined { request_id };
        info!(?transition, "visit request declined");
        transition
    }

    /// Only group opportunities keep every potential client; ordinary
    /// requests confirm the first client.
    fn appointment_from_request(&mut self, request: VisitRequest) -> Option<Appointment> {
        let end_time = request.proposed_end_time();
        let VisitRequest {
            property,
            potential_clients,
            requested_time,
            is_group_opportunity,
            ..
        } = request;

        let (participants, kind) = if is_group_opportunity && potential_clients.len() > 1 {
            (
                Participants::Group {
                    clients: potential_clients,
                },
                AppointmentKind::Group,
            )
        } else {
            let client = potential_clients.into_iter().next()?;
            (Participants::single(client), AppointmentKind::Standard)
        };

        Some(Appointment {
            id: self.next_appointment_id(),
            property,
            participants,
            start_time: requested_time,
            end_time,
            duration_minutes: DEFAULT_VISIT_MINUTES,
            kind,
            notes: None,
        })
    }

    fn next_appointment_id(&mut self) -> AppointmentId {
        loop {
            self.sequence += 1;
            let id = AppointmentId(format!("app-{:06}", self.sequence));
            if !self.appointments.contains_key(&id) {
                return id;
            }
        }
    }
}

/// Slot index over `appointments`; the first appointment in input order owns
/// a shared slot.
fn index_slots(appointments: &[Appointment]) -> HashMap<SlotKey, AppointmentId> {
    let mut slots = HashMap::with_capacity(appointments.len());
    for appointment in appointments {
        slots
            .entry((appointment.property.id.clone(), appointment.start_time))
            .or_insert_with(|| appointment.id.clone());
    }
    slots
}

fn ignored(request_id: RequestId, reason: IgnoredReason) -> Transition {
    warn!(request_id = %request_id, reason = reason.label(), "visit request action ignored");
    Transition::Ignored { request_id, reason }
}
