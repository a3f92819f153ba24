//! Fixtures shared by the unit tests of this crate.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use mechanics_core::{
    Creature, CreatureDescriptor, CreatureId, ExhaustionType, Location, MechanicsConfig,
};

use crate::events::RecordingNotifier;
use crate::operation::{
    Collaborators, Operation, OperationContext, OperationError, OperationId,
};

pub type ProbeLog = Arc<Mutex<Vec<String>>>;

pub fn probe_log() -> ProbeLog {
    Arc::new(Mutex::new(Vec::new()))
}

#[derive(Debug, Clone, Copy)]
pub enum ProbeBehavior {
    Complete,
    Fail,
    Panic,
    FollowUp(Duration),
    CancelSelf,
    Cancel(OperationId),
}

/// Operation that appends its label to a shared log when executed.
pub struct Probe {
    label: String,
    requestor: CreatureId,
    kind: ExhaustionType,
    cost: Duration,
    cancellable: bool,
    behavior: ProbeBehavior,
    log: ProbeLog,
}

impl Probe {
    pub fn new(label: &str, log: &ProbeLog) -> Self {
        Self {
            label: label.to_owned(),
            requestor: CreatureId::NONE,
            kind: ExhaustionType::None,
            cost: Duration::ZERO,
            cancellable: true,
            behavior: ProbeBehavior::Complete,
            log: Arc::clone(log),
        }
    }

    pub fn behave(mut self, behavior: ProbeBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn not_cancellable(mut self) -> Self {
        self.cancellable = false;
        self
    }

    pub fn requested_by(mut self, requestor: CreatureId) -> Self {
        self.requestor = requestor;
        self
    }

    pub fn exhausting(mut self, kind: ExhaustionType, cost: Duration) -> Self {
        self.kind = kind;
        self.cost = cost;
        self
    }

    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

impl Operation for Probe {
    fn name(&self) -> &'static str {
        "probe"
    }

    fn requestor(&self) -> CreatureId {
        self.requestor
    }

    fn exhaustion_type(&self) -> ExhaustionType {
        self.kind
    }

    fn exhaustion_cost(&self) -> Duration {
        self.cost
    }

    fn can_be_cancelled(&self) -> bool {
        self.cancellable
    }

    fn execute(self: Box<Self>, ctx: &mut OperationContext<'_>) -> Result<(), OperationError> {
        self.record(self.label.clone());

        match self.behavior {
            ProbeBehavior::Complete => {}
            ProbeBehavior::Fail => return Err(OperationError::CreatureNotFound(CreatureId(404))),
            ProbeBehavior::Panic => panic!("probe {} panicked", self.label),
            ProbeBehavior::FollowUp(delay) => {
                let follow_up = Probe::new(&format!("{}/follow-up", self.label), &self.log);
                ctx.schedule(follow_up, delay);
            }
            ProbeBehavior::CancelSelf => {
                let cancelled = ctx.cancel(ctx.operation_id());
                self.record(format!("{}/cancelled={cancelled}", self.label));
            }
            ProbeBehavior::Cancel(id) => {
                let cancelled = ctx.cancel(id);
                self.record(format!("{}/cancelled={cancelled}", self.label));
            }
        }

        Ok(())
    }
}

/// Default collaborators reporting into a [`RecordingNotifier`].
pub fn collaborators() -> (Collaborators, Arc<RecordingNotifier>) {
    collaborators_with(MechanicsConfig::default())
}

pub fn collaborators_with(config: MechanicsConfig) -> (Collaborators, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    (
        Collaborators::with_notifier(config, Arc::clone(&notifier)),
        notifier,
    )
}

pub fn creature_at(id: u32, location: Location) -> Creature {
    Creature::new(
        CreatureId(id),
        CreatureDescriptor::new(format!("creature {id}"), 100, location),
        &MechanicsConfig::default(),
    )
    .unwrap()
}
