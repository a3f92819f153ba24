use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mechanics_core::{
    AttackOutcome, CombatCreditType, Creature, CreatureDescriptor, CreatureId, ErrorSeverity,
    Location, MechanicsConfig, SkillType, Tick,
};
use mechanics_runtime::{
    AwarenessEvent, CombatEvent, CreatureEvent, Event, InMemoryWorld, Operation,
    OperationContext, OperationError, OperationId, OperationRequest,
    RestoreCombatCreditOperation, Runtime, RuntimeError, RuntimeHandle, SchedulerEvent, Topic,
};
use tokio::sync::broadcast;
use tokio::time::Instant;

const KNIGHT: CreatureId = CreatureId(1);
const ORC: CreatureId = CreatureId(2);

fn creature(id: CreatureId, name: &str, location: Location) -> Creature {
    Creature::new(
        id,
        CreatureDescriptor::new(name, 100, location).with_article("a"),
        &MechanicsConfig::default(),
    )
    .expect("valid creature")
}

fn arena() -> InMemoryWorld {
    InMemoryWorld::with_creatures([
        creature(KNIGHT, "knight", Location::new(100, 100, 7)),
        creature(ORC, "orc", Location::new(101, 100, 7)),
    ])
}

async fn start(world: InMemoryWorld) -> (Runtime, RuntimeHandle) {
    let runtime = Runtime::builder()
        .world(world)
        .build()
        .await
        .expect("runtime should start");
    let handle = runtime.handle();
    (runtime, handle)
}

fn attack() -> OperationRequest {
    OperationRequest::Attack {
        attacker: KNIGHT,
        target: ORC,
        skill: SkillType::Sword,
    }
}

async fn next(rx: &mut broadcast::Receiver<Event>) -> Event {
    rx.recv().await.expect("event bus closed")
}

// ============================================================================
// Combat credits
// ============================================================================

#[tokio::test(start_paused = true)]
async fn blocked_attack_restarts_both_restore_chains() {
    let (runtime, handle) = start(arena()).await;
    let mut combat = handle.subscribe(Topic::Combat);
    let started = Instant::now();

    handle
        .submit(attack(), Duration::ZERO)
        .await
        .expect("attack accepted");

    let mut events = Vec::new();
    for _ in 0..3 {
        events.push(next(&mut combat).await);
    }
    assert_eq!(
        events,
        vec![
            Event::Combat(CombatEvent::CreditsChanged {
                combatant: KNIGHT,
                credit: CombatCreditType::Attack,
                current: 0
            }),
            Event::Combat(CombatEvent::CreditsChanged {
                combatant: ORC,
                credit: CombatCreditType::Defense,
                current: 1
            }),
            Event::Combat(CombatEvent::AttackResolved {
                attacker: KNIGHT,
                target: ORC,
                outcome: AttackOutcome::Blocked
            }),
        ]
    );

    // Both chains restore one credit after the interval and stop when full.
    assert_eq!(
        next(&mut combat).await,
        Event::Combat(CombatEvent::CreditsChanged {
            combatant: KNIGHT,
            credit: CombatCreditType::Attack,
            current: 1
        })
    );
    assert_eq!(
        next(&mut combat).await,
        Event::Combat(CombatEvent::CreditsChanged {
            combatant: ORC,
            credit: CombatCreditType::Defense,
            current: 2
        })
    );
    assert!(started.elapsed() >= Duration::from_millis(1_000));

    let knight = handle.creature(KNIGHT).await.unwrap().expect("knight exists");
    assert!(knight.attack_credits.is_full());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(matches!(
        combat.try_recv(),
        Err(broadcast::error::TryRecvError::Empty)
    ));

    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn attack_without_credits_is_reported_as_recoverable_failure() {
    let mut knight = creature(KNIGHT, "knight", Location::new(100, 100, 7));
    knight
        .combat_mut()
        .credits
        .spend(CombatCreditType::Attack)
        .unwrap();
    let world =
        InMemoryWorld::with_creatures([knight, creature(ORC, "orc", Location::new(101, 100, 7))]);
    let (runtime, handle) = start(world).await;
    let mut scheduler = handle.subscribe(Topic::Scheduler);

    let submitted = handle.submit(attack(), Duration::ZERO).await.unwrap();

    match next(&mut scheduler).await {
        Event::Scheduler(SchedulerEvent::OperationFailed {
            id,
            operation,
            requestor,
            severity,
            code,
            ..
        }) => {
            assert_eq!(id, submitted.id);
            assert_eq!(operation, "attack");
            assert_eq!(requestor, KNIGHT);
            assert_eq!(severity, ErrorSeverity::Recoverable);
            assert_eq!(code, "CREDIT_NONE_AVAILABLE");
        }
        other => panic!("unexpected event {other:?}"),
    }

    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn second_attack_is_deferred_until_exhaustion_expires() {
    let (runtime, handle) = start(arena()).await;
    let mut scheduler = handle.subscribe(Topic::Scheduler);
    let mut combat = handle.subscribe(Topic::Combat);
    let started = Instant::now();

    handle.submit(attack(), Duration::ZERO).await.unwrap();
    let second = handle.submit(attack(), Duration::ZERO).await.unwrap();

    assert_eq!(
        next(&mut scheduler).await,
        Event::Scheduler(SchedulerEvent::OperationDeferred {
            id: second.id,
            operation: "attack".to_owned(),
            until: Tick(2_000)
        })
    );

    let mut resolved = 0;
    while resolved < 2 {
        if let Event::Combat(CombatEvent::AttackResolved { .. }) = next(&mut combat).await {
            resolved += 1;
        }
    }
    assert!(started.elapsed() >= Duration::from_millis(2_000));

    runtime.shutdown().await.unwrap();
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test(start_paused = true)]
async fn cancelled_attack_never_runs() {
    let (runtime, handle) = start(arena()).await;
    let mut combat = handle.subscribe(Topic::Combat);

    let pending = handle
        .submit(attack(), Duration::from_millis(500))
        .await
        .unwrap();
    assert!(handle.cancel(pending).await.unwrap());
    assert!(!handle.cancel(pending).await.unwrap());

    tokio::time::sleep(Duration::from_secs(2)).await;

    assert!(matches!(
        combat.try_recv(),
        Err(broadcast::error::TryRecvError::Empty)
    ));
    let knight = handle.creature(KNIGHT).await.unwrap().unwrap();
    assert_eq!(knight.attack_credits.current(), 1);

    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn restore_steps_cannot_be_cancelled() {
    let (runtime, handle) = start(arena()).await;

    let step =
        RestoreCombatCreditOperation::new(KNIGHT, CombatCreditType::Attack, Duration::from_secs(1))
            .unwrap();
    let scheduled = handle.schedule(step, Duration::from_secs(1)).await.unwrap();

    assert_eq!(scheduled.operation, "restore_combat_credit");
    assert!(!handle.cancel(scheduled).await.unwrap());

    runtime.shutdown().await.unwrap();
}

// ============================================================================
// Concurrent producers
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct Executed {
    id: OperationId,
    producer: usize,
    delay: Duration,
    at: Tick,
}

/// Records its own execution.
struct Marker {
    producer: usize,
    delay: Duration,
    log: Arc<Mutex<Vec<Executed>>>,
}

impl Operation for Marker {
    fn name(&self) -> &'static str {
        "marker"
    }

    fn requestor(&self) -> CreatureId {
        CreatureId::NONE
    }

    fn execute(self: Box<Self>, ctx: &mut OperationContext<'_>) -> Result<(), OperationError> {
        self.log.lock().unwrap().push(Executed {
            id: ctx.operation_id(),
            producer: self.producer,
            delay: self.delay,
            at: ctx.now(),
        });
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn concurrent_producers_schedule_and_cancel_consistently() {
    const PRODUCERS: usize = 8;
    const PER_PRODUCER: usize = 12;

    let (runtime, handle) = start(InMemoryWorld::new()).await;
    let log = Arc::new(Mutex::new(Vec::new()));

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let handle = handle.clone();
            let log = Arc::clone(&log);
            tokio::spawn(async move {
                let mut kept = Vec::new();
                let mut cancelled = Vec::new();
                for n in 0..PER_PRODUCER {
                    // Few distinct delays, so due times collide across producers.
                    let delay = Duration::from_millis(100 * (1 + ((producer + n) % 4) as u64));
                    let marker = Marker {
                        producer,
                        delay,
                        log: Arc::clone(&log),
                    };
                    let scheduled = handle.schedule(marker, delay).await.unwrap();
                    if n % 3 == 1 {
                        assert!(handle.cancel(scheduled).await.unwrap());
                        cancelled.push(scheduled.id);
                    } else {
                        kept.push(scheduled.id);
                    }
                    tokio::task::yield_now().await;
                }
                (kept, cancelled)
            })
        })
        .collect();

    let mut kept = HashSet::new();
    let mut cancelled = HashSet::new();
    for producer in producers {
        let (ids, gone) = producer.await.unwrap();
        kept.extend(ids);
        cancelled.extend(gone);
    }

    tokio::time::sleep(Duration::from_secs(2)).await;
    let executed = log.lock().unwrap().clone();

    // Every survivor ran exactly once and no cancelled operation ran.
    assert_eq!(executed.len(), kept.len());
    let ran: HashSet<OperationId> = executed.iter().map(|entry| entry.id).collect();
    assert_eq!(ran, kept);
    assert!(ran.is_disjoint(&cancelled));

    // Execution follows due time, never before the requested delay.
    for pair in executed.windows(2) {
        assert!(pair[0].at <= pair[1].at);
    }
    for entry in &executed {
        assert!(entry.at >= Tick::from_duration(entry.delay));
    }

    // Each producer's equal-delay operations keep its submission order.
    for producer in 0..PRODUCERS {
        for delay in (1..=4).map(|step| Duration::from_millis(100 * step)) {
            let ids: Vec<OperationId> = executed
                .iter()
                .filter(|entry| entry.producer == producer && entry.delay == delay)
                .map(|entry| entry.id)
                .collect();
            assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    runtime.shutdown().await.unwrap();
}

// ============================================================================
// Spawning and awareness
// ============================================================================

#[tokio::test(start_paused = true)]
async fn spawned_creature_and_its_neighbours_see_each_other() {
    let world =
        InMemoryWorld::with_creatures([creature(KNIGHT, "knight", Location::new(100, 100, 7))]);
    let (runtime, handle) = start(world).await;
    let mut creatures = handle.subscribe(Topic::Creature);
    let mut awareness = handle.subscribe(Topic::Awareness);

    handle
        .submit(
            OperationRequest::SpawnCreature {
                descriptor: CreatureDescriptor::new("rat", 20, Location::new(103, 101, 7)),
            },
            Duration::ZERO,
        )
        .await
        .unwrap();

    match next(&mut creatures).await {
        Event::Creature(CreatureEvent::Spawned(snapshot)) => {
            assert_eq!(snapshot.id, CreatureId(2));
            assert_eq!(snapshot.name, "rat");
        }
        other => panic!("unexpected event {other:?}"),
    }

    let mut seen = vec![next(&mut awareness).await, next(&mut awareness).await];
    seen.sort_by_key(|event| format!("{event:?}"));
    assert_eq!(
        seen,
        vec![
            Event::Awareness(AwarenessEvent::Seen {
                observer: KNIGHT,
                target: CreatureId(2)
            }),
            Event::Awareness(AwarenessEvent::Seen {
                observer: CreatureId(2),
                target: KNIGHT
            }),
        ]
    );

    runtime.shutdown().await.unwrap();
}

// ============================================================================
// API surface
// ============================================================================

#[tokio::test]
async fn invalid_requests_are_rejected_before_scheduling() {
    let (runtime, handle) = start(arena()).await;

    let result = handle
        .submit(
            OperationRequest::RestoreCombatCredit {
                combatant: CreatureId::NONE,
                credit: CombatCreditType::Defense,
            },
            Duration::ZERO,
        )
        .await;

    assert!(matches!(
        result,
        Err(RuntimeError::Rejected(OperationError::NullCombatant {
            operation: "restore_combat_credit"
        }))
    ));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn handles_fail_after_shutdown() {
    let (runtime, handle) = start(arena()).await;

    assert!(handle.creature(ORC).await.unwrap().is_some());
    assert!(handle.creature(CreatureId(99)).await.unwrap().is_none());

    runtime.shutdown().await.unwrap();

    assert!(matches!(
        handle.submit(attack(), Duration::ZERO).await,
        Err(RuntimeError::CommandChannelClosed)
    ));
}
