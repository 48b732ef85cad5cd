use std::sync::Arc;
use std::time::Duration;

use loopaudit::{
    AuditConfig, AuditLayer, AuditMode, AuditOutcome, ChannelSink, Controller, ControllerError,
    EventHandler, KindSource, LabelEquals, MemoryStore, Object, ObjectKey, ObjectKind,
    ObjectRecord, ObjectStore, Predicate, StoreError, WatchSource,
};

#[derive(Default)]
struct StubEngine {
    watches: usize,
}

impl Controller for StubEngine {
    fn watch(
        &mut self,
        _source: Box<dyn WatchSource>,
        _handler: Arc<dyn EventHandler>,
        _predicates: Vec<Arc<dyn Predicate>>,
    ) -> Result<(), ControllerError> {
        self.watches += 1;
        Ok(())
    }
}

struct NoopHandler;

impl EventHandler for NoopHandler {
    fn handle(&self, _object: &dyn Object) {}
}

struct OpaqueSource;

impl WatchSource for OpaqueSource {
    fn object_kind(&self) -> Option<ObjectKind> {
        None
    }
}

fn kind_a() -> ObjectKind {
    ObjectKind::new("A")
}

fn kind_b() -> ObjectKind {
    ObjectKind::new("B")
}

fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store
        .insert(Arc::new(ObjectRecord::new(kind_b(), "b1")))
        .unwrap();
    store
        .insert(Arc::new(ObjectRecord::new(kind_a(), "a1")))
        .unwrap();
    store
        .insert(Arc::new(
            ObjectRecord::new(kind_a(), "a2").with_label("x", "y"),
        ))
        .unwrap();
    store
}

#[test]
fn instrumented_reads_flag_exactly_the_uncovered_objects() {
    let (sink, stream) = ChannelSink::bounded(16);
    let layer = AuditLayer::with_sink(
        AuditConfig {
            mode: AuditMode::Instrumented,
        },
        Arc::new(sink),
    );

    let mut controller = layer
        .build_controller("reconciler", |_| Ok(StubEngine::default()))
        .unwrap();
    controller
        .watch(
            Box::new(KindSource::new(kind_a())),
            Arc::new(NoopHandler),
            vec![Arc::new(LabelEquals::new("x", "y"))],
        )
        .unwrap();

    let completed = layer.complete(controller);
    let client = completed.client(seeded_store());

    // Kind B has no watch at all.
    let object = client.get(&ObjectKey::new("b1")).unwrap();
    assert_eq!(object.name(), "b1");
    let events = stream.drain();
    assert_eq!(events.len(), 1);
    let AuditOutcome::UncoveredRead { kind, name, .. } = &events[0].outcome else {
        panic!("expected uncovered read, got {:?}", events[0].outcome);
    };
    assert_eq!(kind, &kind_b());
    assert_eq!(name, "b1");

    // Kind A is watched, but this instance fails the label predicate.
    let object = client.get(&ObjectKey::new("a1")).unwrap();
    assert_eq!(object.name(), "a1");
    let events = stream.drain();
    assert_eq!(events.len(), 1);
    let AuditOutcome::UncoveredRead { kind, name, .. } = &events[0].outcome else {
        panic!("expected uncovered read, got {:?}", events[0].outcome);
    };
    assert_eq!(kind, &kind_a());
    assert_eq!(name, "a1");

    // Kind A instance satisfying the predicate: covered, silent.
    let object = client.get(&ObjectKey::new("a2")).unwrap();
    assert_eq!(object.label("x"), Some("y"));
    assert!(stream.recv_timeout(Duration::from_millis(50)).is_none());
}

#[test]
fn passthrough_is_behaviorally_identical_and_silent() {
    let (sink, stream) = ChannelSink::bounded(16);
    let layer = AuditLayer::with_sink(
        AuditConfig {
            mode: AuditMode::Passthrough,
        },
        Arc::new(sink),
    );

    let mut controller = layer
        .build_controller("reconciler", |_| Ok(StubEngine::default()))
        .unwrap();
    controller
        .watch(
            Box::new(KindSource::new(kind_a())),
            Arc::new(NoopHandler),
            vec![Arc::new(LabelEquals::new("x", "y"))],
        )
        .unwrap();

    let completed = layer.complete(controller);
    assert!(completed.coverage().is_none());
    assert_eq!(completed.controller.watches, 1);

    let client = completed.client(seeded_store());

    // Same reads as the raw store would answer, no diagnostics for any of them.
    assert_eq!(client.get(&ObjectKey::new("b1")).unwrap().name(), "b1");
    assert_eq!(client.get(&ObjectKey::new("a1")).unwrap().name(), "a1");
    assert_eq!(client.get(&ObjectKey::new("a2")).unwrap().name(), "a2");
    assert!(matches!(
        client.get(&ObjectKey::new("missing")),
        Err(StoreError::NotFound { .. })
    ));
    assert!(stream.drain().is_empty());
}

#[test]
fn read_failures_pass_through_unchanged_in_instrumented_mode() {
    let (sink, stream) = ChannelSink::bounded(16);
    let layer = AuditLayer::with_sink(
        AuditConfig {
            mode: AuditMode::Instrumented,
        },
        Arc::new(sink),
    );

    let controller = layer
        .build_controller("reconciler", |_| Ok(StubEngine::default()))
        .unwrap();
    let completed = layer.complete(controller);
    let client = completed.client(seeded_store());

    let err = client.get(&ObjectKey::new("missing")).err().unwrap();
    assert!(matches!(err, StoreError::NotFound { .. }));
    assert!(stream.drain().is_empty());
}

#[test]
fn unknown_source_is_forwarded_but_never_recorded() {
    let (sink, stream) = ChannelSink::bounded(16);
    let layer = AuditLayer::with_sink(
        AuditConfig {
            mode: AuditMode::Instrumented,
        },
        Arc::new(sink),
    );

    let mut controller = layer
        .build_controller("reconciler", |_| Ok(StubEngine::default()))
        .unwrap();
    controller
        .watch(Box::new(OpaqueSource), Arc::new(NoopHandler), vec![])
        .unwrap();

    let completed = layer.complete(controller);
    assert_eq!(completed.controller.watches, 1);
    assert!(completed.coverage().unwrap().records().is_empty());

    let events = stream.drain();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        events[0].outcome,
        AuditOutcome::UnrecordedWatch { .. }
    ));

    // With nothing recorded, every read of that kind stays uncovered.
    let client = completed.client(seeded_store());
    client.get(&ObjectKey::new("b1")).unwrap();
    assert_eq!(stream.drain().len(), 1);
}

#[test]
fn coverage_queries_run_from_concurrent_readers() {
    let (sink, _stream) = ChannelSink::bounded(64);
    let layer = AuditLayer::with_sink(
        AuditConfig {
            mode: AuditMode::Instrumented,
        },
        Arc::new(sink),
    );

    let mut controller = layer
        .build_controller("reconciler", |_| Ok(StubEngine::default()))
        .unwrap();
    controller
        .watch(
            Box::new(KindSource::new(kind_a())),
            Arc::new(NoopHandler),
            vec![],
        )
        .unwrap();

    let completed = layer.complete(controller);
    let client = Arc::new(completed.client(seeded_store()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = Arc::clone(&client);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    assert_eq!(client.get(&ObjectKey::new("a1")).unwrap().name(), "a1");
                    assert_eq!(client.get(&ObjectKey::new("b1")).unwrap().name(), "b1");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
