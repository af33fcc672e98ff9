//! Lock timeout behaviour: blocking with a zero timeout, silent degradation
//! (or `LockTimeout` from the `try_*` API) with a bounded one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use rstest::rstest;
use ward_registry::{Ownership, Registry, RegistryError};

const HOLD: Duration = Duration::from_millis(300);
const SHORT_TIMEOUT: Duration = Duration::from_millis(20);

#[derive(Debug)]
struct Task(u32);

/// Spawn a thread that holds the registry lock for `HOLD` by stalling inside
/// a predicate, and return once the lock is held.
///
/// The returned flag flips right before the predicate returns, i.e. before
/// the lock is released.
fn hold_lock(registry: &Arc<Registry<Task>>) -> (thread::JoinHandle<()>, Arc<AtomicBool>) {
    let releasing = Arc::new(AtomicBool::new(false));
    let (locked_tx, locked_rx) = mpsc::channel();

    let handle = {
        let registry = Arc::clone(registry);
        let releasing = Arc::clone(&releasing);
        thread::spawn(move || {
            let mut first = true;
            registry.first_where(|_| {
                if first {
                    first = false;
                    locked_tx.send(()).expect("test thread alive");
                    thread::sleep(HOLD);
                    releasing.store(true, Ordering::SeqCst);
                }
                false
            });
        })
    };

    locked_rx.recv().expect("holder thread started");
    (handle, releasing)
}

fn seeded(timeout: Duration) -> (Arc<Registry<Task>>, Arc<Task>) {
    let registry = Arc::new(Registry::new(Ownership::Strong, timeout));
    let seed = Arc::new(Task(0));
    registry.add(&seed);
    (registry, seed)
}

#[test]
fn zero_timeout_blocks_until_release() {
    ward_log::init_test();
    let (registry, seed) = seeded(Duration::ZERO);
    let (holder, releasing) = hold_lock(&registry);

    let started = Instant::now();
    let found = registry.first_where(|t| t.0 == 0);

    assert!(releasing.load(Ordering::SeqCst), "returned before the lock was released");
    assert!(started.elapsed() >= HOLD / 2);
    assert!(Arc::ptr_eq(&found.expect("seed is a member"), &seed));
    holder.join().expect("holder panicked");
}

#[rstest]
#[case::count("count")]
#[case::all_objects("all_objects")]
#[case::contains("contains")]
#[case::contains_where("contains_where")]
#[case::first_where("first_where")]
fn timed_out_reads_return_zero_values(#[case] read: &str) {
    let (registry, seed) = seeded(SHORT_TIMEOUT);
    let (holder, releasing) = hold_lock(&registry);

    match read {
        "count" => assert_eq!(registry.count(), 0),
        "all_objects" => assert!(registry.all_objects().is_empty()),
        "contains" => assert!(!registry.contains(&seed)),
        "contains_where" => assert!(!registry.contains_where(|_| true)),
        "first_where" => assert!(registry.first_where(|_| true).is_none()),
        other => unreachable!("unknown read {other}"),
    }
    assert!(!releasing.load(Ordering::SeqCst), "read waited for the holder");

    holder.join().expect("holder panicked");
    assert_eq!(registry.count(), 1, "reads succeed once the lock is free");
}

#[test]
fn timed_out_mutations_are_skipped() {
    let (registry, seed) = seeded(SHORT_TIMEOUT);
    let late = Arc::new(Task(1));
    let batch: Vec<_> = (2..5).map(|i| Arc::new(Task(i))).collect();
    let (holder, releasing) = hold_lock(&registry);

    registry.add(&late);
    registry.add_all(&batch);
    registry.remove(&seed);
    registry.remove_all([&seed, &late]);
    registry.clear();
    assert!(!releasing.load(Ordering::SeqCst), "a mutation waited for the holder");

    holder.join().expect("holder panicked");
    assert_eq!(registry.count(), 1);
    assert!(registry.contains(&seed));
    assert!(!registry.contains(&late));
    assert!(batch.iter().all(|task| !registry.contains(task)));
}

#[test]
fn try_api_reports_timeout() {
    let (registry, seed) = seeded(SHORT_TIMEOUT);
    let (holder, _) = hold_lock(&registry);

    let expected = RegistryError::LockTimeout {
        timeout: SHORT_TIMEOUT,
    };
    assert_eq!(registry.try_count(), Err(expected.clone()));
    assert_eq!(registry.try_add(&Arc::new(Task(2))), Err(expected.clone()));
    assert_eq!(registry.try_contains(&seed), Err(expected));
    assert!(registry.try_first_where(|_| true).unwrap_err().is_timeout());

    holder.join().expect("holder panicked");
    assert_eq!(registry.try_count(), Ok(1));
}

#[test]
fn empty_bulk_input_skips_the_lock() {
    let (registry, _seed) = seeded(SHORT_TIMEOUT);
    let (holder, _) = hold_lock(&registry);

    assert_eq!(registry.try_add_all(std::iter::empty()), Ok(()));
    assert_eq!(registry.try_remove_all(std::iter::empty()), Ok(()));

    holder.join().expect("holder panicked");
}

#[test]
fn uncontended_timeout_registry_behaves_normally() {
    let registry: Registry<Task> = Registry::strong().with_lock_timeout(SHORT_TIMEOUT);
    let tasks: Vec<_> = (0..10).map(|i| Arc::new(Task(i))).collect();
    registry.add_all(&tasks);
    assert_eq!(registry.count(), 10);
    assert_eq!(registry.try_count(), Ok(10));
}

#[test]
fn waiters_serialise_behind_the_lock() {
    let registry = Arc::new(Registry::<Task>::strong());
    let tasks: Vec<_> = (0..8).map(|i| Arc::new(Task(i))).collect();
    let barrier = Arc::new(Barrier::new(tasks.len()));

    thread::scope(|s| {
        for task in &tasks {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            s.spawn(move || {
                barrier.wait();
                registry.add(task);
            });
        }
    });

    assert_eq!(registry.count(), tasks.len());
}
