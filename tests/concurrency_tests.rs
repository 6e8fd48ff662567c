use method_stub::{args, logging, Config, MethodTable, MockEngine, Subject};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::Duration;

struct Counter {
    total: AtomicU64,
}

impl Counter {
    fn bump(&self, by: u64) -> u64 {
        self.total.fetch_add(by, Ordering::SeqCst) + by
    }

    fn wait(&self, _tag: String) {}
}

impl Subject for Counter {
    fn methods(table: &mut MethodTable<Self>) {
        table.method("bump", Counter::bump).method("wait", Counter::wait);
    }
}

fn engine() -> MockEngine<Counter> {
    logging::init_from_config(&Config::default());
    let mut config = Config::default();
    config.dispatch.warn_on_missing_unstub = true;
    MockEngine::new(Counter {
        total: AtomicU64::new(0),
    })
    .with_config(config)
}

#[test]
fn test_parallel_calls_are_each_recorded_once() {
    let engine = engine();
    let threads = 8u64;
    let per_thread = 250u64;

    thread::scope(|scope| {
        for t in 0..threads {
            let engine = &engine;
            scope.spawn(move || {
                for i in 0..per_thread {
                    engine.call("bump", args![t * 1000 + i]).unwrap();
                }
            });
        }
    });

    let all = engine.all_call_args("bump");
    assert_eq!(all.len() as u64, threads * per_thread);
    assert_eq!(engine.method_call_count("bump") as u64, threads * per_thread);

    // within one thread, recorded order follows call order
    for t in 0..threads {
        let mine: Vec<u64> = all
            .iter()
            .filter_map(|tuple| tuple[0].downcast_ref::<u64>().copied())
            .filter(|v| v / 1000 == t)
            .collect();
        let expected: Vec<u64> = (0..per_thread).map(|i| t * 1000 + i).collect();
        assert_eq!(mine, expected);
    }

    let expected_total: u64 = (0..threads)
        .flat_map(|t| (0..per_thread).map(move |i| t * 1000 + i))
        .sum();
    assert_eq!(engine.subject().total.load(Ordering::SeqCst), expected_total);
}

#[test]
fn test_blocked_stub_does_not_hold_the_guard() {
    let engine = engine();
    let (entered_tx, entered_rx) = mpsc::channel::<()>();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let entered_tx = Mutex::new(entered_tx);
    let release_rx = Mutex::new(release_rx);

    engine
        .stub("wait", move |_: &Counter, _tag: String| {
            entered_tx.lock().unwrap().send(()).unwrap();
            release_rx.lock().unwrap().recv().unwrap();
        })
        .unwrap();

    thread::scope(|scope| {
        let engine = &engine;
        let blocked = scope.spawn(move || engine.call("wait", args!["slow".to_string()]));

        entered_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("stub never started");

        // the stub is parked inside the call; registry and log stay usable
        assert!(engine.is_stubbed("wait"));
        engine.call("bump", args![1u64]).unwrap();
        assert_eq!(engine.method_call_count("bump"), 1);
        engine.stub("bump", |_: &Counter, by: u64| by * 2).unwrap();
        engine.unstub("bump");
        assert_eq!(engine.method_call_count("wait"), 0);

        release_tx.send(()).unwrap();
        blocked.join().unwrap().unwrap();
    });

    assert_eq!(engine.method_call_count("wait"), 1);
    assert_eq!(
        engine.last_call_args("wait").unwrap(),
        args!["slow".to_string()]
    );
}

#[test]
fn test_stub_swaps_race_with_calls() {
    let engine = Arc::new(engine());
    let barrier = Arc::new(Barrier::new(3));
    let calls = 500;

    let caller = {
        let engine = Arc::clone(&engine);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..calls {
                let value: u64 = engine.call_as("bump", args![1u64]).unwrap();
                assert!(value >= 1);
            }
        })
    };
    let swapper = {
        let engine = Arc::clone(&engine);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..calls {
                engine.stub("bump", |_: &Counter, by: u64| by).unwrap();
                engine.unstub("bump");
            }
        })
    };

    barrier.wait();
    caller.join().unwrap();
    swapper.join().unwrap();

    assert_eq!(engine.method_call_count("bump"), calls);
    assert!(!engine.is_stubbed("bump"));
}
