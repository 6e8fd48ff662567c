use criterion::{black_box, criterion_group, criterion_main, Criterion};
use method_stub::{args, MethodTable, MockEngine, Subject};

struct Adder;

impl Adder {
    fn add(&self, a: i64, b: i64) -> i64 {
        a + b
    }
}

impl Subject for Adder {
    fn methods(table: &mut MethodTable<Self>) {
        table.method("add", Adder::add);
    }
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    let real = MockEngine::new(Adder);
    group.bench_function("call_real_method", |b| {
        b.iter(|| {
            let out = real.call(black_box("add"), args![1i64, 2i64]).unwrap();
            black_box(out);
        })
    });

    let stubbed = MockEngine::new(Adder);
    stubbed
        .stub("add", |_: &Adder, a: i64, b: i64| a - b)
        .unwrap();
    group.bench_function("call_stub", |b| {
        b.iter(|| {
            let out = stubbed.call(black_box("add"), args![1i64, 2i64]).unwrap();
            black_box(out);
        })
    });

    // Queries over a long history
    let history = MockEngine::new(Adder);
    for i in 0..1000i64 {
        history.call("add", args![i, i]).unwrap();
    }
    group.bench_function("was_called_with_1000_calls", |b| {
        b.iter(|| {
            black_box(history.was_method_called_with(black_box("add"), &args![999i64, 999i64]));
        })
    });

    group.bench_function("stub_install", |b| {
        let engine = MockEngine::new(Adder);
        b.iter(|| {
            engine
                .stub("add", |_: &Adder, a: i64, b: i64| a * b)
                .unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
