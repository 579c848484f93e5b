//! Benchmarks for context lookup and composed dispatch.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ctxpipe::prelude::*;

fn stack_benchmark(c: &mut Criterion) {
    let target = create_context(ContextConfig::new("target"));
    let filler = create_context(ContextConfig::new("filler"));

    let mut stack = Stack::new().with([target.provider.provide(1_u64)]);
    for i in 0..64_u64 {
        stack = stack.with([filler.provider.provide(i)]);
    }

    c.bench_function("get_depth_64", |b| {
        b.iter(|| black_box(stack.get(&target.consumer)));
    });

    c.bench_function("with_single", |b| {
        b.iter(|| black_box(stack.with([filler.provider.provide(0)])));
    });
}

fn compose_benchmark(c: &mut Criterion) {
    let slots: Vec<MiddlewareSlot<Stack, Outcome<u64>>> = (0..8)
        .map(|_| MiddlewareSlot::from_fn(|ctx: Stack, next: Next<Stack, Outcome<u64>>| next.run(ctx)))
        .collect();
    let composed = compose(slots).expect("all slots are callable");

    c.bench_function("dispatch_8", |b| {
        b.iter(|| {
            let out = composed.run(Stack::new(), |_| Outcome::ready(42));
            black_box(out.into_ready().ok())
        });
    });
}

criterion_group!(benches, stack_benchmark, compose_benchmark);
criterion_main!(benches);
