use criterion::{black_box, criterion_group, criterion_main, Criterion};
use coalign::{GapState, Move, PathArena, PathState, Position, ScoreTable};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn bench_propose(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5155AA55);
    let dim = 512;
    let proposals: Vec<(Position, GapState, i64)> = (0..100_000)
        .map(|_| {
            let pos = Position::new(rng.gen_range(0..=dim), rng.gen_range(0..=dim));
            let gap = GapState::ALL[rng.gen_range(0..3)];
            (pos, gap, rng.gen_range(-500..500))
        })
        .collect();

    c.bench_function("table_propose_improve_100k", |b| {
        b.iter(|| {
            let mut table = ScoreTable::new(dim, dim);
            let mut accepted = 0usize;
            for &(pos, gap, score) in &proposals {
                if table.propose_improve(pos, gap, score) {
                    accepted += 1;
                }
            }
            black_box(accepted);
        })
    });
}

fn bench_arena(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_arena");
    group.bench_function("extend_and_materialize_2k", |b| {
        b.iter(|| {
            let mut arena = PathArena::with_capacity(2_048);
            let mut state = PathState::origin(&arena);
            for step in 0..2_000 {
                let mv = match step % 3 {
                    0 => Move::Match,
                    1 => Move::GapInA,
                    _ => Move::GapInB,
                };
                state = state.extend(&mut arena, mv, step);
            }
            black_box(state.materialize(&arena));
        })
    });

    group.bench_function("branching_fanout_3x8", |b| {
        b.iter(|| {
            let mut arena = PathArena::new();
            let mut frontier = vec![PathState::origin(&arena)];
            for _ in 0..8 {
                let mut next = Vec::with_capacity(frontier.len() * 3);
                for state in &frontier {
                    for mv in Move::ALL {
                        next.push(state.extend(&mut arena, mv, 0));
                    }
                }
                frontier = next;
            }
            black_box(arena.len());
        })
    });
    group.finish();
}

criterion_group!(benches, bench_propose, bench_arena);
criterion_main!(benches);
