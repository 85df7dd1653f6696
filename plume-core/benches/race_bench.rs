//! Benchmark: Full Race Simulation
//!
//! What's Measured:
//! - Roster draw + pre-race conditions (RaceWaiting::seeded)
//! - One racing tick in mid-race
//! - A complete race at 16 ms frames, countdown to ranking
//! - Settlement of a full simple + exotic book

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use plume_core::prelude::*;
use plume_core::config::WagerConfig;
use rust_decimal_macros::dec;

fn start(race: RaceWaiting) -> RaceRacing {
    let mut counting = race.start_countdown_synchronized(0);
    loop {
        match counting.tick(0) {
            CountdownResult::Counting(c) => counting = c,
            CountdownResult::Started(r) => return r,
        }
    }
}

fn run(race: RaceWaiting) -> RaceFinished {
    let mut racing = start(race);
    let mut now = 0;
    loop {
        now += 16;
        match racing.tick(now) {
            TickResult::Running(r) => racing = r,
            TickResult::Finished(f) => return f,
        }
    }
}

fn bench_race_setup(c: &mut Criterion) {
    let mut group = c.benchmark_group("race");
    group.bench_function("draw_field", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            black_box(RaceWaiting::seeded(RaceSettings::default(), None, seed))
        });
    });
    group.finish();
}

fn bench_single_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("race");
    let mut racing = start(RaceWaiting::seeded(RaceSettings::default(), None, 42));
    for now in (16..=3_200).step_by(16) {
        racing = match racing.tick(now) {
            TickResult::Running(r) => r,
            TickResult::Finished(_) => unreachable!("race ended before the cap"),
        };
    }
    group.bench_function("tick", |b| {
        b.iter(|| black_box(racing.clone().tick(3_216)));
    });
    group.finish();
}

fn bench_full_race(c: &mut Criterion) {
    let mut group = c.benchmark_group("race");
    group.sample_size(200);
    group.bench_function("full_race_16ms", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            black_box(run(RaceWaiting::seeded(RaceSettings::default(), None, seed)))
        });
    });
    group.finish();
}

fn bench_settlement(c: &mut Criterion) {
    let mut group = c.benchmark_group("wager");
    let race = RaceWaiting::seeded(RaceSettings::default(), None, 9);
    let finished = run(race.clone());
    let config = WagerConfig {
        starting_bankroll: dec!(1000000),
        min_bet: dec!(1),
        bot_stake: dec!(1),
    };
    let mut session = Session::new(&config);
    let ids = race.roster().ids();
    for id in &ids {
        for kind in BetKind::ALL {
            session.place_bet(&race, *id, dec!(10), kind).unwrap();
        }
    }
    for pair in ids.windows(2) {
        session.place_exotic(&race, ExoticKind::Exacta, pair, dec!(5)).unwrap();
        session.place_exotic(&race, ExoticKind::Quinella, pair, dec!(5)).unwrap();
    }

    group.bench_function("settle_full_book", |b| {
        b.iter(|| black_box(session.clone().settle(&finished).unwrap()));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_race_setup,
    bench_single_tick,
    bench_full_race,
    bench_settlement
);
criterion_main!(benches);
