//! A joining peer rebuilt from race parameters runs the host's race.

use plume_core::prelude::*;
use plume_core::race::RaceNotice;
use plume_core::sync::{reconcile, RaceParameters};

fn run(race: RaceWaiting, start_ms: u64) -> RaceFinished {
    let mut counting = race.start_countdown_synchronized(start_ms);
    let mut racing = loop {
        match counting.tick(start_ms) {
            CountdownResult::Counting(c) => counting = c,
            CountdownResult::Started(r) => break r,
        }
    };
    let mut now = start_ms;
    loop {
        now += 16;
        match racing.tick(now) {
            TickResult::Running(r) => racing = r,
            TickResult::Finished(f) => return f,
        }
    }
}

#[test]
fn test_peer_over_json_matches_host() {
    for seed in [0u64, 12, 500, 77_777] {
        let host = RaceWaiting::seeded(RaceSettings::default(), Some(TimeOfDay::Evening), seed);
        let wire = host.parameters().unwrap().to_json().unwrap();

        let params = RaceParameters::from_json(&wire).unwrap();
        let peer = RaceWaiting::from_parameters(&params, RaceSettings::default()).unwrap();
        assert_eq!(peer.roster().time_of_day(), Some(TimeOfDay::Evening));

        let host_result = run(host, 50_000);
        let peer_result = run(peer, 50_000);
        assert_eq!(host_result.finish_order(), peer_result.finish_order(), "seed {seed}");

        let r = reconcile(peer_result.finish_order(), host_result.finish_order());
        assert!(r.in_sync);
    }
}

#[test]
fn test_peer_notices_match_host() {
    let mut host = RaceWaiting::seeded(RaceSettings::default(), None, 321);
    let params = host.parameters().unwrap();
    let mut peer = RaceWaiting::from_parameters(&params, RaceSettings::default()).unwrap();

    let host_rx = host.subscribe();
    let peer_rx = peer.subscribe();
    run(host, 0);
    run(peer, 0);

    let host_notices: Vec<RaceNotice> = host_rx.try_iter().collect();
    let peer_notices: Vec<RaceNotice> = peer_rx.try_iter().collect();
    assert_eq!(host_notices, peer_notices);
    assert!(matches!(host_notices.first(), Some(RaceNotice::RaceStarted)));
}

#[test]
fn test_desynced_peer_adopts_host_order() {
    let host = run(RaceWaiting::seeded(RaceSettings::default(), None, 1), 0);
    let other = run(RaceWaiting::seeded(RaceSettings::default(), None, 2), 0);
    let r = reconcile(other.finish_order(), host.finish_order());
    assert_eq!(r.order, host.finish_order());
}
