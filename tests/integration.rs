//! End-to-end pipeline scenarios driven purely through the public API.

use burnbooks::{build_pipeline, Book, GopherSpec, IncineratorSpec, PileSpec};
use std::collections::HashSet;
use std::time::Duration;

fn books(prefix: &str, count: usize, burn_duration: Duration) -> Vec<Book> {
    (0..count)
        .map(|i| Book::new(format!("{prefix}-{i}"), burn_duration))
        .collect()
}

async fn drain(
    mut stream: tokio::sync::broadcast::Receiver<burnbooks::BurnResult>,
    expected: usize,
    per_item_timeout: Duration,
) -> Vec<burnbooks::BurnResult> {
    let mut results = Vec::with_capacity(expected);
    for _ in 0..expected {
        let result = tokio::time::timeout(per_item_timeout, stream.recv())
            .await
            .expect("burn result did not arrive in time")
            .expect("burn result stream closed early");
        results.push(result);
    }
    results
}

#[tokio::test(flavor = "multi_thread")]
async fn odd_capacity_loader() {
    const PILE_COUNT: usize = 4;
    const ITEMS_PER_PILE: usize = 100;
    const TAKER_COUNT: usize = 6;

    let piles = (0..PILE_COUNT)
        .map(|i| PileSpec {
            id: format!("pile-{i}"),
            items: books(&format!("pile-{i}"), ITEMS_PER_PILE, Duration::from_micros(200)),
            supply_timeout: Duration::from_millis(50),
        })
        .collect();
    let gophers = (0..TAKER_COUNT)
        .map(|i| GopherSpec {
            id: format!("gopher-{i}"),
            taker_capacity: 17,
            transit_delay: Duration::from_millis(1),
        })
        .collect();
    let incinerators = vec![IncineratorSpec::new("incinerator-0", 64)];

    let (pile_group, incinerator_group) =
        build_pipeline(piles, gophers, incinerators).unwrap();

    let total = PILE_COUNT * ITEMS_PER_PILE;
    let results = drain(
        incinerator_group.burn_result_stream(),
        total,
        Duration::from_secs(5),
    )
    .await;

    let ids: HashSet<&str> = results.iter().map(|r| r.item.id()).collect();
    assert_eq!(ids.len(), total, "every item id must appear exactly once");

    let taker_contribution = pile_group.taker_contribution().await;
    assert!(
        taker_contribution.values().all(|&count| count > 0),
        "every taker must have taken at least one batch"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn saturation() {
    const ITEMS: usize = 2000;
    const CAPACITY: usize = 500;

    let piles = vec![PileSpec {
        id: "pile-0".into(),
        items: books("b", ITEMS, Duration::from_millis(10)),
        supply_timeout: Duration::from_millis(50),
    }];
    let gophers = vec![GopherSpec {
        id: "gopher-0".into(),
        taker_capacity: CAPACITY,
        transit_delay: Duration::from_millis(1),
    }];
    let incinerators = vec![IncineratorSpec {
        id: "incinerator-0".into(),
        burn_capacity: CAPACITY,
        min_free: CAPACITY / 2,
    }];

    let (_pile_group, incinerator_group) =
        build_pipeline(piles, gophers, incinerators).unwrap();

    let bound = Duration::from_millis(10) * ((ITEMS / CAPACITY) as u32 + 1) * 5;
    let results = drain(incinerator_group.burn_result_stream(), ITEMS, bound).await;
    assert_eq!(results.len(), ITEMS);
}

#[tokio::test(flavor = "multi_thread")]
async fn blocking_work_never_deadlocks_other_sinks() {
    // A gopher registered against a group's piles and incinerators is
    // registered against *every* member, so a blocked incinerator sharing a
    // pipeline with a healthy one could race to capture live items too.
    // Running the blocked topology and the live topology as two wholly
    // separate pipelines isolates the property under test: a sink that
    // never re-advertises must not stall progress happening elsewhere.
    let blocked_piles = vec![PileSpec {
        id: "blocked-pile".into(),
        items: books("blocked", 50, Duration::from_secs(3600)),
        supply_timeout: Duration::from_millis(20),
    }];
    let blocked_gophers = vec![GopherSpec {
        id: "gopher-blocked".into(),
        taker_capacity: 50,
        transit_delay: Duration::from_millis(1),
    }];
    let blocked_incinerators = vec![IncineratorSpec::new("blocked-incinerator", 1)];
    let (_blocked_piles, blocked_incinerators) = build_pipeline(
        blocked_piles,
        blocked_gophers,
        blocked_incinerators,
    )
    .unwrap();
    let mut blocked_results = blocked_incinerators.burn_result_stream();

    let live_piles = vec![PileSpec {
        id: "live-pile".into(),
        items: books("live", 20, Duration::from_millis(1)),
        supply_timeout: Duration::from_millis(20),
    }];
    let live_gophers = vec![GopherSpec {
        id: "gopher-live".into(),
        taker_capacity: 20,
        transit_delay: Duration::from_millis(1),
    }];
    let live_incinerators = vec![IncineratorSpec::new("live-incinerator", 20)];
    let (_live_piles, live_incinerators) =
        build_pipeline(live_piles, live_gophers, live_incinerators).unwrap();

    let results = drain(
        live_incinerators.burn_result_stream(),
        20,
        Duration::from_secs(5),
    )
    .await;
    assert_eq!(results.len(), 20);

    assert!(
        tokio::time::timeout(Duration::from_millis(50), blocked_results.recv())
            .await
            .is_err(),
        "the blocked incinerator must not have burned anything yet"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn multi_sink_allocation() {
    const SINKS: usize = 10;
    const PROVIDERS: usize = 5;
    const ITEMS: usize = 1000;

    let piles = vec![PileSpec {
        id: "pile-0".into(),
        items: books("b", ITEMS, Duration::from_micros(200)),
        supply_timeout: Duration::from_millis(20),
    }];
    let gophers = (0..PROVIDERS)
        .map(|i| GopherSpec {
            id: format!("gopher-{i}"),
            taker_capacity: 50,
            transit_delay: Duration::from_millis(1),
        })
        .collect();
    let incinerators = (0..SINKS)
        .map(|i| IncineratorSpec::new(format!("incinerator-{i}"), 20))
        .collect();

    let (_pile_group, incinerator_group) =
        build_pipeline(piles, gophers, incinerators).unwrap();

    drain(
        incinerator_group.burn_result_stream(),
        ITEMS,
        Duration::from_secs(10),
    )
    .await;

    let contribution = incinerator_group.incinerator_contribution().await;
    assert_eq!(contribution.len(), SINKS, "every sink must burn at least one item");

    let mean = ITEMS as f64 / SINKS as f64;
    for (id, &count) in &contribution {
        let deviation = (count as f64 - mean).abs() / mean;
        assert!(
            deviation <= 0.5,
            "sink {id} deviates {deviation:.2} from the mean of {mean:.1} (count {count})"
        );
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn exhaustion_emits_one_partial_result_then_stops() {
    let piles = vec![PileSpec {
        id: "pile-0".into(),
        items: books("b", 3, Duration::from_millis(1)),
        supply_timeout: Duration::from_millis(100),
    }];
    let gophers = vec![GopherSpec {
        id: "gopher-0".into(),
        taker_capacity: 17,
        transit_delay: Duration::from_millis(1),
    }];
    let incinerators = vec![IncineratorSpec::new("incinerator-0", 4)];

    let (pile_group, incinerator_group) =
        build_pipeline(piles, gophers, incinerators).unwrap();

    drain(incinerator_group.burn_result_stream(), 3, Duration::from_secs(2)).await;

    // Give the exhausted pile's supply loop time to settle; no further
    // take-result should ever follow the first.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let taken = pile_group.taken().await;
    assert_eq!(taken.len(), 1);
    assert_eq!(taken[0].item_ids.len(), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn end_to_end_five_piles_five_gophers_five_incinerators() {
    const PILES: usize = 5;
    const GOPHERS: usize = 5;
    const INCINERATORS: usize = 5;
    const ITEMS_PER_PILE: usize = 200;

    let piles = (0..PILES)
        .map(|i| PileSpec {
            id: format!("pile-{i}"),
            items: books(&format!("pile-{i}"), ITEMS_PER_PILE, Duration::from_micros(500)),
            supply_timeout: Duration::from_millis(100),
        })
        .collect();
    let gophers = (0..GOPHERS)
        .map(|i| GopherSpec {
            id: format!("gopher-{i}"),
            taker_capacity: 19,
            transit_delay: Duration::from_millis(20),
        })
        .collect();
    let incinerators = (0..INCINERATORS)
        .map(|i| IncineratorSpec {
            id: format!("incinerator-{i}"),
            burn_capacity: 8,
            min_free: 4,
        })
        .collect();

    let (pile_group, incinerator_group) =
        build_pipeline(piles, gophers, incinerators).unwrap();

    let total = PILES * ITEMS_PER_PILE;
    drain(
        incinerator_group.burn_result_stream(),
        total,
        Duration::from_secs(30),
    )
    .await;

    let pile_contribution = pile_group.pile_contribution().await;
    let taker_contribution = pile_group.taker_contribution().await;
    let provider_contribution = incinerator_group.provider_contribution().await;

    assert_eq!(pile_contribution.len(), PILES);
    assert_eq!(taker_contribution.len(), GOPHERS);

    for (id, &count) in &taker_contribution {
        assert_eq!(
            Some(&count),
            provider_contribution.get(id),
            "gopher {id}'s taker and provider contributions must match"
        );
    }
}
