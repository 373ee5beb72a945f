//! Integration tests for the visit queries
//!
//! Each query is checked against a straightforward brute-force recomputation
//! over randomly generated logs. The same-site counter is additionally fed
//! shuffled copies of the log, since its result must not depend on arrival
//! order.

use chrono::{Duration, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::RngExt;
use sitestats::analytics::{
    frequent_visitors, last_visit_leaderboard, run_visit_queries, same_site_users,
    top_sites_by_unique_users, AnalyticsError, QueryParams, VisitWindow,
};
use sitestats::models::VisitEvent;
use std::collections::{BTreeMap, BTreeSet, HashMap};

const COUNTRIES: [&str; 3] = ["BDV", "TL6", "XYZ"];
const ROUNDS: usize = 25;

fn base() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2019-02-01 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
}

/// A chronologically sorted log with distinct timestamps.
fn random_log(len: usize, users: usize, sites: usize) -> Vec<VisitEvent> {
    let mut rng = rand::rng();
    (0..len)
        .map(|i| {
            let user = format!("U{}", rng.random_range(0..users));
            let site = format!("S{}", rng.random_range(0..sites));
            let country = COUNTRIES[rng.random_range(0..COUNTRIES.len())];
            VisitEvent::new(base() + Duration::minutes(7 * i as i64), user, country, site)
        })
        .collect()
}

fn brute_force_same_site(events: &[VisitEvent]) -> u64 {
    let mut first: HashMap<&str, &VisitEvent> = HashMap::new();
    let mut last: HashMap<&str, &VisitEvent> = HashMap::new();
    for event in events {
        let user = event.user_id.as_str();
        let f = first.entry(user).or_insert(event);
        if event.timestamp < f.timestamp {
            *f = event;
        }
        let l = last.entry(user).or_insert(event);
        if event.timestamp > l.timestamp {
            *l = event;
        }
    }
    first
        .iter()
        .filter(|(user, f)| last[*user].site_id == f.site_id)
        .count() as u64
}

#[test]
fn test_same_site_users_matches_brute_force_on_shuffled_input() {
    let mut rng = rand::rng();
    for _ in 0..ROUNDS {
        let mut events = random_log(300, 20, 4);
        let expected = brute_force_same_site(&events);

        assert_eq!(same_site_users(&events), expected);
        for _ in 0..5 {
            events.shuffle(&mut rng);
            assert_eq!(same_site_users(&events), expected);
        }
    }
}

#[test]
fn test_unique_visitors_matches_brute_force() {
    for _ in 0..ROUNDS {
        let events = random_log(400, 30, 6);

        let mut users_per_site: HashMap<&str, BTreeSet<&str>> = HashMap::new();
        for event in events.iter().filter(|e| e.country_id == "BDV") {
            users_per_site
                .entry(event.site_id.as_str())
                .or_default()
                .insert(event.user_id.as_str());
        }
        let max = users_per_site.values().map(|u| u.len()).max().unwrap_or(0) as u64;
        let expected: BTreeSet<&str> = users_per_site
            .iter()
            .filter(|(_, users)| users.len() as u64 == max)
            .map(|(site, _)| *site)
            .collect();

        let top = top_sites_by_unique_users(&events, "BDV");
        let sites: BTreeSet<&str> = top.sites.iter().map(String::as_str).collect();
        assert_eq!(top.max_count, max);
        assert_eq!(sites, expected);
        assert_eq!(sites.len(), top.sites.len(), "a site was listed twice");
    }
}

#[test]
fn test_unique_visitors_with_unmatched_filter() {
    let events = random_log(100, 10, 3);
    let top = top_sites_by_unique_users(&events, "NOPE");
    assert!(top.sites.is_empty());
    assert_eq!(top.max_count, 0);
}

#[test]
fn test_frequent_visitors_matches_brute_force() {
    let threshold = 3;
    for _ in 0..ROUNDS {
        let events = random_log(500, 6, 3);
        let window = VisitWindow::new(events[100].timestamp, events[400].timestamp).unwrap();

        // Pair -> index of the event that pushed its count past the threshold.
        let mut counts: HashMap<(&str, &str), u64> = HashMap::new();
        let mut crossing_at: BTreeMap<usize, (&str, &str)> = BTreeMap::new();
        for (index, event) in events.iter().enumerate() {
            if event.timestamp < window.start || event.timestamp > window.end {
                continue;
            }
            let key = (event.user_id.as_str(), event.site_id.as_str());
            let count = counts.entry(key).or_default();
            *count += 1;
            if *count == threshold + 1 {
                crossing_at.insert(index, key);
            }
        }
        let expected: Vec<(&str, &str, u64)> = crossing_at
            .values()
            .map(|key| (key.0, key.1, counts[key]))
            .collect();

        let found = frequent_visitors(&events, &window, threshold);
        let actual: Vec<(&str, &str, u64)> = found
            .iter()
            .map(|f| (f.user_id.as_str(), f.site_id.as_str(), f.visits))
            .collect();
        assert_eq!(actual, expected);
        assert!(actual.iter().all(|(_, _, visits)| *visits > threshold));
    }
}

#[test]
fn test_last_visit_leaderboard_matches_brute_force() {
    for _ in 0..ROUNDS {
        let events = random_log(300, 40, 5);

        let mut latest: HashMap<&str, &VisitEvent> = HashMap::new();
        for event in &events {
            let entry = latest.entry(event.user_id.as_str()).or_insert(event);
            if event.timestamp > entry.timestamp {
                *entry = event;
            }
        }
        let mut expected: HashMap<&str, u64> = HashMap::new();
        for event in latest.values() {
            *expected.entry(event.site_id.as_str()).or_default() += 1;
        }

        let board = last_visit_leaderboard(&events).unwrap();
        let actual: HashMap<&str, u64> = board
            .iter()
            .map(|t| (t.site_id.as_str(), t.users))
            .collect();
        assert_eq!(actual, expected);
        assert_eq!(board.iter().map(|t| t.users).sum::<u64>(), latest.len() as u64);
        assert!(board.windows(2).all(|w| w[0].users >= w[1].users));
    }
}

#[test]
fn test_last_visit_leaderboard_rejects_reversed_input() {
    let mut events = random_log(50, 5, 3);
    events.reverse();

    let err = last_visit_leaderboard(&events).unwrap_err();
    assert!(matches!(err, AnalyticsError::Unordered { index: 1, .. }));
}

fn params(window: VisitWindow) -> QueryParams {
    QueryParams {
        country: "BDV".to_string(),
        window,
        threshold: 2,
        leaderboard_limit: Some(2),
    }
}

#[test]
fn test_run_visit_queries_combines_all_results() {
    let events = random_log(200, 8, 4);
    let window = VisitWindow::new(events[0].timestamp, events[199].timestamp).unwrap();

    let report = run_visit_queries(&events, &params(window)).unwrap();

    assert_eq!(report.country, "BDV");
    assert_eq!(report.unique_visitors, top_sites_by_unique_users(&events, "BDV"));
    assert_eq!(report.frequent_visitors, frequent_visitors(&events, &window, 2));
    assert!(report.last_visits.len() <= 2);
    assert_eq!(
        report.last_visits[..],
        last_visit_leaderboard(&events).unwrap()[..report.last_visits.len()]
    );
    assert_eq!(report.same_site_users, brute_force_same_site(&events));
}

#[test]
fn test_empty_log_yields_empty_results() {
    let window = VisitWindow::new(base(), base() + Duration::days(1)).unwrap();

    let report = run_visit_queries(&[], &params(window)).unwrap();

    assert!(report.unique_visitors.sites.is_empty());
    assert_eq!(report.unique_visitors.max_count, 0);
    assert!(report.frequent_visitors.is_empty());
    assert!(report.last_visits.is_empty());
    assert_eq!(report.same_site_users, 0);
}

#[test]
fn test_run_visit_queries_fails_on_unordered_log() {
    let mut events = random_log(20, 4, 2);
    events.swap(3, 10);
    let window = VisitWindow::new(base(), base() + Duration::days(1)).unwrap();

    assert!(run_visit_queries(&events, &params(window)).is_err());
}
