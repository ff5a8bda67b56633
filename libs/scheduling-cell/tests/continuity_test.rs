mod common;

use assert_matches::assert_matches;
use chrono::Duration;
use std::sync::Arc;
use uuid::Uuid;

use scheduling_cell::services::ContinuityScoringService;
use shared_models::{SchedulingError, SessionStatus, TrendDirection};
use shared_store::MemoryStore;

use common::{at, config, monday, session, store};

fn service(store: Arc<MemoryStore>) -> ContinuityScoringService {
    ContinuityScoringService::new(store, config())
}

#[tokio::test]
async fn single_staff_history_scores_at_one_hundred() {
    let store = store();
    let client = Uuid::new_v4();
    let staff = Uuid::new_v4();

    // Ten weekly sessions, all with the same staff member.
    for week in 0..10 {
        store
            .seed_sessions([session(
                client,
                staff,
                at(monday(), 9) + Duration::weeks(week),
                SessionStatus::Completed,
            )])
            .await;
    }

    let reference = at(monday(), 9) + Duration::weeks(10);
    let scores = service(store).get_scores(client, reference).await.unwrap();

    assert_eq!(scores.len(), 1);
    let score = &scores[0];
    assert_eq!(score.staff_id, staff);
    assert_eq!(score.client_id, client);
    assert!((score.score - 100.0).abs() < 1e-9);
    assert_eq!(score.total_sessions, 10);
    assert!(score.is_primary);
    assert_eq!(score.last_session_date, Some(at(monday(), 9) + Duration::weeks(9)));
}

#[tokio::test]
async fn dominant_staff_member_is_primary_and_outranks_the_rest() {
    let store = store();
    let client = Uuid::new_v4();
    let primary = Uuid::new_v4();
    let secondary = Uuid::new_v4();

    for week in 0..7 {
        store
            .seed_sessions([session(
                client,
                primary,
                at(monday(), 9) + Duration::weeks(week),
                SessionStatus::Completed,
            )])
            .await;
    }
    for week in 0..3 {
        store
            .seed_sessions([session(
                client,
                secondary,
                at(monday(), 14) + Duration::weeks(week),
                SessionStatus::Completed,
            )])
            .await;
    }

    let reference = at(monday(), 9) + Duration::weeks(8);
    let scores = service(store).get_scores(client, reference).await.unwrap();

    assert_eq!(scores.len(), 2);
    assert_eq!(scores[0].staff_id, primary);
    assert!(scores[0].is_primary);
    assert!(!scores[1].is_primary);
    assert!(scores[0].score > scores[1].score);
    assert_eq!(scores[0].total_sessions, 7);
    assert_eq!(scores[1].total_sessions, 3);
}

#[tokio::test]
async fn scores_are_invariant_to_seeding_order() {
    let client = Uuid::new_v4();
    let staff_a = Uuid::new_v4();
    let staff_b = Uuid::new_v4();

    let mut sessions = Vec::new();
    for week in 0..6 {
        sessions.push(session(
            client,
            if week % 2 == 0 { staff_a } else { staff_b },
            at(monday(), 9) + Duration::weeks(week),
            SessionStatus::Completed,
        ));
    }

    let reference = at(monday(), 9) + Duration::weeks(6);

    let forward = store();
    forward.seed_sessions(sessions.clone()).await;
    let forward_scores = service(forward).get_scores(client, reference).await.unwrap();

    let reversed = store();
    reversed
        .seed_sessions(sessions.into_iter().rev().collect::<Vec<_>>())
        .await;
    let reversed_scores = service(reversed).get_scores(client, reference).await.unwrap();

    let forward_json = serde_json::to_value(&forward_scores).unwrap();
    let reversed_json = serde_json::to_value(&reversed_scores).unwrap();
    assert_eq!(forward_json, reversed_json);
}

#[tokio::test]
async fn cancelled_and_no_show_sessions_build_no_history() {
    let store = store();
    let client = Uuid::new_v4();
    let staff = Uuid::new_v4();

    store
        .seed_sessions([
            session(client, staff, at(monday(), 9), SessionStatus::Cancelled),
            session(client, staff, at(monday(), 14), SessionStatus::NoShow),
        ])
        .await;

    let scores = service(store)
        .get_scores(client, at(monday(), 9) + Duration::weeks(1))
        .await
        .unwrap();
    assert!(scores.is_empty());
}

#[tokio::test]
async fn growing_share_classifies_as_improving() {
    let store = store();
    let client = Uuid::new_v4();
    let rising = Uuid::new_v4();
    let fading = Uuid::new_v4();

    // Earlier half mostly `fading`, later half entirely `rising`.
    for week in 0..4 {
        store
            .seed_sessions([session(
                client,
                fading,
                at(monday(), 9) + Duration::weeks(week),
                SessionStatus::Completed,
            )])
            .await;
    }
    for week in 4..8 {
        store
            .seed_sessions([session(
                client,
                rising,
                at(monday(), 9) + Duration::weeks(week),
                SessionStatus::Completed,
            )])
            .await;
    }

    let reference = at(monday(), 9) + Duration::weeks(8);
    let scores = service(store).get_scores(client, reference).await.unwrap();

    let rising_score = scores.iter().find(|s| s.staff_id == rising).unwrap();
    let fading_score = scores.iter().find(|s| s.staff_id == fading).unwrap();
    assert_eq!(rising_score.trend, TrendDirection::Improving);
    assert_eq!(fading_score.trend, TrendDirection::Declining);
}

#[tokio::test]
async fn pairing_frequencies_sum_to_one_hundred() {
    let store = store();
    let client = Uuid::new_v4();
    let staff_a = Uuid::new_v4();
    let staff_b = Uuid::new_v4();
    let staff_c = Uuid::new_v4();

    for (week, staff) in [staff_a, staff_a, staff_a, staff_b, staff_b, staff_c]
        .iter()
        .enumerate()
    {
        store
            .seed_sessions([session(
                client,
                *staff,
                at(monday(), 9) + Duration::weeks(week as i64),
                SessionStatus::Completed,
            )])
            .await;
    }

    let start = at(monday(), 0);
    let end = at(monday(), 0) + Duration::weeks(6);
    let frequencies = service(store)
        .compute_pairing_frequencies(client, start, end)
        .await
        .unwrap();

    assert_eq!(frequencies.len(), 3);
    let total: f64 = frequencies.iter().map(|f| f.percentage).sum();
    assert!((total - 100.0).abs() < 1e-9);

    // Sorted by count descending; staff_a holds half the sessions.
    assert_eq!(frequencies[0].staff_id, staff_a);
    assert_eq!(frequencies[0].session_count, 3);
    assert!((frequencies[0].percentage - 50.0).abs() < 1e-9);

    // Six sessions over six weeks.
    let per_week: f64 = frequencies.iter().map(|f| f.average_sessions_per_week).sum();
    assert!((per_week - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn empty_history_returns_no_scores() {
    let store = store();
    let scores = service(store)
        .get_scores(Uuid::new_v4(), at(monday(), 9))
        .await
        .unwrap();
    assert!(scores.is_empty());
}

#[tokio::test]
async fn inverted_frequency_window_is_a_validation_error() {
    let store = store();
    let result = service(store)
        .compute_pairing_frequencies(
            Uuid::new_v4(),
            at(monday(), 9),
            at(monday(), 9) - Duration::days(1),
        )
        .await;
    assert_matches!(result, Err(SchedulingError::Validation(_)));
}
