mod common;

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use scheduling_cell::services::AvailabilityIndex;
use shared_models::AvailabilitySlot;

use common::{monday, store, weekday_slots};

fn time(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
}

#[tokio::test]
async fn slot_covering_the_requested_range_is_available() {
    let store = store();
    let staff = Uuid::new_v4();
    store.seed_slots(weekday_slots(staff)).await;

    let index = AvailabilityIndex::new(store);
    assert!(index
        .is_available(staff, monday(), time(10), time(13))
        .await
        .unwrap());
}

#[tokio::test]
async fn partial_coverage_is_not_availability() {
    let store = store();
    let staff = Uuid::new_v4();
    store.seed_slots(weekday_slots(staff)).await;

    let index = AvailabilityIndex::new(store);
    // Window runs past the 18:00 end of the slot.
    assert!(!index
        .is_available(staff, monday(), time(16), time(19))
        .await
        .unwrap());
}

#[tokio::test]
async fn no_slots_means_unavailable() {
    let store = store();
    let index = AvailabilityIndex::new(store);
    assert!(!index
        .is_available(Uuid::new_v4(), monday(), time(10), time(13))
        .await
        .unwrap());
}

#[tokio::test]
async fn inactive_and_expired_slots_are_ignored() {
    let store = store();
    let staff = Uuid::new_v4();

    let mut inactive = weekday_slots(staff);
    for slot in &mut inactive {
        slot.is_active = false;
    }
    let expired: Vec<AvailabilitySlot> = weekday_slots(staff)
        .into_iter()
        .map(|mut slot| {
            slot.end_date = Some(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
            slot
        })
        .collect();
    store.seed_slots(inactive).await;
    store.seed_slots(expired).await;

    let index = AvailabilityIndex::new(store);
    assert!(!index
        .is_available(staff, monday(), time(10), time(13))
        .await
        .unwrap());
}

#[tokio::test]
async fn slot_not_yet_effective_is_ignored() {
    let store = store();
    let staff = Uuid::new_v4();

    let future: Vec<AvailabilitySlot> = weekday_slots(staff)
        .into_iter()
        .map(|mut slot| {
            slot.effective_date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
            slot
        })
        .collect();
    store.seed_slots(future).await;

    let index = AvailabilityIndex::new(store);
    assert!(!index
        .is_available(staff, monday(), time(10), time(13))
        .await
        .unwrap());
}

#[tokio::test]
async fn other_staff_slots_do_not_apply() {
    let store = store();
    let staff = Uuid::new_v4();
    store.seed_slots(weekday_slots(Uuid::new_v4())).await;

    let index = AvailabilityIndex::new(store);
    assert!(!index
        .is_available(staff, monday(), time(10), time(13))
        .await
        .unwrap());
}
