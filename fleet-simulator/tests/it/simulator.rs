use std::sync::Arc;

use fleet_simulator::{SimulationSettings, Simulator, kinematics::is_moving};
use vessel_core::snapshot_channel;

use crate::helper::{TICK, test};

#[test]
fn test_same_seed_generates_same_fleet() {
    let settings = SimulationSettings {
        seed: Some(1),
        ..Default::default()
    };
    let (a, _) = snapshot_channel();
    let (b, _) = snapshot_channel();

    let summary = |simulator: Simulator| {
        let mut vessels: Vec<_> = simulator
            .fleet()
            .values()
            .map(|v| (v.mmsi, v.name.clone(), v.latitude, v.longitude))
            .collect();
        vessels.sort_by_key(|v| v.0);
        vessels
    };

    assert_eq!(
        summary(Simulator::new(a, &settings)),
        summary(Simulator::new(b, &settings))
    );
}

#[tokio::test(start_paused = true)]
async fn test_fleet_is_published_before_first_tick() {
    test(|helper| async move {
        let fleet = helper.snapshots.borrow().clone();
        assert!(!fleet.is_empty());
        assert!(fleet.values().all(|v| v.has_fix()));
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_every_tick_replaces_the_whole_map() {
    test(|mut helper| async move {
        let initial = helper.snapshots.borrow_and_update().clone();

        helper.snapshots.changed().await.unwrap();
        let next = helper.snapshots.borrow_and_update().clone();

        assert!(!Arc::ptr_eq(&initial, &next));
        assert_eq!(initial.len(), next.len());

        for (mmsi, before) in initial.iter() {
            let after = next.get(mmsi).unwrap();
            assert_eq!(before.name, after.name);
            assert_eq!(before.speed_over_ground, after.speed_over_ground);
            if is_moving(before) {
                assert!(
                    before.latitude != after.latitude || before.longitude != after.longitude
                );
            }
        }
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_ticks() {
    test(|mut helper| async move {
        helper.snapshots.borrow_and_update();
        helper.cancel.cancel();
        helper.handle.await.unwrap();

        tokio::time::sleep(TICK * 10).await;
        assert!(!helper.snapshots.has_changed().unwrap_or(false));
    })
    .await;
}
