mod support;

use dispatch_core::ecs::{DriverStatus, Ride, RideStatus};
use dispatch_core::error::{DispatchError, Selection};
use dispatch_core::scenario::AccountConfig;
use dispatch_core::spatial::Position;
use support::fleet::{assigned_ride, online_driver, rider_at};
use support::world::TestSimBuilder;

#[test]
fn status_only_moves_forward_until_completion() {
    let mut sim = TestSimBuilder::new().build();
    online_driver(&mut sim, 6.0, 8.0);
    let rider = rider_at(&mut sim, 0.0, 0.0);
    let ride = assigned_ride(&mut sim, rider, -5.0, 0.0);

    let mut seen = vec![RideStatus::DriverAssigned];
    for _ in 0..1_000 {
        sim.tick();
        let status = sim.ride(ride).expect("ride").status;
        assert!(status >= *seen.last().expect("non-empty"));
        if status != *seen.last().expect("non-empty") {
            seen.push(status);
        }
        if status.is_terminal() {
            break;
        }
    }
    assert_eq!(
        seen,
        vec![
            RideStatus::DriverAssigned,
            RideStatus::PickupReached,
            RideStatus::InProgress,
            RideStatus::Completed,
        ]
    );
}

#[test]
fn completed_ride_is_absorbing() {
    let mut sim = TestSimBuilder::new().build();
    let driver = online_driver(&mut sim, 0.0, 0.0);
    let rider = rider_at(&mut sim, 0.0, 0.0);
    let ride = assigned_ride(&mut sim, rider, 2.0, 2.0);
    sim.run_until_idle(1_000);

    let ride_view = sim.ride(ride).expect("ride");
    let rider_view = sim.rider(rider).expect("rider");
    let driver_view = sim.driver(driver).expect("driver");
    for _ in 0..5 {
        let report = sim.tick();
        assert!(report.finished.is_empty());
    }
    assert_eq!(sim.ride(ride).expect("ride"), ride_view);
    assert_eq!(sim.rider(rider).expect("rider"), rider_view);
    assert_eq!(sim.driver(driver).expect("driver"), driver_view);
}

#[test]
fn cancelling_mid_ride_releases_everyone_without_payment() {
    let mut sim = TestSimBuilder::new().build();
    let driver = online_driver(&mut sim, 10.0, 0.0);
    let rider = rider_at(&mut sim, 0.0, 0.0);
    let ride = assigned_ride(&mut sim, rider, 0.0, 10.0);
    sim.tick();
    sim.tick();

    let cancelled = sim.cancel_ride(ride).expect("cancel");
    assert_eq!(cancelled.status, RideStatus::Cancelled);
    assert_eq!(cancelled.timing.finished_at, Some(2));

    let driver_view = sim.driver(driver).expect("driver");
    assert_eq!(driver_view.status, DriverStatus::Available);
    assert_eq!(driver_view.assigned_ride, None);
    assert_eq!(driver_view.earnings, 0.0);
    assert_eq!(driver_view.position, Position::new(9.0, 0.0));

    let rider_view = sim.rider(rider).expect("rider");
    assert!(!rider_view.has_active_ride);
    assert_eq!(rider_view.balance, 1000.0);

    assert!(sim.active_rides().is_empty());
    assert!(sim.completed_rides().is_empty());
    assert_eq!(sim.statistics().cancelled_rides, 1);
    let world = sim.world_mut();
    assert_eq!(world.query::<&Ride>().iter(world).count(), 0);
    assert_eq!(
        sim.cancel_ride(ride),
        Err(DispatchError::InvalidSelection(Selection::Ride(ride)))
    );

    // the freed driver is dispatchable again
    let again = assigned_ride(&mut sim, rider, 1.0, 1.0);
    assert_eq!(sim.ride(again).expect("ride").driver, Some(driver));
}

#[test]
fn completed_ride_cannot_be_cancelled() {
    let mut sim = TestSimBuilder::new().build();
    online_driver(&mut sim, 0.0, 0.0);
    let rider = rider_at(&mut sim, 0.0, 0.0);
    let ride = assigned_ride(&mut sim, rider, 1.0, 1.0);
    sim.run_until_idle(1_000);

    let err = sim.cancel_ride(ride).expect_err("terminal ride");
    assert!(matches!(
        err,
        DispatchError::PreconditionViolation { subject: Selection::Ride(id), ref status, .. }
            if id == ride && status == "COMPLETED"
    ));
    assert_eq!(sim.completed_rides().len(), 1);
    assert_eq!(sim.statistics().cancelled_rides, 0);
}

#[test]
fn driver_on_trip_cannot_change_availability() {
    let mut sim = TestSimBuilder::new().build();
    let driver = online_driver(&mut sim, 0.0, 0.0);
    let rider = rider_at(&mut sim, 0.0, 0.0);
    assigned_ride(&mut sim, rider, 5.0, 0.0);

    assert!(matches!(
        sim.set_driver_offline(driver),
        Err(DispatchError::PreconditionViolation { .. })
    ));
    assert!(matches!(
        sim.set_driver_online(driver),
        Err(DispatchError::PreconditionViolation { .. })
    ));
    assert_eq!(sim.driver(driver).expect("driver").status, DriverStatus::OnTrip);

    sim.run_until_idle(1_000);
    sim.set_driver_offline(driver).expect("idle driver can go offline");
    assert_eq!(sim.driver(driver).expect("driver").status, DriverStatus::Offline);
}

#[test]
fn balance_may_go_negative_and_be_topped_up() {
    let mut sim = TestSimBuilder::new()
        .with_accounts(AccountConfig {
            initial_balance: 10.0,
            ..AccountConfig::default()
        })
        .build();
    online_driver(&mut sim, 0.0, 0.0);
    let rider = rider_at(&mut sim, 0.0, 0.0);
    assigned_ride(&mut sim, rider, 10.0, 0.0);
    sim.run_until_idle(1_000);

    assert_eq!(sim.rider(rider).expect("rider").balance, -90.0);
    assert_eq!(sim.top_up_rider(rider, 100.0), Ok(10.0));
}
