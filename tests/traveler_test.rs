use station_sim::config::SimConfig;
use station_sim::framework::mock::MockTicketOffice;
use station_sim::framework::ActorSet;
use station_sim::model::{TravelerId, TravelerProfile};
use station_sim::state::Station;
use station_sim::traveler::Traveler;
use std::time::Duration;

const POLL: Duration = Duration::from_millis(5);

fn station() -> Station {
    Station::new(&SimConfig::new(1, 4, 2, 5, 10).unwrap())
}

/// A denied traveler never reaches a gate: with both category gates held for
/// the whole test, any admission attempt would hang.
#[tokio::test]
async fn denied_ticket_ends_the_journey_before_any_gate() {
    let station = station();
    let _gates = station.gates().acquire_categories().await.unwrap();

    let mut mock = MockTicketOffice::new();
    mock.expect_registration(TravelerId(1)).reply_denied();

    let mut actors = ActorSet::new();
    let traveler = Traveler::enter(&station, TravelerProfile::adult(1).with_cargo(), mock.client(), POLL);
    actors.spawn(traveler, station.clone());

    let exits = tokio::time::timeout(Duration::from_secs(2), actors.join_all())
        .await
        .expect("denied traveler must not wait on a gate");
    assert!(exits.iter().all(|e| e.is_ok()));

    let state = station.snapshot();
    assert_eq!(state.outcomes.ticket_denied, 1);
    assert_eq!(state.active_travelers, 0);
    assert!(state.manifest.is_empty());
    mock.verify();
}

#[tokio::test]
async fn lone_minor_waits_for_the_ticket_decision() {
    let station = station();
    let mut mock = MockTicketOffice::new();
    mock.expect_registration(TravelerId(1)).reply_denied();

    let mut actors = ActorSet::new();
    actors.spawn(
        Traveler::enter(&station, TravelerProfile::minor(1), mock.client(), POLL),
        station.clone(),
    );
    actors.join_all().await;

    let state = station.snapshot();
    assert_eq!(state.outcomes.ticket_denied, 1);
    assert_eq!(state.outcomes.unaccompanied, 0);
    assert_eq!(state.active_travelers, 0);
    assert!(mock.registrations()[0].expects_reply());
    mock.verify();
}

/// With the station closed before anyone registers, every traveler is turned
/// away and the live count returns to zero.
#[tokio::test]
async fn closed_station_rejects_every_traveler() {
    let station = station();
    station.update(|s| s.close());
    let mock = MockTicketOffice::new();

    let mut actors = ActorSet::new();
    for id in 1..=5 {
        let profile = TravelerProfile::adult(id);
        actors.spawn(Traveler::enter(&station, profile, mock.client(), POLL), station.clone());
    }
    assert_eq!(station.snapshot().active_travelers, 5);
    actors.join_all().await;

    let state = station.snapshot();
    assert_eq!(state.outcomes.rejected, 5);
    assert_eq!(state.active_travelers, 0);
    assert_eq!(state.boarded_this_trip, 0);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(mock.registrations().is_empty());
}

#[tokio::test]
async fn unanswered_traveler_abandons_when_the_station_closes() {
    let station = station();
    let mut mock = MockTicketOffice::new();
    mock.expect_registration(TravelerId(1)).withhold_reply();

    let mut actors = ActorSet::new();
    actors.spawn(
        Traveler::enter(&station, TravelerProfile::adult(1), mock.client(), POLL),
        station.clone(),
    );
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(station.snapshot().active_travelers, 1);

    station.update(|s| s.begin_shutdown());
    tokio::time::timeout(Duration::from_secs(2), actors.join_all())
        .await
        .expect("traveler must stop waiting once the station closes");

    let state = station.snapshot();
    assert_eq!(state.outcomes.abandoned, 1);
    assert_eq!(state.active_travelers, 0);
    mock.verify();
}

#[tokio::test]
async fn full_vehicle_keeps_traveler_retrying_until_rejected() {
    let station = Station::new(&SimConfig::new(1, 1, 0, 5, 10).unwrap());
    let mut mock = MockTicketOffice::new();
    mock.expect_registration(TravelerId(1)).without_reply();
    mock.expect_registration(TravelerId(2)).without_reply();

    let mut actors = ActorSet::new();
    for id in 1..=2 {
        let profile = TravelerProfile::adult(id).with_priority();
        actors.spawn(Traveler::enter(&station, profile, mock.client(), POLL), station.clone());
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
    // one boarded, the other keeps retrying
    assert_eq!(station.snapshot().boarded_this_trip, 1);
    assert_eq!(station.snapshot().active_travelers, 1);

    station.update(|s| s.close());
    actors.join_all().await;

    let state = station.snapshot();
    assert_eq!(state.outcomes.boarded, 1);
    assert_eq!(state.outcomes.rejected, 1);
    mock.verify();
}
