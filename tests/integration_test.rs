use station_sim::config::{ArrivalMode, ControlSchedule, SimConfig, UnitRange};
use station_sim::error::StationError;
use station_sim::lifecycle::StationSystem;
use station_sim::model::{SimulationReport, TicketMessage, TravelerProfile};
use std::collections::HashSet;
use std::time::{Duration, Instant};

fn fast_config(operators: i64, seats: i64, cargo: i64, wait: i64, travelers: i64) -> SimConfig {
    SimConfig::new(operators, seats, cargo, wait, travelers)
        .unwrap()
        .with_time_unit(Duration::from_millis(5))
        .with_travel_units(UnitRange::new(1, 2))
        .with_seed(2024)
}

async fn finish(system: StationSystem) -> SimulationReport {
    tokio::time::timeout(Duration::from_secs(30), system.wait())
        .await
        .expect("simulation did not finish")
        .expect("simulation failed")
}

fn assert_conserved(report: &SimulationReport, seats: u32, cargo: u32) {
    assert_eq!(report.total_boarded, report.departed_occupants());

    let mut seen = HashSet::new();
    for departure in &report.departures {
        assert!(departure.occupants <= seats);
        assert!(departure.cargo <= cargo);
        assert_eq!(departure.travelers.len() as u32, departure.occupants);
        for traveler in &departure.travelers {
            assert!(seen.insert(*traveler), "{traveler} departed twice");
        }
    }

    let trips: Vec<u32> = report.departures.iter().map(|d| d.trip).collect();
    assert_eq!(trips, (1..=report.departures.len() as u32).collect::<Vec<_>>());
}

/// Full end-to-end run with all real actors, ending on its own.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn full_run_completes_and_conserves_travelers() {
    let system = StationSystem::start(fast_config(2, 5, 2, 2, 40)).unwrap();
    let report = finish(system).await;

    assert!(report.completed);
    assert!(!report.station_closed);
    assert_eq!(report.left_aboard, 0);
    assert_conserved(&report, 5, 2);

    // one outcome per traveler actor, dependents included
    assert!(report.outcomes.total() >= 40);
    assert_eq!(u64::from(report.outcomes.boarded), report.total_boarded);
    assert_eq!(report.outcomes.rejected, 0);
    assert_eq!(report.outcomes.ticket_denied, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn same_seed_same_population() {
    let config = fast_config(1, 50, 50, 1, 30)
        .with_arrivals(ArrivalMode::Batch)
        .with_seed(99);

    let first = finish(StationSystem::start(config.clone()).unwrap()).await;
    let second = finish(StationSystem::start(config).unwrap()).await;

    assert_eq!(first.outcomes, second.outcomes);
    assert_eq!(first.total_boarded, second.total_boarded);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn ticket_policy_turns_travelers_away() {
    let travelers = (1..=6).map(TravelerProfile::adult).collect();
    let system = StationSystem::builder(fast_config(1, 10, 0, 2, 6))
        .policy(|m: &TicketMessage| m.traveler_id.0 % 2 == 0)
        .travelers(travelers)
        .start()
        .unwrap();
    let report = finish(system).await;

    assert!(report.completed);
    assert_eq!(report.outcomes.ticket_denied, 3);
    assert_eq!(report.outcomes.boarded, 3);
    let boarded: HashSet<u32> = report
        .departures
        .iter()
        .flat_map(|d| d.travelers.iter().map(|t| t.0))
        .collect();
    assert_eq!(boarded, HashSet::from([2, 4, 6]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn scheduled_force_departure_leaves_early() {
    let config = SimConfig::new(1, 10, 2, 200, 2)
        .unwrap()
        .with_time_unit(Duration::from_millis(20))
        .with_travel_units(UnitRange::new(1, 1))
        .with_arrivals(ArrivalMode::Batch)
        .with_schedule(ControlSchedule {
            force_departure_after: Some(5),
            close_after: None,
        });
    let travelers = vec![TravelerProfile::adult(1), TravelerProfile::adult(2).with_cargo()];

    let started = Instant::now();
    let system = StationSystem::builder(config).travelers(travelers).start().unwrap();
    let report = finish(system).await;

    // a regular wait would take four seconds
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(report.completed);
    assert_eq!(report.departures.len(), 1);
    assert_eq!(report.departures[0].occupants, 2);
    assert_eq!(report.departures[0].cargo, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn closing_before_arrivals_boards_nobody() {
    let config = fast_config(2, 5, 2, 2, 20).with_time_unit(Duration::from_millis(50));
    let system = StationSystem::start(config).unwrap();
    system.control().close_station().await.unwrap();
    let report = finish(system).await;

    assert!(report.station_closed);
    assert!(report.shut_down);
    assert_eq!(report.total_boarded, 0);
    assert_eq!(report.outcomes.boarded, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shutdown_mid_run_unwinds_every_actor() {
    let system = StationSystem::start(fast_config(3, 4, 1, 3, 500)).unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;

    let report = tokio::time::timeout(Duration::from_secs(10), system.shutdown())
        .await
        .expect("shutdown did not finish")
        .expect("shutdown failed");

    assert!(report.shut_down);
    assert!(!report.completed);
    assert_conserved(&report, 4, 1);
}

#[tokio::test]
async fn report_serializes_to_json() {
    let travelers = vec![TravelerProfile::adult(1)];
    let system = StationSystem::builder(fast_config(1, 2, 1, 1, 1))
        .travelers(travelers)
        .start()
        .unwrap();
    let report = finish(system).await;

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["total_boarded"], 1);
    assert_eq!(json["departures"][0]["travelers"][0], 1);
    assert_eq!(json["outcomes"]["boarded"], 1);
}

#[test]
fn invalid_configuration_creates_nothing() {
    // no runtime is needed because validation fails before any spawn
    let config = fast_config(1, 2, 1, 1, 1).with_time_unit(Duration::ZERO);
    assert!(StationSystem::start(config).is_err());

    let config = fast_config(1, 2, 1, 3600, 1).with_time_unit(Duration::from_millis(u64::MAX));
    assert!(matches!(
        StationSystem::start(config),
        Err(StationError::Config(_))
    ));
}
