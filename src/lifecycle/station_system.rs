use crate::arrivals::ArrivalGenerator;
use crate::clients::ControlClient;
use crate::config::SimConfig;
use crate::controller::{self, ControlScript};
use crate::error::StationError;
use crate::framework::ActorSet;
use crate::model::{OperatorId, SimulationReport, TravelerProfile};
use crate::operator::VehicleOperator;
use crate::state::Station;
use crate::ticket_office::{self, IssueAll, TicketPolicy};
use tracing::{error, info};

/// The orchestrator of one simulation run.
///
/// `StationSystem` is responsible for:
/// - **Resource creation**: the [`Station`] (state, lock, gates) and the
///   ticket and control channels
/// - **Spawning**: every operator, the ticket office, the controller, the
///   arrival generator and, if scheduled, the control script
/// - **Teardown**: joining every actor and releasing the station exactly once
///
/// # Example
///
/// ```ignore
/// let config = SimConfig::new(2, 10, 2, 5, 20)?;
/// let system = StationSystem::start(config)?;
///
/// // Post control signals while the run is going
/// system.control().force_departure().await?;
///
/// // Wait for the natural end of the run (or a close/interrupt)
/// let report = system.wait().await?;
/// ```
pub struct StationSystem {
    station: Station,
    control: ControlClient,
    actors: ActorSet,
}

/// Optional overrides for [`StationSystem`].
pub struct SystemBuilder {
    config: SimConfig,
    policy: Box<dyn TicketPolicy>,
    roster: Option<Vec<TravelerProfile>>,
}

impl SystemBuilder {
    /// Replaces the ticket office's [`IssueAll`] policy.
    pub fn policy(mut self, policy: impl TicketPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Sends exactly these travelers instead of drawing them at random.
    pub fn travelers(mut self, profiles: Vec<TravelerProfile>) -> Self {
        self.roster = Some(profiles);
        self
    }

    /// Creates the shared resources and spawns every actor. Must be called
    /// from within a Tokio runtime.
    ///
    /// # Errors
    /// [`StationError::Config`] if the configuration is invalid; nothing has
    /// been created in that case.
    pub fn start(self) -> Result<StationSystem, StationError> {
        let SystemBuilder {
            config,
            policy,
            roster,
        } = self;
        config.validate()?;

        let station = Station::new(&config);
        let poll = config.poll_interval();
        let (office, tickets) = ticket_office::new(config.channel_capacity, policy, poll);
        let (controller, control) = controller::new(config.channel_capacity, poll);
        let arrivals = match roster {
            Some(profiles) => ArrivalGenerator::scripted(&config, tickets, profiles),
            None => ArrivalGenerator::new(&config, tickets),
        };

        let mut actors = ActorSet::new();
        for id in 1..=config.operators {
            actors.spawn(VehicleOperator::new(OperatorId(id), &config), station.clone());
        }
        actors.spawn(office, station.clone());
        actors.spawn(controller, station.clone());
        if !config.schedule.is_empty() {
            let script = ControlScript::new(control.clone(), &config.schedule, config.time_unit);
            actors.spawn(script, station.clone());
        }
        actors.spawn(arrivals, station.clone());

        info!(
            operators = config.operators,
            max_occupants = config.max_occupants,
            max_cargo = config.max_cargo,
            wait_units = config.wait_units,
            travelers = config.total_travelers,
            seed = config.seed,
            "Station open"
        );

        Ok(StationSystem {
            station,
            control,
            actors,
        })
    }
}

impl StationSystem {
    pub fn builder(config: SimConfig) -> SystemBuilder {
        SystemBuilder {
            config,
            policy: Box::new(IssueAll),
            roster: None,
        }
    }

    /// Starts a run with random travelers and a ticket office that grants
    /// every registration.
    pub fn start(config: SimConfig) -> Result<Self, StationError> {
        Self::builder(config).start()
    }

    pub fn station(&self) -> &Station {
        &self.station
    }

    /// A client for posting control signals to this run.
    pub fn control(&self) -> ControlClient {
        self.control.clone()
    }

    /// Waits until every actor has exited, then releases the station.
    ///
    /// # Errors
    /// [`StationError::ActorFailed`] naming the first actor that ended with
    /// an error. The others are still joined and the station still released.
    pub async fn wait(self) -> Result<SimulationReport, StationError> {
        let StationSystem {
            station,
            control,
            actors,
        } = self;
        drop(control);

        let mut failure = None;
        for exit in actors.join_all().await {
            if let Err(e) = exit.result {
                error!(actor = %exit.label, error = %e, "Actor ended with an error");
                failure.get_or_insert(StationError::ActorFailed {
                    actor: exit.label,
                    reason: e.to_string(),
                });
            }
        }

        let report = station.with_lock(|s| s.report());
        station.teardown();
        info!(
            departures = report.departures.len(),
            total_boarded = report.total_boarded,
            left_aboard = report.left_aboard,
            completed = report.completed,
            "Simulation finished"
        );

        match failure {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    /// Interrupts the run and waits for it to wind down.
    pub async fn shutdown(self) -> Result<SimulationReport, StationError> {
        info!("Shutting down system...");
        if self.control.interrupt().await.is_err() {
            info!("Controller already stopped");
        }
        self.wait().await
    }
}
