//! Application context: owns every component and dispatches the run loop.
//!
//! [`CrossingApp`] is the composition root. It wires the gate state machine,
//! light-mode cycler, heartbeat, sensor edge detectors, DCC function decoder
//! and factory-reset queue to their hardware handles, registers the periodic
//! tasks, and exposes the two entry points the rest of the system calls:
//!
//! - [`tick`](CrossingApp::tick) once per run-loop iteration, with the
//!   current time
//! - [`on_function_event`](CrossingApp::on_function_event) for every decoded
//!   DCC function-group event
//!
//! Hardware errors never escape these entry points; they are logged and the
//! state flags keep only the commands that completed, so the next invocation
//! retries exactly what is missing.
//!
//! # Example
//!
//! ```rust
//! use rs_crossing::app::CrossingApp;
//! use rs_crossing::config::CrossingConfig;
//! use rs_crossing::hal::{MockCvStore, MockGate, MockIndicator, MockSensor, MockStatusLed};
//!
//! let mut app = CrossingApp::new(
//!     CrossingConfig::default(),
//!     MockGate::new(),
//!     MockIndicator::new(),
//!     MockStatusLed::new(),
//!     MockSensor::new(),
//!     MockSensor::new(),
//!     MockCvStore::new(),
//! );
//! app.boot().unwrap();
//!
//! // Train reaches the approach block; the next occupancy poll engages.
//! app.occupancy_mut().set_active(false);
//! app.tick(500);
//! assert!(app.controller().occupied());
//! ```

use core::fmt::Debug;

use log::{debug, info, warn};

use crate::config::CrossingConfig;
use crate::crossing::CrossingController;
use crate::dcc::{cv, FactoryResetQueue, FunctionDecoder, FunctionGroupEvent};
use crate::heartbeat::Heartbeat;
use crate::lights::LightCycler;
use crate::scheduler::{Scheduler, TaskId};
use crate::sensors::SensorEdge;
use crate::traits::{CvStore, DigitalSensor, GateActuator, IndicatorLed, StatusOutput};

/// Owns all components and hardware handles of one crossing.
///
/// Generic over the hardware boundary: gate actuator `G`, indicator LED `L`,
/// status output `S`, occupancy sensor `O`, light-mode button `B`, and the
/// protocol engine's CV store `C`.
pub struct CrossingApp<G, L, S, O, B, C>
where
    G: GateActuator,
    L: IndicatorLed,
    S: StatusOutput,
    O: DigitalSensor,
    B: DigitalSensor,
    C: CvStore,
{
    config: CrossingConfig,
    controller: CrossingController<G>,
    cycler: LightCycler<L>,
    heartbeat: Heartbeat<S>,
    occupancy: O,
    occupancy_edge: SensorEdge,
    light_button: B,
    light_button_edge: SensorEdge,
    cv_store: C,
    decoder: FunctionDecoder,
    reset_queue: FactoryResetQueue,
    scheduler: Scheduler,
}

impl<G, L, S, O, B, C> CrossingApp<G, L, S, O, B, C>
where
    G: GateActuator,
    G::Error: Debug,
    L: IndicatorLed,
    L::Error: Debug,
    S: StatusOutput,
    S::Error: Debug,
    O: DigitalSensor,
    B: DigitalSensor,
    C: CvStore,
    C::Error: Debug,
{
    /// Builds the context and registers the periodic task table.
    ///
    /// The gate refresh task starts disabled; it is enabled while the
    /// crossing is occupied. No hardware is touched until
    /// [`boot`](Self::boot).
    pub fn new(
        config: CrossingConfig,
        gate: G,
        indicator: L,
        status: S,
        occupancy: O,
        light_button: B,
        cv_store: C,
    ) -> Self {
        let timing = config.timing;

        let mut scheduler = Scheduler::new();
        Self::register_task(&mut scheduler, TaskId::Heartbeat, timing.heartbeat_task_ms, true);
        Self::register_task(
            &mut scheduler,
            TaskId::OccupancyPoll,
            timing.occupancy_poll_ms,
            true,
        );
        Self::register_task(
            &mut scheduler,
            TaskId::LightButtonPoll,
            timing.light_button_poll_ms,
            true,
        );
        Self::register_task(&mut scheduler, TaskId::GateRefresh, timing.refresh_ms, false);

        let controller = CrossingController::new(gate)
            .with_heartbeat_rates(timing.heartbeat_slow_ms, timing.heartbeat_fast_ms);
        let reset_queue = FactoryResetQueue::new(&config.decoder.factory_defaults);

        Self {
            config,
            controller,
            cycler: LightCycler::new(indicator),
            heartbeat: Heartbeat::new(status),
            occupancy,
            occupancy_edge: SensorEdge::new(),
            light_button,
            light_button_edge: SensorEdge::new(),
            cv_store,
            decoder: FunctionDecoder::new(),
            reset_queue,
            scheduler,
        }
    }

    fn register_task(scheduler: &mut Scheduler, id: TaskId, period_ms: u32, enabled: bool) {
        // Distinct ids against MAX_TASKS capacity, registration cannot fail.
        let _ = scheduler.register(id, period_ms, enabled);
        debug!(
            "task registered: {:?} every {} ms (enabled: {})",
            id, period_ms, enabled
        );
    }

    /// Drives the hardware to the known idle state and, when configured,
    /// arms the factory-defaults restore.
    ///
    /// Call once before the first [`tick`](Self::tick).
    pub fn boot(&mut self) -> Result<(), G::Error> {
        info!("{} booting", self.config.device.name.as_str());
        self.controller.park()?;

        if self.config.decoder.apply_defaults_on_boot {
            self.reset_queue.request();
            info!(
                "restoring {} factory-default CVs",
                self.reset_queue.pending()
            );
        }
        Ok(())
    }

    /// One run-loop iteration: runs every due task, then services at most
    /// one factory-default CV restore.
    pub fn tick(&mut self, now_ms: u64) {
        for task in self.scheduler.due_tasks(now_ms) {
            match task {
                TaskId::Heartbeat => self.run_heartbeat(now_ms),
                TaskId::OccupancyPoll => self.poll_occupancy(),
                TaskId::LightButtonPoll => self.poll_light_button(),
                TaskId::GateRefresh => self.run_refresh(),
            }
        }
        self.service_cv_restore();
    }

    /// Entry point for decoded DCC function-group events.
    ///
    /// Function 1 edges toggle the crossing on gate position (up engages,
    /// anything else releases); function 3 edges advance the indicator.
    /// The bit's literal on/off value decides nothing.
    pub fn on_function_event(&mut self, event: &FunctionGroupEvent) {
        let cv29 = self.cv_store.cv(cv::CONFIG);
        let decoded = self.decoder.decode(event, cv29);

        if decoded.crossing_edge {
            if self.controller.is_up() {
                self.engage();
            } else {
                self.release();
            }
        }
        if decoded.indicator_edge {
            self.cycle_indicator();
        }
    }

    fn run_heartbeat(&mut self, now_ms: u64) {
        let period_ms = self.controller.heartbeat_period_ms();
        if let Err(e) = self.heartbeat.poll(now_ms, period_ms) {
            warn!("status LED write failed: {:?}", e);
        }
    }

    fn poll_occupancy(&mut self) {
        if self.occupancy_edge.poll(&self.occupancy) {
            info!("occupancy sensor triggered");
            if self.controller.occupied() {
                self.release();
            } else {
                self.engage();
            }
        }
    }

    fn poll_light_button(&mut self) {
        if self.light_button_edge.poll(&self.light_button) {
            info!("light mode button pressed");
            self.cycle_indicator();
        }
    }

    fn run_refresh(&mut self) {
        if let Err(e) = self.controller.refresh() {
            warn!("light refresh failed: {:?}", e);
        }
    }

    fn engage(&mut self) {
        match self.controller.activate() {
            Ok(outcome) => debug!("crossing engage: {:?}", outcome),
            Err(e) => warn!("crossing activation failed: {:?}", e),
        }
        // Refresh keyed on the occupied flag covers partial transitions:
        // a failed down motion with lights already on still gets serviced.
        self.scheduler
            .set_enabled(TaskId::GateRefresh, self.controller.occupied());
    }

    fn release(&mut self) {
        match self.controller.deactivate() {
            Ok(outcome) => debug!("crossing release: {:?}", outcome),
            Err(e) => warn!("crossing deactivation failed: {:?}", e),
        }
        self.scheduler
            .set_enabled(TaskId::GateRefresh, self.controller.occupied());
    }

    fn cycle_indicator(&mut self) {
        match self.cycler.advance() {
            Ok(color) => debug!("indicator now {}", color.as_str()),
            Err(e) => warn!("indicator write failed: {:?}", e),
        }
    }

    fn service_cv_restore(&mut self) {
        if self.cv_store.take_reset_request() {
            self.reset_queue.request();
            info!(
                "factory reset requested, restoring {} CVs",
                self.reset_queue.pending()
            );
        }

        match self.reset_queue.drain_one(&mut self.cv_store) {
            Ok(Some(pair)) => debug!("restored CV {} = {}", pair.id, pair.value),
            Ok(None) => {}
            Err(e) => warn!("CV write failed, will retry: {:?}", e),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The configuration this context was built with.
    pub fn config(&self) -> &CrossingConfig {
        &self.config
    }

    /// The gate state machine.
    pub fn controller(&self) -> &CrossingController<G> {
        &self.controller
    }

    /// Mutable access to the gate state machine (fault injection in tests).
    pub fn controller_mut(&mut self) -> &mut CrossingController<G> {
        &mut self.controller
    }

    /// The light-mode cycler.
    pub fn cycler(&self) -> &LightCycler<L> {
        &self.cycler
    }

    /// The heartbeat monitor.
    pub fn heartbeat(&self) -> &Heartbeat<S> {
        &self.heartbeat
    }

    /// The task table.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// The factory-reset queue.
    pub fn reset_queue(&self) -> &FactoryResetQueue {
        &self.reset_queue
    }

    /// Mutable access to the occupancy sensor (level scripting in tests).
    pub fn occupancy_mut(&mut self) -> &mut O {
        &mut self.occupancy
    }

    /// Mutable access to the light-mode button (level scripting in tests).
    pub fn light_button_mut(&mut self) -> &mut B {
        &mut self.light_button
    }

    /// The protocol engine's CV store.
    pub fn cv_store(&self) -> &C {
        &self.cv_store
    }

    /// Mutable access to the CV store (reset requests in tests).
    pub fn cv_store_mut(&mut self) -> &mut C {
        &mut self.cv_store
    }
}
