//! Integration tests for the crossing run loop: occupancy sensing,
//! heartbeat pacing, and the light-mode button driving the full
//! application context.

use rs_crossing::app::CrossingApp;
use rs_crossing::config::{CrossingConfig, DecoderConfig};
use rs_crossing::hal::{
    GateCommand, MockCvStore, MockGate, MockIndicator, MockSensor, MockStatusLed,
};
use rs_crossing::{IndicatorColor, TaskId};

type App = CrossingApp<MockGate, MockIndicator, MockStatusLed, MockSensor, MockSensor, MockCvStore>;

/// A booted context with the CV restore disabled, so gate command counts
/// and CV writes in a test are the test's own.
fn booted_app() -> App {
    let mut app = CrossingApp::new(
        CrossingConfig::default()
            .with_decoder(DecoderConfig::default().with_apply_defaults_on_boot(false)),
        MockGate::new(),
        MockIndicator::new(),
        MockStatusLed::new(),
        MockSensor::new(),
        MockSensor::new(),
        MockCvStore::new(),
    );
    app.boot().unwrap();
    app
}

#[test]
fn sensor_press_while_idle_engages_the_crossing() {
    let mut app = booted_app();
    app.tick(0);

    // Train reaches the approach block before the next occupancy poll.
    app.occupancy_mut().set_active(false);
    app.tick(500);

    assert!(app.controller().occupied());
    assert!(app.controller().is_down());
    assert!(!app.controller().is_up());
    assert!(app.scheduler().is_enabled(TaskId::GateRefresh));
    assert_eq!(app.controller().heartbeat_period_ms(), 200);

    // Exactly one command pair beyond the boot park.
    assert_eq!(app.controller().gate().count(GateCommand::LightsOn), 1);
    assert_eq!(app.controller().gate().count(GateCommand::Lower), 1);
}

#[test]
fn full_train_pass_returns_to_idle() {
    let mut app = booted_app();
    app.tick(0);

    app.occupancy_mut().set_active(false);
    app.tick(500);
    assert!(app.controller().occupied());

    // Sensor idles, then a second press clears the crossing.
    app.occupancy_mut().set_active(true);
    app.tick(1000);
    app.occupancy_mut().set_active(false);
    app.tick(1500);

    assert!(!app.controller().occupied());
    assert!(app.controller().is_up());
    assert!(!app.scheduler().is_enabled(TaskId::GateRefresh));
    assert_eq!(app.controller().heartbeat_period_ms(), 2000);

    // One engage pair; boot park plus the release make two off/up pairs.
    assert_eq!(app.controller().gate().count(GateCommand::LightsOn), 1);
    assert_eq!(app.controller().gate().count(GateCommand::Lower), 1);
    assert_eq!(app.controller().gate().count(GateCommand::LightsOff), 2);
    assert_eq!(app.controller().gate().count(GateCommand::Raise), 2);
}

#[test]
fn heartbeat_toggles_slow_while_idle() {
    let mut app = booted_app();

    // Heartbeat task polls every 300 ms; the slow toggle period is 2000 ms.
    for now_ms in (0..=1800).step_by(300) {
        app.tick(now_ms);
    }
    assert_eq!(app.heartbeat().output().toggles, 0);

    app.tick(2100);
    assert_eq!(app.heartbeat().output().toggles, 1);
    assert_eq!(app.heartbeat().last_toggle_ms(), 2100);
}

#[test]
fn heartbeat_speeds_up_after_engage_without_an_early_toggle() {
    let mut app = booted_app();
    for now_ms in (0..=2100).step_by(300) {
        app.tick(now_ms);
    }
    assert_eq!(app.heartbeat().output().toggles, 1);

    // Engage at 2400. The heartbeat task runs first in that iteration and
    // still sees the slow period, so nothing fires early.
    app.occupancy_mut().set_active(false);
    app.tick(2400);
    assert!(app.controller().occupied());
    assert_eq!(app.heartbeat().output().toggles, 1);

    // Next poll sees the fast period: 2700 - 2100 >= 200.
    app.tick(2700);
    assert_eq!(app.heartbeat().output().toggles, 2);
    assert_eq!(app.heartbeat().last_toggle_ms(), 2700);

    // Every 300 ms poll now toggles, since 300 >= the 200 ms fast period.
    app.tick(3000);
    app.tick(3300);
    assert_eq!(app.heartbeat().output().toggles, 4);
}

#[test]
fn light_button_cycles_through_all_four_colors() {
    let mut app = booted_app();
    app.tick(0);

    // Four press/release cycles against the 1000 ms button poll.
    let mut now_ms = 0;
    for _ in 0..4 {
        app.light_button_mut().set_active(false);
        now_ms += 1000;
        app.tick(now_ms);
        app.light_button_mut().set_active(true);
        now_ms += 1000;
        app.tick(now_ms);
    }

    assert_eq!(
        app.cycler().led().history,
        vec![
            IndicatorColor::Green,
            IndicatorColor::Yellow,
            IndicatorColor::Red,
            IndicatorColor::Off,
        ]
    );
    assert_eq!(app.cycler().color(), IndicatorColor::Off);
    assert_eq!(app.cycler().color_index(), 0);
}

#[test]
fn held_light_button_advances_once() {
    let mut app = booted_app();
    app.tick(0);

    app.light_button_mut().set_active(false);
    for now_ms in (1000..=5000).step_by(1000) {
        app.tick(now_ms);
    }

    assert_eq!(app.cycler().color(), IndicatorColor::Green);
    assert_eq!(app.cycler().led().history.len(), 1);
}

#[test]
fn refresh_cadence_follows_crossing_state() {
    let mut app = booted_app();
    app.tick(0);
    assert_eq!(app.controller().gate().count(GateCommand::RefreshLights), 0);

    app.occupancy_mut().set_active(false);
    app.tick(500);
    assert!(app.scheduler().is_enabled(TaskId::GateRefresh));

    // Refresh fires on its own 20 ms period while engaged.
    app.tick(520);
    app.tick(540);
    app.tick(560);
    assert_eq!(app.controller().gate().count(GateCommand::RefreshLights), 3);

    // Second press releases; a refresh collected in the same iteration
    // lands after the release and is absorbed.
    app.occupancy_mut().set_active(true);
    app.tick(1000);
    app.occupancy_mut().set_active(false);
    app.tick(1500);
    assert!(!app.scheduler().is_enabled(TaskId::GateRefresh));

    let issued = app.controller().gate().count(GateCommand::RefreshLights);
    app.tick(1520);
    app.tick(1540);
    assert_eq!(
        app.controller().gate().count(GateCommand::RefreshLights),
        issued
    );
}

#[test]
fn gate_position_flags_stay_exclusive_across_press_cycles() {
    let mut app = booted_app();
    app.tick(0);

    let mut now_ms = 0;
    for _ in 0..5 {
        app.occupancy_mut().set_active(false);
        now_ms += 500;
        app.tick(now_ms);

        let state = app.controller().state();
        assert!(state.gate_up != state.gate_down);

        app.occupancy_mut().set_active(true);
        now_ms += 500;
        app.tick(now_ms);
    }
}

#[test]
fn snapshot_mirrors_the_state_machine() {
    let mut app = booted_app();
    app.tick(0);

    let idle = app.controller().state();
    assert!(!idle.occupied);
    assert!(idle.gate_up);
    assert!(!idle.gate_down);
    assert_eq!(idle.heartbeat_period_ms, 2000);

    app.occupancy_mut().set_active(false);
    app.tick(500);

    let engaged = app.controller().state();
    assert!(engaged.occupied);
    assert!(!engaged.gate_up);
    assert!(engaged.gate_down);
    assert_eq!(engaged.heartbeat_period_ms, 200);
}
