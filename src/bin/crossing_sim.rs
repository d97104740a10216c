//! Desktop simulator for the grade-crossing controller.
//!
//! Wires the application context to the mock HAL and replays a scripted
//! sequence over virtual time:
//! - boot: hardware parked, factory-default CVs restored one per iteration
//! - a train reaches the approach block (occupancy sensor)
//! - the operator cycles the indicator over DCC (function 3)
//! - the train clears and the dispatcher raises the gate over DCC
//!   (function 1)
//!
//! # Run
//!
//! ```bash
//! cargo run --features sim --bin crossing_sim
//!
//! # More detail
//! RUST_LOG=trace cargo run --features sim --bin crossing_sim
//! ```

use rs_crossing::dcc::{DccAddressType, FunctionGroup, FunctionGroupEvent, FN_BIT_F1, FN_BIT_F3};
use rs_crossing::hal::{MockCvStore, MockGate, MockIndicator, MockSensor, MockStatusLed};
use rs_crossing::{CrossingApp, CrossingConfig};

/// Virtual loop interval in milliseconds.
const LOOP_INTERVAL_MS: u64 = 20;

/// End of the scripted timeline.
const SCRIPT_END_MS: u64 = 6000;

fn fn_event(state: u8) -> FunctionGroupEvent {
    FunctionGroupEvent::new(24, DccAddressType::Short, FunctionGroup::Fn0To4, state)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    println!();
    println!("================================");
    println!("  rs-crossing simulator");
    println!("================================");
    println!();

    // =========================================================================
    // Wire the application context to the mock HAL
    // =========================================================================
    let mut app = CrossingApp::new(
        CrossingConfig::default(),
        MockGate::new(),
        MockIndicator::new(),
        MockStatusLed::new(),
        MockSensor::new(),
        MockSensor::new(),
        MockCvStore::new(),
    );

    app.boot()?;
    println!("[OK] hardware parked, {} CVs queued", app.reset_queue().pending());
    println!();
    println!("Running scripted timeline ({} ms virtual)...", SCRIPT_END_MS);
    println!();

    // =========================================================================
    // Scripted run loop over virtual time
    // =========================================================================
    let mut now_ms: u64 = 0;
    while now_ms <= SCRIPT_END_MS {
        match now_ms {
            1000 => {
                println!("[>>] t={:>5} ms: train enters the approach block", now_ms);
                app.occupancy_mut().set_active(false);
            }
            2500 => {
                println!("[>>] t={:>5} ms: DCC F3 edge (cycle indicator)", now_ms);
                app.on_function_event(&fn_event(FN_BIT_F3));
            }
            4000 => {
                println!("[>>] t={:>5} ms: train clears the block", now_ms);
                app.occupancy_mut().set_active(true);
            }
            4500 => {
                println!("[>>] t={:>5} ms: DCC F1 edge (dispatcher gate command)", now_ms);
                app.on_function_event(&fn_event(FN_BIT_F1));
            }
            _ => {}
        }

        app.tick(now_ms);

        // Narrate the state right after each scripted event settles.
        if matches!(now_ms, 1000 | 2500 | 4500) {
            let state = app.controller().state();
            println!(
                "     occupied={} gate_up={} gate_down={} heartbeat={} ms indicator={}",
                state.occupied,
                state.gate_up,
                state.gate_down,
                state.heartbeat_period_ms,
                app.cycler().color().as_str(),
            );
        }

        now_ms += LOOP_INTERVAL_MS;
    }

    // =========================================================================
    // Summary
    // =========================================================================
    let state = app.controller().state();
    println!();
    println!("Timeline complete.");
    println!(
        "  crossing:   occupied={} gate_up={} gate_down={}",
        state.occupied, state.gate_up, state.gate_down
    );
    println!("  heartbeat:  {} toggles, period {} ms", app.heartbeat().output().toggles, state.heartbeat_period_ms);
    println!("  indicator:  {}", app.cycler().color().as_str());
    println!(
        "  gate cmds:  {} issued, CV writes: {}",
        app.controller().gate().commands.len(),
        app.cv_store().writes.len()
    );

    Ok(())
}
