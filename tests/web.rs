//! Browser checks for the wasm entry points
//! Run with: wasm-pack test --headless --firefox

#![cfg(target_arch = "wasm32")]

use rehab_motion_web::*;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_start_is_idempotent() {
    // The start function already ran on load; the subscriber is installed
    init_panic_hook();
    init_panic_hook();
}

#[wasm_bindgen_test]
fn test_traced_session_runs_in_browser() {
    init_panic_hook();
    let mut engine = AvatarEngine::new();
    engine.set_exercise_mode("squat").unwrap();
    for _ in 0..30 {
        engine.tick(1.0 / 60.0, 1.0);
    }
    assert_eq!(engine.phase_name(), "eccentric");
    assert!(engine.take_phase_change().is_some());
    engine.reset();
}

#[wasm_bindgen_test]
fn test_version() {
    assert_eq!(engine_version(), env!("CARGO_PKG_VERSION"));
}
