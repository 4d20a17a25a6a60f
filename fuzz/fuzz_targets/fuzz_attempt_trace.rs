//! Fuzz target: attempt FSM under arbitrary edge/time traces
//!
//! Drives `AttemptFsm::poll` with fuzz-derived button edges and time
//! deltas, including pathological ones (zero deltas, huge jumps, stray
//! releases, double presses).
//!
//! Invariants checked:
//! - No panics under any trace
//! - The attempt buffer never exceeds the sequence length cap
//! - Two long quiet polls always converge the machine back to Idle
//!
//! cargo fuzz run fuzz_attempt_trace

#![no_main]

use libfuzzer_sys::fuzz_target;
use ringring::config::Settings;
use ringring::drivers::button::ButtonEdge;
use ringring::fsm::{AttemptFsm, AttemptState};
use ringring::sequence::MAX_SEQUENCE_LEN;

fuzz_target!(|data: &[u8]| {
    let settings = Settings::default();
    let mut fsm = AttemptFsm::new();
    let mut now_ms = 0u64;

    for chunk in data.chunks(2) {
        let edge = match chunk[0] % 3 {
            0 => Some(ButtonEdge::Pressed),
            1 => Some(ButtonEdge::Released),
            _ => None,
        };
        let delta = u64::from(*chunk.get(1).unwrap_or(&0)) * 25;
        now_ms = now_ms.saturating_add(delta);

        let _ = fsm.poll(edge, now_ms, &settings);
        assert!(
            fsm.buffer().len() <= MAX_SEQUENCE_LEN,
            "attempt buffer must stay within the sequence cap"
        );
    }

    // A pending verdict resolves on the first quiet poll; the second one
    // times out or settles whatever remains.
    now_ms = now_ms.saturating_add(5000);
    let _ = fsm.poll(None, now_ms, &settings);
    now_ms = now_ms.saturating_add(5000);
    let _ = fsm.poll(None, now_ms, &settings);
    assert_eq!(
        fsm.state(),
        AttemptState::Idle,
        "silence must always return the machine to Idle"
    );
    assert!(fsm.buffer().is_empty());
});
