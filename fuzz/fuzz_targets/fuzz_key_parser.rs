//! Fuzz target: `SecretSequence::parse` (endpoint key input)
//!
//! Feeds arbitrary UTF-8 at the secret-code parser — the same path that
//! `/door/key/set` exposes to the network.
//!
//! Invariants checked:
//! - No panics under any input
//! - An accepted secret is never empty and never exceeds the length cap
//! - The canonical letters form reparses to an identical secret
//!
//! cargo fuzz run fuzz_key_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use ringring::sequence::{SecretSequence, MAX_SEQUENCE_LEN};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = core::str::from_utf8(data) else {
        return;
    };

    match SecretSequence::parse(input) {
        Ok(secret) => {
            assert!(!secret.is_empty(), "accepted secret must not be empty");
            assert!(
                secret.len() <= MAX_SEQUENCE_LEN,
                "accepted secret must respect the length cap"
            );
            let letters = secret.as_letters();
            let reparsed =
                SecretSequence::parse(&letters).expect("canonical form must reparse");
            assert_eq!(secret, reparsed, "parse(as_letters()) must round-trip");
        }
        Err(_) => {}
    }
});
