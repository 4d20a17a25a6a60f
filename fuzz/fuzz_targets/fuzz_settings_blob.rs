//! Fuzz target: settings blob deserialization
//!
//! NVS flash contents are attacker-ish input after a partial write or a
//! firmware downgrade: the postcard decoder and the validation layer must
//! reject garbage without panicking.
//!
//! Invariants checked:
//! - `postcard::from_bytes::<Settings>` never panics
//! - A decoded settings struct survives `validate()` without panicking
//! - A decoded-and-valid struct re-encodes (the save path cannot fail on
//!   data the load path accepted)
//!
//! cargo fuzz run fuzz_settings_blob

#![no_main]

use libfuzzer_sys::fuzz_target;
use ringring::config::Settings;

fuzz_target!(|data: &[u8]| {
    let Ok(settings) = postcard::from_bytes::<Settings>(data) else {
        return;
    };

    match settings.validate() {
        Ok(()) => {
            let bytes =
                postcard::to_allocvec(&settings).expect("valid settings must re-encode");
            let again: Settings =
                postcard::from_bytes(&bytes).expect("re-encoded settings must decode");
            assert_eq!(settings, again, "settings blob must round-trip");
        }
        Err(_) => {}
    }
});
