//! Fuzz target for connection URL normalization.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_normalize
//! ```

#![no_main]

use dbconf_url::normalize;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Errors are fine, panics are not.
        if let Ok(config) = normalize(input) {
            assert!(!config.driver.is_empty());
            assert!(!config.driver.ends_with(':'));
        }
    }
});
