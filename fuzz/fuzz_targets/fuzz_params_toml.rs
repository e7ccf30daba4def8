#![no_main]

use libfuzzer_sys::fuzz_target;

use stepstake_escrow::ChallengeParams;
use stepstake_types::Amount;

// Parsing and validating arbitrary config text must never panic.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(params) = ChallengeParams::from_toml_str(text) {
        let _ = params.validate(params.deposit);
        let _ = params.validate(Amount::ZERO);
    }
});
