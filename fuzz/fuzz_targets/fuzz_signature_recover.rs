#![no_main]

use libfuzzer_sys::fuzz_target;

use stepstake_crypto::recover_signer;
use stepstake_types::RecoverableSignature;

// Signature recovery must reject malformed signatures and never panic,
// whatever the message and the 65 signature bytes are.
fuzz_target!(|data: &[u8]| {
    if data.len() < 65 {
        return;
    }
    let mut sig = [0u8; 65];
    sig.copy_from_slice(&data[..65]);
    let message = String::from_utf8_lossy(&data[65..]);

    let _ = recover_signer(&message, &RecoverableSignature(sig));
});
