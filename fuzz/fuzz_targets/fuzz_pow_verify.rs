#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Layout: nbit (2 bytes) | candidate (32 bytes) | seed (rest).
    // Short inputs still exercise the length checks.
    if data.len() < 2 {
        let _ = mqpow_work::verify_pow(b"", data, &[]);
        return;
    }
    let (nbit, rest) = data.split_at(2);
    let split = rest.len().min(32);
    let (x, seed) = rest.split_at(split);

    // Must never panic regardless of input
    let _ = mqpow_work::verify_pow(seed, nbit, x);
});
