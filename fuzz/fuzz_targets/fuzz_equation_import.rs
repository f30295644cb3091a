#![no_main]

use libfuzzer_sys::fuzz_target;
use mqpow_protocol::{decode_equations, encode_equations};

fuzz_target!(|data: &[u8]| {
    // First byte picks the variable count, the rest is the line format.
    let Some((&n, text)) = data.split_first() else {
        return;
    };
    let variables_n = (n % 64) as usize + 1;
    let Ok(text) = std::str::from_utf8(text) else {
        return;
    };

    if let Ok(system) = decode_equations(variables_n, text) {
        // Accepted input is canonical: encoding it again decodes to the same system.
        let again = decode_equations(variables_n, &encode_equations(&system))
            .expect("encoded system decodes");
        assert_eq!(again, system);
    }
});
