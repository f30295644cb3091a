#![no_main]

use libfuzzer_sys::fuzz_target;
use mqpow_protocol::SolverOutput;

fuzz_target!(|data: &[u8]| {
    let _ = SolverOutput::read_from(data);

    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(output) = SolverOutput::parse(text) {
            // Whatever parsed must re-serialize and parse back unchanged.
            let json = output.to_json().expect("parsed output serializes");
            assert_eq!(SolverOutput::parse(&json).expect("re-parse"), output);

            if let Some(x) = &output.x {
                if let Ok(Some(bits)) = output.bits(x.len()) {
                    assert_eq!(bits.len(), x.len());
                }
            }
        }
    }
});
