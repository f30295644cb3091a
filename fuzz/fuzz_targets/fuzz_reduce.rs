#![no_main]

use libfuzzer_sys::fuzz_target;
use mqpow_types::BitVec;
use mqpow_work::{reduce, EquationSystem, FixAssignment};

fuzz_target!(|data: &[u8]| {
    // Layout: n | k | fix bits (u16) | free bits (u16) | seed (rest).
    if data.len() < 6 {
        return;
    }
    let variables_n = (data[0] % 16) as usize + 1;
    let fix_length = data[1] as usize % variables_n;
    let free_n = variables_n - fix_length;
    let fix_value = u16::from_le_bytes([data[2], data[3]]) as u64 & ((1u64 << fix_length) - 1);
    let free_value = u16::from_le_bytes([data[4], data[5]]) as u64;
    let seed = &data[6..];

    let system = EquationSystem::new(seed, 4, variables_n);
    let fix = FixAssignment::from_index(fix_value, fix_length).expect("masked to fix_length bits");
    let fixed = reduce(&system, &fix).expect("fix shorter than n");

    // The reduced system must agree with the original at the reconstructed point.
    let free = BitVec::from_uint(free_value, free_n);
    let x = fixed.reconstruct(&free).expect("widths match");
    let significant = system.layout().variables_byte;
    assert_eq!(
        fixed.reduced().evaluate(free.as_bytes()).expect("reduced evaluates"),
        system.evaluate(&x[..significant]).expect("original evaluates"),
    );
});
