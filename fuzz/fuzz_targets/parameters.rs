#![no_main]

use libfuzzer_sys::fuzz_target;
use params::{decode_parameters, decode_parameters_checked, ParamLimits};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    // First two bytes drive the declared count.
    let count = u16::from_be_bytes([data[0], data[1]]);
    let buf = &data[2..];

    // Decoding itself is iterative at any depth.
    let params = decode_parameters(count, buf, &ParamLimits::unlimited());
    assert!(params.len() <= usize::from(count));

    // `Debug` recurses, so compare under a depth cap.
    let limits = ParamLimits::for_testing();
    let params = decode_parameters(count, buf, &limits);
    if let Ok(checked) = decode_parameters_checked(count, buf, &limits) {
        assert_eq!(format!("{checked:?}"), format!("{params:?}"));
    }
});
