#![no_main]

use dissect::{Fragment, FragmentBuffer, ReassemblyLimits};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let limits = ReassemblyLimits::for_testing();
    let max_pending = limits.max_pending;
    let max_message_bytes = limits.max_message_bytes;
    let mut buffer = FragmentBuffer::new(limits);

    // Each 4-byte chunk is one fragment: sequence, number, count, data length.
    for chunk in data.chunks_exact(4) {
        let fragment = Fragment {
            sequence_number: u32::from(chunk[0] % 8),
            fragment_number: u32::from(chunk[1] % 8),
            fragment_count: u32::from(chunk[2] % 8),
            data: vec![chunk[0]; usize::from(chunk[3])],
        };
        if let Some(message) = buffer.offer(fragment) {
            assert!(message.data.len() <= max_message_bytes);
        }
        assert!(buffer.pending() <= max_pending);
    }
});
