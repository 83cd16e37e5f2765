#![no_main]

use dissect::{Dissector, DissectorConfig};
use libfuzzer_sys::fuzz_target;
use wire::{decode_packet, Limits};

fuzz_target!(|data: &[u8]| {
    if let Ok(packet) = decode_packet(data, &Limits::default()) {
        assert_eq!(packet.commands.len(), usize::from(packet.header.command_count));
        for command in &packet.commands {
            let _ = command.reliable_message();
            let _ = command.reliable_fragment();
        }
    }

    // The whole pipeline, including reassembly of any fragments, must not panic.
    let mut dissector = Dissector::new(DissectorConfig::for_testing());
    let _ = dissector.dissect(data);
    let _ = dissector.dissect(data);
});
