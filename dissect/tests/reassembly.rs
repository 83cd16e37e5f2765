use dissect::{Dissector, DissectorConfig, Fragment, FragmentBuffer, ReassemblyLimits};
use proptest::prelude::*;
use wire::{decode_packet, CommandKind, Limits, COMMAND_HEADER_SIZE};

const LOGIN: &[u8] = include_bytes!("fixtures/login_datagram.bin");

/// Builds a datagram carrying one `SendReliableFragment` command.
fn fragment_datagram(
    sequence: u32,
    number: usize,
    count: usize,
    offset: usize,
    total: usize,
    data: &[u8],
) -> Vec<u8> {
    let mut payload = Vec::new();
    for field in [
        sequence,
        u32::try_from(count).unwrap(),
        u32::try_from(number).unwrap(),
        u32::try_from(total).unwrap(),
        u32::try_from(offset).unwrap(),
    ] {
        payload.extend_from_slice(&field.to_be_bytes());
    }
    payload.extend_from_slice(data);

    let length = u32::try_from(COMMAND_HEADER_SIZE + payload.len()).unwrap();
    let mut out = vec![0x00, 0x00, 0x00, 0x01];
    out.extend_from_slice(&[0x00; 8]);
    out.extend_from_slice(&[CommandKind::SendReliableFragment.raw(), 0x00, 0x01, 0x00]);
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(&u32::try_from(number).unwrap().to_be_bytes());
    out.extend_from_slice(&payload);
    out
}

fn login_response_payload() -> Vec<u8> {
    let packet = decode_packet(LOGIN, &Limits::default()).unwrap();
    packet.commands[3].payload.to_vec()
}

#[test]
fn fragmented_login_response_matches_unfragmented() {
    let payload = login_response_payload();
    let chunks: Vec<&[u8]> = payload.chunks(200).collect();
    let count = chunks.len();

    let mut dissector = Dissector::default();
    let mut completed = Vec::new();
    // Deliver back to front.
    for (number, chunk) in chunks.iter().enumerate().rev() {
        let datagram = fragment_datagram(273, number, count, number * 200, payload.len(), chunk);
        let dissection = dissector.dissect(&datagram).unwrap();
        assert!(dissection.rejected.is_empty());
        completed.extend(dissection.messages);
    }

    assert_eq!(completed.len(), 1);
    let reassembled = &completed[0];
    assert_eq!(reassembled.reassembled_from, Some(273));

    let direct = Dissector::default().dissect(LOGIN).unwrap();
    assert_eq!(reassembled.header, direct.messages[3].header);
    assert_eq!(reassembled.parameters, direct.messages[3].parameters);
}

#[test]
fn unfinished_message_is_bounded_by_capacity() {
    let config = DissectorConfig::for_testing();
    let max_pending = config.reassembly.max_pending;
    let mut dissector = Dissector::new(config);

    for sequence in 0..u32::try_from(max_pending * 3).unwrap() {
        let datagram = fragment_datagram(sequence, 0, 2, 0, 2, b"x");
        dissector.dissect(&datagram).unwrap();
    }
    assert_eq!(dissector.fragments().pending(), max_pending);
    assert_eq!(
        dissector.stats().evicted,
        u64::try_from(max_pending * 2).unwrap()
    );
}

#[test]
fn out_of_range_fragment_is_counted() {
    let mut dissector = Dissector::default();
    let datagram = fragment_datagram(1, 3, 2, 0, 2, b"x");
    let dissection = dissector.dissect(&datagram).unwrap();
    assert!(dissection.messages.is_empty());
    assert!(dissection.rejected.is_empty());
    assert_eq!(dissector.stats().rejected, 1);
    assert!(dissector.fragments().is_empty());
}

proptest! {
    #[test]
    fn prop_arrival_order_does_not_matter(
        parts in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..32), 1..12),
        order_seed in any::<u64>(),
    ) {
        let count = u32::try_from(parts.len()).unwrap();
        let expected: Vec<u8> = parts.concat();

        // Deterministic shuffle driven by the seed.
        let mut order: Vec<usize> = (0..parts.len()).collect();
        let mut state = order_seed;
        for i in (1..order.len()).rev() {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            let j = usize::try_from(state >> 33).unwrap() % (i + 1);
            order.swap(i, j);
        }

        let mut buffer = FragmentBuffer::new(ReassemblyLimits::unlimited());
        let mut result = None;
        for (position, &index) in order.iter().enumerate() {
            let fragment = Fragment {
                sequence_number: 42,
                fragment_number: u32::try_from(index).unwrap(),
                fragment_count: count,
                data: parts[index].clone(),
            };
            let outcome = buffer.offer(fragment);
            if position + 1 < order.len() {
                prop_assert!(outcome.is_none());
            } else {
                result = outcome;
            }
        }

        let message = result.unwrap();
        prop_assert_eq!(message.sequence_number, 42);
        prop_assert_eq!(message.data, expected);
        prop_assert!(buffer.is_empty());
    }

    #[test]
    fn prop_pending_never_exceeds_capacity(
        fragments in prop::collection::vec((0u32..16, 0u32..4, 1u32..4), 0..64),
    ) {
        let limits = ReassemblyLimits::for_testing();
        let max_pending = limits.max_pending;
        let mut buffer = FragmentBuffer::new(limits);
        for (sequence_number, fragment_number, fragment_count) in fragments {
            let _ = buffer.offer(Fragment {
                sequence_number,
                fragment_number,
                fragment_count,
                data: vec![0xAB],
            });
            prop_assert!(buffer.pending() <= max_pending);
        }
    }
}
