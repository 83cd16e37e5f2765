use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dissect::Dissector;
use params::{decode_parameters, ParamLimits};
use wire::{decode_packet, Limits};

const LOGIN: &[u8] = include_bytes!("../tests/fixtures/login_datagram.bin");

fn bench_decode(c: &mut Criterion) {
    c.bench_function("decode_packet/login", |b| {
        b.iter(|| decode_packet(black_box(LOGIN), &Limits::default()));
    });

    let packet = decode_packet(LOGIN, &Limits::default()).expect("fixture decodes");
    let message = packet.commands[3]
        .reliable_message()
        .expect("fixture carries a message");
    c.bench_function("decode_parameters/login_response", |b| {
        b.iter(|| {
            decode_parameters(
                message.parameter_count,
                black_box(message.data),
                &ParamLimits::default(),
            )
        });
    });

    c.bench_function("dissect/login", |b| {
        let mut dissector = Dissector::default();
        b.iter(|| dissector.dissect(black_box(LOGIN)).map(|d| d.messages.len()));
    });
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
