use criterion::{criterion_group, criterion_main, Criterion};
use serial_framegrab::{
    CancellationToken, DeviceHandle, Dimensions, MockOpener, MockSerialPort, NoProgress,
    StreamDecoder,
};
use std::hint::black_box;
use std::time::Duration;

pub fn bench_decode_frame(c: &mut Criterion) {
    let dims = Dimensions::new(64, 64, 3);
    let frame: Vec<u8> = (0..dims.total_bytes().unwrap_or(0))
        .map(|i| (i % 256) as u8)
        .collect();
    let handle = DeviceHandle::from("MOCK0");

    c.bench_function("decode_64x64_rgb", |b| {
        b.iter(|| {
            let mut port = MockSerialPort::new("MOCK0");
            port.enqueue_read(&frame);
            let opener = MockOpener::new().with_port(port);
            let token = CancellationToken::new();
            let result = StreamDecoder::new(&opener)
                .decode(&handle, 115_200, dims, &token, &mut NoProgress)
                .unwrap();
            black_box(result);
        })
    });
}

pub fn bench_dump_serialize(c: &mut Criterion) {
    let rows = vec![vec![vec![128u8; 3]; 256]; 256];
    let grid = serial_framegrab::PixelGrid::from_nested(&rows).unwrap();

    c.bench_function("serialize_256x256_dump", |b| {
        b.iter(|| {
            let text = serde_json::to_string(&grid).unwrap();
            black_box(text);
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_millis(300))
        .measurement_time(Duration::from_secs(2));
    targets = bench_decode_frame, bench_dump_serialize
}
criterion_main!(benches);
