use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dbfenc::classify::{classify, ClassifierParams};
use dbfenc::sample::{extract_sample, DEFAULT_SAMPLE_CAP};
use dbfenc::{parse_layout, transcode, EncodingName};

fn sjis(text: &str) -> Vec<u8> {
    encoding_rs::SHIFT_JIS.encode(text).0.into_owned()
}

fn build_dbf(rows: usize, value: &[u8]) -> Vec<u8> {
    use byteorder::{ByteOrder, LittleEndian};
    let width = 32u8;
    let mut buf = vec![0u8; 32];
    buf[0] = 0x03;
    LittleEndian::write_u32(&mut buf[4..8], rows as u32);
    LittleEndian::write_u16(&mut buf[8..10], 32 + 32 + 1);
    LittleEndian::write_u16(&mut buf[10..12], 1 + width as u16);
    let mut slot = [0u8; 32];
    slot[..4].copy_from_slice(b"NAME");
    slot[11] = b'C';
    slot[16] = width;
    buf.extend_from_slice(&slot);
    buf.push(0x0D);
    for _ in 0..rows {
        buf.push(0x20);
        let take = value.len().min(width as usize);
        buf.extend_from_slice(&value[..take]);
        buf.extend(std::iter::repeat(0x20).take(width as usize - take));
    }
    buf
}

fn bench_classify(c: &mut Criterion) {
    let params = ClassifierParams::default();
    let ascii = vec![b'a'; 4096];
    let japanese = sjis(&"東京都千代田区".repeat(100));

    c.bench_function("classify_ascii_4k", |b| {
        b.iter(|| classify(black_box(&ascii), &params))
    });
    c.bench_function("classify_sjis_4k", |b| {
        b.iter(|| classify(black_box(&japanese), &params))
    });
}

fn bench_pipeline_stages(c: &mut Criterion) {
    let value = sjis("北海道札幌市中央区");
    let dbf = build_dbf(10_000, &value);
    let layout = parse_layout(&dbf).unwrap();

    c.bench_function("sample_10k_records", |b| {
        b.iter(|| extract_sample(black_box(&dbf), &layout, DEFAULT_SAMPLE_CAP))
    });
    c.bench_function("transcode_10k_records", |b| {
        b.iter(|| {
            transcode(
                black_box(&dbf),
                &layout,
                EncodingName::ShiftJis,
                EncodingName::Utf8,
            )
        })
    });
}

criterion_group!(benches, bench_classify, bench_pipeline_stages);
criterion_main!(benches);
