use edhash_stream::{hash_bytes, hash_reader, Sha512Context};

fn make_data(size: usize) -> Vec<u8> {
    // Semi-realistic data: repeating pattern with some entropy
    (0..size)
        .map(|i| (i.wrapping_mul(7) ^ (i >> 3)) as u8)
        .collect()
}

const SIZE: usize = 1048576;

#[divan::bench(args = [1024, 65536, 1048576, 10485760])]
fn one_shot(bencher: divan::Bencher, size: usize) {
    let data = make_data(size);
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| hash_bytes(divan::black_box(&data)));
}

/// Streaming 1MB in chunks that never line up with the 128-byte block.
#[divan::bench(args = [1, 7, 100, 128, 1000, 65536])]
fn chunked_update(bencher: divan::Bencher, chunk: usize) {
    let data = make_data(SIZE);
    bencher
        .counter(divan::counter::BytesCount::new(SIZE))
        .bench(|| {
            let mut ctx = Sha512Context::new();
            for piece in divan::black_box(&data).chunks(chunk) {
                ctx.update(piece);
            }
            ctx.finalize()
        });
}

#[divan::bench(args = [4096, 65536])]
fn reader(bencher: divan::Bencher, read_buffer_size: usize) {
    let data = make_data(SIZE);
    bencher
        .counter(divan::counter::BytesCount::new(SIZE))
        .bench(|| hash_reader(divan::black_box(data.as_slice()), read_buffer_size).unwrap());
}

fn main() {
    divan::main();
}
