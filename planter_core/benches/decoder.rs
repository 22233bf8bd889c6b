use criterion::{Criterion, black_box, criterion_group, criterion_main};
use planter_core::QuadratureDecoder;

// One clockwise detent is four phase samples.
const CW_DETENT: [(bool, bool); 4] = [(false, true), (true, true), (true, false), (false, false)];

// Synthetic pin trace: clean detents with occasional jitter (a phase repeated
// or stepped back), deterministic via a tiny xorshift PRNG.
fn jittery_trace(detents: usize, seed: u32) -> Vec<(bool, bool)> {
    let mut state = seed.max(1);
    let mut next = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        x
    };
    let mut v = Vec::with_capacity(detents * 5);
    for _ in 0..detents {
        for (i, sample) in CW_DETENT.iter().enumerate() {
            v.push(*sample);
            if next() % 7 == 0 {
                // contact bounce repeats the current phase
                v.push(*sample);
            }
            if i == 1 && next() % 11 == 0 {
                // brief reversal mid-detent
                v.push(CW_DETENT[0]);
                v.push(*sample);
            }
        }
    }
    v
}

fn bench_decoder(c: &mut Criterion) {
    let clean: Vec<(bool, bool)> = CW_DETENT
        .iter()
        .cycle()
        .take(4 * 1000)
        .copied()
        .collect();
    c.bench_function("decode_1k_clean_detents", |b| {
        b.iter(|| {
            let mut dec = QuadratureDecoder::new();
            let mut events = 0usize;
            for &(a, bp) in black_box(&clean) {
                if dec.sample(a, bp).is_some() {
                    events += 1;
                }
            }
            black_box(events)
        })
    });

    let noisy = jittery_trace(1000, 0xC0FFEE);
    c.bench_function("decode_1k_noisy_detents", |b| {
        b.iter(|| {
            let mut dec = QuadratureDecoder::new();
            let mut events = 0usize;
            for &(a, bp) in black_box(&noisy) {
                if dec.sample(a, bp).is_some() {
                    events += 1;
                }
            }
            black_box(events)
        })
    });
}

criterion_group!(benches, bench_decoder);
criterion_main!(benches);
