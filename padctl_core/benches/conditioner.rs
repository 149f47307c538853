use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use padctl_core::mocks::ScriptedScan;
use padctl_core::{ChannelCfg, ChannelConditioner, ConditionerCfg, PadController};
use padctl_traits::{ContinuousSink, ControllerSnapshot, DiscreteEvent, EventSink, SendOutcome};

// Accepts everything without keeping it.
struct Discard;

impl ContinuousSink for Discard {
    fn ready(&self) -> bool {
        true
    }
    fn send(&mut self, snapshot: &ControllerSnapshot) -> SendOutcome {
        black_box(snapshot);
        SendOutcome::Accepted
    }
}

impl EventSink for Discard {
    fn connected(&self) -> bool {
        true
    }
    fn send_event(&mut self, event: DiscreteEvent) -> SendOutcome {
        black_box(event);
        SendOutcome::Accepted
    }
}

// Slow ramp with additive noise, in raw ADC counts.
fn synth_bursts(n: usize, k: usize, noise: u32, seed: u32) -> Vec<Vec<u16>> {
    let mut state = seed.max(1);
    let mut next = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        x
    };
    (0..n)
        .map(|i| {
            let base = (i * 4095 / n.max(1)) as i64;
            (0..k)
                .map(|_| {
                    let jitter = i64::from(next() % (2 * noise + 1)) - i64::from(noise);
                    (base + jitter).clamp(0, 4095) as u16
                })
                .collect()
        })
        .collect()
}

pub fn bench_conditioner(c: &mut Criterion) {
    let bursts = synth_bursts(1024, 32, 12, 7);
    c.bench_function("conditioner_1024_ticks_k32", |b| {
        b.iter_batched(
            || ChannelConditioner::new(ConditionerCfg::default()),
            |mut ch| {
                let mut last = 0;
                for burst in &bursts {
                    last = ch.process(black_box(burst));
                }
                black_box(last)
            },
            BatchSize::SmallInput,
        );
    });
}

pub fn bench_tick(c: &mut Criterion) {
    let scan = ScriptedScan::new();
    for input in 0..4 {
        scan.set_level(input, 1000 + 500 * input as u16);
    }
    let channels: Vec<ChannelCfg> = (0..4u8)
        .map(|i| ChannelCfg::new(usize::from(i), 20 + i))
        .collect();
    let mut ctl = PadController::builder()
        .with_analog_scan(scan.clone())
        .with_digital_scan(scan)
        .with_sinks(Discard, Discard)
        .with_channels(channels)
        .build()
        .expect("build controller");
    c.bench_function("tick_4ch_k32", |b| b.iter(|| black_box(ctl.tick())));
}

criterion_group!(benches, bench_conditioner, bench_tick);
criterion_main!(benches);
