#![no_main]
use libfuzzer_sys::fuzz_target;
use padctl_core::ChannelCfg;

fuzz_target!(|data: &[u8]| {
    let Ok(trace) = padctl_config::load_trace_reader(data) else {
        return;
    };
    let chans: Vec<ChannelCfg> = (0..4).map(|i| ChannelCfg::new(i, 20 + i as u8)).collect();
    if let Ok(events) = padctl_core::replay::replay(&trace, &chans) {
        for e in events {
            assert!((0..=127).contains(&e.event.value));
        }
    }
});
