#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not.
    if let Ok(cfg) = padctl_config::load_toml(data) {
        if cfg.validate().is_ok() {
            let chans = padctl_core::conversions::channels_from_config(&cfg.analog);
            let lines = padctl_core::conversions::lines_from_config(&cfg.digital);
            assert_eq!(chans.len(), cfg.analog.channels.len());
            assert_eq!(lines.len(), cfg.digital.lines.len());
        }
    }
});
