//! Hardware assembly: scan sources and sinks from the config.

use std::fs::OpenOptions;

use padctl_config::{Backend, Config, ContinuousKind, EventKind};
use padctl_core::error::PadError;
use padctl_core::{DispatchCfg, LineCfg};
use padctl_hardware::{GamepadSink, LogSink, MidiCcSink, SimulatedPanel};
use padctl_traits::{AnalogScan, ContinuousSink, DigitalScan, EventSink};

pub type Scans = (Box<dyn AnalogScan>, Box<dyn DigitalScan>);
pub type Sinks = (Box<dyn ContinuousSink>, Box<dyn EventSink>);

/// Simulated panel resting at `simulation.level` with every line released.
pub fn simulated_panel(cfg: &Config, lines: &[LineCfg], noise: Option<u16>) -> SimulatedPanel {
    let panel = SimulatedPanel::new();
    for ch in &cfg.analog.channels {
        panel.set_analog(ch.input, cfg.simulation.level);
    }
    for line in lines {
        // released: high for active-low wiring, low otherwise
        panel.set_line(line.pin, line.active_low);
    }
    let amplitude = noise.unwrap_or(cfg.simulation.noise);
    if amplitude > 0 {
        panel.set_noise(amplitude, cfg.simulation.seed);
    }
    panel
}

pub fn make_scans(cfg: &Config, lines: &[LineCfg], noise: Option<u16>) -> eyre::Result<Scans> {
    match cfg.hardware.backend {
        Backend::Simulated => {
            let panel = simulated_panel(cfg, lines, noise);
            tracing::info!(level = cfg.simulation.level, "using simulated panel");
            Ok((Box::new(panel.clone()), Box::new(panel)))
        }
        Backend::Rpi => rpi_scans(cfg, lines),
    }
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
fn rpi_scans(cfg: &Config, lines: &[LineCfg]) -> eyre::Result<Scans> {
    use padctl_hardware::gpio::GpioLines;
    use padctl_hardware::mcp3208::Mcp3208;

    let hw = &cfg.hardware;
    let adc = Mcp3208::new(
        hw.spi_bus,
        hw.adc_chip_select,
        hw.spi_clock_hz,
        std::time::Duration::from_micros(hw.settle_us),
    )
    .map_err(|e| eyre::Report::new(PadError::Hardware(format!("open MCP3208 ADC: {e}"))))?;

    let mut pins = Vec::with_capacity(lines.len());
    for line in lines {
        let pin = u8::try_from(line.pin)
            .map_err(|_| eyre::Report::new(PadError::Config(format!("pin {} out of range", line.pin))))?;
        pins.push((pin, line.active_low));
    }
    let gpio = GpioLines::new(&pins)
        .map_err(|e| eyre::Report::new(PadError::Hardware(format!("open GPIO lines: {e}"))))?;
    tracing::info!(
        spi_bus = hw.spi_bus,
        chip_select = hw.adc_chip_select,
        lines = pins.len(),
        "using Raspberry Pi backend"
    );
    Ok((Box::new(adc), Box::new(gpio)))
}

#[cfg(not(all(feature = "hardware", target_os = "linux")))]
fn rpi_scans(_cfg: &Config, _lines: &[LineCfg]) -> eyre::Result<Scans> {
    Err(eyre::Report::new(PadError::Hardware(
        "backend \"rpi\" requires a Linux build with --features hardware".to_string(),
    )))
}

/// Open a device node for writing. On unix the handle is non-blocking so a
/// host that stops reading makes sends skip instead of stalling the tick.
fn open_device(path: &str, what: &str) -> eyre::Result<std::fs::File> {
    let mut opts = OpenOptions::new();
    opts.write(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.custom_flags(libc::O_NONBLOCK);
    }
    opts.open(path)
        .map_err(|e| eyre::Report::new(PadError::Io(format!("open {what} device {path}: {e}"))))
}

/// Sinks from `[dispatch]`, or log sinks for both roles when `dry_run`.
pub fn make_sinks(cfg: &Config, lines: &[LineCfg], dry_run: bool) -> eyre::Result<Sinks> {
    if dry_run {
        return Ok((Box::new(LogSink), Box::new(LogSink)));
    }
    let dispatch = DispatchCfg::from(&cfg.dispatch);

    let continuous: Box<dyn ContinuousSink> = match cfg.dispatch.continuous {
        ContinuousKind::Log => Box::new(LogSink),
        ContinuousKind::Gamepad => {
            let path = cfg.dispatch.gamepad_device.as_deref().ok_or_else(|| {
                eyre::Report::new(PadError::Config("dispatch.gamepad_device is not set".into()))
            })?;
            let roles = lines.iter().map(|l| l.role).collect();
            Box::new(GamepadSink::new(open_device(path, "gamepad")?, roles))
        }
    };

    let events: Box<dyn EventSink> = match cfg.dispatch.events {
        EventKind::Log => Box::new(LogSink),
        EventKind::Midi => {
            let path = cfg.dispatch.midi_device.as_deref().ok_or_else(|| {
                eyre::Report::new(PadError::Config("dispatch.midi_device is not set".into()))
            })?;
            Box::new(MidiCcSink::new(open_device(path, "midi")?, dispatch.midi_channel))
        }
    };

    Ok((continuous, events))
}
