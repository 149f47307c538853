//! Human-readable error descriptions and structured JSON error formatting.

use padctl_core::error::{BuildError, PadError};
use padctl_hardware::error::HwError;
use serde_json::json;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingScan => {
                "What happened: No scan source was provided to the controller.\nLikely causes: The ADC or GPIO backend failed to initialize or was not wired into the builder.\nHow to fix: Check [hardware] in the config and the backend logs.".to_string()
            }
            BuildError::MissingContinuousSink | BuildError::MissingEventSink => format!(
                "What happened: {be}.\nLikely causes: The output device could not be opened.\nHow to fix: Check [dispatch] in the config, or rerun with --dry-run."
            ),
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/padctl.toml for a sample."
            ),
        };
    }

    if let Some(pe) = err.downcast_ref::<PadError>() {
        return match pe {
            PadError::Config(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML, or a trace that does not match it.\nHow to fix: Edit the config file, then rerun."
            ),
            PadError::Hardware(msg) => format!(
                "What happened: Hardware could not be initialized ({msg}).\nLikely causes: Wrong SPI bus or chip select, missing permissions, or a build without hardware support.\nHow to fix: Check [hardware] in the config and that the process may access SPI and GPIO."
            ),
            PadError::HardwareFault(msg) => format!(
                "What happened: A hardware read failed ({msg}).\nLikely causes: Loose wiring or an unpowered ADC.\nHow to fix: Run `padctl self-check` and inspect the failing input."
            ),
            PadError::Io(msg) => format!(
                "What happened: {msg}.\nLikely causes: The device path does not exist or is not writable.\nHow to fix: Check dispatch.gamepad_device and dispatch.midi_device, or rerun with --dry-run."
            ),
        };
    }

    if let Some(he) = err.downcast_ref::<HwError>() {
        return format!(
            "What happened: {he}.\nLikely causes: Wiring, permissions, or an input outside the configured range.\nHow to fix: Run `padctl self-check` for per-input results."
        );
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("trace csv must have headers") {
        return "Invalid headers in trace CSV. Expected 'tick,channel,raw'.".to_string();
    }

    if lower.contains("read config") {
        let cause = err
            .source()
            .map(|s| format!(" ({s})"))
            .unwrap_or_default();
        return format!(
            "What happened: The config file could not be read{cause}.\nLikely causes: Wrong --config path.\nHow to fix: Pass --config <FILE>, or copy etc/padctl.toml next to the binary."
        );
    }

    if lower.contains("self-check failed") {
        return format!(
            "What happened: {msg}.\nLikely causes: Wiring or backend settings.\nHow to fix: See the per-input lines above."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 for configuration problems, 4 for hardware, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some() {
        return 3;
    }
    match err.downcast_ref::<PadError>() {
        Some(PadError::Config(_)) => 3,
        Some(PadError::Hardware(_) | PadError::HardwareFault(_)) => 4,
        _ => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if err.downcast_ref::<BuildError>().is_some() {
        return "InvalidConfig";
    }
    match err.downcast_ref::<PadError>() {
        Some(PadError::Config(_)) => "InvalidConfig",
        Some(PadError::Hardware(_)) => "Hardware",
        Some(PadError::HardwareFault(_)) => "HardwareFault",
        Some(PadError::Io(_)) => "Io",
        _ => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    json!({ "reason": reason_name(err), "message": humanize(err) }).to_string()
}
