use padctl_config::{Backend, ContinuousKind, EventKind, LineRole, load_toml};
use rstest::rstest;

const BASE: &str = r#"
[analog]
raw_max = 4095
out_min = 0
out_max = 127
margin = 16.0
oversample = 32
alpha = 0.1
threshold = 1.0

[[analog.channels]]
input = 0
param_id = 20

[[analog.channels]]
input = 1
param_id = 21
alpha = 0.5

[[digital.lines]]
pin = 2
role = "up"

[[digital.lines]]
pin = 3
active_low = false
role = "start"
"#;

#[test]
fn accepts_base_config() {
    let cfg = load_toml(BASE).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.analog.channels.len(), 2);
    assert_eq!(cfg.analog.channels[1].alpha, Some(0.5));
    assert_eq!(cfg.digital.lines[0].role, Some(LineRole::Up));
    assert!(!cfg.digital.lines[1].active_low);
    assert_eq!(cfg.dispatch.continuous, ContinuousKind::Log);
    assert_eq!(cfg.dispatch.events, EventKind::Log);
    assert_eq!(cfg.hardware.backend, Backend::Simulated);
}

#[rstest]
#[case::zero_period("[tick]\nperiod_ms = 0", "tick.period_ms")]
#[case::slow_period("[tick]\nperiod_ms = 5000", "tick.period_ms")]
#[case::midi_channel_zero("[dispatch]\nmidi_channel = 0", "dispatch.midi_channel")]
#[case::midi_channel_17("[dispatch]\nmidi_channel = 17", "dispatch.midi_channel")]
#[case::gamepad_without_device("[dispatch]\ncontinuous = \"gamepad\"", "gamepad_device")]
#[case::midi_without_device("[dispatch]\nevents = \"midi\"", "midi_device")]
#[case::bad_rotation("[logging]\nrotation = \"weekly\"", "logging.rotation")]
#[case::zero_spi_clock("[hardware]\nspi_clock_hz = 0", "spi_clock_hz")]
#[case::sim_level_above_raw_max("[simulation]\nlevel = 5000", "simulation.level")]
fn rejects_section(#[case] extra: &str, #[case] needle: &str) {
    let doc = format!("{BASE}\n{extra}\n");
    let cfg = load_toml(&doc).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(
        format!("{err}").contains(needle),
        "error `{err}` does not mention `{needle}`"
    );
}

#[rstest]
#[case::raw_max_zero("raw_max = 0", "analog.raw_max")]
#[case::inverted_bounds("out_min = 127\nout_max = 0", "analog.out_min")]
#[case::negative_margin("margin = -1.0", "analog.margin")]
#[case::zero_oversample("oversample = 0", "analog.oversample")]
#[case::alpha_zero("alpha = 0.0", "analog.alpha")]
#[case::alpha_above_one("alpha = 1.5", "analog.alpha")]
#[case::negative_threshold("threshold = -0.5", "analog.threshold")]
fn rejects_analog_defaults(#[case] line: &str, #[case] needle: &str) {
    let doc = format!(
        "[analog]\n{line}\n\n[[analog.channels]]\ninput = 0\nparam_id = 20\n"
    );
    let cfg = load_toml(&doc).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(format!("{err}").contains(needle), "got `{err}`");
}

#[test]
fn alpha_of_one_is_allowed() {
    let doc = "[analog]\nalpha = 1.0\n\n[[analog.channels]]\ninput = 0\nparam_id = 20\n";
    load_toml(doc).unwrap().validate().unwrap();
}

#[rstest]
#[case::param_id("param_id = 200", "param_id")]
#[case::oversample("param_id = 20\noversample = 0", "oversample")]
#[case::alpha("param_id = 20\nalpha = 2.0", "alpha")]
#[case::threshold("param_id = 20\nthreshold = -1.0", "threshold")]
#[case::margin("param_id = 20\nmargin = -3.0", "margin")]
fn rejects_channel_overrides(#[case] body: &str, #[case] needle: &str) {
    let doc = format!("[[analog.channels]]\ninput = 0\n{body}\n");
    let cfg = load_toml(&doc).expect("parse TOML");
    let err = format!("{}", cfg.validate().expect_err("should reject"));
    assert!(err.contains("analog.channels[0]"), "got `{err}`");
    assert!(err.contains(needle), "got `{err}`");
}

#[test]
fn rejects_missing_channels() {
    let cfg = load_toml("[tick]\nperiod_ms = 5\n").unwrap();
    let err = cfg.validate().unwrap_err();
    assert!(format!("{err}").contains("at least one channel"));
}

#[test]
fn rejects_duplicate_inputs_and_pins() {
    let doc = format!("{BASE}\n[[analog.channels]]\ninput = 1\nparam_id = 22\n");
    let err = load_toml(&doc).unwrap().validate().unwrap_err();
    assert!(format!("{err}").contains("duplicate input 1"));

    let doc = format!("{BASE}\n[[digital.lines]]\npin = 2\n");
    let err = load_toml(&doc).unwrap().validate().unwrap_err();
    assert!(format!("{err}").contains("duplicate pin 2"));
}

#[test]
fn rejects_too_many_lines() {
    let mut doc = String::from("[[analog.channels]]\ninput = 0\nparam_id = 20\n");
    for pin in 0..33 {
        doc.push_str(&format!("[[digital.lines]]\npin = {pin}\n"));
    }
    let err = load_toml(&doc).unwrap().validate().unwrap_err();
    assert!(format!("{err}").contains("at most 32"));
}

#[test]
fn unknown_role_is_a_parse_error() {
    let doc = "[[digital.lines]]\npin = 2\nrole = \"turbo\"\n";
    assert!(load_toml(doc).is_err());
}

#[test]
fn devices_satisfy_sink_requirements() {
    let doc = format!(
        "{BASE}\n[dispatch]\ncontinuous = \"gamepad\"\nevents = \"midi\"\n\
         gamepad_device = \"/dev/hidg0\"\nmidi_device = \"/dev/snd/midiC1D0\"\nmidi_channel = 16\n"
    );
    let cfg = load_toml(&doc).unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.dispatch.midi_channel, 16);
}
