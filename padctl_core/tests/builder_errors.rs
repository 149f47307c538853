use padctl_core::error::BuildError;
use padctl_core::mocks::{RecordingSink, ScriptedScan};
use padctl_core::{ChannelCfg, ConditionerCfg, LineCfg, PadController};
use rstest::rstest;

#[rstest]
fn missing_scan_yields_typed_build_error() {
    let sink = RecordingSink::new();
    let err = PadController::builder()
        .with_digital_scan(ScriptedScan::new())
        .with_sinks(sink.clone(), sink)
        .try_build()
        .expect_err("should fail with MissingScan");

    match err.downcast_ref::<BuildError>() {
        Some(BuildError::MissingScan) => {}
        other => panic!("expected MissingScan, got: {other:?}"),
    }
}

#[rstest]
fn missing_sinks_yields_typed_build_error() {
    let scan = ScriptedScan::new();
    let err = PadController::builder()
        .with_analog_scan(scan.clone())
        .with_digital_scan(scan)
        .try_build()
        .expect_err("should fail with MissingContinuousSink");
    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::MissingContinuousSink)
    ));
}

#[rstest]
fn defaults_to_four_channels_on_cc_20_to_23() {
    let scan = ScriptedScan::new();
    let sink = RecordingSink::new();
    let mut ctl = PadController::builder()
        .with_analog_scan(scan.clone())
        .with_digital_scan(scan)
        .with_sinks(sink.clone(), sink.clone())
        .build()
        .expect("build");
    ctl.tick();
    let ids: Vec<u8> = sink.events().iter().map(|e| e.param_id).collect();
    assert_eq!(ids, vec![20, 21, 22, 23]);
}

fn with_channels(channels: Vec<ChannelCfg>, lines: Vec<LineCfg>) -> eyre::Report {
    let scan = ScriptedScan::new();
    let sink = RecordingSink::new();
    PadController::builder()
        .with_analog_scan(scan.clone())
        .with_digital_scan(scan)
        .with_sinks(sink.clone(), sink)
        .with_channels(channels)
        .with_lines(lines)
        .build()
        .expect_err("should be rejected")
}

fn cond(f: impl FnOnce(&mut ConditionerCfg)) -> Vec<ChannelCfg> {
    let mut c = ConditionerCfg::default();
    f(&mut c);
    vec![ChannelCfg::new(0, 20).with_conditioner(c)]
}

#[rstest]
#[case::no_channels(vec![], "at least one")]
#[case::alpha_zero(cond(|c| c.alpha = 0.0), "alpha")]
#[case::alpha_nan(cond(|c| c.alpha = f32::NAN), "alpha")]
#[case::inverted_bounds(cond(|c| c.out_min = 200), "out_min")]
#[case::zero_oversample(cond(|c| c.oversample = 0), "oversample")]
#[case::negative_threshold(cond(|c| c.threshold = -1.0), "threshold")]
#[case::infinite_margin(cond(|c| c.margin = f32::INFINITY), "margin")]
#[case::zero_raw_max(cond(|c| c.raw_max = 0), "raw_max")]
#[case::param_id(vec![ChannelCfg::new(0, 128)], "param_id")]
#[case::duplicate_input(vec![ChannelCfg::new(1, 20), ChannelCfg::new(1, 21)], "duplicate analog input")]
fn invalid_channels_are_rejected(#[case] channels: Vec<ChannelCfg>, #[case] needle: &str) {
    let err = with_channels(channels, vec![]);
    match err.downcast_ref::<BuildError>() {
        Some(BuildError::InvalidConfig(msg)) => assert!(msg.contains(needle), "got {msg}"),
        other => panic!("expected InvalidConfig, got: {other:?}"),
    }
}

#[rstest]
fn duplicate_pins_are_rejected() {
    let err = with_channels(
        vec![ChannelCfg::new(0, 20)],
        vec![LineCfg::new(4, true), LineCfg::new(4, false)],
    );
    assert!(format!("{err}").contains("duplicate digital pin"));
}

#[rstest]
fn too_many_lines_are_rejected() {
    let lines = (0..33).map(|p| LineCfg::new(p, true)).collect();
    let err = with_channels(vec![ChannelCfg::new(0, 20)], lines);
    assert!(format!("{err}").contains("too many digital lines"));
}
