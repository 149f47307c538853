//! End-to-end behavior of the tick pipeline on the reference panel settings
//! (12-bit ADC, 0..=127 output, margin 16).

use padctl_core::mocks::{RecordingSink, ScriptedScan};
use padctl_core::{ChannelCfg, ConditionerCfg, Controller, LineCfg, build_controller};
use padctl_traits::SendOutcome;
use rstest::rstest;

type Rig = Controller<ScriptedScan, ScriptedScan, RecordingSink, RecordingSink>;

fn rig(cond: ConditionerCfg, lines: Vec<LineCfg>) -> (Rig, ScriptedScan, RecordingSink) {
    let scan = ScriptedScan::new();
    let sink = RecordingSink::new();
    let ctl = build_controller(
        scan.clone(),
        scan.clone(),
        sink.clone(),
        sink.clone(),
        &[ChannelCfg::new(0, 20).with_conditioner(cond)],
        lines,
    )
    .expect("valid rig");
    (ctl, scan, sink)
}

#[test]
fn midscale_settles_at_64() {
    let (mut ctl, scan, sink) = rig(ConditionerCfg::default(), vec![]);
    scan.set_level(0, 2048);
    for _ in 0..100 {
        ctl.tick();
    }
    let snap = ctl.last_snapshot().expect("snapshot");
    assert_eq!(snap.analog(), &[64]);
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].value, 64);
}

#[test]
fn full_scale_emits_exactly_one_event() {
    let cond = ConditionerCfg {
        alpha: 0.1,
        threshold: 1.0,
        ..ConditionerCfg::default()
    };
    let (mut ctl, scan, sink) = rig(cond, vec![]);
    scan.set_level(0, 4095);
    let mut emitted = 0;
    for _ in 0..50 {
        emitted += ctl.tick().emitted.len();
    }
    assert_eq!(emitted, 1);
    assert_eq!(ctl.last_snapshot().map(|s| s.analog()[0]), Some(127));
    assert_eq!(sink.events()[0].param_id, 20);
    assert_eq!(sink.events()[0].value, 127);
}

#[test]
fn press_then_release_on_consecutive_ticks() {
    let (mut ctl, scan, sink) = rig(ConditionerCfg::default(), vec![LineCfg::new(0, true)]);
    scan.set_line(0, false);
    ctl.tick();
    scan.set_line(0, true);
    ctl.tick();
    let snaps = sink.snapshots();
    assert_eq!(snaps.len(), 2);
    assert!(snaps[0].digital().is_engaged(0));
    assert!(!snaps[1].digital().is_engaged(0));
}

#[test]
fn delayed_sink_gets_latest_value_once() {
    let cond = ConditionerCfg {
        alpha: 1.0,
        threshold: 0.0,
        oversample: 1,
        ..ConditionerCfg::default()
    };
    let (mut ctl, scan, sink) = rig(cond, vec![]);
    sink.set_event_connected(false);

    for (tick, raw) in [(1u64, 1024u16), (2, 2048), (3, 3072)] {
        scan.set_level(0, raw);
        let r = ctl.tick();
        assert_eq!(r.tick, tick);
        assert!(r.emitted.is_empty());
        assert_eq!(r.deferred, 1);
    }
    assert_eq!(sink.event_attempts(), 0);

    sink.set_event_connected(true);
    scan.set_level(0, 4095);
    let r = ctl.tick();
    assert_eq!(r.tick, 4);
    assert_eq!(r.emitted.len(), 1);
    assert_eq!(r.emitted[0].value, 127);
    assert_eq!(sink.events().len(), 1);

    // nothing left to retry
    assert!(ctl.tick().is_quiet());
}

#[test]
fn skipped_event_is_retried_with_current_value() {
    let cond = ConditionerCfg {
        alpha: 1.0,
        threshold: 0.0,
        oversample: 1,
        ..ConditionerCfg::default()
    };
    let (mut ctl, scan, sink) = rig(cond, vec![]);
    sink.set_accept_events(false);
    scan.set_level(0, 2048);
    let r = ctl.tick();
    assert_eq!(r.deferred, 1);
    assert_eq!(sink.event_attempts(), 1);
    assert_eq!(ctl.engine().baseline().last_dispatched(0), None);

    sink.set_accept_events(true);
    let r = ctl.tick();
    assert_eq!(r.emitted.len(), 1);
    assert_eq!(ctl.engine().baseline().last_dispatched(0), Some(64));
}

#[test]
fn continuous_sink_gets_every_tick_while_ready() {
    let (mut ctl, scan, sink) = rig(ConditionerCfg::default(), vec![]);
    scan.set_level(0, 100);
    ctl.tick();
    sink.set_continuous_ready(false);
    assert_eq!(ctl.tick().continuous, SendOutcome::Skipped);
    sink.set_continuous_ready(true);
    assert_eq!(ctl.tick().continuous, SendOutcome::Accepted);
    assert_eq!(sink.snapshots().len(), 2);
}

#[rstest]
#[case::floor(0, 0)]
#[case::inside_low_margin(200, 0)]
#[case::quarter(1024, 24)]
#[case::three_quarters(3072, 103)]
#[case::inside_high_margin(3900, 127)]
#[case::ceiling(4095, 127)]
fn seeded_value_by_level(#[case] raw: u16, #[case] expected: i32) {
    let (mut ctl, scan, _sink) = rig(ConditionerCfg::default(), vec![]);
    scan.set_level(0, raw);
    ctl.tick();
    assert_eq!(ctl.last_snapshot().map(|s| s.analog()[0]), Some(expected));
}
