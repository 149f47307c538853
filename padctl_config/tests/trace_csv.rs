use std::fs::File;
use std::io::Write;

use padctl_config::{Trace, TraceRow, load_trace_csv, load_trace_reader};
use rstest::rstest;
use tempfile::tempdir;

#[rstest]
fn groups_rows_into_bursts() {
    let csv = "tick,channel,raw\n0,0,2048\n0,0,2050\n0,1,10\n1,0,4095\n";
    let trace = load_trace_reader(csv.as_bytes()).unwrap();
    assert_eq!(trace.ticks.len(), 2);
    assert_eq!(trace.ticks[0].burst(0), &[2048, 2050]);
    assert_eq!(trace.ticks[0].burst(1), &[10]);
    assert_eq!(trace.ticks[1].tick, 1);
    assert_eq!(trace.ticks[1].burst(0), &[4095]);
    assert!(trace.ticks[1].burst(1).is_empty());
    assert_eq!(trace.max_channel(), Some(1));
}

#[rstest]
fn rejects_wrong_headers() {
    let err = load_trace_reader("tick,ch,raw\n0,0,1\n".as_bytes()).unwrap_err();
    assert!(format!("{err}").contains("tick,channel,raw"));
}

#[rstest]
#[case::negative_raw("tick,channel,raw\n0,0,-1\n")]
#[case::raw_overflow("tick,channel,raw\n0,0,70000\n")]
#[case::not_a_number("tick,channel,raw\n0,x,1\n")]
fn rejects_bad_rows(#[case] csv: &str) {
    let err = load_trace_reader(csv.as_bytes()).unwrap_err();
    assert!(format!("{err}").contains("row 2"), "got `{err}`");
}

#[rstest]
fn rejects_ticks_going_backwards() {
    let rows = [
        TraceRow { tick: 3, channel: 0, raw: 1 },
        TraceRow { tick: 2, channel: 0, raw: 1 },
    ];
    let err = Trace::from_rows(rows).unwrap_err();
    assert!(format!("{err}").contains("backwards"));
}

#[rstest]
fn empty_trace_has_no_ticks() {
    let trace = load_trace_reader("tick,channel,raw\n".as_bytes()).unwrap();
    assert!(trace.ticks.is_empty());
    assert_eq!(trace.max_channel(), None);
}

#[rstest]
fn loads_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("trace.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "tick,channel,raw").unwrap();
    for t in 0..3 {
        writeln!(f, "{t}, 2, 1000").unwrap();
    }
    drop(f);
    let trace = load_trace_csv(&path).unwrap();
    assert_eq!(trace.ticks.len(), 3);
    assert_eq!(trace.ticks[2].burst(2), &[1000]);
}

#[rstest]
fn missing_file_is_reported() {
    let dir = tempdir().unwrap();
    let err = load_trace_csv(&dir.path().join("nope.csv")).unwrap_err();
    assert!(format!("{err}").contains("open trace CSV"));
}
