//! Raw-sample traces for offline replay.
//!
//! Expected headers:
//! tick,channel,raw
//!
//! Every row is one raw conversion. Rows sharing `tick` and `channel` form
//! that channel's oversampling burst for the tick. Ticks must not decrease.
//!
//! Example:
//! tick,channel,raw
//! 0,0,2048
//! 0,0,2050
//! 1,0,2047

use std::collections::BTreeMap;
use std::io::Read;

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct TraceRow {
    pub tick: u64,
    pub channel: usize,
    pub raw: u16,
}

/// Bursts for one tick keyed by channel index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TraceTick {
    pub tick: u64,
    pub bursts: BTreeMap<usize, Vec<u16>>,
}

impl TraceTick {
    /// Samples for `channel`; empty when the trace has none this tick.
    pub fn burst(&self, channel: usize) -> &[u16] {
        self.bursts.get(&channel).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trace {
    pub ticks: Vec<TraceTick>,
}

impl Trace {
    pub fn from_rows(rows: impl IntoIterator<Item = TraceRow>) -> eyre::Result<Self> {
        let mut ticks: Vec<TraceTick> = Vec::new();
        for (idx, row) in rows.into_iter().enumerate() {
            match ticks.last_mut() {
                Some(last) if last.tick == row.tick => {
                    last.bursts.entry(row.channel).or_default().push(row.raw);
                }
                Some(last) if last.tick > row.tick => {
                    eyre::bail!(
                        "trace row {}: tick {} goes backwards (previous {})",
                        idx + 2,
                        row.tick,
                        last.tick
                    );
                }
                _ => {
                    let mut t = TraceTick {
                        tick: row.tick,
                        bursts: BTreeMap::new(),
                    };
                    t.bursts.insert(row.channel, vec![row.raw]);
                    ticks.push(t);
                }
            }
        }
        Ok(Self { ticks })
    }

    /// Highest channel index referenced, if any.
    pub fn max_channel(&self) -> Option<usize> {
        self.ticks
            .iter()
            .filter_map(|t| t.bursts.keys().next_back().copied())
            .max()
    }
}

pub fn load_trace_reader<R: Read>(reader: R) -> eyre::Result<Trace> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read trace headers: {}", e))?
        .clone();
    let expected = ["tick", "channel", "raw"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "trace CSV must have headers 'tick,channel,raw', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<TraceRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid trace row {}: {}", idx + 2, e);
            }
        }
    }
    Trace::from_rows(rows)
}

pub fn load_trace_csv(path: &std::path::Path) -> eyre::Result<Trace> {
    let file =
        std::fs::File::open(path).map_err(|e| eyre::eyre!("open trace CSV {:?}: {}", path, e))?;
    load_trace_reader(std::io::BufReader::new(file))
}
