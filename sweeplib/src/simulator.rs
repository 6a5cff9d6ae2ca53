use std::io::Write;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::cache::CacheConfig;
use crate::config::{Selection, GEOMETRIES};

/// The simulator replays a trace against the selected geometries and collects
/// per-configuration results.
///
/// Every driven configuration observes every address independently: this is
/// seven parallel what-if simulations, not one layered cache, so a hit in one
/// configuration never short-circuits the others.
///
/// It supports calling simulate multiple times, and will update the time taken
/// to simulate and the results accordingly; sequence numbers keep counting up
/// across calls so LRU recency stays well ordered.
pub struct Simulator {
    caches: Vec<CacheConfig>,
    sequence: u64,
    simulation_time: Duration,
}

/// The result of a full sweep. Can be serialised to the JSON output format
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SweepReport {
    pub configs: Vec<ConfigSummary>,
}

/// The result for an individual configuration. Can be serialised to the JSON
/// output format
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ConfigSummary {
    pub id: u8,
    pub size: u32,
    pub associativity: u32,
    pub block_size_words: u32,
    pub accesses: u64,
    pub hits: u64,
    pub hit_rate: f64,
}

impl Simulator {
    /// Creates a new simulator for a selection of the fixed geometry table
    ///
    /// # Arguments
    ///
    /// * `selection`: which configurations to drive, usually parsed from the
    /// command line
    ///
    /// returns: Simulator
    pub fn new(selection: Selection) -> Self {
        let caches = GEOMETRIES
            .iter()
            .filter(|g| match selection {
                Selection::All => true,
                Selection::Single(id) => g.id == id,
            })
            .map(|g| CacheConfig::new(*g))
            .collect();
        Self {
            caches,
            sequence: 0,
            simulation_time: Duration::new(0, 0),
        }
    }

    /// Feeds one trace entry to every driven configuration
    ///
    /// `sequence_number` is the 1-based trace line number and must strictly
    /// increase across calls for the life of the run; it becomes the LRU
    /// timestamp of every driven configuration.
    ///
    /// Returns the lowest configuration id that hit, or 0 if none did. In
    /// single mode this is the selected id on a hit, 0 otherwise.
    pub fn config_step(&mut self, address: u32, sequence_number: u64) -> u8 {
        debug_assert!(
            sequence_number > self.sequence,
            "sequence numbers must strictly increase"
        );
        self.sequence = sequence_number;
        let mut reported = 0u8;
        for cache in &mut self.caches {
            if cache.access(address, sequence_number) && reported == 0 {
                reported = cache.geometry().id;
            }
        }
        reported
    }

    /// Replays a whole trace held in a byte slice, writing one per-access
    /// line to `out`
    ///
    /// Each trace line is a one-character prefix followed by a hexadecimal
    /// address. For every entry one line of the form
    /// `"<hit id> <address as 8-digit lowercase hex>"` is written, where the
    /// hit id is 0 on a miss everywhere. This line format is a stable
    /// contract consumed by downstream tooling.
    ///
    /// A line that fails to parse aborts the run with an error naming the
    /// line number; the trace is assumed complete and well-formed, and
    /// skipping a line would desynchronise the sequence numbers. A single
    /// trailing newline at end of file is accepted.
    ///
    /// Note that reads from the byte slice are *guaranteed to be sequential*,
    /// so memory-mapped input can advise the operating system accordingly.
    ///
    /// # Arguments
    ///
    /// * `bytes`: The input trace bytes
    /// * `out`: Destination for the per-access lines
    ///
    /// returns: Result<(), String>
    pub fn simulate(&mut self, bytes: &[u8], out: &mut impl Write) -> Result<(), String> {
        let start = Instant::now();
        let mut lines = bytes.split(|&b| b == b'\n').peekable();
        let mut line_num = self.sequence;
        while let Some(raw) = lines.next() {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            if raw.is_empty() && lines.peek().is_none() {
                // Trailing newline at end of file
                break;
            }
            line_num += 1;
            let address = parse_trace_line(raw, line_num)?;
            let id = self.config_step(address, line_num);
            writeln!(out, "{id} {address:08x}")
                .map_err(|e| format!("couldn't write the per-access output: {e}"))?;
        }
        self.simulation_time += start.elapsed();
        Ok(())
    }

    /// Produces the per-configuration summaries in id order
    ///
    /// Pure read; calling it repeatedly without intervening accesses yields
    /// identical results.
    pub fn report(&self) -> SweepReport {
        SweepReport {
            configs: self
                .caches
                .iter()
                .map(|cache| {
                    let g = cache.geometry();
                    ConfigSummary {
                        id: g.id,
                        size: g.total_size_bytes,
                        associativity: g.associativity,
                        block_size_words: g.block_size_words,
                        accesses: cache.accesses(),
                        hits: cache.hits(),
                        hit_rate: cache.hit_rate(),
                    }
                })
                .collect(),
        }
    }

    /// Gets the wall-clock execution time for processing
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }

    /// Gets the number of still-empty ways for each driven configuration
    pub fn get_empty_way_counts(&self) -> Vec<(u8, usize)> {
        self.caches
            .iter()
            .map(|c| (c.geometry().id, c.empty_way_count()))
            .collect()
    }
}

/// Parses one trace line: strip the one-character prefix, trim whitespace,
/// read the rest as a hexadecimal address
///
/// Unlike the fixed-width formats where a lookup-table parser pays off, the
/// payload here is variable width, so the standard library parser is the
/// right tool.
fn parse_trace_line(raw: &[u8], line_num: u64) -> Result<u32, String> {
    if raw.len() < 2 {
        return Err(format!("trace line {line_num} is empty or truncated"));
    }
    let payload = raw[1..].trim_ascii();
    let payload = std::str::from_utf8(payload)
        .map_err(|e| format!("trace line {line_num} isn't valid text: {e}"))?;
    u32::from_str_radix(payload, 16)
        .map_err(|e| format!("trace line {line_num}: couldn't parse {payload:?} as a hexadecimal address: {e}"))
}
