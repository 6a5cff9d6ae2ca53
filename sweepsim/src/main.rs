use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Instant;

use clap::Parser;
use sweeplib::config::Selection;
use sweeplib::io::read_trace;
use sweeplib::simulator::Simulator;

#[cfg(debug_assertions)]
const DEBUG_DEFAULT: bool = true;

#[cfg(not(debug_assertions))]
const DEBUG_DEFAULT: bool = false;

#[derive(Parser, Debug)]
#[command(about = String::from("Replays an address trace against a battery of cache geometries and reports hit rates"))]
struct Args {
    /// Trace file: one access per line, a one-character prefix followed by a
    /// hexadecimal address
    trace: String,

    /// Which configuration to drive: "all" or an id from 1 to 7
    #[arg(default_value = "all")]
    config: String,

    /// Print the summary report as JSON instead of text
    #[arg(short, long)]
    json: bool,

    #[arg(short, long)]
    performance: bool,

    #[arg(short, long, default_value_t = DEBUG_DEFAULT)]
    debug: bool,
}

fn main() -> Result<(), String> {
    let start = Instant::now();
    let args = Args::parse();
    let selection: Selection = args.config.parse()?;
    let trace_file = File::open(&args.trace)
        .map_err(|e| format!("Couldn't open the trace file at path {}: {e}", args.trace))?;
    let trace = read_trace(trace_file)?;
    let mut simulator = Simulator::new(selection);
    {
        // Per-access lines are the bulk of the output, buffer them
        let stdout = std::io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        simulator.simulate(&trace, &mut out)?;
        out.flush()
            .map_err(|e| format!("Couldn't flush the per-access output: {e}"))?;
    }
    let report = simulator.report();
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report)
                .map_err(|e| format!("Couldn't serialise the output {e}"))?
        );
    } else {
        for summary in &report.configs {
            println!("Cache #{}", summary.id);
            println!(
                "Cache size: {}B   Associativity: {}    Block size: {}",
                summary.size, summary.associativity, summary.block_size_words
            );
            println!(
                "Accesses: {}   Hits: {}   Hit Rate: {:.2}%",
                summary.accesses, summary.hits, summary.hit_rate
            );
            println!("---------------------------");
        }
    }
    if args.performance {
        let end = Instant::now();
        let simulation_time = simulator.get_execution_time();
        let total_time = end - start;
        println!("Simulation time: {}s", simulation_time.as_nanos() as f64 / 1e9);
        println!("Total execution time (includes initial parsing, configuration, and output): {}s", total_time.as_nanos() as f64 / 1e9)
    }
    if args.debug {
        #[cfg(debug_assertions)]
        println!("Running the debug binary, debug mode is enabled by default. If benchmarking, re-compile with the --release argument when using cargo run");
        println!("Driving {selection:?}");
        let empty_ways = simulator.get_empty_way_counts();
        let formatted = empty_ways
            .iter()
            .map(|(id, count)| format!("#{id}: {count}"))
            .reduce(|a, b| format!("{a}, {b}"))
            .unwrap_or_default();
        println!("Empty ways by configuration: ({formatted})");
        println!("Total empty ways: {}", empty_ways.iter().map(|(_, c)| c).sum::<usize>())
    }
    Ok(())
}
