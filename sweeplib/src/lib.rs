//! # SweepLib
//!
//! Sweeplib replays a trace of memory addresses against a fixed battery of
//! cache geometries and reports, per geometry, how many accesses hit versus
//! missed
//!
//! It provides a single cache model parameterised by geometry, the fixed
//! seven-entry geometry table, and a simulator which drives every selected
//! geometry over a trace in parallel
//!
//! The model is bookkeeping only: it tracks tag presence and recency per
//! set/way, never line contents

/// Contains the per-geometry cache model: address decomposition, the hit/miss
/// decision, and LRU victim selection
pub mod cache;

/// Contains the geometry definitions, the fixed configuration table, and the
/// configuration selector parsed from the command line
pub mod config;

/// Contains trace file loading
pub mod io;

/// Contains the simulator used to replay a trace against the selected
/// configurations
pub mod simulator;
