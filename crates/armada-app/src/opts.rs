//! Command-line surface.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "armada", about = "Deterministic fleet combat simulator")]
pub struct Opts {
    /// Run without display (this build is always headless).
    #[arg(long)]
    pub headless: bool,

    /// Allow the display to skip frames under load (inert in this build).
    #[arg(long = "frameSkip")]
    pub frame_skip: bool,

    /// Run each scenario N times.
    #[arg(long = "loop", default_value_t = 1)]
    pub loop_count: u32,

    /// Scenario file name (scenarios/<name>.sc).
    #[arg(long)]
    pub scenario: Option<String>,

    /// Round-robin every non-neutral pair.
    #[arg(long)]
    pub tournament: bool,

    /// Optimize mode: implies --tournament, adds target fleets.
    #[arg(long)]
    pub optimize: bool,

    /// Write the population registry to a file at exit.
    #[arg(long = "dumpPopulation")]
    pub dump_population: Option<PathBuf>,

    /// Load the population registry from a file.
    #[arg(long = "usePopulation")]
    pub use_population: Option<PathBuf>,

    /// After loading, kill and mutate target fleets.
    #[arg(long = "mutatePopulation")]
    pub mutate_population: bool,

    /// Battles per fresh target fleet per control fleet.
    #[arg(long = "mutationNewIterations", default_value_t = 1)]
    pub mutation_new_iterations: u32,

    /// Battles per stale target fleet per control fleet.
    #[arg(long = "mutationStaleIterations", default_value_t = 1)]
    pub mutation_stale_iterations: u32,

    /// Cap on the total number of fleets when mutating.
    #[arg(long = "populationLimit", default_value_t = 0)]
    pub population_limit: u32,

    /// Fraction of target fleets to kill each mutation round.
    #[arg(long = "populationKillRatio", default_value_t = 0.0)]
    pub population_kill_ratio: f32,

    /// Battle seed (0 = random).
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Use the same seed for every battle.
    #[arg(long = "reuseSeed")]
    pub reuse_seed: bool,

    /// Hard cap on ticks per battle (0 = from scenario).
    #[arg(long = "tickLimit", default_value_t = 0)]
    pub tick_limit: u32,

    /// Number of worker threads.
    #[arg(long = "numThreads", default_value_t = 1)]
    pub num_threads: u32,

    /// Display starts paused (inert in this build).
    #[arg(long = "startPaused")]
    pub start_paused: bool,

    /// Run self-tests then exit.
    #[arg(long = "unitTests")]
    pub unit_tests: bool,

    /// Emit the sprite sheet then exit (unsupported in this build).
    #[arg(long = "dumpPNG")]
    pub dump_png: Option<PathBuf>,
}
