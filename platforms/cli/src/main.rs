use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xorshift_tm::layout::{history, seed};
use xorshift_tm::{
    graph, synthesize, ConfigLoader, Outcome, PresetManager, Step, TuringMachine, XorShiftConfig,
    MAX_EXECUTION_STEPS,
};

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The initial seed, as a binary word (e.g. 110010)
    #[clap(short, long)]
    seed: Option<String>,

    /// Left shift of the first step
    #[clap(short)]
    a: Option<usize>,

    /// Right shift of the second step
    #[clap(short)]
    b: Option<usize>,

    /// Left shift of the third step
    #[clap(short)]
    c: Option<usize>,

    /// Load the configuration from a JSON file
    #[clap(long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Use a built-in preset by name
    #[clap(short, long)]
    preset: Option<String>,

    /// List the built-in presets and exit
    #[clap(short, long)]
    list: bool,

    /// Maximum number of steps before giving up
    #[clap(short, long, default_value_t = MAX_EXECUTION_STEPS)]
    max_steps: usize,

    /// Print each configuration of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print the state graph as JSON and exit
    #[clap(short, long)]
    graph: bool,

    /// Compare the run with the arithmetic reference
    #[clap(long)]
    check: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.list {
        for index in 0..PresetManager::get_preset_count() {
            let info = PresetManager::get_preset_info(index)?;
            println!(
                "{:<16} seed={} shifts={:?} states={} transitions={}",
                info.name, info.seed, info.shifts, info.state_count, info.transition_count
            );
        }
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    let program = synthesize(&config).context("synthesizing program")?;

    if cli.graph {
        println!("{}", graph(&program).to_json()?);
        return Ok(());
    }

    let mut machine = TuringMachine::new(program);
    let outcome = if cli.debug {
        run_verbose(&mut machine, cli.max_steps)
    } else {
        machine.run(cli.max_steps)
    };

    let tape = machine.tape().to_string();
    let entries = history(&tape);
    println!("Outcome: {:?} after {} steps", outcome, machine.step_count());
    println!("Seed: {}", seed(&tape).unwrap_or_default());
    println!("History ({} entries):", entries.len());
    for entry in &entries {
        println!("  {}", entry);
    }

    if cli.check {
        let expected = config.reference_history()?;
        if outcome != Outcome::Accepted || entries != expected {
            bail!(
                "run does not match the reference sequence: expected {:?}",
                expected
            );
        }
        info!("history matches the reference sequence");
        println!("Check passed.");
    }

    Ok(())
}

/// Builds the configuration from `--config`, `--preset` or `--seed`, then applies shift overrides.
fn resolve_config(cli: &Cli) -> Result<XorShiftConfig> {
    let mut config = if let Some(path) = &cli.config {
        ConfigLoader::load_config(path)
            .with_context(|| format!("loading config {}", path.display()))?
    } else if let Some(name) = &cli.preset {
        PresetManager::get_preset_by_name(name)?
    } else if cli.seed.is_some() {
        XorShiftConfig::new(String::new(), 1, 2, 1)
    } else {
        bail!("one of --seed, --config or --preset is required");
    };

    if let Some(seed) = &cli.seed {
        config.seed = seed.clone();
    }
    if let Some(a) = cli.a {
        config.a = a;
    }
    if let Some(b) = cli.b {
        config.b = b;
    }
    if let Some(c) = cli.c {
        config.c = c;
    }

    config.validate()?;
    Ok(config)
}

/// Runs the machine one step at a time, printing every configuration.
fn run_verbose(machine: &mut TuringMachine, max_steps: usize) -> Outcome {
    let print_configuration = |machine: &TuringMachine| {
        let configuration = machine.configuration();
        println!(
            "Step: {}, State: {}, Tape: {}, Head: {}",
            machine.step_count(),
            configuration.state,
            configuration.tape,
            configuration.head
        );
    };

    print_configuration(machine);
    loop {
        if machine.is_accepting() {
            return Outcome::Accepted;
        }
        if machine.step_count() == max_steps {
            return Outcome::Exhausted;
        }
        if machine.step() == Step::Halt {
            return Outcome::Halted;
        }
        print_configuration(machine);
    }
}

/// Initialize tracing with an env-driven filter (default WARN, DEBUG with `--verbose`).
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
