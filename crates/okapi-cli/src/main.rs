use okapi::{
    Algorithm, Engine, Graph, GridOptions, HierarchicalOptions, OrganicOptions, Topology,
};
use serde::Serialize;
use std::io::Read;
use std::str::FromStr;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Layout(okapi::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Layout(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<okapi::Error> for CliError {
    fn from(value: okapi::Error) -> Self {
        Self::Layout(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Components,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Organic,
    Grid,
    Hierarchical,
}

impl FromStr for Mode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "organic" => Ok(Self::Organic),
            "grid" => Ok(Self::Grid),
            "hierarchical" | "dagre" => Ok(Self::Hierarchical),
            _ => Err(()),
        }
    }
}

impl Mode {
    fn name(self) -> &'static str {
        match self {
            Mode::Organic => "organic",
            Mode::Grid => "grid",
            Mode::Hierarchical => "hierarchical",
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    verbose: bool,
    mode: Option<Mode>,
    seed: Option<u64>,
    iterations: Option<usize>,
    config: Option<String>,
}

fn usage() -> &'static str {
    "okapi-cli\n\
\n\
USAGE:\n\
  okapi-cli [layout] [--mode organic|grid|hierarchical] [--seed <n>] [--iterations <n>] [--config <path>] [--pretty] [--verbose] [<path>|-]\n\
  okapi-cli components [--pretty] [--verbose] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the graph JSON is read from stdin.\n\
  - Graph JSON: {\"nodes\": [{\"id\": \"a\"}], \"edges\": [{\"source\": \"a\", \"target\": \"b\"}]}.\n\
  - --config reads a layout config such as {\"mode\": \"organic\", \"randomSeed\": 7}.\n\
  - --seed and --iterations override the organic config.\n\
  - Logs go to stderr; RUST_LOG takes precedence over --verbose.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "components" => args.command = Command::Components,
            "--pretty" => args.pretty = true,
            "--verbose" | "-v" => args.verbose = true,
            "--mode" => {
                let Some(mode) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.mode = Some(mode.parse::<Mode>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--seed" => {
                let Some(seed) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.seed = Some(seed.parse::<u64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--iterations" => {
                let Some(n) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.iterations = Some(n.parse::<usize>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_algorithm(args: &Args) -> Result<Algorithm, CliError> {
    let mut algorithm = match (&args.config, args.mode) {
        (Some(path), mode) => {
            let algorithm = Algorithm::from_json_str(&std::fs::read_to_string(path)?)?;
            if let Some(mode) = mode {
                if mode.name() != algorithm.name() {
                    return Err(CliError::Usage("--mode conflicts with the mode in --config"));
                }
            }
            algorithm
        }
        (None, None | Some(Mode::Organic)) => Algorithm::Organic(OrganicOptions::default()),
        (None, Some(Mode::Grid)) => Algorithm::Grid(GridOptions::default()),
        (None, Some(Mode::Hierarchical)) => {
            Algorithm::Hierarchical(HierarchicalOptions::default())
        }
    };

    match &mut algorithm {
        Algorithm::Organic(opts) => {
            if let Some(seed) = args.seed {
                opts.random_seed = seed;
            }
            if let Some(n) = args.iterations {
                opts.spring.iterations = n;
            }
        }
        other => {
            if args.seed.is_some() || args.iterations.is_some() {
                tracing::warn!(
                    mode = other.name(),
                    "--seed/--iterations only apply to organic mode; ignoring"
                );
            }
        }
    }
    Ok(algorithm)
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let graph: Graph = serde_json::from_str(&text)?;

    match args.command {
        Command::Components => {
            let topology = Topology::analyze(&graph);
            write_json(&topology.summary(), args.pretty)
        }
        Command::Layout => {
            let algorithm = build_algorithm(&args)?;
            let engine = Engine::new();
            let result = engine.layout(&graph, &algorithm)?;
            tracing::debug!(
                mode = algorithm.name(),
                nodes = result.nodes.len(),
                overlapping = result.overlapping.len(),
                "layout done"
            );
            write_json(&result, args.pretty)
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
