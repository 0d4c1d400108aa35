use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use toroid::prelude::*;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// t rounds of the 4-neighbour rule
    Relaxation,
    /// Repeated squaring, then impulse queries
    OperatorPower,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TransportArg {
    /// Sends never block
    Unbounded,
    /// Zero-buffer hand-off
    Rendezvous,
    /// Inboxes hold --capacity messages
    Bounded,
}

/// Distributed diffusion on a toroidal grid
#[derive(Debug, Parser)]
#[command(name = "toroid", version)]
struct Cli {
    /// Input file (`height width p t` then records); stdin when omitted
    input: Option<PathBuf>,

    /// Solving strategy
    #[arg(long, value_enum, default_value_t = StrategyArg::Relaxation)]
    strategy: StrategyArg,

    /// Message transport between workers
    #[arg(long, value_enum, default_value_t = TransportArg::Unbounded)]
    transport: TransportArg,

    /// Inbox capacity for the bounded transport
    #[arg(long, default_value_t = 64)]
    capacity: usize,

    /// Worker count; defaults to width * height
    #[arg(long)]
    workers: Option<usize>,

    /// Relaxation rounds between progress events
    #[arg(long, default_value_t = 100)]
    progress_interval: u64,
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            strategy: match self.strategy {
                StrategyArg::Relaxation => Strategy::Relaxation,
                StrategyArg::OperatorPower => Strategy::OperatorPower,
            },
            transport: match self.transport {
                TransportArg::Unbounded => Transport::Unbounded,
                TransportArg::Rendezvous => Transport::RENDEZVOUS,
                TransportArg::Bounded => Transport::Bounded(self.capacity),
            },
            progress_interval: self.progress_interval,
        }
    }

    fn open_input(&self) -> io::Result<Box<dyn BufRead + Send>> {
        Ok(match &self.input {
            Some(path) => Box::new(BufReader::new(File::open(path)?)),
            None => Box::new(BufReader::new(io::stdin())),
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli) -> Result<(), EngineError> {
    let config = cli.engine_config();
    config.validate()?;
    let mut records = TextRecords::new(cli.open_input()?);
    let header = records.header()?;
    let workers = cli.workers.unwrap_or(header.dims.cell_count());
    debug!(dims = %header.dims, workers, "read input header");
    let session = Session::new(header, records, BufWriter::new(io::stdout()));
    toroid::run(&config, workers, session)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("toroid").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.input, None);
        assert_eq!(cli.workers, None);
        assert_eq!(cli.engine_config(), EngineConfig::default());
    }

    #[test]
    fn operator_power_over_rendezvous() {
        let cli = parse(&["in.txt", "--strategy", "operator-power", "--transport", "rendezvous"]);
        assert_eq!(cli.input, Some(PathBuf::from("in.txt")));
        let cfg = cli.engine_config();
        assert_eq!(cfg.strategy, Strategy::OperatorPower);
        assert_eq!(cfg.transport, Transport::Bounded(0));
    }

    #[test]
    fn bounded_uses_capacity() {
        let cli = parse(&["--transport", "bounded", "--capacity", "3", "--workers", "6"]);
        assert_eq!(cli.engine_config().transport, Transport::Bounded(3));
        assert_eq!(cli.workers, Some(6));
    }

    #[test]
    fn unknown_strategy_rejected() {
        assert!(Cli::try_parse_from(["toroid", "--strategy", "jacobi"]).is_err());
    }
}
