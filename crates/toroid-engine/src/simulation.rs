//! Launching a run: one worker per cell, rank 0 coordinating.

use std::io::Write;
use std::sync::Mutex;

use toroid_comm::{launch, Communicator};
use toroid_core::{Request, RunHeader, Startup, WorkerId};
use tracing::{debug_span, info};

use crate::config::{EngineConfig, Strategy};
use crate::coordinator::{Coordinator, Report, Session};
use crate::error::EngineError;
use crate::input::RecordSource;
use crate::metrics::RunMetrics;
use crate::power::{OperatorPower, Superposition};
use crate::relax::Relaxation;

const ROOT: WorkerId = WorkerId::COORDINATOR;

type Outcome = Result<Option<Report>, EngineError>;

/// Run a session on `workers` threads and return the coordinator's report.
///
/// `workers` must equal the header's cell count; otherwise the coordinator
/// aborts the run before any round and the result is
/// [`ConfigError::WorkerCountMismatch`](toroid_core::ConfigError::WorkerCountMismatch).
pub fn run<S, W>(
    config: &EngineConfig,
    workers: usize,
    session: Session<S, W>,
) -> Result<Report, EngineError>
where
    S: RecordSource + Send,
    W: Write + Send,
{
    config.validate()?;
    info!(
        strategy = %config.strategy,
        workers,
        dims = %session.header().dims,
        "starting run"
    );
    let slot = Mutex::new(Some(Coordinator::new(session)));
    let outcomes = launch(workers, config.transport, |mut comm| {
        let coordinator = if comm.rank().is_coordinator() {
            slot.lock().ok().and_then(|mut s| s.take())
        } else {
            None
        };
        worker(&mut comm, config, coordinator)
    })?;
    settle(outcomes)
}

/// The coordinator's outcome wins; otherwise the first worker failure
/// other than the abort that follows a coordinator error.
fn settle(outcomes: Vec<Outcome>) -> Result<Report, EngineError> {
    let mut outcomes = outcomes.into_iter();
    let report = match outcomes.next() {
        Some(outcome) => outcome?,
        None => None,
    };
    for outcome in outcomes {
        match outcome {
            Ok(_) | Err(EngineError::Aborted) => {}
            Err(e) => return Err(e),
        }
    }
    report.ok_or(EngineError::MissingSession)
}

/// The program every worker runs.
fn worker<C, S, W>(
    comm: &mut C,
    config: &EngineConfig,
    coordinator: Option<Coordinator<S, W>>,
) -> Outcome
where
    C: Communicator,
    S: RecordSource,
    W: Write,
{
    let span = debug_span!("worker", rank = %comm.rank());
    let _enter = span.enter();
    let (header, live_view) = startup(comm, coordinator.as_ref())?;
    match config.strategy {
        Strategy::Relaxation => relaxation(comm, config, header, coordinator),
        Strategy::OperatorPower => operator_power(comm, header, live_view, coordinator),
    }
}

/// Broadcast the header, or an abort when the world does not match it.
fn startup<C, S, W>(
    comm: &mut C,
    coordinator: Option<&Coordinator<S, W>>,
) -> Result<(RunHeader, bool), EngineError>
where
    C: Communicator,
    S: RecordSource,
    W: Write,
{
    match coordinator {
        Some(coordinator) => match coordinator.startup(comm.size()) {
            Ok(startup) => {
                comm.broadcast(ROOT, Some(startup))?;
                match startup {
                    Startup::Run { header, live_view } => Ok((header, live_view)),
                    Startup::Abort => Err(EngineError::Aborted),
                }
            }
            Err(e) => {
                comm.broadcast(ROOT, Some(Startup::Abort))?;
                Err(e.into())
            }
        },
        None if comm.is_root(ROOT) => {
            comm.broadcast(ROOT, Some(Startup::Abort))?;
            Err(EngineError::MissingSession)
        }
        None => match comm.broadcast::<Startup>(ROOT, None)? {
            Startup::Run { header, live_view } => Ok((header, live_view)),
            Startup::Abort => Err(EngineError::Aborted),
        },
    }
}

fn relaxation<C, S, W>(
    comm: &mut C,
    config: &EngineConfig,
    header: RunHeader,
    mut coordinator: Option<Coordinator<S, W>>,
) -> Outcome
where
    C: Communicator,
    S: RecordSource,
    W: Write,
{
    let relax = Relaxation::new(comm.rank(), &header)?;
    let initial = coordinator.as_mut().map(|c| {
        c.ingest();
        c.cells()
    });
    let mut cell = comm.scatter(ROOT, initial)?;
    relax.run(comm, &mut cell, header.params.iterations(), config)?;
    let gathered = comm.gather(ROOT, cell.value)?;

    let Some(mut coordinator) = coordinator else {
        return Ok(None);
    };
    if let Some(values) = gathered {
        coordinator.absorb(&values);
    }
    coordinator.show_final();
    coordinator.answer_queries();
    let metrics = RunMetrics::from_stats(
        header.params.iterations(),
        comm.stats(),
        coordinator.elapsed_us(),
    );
    Ok(Some(coordinator.finish(metrics)?))
}

fn operator_power<C, S, W>(
    comm: &mut C,
    header: RunHeader,
    live_view: bool,
    mut coordinator: Option<Coordinator<S, W>>,
) -> Outcome
where
    C: Communicator,
    S: RecordSource,
    W: Write,
{
    let relax = Relaxation::new(comm.rank(), &header)?;
    let mut power = OperatorPower::identity(relax);
    power.raise(comm, header.params.iterations())?;

    let mut field = Superposition::new();
    loop {
        let request = comm.broadcast(ROOT, coordinator.as_mut().map(Coordinator::next_request))?;
        match request {
            Request::Stop => break,
            Request::Inject { target, magnitude } => {
                field.inject(&power, comm, target, magnitude)?;
                if live_view {
                    let gathered = comm.gather(ROOT, field.value())?;
                    if let (Some(c), Some(values)) = (coordinator.as_mut(), gathered) {
                        c.absorb(&values);
                    }
                }
            }
            Request::Get { target } => {
                let gathered = comm.gather(ROOT, field.value())?;
                if let (Some(c), Some(values)) = (coordinator.as_mut(), gathered) {
                    c.absorb(&values);
                    c.answer(target);
                }
            }
        }
    }

    let Some(coordinator) = coordinator else {
        return Ok(None);
    };
    let metrics = RunMetrics::from_stats(power.rounds(), comm.stats(), coordinator.elapsed_us());
    Ok(Some(coordinator.finish(metrics)?))
}
