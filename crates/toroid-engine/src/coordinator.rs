//! Rank 0's side of a run: input, the full matrix, and the answers.

use std::fmt;
use std::io::{self, Write};
use std::time::Instant;

use toroid_core::{Cell, CellKind, ConfigError, Coord, Request, RunHeader, Startup};
use tracing::{info, warn};

use crate::input::{RecordKind, RecordSource};
use crate::matrix::Matrix;
use crate::metrics::RunMetrics;
use crate::view::{Event, Viewer};

// ── Session ────────────────────────────────────────────────────────

/// Everything the coordinator needs beyond its communicator: the parsed
/// header, the remaining input records, where answers go, and an
/// optional viewer.
pub struct Session<S, W> {
    header: RunHeader,
    source: S,
    out: W,
    viewer: Option<Viewer>,
}

impl<S: RecordSource, W: Write> Session<S, W> {
    /// Session reading records from `source` and writing answers to `out`.
    pub fn new(header: RunHeader, source: S, out: W) -> Self {
        Self {
            header,
            source,
            out,
            viewer: None,
        }
    }

    /// Attach a viewer. The relaxation strategy shows the final field;
    /// the operator-power strategy takes impulses from clicks instead of
    /// the record stream.
    pub fn with_viewer(mut self, viewer: Viewer) -> Self {
        self.viewer = Some(viewer);
        self
    }

    /// Run header.
    pub fn header(&self) -> RunHeader {
        self.header
    }
}

impl<S, W> fmt::Debug for Session<S, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("header", &self.header)
            .field("viewer", &self.viewer)
            .finish_non_exhaustive()
    }
}

// ── Answer / Report ────────────────────────────────────────────────

/// One answered query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Answer {
    /// Coordinate as requested, before normalization.
    pub target: Coord,
    /// Value found there.
    pub value: f64,
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value of case {} is {:.6}.", self.target, self.value)
    }
}

/// Outcome of a completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    /// Answers in query order, as written to the output.
    pub answers: Vec<Answer>,
    /// Last gathered field.
    pub matrix: Matrix,
    /// Work counters.
    pub metrics: RunMetrics,
}

// ── Coordinator ────────────────────────────────────────────────────

pub(crate) struct Coordinator<S, W> {
    session: Session<S, W>,
    matrix: Matrix,
    pending: Option<Coord>,
    answers: Vec<Answer>,
    failure: Option<io::Error>,
    started: Instant,
}

impl<S: RecordSource, W: Write> Coordinator<S, W> {
    pub(crate) fn new(session: Session<S, W>) -> Self {
        let matrix = Matrix::new(session.header.dims);
        Self {
            session,
            matrix,
            pending: None,
            answers: Vec::new(),
            failure: None,
            started: Instant::now(),
        }
    }

    /// The startup broadcast for a world of `workers`, or the reason to
    /// abort it.
    pub(crate) fn startup(&self, workers: usize) -> Result<Startup, ConfigError> {
        let header = self.session.header;
        let cells = header.dims.cell_count();
        if workers != cells {
            return Err(ConfigError::WorkerCountMismatch { workers, cells });
        }
        Ok(Startup::Run {
            header,
            live_view: self.session.viewer.is_some(),
        })
    }

    /// Apply assignments up to the first query and remember its target.
    pub(crate) fn ingest(&mut self) {
        self.pending = None;
        while let Some(record) = self.session.source.next_record() {
            match record.kind {
                RecordKind::Assign(kind) => self.matrix.set(
                    record.coord,
                    Cell {
                        kind,
                        value: record.value,
                    },
                ),
                RecordKind::Get => {
                    if !record.coord.is_sentinel() {
                        self.pending = Some(record.coord);
                    }
                    return;
                }
            }
        }
    }

    /// Initial cells in rank order.
    pub(crate) fn cells(&self) -> Vec<Cell> {
        self.matrix.cells().to_vec()
    }

    pub(crate) fn absorb(&mut self, values: &[f64]) {
        self.matrix.update_values(values);
    }

    /// Draw the final field and wait for the window to close.
    pub(crate) fn show_final(&mut self) {
        if let Some(viewer) = self.session.viewer.as_mut() {
            viewer.draw(&self.matrix);
            viewer.wait_close();
        }
    }

    /// Answer the pending query and every later one until the sentinel or
    /// the end of input.
    pub(crate) fn answer_queries(&mut self) {
        while let Some(target) = self.pending.take() {
            self.answer(target);
            self.pending = self.next_query();
        }
    }

    fn next_query(&mut self) -> Option<Coord> {
        while let Some(record) = self.session.source.next_record() {
            match record.kind {
                RecordKind::Get if record.coord.is_sentinel() => return None,
                RecordKind::Get => return Some(record.coord),
                RecordKind::Assign(_) => {
                    warn!(coord = %record.coord, "assignment after simulation ignored");
                }
            }
        }
        None
    }

    /// Next operator-power request, from the viewer when one is attached
    /// and from the record stream otherwise.
    pub(crate) fn next_request(&mut self) -> Request {
        if self.failure.is_some() {
            return Request::Stop;
        }
        if let Some(viewer) = self.session.viewer.as_mut() {
            viewer.draw(&self.matrix);
            return match viewer.wait_event() {
                Event::Close => Request::Stop,
                click => match click.cell() {
                    Some(target) => Request::Inject {
                        target,
                        magnitude: 1.0,
                    },
                    None => Request::Stop,
                },
            };
        }
        while let Some(record) = self.session.source.next_record() {
            if record.coord.is_sentinel() {
                return Request::Stop;
            }
            return match record.kind {
                RecordKind::Get => Request::Get { target: record.coord },
                RecordKind::Assign(kind) => {
                    if kind == CellKind::Fixed {
                        warn!(coord = %record.coord, "operator power cannot pin cells, injecting as a plain impulse");
                    }
                    Request::Inject {
                        target: record.coord,
                        magnitude: record.value,
                    }
                }
            };
        }
        Request::Stop
    }

    /// Write the value at `target`. A write failure is kept until
    /// [`finish`](Self::finish) so the coordinator still joins every
    /// remaining collective.
    pub(crate) fn answer(&mut self, target: Coord) {
        if self.failure.is_some() {
            return;
        }
        let answer = Answer {
            target,
            value: self.matrix.value(target),
        };
        match writeln!(self.session.out, "{answer}") {
            Ok(()) => self.answers.push(answer),
            Err(e) => self.failure = Some(e),
        }
    }

    pub(crate) fn elapsed_us(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_micros()).unwrap_or(u64::MAX)
    }

    pub(crate) fn finish(mut self, metrics: RunMetrics) -> io::Result<Report> {
        if let Some(viewer) = self.session.viewer.as_mut() {
            viewer.close();
        }
        if let Some(e) = self.failure.take() {
            return Err(e);
        }
        self.session.out.flush()?;
        info!(
            rounds = metrics.rounds,
            exchanges = metrics.exchanges,
            broadcasts = metrics.broadcasts,
            gathers = metrics.gathers,
            elapsed_us = metrics.elapsed_us,
            answers = self.answers.len(),
            "run complete"
        );
        Ok(Report {
            answers: self.answers,
            matrix: self.matrix,
            metrics,
        })
    }
}
