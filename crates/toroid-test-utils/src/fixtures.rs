//! Input text and canvas fixtures.

use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

use toroid_core::{CellKind, RunHeader};
use toroid_engine::input::GET_CODE;
use toroid_engine::{Canvas, Event, Record, RecordKind};

/// Render a header and records in the text input format.
pub fn input_text(header: &RunHeader, records: &[Record]) -> String {
    let mut text = format!(
        "{} {} {} {}\n",
        header.dims.y(),
        header.dims.x(),
        header.params.coefficient(),
        header.params.iterations()
    );
    for r in records {
        let code = match r.kind {
            RecordKind::Assign(CellKind::Free) => 0,
            RecordKind::Assign(CellKind::Fixed) => 1,
            RecordKind::Get => GET_CODE,
        };
        let _ = writeln!(text, "{code} {} {} {}", r.coord.x, r.coord.y, r.value);
    }
    text
}

/// What a [`ScriptedCanvas`] was asked to do.
#[derive(Debug, Default)]
pub struct CanvasLog {
    /// Window sizes passed to `open`.
    pub opened: Vec<(u32, u32)>,
    /// Gray level per filled rectangle since the last `clear`, keyed by
    /// its top-left pixel.
    pub frame: Vec<((u32, u32), u8)>,
    /// Number of presented frames.
    pub flushes: usize,
    /// Number of `close` calls.
    pub closed: usize,
}

/// A canvas that replays a fixed list of events, then reports `Close`.
pub struct ScriptedCanvas {
    log: Arc<Mutex<CanvasLog>>,
    events: std::vec::IntoIter<Event>,
}

impl ScriptedCanvas {
    /// Canvas replaying `events` in order, plus a handle to its log.
    pub fn new(events: Vec<Event>) -> (Self, Arc<Mutex<CanvasLog>>) {
        let log = Arc::new(Mutex::new(CanvasLog::default()));
        (
            Self {
                log: Arc::clone(&log),
                events: events.into_iter(),
            },
            log,
        )
    }

    fn log(&self) -> std::sync::MutexGuard<'_, CanvasLog> {
        self.log.lock().expect("canvas log poisoned")
    }
}

impl Canvas for ScriptedCanvas {
    fn open(&mut self, width: u32, height: u32, _title: &str) {
        self.log().opened.push((width, height));
    }

    fn clear(&mut self) {
        self.log().frame.clear();
    }

    fn fill_rect(&mut self, x: u32, y: u32, _width: u32, _height: u32, gray: u8) {
        self.log().frame.push(((x, y), gray));
    }

    fn flush(&mut self) {
        self.log().flushes += 1;
    }

    fn wait_event(&mut self) -> Event {
        self.events.next().unwrap_or(Event::Close)
    }

    fn close(&mut self) {
        self.log().closed += 1;
    }
}
