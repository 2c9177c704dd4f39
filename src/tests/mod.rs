mod data;

pub use data::*;

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    io::{Error as IoError, ErrorKind},
    rc::Rc,
};

use log::LevelFilter;
use std::sync::Once;

use crate::prelude::{
    Category, Diagnostics, Duration, Error, Fix, LineSource, RouteRequest, RoutingResponse,
    RoutingService,
};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

/// [LineSource] replaying a script: None stands for a read timeout.
/// End of script behaves like end of data.
pub struct ScriptedSource {
    lines: VecDeque<std::io::Result<Option<String>>>,
    closed: Rc<Cell<bool>>,
}

impl ScriptedSource {
    pub fn new(script: &[Option<&str>]) -> (Self, Rc<Cell<bool>>) {
        let closed = Rc::new(Cell::new(false));
        let s = Self {
            lines: script
                .iter()
                .map(|line| Ok(line.map(|line| line.to_string())))
                .collect(),
            closed: Rc::clone(&closed),
        };
        (s, closed)
    }

    /// Appends a read failure
    pub fn push_error(&mut self) {
        self.lines
            .push_back(Err(IoError::new(ErrorKind::BrokenPipe, "device unplugged")));
    }
}

impl LineSource for ScriptedSource {
    fn read_line(&mut self, _: Duration) -> std::io::Result<Option<String>> {
        self.lines.pop_front().unwrap_or(Ok(None))
    }

    fn close(&mut self) {
        self.closed.set(true);
    }
}

/// [RoutingService] replaying canned responses, recording each request.
/// Once the script is exhausted, the last response is repeated.
#[derive(Clone)]
pub struct CannedService {
    responses: Rc<RefCell<VecDeque<Result<RoutingResponse, String>>>>,
    last: Rc<RefCell<Option<Result<RoutingResponse, String>>>>,
    requests: Rc<RefCell<Vec<RouteRequest>>>,
}

impl CannedService {
    pub fn new(responses: Vec<Result<RoutingResponse, String>>) -> Self {
        Self {
            responses: Rc::new(RefCell::new(responses.into_iter().collect())),
            last: Rc::new(RefCell::new(None)),
            requests: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Appends a response to the script
    pub fn push(&self, response: Result<RoutingResponse, String>) {
        self.responses.borrow_mut().push_back(response);
    }

    /// Number of requests issued so far
    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Requests issued so far
    pub fn requests(&self) -> Vec<RouteRequest> {
        self.requests.borrow().clone()
    }
}

impl RoutingService for CannedService {
    fn request(&mut self, request: &RouteRequest) -> Result<RoutingResponse, Error> {
        self.requests.borrow_mut().push(request.clone());

        let next = self.responses.borrow_mut().pop_front();
        if let Some(next) = next {
            *self.last.borrow_mut() = Some(next);
        }

        match self.last.borrow().as_ref() {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(e)) => Err(Error::RoutingTransport(e.clone())),
            None => Err(Error::RoutingTransport("no response scripted".to_string())),
        }
    }
}

/// [Diagnostics] sink that records everything.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    pub events: Vec<(Category, String)>,
    pub fixes: Vec<Fix>,
}

impl RecordingDiagnostics {
    pub fn count(&self, category: Category) -> usize {
        self.events.iter().filter(|(c, _)| *c == category).count()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn event(&mut self, category: Category, message: &str) {
        self.events.push((category, message.to_string()));
    }

    fn fix(&mut self, fix: &Fix) {
        self.fixes.push(*fix);
    }
}
