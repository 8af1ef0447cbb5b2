use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::dispatch::LineHandler;

use super::{ReactorEvents, ServerConnection};

/// Line handler that records every line it receives.
#[derive(Debug, Default)]
pub(crate) struct RecordingHandler {
    pub(crate) lines: Vec<String>,
}

impl LineHandler for RecordingHandler {
    fn handle_line(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }
}

/// Polls `server` until `done` holds or two seconds elapse.
pub(crate) fn pump_until<H, F>(server: &mut ServerConnection<H>, mut done: F) -> ReactorEvents
where
    H: LineHandler,
    F: FnMut(&ServerConnection<H>) -> bool,
{
    let deadline = Instant::now() + Duration::from_secs(2);
    let mut total = ReactorEvents::default();
    while !done(server) && Instant::now() < deadline {
        let events = server
            .poll_once(Some(Duration::from_millis(20)))
            .expect("poll control socket");
        total.accepted += events.accepted;
        total.rejected += events.rejected;
        total.dispatched += events.dispatched;
        total.disconnected += events.disconnected;
    }
    total
}

pub(crate) fn connect(path: &Path) -> UnixStream {
    UnixStream::connect(path).expect("connect to control socket")
}
