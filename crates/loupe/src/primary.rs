//! Primary mode: the viewer host that owns the control socket.

use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use loupe_config::Config;
use loupe_remote::command::{Action, CommandTable};
use loupe_remote::dispatch::SlideshowSettings;
use loupe_remote::{Dispatcher, LineHandler, RemoteContext, RemoteRequest, ServerConnection, Viewer};
use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use tracing::{info, warn};

use crate::AppError;
use crate::headless::HeadlessViewer;

const PRIMARY_TARGET: &str = concat!(env!("CARGO_CRATE_NAME"), "::primary");
const POLL_INTERVAL: Duration = Duration::from_millis(250);

type PrimaryDispatcher = Dispatcher<RemoteContext<HeadlessViewer>>;

/// Runs the viewer host until a quit command or termination signal.
///
/// Failing to open the control socket is not fatal: the host keeps running
/// without remote control.
pub(crate) fn run_primary(config: &Config, blank: bool, request: &RemoteRequest) -> Result<(), AppError> {
    let terminate = install_signal_flags()?;
    let table = CommandTable::standard();
    let mut dispatcher = Dispatcher::with_table(
        table,
        RemoteContext::new(HeadlessViewer::new(), SlideshowSettings::from_config(config)),
    );

    let lines = request.lines(&table, request.commands.iter().map(String::as_str));
    let opens_path = lines.iter().any(|line| {
        table.find(line).is_some_and(|found| {
            matches!(found.entry.action, Action::OpenFile | Action::ListAdd)
        })
    });
    if !blank
        && !opens_path
        && let Ok(directory) = env::current_dir()
    {
        dispatcher.context_mut().viewer_mut().open_path(&directory);
    }
    for line in &lines {
        dispatcher.handle_line(line);
    }

    match open_server(config) {
        Some(mut server) => {
            server.subscribe(dispatcher);
            serve(&mut server, &terminate);
            if let Some(dispatcher) = server.handler() {
                dispatcher.context().viewer().log_final_state();
            }
            server.close();
        }
        None => {
            while !should_stop(&terminate, &dispatcher) {
                thread::sleep(POLL_INTERVAL);
            }
            dispatcher.context().viewer().log_final_state();
        }
    }
    info!(target: PRIMARY_TARGET, "primary exiting");
    Ok(())
}

fn open_server(config: &Config) -> Option<ServerConnection<PrimaryDispatcher>> {
    let socket = config.control_socket();
    if let Err(error) = socket.prepare_filesystem() {
        warn!(target: PRIMARY_TARGET, %error, "remote control unavailable");
        return None;
    }
    match ServerConnection::open(socket.path().as_std_path(), config.max_clients()) {
        Ok(server) => Some(server),
        Err(error) => {
            warn!(target: PRIMARY_TARGET, %error, "remote control unavailable");
            None
        }
    }
}

fn serve(server: &mut ServerConnection<PrimaryDispatcher>, terminate: &AtomicBool) {
    loop {
        let stopped = server
            .handler()
            .is_none_or(|dispatcher| should_stop(terminate, dispatcher));
        if stopped {
            return;
        }
        if let Err(error) = server.poll_once(Some(POLL_INTERVAL)) {
            warn!(target: PRIMARY_TARGET, %error, "control socket poll failed");
            thread::sleep(POLL_INTERVAL);
        }
    }
}

fn should_stop(terminate: &AtomicBool, dispatcher: &PrimaryDispatcher) -> bool {
    terminate.load(Ordering::Relaxed) || dispatcher.context().viewer().quit_requested()
}

fn install_signal_flags() -> Result<Arc<AtomicBool>, AppError> {
    let terminate = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM, SIGHUP, SIGQUIT] {
        signal_hook::flag::register(signal, Arc::clone(&terminate)).map_err(AppError::Signals)?;
    }
    Ok(terminate)
}
