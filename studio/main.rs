/// backprop-nn Studio
///
/// Browser front end for watching a network learn. Served by a synchronous
/// tiny_http server; no JavaScript frameworks required.
///
/// Run with:
///   cargo run --bin studio --release
/// Then open http://127.0.0.1:7878
///
/// Paste or edit training data in the text format, start a run, and watch
/// the last and average error curves stream in. The final outputs and the
/// learned weights are shown when the run ends.

mod handlers;
mod render;
mod routes;
mod state;
mod util;

use std::sync::{Arc, Mutex};

use tiny_http::Server;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use state::StudioState;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let addr = "127.0.0.1:7878";
    let server = match Server::http(addr) {
        Ok(s) => s,
        Err(e) => {
            error!("failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    let shared_state = Arc::new(Mutex::new(StudioState::new()));

    info!("backprop-nn studio listening on http://{addr}");

    // One thread per request: the SSE handler blocks for the whole run.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
}
