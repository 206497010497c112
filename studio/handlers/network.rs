use std::io::Cursor;

use serde::Serialize;
use tiny_http::Response;

use backprop_nn::NetworkSnapshot;

use crate::state::SharedState;

#[derive(Serialize)]
struct NetworkView {
    topology: Vec<usize>,
    weights: Vec<f64>,
    snapshot: NetworkSnapshot,
}

/// `GET /network`: snapshot and weights of the latest network as JSON,
/// or `null` before the first run has finished.
pub fn handle_get(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let st = state.lock().unwrap();
    let view = st.network.as_ref().map(|net| NetworkView {
        topology: net.topology().sizes().to_vec(),
        weights: net.weights(),
        snapshot: net.snapshot(),
    });
    drop(st);

    let body = serde_json::to_string(&view).unwrap_or_else(|_| "null".to_owned());
    crate::routes::json_response(body)
}
