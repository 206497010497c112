use std::io::Write;
use std::thread;
use std::time::Duration;

use tiny_http::Request;

use crate::state::{SharedState, StudioState, TrainingStatus};
use crate::util::sse::{format_sse_event, format_sse_keepalive, SSE_RESPONSE_HEAD};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// `GET /train/events`: Server-Sent Events handler.
///
/// Consumes `request` so it can take the raw writer, then follows
/// `step_history` with its own cursor:
/// 1. every step not yet sent to this client goes out as an `event: step`
///    frame, so a late client replays the whole curve first,
/// 2. a keep-alive comment is written when a poll finds nothing new,
/// 3. once the run is no longer `Running`, the remaining steps and an
///    `event: done` with the final report are sent.
///
/// Any number of clients can follow the same run.
pub fn handle(request: Request, state: SharedState) {
    let mut writer = request.into_writer();
    if write_all(&mut writer, SSE_RESPONSE_HEAD.as_bytes()).is_err() {
        return;
    }

    let mut cursor = 0;
    loop {
        let (frames, finished) = {
            let st = state.lock().unwrap();
            let frames = step_frames_since(&st, &mut cursor);
            let finished = !st.is_running();
            (frames, finished.then(|| done_event(&st)))
        };

        for frame in &frames {
            if write_all(&mut writer, frame.as_bytes()).is_err() {
                return;
            }
        }
        if let Some(done) = finished {
            let _ = write_all(&mut writer, done.as_bytes());
            return;
        }
        if frames.is_empty() && write_all(&mut writer, format_sse_keepalive().as_bytes()).is_err() {
            return;
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// `step` frames for every history entry at or after `cursor`, advancing
/// the cursor past them. A cleared history (a new run) yields nothing.
fn step_frames_since(st: &StudioState, cursor: &mut usize) -> Vec<String> {
    let fresh = st.step_history.get(*cursor..).unwrap_or(&[]);
    *cursor += fresh.len();
    fresh
        .iter()
        .filter_map(|step| serde_json::to_string(step).ok())
        .map(|json| format_sse_event("step", &json))
        .collect()
}

fn done_event(st: &StudioState) -> String {
    let data = match &st.training {
        TrainingStatus::Done { report } => serde_json::json!({
            "passes": report.passes,
            "converged": report.converged,
            "stopped": report.stopped,
            "final_error": report.final_error,
            "recent_average_error": report.recent_average_error,
        }),
        TrainingStatus::Failed { reason } => serde_json::json!({ "failed": reason }),
        _ => serde_json::json!({}),
    };
    format_sse_event("done", &data.to_string())
}

/// Writes all bytes to the writer, returning `Err` on any I/O failure.
fn write_all<W: Write + ?Sized>(w: &mut W, data: &[u8]) -> std::io::Result<()> {
    w.write_all(data)?;
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use backprop_nn::TrainStep;

    fn step(pass: usize) -> TrainStep {
        TrainStep {
            pass,
            error: 0.4,
            recent_average_error: 0.2,
            inputs: vec![1.0, 0.0],
            outputs: vec![0.7],
            targets: vec![1.0],
        }
    }

    #[test]
    fn every_client_sees_every_step() {
        let mut st = StudioState::new();
        st.step_history.extend([step(1), step(2)]);

        let (mut first, mut second) = (0, 0);
        assert_eq!(step_frames_since(&st, &mut first).len(), 2);

        st.step_history.push(step(3));
        let frames = step_frames_since(&st, &mut first);
        assert_eq!(frames.len(), 1);
        assert!(frames[0].contains("\"pass\":3"));

        // A second client joining late still gets the whole curve.
        assert_eq!(step_frames_since(&st, &mut second).len(), 3);
        assert_eq!((first, second), (3, 3));
    }

    #[test]
    fn cleared_history_yields_nothing() {
        let mut st = StudioState::new();
        let mut cursor = 5;
        assert!(step_frames_since(&st, &mut cursor).is_empty());
        st.step_history.push(step(1));
        assert!(step_frames_since(&st, &mut cursor).is_empty());
        assert_eq!(cursor, 5);
    }

    #[test]
    fn done_event_carries_failure_reason() {
        let mut st = StudioState::new();
        st.training = TrainingStatus::Failed { reason: "boom".into() };
        assert!(done_event(&st).starts_with("event: done\ndata: {\"failed\":\"boom\"}"));
    }
}
