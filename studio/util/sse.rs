// ---------------------------------------------------------------------------
// SSE helpers
// ---------------------------------------------------------------------------

/// Status line and headers written by hand before streaming, since the
/// handler talks to the raw socket from `Request::into_writer`.
pub const SSE_RESPONSE_HEAD: &str = "HTTP/1.1 200 OK\r\n\
                                     Content-Type: text/event-stream\r\n\
                                     Cache-Control: no-cache\r\n\
                                     Connection: keep-alive\r\n\
                                     X-Accel-Buffering: no\r\n\
                                     \r\n";

/// Formats a named SSE event with a JSON data payload.
///
/// Output format (Server-Sent Events wire format):
/// ```text
/// event: <name>\n
/// data: <json>\n
/// \n
/// ```
pub fn format_sse_event(event_name: &str, json_data: &str) -> String {
    format!("event: {}\ndata: {}\n\n", event_name, json_data)
}

/// Keep-alive comment; ignored by `EventSource` clients.
pub fn format_sse_keepalive() -> &'static str {
    ": ping\n\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_frame_layout() {
        assert_eq!(format_sse_event("step", "{}"), "event: step\ndata: {}\n\n");
    }

    #[test]
    fn head_ends_with_blank_line() {
        assert!(SSE_RESPONSE_HEAD.ends_with("\r\n\r\n"));
        assert!(SSE_RESPONSE_HEAD.contains("Content-Type: text/event-stream\r\n"));
    }
}
