/// Page rendering for the studio.
///
/// A single HTML template (`studio/assets/studio.html`) is compiled in.
/// Handlers fill its `{{TOKEN}}` placeholders through a closure; any token
/// left unfilled is blanked so raw placeholders never reach the browser.

const TEMPLATE: &str = include_str!("assets/studio.html");

/// Renders the studio page.
///
/// `training_running` is injected as a JS flag so the page attaches to the
/// live event stream on load.
pub fn render_page<F>(training_running: bool, fill: F) -> String
where
    F: FnOnce(String) -> String,
{
    let html = TEMPLATE.replace(
        "{{TRAINING_RUNNING}}",
        if training_running { "true" } else { "false" },
    );
    blank_remaining(fill(html))
}

fn blank_remaining(mut html: String) -> String {
    while let Some(start) = html.find("{{") {
        match html[start..].find("}}") {
            Some(end) => html.replace_range(start..start + end + 2, ""),
            None => break,
        }
    }
    html
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfilled_tokens_are_blanked() {
        assert_eq!(blank_remaining("a{{X}}b{{Y}}c".into()), "abc");
        assert_eq!(blank_remaining("a{{open".into()), "a{{open");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(html_escape("<in: \"1\" & 2>"), "&lt;in: &quot;1&quot; &amp; 2&gt;");
    }
}
