use pulldown_cmark::{html, Event, Options, Parser};
use storechat_core::BubbleKind;

/// Render markdown to HTML. Raw HTML in the source is escaped, not passed through.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

/// HTML for a bubble's content.
///
/// Only bot replies get markdown; user text and error notices are shown as typed.
pub fn render_bubble_content(kind: BubbleKind, text: &str, use_markdown: bool) -> String {
    match kind {
        BubbleKind::Bot if use_markdown => render_markdown(text),
        _ => crate::utils::text_to_html(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_markdown() {
        let html = render_markdown("**Notebook Gamer Dell**: R$ 5.200,00");
        assert!(html.contains("<strong>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render_markdown("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_user_text_is_never_markdown() {
        let html = render_bubble_content(BubbleKind::User, "**hi**\nthere", true);
        assert_eq!(html, "**hi**<br>there");
    }

    #[test]
    fn test_error_text_is_escaped() {
        let html = render_bubble_content(BubbleKind::Error, "Error: <b>", true);
        assert_eq!(html, "Error: &lt;b&gt;");
    }
}
