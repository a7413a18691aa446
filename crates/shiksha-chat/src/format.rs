// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use pulldown_cmark::{Event, Options, Parser, html};

/// Turn a raw assistant answer into HTML. Answers that already carry an
/// HTML table skip markdown parsing entirely; only line breaks and bold
/// markers outside the table are converted. Everything else goes through
/// the markdown renderer.
pub fn render_answer(answer: &str) -> String {
    if contains_html_table(answer) {
        table_passthrough(answer)
    } else {
        markdown_to_html(answer)
    }
}

/// Uppercased badge text for a reply mode: "rag_only" -> "RAG_ONLY".
/// Failed exchanges use the fixed mode "error", shown as "ERROR".
pub fn mode_label(mode: &str) -> String {
    mode.to_uppercase()
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// True when the text contains an opening `<table` tag (followed by
/// whitespace or `>`), case-insensitive.
fn contains_html_table(text: &str) -> bool {
    let lower = text.to_lowercase();
    let mut rest = lower.as_str();
    while let Some(position) = rest.find("<table") {
        match rest[position + "<table".len()..].chars().next() {
            Some(next) if next == '>' || next.is_whitespace() => return true,
            _ => rest = &rest[position + "<table".len()..],
        }
    }
    false
}

fn markdown_to_html(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    // Single newlines become hard breaks, matching how answers are
    // authored by the backend formatters.
    let parser = Parser::new_ext(text, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut out = String::with_capacity(text.len() * 2);
    html::push_html(&mut out, parser);
    out
}

/// The table path: `**bold**` spans become `<strong>`, blank lines become
/// `<br><br>`, remaining newlines become `<br>` unless they sit directly
/// before a tag, and stray breaks touching table edges are dropped.
fn table_passthrough(text: &str) -> String {
    let bolded = convert_bold_spans(text);
    let with_paragraphs = bolded.replace("\n\n", "<br><br>");

    let mut out = String::with_capacity(with_paragraphs.len());
    let mut chars = with_paragraphs.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\n' && chars.peek() != Some(&'<') {
            out.push_str("<br>");
        } else {
            out.push(ch);
        }
    }

    out.replace("<br><table", "<table")
        .replace("<br>\n<table", "<table")
        .replace("</table><br>", "</table>")
        .replace("</table>\n<br>", "</table>")
}

fn convert_bold_spans(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        let Some(open) = rest.find("**") else {
            out.push_str(rest);
            return out;
        };
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("**") else {
            out.push_str(rest);
            return out;
        };
        out.push_str(&rest[..open]);
        out.push_str("<strong>");
        out.push_str(&after_open[..close]);
        out.push_str("</strong>");
        rest = &after_open[close + 2..];
    }
}

#[cfg(test)]
mod tests {
    use super::{escape_html, mode_label, render_answer};

    #[test]
    fn markdown_answers_render_bold_and_lists() {
        let html = render_answer("Attendance reached **96.8%**\n- Kerala\n- Gujarat");
        assert!(html.contains("<strong>96.8%</strong>"), "got: {html}");
        assert!(html.contains("<li>Kerala</li>"), "got: {html}");
    }

    #[test]
    fn single_newlines_become_hard_breaks() {
        let html = render_answer("line one\nline two");
        assert!(html.contains("<br"), "got: {html}");
    }

    #[test]
    fn table_answers_skip_markdown() {
        let answer = "Summary:\n\n<table><tr><td>**raw**</td></tr></table>\n\nDone **here**";
        let html = render_answer(answer);
        // Inside and outside the table, bold markers are converted the
        // same lightweight way; no <p> wrapping appears.
        assert!(html.contains("<strong>here</strong>"), "got: {html}");
        assert!(!html.contains("<p>"), "got: {html}");
        assert!(html.contains("<table>"), "got: {html}");
    }

    #[test]
    fn breaks_touching_table_edges_are_dropped() {
        let html = render_answer("Intro\n\n<table></table>\n\nOutro");
        assert_eq!(html, "Intro<br><table></table><br>Outro");
    }

    #[test]
    fn unclosed_bold_marker_is_left_alone() {
        let html = render_answer("<table></table> broken **marker");
        assert!(html.contains("**marker"), "got: {html}");
    }

    #[test]
    fn mode_labels_uppercase() {
        assert_eq!(mode_label("rag_only"), "RAG_ONLY");
        assert_eq!(mode_label("hybrid"), "HYBRID");
        assert_eq!(mode_label("error"), "ERROR");
    }

    #[test]
    fn html_escaping_covers_the_usual_suspects() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }
}
