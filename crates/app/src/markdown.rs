//! Lightweight markdown renderer for transcript entries.
//!
//! Handles the subset of markdown the model actually produces:
//! - ``` fenced code blocks
//! - `` `inline code` ``
//! - `**bold**`
//! - `- bullet` and `* bullet` list items
//! - `###` and `##` heading lines
//!
//! Pure and total: any input renders to safe markup. Fences are extracted
//! first so code containing `**`, `#`, or leading `-` is never picked up
//! by the later rules. Unclosed markers render literally.

use shared::transcript::Sender;

/// Render model output into display markup.
pub fn render_markdown(text: &str) -> String {
    let mut out = String::new();
    let mut rest = text;

    while let Some(start) = rest.find("```") {
        let after = &rest[start + 3..];
        match after.find("```") {
            Some(end) => {
                out.push_str(&render_text_block(&rest[..start]));
                out.push_str("<pre><code>");
                out.push_str(&escape_html(after[..end].trim_matches('\n')));
                out.push_str("</code></pre>");
                rest = &after[end + 3..];
            }
            // Unclosed fence: the rest is plain text.
            None => break,
        }
    }
    out.push_str(&render_text_block(rest));
    out
}

/// Derive the display form for a message by sender.
///
/// System and Error text is trusted markup composed from fixed templates;
/// anything dynamic must be escaped before it gets there.
pub fn rendered_for(sender: Sender, raw: &str) -> String {
    match sender {
        Sender::Model => render_markdown(raw),
        Sender::User => escape_html(raw).replace('\n', "<br>"),
        Sender::System | Sender::Error => raw.to_string(),
    }
}

/// Escape text for safe interpolation into markup.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Line-level rules for text outside code fences.
fn render_text_block(text: &str) -> String {
    let lines: Vec<String> = text.split('\n').map(render_line).collect();
    lines.join("<br>")
}

fn render_line(line: &str) -> String {
    if let Some(rest) = line.strip_prefix("### ") {
        return format!("<strong>{}</strong>", render_inline(rest));
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return format!("<h4>{}</h4>", render_inline(rest));
    }
    if let Some(rest) = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
    {
        return format!("&bull; {}", render_inline(rest));
    }
    render_inline(line)
}

/// Inline rules: code spans first, then bold on what is left.
fn render_inline(text: &str) -> String {
    let mut out = String::new();
    let mut rest = text;

    while let Some(pos) = rest.find('`') {
        match rest[pos + 1..].find('`') {
            Some(len) => {
                out.push_str(&render_bold(&rest[..pos]));
                out.push_str("<code>");
                out.push_str(&escape_html(&rest[pos + 1..pos + 1 + len]));
                out.push_str("</code>");
                rest = &rest[pos + 2 + len..];
            }
            None => break,
        }
    }
    out.push_str(&render_bold(rest));
    out
}

fn render_bold(text: &str) -> String {
    let mut out = String::new();
    let mut rest = text;

    while let Some(pos) = rest.find("**") {
        match rest[pos + 2..].find("**") {
            Some(len) => {
                out.push_str(&escape_html(&rest[..pos]));
                out.push_str("<strong>");
                out.push_str(&escape_html(&rest[pos + 2..pos + 2 + len]));
                out.push_str("</strong>");
                rest = &rest[pos + 4 + len..];
            }
            None => break,
        }
    }
    out.push_str(&escape_html(rest));
    out
}
