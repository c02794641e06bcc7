use std::borrow::Cow;

use html2text::render::text_renderer::TrivialDecorator;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wrap width handed to the HTML renderer. Wide enough that it never wraps
/// a paragraph; the description pane does its own wrapping.
const RENDER_WIDTH: usize = 10_000;

/// Converts an HTML fragment from a feed into plain text.
///
/// Markup is parsed by `html2text`, so tags disappear and entities
/// (`&amp;`, `&eacute;`, `&#8217;`) are decoded in the same pass. Block
/// elements become line breaks; link targets, emphasis markers and footnotes
/// are not rendered. Plain text without markup passes through unchanged
/// apart from whitespace collapsing.
///
/// Input the renderer rejects yields an empty string.
///
/// # Examples
///
/// ```
/// use clacks::util::html_to_text;
///
/// assert_eq!(html_to_text("<p>Fish &amp; <b>Chips</b></p>").trim(), "Fish & Chips");
/// ```
pub fn html_to_text(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    match html2text::config::with_decorator(TrivialDecorator::new())
        .string_from_read(html.as_bytes(), RENDER_WIDTH)
    {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "Could not render feed html as text");
            String::new()
        }
    }
}

/// Strips terminal control characters and ANSI escape sequences from feed text.
///
/// Tab, newline and carriage return survive. CSI sequences (`ESC [ ... final`)
/// and OSC sequences (`ESC ] ... BEL` or `ESC ] ... ESC \`) are dropped whole;
/// any other ESC is dropped on its own.
///
/// Returns `Cow::Borrowed` for clean input, which is the common case.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_unsafe_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    // Parameters and intermediates run until a final byte in @..=~
                    for c in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&c) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(c) = chars.next() {
                        if c == '\x07' {
                            break;
                        }
                        if c == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
        } else if !is_unsafe_control(c) {
            out.push(c);
        }
    }

    Cow::Owned(out)
}

fn is_unsafe_control(c: char) -> bool {
    (c.is_ascii_control() && !matches!(c, '\t' | '\n' | '\r')) || c == '\x7f'
}

/// Cuts `s` to at most `max_width` terminal columns, ending in `...` when cut.
///
/// Wide characters (CJK, emoji) count as two columns. Below four columns
/// there is no room for the ellipsis and the text is simply clipped.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if UnicodeWidthStr::width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    let ellipsis = if max_width > 3 { "..." } else { "" };
    let budget = max_width - ellipsis.len();

    let mut out = String::with_capacity(budget + ellipsis.len());
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(ellipsis);
    Cow::Owned(out)
}
