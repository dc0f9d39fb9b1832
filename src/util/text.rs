use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Ellipsis appended to truncated text.
const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Display width of `s` in terminal columns (CJK and emoji count as 2).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate `s` to at most `max_width` columns, appending "..." when cut.
///
/// Widths of 3 or less cannot hold a character plus the ellipsis, so the
/// longest fitting prefix is returned without one. Returns `Cow::Borrowed`
/// when nothing is cut.
///
/// ```
/// use movierec::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Movie Action 12", 20), "Movie Action 12");
/// assert_eq!(truncate_to_width("Movie Action 12", 10), "Movie A...");
/// assert_eq!(truncate_to_width("Movie", 3), "Mov");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width <= ELLIPSIS_WIDTH {
        return Cow::Owned(prefix_within(s, max_width).to_string());
    }
    let head = prefix_within(s, max_width - ELLIPSIS_WIDTH);
    Cow::Owned(format!("{}{}", head, ELLIPSIS))
}

/// Longest prefix of `s` that fits in `width` columns.
fn prefix_within(s: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            return &s[..idx];
        }
        used += w;
    }
    s
}

fn is_stripped_control(b: u8) -> bool {
    b == 0x7f || (b < 0x20 && b != b'\t' && b != b'\n' && b != b'\r')
}

/// Remove terminal control characters and ANSI escape sequences.
///
/// Titles come from a remote API and are rendered straight into the
/// terminal. Strips C0 controls (except tab, LF, CR), DEL, CSI sequences
/// (`ESC [` ... final byte), OSC sequences (`ESC ]` ... BEL or `ESC \`) and
/// bare ESC. Returns `Cow::Borrowed` for clean input.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.bytes().any(|b| b == 0x1b || is_stripped_control(b)) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\u{1b}' => match chars.peek() {
                Some('[') => {
                    chars.next();
                    // Parameter and intermediate bytes run until a final byte in 0x40..=0x7e.
                    for c in chars.by_ref() {
                        if ('\u{40}'..='\u{7e}').contains(&c) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(c) = chars.next() {
                        if c == '\u{07}' {
                            break;
                        }
                        if c == '\u{1b}' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            c if c.is_ascii() && is_stripped_control(c as u8) => {}
            c => out.push(c),
        }
    }

    Cow::Owned(out)
}
