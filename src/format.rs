//! Answer post-processing: phone and email linkification plus the markup
//! scanner the renderer uses to turn stored transcript text into styled lines.
//!
//! The linkify pass is loose by contract. Phone matching takes any run of
//! five or more digits with optional single separators, so years, zip codes
//! and digit-heavy identifiers get wrapped too. It also runs before the email
//! pass, so an address with five digits in its local part is corrupted by the
//! phone pass and never becomes a mailto link. Both behaviors are inherited
//! and kept as-is; tightening either pattern changes which runs get linked.

use std::sync::OnceLock;

use regex::{Captures, Regex};

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\+?\d{1,3}[\s\-()]?\d{1,4}[\s\-()]?\d{1,4}[\s\-()]?\d{1,4}[\s\-()]?\d{1,4}")
            .expect("phone pattern compiles")
    })
}

fn separator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s\-()]").expect("separator pattern compiles"))
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[a-zA-Z0-9._-]+@[a-zA-Z0-9._-]+\.[a-zA-Z0-9_-]+")
            .expect("email pattern compiles")
    })
}

/// Turn a raw backend answer into transcript markup.
///
/// Pass order is fixed: phone first, then email, then newline to `<br>`. The
/// tel: target is the match with separators stripped; a leading `+` survives.
pub fn format_answer(answer: &str) -> String {
    let linked = phone_re().replace_all(answer, |caps: &Captures| {
        let raw = &caps[0];
        let clean = separator_re().replace_all(raw, "");
        format!("<a href=\"tel:{clean}\">{raw}</a>")
    });
    let linked = email_re().replace_all(&linked, |caps: &Captures| {
        let raw = &caps[0];
        format!("<a href=\"mailto:{raw}\">{raw}</a>")
    });
    linked.replace('\n', "<br>")
}

/// One run of text within a transcript line, optionally carrying a link
/// target (`tel:` or `mailto:`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub link: Option<String>,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Segment {
            text: text.to_string(),
            link: None,
        }
    }
}

/// Split transcript markup into display lines of segments.
///
/// `<br>` separates lines; `<a href="..">..</a>` runs become linked segments.
/// Anything malformed (an anchor that never closes) is kept as literal text,
/// so the scanner is total over arbitrary input.
pub fn parse_markup(markup: &str) -> Vec<Vec<Segment>> {
    markup.split("<br>").map(parse_line).collect()
}

fn parse_line(line: &str) -> Vec<Segment> {
    const OPEN: &str = "<a href=\"";
    const MID: &str = "\">";
    const CLOSE: &str = "</a>";

    let mut segments = Vec::new();
    let mut rest = line;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(href_end) = after_open.find(MID) else {
            break;
        };
        let body = &after_open[href_end + MID.len()..];
        let Some(body_end) = body.find(CLOSE) else {
            break;
        };

        if start > 0 {
            segments.push(Segment::plain(&rest[..start]));
        }
        segments.push(Segment {
            text: body[..body_end].to_string(),
            link: Some(after_open[..href_end].to_string()),
        });
        rest = &body[body_end + CLOSE.len()..];
    }

    // Trailing text, or the whole line when no (well-formed) anchor was found
    if !rest.is_empty() {
        segments.push(Segment::plain(rest));
    }
    segments
}
