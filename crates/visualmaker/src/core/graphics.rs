//! Typed graphics documents
//!
//! Markup returned by the rendering service is never shown as-is. It is
//! parsed into a [`Graphics`] value first, which guarantees an `<svg>` root
//! and strips active content: script-bearing elements, `on*` event handler
//! attributes and `javascript:` links.
//!
//! Mermaid's strict mode passes its output through an HTML sanitizer, so
//! HTML labels inside `<foreignObject>` come back HTML-serialized, with void
//! elements like `<br>` left unclosed. Those are closed before parsing.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use tracing::{debug, trace};

use super::error::GraphicsError;

/// Elements dropped together with their whole subtree
const BLOCKED_ELEMENTS: &[&[u8]] = &[b"script", b"iframe", b"object", b"embed"];

/// Attributes whose values are URLs
const LINK_ATTRIBUTES: &[&[u8]] = &[b"href", b"src", b"action", b"formaction"];

/// HTML elements that never have content or an end tag
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "wbr", "input"];

/// A sanitized SVG document ready for a display surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graphics {
    markup: String,
    removed: usize,
}

impl Graphics {
    /// Parse and sanitize SVG markup
    pub fn parse(markup: &str) -> Result<Self, GraphicsError> {
        let markup = close_void_elements(markup);
        let mut reader = Reader::from_str(&markup);
        let mut writer = Writer::new(Vec::with_capacity(markup.len()));

        let mut depth = 0usize;
        let mut skip_depth = 0usize;
        let mut seen_root = false;
        let mut removed = 0usize;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| GraphicsError::Xml(e.to_string()))?;

            if skip_depth > 0 {
                match event {
                    Event::Start(_) => skip_depth += 1,
                    Event::End(_) => skip_depth -= 1,
                    Event::Eof => return Err(GraphicsError::Xml("unexpected end of document".into())),
                    _ => {}
                }
                continue;
            }

            let is_empty = matches!(event, Event::Empty(_));
            let out = match event {
                Event::Start(start) | Event::Empty(start) if depth == 0 => {
                    if seen_root {
                        return Err(GraphicsError::Xml(
                            "content after the root element".into(),
                        ));
                    }
                    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                    if name != "svg" {
                        return Err(GraphicsError::NotSvg(name));
                    }
                    seen_root = true;
                    let (clean, dropped) = sanitize_start(&start)?;
                    removed += dropped;
                    if is_empty {
                        Event::Empty(clean)
                    } else {
                        depth += 1;
                        Event::Start(clean)
                    }
                }
                Event::Start(start) => {
                    if is_blocked(&start) {
                        trace!(element = %String::from_utf8_lossy(start.local_name().as_ref()), "Dropping element");
                        removed += 1;
                        skip_depth = 1;
                        continue;
                    }
                    let (clean, dropped) = sanitize_start(&start)?;
                    removed += dropped;
                    depth += 1;
                    Event::Start(clean)
                }
                Event::Empty(start) => {
                    if is_blocked(&start) {
                        removed += 1;
                        continue;
                    }
                    let (clean, dropped) = sanitize_start(&start)?;
                    removed += dropped;
                    Event::Empty(clean)
                }
                Event::End(end) => {
                    depth = depth.saturating_sub(1);
                    Event::End(end)
                }
                Event::Text(text) if depth > 0 => Event::Text(text),
                Event::CData(data) if depth > 0 => Event::CData(data),
                Event::Eof => break,
                // Prolog, doctype, comments, processing instructions and
                // whitespace outside the root are not carried over.
                _ => continue,
            };

            writer
                .write_event(out)
                .map_err(|e| GraphicsError::Xml(e.to_string()))?;
        }

        if !seen_root {
            return Err(GraphicsError::Empty);
        }
        if depth != 0 {
            return Err(GraphicsError::Xml("unclosed <svg> element".into()));
        }

        let markup =
            String::from_utf8(writer.into_inner()).map_err(|e| GraphicsError::Xml(e.to_string()))?;
        debug!(bytes = markup.len(), removed, "Parsed graphics document");
        Ok(Self { markup, removed })
    }

    /// The sanitized markup
    pub fn as_str(&self) -> &str {
        &self.markup
    }

    /// Number of elements and attributes stripped while sanitizing
    pub fn removed(&self) -> usize {
        self.removed
    }
}

impl fmt::Display for Graphics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.markup)
    }
}

impl FromStr for Graphics {
    type Err = GraphicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Rewrite HTML void tags (`<br>`) as self-closing and drop stray end tags
fn close_void_elements(markup: &str) -> Cow<'_, str> {
    let mut out: Option<String> = None;
    let mut copied = 0;
    let mut pos = 0;

    while let Some(offset) = markup[pos..].find('<') {
        let start = pos + offset;
        let closing = markup[start + 1..].starts_with('/');
        let name_start = start + 1 + usize::from(closing);
        let name_end = markup[name_start..]
            .find(|c: char| !c.is_ascii_alphanumeric())
            .map_or(markup.len(), |i| name_start + i);
        pos = name_end;

        let name = &markup[name_start..name_end];
        if !VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name)) {
            continue;
        }
        let Some(end) = tag_end(markup, name_end) else {
            break;
        };
        pos = end + 1;
        if !closing && markup.as_bytes()[end - 1] == b'/' {
            continue;
        }

        let out = out.get_or_insert_with(|| String::with_capacity(markup.len() + 16));
        if closing {
            out.push_str(&markup[copied..start]);
        } else {
            out.push_str(&markup[copied..end]);
            out.push_str("/>");
        }
        copied = end + 1;
    }

    match out {
        Some(mut out) => {
            out.push_str(&markup[copied..]);
            trace!("Closed HTML void elements");
            Cow::Owned(out)
        }
        None => Cow::Borrowed(markup),
    }
}

/// Index of the `>` closing the tag, skipping quoted attribute values
fn tag_end(markup: &str, from: usize) -> Option<usize> {
    let mut quote = None;
    for (i, b) in markup.bytes().enumerate().skip(from) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(i),
            _ => {}
        }
    }
    None
}

fn is_blocked(start: &BytesStart<'_>) -> bool {
    let name = start.local_name();
    BLOCKED_ELEMENTS
        .iter()
        .any(|blocked| name.as_ref().eq_ignore_ascii_case(blocked))
}

/// Copy a start tag, dropping event handlers and script links
fn sanitize_start(start: &BytesStart<'_>) -> Result<(BytesStart<'static>, usize), GraphicsError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut clean = BytesStart::new(name);
    let mut dropped = 0;

    for attr in start.attributes() {
        let attr = attr.map_err(|e| GraphicsError::Xml(e.to_string()))?;
        let local = attr.key.local_name();
        let local = local.as_ref();

        if local.len() > 2 && local[..2].eq_ignore_ascii_case(b"on") {
            dropped += 1;
            continue;
        }
        if LINK_ATTRIBUTES.iter().any(|l| local.eq_ignore_ascii_case(l)) {
            let value = attr
                .unescape_value()
                .map_err(|e| GraphicsError::Xml(e.to_string()))?;
            if is_script_url(&value) {
                dropped += 1;
                continue;
            }
        }
        clean.push_attribute(attr);
    }

    Ok((clean, dropped))
}

fn is_script_url(value: &str) -> bool {
    let normalized: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    normalized.starts_with("javascript:") || normalized.starts_with("vbscript:")
}
