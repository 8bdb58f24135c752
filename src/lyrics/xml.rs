//! Tag-annotated (`.xml`) lyrics.
//!
//! Every `<lyric>` element, at any depth, is one event. Timing, kind,
//! translation and furigana come from attributes; the text is the element's
//! trimmed text content. The `furigana` attribute is carried through as an
//! opaque string. Events come out in document order, so an element that
//! encloses another precedes it.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::constants::event::DEFAULT_KIND;
use crate::types::{Furigana, LyricEvent, Parsed};

const LYRIC_TAG: &[u8] = b"lyric";

/// A `<lyric>` element whose end tag has not been seen yet.
#[derive(Debug, Default)]
struct Pending {
    time: Option<u64>,
    end_time: Option<u64>,
    kind: Option<String>,
    translation: Option<String>,
    furigana: Option<String>,
    text: String,
    broken: bool,
    /// Position of this element's event among all events, by start tag.
    slot: usize,
}

impl Pending {
    fn from_start(start: &BytesStart<'_>, slot: usize) -> Self {
        let mut pending = Self { slot, ..Self::default() };

        for attr in start.attributes() {
            let Ok(attr) = attr else {
                pending.broken = true;
                continue;
            };
            let Ok(value) = attr.unescape_value() else {
                pending.broken = true;
                continue;
            };
            match attr.key.local_name().as_ref() {
                b"time" => pending.time = leading_int(&value),
                b"endTime" => pending.end_time = leading_int(&value),
                b"type" => pending.kind = Some(value.into_owned()).filter(|k| !k.is_empty()),
                b"translation" => pending.translation = Some(value.into_owned()),
                b"furigana" => pending.furigana = Some(value.into_owned()),
                _ => {}
            }
        }

        pending
    }

    fn finish(self) -> Option<LyricEvent> {
        let text = self.text.trim();
        if self.broken || text.is_empty() {
            return None;
        }
        if let (Some(start), Some(end)) = (self.time, self.end_time) {
            if end < start {
                return None;
            }
        }

        Some(LyricEvent {
            time: self.time,
            end_time: self.end_time,
            text: text.to_string(),
            kind: self.kind.unwrap_or_else(|| DEFAULT_KIND.to_string()),
            translation: self.translation,
            furigana: self.furigana.map(Furigana::Raw),
        })
    }
}

/// Integer prefix of an attribute value (`"1500.7"` → 1500); `None` when
/// there are no leading digits.
fn leading_int(value: &str) -> Option<u64> {
    let value = value.trim();
    let end = value.find(|c: char| !c.is_ascii_digit()).unwrap_or(value.len());
    value[..end].parse().ok()
}

/// Parse tag-annotated content.
///
/// Elements with no text, undecodable attributes or an end before their
/// start count as skipped. A malformed document stops the scan; events read
/// up to that point are kept.
pub fn parse(content: &str) -> Parsed {
    let mut reader = Reader::from_str(content);
    let mut parsed = Parsed::default();
    let mut open: Vec<Pending> = Vec::new();
    // Filled at end tags, ordered by start tags
    let mut slots: Vec<Option<LyricEvent>> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == LYRIC_TAG => {
                open.push(Pending::from_start(&e, slots.len()));
                slots.push(None);
            }
            Ok(Event::Empty(e)) if e.local_name().as_ref() == LYRIC_TAG => {
                parsed.skip();
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == LYRIC_TAG => {
                if let Some(pending) = open.pop() {
                    // Outer elements include nested text, as text content does
                    if let Some(parent) = open.last_mut() {
                        parent.text.push_str(&pending.text);
                    }
                    let slot = pending.slot;
                    match (pending.finish(), slots.get_mut(slot)) {
                        (Some(event), Some(entry)) => *entry = Some(event),
                        _ => parsed.skip(),
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(pending) = open.last_mut() {
                    match t.unescape() {
                        Ok(text) => pending.text.push_str(&text),
                        Err(_) => pending.broken = true,
                    }
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(pending) = open.last_mut() {
                    pending.text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(
                    "Malformed lyric XML at byte {}: {e}; kept {} events",
                    reader.buffer_position(),
                    slots.iter().flatten().count()
                );
                parsed.skipped += open.len();
                break;
            }
        }
    }

    for event in slots.into_iter().flatten() {
        parsed.push(event);
    }
    parsed
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn reads_attributes_and_text() {
        let content = r#"<?xml version="1.0"?>
            <lyrics>
              <lyric time="1000" endTime="2500" translation="hello" furigana="0:君:きみ">君 &amp; 僕</lyric>
              <lyric time="3000" type="chorus"><![CDATA[la <la>]]></lyric>
            </lyrics>"#;
        let parsed = parse(content);
        assert_eq!(parsed.events.len(), 2);

        let first = &parsed.events[0];
        assert_eq!(first.time, Some(1000));
        assert_eq!(first.end_time, Some(2500));
        assert_eq!(first.text, "君 & 僕");
        assert_eq!(first.kind, "line");
        assert_eq!(first.translation.as_deref(), Some("hello"));
        assert_eq!(first.furigana, Some(Furigana::Raw("0:君:きみ".into())));

        let second = &parsed.events[1];
        assert_eq!(second.text, "la <la>");
        assert_eq!(second.kind, "chorus");
        assert_eq!(second.end_time, None);
    }

    #[test]
    fn empty_elements_are_skipped() {
        let parsed = parse(r#"<lyrics><lyric time="1"/><lyric time="2">  </lyric><lyric time="3">ok</lyric></lyrics>"#);
        assert_eq!(parsed.events.len(), 1);
        assert_eq!(parsed.events[0].time, Some(3));
        assert_eq!(parsed.skipped, 2);
    }

    #[test]
    fn non_numeric_time_becomes_none() {
        let parsed = parse(r#"<lyric time="soon" endTime="12.9">text</lyric>"#);
        assert_eq!(parsed.events[0].time, None);
        assert_eq!(parsed.events[0].end_time, Some(12));
    }

    #[test]
    fn malformed_tail_keeps_earlier_events() {
        let parsed = parse(r#"<lyrics><lyric time="1">a</lyric><lyric time="2">b</oops></lyrics>"#);
        assert_eq!(parsed.events.len(), 1);
        assert_eq!(parsed.events[0].text, "a");
    }

    #[test]
    fn nested_elements_come_out_in_document_order() {
        let parsed = parse(r#"<lyrics><lyric time="1">outer <lyric time="2">inner</lyric></lyric><lyric time="3">last</lyric></lyrics>"#);
        let texts: Vec<_> = parsed.events.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["outer inner", "inner", "last"]);
        assert_eq!(parsed.skipped, 0);
    }

    #[test]
    fn leading_int_mimics_integer_prefix() {
        assert_eq!(leading_int(" 1500.7 "), Some(1500));
        assert_eq!(leading_int("-3"), None);
        assert_eq!(leading_int(""), None);
    }
}
