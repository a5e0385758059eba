//! Atom entry extraction.

use crate::error::Result;
use crate::xml::{Attribute, XmlEvent, XmlReader};
use casewatch_core::record::{CaseRecord, UNKNOWN_DATE};
use tracing::debug;

/// Parses an Atom document into case records, in feed order.
///
/// Per entry, the `title` text, the alternate `link`'s `href`, and the
/// `published` text are extracted. A `link` without a `rel` attribute
/// counts as alternate (the Atom default). Entries missing a title or a
/// link are dropped silently; a missing `published` date falls back to
/// the `"Unknown"` sentinel.
///
/// # Errors
///
/// Returns an error if the document is not well-formed XML.
pub fn parse_feed(xml: &str) -> Result<Vec<CaseRecord>> {
    let mut reader = XmlReader::new(xml);
    let mut cases = Vec::new();

    let mut in_entry = false;
    let mut title: Option<String> = None;
    let mut link: Option<String> = None;
    let mut date: Option<String> = None;
    let mut capture: Option<Field> = None;
    let mut text = String::new();

    loop {
        match reader.next_event()? {
            XmlEvent::StartElement {
                name,
                attributes,
                self_closing,
            } => match name.as_str() {
                "entry" if !self_closing => {
                    in_entry = true;
                    title = None;
                    link = None;
                    date = None;
                }
                "title" if in_entry && !self_closing => {
                    capture = Some(Field::Title);
                    text.clear();
                }
                "published" if in_entry && !self_closing => {
                    capture = Some(Field::Published);
                    text.clear();
                }
                "link" if in_entry && link.is_none() && is_alternate(&attributes) => {
                    link = attr(&attributes, "href").map(ToString::to_string);
                }
                _ => {}
            },
            XmlEvent::EndElement { name } => match name.as_str() {
                "title" if capture == Some(Field::Title) => {
                    title = Some(text.trim().to_string());
                    capture = None;
                }
                "published" if capture == Some(Field::Published) => {
                    date = Some(text.trim().to_string());
                    capture = None;
                }
                "entry" if in_entry => {
                    in_entry = false;
                    capture = None;
                    match (title.take(), link.take()) {
                        (Some(title), Some(link)) => {
                            cases.push(CaseRecord::new(
                                title,
                                link,
                                date.take().unwrap_or_else(|| UNKNOWN_DATE.to_string()),
                            ));
                        }
                        // Partial entries are dropped, not reported.
                        _ => debug!("skipping entry without title or link"),
                    }
                    date = None;
                }
                _ => {}
            },
            XmlEvent::Text(chunk) => {
                if capture.is_some() {
                    text.push_str(&chunk);
                }
            }
            XmlEvent::Eof => break,
        }
    }

    Ok(cases)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Published,
}

fn attr<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|attribute| attribute.name == name)
        .map(|attribute| attribute.value.as_str())
}

fn is_alternate(attributes: &[Attribute]) -> bool {
    attr(attributes, "rel").is_none_or(|rel| rel == "alternate")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom"
      xmlns:tna="https://caselaw.nationalarchives.gov.uk">
  <title>Search results</title>
  <updated>2026-08-25T09:00:00Z</updated>
  <entry>
    <title>Smith v Jones</title>
    <link rel="alternate" href="https://caselaw.example.org/ewca/2026/1"/>
    <link rel="self" href="https://caselaw.example.org/ewca/2026/1.xml"/>
    <published>2026-08-20</published>
    <tna:identifier>[2026] EWCA Civ 1</tna:identifier>
  </entry>
  <entry>
    <title>R (Brown) v Secretary of State</title>
    <link href="https://caselaw.example.org/uksc/2026/2"/>
  </entry>
</feed>"#;

    #[test]
    fn extracts_entries_in_feed_order() {
        let cases = parse_feed(FEED).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].title, "Smith v Jones");
        assert_eq!(cases[0].link, "https://caselaw.example.org/ewca/2026/1");
        assert_eq!(cases[0].date, "2026-08-20");
        assert_eq!(cases[1].title, "R (Brown) v Secretary of State");
    }

    #[test]
    fn missing_published_defaults_to_unknown() {
        let cases = parse_feed(FEED).unwrap();
        assert_eq!(cases[1].date, "Unknown");
    }

    #[test]
    fn self_link_is_not_the_alternate() {
        let feed = r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry>
            <title>T</title>
            <link rel="self" href="https://x/self.xml"/>
            <link rel="alternate" href="https://x/doc"/>
        </entry></feed>"#;
        let cases = parse_feed(feed).unwrap();
        assert_eq!(cases[0].link, "https://x/doc");
    }

    #[test]
    fn entry_missing_link_is_skipped() {
        let feed = r#"<feed><entry><title>No link</title></entry>
            <entry><title>Ok</title><link href="https://x/a"/></entry></feed>"#;
        let cases = parse_feed(feed).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].title, "Ok");
    }

    #[test]
    fn entry_missing_title_is_skipped() {
        let feed = r#"<feed><entry><link href="https://x/a"/></entry></feed>"#;
        assert!(parse_feed(feed).unwrap().is_empty());
    }

    #[test]
    fn feed_level_title_is_not_an_entry_title() {
        let feed = r#"<feed><title>Search results</title>
            <entry><title>Case</title><link href="https://x/a"/></entry></feed>"#;
        let cases = parse_feed(feed).unwrap();
        assert_eq!(cases[0].title, "Case");
    }

    #[test]
    fn entities_in_titles_are_decoded() {
        let feed = r#"<feed><entry><title>A &amp; B Ltd</title>
            <link href="https://x/a?s=1&amp;t=2"/></entry></feed>"#;
        let cases = parse_feed(feed).unwrap();
        assert_eq!(cases[0].title, "A & B Ltd");
        assert_eq!(cases[0].link, "https://x/a?s=1&t=2");
    }

    #[test]
    fn empty_feed_yields_no_cases() {
        let cases = parse_feed(r#"<feed xmlns="http://www.w3.org/2005/Atom"></feed>"#).unwrap();
        assert!(cases.is_empty());
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(parse_feed("<feed><entry").is_err());
    }
}
