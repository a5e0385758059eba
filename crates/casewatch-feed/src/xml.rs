//! Minimal non-validating XML pull parser.
//!
//! Covers the subset of XML an Atom feed uses: the prolog, comments,
//! CDATA sections, start/empty/end tags with quoted attributes,
//! character data, and the predefined plus numeric character
//! references. Namespace prefixes are stripped; callers match on local
//! names. Anything fancier (DTD internal subsets, processing
//! instructions mid-document) is skipped or rejected.

use crate::error::{Error, Result};

/// One attribute of a start tag, prefix stripped from the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Local attribute name.
    pub name: String,
    /// Decoded attribute value.
    pub value: String,
}

/// A pull-parsing event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    /// A start tag, possibly self-closing (`<a/>` sets `self_closing`
    /// and produces no matching [`XmlEvent::EndElement`]).
    StartElement {
        /// Local element name.
        name: String,
        /// Attributes in document order.
        attributes: Vec<Attribute>,
        /// Whether the tag closed itself.
        self_closing: bool,
    },
    /// An end tag.
    EndElement {
        /// Local element name.
        name: String,
    },
    /// Character data, entity references decoded. Whitespace-only runs
    /// between tags are reported too.
    Text(String),
    /// End of input.
    Eof,
}

/// Streaming reader over an XML document.
#[derive(Debug)]
pub struct XmlReader<'a> {
    rest: &'a str,
}

impl<'a> XmlReader<'a> {
    /// Creates a reader over the whole document.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    /// Returns the next event, skipping the prolog, comments, and
    /// DOCTYPE declarations.
    ///
    /// # Errors
    ///
    /// Returns an error on unterminated markup or malformed tags.
    pub fn next_event(&mut self) -> Result<XmlEvent> {
        loop {
            if self.rest.is_empty() {
                return Ok(XmlEvent::Eof);
            }

            if let Some(stripped) = self.rest.strip_prefix("<?") {
                let end = stripped
                    .find("?>")
                    .ok_or_else(|| unterminated("processing instruction"))?;
                self.rest = &stripped[end + 2..];
            } else if let Some(stripped) = self.rest.strip_prefix("<!--") {
                let end = stripped.find("-->").ok_or_else(|| unterminated("comment"))?;
                self.rest = &stripped[end + 3..];
            } else if let Some(stripped) = self.rest.strip_prefix("<![CDATA[") {
                let end = stripped
                    .find("]]>")
                    .ok_or_else(|| unterminated("CDATA section"))?;
                let text = stripped[..end].to_string();
                self.rest = &stripped[end + 3..];
                return Ok(XmlEvent::Text(text));
            } else if let Some(stripped) = self.rest.strip_prefix("<!") {
                // DOCTYPE and friends; no internal-subset support.
                let end = stripped.find('>').ok_or_else(|| unterminated("declaration"))?;
                self.rest = &stripped[end + 1..];
            } else if let Some(stripped) = self.rest.strip_prefix("</") {
                let end = stripped.find('>').ok_or_else(|| unterminated("end tag"))?;
                let name = local_name(stripped[..end].trim());
                if name.is_empty() {
                    return Err(Error::Xml("empty end-tag name".into()));
                }
                self.rest = &stripped[end + 1..];
                return Ok(XmlEvent::EndElement {
                    name: name.to_string(),
                });
            } else if let Some(stripped) = self.rest.strip_prefix('<') {
                let end = find_tag_end(stripped).ok_or_else(|| unterminated("start tag"))?;
                let mut body = stripped[..end].trim();
                self.rest = &stripped[end + 1..];

                let self_closing = if let Some(trimmed) = body.strip_suffix('/') {
                    body = trimmed.trim_end();
                    true
                } else {
                    false
                };

                let (name, attributes) = parse_tag(body)?;
                return Ok(XmlEvent::StartElement {
                    name,
                    attributes,
                    self_closing,
                });
            } else {
                let end = self.rest.find('<').unwrap_or(self.rest.len());
                let text = decode_entities(&self.rest[..end]);
                self.rest = &self.rest[end..];
                return Ok(XmlEvent::Text(text));
            }
        }
    }
}

fn unterminated(what: &str) -> Error {
    Error::Xml(format!("unterminated {what}"))
}

/// Finds the `>` that ends a start tag, skipping any `>` inside quoted
/// attribute values.
fn find_tag_end(tag: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in tag.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '>' => return Some(i),
                _ => {}
            },
        }
    }
    None
}

/// Splits a start-tag body into the element name and its attributes.
fn parse_tag(body: &str) -> Result<(String, Vec<Attribute>)> {
    let name_end = body.find(char::is_whitespace).unwrap_or(body.len());
    let name = &body[..name_end];
    if name.is_empty() {
        return Err(Error::Xml("empty tag name".into()));
    }

    let mut attributes = Vec::new();
    let mut rest = body[name_end..].trim_start();

    while !rest.is_empty() {
        let eq = rest
            .find('=')
            .ok_or_else(|| Error::Xml(format!("attribute without value in <{name}>")))?;
        let attr_name = rest[..eq].trim_end();
        if attr_name.is_empty() {
            return Err(Error::Xml(format!("empty attribute name in <{name}>")));
        }

        rest = rest[eq + 1..].trim_start();
        let quote = rest
            .chars()
            .next()
            .filter(|&c| c == '"' || c == '\'')
            .ok_or_else(|| Error::Xml(format!("unquoted attribute value in <{name}>")))?;

        let value_end = rest[1..]
            .find(quote)
            .ok_or_else(|| Error::Xml(format!("unterminated attribute value in <{name}>")))?;

        attributes.push(Attribute {
            name: local_name(attr_name).to_string(),
            value: decode_entities(&rest[1..1 + value_end]),
        });
        rest = rest[value_end + 2..].trim_start();
    }

    Ok((local_name(name).to_string(), attributes))
}

/// Strips any namespace prefix: `tna:identifier` becomes `identifier`.
fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

/// Decodes the predefined entities and numeric character references.
/// Unrecognized references are kept literally rather than rejected;
/// real-world feeds are not always strict.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        // Entity names are short runs of ASCII alphanumerics (or #digits).
        let body_len = rest[1..]
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '#')
            .unwrap_or(rest.len() - 1);

        let terminated = rest.as_bytes().get(1 + body_len) == Some(&b';');
        let decoded = if terminated {
            decode_entity(&rest[1..1 + body_len])
        } else {
            None
        };

        if let Some(c) = decoded {
            out.push(c);
            rest = &rest[1 + body_len + 1..];
        } else {
            out.push('&');
            rest = &rest[1..];
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()));
            code.and_then(char::from_u32)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn events(input: &str) -> Vec<XmlEvent> {
        let mut reader = XmlReader::new(input);
        let mut out = Vec::new();
        loop {
            let event = reader.next_event().unwrap();
            if event == XmlEvent::Eof {
                return out;
            }
            out.push(event);
        }
    }

    #[test]
    fn simple_element_with_text() {
        let got = events("<title>Smith v Jones</title>");
        assert_eq!(
            got,
            vec![
                XmlEvent::StartElement {
                    name: "title".into(),
                    attributes: vec![],
                    self_closing: false,
                },
                XmlEvent::Text("Smith v Jones".into()),
                XmlEvent::EndElement {
                    name: "title".into()
                },
            ]
        );
    }

    #[test]
    fn prolog_and_comments_are_skipped() {
        let got = events("<?xml version=\"1.0\"?><!-- a comment --><a/>");
        assert_eq!(
            got,
            vec![XmlEvent::StartElement {
                name: "a".into(),
                attributes: vec![],
                self_closing: true,
            }]
        );
    }

    #[test]
    fn attributes_are_parsed_in_order() {
        let got = events(r#"<link rel="alternate" href="https://x/a"/>"#);
        let XmlEvent::StartElement {
            name,
            attributes,
            self_closing,
        } = &got[0]
        else {
            panic!("expected start element");
        };
        assert_eq!(name, "link");
        assert!(self_closing);
        assert_eq!(
            attributes,
            &vec![
                Attribute {
                    name: "rel".into(),
                    value: "alternate".into()
                },
                Attribute {
                    name: "href".into(),
                    value: "https://x/a".into()
                },
            ]
        );
    }

    #[test]
    fn single_quoted_attributes() {
        let got = events("<a href='https://x/a?q=1&amp;p=2'/>");
        let XmlEvent::StartElement { attributes, .. } = &got[0] else {
            panic!("expected start element");
        };
        assert_eq!(attributes[0].value, "https://x/a?q=1&p=2");
    }

    #[test]
    fn namespace_prefixes_are_stripped() {
        let got = events("<tna:identifier>X</tna:identifier>");
        assert!(matches!(
            &got[0],
            XmlEvent::StartElement { name, .. } if name == "identifier"
        ));
        assert!(matches!(
            &got[2],
            XmlEvent::EndElement { name } if name == "identifier"
        ));
    }

    #[test]
    fn cdata_is_raw_text() {
        let got = events("<t><![CDATA[a < b & c]]></t>");
        assert_eq!(got[1], XmlEvent::Text("a < b & c".into()));
    }

    #[test]
    fn entities_are_decoded() {
        let got = events("<t>R &amp; D &lt;ltd&gt; &#65;&#x42;</t>");
        assert_eq!(got[1], XmlEvent::Text("R & D <ltd> AB".into()));
    }

    #[test]
    fn unknown_entity_kept_literally() {
        let got = events("<t>a &nbsp; b &malformed c</t>");
        assert_eq!(got[1], XmlEvent::Text("a &nbsp; b &malformed c".into()));
    }

    #[test]
    fn gt_inside_quoted_attribute_value() {
        let got = events(r#"<link href="https://x/search?q=a>b"/>"#);
        let XmlEvent::StartElement {
            attributes,
            self_closing,
            ..
        } = &got[0]
        else {
            panic!("expected start element");
        };
        assert!(self_closing);
        assert_eq!(attributes[0].value, "https://x/search?q=a>b");
    }

    #[test]
    fn unterminated_tag_is_an_error() {
        let mut reader = XmlReader::new("<title");
        assert!(reader.next_event().is_err());
    }

    #[test]
    fn unquoted_attribute_is_an_error() {
        let mut reader = XmlReader::new("<a href=x>");
        assert!(reader.next_event().is_err());
    }

    #[test]
    fn doctype_is_skipped() {
        let got = events("<!DOCTYPE html><a/>");
        assert_eq!(got.len(), 1);
    }
}
