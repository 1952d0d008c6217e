// src/feeds/parser.rs
//! RSS 2.0 / Atom parsing into flat feed entries

use anyhow::{Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One `<item>` or `<entry>` as found in the feed, before cleaning
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub author: Option<String>,
    pub summary: String,
    pub published: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Author,
    Summary,
    Published,
    Location,
}

impl Field {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Field::Title),
            b"link" => Some(Field::Link),
            b"author" | b"creator" => Some(Field::Author),
            b"description" | b"summary" | b"content" | b"encoded" => Some(Field::Summary),
            b"pubDate" | b"published" | b"updated" | b"date" => Some(Field::Published),
            b"location" => Some(Field::Location),
            _ => None,
        }
    }
}

struct OpenField {
    field: Field,
    tag: Vec<u8>,
    text: String,
}

/// Parse a feed document. Entries without a title or link are skipped.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>> {
    let mut reader = Reader::from_str(xml);
    let mut entries = Vec::new();
    let mut current: Option<FeedEntry> = None;
    let mut open: Option<OpenField> = None;

    loop {
        let event = reader
            .read_event()
            .with_context(|| format!("Malformed feed XML near byte {}", reader.buffer_position()))?;

        match event {
            Event::Start(ref e) => {
                let name = e.local_name().as_ref().to_vec();
                if is_entry_tag(&name) {
                    current = Some(FeedEntry::default());
                    open = None;
                } else if let Some(entry) = current.as_mut() {
                    if name == b"link" {
                        apply_link_href(entry, e);
                    }
                    if open.is_none() {
                        if let Some(field) = Field::from_local_name(&name) {
                            open = Some(OpenField {
                                field,
                                tag: name,
                                text: String::new(),
                            });
                        }
                    }
                }
            }
            Event::Empty(ref e) => {
                if let Some(entry) = current.as_mut() {
                    if e.local_name().as_ref() == b"link" {
                        apply_link_href(entry, e);
                    }
                }
            }
            Event::Text(ref t) => {
                if let Some(field) = open.as_mut() {
                    field.text.push_str(&String::from_utf8_lossy(t));
                }
            }
            Event::CData(ref c) => {
                if let Some(field) = open.as_mut() {
                    field.text.push_str(&String::from_utf8_lossy(c));
                }
            }
            Event::GeneralRef(ref r) => {
                if let Some(field) = open.as_mut() {
                    let name = String::from_utf8_lossy(r);
                    field.text.push_str(&resolve_entity(&name));
                }
            }
            Event::End(ref e) => {
                let name = e.local_name().as_ref().to_vec();
                if is_entry_tag(&name) {
                    if let Some(entry) = current.take() {
                        if !entry.title.is_empty() && !entry.link.is_empty() {
                            entries.push(entry);
                        }
                    }
                    open = None;
                } else if open.as_ref().is_some_and(|f| f.tag == name) {
                    if let (Some(field), Some(entry)) = (open.take(), current.as_mut()) {
                        commit(entry, field.field, field.text.trim());
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}

fn is_entry_tag(name: &[u8]) -> bool {
    name == b"item" || name == b"entry"
}

/// Atom links carry the URL in `href`; only `alternate` (or unlabelled) links count
fn apply_link_href(entry: &mut FeedEntry, element: &BytesStart) {
    if !entry.link.is_empty() {
        return;
    }

    let mut href = None;
    let mut rel = None;
    for attr in element.attributes().flatten() {
        let value = String::from_utf8_lossy(&attr.value).into_owned();
        match attr.key.local_name().as_ref() {
            b"href" => href = Some(value),
            b"rel" => rel = Some(value),
            _ => {}
        }
    }

    if let Some(href) = href {
        if rel.as_deref().map_or(true, |r| r == "alternate") {
            entry.link = href.trim().to_string();
        }
    }
}

fn commit(entry: &mut FeedEntry, field: Field, text: &str) {
    if text.is_empty() {
        return;
    }

    match field {
        Field::Title => entry.title = text.to_string(),
        Field::Link => {
            if entry.link.is_empty() {
                entry.link = text.to_string();
            }
        }
        Field::Author => {
            if entry.author.is_none() {
                entry.author = Some(text.to_string());
            }
        }
        Field::Summary => {
            if entry.summary.is_empty() {
                entry.summary = text.to_string();
            }
        }
        Field::Published => {
            if entry.published.is_none() {
                entry.published = Some(text.to_string());
            }
        }
        Field::Location => entry.location = Some(text.to_string()),
    }
}

/// Resolve a character or predefined entity reference. Unknown names are kept verbatim.
fn resolve_entity(name: &str) -> String {
    if let Some(code) = name.strip_prefix('#') {
        let parsed = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        if let Some(c) = parsed.and_then(char::from_u32) {
            return c.to_string();
        }
    }

    match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        _ => return format!("&{};", name),
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>Ofertas de empleo</title>
    <link>https://www.infojobs.net</link>
    <item>
      <title>Data Analyst</title>
      <link>https://www.infojobs.net/job-1</link>
      <dc:creator>Acme Analytics</dc:creator>
      <description>&lt;p&gt;SQL &amp;amp; Python in Madrid&lt;/p&gt;</description>
      <pubDate>Mon, 02 Jun 2025 09:30:00 +0200</pubDate>
    </item>
    <item>
      <title><![CDATA[BI Developer]]></title>
      <link>https://www.infojobs.net/job-2</link>
      <description><![CDATA[<b>Power BI</b> dashboards]]></description>
    </item>
    <item>
      <title>Missing link</title>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Jobs</title>
  <link href="https://jobs.example.com/"/>
  <entry>
    <title>Big Data Engineer</title>
    <link rel="self" href="https://jobs.example.com/feed/3"/>
    <link rel="alternate" href="https://jobs.example.com/jobs/3"/>
    <author><name>DataCorp</name></author>
    <summary>Spark and Databricks</summary>
    <updated>2025-06-02T08:00:00Z</updated>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_rss_items() {
        let entries = parse_feed(RSS).unwrap();
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.title, "Data Analyst");
        assert_eq!(first.link, "https://www.infojobs.net/job-1");
        assert_eq!(first.author.as_deref(), Some("Acme Analytics"));
        assert_eq!(first.summary, "<p>SQL &amp; Python in Madrid</p>");
        assert_eq!(
            first.published.as_deref(),
            Some("Mon, 02 Jun 2025 09:30:00 +0200")
        );

        let second = &entries[1];
        assert_eq!(second.title, "BI Developer");
        assert_eq!(second.summary, "<b>Power BI</b> dashboards");
        assert!(second.author.is_none());
    }

    #[test]
    fn test_channel_fields_are_not_entries() {
        let entries = parse_feed(RSS).unwrap();
        assert!(entries.iter().all(|e| e.title != "Ofertas de empleo"));
    }

    #[test]
    fn test_parse_atom_entry() {
        let entries = parse_feed(ATOM).unwrap();
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.link, "https://jobs.example.com/jobs/3");
        assert_eq!(entry.author.as_deref(), Some("DataCorp"));
        assert_eq!(entry.summary, "Spark and Databricks");
        assert_eq!(entry.published.as_deref(), Some("2025-06-02T08:00:00Z"));
    }

    #[test]
    fn test_resolve_entity() {
        assert_eq!(resolve_entity("amp"), "&");
        assert_eq!(resolve_entity("#241"), "ñ");
        assert_eq!(resolve_entity("#xF1"), "ñ");
        assert_eq!(resolve_entity("eacute"), "&eacute;");
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        assert!(parse_feed("<rss><channel><item><title>x</item></rss>").is_err());
    }
}
