//! RSS 2.0 serialization of the feed document.
//!
//! The persisted feed is one `<channel>` with a fixed envelope and the
//! entries concatenated newest-first. Entry bodies are raw sanitized HTML
//! carried in a CDATA section. Loading is deliberately forgiving: a missing
//! or unreadable document yields an empty collection so a corrupt file can
//! never take the feed down.

use std::error::Error;
use std::io::Write;

use chrono::DateTime;
use chrono_tz::Tz;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{FeedEntry, RFC822_FORMAT};

/// Serialize the whole feed document.
///
/// `now` becomes the envelope's `lastBuildDate`.
pub fn write_feed(
    entries: &[FeedEntry],
    cfg: &Config,
    now: &DateTime<Tz>,
) -> Result<String, Box<dyn Error>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    text_element(&mut writer, "title", &cfg.feed_title)?;
    text_element(&mut writer, "link", &cfg.feed_link())?;
    text_element(&mut writer, "description", &cfg.feed_description)?;
    text_element(&mut writer, "language", "en-us")?;
    text_element(
        &mut writer,
        "lastBuildDate",
        &now.format(RFC822_FORMAT).to_string(),
    )?;

    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("item")))?;
        text_element(&mut writer, "title", &entry.title)?;
        text_element(&mut writer, "link", &entry.link)?;

        let mut guid = BytesStart::new("guid");
        guid.push_attribute(("isPermaLink", "false"));
        writer.write_event(Event::Start(guid))?;
        writer.write_event(Event::Text(BytesText::new(&entry.guid)))?;
        writer.write_event(Event::End(BytesEnd::new("guid")))?;

        text_element(&mut writer, "pubDate", &entry.pub_date)?;

        writer.write_event(Event::Start(BytesStart::new("description")))?;
        writer.write_event(Event::CData(BytesCData::new(entry.description.as_str())))?;
        writer.write_event(Event::End(BytesEnd::new("description")))?;

        writer.write_event(Event::End(BytesEnd::new("item")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    let mut out = writer.into_inner();
    out.write_all(b"\n")?;
    Ok(String::from_utf8(out)?)
}

fn text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), Box<dyn Error>> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Load the entry collection from a persisted feed document.
///
/// An unreadable document is treated as "no prior entries": the feed is
/// rebuilt fresh rather than halting the run on corruption.
pub fn load_feed(xml: &str) -> Vec<FeedEntry> {
    match parse_items(xml) {
        Ok(entries) => {
            debug!(count = entries.len(), "Parsed persisted feed");
            entries
        }
        Err(e) => {
            warn!(error = %e, "Existing feed is unreadable; starting with an empty collection");
            Vec::new()
        }
    }
}

fn parse_items(xml: &str) -> Result<Vec<FeedEntry>, Box<dyn Error>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<FeedEntry> = None;
    let mut field: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == "item" {
                    current = Some(FeedEntry::default());
                    field = None;
                } else if current.is_some() {
                    field = Some(name);
                }
            }
            Event::Text(t) => {
                if let (Some(item), Some(name)) = (current.as_mut(), field.as_deref()) {
                    if let Some(slot) = field_of(item, name) {
                        slot.push_str(&t.xml_content()?);
                    }
                }
            }
            Event::CData(c) => {
                if let (Some(item), Some(name)) = (current.as_mut(), field.as_deref()) {
                    if let Some(slot) = field_of(item, name) {
                        let bytes = c.into_inner();
                        slot.push_str(std::str::from_utf8(&bytes)?);
                    }
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == b"item" {
                    if let Some(item) = current.take() {
                        entries.push(item);
                    }
                } else {
                    field = None;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}

fn field_of<'a>(item: &'a mut FeedEntry, name: &str) -> Option<&'a mut String> {
    match name {
        "title" => Some(&mut item.title),
        "link" => Some(&mut item.link),
        "guid" => Some(&mut item.guid),
        "pubDate" => Some(&mut item.pub_date),
        "description" => Some(&mut item.description),
        _ => None,
    }
}
