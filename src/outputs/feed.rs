//! RSS 2.0 feed generation.
//!
//! The feed is fully regenerated from the history list on every run; the
//! file on disk is never patched incrementally. Channel metadata is fixed,
//! one `<item>` per history entry, and all text goes through the XML
//! writer's escaping. An empty history still produces a valid document.

use crate::models::Entry;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::error::Error;
use std::io::Write;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Feed filename under the output directory.
pub const FEED_FILENAME: &str = "comics.xml";

const FEED_TITLE: &str = "My Daily Comics";
const FEED_LINK: &str = "https://www.gocomics.com";
const FEED_DESCRIPTION: &str = "Private RSS feed for daily comic strips";
const FEED_LANGUAGE: &str = "en";

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

/// Render the history list as an RSS 2.0 document.
pub fn render_feed(entries: &[Entry]) -> Result<String, Box<dyn Error>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    text_element(&mut writer, "title", FEED_TITLE)?;
    text_element(&mut writer, "link", FEED_LINK)?;
    text_element(&mut writer, "description", FEED_DESCRIPTION)?;
    text_element(&mut writer, "language", FEED_LANGUAGE)?;

    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("item")))?;

        let mut guid = BytesStart::new("guid");
        guid.push_attribute(("isPermaLink", "false"));
        writer.write_event(Event::Start(guid))?;
        writer.write_event(Event::Text(BytesText::new(&entry.id)))?;
        writer.write_event(Event::End(BytesEnd::new("guid")))?;

        text_element(&mut writer, "title", &entry.title)?;
        text_element(&mut writer, "link", &entry.link)?;
        text_element(&mut writer, "pubDate", &entry.date.to_rfc2822())?;
        text_element(&mut writer, "description", &entry.html)?;

        writer.write_event(Event::End(BytesEnd::new("item")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    Ok(String::from_utf8(writer.into_inner())?)
}

/// Render and write the feed document under the output directory.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_feed(output_dir: &Path, entries: &[Entry]) -> Result<(), Box<dyn Error>> {
    let document = render_feed(entries)?;
    let path = output_dir.join(FEED_FILENAME);
    fs::write(&path, document).await?;
    info!(path = %path.display(), items = entries.len(), "Wrote feed");
    Ok(())
}
