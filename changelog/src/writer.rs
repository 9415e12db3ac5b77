use crate::config::MergeConfig;
use crate::document::{Document, Element, Node};
use crate::error::{ChangelogError, ResultExt};
use crate::types::Result;
use quick_xml::Writer;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Serializes a document with an XML declaration, indenting nested elements
/// by `indent` spaces.
pub fn to_xml_string(document: &Document, indent: usize) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', indent);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    write_element(&mut writer, document.root())?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|e| ChangelogError::Utf8(e.utf8_error()))
}

pub fn save(document: &Document, path: &Path, indent: usize) -> Result<()> {
    let xml = to_xml_string(document, indent)?;
    fs::write(path, xml).with_path_context("Failed to write changelog", path)?;
    info!(path = %path.display(), "wrote merged changelog");
    Ok(())
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name());
    for (key, value) in element.raw_attributes() {
        start.push_attribute(Attribute {
            key: QName(key.as_bytes()),
            value: double_quoted(value),
        });
    }

    if element.children().is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in element.children() {
        match child {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => {
                writer.write_event(Event::Text(BytesText::from_escaped(text.as_str())))?;
            }
            Node::CData(data) => writer.write_event(Event::CData(BytesCData::new(data.as_str())))?,
            Node::Comment(comment) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))?;
            }
            Node::ProcessingInstruction(content) => {
                writer.write_event(Event::PI(BytesPI::new(content.as_str())))?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name())))?;
    Ok(())
}

/// Raw values from single-quoted source attributes may hold `"`, which has
/// to be escaped once the value is written between double quotes.
fn double_quoted(raw: &str) -> Cow<'_, [u8]> {
    if raw.contains('"') {
        Cow::Owned(raw.replace('"', "&quot;").into_bytes())
    } else {
        Cow::Borrowed(raw.as_bytes())
    }
}

/// Number of entries below `root` that were not inserted by the merge
pub fn count_original_entries(root: &Element, config: &MergeConfig) -> Result<usize> {
    let mut count = 0;
    for entry in root.descendants_named(&config.entry_element) {
        let synthetic = entry
            .attribute(&config.id_attribute)?
            .is_some_and(|id| config.is_synthetic(&id));
        if !synthetic {
            count += 1;
        }
    }
    Ok(count)
}

/// Checks that merging neither lost nor duplicated an original entry.
///
/// Returns the number of original entries on success.
pub fn validate_entry_count(
    original: &Document,
    merged: &Document,
    config: &MergeConfig,
) -> Result<usize> {
    let expected = count_original_entries(original.root(), config)?;
    let actual = count_original_entries(merged.root(), config)?;

    if expected != actual {
        return Err(ChangelogError::EntryCountMismatch { expected, actual });
    }
    Ok(actual)
}
