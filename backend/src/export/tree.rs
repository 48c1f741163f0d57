//! Hierarchical XML export (`artists.xml`).
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <Artists>
//!   <Artist>
//!     <Name>T^r^nt^</Name>
//!     <Id>A1</Id>
//!     <Tags>
//!       <Tag>rock</Tag>
//!       <Tag>indie</Tag>
//!     </Tags>
//!   </Artist>
//!   <Artist>
//!     <Name>^sl^</Name>
//!     <Id>A2</Id>
//!     <Tags/>
//!   </Artist>
//! </Artists>
//! ```
//!
//! Every [`ArtistNode`] is complete before it is written under the root, and
//! the document is rendered in memory before it touches the destination.
//! Markup characters are escaped. Characters XML 1.0 cannot carry at all
//! (most C0 controls, U+FFFE, U+FFFF) fail the export instead.

use std::fmt::Display;
use std::io::Write;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::sink::write_atomic;
use crate::error::{ExportError, ExportResult};
use crate::models::{ArtistCollection, ArtistRecord};

pub const ROOT_ELEMENT: &str = "Artists";
pub const ARTIST_ELEMENT: &str = "Artist";
pub const NAME_ELEMENT: &str = "Name";
pub const ID_ELEMENT: &str = "Id";
pub const TAGS_ELEMENT: &str = "Tags";
pub const TAG_ELEMENT: &str = "Tag";

// =============================================================================
// Artist subtree
// =============================================================================

/// One fully assembled `Artist` subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistNode {
    name: String,
    id: String,
    tags: Vec<String>,
}

impl ArtistNode {
    pub fn new(name: impl Into<String>, id: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            tags,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    fn write_to<W: Write>(&self, xml: &mut Writer<W>) -> ExportResult<()> {
        xml.write_event(Event::Start(BytesStart::new(ARTIST_ELEMENT)))
            .map_err(xml_error)?;
        write_text_element(xml, NAME_ELEMENT, &self.name)?;
        write_text_element(xml, ID_ELEMENT, &self.id)?;

        if self.tags.is_empty() {
            xml.write_event(Event::Empty(BytesStart::new(TAGS_ELEMENT)))
                .map_err(xml_error)?;
        } else {
            xml.write_event(Event::Start(BytesStart::new(TAGS_ELEMENT)))
                .map_err(xml_error)?;
            for tag in &self.tags {
                write_text_element(xml, TAG_ELEMENT, tag)?;
            }
            xml.write_event(Event::End(BytesEnd::new(TAGS_ELEMENT)))
                .map_err(xml_error)?;
        }

        xml.write_event(Event::End(BytesEnd::new(ARTIST_ELEMENT)))
            .map_err(xml_error)?;
        Ok(())
    }
}

impl From<&ArtistRecord> for ArtistNode {
    fn from(record: &ArtistRecord) -> Self {
        Self::new(
            record.display_name(),
            record.id(),
            record.tag_names().to_vec(),
        )
    }
}

fn xml_error(err: impl Display) -> ExportError {
    ExportError::Xml(err.to_string())
}

/// `Char` production of XML 1.0.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Write `<name>text</name>`, escaping `text`.
fn write_text_element<W: Write>(xml: &mut Writer<W>, name: &str, text: &str) -> ExportResult<()> {
    if let Some(bad) = text.chars().find(|c| !is_xml_char(*c)) {
        return Err(ExportError::Xml(format!(
            "<{name}> text {text:?} contains U+{:04X}, which XML 1.0 does not allow",
            bad as u32
        )));
    }
    xml.write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_error)?;
    xml.write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_error)?;
    xml.write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_error)?;
    Ok(())
}

// =============================================================================
// Rendering
// =============================================================================

/// Render the whole document in memory.
pub fn render_tree(collection: &ArtistCollection) -> ExportResult<String> {
    let nodes: Vec<ArtistNode> = collection.iter().map(ArtistNode::from).collect();

    let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    xml.write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))
        .map_err(xml_error)?;
    for node in &nodes {
        node.write_to(&mut xml)?;
    }
    xml.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))
        .map_err(xml_error)?;

    let mut bytes = xml.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(xml_error)
}

/// Render and write the document. A failure leaves `path` as it was.
pub fn export_tree(collection: &ArtistCollection, path: &Path) -> ExportResult<()> {
    let document = render_tree(collection)?;
    write_atomic(path, document.as_bytes())
}

// =============================================================================
// Parsing
// =============================================================================

#[derive(Default)]
struct PartialArtist {
    name: Option<String>,
    id: Option<String>,
    tags: Vec<String>,
}

impl PartialArtist {
    fn finish(self, position: usize) -> ExportResult<ArtistNode> {
        let name = self.name.ok_or_else(|| {
            ExportError::Xml(format!("Artist {position} has no {NAME_ELEMENT} element"))
        })?;
        let id = self.id.ok_or_else(|| {
            ExportError::Xml(format!("Artist {position} has no {ID_ELEMENT} element"))
        })?;
        Ok(ArtistNode::new(name, id, self.tags))
    }
}

/// Read an `Artists` document back into nodes, in document order.
///
/// Text is unescaped and kept as written (no trimming) so that names with
/// surrounding whitespace survive the round trip.
pub fn parse_tree(xml: &str) -> ExportResult<Vec<ArtistNode>> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut current: Option<PartialArtist> = None;
    let mut nodes = Vec::new();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if stack.is_empty() && name != ROOT_ELEMENT {
                    return Err(ExportError::Xml(format!(
                        "expected root <{ROOT_ELEMENT}>, found <{name}>"
                    )));
                }
                if name == ARTIST_ELEMENT {
                    current = Some(PartialArtist::default());
                }
                text.clear();
                stack.push(name);
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if stack.is_empty() {
                    if name != ROOT_ELEMENT {
                        return Err(ExportError::Xml(format!(
                            "expected root <{ROOT_ELEMENT}>, found <{name}>"
                        )));
                    }
                    return Ok(nodes);
                }
                if name == ARTIST_ELEMENT {
                    return Err(ExportError::Xml(format!("Artist {} is empty", nodes.len())));
                }
                if let Some(artist) = current.as_mut() {
                    match name.as_str() {
                        NAME_ELEMENT => artist.name = Some(String::new()),
                        ID_ELEMENT => artist.id = Some(String::new()),
                        TAG_ELEMENT => artist.tags.push(String::new()),
                        _ => {}
                    }
                }
            }
            Event::Text(e) => {
                if is_leaf(stack.last()) {
                    text.push_str(&e.unescape().map_err(xml_error)?);
                }
            }
            Event::CData(e) => {
                if is_leaf(stack.last()) {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(_) => {
                let name = stack.pop().unwrap_or_default();
                if name == ARTIST_ELEMENT {
                    if let Some(artist) = current.take() {
                        nodes.push(artist.finish(nodes.len())?);
                    }
                } else if let Some(artist) = current.as_mut() {
                    match name.as_str() {
                        NAME_ELEMENT => artist.name = Some(std::mem::take(&mut text)),
                        ID_ELEMENT => artist.id = Some(std::mem::take(&mut text)),
                        TAG_ELEMENT => artist.tags.push(std::mem::take(&mut text)),
                        _ => {}
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ExportError::Xml("unexpected end of document".to_string()));
    }
    Ok(nodes)
}

fn is_leaf(element: Option<&String>) -> bool {
    matches!(
        element.map(String::as_str),
        Some(NAME_ELEMENT | ID_ELEMENT | TAG_ELEMENT)
    )
}
