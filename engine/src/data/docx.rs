// Word-processing document container: a .docx zip archive whose body lives in word/document.xml.
// Every other archive entry is written back byte for byte in its original order.

use crate::data::xml_tree::{XmlDocument, XmlElement, XmlNode};
use crate::error::EngineError;
use crate::models::RunSequence;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const DOCUMENT_PART: &str = "word/document.xml";
pub const DEFAULT_HIGHLIGHT_FILL: &str = "FFFF00";

const WORDML_NAMESPACES: [&str; 2] = [
    "http://schemas.openxmlformats.org/wordprocessingml/2006/main",
    "http://purl.oclc.org/ooxml/wordprocessingml/main",
];

const SOFT_HYPHEN: char = '\u{AD}';

/// Qualified names of the WordprocessingML elements and attributes, as prefixed in this part.
#[derive(Debug, Clone)]
struct WordNames {
    body: String,
    paragraph: String,
    table: String,
    table_row: String,
    table_cell: String,
    run: String,
    run_properties: String,
    shading: String,
    text: String,
    tab: String,
    positional_tab: String,
    line_break: String,
    carriage_return: String,
    no_break_hyphen: String,
    soft_hyphen: String,
    fill: String,
    val: String,
    break_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunContent {
    Text,
    Tab,
    LineBreak,
    NoBreakHyphen,
    SoftHyphen,
}

impl WordNames {
    fn new(element_prefix: &str, attribute_prefix: &str) -> Self {
        let el = |local: &str| format!("{element_prefix}{local}");
        let attr = |local: &str| format!("{attribute_prefix}{local}");
        WordNames {
            body: el("body"),
            paragraph: el("p"),
            table: el("tbl"),
            table_row: el("tr"),
            table_cell: el("tc"),
            run: el("r"),
            run_properties: el("rPr"),
            shading: el("shd"),
            text: el("t"),
            tab: el("tab"),
            positional_tab: el("ptab"),
            line_break: el("br"),
            carriage_return: el("cr"),
            no_break_hyphen: el("noBreakHyphen"),
            soft_hyphen: el("softHyphen"),
            fill: attr("fill"),
            val: attr("val"),
            break_type: attr("type"),
        }
    }

    /// Elements take the prefix of the root `document` element. Attributes need a named prefix,
    /// so they use whichever `xmlns:*` the root binds to the WordprocessingML namespace.
    fn for_root(root: &XmlElement) -> Self {
        let element_prefix = match root.name.split_once(':') {
            Some((prefix, _)) => format!("{prefix}:"),
            None => String::new(),
        };
        let attribute_prefix = root
            .attributes
            .iter()
            .filter(|(_, uri)| WORDML_NAMESPACES.contains(&uri.as_str()))
            .find_map(|(key, _)| key.strip_prefix("xmlns:"))
            .map(|prefix| format!("{prefix}:"))
            .unwrap_or_else(|| element_prefix.clone());
        Self::new(&element_prefix, &attribute_prefix)
    }

    fn run_content(&self, element: &XmlElement) -> Option<RunContent> {
        let name = element.name.as_str();
        if name == self.text {
            Some(RunContent::Text)
        } else if name == self.tab || name == self.positional_tab {
            Some(RunContent::Tab)
        } else if name == self.carriage_return {
            Some(RunContent::LineBreak)
        } else if name == self.line_break {
            // Page and column breaks are layout, not text.
            match element.attribute(&self.break_type) {
                None | Some("textWrapping") => Some(RunContent::LineBreak),
                Some(_) => None,
            }
        } else if name == self.no_break_hyphen {
            Some(RunContent::NoBreakHyphen)
        } else if name == self.soft_hyphen {
            Some(RunContent::SoftHyphen)
        } else {
            None
        }
    }
}

struct ArchiveEntry {
    name: String,
    data: Vec<u8>,
    is_dir: bool,
}

pub struct DocxDocument {
    entries: Vec<ArchiveEntry>,
    document: XmlDocument,
    names: WordNames,
    highlight_fill: String,
}

impl DocxDocument {
    pub fn open(path: &Path) -> Result<Self, EngineError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EngineError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| EngineError::archive(format!("Failed to open archive: {e}")))?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            entries.push(ArchiveEntry {
                name: file.name().to_string(),
                data,
                is_dir: file.is_dir(),
            });
        }

        let part = entries
            .iter()
            .find(|entry| entry.name == DOCUMENT_PART)
            .ok_or_else(|| EngineError::invalid_document(format!("missing {DOCUMENT_PART}")))?;
        let document = XmlDocument::parse(&part.data)?;
        let names = WordNames::for_root(&document.root);
        if document.root.find_child(&names.body).is_none() {
            return Err(EngineError::invalid_document(format!(
                "{DOCUMENT_PART} has no {} element",
                names.body
            )));
        }

        Ok(Self {
            entries,
            document,
            names,
            highlight_fill: DEFAULT_HIGHLIGHT_FILL.to_string(),
        })
    }

    pub fn with_highlight_fill(mut self, fill: &str) -> Self {
        self.highlight_fill = fill.to_string();
        self
    }

    /// Paragraphs that are direct children of the body, in document order.
    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = DocxParagraph<'_>> + '_ {
        let names = &self.names;
        let fill = self.highlight_fill.as_str();
        self.document
            .root
            .find_child_mut(&names.body)
            .into_iter()
            .flat_map(move |body| body.children_named_mut(&names.paragraph))
            .map(move |element| DocxParagraph {
                element,
                names,
                highlight_fill: fill,
            })
    }

    /// Tables that are direct children of the body, in document order.
    pub fn tables_mut(&mut self) -> impl Iterator<Item = DocxTable<'_>> + '_ {
        let names = &self.names;
        let fill = self.highlight_fill.as_str();
        self.document
            .root
            .find_child_mut(&names.body)
            .into_iter()
            .flat_map(move |body| body.children_named_mut(&names.table))
            .map(move |element| DocxTable {
                element,
                names,
                highlight_fill: fill,
            })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, EngineError> {
        let document_xml = self.document.to_bytes()?;

        let mut buffer = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(&mut buffer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in &self.entries {
            if entry.is_dir {
                zip.add_directory(entry.name.as_str(), options)?;
                continue;
            }
            zip.start_file(entry.name.as_str(), options)?;
            if entry.name == DOCUMENT_PART {
                zip.write_all(&document_xml)?;
            } else {
                zip.write_all(&entry.data)?;
            }
        }
        zip.finish()?;

        Ok(buffer.into_inner())
    }

    /// Writes the archive to a temporary file beside `path` and renames it into place, so `path`
    /// keeps its previous content unless the whole save succeeds.
    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        let bytes = self.to_bytes()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(&bytes)?;
        staged.as_file().sync_all()?;
        if let Some(existing) = std::fs::metadata(path).ok().filter(|meta| meta.is_file()) {
            staged.as_file().set_permissions(existing.permissions())?;
        }
        staged.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn entry_data(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.data.as_slice())
    }
}

pub struct DocxTable<'d> {
    element: &'d mut XmlElement,
    names: &'d WordNames,
    highlight_fill: &'d str,
}

impl DocxTable<'_> {
    /// Paragraphs directly inside each cell, row by row. Tables nested in a cell are skipped.
    pub fn cell_paragraphs_mut(&mut self) -> impl Iterator<Item = DocxParagraph<'_>> + '_ {
        let names = self.names;
        let fill = self.highlight_fill;
        self.element
            .children_named_mut(&names.table_row)
            .flat_map(move |row| row.children_named_mut(&names.table_cell))
            .flat_map(move |cell| cell.children_named_mut(&names.paragraph))
            .map(move |element| DocxParagraph {
                element,
                names,
                highlight_fill: fill,
            })
    }
}

/// A paragraph element whose direct run children are its runs.
pub struct DocxParagraph<'d> {
    element: &'d mut XmlElement,
    names: &'d WordNames,
    highlight_fill: &'d str,
}

impl DocxParagraph<'_> {
    fn run(&self, index: usize) -> Option<&XmlElement> {
        self.element.children_named(&self.names.run).nth(index)
    }

    fn run_mut(&mut self, index: usize) -> Option<&mut XmlElement> {
        let names = self.names;
        self.element.children_named_mut(&names.run).nth(index)
    }
}

impl RunSequence for DocxParagraph<'_> {
    fn run_count(&self) -> usize {
        self.element.children_named(&self.names.run).count()
    }

    fn run_text(&self, index: usize) -> String {
        self.run(index)
            .map(|run| read_run_text(run, self.names))
            .unwrap_or_default()
    }

    fn set_run_text(&mut self, index: usize, text: &str) {
        let names = self.names;
        if let Some(run) = self.run_mut(index) {
            write_run_text(run, text, names);
        }
    }

    fn is_highlighted(&self, index: usize) -> bool {
        self.run(index)
            .and_then(|run| run.find_child(&self.names.run_properties))
            .and_then(|props| props.find_child(&self.names.shading))
            .and_then(|shading| shading.attribute(&self.names.fill))
            .is_some_and(|fill| fill.eq_ignore_ascii_case(self.highlight_fill))
    }

    fn highlight_run(&mut self, index: usize) {
        let names = self.names;
        let fill = self.highlight_fill;
        if let Some(run) = self.run_mut(index) {
            // Run properties must be the first child of a run.
            let shading = run
                .child_or_insert(&names.run_properties, true)
                .child_or_insert(&names.shading, false);
            if shading.attribute(&names.val).is_none() {
                shading.set_attribute(&names.val, "clear");
            }
            shading.set_attribute(&names.fill, fill);
        }
    }
}

fn read_run_text(run: &XmlElement, names: &WordNames) -> String {
    let mut text = String::new();
    for child in run.child_elements() {
        match names.run_content(child) {
            Some(RunContent::Text) => text.push_str(&child.text()),
            Some(RunContent::Tab) => text.push('\t'),
            Some(RunContent::LineBreak) => text.push('\n'),
            Some(RunContent::NoBreakHyphen) => text.push('-'),
            Some(RunContent::SoftHyphen) => text.push(SOFT_HYPHEN),
            None => {}
        }
    }
    text
}

/// Replaces the run's text content, leaving its properties and any non-text content in place.
fn write_run_text(run: &mut XmlElement, text: &str, names: &WordNames) {
    let is_content =
        |node: &XmlNode| matches!(node, XmlNode::Element(el) if names.run_content(el).is_some());
    let insert_at = run.children.iter().position(is_content);
    run.children.retain(|node| !is_content(node));

    let at = insert_at.unwrap_or(run.children.len());
    let tail = run.children.split_off(at);
    run.children.extend(text_nodes(text, names));
    run.children.extend(tail);
}

fn text_nodes(text: &str, names: &WordNames) -> Vec<XmlNode> {
    let mut nodes = Vec::new();
    let mut pending = String::new();
    let flush = |pending: &mut String, nodes: &mut Vec<XmlNode>| {
        if !pending.is_empty() {
            let element = XmlElement::new(names.text.as_str())
                .with_attribute("xml:space", "preserve")
                .with_text(std::mem::take(pending));
            nodes.push(XmlNode::Element(element));
        }
    };

    for ch in text.chars() {
        let marker = match ch {
            '\t' => &names.tab,
            '\n' | '\r' => &names.line_break,
            SOFT_HYPHEN => &names.soft_hyphen,
            other => {
                pending.push(other);
                continue;
            }
        };
        flush(&mut pending, &mut nodes);
        nodes.push(XmlNode::Element(XmlElement::new(marker.as_str())));
    }
    flush(&mut pending, &mut nodes);
    nodes
}
