//! DOCX (WordprocessingML) structural extraction.
//!
//! A DOCX file is a ZIP package. The parts read here:
//! - `word/document.xml`: body paragraphs and tables
//! - `word/styles.xml`: style ids to display names (heading detection)
//! - `word/_rels/document.xml.rels`: relationship ids to header/footer parts
//! - `word/headerN.xml` / `word/footerN.xml`: first section's default header/footer

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};

use roxmltree::{Document, Node};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::model::{Block, Table, MAX_HEADING_LEVEL};
use crate::render::render_blocks;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";
const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// Style name used when a paragraph carries no style reference.
const DEFAULT_STYLE_NAME: &str = "Normal";

/// A structural element of the document body, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyElement {
    /// A body paragraph.
    Paragraph(Paragraph),
    /// A body table as rows of cell text, merged cells expanded.
    Table(Vec<Vec<Option<String>>>),
}

/// Paragraph content and the properties that drive its formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    /// Concatenated run text
    pub text: String,
    /// Referenced paragraph style id (`w:pStyle`)
    pub style_id: Option<String>,
    /// Whether the paragraph has direct list numbering (`w:numPr`)
    pub numbered: bool,
}

/// Style id to display name mapping from `word/styles.xml`.
#[derive(Debug, Clone, Default)]
pub struct StyleMap {
    names: HashMap<String, String>,
    default_paragraph: Option<String>,
}

impl StyleMap {
    /// Parse a styles part. Styles without a name are skipped.
    pub fn parse(xml: &str) -> Result<Self> {
        let doc = Document::parse(xml)?;
        let mut map = StyleMap::default();

        for style in doc.descendants().filter(|n| is_w(n, "style")) {
            let Some(id) = w_attr(&style, "styleId") else {
                continue;
            };
            let Some(name) = child(&style, "name").and_then(|n| w_attr(&n, "val")) else {
                continue;
            };

            let is_default = matches!(w_attr(&style, "default"), Some("1") | Some("true"));
            if is_default && w_attr(&style, "type") == Some("paragraph") {
                map.default_paragraph = Some(name.to_string());
            }
            map.names.insert(id.to_string(), name.to_string());
        }

        Ok(map)
    }

    /// Resolve the display name of a paragraph style.
    ///
    /// Unknown ids resolve to the id itself, not to the default paragraph
    /// style, so `Heading3` in a package without `styles.xml` still reads as
    /// a level 3 heading. A missing style reference resolves to the default
    /// paragraph style.
    pub fn resolve<'a>(&'a self, style_id: Option<&'a str>) -> &'a str {
        match style_id {
            Some(id) => self.names.get(id).map(String::as_str).unwrap_or(id),
            None => self
                .default_paragraph
                .as_deref()
                .unwrap_or(DEFAULT_STYLE_NAME),
        }
    }
}

/// Extract the text of a DOCX package.
///
/// Output blocks, joined by a blank line: the first section's default header,
/// body paragraphs and tables in document order, then the first section's
/// default footer.
pub fn extract_docx(data: &[u8]) -> Result<String> {
    let blocks = docx_blocks(data)?;
    Ok(render_blocks(&blocks))
}

/// Extract the ordered blocks of a DOCX package.
pub fn docx_blocks(data: &[u8]) -> Result<Vec<Block>> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;

    let document_xml = read_part(&mut archive, DOCUMENT_PART)?
        .ok_or_else(|| Error::malformed_docx(format!("missing {}", DOCUMENT_PART)))?;
    let styles = load_styles(&mut archive);

    let doc = Document::parse(&document_xml)?;
    let body = doc
        .root_element()
        .children()
        .find(|n| is_w(n, "body"))
        .ok_or_else(|| Error::malformed_docx("document has no body"))?;

    let elements = body_elements(body);
    log::debug!("DOCX body has {} structural elements", elements.len());

    // Header and footer of the first section only.
    let section = body.descendants().find(|n| is_w(n, "sectPr"));
    let (header, footer) = match section {
        Some(section) => {
            let rels = load_relationships(&mut archive);
            (
                header_footer_block(&mut archive, &rels, section, "headerReference"),
                header_footer_block(&mut archive, &rels, section, "footerReference"),
            )
        }
        None => (None, None),
    };

    let mut blocks = Vec::with_capacity(elements.len() + 2);
    blocks.extend(header);
    for element in elements {
        if let Some(block) = element_to_block(element, &styles) {
            blocks.push(block);
        }
    }
    blocks.extend(footer);

    Ok(blocks)
}

/// Collect the paragraphs and tables that are direct children of the body.
pub fn body_elements(body: Node) -> Vec<BodyElement> {
    body.children()
        .filter_map(|node| {
            if is_w(&node, "p") {
                Some(BodyElement::Paragraph(read_paragraph(node)))
            } else if is_w(&node, "tbl") {
                Some(BodyElement::Table(table_rows(node)))
            } else {
                None
            }
        })
        .collect()
}

fn element_to_block(element: BodyElement, styles: &StyleMap) -> Option<Block> {
    match element {
        BodyElement::Paragraph(paragraph) => format_paragraph(&paragraph, styles),
        BodyElement::Table(rows) => {
            let table = Table::from_cells(rows);
            (!table.is_empty()).then_some(Block::Table(table))
        }
    }
}

/// Turn a paragraph into a heading, list item or plain paragraph block.
///
/// Whitespace-only paragraphs produce no block.
pub fn format_paragraph(paragraph: &Paragraph, styles: &StyleMap) -> Option<Block> {
    let text = paragraph.text.trim();
    if text.is_empty() {
        return None;
    }

    let style_name = styles
        .resolve(paragraph.style_id.as_deref())
        .to_lowercase();

    if let Some(rest) = style_name.strip_prefix("heading") {
        return Some(Block::heading(heading_level(rest), text));
    }

    if paragraph.numbered {
        return Some(Block::ListItem(text.to_string()));
    }

    Some(Block::Paragraph(text.to_string()))
}

/// Parse the level suffix of a heading style name ("heading 2" → 2).
///
/// Unparseable or out-of-range suffixes give level 1.
fn heading_level(suffix: &str) -> u8 {
    suffix
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|level| (1..=MAX_HEADING_LEVEL).contains(level))
        .unwrap_or(1)
}

fn read_paragraph(p: Node) -> Paragraph {
    let props = child(&p, "pPr");
    Paragraph {
        text: paragraph_text(p),
        style_id: props
            .and_then(|pr| child(&pr, "pStyle"))
            .and_then(|s| w_attr(&s, "val"))
            .map(str::to_string),
        numbered: props.and_then(|pr| child(&pr, "numPr")).is_some(),
    }
}

/// Concatenated text of a paragraph's runs.
fn paragraph_text(p: Node) -> String {
    let mut text = String::new();
    collect_run_text(p, &mut text);
    text
}

fn collect_run_text(node: Node, out: &mut String) {
    for child in node.children().filter(|n| n.is_element()) {
        if child.tag_name().namespace() != Some(W_NS) {
            continue;
        }
        match child.tag_name().name() {
            "r" | "hyperlink" | "smartTag" | "fldSimple" | "ins" => collect_run_text(child, out),
            "t" => out.push_str(child.text().unwrap_or("")),
            "tab" => out.push('\t'),
            "br" | "cr" => out.push('\n'),
            "noBreakHyphen" => out.push('-'),
            // Properties, deletions, drawings and text boxes carry no body text.
            _ => {}
        }
    }
}

/// Rows of a table with one entry per grid column.
///
/// Horizontally merged cells repeat their text across the spanned columns;
/// vertical merge continuations take the text of the cell above.
fn table_rows(tbl: Node) -> Vec<Vec<Option<String>>> {
    let mut rows: Vec<Vec<Option<String>>> = Vec::new();

    for tr in tbl.children().filter(|n| is_w(n, "tr")) {
        let mut row: Vec<Option<String>> = Vec::new();

        for tc in tr.children().filter(|n| is_w(n, "tc")) {
            let props = child(&tc, "tcPr");
            let span = props
                .and_then(|pr| child(&pr, "gridSpan"))
                .and_then(|g| w_attr(&g, "val"))
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(1)
                .max(1);
            let continues_merge = props
                .and_then(|pr| child(&pr, "vMerge"))
                .map(|m| w_attr(&m, "val") != Some("restart"))
                .unwrap_or(false);

            let text = if continues_merge {
                rows.last()
                    .and_then(|above| above.get(row.len()))
                    .cloned()
                    .flatten()
            } else {
                Some(cell_text(tc))
            };

            for _ in 0..span {
                row.push(text.clone());
            }
        }

        rows.push(row);
    }

    rows
}

/// Cell text: the cell's paragraphs joined by line breaks.
fn cell_text(tc: Node) -> String {
    tc.children()
        .filter(|n| is_w(n, "p"))
        .map(paragraph_text)
        .collect::<Vec<_>>()
        .join("\n")
}

fn header_footer_block<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    rels: &HashMap<String, String>,
    section: Node,
    reference: &str,
) -> Option<Block> {
    let rel_id = section
        .children()
        .filter(|n| is_w(n, reference))
        .find(|n| matches!(w_attr(n, "type"), None | Some("default")))
        .and_then(|n| n.attribute((R_NS, "id")))?;

    let Some(target) = rels.get(rel_id) else {
        log::warn!("DOCX {} points to unknown relationship {}", reference, rel_id);
        return None;
    };
    let part_name = resolve_target(target);

    let xml = match read_part(archive, &part_name) {
        Ok(Some(xml)) => xml,
        Ok(None) => {
            log::warn!("DOCX part {} is missing", part_name);
            return None;
        }
        Err(e) => {
            log::warn!("Failed to read DOCX part {}: {}", part_name, e);
            return None;
        }
    };

    let doc = match Document::parse(&xml) {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!("Skipping unparseable DOCX part {}: {}", part_name, e);
            return None;
        }
    };

    let lines: Vec<String> = doc
        .root_element()
        .children()
        .filter(|n| is_w(n, "p"))
        .map(|p| paragraph_text(p).trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    (!lines.is_empty()).then_some(Block::HeaderFooter(lines))
}

/// Map a relationship target to a package part name.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("word/{}", target),
    }
}

fn load_styles<R: Read + Seek>(archive: &mut ZipArchive<R>) -> StyleMap {
    let parsed = read_part(archive, STYLES_PART)
        .and_then(|xml| xml.map(|xml| StyleMap::parse(&xml)).transpose());
    match parsed {
        Ok(styles) => styles.unwrap_or_default(),
        Err(e) => {
            log::warn!("Ignoring unreadable DOCX styles: {}", e);
            StyleMap::default()
        }
    }
}

fn load_relationships<R: Read + Seek>(archive: &mut ZipArchive<R>) -> HashMap<String, String> {
    let xml = match read_part(archive, DOCUMENT_RELS_PART) {
        Ok(Some(xml)) => xml,
        Ok(None) => return HashMap::new(),
        Err(e) => {
            log::warn!("Ignoring unreadable DOCX relationships: {}", e);
            return HashMap::new();
        }
    };

    match Document::parse(&xml) {
        Ok(doc) => doc
            .descendants()
            .filter(|n| n.has_tag_name("Relationship"))
            .filter_map(|n| Some((n.attribute("Id")?.to_string(), n.attribute("Target")?.to_string())))
            .collect(),
        Err(e) => {
            log::warn!("Ignoring unparseable DOCX relationships: {}", e);
            HashMap::new()
        }
    }
}

/// Read a package part as text. A missing part is `Ok(None)`.
fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut buf = Vec::new();
    file.read_to_end(&mut buf)
        .map_err(|e| Error::malformed_docx(format!("cannot read {}: {}", name, e)))?;

    let mut text = String::from_utf8(buf)
        .map_err(|_| Error::malformed_docx(format!("{} is not valid UTF-8", name)))?;
    if text.starts_with('\u{feff}') {
        text.replace_range(..'\u{feff}'.len_utf8(), "");
    }

    Ok(Some(text))
}

fn is_w(node: &Node, name: &str) -> bool {
    node.is_element() && node.has_tag_name((W_NS, name))
}

fn w_attr<'a>(node: &Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute((W_NS, name))
}

fn child<'a, 'input>(node: &Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| is_w(n, name))
}
