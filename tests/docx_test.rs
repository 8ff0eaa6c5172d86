//! Integration tests for DOCX extraction.

use std::io::{Cursor, Write};

use santa_extract::error::Error;
use santa_extract::parser::extract_docx;
use santa_extract::{extract, Block};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/></w:style>
  <w:style w:type="paragraph" w:styleId="HeadingX"><w:name w:val="Heading Appendix"/></w:style>
</w:styles>"#;

const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header1.xml"/>
  <Relationship Id="rId8" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="footer1.xml"/>
</Relationships>"#;

fn paragraph(text: &str) -> String {
    format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", text)
}

fn styled(style: &str, text: &str) -> String {
    format!(
        "<w:p><w:pPr><w:pStyle w:val=\"{}\"/></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>",
        style, text
    )
}

fn list_item(text: &str) -> String {
    format!(
        "<w:p><w:pPr><w:numPr><w:ilvl w:val=\"0\"/><w:numId w:val=\"1\"/></w:numPr></w:pPr>\
         <w:r><w:t>{}</w:t></w:r></w:p>",
        text
    )
}

fn table(rows: &[&[&str]]) -> String {
    let mut xml = String::from("<w:tbl>");
    for row in rows {
        xml.push_str("<w:tr>");
        for cell in *row {
            xml.push_str(&format!("<w:tc>{}</w:tc>", paragraph(cell)));
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
    xml
}

fn document(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"{}\" xmlns:r=\"{}\"><w:body>{}</w:body></w:document>",
        W_NS, R_NS, body
    )
}

fn part(root: &str, body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:{root} xmlns:w=\"{}\" xmlns:r=\"{}\">{}</w:{root}>",
        W_NS,
        R_NS,
        body,
        root = root
    )
}

/// Build a DOCX package from (part name, content) pairs.
fn package(parts: &[(&str, String)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in parts {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn simple_docx(body: &str) -> Vec<u8> {
    package(&[
        ("word/document.xml", document(body)),
        ("word/styles.xml", STYLES.to_string()),
    ])
}

#[test]
fn test_paragraph_table_paragraph_order() {
    let body = [
        paragraph("Intro"),
        table(&[&["A", "B"], &["1", "2"]]),
        paragraph("Outro"),
    ]
    .concat();

    let text = extract_docx(&simple_docx(&body)).unwrap();

    assert_eq!(text, "Intro\n\n| A | B |\n| --- | --- |\n| 1 | 2 |\n\nOutro");
}

#[test]
fn test_two_by_three_table_renders_three_lines() {
    let body = table(&[&["Name", "Qty", "Price"], &["Apple", "3", "1.20"]]);

    let text = extract_docx(&simple_docx(&body)).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "| Name | Qty | Price |",
            "| --- | --- | --- |",
            "| Apple | 3 | 1.20 |",
        ]
    );
}

#[test]
fn test_headings_and_lists() {
    let body = [
        styled("Heading1", "Report"),
        styled("Heading2", "Summary"),
        styled("HeadingX", "Appendix"),
        list_item("first point"),
        list_item("second point"),
        paragraph("   "),
        paragraph("Closing remarks."),
    ]
    .concat();

    let text = extract_docx(&simple_docx(&body)).unwrap();

    assert_eq!(
        text,
        "# Report\n\n## Summary\n\n# Appendix\n\n- first point\n\n- second point\n\nClosing remarks."
    );
}

#[test]
fn test_header_and_footer_wrap_body() {
    let body = [
        paragraph("Body text"),
        "<w:sectPr>\
         <w:headerReference w:type=\"first\" r:id=\"rId9\"/>\
         <w:headerReference w:type=\"default\" r:id=\"rId7\"/>\
         <w:footerReference w:type=\"default\" r:id=\"rId8\"/>\
         </w:sectPr>"
            .to_string(),
    ]
    .concat();
    let header = part(
        "hdr",
        &[paragraph(" ACME Corp "), paragraph(""), paragraph("Confidential")].concat(),
    );
    let footer = part("ftr", &paragraph("Page footer"));

    let data = package(&[
        ("word/document.xml", document(&body)),
        ("word/styles.xml", STYLES.to_string()),
        ("word/_rels/document.xml.rels", RELS.to_string()),
        ("word/header1.xml", header),
        ("word/footer1.xml", footer),
    ]);

    let result = extract(&data, "docx").unwrap();

    assert_eq!(
        result.text,
        "ACME Corp\nConfidential\n\nBody text\n\nPage footer"
    );
    assert_eq!(result.metadata.extraction_method, "ooxml");
    assert_eq!(result.metadata.page_count, None);
    assert_eq!(result.metadata.table_count, 0);
}

#[test]
fn test_missing_header_part_is_skipped() {
    let body = [
        paragraph("Body text"),
        "<w:sectPr><w:headerReference w:type=\"default\" r:id=\"rId7\"/></w:sectPr>".to_string(),
    ]
    .concat();

    let data = package(&[
        ("word/document.xml", document(&body)),
        ("word/_rels/document.xml.rels", RELS.to_string()),
    ]);

    assert_eq!(extract_docx(&data).unwrap(), "Body text");
}

#[test]
fn test_first_page_only_header_is_ignored() {
    let body = [
        paragraph("Body text"),
        "<w:sectPr><w:headerReference w:type=\"first\" r:id=\"rId7\"/></w:sectPr>".to_string(),
    ]
    .concat();

    let data = package(&[
        ("word/document.xml", document(&body)),
        ("word/_rels/document.xml.rels", RELS.to_string()),
        ("word/header1.xml", part("hdr", &paragraph("Title page only"))),
    ]);

    assert_eq!(extract_docx(&data).unwrap(), "Body text");
}

#[test]
fn test_missing_styles_uses_style_ids() {
    let body = [styled("Heading3", "Deep"), paragraph("Text")].concat();
    let data = package(&[("word/document.xml", document(&body))]);

    assert_eq!(extract_docx(&data).unwrap(), "### Deep\n\nText");
}

#[test]
fn test_doc_tag_routes_to_docx() {
    let result = extract(&simple_docx(&paragraph("Legacy tag")), "DOC").unwrap();
    assert_eq!(result.text, "Legacy tag");
    assert_eq!(result.metadata.file_type, "doc");
}

#[test]
fn test_empty_document() {
    let text = extract_docx(&simple_docx("")).unwrap();
    assert_eq!(text, "");
}

#[test]
fn test_missing_document_part() {
    let data = package(&[("word/styles.xml", STYLES.to_string())]);

    let err = extract_docx(&data).unwrap_err();
    assert!(matches!(err, Error::MalformedDocument { format: "docx", .. }));
}

#[test]
fn test_invalid_document_xml() {
    let data = package(&[("word/document.xml", "<w:document><w:body>".to_string())]);

    let err = extract_docx(&data).unwrap_err();
    assert!(matches!(err, Error::MalformedDocument { format: "docx", .. }));
}

#[test]
fn test_blocks_api() {
    let body = [styled("Heading2", "Title"), table(&[&["x"]])].concat();
    let blocks = santa_extract::parser::docx_blocks(&simple_docx(&body)).unwrap();

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0], Block::heading(2, "Title"));
    assert!(matches!(blocks[1], Block::Table(_)));
}
