//! End-to-end conversion of in-memory DOCX packages.

use std::io::{Cursor, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use citekey_core::{
    BibliographyIndex, ConvertConfig, DocxContainer, FOOTNOTES_PART, MAIN_DOCUMENT_PART,
    convert_container, inspect_container,
};
use serde_json::json;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const BIBTEX: &str = r#"
@book{Smith2001,
  author = {Smith, John},
  title = {Die Ökonomie},
  year = {2001},
}

@article{Doe2010,
  author = {Doe, Jane},
  title = {Another Book},
  journal = {Journal},
  year = {2010},
}
"#;

fn placeholder(references: serde_json::Value, visible: &str) -> String {
    let payload = STANDARD.encode(json!({ "Entries": references }).to_string());
    let (head, tail) = payload.split_at(payload.len() / 3);
    format!(
        concat!(
            "<w:sdt><w:sdtPr><w:id w:val=\"1\"/></w:sdtPr><w:sdtContent>",
            "<w:r><w:fldChar w:fldCharType=\"begin\"/></w:r>",
            "<w:r><w:instrText xml:space=\"preserve\">ADDIN CitaviPlaceholder{{{}</w:instrText></w:r>",
            "<w:r><w:instrText xml:space=\"preserve\">{}}}</w:instrText></w:r>",
            "<w:r><w:fldChar w:fldCharType=\"separate\"/></w:r>",
            "<w:r><w:rPr><w:noProof/></w:rPr><w:t>{}</w:t></w:r>",
            "<w:r><w:fldChar w:fldCharType=\"end\"/></w:r>",
            "</w:sdtContent></w:sdt>"
        ),
        head, tail, visible
    )
}

fn document_xml(body: &str) -> String {
    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n",
            "<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">",
            "<w:body><w:p><w:r><w:t xml:space=\"preserve\">See </w:t></w:r>{}</w:p></w:body>",
            "</w:document>"
        ),
        body
    )
}

fn footnotes_xml(body: &str) -> String {
    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n",
            "<w:footnotes xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">",
            "<w:footnote w:id=\"1\"><w:p>{}</w:p></w:footnote>",
            "</w:footnotes>"
        ),
        body
    )
}

fn docx(parts: &[(&str, String)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer
        .start_file("[Content_Types].xml", options)
        .unwrap();
    writer.write_all(b"<Types/>").unwrap();
    for (name, content) in parts {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn smith(pages: Option<(&str, &str)>) -> serde_json::Value {
    let mut entry = json!({ "Reference": { "Title": "Die Ökonomie", "Year": "2001" } });
    if let Some((start, end)) = pages {
        entry["PageRange"] = json!({
            "StartPage": { "OriginalString": start },
            "EndPage": { "OriginalString": end }
        });
    }
    entry
}

#[test]
fn test_converts_document_and_footnotes() {
    let package = docx(&[
        (
            MAIN_DOCUMENT_PART,
            document_xml(&placeholder(json!([smith(Some(("12", "14")))]), "(Smith 2001, 12-14)")),
        ),
        (
            FOOTNOTES_PART,
            footnotes_xml(&placeholder(
                json!([smith(None), { "Reference": { "Title": "Another Book" } }]),
                "Smith 2001; Doe 2010",
            )),
        ),
    ]);

    let index = BibliographyIndex::from_bibtex(BIBTEX).unwrap();
    let mut container = DocxContainer::from_reader(Cursor::new(package)).unwrap();
    let outcome = convert_container(&mut container, &index, &ConvertConfig::default()).unwrap();

    assert_eq!(outcome.parts.len(), 2);
    assert_eq!(outcome.parts[0].output, "NEWDOC.xml");
    assert_eq!(outcome.parts[0].report.citations, 1);
    assert_eq!(outcome.parts[1].output, "NEWFN.xml");
    assert_eq!(outcome.parts[1].report.citations, 2);
    assert_eq!(outcome.total_citations(), 3);

    assert!(
        outcome.parts[0]
            .xml
            .contains("<w:t>(Smith 2001, 12-14)  [@Smith2001, 12-14]</w:t>")
    );
    assert!(
        outcome.parts[1]
            .xml
            .contains("<w:t>Smith 2001; Doe 2010  [@Smith2001] [@Doe2010]</w:t>")
    );
}

#[test]
fn test_output_keeps_untouched_markup() {
    let source = document_xml(&placeholder(json!([smith(None)]), "(Smith 2001)"));
    let package = docx(&[(MAIN_DOCUMENT_PART, source.clone())]);

    let index = BibliographyIndex::from_bibtex(BIBTEX).unwrap();
    let mut container = DocxContainer::from_reader(Cursor::new(package)).unwrap();
    let outcome = convert_container(&mut container, &index, &ConvertConfig::default()).unwrap();

    let expected = source.replace("(Smith 2001)", "(Smith 2001)  [@Smith2001]");
    assert_eq!(outcome.parts[0].xml, expected);
}

#[test]
fn test_missing_footnotes_part_is_skipped() {
    let package = docx(&[(
        MAIN_DOCUMENT_PART,
        document_xml(&placeholder(json!([smith(None)]), "(Smith 2001)")),
    )]);

    let index = BibliographyIndex::from_bibtex(BIBTEX).unwrap();
    let mut container = DocxContainer::from_reader(Cursor::new(package)).unwrap();
    let outcome = convert_container(&mut container, &index, &ConvertConfig::default()).unwrap();

    assert_eq!(outcome.parts.len(), 1);
    assert_eq!(outcome.parts[0].name, MAIN_DOCUMENT_PART);
}

#[test]
fn test_unresolved_and_malformed_placeholders() {
    let body = format!(
        "{}{}{}",
        placeholder(json!([{ "Reference": { "Title": "Unknown" } }]), "(Anon)"),
        "<w:sdt><w:sdtContent><w:r><w:instrText>ADDIN CitaviPlaceholder{!!!}</w:instrText></w:r><w:r><w:t>(Broken)</w:t></w:r></w:sdtContent></w:sdt>",
        placeholder(json!([smith(None)]), "(Smith 2001)"),
    );
    let package = docx(&[(MAIN_DOCUMENT_PART, document_xml(&body))]);

    let index = BibliographyIndex::from_bibtex(BIBTEX).unwrap();
    let mut container = DocxContainer::from_reader(Cursor::new(package)).unwrap();
    let outcome = convert_container(&mut container, &index, &ConvertConfig::default()).unwrap();
    let part = &outcome.parts[0];

    assert_eq!(part.report.elements, 3);
    assert_eq!(part.report.patched, 2);
    assert_eq!(part.report.citations, 1);
    assert!(part.xml.contains("<w:t>(Anon)  [@]</w:t>"));
    assert!(part.xml.contains("<w:t>(Broken)</w:t>"));
    assert!(part.xml.contains("<w:t>(Smith 2001)  [@Smith2001]</w:t>"));
}

#[test]
fn test_malformed_part_aborts() {
    let package = docx(&[(MAIN_DOCUMENT_PART, "<w:document><w:body>".to_string())]);

    let index = BibliographyIndex::from_bibtex(BIBTEX).unwrap();
    let mut container = DocxContainer::from_reader(Cursor::new(package)).unwrap();
    let err = convert_container(&mut container, &index, &ConvertConfig::default()).unwrap_err();

    assert!(err.to_string().contains("word/document.xml"), "{err}");
}

#[test]
fn test_patched_package_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("thesis.docx");
    let output = dir.path().join("thesis-converted.docx");
    std::fs::write(
        &input,
        docx(&[
            (
                MAIN_DOCUMENT_PART,
                document_xml(&placeholder(json!([smith(None)]), "(Smith 2001)")),
            ),
            ("word/styles.xml", "<w:styles/>".to_string()),
        ]),
    )
    .unwrap();

    let index = BibliographyIndex::from_bibtex(BIBTEX).unwrap();
    let mut container = DocxContainer::open(&input).unwrap();
    let outcome = convert_container(&mut container, &index, &ConvertConfig::default()).unwrap();
    let file = std::fs::File::create(&output).unwrap();
    container
        .write_patched(file, &outcome.replacements())
        .unwrap();

    let mut converted = DocxContainer::open(&output).unwrap();
    let body = converted.read_part(MAIN_DOCUMENT_PART).unwrap().unwrap();
    assert!(body.contains("(Smith 2001)  [@Smith2001]"));
    assert_eq!(
        converted.read_part("word/styles.xml").unwrap().as_deref(),
        Some("<w:styles/>")
    );
    assert!(converted.read_part("[Content_Types].xml").unwrap().is_some());
}

#[test]
fn test_inspect_lists_decoded_references() {
    let package = docx(&[(
        FOOTNOTES_PART,
        footnotes_xml(&placeholder(json!([smith(Some(("3", "3")))]), "(Smith 2001, 3)")),
    )]);

    let mut container = DocxContainer::from_reader(Cursor::new(package)).unwrap();
    let inspections = inspect_container(&mut container, &ConvertConfig::default()).unwrap();

    insta::assert_snapshot!(serde_json::to_string_pretty(&inspections).unwrap(), @r#"
    [
      {
        "part": "word/footnotes.xml",
        "placeholders": [
          {
            "ordinal": 0,
            "references": [
              {
                "title": "Die Ökonomie",
                "year": "2001",
                "page_start": "3",
                "page_end": "3"
              }
            ]
          }
        ]
      }
    ]
    "#);
}
