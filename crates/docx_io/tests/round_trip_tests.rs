//! Round-trip, determinism and file I/O tests

use chrono::{TimeZone, Utc};
use doc_model::{
    AbstractNumbering, BreakType, Comment, Delete, DocProps, Document, Insert, Level, LevelJc,
    LevelOverride, NumberFormat, Numbering, PageOrientationType, Paragraph, Run, RunProperty,
    Settings, Style, StyleType, Styles, Table, TableCell, TableRow, WebExtension,
};
use docx_io::{
    build, build_with, export_docx, import_docx, json, read, read_json, BuildOptions, Compression,
};
use proptest::prelude::*;
use std::io::{Cursor, Read};

fn fixed_options() -> BuildOptions {
    BuildOptions::new().with_timestamp(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap())
}

fn entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            (file.name().to_string(), content)
        })
        .collect()
}

/// A document touching every part the package can carry
fn full_document() -> Document {
    let reply = Comment::new(2)
        .with_author("Bob")
        .with_date("2024-03-01T10:00:00Z")
        .with_parent_comment_id(1)
        .with_done(true)
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Agreed.")));
    let comment = Comment::new(1)
        .with_author("Alice")
        .with_initials("AL")
        .with_date("2024-03-01T09:00:00Z")
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Check this")));

    let styles = Styles::new().add_style(
        Style::new("Heading1", StyleType::Paragraph)
            .with_name("heading 1")
            .with_run_property(RunProperty::new().with_bold().with_size(32)),
    );

    Document::new()
        .with_styles(styles)
        .with_doc_props(
            DocProps::new()
                .with_created("2024-01-01T00:00:00Z")
                .with_updated("2024-02-01T00:00:00Z")
                .with_creator("Alice")
                .with_revision(3)
                .with_custom_property("Client", "ACME & Sons"),
        )
        .with_settings(
            Settings::default()
                .with_doc_id("{D1E2F3A4-0000-4000-8000-000000000001}")
                .add_doc_var("mergeField", "value"),
        )
        .with_page_size(16838, 11906)
        .with_page_orient(PageOrientationType::Landscape)
        .add_abstract_numbering(AbstractNumbering::new(0).add_level(Level::new(
            0,
            1,
            NumberFormat::Decimal,
            "%1.",
            LevelJc::Left,
        )))
        .add_numbering(
            Numbering::new(1, 0).add_override(LevelOverride::new(0).with_override_start(5)),
        )
        .add_paragraph(
            Paragraph::new()
                .with_style("Heading1")
                .add_bookmark_start(0, "intro")
                .add_run(Run::new().add_text("Title"))
                .add_bookmark_end(0),
        )
        .add_paragraph(
            Paragraph::new()
                .with_numbering(1, 0)
                .add_comment_start(comment)
                .add_run(Run::new().with_bold().add_text("  spaced  ").add_tab())
                .add_comment_start(reply)
                .add_run(Run::new().add_break(BreakType::Page))
                .add_comment_end(2)
                .add_comment_end(1),
        )
        .add_paragraph(
            Paragraph::new()
                .add_insert(
                    Insert::new(Run::new().add_text("new"))
                        .with_author("Alice")
                        .with_date("2024-03-02T00:00:00Z"),
                )
                .add_delete(
                    Delete::new(Run::new().add_delete_text("old"))
                        .with_author("Bob")
                        .with_date("2024-03-02T00:00:00Z"),
                ),
        )
        .add_table(
            Table::new(vec![TableRow::new(vec![
                TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("a"))),
                TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("b"))),
            ])])
            .with_grid(vec![2000, 3000]),
        )
        .add_web_extension(
            WebExtension::new("{7F33B723-FB58-4524-8733-DBEDC4B7C095}", "WA104380862", "1.1.0.0", "en-US", "OMEX")
                .with_property("settings", "{\"a\":1}"),
        )
        .add_custom_item("{06AC5857-5C65-A94A-BCEC-37356A209BC3}", r#"<root xmlns="urn:test"><v>1</v></root>"#)
}

#[test]
fn test_full_document_round_trips() {
    let doc = full_document();
    let bytes = build(&doc).unwrap();
    let read_back = read(&bytes).unwrap();

    assert_eq!(read_back.children, doc.children);
    assert_eq!(read_back.styles, doc.styles);
    assert_eq!(read_back.abstract_numberings, doc.abstract_numberings);
    assert_eq!(read_back.numberings, doc.numberings);
    assert_eq!(read_back.settings, doc.settings);
    assert_eq!(read_back.doc_props, doc.doc_props);
    assert_eq!(read_back.section_property, doc.section_property);
    assert_eq!(read_back.web_extensions, doc.web_extensions);
    assert_eq!(read_back.custom_items, doc.custom_items);
    assert_eq!(read_back, doc);
}

#[test]
fn test_empty_comment_round_trips() {
    let doc = Document::new().add_paragraph(
        Paragraph::new()
            .add_comment_start(Comment::new(1).with_author("Alice").with_done(true))
            .add_run(Run::new().add_text("commented"))
            .add_comment_end(1),
    );
    let read_back = read(&build(&doc).unwrap()).unwrap();
    assert_eq!(read_back.children, doc.children);
}

#[test]
fn test_empty_cell_round_trips() {
    let doc = Document::new().add_table(
        Table::new(vec![TableRow::new(vec![
            TableCell::new(),
            TableCell::new().add_paragraph(Paragraph::new()),
        ])])
        .with_grid(vec![1000, 1000]),
    );
    let read_back = read(&build(&doc).unwrap()).unwrap();
    assert_eq!(read_back.children, doc.children);
}

#[test]
fn test_custom_item_with_declaration_round_trips() {
    let doc = Document::new().add_custom_item(
        "{0F4C1B1E-7A3D-4C55-9C1D-2B8E5D6A7F90}",
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root xmlns=\"urn:test\"/>",
    );
    let read_back = read(&build(&doc).unwrap()).unwrap();
    assert_eq!(read_back.custom_items, doc.custom_items);
    assert_eq!(read_back.custom_items[0].xml, r#"<root xmlns="urn:test"/>"#);
}

#[test]
fn test_json_view_survives_round_trip() {
    let doc = full_document();
    let bytes = build(&doc).unwrap();
    assert_eq!(read_json(&bytes).unwrap(), json(&doc).unwrap());
}

#[test]
fn test_absent_optional_parts_stay_absent() {
    let doc = Document::new()
        .with_doc_props(
            DocProps::new()
                .with_created("2024-01-01T00:00:00Z")
                .with_updated("2024-01-01T00:00:00Z"),
        )
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("plain")));
    let read_back = read(&build(&doc).unwrap()).unwrap();

    assert!(read_back.numberings.is_empty());
    assert!(read_back.abstract_numberings.is_empty());
    assert!(read_back.web_extensions.is_empty());
    assert!(read_back.custom_items.is_empty());
    assert!(read_back.doc_props.custom_properties.is_empty());
    assert_eq!(read_back, doc);
}

#[test]
fn test_build_is_byte_identical() {
    let doc = full_document();
    let first = build(&doc).unwrap();
    let second = build(&doc).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_only_core_properties_follow_the_clock() {
    let doc = Document::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("x")));
    let early = build_with(&doc, &fixed_options()).unwrap();
    let late = build_with(
        &doc,
        &BuildOptions::new().with_timestamp(Utc.with_ymd_and_hms(2030, 12, 31, 23, 59, 59).unwrap()),
    )
    .unwrap();

    let early = entries(&early);
    let late = entries(&late);
    assert_eq!(early.len(), late.len());
    for ((name, a), (other, b)) in early.iter().zip(&late) {
        assert_eq!(name, other);
        if name == "docProps/core.xml" {
            assert_ne!(a, b);
        } else {
            assert_eq!(a, b, "{} differs between builds", name);
        }
    }
}

#[test]
fn test_stored_and_deflated_read_the_same() {
    let doc = full_document();
    let stored = build_with(&doc, &BuildOptions::new().with_compression(Compression::Stored)).unwrap();
    let deflated = build(&doc).unwrap();
    assert_ne!(stored, deflated);
    assert_eq!(read(&stored).unwrap(), read(&deflated).unwrap());
}

#[test]
fn test_export_then_import() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("out.docx");
    let doc = full_document();

    export_docx(&doc, &path).unwrap();
    assert!(path.exists());
    assert_eq!(import_docx(&path).unwrap(), doc);
}

proptest! {
    #[test]
    fn prop_text_round_trips(texts in prop::collection::vec("[a-zA-Z0-9 <>&\"']{0,24}", 1..6)) {
        let doc = texts.iter().fold(Document::new(), |doc, text| {
            doc.add_paragraph(Paragraph::new().add_run(Run::new().add_text(text.as_str())))
        });
        let bytes = build_with(&doc, &fixed_options()).unwrap();
        prop_assert_eq!(read(&bytes).unwrap().children, doc.children);
    }

    #[test]
    fn prop_build_is_deterministic(texts in prop::collection::vec("[a-z ]{1,12}", 0..4)) {
        let doc = texts.iter().fold(Document::new(), |doc, text| {
            doc.add_paragraph(Paragraph::new().add_run(Run::new().add_text(text.as_str())))
        });
        prop_assert_eq!(
            build_with(&doc, &fixed_options()).unwrap(),
            build_with(&doc, &fixed_options()).unwrap()
        );
    }
}
