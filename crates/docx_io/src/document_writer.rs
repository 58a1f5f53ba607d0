//! Document.xml writer
//!
//! Converts the document tree to DOCX document.xml format. The same writer
//! renders comment bodies so revision ids stay unique across both parts.

use crate::namespaces;
use crate::options::BuildOptions;
use crate::plan::PackagePlan;
use crate::properties_writer::{write_paragraph_property, write_run_property};
use doc_model::{
    Delete, Document, DocumentChild, Insert, Paragraph, ParagraphChild, ParagraphProperty,
    PropertyResolver, Run, RunChild, SectionProperty,
};
use std::borrow::Cow;

/// Writer for document.xml
pub struct DocumentWriter<'a> {
    /// Present when effective properties are written instead of explicit ones
    resolver: Option<PropertyResolver<'a>>,
    next_revision_id: usize,
}

impl<'a> DocumentWriter<'a> {
    pub(crate) fn new(plan: &PackagePlan<'a>, options: &BuildOptions) -> Self {
        Self {
            resolver: options
                .flatten_styles
                .then(|| PropertyResolver::new(&plan.doc.styles)),
            next_revision_id: plan.first_revision_id,
        }
    }

    /// Generate document.xml content
    pub fn write(&mut self, doc: &Document) -> String {
        let mut xml = String::new();

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');

        xml.push_str(&format!(
            r#"<w:document xmlns:w="{}" xmlns:r="{}" xmlns:w14="{}" xmlns:w15="{}" xmlns:mc="{}" mc:Ignorable="w14 w15">"#,
            namespaces::W,
            namespaces::R,
            namespaces::W14,
            namespaces::W15,
            namespaces::MC,
        ));
        xml.push_str("<w:body>");

        for child in &doc.children {
            match child {
                DocumentChild::Paragraph(p) => self.write_paragraph(&mut xml, p, None),
                DocumentChild::Table(t) => self.write_table(&mut xml, t),
                DocumentChild::BookmarkStart(b) => xml.push_str(&format!(
                    r#"<w:bookmarkStart w:id="{}" w:name="{}"/>"#,
                    b.id,
                    escape_xml(&b.name)
                )),
                DocumentChild::BookmarkEnd(b) => {
                    xml.push_str(&format!(r#"<w:bookmarkEnd w:id="{}"/>"#, b.id))
                }
            }
        }

        write_section_property(&mut xml, &doc.section_property);

        xml.push_str("</w:body>");
        xml.push_str("</w:document>");
        xml
    }

    /// Write a paragraph element, optionally tagged with a `w14:paraId`
    pub(crate) fn write_paragraph(&mut self, xml: &mut String, para: &Paragraph, para_id: Option<&str>) {
        match para_id {
            Some(id) => xml.push_str(&format!(
                r#"<w:p w14:paraId="{}" w14:textId="77777777">"#,
                id
            )),
            None => xml.push_str("<w:p>"),
        }

        let props = match self.resolver {
            Some(ref resolver) => Cow::Owned(resolver.paragraph(&para.property)),
            None => Cow::Borrowed(&para.property),
        };
        write_paragraph_property(xml, &props);

        for child in &para.children {
            match child {
                ParagraphChild::Run(run) => self.write_run(xml, run, &para.property),
                ParagraphChild::Insert(ins) => self.write_insert(xml, ins, &para.property),
                ParagraphChild::Delete(del) => self.write_delete(xml, del, &para.property),
                ParagraphChild::BookmarkStart(b) => xml.push_str(&format!(
                    r#"<w:bookmarkStart w:id="{}" w:name="{}"/>"#,
                    b.id,
                    escape_xml(&b.name)
                )),
                ParagraphChild::BookmarkEnd(b) => {
                    xml.push_str(&format!(r#"<w:bookmarkEnd w:id="{}"/>"#, b.id))
                }
                ParagraphChild::CommentStart(start) => {
                    xml.push_str(&format!(r#"<w:commentRangeStart w:id="{}"/>"#, start.id))
                }
                ParagraphChild::CommentEnd(end) => {
                    xml.push_str(&format!(r#"<w:commentRangeEnd w:id="{}"/>"#, end.id));
                    xml.push_str(&format!(
                        r#"<w:r><w:commentReference w:id="{}"/></w:r>"#,
                        end.id
                    ));
                }
            }
        }

        xml.push_str("</w:p>");
    }

    /// Write a run element
    fn write_run(&self, xml: &mut String, run: &Run, para_props: &ParagraphProperty) {
        xml.push_str("<w:r>");

        match self.resolver {
            Some(ref resolver) => write_run_property(xml, &resolver.run(para_props, &run.property)),
            None => write_run_property(xml, &run.property),
        }

        for child in &run.children {
            match child {
                RunChild::Text(t) => {
                    xml.push_str(r#"<w:t xml:space="preserve">"#);
                    xml.push_str(&escape_xml(&t.text));
                    xml.push_str("</w:t>");
                }
                RunChild::DeleteText(t) => {
                    xml.push_str(r#"<w:delText xml:space="preserve">"#);
                    xml.push_str(&escape_xml(&t.text));
                    xml.push_str("</w:delText>");
                }
                RunChild::Tab => xml.push_str("<w:tab/>"),
                RunChild::Break(b) => {
                    xml.push_str(&format!(r#"<w:br w:type="{}"/>"#, b.break_type.as_str()))
                }
            }
        }

        xml.push_str("</w:r>");
    }

    fn write_insert(&mut self, xml: &mut String, ins: &Insert, para_props: &ParagraphProperty) {
        let id = self.next_revision_id();
        xml.push_str(&format!(
            r#"<w:ins w:id="{}" w:author="{}" w:date="{}">"#,
            id,
            escape_xml(&ins.author),
            escape_xml(&ins.date)
        ));
        for run in &ins.children {
            self.write_run(xml, run, para_props);
        }
        xml.push_str("</w:ins>");
    }

    fn write_delete(&mut self, xml: &mut String, del: &Delete, para_props: &ParagraphProperty) {
        let id = self.next_revision_id();
        xml.push_str(&format!(
            r#"<w:del w:id="{}" w:author="{}" w:date="{}">"#,
            id,
            escape_xml(&del.author),
            escape_xml(&del.date)
        ));
        for run in &del.children {
            self.write_run(xml, run, para_props);
        }
        xml.push_str("</w:del>");
    }

    fn next_revision_id(&mut self) -> usize {
        let id = self.next_revision_id;
        self.next_revision_id += 1;
        id
    }
}

/// Final `w:sectPr` of the body; dimensions are written exactly as given
fn write_section_property(xml: &mut String, section: &SectionProperty) {
    xml.push_str("<w:sectPr>");

    let size = &section.page_size;
    xml.push_str(&format!(r#"<w:pgSz w:w="{}" w:h="{}""#, size.w, size.h));
    if let Some(orient) = size.orient {
        xml.push_str(&format!(r#" w:orient="{}""#, orient.as_str()));
    }
    xml.push_str("/>");

    let margin = &section.page_margin;
    xml.push_str(&format!(
        r#"<w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="{}" w:footer="{}" w:gutter="{}"/>"#,
        margin.top, margin.right, margin.bottom, margin.left, margin.header, margin.footer, margin.gutter
    ));

    let grid = &section.doc_grid;
    xml.push_str(&format!(r#"<w:docGrid w:type="{}""#, grid.grid_type.as_str()));
    if let Some(pitch) = grid.line_pitch {
        xml.push_str(&format!(r#" w:linePitch="{}""#, pitch));
    }
    if let Some(space) = grid.char_space {
        xml.push_str(&format!(r#" w:charSpace="{}""#, space));
    }
    xml.push_str("/>");

    xml.push_str("</w:sectPr>");
}

/// Escape special XML characters; characters XML 1.0 cannot carry are dropped
pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}
