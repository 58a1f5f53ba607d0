//! Property cascade resolution
//!
//! Effective values are looked up, nearest first, in:
//! explicit node value -> enclosing style chain -> document defaults ->
//! the format's built-in default. The first present value wins and the
//! last layer always has one, so resolution never fails.

use crate::{
    AlignmentType, Indent, LineSpacing, LineSpacingType, ParagraphProperty, RunFonts, RunProperty,
    Styles, VertAlignType,
};

/// Built-in run defaults of the format (`w:sz` absent means 10pt)
pub fn format_default_run_property() -> RunProperty {
    RunProperty {
        style: None,
        size: Some(20),
        color: Some("auto".to_string()),
        highlight: Some("none".to_string()),
        vert_align: Some(VertAlignType::Baseline),
        bold: Some(false),
        italic: Some(false),
        underline: Some("none".to_string()),
        vanish: Some(false),
        spacing: Some(0),
        text_border: None,
        fonts: Some(RunFonts::all("Times New Roman")),
    }
}

/// Built-in paragraph defaults of the format
pub fn format_default_paragraph_property() -> ParagraphProperty {
    ParagraphProperty {
        alignment: Some(AlignmentType::Left),
        indent: Some(Indent::new(Some(0), None, Some(0))),
        line_spacing: Some(
            LineSpacing::new()
                .with_before(0)
                .with_after(0)
                .with_line(240)
                .with_rule(LineSpacingType::Auto),
        ),
        keep_next: Some(false),
        keep_lines: Some(false),
        page_break_before: Some(false),
        widow_control: Some(false),
        ..Default::default()
    }
}

/// Resolves effective run and paragraph properties against a style sheet
pub struct PropertyResolver<'a> {
    styles: &'a Styles,
    format_run: RunProperty,
    format_paragraph: ParagraphProperty,
}

impl<'a> PropertyResolver<'a> {
    pub fn new(styles: &'a Styles) -> Self {
        Self {
            styles,
            format_run: format_default_run_property(),
            format_paragraph: format_default_paragraph_property(),
        }
    }

    /// Run layers, nearest first
    fn run_layers<'b>(
        &'b self,
        paragraph: &'b ParagraphProperty,
        run: &'b RunProperty,
    ) -> Vec<&'b RunProperty> {
        let mut layers = vec![run];
        if let Some(id) = run.style.as_deref() {
            layers.extend(self.styles.chain(id).into_iter().map(|s| &s.run_property));
        }
        if let Some(id) = paragraph.style.as_deref() {
            layers.extend(self.styles.chain(id).into_iter().map(|s| &s.run_property));
        }
        layers.push(&self.styles.doc_defaults.run_property);
        layers.push(&self.format_run);
        layers
    }

    /// Paragraph layers, nearest first
    fn paragraph_layers<'b>(&'b self, paragraph: &'b ParagraphProperty) -> Vec<&'b ParagraphProperty> {
        let mut layers = vec![paragraph];
        if let Some(id) = paragraph.style.as_deref() {
            layers.extend(
                self.styles
                    .chain(id)
                    .into_iter()
                    .map(|s| &s.paragraph_property),
            );
        }
        layers.push(&self.styles.doc_defaults.paragraph_property);
        layers.push(&self.format_paragraph);
        layers
    }

    /// Effective value of one run property path, e.g. `|p| p.size`
    pub fn run_value<T>(
        &self,
        paragraph: &ParagraphProperty,
        run: &RunProperty,
        path: impl Fn(&RunProperty) -> Option<T>,
    ) -> Option<T> {
        self.run_layers(paragraph, run).into_iter().find_map(path)
    }

    /// Effective value of one paragraph property path
    pub fn paragraph_value<T>(
        &self,
        paragraph: &ParagraphProperty,
        path: impl Fn(&ParagraphProperty) -> Option<T>,
    ) -> Option<T> {
        self.paragraph_layers(paragraph).into_iter().find_map(path)
    }

    /// All effective run properties of a run inside a paragraph.
    /// The style reference itself is kept as given on the run.
    pub fn run(&self, paragraph: &ParagraphProperty, run: &RunProperty) -> RunProperty {
        let mut resolved = self
            .run_layers(paragraph, run)
            .into_iter()
            .rev()
            .fold(RunProperty::default(), |acc, layer| acc.merge(layer));
        resolved.style = run.style.clone();
        resolved
    }

    /// All effective paragraph properties.
    /// Style and numbering references are kept as given on the paragraph.
    pub fn paragraph(&self, paragraph: &ParagraphProperty) -> ParagraphProperty {
        let mut resolved = self
            .paragraph_layers(paragraph)
            .into_iter()
            .rev()
            .fold(ParagraphProperty::default(), |acc, layer| acc.merge(layer));
        resolved.style = paragraph.style.clone();
        resolved.numbering = paragraph.numbering;
        resolved.run_property = self.run(paragraph, &paragraph.run_property);
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DocDefaults, Style, StyleType};
    use std::sync::Arc;

    fn styles() -> Styles {
        Styles::new()
            .with_doc_defaults(
                DocDefaults::new().with_run_property(RunProperty::new().with_size(22).with_color("333333")),
            )
            .add_style(
                Style::new("Normal", StyleType::Paragraph)
                    .with_run_property(RunProperty::new().with_fonts(RunFonts::new().with_ascii("Calibri"))),
            )
            .add_style(
                Style::new("Heading1", StyleType::Paragraph)
                    .with_based_on("Normal")
                    .with_run_property(RunProperty::new().with_size(32).with_bold()),
            )
            .add_style(
                Style::new("Emphasis", StyleType::Character)
                    .with_run_property(RunProperty::new().with_italic().with_color("FF0000")),
            )
    }

    #[test]
    fn test_explicit_value_wins() {
        let styles = styles();
        let resolver = PropertyResolver::new(&styles);
        let para = ParagraphProperty { style: Some("Heading1".into()), ..Default::default() };
        let run = RunProperty::new().with_size(40);
        assert_eq!(resolver.run_value(&para, &run, |p| p.size), Some(40));
    }

    #[test]
    fn test_style_then_defaults_then_format() {
        let styles = styles();
        let resolver = PropertyResolver::new(&styles);
        let para = ParagraphProperty { style: Some("Heading1".into()), ..Default::default() };
        let run = RunProperty::new();

        // From the paragraph style
        assert_eq!(resolver.run_value(&para, &run, |p| p.size), Some(32));
        // From the based-on style
        let fonts = resolver.run_value(&para, &run, |p| p.fonts.clone()).unwrap();
        assert_eq!(fonts.ascii.as_deref(), Some("Calibri"));
        // From document defaults
        assert_eq!(resolver.run_value(&para, &run, |p| p.color.clone()).as_deref(), Some("333333"));
        // From the format default
        assert_eq!(resolver.run_value(&para, &run, |p| p.vanish), Some(false));
    }

    #[test]
    fn test_character_style_beats_paragraph_style() {
        let styles = styles();
        let resolver = PropertyResolver::new(&styles);
        let para = ParagraphProperty { style: Some("Heading1".into()), ..Default::default() };
        let run = RunProperty::new().with_style("Emphasis");
        let resolved = resolver.run(&para, &run);

        assert_eq!(resolved.color.as_deref(), Some("FF0000"));
        assert_eq!(resolved.italic, Some(true));
        assert_eq!(resolved.bold, Some(true));
        assert_eq!(resolved.style.as_deref(), Some("Emphasis"));
    }

    #[test]
    fn test_empty_sheet_resolves_to_format_defaults() {
        let styles = Styles::new();
        let resolver = PropertyResolver::new(&styles);
        let resolved = resolver.paragraph(&ParagraphProperty::new());
        assert_eq!(resolved.alignment, Some(AlignmentType::Left));
        assert_eq!(resolved.line_spacing.unwrap().line, Some(240));
        assert_eq!(resolved.run_property.size, Some(20));
    }

    #[test]
    fn test_shared_defaults_are_seen_by_every_document() {
        let defaults = Arc::new(DocDefaults::new().with_run_property(RunProperty::new().with_size(26)));
        let a = Styles::new().with_doc_defaults(defaults.clone());
        let b = Styles::new().with_doc_defaults(defaults);
        let para = ParagraphProperty::new();
        let run = RunProperty::new();
        assert_eq!(PropertyResolver::new(&a).run_value(&para, &run, |p| p.size), Some(26));
        assert_eq!(PropertyResolver::new(&b).run_value(&para, &run, |p| p.size), Some(26));
    }
}
