//! WordprocessingML serialization.
//!
//! Emits the `document.xml` markup for the three artifact tiers. Tracked
//! revisions use Word's native `<w:del>`/`<w:ins>` elements with red
//! strikethrough deletions and green insertions; the simpler tiers reuse
//! plain runs. Packaging the markup into an OPC container is the document
//! writer collaborator's concern, not ours.

use crate::pipeline::Mistake;
use crate::render::revision::{RevisionDocument, RevisionKind};

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DELETION_COLOR: &str = "FF0000";
const INSERTION_COLOR: &str = "008000";

/// Wrap body paragraphs into a complete `document.xml`.
pub fn document_xml(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"{W_NS}\"><w:body>{body}</w:body></w:document>"
    )
}

/// Body markup for the full tracked-revisions tier.
pub fn tracked_body(doc: &RevisionDocument, mistakes: &[Mistake]) -> String {
    let mut body = String::new();
    body.push_str(&heading_paragraph("Document with Track Changes"));

    body.push_str("<w:p>");
    for run in &doc.runs {
        match run.kind {
            RevisionKind::Unchanged => {
                body.push_str(&plain_run(&run.text));
            }
            RevisionKind::Deleted => {
                let id = run.revision_id.unwrap_or(0);
                body.push_str(&format!(
                    "<w:del w:id=\"{id}\" w:author=\"{author}\" w:date=\"{date}\">\
                     <w:r><w:rPr><w:color w:val=\"{DELETION_COLOR}\"/><w:strike w:val=\"true\"/></w:rPr>\
                     <w:delText xml:space=\"preserve\">{text}</w:delText></w:r></w:del>",
                    author = escape_xml(&doc.author),
                    date = escape_xml(&doc.timestamp),
                    text = escape_xml(&run.text),
                ));
            }
            RevisionKind::Inserted => {
                let id = run.revision_id.unwrap_or(0);
                body.push_str(&format!(
                    "<w:ins w:id=\"{id}\" w:author=\"{author}\" w:date=\"{date}\">\
                     <w:r><w:rPr><w:color w:val=\"{INSERTION_COLOR}\"/></w:rPr>\
                     <w:t xml:space=\"preserve\">{text}</w:t></w:r></w:ins>",
                    author = escape_xml(&doc.author),
                    date = escape_xml(&doc.timestamp),
                    text = escape_xml(&run.text),
                ));
            }
        }
    }
    body.push_str("</w:p>");

    body.push_str(&mistakes_section(mistakes));
    body
}

/// Body markup for the coarse highlighted tier: original and corrected text
/// as blocks, corrected text color-coded, no per-run revision metadata.
pub fn highlighted_body(original: &str, corrected: &str, mistakes: &[Mistake]) -> String {
    let mut body = String::new();
    body.push_str(&heading_paragraph("Document Corrections"));
    body.push_str(&heading_paragraph("Original Text:"));
    body.push_str(&text_paragraphs(original, None));
    body.push_str(&heading_paragraph("Corrected Text:"));
    body.push_str(&text_paragraphs(corrected, Some(INSERTION_COLOR)));
    body.push_str(&mistakes_section(mistakes));
    body
}

/// Body markup for the minimal tier: corrected text only, plus a note that
/// formatting could not be preserved. Performs no diffing.
pub fn plain_body(corrected: &str, mistakes: &[Mistake]) -> String {
    let mut body = String::new();
    body.push_str(&heading_paragraph("Document Corrections"));
    body.push_str(&text_paragraphs(
        "Note: formatting could not be preserved.",
        None,
    ));
    body.push_str(&text_paragraphs(corrected, None));
    body.push_str(&mistakes_section(mistakes));
    body
}

/// Escape the five XML special characters.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

fn plain_run(text: &str) -> String {
    format!(
        "<w:r><w:t xml:space=\"preserve\">{}</w:t></w:r>",
        escape_xml(text)
    )
}

fn heading_paragraph(text: &str) -> String {
    format!(
        "<w:p><w:pPr><w:pStyle w:val=\"Heading1\"/></w:pPr>\
         <w:r><w:rPr><w:b/></w:rPr><w:t>{}</w:t></w:r></w:p>",
        escape_xml(text)
    )
}

/// One `<w:p>` per input line, optionally color-coded.
fn text_paragraphs(text: &str, color: Option<&str>) -> String {
    let mut out = String::new();
    for line in text.split('\n') {
        let props = match color {
            Some(c) => format!("<w:rPr><w:color w:val=\"{c}\"/></w:rPr>"),
            None => String::new(),
        };
        out.push_str(&format!(
            "<w:p><w:r>{props}<w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
            escape_xml(line)
        ));
    }
    out
}

fn mistakes_section(mistakes: &[Mistake]) -> String {
    if mistakes.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str(&heading_paragraph("Corrections Made:"));
    for mistake in mistakes {
        out.push_str(&format!(
            "<w:p><w:r><w:t xml:space=\"preserve\">• {}</w:t></w:r></w:p>",
            escape_xml(&mistake.description)
        ));
    }
    out
}
