//! Document Renderer
//!
//! Walks a `NormalizedRequest` and assembles the .docx output with `docx-rs`:
//! a bold header block (student name, title), a spacer paragraph, then one
//! block per content section (bold heading, sanitized text paragraph, indented
//! bullet list). Serialization happens entirely in memory; no scratch files,
//! so concurrent requests sharing a title cannot collide.
//!
//! Header fields are inserted verbatim. Sanitization applies only to section
//! bodies and bullets.

use std::io::Cursor;

use docx_rs::{
    AbstractNumbering, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat, Numbering,
    NumberingId, Paragraph, Run, Start,
};
use thiserror::Error;

use crate::normalizer::{NormalizedRequest, Section};
use crate::sanitizer::sanitize;

/// MIME type for the generated document.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

// Run sizes are half-points: 40 = 20pt headers, 32 = 16pt section headings.
const HEADER_RUN_SIZE: usize = 40;
const HEADING_RUN_SIZE: usize = 32;

// 0.5 inch left indent for bullet entries, in twips.
const BULLET_INDENT_TWIPS: i32 = 720;

// Numbering definition used for the bullet list style.
const BULLET_NUMBERING_ID: usize = 2;

/// A serialized document plus its derived download filename.
#[derive(Debug, Clone)]
pub struct GeneratedDoc {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Serialization failure. Fatal; surfaces as HTTP 500.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("docx serialization failed: {0}")]
    Pack(String),
}

/// Render a normalized request into docx bytes.
///
/// Never fails for well-formed input; the only error source is the final
/// serialization step.
pub fn render(req: &NormalizedRequest) -> Result<GeneratedDoc, RenderError> {
    let docx = build_docx(req);

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| RenderError::Pack(e.to_string()))?;

    Ok(GeneratedDoc {
        filename: derive_filename(&req.title),
        bytes: cursor.into_inner(),
    })
}

/// Assemble the document tree (separate from packing so tests can inspect it).
fn build_docx(req: &NormalizedRequest) -> Docx {
    let mut docx = Docx::new()
        .add_abstract_numbering(AbstractNumbering::new(BULLET_NUMBERING_ID).add_level(
            Level::new(
                0,
                Start::new(0),
                NumberFormat::new("bullet"),
                LevelText::new("\u{2022}"),
                LevelJc::new("left"),
            ),
        ))
        .add_numbering(Numbering::new(BULLET_NUMBERING_ID, BULLET_NUMBERING_ID))
        .add_paragraph(bold_paragraph(
            &format!("Student name: {}", req.student_name),
            HEADER_RUN_SIZE,
        ))
        .add_paragraph(bold_paragraph(
            &format!("Title: {}", req.title),
            HEADER_RUN_SIZE,
        ))
        // Visual spacer between header and sections.
        .add_paragraph(Paragraph::new());

    for (name, body) in &req.content {
        docx = docx.add_paragraph(bold_paragraph(&format!("{}:", name), HEADING_RUN_SIZE));

        match body {
            Section::PlainText(text) => {
                docx = docx
                    .add_paragraph(Paragraph::new().add_run(Run::new().add_text(sanitize(text))));
            }
            Section::Structured {
                text_fields,
                bullets,
            } => {
                let joined = text_fields
                    .iter()
                    .map(|(_, value)| sanitize(value))
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                if !joined.trim().is_empty() {
                    docx = docx
                        .add_paragraph(Paragraph::new().add_run(Run::new().add_text(joined)));
                }

                for bullet in bullets {
                    docx = docx.add_paragraph(
                        Paragraph::new()
                            .add_run(Run::new().add_text(sanitize(bullet)))
                            .numbering(
                                NumberingId::new(BULLET_NUMBERING_ID),
                                IndentLevel::new(0),
                            )
                            .indent(Some(BULLET_INDENT_TWIPS), None, None, None),
                    );
                }
            }
        }
    }

    docx
}

fn bold_paragraph(text: &str, size: usize) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).bold().size(size))
}

fn derive_filename(title: &str) -> String {
    format!("{}.docx", title.replace(' ', "_"))
}
