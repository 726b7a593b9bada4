use crate::constants::DOCX_DOCUMENT_PART;
use crate::error::PipelineError;
use crate::file::TextExtractor;
use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

/// One table: rows of cell text
type Table = Vec<Vec<String>>;

/// Top-level content of a DOCX body
#[derive(Debug, Default, PartialEq)]
struct DocxBody {
    paragraphs: Vec<String>,
    tables: Vec<Table>,
}

impl DocxBody {
    /// Non-blank paragraphs first, then table rows with non-blank cells space-joined
    fn to_text(&self) -> String {
        let mut text = String::new();

        for paragraph in &self.paragraphs {
            if !paragraph.trim().is_empty() {
                text.push_str(paragraph);
                text.push('\n');
            }
        }

        for table in &self.tables {
            for row in table {
                for cell in row {
                    if !cell.trim().is_empty() {
                        text.push_str(cell);
                        text.push(' ');
                    }
                }
                text.push('\n');
            }
        }

        text
    }
}

/// DOCX text extractor
///
/// Reads `word/document.xml` out of the ZIP package and collects the
/// body's top-level paragraphs and tables. Paragraphs inside a table cell
/// belong to the cell, cell text joins its paragraphs with newlines.
#[derive(Debug, Default)]
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }

    fn read_document_part(bytes: &[u8]) -> Result<Vec<u8>> {
        let mut archive =
            ZipArchive::new(Cursor::new(bytes)).context("Failed to read DOCX package")?;

        let mut part = archive
            .by_name(DOCX_DOCUMENT_PART)
            .with_context(|| format!("DOCX package has no {}", DOCX_DOCUMENT_PART))?;

        let mut xml = Vec::new();
        part.read_to_end(&mut xml)
            .with_context(|| format!("Failed to read {}", DOCX_DOCUMENT_PART))?;

        Ok(xml)
    }

    fn parse_body(xml: &[u8]) -> Result<DocxBody> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::new();

        let mut body = DocxBody::default();
        let mut table_depth = 0usize;
        let mut paragraph_depth = 0usize;
        let mut paragraph: Option<String> = None;
        let mut cell: Option<Vec<String>> = None;
        let mut in_text = false;
        let mut in_paragraph_props = false;

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .with_context(|| format!("Malformed XML at byte {}", reader.buffer_position()))?;

            match event {
                Event::Start(e) => match e.name().as_ref() {
                    b"w:tbl" => {
                        table_depth += 1;
                        if table_depth == 1 {
                            body.tables.push(Table::new());
                        }
                    }
                    b"w:tr" if table_depth == 1 => {
                        if let Some(table) = body.tables.last_mut() {
                            table.push(Vec::new());
                        }
                    }
                    b"w:tc" if table_depth == 1 => cell = Some(Vec::new()),
                    b"w:p" => {
                        paragraph_depth += 1;
                        if paragraph_depth == 1 {
                            paragraph = Some(String::new());
                        }
                    }
                    b"w:pPr" => in_paragraph_props = true,
                    b"w:t" => in_text = true,
                    _ => {}
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"w:p" if paragraph_depth == 0 => {
                        place_paragraph(String::new(), table_depth, &mut cell, &mut body);
                    }
                    b"w:tc" if table_depth == 1 => push_cell(String::new(), &mut body),
                    b"w:tab" if !in_paragraph_props => push_text(&mut paragraph, "\t"),
                    b"w:br" | b"w:cr" => push_text(&mut paragraph, "\n"),
                    _ => {}
                },
                Event::End(e) => match e.name().as_ref() {
                    b"w:t" => in_text = false,
                    b"w:pPr" => in_paragraph_props = false,
                    b"w:p" => {
                        paragraph_depth = paragraph_depth.saturating_sub(1);
                        if paragraph_depth == 0 {
                            if let Some(text) = paragraph.take() {
                                place_paragraph(text, table_depth, &mut cell, &mut body);
                            }
                        }
                    }
                    b"w:tc" if table_depth == 1 => {
                        if let Some(paragraphs) = cell.take() {
                            push_cell(paragraphs.join("\n"), &mut body);
                        }
                    }
                    b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                    _ => {}
                },
                Event::Text(t) if in_text => {
                    let text = t.unescape().context("Invalid text escape")?;
                    push_text(&mut paragraph, &text);
                }
                Event::CData(t) if in_text => {
                    push_text(&mut paragraph, &String::from_utf8_lossy(&t));
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(body)
    }
}

fn push_text(paragraph: &mut Option<String>, text: &str) {
    if let Some(paragraph) = paragraph.as_mut() {
        paragraph.push_str(text);
    }
}

/// Route a finished paragraph to the body or to the open table cell
fn place_paragraph(
    text: String,
    table_depth: usize,
    cell: &mut Option<Vec<String>>,
    body: &mut DocxBody,
) {
    if table_depth == 0 {
        body.paragraphs.push(text);
    } else if let Some(cell) = cell.as_mut() {
        cell.push(text);
    }
}

fn push_cell(text: String, body: &mut DocxBody) {
    if let Some(row) = body.tables.last_mut().and_then(|table| table.last_mut()) {
        row.push(text);
    }
}

impl TextExtractor for DocxExtractor {
    fn extract_bytes(&self, bytes: &[u8]) -> Result<String, PipelineError> {
        let body = Self::read_document_part(bytes)
            .and_then(|xml| Self::parse_body(&xml))
            .map_err(|e| PipelineError::docx_processing(format!("{:#}", e)))?;

        if body.paragraphs.is_empty() && body.tables.is_empty() {
            return Err(PipelineError::corrupted_docx());
        }

        let text = body.to_text();
        if text.trim().is_empty() {
            return Err(PipelineError::empty_docx());
        }

        debug!(
            paragraphs = body.paragraphs.len(),
            tables = body.tables.len(),
            "extracted DOCX text"
        );
        Ok(text)
    }

    fn processing_error(&self, detail: String) -> PipelineError {
        PipelineError::docx_processing(detail)
    }

    fn extension(&self) -> &'static str {
        "docx"
    }
}
