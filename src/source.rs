//! Lesson-plan text extraction
//!
//! Reads the uploaded lesson plan into plain text for prompt composition.
//! Word files are validated and read with docx-rs; plain-text and Markdown
//! files are read as-is.

use std::fs::File;
use std::path::Path;
use zip::ZipArchive;

use crate::error::{QuizError, Result};

/// Read a lesson plan into plain text, one paragraph per line
pub fn read_source_text(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match extension.as_str() {
        "docx" => read_docx_text(path),
        "txt" | "md" => Ok(std::fs::read_to_string(path)?),
        other => Err(source_error(
            path,
            format!("unsupported format .{other} (use .docx, .txt or .md)"),
        )),
    }
}

/// Extract paragraph text from a .docx file
pub fn read_docx_text(path: &Path) -> Result<String> {
    validate_docx_file(path)?;
    let data = std::fs::read(path)?;
    let docx = docx_rs::read_docx(&data).map_err(|e| source_error(path, e.to_string()))?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        match child {
            docx_rs::DocumentChild::Paragraph(para) => {
                let text = extract_paragraph_text(para);
                if !text.is_empty() {
                    paragraphs.push(text);
                }
            }
            docx_rs::DocumentChild::Table(table) => {
                for row in &table.rows {
                    let docx_rs::TableChild::TableRow(row) = row;
                    let cells: Vec<String> = row
                        .cells
                        .iter()
                        .map(|cell| {
                            let docx_rs::TableRowChild::TableCell(cell) = cell;
                            cell_text(cell)
                        })
                        .filter(|text| !text.is_empty())
                        .collect();
                    if !cells.is_empty() {
                        paragraphs.push(cells.join(" | "));
                    }
                }
            }
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

/// Validates that the file is a readable Word document
fn validate_docx_file(path: &Path) -> Result<()> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file).map_err(|e| source_error(path, e.to_string()))?;

    if archive.by_name("word/document.xml").is_err() {
        if archive.by_name("xl/workbook.xml").is_ok() {
            return Err(source_error(
                path,
                "this appears to be an Excel file, not a Word document".to_string(),
            ));
        }
        return Err(source_error(
            path,
            "missing word/document.xml, the file may be corrupted".to_string(),
        ));
    }

    Ok(())
}

fn source_error(path: &Path, reason: String) -> QuizError {
    QuizError::Source {
        path: path.display().to_string(),
        reason,
    }
}

fn cell_text(cell: &docx_rs::TableCell) -> String {
    cell.children
        .iter()
        .filter_map(|content| match content {
            docx_rs::TableCellContent::Paragraph(para) => Some(extract_paragraph_text(para)),
            _ => None,
        })
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract plain text from a paragraph, skipping tracked deletions
fn extract_paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut text = String::new();

    for child in &para.children {
        match child {
            docx_rs::ParagraphChild::Run(run) => text.push_str(&extract_run_text(run)),
            docx_rs::ParagraphChild::Insert(insert) => {
                for child in &insert.children {
                    if let docx_rs::InsertChild::Run(run) = child {
                        text.push_str(&extract_run_text(run));
                    }
                }
            }
            _ => {}
        }
    }

    text.trim().to_string()
}

fn extract_run_text(run: &docx_rs::Run) -> String {
    let mut text = String::new();

    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(text_elem) => text.push_str(&text_elem.text),
            docx_rs::RunChild::Tab(_) => text.push('\t'),
            docx_rs::RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_paragraphs_from_docx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("giao-an.docx");

        let mut buffer = Cursor::new(Vec::new());
        docx_rs::Docx::new()
            .add_paragraph(
                docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text("Bài 1. Hàm số")),
            )
            .add_paragraph(docx_rs::Paragraph::new())
            .add_paragraph(
                docx_rs::Paragraph::new()
                    .add_run(docx_rs::Run::new().add_text("Định nghĩa "))
                    .add_run(docx_rs::Run::new().add_text("y = ax + b")),
            )
            .build()
            .pack(&mut buffer)
            .unwrap();
        std::fs::write(&path, buffer.into_inner()).unwrap();

        let text = read_source_text(&path).unwrap();
        assert_eq!(text, "Bài 1. Hàm số\nĐịnh nghĩa y = ax + b");
    }

    #[test]
    fn test_rejects_pdf_and_broken_docx() {
        let dir = tempfile::tempdir().unwrap();

        let pdf = dir.path().join("plan.pdf");
        std::fs::write(&pdf, b"%PDF-1.7").unwrap();
        assert!(matches!(read_source_text(&pdf), Err(QuizError::Source { .. })));

        let fake = dir.path().join("plan.docx");
        std::fs::write(&fake, b"not a zip").unwrap();
        assert!(matches!(read_source_text(&fake), Err(QuizError::Source { .. })));
    }

    #[test]
    fn test_reads_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.TXT");
        std::fs::write(&path, "Nội dung bài học").unwrap();
        assert_eq!(read_source_text(&path).unwrap(), "Nội dung bài học");
    }
}
