use thiserror::Error;
use tracing::debug;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_TXT: &str = "text/plain";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type: {0}")]
    Unsupported(String),
    #[error("no text content could be extracted from the file")]
    Empty,
    #[error("failed to extract text: {0}")]
    Parse(String),
}

/// MIME type for a filename, by extension. Used when the upload carries no
/// usable content type of its own.
pub fn mime_for_filename(name: &str) -> Option<&'static str> {
    let ext = name.rsplit('.').next()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some(MIME_PDF),
        "docx" => Some(MIME_DOCX),
        "txt" => Some(MIME_TXT),
        _ => None,
    }
}

/// Normalise an uploaded document to a plain-text string.
///
/// Supports PDF, DOCX, and plain text. Anything else is refused, and an
/// extraction that yields only whitespace is reported as empty rather than
/// passed downstream.
pub fn extract_text(bytes: &[u8], mime: &str) -> Result<String, ExtractError> {
    let text = match mime {
        MIME_PDF => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractError::Parse(e.to_string()))?,
        MIME_DOCX => extract_docx(bytes)?,
        MIME_TXT => String::from_utf8(bytes.to_vec())
            .map_err(|e| ExtractError::Parse(e.to_string()))?,
        other => return Err(ExtractError::Unsupported(other.to_string())),
    };
    if text.trim().is_empty() {
        return Err(ExtractError::Empty);
    }
    debug!(mime, chars = text.len(), "extracted document text");
    Ok(text)
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};

    let docx = read_docx(bytes).map_err(|e| ExtractError::Parse(e.to_string()))?;
    let mut text = String::new();
    for child in docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            for para_child in paragraph.children {
                if let ParagraphChild::Run(run) = para_child {
                    for run_child in run.children {
                        if let RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_unsupported_mime_types() {
        let err = extract_text(b"GIF89a", "image/gif");
        assert!(matches!(err, Err(ExtractError::Unsupported(t)) if t == "image/gif"));
    }

    #[test]
    fn plain_text_passes_through() {
        let text = extract_text("tenancy agreement".as_bytes(), MIME_TXT).expect("extract");
        assert_eq!(text, "tenancy agreement");
    }

    #[test]
    fn whitespace_only_extraction_is_an_error() {
        assert!(matches!(
            extract_text(b"  \n\t ", MIME_TXT),
            Err(ExtractError::Empty)
        ));
    }

    #[test]
    fn filenames_map_to_supported_mime_types() {
        assert_eq!(mime_for_filename("contract.PDF"), Some(MIME_PDF));
        assert_eq!(mime_for_filename("notes.docx"), Some(MIME_DOCX));
        assert_eq!(mime_for_filename("plain.txt"), Some(MIME_TXT));
        assert_eq!(mime_for_filename("archive.zip"), None);
    }
}
