//! Document type detection from MIME, extension, or byte signature

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Unknown,
}

impl DocumentKind {
    pub fn from_mime(mime: &str) -> Self {
        match mime {
            MIME_PDF => DocumentKind::Pdf,
            MIME_DOCX => DocumentKind::Docx,
            _ => DocumentKind::Unknown,
        }
    }

    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => DocumentKind::Pdf,
            "docx" => DocumentKind::Docx,
            _ => DocumentKind::Unknown,
        }
    }

    /// Sniff the leading bytes. DOCX is a ZIP container, so the local file
    /// header signature stands in for it.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(b"%PDF-") {
            DocumentKind::Pdf
        } else if bytes.starts_with(b"PK\x03\x04") {
            DocumentKind::Docx
        } else {
            DocumentKind::Unknown
        }
    }

    pub fn mime(&self) -> Option<&'static str> {
        match self {
            DocumentKind::Pdf => Some(MIME_PDF),
            DocumentKind::Docx => Some(MIME_DOCX),
            DocumentKind::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime() {
        assert_eq!(DocumentKind::from_mime(MIME_PDF), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_mime(MIME_DOCX), DocumentKind::Docx);
        assert_eq!(
            DocumentKind::from_mime("text/markdown"),
            DocumentKind::Unknown
        );
    }

    #[test]
    fn test_from_extension_is_case_insensitive() {
        assert_eq!(DocumentKind::from_extension("PDF"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_extension("docx"), DocumentKind::Docx);
        assert_eq!(DocumentKind::from_extension("doc"), DocumentKind::Unknown);
    }

    #[test]
    fn test_sniff_signatures() {
        assert_eq!(DocumentKind::sniff(b"%PDF-1.7 rest"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::sniff(b"PK\x03\x04rest"), DocumentKind::Docx);
        assert_eq!(DocumentKind::sniff(b"hello"), DocumentKind::Unknown);
        assert_eq!(DocumentKind::sniff(b""), DocumentKind::Unknown);
    }
}
