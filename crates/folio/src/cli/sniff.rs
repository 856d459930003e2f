//! Media type of a file read from disk.
//!
//! The terminal has no browser to declare a type, so the CLI derives one:
//! magic bytes first, then the extension, but only for formats that have no
//! magic bytes. A `.pdf` or `.png` whose content does not match comes out as
//! `application/octet-stream` and is rejected by the upload channel.

use std::path::Path;

const OCTET_STREAM: &str = "application/octet-stream";

pub fn detect_media_type(name: &str, data: &[u8]) -> String {
    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }

    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(text_mime_from_extension)
        .unwrap_or(OCTET_STREAM)
        .to_string()
}

/// Formats without a signature, recognized by extension alone.
fn text_mime_from_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "svg" => Some("image/svg+xml"),
        "txt" | "text" => Some("text/plain"),
        "md" | "markdown" => Some("text/markdown"),
        "html" | "htm" => Some("text/html"),
        "csv" => Some("text/csv"),
        "json" => Some("application/json"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_bytes_win() {
        assert_eq!(detect_media_type("cv.pdf", b"%PDF-1.7\n..."), "application/pdf");
        assert_eq!(
            detect_media_type("photo", &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
            "image/png"
        );
        assert_eq!(
            detect_media_type("shot.bin", &[0xFF, 0xD8, 0xFF, 0xE0]),
            "image/jpeg"
        );
    }

    #[test]
    fn text_formats_fall_back_to_extension() {
        assert_eq!(detect_media_type("notes.txt", b"hello"), "text/plain");
        assert_eq!(detect_media_type("logo.SVG", b"<svg/>"), "image/svg+xml");
    }

    #[test]
    fn binary_extension_without_signature_is_octet_stream() {
        assert_eq!(detect_media_type("fake.pdf", b"just text"), OCTET_STREAM);
        assert_eq!(detect_media_type("fake.png", b"just text"), OCTET_STREAM);
        assert_eq!(detect_media_type("noext", b""), OCTET_STREAM);
    }
}
