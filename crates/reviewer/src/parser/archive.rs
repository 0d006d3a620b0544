//! Archive extraction: a zip bundle yields one text per file, anything else
//! is treated as a single text document.

use std::io::{Cursor, Read};

use tracing::{debug, warn};
use zip::ZipArchive;

use super::MAX_EXTRACTED_BYTES;
use crate::error::AnalysisError;

/// Turn an uploaded buffer into one or more text blobs.
///
/// The filename is informational only; no extension filtering is applied.
/// Decoding is lossy (invalid UTF-8 becomes U+FFFD), so the only failure is
/// a buffer that opens as a zip but holds no readable file.
///
/// Zip members inflate to at most [`MAX_EXTRACTED_BYTES`] per archive.
pub fn extract_texts(bytes: &[u8], filename: Option<&str>) -> Result<Vec<String>, AnalysisError> {
    extract_texts_with_limit(bytes, filename, MAX_EXTRACTED_BYTES)
}

/// [`extract_texts`] with an explicit per-archive decompression budget.
/// A member that would exceed what is left of `limit` is skipped.
pub fn extract_texts_with_limit(
    bytes: &[u8],
    filename: Option<&str>,
    limit: u64,
) -> Result<Vec<String>, AnalysisError> {
    let label = filename.unwrap_or("<unnamed>");

    let mut archive = match ZipArchive::new(Cursor::new(bytes)) {
        Ok(archive) => archive,
        Err(e) => {
            debug!(file = label, size = bytes.len(), "Not a zip archive ({}), reading as text", e);
            return Ok(vec![decode_lossy(bytes)]);
        }
    };

    let mut texts = Vec::with_capacity(archive.len());
    let mut remaining = limit;

    for index in 0..archive.len() {
        let mut member = match archive.by_index(index) {
            Ok(member) => member,
            Err(e) => {
                warn!(file = label, index, "Skipping unreadable archive member: {}", e);
                continue;
            }
        };

        if member.is_dir() {
            continue;
        }

        if member.size() > remaining {
            warn!(
                file = label,
                member = member.name(),
                size = member.size(),
                remaining,
                "Skipping archive member over the extraction budget"
            );
            continue;
        }

        // Declared sizes can lie; never inflate past the budget
        let mut buffer = Vec::new();
        if let Err(e) = (&mut member).take(remaining.saturating_add(1)).read_to_end(&mut buffer) {
            warn!(file = label, member = member.name(), "Failed to read archive member: {}", e);
            continue;
        }
        if buffer.len() as u64 > remaining {
            warn!(
                file = label,
                member = member.name(),
                remaining,
                "Skipping archive member over the extraction budget"
            );
            continue;
        }
        remaining -= buffer.len() as u64;

        debug!(file = label, member = member.name(), size = buffer.len(), "Extracted archive member");
        texts.push(decode_lossy(&buffer));
    }

    if texts.is_empty() {
        warn!(file = label, "Archive contains no readable files");
        return Err(AnalysisError::EmptyArchive);
    }

    Ok(texts)
}

fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    fn build_zip(members: &[(&str, Option<&[u8]>)]) -> Vec<u8> {
        build_zip_with(members, CompressionMethod::Stored)
    }

    fn build_zip_with(members: &[(&str, Option<&[u8]>)], method: CompressionMethod) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(method);

        for (name, content) in members {
            match content {
                Some(bytes) => {
                    writer.start_file(*name, options).unwrap();
                    writer.write_all(bytes).unwrap();
                }
                None => writer.add_directory(*name, options).unwrap(),
            }
        }

        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_plain_text_is_single_blob() {
        let texts = extract_texts(b"line one\nline two", Some("app.log")).unwrap();
        assert_eq!(texts, vec!["line one\nline two".to_string()]);
    }

    #[test]
    fn test_any_extension_accepted() {
        let texts = extract_texts(b"{\"not\": \"parsed as json\"}", Some("events.json")).unwrap();
        assert_eq!(texts.len(), 1);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let texts = extract_texts(b"ok \xFF\xFE done", None).unwrap();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].starts_with("ok "));
        assert!(texts[0].contains('\u{FFFD}'));
        assert!(texts[0].ends_with(" done"));
    }

    #[test]
    fn test_empty_buffer_is_empty_text() {
        let texts = extract_texts(b"", None).unwrap();
        assert_eq!(texts, vec![String::new()]);
    }

    #[test]
    fn test_zip_members_in_archive_order() {
        let bytes = build_zip(&[
            ("inner/", None),
            ("inner/data.json", Some(&b"first file"[..])),
            ("inner/notes.txt", Some(&b"second file"[..])),
        ]);

        let texts = extract_texts(&bytes, Some("bundle.bin")).unwrap();
        assert_eq!(texts, vec!["first file".to_string(), "second file".to_string()]);
    }

    #[test]
    fn test_zip_member_invalid_utf8_is_replaced() {
        let bytes = build_zip(&[("bad.log", Some(&b"caf\xE9"[..]))]);
        let texts = extract_texts(&bytes, None).unwrap();
        assert_eq!(texts, vec!["caf\u{FFFD}".to_string()]);
    }

    #[test]
    fn test_zip_without_files_is_empty_archive() {
        let bytes = build_zip(&[]);
        let result = extract_texts(&bytes, Some("empty.zip"));
        assert!(matches!(result, Err(AnalysisError::EmptyArchive)));
    }

    #[test]
    fn test_zip_with_only_directories_is_empty_archive() {
        let bytes = build_zip(&[("logs/", None), ("logs/old/", None)]);
        let result = extract_texts(&bytes, None);
        assert!(matches!(result, Err(AnalysisError::EmptyArchive)));
    }

    #[test]
    fn test_zip_signature_prefix_alone_is_text() {
        // Starts like a local file header but has no central directory
        let texts = extract_texts(b"PK\x03\x04 not really a zip", Some("fake.zip")).unwrap();
        assert_eq!(texts.len(), 1);
    }

    // ─────────────────────────────────────────────────────────
    // Extraction budget
    // ─────────────────────────────────────────────────────────

    #[test]
    fn test_deflated_member_over_budget_is_skipped() {
        let zeros = vec![0u8; 64 * 1024];
        let bytes = build_zip_with(
            &[("small.log", Some(&b"ok"[..])), ("bomb.log", Some(zeros.as_slice()))],
            CompressionMethod::Deflated,
        );
        assert!(bytes.len() < 4096);

        let texts = extract_texts_with_limit(&bytes, Some("bundle.zip"), 1024).unwrap();
        assert_eq!(texts, vec!["ok".to_string()]);
    }

    #[test]
    fn test_budget_is_shared_across_members() {
        let chunk = vec![b'a'; 600];
        let bytes = build_zip(&[("one.log", Some(chunk.as_slice())), ("two.log", Some(chunk.as_slice()))]);

        let texts = extract_texts_with_limit(&bytes, None, 1000).unwrap();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].len(), 600);

        let texts = extract_texts_with_limit(&bytes, None, 1200).unwrap();
        assert_eq!(texts.len(), 2);
    }

    #[test]
    fn test_every_member_over_budget_is_empty_archive() {
        let zeros = vec![0u8; 8 * 1024];
        let bytes = build_zip_with(&[("bomb.log", Some(zeros.as_slice()))], CompressionMethod::Deflated);
        let result = extract_texts_with_limit(&bytes, None, 100);
        assert!(matches!(result, Err(AnalysisError::EmptyArchive)));
    }

    #[test]
    fn test_budget_does_not_apply_to_plain_text() {
        let texts = extract_texts_with_limit(b"plain text upload", None, 4).unwrap();
        assert_eq!(texts, vec!["plain text upload".to_string()]);
    }
}
