use crate::constants::BYTES_PER_MB;
use unicode_normalization::UnicodeNormalization;

/// Get the extension of an uploaded filename (lowercase, without the dot)
///
/// Returns `None` when the name has no `.` at all. The suffix after the last
/// `.` is returned even when empty, so `"resume."` yields `Some("")`.
pub fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
}

/// Make a client-supplied filename safe to use as a single path component
///
/// Accented letters are folded to ASCII (NFKD, combining marks dropped).
/// Path separators become spaces, whitespace runs are joined with `_`,
/// anything outside `[A-Za-z0-9_.-]` is dropped and leading/trailing `.`
/// and `_` are stripped. The result may be empty.
pub fn sanitize_filename(filename: &str) -> String {
    let folded: String = filename.nfkd().filter(char::is_ascii).collect();
    let spaced = folded.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Convert a byte count to MiB rounded to 2 decimals
pub fn bytes_to_mb(bytes: u64) -> f64 {
    let mb = bytes as f64 / BYTES_PER_MB as f64;
    (mb * 100.0).round() / 100.0
}

/// Truncate text to at most `max_chars` characters
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of_pdf() {
        assert_eq!(extension_of("resume.pdf"), Some("pdf".to_string()));
    }

    #[test]
    fn test_extension_of_lowercase() {
        assert_eq!(extension_of("Resume.DOCX"), Some("docx".to_string()));
    }

    #[test]
    fn test_extension_of_no_extension() {
        assert_eq!(extension_of("resume"), None);
    }

    #[test]
    fn test_extension_of_multiple_dots() {
        assert_eq!(extension_of("archive.tar.gz"), Some("gz".to_string()));
    }

    #[test]
    fn test_extension_of_trailing_dot() {
        assert_eq!(extension_of("resume."), Some(String::new()));
    }

    #[test]
    fn test_sanitize_plain_name() {
        assert_eq!(sanitize_filename("resume.pdf"), "resume.pdf");
    }

    #[test]
    fn test_sanitize_spaces_and_symbols() {
        assert_eq!(sanitize_filename("My CV (final)!.pdf"), "My_CV_final.pdf");
    }

    #[test]
    fn test_sanitize_path_traversal() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("..\\windows\\cv.docx"), "windows_cv.docx");
    }

    #[test]
    fn test_sanitize_accents() {
        assert_eq!(sanitize_filename("José Pérez CV.pdf"), "Jose_Perez_CV.pdf");
        assert_eq!(sanitize_filename("Résumé.docx"), "Resume.docx");
    }

    #[test]
    fn test_sanitize_non_ascii_only() {
        assert_eq!(sanitize_filename("简历"), "");
    }

    #[test]
    fn test_bytes_to_mb_rounding() {
        assert_eq!(bytes_to_mb(0), 0.0);
        assert_eq!(bytes_to_mb(BYTES_PER_MB), 1.0);
        assert_eq!(bytes_to_mb(15 * BYTES_PER_MB), 15.0);
        assert_eq!(bytes_to_mb(1_500_000), 1.43);
    }

    #[test]
    fn test_truncate_shorter_text_unchanged() {
        assert_eq!(truncate_preview("hello", 10), "hello");
        assert_eq!(truncate_preview("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_longer_text_exact_cap() {
        let text = "a".repeat(6000);
        let preview = truncate_preview(&text, 5000);
        assert_eq!(preview.chars().count(), 5000);
    }

    #[test]
    fn test_truncate_is_idempotent() {
        let text = "é".repeat(20);
        let once = truncate_preview(&text, 7);
        let twice = truncate_preview(&once, 7);
        assert_eq!(once, twice);
        assert_eq!(once.chars().count(), 7);
    }
}
