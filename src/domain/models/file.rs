use std::path::{Component, Path};

use chrono::{DateTime, Utc};

use super::content_type::content_type_for;

pub const UPLOADS_URL_PREFIX: &str = "/uploads";

const FALLBACK_FILE_NAME: &str = "file";

/// A file as it currently exists in the storage directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub name: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

impl StoredFile {
    pub fn mime_type(&self) -> &'static str {
        content_type_for(&self.name)
    }

    pub fn url(&self) -> String {
        format!("{}/{}", UPLOADS_URL_PREFIX, self.name)
    }
}

/// A freshly stored upload together with the name the client sent.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub stored: StoredFile,
}

/// Strips any directory segments a client put in its filename.
pub fn client_file_name(raw: Option<&str>) -> String {
    raw.and_then(|name| {
        name.rsplit(['/', '\\'])
            .next()
            .map(str::trim)
            .filter(|n| !n.is_empty() && *n != "." && *n != "..")
            .map(str::to_string)
    })
    .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

/// Most filesystems cap a single name component at 255 bytes.
pub const MAX_STORED_NAME_BYTES: usize = 255;

/// Longer "extensions" are treated as part of the stem.
const MAX_EXTENSION_BYTES: usize = 16;

fn truncate_on_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// `report.pdf` -> `report-<millis>-<suffix>.pdf`; `README` -> `README-<millis>-<suffix>`.
/// The stem is shortened so the result never exceeds [`MAX_STORED_NAME_BYTES`].
pub fn unique_file_name(original_name: &str, epoch_millis: i64, suffix: u32) -> String {
    let path = Path::new(original_name);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| e.len() <= MAX_EXTENSION_BYTES);
    let stem = match extension {
        Some(_) => path.file_stem().and_then(|s| s.to_str()),
        None => path.file_name().and_then(|s| s.to_str()),
    }
    .unwrap_or(FALLBACK_FILE_NAME);

    let unique = format!("-{}-{}", epoch_millis, suffix);
    let dotted_extension = extension.map(|e| format!(".{}", e)).unwrap_or_default();
    let stem_budget = MAX_STORED_NAME_BYTES
        .saturating_sub(unique.len())
        .saturating_sub(dotted_extension.len());
    let stem = truncate_on_char_boundary(stem, stem_budget);

    format!("{}{}{}", stem, unique, dotted_extension)
}

/// A stored name must be exactly one normal path component.
pub fn is_valid_stored_name(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\', '\0']) {
        return false;
    }

    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_goes_before_extension() {
        assert_eq!(
            unique_file_name("report.pdf", 1_700_000_000_000, 123),
            "report-1700000000000-123.pdf"
        );
        assert_eq!(
            unique_file_name("archive.tar.gz", 1, 2),
            "archive.tar-1-2.gz"
        );
        assert_eq!(unique_file_name("README", 5, 9), "README-5-9");
    }

    #[test]
    fn long_names_are_shortened_to_fit() {
        let original = format!("{}.txt", "a".repeat(250));
        let name = unique_file_name(&original, 1_700_000_000_000, 999_999_999);

        assert_eq!(name.len(), MAX_STORED_NAME_BYTES);
        assert!(name.ends_with("-1700000000000-999999999.txt"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let original = format!("{}.png", "é".repeat(200));
        let name = unique_file_name(&original, 1_700_000_000_000, 1);

        assert!(name.len() <= MAX_STORED_NAME_BYTES);
        assert!(name.ends_with("-1700000000000-1.png"));
    }

    #[test]
    fn overlong_extension_is_kept_in_the_stem() {
        let original = format!("notes.{}", "x".repeat(300));
        let name = unique_file_name(&original, 1, 2);

        assert!(name.len() <= MAX_STORED_NAME_BYTES);
        assert!(name.starts_with("notes.xxx"));
        assert!(name.ends_with("-1-2"));
    }

    #[test]
    fn distinct_suffixes_give_distinct_names() {
        let a = unique_file_name("report.pdf", 10, 1);
        let b = unique_file_name("report.pdf", 10, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn client_file_name_drops_directories() {
        assert_eq!(client_file_name(Some("a.png")), "a.png");
        assert_eq!(client_file_name(Some("../../etc/passwd")), "passwd");
        assert_eq!(client_file_name(Some("C:\\Users\\me\\notes.txt")), "notes.txt");
        assert_eq!(client_file_name(Some("dir/..")), "file");
        assert_eq!(client_file_name(Some("")), "file");
        assert_eq!(client_file_name(None), "file");
    }

    #[test]
    fn stored_name_validation() {
        assert!(is_valid_stored_name("a-1-2.png"));
        assert!(is_valid_stored_name(".hidden"));
        assert!(!is_valid_stored_name(""));
        assert!(!is_valid_stored_name("."));
        assert!(!is_valid_stored_name(".."));
        assert!(!is_valid_stored_name("../secret"));
        assert!(!is_valid_stored_name("nested/file"));
        assert!(!is_valid_stored_name("..\\secret"));
        assert!(!is_valid_stored_name("/etc/passwd"));
    }

    #[test]
    fn stored_file_derived_fields() {
        let file = StoredFile {
            name: "x-1-2.svg".to_string(),
            size: 3,
            uploaded_at: Utc::now(),
        };
        assert_eq!(file.url(), "/uploads/x-1-2.svg");
        assert_eq!(file.mime_type(), "image/svg+xml");
    }
}
