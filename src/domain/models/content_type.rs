use std::path::Path;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Maps a filename to a MIME type by its (case-insensitive) extension.
pub fn content_type_for(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("html") => "text/html",
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") => "image/jpg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("wav") => "audio/wav",
        Some("mp4") => "video/mp4",
        Some("woff") => "application/font-woff",
        Some("ttf") => "application/font-ttf",
        Some("eot") => "application/vnd.ms-fontobject",
        Some("otf") => "application/font-otf",
        Some("wasm") => "application/wasm",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(content_type_for("x.svg"), "image/svg+xml");
        assert_eq!(content_type_for("index.html"), "text/html");
        assert_eq!(content_type_for("app.wasm"), "application/wasm");
        assert_eq!(content_type_for("photo-1700000000000-42.jpg"), "image/jpg");
    }

    #[test]
    fn extension_match_ignores_case() {
        assert_eq!(content_type_for("LOGO.PNG"), "image/png");
    }

    #[test]
    fn unknown_or_missing_extension_falls_back() {
        assert_eq!(content_type_for("x.unknownext"), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for("README"), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for(".env"), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for(""), DEFAULT_CONTENT_TYPE);
    }
}
