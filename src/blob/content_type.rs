//! Content type inference from file extensions

/// Fallback for unknown or missing extensions
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Determine the MIME type of a blob from its (lowercased) extension
pub fn determine_content_type(filename: &str) -> &'static str {
    let base = filename.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(filename);
    let extension = base.rsplit('.').next().unwrap_or(base).to_lowercase();

    match extension.as_str() {
        "avi" => "video/x-msvideo",
        "bmp" => "image/bmp",
        "csv" => "text/csv",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "flv" => "video/x-flv",
        "gif" => "image/gif",
        "htm" | "html" => "text/html",
        "jpeg" | "jpg" => "image/jpeg",
        "js" => "application/javascript",
        "json" => "application/json",
        "m4v" | "mp4" => "video/mp4",
        "mkv" => "video/x-matroska",
        "mov" => "video/quicktime",
        "ogv" => "video/ogg",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "tif" | "tiff" => "image/tiff",
        "txt" => "text/plain",
        "webm" => "video/webm",
        "wmv" => "video/x-ms-wmv",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xml" => "application/xml",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(determine_content_type("a.b.JPG"), "image/jpeg");
        assert_eq!(determine_content_type("report.pdf"), "application/pdf");
        assert_eq!(determine_content_type("docs/index.HTM"), "text/html");
        assert_eq!(determine_content_type("clip.m4v"), "video/mp4");
    }

    #[test]
    fn test_unknown_extensions() {
        assert_eq!(determine_content_type("noext"), DEFAULT_CONTENT_TYPE);
        assert_eq!(determine_content_type("archive.tar.zst"), DEFAULT_CONTENT_TYPE);
        assert_eq!(determine_content_type(""), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_path_separators_are_ignored() {
        assert_eq!(determine_content_type("dir.png/file"), DEFAULT_CONTENT_TYPE);
        assert_eq!(determine_content_type("c:\\temp\\notes.txt"), "text/plain");
        assert_eq!(determine_content_type("folder/"), DEFAULT_CONTENT_TYPE);
    }
}
