//! MIME type detection based on file extensions.

static MIME_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("js", "text/javascript"),
    ("css", "text/css"),
    ("txt", "text/plain"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("ico", "image/x-icon"),
];

/// Guess the MIME type of a file from its extension.
///
/// Unknown or missing extensions map to `text/plain`.
pub fn guess(filename: &str) -> &'static str {
    let Some((_, ext)) = filename.rsplit_once('.') else {
        return "text/plain";
    };

    for (e, mime) in MIME_TYPES {
        if *e == ext {
            return mime;
        }
    }

    "text/plain"
}
