//! Static file responder.
//!
//! Resolves a request path against a static router's directory and fills in
//! the response. Regular files are not buffered: the caller receives the
//! path back and streams the contents to the socket after the headers.

use crate::http::mime;
use crate::http::request::Request;
use crate::http::response::Response;
use std::path::PathBuf;
use tokio::fs;

/// Respond to a request resolved to a static router.
///
/// Returns the file to stream after the headers, when the target is a
/// regular file. The remainder of the path after the mount point is joined
/// onto `directory` as-is; there is no traversal sanitization.
pub async fn respond(
    directory: &str,
    allow_index: bool,
    mount_point: &str,
    req: &Request,
    resp: &mut Response,
) -> Option<PathBuf> {
    let rest = req.path.strip_prefix(mount_point).unwrap_or(req.path.as_str());
    let filename = format!("{}/{}", directory.trim_end_matches('/'), rest);

    let meta = match fs::metadata(&filename).await {
        Ok(meta) => meta,
        Err(_) => {
            resp.not_found();
            return None;
        }
    };

    resp.set_status(200);

    if meta.is_dir() {
        if !allow_index {
            resp.not_found();
            return None;
        }
        resp.set_header("Content-Type", "text/html");
        resp.write(directory_listing(&filename, &req.path).await);
        return None;
    }

    resp.set_header("Content-Type", mime::guess(&filename));
    resp.set_header("Content-Length", meta.len().to_string());

    Some(PathBuf::from(filename))
}

/// One link per directory entry, with exactly one `/` between the request
/// path and the entry name.
async fn directory_listing(dir: &str, request_path: &str) -> String {
    let mut html = String::new();

    let Ok(mut entries) = fs::read_dir(dir).await else {
        return html;
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };

        html.push_str("<a href=\"");
        html.push_str(request_path);
        if !request_path.ends_with('/') {
            html.push('/');
        }
        html.push_str(name);
        html.push_str("\">");
        html.push_str(name);
        html.push_str("</a><br />");
    }

    html
}
