// ABOUTME: HTTP server for the generated site
// ABOUTME: Resolves each request through the Resolver and serves the file it maps to

use log::{debug, error, info};
use percent_encoding::percent_decode_str;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use tiny_http::{Header, Request, Response, Server, StatusCode};

use crate::errors::{Result, SiteError};
use crate::resolver::Resolver;

/// Outcome of looking up a request URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found {
        path: PathBuf,
        content_type: &'static str,
    },
    /// Nothing exists for this path
    NotFound(String),
    /// Something exists but could not be inspected
    Failed(String),
}

/// Map a raw request URL (path plus optional query) to a file.
///
/// The path is percent-decoded (`%20` -> space) before it is resolved.
pub fn lookup(resolver: &Resolver, url: &str) -> Lookup {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let decoded = match percent_decode_str(path).decode_utf8() {
        Ok(decoded) => decoded,
        Err(_) => return Lookup::NotFound(path.trim_matches('/').to_string()),
    };
    let request = decoded.trim_matches('/');

    match resolver.resolve(request) {
        Ok(path) => {
            let content_type = content_type_for(&path);
            Lookup::Found { path, content_type }
        }
        Err(SiteError::NoMapping(resource)) => Lookup::NotFound(resource),
        Err(e) => Lookup::Failed(e.to_string()),
    }
}

/// Determine content type based on file extension
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "application/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}

/// Start an HTTP server on `port` in a background thread.
///
/// The server only reads the output tree, it never touches the build state,
/// so it can run alongside watch mode.
pub fn start_server(resolver: Resolver, port: u16) -> Result<JoinHandle<()>> {
    let server = Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| SiteError::ServerError(format!("Failed to start HTTP server: {}", e)))?;

    let handle = thread::spawn(move || {
        info!("HTTP server listening on http://localhost:{}", port);

        for request in server.incoming_requests() {
            respond(&resolver, request);
        }
    });

    Ok(handle)
}

fn respond(resolver: &Resolver, request: Request) {
    let url = request.url().to_string();

    let response = match lookup(resolver, &url) {
        Lookup::Found { path, content_type } => match fs::read(&path) {
            Ok(content) => {
                debug!("Request for {:?} -> {:?}", url, path);
                let response = Response::from_data(content);
                match Header::from_bytes("Content-Type", content_type) {
                    Ok(header) => response.with_header(header),
                    Err(()) => response,
                }
            }
            Err(e) => {
                error!("Failed to read file {:?}: {}", path, e);
                Response::from_string(format!("Failed to read file: {}", e))
                    .with_status_code(StatusCode(500))
            }
        },
        Lookup::NotFound(resource) => {
            info!("Unknown resource {} requested", resource);
            Response::from_string("404 Not Found").with_status_code(StatusCode(404))
        }
        Lookup::Failed(message) => {
            error!("Failed to resolve {:?}: {}", url, message);
            Response::from_string("500 Internal Server Error").with_status_code(StatusCode(500))
        }
    };

    if let Err(e) = request.respond(response) {
        error!("Failed to send response: {}", e);
    }
}
