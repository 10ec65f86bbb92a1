//! JSON responses.

use anyhow::Result;
use serde_json::{Value as JsonValue, json};
use tiny_http::{Header, Method, Request, Response, StatusCode};

const JSON: &str = "application/json; charset=utf-8";

/// Respond with `value` as JSON; HEAD requests get the headers only.
pub fn respond_json(request: Request, status: u16, value: &JsonValue) -> Result<()> {
    if is_head_request(&request) {
        let mut response = Response::empty(StatusCode(status));
        add_header(&mut response, "Content-Type", JSON);
        request.respond(response)?;
        return Ok(());
    }

    let body = serde_json::to_vec(value)?;
    let mut response = Response::from_data(body).with_status_code(StatusCode(status));
    add_header(&mut response, "Content-Type", JSON);
    request.respond(response)?;
    Ok(())
}

pub fn respond_error(request: Request, status: u16, message: &str) -> Result<()> {
    respond_json(request, status, &json!({ "error": message }))
}

pub fn respond_not_found(request: Request) -> Result<()> {
    respond_error(request, 404, "not found")
}

/// 405 with an `Allow` header.
pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    let mut response = Response::from_data(
        serde_json::to_vec(&json!({ "error": "method not allowed" }))?,
    )
    .with_status_code(StatusCode(405));
    add_header(&mut response, "Content-Type", JSON);
    add_header(&mut response, "Allow", "GET, HEAD");
    request.respond(response)?;
    Ok(())
}

/// 503 while the server shuts down.
pub fn respond_unavailable(request: Request) -> Result<()> {
    respond_error(request, 503, "shutting down")
}

pub fn is_allowed_method(method: &Method) -> bool {
    matches!(method, Method::Get | Method::Head)
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn add_header<R: std::io::Read>(response: &mut Response<R>, key: &str, value: &str) {
    if let Ok(header) = Header::from_bytes(key.as_bytes(), value.as_bytes()) {
        response.add_header(header);
    }
}
