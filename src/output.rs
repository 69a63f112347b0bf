use crate::types::Request;

/// Serialize a [`Request`] to a JSON string.
///
/// When `pretty` is `true` the output is indented for readability.
pub fn format_json(request: &Request, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(request).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    } else {
        serde_json::to_string(request).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

/// Render a [`Request`] in a human-readable debug format.
pub fn format_debug(request: &Request) -> String {
    let mut out = String::with_capacity(256);

    out.push_str("=== HTTP Request ===\n");
    out.push_str(&format!("Method:  {}\n", request.request_line.method));
    out.push_str(&format!("Target:  {}\n", request.request_line.target));
    out.push_str(&format!("Version: {}\n", request.request_line.version));

    out.push_str(&format!("\n--- Headers ({}) ---\n", request.headers.len()));
    for (name, value) in request.headers.iter() {
        out.push_str(&format!("  {name}: {value}\n"));
    }

    if request.body.is_empty() {
        out.push_str("\n--- No Body ---\n");
    } else {
        out.push_str(&format!("\n--- Body ({} bytes) ---\n", request.body.len()));
        match request.body_as_str() {
            Some(s) => out.push_str(s),
            None => out.push_str(&format!("<binary data: {} bytes>", request.body.len())),
        }
        out.push('\n');
    }

    out.push_str("====================\n");
    out
}

/// Render only the request line and headers (no body).
pub fn format_headers_only(request: &Request) -> String {
    let mut out = String::with_capacity(64 + request.headers.len() * 40);

    out.push_str(&format!("{}\n", request.request_line));
    for (name, value) in request.headers.iter() {
        out.push_str(&format!("{name}: {value}\n"));
    }

    out
}
