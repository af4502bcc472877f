//! Access denied page returned with a 403.

/// Escape text for inclusion in HTML element content.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render the denial page; the client address is escaped before it is embedded.
pub fn render_access_denied_page(client_address: &str) -> String {
    format!(
        concat!(
            "<html>",
            "<head><title>Access Denied</title>",
            "<style>body{{font-family:Arial,sans-serif;text-align:center;margin-top:50px;}}</style></head>",
            "<body>",
            "<h1> Access Denied</h1>",
            "<p>Your IP address <strong>{addr}</strong> is not allowed to access this resource.</p>",
            "<p>If you believe this is an error, please contact the administrator.</p>",
            "<hr><small>CDN IP Restriction</small>",
            "</body></html>"
        ),
        addr = escape_html(client_address)
    )
}
