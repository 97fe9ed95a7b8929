use rattle::widget::escape_html;

pub(crate) const CLIENT_SCRIPT: &str = include_str!("../assets/default.js");
pub(crate) const CLIENT_SCRIPT_ROUTE: &str = "/default.js";

/// Wraps a bound template in the document shell that loads the client
/// script.
pub(crate) fn render_page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{body}\n<script src=\"{CLIENT_SCRIPT_ROUTE}\"></script>\n</body>\n</html>\n",
        escape_html(title)
    )
}
