//! Safety checks on markup before it reaches an HTML surface.

cached_regex!(allowed_tag, r"&lt;(/?)(strong|em|h[1-4])&gt;");

pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escapes everything except the tags the formatter itself emits, so a reply
/// carrying `<script>` is shown as text.
pub fn sanitize(html: &str) -> String {
    allowed_tag()
        .replace_all(&escape(html), "<${1}${2}>")
        .into_owned()
}
