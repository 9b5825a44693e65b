//! REST path templates with `:name` single-segment placeholders.

/// Whether `template` contains at least one `:`-prefixed segment.
pub fn has_placeholder(template: &str) -> bool {
    template.split('/').any(|segment| segment.starts_with(':'))
}

/// Match a concrete request path against a path template.
///
/// Exact string equality always matches. Otherwise the template must contain a
/// placeholder; both sides are trimmed of leading/trailing slashes and split on
/// `/`, segment counts must agree, placeholder segments match anything and all
/// other segments must be equal. No prefix or multi-segment wildcards.
pub fn matches(template: &str, path: &str) -> bool {
    if template == path {
        return true;
    }
    if !has_placeholder(template) {
        return false;
    }

    let template: Vec<&str> = template.trim_matches('/').split('/').collect();
    let path: Vec<&str> = path.trim_matches('/').split('/').collect();
    if template.len() != path.len() {
        return false;
    }

    template
        .iter()
        .zip(&path)
        .all(|(expected, actual)| expected.starts_with(':') || expected == actual)
}
