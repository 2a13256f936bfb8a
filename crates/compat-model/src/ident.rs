//! Host-safe identifier segments
//!
//! Unit and scope names are assembled from dimension/namespace names and
//! version labels. Names become PascalCase segments, versions become
//! lowercase segments whose separator runs collapse into a single `_`.
//! Because name segments always start upper-case and version segments never
//! contain upper-case letters, joining them stays unambiguous for a fixed
//! set of names.

/// Characters allowed in dimension and namespace names besides ASCII alphanumerics
const NAME_PUNCTUATION: [char; 3] = ['.', '-', '_'];

/// Check whether `name` is acceptable as a dimension or namespace name
///
/// Empty names are rejected here; callers that allow an anonymous
/// namespace check for emptiness themselves.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || NAME_PUNCTUATION.contains(&c))
}

/// Turn a dimension or namespace name into a PascalCase segment
///
/// `"commons-lang"` becomes `"CommonsLang"`, `"dim2B"` becomes `"Dim2B"`.
/// Anything that is not ASCII alphanumeric is dropped and capitalizes the
/// character after it.
#[must_use]
pub fn pascal_segment(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut capitalize_next = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if capitalize_next {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
            capitalize_next = false;
        } else {
            capitalize_next = true;
        }
    }
    out
}

/// Turn a version label into a lowercase segment
///
/// `"3.10"` becomes `"3_10"`, `"8-0-2"` and `"8.0.2"` both become `"8_0_2"`,
/// `"3.0-RC1"` becomes `"3_0_rc1"`. Leading and trailing separators vanish.
#[must_use]
pub fn version_segment(version: &str) -> String {
    let mut out = String::with_capacity(version.len());
    let mut pending_separator = false;
    for c in version.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    out
}

/// Check whether `version` yields a non-empty identifier segment
///
/// Rejects the empty string and labels made only of separators (`"."`,
/// `"-_"`), which would otherwise leave a truncated unit or scope name.
#[must_use]
pub fn is_valid_version(version: &str) -> bool {
    !version_segment(version).is_empty()
}

/// Check that an assembled identifier only uses characters every host accepts
#[must_use]
pub fn is_host_safe(identifier: &str) -> bool {
    !identifier.is_empty()
        && identifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}
