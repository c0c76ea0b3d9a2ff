//! Value normalization applied before indexing and lookup.

use crate::document::FieldValue;
use crate::schema::FieldKind;

/// Normalize a value into the key form used by the posting store.
///
/// String and text kinds are lower-cased. Scalars render to their canonical
/// string form; integers stored in float fields render as floats so that
/// `30` and `30.0` share one key.
///
/// # Examples
///
/// ```
/// use tridex::analysis::normalize;
/// use tridex::document::FieldValue;
/// use tridex::schema::FieldKind;
///
/// assert_eq!(normalize(FieldKind::Text, &FieldValue::from("John Smith")), "john smith");
/// assert_eq!(normalize(FieldKind::Int, &FieldValue::Int(30)), "30");
/// assert_eq!(normalize(FieldKind::Float, &FieldValue::Int(30)), "30");
/// assert_eq!(normalize(FieldKind::Bool, &FieldValue::Bool(true)), "true");
/// ```
pub fn normalize(kind: FieldKind, value: &FieldValue) -> String {
    match (kind, value) {
        (FieldKind::Float, FieldValue::Int(i)) => render_float(*i as f64),
        (_, FieldValue::Float(f)) => render_float(*f),
        (kind, FieldValue::Str(s) | FieldValue::Text(s)) if kind.is_string_like() => {
            lowercase(s)
        }
        (_, value) => value.to_string(),
    }
}

/// `-0.0` and `0.0` compare equal, so both render as `0`.
fn render_float(f: f64) -> String {
    if f == 0.0 {
        0.0_f64.to_string()
    } else {
        f.to_string()
    }
}

/// Lower-case text, taking the ASCII fast path when possible.
pub fn lowercase(text: &str) -> String {
    if text.is_ascii() {
        text.to_ascii_lowercase()
    } else {
        text.to_lowercase()
    }
}
