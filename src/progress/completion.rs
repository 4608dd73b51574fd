//! Field-level completion rules. Only presence is judged here; value
//! validity is the form layer's concern.

use serde_json::Value;

use super::domain::FieldType;

/// Judge whether a raw value counts as an answer for a field of the given
/// declared type. Rules are checked in priority order:
///
/// 1. null/absent is incomplete regardless of type;
/// 2. checkbox: any boolean counts, including an explicit `false`;
/// 3. multiselect: a non-empty array;
/// 4. number/currency/rating: a finite number;
/// 5. file and every string-backed type (plus unrecognized types): a string
///    with non-whitespace content.
pub fn field_is_complete(field_type: FieldType, value: Option<&Value>) -> bool {
    let value = match value {
        None | Some(Value::Null) => return false,
        Some(value) => value,
    };

    match field_type {
        FieldType::Checkbox => value.is_boolean(),
        FieldType::Multiselect => value.as_array().map_or(false, |items| !items.is_empty()),
        FieldType::Number | FieldType::Currency | FieldType::Rating => {
            value.as_f64().map_or(false, f64::is_finite)
        }
        _ => non_blank_string(value),
    }
}

/// Type-agnostic presence test used where no catalog metadata exists: a
/// non-blank string or a finite number counts, nothing else does.
pub fn value_is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(value) => non_blank_string(value) || value.as_f64().map_or(false, f64::is_finite),
    }
}

fn non_blank_string(value: &Value) -> bool {
    value.as_str().map_or(false, |text| !text.trim().is_empty())
}
