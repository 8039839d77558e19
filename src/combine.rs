//! Update-operator combination.

use crate::value::{Document, Value};

/// Merge rendered update documents operator by operator.
///
/// Within one operator a later field overwrites an earlier one but keeps the
/// earlier position. Operator values that are not documents are replaced
/// whole. No input yields an empty document.
pub fn combine(documents: impl IntoIterator<Item = Document>) -> Document {
    let mut combined = Document::new();
    for document in documents {
        for (operator, value) in document {
            let mergeable = matches!(combined.get(&operator), Some(Value::Document(_)));
            match value {
                Value::Document(fields) if mergeable => {
                    if let Some(Value::Document(existing)) = combined.get_mut(&operator) {
                        existing.merge(fields, true);
                    }
                }
                value => {
                    combined.insert(operator, value);
                }
            }
        }
    }
    combined
}
