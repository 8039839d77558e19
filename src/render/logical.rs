//! Conjunction and negation of rendered filters.
//!
//! Both work on rendered documents so that clauses are compared by the names
//! they render to, whatever spelling the caller used for the field.

use crate::value::{Document, Value};

/// Merge rendered filters into one document.
///
/// Clauses on distinct names are added side by side, and operator documents
/// on the same name merge when their operators do not overlap
/// (`{age: {$gt: 1, $lt: 5}}`). Any other collision promotes the whole filter
/// to `{$and: [...]}`. Nested `$and` clauses are flattened.
pub(crate) fn conjoin(filters: Vec<Document>) -> Document {
    let mut combined = Document::new();
    for filter in filters {
        for (name, value) in filter {
            add_clause(&mut combined, name, value);
        }
    }
    combined
}

fn add_clause(document: &mut Document, name: String, value: Value) {
    let value = match (name.as_str(), value) {
        ("$and", Value::Array(items)) if items.iter().all(|i| matches!(i, Value::Document(_))) => {
            for item in items {
                if let Value::Document(clauses) = item {
                    for (name, value) in clauses {
                        add_clause(document, name, value);
                    }
                }
            }
            return;
        }
        (_, value) => value,
    };

    if let (1, Some(Value::Array(clauses))) = (document.len(), document.get_mut("$and")) {
        clauses.push(Value::Document(Document::single(name, value)));
        return;
    }

    if !document.contains_key(&name) {
        document.insert(name, value);
        return;
    }

    let disjoint = match (document.get(&name), &value) {
        (Some(Value::Document(existing)), Value::Document(operators)) => {
            !operators.keys().any(|op| existing.contains_key(op))
        }
        _ => false,
    };
    if !disjoint {
        promote_to_and(document, name, value);
        return;
    }
    if let (Some(Value::Document(existing)), Value::Document(operators)) =
        (document.get_mut(&name), value)
    {
        existing.merge(operators, false);
    }
}

fn promote_to_and(document: &mut Document, name: String, value: Value) {
    let previous = std::mem::take(document);
    let mut clauses: Vec<Value> = previous
        .into_iter()
        .map(|(name, value)| Value::Document(Document::single(name, value)))
        .collect();
    clauses.push(Value::Document(Document::single(name, value)));
    document.insert("$and", clauses);
}

/// Negate a rendered filter.
///
/// Single-clause filters are rewritten in place (`$ne`, `$nin`, `$not`,
/// `$or` <-> `$nor`); anything else is wrapped in `{$nor: [filter]}`.
pub(crate) fn negate(filter: Document) -> Document {
    if filter.len() == 1 {
        if let Some(negated) = filter.first().and_then(|(name, value)| negate_clause(name, value)) {
            return negated;
        }
    }
    Document::single("$nor", vec![Value::Document(filter)])
}

fn negate_clause(name: &str, value: &Value) -> Option<Document> {
    if name.starts_with('$') {
        return match name {
            "$or" => Some(Document::single("$nor", value.clone())),
            "$nor" => Some(Document::single("$or", value.clone())),
            _ => None,
        };
    }

    if let Value::Document(selector) = value {
        if let Some((operator, operand)) = selector.first() {
            if operator.starts_with('$') && operator != "$ref" {
                if selector.len() > 1 {
                    return None;
                }
                return Some(Document::single(name, negate_operator(operator, operand)));
            }
        }
    }

    let negated = match value {
        Value::Regex { .. } => Document::single("$not", value.clone()),
        _ => Document::single("$ne", value.clone()),
    };
    Some(Document::single(name, negated))
}

fn negate_operator(operator: &str, operand: &Value) -> Value {
    match operator {
        "$exists" => Document::single("$exists", !truthy(operand)).into(),
        "$in" => Document::single("$nin", operand.clone()).into(),
        "$nin" => Document::single("$in", operand.clone()).into(),
        "$ne" | "$not" => operand.clone(),
        _ => Document::single("$not", Document::single(operator, operand.clone())).into(),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Int32(i) => *i != 0,
        Value::Int64(i) => *i != 0,
        Value::Double(d) => *d != 0.0,
        Value::Null => false,
        _ => true,
    }
}
