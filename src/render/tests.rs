use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::builders::{Filter, Projection, Sort, Update};
use crate::codec::Native;
use crate::error::{RenderError, ResolveError};
use crate::expr::Expr;
use crate::fixtures::{person, person_domain};

fn x() -> Expr {
    Expr::param()
}

fn render_filter(filter: Filter) -> serde_json::Value {
    let domain = person_domain();
    let renderer = Renderer::new(&domain, person());
    filter.render(&renderer).unwrap().to_json()
}

// =============================================================================
// Filters
// =============================================================================

#[test]
fn test_predicate_renders_element_names() {
    let predicate = x()
        .member("FirstName")
        .equals("Jack")
        .and(x().member("Age").greater_than(10));
    let filter = Filter::where_(&predicate).unwrap();
    assert_eq!(render_filter(filter), json!({"fn": "Jack", "age": {"$gt": 10}}));
}

#[test]
fn test_literal_encoded_with_field_codec() {
    let domain = person_domain();
    let renderer = Renderer::new(&domain, person());
    let doc = Filter::gt("Age", 10).render(&renderer).unwrap();
    let age = doc.get_document("age").unwrap();
    assert_eq!(age.get("$gt"), Some(&Value::Int32(10)));
}

#[test]
fn test_enum_written_with_domain_representation() {
    assert_eq!(render_filter(Filter::eq("Gender", "Female")), json!({"g": "Female"}));
}

#[test]
fn test_any_element_uses_element_codec() {
    assert_eq!(
        render_filter(Filter::any_eq("Genders", "Female")),
        json!({"gs": "Female"})
    );
    assert_eq!(
        render_filter(Filter::in_("Genders", ["Male", "Female"])),
        json!({"gs": {"$in": ["Male", "Female"]}})
    );
}

#[test]
fn test_scalar_against_array_adapts_by_default() {
    assert_eq!(render_filter(Filter::eq("Tags", "red")), json!({"tags": "red"}));
}

#[test]
fn test_scalar_against_array_rejected_by_policy() {
    let domain = person_domain();
    let options = RenderOptions {
        scalar_for_array: ScalarForArrayPolicy::Reject,
        ..RenderOptions::default()
    };
    let renderer = Renderer::with_options(&domain, person(), options);
    let err = Filter::eq("Tags", "red").render(&renderer).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Resolve(ResolveError::AmbiguousScalarForArrayField { ref field }) if field == "tags"
    ));

    let doc = Filter::eq("Tags", vec!["red", "blue"]).render(&renderer).unwrap();
    assert_eq!(doc.to_json(), json!({"tags": ["red", "blue"]}));
}

#[test]
fn test_elem_match_fields_relative_to_element() {
    let filter = Filter::elem_match(
        "Pets",
        Filter::and(vec![Filter::eq("Name", "Rex"), Filter::eq("Type", "dog")]),
    );
    assert_eq!(
        render_filter(filter),
        json!({"pets": {"$elemMatch": {"name": "Rex", "type": "dog"}}})
    );
}

#[test]
fn test_nested_and_indexed_paths() {
    assert_eq!(
        render_filter(Filter::eq("Name.First", "Jack")),
        json!({"name.fn": "Jack"})
    );
    let filter = Filter::eq(x().member("Pets").index(3).member("Type"), "cat");
    assert_eq!(render_filter(filter), json!({"pets.3.type": "cat"}));
    let filter = Filter::eq(x().member("Pets").index(-1).member("Name"), "Rex");
    assert_eq!(render_filter(filter), json!({"pets.$.name": "Rex"}));
}

#[test]
fn test_unresolved_field_passes_through_and_infers() {
    let domain = person_domain();
    let renderer = Renderer::new(&domain, person());
    let doc = Filter::eq("NoSuchField", 5i64).render(&renderer).unwrap();
    assert_eq!(doc.to_json(), json!({"NoSuchField": 5}));
    assert_eq!(doc.get("NoSuchField"), Some(&Value::Int32(5)));
}

#[test]
fn test_and_merges_operators_on_one_field() {
    let filter = Filter::and(vec![Filter::gt("Age", 10), Filter::lt("Age", 20)]);
    assert_eq!(render_filter(filter), json!({"age": {"$gt": 10, "$lt": 20}}));
}

#[test]
fn test_and_recognises_raw_and_expression_spellings() {
    let filter = Filter::and(vec![Filter::gt("Age", 1), Filter::lt(x().member("Age"), 5)]);
    assert_eq!(render_filter(filter), json!({"age": {"$gt": 1, "$lt": 5}}));

    let filter = Filter::and(vec![Filter::gt("Age", 1), Filter::gt(x().member("Age"), 5)]);
    assert_eq!(
        render_filter(filter),
        json!({"$and": [{"age": {"$gt": 1}}, {"age": {"$gt": 5}}]})
    );
}

#[test]
fn test_and_recognises_element_and_plain_keys() {
    let filter = Filter::and(vec![Filter::any_eq("Tags", "a"), Filter::eq("Tags", "b")]);
    assert_eq!(
        render_filter(filter),
        json!({"$and": [{"tags": "a"}, {"tags": "b"}]})
    );
}

#[test]
fn test_and_recognises_member_and_element_names() {
    let filter = Filter::and(vec![Filter::eq("FirstName", "Jack"), Filter::eq("fn", "Jill")]);
    assert_eq!(
        render_filter(filter),
        json!({"$and": [{"fn": "Jack"}, {"fn": "Jill"}]})
    );
}

#[test]
fn test_predicate_conjunction_keeps_every_clause() {
    let predicate = x()
        .member("Age")
        .greater_than(10)
        .and(x().member("Age").less_than(20))
        .and(x().member("FirstName").equals("Jack"));
    let filter = Filter::where_(&predicate).unwrap();
    assert_eq!(
        render_filter(filter),
        json!({"age": {"$gt": 10, "$lt": 20}, "fn": "Jack"})
    );
}

#[test]
fn test_nested_and_flattens() {
    let filter = Filter::and(vec![
        Filter::and(vec![Filter::eq("FirstName", "Jack"), Filter::eq("FirstName", "Jill")]),
        Filter::gt("Age", 3),
    ]);
    assert_eq!(
        render_filter(filter),
        json!({"$and": [{"fn": "Jack"}, {"fn": "Jill"}, {"age": {"$gt": 3}}]})
    );
}

#[test]
fn test_and_with_type_filter() {
    let domain = person_domain();
    let renderer = Renderer::new(&domain, SemanticType::class("Pet"));
    let filter = Filter::and(vec![Filter::of_type("Dog"), Filter::eq("Name", "Rex")]);
    assert_eq!(
        filter.render(&renderer).unwrap().to_json(),
        json!({"_t": "Dog", "name": "Rex"})
    );
}

#[test]
fn test_or_and_not() {
    let filter = Filter::or(vec![
        Filter::eq("FirstName", "Jack"),
        Filter::not(Filter::eq("IsActive", true)),
    ]);
    assert_eq!(
        render_filter(filter),
        json!({"$or": [{"fn": "Jack"}, {"active": {"$ne": true}}]})
    );
}

#[test]
fn test_not_rewrites_single_clause_filters() {
    assert_eq!(
        render_filter(Filter::not(Filter::in_("Genders", ["Male"]))),
        json!({"gs": {"$nin": ["Male"]}})
    );
    assert_eq!(
        render_filter(Filter::not(Filter::nin("Age", [1, 2]))),
        json!({"age": {"$in": [1, 2]}})
    );
    assert_eq!(
        render_filter(Filter::not(Filter::exists("Tags", true))),
        json!({"tags": {"$exists": false}})
    );
    assert_eq!(
        render_filter(Filter::not(Filter::ne("FirstName", "Jack"))),
        json!({"fn": "Jack"})
    );
    assert_eq!(
        render_filter(Filter::not(Filter::gt("Age", 10))),
        json!({"age": {"$not": {"$gt": 10}}})
    );
    assert_eq!(
        render_filter(Filter::not(Filter::regex("FirstName", "^J", "i"))),
        json!({"fn": {"$not": {"$regularExpression": {"pattern": "^J", "options": "i"}}}})
    );
}

#[test]
fn test_not_swaps_or_and_nor() {
    let either = || vec![Filter::eq("FirstName", "Jack"), Filter::gt("Age", 3)];
    assert_eq!(
        render_filter(Filter::not(Filter::or(either()))),
        json!({"$nor": [{"fn": "Jack"}, {"age": {"$gt": 3}}]})
    );
    assert_eq!(
        render_filter(Filter::not(Filter::nor(either()))),
        json!({"$or": [{"fn": "Jack"}, {"age": {"$gt": 3}}]})
    );
}

#[test]
fn test_not_of_multi_clause_filter_uses_nor() {
    let filter = Filter::not(Filter::and(vec![
        Filter::eq("FirstName", "Jack"),
        Filter::gt("Age", 3),
    ]));
    assert_eq!(
        render_filter(filter),
        json!({"$nor": [{"fn": "Jack", "age": {"$gt": 3}}]})
    );
}

#[test]
fn test_negated_predicate_renders_not() {
    let predicate = x().member("Age").greater_than(3).negate();
    let filter = Filter::where_(&predicate).unwrap();
    assert_eq!(render_filter(filter), json!({"age": {"$not": {"$gt": 3}}}));
}

#[test]
fn test_modulo_writes_int64() {
    let domain = person_domain();
    let renderer = Renderer::new(&domain, person());
    let doc = Filter::modulo("Age", 2, 0).render(&renderer).unwrap();
    let age = doc.get_document("age").unwrap();
    assert_eq!(
        age.get("$mod"),
        Some(&Value::Array(vec![Value::Int64(2), Value::Int64(0)]))
    );
}

#[test]
fn test_regex_passes_through() {
    assert_eq!(
        render_filter(Filter::regex("FirstName", "^J", "i")),
        json!({"fn": {"$regularExpression": {"pattern": "^J", "options": "i"}}})
    );
}

#[test]
fn test_exists_and_size_keep_their_own_types() {
    let filter = Filter::and(vec![Filter::exists("Tags", true), Filter::size("Scores", 3)]);
    assert_eq!(
        render_filter(filter),
        json!({"tags": {"$exists": true}, "scores": {"$size": 3}})
    );
}

#[test]
fn test_unsupported_expression_fails_before_rendering() {
    let predicate = x().member("Name").call("ToUpper", vec![]).equals("JACK");
    assert!(Filter::where_(&predicate).is_err());
}

// =============================================================================
// Type filters
// =============================================================================

fn render_pet_filter(filter: Filter) -> RenderResult<serde_json::Value> {
    let domain = person_domain();
    let renderer = Renderer::new(&domain, SemanticType::class("Pet"));
    Ok(filter.render(&renderer)?.to_json())
}

#[test]
fn test_of_type_leaf_uses_discriminator_value() {
    assert_eq!(
        render_pet_filter(Filter::of_type("Dog")).unwrap(),
        json!({"_t": "Dog"})
    );
}

#[test]
fn test_of_type_with_descendants_uses_in() {
    assert_eq!(
        render_pet_filter(Filter::of_type("Cat")).unwrap(),
        json!({"_t": {"$in": ["Cat", "Lion"]}})
    );
}

#[test]
fn test_of_type_nominal_is_empty() {
    assert_eq!(render_pet_filter(Filter::of_type("Pet")).unwrap(), json!({}));
}

#[test]
fn test_of_type_rejects_unrelated_class() {
    let err = render_pet_filter(Filter::of_type("Person")).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Stage(StageError::NotASubtype { ref nominal, ref actual })
            if nominal == "Pet" && actual == "Person"
    ));
}

#[test]
fn test_of_type_inside_elem_match() {
    let filter = Filter::elem_match("Pets", Filter::of_type("Dog"));
    assert_eq!(
        render_filter(filter),
        json!({"pets": {"$elemMatch": {"_t": "Dog"}}})
    );
}

// =============================================================================
// Updates, projections, sorts
// =============================================================================

#[test]
fn test_update_last_assignment_wins() {
    let domain = person_domain();
    let renderer = Renderer::new(&domain, person());
    let update = Update::new()
        .set("FirstName", "Jack")
        .inc("Age", 1)
        .set("FirstName", "Jim");
    let doc = update.render(&renderer).unwrap();
    assert_eq!(
        doc.to_json(),
        json!({"$set": {"fn": "Jim"}, "$inc": {"age": 1}})
    );
}

#[test]
fn test_update_combine_merges_sections() {
    let domain = person_domain();
    let renderer = Renderer::new(&domain, person());
    let update = Update::combine(vec![
        Update::new().set("FirstName", "Jack").set("LastName", "Smith"),
        Update::new().unset("Age").set("FirstName", "Jim"),
    ]);
    assert_eq!(
        update.render(&renderer).unwrap().to_json(),
        json!({"$set": {"fn": "Jim", "ln": "Smith"}, "$unset": {"age": ""}})
    );
}

#[test]
fn test_update_array_operators() {
    let domain = person_domain();
    let renderer = Renderer::new(&domain, person());
    let update = Update::new()
        .push("Tags", "new")
        .add_to_set_each("Genders", ["Male", "Female"])
        .pull_filter("Pets", Filter::eq("Name", "Rex"))
        .rename("FirstName", "LastName");
    assert_eq!(
        update.render(&renderer).unwrap().to_json(),
        json!({
            "$push": {"tags": "new"},
            "$addToSet": {"gs": {"$each": ["Male", "Female"]}},
            "$pull": {"pets": {"name": "Rex"}},
            "$rename": {"fn": "ln"}
        })
    );
}

#[test]
fn test_empty_update_renders_empty_document() {
    let domain = person_domain();
    let renderer = Renderer::new(&domain, person());
    assert_eq!(Update::new().render(&renderer).unwrap(), Document::new());
}

#[test]
fn test_projection_and_sort() {
    let domain = person_domain();
    let renderer = Renderer::new(&domain, person());
    let projection = Projection::new()
        .include("FirstName")
        .exclude("Id")
        .slice("Pets", 2);
    assert_eq!(
        projection.render(&renderer).unwrap().to_json(),
        json!({"fn": 1, "_id": 0, "pets": {"$slice": 2}})
    );

    let sort = Sort::combine(vec![
        Sort::new().ascending("Age"),
        Sort::new().descending(x().member("Name").member("Last")),
    ]);
    assert_eq!(
        sort.render(&renderer).unwrap().to_json(),
        json!({"age": 1, "name.ln": -1})
    );
}

// =============================================================================
// Direct node rendering
// =============================================================================

#[test]
fn test_field_reference_values_resolve_against_root() {
    let domain = person_domain();
    let renderer = Renderer::new(&domain, person());
    let value = renderer.render(&Node::field("Name.Last")).unwrap();
    assert_eq!(value, Value::String("$name.ln".to_string()));
}

#[test]
fn test_declared_literal_ignores_field_codec() {
    let domain = person_domain();
    let renderer = Renderer::new(&domain, person());
    let node = Node::entry(
        Key::field("FirstName"),
        Node::typed(Native::Int(7), SemanticType::Int64),
    );
    let doc = renderer.render_document(&node).unwrap();
    assert_eq!(doc.get("fn"), Some(&Value::Int64(7)));
}

#[test]
fn test_render_document_rejects_scalars() {
    let domain = person_domain();
    let renderer = Renderer::new(&domain, person());
    let err = renderer.render_document(&Node::int32(1)).unwrap_err();
    assert!(matches!(err, RenderError::Stage(StageError::NotADocument(_))));
}
