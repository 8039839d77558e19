//! Shared model used across the test suites.
//!
//! ```text
//! Person { FirstName: "fn", LastName: "ln", Age: "age", Name: Name -> "name",
//!          Pets: [Pet] -> "pets", Favorite: Pet? -> "fav", Genders: [Gender] -> "gs",
//!          Gender: "g", Colors: [String], Tags: [String] -> "tags", IsActive: "active",
//!          Scores: [Int32] -> "scores", Birthday: "bd", Id: ObjectId -> "_id" }
//! Name   { First: "fn", Last: "ln" }
//! Pet    { Type: "type", Name: "name" }   Dog: Pet { Barks }   Cat: Pet { Lives }
//! Lion: Cat { Roars }
//! Gender = Male | Female   (written as strings)
//! ```

use crate::class_map::ClassMapBuilder;
use crate::codec::{EnumDef, EnumRepresentation, SemanticType};
use crate::domain::{Domain, DomainSettings};

pub(crate) fn person_domain() -> Domain {
    let settings = DomainSettings {
        enum_representation: EnumRepresentation::String,
        ..DomainSettings::default()
    };
    let domain = Domain::with_settings("fixtures", settings);
    domain.register_enum(EnumDef::new("Gender", ["Male", "Female"]));

    let mut name = ClassMapBuilder::new("Name");
    name.map("First", SemanticType::String).element_name("fn");
    name.map("Last", SemanticType::String).element_name("ln");
    domain.register_class(name);

    let mut pet = ClassMapBuilder::new("Pet");
    pet.map("Type", SemanticType::String).element_name("type");
    pet.map("Name", SemanticType::String).element_name("name");
    domain.register_class(pet);

    let mut dog = ClassMapBuilder::new("Dog");
    dog.base("Pet");
    dog.map("Barks", SemanticType::Bool).element_name("barks");
    domain.register_class(dog);

    let mut cat = ClassMapBuilder::new("Cat");
    cat.base("Pet");
    cat.map("Lives", SemanticType::Int32).element_name("lives");
    domain.register_class(cat);

    let mut lion = ClassMapBuilder::new("Lion");
    lion.base("Cat");
    lion.map("Roars", SemanticType::Bool).element_name("roars");
    domain.register_class(lion);

    let mut person = ClassMapBuilder::new("Person");
    person.map("Id", SemanticType::ObjectId).element_name("_id");
    person.map("FirstName", SemanticType::String).element_name("fn");
    person.map("LastName", SemanticType::String).element_name("ln");
    person.map("Age", SemanticType::Int32).element_name("age");
    person
        .map("Name", SemanticType::class("Name"))
        .element_name("name");
    person
        .map("Pets", SemanticType::array_of(SemanticType::class("Pet")))
        .element_name("pets");
    person
        .map("Favorite", SemanticType::nullable(SemanticType::class("Pet")))
        .element_name("fav");
    person
        .map(
            "Genders",
            SemanticType::array_of(SemanticType::enumeration("Gender")),
        )
        .element_name("gs");
    person
        .map("Gender", SemanticType::enumeration("Gender"))
        .element_name("g");
    person.map("Colors", SemanticType::array_of(SemanticType::String));
    person
        .map("Tags", SemanticType::array_of(SemanticType::String))
        .element_name("tags");
    person
        .map("IsActive", SemanticType::Bool)
        .element_name("active");
    person
        .map("Scores", SemanticType::array_of(SemanticType::Int32))
        .element_name("scores");
    person
        .map("Birthday", SemanticType::DateTime)
        .element_name("bd");
    domain.register_class(person);

    domain
}

pub(crate) fn person() -> SemanticType {
    SemanticType::class("Person")
}
