//! Per-domain serialization policy.

use serde::Deserialize;

use crate::class_map::NamingConvention;
use crate::codec::{DecimalRepresentation, EnumRepresentation};
use crate::resolve::ScalarForArrayPolicy;

pub const DEFAULT_DISCRIMINATOR_FIELD: &str = "_t";

/// Settings a [`Domain`](super::Domain) is created with.
///
/// Every field has a default, so a partial YAML document or an empty
/// environment both produce a usable configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DomainSettings {
    pub default_naming: NamingConvention,
    pub discriminator_field: String,
    pub enum_representation: EnumRepresentation,
    pub decimal_representation: DecimalRepresentation,
    pub scalar_for_array: ScalarForArrayPolicy,
    pub search_subtypes: bool,
}

impl Default for DomainSettings {
    fn default() -> Self {
        Self {
            default_naming: NamingConvention::Verbatim,
            discriminator_field: DEFAULT_DISCRIMINATOR_FIELD.to_string(),
            enum_representation: EnumRepresentation::Int32,
            decimal_representation: DecimalRepresentation::Decimal128,
            scalar_for_array: ScalarForArrayPolicy::Adapt,
            search_subtypes: false,
        }
    }
}

impl DomainSettings {
    /// Read settings from `DOCRENDER_*` environment variables.
    /// Unset or unparseable variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_yaml(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(naming) = lookup("DOCRENDER_NAMING").and_then(|v| NamingConvention::parse(&v)) {
            settings.default_naming = naming;
        }
        if let Some(field) = lookup("DOCRENDER_DISCRIMINATOR_FIELD").filter(|v| !v.is_empty()) {
            settings.discriminator_field = field;
        }
        if let Some(repr) = lookup("DOCRENDER_ENUM_AS").and_then(|v| EnumRepresentation::parse(&v)) {
            settings.enum_representation = repr;
        }
        if let Some(policy) =
            lookup("DOCRENDER_SCALAR_FOR_ARRAY").and_then(|v| ScalarForArrayPolicy::parse(&v))
        {
            settings.scalar_for_array = policy;
        }
        if let Some(search) = lookup("DOCRENDER_SEARCH_SUBTYPES") {
            settings.search_subtypes = matches!(search.as_str(), "1" | "true" | "yes");
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_defaults() {
        let settings = DomainSettings::default();
        assert_eq!(settings.discriminator_field, "_t");
        assert_eq!(settings.scalar_for_array, ScalarForArrayPolicy::Adapt);
        assert!(!settings.search_subtypes);
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("DOCRENDER_NAMING", "camel"),
            ("DOCRENDER_DISCRIMINATOR_FIELD", "kind"),
            ("DOCRENDER_ENUM_AS", "string"),
            ("DOCRENDER_SCALAR_FOR_ARRAY", "reject"),
            ("DOCRENDER_SEARCH_SUBTYPES", "true"),
        ]
        .into_iter()
        .collect();
        let settings = DomainSettings::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(settings.default_naming, NamingConvention::CamelCase);
        assert_eq!(settings.discriminator_field, "kind");
        assert_eq!(settings.enum_representation, EnumRepresentation::String);
        assert_eq!(settings.scalar_for_array, ScalarForArrayPolicy::Reject);
        assert!(settings.search_subtypes);
    }

    #[test]
    fn test_unparseable_values_keep_defaults() {
        let settings = DomainSettings::from_lookup(|k| match k {
            "DOCRENDER_NAMING" => Some("kebab".to_string()),
            _ => None,
        });
        assert_eq!(settings, DomainSettings::default());
    }

    #[test]
    fn test_from_yaml_partial() {
        let settings = DomainSettings::from_yaml(
            "default_naming: snake_case\nenum_representation: string\n",
        )
        .unwrap();
        assert_eq!(settings.default_naming, NamingConvention::SnakeCase);
        assert_eq!(settings.enum_representation, EnumRepresentation::String);
        assert_eq!(settings.discriminator_field, "_t");
    }
}
