//! Schema declarations for providers, resources and data sources.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::value::UNKNOWN_VALUE;

/// Attribute value types.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Bool,
    Int64,
    Float64,
    SetOfString,
    MapOfString,
    /// A map whose values are objects with the given attributes.
    MapNested { attributes: Vec<Attribute> },
}

/// How an attribute is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Required,
    Optional,
    Computed,
    OptionalComputed,
}

impl Presence {
    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(self, Self::Required)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    pub presence: Presence,
    pub description: String,
    pub sensitive: bool,
    /// A change of this attribute forces the resource to be replaced.
    pub requires_replace: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl Attribute {
    /// A new optional attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attr_type,
            presence: Presence::Optional,
            description: String::new(),
            sensitive: false,
            requires_replace: false,
            default: None,
        }
    }

    #[must_use]
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::String)
    }

    #[must_use]
    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::Bool)
    }

    #[must_use]
    pub fn int64(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::Int64)
    }

    #[must_use]
    pub fn float64(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::Float64)
    }

    #[must_use]
    pub fn set_of_string(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::SetOfString)
    }

    #[must_use]
    pub fn map_of_string(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::MapOfString)
    }

    #[must_use]
    pub fn map_nested(name: impl Into<String>, attributes: Vec<Self>) -> Self {
        Self::new(name, AttributeType::MapNested { attributes })
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    #[must_use]
    pub const fn computed(mut self) -> Self {
        self.presence = Presence::Computed;
        self
    }

    #[must_use]
    pub const fn optional_computed(mut self) -> Self {
        self.presence = Presence::OptionalComputed;
        self
    }

    #[must_use]
    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    #[must_use]
    pub const fn requires_replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }

    /// Static default; implies optional+computed.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.presence = Presence::OptionalComputed;
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A flat list of attributes plus a description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub description: String,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Fills static defaults into attributes that are null, missing or unknown.
    ///
    /// Nested map attributes get their element defaults applied as well.
    pub fn apply_defaults(&self, plan: &mut Value) {
        if let Value::Object(obj) = plan {
            apply_defaults_to(&self.attributes, obj);
        }
    }

    /// Reports required attributes that are null or missing.
    #[must_use]
    pub fn missing_required(&self, config: &Value) -> Diagnostics {
        let mut diags = Diagnostics::new();
        for attr in self.attributes.iter().filter(|a| a.presence.is_required()) {
            if config.get(&attr.name).is_none_or(Value::is_null) {
                diags.push(
                    Diagnostic::error(
                        "Missing required argument",
                        format!("The argument \"{}\" is required, but no definition was found.", attr.name),
                    )
                    .with_attribute(attr.name.clone()),
                );
            }
        }
        diags
    }

    /// Names of requires-replace attributes whose known prior value differs in the plan.
    #[must_use]
    pub fn replacement_triggers(&self, prior: &Value, plan: &Value) -> Vec<String> {
        self.attributes
            .iter()
            .filter(|a| a.requires_replace)
            .filter(|a| {
                let before = prior.get(&a.name).filter(|v| is_known(v));
                let after = plan.get(&a.name).filter(|v| is_known(v));
                matches!((before, after), (Some(b), Some(p)) if b != p)
            })
            .map(|a| a.name.clone())
            .collect()
    }
}

fn is_known(v: &Value) -> bool {
    !v.is_null() && v.as_str() != Some(UNKNOWN_VALUE)
}

fn apply_defaults_to(attributes: &[Attribute], obj: &mut Map<String, Value>) {
    for attr in attributes {
        if let Some(default) = &attr.default {
            let slot = obj.entry(attr.name.clone()).or_insert(Value::Null);
            if !is_known(slot) {
                *slot = default.clone();
            }
        }
        if let AttributeType::MapNested { attributes: nested } = &attr.attr_type
            && let Some(Value::Object(entries)) = obj.get_mut(&attr.name)
        {
            for entry in entries.values_mut() {
                if let Value::Object(inner) = entry {
                    apply_defaults_to(nested, inner);
                }
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new("test")
            .attribute(Attribute::string("id").computed())
            .attribute(Attribute::string("name").required())
            .attribute(Attribute::string("uniqueness_key").optional_computed().requires_replace())
            .attribute(Attribute::string("content_type").with_default("ipv4"))
            .attribute(Attribute::map_nested(
                "measures",
                vec![
                    Attribute::bool("assigned").required(),
                    Attribute::string("assigned_by").with_default(""),
                ],
            ))
    }

    #[test]
    fn defaults_fill_null_missing_and_unknown() {
        let mut plan = json!({"name": "x", "measures": {"m1": {"assigned": true, "assigned_by": UNKNOWN_VALUE}}});
        schema().apply_defaults(&mut plan);
        assert_eq!(plan["content_type"], json!("ipv4"));
        assert_eq!(plan["measures"]["m1"]["assigned_by"], json!(""));
    }

    #[test]
    fn defaults_keep_explicit_values() {
        let mut plan = json!({"name": "x", "content_type": "ipv6"});
        schema().apply_defaults(&mut plan);
        assert_eq!(plan["content_type"], json!("ipv6"));
    }

    #[test]
    fn missing_required_is_reported_per_attribute() {
        let diags = schema().missing_required(&json!({"name": null}));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.iter().next().and_then(|d| d.attribute.as_deref()), Some("name"));
        assert!(schema().missing_required(&json!({"name": "ok"})).is_empty());
    }

    #[test]
    fn replacement_triggers_only_on_known_changes() {
        let s = schema();
        assert_eq!(
            s.replacement_triggers(&json!({"uniqueness_key": "a"}), &json!({"uniqueness_key": "b"})),
            vec!["uniqueness_key".to_owned()]
        );
        assert!(s
            .replacement_triggers(&json!({"uniqueness_key": "a"}), &json!({"uniqueness_key": UNKNOWN_VALUE}))
            .is_empty());
        assert!(s
            .replacement_triggers(&json!({"uniqueness_key": null}), &json!({"uniqueness_key": "b"}))
            .is_empty());
    }
}
