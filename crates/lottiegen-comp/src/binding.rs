use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use lottiegen_core::{Color, LottieGenError, LottieGenResult, Vector2, Vector3, Vector4};

/// Type of a value stored in, or exposed from, a property set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PropertySetValueType {
    Scalar,
    Vector2,
    Vector3,
    Vector4,
    Color,
    Boolean,
}

impl PropertySetValueType {
    /// Name of the property-set insert method for a stored value of this type.
    pub fn insert_method(&self) -> &'static str {
        match self {
            PropertySetValueType::Scalar => "InsertScalar",
            PropertySetValueType::Vector2 => "InsertVector2",
            PropertySetValueType::Vector3 => "InsertVector3",
            PropertySetValueType::Vector4 => "InsertVector4",
            PropertySetValueType::Color => "InsertColor",
            PropertySetValueType::Boolean => "InsertBoolean",
        }
    }

    /// True if a value exposed as `exposed` can be stored as `self`.
    ///
    /// Colors are stored as Vector4 because the expression evaluator has no
    /// color type. Every other type is stored as itself.
    pub fn can_store(&self, exposed: PropertySetValueType) -> bool {
        use PropertySetValueType::*;
        matches!(
            (self, exposed),
            (Scalar, Scalar)
                | (Vector2, Vector2)
                | (Vector3, Vector3)
                | (Vector4, Vector4)
                | (Boolean, Boolean)
                | (Vector4, Color)
        )
    }
}

/// A constant value of one of the property-set types.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Scalar(f64),
    Vector2(Vector2),
    Vector3(Vector3),
    Vector4(Vector4),
    Color(Color),
    Boolean(bool),
}

impl PropertyValue {
    pub fn value_type(&self) -> PropertySetValueType {
        match self {
            PropertyValue::Scalar(_) => PropertySetValueType::Scalar,
            PropertyValue::Vector2(_) => PropertySetValueType::Vector2,
            PropertyValue::Vector3(_) => PropertySetValueType::Vector3,
            PropertyValue::Vector4(_) => PropertySetValueType::Vector4,
            PropertyValue::Color(_) => PropertySetValueType::Color,
            PropertyValue::Boolean(_) => PropertySetValueType::Boolean,
        }
    }
}

/// A name bound to a value in the generated property set, exposed to callers
/// of the generated code so they can theme or drive the animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyBinding {
    /// Identifies the value in the property set. Unique within a set.
    pub binding_name: String,
    /// A name for display in tools.
    pub display_name: String,
    /// The type held in the property set.
    pub stored_type: PropertySetValueType,
    /// The type callers see.
    pub exposed_type: PropertySetValueType,
    /// Value of the exposed type used until a caller sets one.
    pub default_value: PropertyValue,
}

impl PropertyBinding {
    pub fn new(
        binding_name: impl Into<String>,
        display_name: impl Into<String>,
        stored_type: PropertySetValueType,
        exposed_type: PropertySetValueType,
        default_value: PropertyValue,
    ) -> LottieGenResult<Self> {
        let binding = Self {
            binding_name: binding_name.into(),
            display_name: display_name.into(),
            stored_type,
            exposed_type,
            default_value,
        };
        binding.validate()?;
        Ok(binding)
    }

    /// A scalar binding stored and exposed as a scalar.
    pub fn scalar(binding_name: impl Into<String>, default_value: f64) -> LottieGenResult<Self> {
        let name = binding_name.into();
        Self::new(
            name.clone(),
            name,
            PropertySetValueType::Scalar,
            PropertySetValueType::Scalar,
            PropertyValue::Scalar(default_value),
        )
    }

    /// A color binding. Stored as Vector4, exposed as a color.
    pub fn color(binding_name: impl Into<String>, default_value: Color) -> LottieGenResult<Self> {
        let name = binding_name.into();
        Self::new(
            name.clone(),
            name,
            PropertySetValueType::Vector4,
            PropertySetValueType::Color,
            PropertyValue::Color(default_value),
        )
    }

    pub fn validate(&self) -> LottieGenResult<()> {
        let node = format!("binding '{}'", self.binding_name);
        if !is_identifier(&self.binding_name) {
            return Err(LottieGenError::structural(
                node,
                "binding name is not a valid identifier",
            ));
        }
        if !self.stored_type.can_store(self.exposed_type) {
            return Err(LottieGenError::structural(
                node,
                format!(
                    "{:?} cannot be stored as {:?}",
                    self.exposed_type, self.stored_type
                ),
            ));
        }
        if self.default_value.value_type() != self.exposed_type {
            return Err(LottieGenError::structural(
                node,
                format!(
                    "default value is {:?}, expected {:?}",
                    self.default_value.value_type(),
                    self.exposed_type
                ),
            ));
        }
        Ok(())
    }
}

/// Binding names become identifiers in generated code.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// The set of bindings attached to a composition graph, ordered by binding
/// name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PropertyBinding>", into = "Vec<PropertyBinding>")]
pub struct PropertyBindings {
    bindings: BTreeMap<String, PropertyBinding>,
}

impl PropertyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding. Names must be unique within the set.
    pub fn add(&mut self, binding: PropertyBinding) -> LottieGenResult<()> {
        binding.validate()?;
        if self.bindings.contains_key(&binding.binding_name) {
            return Err(LottieGenError::structural(
                format!("binding '{}'", binding.binding_name),
                "duplicate binding name",
            ));
        }
        self.bindings.insert(binding.binding_name.clone(), binding);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&PropertyBinding> {
        self.bindings.get(name)
    }

    /// Bindings in binding-name order.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyBinding> {
        self.bindings.values()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl TryFrom<Vec<PropertyBinding>> for PropertyBindings {
    type Error = LottieGenError;

    fn try_from(bindings: Vec<PropertyBinding>) -> Result<Self, Self::Error> {
        let mut set = PropertyBindings::new();
        for binding in bindings {
            set.add(binding)?;
        }
        Ok(set)
    }
}

impl From<PropertyBindings> for Vec<PropertyBinding> {
    fn from(set: PropertyBindings) -> Self {
        set.bindings.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_stored_as_vector4() {
        let binding = PropertyBinding::color("Foreground", Color::WHITE).unwrap();
        assert_eq!(binding.stored_type, PropertySetValueType::Vector4);
        assert_eq!(binding.exposed_type, PropertySetValueType::Color);
    }

    #[test]
    fn test_incompatible_types_rejected() {
        let result = PropertyBinding::new(
            "Foreground",
            "Foreground",
            PropertySetValueType::Color,
            PropertySetValueType::Color,
            PropertyValue::Color(Color::WHITE),
        );
        assert!(matches!(
            result,
            Err(LottieGenError::StructuralViolation { .. })
        ));
    }

    #[test]
    fn test_default_value_must_match_exposed_type() {
        let result = PropertyBinding::new(
            "Progress",
            "Progress",
            PropertySetValueType::Scalar,
            PropertySetValueType::Scalar,
            PropertyValue::Boolean(true),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_identifier_rejected() {
        assert!(PropertyBinding::scalar("2fast", 0.0).is_err());
        assert!(PropertyBinding::scalar("has space", 0.0).is_err());
        assert!(PropertyBinding::scalar("_ok_1", 0.0).is_ok());
    }

    #[test]
    fn test_duplicate_binding_rejected() {
        let mut set = PropertyBindings::new();
        set.add(PropertyBinding::scalar("Progress", 0.0).unwrap()).unwrap();
        assert!(set.add(PropertyBinding::scalar("Progress", 1.0).unwrap()).is_err());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_bindings_iterate_by_name() {
        let mut set = PropertyBindings::new();
        set.add(PropertyBinding::scalar("Speed", 1.0).unwrap()).unwrap();
        set.add(PropertyBinding::color("Accent", Color::BLACK).unwrap()).unwrap();
        let names: Vec<_> = set.iter().map(|b| b.binding_name.as_str()).collect();
        assert_eq!(names, vec!["Accent", "Speed"]);
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let binding = PropertyBinding::scalar("Progress", 0.0).unwrap();
        let json = serde_json::to_string(&vec![binding.clone(), binding]).unwrap();
        assert!(serde_json::from_str::<PropertyBindings>(&json).is_err());
    }
}
