//! The textual rendering seam. A [`Stringifier`] knows how one target
//! language spells types, literals, calls and declarations; everything else
//! in the generator is language independent.

use crate::code_builder::CodeBuilder;
use crate::syntax::{
    BindingAccessor, BuiltInType, Field, Literal, Method, Parameter, TypeReference, Visibility,
};
use lottiegen_core::TargetLanguage;

/// Where a method signature is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignaturePlacement {
    /// Inside the class body, followed by the body.
    Inline,
    /// A declaration in a header, terminated by `;`.
    Declaration,
    /// An out-of-class definition, qualified by the class name.
    Definition,
}

/// How a translation unit is split into files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileLayout {
    Single,
    Split,
}

pub trait Stringifier {
    fn language(&self) -> TargetLanguage;

    /// True if the target can address the modern composition runtime.
    fn supports_modern_runtime(&self) -> bool;

    /// True if `name` cannot be used as a member name in the target.
    fn is_reserved_word(&self, name: &str) -> bool;

    fn file_layout(&self) -> FileLayout {
        if self.language().is_split() {
            FileLayout::Split
        } else {
            FileLayout::Single
        }
    }

    /// The bare name of a type, as used in static calls and constructors.
    fn type_name(&self, ty: &TypeReference) -> String;

    /// A type as it appears in declarations.
    fn type_reference(&self, ty: &TypeReference) -> String {
        self.type_name(ty)
    }

    fn literal(&self, literal: &Literal) -> String;

    /// A call on `receiver`, or on the generated class when there is none.
    fn method_call(&self, receiver: Option<&str>, method: &str, arguments: &[String]) -> String;

    /// One import line for a dotted namespace.
    fn namespace_import(&self, namespace: &str) -> String;

    /// The dotted namespace a built-in type needs imported, if any.
    fn builtin_namespace(&self, ty: BuiltInType) -> Option<&'static str>;

    fn namespace_of(&self, ty: &TypeReference) -> Option<String> {
        match ty {
            TypeReference::BuiltIn(b) => self.builtin_namespace(*b).map(String::from),
            other => other.namespace().map(String::from),
        }
    }

    fn static_call(&self, ty: &TypeReference, method: &str, arguments: &[String]) -> String;

    fn property_get(&self, receiver: &str, property: &str) -> String;

    /// A complete property assignment statement.
    fn property_set(&self, receiver: &str, property: &str, value: &str) -> String;

    fn field_get(&self, receiver: &str, field: &str) -> String {
        format!("{receiver}.{field}")
    }

    fn new_object(&self, ty: &TypeReference, arguments: &[String]) -> String;

    fn enum_value(&self, ty: &TypeReference, member: &str) -> String;

    fn null(&self) -> &'static str;

    fn not_null(&self, value: &str) -> String {
        format!("{value} != {}", self.null())
    }

    fn declare_local(&self, ty: &TypeReference, name: &str, value: &str) -> String;

    fn assign(&self, target: &str, value: &str) -> String {
        format!("{target} = {value};")
    }

    fn expression_statement(&self, expression: &str) -> String {
        format!("{expression};")
    }

    fn return_statement(&self, value: Option<&str>) -> String {
        match value {
            Some(value) => format!("return {value};"),
            None => "return;".to_string(),
        }
    }

    fn if_header(&self, condition: &str) -> String {
        format!("if ({condition})")
    }

    /// Name of the method that appends to a runtime list.
    fn list_add_method(&self) -> &'static str;

    fn parameter(&self, parameter: &Parameter) -> String {
        format!("{} {}", self.type_reference(&parameter.ty), parameter.name)
    }

    fn parameters(&self, method: &Method) -> String {
        method
            .parameters
            .iter()
            .map(|p| self.parameter(p))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn method_signature(
        &self,
        method: &Method,
        class_name: &str,
        placement: SignaturePlacement,
    ) -> String;

    /// A field declaration; `initializer` is already rendered.
    fn field_declaration(&self, field: &Field, initializer: Option<&str>) -> String;

    /// Write the accessor of a property binding. `setter_body` holds the
    /// rendered setter statements.
    fn write_accessor(
        &self,
        out: &mut CodeBuilder,
        accessor: &BindingAccessor,
        class_name: &str,
        setter_body: &CodeBuilder,
        placement: SignaturePlacement,
    );

    fn namespace_declaration(&self, namespace: &str) -> String;

    fn class_declaration(&self, class_name: &str) -> String;

    /// Text closing the class body.
    fn class_close(&self) -> &'static str {
        "}"
    }

    /// Label opening a header access section.
    fn access_label(&self, visibility: Visibility) -> String {
        match visibility {
            Visibility::Private => "private:".to_string(),
            Visibility::Internal => "internal:".to_string(),
            Visibility::Public => "public:".to_string(),
        }
    }

    /// Lines written at the top of a header before the namespace.
    fn header_preamble(&self) -> Vec<String> {
        Vec::new()
    }

    /// The include a header needs for a dotted namespace, if any.
    fn header_include(&self, _namespace: &str) -> Option<String> {
        None
    }

    /// Includes at the top of the implementation file.
    fn implementation_includes(&self, _header_file: &str) -> Vec<String> {
        Vec::new()
    }

    fn source_extension(&self) -> &'static str;

    fn header_extension(&self) -> Option<&'static str> {
        None
    }
}

/// Format a float the way C-family languages accept it, without a suffix.
/// Integral values print without a fraction unless `keep_fraction` is set.
pub(crate) fn float_text(value: f64, keep_fraction: bool) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        let integral = value as i64;
        let sign = if integral == 0 && value.is_sign_negative() {
            "-"
        } else {
            ""
        };
        if keep_fraction {
            format!("{sign}{integral}.0")
        } else {
            format!("{sign}{integral}")
        }
    } else {
        // f32 precision is all the runtime keeps.
        format!("{}", value as f32)
    }
}

/// Escape a string for a C-family string literal body.
pub(crate) fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Lower-case the first character: `SpriteVisual` -> `spriteVisual`.
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
