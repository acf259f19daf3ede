use crate::code_builder::CodeBuilder;
use crate::cppwinrt::{cpp_builtin_namespace, cpp_literal, cpp_namespace, CPP_KEYWORDS};
use crate::stringifier::{SignaturePlacement, Stringifier};
use crate::syntax::{BindingAccessor, BuiltInType, Field, Literal, Method, MethodKind, TypeReference};
use lottiegen_core::TargetLanguage;

/// Renders C++/CX. Reference types are handles (`^`) created with
/// `ref new`. C++/CX cannot target the modern runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct CxStringifier;

impl CxStringifier {
    pub fn new() -> Self {
        Self
    }
}

impl Stringifier for CxStringifier {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::Cx
    }

    fn supports_modern_runtime(&self) -> bool {
        false
    }

    fn is_reserved_word(&self, name: &str) -> bool {
        // Reserved by the component extensions on top of standard C++.
        CPP_KEYWORDS.contains(&name)
            || matches!(name, "delegate" | "event" | "gcnew" | "interface" | "property")
    }

    fn type_name(&self, ty: &TypeReference) -> String {
        match ty {
            TypeReference::BuiltIn(b) => match b {
                BuiltInType::Void => "void",
                BuiltInType::Boolean => "bool",
                BuiltInType::Float => "float",
                BuiltInType::Int32 => "int",
                BuiltInType::Int64 => "int64",
                BuiltInType::String => "Platform::String",
                BuiltInType::Vector2 => "float2",
                BuiltInType::Vector3 => "float3",
                BuiltInType::Vector4 => "float4",
                BuiltInType::Color => "Color",
                BuiltInType::TimeSpan => "TimeSpan",
                BuiltInType::Uri => "Uri",
            }
            .to_string(),
            TypeReference::Imported { name, .. }
            | TypeReference::ImportedValue { name, .. }
            | TypeReference::Generated { name } => name.clone(),
        }
    }

    fn type_reference(&self, ty: &TypeReference) -> String {
        if ty.is_reference_type() {
            format!("{}^", self.type_name(ty))
        } else {
            self.type_name(ty)
        }
    }

    fn literal(&self, literal: &Literal) -> String {
        cpp_literal(literal)
    }

    fn method_call(&self, receiver: Option<&str>, method: &str, arguments: &[String]) -> String {
        let args = arguments.join(", ");
        match receiver {
            Some(r) => format!("{r}->{method}({args})"),
            None => format!("{method}({args})"),
        }
    }

    fn namespace_import(&self, namespace: &str) -> String {
        format!("using namespace {};", cpp_namespace(namespace))
    }

    fn builtin_namespace(&self, ty: BuiltInType) -> Option<&'static str> {
        cpp_builtin_namespace(ty)
    }

    fn static_call(&self, ty: &TypeReference, method: &str, arguments: &[String]) -> String {
        format!("{}::{method}({})", self.type_name(ty), arguments.join(", "))
    }

    fn property_get(&self, receiver: &str, property: &str) -> String {
        format!("{receiver}->{property}")
    }

    fn property_set(&self, receiver: &str, property: &str, value: &str) -> String {
        format!("{receiver}->{property} = {value};")
    }

    fn new_object(&self, ty: &TypeReference, arguments: &[String]) -> String {
        let args = arguments.join(", ");
        if ty.is_reference_type() {
            format!("ref new {}({args})", self.type_name(ty))
        } else {
            format!("{}({args})", self.type_name(ty))
        }
    }

    fn enum_value(&self, ty: &TypeReference, member: &str) -> String {
        format!("{}::{member}", self.type_name(ty))
    }

    fn null(&self) -> &'static str {
        "nullptr"
    }

    fn declare_local(&self, _ty: &TypeReference, name: &str, value: &str) -> String {
        format!("auto {name} = {value};")
    }

    fn list_add_method(&self) -> &'static str {
        "Append"
    }

    fn method_signature(
        &self,
        method: &Method,
        class_name: &str,
        placement: SignaturePlacement,
    ) -> String {
        let params = self.parameters(method);
        let ret = self.type_reference(&method.return_type);
        let is_static = if method.is_static { "static " } else { "" };
        match (method.kind, placement) {
            (MethodKind::Constructor, SignaturePlacement::Definition) => {
                format!("{class_name}::{class_name}({params})")
            }
            (MethodKind::Constructor, SignaturePlacement::Declaration) => {
                format!("{class_name}({params});")
            }
            (MethodKind::Constructor, SignaturePlacement::Inline) => {
                format!("{class_name}({params})")
            }
            (MethodKind::Ordinary, SignaturePlacement::Definition) => {
                format!("{ret} {class_name}::{}({params})", method.name)
            }
            (MethodKind::Ordinary, SignaturePlacement::Declaration) => {
                format!("{is_static}{ret} {}({params});", method.name)
            }
            (MethodKind::Ordinary, SignaturePlacement::Inline) => {
                format!("{is_static}{ret} {}({params})", method.name)
            }
        }
    }

    fn field_declaration(&self, field: &Field, initializer: Option<&str>) -> String {
        let ty = self.type_reference(&field.ty);
        match initializer {
            Some(init) => format!("{ty} {} = {init};", field.name),
            None => format!("{ty} {};", field.name),
        }
    }

    fn write_accessor(
        &self,
        out: &mut CodeBuilder,
        accessor: &BindingAccessor,
        class_name: &str,
        setter_body: &CodeBuilder,
        placement: SignaturePlacement,
    ) {
        let ty = self.type_reference(&accessor.ty);
        let name = &accessor.name;
        match placement {
            SignaturePlacement::Declaration => {
                out.write_line(format!(
                    "property {ty} {name} {{ {ty} get(); void set({ty} value); }}"
                ));
            }
            SignaturePlacement::Definition | SignaturePlacement::Inline => {
                out.write_line(format!(
                    "{ty} {class_name}::{name}::get() {{ return {}; }}",
                    accessor.field
                ));
                out.blank_line();
                out.write_line(format!("void {class_name}::{name}::set({ty} value)"));
                out.open_scope();
                out.append(setter_body);
                out.close_scope();
            }
        }
    }

    fn namespace_declaration(&self, namespace: &str) -> String {
        format!("namespace {}", cpp_namespace(namespace))
    }

    fn class_declaration(&self, class_name: &str) -> String {
        format!("public ref class {class_name} sealed")
    }

    fn class_close(&self) -> &'static str {
        "};"
    }

    fn header_preamble(&self) -> Vec<String> {
        vec!["#pragma once".to_string()]
    }

    fn implementation_includes(&self, header_file: &str) -> Vec<String> {
        vec![
            "#include \"pch.h\"".to_string(),
            format!("#include \"{header_file}\""),
        ]
    }

    fn source_extension(&self) -> &'static str {
        "cpp"
    }

    fn header_extension(&self) -> Option<&'static str> {
        Some("h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_words() {
        let s = CxStringifier::new();
        assert!(s.is_reserved_word("class"));
        assert!(s.is_reserved_word("property"));
        assert!(!s.is_reserved_word("Progress"));
    }

    #[test]
    fn test_reference_types_are_handles() {
        let s = CxStringifier::new();
        let visual = TypeReference::imported("Windows.UI.Composition", "SpriteVisual");
        assert_eq!(s.type_reference(&visual), "SpriteVisual^");
        assert_eq!(s.type_reference(&BuiltInType::Float.into()), "float");
        assert_eq!(s.new_object(&visual, &[]), "ref new SpriteVisual()");
    }

    #[test]
    fn test_member_access_uses_arrow() {
        let s = CxStringifier::new();
        assert_eq!(
            s.method_call(Some("_c"), "CreateSpriteVisual", &[]),
            "_c->CreateSpriteVisual()"
        );
        assert_eq!(s.property_get("result", "Children"), "result->Children");
        assert_eq!(s.namespace_import("Windows.UI"), "using namespace Windows::UI;");
    }

    #[test]
    fn test_no_modern_runtime() {
        assert!(!CxStringifier::new().supports_modern_runtime());
        assert_eq!(CxStringifier::new().access_label(crate::syntax::Visibility::Internal), "internal:");
    }
}
