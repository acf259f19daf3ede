use crate::code_builder::CodeBuilder;
use crate::stringifier::{escape_string, float_text, SignaturePlacement, Stringifier};
use crate::syntax::{BindingAccessor, BuiltInType, Field, Literal, Method, MethodKind, TypeReference};
use lottiegen_core::TargetLanguage;

/// Renders C++/WinRT as a header and an implementation file.
#[derive(Debug, Clone, Copy, Default)]
pub struct CppwinrtStringifier;

impl CppwinrtStringifier {
    pub fn new() -> Self {
        Self
    }
}

/// Keywords of standard C++, shared by both C++ targets.
pub(crate) const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char16_t", "char32_t", "char8_t", "class", "compl", "concept",
    "const", "consteval", "constexpr", "constinit", "const_cast", "continue", "co_await",
    "co_return", "co_yield", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "template", "this", "thread_local",
    "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
];

/// `Windows.UI.Composition` -> `Windows::UI::Composition`.
pub(crate) fn cpp_namespace(namespace: &str) -> String {
    namespace.replace('.', "::")
}

pub(crate) fn cpp_float(value: f64) -> String {
    format!("{}F", float_text(value, true))
}

/// Literals shared by the two C++ targets.
pub(crate) fn cpp_literal(literal: &Literal) -> String {
    match literal {
        Literal::Boolean(b) => b.to_string(),
        Literal::Float(v) => cpp_float(*v),
        Literal::Int32(v) => v.to_string(),
        Literal::Int64(v) => format!("{v}LL"),
        Literal::String(s) => format!("L\"{}\"", escape_string(s)),
        Literal::Vector2(v) => format!("float2({}, {})", cpp_float(v.x), cpp_float(v.y)),
        Literal::Vector3(v) => format!(
            "float3({}, {}, {})",
            cpp_float(v.x),
            cpp_float(v.y),
            cpp_float(v.z)
        ),
        Literal::Vector4(v) => format!(
            "float4({}, {}, {}, {})",
            cpp_float(v.x),
            cpp_float(v.y),
            cpp_float(v.z),
            cpp_float(v.w)
        ),
        Literal::Color(c) => {
            let [a, r, g, b] = c.to_argb8();
            format!("ColorHelper::FromArgb(0x{a:02X}, 0x{r:02X}, 0x{g:02X}, 0x{b:02X})")
        }
        Literal::TimeSpan { ticks } => format!("TimeSpan{{ {ticks} }}"),
        Literal::Null => "nullptr".to_string(),
    }
}

pub(crate) fn cpp_builtin_namespace(ty: BuiltInType) -> Option<&'static str> {
    match ty {
        BuiltInType::Vector2 | BuiltInType::Vector3 | BuiltInType::Vector4 => {
            Some("Windows.Foundation.Numerics")
        }
        BuiltInType::Color => Some("Windows.UI"),
        BuiltInType::TimeSpan | BuiltInType::Uri => Some("Windows.Foundation"),
        _ => None,
    }
}

impl Stringifier for CppwinrtStringifier {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::CppWinrt
    }

    fn supports_modern_runtime(&self) -> bool {
        true
    }

    fn is_reserved_word(&self, name: &str) -> bool {
        CPP_KEYWORDS.contains(&name)
    }

    fn type_name(&self, ty: &TypeReference) -> String {
        match ty {
            TypeReference::BuiltIn(b) => match b {
                BuiltInType::Void => "void",
                BuiltInType::Boolean => "bool",
                BuiltInType::Float => "float",
                BuiltInType::Int32 => "int32_t",
                BuiltInType::Int64 => "int64_t",
                BuiltInType::String => "winrt::hstring",
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

    fn literal(&self, literal: &Literal) -> String {
        cpp_literal(literal)
    }

    fn method_call(&self, receiver: Option<&str>, method: &str, arguments: &[String]) -> String {
        let args = arguments.join(", ");
        match receiver {
            Some(r) => format!("{r}.{method}({args})"),
            None => format!("{method}({args})"),
        }
    }

    fn namespace_import(&self, namespace: &str) -> String {
        format!("using namespace winrt::{};", cpp_namespace(namespace))
    }

    fn builtin_namespace(&self, ty: BuiltInType) -> Option<&'static str> {
        cpp_builtin_namespace(ty)
    }

    fn static_call(&self, ty: &TypeReference, method: &str, arguments: &[String]) -> String {
        format!("{}::{method}({})", self.type_name(ty), arguments.join(", "))
    }

    fn property_get(&self, receiver: &str, property: &str) -> String {
        format!("{receiver}.{property}()")
    }

    fn property_set(&self, receiver: &str, property: &str, value: &str) -> String {
        format!("{receiver}.{property}({value});")
    }

    fn new_object(&self, ty: &TypeReference, arguments: &[String]) -> String {
        format!("{}({})", self.type_name(ty), arguments.join(", "))
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
            (MethodKind::Ordinary, SignaturePlacement::Declaration) => format!(
                "{}{ret} {}({params});",
                if method.is_static { "static " } else { "" },
                method.name
            ),
            (MethodKind::Ordinary, SignaturePlacement::Inline) => format!(
                "{}{ret} {}({params})",
                if method.is_static { "static " } else { "" },
                method.name
            ),
        }
    }

    fn field_declaration(&self, field: &Field, initializer: Option<&str>) -> String {
        let ty = self.type_reference(&field.ty);
        match initializer {
            Some(init) => format!("{ty} {}{{ {init} }};", field.name),
            None if field.ty.is_reference_type() => format!("{ty} {}{{ nullptr }};", field.name),
            None => format!("{ty} {}{{}};", field.name),
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
                out.write_line(format!("{ty} {name}() const;"));
                out.write_line(format!("void {name}({ty} value);"));
            }
            SignaturePlacement::Definition | SignaturePlacement::Inline => {
                let qualifier = if placement == SignaturePlacement::Definition {
                    format!("{class_name}::")
                } else {
                    String::new()
                };
                out.write_line(format!(
                    "{ty} {qualifier}{name}() const {{ return {}; }}",
                    accessor.field
                ));
                out.blank_line();
                out.write_line(format!("void {qualifier}{name}({ty} value)"));
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
        format!("class {class_name} final")
    }

    fn class_close(&self) -> &'static str {
        "};"
    }

    fn access_label(&self, visibility: crate::syntax::Visibility) -> String {
        // Standard C++ has no internal access.
        match visibility {
            crate::syntax::Visibility::Private => "private:".to_string(),
            _ => "public:".to_string(),
        }
    }

    fn header_preamble(&self) -> Vec<String> {
        vec!["#pragma once".to_string()]
    }

    fn header_include(&self, namespace: &str) -> Option<String> {
        Some(format!("#include <winrt/{namespace}.h>"))
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
