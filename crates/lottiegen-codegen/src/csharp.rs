use crate::code_builder::CodeBuilder;
use crate::stringifier::{escape_string, float_text, SignaturePlacement, Stringifier};
use crate::syntax::{
    BindingAccessor, BuiltInType, Field, Literal, Method, MethodKind, TypeReference, Visibility,
};
use lottiegen_core::TargetLanguage;

const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Renders C#. The whole class goes into one file.
#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpStringifier;

impl CSharpStringifier {
    pub fn new() -> Self {
        Self
    }

    fn float(value: f64) -> String {
        format!("{}F", float_text(value, false))
    }

    fn visibility(visibility: Visibility) -> &'static str {
        match visibility {
            Visibility::Private => "",
            Visibility::Internal => "internal ",
            Visibility::Public => "public ",
        }
    }
}

impl Stringifier for CSharpStringifier {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::CSharp
    }

    fn supports_modern_runtime(&self) -> bool {
        true
    }

    fn is_reserved_word(&self, name: &str) -> bool {
        KEYWORDS.contains(&name)
    }

    fn type_name(&self, ty: &TypeReference) -> String {
        match ty {
            TypeReference::BuiltIn(b) => match b {
                BuiltInType::Void => "void",
                BuiltInType::Boolean => "bool",
                BuiltInType::Float => "float",
                BuiltInType::Int32 => "int",
                BuiltInType::Int64 => "long",
                BuiltInType::String => "string",
                BuiltInType::Vector2 => "Vector2",
                BuiltInType::Vector3 => "Vector3",
                BuiltInType::Vector4 => "Vector4",
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
        match literal {
            Literal::Boolean(b) => b.to_string(),
            Literal::Float(v) => Self::float(*v),
            Literal::Int32(v) => v.to_string(),
            Literal::Int64(v) => format!("{v}L"),
            Literal::String(s) => format!("\"{}\"", escape_string(s)),
            Literal::Vector2(v) => {
                format!("new Vector2({}, {})", Self::float(v.x), Self::float(v.y))
            }
            Literal::Vector3(v) => format!(
                "new Vector3({}, {}, {})",
                Self::float(v.x),
                Self::float(v.y),
                Self::float(v.z)
            ),
            Literal::Vector4(v) => format!(
                "new Vector4({}, {}, {}, {})",
                Self::float(v.x),
                Self::float(v.y),
                Self::float(v.z),
                Self::float(v.w)
            ),
            Literal::Color(c) => {
                let [a, r, g, b] = c.to_argb8();
                format!("Color.FromArgb(0x{a:02X}, 0x{r:02X}, 0x{g:02X}, 0x{b:02X})")
            }
            Literal::TimeSpan { ticks } => format!("TimeSpan.FromTicks({ticks})"),
            Literal::Null => "null".to_string(),
        }
    }

    fn method_call(&self, receiver: Option<&str>, method: &str, arguments: &[String]) -> String {
        let args = arguments.join(", ");
        match receiver {
            Some(r) => format!("{r}.{method}({args})"),
            None => format!("{method}({args})"),
        }
    }

    fn namespace_import(&self, namespace: &str) -> String {
        format!("using {namespace};")
    }

    fn builtin_namespace(&self, ty: BuiltInType) -> Option<&'static str> {
        match ty {
            BuiltInType::Vector2 | BuiltInType::Vector3 | BuiltInType::Vector4 => {
                Some("System.Numerics")
            }
            BuiltInType::Color => Some("Windows.UI"),
            BuiltInType::TimeSpan | BuiltInType::Uri => Some("System"),
            _ => None,
        }
    }

    fn static_call(&self, ty: &TypeReference, method: &str, arguments: &[String]) -> String {
        format!("{}.{method}({})", self.type_name(ty), arguments.join(", "))
    }

    fn property_get(&self, receiver: &str, property: &str) -> String {
        format!("{receiver}.{property}")
    }

    fn property_set(&self, receiver: &str, property: &str, value: &str) -> String {
        format!("{receiver}.{property} = {value};")
    }

    fn new_object(&self, ty: &TypeReference, arguments: &[String]) -> String {
        format!("new {}({})", self.type_name(ty), arguments.join(", "))
    }

    fn enum_value(&self, ty: &TypeReference, member: &str) -> String {
        format!("{}.{member}", self.type_name(ty))
    }

    fn null(&self) -> &'static str {
        "null"
    }

    fn declare_local(&self, _ty: &TypeReference, name: &str, value: &str) -> String {
        format!("var {name} = {value};")
    }

    fn list_add_method(&self) -> &'static str {
        "Add"
    }

    fn method_signature(
        &self,
        method: &Method,
        class_name: &str,
        _placement: SignaturePlacement,
    ) -> String {
        let visibility = Self::visibility(method.visibility);
        let params = self.parameters(method);
        match method.kind {
            MethodKind::Constructor => format!("{visibility}{class_name}({params})"),
            MethodKind::Ordinary => format!(
                "{visibility}{}{} {}({params})",
                if method.is_static { "static " } else { "" },
                self.type_reference(&method.return_type),
                method.name
            ),
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
        _class_name: &str,
        setter_body: &CodeBuilder,
        _placement: SignaturePlacement,
    ) {
        out.write_line(format!(
            "public {} {}",
            self.type_reference(&accessor.ty),
            accessor.name
        ));
        out.open_scope();
        out.write_line(format!("get => {};", accessor.field));
        out.write_line("set");
        out.open_scope();
        out.append(setter_body);
        out.close_scope();
        out.close_scope();
    }

    fn namespace_declaration(&self, namespace: &str) -> String {
        format!("namespace {namespace}")
    }

    fn class_declaration(&self, class_name: &str) -> String {
        format!("sealed class {class_name}")
    }

    fn source_extension(&self) -> &'static str {
        "cs"
    }
}
