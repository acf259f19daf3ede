//! Abstract syntax for generated code.
//!
//! Nothing here knows how a target language spells things. Types and
//! expressions are plain values that can be shared freely; a [`Method`] owns
//! its body.

use lottiegen_core::{Color, Vector2, Vector3, Vector4};

/// Types every target provides without a generated declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltInType {
    Void,
    Boolean,
    Float,
    Int32,
    Int64,
    String,
    Vector2,
    Vector3,
    Vector4,
    Color,
    TimeSpan,
    Uri,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeReference {
    BuiltIn(BuiltInType),
    /// A reference type from an imported namespace. `namespace` is dotted.
    Imported { namespace: String, name: String },
    /// A value type (enum or struct) from an imported namespace.
    ImportedValue { namespace: String, name: String },
    /// A type declared by the generated code.
    Generated { name: String },
}

impl TypeReference {
    pub fn imported(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeReference::Imported {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn imported_value(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeReference::ImportedValue {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// The namespace an imported type lives in.
    pub fn namespace(&self) -> Option<&str> {
        match self {
            TypeReference::Imported { namespace, .. }
            | TypeReference::ImportedValue { namespace, .. } => Some(namespace),
            TypeReference::BuiltIn(_) | TypeReference::Generated { .. } => None,
        }
    }

    /// True for types that are held by reference and may be null.
    pub fn is_reference_type(&self) -> bool {
        match self {
            TypeReference::Imported { .. } | TypeReference::Generated { .. } => true,
            TypeReference::BuiltIn(b) => matches!(b, BuiltInType::String | BuiltInType::Uri),
            TypeReference::ImportedValue { .. } => false,
        }
    }
}

impl From<BuiltInType> for TypeReference {
    fn from(ty: BuiltInType) -> Self {
        TypeReference::BuiltIn(ty)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Boolean(bool),
    Float(f64),
    Int32(i32),
    Int64(i64),
    String(String),
    Vector2(Vector2),
    Vector3(Vector3),
    Vector4(Vector4),
    Color(Color),
    /// A duration in 100ns ticks.
    TimeSpan { ticks: i64 },
    Null,
}

impl Literal {
    pub fn builtin_type(&self) -> Option<BuiltInType> {
        Some(match self {
            Literal::Boolean(_) => BuiltInType::Boolean,
            Literal::Float(_) => BuiltInType::Float,
            Literal::Int32(_) => BuiltInType::Int32,
            Literal::Int64(_) => BuiltInType::Int64,
            Literal::String(_) => BuiltInType::String,
            Literal::Vector2(_) => BuiltInType::Vector2,
            Literal::Vector3(_) => BuiltInType::Vector3,
            Literal::Vector4(_) => BuiltInType::Vector4,
            Literal::Color(_) => BuiltInType::Color,
            Literal::TimeSpan { .. } => BuiltInType::TimeSpan,
            Literal::Null => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A local, parameter or field.
    Variable(String),
    Literal(Literal),
    /// A call on `receiver`, or on the generated class when there is none.
    MethodCall {
        receiver: Option<Box<Expression>>,
        method: String,
        arguments: Vec<Expression>,
    },
    StaticCall {
        ty: TypeReference,
        method: String,
        arguments: Vec<Expression>,
    },
    PropertyGet {
        receiver: Box<Expression>,
        property: String,
    },
    /// A field of a value struct.
    FieldGet {
        receiver: Box<Expression>,
        field: String,
    },
    New {
        ty: TypeReference,
        arguments: Vec<Expression>,
    },
    EnumValue {
        ty: TypeReference,
        member: String,
    },
    NotNull(Box<Expression>),
}

impl Expression {
    pub fn var(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    pub fn float(value: f64) -> Self {
        Expression::Literal(Literal::Float(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expression::Literal(Literal::String(value.into()))
    }

    /// A call of a method on the generated class itself.
    pub fn call_self(method: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Expression::MethodCall {
            receiver: None,
            method: method.into(),
            arguments,
        }
    }

    pub fn call(self, method: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Expression::MethodCall {
            receiver: Some(Box::new(self)),
            method: method.into(),
            arguments,
        }
    }

    pub fn get(self, property: impl Into<String>) -> Self {
        Expression::PropertyGet {
            receiver: Box::new(self),
            property: property.into(),
        }
    }

    pub fn field(self, field: impl Into<String>) -> Self {
        Expression::FieldGet {
            receiver: Box::new(self),
            field: field.into(),
        }
    }

    pub fn not_null(self) -> Self {
        Expression::NotNull(Box::new(self))
    }

    /// Visit every type this expression mentions, including the types of
    /// literals.
    pub fn visit_types(&self, f: &mut dyn FnMut(&TypeReference)) {
        match self {
            Expression::Variable(_) => {}
            Expression::Literal(literal) => {
                if let Some(ty) = literal.builtin_type() {
                    f(&TypeReference::BuiltIn(ty));
                }
            }
            Expression::MethodCall {
                receiver,
                arguments,
                ..
            } => {
                if let Some(receiver) = receiver {
                    receiver.visit_types(f);
                }
                arguments.iter().for_each(|a| a.visit_types(f));
            }
            Expression::StaticCall { ty, arguments, .. } | Expression::New { ty, arguments } => {
                f(ty);
                arguments.iter().for_each(|a| a.visit_types(f));
            }
            Expression::PropertyGet { receiver, .. } | Expression::FieldGet { receiver, .. } => {
                receiver.visit_types(f)
            }
            Expression::EnumValue { ty, .. } => f(ty),
            Expression::NotNull(inner) => inner.visit_types(f),
        }
    }

    /// True if this expression calls `method` anywhere inside it.
    pub fn calls(&self, method: &str) -> bool {
        match self {
            Expression::MethodCall {
                receiver,
                method: m,
                arguments,
            } => {
                m == method
                    || receiver.as_ref().is_some_and(|r| r.calls(method))
                    || arguments.iter().any(|a| a.calls(method))
            }
            Expression::StaticCall {
                method: m,
                arguments,
                ..
            } => m == method || arguments.iter().any(|a| a.calls(method)),
            Expression::New { arguments, .. } => arguments.iter().any(|a| a.calls(method)),
            Expression::PropertyGet { receiver, .. } | Expression::FieldGet { receiver, .. } => {
                receiver.calls(method)
            }
            Expression::NotNull(inner) => inner.calls(method),
            Expression::Variable(_) | Expression::Literal(_) | Expression::EnumValue { .. } => {
                false
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    DeclareLocal {
        ty: TypeReference,
        name: String,
        value: Expression,
    },
    /// Assign to a local or field.
    Assign { target: String, value: Expression },
    PropertySet {
        receiver: Expression,
        property: String,
        value: Expression,
    },
    Expression(Expression),
    Return(Option<Expression>),
    Comment(String),
}

impl Statement {
    pub fn visit_types(&self, f: &mut dyn FnMut(&TypeReference)) {
        match self {
            Statement::DeclareLocal { ty, value, .. } => {
                f(ty);
                value.visit_types(f);
            }
            Statement::Assign { value, .. } => value.visit_types(f),
            Statement::PropertySet {
                receiver, value, ..
            } => {
                receiver.visit_types(f);
                value.visit_types(f);
            }
            Statement::Expression(e) | Statement::Return(Some(e)) => e.visit_types(f),
            Statement::Return(None) | Statement::Comment(_) => {}
        }
    }

    fn expressions(&self) -> Vec<&Expression> {
        match self {
            Statement::DeclareLocal { value, .. } | Statement::Assign { value, .. } => vec![value],
            Statement::PropertySet {
                receiver, value, ..
            } => vec![receiver, value],
            Statement::Expression(e) | Statement::Return(Some(e)) => vec![e],
            Statement::Return(None) | Statement::Comment(_) => Vec::new(),
        }
    }

    /// True if any expression in the statement calls `method`.
    pub fn calls(&self, method: &str) -> bool {
        self.expressions().iter().any(|e| e.calls(method))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementNode {
    Statement(Statement),
    Block(StatementTree),
}

/// An ordered sequence of statements and nested blocks. A nested block may
/// carry a guard, in which case it only runs when the guard holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementTree {
    pub guard: Option<Expression>,
    pub nodes: Vec<StatementNode>,
}

impl StatementTree {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every statement in the tree, depth first.
    pub fn statements(&self) -> Vec<&Statement> {
        let mut out = Vec::new();
        self.collect_statements(&mut out);
        out
    }

    fn collect_statements<'a>(&'a self, out: &mut Vec<&'a Statement>) {
        for node in &self.nodes {
            match node {
                StatementNode::Statement(s) => out.push(s),
                StatementNode::Block(tree) => tree.collect_statements(out),
            }
        }
    }

    pub fn visit_types(&self, f: &mut dyn FnMut(&TypeReference)) {
        if let Some(guard) = &self.guard {
            guard.visit_types(f);
        }
        for node in &self.nodes {
            match node {
                StatementNode::Statement(s) => s.visit_types(f),
                StatementNode::Block(tree) => tree.visit_types(f),
            }
        }
    }

    /// Nesting depth of the deepest block; a flat tree has depth 0.
    pub fn depth(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| match n {
                StatementNode::Statement(_) => 0,
                StatementNode::Block(tree) => 1 + tree.depth(),
            })
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeReference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Visibility {
    #[default]
    Private,
    Internal,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodKind {
    #[default]
    Ordinary,
    Constructor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeReference,
    pub body: StatementTree,
    pub comment: Option<String>,
    pub visibility: Visibility,
    pub kind: MethodKind,
    pub is_static: bool,
}

impl Method {
    pub fn visit_types(&self, f: &mut dyn FnMut(&TypeReference)) {
        f(&self.return_type);
        for p in &self.parameters {
            f(&p.ty);
        }
        self.body.visit_types(f);
    }
}

/// A field of the generated class. Fields are always private.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: TypeReference,
    /// Initial value; `None` leaves the target's default.
    pub initializer: Option<Expression>,
}

/// The caller-facing accessor of one property binding. The getter returns
/// `field`; the setter runs `setter`, where the new value is `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingAccessor {
    pub name: String,
    pub ty: TypeReference,
    pub field: String,
    pub setter: StatementTree,
}

impl BindingAccessor {
    pub fn visit_types(&self, f: &mut dyn FnMut(&TypeReference)) {
        f(&self.ty);
        self.setter.visit_types(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_types_includes_literals() {
        let expr = Expression::var("_c").call(
            "CreateColorBrush",
            vec![Expression::Literal(Literal::Color(Color::WHITE))],
        );
        let mut seen = Vec::new();
        expr.visit_types(&mut |t| seen.push(t.clone()));
        assert_eq!(seen, vec![TypeReference::BuiltIn(BuiltInType::Color)]);
    }

    #[test]
    fn test_calls_looks_inside_arguments() {
        let stmt = Statement::Expression(Expression::var("result").call(
            "SetSourceParameter",
            vec![
                Expression::string("source"),
                Expression::call_self("CompositionColorBrush_0", vec![]),
            ],
        ));
        assert!(stmt.calls("CompositionColorBrush_0"));
        assert!(!stmt.calls("CreateEffectFactory"));
    }

    #[test]
    fn test_reference_types() {
        assert!(TypeReference::imported("Windows.UI.Composition", "Visual").is_reference_type());
        assert!(!TypeReference::imported_value("Windows.UI", "Color").is_reference_type());
        assert!(!TypeReference::BuiltIn(BuiltInType::Float).is_reference_type());
    }
}
