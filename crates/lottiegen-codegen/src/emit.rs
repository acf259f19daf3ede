//! Prints abstract syntax through a [`Stringifier`].

use crate::code_builder::CodeBuilder;
use crate::stringifier::{SignaturePlacement, Stringifier};
use crate::syntax::{Expression, Method, Statement, StatementNode, StatementTree};

pub struct SyntaxWriter<'a> {
    stringifier: &'a dyn Stringifier,
}

impl<'a> SyntaxWriter<'a> {
    pub fn new(stringifier: &'a dyn Stringifier) -> Self {
        Self { stringifier }
    }

    fn arguments(&self, arguments: &[Expression]) -> Vec<String> {
        arguments.iter().map(|a| self.expression(a)).collect()
    }

    pub fn expression(&self, expression: &Expression) -> String {
        let s = self.stringifier;
        match expression {
            Expression::Variable(name) => name.clone(),
            Expression::Literal(literal) => s.literal(literal),
            Expression::MethodCall {
                receiver,
                method,
                arguments,
            } => {
                let receiver = receiver.as_ref().map(|r| self.expression(r));
                s.method_call(receiver.as_deref(), method, &self.arguments(arguments))
            }
            Expression::StaticCall {
                ty,
                method,
                arguments,
            } => s.static_call(ty, method, &self.arguments(arguments)),
            Expression::PropertyGet { receiver, property } => {
                s.property_get(&self.expression(receiver), property)
            }
            Expression::FieldGet { receiver, field } => {
                s.field_get(&self.expression(receiver), field)
            }
            Expression::New { ty, arguments } => s.new_object(ty, &self.arguments(arguments)),
            Expression::EnumValue { ty, member } => s.enum_value(ty, member),
            Expression::NotNull(inner) => s.not_null(&self.expression(inner)),
        }
    }

    pub fn statement(&self, statement: &Statement) -> String {
        let s = self.stringifier;
        match statement {
            Statement::DeclareLocal { ty, name, value } => {
                s.declare_local(ty, name, &self.expression(value))
            }
            Statement::Assign { target, value } => s.assign(target, &self.expression(value)),
            Statement::PropertySet {
                receiver,
                property,
                value,
            } => s.property_set(&self.expression(receiver), property, &self.expression(value)),
            Statement::Expression(e) => s.expression_statement(&self.expression(e)),
            Statement::Return(value) => {
                let value = value.as_ref().map(|v| self.expression(v));
                s.return_statement(value.as_deref())
            }
            Statement::Comment(text) => format!("// {text}"),
        }
    }

    /// Write the nodes of a tree. Nested blocks become braced scopes, guarded
    /// ones behind an `if`.
    pub fn write_tree(&self, out: &mut CodeBuilder, tree: &StatementTree) {
        for node in &tree.nodes {
            match node {
                StatementNode::Statement(statement) => out.write_line(self.statement(statement)),
                StatementNode::Block(block) => {
                    if let Some(guard) = &block.guard {
                        out.write_line(self.stringifier.if_header(&self.expression(guard)));
                    }
                    out.open_scope();
                    self.write_tree(out, block);
                    out.close_scope();
                }
            }
        }
    }

    /// Render a tree on its own, starting at indent level 0.
    pub fn render_tree(&self, tree: &StatementTree) -> CodeBuilder {
        let mut out = CodeBuilder::new();
        self.write_tree(&mut out, tree);
        out
    }

    /// Write a method with its doc comment, signature and body.
    pub fn write_method(
        &self,
        out: &mut CodeBuilder,
        method: &Method,
        class_name: &str,
        placement: SignaturePlacement,
    ) {
        if let Some(comment) = &method.comment {
            out.write_comment(comment);
        }
        out.write_line(
            self.stringifier
                .method_signature(method, class_name, placement),
        );
        out.open_scope();
        self.write_tree(out, &method.body);
        out.close_scope();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StatementTreeBuilder;
    use crate::csharp::CSharpStringifier;
    use crate::cx::CxStringifier;
    use crate::syntax::TypeReference;

    fn cached_factory_body() -> StatementTree {
        let mut b = StatementTreeBuilder::new();
        b.open_guarded_scope(Expression::var("_brush").not_null());
        b.add_statement(Statement::Return(Some(Expression::var("_brush"))));
        b.close_scope().unwrap();
        b.add_statement(Statement::DeclareLocal {
            ty: TypeReference::imported("Windows.UI.Composition", "CompositionColorBrush"),
            name: "result".into(),
            value: Expression::var("_c").call("CreateColorBrush", vec![]),
        });
        b.add_statement(Statement::Assign {
            target: "_brush".into(),
            value: Expression::var("result"),
        });
        b.add_statement(Statement::Return(Some(Expression::var("result"))));
        b.into_statement_tree().unwrap()
    }

    #[test]
    fn test_guarded_block_csharp() {
        let s = CSharpStringifier::new();
        let text = SyntaxWriter::new(&s).render_tree(&cached_factory_body()).to_text();
        assert_eq!(
            text,
            "if (_brush != null)\n{\n    return _brush;\n}\nvar result = _c.CreateColorBrush();\n_brush = result;\nreturn result;\n"
        );
    }

    #[test]
    fn test_same_tree_cx() {
        let s = CxStringifier::new();
        let text = SyntaxWriter::new(&s).render_tree(&cached_factory_body()).to_text();
        assert!(text.starts_with("if (_brush != nullptr)\n"));
        assert!(text.contains("auto result = _c->CreateColorBrush();"));
    }

    #[test]
    fn test_property_set_on_property_get() {
        let s = CSharpStringifier::new();
        let stmt = Statement::PropertySet {
            receiver: Expression::var("result").get("Properties"),
            property: "Comment".into(),
            value: Expression::string("x"),
        };
        assert_eq!(
            SyntaxWriter::new(&s).statement(&stmt),
            "result.Properties.Comment = \"x\";"
        );
    }
}
