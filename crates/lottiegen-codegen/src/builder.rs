//! Scoped builders that assemble statement trees and methods.

use crate::syntax::{
    Expression, Method, MethodKind, Parameter, Statement, StatementNode, StatementTree,
    TypeReference, Visibility,
};
use lottiegen_core::{LottieGenError, LottieGenResult};

#[derive(Debug, Default)]
struct Frame {
    guard: Option<Expression>,
    nodes: Vec<StatementNode>,
}

/// Builds a [`StatementTree`] while mirroring lexical nesting.
///
/// The builder keeps a stack of pending frames. The bottom frame is the root
/// and can never be closed.
#[derive(Debug)]
pub struct StatementTreeBuilder {
    frames: Vec<Frame>,
}

impl Default for StatementTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementTreeBuilder {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    /// Number of open scopes above the root.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn open_scope(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Open a scope that only runs when `guard` holds.
    pub fn open_guarded_scope(&mut self, guard: Expression) {
        self.frames.push(Frame {
            guard: Some(guard),
            nodes: Vec::new(),
        });
    }

    /// Close the innermost scope and append it to its parent as one block.
    pub fn close_scope(&mut self) -> LottieGenResult<()> {
        if self.frames.len() <= 1 {
            return Err(LottieGenError::misuse("close_scope called on the root scope"));
        }
        let frame = self
            .frames
            .pop()
            .ok_or_else(|| LottieGenError::misuse("scope stack is empty"))?;
        let block = StatementTree {
            guard: frame.guard,
            nodes: frame.nodes,
        };
        self.innermost().nodes.push(StatementNode::Block(block));
        Ok(())
    }

    pub fn add_statement(&mut self, statement: Statement) {
        self.innermost().nodes.push(StatementNode::Statement(statement));
    }

    /// Freeze the builder. Every scope opened must have been closed.
    pub fn into_statement_tree(mut self) -> LottieGenResult<StatementTree> {
        if self.frames.len() != 1 {
            return Err(LottieGenError::misuse(format!(
                "{} scope(s) still open",
                self.depth()
            )));
        }
        let root = self
            .frames
            .pop()
            .ok_or_else(|| LottieGenError::misuse("scope stack is empty"))?;
        Ok(StatementTree {
            guard: None,
            nodes: root.nodes,
        })
    }

    fn innermost(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

/// Builds a [`Method`]: metadata plus a scoped body.
#[derive(Debug, Default)]
pub struct MethodBuilder {
    name: Option<String>,
    parameters: Vec<Parameter>,
    return_type: Option<TypeReference>,
    comment: Option<String>,
    visibility: Visibility,
    kind: MethodKind,
    is_static: bool,
    body: StatementTreeBuilder,
}

impl MethodBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn add_parameter(&mut self, name: impl Into<String>, ty: TypeReference) -> &mut Self {
        self.parameters.push(Parameter {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn set_return_type(&mut self, ty: TypeReference) -> &mut Self {
        self.return_type = Some(ty);
        self
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn set_visibility(&mut self, visibility: Visibility) -> &mut Self {
        self.visibility = visibility;
        self
    }

    pub fn set_static(&mut self) -> &mut Self {
        self.is_static = true;
        self
    }

    /// Mark the method as the class constructor. Constructors return nothing.
    pub fn set_constructor(&mut self) -> &mut Self {
        self.kind = MethodKind::Constructor;
        self.return_type = Some(TypeReference::BuiltIn(crate::syntax::BuiltInType::Void));
        self
    }

    pub fn body(&mut self) -> &mut StatementTreeBuilder {
        &mut self.body
    }

    pub fn add_statement(&mut self, statement: Statement) -> &mut Self {
        self.body.add_statement(statement);
        self
    }

    pub fn into_method(self) -> LottieGenResult<Method> {
        let name = self
            .name
            .ok_or_else(|| LottieGenError::misuse("method has no name"))?;
        let return_type = self
            .return_type
            .ok_or_else(|| LottieGenError::misuse(format!("method {name} has no return type")))?;
        let body = self.body.into_statement_tree()?;
        Ok(Method {
            name,
            parameters: self.parameters,
            return_type,
            body,
            comment: self.comment,
            visibility: self.visibility,
            kind: self.kind,
            is_static: self.is_static,
        })
    }
}
