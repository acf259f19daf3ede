//! # lottiegen-codegen
//!
//! Generates source code that rebuilds a composition graph at runtime.
//!
//! A graph is first lowered to abstract syntax ([`syntax`]) with the scoped
//! builders in [`builder`]. The syntax is then printed through a
//! [`Stringifier`], the only part that knows a target language:
//! [`CSharpStringifier`], [`CppwinrtStringifier`] or [`CxStringifier`].
//! Split targets assemble their header with a [`HeaderBuilder`].

pub mod builder;
pub mod code_builder;
pub mod cppwinrt;
pub mod csharp;
pub mod cx;
pub mod emit;
pub mod generator;
pub mod header;
pub mod imports;
pub mod stringifier;
pub mod syntax;
pub mod unit;

pub use builder::{MethodBuilder, StatementTreeBuilder};
pub use code_builder::CodeBuilder;
pub use cppwinrt::CppwinrtStringifier;
pub use csharp::CSharpStringifier;
pub use cx::CxStringifier;
pub use emit::SyntaxWriter;
pub use generator::{generate, stringifier_for, InstantiatorGenerator, TargetDescriptor};
pub use header::{HeaderBuilder, HeaderSection};
pub use imports::NamespaceImports;
pub use stringifier::{FileLayout, SignaturePlacement, Stringifier};
pub use unit::{CodegenResult, LoweredUnit, TranslationUnit};
