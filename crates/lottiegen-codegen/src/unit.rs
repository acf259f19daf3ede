//! Translation units: lowered members and the files they print to.

use crate::code_builder::CodeBuilder;
use crate::emit::SyntaxWriter;
use crate::generator::TargetDescriptor;
use crate::header::{HeaderBuilder, HeaderSection};
use crate::imports::NamespaceImports;
use crate::stringifier::{FileLayout, SignaturePlacement, Stringifier};
use crate::syntax::{BindingAccessor, Field, Method, Visibility};
use lottiegen_core::hash::hash_texts;
use lottiegen_core::{ContentHash, TargetLanguage};
use lottiegen_ir::AssetId;

const BANNER: &str = "// Generated by LottieGen. Do not edit.";

/// The members of the generated class before printing.
#[derive(Debug, Clone, PartialEq)]
pub struct LoweredUnit {
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub accessors: Vec<BindingAccessor>,
    pub assets: Vec<AssetId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationUnit {
    /// Declarations and definitions in separate files.
    Split {
        stem: String,
        header: String,
        implementation: String,
    },
    Single {
        stem: String,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenResult {
    pub language: TargetLanguage,
    pub unit: TranslationUnit,
    /// Assets the generated code loads, sorted.
    pub assets: Vec<AssetId>,
}

impl CodegenResult {
    /// File names and contents, header first.
    pub fn files(&self) -> Vec<(String, &str)> {
        match &self.unit {
            TranslationUnit::Single { stem, text } => {
                let ext = match self.language {
                    TargetLanguage::CSharp => "cs",
                    TargetLanguage::CppWinrt | TargetLanguage::Cx => "cpp",
                };
                vec![(format!("{stem}.{ext}"), text.as_str())]
            }
            TranslationUnit::Split {
                stem,
                header,
                implementation,
            } => vec![
                (format!("{stem}.h"), header.as_str()),
                (format!("{stem}.cpp"), implementation.as_str()),
            ],
        }
    }

    /// SHA-256 over every file's text.
    pub fn content_hash(&self) -> ContentHash {
        hash_texts(self.files().into_iter().map(|(_, text)| text))
    }
}

/// Print a lowered unit in the stringifier's file layout.
pub fn write_unit(
    stringifier: &dyn Stringifier,
    target: &TargetDescriptor,
    lowered: LoweredUnit,
) -> CodegenResult {
    let imports = NamespaceImports::collect(
        stringifier,
        &lowered.fields,
        &lowered.methods,
        &lowered.accessors,
    );
    let printer = UnitPrinter {
        s: stringifier,
        writer: SyntaxWriter::new(stringifier),
        target,
        imports,
    };
    let stem = target.class_name.clone();
    let unit = match stringifier.file_layout() {
        FileLayout::Single => TranslationUnit::Single {
            text: printer.single_file(&lowered),
            stem,
        },
        FileLayout::Split => {
            let header_file = format!("{stem}.{}", stringifier.header_extension().unwrap_or("h"));
            TranslationUnit::Split {
                header: printer.header(&lowered),
                implementation: printer.implementation(&lowered, &header_file),
                stem,
            }
        }
    };
    CodegenResult {
        language: stringifier.language(),
        unit,
        assets: lowered.assets,
    }
}

struct UnitPrinter<'a> {
    s: &'a dyn Stringifier,
    writer: SyntaxWriter<'a>,
    target: &'a TargetDescriptor,
    imports: NamespaceImports,
}

impl UnitPrinter<'_> {
    fn class_name(&self) -> &str {
        &self.target.class_name
    }

    fn field_line(&self, field: &Field) -> String {
        let init = field.initializer.as_ref().map(|e| self.writer.expression(e));
        self.s.field_declaration(field, init.as_deref())
    }

    fn write_accessor(
        &self,
        out: &mut CodeBuilder,
        accessor: &BindingAccessor,
        placement: SignaturePlacement,
    ) {
        let setter = self.writer.render_tree(&accessor.setter);
        self.s
            .write_accessor(out, accessor, self.class_name(), &setter, placement);
    }

    fn single_file(&self, lowered: &LoweredUnit) -> String {
        let mut out = CodeBuilder::new();
        out.write_line(BANNER);
        out.write_lines(self.imports.render(self.s));
        out.blank_line();
        out.write_line(self.s.namespace_declaration(&self.target.namespace));
        out.open_scope();
        out.write_line(self.s.class_declaration(self.class_name()));
        out.open_scope();
        for field in &lowered.fields {
            out.write_line(self.field_line(field));
        }
        for accessor in &lowered.accessors {
            out.blank_line();
            self.write_accessor(&mut out, accessor, SignaturePlacement::Inline);
        }
        for method in &lowered.methods {
            out.blank_line();
            self.writer
                .write_method(&mut out, method, self.class_name(), SignaturePlacement::Inline);
        }
        out.close_scope_with(self.s.class_close());
        out.close_scope();
        out.to_text()
    }

    fn header(&self, lowered: &LoweredUnit) -> String {
        let labels = [Visibility::Private, Visibility::Internal, Visibility::Public]
            .map(|v| self.s.access_label(v));
        let mut header = HeaderBuilder::new(1, labels);

        let preamble = header.section(HeaderSection::Preamble);
        preamble.write_lines(self.s.header_preamble());
        preamble.write_line(BANNER);
        preamble.write_lines(self.imports.iter().filter_map(|ns| self.s.header_include(ns)));
        preamble.blank_line();
        preamble.write_line(self.s.namespace_declaration(&self.target.namespace));
        preamble.open_scope();
        if !self.imports.is_empty() {
            preamble.write_lines(self.imports.render(self.s));
            preamble.blank_line();
        }
        preamble.write_line(self.s.class_declaration(self.class_name()));
        preamble.open_scope();

        for field in &lowered.fields {
            let line = self.field_line(field);
            header.section(HeaderSection::Private).write_line(line);
        }
        for method in &lowered.methods {
            let section = match method.visibility {
                Visibility::Private => HeaderSection::Private,
                Visibility::Internal => HeaderSection::Internal,
                Visibility::Public => HeaderSection::Public,
            };
            let line =
                self.s
                    .method_signature(method, self.class_name(), SignaturePlacement::Declaration);
            header.section(section).write_line(line);
        }
        for accessor in &lowered.accessors {
            self.write_accessor(
                header.section(HeaderSection::Public),
                accessor,
                SignaturePlacement::Declaration,
            );
        }

        let postamble = header.section(HeaderSection::Postamble);
        postamble.write_line(self.s.class_close());
        postamble.unindent();
        postamble.write_line("}");
        header.to_text()
    }

    fn implementation(&self, lowered: &LoweredUnit, header_file: &str) -> String {
        let mut out = CodeBuilder::new();
        out.write_line(BANNER);
        out.write_lines(self.s.implementation_includes(header_file));
        out.blank_line();
        out.write_line(self.s.namespace_declaration(&self.target.namespace));
        out.open_scope();
        let mut first = true;
        for method in &lowered.methods {
            if !first {
                out.blank_line();
            }
            first = false;
            self.writer
                .write_method(&mut out, method, self.class_name(), SignaturePlacement::Definition);
        }
        for accessor in &lowered.accessors {
            out.blank_line();
            self.write_accessor(&mut out, accessor, SignaturePlacement::Definition);
        }
        out.close_scope();
        out.to_text()
    }
}
