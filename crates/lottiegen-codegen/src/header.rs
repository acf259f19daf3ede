use crate::code_builder::CodeBuilder;

/// Sections of a header file, in the order they are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeaderSection {
    Preamble,
    Private,
    Internal,
    Public,
    Postamble,
}

impl HeaderSection {
    pub const ALL: [HeaderSection; 5] = [
        HeaderSection::Preamble,
        HeaderSection::Private,
        HeaderSection::Internal,
        HeaderSection::Public,
        HeaderSection::Postamble,
    ];
}

/// Collects header declarations into fixed sections so that the output
/// order does not depend on the order declarations were emitted in.
///
/// The three access sections start with their label at `label_indent`;
/// members go one level deeper. A private or internal section holding only
/// its label is left out.
#[derive(Debug, Clone)]
pub struct HeaderBuilder {
    preamble: CodeBuilder,
    private: CodeBuilder,
    internal: CodeBuilder,
    public: CodeBuilder,
    postamble: CodeBuilder,
}

impl HeaderBuilder {
    pub fn new(label_indent: usize, labels: [String; 3]) -> Self {
        let [private, internal, public] = labels.map(|label| {
            let mut section = CodeBuilder::with_indent(label_indent);
            section.write_line(label);
            section.indent();
            section
        });
        Self {
            preamble: CodeBuilder::new(),
            private,
            internal,
            public,
            postamble: CodeBuilder::with_indent(label_indent),
        }
    }

    pub fn section(&mut self, section: HeaderSection) -> &mut CodeBuilder {
        match section {
            HeaderSection::Preamble => &mut self.preamble,
            HeaderSection::Private => &mut self.private,
            HeaderSection::Internal => &mut self.internal,
            HeaderSection::Public => &mut self.public,
            HeaderSection::Postamble => &mut self.postamble,
        }
    }

    fn get(&self, section: HeaderSection) -> &CodeBuilder {
        match section {
            HeaderSection::Preamble => &self.preamble,
            HeaderSection::Private => &self.private,
            HeaderSection::Internal => &self.internal,
            HeaderSection::Public => &self.public,
            HeaderSection::Postamble => &self.postamble,
        }
    }

    /// Concatenate the sections in their fixed order.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for section in HeaderSection::ALL {
            let builder = self.get(section);
            let omitted = matches!(section, HeaderSection::Private | HeaderSection::Internal)
                && builder.line_count() <= 1;
            if !omitted {
                text.push_str(&builder.to_text());
            }
        }
        text
    }
}
