/// Accumulates lines of source text with indentation.
///
/// Lines store their own indent level so one builder can be appended into
/// another at a deeper level.
#[derive(Debug, Clone, Default)]
pub struct CodeBuilder {
    lines: Vec<(usize, String)>,
    indent_level: usize,
}

const INDENT: &str = "    ";

impl CodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder whose first line starts at `indent_level`.
    pub fn with_indent(indent_level: usize) -> Self {
        Self {
            lines: Vec::new(),
            indent_level,
        }
    }

    pub fn write_line(&mut self, text: impl Into<String>) {
        self.lines.push((self.indent_level, text.into()));
    }

    pub fn write_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for line in lines {
            self.write_line(line);
        }
    }

    pub fn blank_line(&mut self) {
        self.write_line("");
    }

    pub fn write_comment(&mut self, text: &str) {
        for line in text.lines() {
            self.write_line(format!("// {line}").trim_end().to_string());
        }
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn unindent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn open_scope(&mut self) {
        self.write_line("{");
        self.indent();
    }

    pub fn close_scope(&mut self) {
        self.close_scope_with("}");
    }

    /// Close a scope with custom text, e.g. `};`.
    pub fn close_scope_with(&mut self, text: &str) {
        self.unindent();
        self.write_line(text);
    }

    /// Append the lines of `other` below the current indent level.
    pub fn append(&mut self, other: &CodeBuilder) {
        for (level, text) in &other.lines {
            self.lines.push((self.indent_level + level, text.clone()));
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render to text. Blank lines carry no indentation.
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        for (level, text) in &self.lines {
            if !text.is_empty() {
                output.push_str(&INDENT.repeat(*level));
                output.push_str(text);
            }
            output.push('\n');
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scopes_indent() {
        let mut b = CodeBuilder::new();
        b.write_line("namespace A");
        b.open_scope();
        b.write_line("int x;");
        b.blank_line();
        b.close_scope();
        assert_eq!(b.to_text(), "namespace A\n{\n    int x;\n\n}\n");
    }

    #[test]
    fn test_append_reindents() {
        let mut inner = CodeBuilder::new();
        inner.open_scope();
        inner.write_line("return;");
        inner.close_scope();

        let mut outer = CodeBuilder::with_indent(1);
        outer.append(&inner);
        assert_eq!(outer.to_text(), "    {\n        return;\n    }\n");
        assert_eq!(outer.line_count(), 3);
    }

    #[test]
    fn test_comment_lines() {
        let mut b = CodeBuilder::new();
        b.write_comment("first\n\nsecond");
        assert_eq!(b.to_text(), "// first\n//\n// second\n");
    }
}
