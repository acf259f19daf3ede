use std::collections::BTreeSet;

use crate::stringifier::Stringifier;
use crate::syntax::{BindingAccessor, Field, Method, TypeReference};

/// Namespaces the generated code imports. Deduplicated and iterated in
/// lexicographic order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamespaceImports {
    namespaces: BTreeSet<String>,
}

impl NamespaceImports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, namespace: impl Into<String>) {
        self.namespaces.insert(namespace.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.namespaces.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Collect the namespace of every type the members mention.
    pub fn collect(
        stringifier: &dyn Stringifier,
        fields: &[Field],
        methods: &[Method],
        accessors: &[BindingAccessor],
    ) -> Self {
        let mut imports = NamespaceImports::new();
        let mut visit = |ty: &TypeReference| {
            if let Some(ns) = stringifier.namespace_of(ty) {
                imports.add(ns);
            }
        };
        for field in fields {
            visit(&field.ty);
            if let Some(init) = &field.initializer {
                init.visit_types(&mut visit);
            }
        }
        for method in methods {
            method.visit_types(&mut visit);
        }
        for accessor in accessors {
            accessor.visit_types(&mut visit);
        }
        imports
    }

    /// Render one import line per namespace.
    pub fn render(&self, stringifier: &dyn Stringifier) -> Vec<String> {
        self.iter().map(|ns| stringifier.namespace_import(ns)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csharp::CSharpStringifier;
    use crate::syntax::BuiltInType;

    #[test]
    fn test_same_import_twice_is_one_line() {
        let mut imports = NamespaceImports::new();
        imports.add("Windows.UI.Composition");
        imports.add("System.Numerics");
        imports.add("Windows.UI.Composition");
        assert_eq!(
            imports.render(&CSharpStringifier::new()),
            vec!["using System.Numerics;", "using Windows.UI.Composition;"]
        );
    }

    #[test]
    fn test_collect_from_fields() {
        let fields = vec![
            Field {
                name: "_c".into(),
                ty: TypeReference::imported("Windows.UI.Composition", "Compositor"),
                initializer: None,
            },
            Field {
                name: "_themeProgress".into(),
                ty: BuiltInType::Float.into(),
                initializer: None,
            },
            Field {
                name: "_root".into(),
                ty: TypeReference::imported("Windows.UI.Composition", "Visual"),
                initializer: None,
            },
        ];
        let imports = NamespaceImports::collect(&CSharpStringifier::new(), &fields, &[], &[]);
        assert_eq!(imports.iter().collect::<Vec<_>>(), vec!["Windows.UI.Composition"]);
    }
}
