//! Lowers a composition graph to abstract syntax: one factory method per
//! reachable object plus the members of the generated class.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::builder::{MethodBuilder, StatementTreeBuilder};
use crate::stringifier::{lower_first, Stringifier};
use crate::syntax::{
    BindingAccessor, BuiltInType, Expression, Field, Literal, Method, Statement, TypeReference,
    Visibility,
};
use crate::unit::{CodegenResult, LoweredUnit};
use lottiegen_comp::{
    Animator, CompositionGraph, CompositionObject, GraphicsEffect, NodeId, ObjectType,
    PropertyBinding, PropertySetValueType, PropertyValue, ReferenceTarget, VisualProperties,
};
use lottiegen_core::{CodegenConfig, LottieGenError, LottieGenResult, TargetLanguage, Vector2};
use lottiegen_ir::Easing;

const EFFECTS_NAMESPACE: &str = "Microsoft.Graphics.Canvas.Effects";
const CANVAS_NAMESPACE: &str = "Microsoft.Graphics.Canvas";

/// Members every generated class has. Bindings may not reuse these names.
const FIXED_MEMBERS: [&str; 5] = [
    "RootVisual",
    "Duration",
    "Size",
    "EnsureThemeProperties",
    "ColorAsVector4",
];

/// Fields every generated class has, besides the binding backing fields.
const FIXED_FIELDS: [&str; 3] = ["_c", "_root", "_themeProperties"];

/// What to generate and for which runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetDescriptor {
    pub language: TargetLanguage,
    /// Target `Microsoft.UI.Composition` instead of `Windows.UI.Composition`.
    pub supports_modern_runtime: bool,
    pub canvas_size: Vector2,
    pub duration: Duration,
    pub namespace: String,
    pub class_name: String,
}

impl TargetDescriptor {
    pub fn new(language: TargetLanguage, canvas_size: Vector2, duration: Duration) -> Self {
        let defaults = CodegenConfig::default();
        Self {
            language,
            supports_modern_runtime: false,
            canvas_size,
            duration,
            namespace: defaults.namespace,
            class_name: defaults.class_name,
        }
    }

    pub fn from_config(config: &CodegenConfig, canvas_size: Vector2, duration: Duration) -> Self {
        Self {
            language: config.language,
            supports_modern_runtime: config.modern_runtime,
            canvas_size,
            duration,
            namespace: config.namespace.clone(),
            class_name: config.class_name.clone(),
        }
    }

    pub fn composition_namespace(&self) -> &'static str {
        if self.supports_modern_runtime {
            "Microsoft.UI.Composition"
        } else {
            "Windows.UI.Composition"
        }
    }

    fn xaml_media_namespace(&self) -> &'static str {
        if self.supports_modern_runtime {
            "Microsoft.UI.Xaml.Media"
        } else {
            "Windows.UI.Xaml.Media"
        }
    }

    /// Duration in 100ns ticks. Fails if the tick count overflows the
    /// runtime's 64-bit `TimeSpan`.
    pub fn duration_ticks(&self) -> LottieGenResult<i64> {
        i64::try_from(self.duration.as_nanos() / 100).map_err(|_| {
            LottieGenError::Config(format!(
                "duration of {}s does not fit in a TimeSpan",
                self.duration.as_secs()
            ))
        })
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Lowers composition graphs for one target through one stringifier.
pub struct InstantiatorGenerator<'a> {
    stringifier: &'a dyn Stringifier,
    target: &'a TargetDescriptor,
}

impl<'a> InstantiatorGenerator<'a> {
    pub fn new(
        stringifier: &'a dyn Stringifier,
        target: &'a TargetDescriptor,
    ) -> LottieGenResult<Self> {
        let language = stringifier.language().to_string();
        if stringifier.language() != target.language {
            return Err(LottieGenError::unsupported(
                language,
                format!("descriptor asks for {}", target.language),
            ));
        }
        if target.supports_modern_runtime && !stringifier.supports_modern_runtime() {
            return Err(LottieGenError::unsupported(
                language,
                "the modern composition runtime is not supported",
            ));
        }
        if !is_identifier(&target.class_name) {
            return Err(LottieGenError::Config(format!(
                "class name '{}' is not an identifier",
                target.class_name
            )));
        }
        if !target.namespace.split('.').all(is_identifier) {
            return Err(LottieGenError::Config(format!(
                "namespace '{}' is not a dotted identifier",
                target.namespace
            )));
        }
        target.duration_ticks()?;
        Ok(Self {
            stringifier,
            target,
        })
    }

    pub fn stringifier(&self) -> &'a dyn Stringifier {
        self.stringifier
    }

    pub fn target(&self) -> &'a TargetDescriptor {
        self.target
    }

    /// Lower the graph to language-independent members.
    pub fn lower(&self, graph: &CompositionGraph) -> LottieGenResult<LoweredUnit> {
        graph.validate()?;
        let order = graph.preorder()?;
        let names = assign_names(graph, &order)?;
        let shared: BTreeSet<NodeId> = graph
            .in_degrees()?
            .into_iter()
            .filter(|(_, degree)| *degree > 1)
            .map(|(id, _)| id)
            .collect();

        let mut lowering = Lowering {
            generator: self,
            graph,
            names,
            shared,
            fields: Vec::new(),
        };
        lowering.check_binding_names()?;

        let uses_theme = graph.uses_theme_properties()?;
        lowering.push_class_fields(uses_theme);

        let mut methods = vec![lowering.constructor(graph.root()?)?];
        methods.extend(lowering.public_methods()?);

        let mut accessors = Vec::new();
        if uses_theme {
            methods.push(lowering.ensure_theme_properties()?);
            if lowering.needs_color_conversion() {
                methods.push(color_as_vector4()?);
            }
            accessors = lowering.accessors()?;
        }

        for &id in &order {
            methods.push(lowering.factory(id)?);
        }

        Ok(LoweredUnit {
            fields: lowering.fields,
            methods,
            accessors,
            assets: graph.referenced_assets()?,
        })
    }

    /// Lower the graph and print it as a translation unit.
    pub fn generate(&self, graph: &CompositionGraph) -> LottieGenResult<CodegenResult> {
        let lowered = self.lower(graph)?;
        let result = crate::unit::write_unit(self.stringifier, self.target, lowered);
        tracing::info!(
            language = %self.target.language,
            class = %self.target.class_name,
            assets = result.assets.len(),
            hash = %result.content_hash().short(),
            "generated translation unit"
        );
        Ok(result)
    }
}

/// `<TypeName>_<n>`, where `n` counts objects of the type in traversal order.
fn assign_names(
    graph: &CompositionGraph,
    order: &[NodeId],
) -> LottieGenResult<BTreeMap<NodeId, String>> {
    let mut counters: BTreeMap<ObjectType, usize> = BTreeMap::new();
    let mut names = BTreeMap::new();
    for &id in order {
        let ty = graph.get(id)?.object_type();
        let n = counters.entry(ty).or_default();
        names.insert(id, format!("{}_{}", ty.type_name(), n));
        *n += 1;
    }
    Ok(names)
}

fn exposed_type(ty: PropertySetValueType) -> TypeReference {
    TypeReference::BuiltIn(match ty {
        PropertySetValueType::Scalar => BuiltInType::Float,
        PropertySetValueType::Vector2 => BuiltInType::Vector2,
        PropertySetValueType::Vector3 => BuiltInType::Vector3,
        PropertySetValueType::Vector4 => BuiltInType::Vector4,
        PropertySetValueType::Color => BuiltInType::Color,
        PropertySetValueType::Boolean => BuiltInType::Boolean,
    })
}

fn value_literal(value: &PropertyValue) -> Literal {
    match *value {
        PropertyValue::Scalar(v) => Literal::Float(v),
        PropertyValue::Vector2(v) => Literal::Vector2(v),
        PropertyValue::Vector3(v) => Literal::Vector3(v),
        PropertyValue::Vector4(v) => Literal::Vector4(v),
        PropertyValue::Color(c) => Literal::Color(c),
        PropertyValue::Boolean(b) => Literal::Boolean(b),
    }
}

fn backing_field(binding: &PropertyBinding) -> String {
    format!("_theme{}", binding.binding_name)
}

fn stores_color_as_vector4(binding: &PropertyBinding) -> bool {
    binding.exposed_type == PropertySetValueType::Color
        && binding.stored_type == PropertySetValueType::Vector4
}

/// The value to insert into the property set for an exposed value.
fn stored_value(binding: &PropertyBinding, value: Expression) -> Expression {
    if stores_color_as_vector4(binding) {
        Expression::call_self("ColorAsVector4", vec![value])
    } else {
        value
    }
}

fn color_as_vector4() -> LottieGenResult<Method> {
    let color = || Expression::var("color");
    let mut m = MethodBuilder::new();
    m.set_name("ColorAsVector4")
        .set_static()
        .add_parameter("color", BuiltInType::Color.into())
        .set_return_type(BuiltInType::Vector4.into());
    m.add_statement(Statement::Return(Some(Expression::New {
        ty: BuiltInType::Vector4.into(),
        arguments: vec![
            color().field("R"),
            color().field("G"),
            color().field("B"),
            color().field("A"),
        ],
    })));
    m.into_method()
}

/// Per-graph lowering state.
struct Lowering<'g, 'a> {
    generator: &'g InstantiatorGenerator<'a>,
    graph: &'g CompositionGraph,
    names: BTreeMap<NodeId, String>,
    shared: BTreeSet<NodeId>,
    fields: Vec<Field>,
}

impl<'g, 'a> Lowering<'g, 'a> {
    fn target(&self) -> &TargetDescriptor {
        self.generator.target
    }

    fn composition_type(&self, name: &str) -> TypeReference {
        TypeReference::imported(self.target().composition_namespace(), name)
    }

    fn object_type(&self, ty: ObjectType) -> TypeReference {
        match ty {
            ObjectType::LoadedImageSurface => {
                TypeReference::imported(self.target().xaml_media_namespace(), ty.type_name())
            }
            other => self.composition_type(other.type_name()),
        }
    }

    fn name(&self, id: NodeId) -> LottieGenResult<&str> {
        self.names
            .get(&id)
            .map(String::as_str)
            .ok_or_else(|| LottieGenError::structural(id.to_string(), "object is not reachable"))
    }

    fn factory_call(&self, id: NodeId) -> LottieGenResult<Expression> {
        Ok(Expression::call_self(self.name(id)?, vec![]))
    }

    /// Binding names become accessors, so they must not collide with any
    /// other member of the class or with a keyword of the target language.
    fn check_binding_names(&self) -> LottieGenResult<()> {
        let class_name = self.target().class_name.as_str();
        let bindings = self.graph.property_bindings();
        let backing_fields: BTreeSet<String> = bindings.iter().map(backing_field).collect();
        for binding in bindings.iter() {
            let name = binding.binding_name.as_str();
            let node = format!("binding '{name}'");
            let clashes = name == class_name
                || FIXED_MEMBERS.contains(&name)
                || FIXED_FIELDS.contains(&name)
                || backing_fields.contains(name)
                || self.names.values().any(|n| n == name);
            if clashes {
                return Err(LottieGenError::structural(
                    node,
                    "name clashes with a generated member",
                ));
            }
            if self.generator.stringifier.is_reserved_word(name) {
                return Err(LottieGenError::structural(
                    node,
                    format!("name is a {} keyword", self.target().language),
                ));
            }
        }
        Ok(())
    }

    fn needs_color_conversion(&self) -> bool {
        self.graph
            .property_bindings()
            .iter()
            .any(stores_color_as_vector4)
    }

    fn push_class_fields(&mut self, uses_theme: bool) {
        self.fields.push(Field {
            name: "_c".into(),
            ty: self.composition_type("Compositor"),
            initializer: None,
        });
        self.fields.push(Field {
            name: "_root".into(),
            ty: self.composition_type("Visual"),
            initializer: None,
        });
        if uses_theme {
            self.fields.push(Field {
                name: "_themeProperties".into(),
                ty: self.composition_type("CompositionPropertySet"),
                initializer: None,
            });
            for binding in self.graph.property_bindings().iter() {
                self.fields.push(Field {
                    name: backing_field(binding),
                    ty: exposed_type(binding.exposed_type),
                    initializer: Some(Expression::Literal(value_literal(&binding.default_value))),
                });
            }
        }
    }

    fn constructor(&self, root: NodeId) -> LottieGenResult<Method> {
        let mut m = MethodBuilder::new();
        m.set_name(self.target().class_name.clone())
            .set_constructor()
            .set_visibility(Visibility::Internal)
            .add_parameter("compositor", self.composition_type("Compositor"));
        m.add_statement(Statement::Assign {
            target: "_c".into(),
            value: Expression::var("compositor"),
        });
        m.add_statement(Statement::Assign {
            target: "_root".into(),
            value: self.factory_call(root)?,
        });
        m.into_method()
    }

    fn public_methods(&self) -> LottieGenResult<Vec<Method>> {
        let target = self.target();
        let accessors = [
            (
                "RootVisual",
                self.composition_type("Visual"),
                Expression::var("_root"),
                "The root of the composition tree.",
            ),
            (
                "Duration",
                BuiltInType::TimeSpan.into(),
                Expression::Literal(Literal::TimeSpan {
                    ticks: target.duration_ticks()?,
                }),
                "Duration of the animation.",
            ),
            (
                "Size",
                BuiltInType::Vector2.into(),
                Expression::Literal(Literal::Vector2(target.canvas_size)),
                "Size of the animation canvas.",
            ),
        ];
        accessors
            .into_iter()
            .map(|(name, ty, value, comment)| {
                let mut m = MethodBuilder::new();
                m.set_name(name)
                    .set_return_type(ty)
                    .set_visibility(Visibility::Public)
                    .set_comment(comment);
                m.add_statement(Statement::Return(Some(value)));
                m.into_method()
            })
            .collect()
    }

    /// Creates the property set on first use and seeds it with the current
    /// value of every binding.
    fn ensure_theme_properties(&self) -> LottieGenResult<Method> {
        let props = || Expression::var("_themeProperties");
        let mut m = MethodBuilder::new();
        m.set_name("EnsureThemeProperties")
            .set_return_type(self.composition_type("CompositionPropertySet"));
        let body = m.body();
        body.open_guarded_scope(props().not_null());
        body.add_statement(Statement::Return(Some(props())));
        body.close_scope()?;
        body.add_statement(Statement::Assign {
            target: "_themeProperties".into(),
            value: Expression::var("_c").call("CreatePropertySet", vec![]),
        });
        for binding in self.graph.property_bindings().iter() {
            body.add_statement(Statement::Expression(props().call(
                binding.stored_type.insert_method(),
                vec![
                    Expression::string(binding.binding_name.clone()),
                    stored_value(binding, Expression::var(backing_field(binding))),
                ],
            )));
        }
        body.add_statement(Statement::Return(Some(props())));
        m.into_method()
    }

    fn accessors(&self) -> LottieGenResult<Vec<BindingAccessor>> {
        self.graph
            .property_bindings()
            .iter()
            .map(|binding| {
                let field = backing_field(binding);
                let mut setter = StatementTreeBuilder::new();
                setter.add_statement(Statement::Assign {
                    target: field.clone(),
                    value: Expression::var("value"),
                });
                setter.open_guarded_scope(Expression::var("_themeProperties").not_null());
                setter.add_statement(Statement::Expression(
                    Expression::var("_themeProperties").call(
                        binding.stored_type.insert_method(),
                        vec![
                            Expression::string(binding.binding_name.clone()),
                            stored_value(binding, Expression::var("value")),
                        ],
                    ),
                ));
                setter.close_scope()?;
                Ok(BindingAccessor {
                    name: binding.binding_name.clone(),
                    ty: exposed_type(binding.exposed_type),
                    field,
                    setter: setter.into_statement_tree()?,
                })
            })
            .collect()
    }

    /// The factory for one object. Shared objects are cached in a field and
    /// returned from it on later calls.
    fn factory(&mut self, id: NodeId) -> LottieGenResult<Method> {
        let graph = self.graph;
        let object = graph.get(id)?;
        let name = self.name(id)?.to_string();
        let ty = self.object_type(object.object_type());

        let mut m = MethodBuilder::new();
        m.set_name(name.clone()).set_return_type(ty.clone());

        let cache = if self.shared.contains(&id) {
            let field = format!("_{}", lower_first(&name));
            self.fields.push(Field {
                name: field.clone(),
                ty: ty.clone(),
                initializer: None,
            });
            let body = m.body();
            body.open_guarded_scope(Expression::var(field.clone()).not_null());
            body.add_statement(Statement::Return(Some(Expression::var(field.clone()))));
            body.close_scope()?;
            Some(field)
        } else {
            None
        };

        self.lower_object(m.body(), id, object, &ty)?;

        if let Some(field) = cache {
            m.add_statement(Statement::Assign {
                target: field,
                value: Expression::var("result"),
            });
        }
        m.add_statement(Statement::Return(Some(Expression::var("result"))));
        tracing::debug!(factory = %name, shared = self.shared.contains(&id), "lowered factory");
        m.into_method()
    }

    fn declare_result(&self, body: &mut StatementTreeBuilder, ty: &TypeReference, value: Expression) {
        body.add_statement(Statement::DeclareLocal {
            ty: ty.clone(),
            name: "result".into(),
            value,
        });
    }

    fn create(&self, method: &str, arguments: Vec<Expression>) -> Expression {
        Expression::var("_c").call(method, arguments)
    }

    fn lower_object(
        &self,
        body: &mut StatementTreeBuilder,
        id: NodeId,
        object: &CompositionObject,
        ty: &TypeReference,
    ) -> LottieGenResult<()> {
        match object {
            CompositionObject::ContainerVisual {
                properties,
                children,
                animators,
            } => {
                self.declare_result(body, ty, self.create("CreateContainerVisual", vec![]));
                self.visual_properties(body, properties);
                if !children.is_empty() {
                    body.add_statement(Statement::DeclareLocal {
                        ty: self.composition_type("VisualCollection"),
                        name: "children".into(),
                        value: Expression::var("result").get("Children"),
                    });
                    for &child in children {
                        body.add_statement(Statement::Expression(
                            Expression::var("children")
                                .call("InsertAtTop", vec![self.factory_call(child)?]),
                        ));
                    }
                }
                self.start_animations(body, animators)?;
            }
            CompositionObject::SpriteVisual {
                properties,
                brush,
                animators,
            } => {
                self.declare_result(body, ty, self.create("CreateSpriteVisual", vec![]));
                self.visual_properties(body, properties);
                if let Some(brush) = brush {
                    body.add_statement(Statement::PropertySet {
                        receiver: Expression::var("result"),
                        property: "Brush".into(),
                        value: self.factory_call(*brush)?,
                    });
                }
                self.start_animations(body, animators)?;
            }
            CompositionObject::ColorBrush { color, animators } => {
                self.declare_result(
                    body,
                    ty,
                    self.create(
                        "CreateColorBrush",
                        vec![Expression::Literal(Literal::Color(*color))],
                    ),
                );
                self.start_animations(body, animators)?;
            }
            CompositionObject::EffectBrush { .. } => self.effect_brush(body, id, ty)?,
            CompositionObject::SurfaceBrush { surface } => {
                self.declare_result(
                    body,
                    ty,
                    self.create("CreateSurfaceBrush", vec![self.factory_call(*surface)?]),
                );
            }
            CompositionObject::LoadedImageSurface { uri, .. } => {
                self.declare_result(
                    body,
                    ty,
                    Expression::StaticCall {
                        ty: ty.clone(),
                        method: "StartLoadFromUri".into(),
                        arguments: vec![Expression::New {
                            ty: BuiltInType::Uri.into(),
                            arguments: vec![Expression::string(uri.clone())],
                        }],
                    },
                );
            }
            CompositionObject::ScalarKeyFrameAnimation { keyframes } => {
                self.declare_result(body, ty, self.create("CreateScalarKeyFrameAnimation", vec![]));
                self.set_duration(body)?;
                for kf in keyframes {
                    self.insert_key_frame(body, kf.progress, Literal::Float(kf.value), &kf.easing);
                }
            }
            CompositionObject::Vector2KeyFrameAnimation { keyframes } => {
                self.declare_result(body, ty, self.create("CreateVector2KeyFrameAnimation", vec![]));
                self.set_duration(body)?;
                for kf in keyframes {
                    self.insert_key_frame(body, kf.progress, Literal::Vector2(kf.value), &kf.easing);
                }
            }
            CompositionObject::ExpressionAnimation {
                expression,
                references,
            } => {
                self.declare_result(
                    body,
                    ty,
                    self.create(
                        "CreateExpressionAnimation",
                        vec![Expression::string(expression.clone())],
                    ),
                );
                for reference in references {
                    let target = match reference.target {
                        ReferenceTarget::Node(node) => self.factory_call(node)?,
                        ReferenceTarget::ThemeProperties => {
                            Expression::call_self("EnsureThemeProperties", vec![])
                        }
                    };
                    body.add_statement(Statement::Expression(Expression::var("result").call(
                        "SetReferenceParameter",
                        vec![Expression::string(reference.name.clone()), target],
                    )));
                }
            }
        }
        Ok(())
    }

    fn visual_properties(&self, body: &mut StatementTreeBuilder, props: &VisualProperties) {
        let mut set = |property: &str, value: Literal| {
            body.add_statement(Statement::PropertySet {
                receiver: Expression::var("result"),
                property: property.into(),
                value: Expression::Literal(value),
            });
        };
        if let Some(v) = props.center_point {
            set("CenterPoint", Literal::Vector3(v));
        }
        if let Some(v) = props.offset {
            set("Offset", Literal::Vector3(v));
        }
        if let Some(v) = props.size {
            set("Size", Literal::Vector2(v));
        }
        if let Some(v) = props.opacity {
            set("Opacity", Literal::Float(v));
        }
        if let Some(v) = props.rotation_angle_in_degrees {
            set("RotationAngleInDegrees", Literal::Float(v));
        }
        if let Some(v) = props.scale {
            set("Scale", Literal::Vector3(v));
        }
        if let Some(v) = props.is_visible {
            set("IsVisible", Literal::Boolean(v));
        }
    }

    fn start_animations(
        &self,
        body: &mut StatementTreeBuilder,
        animators: &[Animator],
    ) -> LottieGenResult<()> {
        for animator in animators {
            body.add_statement(Statement::Expression(Expression::var("result").call(
                "StartAnimation",
                vec![
                    Expression::string(animator.property.clone()),
                    self.factory_call(animator.animation)?,
                ],
            )));
        }
        Ok(())
    }

    fn set_duration(&self, body: &mut StatementTreeBuilder) -> LottieGenResult<()> {
        body.add_statement(Statement::PropertySet {
            receiver: Expression::var("result"),
            property: "Duration".into(),
            value: Expression::Literal(Literal::TimeSpan {
                ticks: self.target().duration_ticks()?,
            }),
        });
        Ok(())
    }

    fn insert_key_frame(
        &self,
        body: &mut StatementTreeBuilder,
        progress: f64,
        value: Literal,
        easing: &Easing,
    ) {
        let mut arguments = vec![Expression::float(progress), Expression::Literal(value)];
        match easing {
            Easing::Linear => {}
            Easing::Hold => arguments.push(self.create("CreateStepEasingFunction", vec![])),
            Easing::CubicBezier { cp1, cp2 } => arguments.push(self.create(
                "CreateCubicBezierEasingFunction",
                vec![
                    Expression::Literal(Literal::Vector2(*cp1)),
                    Expression::Literal(Literal::Vector2(*cp2)),
                ],
            )),
        }
        body.add_statement(Statement::Expression(
            Expression::var("result").call("InsertKeyFrame", arguments),
        ));
    }

    /// An effect brush: build the effect description, compile it into a
    /// factory, create the brush and bind each source slot in order.
    fn effect_brush(
        &self,
        body: &mut StatementTreeBuilder,
        id: NodeId,
        ty: &TypeReference,
    ) -> LottieGenResult<()> {
        let (effect, sources) = self.graph.ordered_sources(id)?;
        let effect_type = effect.effect_type().type_name();
        let effect_var = lower_first(effect_type);
        let source_parameter = |name: &str| Expression::New {
            ty: self.composition_type("CompositionEffectSourceParameter"),
            arguments: vec![Expression::string(name)],
        };

        body.add_statement(Statement::DeclareLocal {
            ty: TypeReference::imported(EFFECTS_NAMESPACE, effect_type),
            name: effect_var.clone(),
            value: Expression::New {
                ty: TypeReference::imported(EFFECTS_NAMESPACE, effect_type),
                arguments: vec![],
            },
        });
        match effect {
            GraphicsEffect::GaussianBlur {
                blur_amount,
                source,
            } => {
                if let Some(amount) = blur_amount {
                    body.add_statement(Statement::PropertySet {
                        receiver: Expression::var(effect_var.clone()),
                        property: "BlurAmount".into(),
                        value: Expression::float(*amount),
                    });
                }
                if let Some(source) = source {
                    body.add_statement(Statement::PropertySet {
                        receiver: Expression::var(effect_var.clone()),
                        property: "Source".into(),
                        value: source_parameter(&source.name),
                    });
                }
            }
            GraphicsEffect::Composite { mode, sources } => {
                body.add_statement(Statement::PropertySet {
                    receiver: Expression::var(effect_var.clone()),
                    property: "Mode".into(),
                    value: Expression::EnumValue {
                        ty: TypeReference::imported_value(CANVAS_NAMESPACE, "CanvasComposite"),
                        member: mode.member_name().into(),
                    },
                });
                for source in sources {
                    body.add_statement(Statement::Expression(
                        Expression::var(effect_var.clone()).get("Sources").call(
                            self.generator.stringifier.list_add_method(),
                            vec![source_parameter(&source.name)],
                        ),
                    ));
                }
            }
        }

        body.add_statement(Statement::DeclareLocal {
            ty: self.composition_type("CompositionEffectFactory"),
            name: "effectFactory".into(),
            value: self.create("CreateEffectFactory", vec![Expression::var(effect_var)]),
        });
        self.declare_result(
            body,
            ty,
            Expression::var("effectFactory").call("CreateBrush", vec![]),
        );
        for (name, brush) in sources {
            body.add_statement(Statement::Expression(Expression::var("result").call(
                "SetSourceParameter",
                vec![Expression::string(name), self.factory_call(brush)?],
            )));
        }
        Ok(())
    }
}

/// The stringifier for a target language.
pub fn stringifier_for(language: TargetLanguage) -> &'static dyn Stringifier {
    match language {
        TargetLanguage::CSharp => &crate::csharp::CSharpStringifier,
        TargetLanguage::CppWinrt => &crate::cppwinrt::CppwinrtStringifier,
        TargetLanguage::Cx => &crate::cx::CxStringifier,
    }
}

/// Generate the translation unit for `graph` in the descriptor's language.
pub fn generate(
    graph: &CompositionGraph,
    target: &TargetDescriptor,
) -> LottieGenResult<CodegenResult> {
    InstantiatorGenerator::new(stringifier_for(target.language), target)?.generate(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csharp::CSharpStringifier;
    use lottiegen_comp::VisualProperties;
    use lottiegen_core::Color;

    fn target(language: TargetLanguage) -> TargetDescriptor {
        TargetDescriptor::new(language, Vector2::new(100.0, 100.0), Duration::from_secs(2))
    }

    fn shared_brush_graph() -> CompositionGraph {
        let mut graph = CompositionGraph::new();
        let brush = graph.add(CompositionObject::ColorBrush {
            color: Color::WHITE,
            animators: vec![],
        });
        let mut children = Vec::new();
        for _ in 0..2 {
            children.push(graph.add(CompositionObject::SpriteVisual {
                properties: VisualProperties::default(),
                brush: Some(brush),
                animators: vec![],
            }));
        }
        let root = graph.add(CompositionObject::ContainerVisual {
            properties: VisualProperties::default(),
            children,
            animators: vec![],
        });
        graph.set_root(root);
        graph
    }

    #[test]
    fn test_factory_names_in_preorder() {
        let t = target(TargetLanguage::CSharp);
        let s = CSharpStringifier::new();
        let unit = InstantiatorGenerator::new(&s, &t)
            .unwrap()
            .lower(&shared_brush_graph())
            .unwrap();
        let names: Vec<_> = unit.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "AnimatedVisual",
                "RootVisual",
                "Duration",
                "Size",
                "ContainerVisual_0",
                "SpriteVisual_0",
                "CompositionColorBrush_0",
                "SpriteVisual_1",
            ]
        );
    }

    #[test]
    fn test_shared_object_is_cached() {
        let t = target(TargetLanguage::CSharp);
        let s = CSharpStringifier::new();
        let unit = InstantiatorGenerator::new(&s, &t)
            .unwrap()
            .lower(&shared_brush_graph())
            .unwrap();
        assert!(unit.fields.iter().any(|f| f.name == "_compositionColorBrush_0"));
        let brush = unit
            .methods
            .iter()
            .find(|m| m.name == "CompositionColorBrush_0")
            .unwrap();
        assert!(brush.body.nodes.len() > 1);
        assert_eq!(brush.body.depth(), 1);
    }

    #[test]
    fn test_cx_rejects_modern_runtime() {
        let mut t = target(TargetLanguage::Cx);
        t.supports_modern_runtime = true;
        let err = generate(&shared_brush_graph(), &t).unwrap_err();
        assert!(matches!(err, LottieGenError::UnsupportedTarget { .. }));
    }

    #[test]
    fn test_language_mismatch_rejected() {
        let t = target(TargetLanguage::CppWinrt);
        let s = CSharpStringifier::new();
        assert!(matches!(
            InstantiatorGenerator::new(&s, &t),
            Err(LottieGenError::UnsupportedTarget { .. })
        ));
    }

    #[test]
    fn test_modern_runtime_namespace() {
        let mut t = target(TargetLanguage::CSharp);
        t.supports_modern_runtime = true;
        let result = generate(&shared_brush_graph(), &t).unwrap();
        let text = result.files()[0].1;
        assert!(text.contains("using Microsoft.UI.Composition;"));
        assert!(!text.contains("using Windows.UI.Composition;"));
    }

    #[test]
    fn test_binding_name_clash_rejected() {
        let mut graph = shared_brush_graph();
        graph
            .add_binding(PropertyBinding::scalar("Size", 1.0).unwrap())
            .unwrap();
        let err = generate(&graph, &target(TargetLanguage::CSharp)).unwrap_err();
        assert!(matches!(err, LottieGenError::StructuralViolation { .. }));
    }

    fn scalar_bindings_result(
        names: &[&str],
        language: TargetLanguage,
    ) -> LottieGenResult<CodegenResult> {
        let mut graph = shared_brush_graph();
        for name in names {
            graph.add_binding(PropertyBinding::scalar(*name, 0.0)?)?;
        }
        generate(&graph, &target(language))
    }

    #[test]
    fn test_binding_named_like_a_field_rejected() {
        for name in ["_c", "_root", "_themeProperties"] {
            let err = scalar_bindings_result(&[name], TargetLanguage::CSharp).unwrap_err();
            assert!(
                matches!(err, LottieGenError::StructuralViolation { .. }),
                "{name}"
            );
        }
    }

    #[test]
    fn test_binding_named_like_a_backing_field_rejected() {
        let err = scalar_bindings_result(&["A", "_themeA"], TargetLanguage::CSharp).unwrap_err();
        assert!(err.to_string().contains("_themeA"));
        assert!(scalar_bindings_result(&["A", "B"], TargetLanguage::CSharp).is_ok());
    }

    #[test]
    fn test_keyword_binding_rejected() {
        for language in [
            TargetLanguage::CSharp,
            TargetLanguage::CppWinrt,
            TargetLanguage::Cx,
        ] {
            let err = scalar_bindings_result(&["class"], language).unwrap_err();
            assert!(err.to_string().contains("keyword"), "{language}");
        }
        // Keywords are per language.
        assert!(scalar_bindings_result(&["foreach"], TargetLanguage::CSharp).is_err());
        assert!(scalar_bindings_result(&["foreach"], TargetLanguage::CppWinrt).is_ok());
        assert!(scalar_bindings_result(&["nullptr"], TargetLanguage::CSharp).is_ok());
        assert!(scalar_bindings_result(&["nullptr"], TargetLanguage::Cx).is_err());
    }

    #[test]
    fn test_color_binding_adds_conversion() {
        let mut graph = shared_brush_graph();
        graph
            .add_binding(PropertyBinding::color("Accent", Color::BLACK).unwrap())
            .unwrap();
        let t = target(TargetLanguage::CSharp);
        let s = CSharpStringifier::new();
        let unit = InstantiatorGenerator::new(&s, &t).unwrap().lower(&graph).unwrap();
        assert!(unit.methods.iter().any(|m| m.name == "ColorAsVector4"));
        assert!(unit.fields.iter().any(|f| f.name == "_themeAccent"));
        assert_eq!(unit.accessors.len(), 1);
    }

    #[test]
    fn test_invalid_class_name_rejected() {
        let mut t = target(TargetLanguage::CSharp);
        t.class_name = "Not A Name".into();
        assert!(matches!(
            generate(&shared_brush_graph(), &t),
            Err(LottieGenError::Config(_))
        ));
    }

    #[test]
    fn test_duration_too_long_for_timespan_rejected() {
        let t = TargetDescriptor::new(
            TargetLanguage::CSharp,
            Vector2::new(100.0, 100.0),
            Duration::from_secs(u64::MAX / 2),
        );
        assert!(matches!(t.duration_ticks(), Err(LottieGenError::Config(_))));
        let s = CSharpStringifier::new();
        assert!(matches!(
            InstantiatorGenerator::new(&s, &t),
            Err(LottieGenError::Config(_))
        ));
    }

    #[test]
    fn test_duration_ticks() {
        assert_eq!(
            target(TargetLanguage::CSharp).duration_ticks().unwrap(),
            20_000_000
        );
    }
}
