use std::time::Duration;

use lottiegen_codegen::syntax::{Statement, TypeReference};
use lottiegen_codegen::{
    generate, CSharpStringifier, CppwinrtStringifier, InstantiatorGenerator, TargetDescriptor,
};
use lottiegen_comp::{
    AnimationKeyFrame, Animator, CompositeMode, CompositionGraph, CompositionObject,
    EffectBrushSource, EffectSource, ExpressionReference, GraphicsEffect, PropertyBinding,
    ReferenceTarget, VisualProperties,
};
use lottiegen_core::{Color, TargetLanguage, Vector2};
use lottiegen_ir::{AssetId, Easing};

fn target(language: TargetLanguage) -> TargetDescriptor {
    TargetDescriptor::new(language, Vector2::new(64.0, 64.0), Duration::from_millis(1500))
}

/// One sprite visual painted by a Gaussian blur of a color brush, plus a
/// `Progress` scalar binding.
fn blurred_sprite() -> CompositionGraph {
    let mut graph = CompositionGraph::new();
    let input = graph.add(CompositionObject::ColorBrush {
        color: Color::from_argb8(0xFF, 0x20, 0x40, 0x80),
        animators: vec![],
    });
    let blur = graph.add(CompositionObject::EffectBrush {
        effect: GraphicsEffect::GaussianBlur {
            blur_amount: None,
            source: Some(EffectSource::new("source")),
        },
        sources: vec![EffectBrushSource {
            name: "source".into(),
            brush: input,
        }],
    });
    let sprite = graph.add(CompositionObject::SpriteVisual {
        properties: VisualProperties {
            size: Some(Vector2::new(64.0, 64.0)),
            ..Default::default()
        },
        brush: Some(blur),
        animators: vec![],
    });
    graph.set_root(sprite);
    graph
        .add_binding(PropertyBinding::scalar("Progress", 0.0).unwrap())
        .unwrap();
    graph
}

#[test]
fn test_blurred_sprite_lowering() {
    let t = target(TargetLanguage::CSharp);
    let s = CSharpStringifier::new();
    let unit = InstantiatorGenerator::new(&s, &t)
        .unwrap()
        .lower(&blurred_sprite())
        .unwrap();

    let factories: Vec<_> = unit
        .methods
        .iter()
        .filter(|m| m.name.contains('_'))
        .collect();
    assert_eq!(factories.len(), 3);
    assert!(factories.iter().all(|m| m.parameters.is_empty()));

    let sprite_type = TypeReference::imported("Windows.UI.Composition", "SpriteVisual");
    let statements: Vec<&Statement> = unit.methods.iter().flat_map(|m| m.body.statements()).collect();
    let sprite_locals = statements
        .iter()
        .filter(|s| matches!(s, Statement::DeclareLocal { ty, .. } if *ty == sprite_type))
        .count();
    assert_eq!(sprite_locals, 1);

    let effect_factory_calls = statements
        .iter()
        .filter(|s| s.calls("CreateEffectFactory"))
        .count();
    assert_eq!(effect_factory_calls, 1);

    assert_eq!(unit.accessors.len(), 1);
    assert_eq!(unit.accessors[0].name, "Progress");
}

#[test]
fn test_blurred_sprite_csharp_text() {
    let result = generate(&blurred_sprite(), &target(TargetLanguage::CSharp)).unwrap();
    let text = result.files()[0].1;

    assert!(text.contains("var gaussianBlurEffect = new GaussianBlurEffect();"));
    assert!(!text.contains("BlurAmount"));
    assert!(text.contains(
        "gaussianBlurEffect.Source = new CompositionEffectSourceParameter(\"source\");"
    ));
    assert!(text.contains("var effectFactory = _c.CreateEffectFactory(gaussianBlurEffect);"));
    assert!(text.contains("result.SetSourceParameter(\"source\", CompositionColorBrush_0());"));
    assert_eq!(text.matches("public float Progress").count(), 1);
    assert!(text.contains("float _themeProgress = 0F;"));
    assert!(text.contains("_themeProperties.InsertScalar(\"Progress\", value);"));
    assert!(text.contains("using Microsoft.Graphics.Canvas.Effects;"));
}

#[test]
fn test_blurred_sprite_cppwinrt_public_section() {
    let t = target(TargetLanguage::CppWinrt);
    let s = CppwinrtStringifier::new();
    let result = InstantiatorGenerator::new(&s, &t)
        .unwrap()
        .generate(&blurred_sprite())
        .unwrap();
    let header = result.files()[0].1;

    let public = header
        .split("    public:\n")
        .last()
        .expect("header has a public section");
    assert_eq!(public.matches("float Progress() const;").count(), 1);
    assert!(!public.contains("_themeProgress"));

    let private = &header[header.find("    private:\n").unwrap()..header.find("    public:\n").unwrap()];
    assert!(private.contains("float _themeProgress{ 0.0F };"));
    assert!(private.contains("CompositionPropertySet _themeProperties{ nullptr };"));
}

#[test]
fn test_theme_reference_and_assets() {
    let mut graph = CompositionGraph::new();
    let surface = graph.add(CompositionObject::LoadedImageSurface {
        asset_id: AssetId::new("image_0"),
        uri: "ms-appx:///Assets/img_0.png".into(),
    });
    let image_brush = graph.add(CompositionObject::SurfaceBrush { surface });
    let tint = graph.add(CompositionObject::ColorBrush {
        color: Color::WHITE,
        animators: vec![],
    });
    let composite = graph.add(CompositionObject::EffectBrush {
        effect: GraphicsEffect::Composite {
            mode: CompositeMode::DestinationIn,
            sources: vec![EffectSource::new("destination"), EffectSource::new("source")],
        },
        sources: vec![
            EffectBrushSource {
                name: "destination".into(),
                brush: image_brush,
            },
            EffectBrushSource {
                name: "source".into(),
                brush: tint,
            },
        ],
    });
    let opacity = graph.add(CompositionObject::ExpressionAnimation {
        expression: "_theme.Progress".into(),
        references: vec![ExpressionReference {
            name: "_theme".into(),
            target: ReferenceTarget::ThemeProperties,
        }],
    });
    let fade = graph.add(CompositionObject::ScalarKeyFrameAnimation {
        keyframes: vec![
            AnimationKeyFrame::new(0.0, 1.0),
            AnimationKeyFrame {
                progress: 1.0,
                value: 0.0,
                easing: Easing::Hold,
            },
        ],
    });
    let sprite = graph.add(CompositionObject::SpriteVisual {
        properties: VisualProperties::default(),
        brush: Some(composite),
        animators: vec![Animator {
            property: "Opacity".into(),
            animation: opacity,
        }],
    });
    let root = graph.add(CompositionObject::ContainerVisual {
        properties: VisualProperties::default(),
        children: vec![sprite],
        animators: vec![Animator {
            property: "Opacity".into(),
            animation: fade,
        }],
    });
    graph.set_root(root);
    graph
        .add_binding(PropertyBinding::scalar("Progress", 0.0).unwrap())
        .unwrap();

    let result = generate(&graph, &target(TargetLanguage::CSharp)).unwrap();
    assert_eq!(result.assets, vec![AssetId::new("image_0")]);

    let text = result.files()[0].1;
    assert!(text.contains("compositeEffect.Mode = CanvasComposite.DestinationIn;"));
    assert!(text.contains(
        "compositeEffect.Sources.Add(new CompositionEffectSourceParameter(\"destination\"));"
    ));
    assert!(text.contains("result.SetReferenceParameter(\"_theme\", EnsureThemeProperties());"));
    assert!(text.contains(
        "var result = LoadedImageSurface.StartLoadFromUri(new Uri(\"ms-appx:///Assets/img_0.png\"));"
    ));
    assert!(text.contains("result.InsertKeyFrame(1F, 0F, _c.CreateStepEasingFunction());"));
    assert!(text.contains("result.StartAnimation(\"Opacity\", ScalarKeyFrameAnimation_0());"));
    assert!(text.contains("result.Duration = TimeSpan.FromTicks(15000000);"));
}

#[test]
fn test_invalid_graph_produces_no_output() {
    let mut graph = blurred_sprite();
    // A second blur brush that binds a source the effect does not declare.
    let stray = graph.add(CompositionObject::EffectBrush {
        effect: GraphicsEffect::GaussianBlur {
            blur_amount: Some(2.0),
            source: None,
        },
        sources: vec![EffectBrushSource {
            name: "source".into(),
            brush: lottiegen_comp::NodeId(0),
        }],
    });
    let root = graph.add(CompositionObject::SpriteVisual {
        properties: VisualProperties::default(),
        brush: Some(stray),
        animators: vec![],
    });
    graph.set_root(root);
    assert!(generate(&graph, &target(TargetLanguage::CSharp)).is_err());
}
