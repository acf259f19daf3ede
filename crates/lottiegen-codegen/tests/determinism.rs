use std::time::Duration;

use lottiegen_codegen::{generate, TargetDescriptor};
use lottiegen_comp::{
    AnimationKeyFrame, Animator, CompositionGraph, CompositionObject, NodeId, PropertyBinding,
    VisualProperties,
};
use lottiegen_core::{Color, TargetLanguage, Vector2, Vector3};

const LANGUAGES: [TargetLanguage; 3] = [
    TargetLanguage::CSharp,
    TargetLanguage::CppWinrt,
    TargetLanguage::Cx,
];

fn target(language: TargetLanguage) -> TargetDescriptor {
    TargetDescriptor::new(language, Vector2::new(200.0, 100.0), Duration::from_secs(3))
}

/// Two sprites sharing one brush, an animated offset and two bindings added
/// in the given order.
fn scene(bindings_reversed: bool) -> CompositionGraph {
    let mut graph = CompositionGraph::new();
    let brush = graph.add(CompositionObject::ColorBrush {
        color: Color::from_argb8(0xFF, 0xC0, 0x10, 0x10),
        animators: vec![],
    });
    let slide = graph.add(CompositionObject::Vector2KeyFrameAnimation {
        keyframes: vec![
            AnimationKeyFrame::new(0.0, Vector2::new(0.0, 0.0)),
            AnimationKeyFrame::new(1.0, Vector2::new(100.0, 0.0)),
        ],
    });
    let first = graph.add(CompositionObject::SpriteVisual {
        properties: VisualProperties {
            size: Some(Vector2::new(50.0, 50.0)),
            ..Default::default()
        },
        brush: Some(brush),
        animators: vec![Animator {
            property: "Offset.XY".into(),
            animation: slide,
        }],
    });
    let second = graph.add(CompositionObject::SpriteVisual {
        properties: VisualProperties {
            size: Some(Vector2::new(50.0, 50.0)),
            offset: Some(Vector3::new(100.0, 50.0, 0.0)),
            opacity: Some(0.5),
            ..Default::default()
        },
        brush: Some(brush),
        animators: vec![],
    });
    let root = graph.add(CompositionObject::ContainerVisual {
        properties: VisualProperties::default(),
        children: vec![first, second],
        animators: vec![],
    });
    graph.set_root(root);

    let mut bindings = vec![
        PropertyBinding::scalar("Speed", 1.0).unwrap(),
        PropertyBinding::color("Foreground", Color::BLACK).unwrap(),
    ];
    if bindings_reversed {
        bindings.reverse();
    }
    for binding in bindings {
        graph.add_binding(binding).unwrap();
    }
    graph
}

/// The same structure as `scene(false)`, with the objects added to the arena
/// root first and the rest in reverse. Edges point forward at ids not yet
/// allocated.
fn scene_root_first() -> CompositionGraph {
    let mut graph = CompositionGraph::new();
    let (root, second, first) = (NodeId(0), NodeId(1), NodeId(2));
    let (slide, brush) = (NodeId(3), NodeId(4));
    graph.add(CompositionObject::ContainerVisual {
        properties: VisualProperties::default(),
        children: vec![first, second],
        animators: vec![],
    });
    graph.add(CompositionObject::SpriteVisual {
        properties: VisualProperties {
            size: Some(Vector2::new(50.0, 50.0)),
            offset: Some(Vector3::new(100.0, 50.0, 0.0)),
            opacity: Some(0.5),
            ..Default::default()
        },
        brush: Some(brush),
        animators: vec![],
    });
    graph.add(CompositionObject::SpriteVisual {
        properties: VisualProperties {
            size: Some(Vector2::new(50.0, 50.0)),
            ..Default::default()
        },
        brush: Some(brush),
        animators: vec![Animator {
            property: "Offset.XY".into(),
            animation: slide,
        }],
    });
    graph.add(CompositionObject::Vector2KeyFrameAnimation {
        keyframes: vec![
            AnimationKeyFrame::new(0.0, Vector2::new(0.0, 0.0)),
            AnimationKeyFrame::new(1.0, Vector2::new(100.0, 0.0)),
        ],
    });
    let added = graph.add(CompositionObject::ColorBrush {
        color: Color::from_argb8(0xFF, 0xC0, 0x10, 0x10),
        animators: vec![],
    });
    assert_eq!(added, brush);
    graph.set_root(root);
    graph
        .add_binding(PropertyBinding::scalar("Speed", 1.0).unwrap())
        .unwrap();
    graph
        .add_binding(PropertyBinding::color("Foreground", Color::BLACK).unwrap())
        .unwrap();
    graph
}

#[test]
fn test_identical_graphs_generate_identical_text() {
    for language in LANGUAGES {
        let a = generate(&scene(false), &target(language)).unwrap();
        let b = generate(&scene(false), &target(language)).unwrap();
        assert_eq!(a, b, "{language} output differs between runs");
        assert_eq!(a.content_hash().to_hex(), b.content_hash().to_hex());
    }
}

#[test]
fn test_binding_insertion_order_does_not_matter() {
    for language in LANGUAGES {
        let a = generate(&scene(false), &target(language)).unwrap();
        let b = generate(&scene(true), &target(language)).unwrap();
        assert_eq!(a.content_hash(), b.content_hash(), "{language}");
    }
}

#[test]
fn test_arena_order_does_not_matter() {
    let reordered = scene_root_first();
    assert_ne!(reordered, scene(false));
    for language in LANGUAGES {
        let a = generate(&scene(false), &target(language)).unwrap();
        let b = generate(&reordered, &target(language)).unwrap();
        assert_eq!(a.files(), b.files(), "{language}");
        assert_eq!(a.content_hash(), b.content_hash(), "{language}");
    }
}

#[test]
fn test_json_round_trip_generates_identical_text() {
    let graph = scene(false);
    let loaded = CompositionGraph::from_json(&graph.to_json().unwrap()).unwrap();
    let t = target(TargetLanguage::CppWinrt);
    assert_eq!(
        generate(&graph, &t).unwrap().content_hash(),
        generate(&loaded, &t).unwrap().content_hash()
    );
}

#[test]
fn test_languages_hash_differently() {
    let hashes: Vec<String> = LANGUAGES
        .iter()
        .map(|&l| generate(&scene(false), &target(l)).unwrap().content_hash().to_hex())
        .collect();
    assert_ne!(hashes[0], hashes[1]);
    assert_ne!(hashes[1], hashes[2]);
    assert_ne!(hashes[0], hashes[2]);
}

#[test]
fn test_imports_are_sorted_and_unique() {
    let result = generate(&scene(false), &target(TargetLanguage::CSharp)).unwrap();
    let text = result.files()[0].1;
    let namespaces: Vec<&str> = text
        .lines()
        .filter_map(|l| l.strip_prefix("using "))
        .map(|l| l.trim_end_matches(';'))
        .collect();
    let mut sorted = namespaces.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(namespaces, sorted);
    assert!(namespaces.contains(&"System.Numerics"));
    assert!(namespaces.contains(&"Windows.UI.Composition"));
    assert!(namespaces.contains(&"Windows.UI"));
}

#[test]
fn test_header_sections_in_fixed_order() {
    for language in [TargetLanguage::CppWinrt, TargetLanguage::Cx] {
        let result = generate(&scene(false), &target(language)).unwrap();
        let header = result.files()[0].1;
        let class = header.find("class AnimatedVisual").unwrap();
        let private = header.find("    private:").unwrap();
        let public = header.rfind("    public:").unwrap();
        let close = header.rfind("    };").unwrap();
        assert!(class < private && private < public && public < close, "{language}");
        // Binding accessors are declared in the public section only.
        assert!(!header[..public].contains("Speed("), "{language}");
        assert!(header[public..close].contains("Speed"), "{language}");
    }
}

#[test]
fn test_shared_brush_factory_is_cached_in_every_language() {
    for language in LANGUAGES {
        let result = generate(&scene(false), &target(language)).unwrap();
        let all: String = result.files().iter().map(|(_, text)| *text).collect();
        assert!(all.contains("_compositionColorBrush_0"), "{language}");
        assert!(!all.contains("CompositionColorBrush_1"), "{language}");
    }
}
