use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::binding::{PropertyBinding, PropertyBindings};
use crate::effect::{GraphicsEffect, GraphicsEffectType};
use crate::object::{CompositionObject, NodeId, ObjectType};
use lottiegen_core::{LottieGenError, LottieGenResult};
use lottiegen_ir::AssetId;

/// A graph of composition objects stored in an arena and addressed by
/// [`NodeId`]. The root must be a visual. Enumeration order is the stored
/// order of objects and their edges, so identical graphs enumerate
/// identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositionGraph {
    objects: Vec<CompositionObject>,
    #[serde(default)]
    root: Option<NodeId>,
    #[serde(default)]
    bindings: PropertyBindings,
}

impl CompositionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a graph from JSON.
    pub fn from_json(json: &str) -> LottieGenResult<Self> {
        let graph: CompositionGraph = serde_json::from_str(json)?;
        graph.validate()?;
        Ok(graph)
    }

    pub fn to_json(&self) -> LottieGenResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add an object and return its id. Edges are checked by [`Self::validate`].
    pub fn add(&mut self, object: CompositionObject) -> NodeId {
        self.objects.push(object);
        NodeId(self.objects.len() - 1)
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn add_binding(&mut self, binding: PropertyBinding) -> LottieGenResult<()> {
        self.bindings.add(binding)
    }

    pub fn root(&self) -> LottieGenResult<NodeId> {
        self.root
            .ok_or_else(|| LottieGenError::structural("graph", "no root visual"))
    }

    pub fn get(&self, id: NodeId) -> LottieGenResult<&CompositionObject> {
        self.objects
            .get(id.0)
            .ok_or_else(|| LottieGenError::structural(id.to_string(), "no such object"))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// The graph's property bindings, ordered by binding name.
    pub fn property_bindings(&self) -> &PropertyBindings {
        &self.bindings
    }

    /// The effect type of an effect brush, or `None` for other objects.
    pub fn effect_type(&self, id: NodeId) -> LottieGenResult<Option<GraphicsEffectType>> {
        Ok(match self.get(id)? {
            CompositionObject::EffectBrush { effect, .. } => Some(effect.effect_type()),
            _ => None,
        })
    }

    /// The effect of an effect brush paired with the brushes bound to its
    /// source slots, in the order the effect declares the slots.
    pub fn ordered_sources(
        &self,
        id: NodeId,
    ) -> LottieGenResult<(&GraphicsEffect, Vec<(&str, NodeId)>)> {
        let CompositionObject::EffectBrush { effect, sources } = self.get(id)? else {
            return Err(LottieGenError::structural(
                id.to_string(),
                "not an effect brush",
            ));
        };
        let slots = effect.sources();
        if slots.len() != sources.len() {
            return Err(LottieGenError::structural(
                id.to_string(),
                format!(
                    "{} expects {} source(s), {} bound",
                    effect.effect_type().type_name(),
                    slots.len(),
                    sources.len()
                ),
            ));
        }
        let mut ordered = Vec::with_capacity(slots.len());
        for (slot, bound) in slots.iter().zip(sources) {
            if slot.name != bound.name {
                return Err(LottieGenError::structural(
                    id.to_string(),
                    format!(
                        "source '{}' bound where '{}' was expected",
                        bound.name, slot.name
                    ),
                ));
            }
            ordered.push((slot.name.as_str(), bound.brush));
        }
        Ok((effect, ordered))
    }

    /// Objects reachable from the root in depth-first pre-order, following
    /// edges in stored order. Each object appears once.
    pub fn preorder(&self) -> LottieGenResult<Vec<NodeId>> {
        let root = self.root()?;
        let mut order = Vec::new();
        let mut seen = BTreeSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            order.push(id);
            let edges = self.get(id)?.edges();
            stack.extend(edges.iter().rev().map(|e| e.target));
        }
        Ok(order)
    }

    /// Number of edges from reachable objects into each reachable object.
    /// Objects with more than one incoming edge are shared.
    pub fn in_degrees(&self) -> LottieGenResult<BTreeMap<NodeId, usize>> {
        let reachable = self.preorder()?;
        let mut degrees: BTreeMap<NodeId, usize> = reachable.iter().map(|&id| (id, 0)).collect();
        for &id in &reachable {
            for edge in self.get(id)?.edges() {
                *degrees.entry(edge.target).or_default() += 1;
            }
        }
        Ok(degrees)
    }

    /// Ids of the assets loaded by reachable image surfaces, sorted and
    /// deduplicated.
    pub fn referenced_assets(&self) -> LottieGenResult<Vec<AssetId>> {
        let mut assets = BTreeSet::new();
        for id in self.preorder()? {
            if let CompositionObject::LoadedImageSurface { asset_id, .. } = self.get(id)? {
                assets.insert(asset_id.clone());
            }
        }
        Ok(assets.into_iter().collect())
    }

    /// True if any reachable object uses the theme property set.
    pub fn uses_theme_properties(&self) -> LottieGenResult<bool> {
        if !self.bindings.is_empty() {
            return Ok(true);
        }
        for id in self.preorder()? {
            if self.get(id)?.references_theme() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Check every structural rule of the graph: the root is a visual, edges
    /// point at existing objects of the right kind, effect brushes bind
    /// exactly the sources their effect declares, and there are no cycles.
    pub fn validate(&self) -> LottieGenResult<()> {
        let root = self.root()?;
        if !self.get(root)?.object_type().is_visual() {
            return Err(LottieGenError::structural(
                root.to_string(),
                "root is not a visual",
            ));
        }

        for (index, object) in self.objects.iter().enumerate() {
            let id = NodeId(index);
            let node = format!("{} {}", object.object_type().type_name(), id);
            for edge in object.edges() {
                let target = self.objects.get(edge.target.0).ok_or_else(|| {
                    LottieGenError::structural(
                        node.clone(),
                        format!("edge '{}' points at missing {}", edge.label, edge.target),
                    )
                })?;
                check_edge_kind(object, &edge.label, target.object_type(), &node)?;
            }
            if let CompositionObject::EffectBrush { effect, .. } = object {
                effect.validate(&node)?;
                self.ordered_sources(id)?;
            }
            if object.references_theme() && self.bindings.is_empty() {
                return Err(LottieGenError::structural(
                    node,
                    "references theme properties but the graph has no bindings",
                ));
            }
        }

        self.check_acyclic()?;
        tracing::debug!(objects = self.objects.len(), "composition graph validated");
        Ok(())
    }

    fn check_acyclic(&self) -> LottieGenResult<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.objects.len()];
        for start in 0..self.objects.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            // (node, next edge index) frames of an iterative DFS.
            let mut stack = vec![(NodeId(start), 0usize)];
            marks[start] = Mark::InProgress;
            while let Some((id, next)) = stack.pop() {
                let edges = self.get(id)?.edges();
                if let Some(edge) = edges.get(next) {
                    stack.push((id, next + 1));
                    match marks[edge.target.0] {
                        Mark::InProgress => {
                            return Err(LottieGenError::structural(
                                id.to_string(),
                                format!("edge '{}' closes a cycle", edge.label),
                            ));
                        }
                        Mark::Unvisited => {
                            marks[edge.target.0] = Mark::InProgress;
                            stack.push((edge.target, 0));
                        }
                        Mark::Done => {}
                    }
                } else {
                    marks[id.0] = Mark::Done;
                }
            }
        }
        Ok(())
    }
}

fn check_edge_kind(
    owner: &CompositionObject,
    label: &str,
    target: ObjectType,
    node: &str,
) -> LottieGenResult<()> {
    let is_animator = owner.animators().iter().any(|a| a.property == label);
    let ok = match owner {
        _ if is_animator => target.is_animation(),
        CompositionObject::ContainerVisual { .. } => target.is_visual(),
        CompositionObject::SpriteVisual { .. } | CompositionObject::EffectBrush { .. } => {
            target.is_brush()
        }
        CompositionObject::SurfaceBrush { .. } => target == ObjectType::LoadedImageSurface,
        _ => true,
    };
    if ok {
        Ok(())
    } else {
        Err(LottieGenError::structural(
            node,
            format!("edge '{}' cannot point at a {}", label, target.type_name()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{CompositeMode, EffectSource};
    use crate::object::{EffectBrushSource, VisualProperties};
    use lottiegen_core::Color;

    fn color_brush(graph: &mut CompositionGraph) -> NodeId {
        graph.add(CompositionObject::ColorBrush {
            color: Color::WHITE,
            animators: vec![],
        })
    }

    fn sprite(graph: &mut CompositionGraph, brush: Option<NodeId>) -> NodeId {
        graph.add(CompositionObject::SpriteVisual {
            properties: VisualProperties::default(),
            brush,
            animators: vec![],
        })
    }

    #[test]
    fn test_preorder_follows_stored_edge_order() {
        let mut graph = CompositionGraph::new();
        let brush = color_brush(&mut graph);
        let a = sprite(&mut graph, Some(brush));
        let b = sprite(&mut graph, Some(brush));
        let root = graph.add(CompositionObject::ContainerVisual {
            properties: VisualProperties::default(),
            children: vec![a, b],
            animators: vec![],
        });
        graph.set_root(root);
        graph.validate().unwrap();

        assert_eq!(graph.preorder().unwrap(), vec![root, a, brush, b]);
        assert_eq!(graph.in_degrees().unwrap()[&brush], 2);
    }

    #[test]
    fn test_missing_root_rejected() {
        let graph = CompositionGraph::new();
        assert!(graph.validate().is_err());
    }

    #[test]
    fn test_dangling_edge_rejected() {
        let mut graph = CompositionGraph::new();
        let root = sprite(&mut graph, Some(NodeId(42)));
        graph.set_root(root);
        let err = graph.validate().unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut graph = CompositionGraph::new();
        let root = graph.add(CompositionObject::ContainerVisual {
            properties: VisualProperties::default(),
            children: vec![NodeId(1)],
            animators: vec![],
        });
        graph.add(CompositionObject::ContainerVisual {
            properties: VisualProperties::default(),
            children: vec![root],
            animators: vec![],
        });
        graph.set_root(root);
        let err = graph.validate().unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn test_wrong_edge_kind_rejected() {
        let mut graph = CompositionGraph::new();
        let brush = color_brush(&mut graph);
        let root = graph.add(CompositionObject::ContainerVisual {
            properties: VisualProperties::default(),
            children: vec![brush],
            animators: vec![],
        });
        graph.set_root(root);
        assert!(graph.validate().is_err());
    }

    #[test]
    fn test_effect_sources_must_match_slots() {
        let mut graph = CompositionGraph::new();
        let a = color_brush(&mut graph);
        let b = color_brush(&mut graph);
        let effect_brush = graph.add(CompositionObject::EffectBrush {
            effect: GraphicsEffect::Composite {
                mode: CompositeMode::SourceOver,
                sources: vec![EffectSource::new("destination"), EffectSource::new("source")],
            },
            sources: vec![
                EffectBrushSource {
                    name: "source".into(),
                    brush: a,
                },
                EffectBrushSource {
                    name: "destination".into(),
                    brush: b,
                },
            ],
        });
        let root = sprite(&mut graph, Some(effect_brush));
        graph.set_root(root);

        let err = graph.validate().unwrap_err();
        assert!(matches!(err, LottieGenError::StructuralViolation { .. }));
        assert_eq!(
            graph.effect_type(effect_brush).unwrap(),
            Some(GraphicsEffectType::CompositeEffect)
        );
    }

    #[test]
    fn test_ordered_sources_for_blur() {
        let mut graph = CompositionGraph::new();
        let input = color_brush(&mut graph);
        let blur = graph.add(CompositionObject::EffectBrush {
            effect: GraphicsEffect::GaussianBlur {
                blur_amount: Some(4.0),
                source: Some(EffectSource::new("source")),
            },
            sources: vec![EffectBrushSource {
                name: "source".into(),
                brush: input,
            }],
        });
        let root = sprite(&mut graph, Some(blur));
        graph.set_root(root);
        graph.validate().unwrap();

        let (_, sources) = graph.ordered_sources(blur).unwrap();
        assert_eq!(sources, vec![("source", input)]);
        assert_eq!(graph.effect_type(root).unwrap(), None);
    }

    #[test]
    fn test_referenced_assets_sorted_and_deduplicated() {
        let mut graph = CompositionGraph::new();
        let mut children = Vec::new();
        for id in ["image_1", "image_0", "image_1"] {
            let surface = graph.add(CompositionObject::LoadedImageSurface {
                asset_id: AssetId::new(id),
                uri: format!("{id}.png"),
            });
            let brush = graph.add(CompositionObject::SurfaceBrush { surface });
            children.push(sprite(&mut graph, Some(brush)));
        }
        let root = graph.add(CompositionObject::ContainerVisual {
            properties: VisualProperties::default(),
            children,
            animators: vec![],
        });
        graph.set_root(root);
        graph.validate().unwrap();

        assert_eq!(
            graph.referenced_assets().unwrap(),
            vec![AssetId::new("image_0"), AssetId::new("image_1")]
        );
    }

    #[test]
    fn test_json_round_trip_validates() {
        let mut graph = CompositionGraph::new();
        let root = sprite(&mut graph, None);
        graph.set_root(root);
        graph
            .add_binding(PropertyBinding::scalar("Progress", 0.0).unwrap())
            .unwrap();

        let json = graph.to_json().unwrap();
        let loaded = CompositionGraph::from_json(&json).unwrap();
        assert_eq!(loaded, graph);
        assert!(loaded.uses_theme_properties().unwrap());
    }
}
