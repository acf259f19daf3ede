use std::collections::{BTreeMap, BTreeSet};

use crate::asset::AssetRegistry;
use crate::layer::Layer;
use lottiegen_core::LottieGenError;

/// Validate the layers of one composition for structural correctness.
pub fn validate_layers(layers: &[Layer], assets: &AssetRegistry) -> Result<(), Vec<LottieGenError>> {
    let mut errors = Vec::new();

    let mut by_index = BTreeMap::new();
    for layer in layers {
        let node = layer_node(layer);
        if by_index.insert(layer.index(), layer).is_some() {
            errors.push(LottieGenError::structural(node.clone(), "duplicate layer index"));
        }
        if layer.args.out_frame < layer.args.in_frame {
            errors.push(LottieGenError::structural(
                node.clone(),
                "out frame is before in frame",
            ));
        }
        if let Some(asset_id) = layer.asset_id() {
            if assets.get(asset_id).is_none() {
                errors.push(LottieGenError::structural(
                    node,
                    format!("references missing asset '{}'", asset_id),
                ));
            }
        }
    }

    for layer in layers {
        let Some(parent) = layer.args.parent else {
            continue;
        };
        if !by_index.contains_key(&parent) {
            errors.push(LottieGenError::structural(
                layer_node(layer),
                format!("parent {} does not exist", parent),
            ));
            continue;
        }

        // Walk up the parent chain looking for a loop back to a visited layer.
        let mut seen = BTreeSet::from([layer.index()]);
        let mut current = Some(parent);
        while let Some(index) = current {
            if !seen.insert(index) {
                errors.push(LottieGenError::structural(
                    layer_node(layer),
                    "parent chain contains a cycle",
                ));
                break;
            }
            current = by_index.get(&index).and_then(|l| l.args.parent);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn layer_node(layer: &Layer) -> String {
    format!("layer {} '{}'", layer.index(), layer.args.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{Asset, AssetId};
    use crate::layer::{LayerArgs, LayerContent};

    fn null_layer(index: u32) -> Layer {
        Layer::new(LayerArgs::new(index, format!("null {index}"), 0.0, 60.0), LayerContent::Null)
    }

    #[test]
    fn test_validate_valid_layers() {
        let layers = vec![null_layer(1), null_layer(2).with_parent(1)];
        assert!(validate_layers(&layers, &AssetRegistry::new()).is_ok());
    }

    #[test]
    fn test_validate_duplicate_index() {
        let layers = vec![null_layer(1), null_layer(1)];
        let errors = validate_layers(&layers, &AssetRegistry::new()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("duplicate layer index"));
    }

    #[test]
    fn test_validate_missing_parent() {
        let layers = vec![null_layer(1).with_parent(9)];
        assert!(validate_layers(&layers, &AssetRegistry::new()).is_err());
    }

    #[test]
    fn test_validate_parent_cycle() {
        let layers = vec![null_layer(1).with_parent(2), null_layer(2).with_parent(1)];
        let errors = validate_layers(&layers, &AssetRegistry::new()).unwrap_err();
        assert!(errors.iter().all(|e| e.to_string().contains("cycle")));
    }

    #[test]
    fn test_validate_missing_asset() {
        let image = Layer::new(
            LayerArgs::new(1, "photo", 0.0, 60.0),
            LayerContent::Image {
                asset_id: AssetId::new("image_0"),
            },
        );
        assert!(validate_layers(std::slice::from_ref(&image), &AssetRegistry::new()).is_err());

        let mut assets = AssetRegistry::new();
        assets.register(Asset::new(AssetId::new("image_0"), "img_0.png", 64.0, 64.0));
        assert!(validate_layers(&[image], &assets).is_ok());
    }
}
