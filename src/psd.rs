//! PSD parsing adapter.
//!
//! Turns a `.psd` file into the crate's [`Document`] tree. The `psd`
//! crate exposes a flat layer list plus a table of group records; PSD
//! stores layer records bottom-to-top, so the list is walked in reverse
//! to recover the top-down order of the layers panel. Each group node is
//! materialized at the position of its first descendant, which preserves
//! relative ordering for every group that actually contains layers.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use image::RgbaImage;
use ::psd::Psd;

use crate::document::{BoundingBox, Document, Layer, LayerContent};
use crate::error::{Error, Result};

/// Loads and parses a PSD file into a [`Document`].
///
/// A missing file is [`Error::InputNotFound`]; unparseable content is
/// [`Error::Document`].
pub fn load(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path)?;
    let psd = Psd::from_bytes(&bytes).map_err(|e| Error::Document(e.to_string()))?;

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "skeleton".to_string());

    Ok(Document::new(
        name,
        psd.width(),
        psd.height(),
        build_tree(&psd),
    ))
}

/// A child entry under one parent group: either a nested group or an
/// index into the flat layer list.
enum Node {
    Group(u32),
    Image(usize),
}

/// Rebuilds the nested layer tree from the flat record list.
fn build_tree(psd: &Psd) -> Vec<Layer> {
    let mut children: HashMap<Option<u32>, Vec<Node>> = HashMap::new();
    let mut seen_groups: HashSet<u32> = HashSet::new();

    // Reverse iteration: last record in the file is the top layer in the
    // panel.
    for (index, layer) in psd.layers().iter().enumerate().rev() {
        let parent = layer.parent_id();
        if let Some(group_id) = parent {
            register_group(group_id, psd, &mut children, &mut seen_groups);
        }
        children.entry(parent).or_default().push(Node::Image(index));
    }

    build_layers(None, psd, &children)
}

/// Appends a group node under its parent the first time a descendant of
/// it is encountered, registering ancestor groups first.
fn register_group(
    group_id: u32,
    psd: &Psd,
    children: &mut HashMap<Option<u32>, Vec<Node>>,
    seen_groups: &mut HashSet<u32>,
) {
    if !seen_groups.insert(group_id) {
        return;
    }

    let parent = psd
        .groups()
        .get(&group_id)
        .and_then(|group| group.parent_id());
    if let Some(parent_id) = parent {
        register_group(parent_id, psd, children, seen_groups);
    }
    children.entry(parent).or_default().push(Node::Group(group_id));
}

fn build_layers(
    parent: Option<u32>,
    psd: &Psd,
    children: &HashMap<Option<u32>, Vec<Node>>,
) -> Vec<Layer> {
    let Some(nodes) = children.get(&parent) else {
        return Vec::new();
    };

    nodes
        .iter()
        .filter_map(|node| match node {
            Node::Group(group_id) => {
                // A divider referencing an unknown group id is dropped
                // rather than panicking on a corrupt file.
                let group = psd.groups().get(group_id)?;
                Some(Layer {
                    name: group.name().to_string(),
                    visible: group.visible(),
                    bounds: BoundingBox::EMPTY,
                    content: LayerContent::Folder {
                        children: build_layers(Some(*group_id), psd, children),
                    },
                })
            }
            Node::Image(index) => {
                let layer = &psd.layers()[*index];
                let bounds = BoundingBox::new(
                    layer.layer_left(),
                    layer.layer_top(),
                    layer.layer_right(),
                    layer.layer_bottom(),
                );
                let pixels = crop_rgba(&layer.rgba(), psd.width(), psd.height(), bounds);
                Some(Layer {
                    name: layer.name().to_string(),
                    visible: layer.visible(),
                    bounds,
                    content: LayerContent::Leaf { pixels },
                })
            }
        })
        .collect()
}

/// Crops a full-canvas RGBA buffer down to a layer's bounds.
///
/// The bounds are clamped to the canvas; a crop with no area yields
/// `None`, which the exporter reports as an empty layer.
fn crop_rgba(canvas: &[u8], width: u32, height: u32, bounds: BoundingBox) -> Option<RgbaImage> {
    let x1 = bounds.x1.clamp(0, width as i32) as u32;
    let y1 = bounds.y1.clamp(0, height as i32) as u32;
    let x2 = bounds.x2.clamp(0, width as i32) as u32;
    let y2 = bounds.y2.clamp(0, height as i32) as u32;

    if x2 <= x1 || y2 <= y1 {
        return None;
    }
    if canvas.len() < (width as usize) * (height as usize) * 4 {
        return None;
    }

    let crop_width = x2 - x1;
    let crop_height = y2 - y1;
    let mut out = Vec::with_capacity((crop_width * crop_height * 4) as usize);
    for y in y1..y2 {
        let row_start = ((y * width + x1) * 4) as usize;
        let row_end = ((y * width + x2) * 4) as usize;
        out.extend_from_slice(&canvas[row_start..row_end]);
    }

    RgbaImage::from_raw(crop_width, crop_height, out)
}
