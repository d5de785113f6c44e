//! Coordinate conversion from document space to Spine space.
//!
//! The document uses top-left-origin pixel coordinates growing downward;
//! Spine uses a bottom-up y axis centered horizontally on the skeleton
//! origin. Extents are taken from the original box, so the shift
//! translates position only.

use crate::document::{BoundingBox, Layer, LayerContent};

/// An attachment placement in Spine coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Returns the box a layer exports with.
///
/// Folders use the union of their direct children's bounds; a folder with
/// no children yields the zero-sized box. Leaves use their own bounds.
pub fn export_bounds(layer: &Layer) -> BoundingBox {
    match &layer.content {
        LayerContent::Folder { children } => children
            .iter()
            .map(|child| child.bounds)
            .reduce(|acc, bbox| acc.union(&bbox))
            .unwrap_or(BoundingBox::EMPTY),
        LayerContent::Leaf { .. } => layer.bounds,
    }
}

/// Converts a document-space box to a Spine-space placement.
///
/// The position is the box's center-shifted top-left corner, re-centered
/// on the document's horizontal midpoint and flipped onto Spine's
/// bottom-up y axis:
///
/// ```text
/// x = x1 + floor(w/2) - floor(W/2)
/// y = H - (y1 + floor(h/2))
/// ```
pub fn to_spine(bounds: BoundingBox, doc_width: u32, doc_height: u32) -> Placement {
    let width = bounds.width();
    let height = bounds.height();

    Placement {
        x: bounds.x1 + width.div_euclid(2) - (doc_width as i32) / 2,
        y: doc_height as i32 - (bounds.y1 + height.div_euclid(2)),
        width,
        height,
    }
}
