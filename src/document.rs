//! Layer-tree data model for a parsed layered document.
//!
//! A [`Document`] exposes the root layer list of a PSD after parsing.
//! Each [`Layer`] is either a folder of child layers or a leaf carrying
//! raster content; the distinction is a tagged variant so callers match
//! on structure instead of probing for children.

use image::RgbaImage;

/// An axis-aligned rectangle in document pixel space, top-left origin.
///
/// Coordinates are `(x1, y1)` top-left and `(x2, y2)` bottom-right,
/// exclusive. Layers partially outside the canvas can have negative
/// coordinates, so everything is signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    /// The zero-sized box at the origin.
    pub const EMPTY: Self = Self {
        x1: 0,
        y1: 0,
        x2: 0,
        y2: 0,
    };

    /// Creates a bounding box from its corner coordinates.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Returns the horizontal extent (x2 - x1).
    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    /// Returns the vertical extent (y2 - y1).
    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Returns true if the box covers no area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Returns the smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }
}

/// The structural content of a layer: a folder of children or a raster leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerContent {
    /// A group layer containing child layers in panel (top-down) order.
    Folder { children: Vec<Layer> },

    /// An image layer. `pixels` is `None` when the layer has no renderable
    /// content (a fully empty layer).
    Leaf { pixels: Option<RgbaImage> },
}

/// A node in the document's layer tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// The layer name as authored in the document. Carries the naming
    /// convention (`slot:`, `skin:`, `.png`) interpreted by the exporter.
    pub name: String,

    /// The visibility flag from the document. Only reported for top-level
    /// layers; it never suppresses export.
    pub visible: bool,

    /// The layer's own bounding box in document pixel space.
    pub bounds: BoundingBox,

    /// Folder or leaf content.
    pub content: LayerContent,
}

impl Layer {
    /// Creates a folder layer with the given children.
    pub fn folder(name: impl Into<String>, children: Vec<Layer>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            bounds: BoundingBox::EMPTY,
            content: LayerContent::Folder { children },
        }
    }

    /// Creates a leaf layer with the given bounds and optional pixels.
    pub fn leaf(name: impl Into<String>, bounds: BoundingBox, pixels: Option<RgbaImage>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            bounds,
            content: LayerContent::Leaf { pixels },
        }
    }

    /// Returns true if this layer is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self.content, LayerContent::Folder { .. })
    }

    /// Returns the child layers, or an empty slice for leaves.
    pub fn children(&self) -> &[Layer] {
        match &self.content {
            LayerContent::Folder { children } => children,
            LayerContent::Leaf { .. } => &[],
        }
    }

    /// Returns the leaf pixel content, if any. Folders have none.
    pub fn pixels(&self) -> Option<&RgbaImage> {
        match &self.content {
            LayerContent::Leaf { pixels } => pixels.as_ref(),
            LayerContent::Folder { .. } => None,
        }
    }
}

/// A parsed layered document: canvas dimensions plus the root layer list.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The source file stem, used to name the output JSON file.
    pub name: String,

    /// Canvas width in pixels.
    pub width: u32,

    /// Canvas height in pixels.
    pub height: u32,

    /// Top-level layers in panel (top-down) order.
    pub layers: Vec<Layer>,
}

impl Document {
    /// Creates a document with the given name, canvas size, and root layers.
    pub fn new(name: impl Into<String>, width: u32, height: u32, layers: Vec<Layer>) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            layers,
        }
    }
}
