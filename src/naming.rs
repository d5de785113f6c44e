//! Layer-name classifier.
//!
//! Structure is conveyed through a naming convention embedded in layer
//! names: a folder named `slot:<name>` declares a Spine slot, a folder
//! named `skin:<name>` declares a skin, and any layer whose name ends in
//! `.png` is exported as an image attachment. These predicates are pure
//! functions over a layer's name and folder-ness.

use crate::document::Layer;

/// Prefix marking a folder as a slot declaration.
pub const SLOT_PREFIX: &str = "slot:";

/// Prefix marking a folder as a skin declaration.
pub const SKIN_PREFIX: &str = "skin:";

/// Suffix marking a layer for image export.
pub const IMAGE_SUFFIX: &str = ".png";

/// Returns true if the layer is a folder declaring a slot.
pub fn is_slot_folder(layer: &Layer) -> bool {
    layer.is_folder() && layer.name.starts_with(SLOT_PREFIX)
}

/// Returns true if the layer is a folder declaring a skin.
pub fn is_skin_folder(layer: &Layer) -> bool {
    layer.is_folder() && layer.name.starts_with(SKIN_PREFIX)
}

/// Returns true if the layer is marked for image export.
///
/// Checked on the name suffix alone, independent of folder-ness or any
/// slot/skin classification.
pub fn is_image_layer(layer: &Layer) -> bool {
    layer.name.ends_with(IMAGE_SUFFIX)
}

/// Returns the layer's name with any `slot:`/`skin:` prefix stripped.
///
/// A space is conventionally authored after the prefix (`slot: body`), so
/// leading whitespace after the prefix is trimmed as well. Names without a
/// prefix come back unchanged.
pub fn display_name(layer: &Layer) -> &str {
    for prefix in [SLOT_PREFIX, SKIN_PREFIX] {
        if let Some(rest) = layer.name.strip_prefix(prefix) {
            return rest.trim_start();
        }
    }
    &layer.name
}
