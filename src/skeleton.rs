//! Serializable Spine skeleton description.
//!
//! This is the structure written to `<document>.json`. Attachments nest as
//! `skins → slotName → slotName → attachment`; the inner repetition of the
//! slot name is what the consuming importer expects, so it is preserved
//! as-is rather than collapsed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::geometry::Placement;

/// Name of the single bone every slot attaches to.
pub const ROOT_BONE: &str = "root";

/// Name of the skin used when no `skin:` folder has been seen.
pub const DEFAULT_SKIN: &str = "default";

/// A bone in the output skeleton. Only `root` is ever emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
}

/// A named attachment point, always bound to the root bone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    pub bone: String,
    pub attachment: String,
}

/// A positioned image reference inside a skin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub rotation: i32,
    pub width: i32,
    pub height: i32,
}

impl Attachment {
    /// Builds an attachment from a layer name and its Spine placement.
    /// Rotation is always zero.
    pub fn new(name: impl Into<String>, placement: Placement) -> Self {
        Self {
            name: name.into(),
            x: placement.x,
            y: placement.y,
            rotation: 0,
            width: placement.width,
            height: placement.height,
        }
    }
}

/// One skin's attachments: slot name → slot name → attachment.
pub type SkinEntries = BTreeMap<String, BTreeMap<String, Attachment>>;

/// The full skeleton document written to JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    pub bones: Vec<Bone>,
    pub slots: Vec<Slot>,
    pub skins: BTreeMap<String, SkinEntries>,
    pub animations: Map<String, Value>,
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::new()
    }
}

impl Skeleton {
    /// Creates an empty skeleton with the root bone and no animations.
    pub fn new() -> Self {
        Self {
            bones: vec![Bone {
                name: ROOT_BONE.to_string(),
            }],
            slots: Vec::new(),
            skins: BTreeMap::new(),
            animations: Map::new(),
        }
    }

    /// Registers a slot if no slot with that name exists yet.
    ///
    /// The slot's default attachment name is the slot name itself.
    /// Returns true if the slot was added.
    pub fn add_slot(&mut self, name: &str) -> bool {
        if self.slots.iter().any(|slot| slot.name == name) {
            return false;
        }
        self.slots.push(Slot {
            name: name.to_string(),
            bone: ROOT_BONE.to_string(),
            attachment: name.to_string(),
        });
        true
    }

    /// Registers a skin with an empty attachment mapping if unseen.
    /// Returns true if the skin was added.
    pub fn add_skin(&mut self, name: &str) -> bool {
        if self.skins.contains_key(name) {
            return false;
        }
        self.skins.insert(name.to_string(), SkinEntries::new());
        true
    }

    /// Records an attachment under `skin → slot → slot`.
    ///
    /// The skin must already be registered. Re-recording the same slot
    /// replaces the previous attachment.
    pub fn put_attachment(&mut self, skin: &str, slot: &str, attachment: Attachment) {
        let entries = self.skins.entry(skin.to_string()).or_default();
        let mut inner = BTreeMap::new();
        inner.insert(slot.to_string(), attachment);
        entries.insert(slot.to_string(), inner);
    }

    /// Reverses the slots sequence so draw order comes out correct:
    /// the first-encountered (topmost) slot must be drawn last.
    pub fn reverse_draw_order(&mut self) {
        self.slots.reverse();
    }
}
