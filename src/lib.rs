//! psd2spine: PSD layer export for Spine skeletal animation
//!
//! This crate converts a layered PSD document into a Spine skin package:
//! visible raster layers become standalone PNG files, and a JSON skeleton
//! description (bones, slots, skins, attachments) is written alongside
//! them for import into Spine.
//!
//! Structure comes from a naming convention in the layers panel:
//!
//! - a folder named `slot: <name>` declares a slot,
//! - a folder named `skin: <name>` declares a skin,
//! - any layer whose name ends in `.png` is exported as an attachment.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! let document = psd2spine::load(Path::new("hero.psd"))?;
//! let summary = psd2spine::export(&document, Path::new("out"))?;
//!
//! println!(
//!     "wrote {} images and {}",
//!     summary.images_written.len(),
//!     summary.json_path.display(),
//! );
//! # Ok::<(), psd2spine::Error>(())
//! ```

mod document;
mod error;
mod export;
mod geometry;
mod naming;
mod psd;
mod skeleton;

pub use document::{BoundingBox, Document, Layer, LayerContent};
pub use error::{Error, Result};
pub use export::{ExportSummary, MAX_DEPTH, export};
pub use geometry::{Placement, export_bounds, to_spine};
pub use naming::{
    IMAGE_SUFFIX, SKIN_PREFIX, SLOT_PREFIX, display_name, is_image_layer, is_skin_folder,
    is_slot_folder,
};
pub use self::psd::load;
pub use skeleton::{Attachment, Bone, DEFAULT_SKIN, ROOT_BONE, Skeleton, SkinEntries, Slot};
