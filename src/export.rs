//! The export pipeline: traversal, accumulation, and file output.
//!
//! [`export`] walks the document's layer tree depth-first in panel order,
//! threading a mutable accumulator through the recursion. `skin:` and
//! `slot:` folders switch the active skin/slot, `.png` layers record an
//! attachment and render their pixels to disk, and the accumulated
//! skeleton is serialized to `<document name>.json` at the end.
//!
//! The active skin and slot are deliberately NOT restored when the
//! traversal leaves a folder: a slot set deep in one branch stays active
//! for later siblings until another folder overrides it. Grouping is
//! traversal-order-dependent, and authored documents rely on that.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::document::{Document, Layer};
use crate::error::{Error, Result};
use crate::geometry;
use crate::naming;
use crate::skeleton::{Attachment, DEFAULT_SKIN, Skeleton};

/// Recursion guard for pathologically nested documents.
pub const MAX_DEPTH: usize = 64;

/// Diagnostics and output locations accumulated over one export run.
///
/// The library never prints; the CLI renders these after the run.
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Path of the skeleton JSON file that was written.
    pub json_path: PathBuf,

    /// Image files written, in traversal order.
    pub images_written: Vec<String>,

    /// Image layers skipped because they had no renderable pixels.
    /// Their attachments are still recorded.
    pub empty_layers: Vec<String>,

    /// Top-level layers that are marked invisible. Reported only; their
    /// subtrees are exported unchanged.
    pub hidden_layers: Vec<String>,

    /// Unique slots registered.
    pub slot_count: usize,

    /// Skins registered, including `default`.
    pub skin_count: usize,

    /// Attachments recorded.
    pub attachment_count: usize,
}

/// Exports a parsed document into `out_dir`.
///
/// Creates the output directory (and parents) if absent, writes one image
/// per exportable layer and one `<document name>.json`, overwriting any
/// previous outputs. Writes are not transactional: images may exist on
/// disk when a later step fails.
pub fn export(document: &Document, out_dir: &Path) -> Result<ExportSummary> {
    fs::create_dir_all(out_dir)?;

    let mut exporter = Exporter::new(document, out_dir);

    // Visibility pre-pass over the top level only. Nested layers are not
    // checked, and nothing is suppressed.
    for layer in &document.layers {
        if !layer.visible {
            exporter.summary.hidden_layers.push(layer.name.clone());
        }
    }

    for layer in &document.layers {
        exporter.visit(layer, 0)?;
    }

    exporter.finish()
}

/// The mutable accumulator threaded through the traversal.
struct Exporter<'a> {
    document: &'a Document,
    out_dir: &'a Path,
    skeleton: Skeleton,
    current_skin: Option<String>,
    current_slot: Option<String>,
    summary: ExportSummary,
}

impl<'a> Exporter<'a> {
    fn new(document: &'a Document, out_dir: &'a Path) -> Self {
        let mut skeleton = Skeleton::new();
        // The default skin exists even when the document declares none.
        skeleton.add_skin(DEFAULT_SKIN);

        Self {
            document,
            out_dir,
            skeleton,
            current_skin: None,
            current_slot: None,
            summary: ExportSummary::default(),
        }
    }

    /// Pre-order visit of one layer: skin check, slot check, image check,
    /// then recursion into children.
    fn visit(&mut self, layer: &Layer, depth: usize) -> Result<()> {
        if depth > MAX_DEPTH {
            return Err(Error::DepthLimit(MAX_DEPTH));
        }

        if naming::is_skin_folder(layer) {
            let name = naming::display_name(layer).to_string();
            self.set_skin(&name);
        }

        if naming::is_slot_folder(layer) {
            let name = naming::display_name(layer).to_string();
            self.skeleton.add_slot(&name);
            self.current_slot = Some(name);
        }

        if naming::is_image_layer(layer) {
            self.export_image_layer(layer)?;
        }

        for child in layer.children() {
            self.visit(child, depth + 1)?;
        }

        Ok(())
    }

    fn set_skin(&mut self, name: &str) {
        self.current_skin = Some(name.to_string());
        self.skeleton.add_skin(name);
    }

    /// Records an attachment for an exportable layer and renders its
    /// pixels to disk.
    fn export_image_layer(&mut self, layer: &Layer) -> Result<()> {
        let bounds = geometry::export_bounds(layer);
        let placement = geometry::to_spine(bounds, self.document.width, self.document.height);

        // A `.png` layer above any `skin:` folder lands in the default
        // skin.
        if self.current_skin.is_none() {
            self.set_skin(DEFAULT_SKIN);
        }
        let skin = self.current_skin.clone().unwrap_or_default();

        let slot = self
            .current_slot
            .clone()
            .ok_or_else(|| Error::NoActiveSlot {
                layer: layer.name.clone(),
            })?;

        self.skeleton
            .put_attachment(&skin, &slot, Attachment::new(&layer.name, placement));
        self.summary.attachment_count += 1;

        // Only the layer's own pixels are rendered; a folder-type image
        // layer contributes geometry but no file.
        match layer.pixels() {
            Some(pixels) => {
                pixels.save(self.out_dir.join(&layer.name))?;
                self.summary.images_written.push(layer.name.clone());
            }
            None => {
                self.summary.empty_layers.push(layer.name.clone());
            }
        }

        Ok(())
    }

    /// Reverses draw order and writes the skeleton JSON.
    fn finish(mut self) -> Result<ExportSummary> {
        self.skeleton.reverse_draw_order();

        let json_path = self.out_dir.join(format!("{}.json", self.document.name));
        let file = File::create(&json_path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.skeleton)?;

        self.summary.json_path = json_path;
        self.summary.slot_count = self.skeleton.slots.len();
        self.summary.skin_count = self.skeleton.skins.len();
        Ok(self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{BoundingBox, Layer};
    use image::RgbaImage;

    fn read_skeleton(path: &Path) -> Skeleton {
        let file = File::open(path).unwrap();
        serde_json::from_reader(file).unwrap()
    }

    fn pixels(width: u32, height: u32) -> Option<RgbaImage> {
        Some(RgbaImage::new(width, height))
    }

    #[test]
    fn single_slot_document_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let document = Document::new(
            "hero",
            100,
            100,
            vec![Layer::folder(
                "skin: default",
                vec![Layer::folder(
                    "slot: body",
                    vec![Layer::leaf(
                        "torso.png",
                        BoundingBox::new(10, 10, 50, 90),
                        pixels(40, 80),
                    )],
                )],
            )],
        );

        let summary = export(&document, dir.path()).unwrap();

        assert!(dir.path().join("torso.png").exists());
        assert_eq!(summary.images_written, ["torso.png"]);
        assert_eq!(summary.slot_count, 1);
        assert_eq!(summary.attachment_count, 1);

        let skeleton = read_skeleton(&summary.json_path);
        assert_eq!(skeleton.bones.len(), 1);
        assert_eq!(skeleton.bones[0].name, "root");
        assert_eq!(skeleton.slots.len(), 1);
        assert_eq!(skeleton.slots[0].name, "body");
        assert_eq!(skeleton.slots[0].bone, "root");
        assert_eq!(skeleton.slots[0].attachment, "body");

        let attachment = &skeleton.skins["default"]["body"]["body"];
        assert_eq!(attachment.name, "torso.png");
        assert_eq!(attachment.x, -20);
        assert_eq!(attachment.y, 50);
        assert_eq!(attachment.rotation, 0);
        assert_eq!(attachment.width, 40);
        assert_eq!(attachment.height, 80);

        assert!(skeleton.animations.is_empty());
    }

    #[test]
    fn slots_are_reversed_for_draw_order() {
        let dir = tempfile::tempdir().unwrap();
        let document = Document::new(
            "doc",
            64,
            64,
            vec![
                Layer::folder(
                    "slot: head",
                    vec![Layer::leaf(
                        "head.png",
                        BoundingBox::new(0, 0, 8, 8),
                        pixels(8, 8),
                    )],
                ),
                Layer::folder(
                    "slot: body",
                    vec![Layer::leaf(
                        "body.png",
                        BoundingBox::new(0, 0, 8, 8),
                        pixels(8, 8),
                    )],
                ),
            ],
        );

        let summary = export(&document, dir.path()).unwrap();
        let skeleton = read_skeleton(&summary.json_path);

        let names: Vec<&str> = skeleton.slots.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["body", "head"]);
    }

    #[test]
    fn default_skin_exists_without_skin_folders() {
        let dir = tempfile::tempdir().unwrap();
        let document = Document::new(
            "doc",
            32,
            32,
            vec![Layer::folder(
                "slot: body",
                vec![Layer::leaf(
                    "torso.png",
                    BoundingBox::new(0, 0, 4, 4),
                    pixels(4, 4),
                )],
            )],
        );

        let summary = export(&document, dir.path()).unwrap();
        let skeleton = read_skeleton(&summary.json_path);

        assert!(skeleton.skins.contains_key("default"));
        assert!(skeleton.skins["default"].contains_key("body"));
    }

    #[test]
    fn default_skin_exists_for_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let document = Document::new("doc", 32, 32, Vec::new());

        let summary = export(&document, dir.path()).unwrap();
        let skeleton = read_skeleton(&summary.json_path);

        assert_eq!(summary.skin_count, 1);
        assert!(skeleton.skins["default"].is_empty());
        assert!(skeleton.slots.is_empty());
    }

    #[test]
    fn skin_and_slot_stay_active_across_siblings() {
        // No push/pop on leaving a folder: the sibling leaf after the
        // skin branch still lands in skin "red", slot "arm".
        let dir = tempfile::tempdir().unwrap();
        let document = Document::new(
            "doc",
            64,
            64,
            vec![
                Layer::folder(
                    "skin: red",
                    vec![Layer::folder(
                        "slot: arm",
                        vec![Layer::leaf(
                            "a.png",
                            BoundingBox::new(0, 0, 4, 4),
                            pixels(4, 4),
                        )],
                    )],
                ),
                Layer::leaf("b.png", BoundingBox::new(8, 8, 12, 12), pixels(4, 4)),
            ],
        );

        let summary = export(&document, dir.path()).unwrap();
        let skeleton = read_skeleton(&summary.json_path);

        // b.png replaced a.png under red/arm/arm.
        assert_eq!(skeleton.skins["red"]["arm"]["arm"].name, "b.png");
        assert_eq!(summary.attachment_count, 2);
    }

    #[test]
    fn empty_leaf_skips_image_but_keeps_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let document = Document::new(
            "doc",
            32,
            32,
            vec![Layer::folder(
                "slot: body",
                vec![Layer::leaf("torso.png", BoundingBox::new(0, 0, 4, 4), None)],
            )],
        );

        let summary = export(&document, dir.path()).unwrap();

        assert!(!dir.path().join("torso.png").exists());
        assert_eq!(summary.empty_layers, ["torso.png"]);
        assert!(summary.images_written.is_empty());

        let skeleton = read_skeleton(&summary.json_path);
        assert_eq!(skeleton.skins["default"]["body"]["body"].name, "torso.png");
    }

    #[test]
    fn folder_image_layer_records_union_geometry_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let document = Document::new(
            "doc",
            100,
            100,
            vec![Layer::folder(
                "slot: body",
                vec![Layer::folder(
                    "torso.png",
                    vec![
                        Layer::leaf("upper", BoundingBox::new(10, 10, 50, 40), pixels(4, 4)),
                        Layer::leaf("lower", BoundingBox::new(10, 40, 50, 90), pixels(4, 4)),
                    ],
                )],
            )],
        );

        let summary = export(&document, dir.path()).unwrap();

        // The folder has no own pixels; geometry comes from the child
        // union (10,10,50,90).
        assert_eq!(summary.empty_layers, ["torso.png"]);
        let skeleton = read_skeleton(&summary.json_path);
        let attachment = &skeleton.skins["default"]["body"]["body"];
        assert_eq!((attachment.x, attachment.y), (-20, 50));
        assert_eq!((attachment.width, attachment.height), (40, 80));
    }

    #[test]
    fn hidden_top_level_layer_is_reported_not_suppressed() {
        let dir = tempfile::tempdir().unwrap();
        let mut folder = Layer::folder(
            "slot: body",
            vec![Layer::leaf(
                "torso.png",
                BoundingBox::new(0, 0, 4, 4),
                pixels(4, 4),
            )],
        );
        folder.visible = false;
        let document = Document::new("doc", 32, 32, vec![folder]);

        let summary = export(&document, dir.path()).unwrap();

        assert_eq!(summary.hidden_layers, ["slot: body"]);
        // The subtree still exported.
        assert!(dir.path().join("torso.png").exists());
        assert_eq!(summary.attachment_count, 1);
    }

    #[test]
    fn image_layer_outside_any_slot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let document = Document::new(
            "doc",
            32,
            32,
            vec![Layer::leaf(
                "stray.png",
                BoundingBox::new(0, 0, 4, 4),
                pixels(4, 4),
            )],
        );

        let err = export(&document, dir.path()).unwrap_err();
        assert!(matches!(err, Error::NoActiveSlot { layer } if layer == "stray.png"));
    }

    #[test]
    fn overly_deep_nesting_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut layer = Layer::leaf("deep.png", BoundingBox::new(0, 0, 4, 4), pixels(4, 4));
        for _ in 0..(MAX_DEPTH + 2) {
            layer = Layer::folder("group", vec![layer]);
        }
        let document = Document::new("doc", 32, 32, vec![layer]);

        let err = export(&document, dir.path()).unwrap_err();
        assert!(matches!(err, Error::DepthLimit(_)));
    }

    #[test]
    fn output_directory_is_created_and_reruns_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("nested").join("out");
        let document = Document::new(
            "doc",
            32,
            32,
            vec![Layer::folder(
                "slot: body",
                vec![Layer::leaf(
                    "torso.png",
                    BoundingBox::new(0, 0, 4, 4),
                    pixels(4, 4),
                )],
            )],
        );

        let first = export(&document, &out_dir).unwrap();
        assert!(first.json_path.exists());

        // Second run overwrites in place, no duplicates.
        let second = export(&document, &out_dir).unwrap();
        assert_eq!(second.images_written, ["torso.png"]);
        let entries = fs::read_dir(&out_dir).unwrap().count();
        assert_eq!(entries, 2); // torso.png + doc.json
    }
}
