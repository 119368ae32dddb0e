//! Roadmap document builder: turns a role and its skills into a paginated PDF.
//!
//! Layout: one cover page (title + role name), then one full-page image per
//! skill whose asset resolves. Skills without an asset are skipped and consume
//! no page. Any failure while decoding an image or encoding the PDF aborts the
//! whole document; callers never receive a truncated roadmap.
//!
//! The builder is synchronous and CPU-bound. Async callers must run it inside
//! `tokio::task::spawn_blocking`.

use std::collections::HashMap;

use bytes::Bytes;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use thiserror::Error;
use tracing::debug;

use crate::render::font_metrics::{encode_win_ansi, StandardFont};
use crate::render::geometry::{ImagePlacement, PageGeometry};
use crate::render::raster::{prepare_image, EmbeddedImage, RasterError};

/// Cover page heading shown above the role name.
pub const COVER_TITLE: &str = "Roadmap by Carvia";

const PDF_VERSION: &str = "1.5";
const IMAGE_RESOURCE: &str = "Im1";

// ────────────────────────────────────────────────────────────────────────────
// Public types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum DocumentGenerationError {
    #[error("image for skill '{skill}' could not be used: {source}")]
    Image {
        skill: String,
        #[source]
        source: RasterError,
    },

    #[error("PDF encoding failed: {0}")]
    Encode(String),
}

/// Lookup from skill name to the raw bytes of its roadmap image.
///
/// `None` means the skill has no usable asset and its page is skipped.
pub trait AssetResolver {
    fn resolve(&self, skill: &str) -> Option<Bytes>;
}

impl AssetResolver for HashMap<String, Bytes> {
    fn resolve(&self, skill: &str) -> Option<Bytes> {
        self.get(skill).cloned()
    }
}

/// A finished roadmap PDF.
#[derive(Debug, Clone)]
pub struct RoadmapDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Builds the roadmap PDF for `role` on A4 pages.
///
/// Page count is always `1 + number of skills whose asset resolves`, in the
/// order the skills are given.
pub fn generate_roadmap_document(
    role: &str,
    skills: &[String],
    resolver: &dyn AssetResolver,
) -> Result<RoadmapDocument, DocumentGenerationError> {
    let mut writer = RoadmapWriter::new(PageGeometry::A4);
    writer.add_cover_page(role)?;

    for skill in skills {
        let Some(bytes) = resolver.resolve(skill) else {
            debug!(skill = %skill, "No asset for skill, skipping page");
            continue;
        };
        let image = prepare_image(&bytes).map_err(|source| DocumentGenerationError::Image {
            skill: skill.clone(),
            source,
        })?;
        writer.add_image_page(&image)?;
    }

    writer.finish()
}

// ────────────────────────────────────────────────────────────────────────────
// PDF assembly
// ────────────────────────────────────────────────────────────────────────────

/// Accumulates pages into an in-memory `lopdf::Document`.
struct RoadmapWriter {
    doc: Document,
    geometry: PageGeometry,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
}

impl RoadmapWriter {
    fn new(geometry: PageGeometry) -> Self {
        let mut doc = Document::with_version(PDF_VERSION);
        let pages_id = doc.new_object_id();
        RoadmapWriter {
            doc,
            geometry,
            pages_id,
            page_ids: Vec::new(),
        }
    }

    fn add_cover_page(&mut self, role: &str) -> Result<(), DocumentGenerationError> {
        let g = self.geometry;
        let mut operations = Vec::new();
        push_centered_text(
            &mut operations,
            &g,
            StandardFont::HelveticaBold,
            g.title_size_pt,
            g.title_baseline(),
            COVER_TITLE,
        );
        push_centered_text(
            &mut operations,
            &g,
            StandardFont::Helvetica,
            g.subtitle_size_pt,
            g.subtitle_baseline(),
            role,
        );

        let mut fonts = Dictionary::new();
        for font in [StandardFont::Helvetica, StandardFont::HelveticaBold] {
            let font_id = self.doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), font_id);
        }

        self.push_page(operations, dictionary! { "Font" => fonts })
    }

    fn add_image_page(&mut self, image: &EmbeddedImage) -> Result<(), DocumentGenerationError> {
        let placement = ImagePlacement::fit(image.width, image.height, &self.geometry);

        let xobject = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width as i64,
                "Height" => image.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            image.jpeg.clone(),
        );
        let image_id = self.doc.add_object(xobject);

        let operations = vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    placement.width.into(),
                    0.into(),
                    0.into(),
                    placement.height.into(),
                    placement.x.into(),
                    placement.y.into(),
                ],
            ),
            Operation::new("Do", vec![IMAGE_RESOURCE.into()]),
            Operation::new("Q", vec![]),
        ];

        self.push_page(
            operations,
            dictionary! { "XObject" => dictionary! { IMAGE_RESOURCE => image_id } },
        )
    }

    fn push_page(
        &mut self,
        operations: Vec<Operation>,
        resources: Dictionary,
    ) -> Result<(), DocumentGenerationError> {
        let content = Content { operations }
            .encode()
            .map_err(|e| DocumentGenerationError::Encode(e.to_string()))?;
        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), content));
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Resources" => resources,
            "Contents" => content_id,
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    fn finish(mut self) -> Result<RoadmapDocument, DocumentGenerationError> {
        let page_count = self.page_ids.len();
        let kids: Vec<Object> = self.page_ids.iter().map(|id| (*id).into()).collect();
        let media_box: Vec<Object> = vec![
            0.into(),
            0.into(),
            self.geometry.width.into(),
            self.geometry.height.into(),
        ];

        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count as i64,
                "MediaBox" => media_box,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        self.doc
            .save_to(&mut bytes)
            .map_err(|e| DocumentGenerationError::Encode(e.to_string()))?;

        Ok(RoadmapDocument { bytes, page_count })
    }
}

/// Appends a text block drawing `text` centered horizontally on `baseline`.
fn push_centered_text(
    operations: &mut Vec<Operation>,
    geometry: &PageGeometry,
    font: StandardFont,
    size_pt: f32,
    baseline: f32,
    text: &str,
) {
    let x = geometry.centered_x(font.measure(text, size_pt));
    operations.extend([
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.resource_name().into(), size_pt.into()]),
        Operation::new("Td", vec![x.into(), baseline.into()]),
        Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(text))]),
        Operation::new("ET", vec![]),
    ]);
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
