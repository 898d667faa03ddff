//! Slide ingestion: classify uploaded files, rasterize documents into page
//! images, wrap plain images as one-page slides.

use std::io::Cursor;

use image::ImageFormat;
use pdfium_render::prelude::*;
use thiserror::Error;

/// Files whose content starts with this marker are treated as documents and
/// sent through the rasterizer; everything else must decode as an image.
const DOCUMENT_MAGIC: &[u8] = b"%PDF";

/// Width in pixels that document pages are rendered at.
const RENDER_TARGET_WIDTH: i32 = 1600;

/// A single uploaded unit of course material, possibly multi-page.
/// Immutable once created; removal is the only change a slide list sees.
#[derive(Debug, Clone)]
pub struct Slide {
    pub id: String,
    pub title: String,
    pub kind: SlideKind,
    /// One encoded raster image per page.
    pub pages: Vec<Vec<u8>>,
    pub page_count: usize,
    /// Position among the course's slides, strictly increasing across
    /// uploads and never reused.
    pub order: usize,
    /// Extracted (documents) or derived (images) text used to build prompts.
    pub content: String,
    pub original_filename: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideKind {
    Document,
    Image,
}

/// Raw upload as received from the front-end.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Outcome of one batch: accepted slides plus per-file warnings for the
/// files that were skipped. A bad file never aborts the batch.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub accepted: Vec<Slide>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Error)]
pub enum SlideError {
    #[error("failed to render document: {0}")]
    Render(String),
    #[error("failed to encode page image: {0}")]
    Encode(#[from] image::ImageError),
}

impl From<PdfiumError> for SlideError {
    fn from(err: PdfiumError) -> Self {
        SlideError::Render(format!("{:?}", err))
    }
}

/// Pages plus extracted text for one rendered document.
pub struct RenderedDocument {
    pub pages: Vec<Vec<u8>>,
    pub text: String,
}

/// Seam to the external rasterization/text-extraction library, so the
/// ingestion policy can be exercised without a native pdfium build.
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, bytes: &[u8]) -> Result<RenderedDocument, SlideError>;
}

/// Production renderer backed by the pdfium library.
pub struct PdfiumRenderer;

impl DocumentRenderer for PdfiumRenderer {
    fn render(&self, bytes: &[u8]) -> Result<RenderedDocument, SlideError> {
        let pdfium = Pdfium::new(
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library())?,
        );
        let document = pdfium.load_pdf_from_byte_slice(bytes, None)?;
        let config = PdfRenderConfig::new().set_target_width(RENDER_TARGET_WIDTH);

        let mut pages = Vec::new();
        let mut text = String::new();
        for page in document.pages().iter() {
            let rendered = page.render_with_config(&config)?.as_image();
            let mut png = Vec::new();
            rendered.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
            pages.push(png);

            text.push_str(&page.text()?.all());
            text.push_str("\n\n");
        }
        Ok(RenderedDocument { pages, text })
    }
}

fn is_document(bytes: &[u8]) -> bool {
    bytes.starts_with(DOCUMENT_MAGIC)
}

fn is_image(bytes: &[u8]) -> bool {
    image::load_from_memory(bytes).is_ok()
}

pub struct SlideIngestor {
    renderer: Box<dyn DocumentRenderer>,
}

impl SlideIngestor {
    pub fn new(renderer: Box<dyn DocumentRenderer>) -> Self {
        Self { renderer }
    }

    /// Classify and convert a batch of uploads, one file at a time.
    ///
    /// Each accepted slide is numbered `existing_count + accepted_so_far`, so
    /// order values keep increasing across repeated uploads without touching
    /// slides that are already stored.
    pub fn ingest_batch(&self, files: Vec<UploadedFile>, existing_count: usize) -> IngestReport {
        let mut report = IngestReport::default();
        for file in files {
            let order = existing_count + report.accepted.len();
            if is_document(&file.bytes) {
                match self.renderer.render(&file.bytes) {
                    Ok(doc) if doc.pages.is_empty() => {
                        log::warn!("document {} rendered zero pages, skipping", file.name);
                        report
                            .warnings
                            .push(format!("Could not process document: {}", file.name));
                    }
                    Ok(doc) => report.accepted.push(document_slide(file, doc, order)),
                    Err(err) => {
                        log::warn!("failed to render {}: {}", file.name, err);
                        report
                            .warnings
                            .push(format!("Error processing {}: {}", file.name, err));
                    }
                }
            } else if is_image(&file.bytes) {
                report.accepted.push(image_slide(file, order));
            } else {
                log::warn!("unsupported upload {}, skipping", file.name);
                report
                    .warnings
                    .push(format!("Unsupported file type: {}", file.name));
            }
        }
        report
    }
}

fn document_slide(file: UploadedFile, doc: RenderedDocument, order: usize) -> Slide {
    Slide {
        id: format!("slide_{}", order),
        title: file.name.clone(),
        kind: SlideKind::Document,
        page_count: doc.pages.len(),
        pages: doc.pages,
        order,
        content: doc.text,
        original_filename: file.name,
    }
}

fn image_slide(file: UploadedFile, order: usize) -> Slide {
    Slide {
        id: format!("slide_{}", order),
        title: file.name.clone(),
        kind: SlideKind::Image,
        pages: vec![file.bytes],
        page_count: 1,
        order,
        content: format!("Image: {}", file.name),
        original_filename: file.name,
    }
}

/// Prompt payload for a selection of slides: title plus extracted text per
/// slide, blank-line separated.
pub fn compile_content(slides: &[Slide], indices: &[usize]) -> String {
    indices
        .iter()
        .filter_map(|&i| slides.get(i).map(|s| (i, s)))
        .map(|(i, s)| format!("Slide {}: {}\n{}", i + 1, s.title, s.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Renderer that hands back a fixed result without touching pdfium.
    struct FixedRenderer {
        pages: usize,
        text: &'static str,
        fail: bool,
    }

    impl DocumentRenderer for FixedRenderer {
        fn render(&self, _bytes: &[u8]) -> Result<RenderedDocument, SlideError> {
            if self.fail {
                return Err(SlideError::Render("renderer offline".to_string()));
            }
            Ok(RenderedDocument {
                pages: (0..self.pages).map(|n| vec![n as u8]).collect(),
                text: self.text.to_string(),
            })
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([10, 20, 30, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn upload(name: &str, bytes: Vec<u8>) -> UploadedFile {
        UploadedFile {
            name: name.to_string(),
            bytes,
        }
    }

    fn ingestor(renderer: FixedRenderer) -> SlideIngestor {
        SlideIngestor::new(Box::new(renderer))
    }

    #[test]
    fn image_upload_becomes_one_page_slide() {
        let ing = ingestor(FixedRenderer {
            pages: 0,
            text: "",
            fail: false,
        });
        let report = ing.ingest_batch(vec![upload("diagram.png", png_bytes())], 0);

        assert!(report.warnings.is_empty());
        assert_eq!(report.accepted.len(), 1);
        let slide = &report.accepted[0];
        assert_eq!(slide.kind, SlideKind::Image);
        assert_eq!(slide.page_count, 1);
        assert_eq!(slide.content, "Image: diagram.png");
        assert_eq!(slide.id, "slide_0");
    }

    #[test]
    fn document_upload_keeps_rendered_pages_and_text() {
        let ing = ingestor(FixedRenderer {
            pages: 3,
            text: "lecture notes",
            fail: false,
        });
        let report = ing.ingest_batch(vec![upload("week1.pdf", b"%PDF-1.7 stub".to_vec())], 0);

        assert_eq!(report.accepted.len(), 1);
        let slide = &report.accepted[0];
        assert_eq!(slide.kind, SlideKind::Document);
        assert_eq!(slide.page_count, 3);
        assert_eq!(slide.pages.len(), 3);
        assert_eq!(slide.content, "lecture notes");
    }

    #[test]
    fn zero_page_document_is_rejected_even_with_text() {
        let ing = ingestor(FixedRenderer {
            pages: 0,
            text: "text extraction still worked",
            fail: false,
        });
        let report = ing.ingest_batch(vec![upload("empty.pdf", b"%PDF-1.4".to_vec())], 0);

        assert!(report.accepted.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("empty.pdf"));
    }

    #[test]
    fn unclassifiable_file_is_skipped_and_batch_continues() {
        let ing = ingestor(FixedRenderer {
            pages: 0,
            text: "",
            fail: false,
        });
        let files = vec![
            upload("first.png", png_bytes()),
            upload("junk.bin", vec![0xDE, 0xAD, 0xBE, 0xEF]),
            upload("second.png", png_bytes()),
        ];
        let report = ing.ingest_batch(files, 0);

        assert_eq!(report.accepted.len(), 2);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("junk.bin"));
    }

    #[test]
    fn renderer_failure_is_a_warning_not_an_abort() {
        let ing = ingestor(FixedRenderer {
            pages: 0,
            text: "",
            fail: true,
        });
        let files = vec![
            upload("broken.pdf", b"%PDF garbage".to_vec()),
            upload("fine.png", png_bytes()),
        ];
        let report = ing.ingest_batch(files, 0);

        assert_eq!(report.accepted.len(), 1);
        assert_eq!(report.accepted[0].title, "fine.png");
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn order_keeps_increasing_across_batches() {
        let ing = ingestor(FixedRenderer {
            pages: 0,
            text: "",
            fail: false,
        });
        let first = ing.ingest_batch(
            vec![
                upload("a.png", png_bytes()),
                upload("junk.bin", vec![1, 2, 3]),
                upload("b.png", png_bytes()),
            ],
            0,
        );
        let orders: Vec<usize> = first.accepted.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 1]);

        // second batch numbers itself after what is already stored
        let second = ing.ingest_batch(vec![upload("c.png", png_bytes())], first.accepted.len());
        assert_eq!(second.accepted[0].order, 2);
        assert_eq!(second.accepted[0].id, "slide_2");
    }

    #[test]
    fn compile_content_uses_selected_slides_only() {
        let ing = ingestor(FixedRenderer {
            pages: 0,
            text: "",
            fail: false,
        });
        let report = ing.ingest_batch(
            vec![upload("a.png", png_bytes()), upload("b.png", png_bytes())],
            0,
        );
        let text = compile_content(&report.accepted, &[1]);
        assert!(text.contains("Slide 2: b.png"));
        assert!(!text.contains("a.png"));
    }
}
