//! PDF writer for the contact sheet.
//!
//! Thumbnails are embedded as raw RGB XObjects sized through their DPI so
//! the placed rectangle matches the layout's millimeter math exactly.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::DynamicImage;
use printpdf::{
    BuiltinFont, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, IndirectFontRef, Mm,
    PdfDocument, PdfLayerReference, Px,
};
use tracing::warn;

use crate::batch::{ImageBatch, thumbnail};
use crate::error::{Error, Result};
use crate::scores::ScoreSheet;
use crate::sheet::layout::{GridLayout, Rect, fit_rect};
use crate::sheet::SheetOptions;

const TITLE_SIZE: f64 = 12.0;
const NOTE_SIZE: f64 = 8.0;
const CAPTION_SIZE: f64 = 8.0;

/// Render the contact sheet to PDF bytes.
pub fn render_contact_sheet(
    batch: &ImageBatch,
    sheet: Option<&ScoreSheet>,
    opts: &SheetOptions,
) -> Result<Vec<u8>> {
    if batch.is_empty() {
        return Err(Error::EmptyBatch);
    }

    let layout = GridLayout::new(opts.grid.clone());
    let page = layout.page_size();
    let page_count = layout.page_count(batch.len());

    let (doc, first_page, first_layer) =
        PdfDocument::new(opts.title.as_str(), Mm(page.width), Mm(page.height), "grid");

    // Builtin Helvetica only encodes WinAnsi; anything beyond ASCII is
    // substituted unless the caller supplies a TTF.
    let ascii_only = opts.font.is_none();
    let font = load_font(&doc, opts)?;

    let mut layers: Vec<PdfLayerReference> = Vec::with_capacity(page_count);
    layers.push(doc.get_page(first_page).get_layer(first_layer));
    for _ in 1..page_count {
        let (page_idx, layer_idx) = doc.add_page(Mm(page.width), Mm(page.height), "grid");
        layers.push(doc.get_page(page_idx).get_layer(layer_idx));
    }

    for (i, layer) in layers.iter().enumerate() {
        draw_header(layer, &layout, &font, opts, i, page_count, ascii_only);
    }

    let attached = sheet.map(|s| s.attach(batch));
    for record in batch.iter() {
        let (page_idx, cell) = layout.slot(record.index);
        let layer = &layers[page_idx];

        let eval = attached.as_ref().and_then(|slots| slots[record.index]);
        draw_caption(layer, &layout, &font, &cell, record, eval, ascii_only, page.height);

        let image_box = layout.image_box(&cell);
        match record.decode() {
            Ok(img) => {
                let thumb = thumbnail::downscale_to_fit(&img, opts.max_thumb_px);
                place_image(layer, &thumb, &image_box, page.height);
            }
            Err(err) => {
                warn!(
                    image = record.index + 1,
                    %err,
                    "image failed to decode; cell keeps its caption only"
                );
                layer.use_text(
                    "[unreadable image]",
                    CAPTION_SIZE,
                    Mm(image_box.x + 2.0),
                    Mm(page.height - (image_box.y + image_box.height / 2.0)),
                    &font,
                );
            }
        }
    }

    doc.save_to_bytes().map_err(|e| Error::pdf(e.to_string()))
}

/// Render the contact sheet straight to a file.
pub fn render_contact_sheet_file(
    path: &Path,
    batch: &ImageBatch,
    sheet: Option<&ScoreSheet>,
    opts: &SheetOptions,
) -> Result<()> {
    let bytes = render_contact_sheet(batch, sheet, opts)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    Ok(())
}

fn load_font(doc: &printpdf::PdfDocumentReference, opts: &SheetOptions) -> Result<IndirectFontRef> {
    match &opts.font {
        Some(path) => doc
            .add_external_font(File::open(path)?)
            .map_err(|e| Error::pdf(e.to_string())),
        None => doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| Error::pdf(e.to_string())),
    }
}

fn draw_header(
    layer: &PdfLayerReference,
    layout: &GridLayout,
    font: &IndirectFontRef,
    opts: &SheetOptions,
    page_index: usize,
    page_count: usize,
    ascii_only: bool,
) {
    let page = layout.page_size();
    let header = layout.header_rect();

    let title = encode_caption(&opts.title, ascii_only);
    layer.use_text(
        title,
        TITLE_SIZE,
        Mm(header.x),
        Mm(page.height - (header.y + 5.0)),
        font,
    );

    let marker = format!("page {}/{}", page_index + 1, page_count);
    layer.use_text(
        marker,
        NOTE_SIZE,
        Mm(header.x + header.width - 22.0),
        Mm(page.height - (header.y + 5.0)),
        font,
    );

    if page_index == 0
        && let Some(notes) = &opts.notes
    {
        let notes = encode_caption(notes, ascii_only);
        layer.use_text(
            notes,
            NOTE_SIZE,
            Mm(header.x),
            Mm(page.height - (header.y + 10.5)),
            font,
        );
    }
}

fn draw_caption(
    layer: &PdfLayerReference,
    layout: &GridLayout,
    font: &IndirectFontRef,
    cell: &Rect,
    record: &crate::batch::ImageRecord,
    eval: Option<&crate::scores::Evaluation>,
    ascii_only: bool,
    page_height: f64,
) {
    let (line1_y, line2_y) = layout.caption_baselines(cell);

    let mut name = record.sequence_name();
    if let Some(original) = &record.file_name
        && *original != name
    {
        name = format!("{name}  ({original})");
    }
    layer.use_text(
        encode_caption(&name, ascii_only),
        CAPTION_SIZE,
        Mm(cell.x),
        Mm(page_height - line1_y),
        font,
    );

    if let Some(eval) = eval {
        layer.use_text(
            encode_caption(&eval.score_line(), ascii_only),
            CAPTION_SIZE,
            Mm(cell.x),
            Mm(page_height - line2_y),
            font,
        );
    }
}

fn place_image(layer: &PdfLayerReference, img: &DynamicImage, bounds: &Rect, page_height: f64) {
    let rgb = img.to_rgb8();
    let (px_w, px_h) = rgb.dimensions();
    let target = fit_rect(bounds, px_w, px_h);
    if target.width <= 0.0 || target.height <= 0.0 {
        return;
    }

    // The XObject's physical size is pixels / dpi; solving for dpi makes
    // the placed image exactly `target.width` millimeters wide.
    let dpi = px_w as f64 * 25.4 / target.width;

    let xobject = ImageXObject {
        width: Px(px_w as usize),
        height: Px(px_h as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: rgb.into_raw(),
        image_filter: None,
        clipping_bbox: None,
    };
    Image::from(xobject).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(target.x)),
            translate_y: Some(Mm(page_height - (target.y + target.height))),
            rotate: None,
            scale_x: None,
            scale_y: None,
            dpi: Some(dpi),
        },
    );
}

/// Builtin fonts cannot encode past WinAnsi; reduce to ASCII with `?`
/// placeholders when no external font was supplied.
fn encode_caption(text: &str, ascii_only: bool) -> String {
    if !ascii_only {
        return text.to_string();
    }
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_control() { c } else { '?' })
        .collect()
}
