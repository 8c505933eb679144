//! Integration tests for contact-sheet rendering.
//!
//! Layout math is asserted precisely; the PDF bytes themselves get a
//! structural smoke test (magic header, non-trivial size) since byte-exact
//! PDF comparison is version-fragile.

use std::io::Cursor;

use photograde::batch::ImageBatch;
use photograde::scores::parse_scores;
use photograde::sheet::{GridLayout, GridOptions, SheetOptions, render_contact_sheet};

fn png_bytes(shade: u8) -> Vec<u8> {
    let mut img = image::RgbaImage::new(8, 6);
    for pixel in img.pixels_mut() {
        *pixel = image::Rgba([shade, 0, 0, 255]);
    }
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn test_batch(n: usize) -> ImageBatch {
    let mut batch = ImageBatch::new();
    for i in 0..n {
        batch.push_bytes(None, png_bytes(i as u8));
    }
    batch
}

// ============================================================================
// Grid layout
// ============================================================================

#[test]
fn test_every_image_is_assigned_a_cell_in_order() {
    let layout = GridLayout::new(GridOptions::default());
    let count = 11;
    let pages = layout.page_count(count);
    assert_eq!(pages, 2);

    let mut last_page = 0;
    for i in 0..count {
        let (page, cell) = layout.slot(i);
        assert!(page < pages, "image {} placed past the last page", i);
        assert!(page >= last_page, "pages must fill in order");
        last_page = page;
        assert!(cell.width > 0.0 && cell.height > 0.0);
    }
}

#[test]
fn test_cells_on_a_page_do_not_overlap() {
    let layout = GridLayout::new(GridOptions::default());
    let per_page = layout.per_page();
    let cells: Vec<_> = (0..per_page).map(|i| layout.slot(i).1).collect();

    for (a, ca) in cells.iter().enumerate() {
        for (b, cb) in cells.iter().enumerate() {
            if a == b {
                continue;
            }
            let separated = ca.x + ca.width <= cb.x + 1e-9
                || cb.x + cb.width <= ca.x + 1e-9
                || ca.y + ca.height <= cb.y + 1e-9
                || cb.y + cb.height <= ca.y + 1e-9;
            assert!(separated, "cells {} and {} overlap", a, b);
        }
    }
}

#[test]
fn test_image_box_leaves_room_for_captions() {
    let opts = GridOptions::default();
    let caption = opts.caption_height;
    let layout = GridLayout::new(opts);
    let (_, cell) = layout.slot(0);
    let image_box = layout.image_box(&cell);
    assert!((cell.height - image_box.height - caption).abs() < 1e-9);
}

// ============================================================================
// PDF rendering
// ============================================================================

#[test]
fn test_render_produces_a_pdf() {
    let batch = test_batch(3);
    let pdf = render_contact_sheet(&batch, None, &SheetOptions::default()).unwrap();
    assert!(pdf.starts_with(b"%PDF"), "output must carry the PDF magic");
    assert!(pdf.len() > 500, "three thumbnails cannot fit in {} bytes", pdf.len());
}

#[test]
fn test_render_with_scores_and_notes() {
    let batch = test_batch(2);
    let csv = "No,TotalScore,BuzzScore,StillScore,VideoScore,Reason\n1,9,8,7,6,keeper\n";
    let sheet = parse_scores(csv.as_bytes()).unwrap();

    let opts = SheetOptions {
        notes: Some("Score each image from 1-10 on every axis".to_string()),
        ..SheetOptions::default()
    };
    let pdf = render_contact_sheet(&batch, Some(&sheet), &opts).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}

#[test]
fn test_render_spills_onto_multiple_pages() {
    // 9 images at 2x4 per page needs two pages; the render must not
    // error and must be larger than the single-page version.
    let single = render_contact_sheet(&test_batch(1), None, &SheetOptions::default()).unwrap();
    let multi = render_contact_sheet(&test_batch(9), None, &SheetOptions::default()).unwrap();
    assert!(multi.len() > single.len());
}

#[test]
fn test_render_tolerates_undecodable_images() {
    let mut batch = test_batch(1);
    batch.push_bytes(Some("broken.png".to_string()), vec![0xde, 0xad, 0xbe, 0xef]);

    let pdf = render_contact_sheet(&batch, None, &SheetOptions::default()).unwrap();
    assert!(pdf.starts_with(b"%PDF"), "a broken image must not abort the sheet");
}

#[test]
fn test_render_rejects_empty_batch() {
    let batch = ImageBatch::new();
    assert!(render_contact_sheet(&batch, None, &SheetOptions::default()).is_err());
}
