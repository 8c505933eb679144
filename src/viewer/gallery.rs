//! Texture cache for the review grid.
//!
//! Thumbnails are decoded and uploaded lazily, once, the first frame
//! their cell scrolls into existence; failures are remembered so a broken
//! file is not re-decoded every frame.

use eframe::egui;
use image::DynamicImage;
use tracing::warn;

use photograde::batch::{ImageBatch, thumbnail};

/// Longest side of a grid thumbnail texture.
const THUMB_PX: u32 = 512;
/// Longest side of the enlarged view texture.
const FULL_PX: u32 = 2048;

enum ThumbSlot {
    Pending,
    Failed,
    Ready(egui::TextureHandle),
}

#[derive(Default)]
pub struct Gallery {
    thumbs: Vec<ThumbSlot>,
    full: Option<(usize, egui::TextureHandle)>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every cached texture and size the cache for a new batch.
    pub fn reset(&mut self, len: usize) {
        self.thumbs = (0..len).map(|_| ThumbSlot::Pending).collect();
        self.full = None;
    }

    /// Thumbnail texture for image `index`, decoding on first use.
    /// Returns None for images whose bytes do not decode.
    pub fn thumb(
        &mut self,
        ctx: &egui::Context,
        batch: &ImageBatch,
        index: usize,
    ) -> Option<egui::TextureHandle> {
        let record = batch.get(index)?;
        if matches!(self.thumbs.get(index)?, ThumbSlot::Pending) {
            self.thumbs[index] = match record.decode() {
                Ok(img) => {
                    let thumb = thumbnail::downscale_to_fit(&img, THUMB_PX);
                    let texture = ctx.load_texture(
                        format!("thumb-{index}"),
                        to_color_image(&thumb),
                        egui::TextureOptions::LINEAR,
                    );
                    ThumbSlot::Ready(texture)
                }
                Err(err) => {
                    warn!(image = index + 1, %err, "thumbnail decode failed");
                    ThumbSlot::Failed
                }
            };
        }
        match self.thumbs.get(index)? {
            ThumbSlot::Ready(texture) => Some(texture.clone()),
            _ => None,
        }
    }

    /// High-resolution texture for the enlarged view. Only one is kept
    /// alive at a time.
    pub fn full(
        &mut self,
        ctx: &egui::Context,
        batch: &ImageBatch,
        index: usize,
    ) -> Option<egui::TextureHandle> {
        if let Some((cached, texture)) = &self.full
            && *cached == index
        {
            return Some(texture.clone());
        }
        let record = batch.get(index)?;
        match record.decode() {
            Ok(img) => {
                let bounded = thumbnail::downscale_to_fit(&img, FULL_PX);
                let texture = ctx.load_texture(
                    format!("full-{index}"),
                    to_color_image(&bounded),
                    egui::TextureOptions::LINEAR,
                );
                self.full = Some((index, texture.clone()));
                Some(texture)
            }
            Err(err) => {
                warn!(image = index + 1, %err, "full-size decode failed");
                None
            }
        }
    }
}

fn to_color_image(img: &DynamicImage) -> egui::ColorImage {
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw())
}
