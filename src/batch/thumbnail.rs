//! Thumbnail downscaling shared by the contact sheet and the viewer.

use image::{DynamicImage, imageops::FilterType};

/// Downscale so neither side exceeds `max_px`, preserving aspect ratio.
/// Images already within the bound are returned as-is: upscaling only
/// blurs, the layout scales the placement instead.
pub fn downscale_to_fit(img: &DynamicImage, max_px: u32) -> DynamicImage {
    if img.width() <= max_px && img.height() <= max_px {
        return img.clone();
    }
    img.resize(max_px, max_px, FilterType::Lanczos3)
}
