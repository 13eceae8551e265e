//! Header/footer masking.

use super::backend::{FormBackend, Rgb};
use crate::error::Result;
use crate::model::Rectangle;

pub const WHITE: Rgb = [1.0, 1.0, 1.0];

/// Paint opaque white bands over the top and bottom of every page.
///
/// Heights that are zero, negative or not finite are ignored.
pub fn apply_masks<B: FormBackend + ?Sized>(
    backend: &mut B,
    header_height: Option<f64>,
    footer_height: Option<f64>,
) -> Result<usize> {
    let header = header_height.filter(|h| h.is_finite() && *h > 0.0);
    let footer = footer_height.filter(|h| h.is_finite() && *h > 0.0);
    if header.is_none() && footer.is_none() {
        return Ok(0);
    }

    let mut painted = 0;
    for page_index in 0..backend.page_count() {
        let page = backend.page_size(page_index)?;
        let right = page.left() + page.width;
        if let Some(height) = header {
            let rect = Rectangle::new(page.left(), page.top() - height, right, page.top());
            backend.fill_rect(page_index, &rect, WHITE)?;
            painted += 1;
        }
        if let Some(height) = footer {
            let rect = Rectangle::new(page.left(), page.bottom(), right, page.bottom() + height);
            backend.fill_rect(page_index, &rect, WHITE)?;
            painted += 1;
        }
    }
    log::debug!("Painted {} mask bands", painted);
    Ok(painted)
}
