//! Page geometry and image placement for roadmap documents.
//!
//! All values are PDF user-space points with the origin at the bottom-left corner.

use serde::Serialize;

/// Fixed layout parameters shared by every roadmap document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    /// Clearance kept on all four sides of a skill image.
    pub image_margin: f32,
    /// Distance from the top edge down to the cover title baseline.
    pub title_drop: f32,
    /// Distance from the top edge down to the cover subtitle baseline.
    pub subtitle_drop: f32,
    pub title_size_pt: f32,
    pub subtitle_size_pt: f32,
}

impl PageGeometry {
    /// ISO A4 portrait (210mm × 297mm).
    pub const A4: PageGeometry = PageGeometry {
        width: 595.27,
        height: 841.89,
        image_margin: 50.0,
        title_drop: 60.0,
        subtitle_drop: 95.0,
        title_size_pt: 20.0,
        subtitle_size_pt: 14.0,
    };

    pub fn title_baseline(&self) -> f32 {
        self.height - self.title_drop
    }

    pub fn subtitle_baseline(&self) -> f32 {
        self.height - self.subtitle_drop
    }

    /// Width of the box an image must fit inside.
    pub fn image_box_width(&self) -> f32 {
        self.width - 2.0 * self.image_margin
    }

    /// Height of the box an image must fit inside.
    pub fn image_box_height(&self) -> f32 {
        self.height - 2.0 * self.image_margin
    }

    /// Left edge for a run of text of `text_width` centered horizontally.
    pub fn centered_x(&self, text_width: f32) -> f32 {
        (self.width - text_width) / 2.0
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry::A4
    }
}

/// Where a scaled image lands on its page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImagePlacement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ImagePlacement {
    /// Scales a `pixel_width` × `pixel_height` image uniformly so it fits the
    /// page minus its margin, then centers it on both axes.
    ///
    /// Callers must pass non-zero dimensions.
    pub fn fit(pixel_width: u32, pixel_height: u32, page: &PageGeometry) -> Self {
        let iw = pixel_width as f32;
        let ih = pixel_height as f32;
        let scale = (page.image_box_width() / iw).min(page.image_box_height() / ih);
        let width = iw * scale;
        let height = ih * scale;
        ImagePlacement {
            x: (page.width - width) / 2.0,
            y: (page.height - height) / 2.0,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-2;

    #[test]
    fn test_a4_baselines() {
        let page = PageGeometry::A4;
        assert!((page.title_baseline() - 781.89).abs() < TOL);
        assert!((page.subtitle_baseline() - 746.89).abs() < TOL);
    }

    #[test]
    fn test_fit_preserves_aspect_ratio() {
        let page = PageGeometry::A4;
        for (iw, ih) in [(1200, 800), (300, 2000), (64, 64), (4000, 10)] {
            let p = ImagePlacement::fit(iw, ih, &page);
            let expected = iw as f32 / ih as f32;
            let actual = p.width / p.height;
            assert!(
                (actual - expected).abs() / expected < 1e-4,
                "{iw}x{ih}: ratio {actual} vs {expected}"
            );
        }
    }

    #[test]
    fn test_fit_stays_inside_margins() {
        let page = PageGeometry::A4;
        for (iw, ih) in [(1200, 800), (300, 2000), (10, 10), (5000, 5000)] {
            let p = ImagePlacement::fit(iw, ih, &page);
            assert!(p.width <= page.image_box_width() + TOL);
            assert!(p.height <= page.image_box_height() + TOL);
            // At least one axis touches the margin box exactly.
            let touches_w = (p.width - page.image_box_width()).abs() < TOL;
            let touches_h = (p.height - page.image_box_height()).abs() < TOL;
            assert!(touches_w || touches_h, "{iw}x{ih} neither axis fills the box");
        }
    }

    #[test]
    fn test_fit_centers_on_both_axes() {
        let page = PageGeometry::A4;
        let p = ImagePlacement::fit(1600, 900, &page);
        let left = p.x;
        let right = page.width - (p.x + p.width);
        let bottom = p.y;
        let top = page.height - (p.y + p.height);
        assert!((left - right).abs() < TOL, "left {left} right {right}");
        assert!((top - bottom).abs() < TOL, "top {top} bottom {bottom}");
    }

    #[test]
    fn test_wide_image_is_width_bound() {
        let page = PageGeometry::A4;
        let p = ImagePlacement::fit(2000, 500, &page);
        assert!((p.width - 495.27).abs() < TOL);
        assert!((p.x - 50.0).abs() < TOL);
    }

    #[test]
    fn test_tall_image_is_height_bound() {
        let page = PageGeometry::A4;
        let p = ImagePlacement::fit(500, 2000, &page);
        assert!((p.height - 741.89).abs() < TOL);
        assert!((p.y - 50.0).abs() < TOL);
    }

    #[test]
    fn test_centered_x() {
        let page = PageGeometry::A4;
        assert!((page.centered_x(95.27) - 250.0).abs() < TOL);
    }
}
