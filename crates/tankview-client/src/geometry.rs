//! Level-to-geometry mapping.
//!
//! Converts a measured tank level into the pixel bounding box of the
//! water-fill shape, scaled against the empty-tank outline captured at
//! startup.  Pure and stateless: identical inputs always yield identical
//! outputs.
//!
//! # Example
//!
//! ```rust
//! use tankview_client::geometry::map_fill;
//! use tankview_types::ReferenceGeometry;
//!
//! let reference = ReferenceGeometry { tank_pixel_height: 100.0, tank_pixel_y: 50.0 };
//! let fill = map_fill(&reference, 50.0, 100.0).unwrap();
//! assert_eq!(fill.fill_pixel_height, 50.0);
//! assert_eq!(fill.fill_pixel_y, 100.0);
//! ```

use tankview_types::{FillGeometry, ReferenceGeometry, TankError};

/// Map a measured `level` (mm) against the tank `height` (mm) onto the
/// diagram's pixel coordinates.
///
/// SVG y grows downward, so the fill rect's `y` moves up from the outline's
/// bottom edge as the level rises.
///
/// Levels outside `[0, height]` are passed through unclamped; the fill
/// shape may then render outside the tank outline.
///
/// # Errors
///
/// Returns [`TankError::InvalidGeometry`] when `height` is zero, since the
/// level-to-pixel scale is undefined.
pub fn map_fill(
    reference: &ReferenceGeometry,
    level: f32,
    height: f32,
) -> Result<FillGeometry, TankError> {
    if height == 0.0 {
        return Err(TankError::InvalidGeometry(
            "tank height is zero, level scale is undefined".to_string(),
        ));
    }

    let scale = reference.tank_pixel_height / height;
    let fill_pixel_height = scale * level;
    let fill_pixel_y = reference.tank_pixel_y - (fill_pixel_height - reference.tank_pixel_height);

    Ok(FillGeometry {
        fill_pixel_height,
        fill_pixel_y,
    })
}
