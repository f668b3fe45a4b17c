//! World-to-pixel mapping from GeoTIFF model tags.

use geo::Coord;

/// Position of a pixel inside the raster grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelIndex {
    /// Zero-based column, counted eastwards.
    pub col: u32,
    /// Zero-based row, counted southwards.
    pub row: u32,
}

/// How raster pixels relate to WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Georeference {
    /// North-up grid anchored at a tie point.
    TiePoint {
        /// Longitude of the top-left corner of pixel `(0, 0)`.
        origin_lon: f64,
        /// Latitude of the top-left corner of pixel `(0, 0)`.
        origin_lat: f64,
        /// Degrees of longitude per column.
        pixel_scale_x: f64,
        /// Degrees of latitude per row; positive, rows run south.
        pixel_scale_y: f64,
    },
    /// Row-major 4x4 matrix projecting `(lon, lat, 0, 1)` to pixel space.
    Affine {
        /// Matrix entries.
        matrix: [f64; 16],
    },
}

impl Georeference {
    /// Build a georeference from raw tag values.
    ///
    /// Tie-point plus pixel-scale tags take precedence over a
    /// transformation matrix. Returns `None` when neither is usable.
    pub fn from_tags(
        pixel_scale: Option<&[f64]>,
        tie_points: Option<&[f64]>,
        transformation: Option<&[f64]>,
    ) -> Option<Self> {
        if let (Some([scale_x, scale_y, ..]), Some([i, j, _k, x, y, ..])) = (pixel_scale, tie_points)
        {
            return Some(Self::TiePoint {
                origin_lon: x - i * scale_x,
                origin_lat: y - j * scale_y,
                pixel_scale_x: *scale_x,
                pixel_scale_y: *scale_y,
            });
        }
        transformation
            .and_then(|values| <[f64; 16]>::try_from(values).ok())
            .map(|matrix| Self::Affine { matrix })
    }

    /// Pixel containing `location`, or `None` outside a `width` x `height`
    /// grid.
    ///
    /// Tie-point grids floor fractional positions; affine projections round
    /// to the nearest pixel.
    pub fn pixel_for(&self, location: Coord<f64>, width: u32, height: u32) -> Option<PixelIndex> {
        let (col, row) = match *self {
            Self::TiePoint {
                origin_lon,
                origin_lat,
                pixel_scale_x,
                pixel_scale_y,
            } => (
                ((location.x - origin_lon) / pixel_scale_x).floor(),
                ((location.y - origin_lat) / -pixel_scale_y).floor(),
            ),
            Self::Affine { matrix: m } => {
                let (x, y) = (location.x, location.y);
                let px = m[0] * x + m[1] * y + m[3];
                let py = m[4] * x + m[5] * y + m[7];
                let w = m[12] * x + m[13] * y + m[15];
                ((px / w).round(), (py / w).round())
            }
        };
        Some(PixelIndex {
            col: grid_index(col, width)?,
            row: grid_index(row, height)?,
        })
    }
}

fn grid_index(value: f64, limit: u32) -> Option<u32> {
    if value.is_finite() && value >= 0.0 && value < f64::from(limit) {
        // Range-checked above, so the cast cannot truncate.
        Some(value as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn tie_point() -> Georeference {
        Georeference::from_tags(
            Some(&[0.5, 0.25, 0.0][..]),
            Some(&[0.0, 0.0, 0.0, 10.0, 50.0, 0.0][..]),
            None,
        )
        .expect("tie point georeference")
    }

    #[rstest]
    #[case(Coord { x: 10.0, y: 50.0 }, Some(PixelIndex { col: 0, row: 0 }))]
    #[case(Coord { x: 10.49, y: 49.76 }, Some(PixelIndex { col: 0, row: 0 }))]
    #[case(Coord { x: 11.6, y: 49.2 }, Some(PixelIndex { col: 3, row: 3 }))]
    #[case(Coord { x: 9.99, y: 49.9 }, None)]
    #[case(Coord { x: 10.1, y: 50.01 }, None)]
    #[case(Coord { x: 12.0, y: 49.9 }, None)]
    #[case(Coord { x: 10.1, y: 49.0 }, None)]
    fn tie_point_floors_into_grid(
        tie_point: Georeference,
        #[case] location: Coord<f64>,
        #[case] expected: Option<PixelIndex>,
    ) {
        assert_eq!(tie_point.pixel_for(location, 4, 4), expected);
    }

    #[rstest]
    fn tie_point_origin_shifts_by_raster_offset() {
        let georef = Georeference::from_tags(
            Some(&[1.0, 1.0][..]),
            Some(&[2.0, 3.0, 0.0, 12.0, 40.0, 0.0][..]),
            None,
        );
        assert_eq!(
            georef,
            Some(Georeference::TiePoint {
                origin_lon: 10.0,
                origin_lat: 37.0,
                pixel_scale_x: 1.0,
                pixel_scale_y: 1.0,
            })
        );
    }

    #[rstest]
    fn affine_rounds_to_nearest_pixel() {
        let mut matrix = [0.0; 16];
        matrix[0] = 2.0;
        matrix[3] = -20.0;
        matrix[5] = -2.0;
        matrix[7] = 100.0;
        matrix[15] = 1.0;
        let georef = Georeference::from_tags(None, None, Some(&matrix[..])).expect("affine");
        assert_eq!(
            georef.pixel_for(Coord { x: 11.3, y: 49.2 }, 8, 8),
            Some(PixelIndex { col: 3, row: 2 })
        );
        assert_eq!(georef.pixel_for(Coord { x: 9.0, y: 49.2 }, 8, 8), None);
    }

    #[rstest]
    fn affine_with_zero_w_is_outside() {
        let georef = Georeference::Affine { matrix: [0.0; 16] };
        assert_eq!(georef.pixel_for(Coord { x: 1.0, y: 1.0 }, 8, 8), None);
    }

    #[rstest]
    fn tie_point_takes_precedence_over_matrix() {
        let georef = Georeference::from_tags(
            Some(&[1.0, 1.0, 0.0][..]),
            Some(&[0.0; 6][..]),
            Some(&[0.0; 16][..]),
        );
        assert!(matches!(georef, Some(Georeference::TiePoint { .. })));
    }

    #[rstest]
    #[case(None, None, None)]
    #[case(Some(&[1.0][..]), Some(&[0.0; 6][..]), None)]
    #[case(None, Some(&[0.0; 6][..]), Some(&[0.0; 12][..]))]
    fn incomplete_tags_yield_nothing(
        #[case] scale: Option<&[f64]>,
        #[case] ties: Option<&[f64]>,
        #[case] transform: Option<&[f64]>,
    ) {
        assert_eq!(Georeference::from_tags(scale, ties, transform), None);
    }
}
