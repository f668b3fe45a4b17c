//! Shared helpers for writing GeoTIFF fixtures.

use camino::Utf8PathBuf;
use tempfile::{Builder, TempPath};
use tiff::encoder::{TiffEncoder, colortype};
use tiff::tags::Tag;

/// Georeference tags written into a fixture.
#[derive(Debug, Clone, Copy)]
pub enum FixtureGeoref {
    /// Pixel-scale and tie-point tags.
    TiePoint {
        /// `ModelPixelScaleTag` values.
        scale: [f64; 3],
        /// `ModelTiepointTag` values.
        tie: [f64; 6],
    },
    /// `ModelTransformationTag` values.
    Matrix([f64; 16]),
    /// No georeference tags at all.
    Missing,
}

/// A north-up grid whose pixel `(0, 0)` starts at `(lon, lat)`.
pub fn tie_point(lon: f64, lat: f64, scale_x: f64, scale_y: f64) -> FixtureGeoref {
    FixtureGeoref::TiePoint {
        scale: [scale_x, scale_y, 0.0],
        tie: [0.0, 0.0, 0.0, lon, lat, 0.0],
    }
}

/// Pixel values equal to their row-major index.
pub fn indexed_values(width: u32, height: u32) -> Vec<f32> {
    (0..width * height).map(|i| i as f32).collect()
}

/// Write a single-band `f32` GeoTIFF and return its temporary path.
///
/// `rows_per_strip` forces a strip layout so multi-chunk reads are covered.
pub fn write_raster(
    width: u32,
    height: u32,
    values: &[f32],
    georef: FixtureGeoref,
    rows_per_strip: Option<u32>,
) -> (TempPath, Utf8PathBuf) {
    let mut file = Builder::new()
        .prefix("sitewise-raster")
        .suffix(".tif")
        .tempfile()
        .unwrap_or_else(|err| panic!("failed to create raster fixture: {err}"));
    {
        let mut encoder = TiffEncoder::new(file.as_file_mut())
            .unwrap_or_else(|err| panic!("failed to start TIFF encoder: {err}"));
        let mut image = encoder
            .new_image::<colortype::Gray32Float>(width, height)
            .unwrap_or_else(|err| panic!("failed to start TIFF image: {err}"));
        match georef {
            FixtureGeoref::TiePoint { scale, tie } => {
                image
                    .encoder()
                    .write_tag(Tag::ModelPixelScaleTag, &scale[..])
                    .unwrap_or_else(|err| panic!("failed to write pixel scale: {err}"));
                image
                    .encoder()
                    .write_tag(Tag::ModelTiepointTag, &tie[..])
                    .unwrap_or_else(|err| panic!("failed to write tie point: {err}"));
            }
            FixtureGeoref::Matrix(matrix) => {
                image
                    .encoder()
                    .write_tag(Tag::ModelTransformationTag, &matrix[..])
                    .unwrap_or_else(|err| panic!("failed to write transformation: {err}"));
            }
            FixtureGeoref::Missing => {}
        }
        if let Some(rows) = rows_per_strip {
            image
                .rows_per_strip(rows)
                .unwrap_or_else(|err| panic!("failed to set rows per strip: {err}"));
        }
        image
            .write_data(values)
            .unwrap_or_else(|err| panic!("failed to write raster data: {err}"));
    }
    let path = file.into_temp_path();
    let utf8 = Utf8PathBuf::from_path_buf(path.to_path_buf())
        .unwrap_or_else(|raw| panic!("temporary path {raw:?} is not UTF-8"));
    (path, utf8)
}
