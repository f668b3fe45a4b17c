//! Population density from single-band GeoTIFF rasters.
//!
//! [`GeoTiffRaster`] maps a WGS84 coordinate to a pixel using the file's
//! georeference and decodes only the strip or tile that contains it.
//! [`GeoTiffDensitySource`] wraps a raster path as a
//! [`sitewise_core::DensitySource`], reopening the file for each sample so
//! concurrent requests never share decoder state.
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use sitewise_core::DensitySource;
//! use sitewise_data::raster::GeoTiffDensitySource;
//!
//! let source = GeoTiffDensitySource::new("data/population.tif");
//! let density = source.sample(Coord { x: -122.0841, y: 37.4221 })?;
//! println!("density: {density:?}");
//! # Ok::<(), sitewise_core::DensityError>(())
//! ```

mod dataset;
mod error;
mod georef;

pub use dataset::{GeoTiffDensitySource, GeoTiffRaster};
pub use error::RasterError;
pub use georef::{Georeference, PixelIndex};
