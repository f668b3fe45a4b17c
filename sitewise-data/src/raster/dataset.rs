//! GeoTIFF decoding and single-pixel reads.

use std::io::BufReader;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use geo::Coord;
use log::debug;
use sitewise_core::{DensityError, DensitySource};
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;

use super::error::RasterError;
use super::georef::{Georeference, PixelIndex};

type FileDecoder = Decoder<BufReader<fs_utf8::File>>;

/// An open, georeferenced single-band GeoTIFF.
pub struct GeoTiffRaster {
    path: Utf8PathBuf,
    decoder: FileDecoder,
    width: u32,
    height: u32,
    georef: Georeference,
}

impl std::fmt::Debug for GeoTiffRaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoTiffRaster")
            .field("path", &self.path)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("georef", &self.georef)
            .finish_non_exhaustive()
    }
}

impl GeoTiffRaster {
    /// Open `path` and read its dimensions and georeference.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Open`] or [`RasterError::Decode`] when the file
    /// cannot be read, and [`RasterError::MissingGeoreference`] when it has
    /// neither tie-point nor transformation tags.
    pub fn open(path: &Utf8Path) -> Result<Self, RasterError> {
        let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
            RasterError::Open {
                path: path.to_owned(),
                source,
            }
        })?;
        let decode = |source| RasterError::Decode {
            path: path.to_owned(),
            source,
        };
        let mut decoder = Decoder::new(BufReader::new(file)).map_err(decode)?;
        let (width, height) = decoder.dimensions().map_err(decode)?;
        let pixel_scale = read_f64_tag(&mut decoder, Tag::ModelPixelScaleTag).map_err(decode)?;
        let tie_points = read_f64_tag(&mut decoder, Tag::ModelTiepointTag).map_err(decode)?;
        let transformation =
            read_f64_tag(&mut decoder, Tag::ModelTransformationTag).map_err(decode)?;
        let georef = Georeference::from_tags(
            pixel_scale.as_deref(),
            tie_points.as_deref(),
            transformation.as_deref(),
        )
        .ok_or_else(|| RasterError::MissingGeoreference {
            path: path.to_owned(),
        })?;
        debug!("opened raster {path}: {width}x{height}, {georef:?}");
        Ok(Self {
            path: path.to_owned(),
            decoder,
            width,
            height,
            georef,
        })
    }

    /// Raster width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Raster height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Georeference read from the file.
    pub fn georeference(&self) -> &Georeference {
        &self.georef
    }

    /// Value of band 0 at `location` (`x = longitude`, `y = latitude`).
    ///
    /// Returns `Ok(None)` outside the grid or when the pixel holds a
    /// non-finite value. Only the strip or tile containing the pixel is
    /// decoded.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Decode`] when the chunk cannot be decoded and
    /// [`RasterError::UnsupportedSampleFormat`] when its layout is unusable.
    pub fn sample(&mut self, location: Coord<f64>) -> Result<Option<f64>, RasterError> {
        let Some(pixel) = self.georef.pixel_for(location, self.width, self.height) else {
            return Ok(None);
        };
        let value = self.read_pixel(pixel)?;
        Ok(Some(value).filter(|v| v.is_finite()))
    }

    fn read_pixel(&mut self, pixel: PixelIndex) -> Result<f64, RasterError> {
        let (chunk_width, chunk_height) = self.decoder.chunk_dimensions();
        let Some(chunk) = ChunkLocation::locate(pixel, self.width, chunk_width, chunk_height)
        else {
            return Err(self.unsupported(format!(
                "degenerate chunk size {chunk_width}x{chunk_height}"
            )));
        };
        let (data_width, data_height) = self.decoder.chunk_data_dimensions(chunk.index);
        let decoded = self
            .decoder
            .read_chunk(chunk.index)
            .map_err(|source| RasterError::Decode {
                path: self.path.clone(),
                source,
            })?;
        let offset = chunk.offset(data_width);
        let pixels = (data_width as usize) * (data_height as usize);
        value_at(&decoded, offset, pixels).ok_or_else(|| {
            self.unsupported(format!(
                "pixel {offset} missing from chunk {} of {pixels} pixels",
                chunk.index
            ))
        })
    }

    fn unsupported(&self, message: String) -> RasterError {
        RasterError::UnsupportedSampleFormat {
            path: self.path.clone(),
            message,
        }
    }
}

fn read_f64_tag(decoder: &mut FileDecoder, tag: Tag) -> tiff::TiffResult<Option<Vec<f64>>> {
    decoder
        .find_tag(tag)?
        .map(|value| value.into_f64_vec())
        .transpose()
}

/// Strip or tile holding a pixel, plus the pixel's position inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChunkLocation {
    index: u32,
    local_col: u32,
    local_row: u32,
}

impl ChunkLocation {
    fn locate(pixel: PixelIndex, width: u32, chunk_width: u32, chunk_height: u32) -> Option<Self> {
        if chunk_width == 0 || chunk_height == 0 {
            return None;
        }
        let chunks_across = width.div_ceil(chunk_width);
        Some(Self {
            index: (pixel.row / chunk_height) * chunks_across + pixel.col / chunk_width,
            local_col: pixel.col % chunk_width,
            local_row: pixel.row % chunk_height,
        })
    }

    fn offset(&self, data_width: u32) -> usize {
        self.local_row as usize * data_width as usize + self.local_col as usize
    }
}

/// First sample of the pixel at `offset`, widening every numeric type.
fn value_at(decoded: &DecodingResult, offset: usize, pixels: usize) -> Option<f64> {
    fn pick<T: Copy>(buf: &[T], offset: usize, pixels: usize) -> Option<T> {
        let samples = (buf.len() / pixels.max(1)).max(1);
        buf.get(offset * samples).copied()
    }
    match decoded {
        DecodingResult::U8(buf) => pick(buf, offset, pixels).map(f64::from),
        DecodingResult::U16(buf) => pick(buf, offset, pixels).map(f64::from),
        DecodingResult::U32(buf) => pick(buf, offset, pixels).map(f64::from),
        DecodingResult::U64(buf) => pick(buf, offset, pixels).map(|v| v as f64),
        DecodingResult::I8(buf) => pick(buf, offset, pixels).map(f64::from),
        DecodingResult::I16(buf) => pick(buf, offset, pixels).map(f64::from),
        DecodingResult::I32(buf) => pick(buf, offset, pixels).map(f64::from),
        DecodingResult::I64(buf) => pick(buf, offset, pixels).map(|v| v as f64),
        DecodingResult::F32(buf) => pick(buf, offset, pixels).map(f64::from),
        DecodingResult::F64(buf) => pick(buf, offset, pixels),
    }
}

/// [`DensitySource`] backed by a GeoTIFF on disk.
///
/// The file is opened for every sample, so the source is cheap to share
/// and never holds a file handle between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoTiffDensitySource {
    path: Utf8PathBuf,
}

impl GeoTiffDensitySource {
    /// Sample the raster at `path`.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Raster location.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl DensitySource for GeoTiffDensitySource {
    fn sample(&self, location: Coord<f64>) -> Result<Option<f64>, DensityError> {
        let mut raster = GeoTiffRaster::open(&self.path)?;
        Ok(raster.sample(location)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PixelIndex { col: 3, row: 5 }, 10, 10, 2, ChunkLocation { index: 2, local_col: 3, local_row: 1 })]
    #[case(PixelIndex { col: 7, row: 0 }, 10, 4, 4, ChunkLocation { index: 1, local_col: 3, local_row: 0 })]
    #[case(PixelIndex { col: 9, row: 9 }, 10, 4, 4, ChunkLocation { index: 8, local_col: 1, local_row: 1 })]
    fn locates_strips_and_tiles(
        #[case] pixel: PixelIndex,
        #[case] width: u32,
        #[case] chunk_width: u32,
        #[case] chunk_height: u32,
        #[case] expected: ChunkLocation,
    ) {
        assert_eq!(
            ChunkLocation::locate(pixel, width, chunk_width, chunk_height),
            Some(expected)
        );
    }

    #[rstest]
    fn zero_sized_chunks_are_rejected() {
        assert_eq!(
            ChunkLocation::locate(PixelIndex { col: 0, row: 0 }, 4, 0, 4),
            None
        );
    }

    #[rstest]
    fn offset_uses_decoded_width() {
        let chunk = ChunkLocation {
            index: 0,
            local_col: 1,
            local_row: 2,
        };
        assert_eq!(chunk.offset(3), 7);
    }

    #[rstest]
    #[case(DecodingResult::U8(vec![1, 2, 3, 4]), 2, 4, Some(3.0))]
    #[case(DecodingResult::F32(vec![0.5, 1.5]), 1, 2, Some(1.5))]
    #[case(DecodingResult::I16(vec![-7, 8]), 0, 2, Some(-7.0))]
    #[case(DecodingResult::F64(vec![1.0, 2.0]), 2, 2, None)]
    fn widens_decoded_samples(
        #[case] decoded: DecodingResult,
        #[case] offset: usize,
        #[case] pixels: usize,
        #[case] expected: Option<f64>,
    ) {
        assert_eq!(value_at(&decoded, offset, pixels), expected);
    }

    #[rstest]
    fn interleaved_bands_read_the_first_sample() {
        let decoded = DecodingResult::U16(vec![10, 99, 20, 99, 30, 99]);
        assert_eq!(value_at(&decoded, 2, 3), Some(30.0));
    }
}
