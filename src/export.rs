// Saving the summary card as a PNG image

use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
};

use image::{ImageFormat, RgbaImage};
use log::{error, info};

use crate::errors::RecapError;

pub const DEFAULT_EXPORT_FILE_NAME: &str = "MotoRecap2024.png";

/// A rectangle of rendered pixels, RGBA with straight alpha, row by row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedRegion {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl CapturedRegion {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, RecapError> {
        if width == 0 || height == 0 {
            return Err(RecapError::EmptyCapture);
        }
        if rgba.len() != width as usize * height as usize * 4 {
            return Err(RecapError::InvalidCapture {
                width,
                height,
                len: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }
}

/// Encodes a captured region as PNG bytes.
pub fn encode_png(region: &CapturedRegion) -> Result<Vec<u8>, RecapError> {
    let image = RgbaImage::from_raw(region.width, region.height, region.rgba.clone()).ok_or(
        RecapError::InvalidCapture {
            width: region.width,
            height: region.height,
            len: region.rgba.len(),
        },
    )?;
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| RecapError::ExportEncodeError { source: e })?;
    Ok(bytes)
}

/// Turns a rendered summary card into a file the rider can share.
pub trait SummaryExporter {
    /// Writes the region and returns where it was saved.
    fn export(&self, region: &CapturedRegion) -> Result<PathBuf, RecapError>;
}

/// Writes PNG files under a fixed name into a directory.
#[derive(Clone, Debug)]
pub struct PngExporter {
    output_dir: PathBuf,
    file_name: String,
}

impl PngExporter {
    pub fn new(output_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_name: file_name.into(),
        }
    }

    /// Exporter writing `file_name` into the user's pictures directory, or the working
    /// directory when the platform has none.
    pub fn in_default_dir(file_name: impl Into<String>) -> Self {
        let output_dir = dirs::picture_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(output_dir, file_name)
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn write_to(path: &Path, region: &CapturedRegion) -> Result<(), RecapError> {
        let bytes = encode_png(region)?;
        fs::write(path, bytes).map_err(|e| RecapError::ExportIOError { source: e })
    }
}

impl SummaryExporter for PngExporter {
    fn export(&self, region: &CapturedRegion) -> Result<PathBuf, RecapError> {
        let path = self.output_path();
        match Self::write_to(&path, region) {
            Ok(()) => {
                info!(
                    "Saved {}x{} summary card to {:?}",
                    region.width, region.height, path
                );
                Ok(path)
            }
            Err(e) => {
                error!("Could not save summary card to {:?}: {}", path, e);
                Err(e)
            }
        }
    }
}
