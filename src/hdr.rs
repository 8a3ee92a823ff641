//! Radiance HDR to PFM conversion for captured environment maps.
//!
//! Decoding goes through the `image` crate; the PFM side is written here
//! since the codec does not encode it.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use image::Rgb32FImage;
use tracing::info;

use crate::util::{Error, Result};

/// Read an HDR (or any decodable) image as 32-bit float RGB.
pub fn read_hdr(path: impl AsRef<Path>) -> Result<Rgb32FImage> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    let img = image::open(path).map_err(|e| Error::Image(format!("{}: {e}", path.display())))?;
    Ok(img.to_rgb32f())
}

/// Write a colour PFM: `PF` header, negative scale for little-endian data,
/// scanlines bottom to top.
pub fn write_pfm(path: impl AsRef<Path>, img: &Rgb32FImage) -> Result<()> {
    let mut out = BufWriter::new(File::create(path.as_ref())?);
    encode_pfm(&mut out, img)?;
    out.flush()?;
    Ok(())
}

fn encode_pfm<W: Write>(out: &mut W, img: &Rgb32FImage) -> Result<()> {
    let (width, height) = img.dimensions();
    write!(out, "PF\n{width} {height}\n-1.0\n")?;
    for y in (0..height).rev() {
        for x in 0..width {
            for &c in &img.get_pixel(x, y).0 {
                out.write_f32::<LittleEndian>(c)?;
            }
        }
    }
    Ok(())
}

/// Convert one HDR file to PFM.
pub fn convert_hdr_to_pfm(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<()> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let img = read_hdr(input)?;
    write_pfm(output, &img)?;
    info!("Converted {} -> {} ({}x{})", input.display(), output.display(), img.width(), img.height());
    Ok(())
}
