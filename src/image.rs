//! Image codecs used by `picload` and `bmpsave`.

use std::fs;
use std::path::Path;

use crate::render::{Bitmap, BitmapUsage};
use crate::{ColorU8, Error};

/// Image decoding and encoding
pub trait ImageCodec {
    /// Decode an image file into a source bitmap
    fn load_image(&self, path: &Path) -> Result<Bitmap, Error>;

    /// Encode a bitmap into an image file
    fn save_image(&self, bitmap: &Bitmap, path: &Path) -> Result<(), Error>;
}

/// Uncompressed Windows bitmap codec.
///
/// Writes 24-bit bottom-up files. Reads 8-bit (palette), 24-bit and 32-bit
/// uncompressed files, bottom-up or top-down.
#[derive(Debug, Clone, Copy, Default)]
pub struct BmpCodec;

const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_LEN: usize = 40;

impl BmpCodec {
    /// Encode a bitmap in memory. Alpha is dropped.
    pub fn encode(&self, bitmap: &Bitmap) -> Vec<u8> {
        let (w, h) = bitmap.size();
        let stride = row_stride(w, 24);
        let image_len = stride * h as usize;
        let offset = FILE_HEADER_LEN + INFO_HEADER_LEN;
        let file_len = offset + image_len;

        let mut out = Vec::with_capacity(file_len);
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&(file_len as u32).to_le_bytes());
        out.extend_from_slice(&[0; 4]);
        out.extend_from_slice(&(offset as u32).to_le_bytes());

        out.extend_from_slice(&(INFO_HEADER_LEN as u32).to_le_bytes());
        out.extend_from_slice(&(w as i32).to_le_bytes());
        out.extend_from_slice(&(h as i32).to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&24u16.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
        out.extend_from_slice(&(image_len as u32).to_le_bytes());
        out.extend_from_slice(&2835i32.to_le_bytes()); // 72 dpi
        out.extend_from_slice(&2835i32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());

        let padding = stride - w as usize * 3;
        for y in (0..h as i32).rev() {
            for x in 0..w as i32 {
                let c = bitmap.pixel(x, y).unwrap_or_default();
                out.extend_from_slice(&[c.blue(), c.green(), c.red()]);
            }
            out.extend(std::iter::repeat_n(0, padding));
        }
        out
    }

    /// Decode a bitmap file from memory
    pub fn decode(&self, data: &[u8]) -> Result<Bitmap, Error> {
        if data.len() < FILE_HEADER_LEN + INFO_HEADER_LEN || &data[0..2] != b"BM" {
            return Err(Error::Image("not a BMP file".to_string()));
        }
        let offset = read_u32(data, 10) as usize;
        let header_len = read_u32(data, 14) as usize;
        if header_len < INFO_HEADER_LEN {
            return Err(Error::Image("unsupported BMP header".to_string()));
        }
        let width = read_i32(data, 18);
        let height = read_i32(data, 22);
        let bpp = read_u16(data, 28);
        let compression = read_u32(data, 30);
        // BI_BITFIELDS is accepted for 32-bit files with the usual BGRA masks
        if compression != 0 && !(compression == 3 && bpp == 32) {
            return Err(Error::Image(format!(
                "compressed BMP not supported ({compression})"
            )));
        }
        if width <= 0 || height == 0 {
            return Err(Error::InvalidSize(width.max(0) as u32, height.unsigned_abs()));
        }
        let w = width as u32;
        let h = height.unsigned_abs();
        let top_down = height < 0;

        let palette = if bpp == 8 {
            let count = match read_u32(data, 46) {
                0 => 256,
                n => n as usize,
            };
            let start = FILE_HEADER_LEN + header_len;
            let end = start + count * 4;
            if end > data.len() {
                return Err(Error::Image("truncated BMP palette".to_string()));
            }
            data[start..end]
                .chunks_exact(4)
                .map(|e| ColorU8::from_rgb(e[2], e[1], e[0]))
                .collect()
        } else {
            Vec::new()
        };

        let stride = row_stride(w, bpp);
        if offset + stride * h as usize > data.len() {
            return Err(Error::Image("truncated BMP data".to_string()));
        }

        let mut colors = Vec::with_capacity((w * h) as usize);
        for y in 0..h as usize {
            let row = if top_down { y } else { h as usize - 1 - y };
            let row = &data[offset + row * stride..offset + (row + 1) * stride];
            for x in 0..w as usize {
                let c = match bpp {
                    8 => palette
                        .get(row[x] as usize)
                        .copied()
                        .unwrap_or(crate::color::BLACK),
                    24 => ColorU8::from_rgb(row[x * 3 + 2], row[x * 3 + 1], row[x * 3]),
                    32 => ColorU8::from_rgb(row[x * 4 + 2], row[x * 4 + 1], row[x * 4]),
                    _ => {
                        return Err(Error::Image(format!("unsupported BMP depth ({bpp})")));
                    }
                };
                colors.push(c);
            }
        }

        Bitmap::from_colors(w, h, BitmapUsage::SOURCE, &colors)
    }
}

impl ImageCodec for BmpCodec {
    fn load_image(&self, path: &Path) -> Result<Bitmap, Error> {
        let data = fs::read(path)?;
        self.decode(&data)
    }

    fn save_image(&self, bitmap: &Bitmap, path: &Path) -> Result<(), Error> {
        fs::write(path, self.encode(bitmap))?;
        Ok(())
    }
}

fn row_stride(width: u32, bpp: u16) -> usize {
    (width as usize * bpp as usize).div_ceil(32) * 4
}

fn read_u16(data: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([data[at], data[at + 1]])
}

fn read_u32(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

fn read_i32(data: &[u8], at: usize) -> i32 {
    read_u32(data, at) as i32
}
