use std::path::Path;

use hspgfx::render::{Bitmap, BitmapUsage};
use hspgfx::{BmpCodec, Error, ImageCodec};
use tiny_skia::Pixmap;

/// PNG and BMP codec.
///
/// PNG goes through tiny-skia, anything else is handled by [`BmpCodec`].
/// Files are recognized by their signature when loading, by their extension when saving.
#[derive(Debug, Clone, Copy, Default)]
pub struct PxlCodec;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

fn is_png_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

impl ImageCodec for PxlCodec {
    fn load_image(&self, path: &Path) -> Result<Bitmap, Error> {
        let data = std::fs::read(path)?;
        if !data.starts_with(PNG_SIGNATURE) {
            return BmpCodec.decode(&data);
        }
        let pixmap = Pixmap::decode_png(&data).map_err(|err| Error::Image(err.to_string()))?;
        let mut bitmap = Bitmap::new(pixmap.width(), pixmap.height(), BitmapUsage::SOURCE)?;
        bitmap.data_mut().copy_from_slice(pixmap.data());
        Ok(bitmap)
    }

    fn save_image(&self, bitmap: &Bitmap, path: &Path) -> Result<(), Error> {
        if !is_png_path(path) {
            return BmpCodec.save_image(bitmap, path);
        }
        let (w, h) = bitmap.size();
        let mut pixmap = Pixmap::new(w, h).ok_or(Error::InvalidSize(w, h))?;
        pixmap.data_mut().copy_from_slice(bitmap.data());
        pixmap
            .save_png(path)
            .map_err(|err| Error::Image(err.to_string()))
    }
}
