use std::{fmt, io};

/// Errors of the graphics runtime
#[derive(Debug)]
pub enum Error {
    /// The device manager was used before `initialize` or after `shutdown`
    NotInitialized,
    /// Neither the hardware nor the software device could be created
    DeviceCreation(String),
    /// The device was lost while a frame was open; the target must be recreated
    RecreateTarget,
    /// The operation needs a closed frame (e.g. pixel readback)
    FrameOpen,
    /// The bitmap cannot be used as a blit source
    NotASource,
    /// Swap chain buffers are still acquired while resizing
    BuffersInUse,
    /// Invalid bitmap or window size
    InvalidSize(u32, u32),
    /// Window host failure
    Window(String),
    /// Image decoding or encoding failure
    Image(String),
    /// Text layout failure
    Text(hspgfx_text::Error),
    /// IO error while loading or saving images
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotInitialized => write!(f, "Device manager is not initialized"),
            Error::DeviceCreation(reason) => write!(f, "Could not create device: {reason}"),
            Error::RecreateTarget => write!(f, "Device lost, render target must be recreated"),
            Error::FrameOpen => write!(f, "Operation not allowed while a frame is open"),
            Error::NotASource => write!(f, "Bitmap cannot be used as blit source"),
            Error::BuffersInUse => write!(f, "Swap chain buffers are still in use"),
            Error::InvalidSize(w, h) => write!(f, "Invalid size: {w}x{h}"),
            Error::Window(reason) => write!(f, "Window error: {reason}"),
            Error::Image(reason) => write!(f, "Image error: {reason}"),
            Error::Text(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Text(err) => Some(err),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<hspgfx_text::Error> for Error {
    fn from(err: hspgfx_text::Error) -> Self {
        Error::Text(err)
    }
}
