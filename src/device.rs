//! Ownership of the shared device and its factories.

use std::rc::Rc;

use crate::image::ImageCodec;
use crate::options::{DevicePreference, Options};
use crate::render::{Backend, Context, Device, DeviceKind};
use crate::text::FontDb;
use crate::Error;

/// Resources shared by every surface of a runtime
struct Shared {
    device: Rc<dyn Device>,
    fonts: FontDb,
    codec: Rc<dyn ImageCodec>,
}

/// Owns the shared 2D device, the font database (text-layout factory) and
/// the image codec (image factory).
///
/// The manager is passed to surface constructors.
/// It must be initialized before surfaces are created,
/// otherwise the surfaces are inert.
pub struct DeviceManager {
    backend: Box<dyn Backend>,
    options: Options,
    shared: Option<Shared>,
}

impl std::fmt::Debug for DeviceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceManager")
            .field("backend", &self.backend.name())
            .field("device", &self.device_kind())
            .finish()
    }
}

impl DeviceManager {
    pub fn new(backend: impl Backend + 'static, options: Options) -> Self {
        DeviceManager {
            backend: Box::new(backend),
            options,
            shared: None,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Create the shared device and factories. Calling it again is a no-op.
    pub fn initialize(&mut self) -> Result<(), Error> {
        if self.shared.is_some() {
            return Ok(());
        }

        let device = match self.options.device {
            DevicePreference::HardwareWithFallback => {
                match self.backend.create_device(DeviceKind::Hardware) {
                    Ok(device) => device,
                    Err(err) => {
                        log::info!(
                            "{}: hardware device unavailable ({}), falling back to software device",
                            self.backend.name(),
                            err
                        );
                        self.backend.create_device(DeviceKind::Software)?
                    }
                }
            }
            DevicePreference::SoftwareOnly => self.backend.create_device(DeviceKind::Software)?,
        };
        log::debug!("{}: created {:?} device", self.backend.name(), device.kind());

        let fonts = FontDb::load(&self.options.fonts);
        let codec = self.backend.create_codec();
        self.shared = Some(Shared {
            device,
            fonts,
            codec,
        });
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.shared.is_some()
    }

    /// Kind of the shared device, if initialized
    pub fn device_kind(&self) -> Option<DeviceKind> {
        self.shared.as_ref().map(|s| s.device.kind())
    }

    pub fn device(&self) -> Option<&Rc<dyn Device>> {
        self.shared.as_ref().map(|s| &s.device)
    }

    pub fn fonts(&self) -> Option<&FontDb> {
        self.shared.as_ref().map(|s| &s.fonts)
    }

    pub fn codec(&self) -> Option<&Rc<dyn ImageCodec>> {
        self.shared.as_ref().map(|s| &s.codec)
    }

    /// Create a drawing context on the shared device.
    /// `None` if the manager is not initialized or the device refuses.
    pub fn create_drawing_context(&self) -> Option<Box<dyn Context>> {
        let shared = self.shared.as_ref()?;
        match shared.device.create_context() {
            Ok(ctx) => Some(ctx),
            Err(err) => {
                log::warn!("could not create drawing context: {err}");
                None
            }
        }
    }

    /// Release the device and factories. Safe to call repeatedly.
    /// Surfaces created earlier keep their own references and stay usable.
    pub fn shutdown(&mut self) {
        if self.shared.take().is_some() {
            log::debug!("{}: device released", self.backend.name());
        }
    }
}
