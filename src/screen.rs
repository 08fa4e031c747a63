//! The table of surfaces of a program.
//!
//! Legacy programs address surfaces by small numeric ids and draw on the
//! "current" surface selected with `gsel`. Surface 0 is the main window,
//! created on first use.

use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use crate::surface::{BlitSource, Surface};
use crate::window::{EventResponse, WindowDesc, WindowHandle, WindowHost};
use crate::{DeviceManager, Error, Quad};

/// Id of the main window
pub const MAIN_WINDOW: usize = 0;

const PUMP_SLEEP: Duration = Duration::from_millis(1);

/// Surfaces by id, the current surface, and the message pump
pub struct Screens {
    devices: DeviceManager,
    host: Rc<dyn WindowHost>,
    surfaces: Vec<Option<Surface>>,
    current: usize,
    last_frame: Option<Instant>,
    quit: bool,
}

impl std::fmt::Debug for Screens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screens")
            .field("devices", &self.devices)
            .field("surfaces", &self.ids().collect::<Vec<_>>())
            .field("current", &self.current)
            .field("quit", &self.quit)
            .finish_non_exhaustive()
    }
}

impl Screens {
    pub fn new(devices: DeviceManager, host: Rc<dyn WindowHost>) -> Self {
        Screens {
            devices,
            host,
            surfaces: Vec::new(),
            current: MAIN_WINDOW,
            last_frame: None,
            quit: false,
        }
    }

    pub fn devices(&self) -> &DeviceManager {
        &self.devices
    }

    pub fn devices_mut(&mut self) -> &mut DeviceManager {
        &mut self.devices
    }

    /// Ids of the existing surfaces
    pub fn ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.surfaces
            .iter()
            .enumerate()
            .filter_map(|(id, s)| s.as_ref().map(|_| id))
    }

    pub fn get(&self, id: usize) -> Option<&Surface> {
        self.surfaces.get(id).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: usize) -> Option<&mut Surface> {
        self.surfaces.get_mut(id).and_then(Option::as_mut)
    }

    /// Id of the current surface
    pub fn current(&self) -> usize {
        self.current
    }

    /// Whether the main window was closed
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    fn insert(&mut self, id: usize, surface: Surface) -> &mut Surface {
        if self.surfaces.len() <= id {
            self.surfaces.resize_with(id + 1, || None);
        }
        self.current = id;
        self.surfaces[id].insert(surface)
    }

    /// Create (or recreate) a window surface and make it current
    pub fn screen(&mut self, id: usize, desc: &WindowDesc) -> Result<&mut Surface, Error> {
        // the previous window must be destroyed before its replacement is created
        if let Some(slot) = self.surfaces.get_mut(id) {
            slot.take();
        }
        let surface = Surface::window(&self.devices, self.host.clone(), desc)?;
        Ok(self.insert(id, surface))
    }

    /// Create (or recreate) an offscreen surface and make it current
    pub fn buffer(&mut self, id: usize, width: u32, height: u32) -> &mut Surface {
        let surface = Surface::offscreen(&self.devices, width, height);
        self.insert(id, surface)
    }

    /// Select the current surface. Returns `false` if there is no such surface.
    pub fn gsel(&mut self, id: usize) -> bool {
        if self.get(id).is_some() {
            self.current = id;
            true
        } else {
            log::warn!("gsel: no surface {id}");
            false
        }
    }

    /// The current surface.
    /// The main window is created on first use.
    pub fn cur(&mut self) -> Result<&mut Surface, Error> {
        let current = self.resolve_current()?;
        self.get_mut(current).ok_or(Error::NotInitialized)
    }

    /// Id of the surface drawing commands go to, falling back to the main
    /// window (created if needed) when the current surface was destroyed.
    fn resolve_current(&mut self) -> Result<usize, Error> {
        if self.get(self.current).is_none() {
            if self.current != MAIN_WINDOW {
                log::warn!("surface {} was destroyed, selecting the main window", self.current);
                self.current = MAIN_WINDOW;
            }
            if self.get(MAIN_WINDOW).is_none() {
                let desc = self.devices.options().main_window.clone();
                self.screen(MAIN_WINDOW, &desc)?;
            }
        }
        Ok(self.current)
    }

    /// Run a blit on the current surface with the surface `src` as source
    fn with_source<F>(&mut self, src: usize, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Surface, BlitSource<'_>),
    {
        // the destination is resolved first, it may be the source itself
        let current = self.resolve_current()?;
        if src == current {
            let dst = self.get_mut(current).ok_or(Error::NotInitialized)?;
            f(dst, BlitSource::Own);
            return Ok(());
        }
        let Some(source) = self.surfaces.get_mut(src).and_then(Option::take) else {
            log::warn!("no source surface {src}");
            return Ok(());
        };
        let res = match (self.get_mut(current), source.bitmap()) {
            (Some(dst), Some(bitmap)) => {
                f(dst, BlitSource::Bitmap(bitmap));
                Ok(())
            }
            (Some(_), None) => Ok(()),
            (None, _) => Err(Error::NotInitialized),
        };
        self.surfaces[src] = Some(source);
        res
    }

    /// `gcopy` from surface `src` onto the current surface
    pub fn gcopy(
        &mut self,
        src: usize,
        sx: i32,
        sy: i32,
        size: Option<(u32, u32)>,
    ) -> Result<(), Error> {
        self.with_source(src, |dst, src| dst.gcopy(src, sx, sy, size))
    }

    /// `gzoom` from surface `src` onto the current surface
    #[allow(clippy::too_many_arguments)]
    pub fn gzoom(
        &mut self,
        dst_w: u32,
        dst_h: u32,
        src: usize,
        sx: i32,
        sy: i32,
        sw: u32,
        sh: u32,
        smooth: bool,
    ) -> Result<(), Error> {
        self.with_source(src, |dst, src| {
            dst.gzoom(dst_w, dst_h, src, sx, sy, sw, sh, smooth)
        })
    }

    /// `grotate` from surface `src` onto the current surface
    pub fn grotate(
        &mut self,
        src: usize,
        sx: i32,
        sy: i32,
        angle: f32,
        dst_w: u32,
        dst_h: u32,
    ) -> Result<(), Error> {
        self.with_source(src, |dst, src| dst.grotate(src, sx, sy, angle, dst_w, dst_h))
    }

    /// Image `gsquare` from surface `src` onto the current surface
    pub fn gsquare_image(&mut self, quad: &Quad, src: usize, src_quad: &Quad) -> Result<(), Error> {
        self.with_source(src, |dst, src| dst.gsquare_image(quad, src, src_quad))
    }

    fn find_window(&self, handle: WindowHandle) -> Option<usize> {
        self.surfaces.iter().position(|s| {
            s.as_ref()
                .and_then(Surface::as_window)
                .is_some_and(|w| w.handle() == handle)
        })
    }

    /// Dispatch the pending window events. Returns the number of events dispatched.
    ///
    /// Windows whose close is allowed are destroyed.
    /// Closing the main window requests the program to quit.
    pub fn dispatch_messages(&mut self) -> usize {
        let events = self.host.pump_messages();
        let count = events.len();
        for (handle, event) in events {
            let Some(id) = self.find_window(handle) else {
                continue;
            };
            let Some(surface) = self.get_mut(id) else {
                continue;
            };
            if surface.handle_event(event) == EventResponse::Allow {
                log::debug!("closing window {id}");
                self.surfaces[id] = None;
                if id == MAIN_WINDOW {
                    self.quit = true;
                }
            }
        }
        count
    }

    /// Wait for a duration, dispatching window events meanwhile
    pub fn wait(&mut self, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            self.dispatch_messages();
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep(PUMP_SLEEP.min(deadline - now));
        }
    }

    /// Wait until `ms` milliseconds elapsed since the previous call, for frame pacing.
    /// The first call only dispatches events.
    pub fn await_frame(&mut self, ms: u64) {
        if let Some(last) = self.last_frame {
            let deadline = last + Duration::from_millis(ms);
            self.wait(deadline.saturating_duration_since(Instant::now()));
        } else {
            self.dispatch_messages();
        }
        self.last_frame = Some(Instant::now());
    }

    /// Ids of the surfaces whose device was lost
    pub fn lost_surfaces(&self) -> Vec<usize> {
        self.surfaces
            .iter()
            .enumerate()
            .filter_map(|(id, s)| s.as_ref().filter(|s| s.needs_recreate()).map(|_| id))
            .collect()
    }
}
