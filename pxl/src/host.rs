use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};

use hspgfx::Error;
use hspgfx::window::{WindowDesc, WindowEvent, WindowHandle, WindowHost};

/// Frame added around the client area of headless windows
const BORDER: (u32, u32) = (16, 39);

#[derive(Debug, Clone)]
struct Window {
    title: String,
    outer: (u32, u32),
}

/// A window host without windowing system.
///
/// Windows are plain records. Events are queued by [`HeadlessHost::post`],
/// e.g. by tests simulating user input, and drained by the event pump.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    next: Cell<u64>,
    windows: RefCell<BTreeMap<WindowHandle, Window>>,
    queue: RefCell<VecDeque<(WindowHandle, WindowEvent)>>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for a window
    pub fn post(&self, window: WindowHandle, event: WindowEvent) {
        self.queue.borrow_mut().push_back((window, event));
    }

    pub fn window_count(&self) -> usize {
        self.windows.borrow().len()
    }

    pub fn title(&self, window: WindowHandle) -> Option<String> {
        self.windows.borrow().get(&window).map(|w| w.title.clone())
    }

    /// Outer size of a window, borders included
    pub fn outer_size(&self, window: WindowHandle) -> Option<(u32, u32)> {
        self.windows.borrow().get(&window).map(|w| w.outer)
    }
}

impl WindowHost for HeadlessHost {
    fn create_window(&self, desc: &WindowDesc) -> Result<WindowHandle, Error> {
        let handle = WindowHandle(self.next.get() + 1);
        self.next.set(handle.0);
        let outer = self.adjust_window_rect(handle, (desc.width, desc.height));
        self.windows.borrow_mut().insert(
            handle,
            Window {
                title: desc.title.clone(),
                outer,
            },
        );
        log::debug!("headless window {handle:?} \"{}\"", desc.title);
        Ok(handle)
    }

    fn destroy_window(&self, window: WindowHandle) {
        self.windows.borrow_mut().remove(&window);
        self.queue.borrow_mut().retain(|(w, _)| *w != window);
    }

    fn adjust_window_rect(&self, _window: WindowHandle, client: (u32, u32)) -> (u32, u32) {
        (client.0 + BORDER.0, client.1 + BORDER.1)
    }

    fn set_outer_size(&self, window: WindowHandle, size: (u32, u32)) {
        if let Some(w) = self.windows.borrow_mut().get_mut(&window) {
            w.outer = size;
        }
    }

    fn set_title(&self, window: WindowHandle, title: &str) {
        if let Some(w) = self.windows.borrow_mut().get_mut(&window) {
            w.title = title.to_string();
        }
    }

    fn pump_messages(&self) -> Vec<(WindowHandle, WindowEvent)> {
        self.queue.borrow_mut().drain(..).collect()
    }
}
