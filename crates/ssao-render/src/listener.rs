//! Screen-size change notification.

/// Something that owns window-sized GPU resources.
pub trait ScreenSizeListener {
    /// Called after the output surface changed size.
    fn screen_size_changed(&mut self, device: &wgpu::Device, width: u32, height: u32);
}

/// Forwards one screen-size change to a set of listeners, in registration order.
///
/// The dispatcher mutably borrows its listeners, so build it when the window
/// reports a resize and drop it before the listeners render again:
///
/// ```ignore
/// ScreenSizeDispatcher::new()
///     .with_listener(&mut effect_a)
///     .with_listener(&mut effect_b)
///     .dispatch(&device, width, height);
/// ```
#[derive(Default)]
pub struct ScreenSizeDispatcher<'a> {
    listeners: Vec<&'a mut dyn ScreenSizeListener>,
}

impl<'a> ScreenSizeDispatcher<'a> {
    /// Creates an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener.
    pub fn add_listener(&mut self, listener: &'a mut dyn ScreenSizeListener) {
        self.listeners.push(listener);
    }

    /// Registers a listener, builder style.
    #[must_use]
    pub fn with_listener(mut self, listener: &'a mut dyn ScreenSizeListener) -> Self {
        self.add_listener(listener);
        self
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns true if no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Notifies every listener of the new size and releases the borrows.
    pub fn dispatch(self, device: &wgpu::Device, width: u32, height: u32) {
        for listener in self.listeners {
            listener.screen_size_changed(device, width, height);
        }
    }
}
