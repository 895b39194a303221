/// Platform single-shot timer (`setTimeout` on the web).
pub trait TimeoutHost {
    type Handle: Copy;
    fn set_timeout(&mut self, delay_ms: u32) -> Option<Self::Handle>;
    fn clear_timeout(&mut self, handle: Self::Handle);
}

/// Coalesces a burst of triggers into one timeout after a quiet period.
pub struct Debouncer<H: Copy> {
    delay_ms: u32,
    pending: Option<H>,
}

impl<H: Copy> Debouncer<H> {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub fn trigger<T: TimeoutHost<Handle = H>>(&mut self, host: &mut T) {
        if let Some(h) = self.pending.take() {
            host.clear_timeout(h);
        }
        self.pending = host.set_timeout(self.delay_ms);
    }

    /// The live timeout ran.
    pub fn fired(&mut self) {
        self.pending = None;
    }

    pub fn cancel<T: TimeoutHost<Handle = H>>(&mut self, host: &mut T) {
        if let Some(h) = self.pending.take() {
            host.clear_timeout(h);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }
}
