/// Trailing-edge debouncer over a millisecond clock.
///
/// Each `call` restarts the quiet window and replaces the pending value; once the
/// window elapses without another call, `poll` yields the last value exactly once.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<(u64, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub fn call(&mut self, value: T, now_ms: u64) {
        self.pending = Some((now_ms.saturating_add(self.delay_ms), value));
    }

    /// When the pending action is due, if any
    pub fn deadline(&self) -> Option<u64> {
        self.pending.as_ref().map(|(due, _)| *due)
    }

    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        match self.pending {
            Some((due, _)) if now_ms >= due => self.pending.take().map(|(_, v)| v),
            _ => None,
        }
    }

    /// Run `action` with the pending value if it is due. Returns whether it ran.
    pub fn poll_with<F: FnOnce(T)>(&mut self, now_ms: u64, action: F) -> bool {
        match self.poll(now_ms) {
            Some(v) => {
                action(v);
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
