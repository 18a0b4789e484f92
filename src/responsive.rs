use crate::debounce::Debouncer;

pub const RESIZE_DEBOUNCE_MS: u64 = 250;

/// Width of one terminal column when comparing against pixel breakpoints
pub const CELL_WIDTH_PX: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Mode {
    Mobile,
    Desktop,
}

impl Mode {
    pub fn for_width(width_px: u32, breakpoint_px: u32) -> Self {
        if width_px < breakpoint_px {
            Mode::Mobile
        } else {
            Mode::Desktop
        }
    }
}

/// Terminal size as seen by a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    pub fn width_px(&self) -> u32 {
        self.cols as u32 * CELL_WIDTH_PX
    }
}

/// Debounced resize listener deciding which mode a widget should be in
#[derive(Debug)]
pub struct ResponsiveAdapter {
    breakpoint_px: u32,
    debouncer: Debouncer<Viewport>,
    listening: bool,
    viewport: Viewport,
}

impl ResponsiveAdapter {
    pub fn new(breakpoint_px: u32, viewport: Viewport) -> Self {
        Self {
            breakpoint_px,
            debouncer: Debouncer::new(RESIZE_DEBOUNCE_MS),
            listening: true,
            viewport,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn current_mode(&self) -> Mode {
        Mode::for_width(self.viewport.width_px(), self.breakpoint_px)
    }

    /// Record a resize; ignored once detached.
    pub fn on_resize(&mut self, viewport: Viewport, now_ms: u64) {
        if self.listening {
            self.debouncer.call(viewport, now_ms);
        }
    }

    pub fn deadline(&self) -> Option<u64> {
        self.debouncer.deadline()
    }

    /// Returns the mode to evaluate once the debounce window has closed.
    pub fn poll(&mut self, now_ms: u64) -> Option<Mode> {
        let viewport = &mut self.viewport;
        let fired = self.debouncer.poll_with(now_ms, |latest| *viewport = latest);
        fired.then(|| self.current_mode())
    }

    pub fn detach(&mut self) {
        self.listening = false;
        self.debouncer.cancel();
    }
}

/// Fixed height reserved for the animated line so changing word lengths never shift layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContainerLayout {
    pub line_height: u16,
    pub height: u16,
}

impl ContainerLayout {
    /// `content_width` is the widest word plus cursor, in cells.
    pub fn pin(content_width: usize, available_cols: u16) -> Self {
        let cols = available_cols.max(1) as usize;
        let lines = content_width.max(1).div_ceil(cols);
        // 1.5 line-heights, rounded up to whole rows
        let rows = lines.saturating_mul(3).div_ceil(2);
        Self {
            line_height: u16::try_from(lines).unwrap_or(u16::MAX),
            height: u16::try_from(rows).unwrap_or(u16::MAX),
        }
    }
}
