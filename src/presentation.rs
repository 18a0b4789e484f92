use std::sync::OnceLock;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::responsive::Mode;
use crate::typewriter::Typewriter;

/// Presentation rules shared by every widget in the process
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub text: Style,
    pub cursor: Style,
    pub stopped: Style,
    pub hint: Style,
}

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme on first use; later calls return the same instance.
pub fn ensure_theme() -> &'static Theme {
    THEME.get_or_init(|| {
        log::debug!("installing typewriter theme");
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Theme {
            text: bold.fg(Color::Cyan),
            cursor: bold.fg(Color::Yellow),
            stopped: bold.add_modifier(Modifier::DIM),
            hint: Style::default()
                .add_modifier(Modifier::DIM)
                .add_modifier(Modifier::ITALIC),
        }
    })
}

/// Blink cycle of the cursor, independent of the typing animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorBlink {
    period_ms: u64,
    reduced_motion: bool,
}

impl CursorBlink {
    pub fn new(blink_speed_ms: u64, reduced_motion: bool, mode: Mode) -> Self {
        let period_ms = match mode {
            // narrow screens blink slower
            Mode::Mobile => blink_speed_ms.saturating_mul(3) / 2,
            Mode::Desktop => blink_speed_ms,
        };
        Self {
            period_ms: period_ms.max(1),
            reduced_motion,
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn is_visible(&self, now_ms: u64) -> bool {
        self.reduced_motion || (now_ms / self.period_ms) % 2 == 0
    }

    /// When the cursor next toggles; `None` when it never does.
    pub fn next_toggle(&self, now_ms: u64) -> Option<u64> {
        if self.reduced_motion {
            return None;
        }
        Some((now_ms / self.period_ms + 1).saturating_mul(self.period_ms))
    }
}

/// Render-time view of a widget
pub struct TypewriterView<'a> {
    pub typewriter: &'a Typewriter,
    pub now_ms: u64,
    pub reduced_motion: bool,
}

impl<'a> TypewriterView<'a> {
    pub fn new(typewriter: &'a Typewriter, now_ms: u64, reduced_motion: bool) -> Self {
        Self {
            typewriter,
            now_ms,
            reduced_motion,
        }
    }

    pub fn blink(&self) -> CursorBlink {
        CursorBlink::new(
            self.typewriter.options().cursor_blink_speed,
            self.reduced_motion,
            self.typewriter.mode(),
        )
    }

    pub fn line(&self) -> Line<'a> {
        let theme = ensure_theme();
        let tw = self.typewriter;
        let text_style = if tw.is_running() {
            theme.text
        } else {
            theme.stopped
        };

        let mut spans = vec![Span::styled(tw.rendered_text().to_string(), text_style)];
        let cursor = if self.blink().is_visible(self.now_ms) {
            tw.options().cursor_char.clone()
        } else {
            " ".repeat(unicode_width::UnicodeWidthStr::width(
                tw.options().cursor_char.as_str(),
            ))
        };
        spans.push(Span::styled(cursor, theme.cursor));
        Line::from(spans)
    }
}

impl Widget for TypewriterView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.typewriter.is_destroyed() {
            return;
        }
        let height = self.typewriter.layout().height.min(area.height);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(height), Constraint::Min(0)])
            .split(area);

        Paragraph::new(self.line())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .render(chunks[0], buf);
    }
}
