use itertools::Itertools;

use crate::bootstrap::{Container, Slot};
use crate::config::{parse_word_list, TypewriterOptions};
use crate::responsive::{ContainerLayout, Mode, ResponsiveAdapter, Viewport};
use crate::typing_policy::{calculate_typing_speed, TimingProfile, WORD_ADVANCE_PAUSE_MS};
use crate::words::WordList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnimationState {
    pub current_word_index: usize,
    pub char_index: usize,
    pub is_deleting: bool,
    pub is_running: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Typing,
    PausingAfterWord,
    Deleting,
    PausingAfterDelete,
}

/// Redraw request raised by each tick; carries the tick that raised it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest {
    pub tick: u64,
}

/// One animated word cycle bound to a mounted container
#[derive(Debug)]
pub struct Typewriter {
    words: WordList,
    options: TypewriterOptions,
    timing: TimingProfile,
    state: AnimationState,
    phase: Phase,
    // due time of the single in-flight continuation
    pending_tick: Option<u64>,
    frame: Option<FrameRequest>,
    ticks: u64,
    rendered: String,
    responsive: ResponsiveAdapter,
    mode: Mode,
    layout: ContainerLayout,
    accessible_label: Option<String>,
    destroyed: bool,
}

impl Typewriter {
    /// Mount a widget on `container`. Returns `None` (and logs why) when the
    /// container lacks the text or cursor slot.
    pub fn mount(
        container: &Container,
        options: TypewriterOptions,
        viewport: Viewport,
    ) -> Option<Self> {
        for slot in [Slot::Text, Slot::Cursor] {
            if !container.has_slot(slot) {
                log::warn!(
                    "typewriter container {:?} is missing its {slot} slot, leaving it inert",
                    container.id
                );
                return None;
            }
        }

        let words = parse_word_list(container.words.as_deref().unwrap_or_default());
        if words.is_empty() {
            log::warn!("typewriter container {:?} has no words", container.id);
        }

        Some(Self::new(words, options, viewport))
    }

    /// Build a widget directly from parsed words.
    pub fn new(words: Vec<String>, options: TypewriterOptions, viewport: Viewport) -> Self {
        let accessible_label = Some(words.iter().join(", "));
        let responsive = ResponsiveAdapter::new(options.responsive_breakpoint, viewport);
        let mut tw = Self {
            words: WordList::new(words),
            timing: options.desktop_profile(),
            options,
            state: AnimationState::default(),
            phase: Phase::Typing,
            pending_tick: None,
            frame: None,
            ticks: 0,
            rendered: String::new(),
            mode: Mode::Desktop,
            responsive,
            layout: ContainerLayout::default(),
            accessible_label,
            destroyed: false,
        };
        tw.apply_mode(tw.responsive.current_mode());
        log::info!(
            "typewriter mounted with {} words in {} mode",
            tw.words.len(),
            tw.mode
        );
        tw
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn timing(&self) -> TimingProfile {
        self.timing
    }

    pub fn words(&self) -> &WordList {
        &self.words
    }

    pub fn options(&self) -> &TypewriterOptions {
        &self.options
    }

    pub fn layout(&self) -> ContainerLayout {
        self.layout
    }

    pub fn viewport(&self) -> Viewport {
        self.responsive.viewport()
    }

    /// Current content of the text slot
    pub fn rendered_text(&self) -> &str {
        &self.rendered
    }

    /// Static text listing every word, for assistive technology
    pub fn accessible_label(&self) -> Option<&str> {
        self.accessible_label.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_listening(&self) -> bool {
        self.responsive.is_listening()
    }

    pub fn pending_tick(&self) -> Option<u64> {
        self.pending_tick
    }

    /// Earliest time this widget needs `poll` to be called
    pub fn next_deadline(&self) -> Option<u64> {
        match (self.pending_tick, self.responsive.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn take_frame_request(&mut self) -> Option<FrameRequest> {
        self.frame.take()
    }

    /// Begin or resume animating. Re-arms the single pending slot for `now_ms`,
    /// so a continuation still in flight from before a `stop` is replaced, not doubled.
    pub fn start(&mut self, now_ms: u64) {
        if self.destroyed {
            log::warn!("start called on a destroyed typewriter");
            return;
        }
        if self.state.is_running {
            return;
        }
        self.state.is_running = true;
        self.pending_tick = Some(now_ms);
        log::debug!("typewriter started at {now_ms}ms");
    }

    /// Halt animation. An in-flight continuation is left to expire at its
    /// liveness check; only the frame request is cancelled.
    pub fn stop(&mut self) {
        if !self.state.is_running {
            return;
        }
        self.state.is_running = false;
        self.frame = None;
        log::debug!("typewriter stopped at {:?}", self.state);
    }

    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.state.is_running = false;
        self.frame = None;
        self.pending_tick = None;
        self.responsive.detach();
        self.accessible_label = None;
        self.destroyed = true;
        log::info!("typewriter destroyed");
    }

    pub fn on_resize(&mut self, viewport: Viewport, now_ms: u64) {
        self.responsive.on_resize(viewport, now_ms);
    }

    /// Run whatever is due at `now_ms`: a debounced mode evaluation and at most
    /// one animation tick. Returns true when the rendered output may have changed.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let mut changed = false;

        if let Some(mode) = self.responsive.poll(now_ms) {
            self.apply_mode(mode);
            changed = true;
        }

        if let Some(due) = self.pending_tick {
            if now_ms >= due {
                self.pending_tick = None;
                changed |= self.tick(now_ms);
            }
        }

        changed
    }

    fn apply_mode(&mut self, mode: Mode) {
        match mode {
            Mode::Mobile => {
                self.words.use_truncated(self.options.max_word_length);
                self.timing = self.options.mobile;
            }
            Mode::Desktop => {
                self.words.use_original();
                self.timing = self.options.desktop_profile();
            }
        }
        if mode != self.mode {
            log::debug!("typewriter switched to {mode} mode");
        }
        self.mode = mode;

        let cursor_width = unicode_width::UnicodeWidthStr::width(self.options.cursor_char.as_str());
        self.layout = ContainerLayout::pin(
            self.words.max_width() + cursor_width,
            self.responsive.viewport().cols,
        );
    }

    fn schedule(&mut self, now_ms: u64, delay_ms: u64) {
        self.pending_tick = Some(now_ms.saturating_add(delay_ms));
    }

    /// One step of the typing/deleting cycle.
    fn tick(&mut self, now_ms: u64) -> bool {
        if !self.state.is_running || self.words.is_empty() {
            return false;
        }

        // a mode switch may have changed list or word lengths under us
        self.state.current_word_index %= self.words.len();
        let word: Vec<char> = self
            .words
            .get(self.state.current_word_index)
            .unwrap_or_default()
            .chars()
            .collect();
        self.state.char_index = self.state.char_index.min(word.len());

        self.ticks += 1;
        self.frame = Some(FrameRequest { tick: self.ticks });

        if self.state.is_deleting {
            self.state.char_index = self.state.char_index.saturating_sub(1);
            self.rendered = word[..self.state.char_index].iter().collect();

            if self.state.char_index == 0 {
                self.state.is_deleting = false;
                self.state.current_word_index =
                    (self.state.current_word_index + 1) % self.words.len();
                self.phase = Phase::PausingAfterDelete;
                self.schedule(now_ms, WORD_ADVANCE_PAUSE_MS);
            } else {
                self.phase = Phase::Deleting;
                self.schedule(now_ms, self.timing.deleting_speed);
            }
            return true;
        }

        let typed = self.state.char_index;
        if typed < word.len() {
            self.state.char_index += 1;
        }
        self.rendered = word[..self.state.char_index].iter().collect();

        if self.state.char_index == word.len() {
            self.state.is_deleting = true;
            self.phase = Phase::PausingAfterWord;
            self.schedule(now_ms, self.timing.pause_duration);
        } else {
            self.phase = Phase::Typing;
            let delay = calculate_typing_speed(&word, typed, self.timing.typing_speed);
            self.schedule(now_ms, delay);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn desktop() -> Viewport {
        Viewport::new(120, 40)
    }

    fn mobile() -> Viewport {
        Viewport::new(60, 40)
    }

    fn widget(words: &[&str]) -> Typewriter {
        Typewriter::new(
            words.iter().map(|w| w.to_string()).collect(),
            TypewriterOptions::default(),
            desktop(),
        )
    }

    /// Fire pending ticks until `pred` holds, returning the time reached.
    fn run_until<F: Fn(&Typewriter) -> bool>(tw: &mut Typewriter, mut now: u64, pred: F) -> u64 {
        for _ in 0..10_000 {
            if pred(tw) {
                return now;
            }
            now = tw.next_deadline().expect("widget went idle");
            tw.poll(now);
        }
        panic!("condition never reached");
    }

    #[test]
    fn types_word_then_pauses() {
        let mut tw = widget(&["Rust"]);
        tw.start(0);
        tw.poll(0);
        assert_eq!(tw.rendered_text(), "R");
        assert_eq!(tw.phase(), Phase::Typing);
        // first char is an edge char
        assert_eq!(tw.pending_tick(), Some(120));

        let now = run_until(&mut tw, 0, |t| t.rendered_text() == "Rust");
        assert_eq!(tw.phase(), Phase::PausingAfterWord);
        assert!(tw.state().is_deleting);
        assert_eq!(tw.pending_tick(), Some(now + 2000));
    }

    #[test]
    fn typing_delays_follow_policy() {
        let mut tw = widget(&["Hi."]);
        tw.start(0);
        tw.poll(0);
        assert_eq!(tw.pending_tick(), Some(120));
        tw.poll(120);
        assert_eq!(tw.rendered_text(), "Hi");
        assert_eq!(tw.pending_tick(), Some(220));
        tw.poll(220);
        assert_eq!(tw.rendered_text(), "Hi.");
        assert_eq!(tw.pending_tick(), Some(2220));
    }

    #[test]
    fn deletes_then_advances_after_fixed_gap() {
        let mut tw = widget(&["ab", "cd"]);
        tw.start(0);
        let now = run_until(&mut tw, 0, |t| t.phase() == Phase::PausingAfterWord);
        let now = tw.pending_tick().unwrap().max(now);
        tw.poll(now);
        assert_eq!(tw.rendered_text(), "a");
        assert_eq!(tw.phase(), Phase::Deleting);
        assert_eq!(tw.pending_tick(), Some(now + 50));

        tw.poll(now + 50);
        assert_eq!(tw.rendered_text(), "");
        assert_eq!(tw.phase(), Phase::PausingAfterDelete);
        assert_eq!(tw.state().current_word_index, 1);
        assert!(!tw.state().is_deleting);
        assert_eq!(tw.pending_tick(), Some(now + 50 + WORD_ADVANCE_PAUSE_MS));

        tw.poll(now + 50 + WORD_ADVANCE_PAUSE_MS);
        assert_eq!(tw.rendered_text(), "c");
    }

    #[test]
    fn word_cycle_wraps_around() {
        let mut tw = widget(&["a", "bb", "ccc"]);
        tw.start(0);
        let mut typed = Vec::new();
        let mut now = 0;
        for _ in 0..6 {
            now = run_until(&mut tw, now, |t| t.phase() == Phase::PausingAfterWord);
            typed.push(tw.rendered_text().to_string());
            now = run_until(&mut tw, now, |t| t.phase() == Phase::PausingAfterDelete);
            assert_eq!(tw.rendered_text(), "");
        }
        assert_eq!(typed, vec!["a", "bb", "ccc", "a", "bb", "ccc"]);
    }

    #[test]
    fn stop_then_start_resumes_mid_word() {
        let mut tw = widget(&["Rust"]);
        tw.start(0);
        tw.poll(0);
        tw.poll(120);
        assert_eq!(tw.rendered_text(), "Ru");
        assert_eq!(tw.state().char_index, 2);

        tw.stop();
        tw.start(150);
        assert_eq!(tw.pending_tick(), Some(150));
        tw.poll(150);
        assert_eq!(tw.rendered_text(), "Rus");
    }

    #[test]
    fn stopped_widget_lets_in_flight_tick_expire() {
        let mut tw = widget(&["Rust"]);
        tw.start(0);
        tw.poll(0);
        tw.stop();
        assert!(!tw.poll(500));
        assert_eq!(tw.rendered_text(), "R");
        assert_eq!(tw.pending_tick(), None);
        assert_eq!(tw.next_deadline(), None);
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut tw = widget(&["Rust"]);
        tw.start(0);
        tw.poll(0);
        let pending = tw.pending_tick();
        tw.start(50);
        assert_eq!(tw.pending_tick(), pending);
        tw.stop();
        tw.stop();
        assert!(!tw.is_running());
    }

    #[test]
    fn stop_cancels_frame_request() {
        let mut tw = widget(&["Rust"]);
        tw.start(0);
        tw.poll(0);
        tw.stop();
        assert_eq!(tw.take_frame_request(), None);
    }

    #[test]
    fn each_tick_raises_a_frame_request() {
        let mut tw = widget(&["Rust"]);
        tw.start(0);
        tw.poll(0);
        assert_matches!(tw.take_frame_request(), Some(FrameRequest { tick: 1 }));
        assert_eq!(tw.take_frame_request(), None);
        tw.poll(120);
        assert_matches!(tw.take_frame_request(), Some(FrameRequest { tick: 2 }));
    }

    #[test]
    fn huge_pause_saturates_deadline() {
        let options = crate::config::merge_options(
            &TypewriterOptions::default(),
            &crate::config::OptionOverrides {
                pause_duration: Some(u64::MAX),
                ..Default::default()
            },
        );
        let mut tw = Typewriter::new(vec!["a".into()], options, desktop());
        tw.start(5);
        assert!(tw.poll(5));
        assert_eq!(tw.phase(), Phase::PausingAfterWord);
        assert_eq!(tw.pending_tick(), Some(u64::MAX));
        // the pause is not skipped
        assert!(!tw.poll(1_000_000));
        assert_eq!(tw.rendered_text(), "a");
    }

    #[test]
    fn empty_word_list_is_inert() {
        let mut tw = widget(&[]);
        tw.start(0);
        assert!(!tw.poll(0));
        assert_eq!(tw.rendered_text(), "");
        assert_eq!(tw.pending_tick(), None);
    }

    #[test]
    fn mobile_viewport_truncates_and_speeds_up() {
        let long = "abcdefghijklmnopqrstuvwxy";
        let mut tw = widget(&[long]);
        tw.on_resize(mobile(), 0);
        assert!(tw.poll(250));
        assert_eq!(tw.mode(), Mode::Mobile);
        assert_eq!(tw.timing(), TimingProfile::mobile());
        assert_eq!(tw.words().get(0), Some("abcdefghijklmnopqrst..."));

        tw.on_resize(desktop(), 300);
        tw.poll(550);
        assert_eq!(tw.mode(), Mode::Desktop);
        assert_eq!(tw.timing(), TimingProfile::desktop());
        assert_eq!(tw.words().get(0), Some(long));
    }

    #[test]
    fn initial_viewport_selects_mode() {
        let tw = Typewriter::new(vec!["x".into()], TypewriterOptions::default(), mobile());
        assert_eq!(tw.mode(), Mode::Mobile);
        assert_eq!(tw.timing().typing_speed, 80);
    }

    #[test]
    fn resize_burst_evaluates_last_size_once() {
        let mut tw = widget(&["Rust"]);
        tw.on_resize(mobile(), 0);
        tw.on_resize(mobile(), 100);
        tw.on_resize(desktop(), 200);
        assert!(!tw.poll(300));
        assert!(tw.poll(450));
        assert_eq!(tw.mode(), Mode::Desktop);
        assert!(!tw.poll(1000));
    }

    #[test]
    fn mode_switch_mid_word_clamps_char_index() {
        let long = "abcdefghijklmnopqrstuvwxy";
        let mut tw = widget(&[long]);
        tw.start(0);
        let now = run_until(&mut tw, 0, |t| t.state().char_index == 22);
        tw.on_resize(mobile(), now);
        let now = now + 250;
        tw.poll(now);
        // truncated word has 23 chars; typing continues within bounds
        run_until(&mut tw, now, |t| t.phase() == Phase::PausingAfterWord);
        assert_eq!(tw.rendered_text(), "abcdefghijklmnopqrst...");
        assert_eq!(tw.state().char_index, 23);
    }

    #[test]
    fn layout_pins_height_after_mode_switch() {
        let mut tw = widget(&["Rust"]);
        assert_eq!(tw.layout().height, 2);
        tw.on_resize(Viewport::new(3, 10), 0);
        tw.poll(250);
        // "Rust|" wraps over two 3-column lines
        assert_eq!(tw.layout().line_height, 2);
        assert_eq!(tw.layout().height, 3);
    }

    #[test]
    fn destroy_detaches_everything() {
        let mut tw = widget(&["Rust"]);
        tw.start(0);
        tw.poll(0);
        tw.destroy();
        assert!(!tw.is_running());
        assert!(!tw.is_listening());
        assert_eq!(tw.accessible_label(), None);
        assert_eq!(tw.next_deadline(), None);

        tw.on_resize(mobile(), 10);
        assert!(!tw.poll(1000));
        assert_eq!(tw.mode(), Mode::Desktop);

        tw.start(2000);
        assert!(!tw.is_running());
        tw.destroy();
        assert!(tw.is_destroyed());
    }

    #[test]
    fn accessible_label_lists_all_words() {
        let tw = widget(&["fast", "safe", "fun"]);
        assert_eq!(tw.accessible_label(), Some("fast, safe, fun"));
    }

    #[test]
    fn mount_requires_both_slots() {
        let mut c = Container::typewriter("hero", "a,b");
        assert!(Typewriter::mount(&c, TypewriterOptions::default(), desktop()).is_some());
        c.slots.retain(|s| *s != Slot::Cursor);
        assert!(Typewriter::mount(&c, TypewriterOptions::default(), desktop()).is_none());
    }
}
