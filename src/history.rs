//! Scrollback: a screen wrapper that keeps lines pushed off the display
//! and pages through them.

use std::cmp::min;
use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};

use unicode_normalization::char::is_combining_mark;
use unicode_width::UnicodeWidthChar;

use modes;
use screen::{Line, Screen};
use stream::Listener;
use super::TermResult;

/// Bounded scrollback state. `position == size` means the live screen is
/// at the bottom edge; paging moves `position` within `0..=size`.
#[derive(Debug)]
pub struct History {
    /// Lines above the display, oldest first.
    pub top: VecDeque<Line>,
    /// Lines below the display; the front is the closest to the screen.
    pub bottom: VecDeque<Line>,
    /// Fraction of the screen height a single page move covers.
    pub ratio: f32,
    pub size: usize,
    pub position: usize,
}

impl History {
    fn new(size: usize, ratio: f32) -> History {
        History {
            top: VecDeque::new(),
            bottom: VecDeque::new(),
            ratio: ratio,
            size: size,
            position: size,
        }
    }
}

/// A [`Screen`] with scrollback. Events delivered through [`Listener`]
/// first snap the view back to the bottom, then run against the wrapped
/// screen; lines scrolled off the top margin land in the history.
///
/// Derefs to the wrapped screen for reading.
pub struct HistoryScreen {
    screen: Screen,
    pub history: History,
}

impl Deref for HistoryScreen {
    type Target = Screen;

    fn deref(&self) -> &Screen {
        &self.screen
    }
}

impl DerefMut for HistoryScreen {
    fn deref_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }
}

impl HistoryScreen {
    /// A screen with the default 100 lines of history, half a screen per
    /// page move.
    pub fn new(columns: usize, lines: usize) -> HistoryScreen {
        HistoryScreen::wrap(Screen::new(columns, lines), 100, 0.5)
    }

    pub fn with_history(
        columns: usize,
        lines: usize,
        history: usize,
        ratio: f32,
    ) -> HistoryScreen {
        HistoryScreen::wrap(Screen::new(columns, lines), history, ratio)
    }

    /// Wrap an existing screen.
    pub fn wrap(screen: Screen, history: usize, ratio: f32) -> HistoryScreen {
        HistoryScreen {
            screen: screen,
            history: History::new(history, ratio),
        }
    }

    fn page_size(&self) -> usize {
        (self.screen.lines as f32 * self.history.ratio).ceil() as usize
    }

    fn at_top_margin(&self) -> bool {
        let (top, _) = self.screen.scroll_region();
        self.screen.cursor.y == top
    }

    fn at_bottom_margin(&self) -> bool {
        let (_, bottom) = self.screen.scroll_region();
        self.screen.cursor.y == bottom
    }

    /// The line about to leave through the top margin goes on the top
    /// history, dropping the oldest entry once full.
    fn push_top(&mut self) {
        let (top, _) = self.screen.scroll_region();
        let line = self.screen.buffer[top].clone();
        if self.history.top.len() >= self.history.size {
            self.history.top.pop_front();
        }
        self.history.top.push_back(line);
    }

    /// Same for the line leaving through the bottom margin.
    fn push_bottom(&mut self) {
        let (_, bottom) = self.screen.scroll_region();
        let line = self.screen.buffer[bottom].clone();
        if self.history.bottom.len() >= self.history.size {
            self.history.bottom.pop_front();
        }
        self.history.bottom.push_back(line);
    }

    fn reset_history(&mut self) {
        self.history.top.clear();
        self.history.bottom.clear();
        self.history.position = self.history.size;
    }

    /// Before anything but a page move: page back down to the live
    /// screen.
    fn before_event(&mut self, page_move: bool) {
        if !page_move {
            while self.history.position < self.history.size
                && !self.history.bottom.is_empty()
            {
                self.next_page();
            }
        }
    }

    /// After a page move, clip cells past the right edge that history
    /// lines may carry; either way the cursor is only visible on the
    /// live screen.
    fn after_event(&mut self, page_move: bool) {
        if page_move {
            let limit = self.screen.columns + 1;
            for line in self.screen.buffer.iter_mut() {
                line.drop_beyond(limit);
            }
        }
        self.screen.cursor.hidden = !(self.history.position == self.history.size
            && self.screen.mode.contains(&modes::DECTCEM));
    }

    /// Page the view up: the bottom of the display slides into the
    /// bottom history and the top history refills the display.
    pub fn prev_page(&mut self) {
        if self.history.position > self.screen.lines && !self.history.top.is_empty() {
            let mid = min(self.page_size(), self.history.top.len());
            let lines = self.screen.lines;

            let moved: Vec<Line> = self.screen.buffer.drain(lines - mid..).collect();
            for line in moved.into_iter().rev() {
                if self.history.bottom.len() >= self.history.size {
                    self.history.bottom.pop_back();
                }
                self.history.bottom.push_front(line);
            }
            for _ in 0..mid {
                if let Some(line) = self.history.top.pop_back() {
                    self.screen.buffer.insert(0, line);
                }
            }
            self.history.position = self.history.position.saturating_sub(mid);
            self.screen.dirty.extend(0..lines);
        }
        self.after_event(true);
    }

    /// Page the view back down towards the live screen.
    pub fn next_page(&mut self) {
        if self.history.position < self.history.size && !self.history.bottom.is_empty() {
            let mid = min(self.page_size(), self.history.bottom.len());
            let lines = self.screen.lines;

            let moved: Vec<Line> = self.screen.buffer.drain(..mid).collect();
            for line in moved {
                if self.history.top.len() >= self.history.size {
                    self.history.top.pop_front();
                }
                self.history.top.push_back(line);
            }
            for _ in 0..mid {
                if let Some(line) = self.history.bottom.pop_front() {
                    self.screen.buffer.push(line);
                }
            }
            self.history.position = min(self.history.position + mid, self.history.size);
            self.screen.dirty.extend(0..lines);
        }
        self.after_event(true);
    }
}

// Delegate an event to the wrapped screen between the two hooks.
macro_rules! wrapped {
    ($( fn $name:ident ( $( $arg:ident : $ty:ty ),* ); )*) => {
        $(
            fn $name(&mut self, $( $arg : $ty ),*) -> TermResult {
                self.before_event(false);
                let res = Listener::$name(&mut self.screen, $( $arg ),*);
                self.after_event(false);
                res
            }
        )*
    };
}

impl Listener for HistoryScreen {
    wrapped! {
        fn bell();
        fn backspace();
        fn tab();
        fn carriage_return();
        fn shift_out();
        fn shift_in();
        fn set_tab_stop();
        fn save_cursor();
        fn restore_cursor();
        fn alignment_display();
        fn define_charset(code: char, mode: char);
        fn insert_characters(count: u32);
        fn cursor_up(count: u32);
        fn cursor_down(count: u32);
        fn cursor_forward(count: u32);
        fn cursor_back(count: u32);
        fn cursor_down1(count: u32);
        fn cursor_up1(count: u32);
        fn cursor_to_column(column: u32);
        fn cursor_position(line: u32, column: u32);
        fn cursor_to_line(line: u32);
        fn erase_in_line(how: u32);
        fn insert_lines(count: u32);
        fn delete_lines(count: u32);
        fn delete_characters(count: u32);
        fn erase_characters(count: u32);
        fn clear_tab_stop(how: u32);
        fn set_mode(mode_list: &[u32], private: bool);
        fn reset_mode(mode_list: &[u32], private: bool);
        fn select_graphic_rendition(attrs: &[u32]);
        fn report_device_attributes(mode: u32, private: bool);
        fn report_device_status(mode: u32, private: bool);
        fn set_margins(top: u32, bottom: Option<u32>);
        fn set_title(title: &str);
        fn set_icon_name(name: &str);
        fn debug(params: &[u32], private: bool, code: char);
    }

    // The remaining events can push lines off the screen (or drop the
    // history entirely), so they are wrapped by hand.

    fn draw(&mut self, data: &str) -> TermResult {
        self.before_event(false);
        // One character at a time, so rows scrolled out by autowrap are
        // captured before they go.
        for ch in data.chars() {
            if self.screen.cursor.x == self.screen.columns
                && self.screen.mode.contains(&modes::DECAWM)
                && self.at_bottom_margin()
            {
                self.push_top();
            }
            let glyph = self.screen.active_charset().translate(ch);
            let width = glyph.width();
            let advances = width.map_or(false, |w| w > 0)
                || (width == Some(0) && is_combining_mark(glyph));
            let mut buf = [0u8; 4];
            self.screen.draw(ch.encode_utf8(&mut buf));
            if !advances {
                // An unprintable ends the run just like a bulk draw would.
                break;
            }
        }
        self.after_event(false);
        Ok(())
    }

    fn linefeed(&mut self) -> TermResult {
        self.before_event(false);
        if self.at_bottom_margin() {
            self.push_top();
        }
        self.screen.linefeed();
        self.after_event(false);
        Ok(())
    }

    fn index(&mut self) -> TermResult {
        self.before_event(false);
        if self.at_bottom_margin() {
            self.push_top();
        }
        self.screen.index();
        self.after_event(false);
        Ok(())
    }

    fn reverse_index(&mut self) -> TermResult {
        self.before_event(false);
        if self.at_top_margin() {
            self.push_bottom();
        }
        self.screen.reverse_index();
        self.after_event(false);
        Ok(())
    }

    fn erase_in_display(&mut self, how: u32) -> TermResult {
        self.before_event(false);
        self.screen.erase_in_display(how);
        if how == 3 {
            self.reset_history();
        }
        self.after_event(false);
        Ok(())
    }

    fn reset(&mut self) -> TermResult {
        self.before_event(false);
        self.screen.reset();
        self.reset_history();
        self.after_event(false);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stream::{Listener, Stream};

    fn feed(screen: HistoryScreen, input: &str) -> HistoryScreen {
        let mut stream = Stream::new(screen);
        stream.feed(input).unwrap();
        stream.into_listener()
    }

    fn numbered_lines(n: usize) -> String {
        let mut out = String::new();
        for i in 0..n {
            if i > 0 {
                out.push_str("\r\n");
            }
            out.push_str(&format!("line{}", i));
        }
        out
    }

    #[test]
    fn scrolled_lines_land_in_the_top_history() {
        // 5-row screen fed 8 numbered rows: three scroll out
        let s = feed(HistoryScreen::new(10, 5), &numbered_lines(8));
        assert_eq!(s.history.top.len(), 3);
        assert_eq!(s.history.top[0].get(4).data, "0");
        assert_eq!(s.display()[0].trim(), "line3");
    }

    #[test]
    fn autowrap_also_feeds_the_history() {
        let s = feed(HistoryScreen::new(4, 2), "aaaabbbbcccc");
        assert_eq!(s.history.top.len(), 1);
        assert_eq!(s.history.top[0].get(0).data, "a");
        assert_eq!(s.display(), vec!["bbbb", "cccc"]);
    }

    #[test]
    fn history_is_bounded() {
        let s = feed(
            HistoryScreen::with_history(10, 2, 3, 0.5),
            &numbered_lines(20),
        );
        assert_eq!(s.history.top.len(), 3);
    }

    #[test]
    fn prev_then_next_page_restores_the_view() {
        let mut s = feed(HistoryScreen::new(10, 5), &numbered_lines(20));
        let before = s.display();
        s.prev_page();
        assert!(s.display() != before);
        assert!(s.history.position < s.history.size);
        s.next_page();
        assert_eq!(s.display(), before);
        assert_eq!(s.history.position, s.history.size);
    }

    #[test]
    fn paging_moves_ceil_of_ratio_lines() {
        let mut s = feed(HistoryScreen::new(10, 5), &numbered_lines(20));
        // ceil(5 * 0.5) = 3 lines per page
        let before = s.display();
        s.prev_page();
        let after = s.display();
        assert_eq!(after[3], before[0]);
        assert_eq!(after[0].trim(), "line12");
        assert_eq!(s.history.bottom.len(), 3);
    }

    #[test]
    fn cursor_hides_while_paged_up() {
        let mut s = feed(HistoryScreen::new(10, 5), &numbered_lines(20));
        assert!(!s.cursor.hidden);
        s.prev_page();
        assert!(s.cursor.hidden);
        s.next_page();
        assert!(!s.cursor.hidden);
    }

    #[test]
    fn ordinary_events_snap_back_to_the_bottom() {
        let mut s = feed(HistoryScreen::new(10, 5), &numbered_lines(20));
        let live = s.display();
        s.prev_page();
        s.prev_page();
        s = feed(s, "x");
        assert_eq!(s.history.position, s.history.size);
        assert_eq!(s.display()[0], live[0]);
    }

    #[test]
    fn reverse_index_feeds_the_bottom_history() {
        let mut s = feed(HistoryScreen::new(10, 3), "a\r\nb\r\nc");
        Listener::cursor_position(&mut s, 1, 1).unwrap();
        let mut stream = Stream::new(s);
        stream.feed("\x1bM").unwrap();
        s = stream.into_listener();
        assert_eq!(s.history.bottom.len(), 1);
        assert_eq!(s.history.bottom[0].get(0).data, "c");
    }

    #[test]
    fn erase_saved_lines_clears_the_history() {
        let mut s = feed(HistoryScreen::new(10, 3), &numbered_lines(10));
        assert!(!s.history.top.is_empty());
        s = feed(s, "\x1b[3J");
        assert!(s.history.top.is_empty());
        assert_eq!(s.history.position, s.history.size);
    }

    #[test]
    fn reset_clears_the_history() {
        let mut s = feed(HistoryScreen::new(10, 3), &numbered_lines(10));
        s.prev_page();
        s = feed(s, "\x1bc");
        assert!(s.history.top.is_empty());
        assert!(s.history.bottom.is_empty());
        assert_eq!(s.history.position, s.history.size);
    }

    #[test]
    fn unprintables_stop_a_drawn_run() {
        let s = feed(HistoryScreen::new(8, 2), "a\u{200d}b");
        assert_eq!(s.display()[0], "a       ");
    }

    #[test]
    fn prev_page_needs_enough_history() {
        let mut s = feed(HistoryScreen::new(10, 5), "just one line");
        let before = s.display();
        s.prev_page();
        assert_eq!(s.display(), before);
        assert_eq!(s.history.position, s.history.size);
    }
}
