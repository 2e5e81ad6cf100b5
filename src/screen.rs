//! The in-memory screen model: applies parser events to a cell buffer.

use std::cmp::{max, min};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::io;
use std::mem;

use slog::Logger;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use unicode_width::UnicodeWidthChar;

use cell::{Attrs, Char, Color};
use charsets::Charset;
use control;
use graphics;
use modes;
use stream::Listener;
use super::{build_logger, LogType, TermError, TermResult};

/// Screen cursor: position, the attributes new text is written with, and
/// visibility. `x == columns` is the pending-wrap position; every other
/// coordinate stays inside the display.
#[derive(Clone, Debug, PartialEq)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
    pub attrs: Char,
    pub hidden: bool,
}

impl Cursor {
    fn new(x: usize, y: usize) -> Cursor {
        Cursor {
            x: x,
            y: y,
            attrs: Char::default(),
            hidden: false,
        }
    }
}

/// Scrolling region, both rows inclusive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Margins {
    pub top: usize,
    pub bottom: usize,
}

/// One entry of the save/restore stack.
#[derive(Clone, Debug)]
struct Savepoint {
    cursor: Cursor,
    g0_charset: Charset,
    g1_charset: Charset,
    charset: usize,
    origin: bool,
    wrap: bool,
}

/// One screen row: a sparse column map over a per-line default cell.
/// Reading an absent column yields the default without materializing it.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub(crate) cells: HashMap<usize, Char>,
    pub(crate) default: Char,
}

impl Line {
    fn new(default: Char) -> Line {
        Line {
            cells: HashMap::new(),
            default: default,
        }
    }

    /// Cell at a column, explicit or default.
    pub fn get(&self, x: usize) -> &Char {
        self.cells.get(&x).unwrap_or(&self.default)
    }

    pub(crate) fn set(&mut self, x: usize, cell: Char) {
        self.cells.insert(x, cell);
    }

    /// Forget every cell at `limit` or beyond.
    pub(crate) fn drop_beyond(&mut self, limit: usize) {
        self.cells.retain(|&x, _| x < limit);
    }
}

/// The terminal model. Parser events arrive through the [`Listener`]
/// impl; the same operations are available as inherent methods for
/// driving a screen directly. `dirty` collects touched line indices and
/// is owned by the caller, which clears it after redrawing.
pub struct Screen {
    pub columns: usize,
    pub lines: usize,
    pub buffer: Vec<Line>,
    pub dirty: HashSet<usize>,
    pub cursor: Cursor,
    pub margins: Option<Margins>,
    pub mode: HashSet<u32>,
    pub tabstops: BTreeSet<usize>,
    pub title: String,
    pub icon_name: String,
    charset: usize,
    g0_charset: Charset,
    g1_charset: Charset,
    savepoints: Vec<Savepoint>,
    saved_columns: Option<usize>,
    process_input: Option<Box<dyn FnMut(&str) -> io::Result<()>>>,
    logger: Logger,
}

impl Screen {
    /// Create a screen with the given dimensions and no logging.
    pub fn new(columns: usize, lines: usize) -> Screen {
        Screen::with_logger(columns, lines, build_logger(&LogType::None))
    }

    pub fn with_logger(columns: usize, lines: usize, logger: Logger) -> Screen {
        let mut screen = Screen {
            columns: columns,
            lines: lines,
            buffer: Vec::new(),
            dirty: HashSet::new(),
            cursor: Cursor::new(0, 0),
            margins: None,
            mode: HashSet::new(),
            tabstops: BTreeSet::new(),
            title: String::new(),
            icon_name: String::new(),
            charset: 0,
            g0_charset: Charset::Latin1,
            g1_charset: Charset::Vt100Graphics,
            savepoints: Vec::new(),
            saved_columns: None,
            process_input: None,
            logger: logger,
        };
        screen.reset();
        screen
    }

    /// Default cell for the current screen mode; reverse-video mode flips
    /// every default.
    pub fn default_char(&self) -> Char {
        let mut ch = Char::default();
        if self.mode.contains(&modes::DECSCNM) {
            ch.flags.insert(Attrs::REVERSE);
        }
        ch
    }

    /// Install the callback that carries DA/DSR replies back to the host.
    /// It must not re-enter this screen.
    pub fn on_process_input<F>(&mut self, callback: F)
    where
        F: FnMut(&str) -> io::Result<()> + 'static,
    {
        self.process_input = Some(Box::new(callback));
    }

    /// Return the terminal to its initial state: cleared buffer, no
    /// margins, autowrap on, visible cursor at the origin, default
    /// charsets, tab stops every eight columns. The savepoint stack is
    /// left alone.
    pub fn reset(&mut self) {
        self.dirty.extend(0..self.lines);
        self.margins = None;
        self.mode.clear();
        self.mode.insert(modes::DECAWM);
        self.mode.insert(modes::DECTCEM);
        self.title.clear();
        self.icon_name.clear();
        self.charset = 0;
        self.g0_charset = Charset::Latin1;
        self.g1_charset = Charset::Vt100Graphics;
        self.tabstops = (8..self.columns).step_by(8).collect();
        let default = self.default_char();
        self.buffer = (0..self.lines).map(|_| Line::new(default.clone())).collect();
        self.cursor = Cursor::new(0, 0);
        self.cursor_position(0, 0);
        self.saved_columns = None;
    }

    /// Change dimensions. Extra lines are clipped from the top, extra
    /// columns from the right; the scrolling region resets either way.
    pub fn resize(&mut self, lines: usize, columns: usize) {
        let lines = if lines == 0 { self.lines } else { lines };
        let columns = if columns == 0 { self.columns } else { columns };
        if lines == self.lines && columns == self.columns {
            return;
        }
        self.dirty.extend(0..lines);

        if lines < self.lines {
            self.save_cursor();
            self.cursor_position(0, 0);
            self.delete_lines((self.lines - lines) as u32);
            self.restore_cursor();
            self.buffer.truncate(lines);
        } else if lines > self.lines {
            let default = self.default_char();
            for _ in self.lines..lines {
                self.buffer.push(Line::new(default.clone()));
            }
        }

        if columns < self.columns {
            for line in self.buffer.iter_mut() {
                line.drop_beyond(columns);
            }
        }

        self.lines = lines;
        self.columns = columns;
        self.margins = None;
        self.ensure_hbounds();
        self.ensure_vbounds(false);
    }

    pub(crate) fn scroll_region(&self) -> (usize, usize) {
        match self.margins {
            Some(m) => (m.top, m.bottom),
            None => (0, self.lines - 1),
        }
    }

    pub(crate) fn active_charset(&self) -> Charset {
        if self.charset == 1 {
            self.g1_charset
        } else {
            self.g0_charset
        }
    }

    /// Write a run of text at the cursor, honoring the active character
    /// set, autowrap, insert mode, and character widths.
    pub fn draw(&mut self, data: &str) {
        for input in data.chars() {
            let glyph = self.active_charset().translate(input);
            let width = glyph.width();

            // The previous draw filled the last column: wrap to the next
            // line, or overstrike it when autowrap is off.
            if self.cursor.x == self.columns {
                if self.mode.contains(&modes::DECAWM) {
                    self.dirty.insert(self.cursor.y);
                    self.carriage_return();
                    self.linefeed();
                } else if let Some(w) = width {
                    if w > 0 {
                        self.cursor.x = self.cursor.x.saturating_sub(w);
                    }
                }
            }

            // Insert mode pushes what's under the cursor to the right.
            if self.mode.contains(&modes::IRM) && width.unwrap_or(0) > 0 {
                self.insert_characters(width.unwrap_or(0) as u32);
            }

            let (x, y) = (self.cursor.x, self.cursor.y);
            match width {
                Some(1) => {
                    let cell = self.cursor.attrs.with_data(glyph);
                    self.buffer[y].set(x, cell);
                }
                Some(2) => {
                    // A two-cell character owns a stub slot after it.
                    let cell = self.cursor.attrs.with_data(glyph);
                    self.buffer[y].set(x, cell);
                    if x + 1 < self.columns {
                        let stub = self.cursor.attrs.with_text("");
                        self.buffer[y].set(x + 1, stub);
                    }
                }
                Some(0) if is_combining_mark(glyph) => {
                    // Combine with the previous cell, on this line or the
                    // last column of the line above.
                    if x > 0 {
                        let merged = compose(self.buffer[y].get(x - 1), glyph);
                        self.buffer[y].set(x - 1, merged);
                    } else if y > 0 {
                        let last = self.columns - 1;
                        let merged = compose(self.buffer[y - 1].get(last), glyph);
                        self.buffer[y - 1].set(last, merged);
                    }
                }
                // Unprintable and not advancing: stop drawing.
                _ => break,
            }

            if let Some(w) = width {
                if w > 0 {
                    self.cursor.x = min(self.cursor.x + w, self.columns);
                }
            }
        }
        self.dirty.insert(self.cursor.y);
    }

    pub fn carriage_return(&mut self) {
        self.cursor.x = 0;
    }

    /// Move down one line; at the bottom margin the region scrolls up
    /// instead.
    pub fn index(&mut self) {
        let (top, bottom) = self.scroll_region();
        if self.cursor.y == bottom {
            self.dirty.extend(0..self.lines);
            let blank = Line::new(self.default_char());
            self.buffer.remove(top);
            self.buffer.insert(bottom, blank);
        } else {
            self.cursor_down(1);
        }
    }

    /// Move up one line; at the top margin the region scrolls down.
    pub fn reverse_index(&mut self) {
        let (top, bottom) = self.scroll_region();
        if self.cursor.y == top {
            self.dirty.extend(0..self.lines);
            let blank = Line::new(self.default_char());
            self.buffer.remove(bottom);
            self.buffer.insert(top, blank);
        } else {
            self.cursor_up(1);
        }
    }

    pub fn linefeed(&mut self) {
        self.index();
        if self.mode.contains(&modes::LNM) {
            self.carriage_return();
        }
    }

    /// Jump to the next tab stop, or the last column when none remain.
    pub fn tab(&mut self) {
        let last = self.columns.saturating_sub(1);
        let column = self
            .tabstops
            .range(self.cursor.x + 1..)
            .next()
            .cloned()
            .unwrap_or(last);
        self.cursor.x = min(column, last);
    }

    pub fn backspace(&mut self) {
        self.cursor_back(1);
    }

    pub fn bell(&mut self) {}

    /// Push cursor, charset state, origin and wrap flags.
    pub fn save_cursor(&mut self) {
        self.savepoints.push(Savepoint {
            cursor: self.cursor.clone(),
            g0_charset: self.g0_charset,
            g1_charset: self.g1_charset,
            charset: self.charset,
            origin: self.mode.contains(&modes::DECOM),
            wrap: self.mode.contains(&modes::DECAWM),
        });
    }

    /// Pop the newest savepoint. With nothing saved, home the cursor and
    /// drop origin mode.
    pub fn restore_cursor(&mut self) {
        match self.savepoints.pop() {
            Some(savepoint) => {
                self.g0_charset = savepoint.g0_charset;
                self.g1_charset = savepoint.g1_charset;
                self.charset = savepoint.charset;
                if savepoint.origin {
                    self.set_mode(&[modes::DECOM], false);
                }
                if savepoint.wrap {
                    self.set_mode(&[modes::DECAWM], false);
                }
                self.cursor = savepoint.cursor;
                self.ensure_hbounds();
                self.ensure_vbounds(true);
            }
            None => {
                self.reset_mode(&[modes::DECOM], false);
                self.cursor_position(0, 0);
            }
        }
    }

    /// Insert blank lines at the cursor, pushing the rest of the region
    /// down. Outside the margins nothing happens.
    pub fn insert_lines(&mut self, count: u32) {
        let count = max(count, 1) as usize;
        let (top, bottom) = self.scroll_region();
        let y = self.cursor.y;
        if top <= y && y <= bottom {
            self.dirty.extend(y..self.lines);
            for _ in 0..min(count, bottom - y + 1) {
                let blank = Line::new(self.default_char());
                self.buffer.remove(bottom);
                self.buffer.insert(y, blank);
            }
            self.carriage_return();
        }
    }

    /// Delete lines at the cursor, pulling the rest of the region up.
    pub fn delete_lines(&mut self, count: u32) {
        let count = max(count, 1) as usize;
        let (top, bottom) = self.scroll_region();
        let y = self.cursor.y;
        if top <= y && y <= bottom {
            self.dirty.extend(y..self.lines);
            for _ in 0..min(count, bottom - y + 1) {
                let blank = Line::new(self.default_char());
                self.buffer.remove(y);
                self.buffer.insert(bottom, blank);
            }
            self.carriage_return();
        }
    }

    /// Shift the tail of the current line right, dropping what falls off.
    pub fn insert_characters(&mut self, count: u32) {
        let count = max(count, 1) as usize;
        self.dirty.insert(self.cursor.y);
        let (x0, columns) = (self.cursor.x, self.columns);
        let line = &mut self.buffer[self.cursor.y];
        let old = mem::replace(&mut line.cells, HashMap::new());
        for (x, cell) in old {
            if x < x0 {
                line.cells.insert(x, cell);
            } else if x + count <= columns {
                line.cells.insert(x + count, cell);
            }
        }
    }

    /// Pull the tail of the current line left over `count` deleted cells.
    pub fn delete_characters(&mut self, count: u32) {
        let count = max(count, 1) as usize;
        self.dirty.insert(self.cursor.y);
        let x0 = self.cursor.x;
        let line = &mut self.buffer[self.cursor.y];
        let old = mem::replace(&mut line.cells, HashMap::new());
        for (x, cell) in old {
            if x < x0 {
                line.cells.insert(x, cell);
            } else if x >= x0 + count {
                line.cells.insert(x - count, cell);
            }
        }
    }

    /// Blank `count` cells from the cursor on, keeping the cursor still.
    pub fn erase_characters(&mut self, count: u32) {
        let count = max(count, 1) as usize;
        self.dirty.insert(self.cursor.y);
        let blank = self.cursor.attrs.with_data(' ');
        let y = self.cursor.y;
        for x in self.cursor.x..min(self.cursor.x + count, self.columns) {
            self.buffer[y].set(x, blank.clone());
        }
    }

    /// Blank part of the current line: `0` cursor to end, `1` begin
    /// through cursor, `2` the whole line. Cells take the cursor
    /// attributes.
    pub fn erase_in_line(&mut self, how: u32) {
        self.dirty.insert(self.cursor.y);
        let interval = match how {
            0 => self.cursor.x..self.columns,
            1 => 0..self.cursor.x + 1,
            2 => 0..self.columns,
            _ => return,
        };
        let blank = self.cursor.attrs.with_data(' ');
        let y = self.cursor.y;
        for x in interval {
            self.buffer[y].set(x, blank.clone());
        }
    }

    /// Blank part of the display: `0` below the cursor, `1` above it,
    /// `2`/`3` everything. Only materialized cells are rewritten, so the
    /// sparse buffer stays sparse.
    pub fn erase_in_display(&mut self, how: u32) {
        let interval = match how {
            0 => self.cursor.y + 1..self.lines,
            1 => 0..self.cursor.y,
            2 | 3 => 0..self.lines,
            _ => return,
        };
        self.dirty.extend(interval.clone());
        let blank = self.cursor.attrs.with_data(' ');
        for y in interval {
            for cell in self.buffer[y].cells.values_mut() {
                *cell = blank.clone();
            }
        }
        if how == 0 || how == 1 {
            self.erase_in_line(how);
        }
    }

    pub fn set_tab_stop(&mut self) {
        self.tabstops.insert(self.cursor.x);
    }

    /// `0` drops the stop at the cursor, `3` drops them all.
    pub fn clear_tab_stop(&mut self, how: u32) {
        match how {
            0 => {
                let x = self.cursor.x;
                self.tabstops.remove(&x);
            }
            3 => self.tabstops.clear(),
            _ => {}
        }
    }

    fn ensure_hbounds(&mut self) {
        self.cursor.x = min(self.cursor.x, self.columns.saturating_sub(1));
    }

    fn ensure_vbounds(&mut self, use_margins: bool) {
        let (top, bottom) =
            if (use_margins || self.mode.contains(&modes::DECOM)) && self.margins.is_some() {
                self.scroll_region()
            } else {
                (0, self.lines.saturating_sub(1))
            };
        self.cursor.y = min(max(self.cursor.y, top), bottom);
    }

    pub fn cursor_up(&mut self, count: u32) {
        let (top, _) = self.scroll_region();
        let count = max(count, 1) as usize;
        self.cursor.y = max(self.cursor.y.saturating_sub(count), top);
    }

    pub fn cursor_down(&mut self, count: u32) {
        let (_, bottom) = self.scroll_region();
        let count = max(count, 1) as usize;
        self.cursor.y = min(self.cursor.y + count, bottom);
    }

    pub fn cursor_back(&mut self, count: u32) {
        // Sitting past the last column after a draw counts as one less.
        if self.cursor.x == self.columns {
            self.cursor.x -= 1;
        }
        self.cursor.x = self.cursor.x.saturating_sub(max(count, 1) as usize);
        self.ensure_hbounds();
    }

    pub fn cursor_forward(&mut self, count: u32) {
        self.cursor.x += max(count, 1) as usize;
        self.ensure_hbounds();
    }

    pub fn cursor_up1(&mut self, count: u32) {
        self.cursor_up(count);
        self.carriage_return();
    }

    pub fn cursor_down1(&mut self, count: u32) {
        self.cursor_down(count);
        self.carriage_return();
    }

    pub fn cursor_to_column(&mut self, column: u32) {
        self.cursor.x = (max(column, 1) - 1) as usize;
        self.ensure_hbounds();
    }

    pub fn cursor_to_line(&mut self, line: u32) {
        self.cursor.y = (max(line, 1) - 1) as usize;
        if self.mode.contains(&modes::DECOM) {
            if let Some(m) = self.margins {
                self.cursor.y += m.top;
            }
        }
        self.ensure_vbounds(false);
    }

    /// Absolute addressing, 1-based. With origin mode the line is
    /// relative to the top margin and may not leave the region.
    pub fn cursor_position(&mut self, line: u32, column: u32) {
        let column = (max(column, 1) - 1) as usize;
        let mut line = (max(line, 1) - 1) as usize;
        if self.mode.contains(&modes::DECOM) {
            if let Some(margins) = self.margins {
                line += margins.top;
                if !(margins.top <= line && line <= margins.bottom) {
                    return;
                }
            }
        }
        self.cursor.x = column;
        self.cursor.y = line;
        self.ensure_hbounds();
        self.ensure_vbounds(false);
    }

    /// DECSTBM. Arguments are 1-based; no arguments (or a zero top with
    /// no bottom) clears the region. Regions shorter than two lines are
    /// ignored, everything else is accepted and homes the cursor.
    pub fn set_margins(&mut self, top: u32, bottom: Option<u32>) {
        if top == 0 && bottom.is_none() {
            self.margins = None;
            return;
        }
        let current = self.margins.unwrap_or(Margins {
            top: 0,
            bottom: self.lines - 1,
        });
        let top = top.saturating_sub(1) as usize;
        let bottom = match bottom {
            None => current.bottom,
            Some(b) => min((max(b, 1) - 1) as usize, self.lines - 1),
        };
        if bottom > top {
            self.margins = Some(Margins {
                top: top,
                bottom: bottom,
            });
            // The cursor moves home when the scrolling region changes.
            self.cursor_position(0, 0);
        }
    }

    pub fn define_charset(&mut self, code: char, mode: char) {
        if let Some(charset) = Charset::from_code(code) {
            match mode {
                '(' => self.g0_charset = charset,
                ')' => self.g1_charset = charset,
                _ => {}
            }
        }
    }

    pub fn shift_out(&mut self) {
        self.charset = 1;
    }

    pub fn shift_in(&mut self) {
        self.charset = 0;
    }

    /// Set modes, shifting private codes first. DECCOLM, DECOM, DECSCNM
    /// and DECTCEM carry their side effects.
    pub fn set_mode(&mut self, mode_list: &[u32], private: bool) {
        let mut shifted: Vec<u32> = mode_list.to_vec();
        if private {
            for m in shifted.iter_mut() {
                *m <<= modes::PRIVATE_MODE_SHIFT;
            }
            if shifted.contains(&modes::DECSCNM) {
                self.dirty.extend(0..self.lines);
            }
        }
        for m in &shifted {
            self.mode.insert(*m);
        }

        // 132-column mode resizes, erases, and homes.
        if shifted.contains(&modes::DECCOLM) {
            self.saved_columns = Some(self.columns);
            self.resize(self.lines, 132);
            self.erase_in_display(2);
            self.cursor_position(0, 0);
        }

        // Origin mode homes the cursor.
        if shifted.contains(&modes::DECOM) {
            self.cursor_position(0, 0);
        }

        // Reverse video rewrites the whole display.
        if shifted.contains(&modes::DECSCNM) {
            let default = self.default_char();
            for line in self.buffer.iter_mut() {
                line.default = default.clone();
                for cell in line.cells.values_mut() {
                    cell.flags.insert(Attrs::REVERSE);
                }
            }
            self.select_graphic_rendition(&[7]);
        }

        if shifted.contains(&modes::DECTCEM) {
            self.cursor.hidden = false;
        }
    }

    /// Reset modes; the DECCOLM/DECOM/DECSCNM/DECTCEM side effects run in
    /// reverse.
    pub fn reset_mode(&mut self, mode_list: &[u32], private: bool) {
        let mut shifted: Vec<u32> = mode_list.to_vec();
        if private {
            for m in shifted.iter_mut() {
                *m <<= modes::PRIVATE_MODE_SHIFT;
            }
            if shifted.contains(&modes::DECSCNM) {
                self.dirty.extend(0..self.lines);
            }
        }
        for m in &shifted {
            self.mode.remove(m);
        }

        if shifted.contains(&modes::DECCOLM) {
            if self.columns == 132 {
                if let Some(columns) = self.saved_columns.take() {
                    self.resize(self.lines, columns);
                }
            }
            self.erase_in_display(2);
            self.cursor_position(0, 0);
        }

        if shifted.contains(&modes::DECOM) {
            self.cursor_position(0, 0);
        }

        if shifted.contains(&modes::DECSCNM) {
            let default = self.default_char();
            for line in self.buffer.iter_mut() {
                line.default = default.clone();
                for cell in line.cells.values_mut() {
                    cell.flags.remove(Attrs::REVERSE);
                }
            }
            self.select_graphic_rendition(&[27]);
        }

        if shifted.contains(&modes::DECTCEM) {
            self.cursor.hidden = true;
        }
    }

    /// Apply SGR parameters to the cursor attributes. An empty list (or a
    /// lone `0`) resets them; a truncated extended-color form silently
    /// ends the list.
    pub fn select_graphic_rendition(&mut self, attrs_list: &[u32]) {
        if attrs_list.is_empty() || attrs_list == [0] {
            self.cursor.attrs = self.default_char();
            return;
        }

        let mut attrs = self.cursor.attrs.clone();
        let mut it = attrs_list.iter().cloned();
        while let Some(code) = it.next() {
            if code == 0 {
                attrs = self.default_char();
            } else if let Some((flag, on)) = graphics::text(code) {
                if on {
                    attrs.flags.insert(flag);
                } else {
                    attrs.flags.remove(flag);
                }
            } else if let Some(color) = graphics::fg(code) {
                attrs.fg = color;
            } else if let Some(color) = graphics::bg(code) {
                attrs.bg = color;
            } else if code == graphics::FG_256 || code == graphics::BG_256 {
                let color = match it.next() {
                    Some(5) => match it.next() {
                        Some(n) => graphics::color_256(n),
                        None => break,
                    },
                    Some(2) => match (it.next(), it.next(), it.next()) {
                        (Some(r), Some(g), Some(b)) => {
                            Some(Color::Rgb(r as u8, g as u8, b as u8))
                        }
                        _ => break,
                    },
                    Some(_) => None,
                    None => break,
                };
                if let Some(color) = color {
                    if code == graphics::FG_256 {
                        attrs.fg = color;
                    } else {
                        attrs.bg = color;
                    }
                }
            }
            // Unknown codes are ignored.
        }
        self.cursor.attrs = attrs;
    }

    /// Fill the whole screen with `E`, keeping each cell's attributes.
    pub fn alignment_display(&mut self) {
        self.dirty.extend(0..self.lines);
        for line in self.buffer.iter_mut() {
            for x in 0..self.columns {
                let cell = line.get(x).with_data('E');
                line.set(x, cell);
            }
        }
    }

    pub fn set_title(&mut self, title: &str) {
        self.title.clear();
        self.title.push_str(title);
    }

    pub fn set_icon_name(&mut self, name: &str) {
        self.icon_name.clear();
        self.icon_name.push_str(name);
    }

    /// Primary DA request; anything else is left unanswered.
    pub fn report_device_attributes(&mut self, mode: u32, private: bool) -> TermResult {
        if mode == 0 && !private {
            let reply = format!("{}?6c", control::CSI);
            self.write_process_input(&reply)
        } else {
            Ok(())
        }
    }

    /// DSR: `5` answers "no malfunction", `6` reports the cursor, offset
    /// by the top margin under origin mode.
    pub fn report_device_status(&mut self, mode: u32) -> TermResult {
        match mode {
            5 => {
                let reply = format!("{}0n", control::CSI);
                self.write_process_input(&reply)
            }
            6 => {
                let x = self.cursor.x + 1;
                let mut y = self.cursor.y + 1;
                if self.mode.contains(&modes::DECOM) {
                    if let Some(m) = self.margins {
                        y -= m.top;
                    }
                }
                let reply = format!("{}{};{}R", control::CSI, y, x);
                self.write_process_input(&reply)
            }
            _ => Ok(()),
        }
    }

    /// Hand bytes back to the process driving the terminal; a no-op until
    /// a callback is installed.
    pub fn write_process_input(&mut self, data: &str) -> TermResult {
        match self.process_input {
            Some(ref mut deliver) => deliver(data).map_err(TermError::from),
            None => Ok(()),
        }
    }

    pub fn debug(&mut self, params: &[u32], private: bool, code: char) {
        warn!(
            self.logger,
            "[unhandled! (sequence)] code={:?}, params={:?}, private={:?}",
            code,
            params,
            private
        );
    }

    /// Render the screen as `lines` strings. The stub after a wide
    /// character contributes nothing to its line.
    pub fn display(&self) -> Vec<String> {
        (0..self.lines)
            .map(|y| {
                let line = &self.buffer[y];
                let mut rendered = String::with_capacity(self.columns);
                let mut x = 0;
                while x < self.columns {
                    let data = &line.get(x).data;
                    rendered.push_str(data);
                    let wide = data
                        .chars()
                        .next()
                        .map_or(false, |c| c.width() == Some(2));
                    x += if wide { 2 } else { 1 };
                }
                rendered
            })
            .collect()
    }
}

fn compose(base: &Char, mark: char) -> Char {
    let mut combined = base.data.clone();
    combined.push(mark);
    let normalized: String = combined.nfc().collect();
    base.with_text(&normalized)
}

impl Listener for Screen {
    fn draw(&mut self, data: &str) -> TermResult {
        self.draw(data);
        Ok(())
    }
    fn bell(&mut self) -> TermResult {
        self.bell();
        Ok(())
    }
    fn backspace(&mut self) -> TermResult {
        self.backspace();
        Ok(())
    }
    fn tab(&mut self) -> TermResult {
        self.tab();
        Ok(())
    }
    fn linefeed(&mut self) -> TermResult {
        self.linefeed();
        Ok(())
    }
    fn carriage_return(&mut self) -> TermResult {
        self.carriage_return();
        Ok(())
    }
    fn shift_out(&mut self) -> TermResult {
        self.shift_out();
        Ok(())
    }
    fn shift_in(&mut self) -> TermResult {
        self.shift_in();
        Ok(())
    }
    fn reset(&mut self) -> TermResult {
        self.reset();
        Ok(())
    }
    fn index(&mut self) -> TermResult {
        self.index();
        Ok(())
    }
    fn reverse_index(&mut self) -> TermResult {
        self.reverse_index();
        Ok(())
    }
    fn set_tab_stop(&mut self) -> TermResult {
        self.set_tab_stop();
        Ok(())
    }
    fn save_cursor(&mut self) -> TermResult {
        self.save_cursor();
        Ok(())
    }
    fn restore_cursor(&mut self) -> TermResult {
        self.restore_cursor();
        Ok(())
    }
    fn alignment_display(&mut self) -> TermResult {
        self.alignment_display();
        Ok(())
    }
    fn define_charset(&mut self, code: char, mode: char) -> TermResult {
        self.define_charset(code, mode);
        Ok(())
    }
    fn insert_characters(&mut self, count: u32) -> TermResult {
        self.insert_characters(count);
        Ok(())
    }
    fn cursor_up(&mut self, count: u32) -> TermResult {
        self.cursor_up(count);
        Ok(())
    }
    fn cursor_down(&mut self, count: u32) -> TermResult {
        self.cursor_down(count);
        Ok(())
    }
    fn cursor_forward(&mut self, count: u32) -> TermResult {
        self.cursor_forward(count);
        Ok(())
    }
    fn cursor_back(&mut self, count: u32) -> TermResult {
        self.cursor_back(count);
        Ok(())
    }
    fn cursor_down1(&mut self, count: u32) -> TermResult {
        self.cursor_down1(count);
        Ok(())
    }
    fn cursor_up1(&mut self, count: u32) -> TermResult {
        self.cursor_up1(count);
        Ok(())
    }
    fn cursor_to_column(&mut self, column: u32) -> TermResult {
        self.cursor_to_column(column);
        Ok(())
    }
    fn cursor_position(&mut self, line: u32, column: u32) -> TermResult {
        self.cursor_position(line, column);
        Ok(())
    }
    fn cursor_to_line(&mut self, line: u32) -> TermResult {
        self.cursor_to_line(line);
        Ok(())
    }
    fn erase_in_display(&mut self, how: u32) -> TermResult {
        self.erase_in_display(how);
        Ok(())
    }
    fn erase_in_line(&mut self, how: u32) -> TermResult {
        self.erase_in_line(how);
        Ok(())
    }
    fn insert_lines(&mut self, count: u32) -> TermResult {
        self.insert_lines(count);
        Ok(())
    }
    fn delete_lines(&mut self, count: u32) -> TermResult {
        self.delete_lines(count);
        Ok(())
    }
    fn delete_characters(&mut self, count: u32) -> TermResult {
        self.delete_characters(count);
        Ok(())
    }
    fn erase_characters(&mut self, count: u32) -> TermResult {
        self.erase_characters(count);
        Ok(())
    }
    fn clear_tab_stop(&mut self, how: u32) -> TermResult {
        self.clear_tab_stop(how);
        Ok(())
    }
    fn set_mode(&mut self, mode_list: &[u32], private: bool) -> TermResult {
        self.set_mode(mode_list, private);
        Ok(())
    }
    fn reset_mode(&mut self, mode_list: &[u32], private: bool) -> TermResult {
        self.reset_mode(mode_list, private);
        Ok(())
    }
    fn select_graphic_rendition(&mut self, attrs: &[u32]) -> TermResult {
        self.select_graphic_rendition(attrs);
        Ok(())
    }
    fn report_device_attributes(&mut self, mode: u32, private: bool) -> TermResult {
        self.report_device_attributes(mode, private)
    }
    fn report_device_status(&mut self, mode: u32, private: bool) -> TermResult {
        // Private DSR forms are not supported.
        if private {
            return Ok(());
        }
        self.report_device_status(mode)
    }
    fn set_margins(&mut self, top: u32, bottom: Option<u32>) -> TermResult {
        self.set_margins(top, bottom);
        Ok(())
    }
    fn set_title(&mut self, title: &str) -> TermResult {
        self.set_title(title);
        Ok(())
    }
    fn set_icon_name(&mut self, name: &str) -> TermResult {
        self.set_icon_name(name);
        Ok(())
    }
    fn debug(&mut self, params: &[u32], private: bool, code: char) -> TermResult {
        self.debug(params, private, code);
        Ok(())
    }
}
