//! Streaming ECMA-48 parser: turns host output into semantic events.
//!
//! [`Stream`] consumes decoded text one character at a time through an
//! explicit state machine and calls the matching [`Listener`] method;
//! runs of plain text between control characters are handed to
//! [`Listener::draw`] in bulk. [`ByteStream`] sits in front of it and
//! decodes raw bytes, either as incremental UTF-8 or one byte per code
//! point once `ESC % @` has switched UTF-8 off.

use std::cmp::min;
use std::str;

use control::{C0, C1};
use super::TermResult;

/// Receiver of the semantic events a [`Stream`] recognizes.
///
/// Every handler defaults to a no-op so small listeners stay small;
/// [`Screen`](::screen::Screen) implements the full set. Handlers return
/// [`TermResult`] so listeners that talk to the outside world can fail;
/// the parser re-initializes itself before propagating such an error, so
/// the stream stays usable afterwards.
pub trait Listener {
    /// A run of printable text.
    fn draw(&mut self, _data: &str) -> TermResult {
        Ok(())
    }

    fn bell(&mut self) -> TermResult {
        Ok(())
    }
    fn backspace(&mut self) -> TermResult {
        Ok(())
    }
    fn tab(&mut self) -> TermResult {
        Ok(())
    }
    fn linefeed(&mut self) -> TermResult {
        Ok(())
    }
    fn carriage_return(&mut self) -> TermResult {
        Ok(())
    }
    fn shift_out(&mut self) -> TermResult {
        Ok(())
    }
    fn shift_in(&mut self) -> TermResult {
        Ok(())
    }

    fn reset(&mut self) -> TermResult {
        Ok(())
    }
    fn index(&mut self) -> TermResult {
        Ok(())
    }
    fn reverse_index(&mut self) -> TermResult {
        Ok(())
    }
    fn set_tab_stop(&mut self) -> TermResult {
        Ok(())
    }
    fn save_cursor(&mut self) -> TermResult {
        Ok(())
    }
    fn restore_cursor(&mut self) -> TermResult {
        Ok(())
    }
    fn alignment_display(&mut self) -> TermResult {
        Ok(())
    }

    /// `ESC ( code` / `ESC ) code`; `mode` is the opening bracket.
    fn define_charset(&mut self, _code: char, _mode: char) -> TermResult {
        Ok(())
    }

    fn insert_characters(&mut self, _count: u32) -> TermResult {
        Ok(())
    }
    fn cursor_up(&mut self, _count: u32) -> TermResult {
        Ok(())
    }
    fn cursor_down(&mut self, _count: u32) -> TermResult {
        Ok(())
    }
    fn cursor_forward(&mut self, _count: u32) -> TermResult {
        Ok(())
    }
    fn cursor_back(&mut self, _count: u32) -> TermResult {
        Ok(())
    }
    fn cursor_down1(&mut self, _count: u32) -> TermResult {
        Ok(())
    }
    fn cursor_up1(&mut self, _count: u32) -> TermResult {
        Ok(())
    }
    fn cursor_to_column(&mut self, _column: u32) -> TermResult {
        Ok(())
    }
    fn cursor_position(&mut self, _line: u32, _column: u32) -> TermResult {
        Ok(())
    }
    fn cursor_to_line(&mut self, _line: u32) -> TermResult {
        Ok(())
    }
    fn erase_in_display(&mut self, _how: u32) -> TermResult {
        Ok(())
    }
    fn erase_in_line(&mut self, _how: u32) -> TermResult {
        Ok(())
    }
    fn insert_lines(&mut self, _count: u32) -> TermResult {
        Ok(())
    }
    fn delete_lines(&mut self, _count: u32) -> TermResult {
        Ok(())
    }
    fn delete_characters(&mut self, _count: u32) -> TermResult {
        Ok(())
    }
    fn erase_characters(&mut self, _count: u32) -> TermResult {
        Ok(())
    }
    fn clear_tab_stop(&mut self, _how: u32) -> TermResult {
        Ok(())
    }
    fn set_mode(&mut self, _modes: &[u32], _private: bool) -> TermResult {
        Ok(())
    }
    fn reset_mode(&mut self, _modes: &[u32], _private: bool) -> TermResult {
        Ok(())
    }
    fn select_graphic_rendition(&mut self, _attrs: &[u32]) -> TermResult {
        Ok(())
    }
    fn report_device_attributes(&mut self, _mode: u32, _private: bool) -> TermResult {
        Ok(())
    }
    fn report_device_status(&mut self, _mode: u32, _private: bool) -> TermResult {
        Ok(())
    }
    /// DECSTBM; `bottom` is absent when the sequence had a single
    /// parameter.
    fn set_margins(&mut self, _top: u32, _bottom: Option<u32>) -> TermResult {
        Ok(())
    }

    fn set_title(&mut self, _title: &str) -> TermResult {
        Ok(())
    }
    fn set_icon_name(&mut self, _name: &str) -> TermResult {
        Ok(())
    }

    /// Fallback for sequences with an unrecognized final character.
    fn debug(&mut self, _params: &[u32], _private: bool, _code: char) -> TermResult {
        Ok(())
    }
}

/// Largest value a CSI parameter can take; anything bigger is clamped.
const PARAM_LIMIT: u32 = 9999;

#[derive(Copy, Clone, Debug, PartialEq)]
enum State {
    Ground,
    Escape,
    Sharp,
    Percent,
    /// Inside `ESC (` / `ESC )`; holds the bracket.
    Charset(char),
    Csi,
    /// XTerm `$`-style sequence: swallow one character, then give up.
    CsiDollar,
    /// Right after the OSC introducer, expecting the command code.
    OscCode,
    /// Discarding the fixed-size set-palette parameter.
    OscPalette(u8),
    Osc,
    /// Saw `ESC` inside an OSC string, maybe the start of `ST`.
    OscEsc,
}

/// The parser. Owns its listener; use [`Stream::listener_mut`] to reach
/// the screen behind it.
pub struct Stream<L: Listener> {
    listener: L,
    state: State,
    params: Vec<u32>,
    current: u32,
    private: bool,
    osc_code: char,
    osc_param: String,
    use_utf8: bool,
}

fn is_special(c: char) -> bool {
    match c {
        C0::BEL | C0::BS | C0::HT | C0::LF | C0::VT | C0::FF | C0::CR | C0::SO
        | C0::SI | C0::ESC | C0::NUL | C0::DEL | C1::CSI | C1::OSC => true,
        _ => false,
    }
}

fn arg(params: &[u32], i: usize) -> u32 {
    params.get(i).cloned().unwrap_or(0)
}

impl<L: Listener> Stream<L> {
    pub fn new(listener: L) -> Stream<L> {
        Stream {
            listener: listener,
            state: State::Ground,
            params: Vec::new(),
            current: 0,
            private: false,
            osc_code: '\0',
            osc_param: String::new(),
            use_utf8: true,
        }
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn into_listener(self) -> L {
        self.listener
    }

    /// Whether `ESC % G`-style UTF-8 input is in effect.
    pub fn use_utf8(&self) -> bool {
        self.use_utf8
    }

    /// Feed a chunk of decoded text to the parser. On a listener error the
    /// parser drops back to its initial state before returning it.
    pub fn feed(&mut self, data: &str) -> TermResult {
        let mut offset = 0;
        while offset < data.len() {
            let step = if self.state == State::Ground {
                let rest = &data[offset..];
                match rest.char_indices().find(|&(_, c)| is_special(c)) {
                    Some((0, c)) => {
                        offset += c.len_utf8();
                        self.advance(c)
                    }
                    Some((i, _)) => {
                        let run = &rest[..i];
                        offset += i;
                        self.listener.draw(run)
                    }
                    None => {
                        offset = data.len();
                        self.listener.draw(rest)
                    }
                }
            } else {
                match data[offset..].chars().next() {
                    Some(c) => {
                        offset += c.len_utf8();
                        self.advance(c)
                    }
                    None => break,
                }
            };
            if let Err(err) = step {
                self.reinitialize();
                return Err(err);
            }
        }
        Ok(())
    }

    /// Drop any in-progress sequence. UTF-8 selection survives.
    fn reinitialize(&mut self) {
        self.state = State::Ground;
        self.params.clear();
        self.current = 0;
        self.private = false;
        self.osc_param.clear();
    }

    fn advance(&mut self, c: char) -> TermResult {
        match self.state {
            State::Ground => self.ground(c),
            State::Escape => self.escape(c),
            State::Sharp => {
                self.state = State::Ground;
                match c {
                    '8' => self.listener.alignment_display(),
                    _ => self.listener.debug(&[], false, c),
                }
            }
            State::Percent => {
                self.state = State::Ground;
                self.select_other_charset(c);
                Ok(())
            }
            State::Charset(mode) => {
                self.state = State::Ground;
                if self.use_utf8 {
                    // Charsets are a byte-oriented feature.
                    Ok(())
                } else {
                    self.listener.define_charset(c, mode)
                }
            }
            State::Csi => self.csi(c),
            State::CsiDollar => {
                self.state = State::Ground;
                Ok(())
            }
            State::OscCode => {
                match c {
                    // Palette reset and set are accepted and dropped; the
                    // set form carries a fixed seven-character parameter.
                    'R' => self.state = State::Ground,
                    'P' => self.state = State::OscPalette(7),
                    _ => {
                        self.osc_code = c;
                        self.osc_param.clear();
                        self.state = State::Osc;
                    }
                }
                Ok(())
            }
            State::OscPalette(left) => {
                self.state = if left > 1 {
                    State::OscPalette(left - 1)
                } else {
                    State::Ground
                };
                Ok(())
            }
            State::Osc => match c {
                C0::ESC => {
                    self.state = State::OscEsc;
                    Ok(())
                }
                C0::BEL | C1::ST => {
                    self.state = State::Ground;
                    self.dispatch_osc()
                }
                _ => {
                    self.osc_param.push(c);
                    Ok(())
                }
            },
            State::OscEsc => {
                if c == '\\' {
                    self.state = State::Ground;
                    self.dispatch_osc()
                } else {
                    // Not a terminator: keep both characters.
                    self.osc_param.push(C0::ESC);
                    self.osc_param.push(c);
                    self.state = State::Osc;
                    Ok(())
                }
            }
        }
    }

    fn ground(&mut self, c: char) -> TermResult {
        match c {
            C0::ESC => {
                self.state = State::Escape;
                Ok(())
            }
            C1::CSI => {
                self.enter_csi();
                Ok(())
            }
            C1::OSC => {
                self.state = State::OscCode;
                Ok(())
            }
            C0::NUL | C0::DEL => Ok(()),
            // Ignore shifts in UTF-8 mode.
            C0::SO | C0::SI if self.use_utf8 => Ok(()),
            _ if is_basic(c) => self.dispatch_basic(c),
            // Anything else is plain text that slipped past the fast path.
            _ => {
                let mut buf = [0u8; 4];
                self.listener.draw(c.encode_utf8(&mut buf))
            }
        }
    }

    fn escape(&mut self, c: char) -> TermResult {
        self.state = State::Ground;
        match c {
            '[' => {
                self.enter_csi();
                Ok(())
            }
            ']' => {
                self.state = State::OscCode;
                Ok(())
            }
            '#' => {
                self.state = State::Sharp;
                Ok(())
            }
            '%' => {
                self.state = State::Percent;
                Ok(())
            }
            '(' | ')' => {
                self.state = State::Charset(c);
                Ok(())
            }
            'c' => self.listener.reset(),
            'D' => self.listener.index(),
            'E' => self.listener.linefeed(),
            'H' => self.listener.set_tab_stop(),
            'M' => self.listener.reverse_index(),
            '7' => self.listener.save_cursor(),
            '8' => self.listener.restore_cursor(),
            _ => self.listener.debug(&[], false, c),
        }
    }

    fn enter_csi(&mut self) {
        self.state = State::Csi;
        self.params.clear();
        self.current = 0;
        self.private = false;
    }

    fn csi(&mut self, c: char) -> TermResult {
        match c {
            '?' => {
                self.private = true;
                Ok(())
            }
            // C0 controls embedded in a sequence take effect in-line.
            C0::BEL | C0::BS | C0::HT | C0::LF | C0::VT | C0::FF | C0::CR => {
                self.dispatch_basic(c)
            }
            // Secondary DA and intermediate space are not supported.
            C0::SP | '>' => Ok(()),
            C0::CAN | C0::SUB => {
                // The sequence is aborted and the offending character
                // shows up as text.
                self.state = State::Ground;
                let mut buf = [0u8; 4];
                self.listener.draw(c.encode_utf8(&mut buf))
            }
            '0'..='9' => {
                let digit = c as u32 - '0' as u32;
                self.current = self.current.saturating_mul(10).saturating_add(digit);
                Ok(())
            }
            '$' => {
                self.state = State::CsiDollar;
                Ok(())
            }
            ';' => {
                self.push_param();
                Ok(())
            }
            _ => {
                self.push_param();
                self.state = State::Ground;
                self.dispatch_csi(c)
            }
        }
    }

    fn push_param(&mut self) {
        self.params.push(min(self.current, PARAM_LIMIT));
        self.current = 0;
    }

    fn dispatch_csi(&mut self, code: char) -> TermResult {
        let private = self.private;
        match code {
            '@' => self.listener.insert_characters(arg(&self.params, 0)),
            'A' => self.listener.cursor_up(arg(&self.params, 0)),
            'B' | 'e' => self.listener.cursor_down(arg(&self.params, 0)),
            'C' | 'a' => self.listener.cursor_forward(arg(&self.params, 0)),
            'D' => self.listener.cursor_back(arg(&self.params, 0)),
            'E' => self.listener.cursor_down1(arg(&self.params, 0)),
            'F' => self.listener.cursor_up1(arg(&self.params, 0)),
            'G' | '`' => self.listener.cursor_to_column(arg(&self.params, 0)),
            'H' | 'f' => {
                let line = arg(&self.params, 0);
                let column = arg(&self.params, 1);
                self.listener.cursor_position(line, column)
            }
            'J' => self.listener.erase_in_display(arg(&self.params, 0)),
            'K' => self.listener.erase_in_line(arg(&self.params, 0)),
            'L' => self.listener.insert_lines(arg(&self.params, 0)),
            'M' => self.listener.delete_lines(arg(&self.params, 0)),
            'P' => self.listener.delete_characters(arg(&self.params, 0)),
            'X' => self.listener.erase_characters(arg(&self.params, 0)),
            'c' => self.listener.report_device_attributes(arg(&self.params, 0), private),
            'd' => self.listener.cursor_to_line(arg(&self.params, 0)),
            'g' => self.listener.clear_tab_stop(arg(&self.params, 0)),
            'h' => self.listener.set_mode(&self.params, private),
            'l' => self.listener.reset_mode(&self.params, private),
            'm' => self.listener.select_graphic_rendition(&self.params),
            'n' => self.listener.report_device_status(arg(&self.params, 0), private),
            'r' => {
                let top = arg(&self.params, 0);
                let bottom = self.params.get(1).cloned();
                self.listener.set_margins(top, bottom)
            }
            _ => self.listener.debug(&self.params, private, code),
        }
    }

    fn dispatch_osc(&mut self) -> TermResult {
        let code = self.osc_code;
        // Drop the separator between the code and the parameter.
        let param: String = {
            let mut chars = self.osc_param.chars();
            chars.next();
            chars.as_str().to_owned()
        };
        if code == '0' || code == '1' {
            self.listener.set_icon_name(&param)?;
        }
        if code == '0' || code == '2' {
            self.listener.set_title(&param)?;
        }
        Ok(())
    }

    fn dispatch_basic(&mut self, c: char) -> TermResult {
        match c {
            C0::BEL => self.listener.bell(),
            C0::BS => self.listener.backspace(),
            C0::HT => self.listener.tab(),
            C0::LF | C0::VT | C0::FF => self.listener.linefeed(),
            C0::CR => self.listener.carriage_return(),
            C0::SO => self.listener.shift_out(),
            C0::SI => self.listener.shift_in(),
            _ => Ok(()),
        }
    }

    /// `ESC % @` drops back to the byte-oriented charsets, `ESC % G` and
    /// `ESC % 8` re-enable UTF-8 input.
    fn select_other_charset(&mut self, code: char) {
        match code {
            '@' => self.use_utf8 = false,
            'G' | '8' => self.use_utf8 = true,
            _ => {}
        }
    }
}

fn is_basic(c: char) -> bool {
    match c {
        C0::BEL | C0::BS | C0::HT | C0::LF | C0::VT | C0::FF | C0::CR | C0::SO
        | C0::SI => true,
        _ => false,
    }
}

/// Byte-level front end for [`Stream`].
///
/// Decodes incrementally as UTF-8 with U+FFFD replacement, carrying
/// incomplete sequences over between feeds; once the stream has seen
/// `ESC % @`, every byte maps to the code point of the same value
/// instead.
pub struct ByteStream<L: Listener> {
    stream: Stream<L>,
    pending: Vec<u8>,
}

impl<L: Listener> ByteStream<L> {
    pub fn new(listener: L) -> ByteStream<L> {
        ByteStream {
            stream: Stream::new(listener),
            pending: Vec::new(),
        }
    }

    pub fn listener(&self) -> &L {
        self.stream.listener()
    }

    pub fn listener_mut(&mut self) -> &mut L {
        self.stream.listener_mut()
    }

    pub fn into_listener(self) -> L {
        self.stream.into_listener()
    }

    pub fn stream(&self) -> &Stream<L> {
        &self.stream
    }

    /// Decode and parse a chunk of bytes.
    pub fn feed(&mut self, data: &[u8]) -> TermResult {
        let text = if self.stream.use_utf8() {
            self.decode(data)
        } else {
            data.iter().map(|&b| b as char).collect()
        };
        let res = self.stream.feed(&text);
        if !self.stream.use_utf8() {
            // The chunk switched UTF-8 off; drop any half-received
            // sequence along with it.
            self.pending.clear();
        }
        res
    }

    fn decode(&mut self, data: &[u8]) -> String {
        let combined;
        let buf: &[u8] = if self.pending.is_empty() {
            data
        } else {
            let mut joined = Vec::with_capacity(self.pending.len() + data.len());
            joined.extend_from_slice(&self.pending);
            joined.extend_from_slice(data);
            self.pending.clear();
            combined = joined;
            &combined
        };

        let mut out = String::with_capacity(buf.len());
        let mut pos = 0;
        while pos < buf.len() {
            match str::from_utf8(&buf[pos..]) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(err) => {
                    let good = err.valid_up_to();
                    if let Ok(valid) = str::from_utf8(&buf[pos..pos + good]) {
                        out.push_str(valid);
                    }
                    pos += good;
                    match err.error_len() {
                        Some(bad) => {
                            out.push('\u{fffd}');
                            pos += bad;
                        }
                        None => {
                            // Incomplete tail; keep it for the next feed.
                            self.pending.extend_from_slice(&buf[pos..]);
                            break;
                        }
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TermError;
    use TermResult;

    /// Records every event it sees.
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        fail_on_bell: bool,
    }

    impl Listener for Recorder {
        fn draw(&mut self, data: &str) -> TermResult {
            self.events.push(format!("draw:{}", data));
            Ok(())
        }
        fn bell(&mut self) -> TermResult {
            if self.fail_on_bell {
                return Err(TermError::Listener("bell refused".to_owned()));
            }
            self.events.push("bell".to_owned());
            Ok(())
        }
        fn linefeed(&mut self) -> TermResult {
            self.events.push("linefeed".to_owned());
            Ok(())
        }
        fn carriage_return(&mut self) -> TermResult {
            self.events.push("carriage_return".to_owned());
            Ok(())
        }
        fn reset(&mut self) -> TermResult {
            self.events.push("reset".to_owned());
            Ok(())
        }
        fn save_cursor(&mut self) -> TermResult {
            self.events.push("save_cursor".to_owned());
            Ok(())
        }
        fn alignment_display(&mut self) -> TermResult {
            self.events.push("alignment_display".to_owned());
            Ok(())
        }
        fn define_charset(&mut self, code: char, mode: char) -> TermResult {
            self.events.push(format!("define_charset:{}:{}", code, mode));
            Ok(())
        }
        fn cursor_up(&mut self, count: u32) -> TermResult {
            self.events.push(format!("cursor_up:{}", count));
            Ok(())
        }
        fn cursor_position(&mut self, line: u32, column: u32) -> TermResult {
            self.events.push(format!("cursor_position:{}:{}", line, column));
            Ok(())
        }
        fn set_mode(&mut self, modes: &[u32], private: bool) -> TermResult {
            self.events.push(format!("set_mode:{:?}:{}", modes, private));
            Ok(())
        }
        fn select_graphic_rendition(&mut self, attrs: &[u32]) -> TermResult {
            self.events.push(format!("sgr:{:?}", attrs));
            Ok(())
        }
        fn set_margins(&mut self, top: u32, bottom: Option<u32>) -> TermResult {
            self.events.push(format!("set_margins:{}:{:?}", top, bottom));
            Ok(())
        }
        fn set_title(&mut self, title: &str) -> TermResult {
            self.events.push(format!("set_title:{}", title));
            Ok(())
        }
        fn set_icon_name(&mut self, name: &str) -> TermResult {
            self.events.push(format!("set_icon_name:{}", name));
            Ok(())
        }
        fn debug(&mut self, params: &[u32], private: bool, code: char) -> TermResult {
            self.events
                .push(format!("debug:{:?}:{}:{}", params, private, code));
            Ok(())
        }
    }

    fn feed(input: &str) -> Vec<String> {
        let mut stream = Stream::new(Recorder::default());
        stream.feed(input).unwrap();
        stream.into_listener().events
    }

    #[test]
    fn plain_text_is_drawn_in_bulk() {
        assert_eq!(feed("hello"), vec!["draw:hello"]);
    }

    #[test]
    fn text_runs_split_around_controls() {
        assert_eq!(
            feed("ab\rcd\nef"),
            vec!["draw:ab", "carriage_return", "draw:cd", "linefeed", "draw:ef"]
        );
    }

    #[test]
    fn escape_finals_dispatch() {
        assert_eq!(feed("\x1bc"), vec!["reset"]);
        assert_eq!(feed("\x1b7"), vec!["save_cursor"]);
        assert_eq!(feed("\x1b#8"), vec!["alignment_display"]);
    }

    #[test]
    fn unknown_escape_goes_to_debug() {
        assert_eq!(feed("\x1bZ"), vec!["debug:[]:false:Z"]);
    }

    #[test]
    fn csi_parameters_default_and_clamp() {
        assert_eq!(feed("\x1b[A"), vec!["cursor_up:0"]);
        assert_eq!(feed("\x1b[5A"), vec!["cursor_up:5"]);
        assert_eq!(feed("\x1b[123456A"), vec!["cursor_up:9999"]);
        assert_eq!(feed("\x1b[3;4H"), vec!["cursor_position:3:4"]);
        assert_eq!(feed("\x1b[;4H"), vec!["cursor_position:0:4"]);
    }

    #[test]
    fn csi_c1_form_works_too() {
        assert_eq!(feed("\u{9b}2A"), vec!["cursor_up:2"]);
    }

    #[test]
    fn private_marker_reaches_mode_events() {
        assert_eq!(feed("\x1b[?25h"), vec!["set_mode:[25]:true"]);
        assert_eq!(feed("\x1b[4h"), vec!["set_mode:[4]:false"]);
    }

    #[test]
    fn controls_inside_csi_dispatch_in_line() {
        assert_eq!(
            feed("\x1b[2\x07A"),
            vec!["bell", "cursor_up:2"]
        );
    }

    #[test]
    fn can_aborts_csi_and_draws() {
        assert_eq!(feed("\x1b[2\x18three"), vec!["draw:\u{18}", "draw:three"]);
        assert_eq!(feed("\x1b[2\x1athree"), vec!["draw:\u{1a}", "draw:three"]);
    }

    #[test]
    fn dollar_swallows_one_and_aborts() {
        assert_eq!(feed("\x1b[2$qB"), vec!["draw:B"]);
    }

    #[test]
    fn space_and_gt_are_skipped() {
        assert_eq!(feed("\x1b[>5A"), vec!["cursor_up:5"]);
        assert_eq!(feed("\x1b[ 5A"), vec!["cursor_up:5"]);
    }

    #[test]
    fn unknown_csi_final_goes_to_debug() {
        assert_eq!(feed("\x1b[1;2y"), vec!["debug:[1, 2]:false:y"]);
    }

    #[test]
    fn margins_report_missing_bottom() {
        assert_eq!(feed("\x1b[r"), vec!["set_margins:0:None"]);
        assert_eq!(feed("\x1b[1;24r"), vec!["set_margins:1:Some(24)"]);
    }

    #[test]
    fn sgr_collects_every_parameter() {
        assert_eq!(feed("\x1b[38;5;100m"), vec!["sgr:[38, 5, 100]"]);
    }

    #[test]
    fn osc_sets_title_and_icon_name() {
        assert_eq!(feed("\x1b]2;hello\x07"), vec!["set_title:hello"]);
        assert_eq!(feed("\x1b]1;icon\x07"), vec!["set_icon_name:icon"]);
        assert_eq!(
            feed("\x1b]0;both\x07"),
            vec!["set_icon_name:both", "set_title:both"]
        );
    }

    #[test]
    fn osc_accepts_st_terminators() {
        assert_eq!(feed("\x1b]2;a\u{9c}"), vec!["set_title:a"]);
        assert_eq!(feed("\x1b]2;b\x1b\\"), vec!["set_title:b"]);
    }

    #[test]
    fn osc_palette_codes_are_discarded() {
        assert_eq!(feed("\x1b]R"), Vec::<String>::new());
        assert_eq!(feed("\x1b]P0ffffffX"), vec!["draw:X"]);
    }

    #[test]
    fn charset_designation_is_skipped_in_utf8_mode() {
        assert_eq!(feed("\x1b(0"), Vec::<String>::new());
    }

    #[test]
    fn charset_designation_dispatches_after_utf8_off() {
        assert_eq!(
            feed("\x1b%@\x1b(0\x1b)B"),
            vec!["define_charset:0:(", "define_charset:B:)"]
        );
    }

    #[test]
    fn shifts_are_ignored_in_utf8_mode() {
        assert_eq!(feed("\x0e\x0f"), Vec::<String>::new());
    }

    #[test]
    fn listener_error_reinitializes_the_parser() {
        let mut recorder = Recorder::default();
        recorder.fail_on_bell = true;
        let mut stream = Stream::new(recorder);
        assert!(stream.feed("\x1b[5\x07A").is_err());
        // the aborted CSI is gone; the next feed parses from scratch
        stream.feed("\x1b[3A").unwrap();
        assert_eq!(
            stream.into_listener().events,
            vec!["cursor_up:3"]
        );
    }

    #[test]
    fn feeds_may_split_sequences_anywhere() {
        let mut stream = Stream::new(Recorder::default());
        stream.feed("\x1b").unwrap();
        stream.feed("[2").unwrap();
        stream.feed(";3H").unwrap();
        assert_eq!(stream.into_listener().events, vec!["cursor_position:2:3"]);
    }

    #[test]
    fn byte_stream_decodes_utf8_incrementally() {
        let mut stream = ByteStream::new(Recorder::default());
        let bytes = "héllo".as_bytes();
        stream.feed(&bytes[..2]).unwrap();
        stream.feed(&bytes[2..]).unwrap();
        let events = stream.into_listener().events;
        assert_eq!(events, vec!["draw:h", "draw:éllo"]);
    }

    #[test]
    fn byte_stream_replaces_invalid_bytes() {
        let mut stream = ByteStream::new(Recorder::default());
        stream.feed(b"a\xffb").unwrap();
        assert_eq!(
            stream.into_listener().events,
            vec!["draw:a\u{fffd}b"]
        );
    }

    #[test]
    fn byte_stream_maps_bytes_raw_without_utf8() {
        let mut stream = ByteStream::new(Recorder::default());
        stream.feed(b"\x1b%@").unwrap();
        stream.feed(b"\xc3\xa9").unwrap();
        // each byte becomes the Latin-1 code point of the same value
        assert_eq!(
            stream.into_listener().events,
            vec!["draw:\u{c3}\u{a9}"]
        );
    }
}
