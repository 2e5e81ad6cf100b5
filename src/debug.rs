//! A listener that logs every event as a JSON line instead of drawing.

use std::io::{self, Write};

use serde_json::{self, Value};

use stream::Listener;
use super::{TermError, TermResult};

/// Stand-in listener: every event becomes a `["name", [args], {kwargs}]`
/// JSON line on the sink, one event per line. With a non-empty `only`
/// filter, unlisted events turn into silent no-ops.
pub struct DebugScreen<W: Write> {
    to: W,
    only: Vec<String>,
}

impl DebugScreen<io::Stderr> {
    /// Log to standard error.
    pub fn new() -> DebugScreen<io::Stderr> {
        DebugScreen::to_sink(io::stderr())
    }
}

impl Default for DebugScreen<io::Stderr> {
    fn default() -> DebugScreen<io::Stderr> {
        DebugScreen::new()
    }
}

impl<W: Write> DebugScreen<W> {
    pub fn to_sink(to: W) -> DebugScreen<W> {
        DebugScreen {
            to: to,
            only: Vec::new(),
        }
    }

    /// Restrict logging to the named events.
    pub fn only(mut self, events: &[&str]) -> DebugScreen<W> {
        self.only = events.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn sink(&self) -> &W {
        &self.to
    }

    pub fn into_inner(self) -> W {
        self.to
    }

    fn log(&mut self, name: &str, args: Value, kwargs: Value) -> TermResult {
        if !self.only.is_empty() && !self.only.iter().any(|e| e == name) {
            return Ok(());
        }
        let line =
            serde_json::to_string(&json!([name, args, kwargs])).map_err(TermError::from)?;
        writeln!(self.to, "{}", line).map_err(TermError::from)
    }
}

// Log an event with its positional arguments and no keywords.
macro_rules! logged {
    ($( fn $name:ident ( $( $arg:ident : $ty:ty ),* ); )*) => {
        $(
            fn $name(&mut self, $( $arg : $ty ),*) -> TermResult {
                self.log(stringify!($name), json!([$( $arg ),*]), json!({}))
            }
        )*
    };
}

impl<W: Write> Listener for DebugScreen<W> {
    logged! {
        fn draw(data: &str);
        fn bell();
        fn backspace();
        fn tab();
        fn linefeed();
        fn carriage_return();
        fn shift_out();
        fn shift_in();
        fn reset();
        fn index();
        fn reverse_index();
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
        fn erase_in_display(how: u32);
        fn erase_in_line(how: u32);
        fn insert_lines(count: u32);
        fn delete_lines(count: u32);
        fn delete_characters(count: u32);
        fn erase_characters(count: u32);
        fn clear_tab_stop(how: u32);
        fn set_margins(top: u32, bottom: Option<u32>);
        fn set_title(title: &str);
        fn set_icon_name(name: &str);
    }

    // Parameter lists are logged flat, and the private flag travels as a
    // keyword.

    fn select_graphic_rendition(&mut self, attrs: &[u32]) -> TermResult {
        self.log("select_graphic_rendition", json!(attrs), json!({}))
    }

    fn set_mode(&mut self, mode_list: &[u32], private: bool) -> TermResult {
        self.log("set_mode", json!(mode_list), json!({ "private": private }))
    }

    fn reset_mode(&mut self, mode_list: &[u32], private: bool) -> TermResult {
        self.log("reset_mode", json!(mode_list), json!({ "private": private }))
    }

    fn report_device_attributes(&mut self, mode: u32, private: bool) -> TermResult {
        self.log(
            "report_device_attributes",
            json!([mode]),
            json!({ "private": private }),
        )
    }

    fn report_device_status(&mut self, mode: u32, private: bool) -> TermResult {
        self.log(
            "report_device_status",
            json!([mode]),
            json!({ "private": private }),
        )
    }

    fn debug(&mut self, params: &[u32], private: bool, code: char) -> TermResult {
        self.log(
            "debug",
            json!(params),
            json!({ "private": private, "code": code }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stream::Stream;

    fn logged_lines(input: &str, only: &[&str]) -> Vec<String> {
        let screen = DebugScreen::to_sink(Vec::new()).only(only);
        let mut stream = Stream::new(screen);
        stream.feed(input).unwrap();
        let bytes = stream.into_listener().into_inner();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|l| l.to_owned())
            .collect()
    }

    #[test]
    fn events_become_json_lines() {
        let lines = logged_lines("a\x1b[5A", &[]);
        assert_eq!(lines[0], r#"["draw",["a"],{}]"#);
        assert_eq!(lines[1], r#"["cursor_up",[5],{}]"#);
    }

    #[test]
    fn private_flag_is_a_keyword() {
        let lines = logged_lines("\x1b[?25;7h", &[]);
        assert_eq!(lines, vec![r#"["set_mode",[25,7],{"private":true}]"#]);
    }

    #[test]
    fn only_filter_silences_other_events() {
        let lines = logged_lines("ab\x1b[H\x1b[5A", &["cursor_up"]);
        assert_eq!(lines, vec![r#"["cursor_up",[5],{}]"#]);
    }

    #[test]
    fn parameter_lists_log_flat() {
        let lines = logged_lines("\x1b[38;5;100m", &[]);
        assert_eq!(
            lines,
            vec![r#"["select_graphic_rendition",[38,5,100],{}]"#]
        );
    }

    #[test]
    fn margins_serialize_their_optional_bottom() {
        let lines = logged_lines("\x1b[1;5r\x1b[r", &[]);
        assert_eq!(lines[0], r#"["set_margins",[1,5],{}]"#);
        assert_eq!(lines[1], r#"["set_margins",[0,null],{}]"#);
    }
}
