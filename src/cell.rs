//! The styled cell value the screen buffer is made of.

use std::fmt;

bitflags! {
    /// Per-cell text attributes, set and cleared by SGR sequences.
    pub struct Attrs: u8 {
        const BOLD          = 0b000001;
        const ITALICS       = 0b000010;
        const UNDERSCORE    = 0b000100;
        const STRIKETHROUGH = 0b001000;
        const REVERSE       = 0b010000;
        const BLINK         = 0b100000;
    }
}

impl Default for Attrs {
    fn default() -> Attrs {
        Attrs::empty()
    }
}

/// A foreground or background color: the terminal default, one of the
/// named ANSI colors, or a 24-bit value shown as six hex digits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Color {
    Default,
    Named(&'static str),
    Rgb(u8, u8, u8),
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Color::Default => write!(f, "default"),
            Color::Named(name) => write!(f, "{}", name),
            Color::Rgb(r, g, b) => write!(f, "{:02x}{:02x}{:02x}", r, g, b),
        }
    }
}

/// A single screen cell. Values compare structurally and are treated as
/// immutable; the `with_*` methods build modified copies.
#[derive(Clone, Debug, PartialEq)]
pub struct Char {
    /// Displayed grapheme: one base code point plus any combining marks.
    /// The cell to the right of a wide character holds an empty stub.
    pub data: String,
    pub fg: Color,
    pub bg: Color,
    pub flags: Attrs,
}

impl Default for Char {
    fn default() -> Char {
        Char {
            data: " ".to_owned(),
            fg: Color::Default,
            bg: Color::Default,
            flags: Attrs::empty(),
        }
    }
}

impl Char {
    /// Copy with the grapheme replaced by a single code point.
    pub fn with_data(&self, data: char) -> Char {
        let mut new = self.clone();
        new.data.clear();
        new.data.push(data);
        new
    }

    /// Copy with the grapheme replaced by an arbitrary string (empty for
    /// wide-character stubs, multi-mark for combined graphemes).
    pub fn with_text(&self, data: &str) -> Char {
        let mut new = self.clone();
        new.data.clear();
        new.data.push_str(data);
        new
    }

    pub fn bold(&self) -> bool {
        self.flags.contains(Attrs::BOLD)
    }
    pub fn italics(&self) -> bool {
        self.flags.contains(Attrs::ITALICS)
    }
    pub fn underscore(&self) -> bool {
        self.flags.contains(Attrs::UNDERSCORE)
    }
    pub fn strikethrough(&self) -> bool {
        self.flags.contains(Attrs::STRIKETHROUGH)
    }
    pub fn reverse(&self) -> bool {
        self.flags.contains(Attrs::REVERSE)
    }
    pub fn blink(&self) -> bool {
        self.flags.contains(Attrs::BLINK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_char_is_a_plain_space() {
        let c = Char::default();
        assert_eq!(c.data, " ");
        assert_eq!(c.fg, Color::Default);
        assert_eq!(c.bg, Color::Default);
        assert!(!c.bold() && !c.reverse());
    }

    #[test]
    fn replace_produces_a_new_value() {
        let mut styled = Char::default();
        styled.fg = Color::Named("red");
        styled.flags = Attrs::BOLD | Attrs::BLINK;
        let replaced = styled.with_data('x');
        assert_eq!(replaced.data, "x");
        assert_eq!(replaced.fg, Color::Named("red"));
        assert!(replaced.bold() && replaced.blink());
        // the original is untouched
        assert_eq!(styled.data, " ");
    }

    #[test]
    fn colors_render_like_their_wire_form() {
        assert_eq!(Color::Default.to_string(), "default");
        assert_eq!(Color::Named("brightcyan").to_string(), "brightcyan");
        assert_eq!(Color::Rgb(0xff, 0x80, 0x00).to_string(), "ff8000");
    }
}
