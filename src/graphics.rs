//! Lookup tables for Select Graphic Rendition parameters.

use cell::{Attrs, Color};

/// Extended foreground color introducer (`38;5;n` / `38;2;r;g;b`).
pub const FG_256: u32 = 38;
/// Extended background color introducer.
pub const BG_256: u32 = 48;

static NAMED: [&'static str; 8] = [
    "black", "red", "green", "brown", "blue", "magenta", "cyan", "white",
];

static BRIGHT: [&'static str; 8] = [
    "brightblack",
    "brightred",
    "brightgreen",
    "brightbrown",
    "brightblue",
    "brightmagenta",
    "brightcyan",
    "brightwhite",
];

/// Text attribute codes: `(flag, true)` sets, `(flag, false)` clears.
pub fn text(code: u32) -> Option<(Attrs, bool)> {
    match code {
        1 => Some((Attrs::BOLD, true)),
        3 => Some((Attrs::ITALICS, true)),
        4 => Some((Attrs::UNDERSCORE, true)),
        5 => Some((Attrs::BLINK, true)),
        7 => Some((Attrs::REVERSE, true)),
        9 => Some((Attrs::STRIKETHROUGH, true)),
        22 => Some((Attrs::BOLD, false)),
        23 => Some((Attrs::ITALICS, false)),
        24 => Some((Attrs::UNDERSCORE, false)),
        25 => Some((Attrs::BLINK, false)),
        27 => Some((Attrs::REVERSE, false)),
        29 => Some((Attrs::STRIKETHROUGH, false)),
        _ => None,
    }
}

/// Foreground color for an SGR code, including the aixterm brights.
pub fn fg(code: u32) -> Option<Color> {
    match code {
        30..=37 => Some(Color::Named(NAMED[(code - 30) as usize])),
        39 => Some(Color::Default),
        90..=97 => Some(Color::Named(BRIGHT[(code - 90) as usize])),
        _ => None,
    }
}

/// Background color for an SGR code.
pub fn bg(code: u32) -> Option<Color> {
    match code {
        40..=47 => Some(Color::Named(NAMED[(code - 40) as usize])),
        49 => Some(Color::Default),
        100..=107 => Some(Color::Named(BRIGHT[(code - 100) as usize])),
        _ => None,
    }
}

// System colors of the 256-color palette (Pygments values).
static SYSTEM_256: [(u8, u8, u8); 16] = [
    (0x00, 0x00, 0x00),
    (0xcd, 0x00, 0x00),
    (0x00, 0xcd, 0x00),
    (0xcd, 0xcd, 0x00),
    (0x00, 0x00, 0xee),
    (0xcd, 0x00, 0xcd),
    (0x00, 0xcd, 0xcd),
    (0xe5, 0xe5, 0xe5),
    (0x7f, 0x7f, 0x7f),
    (0xff, 0x00, 0x00),
    (0x00, 0xff, 0x00),
    (0xff, 0xff, 0x00),
    (0x5c, 0x5c, 0xff),
    (0xff, 0x00, 0xff),
    (0x00, 0xff, 0xff),
    (0xff, 0xff, 0xff),
];

static CUBE_STEPS: [u8; 6] = [0x00, 0x5f, 0x87, 0xaf, 0xd7, 0xff];

/// Palette entry for `38;5;n` / `48;5;n`. The cube runs one entry long and
/// the gray ramp two short, so 254 and 255 fall off the table and return
/// `None`, leaving the color unchanged.
pub fn color_256(n: u32) -> Option<Color> {
    match n {
        0..=15 => {
            let (r, g, b) = SYSTEM_256[n as usize];
            Some(Color::Rgb(r, g, b))
        }
        16..=232 => {
            let i = (n - 16) as usize;
            Some(Color::Rgb(
                CUBE_STEPS[(i / 36) % 6],
                CUBE_STEPS[(i / 6) % 6],
                CUBE_STEPS[i % 6],
            ))
        }
        233..=253 => {
            let v = (8 + (n - 232) * 10) as u8;
            Some(Color::Rgb(v, v, v))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi_colors_resolve_by_name() {
        assert_eq!(fg(31), Some(Color::Named("red")));
        assert_eq!(fg(39), Some(Color::Default));
        assert_eq!(bg(44), Some(Color::Named("blue")));
        assert_eq!(fg(93), Some(Color::Named("brightbrown")));
        assert_eq!(bg(107), Some(Color::Named("brightwhite")));
        assert_eq!(fg(38), None);
    }

    #[test]
    fn palette_cube_and_ramp() {
        assert_eq!(color_256(1), Some(Color::Rgb(0xcd, 0x00, 0x00)));
        // first cube entry and one from the middle
        assert_eq!(color_256(16), Some(Color::Rgb(0x00, 0x00, 0x00)));
        assert_eq!(color_256(196), Some(Color::Rgb(0xff, 0x00, 0x00)));
        assert_eq!(color_256(233), Some(Color::Rgb(18, 18, 18)));
        assert_eq!(color_256(253), Some(Color::Rgb(218, 218, 218)));
        // out of table
        assert_eq!(color_256(254), None);
        assert_eq!(color_256(255), None);
        assert_eq!(color_256(1000), None);
    }

    #[test]
    fn attribute_codes_pair_up() {
        assert_eq!(text(1), Some((Attrs::BOLD, true)));
        assert_eq!(text(22), Some((Attrs::BOLD, false)));
        assert_eq!(text(9), Some((Attrs::STRIKETHROUGH, true)));
        assert_eq!(text(2), None);
    }
}
