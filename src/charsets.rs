//! Character set translation tables, selected with `ESC (` / `ESC )`.

/// One of the four translation tables a G slot can reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Charset {
    /// Latin-1 identity table (`B`).
    Latin1,
    /// VT100 special graphics and line drawing (`0`).
    Vt100Graphics,
    /// IBM codepage 437 (`U`).
    IbmPc,
    /// VAX42 Cyrillic variant, KOI-7 N2 layout (`V`).
    Vax42,
}

// Columns 5 through 7 of the VT100 special graphics set (0x5f..=0x7e).
static VT100_GRAPHICS: [char; 32] = [
    ' ', '◆', '▒', '␉', '␌', '␍', '␊', '°', '±', '␤', '␋', '┘', '┐', '┌',
    '└', '┼', '⎺', '⎻', '─', '⎼', '⎽', '├', '┤', '┴', '┬', '│', '≤', '≥',
    'π', '≠', '£', '·',
];

// CP437 pictures for the control range (0x01..=0x1f).
static CP437_CONTROL: [char; 31] = [
    '☺', '☻', '♥', '♦', '♣', '♠', '•', '◘', '○', '◙', '♂', '♀', '♪', '♫',
    '☼', '►', '◄', '↕', '‼', '¶', '§', '▬', '↨', '↑', '↓', '→', '←', '∟',
    '↔', '▲', '▼',
];

// CP437 upper half (0x80..=0xff).
static CP437_HIGH: [char; 128] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì',
    'Ä', 'Å', 'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢',
    '£', '¥', '₧', 'ƒ', 'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐',
    '¬', '½', '¼', '¡', '«', '»', '░', '▒', '▓', '│', '┤', '╡', '╢', '╖',
    '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐', '└', '┴', '┬', '├', '─', '┼',
    '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧', '╨', '╤', '╥', '╙',
    '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀', 'α', 'ß',
    'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩',
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²',
    '■', '\u{a0}',
];

// KOI-7 N2 Cyrillic over columns 4 and 5 (0x40..=0x5e) ...
static VAX42_UPPER: [char; 31] = [
    'Ю', 'А', 'Б', 'Ц', 'Д', 'Е', 'Ф', 'Г', 'Х', 'И', 'Й', 'К', 'Л', 'М',
    'Н', 'О', 'П', 'Я', 'Р', 'С', 'Т', 'У', 'Ж', 'В', 'Ь', 'Ы', 'З', 'Ш',
    'Э', 'Щ', 'Ч',
];

// ... and columns 6 and 7 (0x60..=0x7e).
static VAX42_LOWER: [char; 31] = [
    'ю', 'а', 'б', 'ц', 'д', 'е', 'ф', 'г', 'х', 'и', 'й', 'к', 'л', 'м',
    'н', 'о', 'п', 'я', 'р', 'с', 'т', 'у', 'ж', 'в', 'ь', 'ы', 'з', 'ш',
    'э', 'щ', 'ч',
];

impl Charset {
    /// Table for a `define_charset` code; unsupported codes yield `None`
    /// and leave the G slot as it was.
    pub fn from_code(code: char) -> Option<Charset> {
        match code {
            'B' => Some(Charset::Latin1),
            '0' => Some(Charset::Vt100Graphics),
            'U' => Some(Charset::IbmPc),
            'V' => Some(Charset::Vax42),
            _ => None,
        }
    }

    /// Translate one code point. Only the first 256 are remapped; anything
    /// above passes through untouched.
    pub fn translate(&self, c: char) -> char {
        if c as u32 > 0xff {
            return c;
        }
        let b = c as u8;
        match *self {
            Charset::Latin1 => c,
            Charset::Vt100Graphics => match b {
                0x5f..=0x7e => VT100_GRAPHICS[(b - 0x5f) as usize],
                _ => c,
            },
            Charset::IbmPc => match b {
                0x01..=0x1f => CP437_CONTROL[(b - 0x01) as usize],
                0x7f => '⌂',
                0x80..=0xff => CP437_HIGH[(b - 0x80) as usize],
                _ => c,
            },
            Charset::Vax42 => match b {
                0x40..=0x5e => VAX42_UPPER[(b - 0x40) as usize],
                0x60..=0x7e => VAX42_LOWER[(b - 0x60) as usize],
                _ => c,
            },
        }
    }
}
