//! Control characters the parser recognizes and the introducer the screen
//! uses when replying to the host.

/// C0 set of 7-bit control characters (from ANSI X3.4-1977).
#[allow(non_snake_case)]
pub mod C0 {
    /// Null filler, terminal should ignore this character.
    pub const NUL: char = '\x00';
    /// Bell, triggers the bell, buzzer, or beeper on the terminal.
    pub const BEL: char = '\x07';
    /// Backspace, can be used to define overstruck characters.
    pub const BS: char = '\x08';
    /// Horizontal Tabulation, move to next predetermined position.
    pub const HT: char = '\x09';
    /// Linefeed, move to same position on next line (see also NL).
    pub const LF: char = '\x0a';
    /// Vertical Tabulation, move to next predetermined line.
    pub const VT: char = '\x0b';
    /// Form Feed, move to next form or page.
    pub const FF: char = '\x0c';
    /// Carriage Return, move to first character of current line.
    pub const CR: char = '\x0d';
    /// Shift Out, switch to G1 (other half of character set).
    pub const SO: char = '\x0e';
    /// Shift In, switch to G0 (normal half of character set).
    pub const SI: char = '\x0f';
    /// Cancel (makes VT100 abort current escape sequence if any).
    pub const CAN: char = '\x18';
    /// Substitute (VT100 uses this to display parity errors).
    pub const SUB: char = '\x1a';
    /// Prefix to an escape sequence.
    pub const ESC: char = '\x1b';
    /// Space.
    pub const SP: char = ' ';
    /// Delete, should be ignored by terminal.
    pub const DEL: char = '\x7f';
}

/// C1 set of 8-bit control characters (from ANSI X3.64-1979).
#[allow(non_snake_case)]
pub mod C1 {
    /// Control Sequence Introducer.
    pub const CSI: char = '\u{9b}';
    /// String Terminator (VT125 exits graphics).
    pub const ST: char = '\u{9c}';
    /// Operating System Command (reprograms intelligent terminal).
    pub const OSC: char = '\u{9d}';
}

/// Two-character CSI introducer used in replies sent back to the host.
pub const CSI: &'static str = "\x1b[";
