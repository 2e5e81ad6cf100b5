//! Terminal mode codes, stored in the screen's mode set as plain integers.
//!
//! Private (DEC) modes share a code space with the public ANSI modes, so
//! they are kept shifted left by [`PRIVATE_MODE_SHIFT`] bits; the parser
//! reports the raw code plus a `private` flag and the screen shifts before
//! inserting. The shifted values never collide with public codes.

/// How many bits private mode codes are shifted by.
pub const PRIVATE_MODE_SHIFT: u32 = 5;

/// *Line Feed/New Line Mode*: when set, linefeed implies carriage return.
pub const LNM: u32 = 20;

/// *Insert/Replace Mode*
///
/// * `CSI 4 h` change to insert mode
/// * `CSI 4 l` reset to replacement mode
pub const IRM: u32 = 4;

/// *Text Cursor Enable Mode*: determines cursor visibility (`?25`).
pub const DECTCEM: u32 = 25 << PRIVATE_MODE_SHIFT;

/// *Screen Mode*: reverse-video display (`?5`).
pub const DECSCNM: u32 = 5 << PRIVATE_MODE_SHIFT;

/// *Origin Mode*: cursor addressing relative to the scroll region (`?6`).
pub const DECOM: u32 = 6 << PRIVATE_MODE_SHIFT;

/// *Auto Wrap Mode*: continue on the next line past the last column (`?7`).
pub const DECAWM: u32 = 7 << PRIVATE_MODE_SHIFT;

/// Select 80 or 132 columns per page (`?3`).
///
/// * `CSI ? 3 h` -> set 132 column font
/// * `CSI ? 3 l` -> reset 80 column font
///
/// Additionally the screen is erased, the margins reset, and the cursor
/// moved to the home position.
pub const DECCOLM: u32 = 3 << PRIVATE_MODE_SHIFT;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_codes_never_collide_with_public_ones() {
        let private = [DECTCEM, DECSCNM, DECOM, DECAWM, DECCOLM];
        for code in private.iter() {
            assert!(*code != LNM && *code != IRM);
            assert!(*code >= 1 << PRIVATE_MODE_SHIFT);
        }
    }
}
