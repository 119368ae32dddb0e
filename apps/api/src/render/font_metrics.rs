//! Glyph-width tables for the two standard PDF fonts used on the cover page.
//!
//! Widths are the published Helvetica / Helvetica-Bold AFM advances in
//! thousandths of an em, for WinAnsi codes 0x20..=0x7E.
//! Index = (byte as usize) - 32.
//!
//! The standard 14 fonts are never embedded, so centering text means measuring
//! it against these tables the same way a viewer will lay it out.

// ────────────────────────────────────────────────────────────────────────────
// Font enum
// ────────────────────────────────────────────────────────────────────────────

/// Standard (non-embedded) Type1 fonts referenced by the roadmap document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    /// Cover subtitle (role name).
    Helvetica,
    /// Cover title.
    HelveticaBold,
}

impl StandardFont {
    /// PostScript name written into the font dictionary's `BaseFont`.
    pub fn base_font(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Resource name the content streams use to select this font.
    pub fn resource_name(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "F1",
            StandardFont::HelveticaBold => "F2",
        }
    }

    fn table(self) -> &'static [u16; 95] {
        match self {
            StandardFont::Helvetica => &HELVETICA_WIDTHS,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Advance width of already-encoded WinAnsi bytes, in points at `size_pt`.
    ///
    /// Bytes outside the printable ASCII table fall back to `FALLBACK_WIDTH`.
    pub fn measure_encoded(self, encoded: &[u8], size_pt: f32) -> f32 {
        let table = self.table();
        let thousandths: u32 = encoded
            .iter()
            .map(|&b| {
                if (0x20..=0x7E).contains(&b) {
                    table[(b - 0x20) as usize] as u32
                } else {
                    FALLBACK_WIDTH as u32
                }
            })
            .sum();
        thousandths as f32 * size_pt / 1000.0
    }

    /// Advance width of `text` as it will be rendered, in points at `size_pt`.
    pub fn measure(self, text: &str, size_pt: f32) -> f32 {
        self.measure_encoded(&encode_win_ansi(text), size_pt)
    }
}

/// Width used for Latin-1 supplement glyphs, which the tables don't cover.
const FALLBACK_WIDTH: u16 = 556;

/// Encodes `text` for a font using `/WinAnsiEncoding`.
///
/// Printable ASCII and the Latin-1 supplement map one-to-one; anything else
/// (control characters, CJK, emoji) becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            code @ 0x20..=0x7E => code as u8,
            code @ 0xA0..=0xFF => code as u8,
            _ => b'?',
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 printable ASCII characters each)
// ────────────────────────────────────────────────────────────────────────────

#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 95] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0    1    2    3    4    5    6    7    8    9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // :    ;    <    =    >    ?    @
    278, 278, 584, 584, 584, 556, 1015,
    // A    B    C    D    E    F    G    H    I    J    K    L    M
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [    \    ]    ^    _    `
    278, 278, 278, 469, 556, 333,
    // a    b    c    d    e    f    g    h    i    j    k    l    m
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    // n    o    p    q    r    s    t    u    v    w    x    y    z
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // {    |    }    ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0    1    2    3    4    5    6    7    8    9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // :    ;    <    =    >    ?    @
    333, 333, 584, 584, 584, 611, 975,
    // A    B    C    D    E    F    G    H    I    J    K    L    M
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [    \    ]    ^    _    `
    333, 278, 333, 584, 556, 333,
    // a    b    c    d    e    f    g    h    i    j    k    l    m
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    // n    o    p    q    r    s    t    u    v    w    x    y    z
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    // {    |    }    ~
    389, 280, 389, 584,
];

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_empty_is_zero() {
        assert_eq!(StandardFont::Helvetica.measure("", 14.0), 0.0);
    }

    #[test]
    fn test_measure_known_word() {
        // "HTML" in Helvetica = 722 + 611 + 833 + 556 = 2722 thousandths
        let width = StandardFont::Helvetica.measure("HTML", 10.0);
        assert!((width - 27.22).abs() < 1e-3, "got {width}");
    }

    #[test]
    fn test_bold_wider_than_regular() {
        let text = "Roadmap by Carvia";
        assert!(
            StandardFont::HelveticaBold.measure(text, 20.0)
                > StandardFont::Helvetica.measure(text, 20.0)
        );
    }

    #[test]
    fn test_width_scales_with_size() {
        let small = StandardFont::Helvetica.measure("Frontend Engineer", 7.0);
        let large = StandardFont::Helvetica.measure("Frontend Engineer", 14.0);
        assert!((large - 2.0 * small).abs() < 1e-3);
    }

    #[test]
    fn test_encode_win_ansi_passes_ascii_and_latin1() {
        assert_eq!(encode_win_ansi("C++ é"), vec![b'C', b'+', b'+', b' ', 0xE9]);
    }

    #[test]
    fn test_encode_win_ansi_replaces_unmappable() {
        assert_eq!(encode_win_ansi("a\u{4e2d}\n"), b"a??".to_vec());
    }

    #[test]
    fn test_latin1_uses_fallback_width() {
        let width = StandardFont::Helvetica.measure("é", 1000.0);
        assert_eq!(width, FALLBACK_WIDTH as f32);
    }
}
