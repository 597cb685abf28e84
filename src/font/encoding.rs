//! The `WinAnsiEncoding` and glyph names

use std::borrow::Cow;

/// Characters of the codes `0x80..=0x9F`
#[rustfmt::skip]
const WINANSI_HIGH: [Option<char>; 32] = [
    // 0x80
    Some('€'), None,      Some('‚'), Some('ƒ'), Some('„'), Some('…'), Some('†'), Some('‡'),
    Some('ˆ'), Some('‰'), Some('Š'), Some('‹'), Some('Œ'), None,      Some('Ž'), None,
    // 0x90
    None,      Some('‘'), Some('’'), Some('“'), Some('”'), Some('•'), Some('–'), Some('—'),
    Some('˜'), Some('™'), Some('š'), Some('›'), Some('œ'), None,      Some('ž'), Some('Ÿ'),
];

/// Glyph names of the codes `0x20..=0xFF`, empty where the code has no name
#[rustfmt::skip]
const WINANSI_NAMES: [&str; 224] = [
    // 0x20
    "space",         "exclam",        "quotedbl",       "numbersign",    "dollar",         "percent",      "ampersand",      "quotesingle",
    "parenleft",     "parenright",    "asterisk",       "plus",          "comma",          "hyphen",       "period",         "slash",
    // 0x30
    "zero",          "one",           "two",            "three",         "four",           "five",         "six",            "seven",
    "eight",         "nine",          "colon",          "semicolon",     "less",           "equal",        "greater",        "question",
    // 0x40
    "at",            "A",             "B",              "C",             "D",              "E",            "F",              "G",
    "H",             "I",             "J",              "K",             "L",              "M",            "N",              "O",
    // 0x50
    "P",             "Q",             "R",              "S",             "T",              "U",            "V",              "W",
    "X",             "Y",             "Z",              "bracketleft",   "backslash",      "bracketright", "asciicircum",    "underscore",
    // 0x60
    "grave",         "a",             "b",              "c",             "d",              "e",            "f",              "g",
    "h",             "i",             "j",              "k",             "l",              "m",            "n",              "o",
    // 0x70
    "p",             "q",             "r",              "s",             "t",              "u",            "v",              "w",
    "x",             "y",             "z",              "braceleft",     "bar",            "braceright",   "asciitilde",     "",
    // 0x80
    "Euro",          "",              "quotesinglbase", "florin",        "quotedblbase",   "ellipsis",     "dagger",         "daggerdbl",
    "circumflex",    "perthousand",   "Scaron",         "guilsinglleft", "OE",             "",             "Zcaron",         "",
    // 0x90
    "",              "quoteleft",     "quoteright",     "quotedblleft",  "quotedblright",  "bullet",       "endash",         "emdash",
    "tilde",         "trademark",     "scaron",         "guilsinglright","oe",             "",             "zcaron",         "Ydieresis",
    // 0xA0
    "",              "exclamdown",    "cent",           "sterling",      "currency",       "yen",          "brokenbar",      "section",
    "dieresis",      "copyright",     "ordfeminine",    "guillemotleft", "logicalnot",     "",             "registered",     "macron",
    // 0xB0
    "degree",        "plusminus",     "twosuperior",    "threesuperior", "acute",          "mu",           "paragraph",      "periodcentered",
    "cedilla",       "onesuperior",   "ordmasculine",   "guillemotright","onequarter",     "onehalf",      "threequarters",  "questiondown",
    // 0xC0
    "Agrave",        "Aacute",        "Acircumflex",    "Atilde",        "Adieresis",      "Aring",        "AE",             "Ccedilla",
    "Egrave",        "Eacute",        "Ecircumflex",    "Edieresis",     "Igrave",         "Iacute",       "Icircumflex",    "Idieresis",
    // 0xD0
    "Eth",           "Ntilde",        "Ograve",         "Oacute",        "Ocircumflex",    "Otilde",       "Odieresis",      "multiply",
    "Oslash",        "Ugrave",        "Uacute",         "Ucircumflex",   "Udieresis",      "Yacute",       "Thorn",          "germandbls",
    // 0xE0
    "agrave",        "aacute",        "acircumflex",    "atilde",        "adieresis",      "aring",        "ae",             "ccedilla",
    "egrave",        "eacute",        "ecircumflex",    "edieresis",     "igrave",         "iacute",       "icircumflex",    "idieresis",
    // 0xF0
    "eth",           "ntilde",        "ograve",         "oacute",        "ocircumflex",    "otilde",       "odieresis",      "divide",
    "oslash",        "ugrave",        "uacute",         "ucircumflex",   "udieresis",      "yacute",       "thorn",          "ydieresis",
];

/// Get the `WinAnsiEncoding` code of a character
///
/// Only codes with a glyph name count: the control characters, `0x7F`, the
/// duplicate space at `0xA0` and the soft hyphen at `0xAD` are not used.
pub fn winansi_code(chr: char) -> Option<u8> {
    match u32::from(chr) {
        0x20..=0x7E | 0xA1..=0xAC | 0xAE..=0xFF => Some(chr as u8),
        _ => WINANSI_HIGH
            .iter()
            .position(|c| *c == Some(chr))
            .map(|i| 0x80 + i as u8),
    }
}

/// Get the character for a `WinAnsiEncoding` code
pub fn winansi_char(code: u8) -> Option<char> {
    match code {
        0x20..=0x7E | 0xA1..=0xAC | 0xAE..=0xFF => Some(char::from(code)),
        0x80..=0x9F => WINANSI_HIGH[usize::from(code - 0x80)],
        _ => None,
    }
}

/// Get the glyph name for a character
///
/// Characters of the base encoding use its names, everything else uses
/// `uniXXXX` (or `uXXXXXX` outside of the BMP).
pub fn glyph_name(chr: char) -> Cow<'static, str> {
    if let Some(code) = winansi_code(chr) {
        let name = WINANSI_NAMES[usize::from(code - 0x20)];
        if !name.is_empty() {
            return Cow::Borrowed(name);
        }
    }
    let cp = u32::from(chr);
    if cp <= 0xFFFF {
        Cow::Owned(format!("uni{:04X}", cp))
    } else {
        Cow::Owned(format!("u{:06X}", cp))
    }
}
