use encoding_rs::{UTF_8, WINDOWS_1252};
use log::debug;
use unicode_normalization::UnicodeNormalization;

pub const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

/// Decodes raw CUE bytes, recovering sheets written with a Windows code page.
///
/// UTF-8 wins unless Windows-1252 produces strictly fewer replacement
/// characters. The result is NFC normalized either way.
pub fn decode_cue_bytes(bytes: &[u8]) -> String {
    let (utf8_text, _) = UTF_8.decode_with_bom_removal(bytes);
    let utf8_replacements = count_replacements(&utf8_text);

    if utf8_replacements == 0 {
        return utf8_text.nfc().collect();
    }

    let (win_text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    let win_replacements = count_replacements(&win_text);

    debug!(
        "CUE is not clean UTF-8 ({utf8_replacements} replacement chars), windows-1252 yields {win_replacements}"
    );

    if win_replacements < utf8_replacements {
        win_text.nfc().collect()
    } else {
        utf8_text.nfc().collect()
    }
}

fn count_replacements(text: &str) -> usize {
    text.chars().filter(|c| *c == REPLACEMENT_CHARACTER).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_utf8_is_kept() {
        let text = "TITLE \"Café del Mar\"\nPERFORMER \"Sigur Rós\"";
        assert_eq!(decode_cue_bytes(text.as_bytes()), text);
    }

    #[test]
    fn utf8_is_nfc_normalized() {
        // "e" followed by a combining acute accent
        let decomposed = "Cafe\u{0301}";
        assert_eq!(decode_cue_bytes(decomposed.as_bytes()), "Caf\u{00E9}");
    }

    #[test]
    fn utf8_bom_is_dropped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"REM DATE 1999");
        assert_eq!(decode_cue_bytes(&bytes), "REM DATE 1999");
    }

    #[test]
    fn literal_replacement_chars_survive_in_windows_1252_bytes() {
        // EF BF BD is valid UTF-8 for U+FFFD, so the UTF-8 decode has one
        // replacement char and the single byte decode has none
        let bytes = "x\u{FFFD}".as_bytes();
        assert_eq!(decode_cue_bytes(bytes), "x\u{00EF}\u{00BF}\u{00BD}");
    }

    #[test]
    fn windows_1252_is_used_when_utf8_breaks() {
        // "Café – Don’t" encoded as windows-1252
        let bytes = b"Caf\xE9 \x96 Don\x92t";
        assert_eq!(decode_cue_bytes(bytes), "Café – Don’t");
    }
}
