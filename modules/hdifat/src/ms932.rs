//! Abridged MS932 (Shift-JIS superset) code page tables.
//!
//! DOS directory entries on these images carry names in MS932: ASCII and
//! JIS X 0201 half-width katakana as single bytes, everything else as a
//! lead/trail byte pair. The full code page is enormous; this table
//! carries the rows the toolkit needs: full-width punctuation, digits,
//! Latin, hiragana and katakana, a vendor Latin-1 block at lead 0x86,
//! and a private block at lead 0xE5.

/// Whether `byte` opens a two-byte MS932 sequence.
pub fn is_lead_byte(byte: u8) -> bool {
    matches!(byte, 0x81..=0x9F | 0xE0..=0xFC)
}

/// A run of consecutive double-byte codes mapping to consecutive code
/// points. Runs never cross the invalid 0x7F trail byte.
struct Run {
    ms_first: u16,
    ms_last: u16,
    uni_first: u32,
}

const RUNS: &[Run] = &[
    // Ideographic space and the two kuten punctuation marks.
    Run { ms_first: 0x8140, ms_last: 0x8142, uni_first: 0x3000 },
    // Full-width digits.
    Run { ms_first: 0x824F, ms_last: 0x8258, uni_first: 0xFF10 },
    // Full-width Latin capitals and smalls.
    Run { ms_first: 0x8260, ms_last: 0x8279, uni_first: 0xFF21 },
    Run { ms_first: 0x8281, ms_last: 0x829A, uni_first: 0xFF41 },
    // Hiragana.
    Run { ms_first: 0x829F, ms_last: 0x82F1, uni_first: 0x3041 },
    // Katakana, split around the 0x7F trail gap.
    Run { ms_first: 0x8340, ms_last: 0x837E, uni_first: 0x30A1 },
    Run { ms_first: 0x8380, ms_last: 0x8396, uni_first: 0x30E0 },
    // Vendor Latin-1 supplement rows.
    Run { ms_first: 0x8640, ms_last: 0x865F, uni_first: 0x00C0 },
    Run { ms_first: 0x8680, ms_last: 0x869F, uni_first: 0x00E0 },
    // Vendor private block, kept aligned with the private use area.
    Run { ms_first: 0xE540, ms_last: 0xE57E, uni_first: 0xE540 },
];

/// Double-byte codes that sit outside any contiguous run.
const PAIRS: &[(u16, u32)] = &[
    (0x8143, 0xFF0C), // ，
    (0x8144, 0xFF0E), // ．
    (0x8145, 0x30FB), // ・
    (0x8146, 0xFF1A), // ：
    (0x8147, 0xFF1B), // ；
    (0x8148, 0xFF1F), // ？
    (0x8149, 0xFF01), // ！
    (0x815B, 0x30FC), // ー
    (0x815E, 0xFF0F), // ／
    (0x8169, 0xFF08), // （
    (0x816A, 0xFF09), // ）
    (0x8175, 0x300C), // 「
    (0x8176, 0x300D), // 」
    (0x817C, 0xFF0D), // －
    (0x8190, 0xFF04), // ＄
    (0x8193, 0xFF05), // ％
    (0x8194, 0xFF03), // ＃
    (0x8195, 0xFF06), // ＆
    (0x8196, 0xFF0A), // ＊
    (0x8197, 0xFF20), // ＠
];

/// Map a Unicode code point to its MS932 code, if the table carries it.
pub fn unicode_to_ms932(unicode: u32) -> Option<u16> {
    if unicode < 0x80 {
        return Some(unicode as u16);
    }
    if (0xFF61..=0xFF9F).contains(&unicode) {
        return Some(0xA1 + (unicode - 0xFF61) as u16);
    }
    for run in RUNS {
        let span = (run.ms_last - run.ms_first) as u32;
        if unicode >= run.uni_first && unicode <= run.uni_first + span {
            return Some(run.ms_first + (unicode - run.uni_first) as u16);
        }
    }
    PAIRS
        .iter()
        .find(|(_, uni)| *uni == unicode)
        .map(|(ms, _)| *ms)
}

/// Map an MS932 code to its Unicode code point, if the table carries it.
pub fn ms932_to_unicode(ms: u16) -> Option<u32> {
    if ms < 0x80 {
        return Some(ms as u32);
    }
    if (0xA1..=0xDF).contains(&ms) {
        return Some(0xFF61 + (ms - 0xA1) as u32);
    }
    for run in RUNS {
        if ms >= run.ms_first && ms <= run.ms_last {
            return Some(run.uni_first + (ms - run.ms_first) as u32);
        }
    }
    PAIRS
        .iter()
        .find(|(code, _)| *code == ms)
        .map(|(_, uni)| *uni)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_identity() {
        for byte in 0u32..0x80 {
            assert_eq!(unicode_to_ms932(byte), Some(byte as u16));
            assert_eq!(ms932_to_unicode(byte as u16), Some(byte));
        }
    }

    #[test]
    fn halfwidth_katakana_single_byte() {
        // ｱ
        assert_eq!(unicode_to_ms932(0xFF71), Some(0xB1));
        assert_eq!(ms932_to_unicode(0xB1), Some(0xFF71));
        assert!(!is_lead_byte(0xB1));
    }

    #[test]
    fn fullwidth_and_kana_round_trip() {
        for &uni in &[0x3000u32, 0xFF21, 0xFF5A, 0x3042, 0x30A2, 0x30F6, 0x30FC] {
            let ms = unicode_to_ms932(uni).unwrap();
            assert!(is_lead_byte((ms >> 8) as u8));
            assert_eq!(ms932_to_unicode(ms), Some(uni));
        }
    }

    #[test]
    fn latin_supplement_rows() {
        // Ä
        assert_eq!(unicode_to_ms932(0xC4), Some(0x8644));
        assert_eq!(ms932_to_unicode(0x8644), Some(0xC4));
        // ä
        assert_eq!(unicode_to_ms932(0xE4), Some(0x8684));
        assert_eq!(ms932_to_unicode(0x8684), Some(0xE4));
    }

    #[test]
    fn private_block_uses_deleted_lead() {
        assert_eq!(unicode_to_ms932(0xE540), Some(0xE540));
        assert_eq!(ms932_to_unicode(0xE540), Some(0xE540));
        assert!(is_lead_byte(0xE5));
    }

    #[test]
    fn unmapped_code_points_fail() {
        assert_eq!(unicode_to_ms932(0x4E00), None);
        assert_eq!(ms932_to_unicode(0x9F40), None);
        assert_eq!(ms932_to_unicode(0x80), None);
        assert_eq!(ms932_to_unicode(0xE0), None);
    }
}
