//! Display-name cleanup for catalog records.

/// Glyphs removed from product names.
const STRIPPED_GLYPHS: [char; 4] = ['\u{2122}', '\u{00AE}', '\u{00A9}', '\u{FFFD}'];

/// UTF-8 encodings of the stripped glyphs that were decoded as Windows-1252
/// somewhere upstream (`™` → `â„¢`, `®` → `Â®`, `©` → `Â©`).
const MOJIBAKE: [&str; 3] = ["\u{00E2}\u{201E}\u{00A2}", "\u{00C2}\u{00AE}", "\u{00C2}\u{00A9}"];

/// Normalize a product name for display.
///
/// Strips trademark/copyright glyphs, replacement characters and their
/// mis-decoded forms, collapses whitespace runs to a single space and trims.
pub fn normalize_name(raw: &str) -> String {
    let mut cleaned = raw.to_string();
    for seq in MOJIBAKE {
        if cleaned.contains(seq) {
            cleaned = cleaned.replace(seq, "");
        }
    }
    cleaned.retain(|c| !STRIPPED_GLYPHS.contains(&c));

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trademark_glyphs() {
        assert_eq!(normalize_name("Acme™ Widget®"), "Acme Widget");
        assert_eq!(normalize_name("©2024 Guide"), "2024 Guide");
    }

    #[test]
    fn strips_replacement_and_mojibake() {
        assert_eq!(normalize_name("Caf\u{FFFD} Blend"), "Caf Blend");
        assert_eq!(normalize_name("Ultimate\u{00E2}\u{201E}\u{00A2} EFA"), "Ultimate EFA");
        assert_eq!(normalize_name("Beyond Tangy Tangerine\u{00C2}\u{00AE} 2.0"), "Beyond Tangy Tangerine 2.0");
    }

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(normalize_name("  Pure \t\n Fiber   Blend  "), "Pure Fiber Blend");
        assert_eq!(normalize_name("Osteo ™ FX"), "Osteo FX");
    }

    #[test]
    fn glyph_only_name_becomes_empty() {
        assert_eq!(normalize_name(" ™ ® "), "");
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: output never contains stripped glyphs or double spaces.
            #[test]
            fn output_is_clean(raw in "[A-Za-z0-9 \t™®©\u{FFFD}]{0,60}") {
                let out = normalize_name(&raw);
                for glyph in STRIPPED_GLYPHS {
                    prop_assert!(!out.contains(glyph));
                }
                prop_assert!(!out.contains("  "));
                prop_assert_eq!(out.trim(), out.as_str());
            }

            /// Property: normalizing twice changes nothing.
            #[test]
            fn is_idempotent(raw in "[A-Za-z0-9 ™®©\u{FFFD}\u{00C2}\u{00E2}]{0,60}") {
                let once = normalize_name(&raw);
                prop_assert_eq!(normalize_name(&once), once.clone());
            }
        }
    }
}
