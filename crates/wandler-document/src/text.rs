// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Small text helpers shared by the converters: control-character cleanup,
// char-safe truncation, and the case predicates used by heading detection.

/// Strip NUL and C0 control characters, then collapse every run of
/// whitespace into a single space.
///
/// Tab, newline and carriage return survive the first pass only to be
/// folded into spaces by the second.
pub fn sanitize(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !(*c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r')))
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep at most `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Titlecase letters (general category Lt): digraphs such as "ǅ" and the
/// Greek letters with prosgegrammeni. `char` has no predicate for these and
/// reports them as neither upper nor lower case.
fn is_titlecase(c: char) -> bool {
    matches!(
        c,
        '\u{01C5}'
            | '\u{01C8}'
            | '\u{01CB}'
            | '\u{01F2}'
            | '\u{1F88}'..='\u{1F8F}'
            | '\u{1F98}'..='\u{1F9F}'
            | '\u{1FA8}'..='\u{1FAF}'
            | '\u{1FBC}'
            | '\u{1FCC}'
            | '\u{1FFC}'
    )
}

/// True when the text has at least one uppercase character and no lowercase
/// or titlecase ones ("SECTION 2", "FAQ").
pub fn is_upper(text: &str) -> bool {
    text.chars().any(char::is_uppercase)
        && !text.chars().any(|c| c.is_lowercase() || is_titlecase(c))
}

/// True when every word starts with an uppercase or titlecase letter
/// followed only by lowercase letters ("Quarterly Results 2024", "ǅemal").
///
/// An uppercase or titlecase letter may only follow an uncased character; a
/// lowercase letter may only follow a cased one. At least one cased
/// character is required.
pub fn is_title(text: &str) -> bool {
    let mut saw_cased = false;
    let mut previous_cased = false;

    for c in text.chars() {
        if c.is_uppercase() || is_titlecase(c) {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            saw_cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            saw_cased = true;
        } else {
            previous_cased = false;
        }
    }

    saw_cased
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_drops_controls_and_folds_whitespace() {
        assert_eq!(sanitize("  Hello\x00\x07 \t world\n\nagain\x1f "), "Hello world again");
        assert_eq!(sanitize("\x0b\x0c"), "");
        assert_eq!(sanitize("déjà\u{a0}vu"), "déjà vu");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn upper_case_detection() {
        assert!(is_upper("INTRODUCTION"));
        assert!(is_upper("PART 2: GOALS"));
        assert!(!is_upper("Introduction"));
        assert!(!is_upper("2024"));
    }

    #[test]
    fn title_case_detection() {
        assert!(is_title("Quarterly Results"));
        assert!(is_title("Part 2 Of The Plan"));
        assert!(!is_title("Quarterly results"));
        assert!(!is_title("McDonald Farm"));
        assert!(!is_title("1234"));
        assert!(is_title("A"));
    }

    #[test]
    fn titlecase_digraphs_count_as_cased() {
        assert!(!is_upper("\u{01C5}"));
        assert!(!is_upper("\u{01C5}AB"));
        assert!(is_upper("\u{01C4}AB"));
        assert!(is_title("\u{01C5}emal"));
        assert!(is_title("\u{01C5}"));
        assert!(!is_title("A\u{01C5}"));
        assert!(!is_title("\u{01C5}\u{01C5}"));
    }
}
