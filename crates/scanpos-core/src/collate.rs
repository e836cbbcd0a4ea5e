//! # Collation
//!
//! Name ordering that behaves like a locale-aware string compare for
//! Vietnamese and other Latin-script names.
//!
//! ## Comparison Levels
//! ```text
//! Level 1  base letters     "Bánh" ≈ "banh"  (accents, case and đ/d ignored)
//! Level 2  accents          "banh" < "bánh"  (unaccented first)
//! Level 3  case             "bia"  < "Bia"   (lowercase first)
//! Level 4  code points      tie-break so the order is total
//! ```
//!
//! Plain code point order would put every accented name after "z"
//! ("Ổi" after "Xoài"); level 1 keeps "Ổi" next to "Ot".

use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Precomputed sort key for one string. Compare keys instead of strings
/// when the same value takes part in many comparisons.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    primary: String,
    secondary: String,
    tertiary: Vec<bool>,
    raw: String,
}

impl CollationKey {
    pub fn new(s: &str) -> Self {
        let mut primary = String::with_capacity(s.len());
        let mut secondary = String::with_capacity(s.len());
        let mut tertiary = Vec::with_capacity(s.len());

        for ch in s.nfd() {
            tertiary.push(ch.is_uppercase());
            for lower in ch.to_lowercase() {
                secondary.push(lower);
                if is_combining_mark(lower) {
                    continue;
                }
                primary.push(fold_base(lower));
            }
        }

        CollationKey {
            primary,
            secondary,
            tertiary,
            raw: s.to_string(),
        }
    }
}

/// Letters that carry their diacritic as part of the code point and so
/// survive canonical decomposition.
fn fold_base(ch: char) -> char {
    match ch {
        'đ' => 'd',
        'ø' => 'o',
        'ł' => 'l',
        _ => ch,
    }
}

/// Compares two names.
///
/// ```rust
/// use std::cmp::Ordering;
/// use scanpos_core::collate::compare;
///
/// assert_eq!(compare("Bánh", "Bia"), Ordering::Less);
/// assert_eq!(compare("Đậu", "Dưa"), Ordering::Less);
/// assert_eq!(compare("Ổi", "Xoài"), Ordering::Less);
/// ```
pub fn compare(a: &str, b: &str) -> Ordering {
    CollationKey::new(a).cmp(&CollationKey::new(b))
}

/// Lowercases `s` for case-insensitive substring search.
pub fn fold_case(s: &str) -> String {
    s.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut names: Vec<&str>) -> Vec<&str> {
        names.sort_by(|a, b| compare(a, b));
        names
    }

    #[test]
    fn test_accents_do_not_push_names_to_the_end() {
        assert_eq!(
            sorted(vec!["Xoài", "Ổi", "Bia", "Bánh mì", "Cà phê"]),
            vec!["Bánh mì", "Bia", "Cà phê", "Ổi", "Xoài"]
        );
    }

    #[test]
    fn test_d_with_stroke_sorts_with_d() {
        assert_eq!(sorted(vec!["Dứa", "Em", "Đào", "Chuối"]), vec!["Chuối", "Đào", "Dứa", "Em"]);
    }

    #[test]
    fn test_unaccented_before_accented() {
        assert_eq!(compare("banh", "bánh"), Ordering::Less);
        assert_eq!(compare("bánh", "banh"), Ordering::Greater);
    }

    #[test]
    fn test_case_is_a_late_tie_break() {
        assert_eq!(compare("bia", "Bia"), Ordering::Less);
        assert_eq!(compare("Bia", "bib"), Ordering::Less);
    }

    #[test]
    fn test_precomposed_and_decomposed_are_equal_up_to_raw() {
        let precomposed = "b\u{00E1}nh";
        let decomposed = "ba\u{0301}nh";
        let a = CollationKey::new(precomposed);
        let b = CollationKey::new(decomposed);
        assert_eq!(a.primary, b.primary);
        assert_eq!(a.secondary, b.secondary);
        assert_eq!(compare(precomposed, precomposed), Ordering::Equal);
    }

    #[test]
    fn test_fold_case() {
        assert_eq!(fold_case("BIA Hà NỘI"), "bia hà nội");
    }
}
