//! Text normalization shared by the tokenizer and dictionary keys.
//!
//! Surface forms found in poems and keys of the morphological dictionary must
//! go through the same rule, otherwise lemma lookups quietly miss. Everything
//! here funnels into [`canonical_form`].

/// A canonical surface form: punctuation stripped, lower-cased, never empty.
pub type Token = String;

/// Characters removed from anywhere inside a word.
pub const PUNCTUATION: [char; 12] = [
    '.', ',', ';', ':', '!', '?', '(', ')', '"', '-', '\u{2013}', '\u{2014}',
];

/// Whether `c` is dropped by [`canonical_form`].
pub fn is_punctuation(c: char) -> bool {
    PUNCTUATION.contains(&c)
}

/// Strip [`PUNCTUATION`] from `raw` and lower-case what remains.
///
/// May return an empty string; callers decide whether that is a token.
pub fn canonical_form(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !is_punctuation(*c)).collect();
    stripped.to_lowercase()
}

/// Split `text` on whitespace runs and canonicalize each fragment.
///
/// Order and duplicates are preserved; fragments that were pure punctuation
/// disappear.
pub fn tokenize(text: &str) -> Vec<Token> {
    tokens(text).collect()
}

/// Lazy form of [`tokenize`].
pub fn tokens(text: &str) -> impl Iterator<Item = Token> + '_ {
    text.split_whitespace()
        .map(canonical_form)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_spaces_and_newlines() {
        assert_eq!(
            tokenize("Шёл  дождь\nи\tснег"),
            vec!["шёл", "дождь", "и", "снег"]
        );
    }

    #[test]
    fn strips_punctuation_inside_words() {
        assert_eq!(
            tokenize("«Кто-то» (сказал): \"Дождь!\" — и всё..."),
            vec!["«ктото»", "сказал", "дождь", "и", "всё"]
        );
    }

    #[test]
    fn drops_fragments_that_were_only_punctuation() {
        assert_eq!(tokenize(" — ... ? "), Vec::<Token>::new());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn keeps_duplicates_in_order() {
        assert_eq!(tokenize("Дождь, дождь, ДОЖДЬ"), vec!["дождь"; 3]);
    }

    #[test]
    fn all_three_dashes_are_stripped() {
        assert_eq!(canonical_form("а-б–в—г"), "абвг");
    }

    #[test]
    fn canonical_form_is_a_fixed_point() {
        for raw in ["Дождь,", "(Снег)", "кое-кто", "ЁЛКА!"] {
            let once = canonical_form(raw);
            assert_eq!(canonical_form(&once), once);
        }
    }

    #[test]
    fn tokenizing_is_deterministic() {
        let text = "Светило солнце,\nшёл дождь — и снова солнце.";
        assert_eq!(tokenize(text), tokenize(text));
    }
}
