//! Moderated-word gate for user-supplied content.
//!
//! Matching is whole-word and case-insensitive; filtering replaces each
//! matched word with an equal-length run of `*`. Both functions are pure and
//! idempotent on already-filtered text.

const MODERATED_WORDS: &[&str] = &[
    "badword1",
    "badword2",
    "offensive",
    "inappropriate",
    "hate",
    "violence",
    "abuse",
    "stupid",
    "idiot",
];

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_moderated(word: &str) -> bool {
    MODERATED_WORDS
        .iter()
        .any(|candidate| word.eq_ignore_ascii_case(candidate))
}

/// Whether `text` contains any moderated word as a whole word.
pub fn contains_profanity(text: &str) -> bool {
    split_words(text).any(|(word, _)| is_moderated(word))
}

/// Replace each moderated word in `text` with `*` of the same length.
pub fn filter(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (word, range) in split_words(text) {
        out.push_str(&text[last..range.0]);
        if is_moderated(word) {
            out.extend(std::iter::repeat('*').take(word.chars().count()));
        } else {
            out.push_str(word);
        }
        last = range.1;
    }
    out.push_str(&text[last..]);
    out
}

/// Iterate maximal runs of word characters with their byte ranges.
fn split_words(text: &str) -> impl Iterator<Item = (&str, (usize, usize))> + '_ {
    let mut iter = text.char_indices().peekable();
    std::iter::from_fn(move || {
        // Skip non-word characters.
        while let Some(&(_, c)) = iter.peek() {
            if is_word_char(c) {
                break;
            }
            iter.next();
        }
        let (start, _) = *iter.peek()?;
        let mut end = text.len();
        while let Some(&(i, c)) = iter.peek() {
            if is_word_char(c) {
                iter.next();
            } else {
                end = i;
                break;
            }
        }
        Some((&text[start..end], (start, end)))
    })
}
