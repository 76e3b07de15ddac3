//! File name normalization.
//!
//! Cyrillic (Russian and Ukrainian) letters are romanized through a fixed
//! table, then every character outside `[a-zA-Z0-9.]` is replaced with an
//! underscore. Replacement is one-for-one; runs are not collapsed.

use regex::Regex;
use std::borrow::Cow;
use std::path::Path;
use std::sync::LazyLock;

/// Lowercase source letters and their ASCII romanizations.
///
/// Uppercase letters map to the fully uppercased romanization
/// (`Щ` becomes `SCH`, `Я` becomes `YA`).
pub const TRANSLITERATION: [(char, &str); 37] = [
    ('а', "a"),
    ('б', "b"),
    ('в', "v"),
    ('г', "g"),
    ('д', "d"),
    ('е', "e"),
    ('ё', "e"),
    ('ж', "j"),
    ('з', "z"),
    ('и', "i"),
    ('й', "j"),
    ('к', "k"),
    ('л', "l"),
    ('м', "m"),
    ('н', "n"),
    ('о', "o"),
    ('п', "p"),
    ('р', "r"),
    ('с', "s"),
    ('т', "t"),
    ('у', "u"),
    ('ф', "f"),
    ('х', "h"),
    ('ц', "ts"),
    ('ч', "ch"),
    ('ш', "sh"),
    ('щ', "sch"),
    ('ъ', ""),
    ('ы', "y"),
    ('ь', ""),
    ('э', "e"),
    ('ю', "yu"),
    ('я', "ya"),
    ('є', "je"),
    ('і', "i"),
    ('ї', "ji"),
    ('ґ', "g"),
];

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9.]").expect("Invalid normalization pattern"));

fn lookup(c: char) -> Option<&'static str> {
    TRANSLITERATION
        .iter()
        .find(|(source, _)| *source == c)
        .map(|(_, target)| *target)
}

/// Romanizes a single character, or returns `None` if it has no table entry.
///
/// ```
/// use dirsort::name_normalizer::transliterate_char;
///
/// assert_eq!(transliterate_char('ж').as_deref(), Some("j"));
/// assert_eq!(transliterate_char('Ч').as_deref(), Some("CH"));
/// assert_eq!(transliterate_char('q'), None);
/// ```
pub fn transliterate_char(c: char) -> Option<Cow<'static, str>> {
    if let Some(target) = lookup(c) {
        return Some(Cow::Borrowed(target));
    }

    if c.is_uppercase() {
        let mut lower = c.to_lowercase();
        if let (Some(single), None) = (lower.next(), lower.next())
            && let Some(target) = lookup(single)
        {
            return Some(Cow::Owned(target.to_uppercase()));
        }
    }

    None
}

/// Applies the transliteration table to every character of `name`.
pub fn transliterate(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match transliterate_char(c) {
            Some(romanized) => out.push_str(&romanized),
            None => out.push(c),
        }
    }
    out
}

/// Converts a file name into its filesystem-safe ASCII form.
///
/// # Examples
///
/// ```
/// use dirsort::name_normalizer::normalize_name;
///
/// assert_eq!(normalize_name("Звіт 2024.pdf"), "Zvit_2024.pdf");
/// assert_eq!(normalize_name("a  b.txt"), "a__b.txt");
/// assert_eq!(normalize_name("plain.txt"), "plain.txt");
/// ```
pub fn normalize_name(name: &str) -> String {
    let romanized = transliterate(name);
    DISALLOWED.replace_all(&romanized, "_").into_owned()
}

/// Normalizes the final component of `path`.
///
/// Returns an empty string for paths without a file name (e.g. `..`).
pub fn normalize(path: &Path) -> String {
    path.file_name()
        .map(|name| normalize_name(&name.to_string_lossy()))
        .unwrap_or_default()
}
