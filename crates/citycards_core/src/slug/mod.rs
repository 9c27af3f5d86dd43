//! URL slug derivation.
//!
//! # Responsibility
//! - Turn a human title into a lowercase URL-safe base string.
//! - Transliterate Cyrillic input so Russian titles produce readable
//!   Latin slugs ("Нижний Новгород" -> "nizhnij-novgorod").
//!
//! # Invariants
//! - Output contains only `[a-z0-9-]`, with no leading, trailing or
//!   doubled hyphens.
//! - Derivation is pure; uniqueness probing belongs to the repository.

use once_cell::sync::Lazy;
use regex::Regex;

/// Base used when a title slugifies to nothing (symbols-only, empty, or
/// untransliterable input).
pub const FALLBACK_SLUG_BASE: &str = "city";

static SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid separator regex"));

/// Derives a URL-safe slug base from a title.
///
/// Lowercases, transliterates Cyrillic letters (GOST-style digraphs:
/// ж->zh, й->j, щ->shch, ...), collapses every other non-alphanumeric run
/// into a single hyphen and trims hyphens at both ends. Characters with no
/// Latin mapping are dropped. Returns an empty string when nothing
/// survives; callers wanting the fallback base use [`slug_base`].
pub fn slugify(title: &str) -> String {
    let mut transliterated = String::with_capacity(title.len());
    for ch in title.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            transliterated.push(ch);
        } else if let Some(mapped) = transliterate_cyrillic(ch) {
            transliterated.push_str(mapped);
        } else {
            transliterated.push(' ');
        }
    }

    SEPARATOR_RE
        .replace_all(&transliterated, "-")
        .trim_matches('-')
        .to_string()
}

/// Like [`slugify`], but substitutes [`FALLBACK_SLUG_BASE`] for an empty
/// result so every card gets a non-empty slug base.
pub fn slug_base(title: &str) -> String {
    let base = slugify(title);
    if base.is_empty() {
        FALLBACK_SLUG_BASE.to_string()
    } else {
        base
    }
}

/// Lowercase Cyrillic to Latin mapping.
///
/// Soft and hard signs vanish; the rest follow common GOST-style
/// romanization so slugs stay pronounceable.
fn transliterate_cyrillic(ch: char) -> Option<&'static str> {
    let mapped = match ch {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "c",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' => "",
        'ы' => "y",
        'ь' => "",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(mapped)
}
