use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

const SEPARATOR: char = '_';

/// Canonical form of a single column name: trimmed, accents folded to
/// ASCII, lowercase, every run of non-alphanumeric characters collapsed to
/// one `_`, no leading or trailing `_`. May return an empty string.
pub fn canonical_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;

    // NFKD splits "í" into "i" + combining accent; the accent is non-ASCII
    // and falls out with every other non-ASCII character.
    for ch in raw.trim().nfkd().filter(char::is_ascii) {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push(SEPARATOR);
            }
            pending_sep = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Normalize a full set of column names, preserving order and count.
///
/// Names that come out empty are replaced by `column_<position>` (1-based).
/// When a canonical name is already taken, the first free `_2`, `_3`, …
/// suffix is appended, so no column is ever dropped or merged.
pub fn normalize_names<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut names = Vec::with_capacity(raw.len());

    for (i, name) in raw.iter().enumerate() {
        let mut base = canonical_name(name.as_ref());
        if base.is_empty() {
            base = format!("column_{}", i + 1);
        }

        let unique = if taken.contains(&base) {
            (2..)
                .map(|n| format!("{base}{SEPARATOR}{n}"))
                .find(|candidate| !taken.contains(candidate))
                .unwrap_or_default()
        } else {
            base
        };

        if unique != name.as_ref() {
            log::debug!("column {} renamed {:?} -> {:?}", i, name.as_ref(), unique);
        }
        taken.insert(unique.clone());
        names.push(unique);
    }
    names
}
