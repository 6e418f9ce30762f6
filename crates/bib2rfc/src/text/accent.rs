//! Transliteration of LaTeX accent escapes to precomposed Unicode characters.
//!
//! The supported surface forms for an accent marker `M` over a base letter `L` are:
//!
//! | Form         | Example     |
//! |--------------|-------------|
//! | `{\ML}`      | `{\'e}`     |
//! | `\ML`        | `\'e`       |
//! | `\M{L}`      | `\c{c}`     |
//! | `{\M{L}}`    | `{\v{s}}`   |
//!
//! Alphabetic markers (`c`, `v`, `u`) may be separated from the letter by a single space
//! (`\c c`). Written without the space and without braces they must not run into a following
//! letter, so commands like `\vspace` are left alone.

/// Maps an accent marker and base letter to the precomposed character.
const fn accented(marker: char, base: char) -> Option<char> {
    let c = match (marker, base) {
        ('\'', 'a') => 'á',
        ('\'', 'e') => 'é',
        ('\'', 'i') => 'í',
        ('\'', 'o') => 'ó',
        ('\'', 'u') => 'ú',
        ('\'', 'y') => 'ý',
        ('\'', 'A') => 'Á',
        ('\'', 'E') => 'É',
        ('\'', 'I') => 'Í',
        ('\'', 'O') => 'Ó',
        ('\'', 'U') => 'Ú',
        ('\'', 'Y') => 'Ý',
        ('`', 'a') => 'à',
        ('`', 'e') => 'è',
        ('`', 'i') => 'ì',
        ('`', 'o') => 'ò',
        ('`', 'u') => 'ù',
        ('`', 'A') => 'À',
        ('`', 'E') => 'È',
        ('`', 'I') => 'Ì',
        ('`', 'O') => 'Ò',
        ('`', 'U') => 'Ù',
        ('"', 'a') => 'ä',
        ('"', 'e') => 'ë',
        ('"', 'i') => 'ï',
        ('"', 'o') => 'ö',
        ('"', 'u') => 'ü',
        ('"', 'y') => 'ÿ',
        ('"', 'A') => 'Ä',
        ('"', 'E') => 'Ë',
        ('"', 'I') => 'Ï',
        ('"', 'O') => 'Ö',
        ('"', 'U') => 'Ü',
        ('"', 'Y') => 'Ÿ',
        ('^', 'a') => 'â',
        ('^', 'e') => 'ê',
        ('^', 'i') => 'î',
        ('^', 'o') => 'ô',
        ('^', 'u') => 'û',
        ('^', 'A') => 'Â',
        ('^', 'E') => 'Ê',
        ('^', 'I') => 'Î',
        ('^', 'O') => 'Ô',
        ('^', 'U') => 'Û',
        ('~', 'a') => 'ã',
        ('~', 'n') => 'ñ',
        ('~', 'o') => 'õ',
        ('~', 'A') => 'Ã',
        ('~', 'N') => 'Ñ',
        ('~', 'O') => 'Õ',
        ('c', 'c') => 'ç',
        ('c', 'C') => 'Ç',
        ('c', 's') => 'ş',
        ('c', 'S') => 'Ş',
        ('v', 's') => 'š',
        ('v', 'S') => 'Š',
        ('v', 'z') => 'ž',
        ('v', 'Z') => 'Ž',
        ('v', 'c') => 'č',
        ('v', 'C') => 'Č',
        ('v', 'e') => 'ě',
        ('v', 'E') => 'Ě',
        ('v', 'r') => 'ř',
        ('v', 'R') => 'Ř',
        ('v', 'n') => 'ň',
        ('v', 'N') => 'Ň',
        ('u', 'g') => 'ğ',
        ('u', 'G') => 'Ğ',
        ('u', 'a') => 'ă',
        ('u', 'A') => 'Ă',
        ('.', 'I') => 'İ',
        ('.', 'z') => 'ż',
        ('.', 'Z') => 'Ż',
        _ => return None,
    };
    Some(c)
}

const fn is_marker(c: char) -> bool {
    matches!(c, '\'' | '`' | '"' | '^' | '~' | 'c' | 'v' | 'u' | '.')
}

/// Attempts to read `\ML`, `\M L`, or `\M{L}` starting at the backslash at `chars[i]`.
///
/// Returns the accented character and the number of chars consumed.
fn escape_at(chars: &[char], i: usize, braced: bool) -> Option<(char, usize)> {
    let marker = *chars.get(i + 1).filter(|c| is_marker(**c))?;
    let mut j = i + 2;

    if chars.get(j) == Some(&'{') {
        let base = *chars.get(j + 1)?;
        if chars.get(j + 2) != Some(&'}') {
            return None;
        }
        return accented(marker, base).map(|c| (c, j + 3 - i));
    }

    let spaced = marker.is_ascii_alphabetic() && chars.get(j) == Some(&' ');
    if spaced {
        j += 1;
    }
    let base = *chars.get(j)?;
    if !base.is_ascii_alphabetic() {
        return None;
    }
    // `\vspace` is a command, not an escaped `s`
    if marker.is_ascii_alphabetic()
        && !braced
        && !spaced
        && chars.get(j + 1).map_or(false, char::is_ascii_alphabetic)
    {
        return None;
    }
    accented(marker, base).map(|c| (c, j + 1 - i))
}

fn substitute_once(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '{' && chars.get(i + 1) == Some(&'\\') {
            if let Some((c, len)) = escape_at(&chars, i + 1, true) {
                if chars.get(i + 1 + len) == Some(&'}') {
                    out.push(c);
                    i += len + 2;
                    continue;
                }
            }
        }

        if chars[i] == '\\' {
            if let Some((c, len)) = escape_at(&chars, i, false) {
                out.push(c);
                i += len;
                continue;
            }
        }

        if !matches!(chars[i], '{' | '}') {
            out.push(chars[i]);
        }
        i += 1;
    }

    out
}

/// Converts LaTeX accent escapes in `text` to Unicode and strips every remaining grouping brace.
///
/// Unrecognized escapes are kept as they are. Transliterating already transliterated text
/// returns it unchanged.
///
/// # Examples
///
/// ```
/// use bib2rfc::text::transliterate;
///
/// assert_eq!("José Suárez", transliterate(r"Jos{\'e} Su\'arez"));
/// assert_eq!("Gödel", transliterate(r#"G{\"o}del"#));
/// ```
#[must_use]
pub fn transliterate(text: &str) -> String {
    let mut current = substitute_once(text);
    // removing braces may join a backslash to its accent, e.g. `\{'e}`
    loop {
        let next = substitute_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Transliterates `text` and drops every code point outside 7-bit ASCII.
///
/// Returns `None` when `text` is empty or when the ASCII form is identical to the Unicode one, in
/// which case no separate ASCII form is needed.
#[must_use]
pub fn extract_ascii(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    let unicode = transliterate(text);
    let ascii: String = unicode.chars().filter(char::is_ascii).collect();
    (ascii != unicode).then_some(ascii)
}
