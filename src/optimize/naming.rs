//! Short class names for extracted styles.

/// Size of the single-character alphabet: `a..z` then `A..Y`.
const SYMBOLS: usize = 51;

fn symbol(i: usize) -> char {
    debug_assert!(i < SYMBOLS);
    let offset = if i < 26 { b'a' + i as u8 } else { b'A' + (i - 26) as u8 };
    char::from(offset)
}

/// Class name for the `i`-th distinct color.
///
/// The first 51 names are single characters. After that the name is
/// `class_name(i / 51 - 1)` followed by `class_name(i % 51)`, so 51 is
/// `"aa"`, 52 is `"ab"` and so on.
pub fn class_name(i: usize) -> String {
    let mut name = String::new();
    push_name(i, &mut name);
    name
}

fn push_name(i: usize, out: &mut String) {
    let first = i / SYMBOLS;
    if first > 0 {
        push_name(first - 1, out);
    }
    out.push(symbol(i % SYMBOLS));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_single_symbols() {
        assert_eq!(class_name(0), "a");
        assert_eq!(class_name(25), "z");
        assert_eq!(class_name(26), "A");
        assert_eq!(class_name(50), "Y");
    }

    #[test]
    fn test_composite_names() {
        assert_eq!(class_name(51), "aa");
        assert_eq!(class_name(52), "ab");
        assert_eq!(class_name(101), "aY");
        assert_eq!(class_name(102), "ba");
        assert_eq!(class_name(51 + 51 * 51), "aaa");
    }

    #[test]
    fn test_unique_and_deterministic() {
        let names: Vec<_> = (0..2600).map(class_name).collect();
        let unique: FxHashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        assert_eq!(names, (0..2600).map(class_name).collect::<Vec<_>>());
        assert!(names.iter().all(|n| n.chars().all(|c| c.is_ascii_alphabetic())));
    }
}
