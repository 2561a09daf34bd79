//! Path data compaction.

use std::borrow::Cow;

/// Drop a trailing line-to that only returns to the subpath start.
///
/// `M0 0 L10 0 L10 10 L0 0 z` becomes `M0 0 L10 0 L10 10 z`: the close-path
/// draws that segment anyway. Any other path data is returned unchanged.
pub fn compact(d: &str) -> Cow<'_, str> {
    match strip_closing_line(d) {
        Some(head) => Cow::Owned(format!("{head}z")),
        None => Cow::Borrowed(d),
    }
}

/// Everything before the redundant `L x y`, if there is one.
fn strip_closing_line(d: &str) -> Option<&str> {
    let body = d.strip_suffix('z')?;
    let coords_start = body
        .trim_end_matches(|c: char| c.is_ascii_digit() || c.is_whitespace())
        .len();
    let head = body[..coords_start].strip_suffix('L')?;

    let end = parse_point(&body[coords_start..])?;
    let start = subpath_start(head)?;
    (start == end).then_some(head)
}

/// Coordinates of the last absolute move-to in `head`.
fn subpath_start(head: &str) -> Option<(f64, f64)> {
    let after_move = &head[head.rfind('M')? + 1..];
    let coords_end = after_move
        .find(|c: char| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
        .unwrap_or(after_move.len());
    parse_point(&after_move[..coords_end])
}

/// Exactly two numbers separated by whitespace or a comma.
fn parse_point(text: &str) -> Option<(f64, f64)> {
    let mut numbers = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::parse::<f64>);

    let x = numbers.next()?.ok()?;
    let y = numbers.next()?.ok()?;
    numbers.next().is_none().then_some((x, y))
}
