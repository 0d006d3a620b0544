use chrono::NaiveDateTime;

/// Accepted layouts, in priority order.
/// `%.f` takes the fractional part. Before matching, a comma is rewritten to a
/// dot, a lowercase `t` to `T` and any whitespace character to a space.
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parse a candidate timestamp. Returns the first format that matches, or
/// `None` when the input is absent or no format applies. Never fails.
pub fn parse_timestamp(raw: Option<&str>) -> Option<NaiveDateTime> {
    let raw = raw.filter(|s| !s.is_empty())?;
    let normalized: String = raw
        .chars()
        .map(|c| match c {
            ',' => '.',
            't' => 'T',
            c if c.is_whitespace() => ' ',
            c => c,
        })
        .collect();

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&normalized, format).ok())
}
