use std::sync::OnceLock;

use distance::sift3;
use regex::Regex;

fn entry_url_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/pokemon/(\d+)/?(?:[?#].*)?$").ok())
        .as_ref()
}

/// Uppercases the first character and leaves the rest untouched.
pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Formats `value / 10` the way a JS number prints: `7 -> 0.7`, `10 -> 1`, `69 -> 6.9`.
pub fn format_tenths(value: u32) -> String {
    let whole = value / 10;
    let frac = value % 10;
    if frac == 0 {
        whole.to_string()
    } else {
        format!("{whole}.{frac}")
    }
}

pub fn format_entry_number(id: u32) -> String {
    format!("#{:03}", id)
}

/// Pulls the numeric id out of a detail URL such as `.../pokemon/25/`.
pub fn entry_id_from_url(url: &str) -> Option<u32> {
    let caps = entry_url_re()?.captures(url.trim())?;
    caps.get(1)?.as_str().parse::<u32>().ok()
}

/// Reads an id the way a lenient integer parse would: optional `+`, then the
/// leading run of digits, hexadecimal after a `0x`/`0X` prefix. Anything after
/// the digits is ignored. Returns `None` when there are no leading digits.
pub fn parse_leading_id(value: &str) -> Option<u64> {
    let value = value.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let (value, radix) = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (value, 10),
    };
    let digits: String = value.chars().take_while(|c| c.is_digit(radix)).collect();
    if digits.is_empty() {
        return None;
    }
    Some(u64::from_str_radix(&digits, radix).unwrap_or(u64::MAX))
}

pub fn sift3_distance(a: &str, b: &str) -> f32 {
    sift3(a, b)
}

/// Closest names by sift3 distance, ties keep input order.
pub fn closest_names<'a, I>(term: &str, names: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    if term.is_empty() || limit == 0 {
        return Vec::new();
    }
    let mut scored: Vec<(f32, usize, &str)> = names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| (sift3_distance(term, &name.to_lowercase()), idx, name))
        .collect();
    scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, _, name)| name.to_string())
        .collect()
}

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
