pub mod report;

use colored::{Color, Colorize};
use itertools::Itertools;

use crate::dex::{PageInfo, Screen};
use crate::view::{DetailView, ListCard, Locale, TypeBadge};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

pub fn render(screen: &Screen, format: OutputFormat, locale: Locale) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(screen, locale).into_bytes(),
        OutputFormat::Json => render_json(screen),
        OutputFormat::Html => report::render_html(screen, locale),
    }
}

pub fn render_json(screen: &Screen) -> Vec<u8> {
    let mut out = serde_json::to_vec_pretty(screen).unwrap_or_else(|_| b"{}".to_vec());
    out.push(b'\n');
    out
}

pub fn type_color(name: &str) -> Color {
    match name {
        "fire" => Color::Red,
        "water" | "ice" => Color::Blue,
        "grass" | "bug" => Color::Green,
        "electric" => Color::Yellow,
        "psychic" | "fairy" => Color::Magenta,
        "poison" | "ghost" | "dragon" => Color::BrightMagenta,
        "ground" | "rock" | "fighting" => Color::BrightYellow,
        "flying" | "steel" => Color::Cyan,
        "dark" => Color::BrightBlack,
        _ => Color::White,
    }
}

pub fn render_text(screen: &Screen, locale: Locale) -> String {
    match screen {
        Screen::List { page, cards } => render_list_text(page, cards),
        Screen::Detail { entry } => render_detail_text(entry, locale),
        Screen::Empty => String::new(),
    }
}

fn render_list_text(page: &PageInfo, cards: &[ListCard]) -> String {
    let mut out = String::new();
    let first = page.offset.saturating_add(1);
    let last = page.offset.saturating_add(cards.len() as u32);
    out.push_str(&format!(
        "{} {}-{} of {}\n",
        "::".bold().white(),
        first,
        last,
        page.count
    ));
    let width = cards.len().to_string().len();
    for card in cards {
        out.push_str(&format!(
            "{:>width$}. {} {}",
            card.position,
            card.number.dimmed(),
            card.display_name.bold().white(),
        ));
        let badges = type_badges_text(&card.types);
        if !badges.is_empty() {
            out.push(' ');
            out.push_str(&badges);
        }
        out.push('\n');
    }
    out
}

fn type_badges_text(types: &[TypeBadge]) -> String {
    types
        .iter()
        .map(|t| format!("[{}]", t.label).bold().color(type_color(&t.name)).to_string())
        .join(" ")
}

fn render_detail_text(entry: &DetailView, locale: Locale) -> String {
    let labels = locale.labels();
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        entry.title.bold().green(),
        entry.number.dimmed()
    ));
    if entry.has_image {
        out.push_str(&format!("{}\n", entry.image_url.underline()));
    }
    let badges = type_badges_text(&entry.types);
    if !badges.is_empty() {
        out.push_str(&badges);
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&format!("{}\n", labels.basic_info.bold().white()));
    out.push_str(&stat_line(labels.height, &entry.height));
    out.push_str(&stat_line(labels.weight, &entry.weight));
    out.push_str(&stat_line(labels.number, &entry.number));

    out.push('\n');
    out.push_str(&format!("{}\n", labels.stats.bold().white()));
    for stat in &entry.stats {
        out.push_str(&stat_line(&stat.label, &stat.value.to_string()));
    }
    out
}

fn stat_line(name: &str, value: &str) -> String {
    format!("  {:<14} {}\n", format!("{name}:"), value.bold().cyan())
}
