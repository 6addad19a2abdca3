use serde::Serialize;

use crate::model::{EntryDetail, EntrySummary};
use crate::utils;

pub const DEFAULT_SPRITE_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

// 60x60 grey tile shown when a card sprite cannot be loaded
pub const CARD_PLACEHOLDER: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iNjAiIGhlaWdodD0iNjAiIHZpZXdCb3g9IjAgMCA2MCA2MCIgZmlsbD0ibm9uZSIgeG1sbnM9Imh0dHA6Ly93d3cudzMub3JnLzIwMDAvc3ZnIj4KPHJlY3Qgd2lkdGg9IjYwIiBoZWlnaHQ9IjYwIiBmaWxsPSIjRjVGNUY1Ii8+Cjx0ZXh0IHg9IjMwIiB5PSIzNSIgZm9udC1mYW1pbHk9IkFyaWFsIiBmb250LXNpemU9IjEwIiBmaWxsPSIjOTk5IiB0ZXh0LWFuY2hvcj0ibWlkZGxlIj5Qb2tlbW9uPC90ZXh0Pgo8L3N2Zz4K";

// 150x150 variant for the detail view
pub const DETAIL_PLACEHOLDER: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMTUwIiBoZWlnaHQ9IjE1MCIgdmlld0JveD0iMCAwIDE1MCAxNTAiIGZpbGw9Im5vbmUiIHhtbG5zPSJodHRwOi8vd3d3LnczLm9yZy8yMDAwL3N2ZyI+CjxyZWN0IHdpZHRoPSIxNTAiIGhlaWdodD0iMTUwIiBmaWxsPSIjRjVGNUY1Ii8+Cjx0ZXh0IHg9Ijc1IiB5PSI4MCIgZm9udC1mYW1pbHk9IkFyaWFsIiBmb250LXNpemU9IjE0IiBmaWxsPSIjOTk5IiB0ZXh0LWFuY2hvcj0ibWlkZGxlIj5Qb2tlbW9uPC90ZXh0Pgo8L3N2Zz4K";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Pl,
}

impl Locale {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "en" | "english" => Some(Self::En),
            "pl" | "polish" => Some(Self::Pl),
            _ => None,
        }
    }

    pub fn stat_label(self, stat: &str) -> String {
        let label = match (self, stat) {
            (_, "hp") => "HP",
            (Locale::En, "attack") => "Attack",
            (Locale::En, "defense") => "Defense",
            (Locale::En, "special-attack") => "Sp. Attack",
            (Locale::En, "special-defense") => "Sp. Defense",
            (Locale::En, "speed") => "Speed",
            (Locale::Pl, "attack") => "Atak",
            (Locale::Pl, "defense") => "Obrona",
            (Locale::Pl, "special-attack") => "Sp. Atak",
            (Locale::Pl, "special-defense") => "Sp. Obrona",
            (Locale::Pl, "speed") => "Szybkość",
            _ => return stat.to_string(),
        };
        label.to_string()
    }

    pub fn labels(self) -> Labels {
        match self {
            Locale::En => Labels {
                loading: "Loading...",
                basic_info: "Basic information",
                height: "Height",
                weight: "Weight",
                number: "Number",
                stats: "Stats",
                back: "Back to list",
            },
            Locale::Pl => Labels {
                loading: "Ładowanie...",
                basic_info: "Podstawowe informacje",
                height: "Wzrost",
                weight: "Waga",
                number: "Numer",
                stats: "Statystyki",
                back: "Powrót do listy",
            },
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Labels {
    pub loading: &'static str,
    pub basic_info: &'static str,
    pub height: &'static str,
    pub weight: &'static str,
    pub number: &'static str,
    pub stats: &'static str,
    pub back: &'static str,
}

/// One selectable card of the entry list.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ListCard {
    pub position: usize,
    pub id: u32,
    pub name: String,
    pub display_name: String,
    pub number: String,
    pub sprite_url: String,
    pub detail_url: String,
    /// Set once the entry's details are known, e.g. after a prefetch.
    pub has_details: bool,
    pub types: Vec<TypeBadge>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct TypeBadge {
    pub name: String,
    pub label: String,
    pub class: String,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct StatLine {
    pub key: String,
    pub label: String,
    pub value: u32,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct DetailView {
    pub id: u32,
    pub name: String,
    pub title: String,
    pub image_url: String,
    pub has_image: bool,
    pub types: Vec<TypeBadge>,
    pub height: String,
    pub weight: String,
    pub number: String,
    pub stats: Vec<StatLine>,
}

pub fn build_cards(entries: &[EntrySummary], offset: u32, sprite_base: &str) -> Vec<ListCard> {
    let sprite_base = sprite_base.trim_end_matches('/');
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let fallback = offset.saturating_add(index as u32).saturating_add(1);
            let id = utils::entry_id_from_url(&entry.url).unwrap_or(fallback);
            ListCard {
                position: index + 1,
                id,
                name: entry.name.clone(),
                display_name: utils::capitalize_first(&entry.name),
                number: utils::format_entry_number(id),
                sprite_url: format!("{sprite_base}/{id}.png"),
                detail_url: entry.url.clone(),
                has_details: false,
                types: Vec::new(),
            }
        })
        .collect()
}

/// Copies what a list card can show from already fetched details.
pub fn attach_details(card: &mut ListCard, detail: &EntryDetail) {
    card.has_details = true;
    card.types = type_badges(detail);
}

fn type_badges(detail: &EntryDetail) -> Vec<TypeBadge> {
    detail
        .type_names()
        .into_iter()
        .map(|name| TypeBadge {
            name: name.to_string(),
            label: utils::capitalize_first(name),
            class: format!("type-badge type-{name}"),
        })
        .collect()
}

pub fn build_detail(detail: &EntryDetail, locale: Locale) -> DetailView {
    let (image_url, has_image) = match detail.sprites.best_image() {
        Some(url) => (url.to_string(), true),
        None => (DETAIL_PLACEHOLDER.to_string(), false),
    };
    let types = type_badges(detail);
    let stats = detail
        .stats
        .iter()
        .map(|s| StatLine {
            key: s.stat.name.clone(),
            label: locale.stat_label(&s.stat.name),
            value: s.base_stat,
        })
        .collect();
    DetailView {
        id: detail.id,
        name: detail.name.clone(),
        title: utils::capitalize_first(&detail.name),
        image_url,
        has_image,
        types,
        height: format!("{} m", utils::format_tenths(detail.height)),
        weight: format!("{} kg", utils::format_tenths(detail.weight)),
        number: utils::format_entry_number(detail.id),
        stats,
    }
}
