use itertools::Itertools;

use crate::dex::Screen;
use crate::utils::escape_html;
use crate::view::{
    DetailView, ListCard, Locale, TypeBadge, CARD_PLACEHOLDER, DETAIL_PLACEHOLDER,
};

const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); min-height: 100vh; margin: 0; padding: 20px; }
    .container { max-width: 800px; margin: 0 auto; background: white; border-radius: 15px; padding: 30px; }
    .pokemon-list { display: grid; grid-template-columns: repeat(auto-fill, minmax(150px, 1fr)); gap: 15px; }
    .pokemon-item { display: flex; align-items: center; gap: 10px; padding: 10px; border-radius: 10px; background: #f5f5f5; text-decoration: none; color: inherit; }
    .pokemon-item img { width: 60px; height: 60px; }
    .pokemon-info h3 { margin: 0; font-size: 16px; }
    .pokemon-info p { margin: 0; color: #666; }
    .pokemon-image { text-align: center; }
    .pokemon-image img { width: 150px; height: 150px; }
    .types { text-align: center; margin: 10px 0; }
    .type-badge { display: inline-block; padding: 4px 12px; margin: 0 4px; border-radius: 12px; color: white; background: #777; }
    .type-fire { background: #f08030; } .type-water { background: #6890f0; } .type-grass { background: #78c850; }
    .type-electric { background: #f8d030; } .type-psychic { background: #f85888; } .type-ice { background: #98d8d8; }
    .type-dragon { background: #7038f8; } .type-dark { background: #705848; } .type-fairy { background: #ee99ac; }
    .type-normal { background: #a8a878; } .type-fighting { background: #c03028; } .type-flying { background: #a890f0; }
    .type-poison { background: #a040a0; } .type-ground { background: #e0c068; } .type-rock { background: #b8a038; }
    .type-bug { background: #a8b820; } .type-ghost { background: #705898; } .type-steel { background: #b8b8d0; }
    .pokemon-stats { margin-top: 20px; }
    .stat-item { display: flex; justify-content: space-between; padding: 6px 0; border-bottom: 1px solid #eee; }
    .stat-name { font-weight: bold; }
    .back { display: block; width: 100%; padding: 12px; background: #667eea; color: white; border: none; border-radius: 8px; text-align: center; text-decoration: none; font-size: 16px; margin-top: 20px; }
"#;

fn render_badges(types: &[TypeBadge]) -> String {
    types
        .iter()
        .map(|t| {
            format!(
                r#"<span class="{}">{}</span>"#,
                escape_html(&t.class),
                escape_html(&t.label)
            )
        })
        .join("")
}

fn render_card(card: &ListCard) -> String {
    let types = if card.has_details {
        format!(
            "\n          <div class=\"types\">{}</div>",
            render_badges(&card.types)
        )
    } else {
        String::new()
    };
    format!(
        r#"      <div class="pokemon-item" data-url="{url}">
        <img src="{sprite}" alt="{name}" onerror="this.src='{placeholder}'">
        <div class="pokemon-info">
          <h3>{display}</h3>
          <p>{number}</p>{types}
        </div>
      </div>
"#,
        url = escape_html(&card.detail_url),
        sprite = escape_html(&card.sprite_url),
        name = escape_html(&card.name),
        placeholder = CARD_PLACEHOLDER,
        display = escape_html(&card.display_name),
        number = escape_html(&card.number),
    )
}

fn render_stat_item(name: &str, value: &str) -> String {
    format!(
        r#"        <div class="stat-item">
          <span class="stat-name">{}:</span>
          <span class="stat-value">{}</span>
        </div>
"#,
        escape_html(name),
        escape_html(value)
    )
}

fn render_detail(entry: &DetailView, locale: Locale) -> String {
    let labels = locale.labels();
    let badges = render_badges(&entry.types);
    let stats: String = entry
        .stats
        .iter()
        .map(|s| render_stat_item(&s.label, &s.value.to_string()))
        .collect();

    let mut out = String::new();
    out.push_str(&format!("    <h2>{}</h2>\n", escape_html(&entry.title)));
    out.push_str(&format!(
        "    <div class=\"pokemon-image\">\n      <img src=\"{}\" alt=\"{}\" onerror=\"this.src='{}'\">\n    </div>\n",
        escape_html(&entry.image_url),
        escape_html(&entry.name),
        DETAIL_PLACEHOLDER
    ));
    out.push_str(&format!("    <div class=\"types\">{badges}</div>\n"));
    out.push_str("    <div class=\"pokemon-stats\">\n");
    out.push_str(&format!("      <h3>{}</h3>\n", escape_html(labels.basic_info)));
    out.push_str(&render_stat_item(labels.height, &entry.height));
    out.push_str(&render_stat_item(labels.weight, &entry.weight));
    out.push_str(&render_stat_item(labels.number, &entry.number));
    out.push_str("    </div>\n");
    out.push_str("    <div class=\"pokemon-stats\">\n");
    out.push_str(&format!("      <h3>{}</h3>\n", escape_html(labels.stats)));
    out.push_str(&stats);
    out.push_str("    </div>\n");
    out.push_str(&format!(
        "    <a class=\"back\" href=\"#\">{}</a>\n",
        escape_html(labels.back)
    ));
    out
}

pub fn render_html(screen: &Screen, locale: Locale) -> Vec<u8> {
    let (title, body) = match screen {
        Screen::List { cards, .. } => {
            let cards: String = cards.iter().map(render_card).collect();
            (
                "GameDex".to_string(),
                format!("    <div class=\"pokemon-list\" id=\"pokemonList\">\n{cards}    </div>\n"),
            )
        }
        Screen::Detail { entry } => (
            format!("GameDex - {}", entry.title),
            format!(
                "    <div class=\"pokemon-details\" id=\"pokemonDetails\">\n{}    </div>\n",
                render_detail(entry, locale)
            ),
        ),
        Screen::Empty => ("GameDex".to_string(), String::new()),
    };
    let lang = match locale {
        Locale::En => "en",
        Locale::Pl => "pl",
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>{title}</title>
  <style>{STYLE}  </style>
</head>
<body>
  <div class="container">
{body}  </div>
</body>
</html>
"#,
        title = escape_html(&title),
    );
    html.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::PageInfo;

    #[test]
    fn list_page_contains_escaped_cards() {
        let screen = Screen::List {
            page: PageInfo::default(),
            cards: vec![ListCard {
                position: 1,
                id: 1,
                name: "<b>".to_string(),
                display_name: "<b>".to_string(),
                number: "#001".to_string(),
                sprite_url: "https://img/1.png".to_string(),
                detail_url: "https://api/pokemon/1/".to_string(),
                has_details: false,
                types: vec![],
            }],
        };
        let html = String::from_utf8(render_html(&screen, Locale::En)).unwrap();
        assert!(html.contains(r#"<div class="pokemon-item""#));
        assert!(html.contains("<h3>&lt;b&gt;</h3>"));
        assert!(html.contains("<p>#001</p>"));
        assert!(!html.contains("<h3><b></h3>"));
        assert!(!html.contains(r#"<div class="types">"#));
    }

    #[test]
    fn prefetched_card_shows_type_badges() {
        let screen = Screen::List {
            page: PageInfo::default(),
            cards: vec![ListCard {
                position: 1,
                id: 4,
                name: "charmander".to_string(),
                display_name: "Charmander".to_string(),
                number: "#004".to_string(),
                sprite_url: "https://img/4.png".to_string(),
                detail_url: "https://api/pokemon/4/".to_string(),
                has_details: true,
                types: vec![TypeBadge {
                    name: "fire".to_string(),
                    label: "Fire".to_string(),
                    class: "type-badge type-fire".to_string(),
                }],
            }],
        };
        let html = String::from_utf8(render_html(&screen, Locale::En)).unwrap();
        assert!(html.contains(
            r#"<div class="types"><span class="type-badge type-fire">Fire</span></div>"#
        ));
    }

    #[test]
    fn detail_page_uses_locale_labels() {
        let entry = DetailView {
            id: 1,
            name: "bulbasaur".to_string(),
            title: "Bulbasaur".to_string(),
            image_url: "art.png".to_string(),
            has_image: true,
            types: vec![],
            height: "0.7 m".to_string(),
            weight: "6.9 kg".to_string(),
            number: "#001".to_string(),
            stats: vec![],
        };
        let html = String::from_utf8(render_html(&Screen::Detail { entry }, Locale::Pl)).unwrap();
        assert!(html.contains("<html lang=\"pl\">"));
        assert!(html.contains("Podstawowe informacje"));
        assert!(html.contains("Powrót do listy"));
        assert!(html.contains("6.9 kg"));
    }
}
