use mockito::{Matcher, Mock, ServerGuard};

use crate::client::ClientOptions;
use crate::dex::{Dex, DexError, Options, Screen, View};
use crate::view::Locale;

fn detail_json(id: u32, name: &str, kind: &str) -> String {
    format!(
        r#"{{
            "id": {id},
            "name": "{name}",
            "height": 7,
            "weight": 69,
            "types": [{{"slot": 1, "type": {{"name": "{kind}", "url": ""}}}}],
            "stats": [
                {{"base_stat": 45, "effort": 0, "stat": {{"name": "hp", "url": ""}}}},
                {{"base_stat": 49, "effort": 0, "stat": {{"name": "attack", "url": ""}}}}
            ],
            "sprites": {{
                "front_default": "https://img/{id}.png",
                "other": {{"official-artwork": {{"front_default": "https://art/{id}.png"}}}}
            }}
        }}"#
    )
}

fn list_json(server: &ServerGuard) -> String {
    let base = server.url();
    format!(
        r#"{{
            "count": 6,
            "next": "{base}/pokemon?offset=3&limit=3",
            "previous": null,
            "results": [
                {{"name": "bulbasaur", "url": "{base}/pokemon/1/"}},
                {{"name": "ivysaur", "url": "{base}/pokemon/2/"}},
                {{"name": "charmander", "url": "{base}/pokemon/4/"}}
            ]
        }}"#
    )
}

fn second_page_json(server: &ServerGuard) -> String {
    let base = server.url();
    format!(
        r#"{{
            "count": 6,
            "next": null,
            "previous": "{base}/pokemon?offset=0&limit=3",
            "results": [
                {{"name": "charmeleon", "url": "{base}/pokemon/5/"}},
                {{"name": "charizard", "url": "{base}/pokemon/6/"}},
                {{"name": "squirtle", "url": "{base}/pokemon/7/"}}
            ]
        }}"#
    )
}

async fn mock_list(server: &mut ServerGuard, offset: &str, body: String, hits: usize) -> Mock {
    server
        .mock("GET", "/pokemon")
        .match_query(Matcher::UrlEncoded("offset".into(), offset.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(hits)
        .create_async()
        .await
}

async fn mock_detail(server: &mut ServerGuard, path: &str, body: String, hits: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(hits)
        .create_async()
        .await
}

fn dex_for(server: &ServerGuard) -> Dex {
    Dex::new(Options {
        client: ClientOptions {
            api_url: server.url(),
            timeout_seconds: 5,
            proxy: None,
        },
        limit: 3,
        ..Options::default()
    })
    .unwrap()
}

#[tokio::test]
async fn initial_load_shows_cards_for_the_first_page() {
    let mut server = mockito::Server::new_async().await;
    let body = list_json(&server);
    let list = mock_list(&mut server, "0", body, 1).await;

    let mut dex = dex_for(&server);
    dex.load_initial().await.unwrap();
    list.assert_async().await;

    assert_eq!(dex.view(), View::List);
    assert!(!dex.is_loading());
    match dex.screen() {
        Screen::List { page, cards } => {
            assert_eq!(page.count, 6);
            assert_eq!(cards.len(), 3);
            assert_eq!(cards[2].display_name, "Charmander");
            assert_eq!(cards[2].number, "#004");
        }
        other => panic!("unexpected screen {other:?}"),
    }
}

#[tokio::test]
async fn selecting_a_card_opens_details_and_back_keeps_the_list() {
    let mut server = mockito::Server::new_async().await;
    let body = list_json(&server);
    let list = mock_list(&mut server, "0", body, 1).await;
    let detail = mock_detail(&mut server, "/pokemon/2/", detail_json(2, "ivysaur", "grass"), 1).await;

    let mut dex = dex_for(&server);
    dex.load_initial().await.unwrap();
    dex.select(2).await.unwrap();
    detail.assert_async().await;

    assert_eq!(dex.view(), View::Detail);
    match dex.screen() {
        Screen::Detail { entry } => {
            assert_eq!(entry.title, "Ivysaur");
            assert_eq!(entry.image_url, "https://art/2.png");
            assert_eq!(entry.height, "0.7 m");
            assert_eq!(entry.weight, "6.9 kg");
            assert_eq!(entry.types[0].label, "Grass");
        }
        other => panic!("unexpected screen {other:?}"),
    }

    dex.back();
    assert_eq!(dex.view(), View::List);
    assert!(dex.current().is_none());
    assert_eq!(dex.entries().len(), 3);
    list.assert_async().await;
}

#[tokio::test]
async fn selecting_outside_the_list_is_rejected_without_a_request() {
    let mut server = mockito::Server::new_async().await;
    let body = list_json(&server);
    let _list = mock_list(&mut server, "0", body, 1).await;

    let mut dex = dex_for(&server);
    dex.load_initial().await.unwrap();
    let err = dex.select(9).await.unwrap_err();
    assert!(matches!(err, DexError::NoSuchCard { position: 9, len: 3 }));
    assert!(dex.error().is_some());
}

#[tokio::test]
async fn search_matches_loaded_names_first() {
    let mut server = mockito::Server::new_async().await;
    let body = list_json(&server);
    let _list = mock_list(&mut server, "0", body, 1).await;
    let detail = mock_detail(&mut server, "/pokemon/4/", detail_json(4, "charmander", "fire"), 1).await;

    let mut dex = dex_for(&server);
    dex.load_initial().await.unwrap();
    dex.search("  CHAR ").await.unwrap();
    detail.assert_async().await;
    assert_eq!(dex.current().map(|d| d.id), Some(4));
}

#[tokio::test]
async fn search_falls_back_to_direct_id_lookup() {
    let mut server = mockito::Server::new_async().await;
    let body = list_json(&server);
    let _list = mock_list(&mut server, "0", body, 1).await;
    let detail = mock_detail(&mut server, "/pokemon/25", detail_json(25, "pikachu", "electric"), 1).await;

    let mut dex = dex_for(&server);
    dex.load_initial().await.unwrap();
    dex.search("25").await.unwrap();
    match dex.screen() {
        Screen::Detail { entry } => assert_eq!(entry.number, "#025"),
        other => panic!("unexpected screen {other:?}"),
    }

    dex.back();
    dex.search("0x19").await.unwrap();
    detail.assert_async().await;
    assert_eq!(dex.current().map(|d| d.id), Some(25));
}

#[tokio::test]
async fn search_miss_reports_not_found_with_suggestions() {
    let mut server = mockito::Server::new_async().await;
    let body = list_json(&server);
    let _list = mock_list(&mut server, "0", body, 1).await;
    let stray = server
        .mock("GET", Matcher::Regex(r"^/pokemon/\d+".to_string()))
        .expect(0)
        .create_async()
        .await;

    let mut dex = dex_for(&server);
    dex.load_initial().await.unwrap();
    let err = dex.search("bulbasaurr").await.unwrap_err();
    stray.assert_async().await;

    assert_eq!(dex.error(), Some("no entry found with that name or ID"));
    match err {
        DexError::NotFound { term, suggestions } => {
            assert_eq!(term, "bulbasaurr");
            assert_eq!(suggestions[0], "bulbasaur");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(dex.view(), View::List);
}

#[tokio::test]
async fn out_of_range_id_is_not_fetched() {
    let mut server = mockito::Server::new_async().await;
    let body = list_json(&server);
    let _list = mock_list(&mut server, "0", body, 1).await;

    let stray = server
        .mock("GET", Matcher::Regex(r"^/pokemon/\d+".to_string()))
        .expect(0)
        .create_async()
        .await;

    let mut dex = dex_for(&server);
    dex.load_initial().await.unwrap();
    assert!(matches!(
        dex.search("1011").await,
        Err(DexError::NotFound { .. })
    ));
    assert!(matches!(
        dex.search("0x3f3").await,
        Err(DexError::NotFound { .. })
    ));
    stray.assert_async().await;
}

#[tokio::test]
async fn empty_search_reloads_the_initial_list() {
    let mut server = mockito::Server::new_async().await;
    let body = list_json(&server);
    let list = mock_list(&mut server, "0", body, 2).await;
    let _detail = mock_detail(&mut server, "/pokemon/1/", detail_json(1, "bulbasaur", "grass"), 1).await;

    let mut dex = dex_for(&server);
    dex.load_initial().await.unwrap();
    dex.select(1).await.unwrap();
    dex.search("   ").await.unwrap();
    list.assert_async().await;
    assert_eq!(dex.view(), View::List);
}

#[tokio::test]
async fn failed_detail_fetch_during_search_sets_error() {
    let mut server = mockito::Server::new_async().await;
    let body = list_json(&server);
    let _list = mock_list(&mut server, "0", body, 1).await;
    let _broken = server
        .mock("GET", "/pokemon/1/")
        .with_status(500)
        .create_async()
        .await;

    let mut dex = dex_for(&server);
    dex.load_initial().await.unwrap();
    let err = dex.search("bulba").await.unwrap_err();
    match &err {
        DexError::Search { source } => assert_eq!(source.status(), Some(500)),
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(
        dex.error(),
        Some("error while searching: could not fetch entry details")
    );
    assert_eq!(dex.view(), View::List);
    assert!(!dex.is_loading());
}

#[tokio::test]
async fn failed_list_fetch_sets_error() {
    let mut server = mockito::Server::new_async().await;
    let _list = server
        .mock("GET", "/pokemon")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let mut dex = dex_for(&server);
    let err = dex.load_initial().await.unwrap_err();
    assert!(matches!(err, DexError::LoadList { .. }));
    assert_eq!(
        dex.error(),
        Some("failed to load entry list: could not fetch the entry list")
    );
    assert!(matches!(dex.screen(), Screen::Empty));
}

#[tokio::test]
async fn page_links_are_followed() {
    let mut server = mockito::Server::new_async().await;
    let first = list_json(&server);
    let second = second_page_json(&server);
    let _first = mock_list(&mut server, "0", first, 2).await;
    let _second = mock_list(&mut server, "3", second, 1).await;

    let mut dex = dex_for(&server);
    dex.load_initial().await.unwrap();
    assert!(matches!(
        dex.previous_page().await,
        Err(DexError::NoPage {
            direction: "previous"
        })
    ));

    dex.next_page().await.unwrap();
    assert_eq!(dex.page().offset, 3);
    assert_eq!(dex.entries()[0].name, "charmeleon");
    assert!(dex.error().is_none());
    assert!(matches!(
        dex.next_page().await,
        Err(DexError::NoPage { direction: "next" })
    ));

    dex.previous_page().await.unwrap();
    assert_eq!(dex.page().offset, 0);
    assert_eq!(dex.entries()[0].name, "bulbasaur");
}

#[tokio::test]
async fn prefetch_fills_the_cache_used_by_select() {
    let mut server = mockito::Server::new_async().await;
    let body = list_json(&server);
    let _list = mock_list(&mut server, "0", body, 1).await;
    let d1 = mock_detail(&mut server, "/pokemon/1/", detail_json(1, "bulbasaur", "grass"), 1).await;
    let d2 = mock_detail(&mut server, "/pokemon/2/", detail_json(2, "ivysaur", "grass"), 1).await;
    let d4 = mock_detail(&mut server, "/pokemon/4/", detail_json(4, "charmander", "fire"), 1).await;

    let mut dex = Dex::new(Options {
        client: ClientOptions {
            api_url: server.url(),
            timeout_seconds: 5,
            proxy: None,
        },
        limit: 3,
        rate: 100,
        concurrency: 3,
        locale: Locale::Pl,
        ..Options::default()
    })
    .unwrap();
    dex.load_initial().await.unwrap();
    assert_eq!(dex.prefetch_details().await, 3);
    assert_eq!(dex.prefetch_details().await, 0);
    match dex.screen() {
        Screen::List { cards, .. } => {
            assert!(cards.iter().all(|c| c.has_details));
            assert_eq!(cards[2].types[0].name, "fire");
            assert_eq!(cards[0].types[0].label, "Grass");
        }
        other => panic!("unexpected screen {other:?}"),
    }

    dex.select(3).await.unwrap();
    d1.assert_async().await;
    d2.assert_async().await;
    d4.assert_async().await;
    match dex.screen() {
        Screen::Detail { entry } => {
            assert_eq!(entry.title, "Charmander");
            assert_eq!(entry.stats[1].label, "Atak");
        }
        other => panic!("unexpected screen {other:?}"),
    }
}
