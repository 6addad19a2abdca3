use std::collections::HashMap;
use std::num::NonZeroU32;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use governor::{Quota, RateLimiter};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use thiserror::Error;
use tokio::time::Instant;

use crate::client::{ClientError, ClientOptions, DexClient};
use crate::console;
use crate::model::{EntryDetail, EntryPage, EntrySummary};
use crate::search::{self, SearchPlan};
use crate::view::{self, DetailView, ListCard, Locale};

pub const DEFAULT_LIMIT: u32 = 20;

#[derive(Clone, Debug)]
pub struct Options {
    pub client: ClientOptions,
    pub limit: u32,
    pub offset: u32,
    pub max_id: u64,
    pub sprite_base: String,
    pub locale: Locale,
    pub rate: u32,
    pub concurrency: u32,
    pub show_progress: bool,
    pub verbose: u8,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            client: ClientOptions::default(),
            limit: DEFAULT_LIMIT,
            offset: 0,
            max_id: search::DEFAULT_MAX_ID,
            sprite_base: view::DEFAULT_SPRITE_BASE.to_string(),
            locale: Locale::En,
            rate: 10,
            concurrency: 5,
            show_progress: false,
            verbose: 0,
        }
    }
}

#[derive(Debug, Error)]
pub enum DexError {
    #[error("failed to setup client: {source}")]
    Client {
        #[source]
        source: ClientError,
    },

    #[error("invalid limit {value}, expected a positive integer")]
    InvalidLimit { value: u32 },

    #[error("failed to load entry list: could not fetch the entry list")]
    LoadList {
        #[source]
        source: ClientError,
    },

    #[error("failed to load entry details: could not fetch entry details")]
    LoadDetails {
        #[source]
        source: ClientError,
    },

    #[error("error while searching: could not fetch entry details")]
    Search {
        #[source]
        source: ClientError,
    },

    #[error("no entry found with that name or ID")]
    NotFound {
        term: String,
        suggestions: Vec<String>,
    },

    #[error("no card at position {position} (the list has {len})")]
    NoSuchCard { position: usize, len: usize },

    #[error("there is no {direction} page")]
    NoPage { direction: &'static str },

    #[error("failed to load {direction} page: could not fetch the entry list")]
    LoadPage {
        direction: &'static str,
        #[source]
        source: ClientError,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    List,
    Detail,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub count: u32,
    pub offset: u32,
    pub limit: u32,
    pub next: Option<String>,
    pub previous: Option<String>,
}

/// Renderable snapshot of whatever is on screen.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum Screen {
    List { page: PageInfo, cards: Vec<ListCard> },
    Detail { entry: DetailView },
    Empty,
}

enum Lookup {
    Url(String),
    Id(u64),
}

pub struct Dex {
    client: DexClient,
    options: Options,
    entries: Vec<EntrySummary>,
    page: PageInfo,
    current: Option<EntryDetail>,
    details: HashMap<String, EntryDetail>,
    view: View,
    loading: Option<ProgressBar>,
    error: Option<String>,
}

impl Dex {
    pub fn new(options: Options) -> Result<Self, DexError> {
        if options.limit == 0 {
            return Err(DexError::InvalidLimit {
                value: options.limit,
            });
        }
        let client =
            DexClient::new(&options.client).map_err(|e| DexError::Client { source: e })?;
        let page = PageInfo {
            offset: options.offset,
            limit: options.limit,
            ..PageInfo::default()
        };
        Ok(Self {
            client,
            options,
            entries: Vec::new(),
            page,
            current: None,
            details: HashMap::new(),
            view: View::List,
            loading: None,
            error: None,
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn entries(&self) -> &[EntrySummary] {
        &self.entries
    }

    pub fn page(&self) -> &PageInfo {
        &self.page
    }

    pub fn current(&self) -> Option<&EntryDetail> {
        self.current.as_ref()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn hide_error(&mut self) {
        self.error = None;
    }

    /// Cards of the loaded page; entries with cached details carry their types.
    pub fn cards(&self) -> Vec<ListCard> {
        let mut cards =
            view::build_cards(&self.entries, self.page.offset, &self.options.sprite_base);
        for card in cards.iter_mut() {
            if let Some(detail) = self.details.get(&card.detail_url) {
                view::attach_details(card, detail);
            }
        }
        cards
    }

    pub fn screen(&self) -> Screen {
        match (self.view, self.current.as_ref()) {
            (View::Detail, Some(detail)) => Screen::Detail {
                entry: view::build_detail(detail, self.options.locale),
            },
            (View::List, _) if !self.entries.is_empty() => Screen::List {
                page: self.page.clone(),
                cards: self.cards(),
            },
            _ => Screen::Empty,
        }
    }

    /// Fetches the configured first page and shows it.
    pub async fn load_initial(&mut self) -> Result<(), DexError> {
        self.show_loading(true);
        let result = self.fetch_first_page().await;
        self.show_loading(false);
        match result {
            Ok(page) => {
                self.apply_page(page, self.options.offset);
                self.show_list();
                self.hide_error();
                Ok(())
            }
            Err(e) => Err(self.fail(DexError::LoadList { source: e })),
        }
    }

    /// Opens the card at a 1-based position of the loaded list.
    pub async fn select(&mut self, position: usize) -> Result<(), DexError> {
        let entry = match position.checked_sub(1).and_then(|i| self.entries.get(i)) {
            Some(entry) => entry.clone(),
            None => {
                return Err(self.fail(DexError::NoSuchCard {
                    position,
                    len: self.entries.len(),
                }))
            }
        };
        self.show_loading(true);
        let result = self.fetch_details_cached(&entry.url).await;
        self.show_loading(false);
        match result {
            Ok(detail) => {
                self.show_detail(detail);
                Ok(())
            }
            Err(e) => Err(self.fail(DexError::LoadDetails { source: e })),
        }
    }

    /// Search box semantics: empty reloads, loaded names first, then id lookup.
    pub async fn search(&mut self, raw: &str) -> Result<(), DexError> {
        let plan = search::plan_search(raw, &self.entries, self.options.max_id);
        self.debug(format!("search {:?} -> {:?}", raw, plan));

        let lookup = match plan {
            SearchPlan::Reload => return self.load_initial().await,
            SearchPlan::Loaded { entry, .. } => Lookup::Url(entry.url),
            SearchPlan::ById(id) => Lookup::Id(id),
            SearchPlan::NotFound { term, suggestions } => {
                return Err(self.fail(DexError::NotFound { term, suggestions }));
            }
        };

        self.show_loading(true);
        self.hide_error();
        let result = match lookup {
            Lookup::Url(url) => self.fetch_details_cached(&url).await,
            Lookup::Id(id) => self.fetch_by_id(id).await,
        };
        self.show_loading(false);
        match result {
            Ok(detail) => {
                self.show_detail(detail);
                Ok(())
            }
            Err(e) => Err(self.fail(DexError::Search { source: e })),
        }
    }

    /// Returns to the list without refetching it.
    pub fn back(&mut self) {
        self.show_list();
    }

    pub async fn next_page(&mut self) -> Result<(), DexError> {
        let link = self.page.next.clone();
        self.follow_page(link, "next").await
    }

    pub async fn previous_page(&mut self) -> Result<(), DexError> {
        let link = self.page.previous.clone();
        self.follow_page(link, "previous").await
    }

    /// Fetches the details of every loaded entry, bounded by `concurrency`
    /// in flight and `rate` requests per second. Returns how many were
    /// fetched; failures are logged and skipped.
    pub async fn prefetch_details(&mut self) -> usize {
        let pending: Vec<String> = self
            .entries
            .iter()
            .map(|e| e.url.clone())
            .filter(|url| !self.details.contains_key(url))
            .collect();
        if pending.is_empty() {
            return 0;
        }

        let rate = NonZeroU32::new(self.options.rate.max(1)).unwrap_or(NonZeroU32::MIN);
        let lim = RateLimiter::direct(Quota::per_second(rate));
        let concurrency = self.options.concurrency.max(1) as usize;

        let pb = self.progress_bar(pending.len() as u64);
        pb.set_message("prefetching details");
        let client = &self.client;
        let lim = &lim;
        let pb_ref = &pb;
        let results: Vec<(String, Result<EntryDetail, ClientError>)> = stream::iter(pending)
            .map(|url| async move {
                lim.until_ready().await;
                let res = client.fetch_details(&url).await;
                pb_ref.inc(1);
                (url, res)
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;
        pb.finish_and_clear();

        let mut fetched = 0;
        for (url, res) in results {
            match res {
                Ok(detail) => {
                    self.details.insert(url, detail);
                    fetched += 1;
                }
                Err(e) => {
                    console::warn(&format!("prefetch of {url} failed: {e}"));
                }
            }
        }
        fetched
    }

    async fn follow_page(
        &mut self,
        link: Option<String>,
        direction: &'static str,
    ) -> Result<(), DexError> {
        let link = match link {
            Some(link) => link,
            None => return Err(self.fail(DexError::NoPage { direction })),
        };
        self.show_loading(true);
        self.debug(format!("GET {link}"));
        let result = self.client.fetch_page(&link).await;
        self.show_loading(false);
        match result {
            Ok(page) => {
                let fallback = match direction {
                    "next" => self.page.offset.saturating_add(self.page.limit),
                    _ => self.page.offset.saturating_sub(self.page.limit),
                };
                let offset = offset_from_link(&link).unwrap_or(fallback);
                self.apply_page(page, offset);
                self.show_list();
                self.hide_error();
                Ok(())
            }
            Err(e) => Err(self.fail(DexError::LoadPage {
                direction,
                source: e,
            })),
        }
    }

    async fn fetch_first_page(&self) -> Result<EntryPage, ClientError> {
        let started = Instant::now();
        let url = self.client.list_url(self.options.limit, self.options.offset)?;
        self.debug(format!("GET {url}"));
        let page = self
            .client
            .fetch_list(self.options.limit, self.options.offset)
            .await?;
        self.debug(format!(
            "list fetched: {} entries in {}ms",
            page.results.len(),
            started.elapsed().as_millis()
        ));
        Ok(page)
    }

    async fn fetch_details_cached(&mut self, url: &str) -> Result<EntryDetail, ClientError> {
        if let Some(detail) = self.details.get(url) {
            self.debug(format!("cached {url}"));
            return Ok(detail.clone());
        }
        let started = Instant::now();
        self.debug(format!("GET {url}"));
        let detail = self.client.fetch_details(url).await?;
        self.debug(format!(
            "details for {} fetched in {}ms",
            detail.name,
            started.elapsed().as_millis()
        ));
        self.details.insert(url.to_string(), detail.clone());
        Ok(detail)
    }

    async fn fetch_by_id(&mut self, id: u64) -> Result<EntryDetail, ClientError> {
        let url = self.client.detail_url_for_id(id);
        if let Some(detail) = self.details.get(&url) {
            self.debug(format!("cached {url}"));
            return Ok(detail.clone());
        }
        let started = Instant::now();
        self.debug(format!("GET {url}"));
        let detail = self.client.fetch_by_id(id).await?;
        self.debug(format!(
            "details for id {id} fetched in {}ms",
            started.elapsed().as_millis()
        ));
        self.details.insert(url, detail.clone());
        Ok(detail)
    }

    fn apply_page(&mut self, page: EntryPage, offset: u32) {
        self.page = PageInfo {
            count: page.count,
            offset,
            limit: self.page.limit,
            next: page.next,
            previous: page.previous,
        };
        self.entries = page.results;
    }

    fn show_list(&mut self) {
        self.current = None;
        self.view = View::List;
    }

    fn show_detail(&mut self, detail: EntryDetail) {
        self.current = Some(detail);
        self.view = View::Detail;
    }

    fn fail(&mut self, err: DexError) -> DexError {
        self.error = Some(err.to_string());
        err
    }

    fn show_loading(&mut self, show: bool) {
        if show {
            if self.loading.is_none() {
                let pb = self.progress_bar(0);
                pb.set_message(self.options.locale.labels().loading);
                self.loading = Some(pb);
            }
        } else if let Some(pb) = self.loading.take() {
            pb.finish_and_clear();
        }
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }
        let pb = if len == 0 {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::new(len)
        };
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.enable_steady_tick(Duration::from_millis(100));
        let style = if len == 0 {
            ProgressStyle::default_spinner().template("{spinner:.blue} {msg}")
        } else {
            ProgressStyle::default_bar()
                .template("{spinner:.blue} {msg} [{bar:30}] {pos}/{len}")
                .map(|s| s.progress_chars("#>-"))
        };
        if let Ok(style) = style {
            pb.set_style(style);
        }
        pb
    }

    fn debug(&self, message: String) {
        if self.options.verbose == 0 {
            return;
        }
        let line = console::format_line(console::Level::Debug, &message);
        match self.loading.as_ref() {
            Some(pb) if !pb.is_hidden() => pb.println(line),
            _ => eprintln!("{line}"),
        }
    }
}

fn offset_from_link(link: &str) -> Option<u32> {
    let url = reqwest::Url::parse(link).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "offset")
        .and_then(|(_, v)| v.parse::<u32>().ok())
}
