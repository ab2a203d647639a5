//! Router: the navigation state machine
//!
//! # Design Principles
//! 1. State machine: Idle → Loading → Rendered, with Error reachable from Loading
//! 2. Every address change re-fetches and re-renders; nothing is cached
//! 3. Each Loading entry gets a generation number. A completion carrying an
//!    older generation is stale and is dropped without touching the page.
//!
//! # Usage
//! ```rust,ignore
//! let mut router = Router::new(config, surface, collaborators, chapters, store);
//! let request = router.begin("#guide/setup#Installation");
//! let body = fetch(&request.path).await;
//! router.complete(request.generation, body);
//! ```

pub mod host;


use serde::{Deserialize, Serialize};

use crate::config::DittoConfig;
use crate::error::DittoError;
use crate::navigation::{
    document_path, normalize_asset, Adjacency, Address, AddressParser, ChapterIndex, KeyValueStore,
    ProgressStore, SectionIndex, DELIMITER,
};
use host::{Collaborators, DocumentSurface, TimerHandle};

// =============================================================================
// State Machine
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavState {
    /// Nothing requested yet
    Idle,
    /// Fetch in flight, loading indicator running
    Loading,
    Rendered,
    /// Last fetch failed, error affordance visible
    Error,
}

impl NavState {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavState::Idle => "idle",
            NavState::Loading => "loading",
            NavState::Rendered => "rendered",
            NavState::Error => "error",
        }
    }
}

/// What the caller must fetch for a navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub generation: u64,
    pub address: Address,
    pub path: String,
}

/// Outcome of delivering a fetch result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Rendered,
    Failed,
    /// A newer navigation started after this fetch; result dropped
    Stale,
}

struct Pending {
    generation: u64,
    address: Address,
    /// Fragment as requested, reserved anchors included
    fragment: String,
    timer: TimerHandle,
}

/// Page title for a document heading, avoiding "Docs - Docs"
pub fn page_title(heading: Option<&str>, site_title: &str) -> String {
    match heading.map(str::trim).filter(|h| !h.is_empty()) {
        None => site_title.to_string(),
        Some(heading) if heading == site_title || site_title.is_empty() => heading.to_string(),
        Some(heading) => format!("{} - {}", heading, site_title),
    }
}

// =============================================================================
// Router
// =============================================================================

pub struct Router<S: DocumentSurface> {
    config: DittoConfig,
    parser: AddressParser,
    surface: S,
    collaborators: Collaborators,
    /// `None` when `save_progress` is off
    progress: Option<ProgressStore<Box<dyn KeyValueStore>>>,
    chapters: ChapterIndex,
    sections: SectionIndex,
    state: NavState,
    generation: u64,
    pending: Option<Pending>,
    current: Option<Address>,
}

impl<S: DocumentSurface> Router<S> {
    pub fn new(
        config: DittoConfig,
        surface: S,
        collaborators: Collaborators,
        chapters: ChapterIndex,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let progress = config.save_progress.then(|| ProgressStore::new(store));
        Self {
            parser: AddressParser::new(config.comment_prefix.clone()),
            config,
            surface,
            collaborators,
            progress,
            chapters,
            sections: SectionIndex::default(),
            state: NavState::Idle,
            generation: 0,
            pending: None,
            current: None,
        }
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Address of the document currently on screen
    pub fn current(&self) -> Option<&Address> {
        self.current.as_ref()
    }

    pub fn sections(&self) -> &SectionIndex {
        &self.sections
    }

    pub fn chapters(&self) -> &ChapterIndex {
        &self.chapters
    }

    pub fn config(&self) -> &DittoConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Adjacency of the document on screen
    pub fn adjacency(&self) -> Adjacency {
        self.current
            .as_ref()
            .map(|address| self.chapters.adjacency(address))
            .unwrap_or_default()
    }

    /// Enter Loading for `raw_fragment`.
    ///
    /// Stored progress is reset before anything is fetched when the chapter
    /// changes, so a navigation that fails midway still clears it.
    pub fn begin(&mut self, raw_fragment: &str) -> FetchRequest {
        let address = self.parser.parse(raw_fragment);

        if let Some(progress) = self.progress.as_mut() {
            match progress.reset_on_chapter_change(&address) {
                Ok(true) => console_log!("[Progress] reset for {}", address),
                Ok(false) => {}
                Err(e) => console_warn!("[Progress] {}", e),
            }
        }

        if let Some(superseded) = self.pending.take() {
            console_log!(
                "[Router] {} (gen {}) superseded before completing",
                superseded.address,
                superseded.generation
            );
            self.collaborators.indicator.cancel(superseded.timer);
        }

        self.generation += 1;
        self.state = NavState::Loading;
        self.surface.show_loading();
        self.surface.clear_content();
        let timer = self.collaborators.indicator.start();

        let path = document_path(&address.chapter, &self.config.index);
        console_log!("[Router] loading {} -> {} (gen {})", address, path, self.generation);

        self.pending = Some(Pending {
            generation: self.generation,
            address: address.clone(),
            fragment: raw_fragment.strip_prefix(DELIMITER).unwrap_or(raw_fragment).to_string(),
            timer,
        });

        FetchRequest {
            generation: self.generation,
            address,
            path,
        }
    }

    /// Deliver the fetch result for `generation`
    pub fn complete(&mut self, generation: u64, result: Result<String, DittoError>) -> Completion {
        let pending = match self.pending.take() {
            Some(pending) if pending.generation == generation => pending,
            other => {
                self.pending = other;
                console_log!("[Router] dropping stale result (gen {})", generation);
                return Completion::Stale;
            }
        };

        self.collaborators.indicator.cancel(pending.timer);
        self.surface.hide_loading();

        match result {
            Ok(markdown) => {
                self.render(pending.address, &pending.fragment, &markdown);
                self.state = NavState::Rendered;
                Completion::Rendered
            }
            Err(e) => {
                console_error!("[Router] {}", e);
                // nothing on screen to navigate from
                self.sections = SectionIndex::default();
                self.current = None;
                self.surface.set_adjacency(None, None);
                self.surface.show_error();
                self.state = NavState::Error;
                Completion::Failed
            }
        }
    }

    fn render(&mut self, address: Address, fragment: &str, markdown: &str) {
        self.surface.hide_error();
        let html = self.collaborators.renderer.render(markdown);
        self.surface.set_content(&html);

        let heading = self.surface.title_heading();
        let title = page_title(heading.as_deref(), &self.config.document_title);
        self.surface.set_document_title(&title);

        self.normalize_assets(&address);
        self.build_sections(&address);

        self.collaborators.highlighter.highlight(&self.config.content_id);

        // the url keeps reserved anchors so the widget can jump to a comment
        let url = format!("{}#{}", self.surface.page_url(), fragment);
        self.collaborators.comments.reset(&address.to_fragment(), &url);

        self.restore_position(&address);

        let adjacency = self.chapters.adjacency(&address);
        self.surface
            .set_adjacency(adjacency.previous.as_deref(), adjacency.next.as_deref());

        console_log!(
            "[Router] rendered {} ({} sections)",
            address,
            self.sections.len()
        );
        self.current = Some(address);
    }

    fn normalize_assets(&mut self, address: &Address) {
        let sources = self.surface.image_sources();
        for (i, src) in sources.iter().enumerate() {
            if let Some(rewritten) = normalize_asset(address, src) {
                self.surface.set_image_source(i, &rewritten);
            }
        }
    }

    fn build_sections(&mut self, address: &Address) {
        self.sections = SectionIndex::build(self.surface.headings());
        self.surface
            .decorate_headings(&address.chapter, self.sections.sections());
        let outline = self.sections.outline();
        self.surface.install_outline(&outline);
    }

    /// Explicit anchor, then stored progress for this chapter, then the top
    fn restore_position(&mut self, address: &Address) {
        if let Some(anchor) = address.anchor.as_deref() {
            if self.surface.scroll_to_anchor(anchor) {
                return;
            }
            console_warn!("[Router] no heading for anchor {}", anchor);
        }

        let stored = match self.progress.as_ref().map(|p| p.read()) {
            Some(Ok(progress)) => progress.fraction_for(address),
            Some(Err(e)) => {
                console_warn!("[Progress] {}", e);
                None
            }
            None => None,
        };
        self.surface.scroll_to_fraction(stored.unwrap_or(0.0));
    }

    /// Persist a scroll sample for the document on screen.
    ///
    /// Ignored unless progress saving is on and a document is rendered.
    /// Returns whether anything was written.
    pub fn record_scroll(&mut self, fraction: f64) -> bool {
        if self.state != NavState::Rendered {
            return false;
        }
        let (Some(progress), Some(address)) = (self.progress.as_mut(), self.current.as_ref()) else {
            return false;
        };
        match progress.write(address, fraction) {
            Ok(()) => true,
            Err(e) => {
                console_warn!("[Progress] {}", e);
                false
            }
        }
    }

    /// Stored progress, when saving is enabled
    pub fn reading_progress(&self) -> Option<crate::navigation::ReadingProgress> {
        self.progress.as_ref().and_then(|p| p.read().ok())
    }
}
