//! Slide deck contract
//!
//! The host decodes a presentation into images asynchronously and feeds the
//! results through a [`SlideLoader`], which reports progress and hands the
//! finished [`SlideDeck`] to the game. A page that fails to decode becomes a
//! text placeholder; one bad page never aborts the deck.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_SLIDES;

/// Titles of the built-in deck used when no presentation is supplied
pub const DEMO_TITLES: [&str; 7] = [
    "Welcome Slide",
    "Game Mechanics",
    "Player Movement",
    "Combat System",
    "Room Transitions",
    "Boss Fight",
    "Victory Screen",
];

#[derive(Debug, Error)]
pub enum SlideError {
    #[error("failed to read presentation: {0}")]
    Read(String),
    #[error("presentation has no pages")]
    Empty,
    #[error("failed to decode page {page}: {reason}")]
    Decode { page: usize, reason: String },
}

/// A decoded slide image owned by the host, referenced by handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideImage {
    pub handle: u32,
    pub width: u32,
    pub height: u32,
}

/// One room's backdrop: an image, or placeholder text when there is none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    pub image: Option<SlideImage>,
}

impl Slide {
    pub fn placeholder(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image: None,
        }
    }

    pub fn with_image(title: impl Into<String>, image: SlideImage) -> Self {
        Self {
            title: title.into(),
            image: Some(image),
        }
    }
}

/// Ordered slides, one room per slide
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SlideDeck {
    slides: Vec<Slide>,
}

impl SlideDeck {
    /// Build a deck, ignoring anything past the page cap
    pub fn from_slides(mut slides: Vec<Slide>) -> Self {
        if slides.len() > MAX_SLIDES {
            log::warn!(
                "Presentation has {} slides, keeping the first {}",
                slides.len(),
                MAX_SLIDES
            );
            slides.truncate(MAX_SLIDES);
        }
        Self { slides }
    }

    /// Placeholder deck with the built-in titles
    pub fn demo() -> Self {
        Self::from_slides(DEMO_TITLES.iter().map(|t| Slide::placeholder(*t)).collect())
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter()
    }

    /// Number of slides backed by a real image
    pub fn image_count(&self) -> usize {
        self.slides.iter().filter(|s| s.image.is_some()).count()
    }
}

type ProgressFn = Box<dyn FnMut(f32, &str)>;
type LoadFn = Box<dyn FnMut(&SlideDeck)>;

/// Collects decoded pages and reports loading progress.
///
/// Progress runs 10% (reading) → 20% (parsing) → 30% (document ready), then
/// 30–100% as pages arrive, and 100% once finished. A failed load reports 0%.
#[derive(Default)]
pub struct SlideLoader {
    total: usize,
    slides: Vec<Slide>,
    failures: usize,
    progress: f32,
    on_progress: Option<ProgressFn>,
    on_load: Option<LoadFn>,
}

impl SlideLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_progress(mut self, f: impl FnMut(f32, &str) + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    pub fn on_load(mut self, f: impl FnMut(&SlideDeck) + 'static) -> Self {
        self.on_load = Some(Box::new(f));
        self
    }

    fn report(&mut self, progress: f32, message: &str) {
        self.progress = progress;
        log::debug!("Slide loading: {:.0}% - {}", progress, message);
        if let Some(cb) = self.on_progress.as_mut() {
            cb(progress, message);
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Pages expected after `document_ready`
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn begin(&mut self) {
        self.slides.clear();
        self.failures = 0;
        self.total = 0;
        self.report(10.0, "Reading presentation...");
    }

    pub fn parsing(&mut self) {
        self.report(20.0, "Loading presentation...");
    }

    /// The document opened with `page_count` pages. Returns how many pages to
    /// decode (capped).
    pub fn document_ready(&mut self, page_count: usize) -> Result<usize, SlideError> {
        if page_count == 0 {
            return Err(SlideError::Empty);
        }
        self.total = page_count.min(MAX_SLIDES);
        log::info!("Processing {} pages", self.total);
        self.report(30.0, "Presentation loaded, processing pages...");
        Ok(self.total)
    }

    /// Record the decode result for the next page, in page order
    pub fn record(&mut self, result: Result<SlideImage, SlideError>) {
        if self.total == 0 || self.slides.len() >= self.total {
            log::warn!("Ignoring slide beyond the expected page count");
            return;
        }
        let page = self.slides.len() + 1;
        let title = format!("Page {page}");
        match result {
            Ok(image) => self.slides.push(Slide::with_image(title, image)),
            Err(err) => {
                log::warn!("{err}");
                self.failures += 1;
                self.slides.push(Slide::placeholder(title));
            }
        }
        let progress = 30.0 + (page as f32 / self.total as f32) * 70.0;
        let message = format!("Processing page {}/{}...", page, self.total);
        self.report(progress, &message);
    }

    /// Finish loading. Pages never recorded become placeholders.
    pub fn finish(&mut self) -> SlideDeck {
        while self.slides.len() < self.total {
            let page = self.slides.len() + 1;
            self.slides.push(Slide::placeholder(format!("Page {page}")));
        }
        let deck = SlideDeck::from_slides(std::mem::take(&mut self.slides));
        self.report(100.0, "Presentation processing complete!");
        if let Some(cb) = self.on_load.as_mut() {
            cb(&deck);
        }
        deck
    }

    /// The whole load failed; the caller keeps its current deck
    pub fn fail(&mut self, err: &SlideError) {
        log::error!("Error loading presentation: {err}");
        self.slides.clear();
        self.total = 0;
        self.report(0.0, "Error loading presentation");
    }
}
