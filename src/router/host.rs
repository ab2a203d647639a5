//! Collaborator seams used by the router.
//!
//! The browser layer implements these over `web_sys`; tests implement them
//! with recording fakes.

use crate::navigation::{Heading, Section};

/// The page the router draws on
pub trait DocumentSurface {
    fn show_loading(&mut self);
    fn hide_loading(&mut self);
    fn clear_content(&mut self);
    /// Replace the content container with rendered markup
    fn set_content(&mut self, html: &str);
    fn show_error(&mut self);
    fn hide_error(&mut self);

    /// Text of the document's top-level heading
    fn title_heading(&self) -> Option<String>;
    fn set_document_title(&mut self, title: &str);

    fn image_sources(&self) -> Vec<String>;
    fn set_image_source(&mut self, index: usize, src: &str);

    /// h2..h4 in document order
    fn headings(&self) -> Vec<Heading>;
    /// Assign ids and deep-link affordances; `sections` matches `headings()` order
    fn decorate_headings(&mut self, chapter: &str, sections: &[Section]);
    /// Replace the outline after the top-level heading
    fn install_outline(&mut self, sections: &[&Section]);

    /// Scroll the heading with this id into view. False if there is none.
    fn scroll_to_anchor(&mut self, slug: &str) -> bool;
    fn scroll_to_fraction(&mut self, fraction: f64);

    fn set_adjacency(&mut self, previous: Option<&str>, next: Option<&str>);

    /// Page URL without fragment, used as the comment widget's canonical base
    fn page_url(&self) -> String;
}

/// Markdown to sanitized markup
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> String;
}

pub trait CodeHighlighter {
    /// Decorate code blocks inside `container` in place
    fn highlight(&mut self, container: &str);
}

pub trait CommentWidget {
    fn reset(&mut self, identifier: &str, url: &str);
}

/// Opaque handle of a running indicator animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub i32);

/// Repeating loading animation. Every started handle must be cancelled once.
pub trait LoadingIndicator {
    fn start(&mut self) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
}

/// No-op highlighter and comment widget, for sites without either
#[derive(Debug, Default, Clone, Copy)]
pub struct Disabled;

impl CodeHighlighter for Disabled {
    fn highlight(&mut self, _container: &str) {}
}

impl CommentWidget for Disabled {
    fn reset(&mut self, _identifier: &str, _url: &str) {}
}

/// Everything besides the page and the store
pub struct Collaborators {
    pub renderer: Box<dyn MarkdownRenderer>,
    pub highlighter: Box<dyn CodeHighlighter>,
    pub comments: Box<dyn CommentWidget>,
    pub indicator: Box<dyn LoadingIndicator>,
}

impl Collaborators {
    pub fn new(renderer: Box<dyn MarkdownRenderer>, indicator: Box<dyn LoadingIndicator>) -> Self {
        Self {
            renderer,
            highlighter: Box::new(Disabled),
            comments: Box::new(Disabled),
            indicator,
        }
    }

    pub fn with_highlighter(mut self, highlighter: Box<dyn CodeHighlighter>) -> Self {
        self.highlighter = highlighter;
        self
    }

    pub fn with_comments(mut self, comments: Box<dyn CommentWidget>) -> Self {
        self.comments = comments;
        self
    }
}
