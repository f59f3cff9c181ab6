//! Host environment
//!
//! Everything the helper needs from a browser goes through [`Host`]: the
//! document, `matchMedia`, the device pixel ratio, image loading and the
//! resize notification source. [`Window`] is a headless implementation
//! backed by an in-memory document.

use std::collections::{HashMap, VecDeque};

use rwd_css::{InlineStyle, Length, MediaEnvironment, MediaType};
use rwd_dom::{Document, NodeId};

/// Handle for a bound event listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

impl ListenerId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Notifications a host queues for the helper
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The viewport was resized; one event per bound listener
    Resize { listener: ListenerId },
    /// An image finished loading
    ImageLoaded { img: NodeId, url: String },
    /// An image could not be fetched or decoded
    ImageFailed { img: NodeId, url: String },
}

/// The environment the helper runs in
pub trait Host {
    /// The page
    fn document(&self) -> &Document;

    /// The page, mutably
    fn document_mut(&mut self) -> &mut Document;

    /// `window.matchMedia(query).matches`
    fn match_media(&self, query: &str) -> bool;

    /// `window.devicePixelRatio`, if the host knows it
    fn device_pixel_ratio(&self) -> Option<f64>;

    /// Whether `<picture>` is handled natively
    fn supports_native_picture(&self) -> bool;

    /// `clientWidth`/`clientHeight` of a node after layout
    fn client_size(&self, node: NodeId) -> (u32, u32);

    /// Decoded size of an image asset
    fn natural_size(&self, url: &str) -> Option<(u32, u32)>;

    /// Start loading `url` into `img`; completion arrives as a [`HostEvent`]
    fn fetch_image(&mut self, img: NodeId, url: &str);

    /// Bind a resize listener
    fn add_resize_listener(&mut self) -> ListenerId;

    /// Next queued notification
    fn poll_event(&mut self) -> Option<HostEvent>;
}

/// Headless browser window
#[derive(Debug)]
pub struct Window {
    document: Document,
    width: u32,
    height: u32,
    device_pixel_ratio: Option<f64>,
    media_type: MediaType,
    native_picture: bool,
    /// Known image assets and their natural sizes
    images: HashMap<String, (u32, u32)>,
    /// Every URL fetched, in order
    fetches: Vec<String>,
    resize_listeners: Vec<ListenerId>,
    next_listener: u32,
    events: VecDeque<HostEvent>,
}

impl Window {
    /// Create a window showing `document` at the given viewport size
    pub fn new(document: Document, width: u32, height: u32) -> Self {
        Self {
            document,
            width,
            height,
            device_pixel_ratio: Some(1.0),
            media_type: MediaType::Screen,
            native_picture: false,
            images: HashMap::new(),
            fetches: Vec::new(),
            resize_listeners: Vec::new(),
            next_listener: 0,
            events: VecDeque::new(),
        }
    }

    /// Parse `html` and show it at the given viewport size
    pub fn from_html(html: &str, width: u32, height: u32) -> Result<Self, rwd_html::ParseError> {
        Ok(Self::new(rwd_html::parse(html)?, width, height))
    }

    /// Set (or clear) the reported device pixel ratio
    pub fn set_device_pixel_ratio(&mut self, ratio: Option<f64>) {
        self.device_pixel_ratio = ratio;
    }

    /// Pretend the host renders `<picture>` itself
    pub fn set_native_picture(&mut self, native: bool) {
        self.native_picture = native;
    }

    /// Switch the surface type (screen, print)
    pub fn set_media_type(&mut self, media_type: MediaType) {
        self.media_type = media_type;
    }

    /// Register an image asset the window can "download"
    pub fn add_image(&mut self, url: &str, width: u32, height: u32) {
        self.images.insert(url.to_string(), (width, height));
    }

    /// Resize the viewport, notifying every bound listener
    pub fn resize(&mut self, width: u32, height: u32) {
        tracing::trace!("Window resized to {}x{}", width, height);
        self.width = width;
        self.height = height;
        for &listener in &self.resize_listeners {
            self.events.push_back(HostEvent::Resize { listener });
        }
    }

    /// Viewport size in CSS pixels
    pub fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// URLs fetched so far
    pub fn fetches(&self) -> &[String] {
        &self.fetches
    }

    /// Number of bound resize listeners
    pub fn resize_listener_count(&self) -> usize {
        self.resize_listeners.len()
    }

    /// Number of queued, unhandled events
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// What media queries are evaluated against
    pub fn media_environment(&self) -> MediaEnvironment {
        MediaEnvironment {
            width: self.width as f64,
            height: self.height as f64,
            device_pixel_ratio: self.device_pixel_ratio.unwrap_or(1.0),
            media_type: self.media_type,
        }
    }

    /// Tiny layout: only what a detached-or-fixed probe needs
    ///
    /// Fixed boxes resolve percentages against the viewport, other boxes
    /// only honour absolute lengths and are otherwise zero-sized.
    fn layout(&self, node: NodeId) -> (u32, u32) {
        let tree = self.document.tree();
        if !tree.is_connected(node) {
            return (0, 0);
        }
        let Some(elem) = tree.element(node) else {
            return (0, 0);
        };

        let style = elem.get_attr("style").unwrap_or("");
        let style = InlineStyle::parse(style).unwrap_or_else(|e| {
            tracing::debug!("Laying out {:?} without its style: {}", node, e);
            InlineStyle::default()
        });
        if style.display_none {
            return (0, 0);
        }
        let viewport = (self.width as f64, self.height as f64);

        let resolve = |length: Option<Length>, reference: f64| -> u32 {
            let Some(length) = length else {
                return 0;
            };
            if length.is_relative() && !style.fixed {
                return 0;
            }
            length.to_px(reference, viewport).max(0.0).round() as u32
        };

        (resolve(style.width, viewport.0), resolve(style.height, viewport.1))
    }
}

impl Host for Window {
    fn document(&self) -> &Document {
        &self.document
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    fn match_media(&self, query: &str) -> bool {
        rwd_css::evaluate(query, &self.media_environment())
    }

    fn device_pixel_ratio(&self) -> Option<f64> {
        self.device_pixel_ratio
    }

    fn supports_native_picture(&self) -> bool {
        self.native_picture
    }

    fn client_size(&self, node: NodeId) -> (u32, u32) {
        self.layout(node)
    }

    fn natural_size(&self, url: &str) -> Option<(u32, u32)> {
        self.images.get(url).copied()
    }

    fn fetch_image(&mut self, img: NodeId, url: &str) {
        tracing::trace!("Fetching image {} for {:?}", url, img);
        self.fetches.push(url.to_string());
        let url = url.to_string();
        let event = if self.images.contains_key(&url) {
            HostEvent::ImageLoaded { img, url }
        } else {
            HostEvent::ImageFailed { img, url }
        };
        self.events.push_back(event);
    }

    fn add_resize_listener(&mut self) -> ListenerId {
        let id = ListenerId::new(self.next_listener);
        self.next_listener += 1;
        self.resize_listeners.push(id);
        id
    }

    fn poll_event(&mut self) -> Option<HostEvent> {
        self.events.pop_front()
    }
}
