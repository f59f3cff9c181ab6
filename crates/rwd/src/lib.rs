//! rwd - responsive design helper
//!
//! Watches named media-query breakpoints declared on `<link>` elements,
//! renders `<picture>`/`<source>` markup on hosts without native support and
//! runs page code when a breakpoint starts or stops matching.
//!
//! ```ignore
//! let window = Window::from_html(html, 1024, 768)?;
//! let mut rwd = Rwd::new(window);
//! rwd.init();
//! rwd.register("small", CodeBlockCallbacks::new().on_match(|name, _| { ... }))?;
//! Selection::select(rwd.host().document(), "picture").picture(&mut rwd, &PictureOptions::new())?;
//! ```

pub mod breakpoints;
pub mod capability;
pub mod code;
pub mod config;
pub mod error;
pub mod events;
pub mod helpers;
pub mod host;
pub mod picture;
pub mod selection;
pub mod viewport;

pub use breakpoints::{Breakpoint, BreakpointChange, BreakpointRegistry};
pub use code::{CodeBlock, CodeBlockCallbacks, CodeBlockDispatcher};
pub use config::RwdConfig;
pub use error::{Result, RwdError};
pub use helpers::Merge;
pub use host::{Host, HostEvent, ListenerId, Window};
pub use picture::{
    ImageCandidate, PictureController, PictureElement, PictureEvent, PictureOptions, SwapEvent,
};
pub use selection::Selection;
pub use viewport::ViewportSize;

use events::EventBinder;
use rwd_dom::NodeId;
use viewport::ViewportSizer;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The helper, bound to one host
pub struct Rwd<H: Host = Window> {
    host: H,
    config: RwdConfig,
    breakpoints: BreakpointRegistry,
    code: CodeBlockDispatcher,
    pictures: PictureController,
    events: EventBinder,
    viewport: ViewportSizer,
}

impl<H: Host> Rwd<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, RwdConfig::default())
    }

    pub fn with_config(host: H, config: RwdConfig) -> Self {
        Self {
            host,
            config,
            breakpoints: BreakpointRegistry::new(),
            code: CodeBlockDispatcher::new(),
            pictures: PictureController::new(),
            events: EventBinder::new(),
            viewport: ViewportSizer::new(),
        }
    }

    /// Discover breakpoints, pick the active one and start listening for resizes
    ///
    /// Code blocks are not run here. Calling `init` again discovers the links
    /// a second time and binds a second listener.
    pub fn init(&mut self) {
        let found = self
            .breakpoints
            .discover(self.host.document(), &self.config.breakpoint_attribute);
        self.breakpoints.evaluate_active(&self.host);
        self.events.bind(&mut self.host);
        tracing::info!(
            "rwd initialised: {} breakpoints, active {:?}",
            found,
            self.breakpoints.active()
        );
    }

    /// Register picture containers and render each once
    ///
    /// Returns how many were registered; non-picture nodes are skipped.
    pub fn picture(&mut self, elements: &[NodeId], options: PictureOptions) -> Result<usize> {
        self.pictures
            .register_elements(&mut self.host, &self.breakpoints, &self.config, elements, &options)
    }

    /// Add code for breakpoint `name` and run it once for the current state
    pub fn register(&mut self, name: &str, callbacks: CodeBlockCallbacks) -> Result<()> {
        self.code.register(&self.host, &self.breakpoints, name, callbacks)
    }

    /// Name of the active breakpoint
    pub fn breakpoint(&self) -> Option<&str> {
        self.breakpoints.active()
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        self.breakpoints.all()
    }

    pub fn viewport_width(&mut self) -> Result<u32> {
        self.viewport.width(&mut self.host, &self.config)
    }

    pub fn viewport_height(&mut self) -> Result<u32> {
        self.viewport.height(&mut self.host, &self.config)
    }

    pub fn native_picture(&self) -> bool {
        capability::native_picture(&self.host)
    }

    /// Drain the host's event queue
    ///
    /// Returns the number of events handled. Callback errors stop the pump;
    /// events still queued stay there for the next call.
    pub fn pump(&mut self) -> Result<usize> {
        let mut handled = 0;
        while let Some(event) = self.host.poll_event() {
            handled += 1;
            match event {
                HostEvent::Resize { listener } if self.events.owns(listener) => self.on_resize()?,
                HostEvent::Resize { listener } => {
                    tracing::trace!("Ignoring resize for foreign listener {:?}", listener);
                }
                HostEvent::ImageLoaded { img, url } => {
                    self.pictures.handle_image_load(&mut self.host, img, &url)?;
                }
                HostEvent::ImageFailed { img, url } => {
                    tracing::debug!("Image {} failed to load into {:?}", url, img);
                }
            }
        }
        Ok(handled)
    }

    fn on_resize(&mut self) -> Result<()> {
        if self.breakpoints.evaluate_active(&self.host).is_some() {
            self.code.execute_all(&self.host, &self.breakpoints)?;
        }
        self.pictures.refresh(&mut self.host, &self.breakpoints, &self.config)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &RwdConfig {
        &self.config
    }

    pub fn pictures(&self) -> &PictureController {
        &self.pictures
    }

    /// Consume the helper, giving the host back
    pub fn into_host(self) -> H {
        self.host
    }
}
