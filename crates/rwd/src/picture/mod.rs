//! Picture controller
//!
//! Stand-in for native `<picture>`: picks the active `<source>` of each
//! registered container, resolves its density list against the device pixel
//! ratio and renders the result into an `<img>` created inside the container.

mod element;
mod events;
pub mod srcset;

pub use element::PictureElement;
pub use events::{PictureEvent, PictureListener, PictureOptions, SwapEvent};
pub use srcset::{ImageCandidate, SrcsetEntry};

use rwd_dom::NodeId;

use crate::breakpoints::{media_matches, BreakpointRegistry};
use crate::capability;
use crate::config::RwdConfig;
use crate::error::{Result, RwdError};
use crate::helpers;
use crate::host::Host;

/// Load started by the last render, awaiting completion
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLoad {
    pub img: NodeId,
    pub url: String,
    pub pixel_ratio: f64,
}

/// A picture container handed to `picture`
#[derive(Debug, Clone)]
pub struct RegisteredPicture {
    element: PictureElement,
    options: PictureOptions,
    first_load_fired: bool,
    pending: Option<PendingLoad>,
}

impl RegisteredPicture {
    pub fn element(&self) -> PictureElement {
        self.element
    }

    pub fn options(&self) -> &PictureOptions {
        &self.options
    }

    /// Whether `FirstLoad` was delivered
    pub fn first_load_fired(&self) -> bool {
        self.first_load_fired
    }

    pub fn pending(&self) -> Option<&PendingLoad> {
        self.pending.as_ref()
    }

    fn emit(&self, event: PictureEvent, url: &str, pixel_ratio: f64) -> Result<()> {
        self.options.emit(&SwapEvent {
            event,
            element: self.element.node(),
            url: url.to_string(),
            pixel_ratio,
        })
    }
}

/// Registered pictures, in registration order
#[derive(Debug, Default)]
pub struct PictureController {
    pictures: Vec<RegisteredPicture>,
}

impl PictureController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every picture container in `elements` and process it once
    ///
    /// Hosts with native `<picture>` support are left alone. Nodes that are
    /// not picture containers are skipped.
    pub fn register_elements<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        breakpoints: &BreakpointRegistry,
        config: &RwdConfig,
        elements: &[NodeId],
        options: &PictureOptions,
    ) -> Result<usize> {
        if capability::native_picture(host) {
            tracing::debug!("Native <picture> support, skipping {} elements", elements.len());
            return Ok(0);
        }

        let mut registered = 0;
        for &node in elements {
            let element = match PictureElement::new(host.document(), node, &config.picture_tag) {
                Ok(element) => element,
                Err(_) => {
                    tracing::debug!("Skipping {:?}: not a <{}>", node, config.picture_tag);
                    continue;
                }
            };

            self.pictures.push(RegisteredPicture {
                element,
                options: options.clone(),
                first_load_fired: false,
                pending: None,
            });
            registered += 1;
            self.process_at(host, breakpoints, config, self.pictures.len() - 1)?;
        }

        tracing::debug!("Registered {} pictures", registered);
        Ok(registered)
    }

    /// Swap the image of `element` if its active source changed
    ///
    /// Returns the rendered candidate, or `None` when nothing was swapped.
    pub fn process<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        breakpoints: &BreakpointRegistry,
        config: &RwdConfig,
        element: PictureElement,
    ) -> Result<Option<ImageCandidate>> {
        match self.pictures.iter().position(|p| p.element == element) {
            Some(index) => self.process_at(host, breakpoints, config, index),
            None => Ok(None),
        }
    }

    /// Reprocess every picture
    ///
    /// A density list with no fitting entry only affects its own picture.
    pub fn refresh<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        breakpoints: &BreakpointRegistry,
        config: &RwdConfig,
    ) -> Result<()> {
        for index in 0..self.pictures.len() {
            match self.process_at(host, breakpoints, config, index) {
                Ok(_) => {}
                Err(err @ RwdError::NoCandidate { .. }) => {
                    tracing::warn!("Picture {:?} not refreshed: {}", self.pictures[index].element.node(), err);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    fn process_at<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        breakpoints: &BreakpointRegistry,
        config: &RwdConfig,
        index: usize,
    ) -> Result<Option<ImageCandidate>> {
        let element = self.pictures[index].element;

        let Some(source) = active_source(host, breakpoints, config, element) else {
            tracing::trace!("No active source in {:?}", element.node());
            return Ok(None);
        };
        let Some(candidate) = resolve_candidate(host, config, source)? else {
            tracing::trace!("Source {:?} has no image", source);
            return Ok(None);
        };
        if element.current_src(host.document()) == candidate.url {
            return Ok(None);
        }

        let picture = &mut self.pictures[index];
        picture.emit(PictureEvent::BeforeSwap, &candidate.url, candidate.pixel_ratio)?;
        render(host, picture, &candidate)?;
        picture.emit(PictureEvent::AfterSwap, &candidate.url, candidate.pixel_ratio)?;

        Ok(Some(candidate))
    }

    /// Finish a load reported by the host
    ///
    /// Completions for anything but the latest render are ignored. Returns
    /// whether the load was accepted.
    pub fn handle_image_load<H: Host + ?Sized>(&mut self, host: &mut H, img: NodeId, url: &str) -> Result<bool> {
        let Some(picture) = self
            .pictures
            .iter_mut()
            .find(|p| p.pending.as_ref().is_some_and(|l| l.img == img && l.url == url))
        else {
            tracing::trace!("Ignoring stale load of {} into {:?}", url, img);
            return Ok(false);
        };
        let Some(load) = picture.pending.take() else {
            return Ok(false);
        };

        match host.natural_size(&load.url) {
            Some((width, height)) => {
                let doc = host.document_mut();
                doc.set_attribute(img, "width", scaled(width, load.pixel_ratio).to_string())?;
                doc.set_attribute(img, "height", scaled(height, load.pixel_ratio).to_string())?;
            }
            None => tracing::debug!("No natural size for {}", load.url),
        }

        // Marked before delivery so a failing listener is not retried
        if !picture.first_load_fired {
            picture.first_load_fired = true;
            picture.emit(PictureEvent::FirstLoad, &load.url, load.pixel_ratio)?;
        }
        picture.emit(PictureEvent::Load, &load.url, load.pixel_ratio)?;
        Ok(true)
    }

    pub fn get(&self, index: usize) -> Option<&RegisteredPicture> {
        self.pictures.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredPicture> {
        self.pictures.iter()
    }

    pub fn len(&self) -> usize {
        self.pictures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pictures.is_empty()
    }
}

/// First `<source>` whose media condition currently matches
///
/// A source without its own `media` borrows the condition of the breakpoint
/// named by its breakpoint attribute. Sources only ever match on a
/// non-empty condition.
pub fn active_source<H: Host + ?Sized>(
    host: &H,
    breakpoints: &BreakpointRegistry,
    config: &RwdConfig,
    element: PictureElement,
) -> Option<NodeId> {
    let doc = host.document();
    element.sources(doc).into_iter().find(|&source| {
        let media = match doc.get_attribute(source, "media") {
            Some(media) if !media.is_empty() => Some(media),
            _ => doc
                .get_attribute(source, &config.source_breakpoint_attribute)
                .and_then(|name| breakpoints.lookup_media(name)),
        };
        media.filter(|m| !m.is_empty()).is_some_and(|m| media_matches(host, m))
    })
}

/// Image a source stands for at the host's pixel ratio
///
/// `Ok(None)` when the source carries neither `srcset` nor `src`.
pub fn resolve_candidate<H: Host + ?Sized>(
    host: &H,
    config: &RwdConfig,
    source: NodeId,
) -> Result<Option<ImageCandidate>> {
    let doc = host.document();

    if let Some(list) = doc.get_attribute(source, "srcset").filter(|s| !helpers::trim(s).is_empty()) {
        let pixel_ratio = host
            .device_pixel_ratio()
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(config.default_pixel_ratio);
        let entries = srcset::parse_srcset(list);
        return match srcset::select_for_ratio(&entries, pixel_ratio) {
            Some(candidate) => Ok(Some(candidate)),
            None => Err(RwdError::NoCandidate {
                srcset: list.to_string(),
                pixel_ratio,
            }),
        };
    }

    Ok(doc
        .get_attribute(source, "src")
        .filter(|s| !s.is_empty())
        .map(|url| ImageCandidate {
            url: url.to_string(),
            pixel_ratio: 1.0,
            density: 1.0,
        }))
}

fn render<H: Host + ?Sized>(host: &mut H, picture: &mut RegisteredPicture, candidate: &ImageCandidate) -> Result<()> {
    let container = picture.element.node();
    let img = match picture.element.rendered_image(host.document()) {
        Some(img) => img,
        None => {
            let alt = picture.element.alt(host.document()).map(str::to_string);
            let doc = host.document_mut();
            let img = doc.create_element("img");
            if let Some(alt) = alt {
                doc.set_attribute(img, "alt", alt)?;
            }
            doc.append_child(container, img)?;
            img
        }
    };

    picture.pending = Some(PendingLoad {
        img,
        url: candidate.url.clone(),
        pixel_ratio: candidate.pixel_ratio,
    });
    host.document_mut().set_attribute(img, "src", candidate.url.as_str())?;
    host.fetch_image(img, &candidate.url);
    tracing::debug!(
        "Rendered {} ({}x asset at {}x) into {:?}",
        candidate.url,
        candidate.density,
        candidate.pixel_ratio,
        container
    );
    Ok(())
}

fn scaled(natural: u32, pixel_ratio: f64) -> u32 {
    (natural as f64 / pixel_ratio).floor() as u32
}
