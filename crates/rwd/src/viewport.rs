//! Viewport measurement
//!
//! The viewport is measured with a full-viewport, fixed-position probe
//! element that is inserted into `<body>`, read and removed again.

use serde::Serialize;

use rwd_dom::NodeId;

use crate::config::RwdConfig;
use crate::error::Result;
use crate::host::Host;

/// Viewport size in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

/// Probe-based viewport sizer
#[derive(Debug, Clone, Default)]
pub struct ViewportSizer {
    last: Option<ViewportSize>,
}

impl ViewportSizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measure the viewport now
    ///
    /// The probe is detached again before returning. A document without
    /// `<body>` measures `0x0`.
    pub fn measure<H: Host + ?Sized>(&mut self, host: &mut H, config: &RwdConfig) -> Result<ViewportSize> {
        let size = match host.document().body() {
            Some(body) => {
                let probe = attach_probe(host, config, body)?;
                let (width, height) = host.client_size(probe);
                detach(host, probe)?;
                ViewportSize { width, height }
            }
            None => {
                tracing::debug!("No <body>, viewport measures 0x0");
                ViewportSize::default()
            }
        };

        tracing::trace!("Viewport is {}x{}", size.width, size.height);
        self.last = Some(size);
        Ok(size)
    }

    pub fn width<H: Host + ?Sized>(&mut self, host: &mut H, config: &RwdConfig) -> Result<u32> {
        Ok(self.measure(host, config)?.width)
    }

    pub fn height<H: Host + ?Sized>(&mut self, host: &mut H, config: &RwdConfig) -> Result<u32> {
        Ok(self.measure(host, config)?.height)
    }

    /// Result of the latest measurement
    pub fn last(&self) -> Option<ViewportSize> {
        self.last
    }
}

/// Reuse the page's probe if it has one, otherwise create it in `body`
fn attach_probe<H: Host + ?Sized>(host: &mut H, config: &RwdConfig, body: NodeId) -> Result<NodeId> {
    if let Some(probe) = host.document().get_element_by_id(&config.probe_id) {
        return Ok(probe);
    }

    let doc = host.document_mut();
    let probe = doc.create_element("div");
    doc.set_attribute(probe, "id", config.probe_id.as_str())?;
    doc.set_attribute(probe, "style", config.probe_style.as_str())?;
    doc.append_child(body, probe)?;
    Ok(probe)
}

fn detach<H: Host + ?Sized>(host: &mut H, node: NodeId) -> Result<()> {
    let parent = host.document().tree().get(node).map_or(NodeId::NONE, |n| n.parent);
    if parent.is_valid() {
        host.document_mut().remove_child(parent, node)?;
    }
    Ok(())
}
