//! Density lists (srcset)
//!
//! `url density, url density, ...` candidate lists and picking the asset
//! for a device pixel ratio.

use crate::helpers;

/// Parsed srcset entry
#[derive(Debug, Clone, PartialEq)]
pub struct SrcsetEntry {
    /// Image URL
    pub url: String,
    /// Width descriptor (e.g., 800w); never selected by density
    pub width: Option<u32>,
    /// Pixel density descriptor (e.g., 2x)
    pub density: Option<f64>,
}

impl SrcsetEntry {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            width: None,
            density: None,
        }
    }

    pub fn with_width(mut self, w: u32) -> Self {
        self.width = Some(w);
        self
    }

    pub fn with_density(mut self, d: f64) -> Self {
        self.density = Some(d);
        self
    }

    /// Density this entry stands for, if it can be picked by density
    ///
    /// A bare URL is `1x`.
    pub fn effective_density(&self) -> Option<f64> {
        match (self.width, self.density) {
            (Some(_), _) => None,
            (None, Some(d)) => Some(d),
            (None, None) => Some(1.0),
        }
    }
}

/// The image a picture should show
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCandidate {
    pub url: String,
    /// Device ratio the candidate was picked for; rendered size is natural
    /// size divided by this
    pub pixel_ratio: f64,
    /// Density descriptor of the chosen entry
    pub density: f64,
}

/// Parse a srcset attribute
///
/// Entries with unparseable descriptors are dropped.
pub fn parse_srcset(srcset: &str) -> Vec<SrcsetEntry> {
    let mut entries = Vec::new();

    for candidate in srcset.split(',') {
        let mut parts = helpers::trim(candidate).split(helpers::is_html_whitespace).filter(|p| !p.is_empty());
        let Some(url) = parts.next() else {
            continue;
        };
        let mut entry = SrcsetEntry::new(url);

        if let Some(descriptor) = parts.next() {
            let descriptor = descriptor.to_ascii_lowercase();
            if let Some(w) = descriptor.strip_suffix('w') {
                match w.parse() {
                    Ok(w) => entry.width = Some(w),
                    Err(_) => continue,
                }
            } else if let Some(d) = descriptor.strip_suffix('x') {
                match d.parse::<f64>() {
                    Ok(d) if d.is_finite() && d > 0.0 => entry.density = Some(d),
                    _ => continue,
                }
            } else {
                continue;
            }
        }

        entries.push(entry);
    }

    entries
}

/// Highest-density entry not exceeding `pixel_ratio`
///
/// Scans from the end, so the list is expected in ascending density.
pub fn select_for_ratio(entries: &[SrcsetEntry], pixel_ratio: f64) -> Option<ImageCandidate> {
    entries.iter().rev().find_map(|entry| {
        let density = entry.effective_density()?;
        (density <= pixel_ratio).then(|| ImageCandidate {
            url: entry.url.clone(),
            pixel_ratio,
            density,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: &str = "a.jpg 1x, b.jpg 2x, c.jpg 3x";

    fn pick(list: &str, ratio: f64) -> Option<(String, f64)> {
        select_for_ratio(&parse_srcset(list), ratio).map(|c| (c.url, c.density))
    }

    #[test]
    fn test_parse_srcset_density() {
        let entries = parse_srcset("image.jpg, image@2x.jpg 2x,\n image@3x.jpg   3x ");

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], SrcsetEntry::new("image.jpg"));
        assert_eq!(entries[1].density, Some(2.0));
        assert_eq!(entries[2].url, "image@3x.jpg");
    }

    #[test]
    fn test_parse_srcset_widths_and_garbage() {
        let entries = parse_srcset("small.jpg 300w, , bad.jpg 2q, neg.jpg -1x, big.jpg 1200W");
        assert_eq!(
            entries,
            vec![
                SrcsetEntry::new("small.jpg").with_width(300),
                SrcsetEntry::new("big.jpg").with_width(1200),
            ]
        );
    }

    #[test]
    fn test_select_for_ratio() {
        assert_eq!(pick(LIST, 2.0), Some(("b.jpg".into(), 2.0)));
        assert_eq!(pick(LIST, 2.5), Some(("b.jpg".into(), 2.0)));
        assert_eq!(pick(LIST, 1.0), Some(("a.jpg".into(), 1.0)));
        assert_eq!(pick(LIST, 3.0), Some(("c.jpg".into(), 3.0)));
    }

    #[test]
    fn test_candidate_keeps_device_ratio() {
        let candidate = select_for_ratio(&parse_srcset(LIST), 2.5).unwrap();
        assert_eq!(candidate.url, "b.jpg");
        assert_eq!(candidate.density, 2.0);
        assert_eq!(candidate.pixel_ratio, 2.5);
    }

    #[test]
    fn test_no_entry_fits() {
        assert_eq!(pick("b.jpg 2x, c.jpg 3x", 1.0), None);
        assert_eq!(pick("small.jpg 300w", 2.0), None);
        assert_eq!(pick("", 2.0), None);
    }

    #[test]
    fn test_unordered_list_scans_from_the_end() {
        // Reverse scan returns the last entry that fits, not the best one
        assert_eq!(pick("b.jpg 2x, a.jpg 1x", 2.0), Some(("a.jpg".into(), 1.0)));
    }
}
