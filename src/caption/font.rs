//! Font descriptor and availability check for caption text.

use pango::prelude::*;

use super::CaptionError;

/// Font configuration for caption rendering.
///
/// Describes which font to use by family name and weight. Sizes are applied
/// per measurement in absolute pixels, since captions are fitted to the image
/// rather than to a point size.
#[derive(Debug, Clone)]
pub struct FontDescriptor {
    /// Font family name (e.g., "Impact", "DejaVu Sans")
    pub family: String,

    /// Font weight (e.g., "normal", "bold", "heavy")
    pub weight: String,
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>, weight: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            weight: weight.into(),
        }
    }

    /// Pango description string without a size, e.g. "Impact" or "DejaVu Sans Bold".
    pub fn to_pango_string(&self) -> String {
        let mut parts = vec![self.family.clone()];
        if !self.weight.eq_ignore_ascii_case("normal") && !self.weight.is_empty() {
            parts.push(capitalize_first(&self.weight));
        }
        parts.join(" ")
    }

    /// Pango font description at `pixel_size` pixels.
    pub fn description(&self, pixel_size: u32) -> pango::FontDescription {
        let mut desc = pango::FontDescription::from_string(&self.to_pango_string());
        desc.set_absolute_size(pixel_size as f64 * pango::SCALE as f64);
        desc
    }

    /// Fails with [`CaptionError::FontUnavailable`] unless the family is
    /// installed. Pango would otherwise silently substitute another font.
    pub fn ensure_available(&self) -> Result<(), CaptionError> {
        let font_map = pangocairo::FontMap::default();
        let families: Vec<String> = font_map
            .list_families()
            .iter()
            .map(|family| family.name().to_string())
            .collect();

        if family_installed(&families, &self.family) {
            Ok(())
        } else {
            Err(CaptionError::FontUnavailable(self.family.clone()))
        }
    }
}

fn family_installed(installed: &[String], wanted: &str) -> bool {
    installed
        .iter()
        .any(|name| name.eq_ignore_ascii_case(wanted.trim()))
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_weight_is_omitted() {
        let font = FontDescriptor::new("Impact", "normal");
        assert_eq!(font.to_pango_string(), "Impact");
    }

    #[test]
    fn weight_is_capitalized() {
        let font = FontDescriptor::new("DejaVu Sans", "bold");
        assert_eq!(font.to_pango_string(), "DejaVu Sans Bold");
    }

    #[test]
    fn family_lookup_ignores_case() {
        let installed = vec!["DejaVu Sans".to_string(), "Impact".to_string()];
        assert!(family_installed(&installed, "impact"));
        assert!(!family_installed(&installed, "Comic Sans MS"));
    }
}
