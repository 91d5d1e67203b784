//! Header normalization helpers.

/// Normalizes text for comparison by lowercasing and replacing separators with spaces.
pub fn normalize_text(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(
            ['_', '-', '.', '/', '\\', '(', ')', '[', ']', ',', ':', '#'],
            " ",
        )
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized text with all spaces removed.
pub fn compact(normalized: &str) -> String {
    normalized.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Case-insensitive key used to detect duplicate headers.
pub fn header_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A header split into its name part and an optional bracketed unit.
///
/// `"Dist(pc)"` becomes base `"dist"`, unit `"pc"`, full `"dist pc"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderForm {
    pub full: String,
    pub base: String,
    pub unit: Option<String>,
}

impl HeaderForm {
    pub fn parse(raw: &str) -> Self {
        let full = normalize_text(raw);
        let trimmed = raw.trim();
        let bracket = trimmed
            .rfind(['(', '['])
            .filter(|&open| trimmed[open + 1..].contains([')', ']']));
        let Some(open) = bracket else {
            return Self {
                base: full.clone(),
                full,
                unit: None,
            };
        };
        let close = trimmed[open..]
            .find([')', ']'])
            .map_or(trimmed.len(), |offset| open + offset);
        let unit = compact(&normalize_text(&trimmed[open + 1..close]));
        let rest = format!("{} {}", &trimmed[..open], &trimmed[close + 1..]);
        Self {
            full,
            base: normalize_text(&rest),
            unit: (!unit.is_empty()).then_some(unit),
        }
    }

    /// The distinct normalized forms worth comparing against aliases.
    pub fn variants(&self) -> Vec<&str> {
        let mut out = vec![self.full.as_str()];
        if !self.base.is_empty() && self.base != self.full {
            out.push(self.base.as_str());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_replaces_separators() {
        assert_eq!(normalize_text("  Pl_Orb-Per.d "), "pl orb per d");
        assert_eq!(compact("pl orb per"), "plorbper");
    }

    #[test]
    fn header_form_extracts_unit() {
        let form = HeaderForm::parse("Dist(pc)");
        assert_eq!(form.base, "dist");
        assert_eq!(form.unit.as_deref(), Some("pc"));
        assert_eq!(form.full, "dist pc");

        let form = HeaderForm::parse("Rad [R_sun]");
        assert_eq!(form.base, "rad");
        assert_eq!(form.unit.as_deref(), Some("rsun"));
    }

    #[test]
    fn header_form_without_unit() {
        let form = HeaderForm::parse("pl_orbper");
        assert_eq!(form.unit, None);
        assert_eq!(form.variants(), vec!["pl orbper"]);
    }
}
