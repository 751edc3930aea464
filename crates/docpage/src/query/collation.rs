//! Locale-aware comparison rules for sorting and matching.

use serde::{Deserialize, Serialize};

/// Level of comparison performed by a collation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollationStrength {
    /// Base characters only; ignores case and diacritics.
    Primary,
    /// Base characters and diacritics; ignores case.
    Secondary,
    /// Base characters, diacritics and case. The store default.
    Tertiary,
    /// Tertiary plus punctuation handling.
    Quaternary,
    /// Code point tie-breaking on top of quaternary.
    Identical,
}

impl CollationStrength {
    /// Returns the numeric level used on the wire (1-5).
    pub fn level(self) -> i32 {
        match self {
            Self::Primary => 1,
            Self::Secondary => 2,
            Self::Tertiary => 3,
            Self::Quaternary => 4,
            Self::Identical => 5,
        }
    }
}

/// Collation rules attached to a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collation {
    /// ICU locale, e.g. `en` or `fr_CA`.
    pub locale: String,
    /// Comparison level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<CollationStrength>,
    /// Whether case is compared at primary and secondary strength.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_level: Option<bool>,
    /// Whether digit substrings compare as numbers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_ordering: Option<bool>,
}

impl Collation {
    /// Creates collation rules for the given locale.
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            strength: None,
            case_level: None,
            numeric_ordering: None,
        }
    }

    /// Sets the comparison strength.
    #[must_use]
    pub fn with_strength(mut self, strength: CollationStrength) -> Self {
        self.strength = Some(strength);
        self
    }

    /// Sets whether case is compared at primary and secondary strength.
    #[must_use]
    pub fn with_case_level(mut self, case_level: bool) -> Self {
        self.case_level = Some(case_level);
        self
    }

    /// Sets whether digit substrings compare as numbers.
    #[must_use]
    pub fn with_numeric_ordering(mut self, numeric_ordering: bool) -> Self {
        self.numeric_ordering = Some(numeric_ordering);
        self
    }

    /// Returns whether string comparison under these rules ignores case.
    pub fn ignores_case(&self) -> bool {
        let below_tertiary = matches!(
            self.strength,
            Some(CollationStrength::Primary | CollationStrength::Secondary)
        );
        below_tertiary && !self.case_level.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitivity() {
        assert!(!Collation::new("en").ignores_case());
        assert!(
            Collation::new("en")
                .with_strength(CollationStrength::Secondary)
                .ignores_case()
        );
        assert!(
            !Collation::new("en")
                .with_strength(CollationStrength::Primary)
                .with_case_level(true)
                .ignores_case()
        );
        assert!(
            !Collation::new("en")
                .with_strength(CollationStrength::Tertiary)
                .ignores_case()
        );
    }

    #[test]
    fn strength_levels() {
        assert_eq!(CollationStrength::Primary.level(), 1);
        assert_eq!(CollationStrength::Identical.level(), 5);
    }
}
