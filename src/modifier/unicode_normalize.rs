use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use super::Modifier;

use crate::error::Result;

/// Supported Unicode normalization forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NormalizationForm {
    #[default]
    NFC,
    NFD,
    NFKC,
    NFKD,
}

/// A modifier that performs Unicode normalization.
#[derive(Debug, Clone)]
pub struct UnicodeNormalizer {
    form: NormalizationForm,
}

impl UnicodeNormalizer {
    pub fn new(form: NormalizationForm) -> Self {
        Self { form }
    }

    pub fn form(&self) -> NormalizationForm {
        self.form
    }
}

impl Modifier for UnicodeNormalizer {
    fn modify(&self, text: &str) -> Result<String> {
        Ok(match self.form {
            NormalizationForm::NFC => text.nfc().collect(),
            NormalizationForm::NFD => text.nfd().collect(),
            NormalizationForm::NFKC => text.nfkc().collect(),
            NormalizationForm::NFKD => text.nfkd().collect(),
        })
    }

    fn name(&self) -> &'static str {
        "unicode_normalize"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nfc_normalization() {
        let modifier = UnicodeNormalizer::new(NormalizationForm::NFC);
        // "Amélie" where 'é' is decomposed (U+0065 U+0301)
        let output = modifier.modify("Am\u{0065}\u{0301}lie").unwrap();
        assert_eq!(output, "Am\u{00e9}lie");
    }

    #[test]
    fn test_nfkc_normalization() {
        let modifier = UnicodeNormalizer::new(NormalizationForm::NFKC);
        // Fullwidth "Ａ" to halfwidth "A"
        assert_eq!(modifier.modify("\u{ff21}").unwrap(), "A");
    }
}
