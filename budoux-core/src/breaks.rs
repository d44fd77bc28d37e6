//! # Marcadores de Quebra
//!
//! Junta as frases de volta em um único texto com um separador entre elas,
//! indicando ao renderizador onde a linha pode quebrar. Trabalha apenas com
//! texto: nenhum HTML é interpretado.

use serde::{Deserialize, Serialize};

use crate::segmenter::Segmenter;

/// Separador inserido entre frases consecutivas.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Separator {
    /// `U+200B ZERO WIDTH SPACE`
    #[default]
    ZeroWidthSpace,
    /// A tag `<wbr>`, para saída que será inserida em HTML.
    WordBreakTag,
    Custom(String),
}

impl Separator {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ZeroWidthSpace => "\u{200B}",
            Self::WordBreakTag => "<wbr>",
            Self::Custom(s) => s,
        }
    }
}

/// Concatena as frases com `separator` entre elas (nunca nas pontas).
pub fn join_with<S: AsRef<str>>(phrases: &[S], separator: &Separator) -> String {
    let sep = separator.as_str();
    let mut out = String::with_capacity(
        phrases.iter().map(|p| p.as_ref().len()).sum::<usize>()
            + sep.len() * phrases.len().saturating_sub(1),
    );
    for (i, phrase) in phrases.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        out.push_str(phrase.as_ref());
    }
    out
}

impl Segmenter {
    /// Segmenta e devolve a sentença com `separator` em cada quebra.
    pub fn insert_breaks(&self, sentence: &str, separator: &Separator) -> String {
        join_with(&self.segment(sentence), separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeatureGroup, Model};

    #[test]
    fn test_join_with_presets() {
        let phrases = ["今日は", "天気です。"];
        assert_eq!(join_with(&phrases, &Separator::ZeroWidthSpace), "今日は\u{200B}天気です。");
        assert_eq!(join_with(&phrases, &Separator::WordBreakTag), "今日は<wbr>天気です。");
        assert_eq!(join_with(&phrases, &Separator::Custom("|".into())), "今日は|天気です。");
    }

    #[test]
    fn test_join_edge_cases() {
        let empty: [&str; 0] = [];
        assert_eq!(join_with(&empty, &Separator::WordBreakTag), "");
        assert_eq!(join_with(&["abc"], &Separator::WordBreakTag), "abc");
    }

    #[test]
    fn test_insert_breaks() {
        let segmenter = Segmenter::new(Model::new().with_weight(FeatureGroup::Uw4, "a", 100));
        assert_eq!(
            segmenter.insert_breaks("xyzabcxyzabc", &Separator::Custom("/".into())),
            "xyz/abcxyz/abc"
        );
        assert_eq!(segmenter.insert_breaks("", &Separator::default()), "");
    }

    #[test]
    fn test_separator_json() {
        let sep: Separator = serde_json::from_str(r#""word_break_tag""#).unwrap();
        assert_eq!(sep, Separator::WordBreakTag);
        let sep: Separator = serde_json::from_str(r#"{"custom": "|"}"#).unwrap();
        assert_eq!(sep, Separator::Custom("|".into()));
    }
}
