//! # Segmentador de Frases
//!
//! Decide, em cada fronteira entre dois caracteres, se ali começa uma nova frase.
//!
//! ## Pontuação de uma fronteira
//!
//! ```text
//! score(i) = -T + Σ_f 2 · w(f)
//! ```
//!
//! - `T` é o peso total do modelo (soma de todos os pesos).
//! - `f` percorre as features ativas da fronteira `i` (ver [`crate::features`]).
//! - `w(f)` é o peso da feature no modelo, ou `0` se ela não existir.
//!
//! Há quebra quando `score(i) > 0`. Um modelo vazio (`T = 0`) nunca quebra.
//!
//! ## Exemplo
//!
//! ```rust
//! use budoux_core::{FeatureGroup, Model, Segmenter};
//!
//! let model = Model::new().with_weight(FeatureGroup::Uw4, "a", 100);
//! let segmenter = Segmenter::new(model);
//!
//! assert_eq!(segmenter.segment("xyzabc"), vec!["xyz", "abc"]);
//! ```

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::features::{boundary_features, Sentence};
use crate::model::{FeatureGroup, Model};

/// Contribuição de uma feature para a pontuação de uma fronteira.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub group: FeatureGroup,
    pub value: String,
    /// Peso bruto no modelo (a pontuação soma o dobro dele).
    pub weight: i64,
}

/// Decisão tomada numa fronteira, com o detalhamento de como foi pontuada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryDecision {
    /// Índice (em caracteres) do caractere logo após a fronteira.
    pub index: usize,
    /// O caractere logo após a fronteira.
    pub character: String,
    /// Features ativas com peso diferente de zero.
    pub contributions: Vec<FeatureContribution>,
    pub score: i64,
    pub is_break: bool,
}

/// Segmentador que divide sentenças em frases usando um [`Model`] compartilhado.
///
/// O modelo fica atrás de um `Arc`, então clonar o segmentador é barato e as
/// cópias podem ser usadas em threads diferentes sem sincronização.
#[derive(Debug, Clone)]
pub struct Segmenter {
    model: Arc<Model>,
}

impl Segmenter {
    pub fn new(model: Model) -> Self {
        Self::from_shared(Arc::new(model))
    }

    /// Cria um segmentador reaproveitando um modelo já compartilhado.
    pub fn from_shared(model: Arc<Model>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Divide a sentença em frases.
    ///
    /// A concatenação do resultado é sempre igual à entrada e nenhuma frase é
    /// vazia. Entrada vazia produz `[]`.
    pub fn segment(&self, sentence: &str) -> Vec<String> {
        let sentence = Sentence::new(sentence);
        if sentence.is_empty() {
            return Vec::new();
        }

        let mut phrases = Vec::new();
        let mut start = 0;
        for i in 1..sentence.len() {
            if self.score(&sentence, i) > 0 {
                phrases.push(sentence.slice(start, i).to_string());
                start = i;
            }
        }
        phrases.push(sentence.slice(start, sentence.len()).to_string());
        phrases
    }

    /// Pontuação da fronteira antes do caractere `i`.
    ///
    /// Retorna `None` quando `i` não é uma fronteira interna (`i == 0` ou `i >= len`).
    pub fn boundary_score(&self, sentence: &str, i: usize) -> Option<i64> {
        let sentence = Sentence::new(sentence);
        (i >= 1 && i < sentence.len()).then(|| self.score(&sentence, i))
    }

    /// Detalha a decisão de cada fronteira da sentença, na ordem.
    pub fn explain(&self, sentence: &str) -> Vec<BoundaryDecision> {
        let sentence = Sentence::new(sentence);
        (1..sentence.len())
            .map(|i| self.decide(&sentence, i))
            .collect()
    }

    /// Segmenta várias sentenças em paralelo. A ordem da saída é a da entrada.
    pub fn segment_batch<S>(&self, sentences: &[S]) -> Vec<Vec<String>>
    where
        S: AsRef<str> + Sync,
    {
        sentences
            .par_iter()
            .map(|s| self.segment(s.as_ref()))
            .collect()
    }

    pub(crate) fn score(&self, sentence: &Sentence<'_>, i: usize) -> i64 {
        boundary_features(sentence, i)
            .iter()
            .fold(-self.model.total_weight(), |score, f| {
                score + 2 * self.model.weight(f.group, f.value)
            })
    }

    pub(crate) fn decide(&self, sentence: &Sentence<'_>, i: usize) -> BoundaryDecision {
        let mut score = -self.model.total_weight();
        let mut contributions = Vec::new();

        for f in boundary_features(sentence, i) {
            let weight = self.model.weight(f.group, f.value);
            score += 2 * weight;
            if weight != 0 {
                contributions.push(FeatureContribution {
                    group: f.group,
                    value: f.value.to_string(),
                    weight,
                });
            }
        }

        BoundaryDecision {
            index: i,
            character: sentence.char_at(i).to_string(),
            contributions,
            score,
            is_break: score > 0,
        }
    }
}

impl From<Model> for Segmenter {
    fn from(model: Model) -> Self {
        Self::new(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uw4_model() -> Model {
        Model::new().with_weight(FeatureGroup::Uw4, "a", 100)
    }

    /// Modelo que favorece quebras depois de "は" e antes de "で", exceto em "です。".
    fn toy_japanese_model() -> Model {
        Model::new()
            .with_weight(FeatureGroup::Uw3, "は", 60)
            .with_weight(FeatureGroup::Uw4, "で", 40)
            .with_weight(FeatureGroup::Bw2, "日は", -20)
            .with_weight(FeatureGroup::Tw4, "です。", -30)
    }

    #[test]
    fn test_single_feature_break() {
        let segmenter = Segmenter::new(uw4_model());
        assert_eq!(segmenter.segment("xyzabc"), vec!["xyz", "abc"]);
    }

    #[test]
    fn test_empty_sentence() {
        let segmenter = Segmenter::new(uw4_model());
        assert!(segmenter.segment("").is_empty());
        assert!(segmenter.explain("").is_empty());
    }

    #[test]
    fn test_empty_model_never_breaks() {
        let segmenter = Segmenter::new(Model::new());
        assert_eq!(segmenter.segment("今日は天気です。"), vec!["今日は天気です。"]);
        assert!(segmenter.explain("abc").iter().all(|d| d.score == 0 && !d.is_break));
    }

    #[test]
    fn test_single_character() {
        let segmenter = Segmenter::new(uw4_model());
        assert_eq!(segmenter.segment("a"), vec!["a"]);
        assert_eq!(segmenter.segment("日"), vec!["日"]);
    }

    #[test]
    fn test_uw1_guard_is_exact() {
        // Só UW1 pontua, e UW1 da fronteira i é o caractere i - 3.
        // Em "xaxxx" a única fronteira com UW1 = "a" é i = 4.
        let model = Model::new().with_weight(FeatureGroup::Uw1, "a", 10);
        let segmenter = Segmenter::new(model);
        assert_eq!(segmenter.segment("xaxxx"), vec!["xaxx", "x"]);

        // Em "axx", a fronteira i = 2 teria UW1 = [-1, 0): nunca avaliada.
        assert_eq!(segmenter.segment("axx"), vec!["axx"]);
        // Em "axxx", i = 3 é a primeira fronteira com UW1 = "a".
        assert_eq!(segmenter.segment("axxx"), vec!["axx", "x"]);
    }

    #[test]
    fn test_multibyte_characters() {
        let model = Model::new().with_weight(FeatureGroup::Uw4, "天", 50);
        let segmenter = Segmenter::new(model);
        assert_eq!(segmenter.segment("今日は天気です。"), vec!["今日は", "天気です。"]);

        let model = Model::new().with_weight(FeatureGroup::Uw3, "😀", 5);
        let segmenter = Segmenter::new(model);
        assert_eq!(segmenter.segment("a😀b😀"), vec!["a😀", "b😀"]);
    }

    #[test]
    fn test_toy_japanese_model() {
        let segmenter = Segmenter::new(toy_japanese_model());
        // T = 50. Fronteira antes de "天": UW3("は") = 60 → -50 + 120 = 70.
        // Fronteira antes de "で": UW4("で") = 40, TW4("です。") = -30 → -50 + 80 - 60 = -30.
        assert_eq!(segmenter.segment("今日は天気です。"), vec!["今日は", "天気です。"]);
    }

    #[test]
    fn test_boundary_score() {
        let segmenter = Segmenter::new(uw4_model());
        assert_eq!(segmenter.boundary_score("xyzabc", 3), Some(100));
        assert_eq!(segmenter.boundary_score("xyzabc", 1), Some(-100));
        assert_eq!(segmenter.boundary_score("xyzabc", 0), None);
        assert_eq!(segmenter.boundary_score("xyzabc", 6), None);
    }

    #[test]
    fn test_explain_matches_segment() {
        let segmenter = Segmenter::new(toy_japanese_model());
        let sentence = "今日は天気です。今日は雨です。";
        let decisions = segmenter.explain(sentence);
        let phrases = segmenter.segment(sentence);

        assert_eq!(decisions.len(), sentence.chars().count() - 1);
        let breaks = decisions.iter().filter(|d| d.is_break).count();
        assert_eq!(phrases.len(), breaks + 1);

        let first_break = decisions.iter().find(|d| d.is_break).unwrap();
        assert_eq!(first_break.index, 3);
        assert_eq!(first_break.character, "天");
        assert_eq!(
            first_break.contributions,
            vec![FeatureContribution {
                group: FeatureGroup::Uw3,
                value: "は".into(),
                weight: 60,
            }]
        );
    }

    #[test]
    fn test_partition_properties() {
        let segmenter = Segmenter::new(toy_japanese_model());
        for sentence in ["", "a", "今日は", "今日は天気です。", "はははは", "でででで", "x😀は天で"] {
            let phrases = segmenter.segment(sentence);
            assert_eq!(phrases.concat(), sentence);
            assert!(phrases.iter().all(|p| !p.is_empty()));
            // Determinismo
            assert_eq!(phrases, segmenter.segment(sentence));
        }
    }

    #[test]
    fn test_segment_batch_keeps_order() {
        let segmenter = Segmenter::new(uw4_model());
        let sentences = vec!["xyzabc", "", "aaa", "bcd"];
        let expected: Vec<Vec<String>> = sentences.iter().map(|s| segmenter.segment(s)).collect();
        assert_eq!(segmenter.segment_batch(&sentences), expected);
    }

    #[test]
    fn test_shared_across_threads() {
        let segmenter = Segmenter::new(uw4_model());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let s = segmenter.clone();
                std::thread::spawn(move || s.segment("xyzabcxyzabc"))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), vec!["xyz", "abcxyz", "abc"]);
        }
    }
}
