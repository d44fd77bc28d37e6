//! # Segmentação com Eventos Observáveis
//!
//! Mesma varredura de [`Segmenter::segment`], mas emitindo um evento a cada passo
//! por um canal Rust (`mpsc`). O servidor WebSocket repassa esses eventos ao
//! cliente para visualizar, fronteira por fronteira, por que o texto foi quebrado.

use std::sync::mpsc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::features::Sentence;
use crate::segmenter::{BoundaryDecision, Segmenter};

/// Eventos emitidos durante a segmentação de uma sentença.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SegmentEvent {
    /// **Início**: quantidade de caracteres e o peso total usado como limiar.
    Started {
        total_chars: usize,
        total_weight: i64,
    },
    /// **Passo**: uma fronteira foi pontuada.
    BoundaryScored { decision: BoundaryDecision },
    /// Uma frase foi fechada (por uma quebra ou pelo fim da sentença).
    PhraseCompleted { index: usize, phrase: String },
    /// **Conclusão**: todas as frases, na ordem.
    Done {
        phrases: Vec<String>,
        total_chars: usize,
        processing_ms: u64,
    },
}

impl Segmenter {
    /// Segmenta enviando eventos de progresso pelo canal `tx`.
    ///
    /// # Fluxo de Eventos
    /// 1. `Started`
    /// 2. `BoundaryScored` para cada fronteira, intercalado com `PhraseCompleted`
    ///    sempre que uma quebra fecha a frase anterior.
    /// 3. `PhraseCompleted` da última frase (se a sentença não for vazia).
    /// 4. `Done`
    ///
    /// Se o receptor for descartado no meio do caminho, os envios falham em
    /// silêncio e a varredura termina normalmente.
    pub fn segment_streaming(&self, sentence: &str, tx: mpsc::Sender<SegmentEvent>) {
        let start = Instant::now();
        let sentence = Sentence::new(sentence);
        let total_chars = sentence.len();

        let _ = tx.send(SegmentEvent::Started {
            total_chars,
            total_weight: self.model().total_weight(),
        });

        let mut phrases: Vec<String> = Vec::new();
        if !sentence.is_empty() {
            let mut phrase_start = 0;
            for i in 1..total_chars {
                let decision = self.decide(&sentence, i);
                let is_break = decision.is_break;
                let _ = tx.send(SegmentEvent::BoundaryScored { decision });

                if is_break {
                    let phrase = sentence.slice(phrase_start, i).to_string();
                    let _ = tx.send(SegmentEvent::PhraseCompleted {
                        index: phrases.len(),
                        phrase: phrase.clone(),
                    });
                    phrases.push(phrase);
                    phrase_start = i;
                }
            }

            let phrase = sentence.slice(phrase_start, total_chars).to_string();
            let _ = tx.send(SegmentEvent::PhraseCompleted {
                index: phrases.len(),
                phrase: phrase.clone(),
            });
            phrases.push(phrase);
        }

        let _ = tx.send(SegmentEvent::Done {
            phrases,
            total_chars,
            processing_ms: start.elapsed().as_millis() as u64,
        });
    }
}
