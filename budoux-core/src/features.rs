//! # Features de Fronteira (janela deslizante de n-gramas)
//!
//! Para cada fronteira `i` (o espaço imediatamente antes do caractere `i`),
//! extraímos os n-gramas de caracteres em volta dela. Cada n-grama pertence a um
//! [`FeatureGroup`] que indica sua posição relativa:
//!
//! ```text
//!            i-3  i-2  i-1 | i   i+1  i+2
//!  UW1       [ ]
//!  UW2            [ ]
//!  UW3                 [ ] |
//!  UW4                     |[ ]
//!  UW5                     |     [ ]
//!  UW6                     |          [ ]
//!  BW1            [      ] |
//!  BW2                 [   |  ]
//!  BW3                     |[      ]
//!  TW1       [           ] |
//!  TW2            [        |  ]
//!  TW3                 [   |       ]
//!  TW4                     |[           ]
//! ```
//!
//! Uma feature só é gerada quando o n-grama inteiro cabe na sentença. As
//! condições são exatamente as da tabela abaixo; note que `UW1`/`TW1` exigem
//! `i - 2 > 0` (ou seja, `i >= 3`) e por isso **não** disparam em `i = 2`.
//!
//! ## Indexação
//!
//! Tudo é indexado por *code point*, nunca por byte: `"今日"` tem comprimento 2.

use serde::Serialize;

use crate::model::FeatureGroup;

/// Visão de uma sentença indexada por caractere.
///
/// Guarda os offsets de byte de cada caractere para que fatias por índice de
/// caractere sejam `&str` emprestadas do texto original, sem alocação.
#[derive(Debug, Clone)]
pub struct Sentence<'a> {
    text: &'a str,
    /// `offsets[k]` é o byte inicial do caractere `k`; o último elemento é `text.len()`.
    offsets: Vec<usize>,
}

impl<'a> Sentence<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut offsets: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        offsets.push(text.len());
        Self { text, offsets }
    }

    /// Número de caracteres (code points).
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Caracteres `[start, end)`. Panica se o intervalo sair da sentença.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[self.offsets[start]..self.offsets[end]]
    }

    /// O caractere de índice `i`.
    pub fn char_at(&self, i: usize) -> &'a str {
        self.slice(i, i + 1)
    }
}

/// Uma feature ativa numa fronteira: o grupo e o n-grama observado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundaryFeature<'a> {
    pub group: FeatureGroup,
    pub value: &'a str,
}

/// Extrai as features da fronteira `i`, na ordem da tabela `UW1..TW4`.
///
/// Pré-condição: `1 <= i < sentence.len()`.
pub fn boundary_features<'a>(sentence: &Sentence<'a>, i: usize) -> Vec<BoundaryFeature<'a>> {
    let len = sentence.len();
    debug_assert!(i >= 1 && i < len, "fronteira {i} fora de 1..{len}");

    let mut out = Vec::with_capacity(FeatureGroup::COUNT);
    let mut push = |group, start, end| {
        out.push(BoundaryFeature {
            group,
            value: sentence.slice(start, end),
        })
    };

    // `i >= 1` sempre, então `i - 1` não estoura; as demais subtrações
    // ficam atrás das suas condições.
    if i > 2 {
        push(FeatureGroup::Uw1, i - 3, i - 2);
    }
    if i > 1 {
        push(FeatureGroup::Uw2, i - 2, i - 1);
    }
    push(FeatureGroup::Uw3, i - 1, i);
    push(FeatureGroup::Uw4, i, i + 1);
    if i + 1 < len {
        push(FeatureGroup::Uw5, i + 1, i + 2);
    }
    if i + 2 < len {
        push(FeatureGroup::Uw6, i + 2, i + 3);
    }
    if i > 1 {
        push(FeatureGroup::Bw1, i - 2, i);
    }
    push(FeatureGroup::Bw2, i - 1, i + 1);
    if i + 1 < len {
        push(FeatureGroup::Bw3, i, i + 2);
    }
    if i > 2 {
        push(FeatureGroup::Tw1, i - 3, i);
    }
    if i > 1 {
        push(FeatureGroup::Tw2, i - 2, i + 1);
    }
    if i + 1 < len {
        push(FeatureGroup::Tw3, i - 1, i + 2);
    }
    if i + 2 < len {
        push(FeatureGroup::Tw4, i, i + 3);
    }

    out
}
