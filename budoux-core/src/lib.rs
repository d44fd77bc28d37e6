//! # budoux-core — Segmentação de Frases para Quebra de Linha
//!
//! Idiomas como japonês e chinês não separam palavras com espaços, então o
//! navegador não sabe onde é seguro quebrar a linha. Este crate divide uma
//! sentença em **frases** (chunks) usando um modelo pré-treinado de pesos sobre
//! n-gramas de caracteres, e cada fronteira entre frases vira uma oportunidade
//! de quebra.
//!
//! ## Arquitetura
//!
//! 1.  **Modelo** ([`model`]): mapa `grupo de feature → n-grama → peso`, carregado de JSON.
//! 2.  **Features** ([`features`]): para cada fronteira, os n-gramas da janela em volta dela.
//! 3.  **Segmentador** ([`segmenter`]): soma os pesos das features e decide se há quebra.
//! 4.  **Saída**: lista de frases cuja concatenação é exatamente a entrada.
//!
//! Em volta do núcleo: carregamento por idioma ([`language`]), eventos passo a
//! passo para visualização ([`pipeline`]) e junção com marcadores ([`breaks`]).
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use budoux_core::{Model, Segmenter, Separator};
//!
//! // 1. Monta (ou carrega de arquivo) o modelo
//! let model = Model::from_json_str(r#"{"UW4": {"天": 50}}"#).unwrap();
//!
//! // 2. Cria o segmentador
//! let segmenter = Segmenter::new(model);
//!
//! // 3. Segmenta
//! let phrases = segmenter.segment("今日は天気です。");
//! assert_eq!(phrases, vec!["今日は", "天気です。"]);
//!
//! // 4. Ou já insere os pontos de quebra
//! let html = segmenter.insert_breaks("今日は天気です。", &Separator::WordBreakTag);
//! assert_eq!(html, "今日は<wbr>天気です。");
//! ```

pub mod breaks;
pub mod error;
pub mod features;
pub mod language;
pub mod model;
pub mod pipeline;
pub mod segmenter;

pub use breaks::{join_with, Separator};
pub use error::{ModelError, Result};
pub use language::{Language, ModelLoader};
pub use model::{FeatureGroup, Model};
pub use pipeline::SegmentEvent;
pub use segmenter::{BoundaryDecision, FeatureContribution, Segmenter};
