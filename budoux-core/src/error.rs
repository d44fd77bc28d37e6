//! # Erros de Carregamento de Modelo
//!
//! A segmentação em si é total: nunca falha para um modelo bem formado.
//! Todos os erros do crate vêm da **aquisição** do modelo (arquivo ausente,
//! JSON com formato errado, idioma desconhecido) e são entregues ao chamador
//! antes que um [`Segmenter`](crate::Segmenter) possa ser construído.

use std::io;

/// Erros possíveis ao localizar e decodificar um modelo.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// O recurso (caminho ou nome) não pôde ser localizado ou lido.
    #[error("modelo não encontrado: {resource}: {source}")]
    ResourceNotFound {
        resource: String,
        #[source]
        source: io::Error,
    },

    /// O recurso foi lido, mas não é um mapa de dois níveis com pesos inteiros.
    #[error("modelo malformado: {resource}: {source}")]
    MalformedModel {
        resource: String,
        #[source]
        source: serde_json::Error,
    },

    /// Tag de idioma fora da tabela de modelos padrão.
    #[error("idioma desconhecido: {0}")]
    UnknownLanguage(String),
}

impl ModelError {
    /// Nome do recurso envolvido no erro, quando houver.
    pub fn resource(&self) -> Option<&str> {
        match self {
            Self::ResourceNotFound { resource, .. } | Self::MalformedModel { resource, .. } => {
                Some(resource)
            }
            Self::UnknownLanguage(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
