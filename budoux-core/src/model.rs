//! # Modelo de Pesos Pré-treinado
//!
//! O modelo é um mapa de dois níveis:
//!
//! ```text
//! { "UW1": { "の": -1234, ... }, "BW2": { "です": 567, ... }, ... }
//! ```
//!
//! - O **primeiro nível** é o grupo de feature (posição da janela em volta da fronteira).
//! - O **segundo nível** é o n-grama de caracteres (1 a 3 caracteres) observado naquela posição.
//! - O **valor** é o peso inteiro com que aquele n-grama apoia (positivo) ou
//!   desencoraja (negativo) uma quebra de frase.
//!
//! ## Grupos desconhecidos
//!
//! Arquivos de modelo podem trazer grupos que o algoritmo não consulta. Eles são
//! tolerados: não são indexados, mas seus pesos entram no peso total, porque o
//! limiar de decisão é derivado da soma de **todos** os valores do arquivo.
//!
//! ## Overflow
//!
//! Pesos e total são `i64`. Assume-se que a soma de todos os pesos de um modelo
//! cabe em 64 bits; não há verificação de overflow.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ModelError, Result};

/// Mapa bruto no formato do arquivo: grupo → (n-grama → peso).
pub type RawModel = HashMap<String, HashMap<String, i64>>;

/// Grupos de feature consultados pelo segmentador.
///
/// - `UW*` (unigramas): um caractere em uma das seis posições em volta da fronteira.
/// - `BW*` (bigramas): dois caracteres consecutivos.
/// - `TW*` (trigramas): três caracteres consecutivos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureGroup {
    #[serde(rename = "UW1")]
    Uw1,
    #[serde(rename = "UW2")]
    Uw2,
    #[serde(rename = "UW3")]
    Uw3,
    #[serde(rename = "UW4")]
    Uw4,
    #[serde(rename = "UW5")]
    Uw5,
    #[serde(rename = "UW6")]
    Uw6,
    #[serde(rename = "BW1")]
    Bw1,
    #[serde(rename = "BW2")]
    Bw2,
    #[serde(rename = "BW3")]
    Bw3,
    #[serde(rename = "TW1")]
    Tw1,
    #[serde(rename = "TW2")]
    Tw2,
    #[serde(rename = "TW3")]
    Tw3,
    #[serde(rename = "TW4")]
    Tw4,
}

impl FeatureGroup {
    /// Número de grupos reconhecidos.
    pub const COUNT: usize = 13;

    /// Todos os grupos, na ordem em que o segmentador os consulta.
    pub const ALL: [FeatureGroup; Self::COUNT] = [
        Self::Uw1,
        Self::Uw2,
        Self::Uw3,
        Self::Uw4,
        Self::Uw5,
        Self::Uw6,
        Self::Bw1,
        Self::Bw2,
        Self::Bw3,
        Self::Tw1,
        Self::Tw2,
        Self::Tw3,
        Self::Tw4,
    ];

    /// Nome do grupo como aparece no arquivo de modelo.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uw1 => "UW1",
            Self::Uw2 => "UW2",
            Self::Uw3 => "UW3",
            Self::Uw4 => "UW4",
            Self::Uw5 => "UW5",
            Self::Uw6 => "UW6",
            Self::Bw1 => "BW1",
            Self::Bw2 => "BW2",
            Self::Bw3 => "BW3",
            Self::Tw1 => "TW1",
            Self::Tw2 => "TW2",
            Self::Tw3 => "TW3",
            Self::Tw4 => "TW4",
        }
    }

    /// Converte o nome do arquivo para o grupo. Nomes desconhecidos retornam `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|g| g.as_str() == name)
    }
}

impl fmt::Display for FeatureGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureGroup {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("grupo de feature desconhecido: {s}"))
    }
}

/// Modelo imutável de pesos `FeatureGroup → n-grama → peso`.
///
/// O peso total é calculado uma única vez na construção, já que ele só depende
/// do modelo e é usado como limiar em toda fronteira de toda sentença.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawModel")]
pub struct Model {
    groups: HashMap<FeatureGroup, HashMap<String, i64>>,
    total_weight: i64,
}

impl Model {
    /// Modelo vazio: peso total zero, nenhuma fronteira jamais pontua acima de zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona (ou substitui) um peso, devolvendo o modelo. Útil para montar
    /// modelos pequenos em código e em testes.
    pub fn with_weight(mut self, group: FeatureGroup, key: impl Into<String>, weight: i64) -> Self {
        let previous = self.groups.entry(group).or_default().insert(key.into(), weight);
        self.total_weight += weight - previous.unwrap_or(0);
        self
    }

    /// Peso de `key` no grupo `group`; `0` quando o grupo ou a chave não existem.
    pub fn weight(&self, group: FeatureGroup, key: &str) -> i64 {
        self.groups
            .get(&group)
            .and_then(|entries| entries.get(key))
            .copied()
            .unwrap_or(0)
    }

    /// Soma de todos os pesos de todos os grupos do arquivo de origem.
    pub fn total_weight(&self) -> i64 {
        self.total_weight
    }

    /// Quantidade de n-gramas no grupo.
    pub fn group_len(&self, group: FeatureGroup) -> usize {
        self.groups.get(&group).map_or(0, HashMap::len)
    }

    /// Verdadeiro quando nenhum grupo reconhecido tem entradas.
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(HashMap::is_empty)
    }

    /// Decodifica um modelo a partir de JSON em texto.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::decode("<inline>", json.as_bytes())
    }

    /// Decodifica um modelo a partir de bytes JSON.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Self::decode("<inline>", bytes)
    }

    /// Lê e decodifica um modelo de qualquer leitor.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|source| ModelError::ResourceNotFound {
                resource: "<reader>".into(),
                source,
            })?;
        Self::decode("<reader>", &bytes)
    }

    /// Lê e decodifica um arquivo de modelo.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let resource = path.display().to_string();
        let bytes = fs::read(path).map_err(|source| ModelError::ResourceNotFound {
            resource: resource.clone(),
            source,
        })?;
        Self::decode(&resource, &bytes)
    }

    fn decode(resource: &str, bytes: &[u8]) -> Result<Self> {
        let model: Model =
            serde_json::from_slice(bytes).map_err(|source| ModelError::MalformedModel {
                resource: resource.to_string(),
                source,
            })?;
        debug!(
            resource,
            groups = model.groups.len(),
            total_weight = model.total_weight,
            "modelo carregado"
        );
        Ok(model)
    }
}

impl From<RawModel> for Model {
    fn from(raw: RawModel) -> Self {
        let mut groups = HashMap::new();
        let mut total_weight = 0i64;

        for (name, entries) in raw {
            total_weight += entries.values().sum::<i64>();
            match FeatureGroup::from_name(&name) {
                Some(group) => {
                    groups.insert(group, entries);
                }
                None => debug!(group = %name, "grupo ignorado"),
            }
        }

        Self {
            groups,
            total_weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_group_names() {
        for group in FeatureGroup::ALL {
            assert_eq!(FeatureGroup::from_name(group.as_str()), Some(group));
            assert_eq!(group.to_string().parse::<FeatureGroup>(), Ok(group));
        }
        assert_eq!(FeatureGroup::from_name("UW7"), None);
        assert!("uw1".parse::<FeatureGroup>().is_err());
    }

    #[test]
    fn test_weight_lookup_defaults_to_zero() {
        let model = Model::new().with_weight(FeatureGroup::Uw4, "a", 100);
        assert_eq!(model.weight(FeatureGroup::Uw4, "a"), 100);
        assert_eq!(model.weight(FeatureGroup::Uw4, "b"), 0);
        assert_eq!(model.weight(FeatureGroup::Tw1, "abc"), 0);
    }

    #[test]
    fn test_total_weight_sums_every_group() {
        let model = Model::from_json_str(r#"{"UW1": {"a": 3, "b": -1}, "BW2": {"ab": 10}}"#).unwrap();
        assert_eq!(model.total_weight(), 12);
        assert_eq!(model.group_len(FeatureGroup::Uw1), 2);
        assert_eq!(model.group_len(FeatureGroup::Bw2), 1);
    }

    #[test]
    fn test_with_weight_replaces_existing_key() {
        let model = Model::new()
            .with_weight(FeatureGroup::Uw1, "a", 5)
            .with_weight(FeatureGroup::Uw1, "a", 2);
        assert_eq!(model.weight(FeatureGroup::Uw1, "a"), 2);
        assert_eq!(model.total_weight(), 2);
    }

    #[test]
    fn test_unknown_groups_are_tolerated() {
        let model = Model::from_json_str(r#"{"UW4": {"a": 100}, "XX9": {"z": 7}}"#).unwrap();
        assert_eq!(model.weight(FeatureGroup::Uw4, "a"), 100);
        // O grupo desconhecido não é consultado, mas conta no total.
        assert_eq!(model.total_weight(), 107);
    }

    #[test]
    fn test_empty_model() {
        let model = Model::from_json_str("{}").unwrap();
        assert!(model.is_empty());
        assert_eq!(model.total_weight(), 0);
        assert_eq!(model, Model::new());
    }

    #[test]
    fn test_malformed_models() {
        for json in [
            r#"[1, 2, 3]"#,
            r#"{"UW1": 5}"#,
            r#"{"UW1": {"a": 1.5}}"#,
            r#"{"UW1": {"a": "1"}}"#,
            r#"{"UW1": {"a": 1}"#,
        ] {
            let err = Model::from_json_str(json).unwrap_err();
            assert!(
                matches!(err, ModelError::MalformedModel { .. }),
                "esperava MalformedModel para {json}"
            );
        }
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Model::from_path("/caminho/que/nao/existe/ja.json").unwrap_err();
        assert!(matches!(err, ModelError::ResourceNotFound { .. }));
    }

    #[test]
    fn test_from_path_and_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, r#"{"UW3": {"は": 42}}"#).unwrap();

        let model = Model::from_path(&path).unwrap();
        assert_eq!(model.weight(FeatureGroup::Uw3, "は"), 42);

        let file = fs::File::open(&path).unwrap();
        assert_eq!(Model::from_reader(file).unwrap(), model);
    }
}
