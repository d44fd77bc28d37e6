//! # Modelos Padrão por Idioma
//!
//! Em vez de segmentadores globais por idioma, há uma tabela pequena
//! `idioma → arquivo de modelo` e um [`ModelLoader`] que resolve nomes e
//! caminhos para um [`Model`]. Quem chama guarda o [`Segmenter`] resultante.
//!
//! | Tag | Idioma | Arquivo |
//! |---|---|---|
//! | `ja` | Japonês | `ja.json` |
//! | `zh-hans` | Chinês simplificado | `zh-hans.json` |
//! | `zh-hant` | Chinês tradicional | `zh-hant.json` |
//!
//! O diretório dos modelos vem de `BUDOUX_MODEL_DIR` (padrão: `models`).

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ModelError, Result};
use crate::model::Model;
use crate::segmenter::Segmenter;

/// Variável de ambiente com o diretório dos modelos padrão.
pub const MODEL_DIR_ENV: &str = "BUDOUX_MODEL_DIR";
/// Diretório usado quando a variável não está definida.
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Idiomas com modelo padrão.
///
/// Na desserialização a tag passa pelo mesmo [`FromStr`], então `"JA"` e
/// `"zh_Hans"` são aceitos como em `"ja".parse()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Language {
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "zh-hans")]
    SimplifiedChinese,
    #[serde(rename = "zh-hant")]
    TraditionalChinese,
}

impl Language {
    pub const ALL: [Language; 3] = [
        Self::Japanese,
        Self::SimplifiedChinese,
        Self::TraditionalChinese,
    ];

    /// Tag BCP 47 simplificada (`ja`, `zh-hans`, `zh-hant`).
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Japanese => "ja",
            Self::SimplifiedChinese => "zh-hans",
            Self::TraditionalChinese => "zh-hant",
        }
    }

    /// Nome do arquivo de modelo dentro do diretório de modelos.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Self::Japanese => "ja.json",
            Self::SimplifiedChinese => "zh-hans.json",
            Self::TraditionalChinese => "zh-hant.json",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|lang| lang.tag() == tag)
            .ok_or_else(|| ModelError::UnknownLanguage(s.to_string()))
    }
}

impl TryFrom<String> for Language {
    type Error = ModelError;

    fn try_from(tag: String) -> Result<Self> {
        tag.parse()
    }
}

/// Resolve nomes de idioma ou caminhos de arquivo para modelos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelLoader {
    model_dir: PathBuf,
}

impl ModelLoader {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
        }
    }

    /// Usa `BUDOUX_MODEL_DIR`, ou `models` se ela não estiver definida.
    pub fn from_env() -> Self {
        let dir = std::env::var_os(MODEL_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_DIR));
        Self::new(dir)
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Caminho do arquivo de modelo de um idioma.
    pub fn language_path(&self, lang: Language) -> PathBuf {
        self.model_dir.join(lang.resource_name())
    }

    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<Model> {
        Model::from_path(path)
    }

    pub fn load_language(&self, lang: Language) -> Result<Model> {
        let path = self.language_path(lang);
        debug!(language = %lang, path = %path.display(), "carregando modelo padrão");
        Model::from_path(path)
    }

    /// Carrega por tag de idioma conhecida ou, se não for uma, por caminho.
    pub fn load(&self, name_or_path: &str) -> Result<Model> {
        match name_or_path.parse::<Language>() {
            Ok(lang) => self.load_language(lang),
            Err(_) => self.load_path(name_or_path),
        }
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Segmenter {
    /// Carrega o modelo de um arquivo.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Model::from_path(path).map(Self::new)
    }

    /// Carrega por tag de idioma (`ja`, `zh-hans`, `zh-hant`) ou caminho de arquivo.
    pub fn from_resource(name_or_path: &str) -> Result<Self> {
        ModelLoader::from_env().load(name_or_path).map(Self::new)
    }

    pub fn for_language(lang: Language) -> Result<Self> {
        ModelLoader::from_env().load_language(lang).map(Self::new)
    }

    pub fn japanese() -> Result<Self> {
        Self::for_language(Language::Japanese)
    }

    pub fn simplified_chinese() -> Result<Self> {
        Self::for_language(Language::SimplifiedChinese)
    }

    pub fn traditional_chinese() -> Result<Self> {
        Self::for_language(Language::TraditionalChinese)
    }
}
