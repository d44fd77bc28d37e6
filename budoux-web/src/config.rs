//! Configuração do servidor: argumentos de linha de comando, com variáveis de
//! ambiente como alternativa.
//!
//! | Argumento | Variável | Padrão | Significado |
//! |---|---|---|---|
//! | `--addr` | `BUDOUX_ADDR` | `0.0.0.0:3000` | endereço de escuta |
//! | `--model-dir` | `BUDOUX_MODEL_DIR` | `models` | diretório com `ja.json`, `zh-hans.json`, ... |
//! | `--languages` | `BUDOUX_LANGUAGES` | todos | tags a carregar, separadas por vírgula |
//! | `--default-language` | `BUDOUX_DEFAULT_LANGUAGE` | `ja` | idioma quando a requisição não informa |
//! | `--ws-delay-ms` | `BUDOUX_WS_DELAY_MS` | `35` | pausa entre eventos no WebSocket (animação) |

use std::net::SocketAddr;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;

use budoux_core::language::DEFAULT_MODEL_DIR;
use budoux_core::Language;
use clap::Parser;

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "budoux-web")]
#[command(about = "Servidor de segmentação de frases com visualização em tempo real", long_about = None)]
pub struct ServerConfig {
    /// Endereço de escuta
    #[arg(long, env = "BUDOUX_ADDR", default_value = "0.0.0.0:3000")]
    pub addr: SocketAddr,

    /// Diretório dos modelos padrão
    #[arg(long, env = "BUDOUX_MODEL_DIR", default_value = "models")]
    pub model_dir: PathBuf,

    /// Idiomas a carregar na partida
    #[arg(
        long,
        env = "BUDOUX_LANGUAGES",
        value_delimiter = ',',
        default_value = "ja,zh-hans,zh-hant"
    )]
    pub languages: Vec<Language>,

    /// Idioma usado quando a requisição não informa um
    #[arg(long, env = "BUDOUX_DEFAULT_LANGUAGE", default_value = "ja")]
    pub default_language: Language,

    /// Pausa entre eventos enviados pelo WebSocket, em milissegundos
    #[arg(
        long = "ws-delay-ms",
        env = "BUDOUX_WS_DELAY_MS",
        default_value = "35",
        value_parser = parse_millis
    )]
    pub ws_event_delay: Duration,
}

fn parse_millis(s: &str) -> Result<Duration, ParseIntError> {
    s.trim().parse().map(Duration::from_millis)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            languages: Language::ALL.to_vec(),
            default_language: Language::Japanese,
            ws_event_delay: Duration::from_millis(35),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::try_parse_from(["budoux-web"]).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.languages.len(), 3);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::try_parse_from([
            "budoux-web",
            "--addr",
            "127.0.0.1:8080",
            "--model-dir",
            "/srv/models",
            "--languages",
            "zh-hans, ZH_HANT",
            "--default-language",
            "zh-hans",
            "--ws-delay-ms",
            "0",
        ])
        .unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.model_dir, PathBuf::from("/srv/models"));
        assert_eq!(
            config.languages,
            vec![Language::SimplifiedChinese, Language::TraditionalChinese]
        );
        assert_eq!(config.default_language, Language::SimplifiedChinese);
        assert_eq!(config.ws_event_delay, Duration::ZERO);
    }

    #[test]
    fn test_invalid_values() {
        for args in [
            ["budoux-web", "--addr", "porta"],
            ["budoux-web", "--languages", "ja,ko"],
            ["budoux-web", "--default-language", "en"],
            ["budoux-web", "--ws-delay-ms", "lento"],
        ] {
            let err = ServerConfig::try_parse_from(args).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation, "{args:?}");
        }
    }
}
