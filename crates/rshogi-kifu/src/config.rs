//! 展開処理の設定
//!
//! 設定ファイル（TOML / YAML / JSON）を読み、コマンドライン指定で上書きする。

use std::path::Path;

use serde::{Deserialize, Serialize};

/// 親局面探しで試し指しする手数の既定値
pub const DEFAULT_LOOKAHEAD: usize = 20;
/// 到達経路として残す手数の既定値
pub const DEFAULT_ARRIVAL_PATH_LEN: usize = 5;
/// 出力の1行あたりの手数の既定値
pub const DEFAULT_MOVES_PER_LINE: usize = 6;
/// 出力ファイル名の接尾辞の既定値
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_expanded";

/// 設定の読み込みエラー
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config extension: {0}")]
    UnknownFormat(String),
}

/// 確定した設定
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ki2Config {
    pub lookahead: usize,
    pub arrival_path_len: usize,
    pub moves_per_line: usize,
    pub output_suffix: String,
    pub write_json: bool,
}

impl Default for Ki2Config {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
            arrival_path_len: DEFAULT_ARRIVAL_PATH_LEN,
            moves_per_line: DEFAULT_MOVES_PER_LINE,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            write_json: false,
        }
    }
}

/// 設定ファイルの内容（未指定の項目は既定値のまま）
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ki2ConfigFile {
    #[serde(default)]
    pub lookahead: Option<usize>,
    #[serde(default)]
    pub arrival_path_len: Option<usize>,
    #[serde(default)]
    pub moves_per_line: Option<usize>,
    #[serde(default)]
    pub output_suffix: Option<String>,
    #[serde(default)]
    pub write_json: Option<bool>,
}

/// コマンドラインからの上書き
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub lookahead: Option<usize>,
    pub output_suffix: Option<String>,
    pub write_json: bool,
}

/// 拡張子で形式を選んで設定ファイルを読む
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<Ki2ConfigFile, ConfigError> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());
    match ext.as_deref() {
        Some("toml") => Ok(toml::from_str(&data)?),
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&data)?),
        Some("json") => Ok(serde_json::from_str(&data)?),
        other => Err(ConfigError::UnknownFormat(other.unwrap_or("").to_string())),
    }
}

fn sanitize(c: &mut Ki2Config) {
    if c.lookahead == 0 {
        log::warn!("invalid lookahead=0; reset to {DEFAULT_LOOKAHEAD}");
        c.lookahead = DEFAULT_LOOKAHEAD;
    }
    if c.arrival_path_len == 0 {
        log::warn!("invalid arrival_path_len=0; reset to {DEFAULT_ARRIVAL_PATH_LEN}");
        c.arrival_path_len = DEFAULT_ARRIVAL_PATH_LEN;
    }
    if c.moves_per_line == 0 {
        log::warn!("invalid moves_per_line=0; reset to {DEFAULT_MOVES_PER_LINE}");
        c.moves_per_line = DEFAULT_MOVES_PER_LINE;
    }
    if c.output_suffix.contains(['/', '\\']) {
        log::warn!("invalid output_suffix {:?}; reset to {DEFAULT_OUTPUT_SUFFIX}", c.output_suffix);
        c.output_suffix = DEFAULT_OUTPUT_SUFFIX.to_string();
    }
}

/// 既定値 < 設定ファイル < コマンドライン の順で重ねる
pub fn merge_config(file: Option<Ki2ConfigFile>, cli: &ConfigOverrides) -> Ki2Config {
    let mut out = Ki2Config::default();
    if let Some(f) = file {
        if let Some(x) = f.lookahead {
            out.lookahead = x;
        }
        if let Some(x) = f.arrival_path_len {
            out.arrival_path_len = x;
        }
        if let Some(x) = f.moves_per_line {
            out.moves_per_line = x;
        }
        if let Some(x) = f.output_suffix {
            out.output_suffix = x;
        }
        if let Some(x) = f.write_json {
            out.write_json = x;
        }
    }
    if let Some(x) = cli.lookahead {
        out.lookahead = x;
    }
    if let Some(x) = &cli.output_suffix {
        out.output_suffix = x.clone();
    }
    if cli.write_json {
        out.write_json = true;
    }
    sanitize(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_precedence() {
        let file = Ki2ConfigFile {
            lookahead: Some(8),
            moves_per_line: Some(4),
            output_suffix: Some("_tree".to_string()),
            ..Default::default()
        };
        let cli = ConfigOverrides {
            lookahead: Some(12),
            ..Default::default()
        };
        let cfg = merge_config(Some(file), &cli);
        assert_eq!(cfg.lookahead, 12);
        assert_eq!(cfg.moves_per_line, 4);
        assert_eq!(cfg.output_suffix, "_tree");
        assert_eq!(cfg.arrival_path_len, DEFAULT_ARRIVAL_PATH_LEN);
        assert!(!cfg.write_json);
    }

    #[test]
    fn test_merge_sanitizes() {
        let cli = ConfigOverrides {
            lookahead: Some(0),
            output_suffix: Some("../x".to_string()),
            write_json: true,
        };
        let cfg = merge_config(None, &cli);
        assert_eq!(cfg.lookahead, DEFAULT_LOOKAHEAD);
        assert_eq!(cfg.output_suffix, DEFAULT_OUTPUT_SUFFIX);
        assert!(cfg.write_json);
    }

    #[test]
    fn test_parse_formats() {
        let f: Ki2ConfigFile = toml::from_str("lookahead = 5\nwrite_json = true\n").unwrap();
        assert_eq!(f.lookahead, Some(5));
        assert_eq!(f.write_json, Some(true));

        let f: Ki2ConfigFile = serde_yaml::from_str("moves_per_line: 3\n").unwrap();
        assert_eq!(f.moves_per_line, Some(3));

        let f: Ki2ConfigFile = serde_json::from_str(r#"{"arrival_path_len": 7}"#).unwrap();
        assert_eq!(f.arrival_path_len, Some(7));

        assert!(toml::from_str::<Ki2ConfigFile>("unknown = 1\n").is_err());
    }

    #[test]
    fn test_load_config_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ki2.yaml");
        std::fs::write(&path, "lookahead: 9\n").unwrap();
        assert_eq!(load_config_file(&path).unwrap().lookahead, Some(9));

        let path = dir.path().join("ki2.ini");
        std::fs::write(&path, "lookahead=9\n").unwrap();
        assert!(matches!(load_config_file(&path), Err(ConfigError::UnknownFormat(_))));

        assert!(matches!(
            load_config_file(dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
