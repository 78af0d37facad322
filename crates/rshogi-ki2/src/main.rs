//! KI2棋譜の全変化を1本の木に展開して書き出す

mod report;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rshogi_kifu::ExpandedRecord;
use rshogi_kifu::config::{ConfigOverrides, Ki2Config, load_config_file, merge_config};

#[derive(Parser, Debug)]
#[command(author, version, about = "Expand all variations of KI2 records into a single tree")]
struct Cli {
    /// Input KI2 files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Config file (.toml / .yaml / .json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory (defaults to the directory of each input)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Suffix appended to the output file stem
    #[arg(long)]
    suffix: Option<String>,

    /// Number of moves tried when scoring a parent position
    #[arg(long)]
    lookahead: Option<usize>,

    /// Also write the expanded tree as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn init_logger(debug: bool) {
    use std::io::Write;
    let log_level = if debug { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    );
    builder
        .format(|buf, record| {
            writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args())
        })
        .write_style(env_logger::WriteStyle::Never);
    builder.target(env_logger::Target::Stderr);
    builder.init();
}

/// UTF-8として読む。BOMは外し、不正なバイト列は置換する。
fn read_record(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            log::warn!(
                "{}: invalid UTF-8 at byte {}, replaced with U+FFFD",
                path.display(),
                e.utf8_error().valid_up_to()
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// `<stem><suffix>.<ext>` を出力先に置いたパス
fn output_path(input: &Path, output_dir: Option<&Path>, suffix: &str, ext: &str) -> PathBuf {
    let dir = match output_dir {
        Some(dir) => dir,
        None => input.parent().unwrap_or_else(|| Path::new(".")),
    };
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    dir.join(format!("{stem}{suffix}.{ext}"))
}

fn process_file(path: &Path, cli: &Cli, config: &Ki2Config) -> Result<()> {
    let text = read_record(path)?;
    let record = ExpandedRecord::from_text(&text, config);
    for diagnostic in &record.reconstruction.diagnostics {
        log::warn!("{}: {diagnostic}", path.display());
    }

    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("ki2");
    let out = output_path(path, cli.output_dir.as_deref(), &config.output_suffix, ext);
    std::fs::write(&out, record.to_ki2(config.moves_per_line))
        .with_context(|| format!("failed to write {}", out.display()))?;
    log::info!("wrote {}", out.display());

    if config.write_json {
        let json_path = output_path(path, cli.output_dir.as_deref(), &config.output_suffix, "json");
        let json = record.to_json().context("failed to serialize tree")?;
        std::fs::write(&json_path, json)
            .with_context(|| format!("failed to write {}", json_path.display()))?;
        log::info!("wrote {}", json_path.display());
    }

    print!("{}", report::summary(&path.display().to_string(), &record));
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.debug);

    let file_config = match &cli.config {
        Some(path) => Some(
            load_config_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
        ),
        None => None,
    };
    let overrides = ConfigOverrides {
        lookahead: cli.lookahead,
        output_suffix: cli.suffix.clone(),
        write_json: cli.json,
    };
    let config = merge_config(file_config, &overrides);
    log::debug!("config: {config:?}");

    if let Some(dir) = &cli.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let mut failed = 0usize;
    for path in &cli.files {
        if let Err(e) = process_file(path, &cli, &config) {
            log::error!("{e:#}");
            failed += 1;
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} file(s) failed", cli.files.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        let p = output_path(Path::new("games/a.ki2"), None, "_expanded", "ki2");
        assert_eq!(p, PathBuf::from("games/a_expanded.ki2"));
        let p = output_path(Path::new("a.kif"), Some(Path::new("out")), "_t", "json");
        assert_eq!(p, PathBuf::from("out/a_t.json"));
    }

    #[test]
    fn test_read_record_strips_bom_and_replaces_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.ki2");
        let mut bytes = "\u{feff}▲７六歩".as_bytes().to_vec();
        bytes.push(0xff);
        std::fs::write(&path, bytes).unwrap();
        let text = read_record(&path).unwrap();
        assert_eq!(text, "▲７六歩\u{fffd}");
    }
}
