//! 標準出力に出す集計と合流局面の一覧

use std::fmt::Write as _;

use rshogi_kifu::ExpandedRecord;
use rshogi_kifu::types::Color;

fn side_name(color: Color) -> &'static str {
    match color {
        Color::Black => "先手",
        Color::White => "後手",
    }
}

/// 1ファイル分の集計
pub fn summary(name: &str, record: &ExpandedRecord) -> String {
    let rec = &record.reconstruction;
    let mut out = String::new();
    let _ = writeln!(out, "== {name} ==");
    let _ = writeln!(out, "指し手: {}個中 {}個を解析", rec.tokens_found, rec.tokens_parsed);
    let _ = writeln!(out, "局面数: {}", record.unique_positions());
    let _ = writeln!(out, "合流局面: {}", record.confluences.len());
    let _ = writeln!(out, "展開ノード数: {}", record.node_count());
    if !rec.diagnostics.is_empty() {
        let _ = writeln!(out, "警告: {}件", rec.diagnostics.len());
    }

    for (i, c) in record.confluences.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "合流{} ({}番): {}", i + 1, side_name(c.side_to_move), c.fingerprint);
        for (label, path) in &c.arrivals {
            let _ = writeln!(out, "  {label}: {}", path.join(" "));
        }
    }
    out
}
