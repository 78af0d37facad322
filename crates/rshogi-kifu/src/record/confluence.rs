//! 合流局面の検出

use crate::types::Color;

use super::graph::ArrivalIndex;

/// 合流局面（異なる指し手で到達した局面）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confluence {
    pub fingerprint: String,
    pub side_to_move: Color,
    /// (到達した指し手ラベル, 経路)
    pub arrivals: Vec<(String, Vec<String>)>,
}

/// 到達ラベルが2種類以上ある局面の指紋（開始局面を除く、昇順）
pub fn find_confluences(arrivals: &ArrivalIndex, start_fingerprint: &str) -> Vec<String> {
    arrivals
        .iter()
        .filter(|(fp, labels)| labels.len() > 1 && *fp != start_fingerprint)
        .map(|(fp, _)| fp.to_string())
        .collect()
}

/// 合流局面の詳細
pub fn describe_confluences(arrivals: &ArrivalIndex, start_fingerprint: &str) -> Vec<Confluence> {
    find_confluences(arrivals, start_fingerprint)
        .into_iter()
        .filter_map(|fp| {
            let labels = arrivals.get(&fp)?;
            let side_to_move = match fp.split_whitespace().nth(1) {
                Some("w") => Color::White,
                _ => Color::Black,
            };
            Some(Confluence {
                side_to_move,
                arrivals: labels
                    .iter()
                    .map(|(label, path)| (label.clone(), path.clone()))
                    .collect(),
                fingerprint: fp,
            })
        })
        .collect()
}
