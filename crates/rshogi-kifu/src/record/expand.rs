//! 指し手グラフの木への展開

use std::collections::HashSet;

use serde::Serialize;

use crate::notation::format;
use crate::position::Position;
use crate::types::Move;

use super::graph::MoveGraph;

/// 展開木の節点
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchNode {
    /// 開始局面からの手数（1始まり）
    pub ply: u32,
    pub usi: String,
    #[serde(skip)]
    pub mv: Move,
    /// 手番記号を除いたKI2表記
    pub notation: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BranchNode>,
}

/// `pos` から指し手グラフを展開する
///
/// 子はUSI文字列順。現在の経路上に既にある局面からは展開しない。
/// `pos` は呼び出し前の状態に戻る。
pub fn expand(pos: &mut Position, graph: &MoveGraph) -> Vec<BranchNode> {
    let mut on_path = HashSet::new();
    expand_from(pos, graph, &mut on_path, 1)
}

fn expand_from(
    pos: &mut Position,
    graph: &MoveGraph,
    on_path: &mut HashSet<String>,
    ply: u32,
) -> Vec<BranchNode> {
    let fingerprint = pos.fingerprint();
    if !on_path.insert(fingerprint.clone()) {
        return Vec::new();
    }

    let mut nodes = Vec::new();
    for edge in graph.edges(&fingerprint) {
        let notation = format(pos, edge.mv);
        pos.do_move(edge.mv);
        let children = expand_from(pos, graph, on_path, ply + 1);
        pos.undo_move();
        nodes.push(BranchNode {
            ply,
            usi: edge.mv.to_usi(),
            mv: edge.mv,
            notation,
            comments: edge.comments.clone(),
            children,
        });
    }

    on_path.remove(&fingerprint);
    nodes
}

/// 木の節点数
pub fn count_nodes(nodes: &[BranchNode]) -> usize {
    nodes.iter().map(|n| 1 + count_nodes(&n.children)).sum()
}
