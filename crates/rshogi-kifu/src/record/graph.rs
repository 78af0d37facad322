//! 指し手グラフと到達索引

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::types::Move;

/// 局面から出る1本の辺
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub mv: Move,
    pub comments: Vec<String>,
}

/// 指し手グラフ: 局面の指紋 → (USI → 辺)
#[derive(Debug, Default)]
pub struct MoveGraph {
    edges: HashMap<String, BTreeMap<String, Edge>>,
}

impl MoveGraph {
    pub fn new() -> MoveGraph {
        MoveGraph::default()
    }

    /// 辺を追加する。既にあればコメントだけ重複なくマージし偽を返す。
    pub fn add_edge(&mut self, fingerprint: &str, mv: Move, comments: &[String]) -> bool {
        let children = self.edges.entry(fingerprint.to_string()).or_default();
        match children.get_mut(&mv.to_usi()) {
            Some(edge) => {
                for c in comments {
                    if !edge.comments.contains(c) {
                        edge.comments.push(c.clone());
                    }
                }
                false
            }
            None => {
                children.insert(
                    mv.to_usi(),
                    Edge {
                        mv,
                        comments: comments.to_vec(),
                    },
                );
                true
            }
        }
    }

    /// 局面から出る辺（USI順）
    pub fn edges(&self, fingerprint: &str) -> impl Iterator<Item = &Edge> {
        self.edges
            .get(fingerprint)
            .into_iter()
            .flat_map(|children| children.values())
    }

    /// 辺を持つ局面の指紋
    pub fn positions(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }
}

/// 到達索引: 局面の指紋 → (そこへ至った指し手ラベル → 経路)
#[derive(Debug, Default)]
pub struct ArrivalIndex {
    arrivals: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl ArrivalIndex {
    pub fn new() -> ArrivalIndex {
        ArrivalIndex::default()
    }

    /// 到達を記録する。同じラベルの経路は最初のものを残す。
    pub fn record(&mut self, fingerprint: &str, label: &str, path: &[String]) {
        self.arrivals
            .entry(fingerprint.to_string())
            .or_default()
            .entry(label.to_string())
            .or_insert_with(|| path.to_vec());
    }

    /// 局面への到達（ラベル → 経路）
    pub fn get(&self, fingerprint: &str) -> Option<&BTreeMap<String, Vec<String>>> {
        self.arrivals.get(fingerprint)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, Vec<String>>)> {
        self.arrivals.iter().map(|(fp, labels)| (fp.as_str(), labels))
    }
}

/// グラフと到達索引に現れる局面の数
pub fn unique_positions(graph: &MoveGraph, arrivals: &ArrivalIndex) -> usize {
    graph
        .positions()
        .chain(arrivals.iter().map(|(fp, _)| fp))
        .collect::<BTreeSet<_>>()
        .len()
}
