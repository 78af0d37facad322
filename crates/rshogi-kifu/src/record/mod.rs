//! 変化付き棋譜の復元
//!
//! ```text
//! テキスト → segment → Block列
//!   → Reconstructor（resolve で再生）→ MoveGraph + ArrivalIndex + 診断
//!   → expand（format で表記）→ BranchNode木 → write_ki2
//! ```

mod confluence;
mod expand;
mod graph;
mod registry;
mod resolver;
mod segment;
mod writer;

pub use confluence::{Confluence, describe_confluences, find_confluences};
pub use expand::{BranchNode, count_nodes, expand};
pub use graph::{ArrivalIndex, Edge, MoveGraph, unique_positions};
pub use registry::{Candidate, HistoryEntry, HistoryRegistry};
pub use resolver::{Diagnostic, Reconstruction, Reconstructor, TERMINAL_WORDS, is_terminal};
pub use segment::{Block, BlockKind, MoveEntry, extract_header, segment};
pub use writer::write_ki2;

use crate::config::Ki2Config;

/// 棋譜テキストを再生して指し手グラフを作る
pub fn reconstruct(text: &str, config: &Ki2Config) -> Reconstruction {
    let blocks = segment(text);
    log::debug!("{} block(s)", blocks.len());
    Reconstructor::new(config).run(&blocks)
}

/// 展開済みの棋譜
#[derive(Debug)]
pub struct ExpandedRecord {
    /// 元の棋譜のヘッダー行
    pub header: Vec<String>,
    pub reconstruction: Reconstruction,
    pub tree: Vec<BranchNode>,
    pub confluences: Vec<Confluence>,
}

impl ExpandedRecord {
    /// 棋譜テキストから復元・展開まで行う
    pub fn from_text(text: &str, config: &Ki2Config) -> ExpandedRecord {
        let reconstruction = reconstruct(text, config);
        let mut start = reconstruction.start.clone();
        let tree = expand(&mut start, &reconstruction.graph);
        let confluences =
            describe_confluences(&reconstruction.arrivals, &reconstruction.start_fingerprint());
        ExpandedRecord {
            header: extract_header(text),
            reconstruction,
            tree,
            confluences,
        }
    }

    /// 展開木の節点数
    pub fn node_count(&self) -> usize {
        count_nodes(&self.tree)
    }

    /// グラフに現れる局面の数
    pub fn unique_positions(&self) -> usize {
        unique_positions(&self.reconstruction.graph, &self.reconstruction.arrivals)
    }

    /// 出力用のKI2テキスト（ヘッダー、空行、指し手）
    pub fn to_ki2(&self, moves_per_line: usize) -> String {
        let body = write_ki2(
            &self.tree,
            self.reconstruction.start.side_to_move(),
            moves_per_line,
        );
        if self.header.is_empty() {
            body
        } else {
            format!("{}\n\n{body}", self.header.join("\n"))
        }
    }

    /// 展開木のJSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.tree)
    }
}
