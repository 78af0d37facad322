//! 局面履歴の登録簿
//!
//! ブロックごと・手数ごとに、再生中に通過した局面を記録する。変化ブロックの
//! 親局面探しに使う。

use std::collections::BTreeMap;

use crate::types::Square;

/// 記録された局面
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub fingerprint: String,
    /// 直前の指し手の移動先（「同」の参照先）
    pub last_destination: Option<Square>,
    /// ここまでの指し手ラベル（末尾の一定数）
    pub path: Vec<String>,
}

/// 親局面の候補
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub block: usize,
    pub move_count: u32,
    pub entry: &'a HistoryEntry,
    /// 登録順（大きいほど新しい）
    pub seq: usize,
}

/// 登録簿: ブロックID → 手数 → 局面のリスト
#[derive(Debug, Default)]
pub struct HistoryRegistry {
    blocks: BTreeMap<usize, BTreeMap<u32, Vec<(usize, HistoryEntry)>>>,
    next_seq: usize,
}

impl HistoryRegistry {
    pub fn new() -> HistoryRegistry {
        HistoryRegistry::default()
    }

    /// 局面を記録する。同じブロック・手数に同じ内容があれば記録せず偽を返す。
    pub fn record(&mut self, block: usize, move_count: u32, entry: HistoryEntry) -> bool {
        let list = self
            .blocks
            .entry(block)
            .or_default()
            .entry(move_count)
            .or_default();
        if list.iter().any(|(_, e)| *e == entry) {
            return false;
        }
        list.push((self.next_seq, entry));
        self.next_seq += 1;
        true
    }

    /// 記録数
    pub fn len(&self) -> usize {
        self.next_seq
    }

    pub fn is_empty(&self) -> bool {
        self.next_seq == 0
    }

    /// 指定ブロック・手数の記録
    pub fn entries(&self, block: usize, move_count: u32) -> impl Iterator<Item = &HistoryEntry> {
        self.blocks
            .get(&block)
            .and_then(|counts| counts.get(&move_count))
            .into_iter()
            .flatten()
            .map(|(_, e)| e)
    }

    /// 親局面の候補を、`target` 手数に近い順、同じ距離なら新しい順に並べて返す
    ///
    /// `target` が `None` なら新しい順のみ。
    pub fn candidates(&self, target: Option<u32>) -> Vec<Candidate<'_>> {
        let mut out: Vec<Candidate<'_>> = self
            .blocks
            .iter()
            .flat_map(|(&block, counts)| {
                counts.iter().flat_map(move |(&move_count, list)| {
                    list.iter().map(move |(seq, entry)| Candidate {
                        block,
                        move_count,
                        entry,
                        seq: *seq,
                    })
                })
            })
            .collect();
        out.sort_by_key(|c| {
            let distance = target.map_or(0, |t| c.move_count.abs_diff(t));
            (distance, std::cmp::Reverse(c.seq))
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(fp: &str) -> HistoryEntry {
        HistoryEntry {
            fingerprint: fp.to_string(),
            last_destination: None,
            path: Vec::new(),
        }
    }

    #[test]
    fn test_record_dedup() {
        let mut reg = HistoryRegistry::new();
        assert!(reg.is_empty());
        assert!(reg.record(0, 1, entry("a")));
        assert!(!reg.record(0, 1, entry("a")));
        assert!(reg.record(0, 2, entry("a")));
        assert!(reg.record(1, 1, entry("a")));
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.entries(0, 1).count(), 1);
        assert_eq!(reg.entries(5, 1).count(), 0);
    }

    #[test]
    fn test_candidates_order() {
        let mut reg = HistoryRegistry::new();
        reg.record(0, 2, entry("p2"));
        reg.record(0, 3, entry("p3"));
        reg.record(0, 4, entry("p4"));
        reg.record(1, 3, entry("q3"));

        let order: Vec<&str> = reg
            .candidates(Some(3))
            .iter()
            .map(|c| c.entry.fingerprint.as_str())
            .collect();
        assert_eq!(order, vec!["q3", "p3", "p4", "p2"]);

        let order: Vec<&str> = reg
            .candidates(None)
            .iter()
            .map(|c| c.entry.fingerprint.as_str())
            .collect();
        assert_eq!(order, vec!["q3", "p4", "p3", "p2"]);
    }
}
