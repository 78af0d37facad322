//! 棋譜の再生と変化ブロックの親局面探し
//!
//! 本譜は先頭から続けて再生する。変化ブロックは登録簿の全局面を候補とし、
//! 先頭の数手を試し指しした成功率が最も高い局面から再生する。どの候補でも
//! 1手目から指せないブロックは後回しにし、新たに解決できるものがなくなるまで
//! 繰り返す。

use std::fmt;

use crate::config::Ki2Config;
use crate::notation::{ResolveError, format, resolve, square_label};
use crate::position::{Position, handicap_sfen};
use crate::types::{Move, Square};

use super::graph::{ArrivalIndex, MoveGraph};
use super::registry::{HistoryEntry, HistoryRegistry};
use super::segment::{Block, BlockKind};

/// 終局・中断を表す語。これ以降のブロック内の指し手は読まない。
pub const TERMINAL_WORDS: &[&str] = &[
    "投了",
    "中断",
    "千日手",
    "持将棋",
    "詰み",
    "反則勝ち",
    "反則負け",
    "切れ負け",
    "入玉勝ち",
    "不戦勝",
    "不戦敗",
];

/// 終局語か（手番記号の有無は問わない）
pub fn is_terminal(text: &str) -> bool {
    let body = text
        .trim()
        .trim_start_matches(['▲', '△', '▽', '▼'])
        .trim_start();
    TERMINAL_WORDS.iter().any(|w| body.starts_with(w))
}

/// 再生中に見つかった問題
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// 表記を解決できずブロックの再生を打ち切った
    ReplayStopped {
        block: usize,
        move_index: usize,
        token: String,
        error: ResolveError,
    },
    /// 補助記号で絞り切れず升目番号で決めた
    Ambiguous {
        block: usize,
        token: String,
        remaining: usize,
    },
    /// 親局面が見つからず捨てた変化ブロック
    ParentUnresolvable {
        block: usize,
        declared_move: Option<u32>,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ReplayStopped {
                block,
                move_index,
                token,
                error,
            } => write!(f, "block {block}: replay stopped at move {} ('{token}'): {error}", move_index + 1),
            Diagnostic::Ambiguous {
                block,
                token,
                remaining,
            } => write!(f, "block {block}: '{token}' matched {remaining} moves, lowest origin square chosen"),
            Diagnostic::ParentUnresolvable {
                block,
                declared_move: Some(n),
            } => write!(f, "block {block} (変化：{n}手): no parent position found"),
            Diagnostic::ParentUnresolvable {
                block,
                declared_move: None,
            } => write!(f, "block {block}: no parent position found"),
        }
    }
}

/// 再生結果
#[derive(Debug)]
pub struct Reconstruction {
    /// 開始局面（手合割を反映済み）
    pub start: Position,
    pub graph: MoveGraph,
    pub arrivals: ArrivalIndex,
    pub registry: HistoryRegistry,
    pub diagnostics: Vec<Diagnostic>,
    /// 棋譜中の指し手表記の数
    pub tokens_found: usize,
    /// 再生できた指し手の数
    pub tokens_parsed: usize,
}

impl Reconstruction {
    fn new(start: Position) -> Reconstruction {
        Reconstruction {
            start,
            graph: MoveGraph::new(),
            arrivals: ArrivalIndex::new(),
            registry: HistoryRegistry::new(),
            diagnostics: Vec::new(),
            tokens_found: 0,
            tokens_parsed: 0,
        }
    }

    pub fn start_fingerprint(&self) -> String {
        self.start.fingerprint()
    }

    /// ブロックを再生する。解決できない表記か終局語で止まる。
    fn replay(&mut self, block: &Block, cursor: &mut Cursor, path_len: usize) {
        if !block.preamble_comments.is_empty() {
            log::debug!(
                "block {}: dropping {} comment(s) before the first move",
                block.id,
                block.preamble_comments.len()
            );
        }

        for (i, entry) in block.moves.iter().enumerate() {
            if is_terminal(&entry.text) {
                log::debug!("block {}: terminal word '{}'", block.id, entry.text);
                break;
            }

            let before = cursor.pos.fingerprint();
            let resolution = match resolve(&cursor.pos, cursor.last_destination, &entry.text) {
                Ok(r) => r,
                Err(error) => {
                    log::warn!("block {}: cannot replay '{}': {error}", block.id, entry.text);
                    self.diagnostics.push(Diagnostic::ReplayStopped {
                        block: block.id,
                        move_index: i,
                        token: entry.text.clone(),
                        error,
                    });
                    break;
                }
            };
            if let Some(remaining) = resolution.ambiguous {
                log::warn!(
                    "block {}: '{}' is ambiguous ({remaining} candidates)",
                    block.id,
                    entry.text
                );
                self.diagnostics.push(Diagnostic::Ambiguous {
                    block: block.id,
                    token: entry.text.clone(),
                    remaining,
                });
            }

            let mv = resolution.mv;
            let label = arrival_label(&cursor.pos, mv);
            log::debug!("block {}: {} -> {mv}", block.id, entry.text);

            cursor.pos.do_move(mv);
            cursor.move_count += 1;
            cursor.last_destination = Some(mv.to());
            cursor.path.push(label.clone());
            if cursor.path.len() > path_len {
                let excess = cursor.path.len() - path_len;
                cursor.path.drain(..excess);
            }

            let after = cursor.pos.fingerprint();
            self.graph.add_edge(&before, mv, &entry.comments);
            self.registry.record(
                block.id,
                cursor.move_count,
                HistoryEntry {
                    fingerprint: after.clone(),
                    last_destination: cursor.last_destination,
                    path: cursor.path.clone(),
                },
            );
            self.arrivals.record(&after, &label, &cursor.path);
            self.tokens_parsed += 1;
        }
    }
}

/// 到達経路に使うラベル
///
/// 親局面から再開したブロックには直前の手の履歴がないため、「同」は使わず升目で書く。
fn arrival_label(pos: &Position, mv: Move) -> String {
    let text = format(pos, mv);
    let text = match text.strip_prefix("同　") {
        Some(rest) => format!("{}{rest}", square_label(mv.to())),
        None => text,
    };
    format!("{}{text}", pos.side_to_move().glyph())
}

/// 再生位置
#[derive(Debug, Clone)]
struct Cursor {
    pos: Position,
    last_destination: Option<Square>,
    move_count: u32,
    path: Vec<String>,
}

impl Cursor {
    fn from_entry(entry: &HistoryEntry, move_count: u32) -> Option<Cursor> {
        let pos = match Position::from_sfen(&format!("{} 1", entry.fingerprint)) {
            Ok(pos) => pos,
            Err(e) => {
                log::warn!("registered position is not a valid SFEN: {e}");
                return None;
            }
        };
        Some(Cursor {
            pos,
            last_destination: entry.last_destination,
            move_count,
            path: entry.path.clone(),
        })
    }
}

/// 選ばれた親局面
struct Parent {
    block: usize,
    move_count: u32,
    entry: HistoryEntry,
    parsed: usize,
    attempted: usize,
}

/// 棋譜全体の再生
pub struct Reconstructor<'a> {
    config: &'a Ki2Config,
    out: Reconstruction,
    main: Cursor,
    main_registered: bool,
}

impl<'a> Reconstructor<'a> {
    pub fn new(config: &'a Ki2Config) -> Reconstructor<'a> {
        let start = Position::startpos();
        Reconstructor {
            config,
            out: Reconstruction::new(start.clone()),
            main: Cursor {
                pos: start,
                last_destination: None,
                move_count: 0,
                path: Vec::new(),
            },
            main_registered: false,
        }
    }

    /// 全ブロックを処理する
    pub fn run(mut self, blocks: &[Block]) -> Reconstruction {
        self.out.tokens_found = blocks.iter().map(|b| b.moves.len()).sum();

        let mut deferred: Vec<&Block> = Vec::new();
        for block in blocks {
            match block.kind {
                BlockKind::MainLine => self.replay_main(block),
                BlockKind::Variation { .. } => {
                    if !self.try_variation(block) {
                        deferred.push(block);
                    }
                }
            }
        }

        let mut pass = 1;
        while !deferred.is_empty() {
            pass += 1;
            let before = deferred.len();
            deferred.retain(|block| !self.try_variation(block));
            log::info!(
                "pass {pass}: resolved {} of {before} deferred block(s)",
                before - deferred.len()
            );
            if deferred.len() == before {
                break;
            }
        }

        for block in deferred {
            log::warn!("block {}: dropped, no parent position replays it", block.id);
            self.out.diagnostics.push(Diagnostic::ParentUnresolvable {
                block: block.id,
                declared_move: block.declared_move(),
            });
        }

        self.out
    }

    fn replay_main(&mut self, block: &Block) {
        if let Some(name) = block.handicap() {
            self.apply_handicap(name);
        }
        if block.moves.is_empty() {
            return;
        }
        if !self.main_registered {
            self.out.registry.record(
                block.id,
                0,
                HistoryEntry {
                    fingerprint: self.main.pos.fingerprint(),
                    last_destination: None,
                    path: Vec::new(),
                },
            );
            self.main_registered = true;
        }
        self.out
            .replay(block, &mut self.main, self.config.arrival_path_len);
    }

    fn apply_handicap(&mut self, name: &str) {
        if self.main_registered {
            log::warn!("ignoring 手合割 '{name}' after the main line has started");
            return;
        }
        let Some(sfen) = handicap_sfen(name) else {
            log::warn!("unknown 手合割 '{name}', using 平手");
            return;
        };
        match Position::from_sfen(sfen) {
            Ok(pos) => {
                log::debug!("手合割 '{name}': {sfen}");
                self.out.start = pos.clone();
                self.main.pos = pos;
            }
            Err(e) => log::warn!("手合割 '{name}': {e}"),
        }
    }

    /// 変化ブロックの親を探して再生する。親が決まらなければ偽。
    fn try_variation(&mut self, block: &Block) -> bool {
        let Some(parent) = self.find_parent(block) else {
            log::debug!(
                "block {}: deferred (declared move {:?})",
                block.id,
                block.declared_move()
            );
            return false;
        };
        log::info!(
            "block {}: parent is block {} at move {} (score {}/{})",
            block.id,
            parent.block,
            parent.move_count,
            parent.parsed,
            parent.attempted
        );

        let Some(mut cursor) = Cursor::from_entry(&parent.entry, parent.move_count) else {
            return false;
        };
        self.out
            .replay(block, &mut cursor, self.config.arrival_path_len);
        true
    }

    /// 試し指しの成功率が最も高い親局面
    fn find_parent(&self, block: &Block) -> Option<Parent> {
        let tokens: Vec<&str> = block
            .moves
            .iter()
            .map(|m| m.text.as_str())
            .take_while(|t| !is_terminal(t))
            .take(self.config.lookahead)
            .collect();
        let target = block.declared_move().map(|n| n.saturating_sub(1));

        let mut best: Option<Parent> = None;
        for cand in self.out.registry.candidates(target) {
            let (parsed, attempted) = score(cand.entry, &tokens);
            let better = match &best {
                None => parsed > 0 || attempted == 0,
                Some(b) => parsed * b.attempted > b.parsed * attempted,
            };
            if better {
                best = Some(Parent {
                    block: cand.block,
                    move_count: cand.move_count,
                    entry: cand.entry.clone(),
                    parsed,
                    attempted,
                });
            }
            if parsed == attempted {
                break;
            }
        }
        best
    }
}

/// 登録局面から表記列を試し指しし、(最初の失敗までに指せた数, 試した数) を返す
fn score(entry: &HistoryEntry, tokens: &[&str]) -> (usize, usize) {
    let Ok(mut pos) = Position::from_sfen(&format!("{} 1", entry.fingerprint)) else {
        return (0, tokens.len());
    };
    let mut last_destination = entry.last_destination;
    let mut parsed = 0;
    for token in tokens {
        match resolve(&pos, last_destination, token) {
            Ok(r) => {
                pos.do_move(r.mv);
                last_destination = Some(r.mv.to());
                parsed += 1;
            }
            Err(_) => break,
        }
    }
    while pos.undo_move().is_some() {}
    (parsed, tokens.len())
}
