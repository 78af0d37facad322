//! 棋譜テキストのブロック分割
//!
//! `開始日時`・`手合割`・`変化` で始まる行で区切り、各ブロックの指し手と
//! コメントを取り出す。

use std::sync::LazyLock;

use regex::Regex;

/// 指し手: 手番記号に続く空白・手番記号・`*` 以外の文字列（全角空白は含む）
static MOVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[▲△▽▼][ \t]*[^▲△▽▼\r\n* \t]+").expect("invalid MOVE_RE pattern")
});
/// `変化：N手` / `変化:N手目`
static VARIATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^変化[：:]\s*([0-9０-９]+)\s*手").expect("invalid VARIATION_RE pattern")
});

/// ブロックの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// 本譜（先頭のテキスト、`開始日時`、`手合割` で始まるブロック）
    MainLine,
    /// 変化。宣言された開始手数を持つ（読めなければ `None`）
    Variation { declared_move: Option<u32> },
}

/// 1手分の表記とそれに付くコメント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveEntry {
    pub text: String,
    pub comments: Vec<String>,
}

/// 分割されたブロック
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// ファイル内の順番（0始まり）
    pub id: usize,
    pub kind: BlockKind,
    /// 指し手より前の指し手でもコメントでもない行（`手合割：平手` 等）
    pub header_lines: Vec<String>,
    /// 最初の指し手より前のコメント
    pub preamble_comments: Vec<String>,
    pub moves: Vec<MoveEntry>,
}

impl Block {
    fn new(id: usize, kind: BlockKind) -> Block {
        Block {
            id,
            kind,
            header_lines: Vec::new(),
            preamble_comments: Vec::new(),
            moves: Vec::new(),
        }
    }

    /// 変化ブロックの宣言手数
    pub fn declared_move(&self) -> Option<u32> {
        match self.kind {
            BlockKind::Variation { declared_move } => declared_move,
            BlockKind::MainLine => None,
        }
    }

    /// `手合割：` の値
    pub fn handicap(&self) -> Option<&str> {
        self.header_lines
            .iter()
            .find_map(|line| header_value(line, "手合割"))
    }

    fn push_comment(&mut self, comment: &str) {
        let comment = comment.trim().to_string();
        match self.moves.last_mut() {
            Some(entry) => entry.comments.push(comment),
            None => self.preamble_comments.push(comment),
        }
    }
}

/// `key：value` 形式の行から値を取り出す
fn header_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = line.trim().strip_prefix(key)?;
    let rest = rest
        .strip_prefix('：')
        .or_else(|| rest.strip_prefix(':'))?;
    Some(rest.trim())
}

/// 手数（半角・全角数字）を読む
fn parse_move_number(digits: &str) -> Option<u32> {
    let ascii: String = digits
        .chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            _ => c,
        })
        .collect();
    ascii.parse().ok()
}

/// ブロックの区切り行ならその種類
fn block_marker(line: &str) -> Option<BlockKind> {
    if line.starts_with("変化") {
        let declared_move = VARIATION_RE
            .captures(line)
            .and_then(|caps| parse_move_number(&caps[1]));
        if declared_move.is_none() {
            log::warn!("variation line without move number: {line}");
        }
        Some(BlockKind::Variation { declared_move })
    } else if line.starts_with("開始日時") || line.starts_with("手合割") {
        Some(BlockKind::MainLine)
    } else {
        None
    }
}

/// 棋譜テキストをブロックに分割する
///
/// 最初の区切り行より前のテキストは先頭の本譜ブロックになる（空でも作る）。
pub fn segment(text: &str) -> Vec<Block> {
    let mut blocks = vec![Block::new(0, BlockKind::MainLine)];

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(kind) = block_marker(line) {
            let mut block = Block::new(blocks.len(), kind);
            if kind == BlockKind::MainLine {
                block.header_lines.push(line.to_string());
            }
            blocks.push(block);
            continue;
        }

        let Some(block) = blocks.last_mut() else {
            continue;
        };

        if let Some(comment) = line.strip_prefix('*') {
            block.push_comment(comment);
            continue;
        }

        let (body, inline_comment) = match line.split_once('*') {
            Some((body, comment)) => (body, Some(comment)),
            None => (line, None),
        };
        let before = block.moves.len();
        block.moves.extend(MOVE_RE.find_iter(body).map(|m| MoveEntry {
            text: m.as_str().trim().to_string(),
            comments: Vec::new(),
        }));

        if block.moves.len() == before {
            if block.moves.is_empty() {
                block.header_lines.push(line.to_string());
            } else {
                log::debug!("block {}: ignoring line '{line}'", block.id);
            }
            continue;
        }
        if let Some(comment) = inline_comment {
            block.push_comment(comment);
        }
    }

    blocks
}

/// 出力に引き継ぐヘッダー行（最初の指し手・変化行より前の空でない行）
pub fn extract_header(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .take_while(|line| !line.starts_with("変化") && !MOVE_RE.is_match(line))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = "\
開始日時：2024/01/01
手合割：平手
先手：A
後手：B
*対局前のコメント
▲７六歩    △３四歩    ▲２二角成
*角交換
△同　銀    ▲４五角 *筋違い角
まで5手で中断

変化：3手
▲２六歩    △８四歩
";

    #[test]
    fn test_segment_blocks() {
        let blocks = segment(RECORD);
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0].kind, BlockKind::MainLine);
        assert!(blocks[0].moves.is_empty());
        assert_eq!(blocks[1].header_lines, vec!["開始日時：2024/01/01"]);
        assert_eq!(blocks[2].handicap(), Some("平手"));
        assert_eq!(blocks[3].kind, BlockKind::Variation { declared_move: Some(3) });
        assert_eq!(blocks[3].declared_move(), Some(3));
        assert_eq!(blocks[3].id, 3);
    }

    #[test]
    fn test_segment_moves_and_comments() {
        let blocks = segment(RECORD);
        let main = &blocks[2];
        let texts: Vec<&str> = main.moves.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["▲７六歩", "△３四歩", "▲２二角成", "△同　銀", "▲４五角"]);
        assert_eq!(main.preamble_comments, vec!["対局前のコメント"]);
        assert_eq!(main.moves[2].comments, vec!["角交換"]);
        assert_eq!(main.moves[4].comments, vec!["筋違い角"]);
        assert!(main.header_lines.contains(&"先手：A".to_string()));
        assert!(!main.header_lines.iter().any(|l| l.starts_with("まで")));

        let variation = &blocks[3];
        assert_eq!(variation.moves.len(), 2);
        assert_eq!(variation.moves[0].text, "▲２六歩");
    }

    #[test]
    fn test_segment_without_header() {
        let blocks = segment("▲７六歩 △３四歩\n変化：2手目\n△８四歩\n変化：x手\n▲２六歩\n");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].moves.len(), 2);
        assert_eq!(blocks[1].declared_move(), Some(2));
        assert_eq!(blocks[2].kind, BlockKind::Variation { declared_move: None });
    }

    #[test]
    fn test_segment_fullwidth_move_number() {
        let blocks = segment("▲７六歩 △３四歩\n変化：２手\n△８四歩\n変化：１２手\n▲２六歩\n");
        assert_eq!(blocks[1].declared_move(), Some(2));
        assert_eq!(blocks[2].declared_move(), Some(12));
        assert_eq!(parse_move_number("1２"), Some(12));
    }

    #[test]
    fn test_extract_header() {
        assert_eq!(
            extract_header(RECORD),
            vec!["開始日時：2024/01/01", "手合割：平手", "先手：A", "後手：B", "*対局前のコメント"]
        );
        assert!(extract_header("▲７六歩\n").is_empty());
    }
}
