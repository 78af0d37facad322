//! 展開木のKI2テキスト化
//!
//! 各局面の最初の子を本線として深さ優先で書き、残りの子をその後に
//! `変化：N手` ブロックとして書く。深い分岐ほど先に出る。

use crate::types::Color;

use super::expand::BranchNode;

/// 指し手の区切り
const MOVE_SEPARATOR: &str = "    ";

struct Ki2Writer {
    start: Color,
    moves_per_line: usize,
    lines: Vec<String>,
    current: Vec<String>,
}

impl Ki2Writer {
    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(self.current.join(MOVE_SEPARATOR));
            self.current.clear();
        }
    }

    fn glyph(&self, ply: u32) -> char {
        if ply % 2 == 1 {
            self.start.glyph()
        } else {
            (!self.start).glyph()
        }
    }

    fn push_move(&mut self, node: &BranchNode) {
        self.current.push(format!("{}{}", self.glyph(node.ply), node.notation));
        if !node.comments.is_empty() {
            self.flush();
            self.lines
                .extend(node.comments.iter().map(|c| format!("*{c}")));
        } else if self.current.len() >= self.moves_per_line {
            self.flush();
        }
    }

    fn write_siblings(&mut self, nodes: &[BranchNode]) {
        let Some((first, rest)) = nodes.split_first() else {
            return;
        };
        self.push_move(first);
        self.write_siblings(&first.children);

        for alt in rest {
            self.flush();
            self.lines.push(String::new());
            self.lines.push(format!("変化：{}手", alt.ply));
            self.push_move(alt);
            self.write_siblings(&alt.children);
        }
    }
}

/// 展開木をKI2の指し手部分にする
///
/// `start` は開始局面の手番。`moves_per_line` 手ごとに改行する。
pub fn write_ki2(tree: &[BranchNode], start: Color, moves_per_line: usize) -> String {
    let mut writer = Ki2Writer {
        start,
        moves_per_line: moves_per_line.max(1),
        lines: Vec::new(),
        current: Vec::new(),
    };
    writer.write_siblings(tree);
    writer.flush();

    let mut text = writer.lines.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Move;

    fn node(ply: u32, usi: &str, notation: &str, children: Vec<BranchNode>) -> BranchNode {
        BranchNode {
            ply,
            usi: usi.to_string(),
            mv: Move::from_usi(usi).unwrap(),
            notation: notation.to_string(),
            comments: Vec::new(),
            children,
        }
    }

    #[test]
    fn test_write_main_line_wraps() {
        let tree = vec![node(
            1,
            "7g7f",
            "７六歩",
            vec![node(2, "3c3d", "３四歩", vec![node(3, "8h2b+", "２二角成", vec![])])],
        )];
        assert_eq!(write_ki2(&tree, Color::Black, 6), "▲７六歩    △３四歩    ▲２二角成\n");
        assert_eq!(write_ki2(&tree, Color::Black, 2), "▲７六歩    △３四歩\n▲２二角成\n");
        assert_eq!(write_ki2(&tree, Color::White, 6), "△７六歩    ▲３四歩    △２二角成\n");
    }

    #[test]
    fn test_write_variations_deepest_first() {
        let tree = vec![
            node(
                1,
                "7g7f",
                "７六歩",
                vec![
                    node(2, "3c3d", "３四歩", vec![]),
                    node(2, "8c8d", "８四歩", vec![]),
                ],
            ),
            node(1, "2g2f", "２六歩", vec![]),
        ];
        let text = write_ki2(&tree, Color::Black, 6);
        assert_eq!(
            text,
            "▲７六歩    △３四歩\n\n変化：2手\n△８四歩\n\n変化：1手\n▲２六歩\n"
        );
    }

    #[test]
    fn test_write_comments() {
        let mut first = node(1, "7g7f", "７六歩", vec![node(2, "3c3d", "３四歩", vec![])]);
        first.comments = vec!["角道を開ける".to_string()];
        let text = write_ki2(&[first], Color::Black, 6);
        assert_eq!(text, "▲７六歩\n*角道を開ける\n△３四歩\n");
        assert_eq!(write_ki2(&[], Color::Black, 6), "");
    }
}
