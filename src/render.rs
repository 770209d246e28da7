use std::fmt;

use crate::{BLACK_NIL, Bloodwood, NodeColor, NodeIndex};

/// Level-by-level rendering: one line per depth, nodes at that depth joined
/// by `"; "`, each rendered as `key(B)` or `key(R)`. The empty tree renders
/// as the empty string.
impl<K: fmt::Display + PartialEq + Ord> fmt::Display for Bloodwood<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut levels: Vec<Vec<String>> = vec![Vec::new(); self.height()];
        self.collect_level(self.root_idx(), 0, &mut levels);

        let lines: Vec<String> = levels.iter().map(|level| level.join("; ")).collect();
        f.write_str(&lines.join("\n"))
    }
}

impl<K: fmt::Display + PartialEq + Ord> Bloodwood<K> {
    fn collect_level(&self, idx: NodeIndex, depth: usize, levels: &mut [Vec<String>]) {
        if idx == BLACK_NIL {
            return;
        }

        let node = self.get_node_by_idx(idx);
        let tag = match node.color() {
            NodeColor::Black => 'B',
            NodeColor::Red => 'R',
        };
        levels[depth].push(format!("{}({})", node.key(), tag));

        self.collect_level(node.left_child(), depth + 1, levels);
        self.collect_level(node.right_child(), depth + 1, levels);
    }
}
