use core::fmt;

use crate::algorithms::huffman::builder::FrequencyTable;

/// A path from the root to a leaf. `false` is a left branch (`'0'`), `true` is a right branch (`'1'`).
pub type Code = Vec<bool>;

/// A node of the prefix-code tree.
///
/// The weight is only meaningful while the tree is being built. Trees rebuilt
/// from a code table carry a weight of zero everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf { symbol: u8, weight: u64 },
    Internal { weight: u64, left: Box<Node>, right: Box<Node> },
}

impl Node {
    pub const fn leaf(symbol: u8, weight: u64) -> Self {
        Node::Leaf { symbol, weight }
    }

    /// Takes ownership of two subtrees and joins them under a new internal node.
    /// `left` ends up on the `0` branch.
    pub fn merge(left: Node, right: Node) -> Self {
        let weight = left.weight().saturating_add(right.weight());
        Node::Internal {
            weight,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub const fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub const fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    pub const fn symbol(&self) -> Option<u8> {
        match self {
            Node::Leaf { symbol, .. } => Some(*symbol),
            Node::Internal { .. } => None,
        }
    }

    /// The child selected by `bit`, or `None` for a leaf.
    pub fn child(&self, bit: bool) -> Option<&Node> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { left, right, .. } => Some(if bit { &**right } else { &**left }),
        }
    }
}

/// An owned prefix-code tree. Either empty, a single leaf, or a full binary tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Option<Node>,
}

impl HuffmanTree {
    pub const fn empty() -> Self {
        Self { root: None }
    }

    pub const fn from_root(root: Node) -> Self {
        Self { root: Some(root) }
    }

    pub const fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn leaf_count(&self) -> usize {
        self.walk_leaves().count()
    }

    /// Every leaf with its code, in left-first pre-order.
    ///
    /// A tree made of a single leaf yields that leaf with an empty code.
    pub fn codes(&self) -> Vec<(u8, Code)> {
        self.walk_leaves().collect()
    }

    /// Length of the longest code in the tree.
    pub fn depth(&self) -> usize {
        self.walk_leaves().map(|(_, code)| code.len()).max().unwrap_or(0)
    }

    /// Sum over every leaf of `frequency * code length`.
    pub fn weighted_length(&self, frequencies: &FrequencyTable) -> u64 {
        self.walk_leaves()
            .map(|(symbol, code)| frequencies.get(symbol) * code.len() as u64)
            .sum()
    }

    fn walk_leaves(&self) -> LeafWalk<'_> {
        LeafWalk {
            stack: self.root.iter().map(|root| (root, Vec::new())).collect(),
        }
    }
}

/// Explicit-stack pre-order walk; tree depth never touches the call stack.
struct LeafWalk<'t> {
    stack: Vec<(&'t Node, Code)>,
}

impl Iterator for LeafWalk<'_> {
    type Item = (u8, Code);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, code)) = self.stack.pop() {
            match node {
                Node::Leaf { symbol, .. } => return Some((*symbol, code)),
                Node::Internal { left, right, .. } => {
                    let mut right_code = code.clone();
                    right_code.push(true);
                    let mut left_code = code;
                    left_code.push(false);
                    // right first so the left subtree pops first
                    self.stack.push((&**right, right_code));
                    self.stack.push((&**left, left_code));
                }
            }
        }
        None
    }
}

/// Renders a code as the `'0'`/`'1'` string used by the code table.
pub fn code_string(code: &[bool]) -> String {
    code.iter().map(|&bit| if bit { '1' } else { '0' }).collect()
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("<empty tree>");
        }
        for (symbol, code) in self.codes() {
            let shown = if symbol.is_ascii_graphic() { symbol as char } else { '.' };
            writeln!(f, "{symbol:>3} '{shown}' {}", code_string(&code))?;
        }
        Ok(())
    }
}
