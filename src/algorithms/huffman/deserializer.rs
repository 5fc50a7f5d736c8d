use std::io;

use thiserror::Error;

use crate::{
    algorithms::huffman::node::{HuffmanTree, Node},
    lines::LineSource,
};

if_tracing! {
    use tracing::{debug, warn};
}

/// A code table that does not describe a valid prefix-code tree.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("line {line}: symbol line has no matching code line")]
    MissingCode { line: usize },

    #[error("line {line}: expected a decimal symbol, found {text:?}")]
    InvalidSymbol { line: usize, text: String },

    #[error("line {line}: symbol {value} is outside 0..=255")]
    SymbolOutOfRange { line: usize, value: u64 },

    #[error("line {line}: code contains {found:?}, only '0' and '1' are allowed")]
    InvalidCodeChar { line: usize, found: char },

    #[error("line {line}: code {code:?} collides with another code")]
    PrefixConflict { line: usize, code: String },

    #[error("line {line}: symbol {symbol} appears more than once")]
    DuplicateSymbol { line: usize, symbol: u8 },

    #[error("line {line}: code is {len} characters long, at most 255 are possible")]
    CodeTooLong { line: usize, len: usize },

    #[error("branch at {code:?} is missing a child")]
    IncompleteBranch { code: String },

    #[error("I/O error while reading code table: {0}")]
    Io(#[from] io::Error),
}

/// A full tree over 256 symbols is at most this deep.
pub const MAX_CODE_LEN: usize = 255;

/// Arena slot for a node under construction. Children always sit at higher indices than their parent.
#[derive(Debug)]
enum Slot {
    Leaf(u8),
    Branch { left: Option<usize>, right: Option<usize> },
}

/// Rebuilds a tree from (symbol line, code line) pairs.
pub struct TreeDeserializer {
    slots: Vec<Slot>,
    /// Parent index and branch bit of every slot but the root.
    parents: Vec<(usize, bool)>,
    seen: [bool; 256],
}

impl TreeDeserializer {
    /// Reads pairs until the source is exhausted.
    ///
    /// # Errors
    ///
    /// Any [`FormatError`]. Nothing built before the failure is returned.
    pub fn read<S: LineSource + ?Sized>(source: &mut S) -> Result<HuffmanTree, FormatError> {
        let mut this = Self {
            slots: Vec::new(),
            parents: Vec::new(),
            seen: [false; 256],
        };
        let mut line = 0usize;
        let mut pairs = 0usize;

        while let Some(symbol_line) = source.next_line()? {
            line += 1;
            let symbol = parse_symbol(&symbol_line, line)?;
            if this.seen[symbol as usize] {
                return Err(FormatError::DuplicateSymbol { line, symbol });
            }
            let Some(code_line) = source.next_line()? else {
                return Err(FormatError::MissingCode { line });
            };
            line += 1;
            if code_line.len() > MAX_CODE_LEN {
                return Err(FormatError::CodeTooLong {
                    line,
                    len: code_line.len(),
                });
            }
            this.insert(symbol, &code_line, line)?;
            pairs += 1;
        }

        let tree = this.finish()?;
        if_tracing! {{
            debug!(target: "huffman", pairs, leaves = tree.leaf_count(), "code table read");
        }}
        Ok(tree)
    }

    pub fn read_str(table: &str) -> Result<HuffmanTree, FormatError> {
        Self::read(&mut table.as_bytes())
    }

    fn insert(&mut self, symbol: u8, code: &str, line: usize) -> Result<(), FormatError> {
        let conflict = || FormatError::PrefixConflict {
            line,
            code: code.to_string(),
        };

        if self.slots.is_empty() {
            if code.is_empty() {
                self.slots.push(Slot::Leaf(symbol));
                self.seen[symbol as usize] = true;
                return Ok(());
            }
            self.slots.push(Slot::Branch { left: None, right: None });
        } else if code.is_empty() {
            return Err(conflict());
        }

        let mut current = 0usize;
        let mut chars = code.chars().peekable();
        while let Some(c) = chars.next() {
            let bit = match c {
                '0' => false,
                '1' => true,
                found => return Err(FormatError::InvalidCodeChar { line, found }),
            };
            let last = chars.peek().is_none();
            let next_index = self.slots.len();
            let child = match &mut self.slots[current] {
                Slot::Leaf(_) => return Err(conflict()),
                Slot::Branch { left, right } => {
                    if bit {
                        right
                    } else {
                        left
                    }
                }
            };
            let existing = *child;
            match existing {
                // anything already here is either a leaf or a branch with descendants
                Some(_) if last => return Err(conflict()),
                Some(index) => current = index,
                None => {
                    *child = Some(next_index);
                    self.parents.push((current, bit));
                    current = next_index;
                    self.slots.push(if last {
                        Slot::Leaf(symbol)
                    } else {
                        Slot::Branch { left: None, right: None }
                    });
                }
            }
        }

        self.seen[symbol as usize] = true;
        Ok(())
    }

    /// Converts the arena into owned nodes, children first.
    fn finish(self) -> Result<HuffmanTree, FormatError> {
        if self.slots.is_empty() {
            return Ok(HuffmanTree::empty());
        }
        let mut built: Vec<Option<Node>> = Vec::with_capacity(self.slots.len());
        built.resize_with(self.slots.len(), || None);

        for index in (0..self.slots.len()).rev() {
            let node = match self.slots[index] {
                Slot::Leaf(symbol) => Node::leaf(symbol, 0),
                Slot::Branch {
                    left: Some(left),
                    right: Some(right),
                } => match (built[left].take(), built[right].take()) {
                    (Some(left), Some(right)) => Node::merge(left, right),
                    _ => unreachable!("children are built before their parent"),
                },
                Slot::Branch { .. } => {
                    let code = self.path_to(index);
                    if_tracing! {{
                        warn!(target: "huffman", code = %code, "code table leaves a branch incomplete");
                    }}
                    return Err(FormatError::IncompleteBranch { code });
                }
            };
            built[index] = Some(node);
        }

        Ok(built.swap_remove(0).map_or_else(HuffmanTree::empty, HuffmanTree::from_root))
    }

    /// Code string leading to the slot at `target`. Only used for error reporting.
    fn path_to(&self, target: usize) -> String {
        let mut path = Vec::new();
        let mut current = target;
        while current != 0 {
            let (parent, bit) = self.parents[current - 1];
            path.push(if bit { '1' } else { '0' });
            current = parent;
        }
        path.iter().rev().collect()
    }
}

fn parse_symbol(text: &str, line: usize) -> Result<u8, FormatError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatError::InvalidSymbol {
            line,
            text: text.to_string(),
        });
    }
    let value: u64 = text.parse().map_err(|_| FormatError::SymbolOutOfRange { line, value: u64::MAX })?;
    u8::try_from(value).map_err(|_| FormatError::SymbolOutOfRange { line, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::huffman::{
        builder::{FrequencyTable, TreeBuilder},
        serializer::TreeSerializer,
    };

    fn sorted_codes(tree: &HuffmanTree) -> Vec<(u8, Vec<bool>)> {
        let mut codes = tree.codes();
        codes.sort();
        codes
    }

    #[test]
    fn reads_documented_example() {
        let tree = TreeDeserializer::read_str("97\n0\n98\n10\n99\n11\n").unwrap();
        assert_eq!(
            tree.codes(),
            vec![(97, vec![false]), (98, vec![true, false]), (99, vec![true, true])]
        );
    }

    #[test]
    fn pair_order_does_not_matter() {
        let a = TreeDeserializer::read_str("99\n11\n97\n0\n98\n10\n").unwrap();
        let b = TreeDeserializer::read_str("97\n0\n98\n10\n99\n11\n").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn round_trips_built_trees() {
        let inputs: [&[u8]; 4] = [
            b"abracadabra",
            b"mississippi river banks",
            &[0, 1, 2, 3, 255, 255, 128, 0, 0],
            b"q",
        ];
        for input in inputs {
            let built = TreeBuilder::build(&FrequencyTable::from_bytes(input));
            let table = TreeSerializer::to_string(&built);
            let rebuilt = TreeDeserializer::read_str(&table).unwrap();
            assert_eq!(sorted_codes(&rebuilt), sorted_codes(&built));
        }
    }

    #[test]
    fn empty_code_first_is_single_leaf() {
        let tree = TreeDeserializer::read_str("65\n\n").unwrap();
        assert_eq!(tree.root(), Some(&Node::leaf(65, 0)));
    }

    #[test]
    fn empty_input_is_empty_tree() {
        assert!(TreeDeserializer::read_str("").unwrap().is_empty());
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let tree = TreeDeserializer::read_str("1\r\n0\r\n2\r\n1\r\n").unwrap();
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn odd_line_count_is_rejected() {
        let err = TreeDeserializer::read_str("97\n0\n98\n").unwrap_err();
        assert!(matches!(err, FormatError::MissingCode { line: 3 }));
    }

    #[test]
    fn non_numeric_symbol_is_rejected() {
        let err = TreeDeserializer::read_str("a\n0\n").unwrap_err();
        assert!(matches!(err, FormatError::InvalidSymbol { line: 1, .. }));
        let err = TreeDeserializer::read_str("-1\n0\n").unwrap_err();
        assert!(matches!(err, FormatError::InvalidSymbol { .. }));
    }

    #[test]
    fn out_of_range_symbol_is_rejected() {
        let err = TreeDeserializer::read_str("256\n0\n").unwrap_err();
        assert!(matches!(err, FormatError::SymbolOutOfRange { line: 1, value: 256 }));
    }

    #[test]
    fn invalid_code_character_is_rejected() {
        let err = TreeDeserializer::read_str("97\n0\n98\n12\n").unwrap_err();
        assert!(matches!(err, FormatError::InvalidCodeChar { line: 4, found: '2' }));
    }

    #[test]
    fn colliding_codes_are_rejected() {
        // same code twice
        let err = TreeDeserializer::read_str("97\n0\n98\n0\n").unwrap_err();
        assert!(matches!(err, FormatError::PrefixConflict { line: 4, .. }));
        // path runs through an existing leaf
        let err = TreeDeserializer::read_str("97\n0\n98\n01\n").unwrap_err();
        assert!(matches!(err, FormatError::PrefixConflict { .. }));
        // leaf would replace a branch that already has children
        let err = TreeDeserializer::read_str("97\n01\n98\n0\n").unwrap_err();
        assert!(matches!(err, FormatError::PrefixConflict { .. }));
        // empty code after other pairs
        let err = TreeDeserializer::read_str("97\n0\n98\n\n").unwrap_err();
        assert!(matches!(err, FormatError::PrefixConflict { .. }));
    }

    #[test]
    fn duplicate_symbol_is_rejected() {
        let err = TreeDeserializer::read_str("97\n0\n97\n1\n").unwrap_err();
        assert!(matches!(err, FormatError::DuplicateSymbol { line: 3, symbol: 97 }));
    }

    #[test]
    fn duplicate_symbol_is_reported_before_its_code_is_read() {
        let err = TreeDeserializer::read_str("97\n0\n98\n10\n97\n").unwrap_err();
        assert_eq!(err.to_string(), "line 5: symbol 97 appears more than once");
    }

    #[test]
    fn overlong_code_is_rejected() {
        let table = format!("97\n{}\n", "0".repeat(MAX_CODE_LEN + 1));
        let err = TreeDeserializer::read_str(&table).unwrap_err();
        assert!(matches!(err, FormatError::CodeTooLong { line: 2, len: 256 }));

        let table = format!("97\n{}\n", "0".repeat(1 << 20));
        assert!(matches!(TreeDeserializer::read_str(&table), Err(FormatError::CodeTooLong { .. })));
    }

    #[test]
    fn deepest_incomplete_branch_is_named() {
        let table = format!("97\n{}\n", "0".repeat(MAX_CODE_LEN));
        match TreeDeserializer::read_str(&table).unwrap_err() {
            FormatError::IncompleteBranch { code } => assert_eq!(code, "0".repeat(MAX_CODE_LEN - 1)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unreadable_source_is_io_error() {
        let err = TreeDeserializer::read(&mut &b"97\n\xff\n"[..]).unwrap_err();
        match err {
            FormatError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::InvalidData),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn incomplete_tree_is_rejected() {
        let err = TreeDeserializer::read_str("97\n0\n98\n10\n").unwrap_err();
        match err {
            FormatError::IncompleteBranch { code } => assert_eq!(code, "1"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
