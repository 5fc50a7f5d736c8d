use std::io;

use crate::{
    algorithms::huffman::node::{HuffmanTree, code_string},
    lines::LineSink,
};

/// Writes a tree as a code table: one symbol line and one code line per leaf.
pub struct TreeSerializer;

impl TreeSerializer {
    pub fn write<S: LineSink + ?Sized>(tree: &HuffmanTree, sink: &mut S) -> io::Result<()> {
        for (symbol, code) in tree.codes() {
            sink.write_line(&symbol.to_string())?;
            sink.write_line(&code_string(&code))?;
        }
        Ok(())
    }

    pub fn to_string(tree: &HuffmanTree) -> String {
        let mut buf = Vec::new();
        // writing into a Vec cannot fail
        let _ = Self::write(tree, &mut buf);
        // symbols are decimal digits and codes are 0/1
        String::from_utf8_lossy(&buf).into_owned()
    }
}
