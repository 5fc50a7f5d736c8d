use std::{
    fs::{self, File},
    io::{BufWriter, Write},
};

use crate::{
    algorithms::huffman::{CodeBook, FrequencyTable, TreeBuilder, TreeSerializer, node::code_string},
    cli::{CliError, CodesArgs, Result},
};

pub fn codes(args: CodesArgs) -> Result<()> {
    let input_path = &args.input_path;
    let data = fs::read(input_path).map_err(CliError::io(input_path))?;

    let frequencies = FrequencyTable::from_bytes(&data);
    let tree = TreeBuilder::build(&frequencies);
    let book = CodeBook::from_tree(&tree);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let stdout_err = |e: std::io::Error| CliError::Io {
        path: "<stdout>".into(),
        source: e,
    };
    if book.is_empty() {
        writeln!(out, "{} is empty, no codes assigned", input_path.display()).map_err(stdout_err)?;
    } else {
        writeln!(out, "{:>6}  {:>5}  {:>12}  code", "symbol", "char", "frequency").map_err(stdout_err)?;
    }
    for (symbol, count) in frequencies.iter_nonzero() {
        let shown = if symbol.is_ascii_graphic() {
            format!("'{}'", symbol as char)
        } else {
            format!("{symbol:#04x}")
        };
        let code = book.code(symbol).map(code_string).unwrap_or_default();
        writeln!(out, "{symbol:>6}  {shown:>5}  {count:>12}  {code}").map_err(stdout_err)?;
    }

    let bits = book.encoded_bits(&frequencies);
    let average = if data.is_empty() { 0.0 } else { bits as f64 / data.len() as f64 };
    writeln!(
        out,
        "{} symbols, {} distinct, {} bits encoded ({:.3} bits/symbol, longest code {})",
        data.len(),
        frequencies.distinct(),
        bits,
        average,
        tree.depth()
    )
    .map_err(stdout_err)?;

    if let Some(save_path) = &args.save {
        let file = File::create(save_path).map_err(CliError::io(save_path))?;
        let mut writer = BufWriter::new(file);
        TreeSerializer::write(&tree, &mut writer)
            .and_then(|()| writer.flush())
            .map_err(CliError::io(save_path))?;
        if_tracing! {{
            tracing::info!(target: "cli", event = "table_saved", path = %save_path.display(), leaves = tree.leaf_count(), "code table saved");
        }}
    }

    Ok(())
}
