use std::fs;

use voxell_timer::time_fn;

use crate::{
    algorithms::huffman::{HuffmanCoding, decode_parts},
    cli::{CliError, DecodeArgs, Result, table_path_for},
    compressor::Compressor,
    config::HuffpackConfig,
};

pub fn decode(args: DecodeArgs, config: &HuffpackConfig) -> Result<()> {
    let input_path = &args.input_path;
    let output_path = &args.output_path;

    let compressed_data = fs::read(input_path).map_err(CliError::io(input_path))?;

    let (decompressed_data, decomp_dur) = if args.raw {
        let table_path = match args.table {
            Some(path) => path,
            None => table_path_for(input_path, &config.table_extension)?,
        };
        let table = fs::read(&table_path).map_err(CliError::io(&table_path))?;
        let (res, d) = time_fn(|| decode_parts(&table, &compressed_data, config.termination));
        (res.map_err(|e| CliError::Decompression(e.into()))?, d)
    } else {
        let mut coding = HuffmanCoding::with_policy(config.termination);
        let (res, d) = time_fn(|| coding.decompress_bytes(&compressed_data));
        (res.map_err(CliError::Decompression)?, d)
    };

    if_tracing! {{
        tracing::info!(target: "cli", event = "decode_complete", input = %input_path.display(), output = %output_path.display(), elapsed_us = %decomp_dur.as_micros(), decompressed_len = decompressed_data.len(), "decode finished");
    }}
    fs::write(output_path, decompressed_data).map_err(CliError::io(output_path))
}
