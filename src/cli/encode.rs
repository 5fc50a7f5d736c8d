use std::fs;

use voxell_timer::time_fn;

use crate::{
    algorithms::huffman::{HuffmanCoding, encode_parts},
    cli::{CliError, EncodeArgs, Result, table_path_for},
    compressor::Compressor,
    config::HuffpackConfig,
};

pub fn encode(args: EncodeArgs, config: &HuffpackConfig) -> Result<()> {
    let input_path = &args.input_path;
    let output_path = &args.output_path;

    let input_data = fs::read(input_path).map_err(CliError::io(input_path))?;

    if args.raw {
        let (parts, comp_dur) = time_fn(|| encode_parts(&input_data));
        let parts = parts?;
        let table_path = table_path_for(output_path, &config.table_extension)?;
        fs::write(output_path, &parts.stream).map_err(CliError::io(output_path))?;
        fs::write(&table_path, &parts.table).map_err(CliError::io(&table_path))?;
        if_tracing! {{
            tracing::info!(target: "cli", event = "encode_complete", input = %input_path.display(), output = %output_path.display(), table = %table_path.display(), elapsed_us = %comp_dur.as_micros(), stream_len = parts.stream.len(), "raw encode finished");
        }}
    } else {
        let mut coding = HuffmanCoding::with_policy(config.termination);
        let (compressed_data, comp_dur) = time_fn(|| coding.compress_bytes(&input_data));
        fs::write(output_path, &compressed_data).map_err(CliError::io(output_path))?;
        if_tracing! {{
            tracing::info!(target: "cli", event = "encode_complete", input = %input_path.display(), output = %output_path.display(), elapsed_us = %comp_dur.as_micros(), compressed_len = compressed_data.len(), "encode finished");
        }}
    }

    Ok(())
}
