use std::{fs, path::Path, time::Duration};

use voxell_timer::time_fn;

use crate::{
    algorithms::huffman::HuffmanCoding,
    cli::{CliError, Result, TestArgs},
    compressor::Compressor,
    config::HuffpackConfig,
};

pub fn test(args: TestArgs, config: &HuffpackConfig) -> Result<()> {
    let mut coding = HuffmanCoding::with_policy(config.termination);
    let total = args.input_paths.len();
    let mut failed = 0;

    for path in &args.input_paths {
        let input = fs::read(path).map_err(CliError::io(path))?;
        let (result, elapsed) = time_fn(|| coding.test_roundtrip(&input));

        let passed = match &result {
            Ok(rt) => {
                print_report(path, rt.is_successful(), input.len(), rt.get_compressed().len(), rt.ratio(), elapsed, None);
                rt.is_successful()
            }
            Err(e) => {
                print_report(path, false, input.len(), 0, 0.0, elapsed, Some(e));
                false
            }
        };
        if_tracing! {{
            tracing::debug!(target: "cli", path = %path.display(), passed, elapsed_us = %elapsed.as_micros(), "roundtrip checked");
        }}
        if !passed {
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(CliError::RoundTripFailed { failed, total });
    }
    Ok(())
}

fn print_report(path: &Path, passed: bool, original_size: usize, compressed_size: usize, ratio: f64, elapsed: Duration, error: Option<&anyhow::Error>) {
    let passed_string = if passed { "PASSED" } else { "FAILED" };
    let bytes_saved = original_size as i64 - compressed_size as i64;
    eprintln!(
        "======== {} {} ========\n\toriginal: {} bytes\n\tcompressed: {} bytes\n\tratio: {:.1}% (compressed/original)\n\tsaved: {:+} bytes\n\ttime: {} us{}",
        passed_string,
        path.display(),
        original_size,
        compressed_size,
        ratio * 100.0,
        bytes_saved,
        elapsed.as_micros(),
        match error {
            Some(e) => format!("\n\terror: {e:#}"),
            None => String::new(),
        }
    );
}
