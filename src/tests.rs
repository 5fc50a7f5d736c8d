use std::{collections::VecDeque, io};

use voxell_rng::rng::XorShift128;

use crate::{
    bits::{BitSink, BitSource},
    compressor::Compressor,
};

const SHORT_DATA: &[u8] = b"Hello, World!";
const LONG_DATA: &[u8] =
    b"This is a longer string to test the huffman coder. It should be able to handle various lengths and characters.";
const RNG_DATA: &[u8] = &const {
    let mut arr = [0u8; 1000];
    let mut rng = XorShift128::new(0xdeadcafe);
    let mut i = 0;
    while i < 1000 {
        let data = rng.peek_next_u64();
        arr[i] = (data & 0xFF) as u8;
        rng = XorShift128::new(data);
        i += 1;
    }
    arr
};
const ALL_BYTES_DATA: &[u8] = &const {
    let mut arr = [0u8; 512];
    let mut i = 0;
    while i < 512 {
        arr[i] = (i % 256) as u8;
        i += 1;
    }
    arr
};
const REPEATING_DATA: &[u8] = b"a baba da babble da dabble babble doo bee babble dabble dooble dee boo dooble daddle boo";
const SKEWED_DATA: &[u8] = b"eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeettttttttttaaaaaooi";
const SINGLE_SYMBOL_DATA: &[u8] = b"zzzzzzzzzzzzzzzz";
const ONE_BYTE_DATA: &[u8] = b"!";
const EMPTY_DATA: &[u8] = &[];

const TEST_CASES: &[(&[u8], &str)] = &[
    (REPEATING_DATA, "repeating data"),
    (SHORT_DATA, "short data"),
    (LONG_DATA, "long data"),
    (RNG_DATA, "rng data"),
    (ALL_BYTES_DATA, "all bytes data"),
    (SKEWED_DATA, "skewed data"),
    (SINGLE_SYMBOL_DATA, "single symbol data"),
    (ONE_BYTE_DATA, "one byte data"),
    (EMPTY_DATA, "empty data"),
];

pub fn roundtrip_test<C: Compressor>(mut compressor: C) {
    for &(test_case, test_name) in TEST_CASES {
        match compressor.test_roundtrip(test_case) {
            Ok(eq) => {
                eprintln!(
                    "Compression ratio for {} with {}: {:.2}%",
                    test_name,
                    compressor.compressor_name(),
                    eq.ratio() * 100.0
                );

                assert!(
                    eq.is_successful(),
                    "Roundtrip test for {} failed at {}:\n\tExpected: {:?}\n\tGot: {:?}\n\tCompressed: {:?}",
                    compressor.compressor_name(),
                    test_name,
                    eq.get_original(),
                    eq.get_decompressed(),
                    eq.get_compressed(),
                );
            }
            Err(e) => {
                panic!(
                    "Fatal error while trying to compress/decompress {} with {}: {}",
                    test_name,
                    compressor.compressor_name(),
                    e
                );
            }
        }
    }
}

impl BitSource for VecDeque<bool> {
    fn has_next_bit(&self) -> bool {
        !self.is_empty()
    }

    fn next_bit(&mut self) -> io::Result<bool> {
        self.pop_front().ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no bits left"))
    }
}

impl BitSink for Vec<bool> {
    fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.push(bit);
        Ok(())
    }
}
