//! String manipulation and serialization workloads.

use std::hint::black_box;
use std::io;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::seq::SliceRandom;
use regex::Regex;
use serde::{Deserialize, Serialize};

const SENTENCE: &str = "The quick brown fox jumps over the lazy dog";

fn compile(pattern: &str) -> io::Result<Regex> {
    Regex::new(pattern).map_err(io::Error::other)
}

pub fn manipulation(limit: u64) -> io::Result<String> {
    let alternation = compile("(quick|lazy)")?;
    let vowels = compile("(?i)[aeiou]")?;
    let whitespace = compile(r"\s+")?;

    let mut rng = rand::thread_rng();
    let mut chars: Vec<char> = SENTENCE.chars().collect();
    let mut s = String::new();

    for _ in 0..limit {
        chars.shuffle(&mut rng);
        s = chars.iter().collect();
        let upper = s.to_uppercase();
        let reversed: String = upper.chars().rev().collect();

        black_box(SENTENCE.find("fox"));
        black_box(&SENTENCE[5..15]);
        black_box(SENTENCE.replace(' ', ""));
        black_box(format!("{SENTENCE:.^60}"));
        black_box(format!("  {SENTENCE}  ").trim().len());

        let parts: Vec<&str> = SENTENCE.split(' ').collect();
        black_box(parts.join("-"));

        black_box(format!("{:x}", md5::compute(reversed.as_bytes())));
        black_box(STANDARD.encode(SENTENCE));

        black_box(alternation.is_match(SENTENCE));
        black_box(vowels.replace_all(SENTENCE, "*"));
        black_box(whitespace.split(SENTENCE).count());
    }
    Ok(s)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Payload {
    test: i64,
    array: Vec<i64>,
    text: String,
}

/// JSON encode/decode plus a binary `bincode` round trip per iteration.
pub fn serialization(limit: u64) -> io::Result<Vec<u8>> {
    let data = Payload {
        test: 123,
        array: vec![1, 2, 3],
        text: "lorem ipsum".to_string(),
    };

    let mut s = Vec::new();
    for _ in 0..limit {
        let j = serde_json::to_string(&data)?;
        black_box(serde_json::from_str::<Payload>(&j)?);
        s = bincode::serialize(&data).map_err(io::Error::other)?;
        black_box(bincode::deserialize::<Payload>(&s).map_err(io::Error::other)?);
    }
    Ok(s)
}
