//! File I/O workloads. Each call works in its own temporary directory, which
//! is removed before the workload returns.

use std::fs::{self, OpenOptions};
use std::hint::black_box;
use std::io::{self, Write};

use tempfile::TempDir;

/// 5,000 bytes: `"1234567890"` repeated 500 times.
fn block() -> String {
    "1234567890".repeat(500)
}

/// Appends one block per iteration, returning the final file size.
pub fn file_write(limit: u64) -> io::Result<u64> {
    let dir = TempDir::new()?;
    let path = dir.path().join("bench_io_write.txt");
    let data = block();

    for _ in 0..limit {
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(data.as_bytes())?;
    }

    let size = match fs::metadata(&path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
        Err(e) => return Err(e),
    };
    Ok(size)
}

/// Reads a 100,000-byte file back once per iteration.
pub fn file_read(limit: u64) -> io::Result<String> {
    let dir = TempDir::new()?;
    let path = dir.path().join("bench_io_read.txt");
    fs::write(&path, block().repeat(20))?;

    let mut content = String::new();
    for _ in 0..limit {
        content = fs::read_to_string(black_box(&path))?;
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_appends_blocks() {
        assert_eq!(file_write(3).unwrap(), 15_000);
        assert_eq!(file_write(0).unwrap(), 0);
    }

    #[test]
    fn read_returns_whole_file() {
        let content = file_read(2).unwrap();
        assert_eq!(content.len(), 100_000);
        assert!(content.starts_with("1234567890"));
        assert!(file_read(0).unwrap().is_empty());
    }
}
