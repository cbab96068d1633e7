//! Run-scoped capture of incidental workload output.
//!
//! Workloads write diagnostic text with [`emit!`](crate::emit). While a run is
//! in progress that text lands in the run's buffer instead of the terminal;
//! outside a run it goes to stdout.

use std::cell::RefCell;
use std::fmt;
use std::io::Write;

/// Space reserved up front for a capture. Lines that fit never grow the
/// buffer, so a workload's memory reading does not include them.
pub const CAPTURE_CAPACITY: usize = 16 * 1024;

thread_local! {
    static BUFFERS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// An open capture. Text emitted on this thread is collected until
/// [`finish`](CaptureGuard::finish) is called; dropping the guard discards it.
#[must_use = "dropping the guard discards the captured text"]
pub struct CaptureGuard {
    depth: usize,
    finished: bool,
}

/// Starts capturing emitted text on the current thread.
pub fn begin() -> CaptureGuard {
    let depth = BUFFERS.with(|b| {
        let mut stack = b.borrow_mut();
        stack.push(String::with_capacity(CAPTURE_CAPACITY));
        stack.len()
    });
    CaptureGuard {
        depth,
        finished: false,
    }
}

impl CaptureGuard {
    /// Ends the capture and returns everything emitted since [`begin`].
    pub fn finish(mut self) -> String {
        self.finished = true;
        self.pop()
    }

    fn pop(&self) -> String {
        BUFFERS.with(|b| {
            let mut stack = b.borrow_mut();
            // Guards inside this one that were leaked still hold a slot.
            let mut out = String::new();
            while stack.len() >= self.depth {
                match stack.pop() {
                    Some(s) => out = s,
                    None => break,
                }
            }
            out
        })
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.pop();
        }
    }
}

/// Appends formatted text to the innermost capture, or stdout if none is open.
pub fn write_fmt(args: fmt::Arguments<'_>) {
    let captured = BUFFERS.with(|b| {
        let mut stack = b.borrow_mut();
        match stack.last_mut() {
            Some(buf) => {
                let _ = fmt::Write::write_fmt(buf, args);
                true
            }
            None => false,
        }
    });
    if !captured {
        let _ = std::io::stdout().lock().write_fmt(args);
    }
}

/// Writes a line of incidental output from inside a workload.
#[macro_export]
macro_rules! emit {
    ($($arg:tt)*) => {
        $crate::capture::write_fmt(format_args!("{}\n", format_args!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_emitted_lines() {
        let guard = begin();
        crate::emit!("first {}", 1);
        crate::emit!("second");
        assert_eq!(guard.finish(), "first 1\nsecond\n");
    }

    #[test]
    fn nested_captures_are_separate() {
        let outer = begin();
        crate::emit!("outer");
        let inner = begin();
        crate::emit!("inner");
        assert_eq!(inner.finish(), "inner\n");
        crate::emit!("outer again");
        assert_eq!(outer.finish(), "outer\nouter again\n");
    }

    #[test]
    fn short_lines_fit_the_reserved_buffer() {
        let guard = begin();
        let before = BUFFERS.with(|b| b.borrow().last().map(String::capacity));
        crate::emit!("memory workload capped at {} of {} slots", 131_073, 1_000_000);
        let after = BUFFERS.with(|b| b.borrow().last().map(String::capacity));
        assert_eq!(before, after);
        assert!(before.unwrap() >= CAPTURE_CAPACITY);
        drop(guard);
    }

    #[test]
    fn dropped_guard_discards_text() {
        {
            let _guard = begin();
            crate::emit!("lost");
        }
        let guard = begin();
        assert_eq!(guard.finish(), "");
    }
}
