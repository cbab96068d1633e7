//! Allocation churn: grow, punch holes, refill.

use crate::emit;
use crate::memory;

/// Extra heap the workload may take beyond its own starting point.
pub const MAX_RELATIVE_ALLOCATION: i64 = 30 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    Text(String),
    Record {
        id: usize,
        token: String,
        active: bool,
    },
}

/// Fills `limit` slots with 100-character strings, frees every other one and
/// refills the holes with small records.
///
/// Growth stops once the thread's live heap is [`MAX_RELATIVE_ALLOCATION`]
/// above where it started; that case is reported with [`emit!`].
pub fn allocation_churn(limit: u64) -> Vec<Option<Slot>> {
    let start = memory::live_bytes();
    let over_budget = || memory::live_bytes() - start > MAX_RELATIVE_ALLOCATION;

    let mut data: Vec<Option<Slot>> = Vec::new();
    for i in 0..limit {
        if over_budget() {
            emit!("memory workload capped at {} of {} slots", data.len(), limit);
            break;
        }
        let letter = char::from(b'A' + (i % 26) as u8);
        let mut text = letter.to_string().repeat(100);
        text.push_str(&i.to_string());
        data.push(Some(Slot::Text(text)));
    }

    let filled = data.len();
    for slot in data.iter_mut().step_by(2) {
        *slot = None;
    }

    for id in (0..filled).step_by(2) {
        if over_budget() {
            break;
        }
        data[id] = Some(Slot::Record {
            id,
            token: format!("{:x}", md5::compute(id.to_string())),
            active: true,
        });
    }
    data
}
