//! Object churn through trait objects.
//!
//! Property reads and writes go through a `dyn` interface keyed by name, so
//! every access is an indirect call, and each object is cloned through the
//! same interface.

use std::hint::black_box;

pub trait DynamicObject {
    fn get(&self, property: &str) -> i64;
    fn set(&mut self, property: &str, value: i64);
    fn clone_boxed(&self) -> Box<dyn DynamicObject>;
}

#[derive(Clone, Debug)]
struct Intercepted {
    id: i64,
    val: String,
}

impl Intercepted {
    fn new(id: i64) -> Self {
        Self {
            id,
            val: "test".to_string(),
        }
    }
}

impl DynamicObject for Intercepted {
    // Every property reads as twice the hidden id.
    fn get(&self, _property: &str) -> i64 {
        self.id * 2
    }

    fn set(&mut self, _property: &str, value: i64) {
        self.val = value.to_string();
    }

    fn clone_boxed(&self) -> Box<dyn DynamicObject> {
        Box::new(self.clone())
    }
}

pub fn dynamic_dispatch(limit: u64) -> i64 {
    let mut checksum = 0i64;
    for i in 0..limit as i64 {
        let mut obj: Box<dyn DynamicObject> = Box::new(Intercepted::new(black_box(i)));
        obj.set("dynamic_prop", i);
        let cloned = obj.clone_boxed();
        checksum = checksum.wrapping_add(cloned.get("hidden_prop"));
    }
    checksum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_sum_of_doubled_ids() {
        assert_eq!(dynamic_dispatch(4), 12);
        assert_eq!(dynamic_dispatch(0), 0);
    }

    #[test]
    fn set_goes_through_the_interface() {
        let mut obj = Intercepted::new(7);
        DynamicObject::set(&mut obj, "anything", 42);
        assert_eq!(obj.val, "42");
        assert_eq!(obj.clone_boxed().get("x"), 14);
    }
}
