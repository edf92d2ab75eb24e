//! Process-wide unique object names.
//!
//! Legacy histograms are looked up by name, so callers creating many of them
//! need names that never collide, even across threads.

use std::sync::atomic::{AtomicUsize, Ordering};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// `"{prefix}{n}"` with `n` taken from a process-wide counter.
pub fn unique_name(prefix: &str) -> String {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}{n}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..250).map(|_| unique_name("Hist")).collect::<Vec<_>>()))
            .collect();
        let mut seen = HashSet::new();
        for h in handles {
            for name in h.join().unwrap() {
                assert!(name.starts_with("Hist"));
                assert!(seen.insert(name));
            }
        }
        assert_eq!(seen.len(), 1000);
    }
}
