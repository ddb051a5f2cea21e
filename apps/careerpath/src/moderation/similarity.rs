use std::collections::HashSet;

/// Jaccard similarity of the whitespace-separated token sets of `a` and `b`.
///
/// Returns a value in `[0, 1]`. Two texts with no tokens at all score `0.0`:
/// there is nothing to compare. Comparison is case-sensitive; callers fold
/// case first when they want otherwise.
pub fn similarity(a: &str, b: &str) -> f64 {
    let left: HashSet<&str> = a.split_whitespace().collect();
    let right: HashSet<&str> = b.split_whitespace().collect();

    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = left.intersection(&right).count();
    intersection as f64 / union as f64
}
