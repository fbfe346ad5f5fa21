//! Dot-segment version ordering.
//!
//! This is not SemVer precedence. Versions are split on `.`, the shorter one
//! is padded with `0` segments, and segments are compared pairwise: as
//! integers when both sides parse, as plain strings otherwise.

use std::cmp::Ordering;

use crate::source::Version;

/// Compare two optional versions. A missing version sorts below any present one.
pub fn compare_versions(a: Option<&Version>, b: Option<&Version>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare_version_str(a.as_str(), b.as_str()),
    }
}

/// Compare two version strings segment by segment.
pub fn compare_version_str(a: &str, b: &str) -> Ordering {
    let a_parts: Vec<&str> = a.split('.').collect();
    let b_parts: Vec<&str> = b.split('.').collect();
    let len = a_parts.len().max(b_parts.len());

    for i in 0..len {
        let p1 = a_parts.get(i).copied().unwrap_or("0");
        let p2 = b_parts.get(i).copied().unwrap_or("0");

        let ord = match (p1.parse::<i64>(), p2.parse::<i64>()) {
            (Ok(n1), Ok(n2)) => n1.cmp(&n2),
            _ => p1.cmp(p2),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    Ordering::Equal
}
