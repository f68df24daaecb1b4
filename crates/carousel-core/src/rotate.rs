use crate::hash::hash32;

/// Left-rotates `items` by a seed-derived offset, preserving relative order.
///
/// The offset is `hash32("{seed}::{tag}") % len`, so the same seed and tag
/// always produce the same rotation while different tags (or reset indices
/// folded into the seed) surface different window starts without
/// re-ranking. Empty and single-element sequences are returned unchanged.
pub fn rotate_by_seed<T>(items: Vec<T>, seed: &str, tag: &str) -> Vec<T> {
    if items.len() < 2 {
        return items;
    }

    let offset = hash32(&format!("{seed}::{tag}")) as usize % items.len();
    if offset == 0 {
        return items;
    }

    let mut rotated = items;
    rotated.rotate_left(offset);
    rotated
}
