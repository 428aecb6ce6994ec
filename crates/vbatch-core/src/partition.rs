//! Round-robin partitioning of the URL list into per-worker chunks.
//!
//! Item `i` goes to chunk `i % workers`, so chunk sizes differ by at most one
//! and each chunk keeps the relative order of the input.

/// Splits `items` into exactly `workers` chunks (a worker count of 0 is treated as 1).
/// Chunks may be empty when there are fewer items than workers.
pub fn round_robin<T: Clone>(items: &[T], workers: usize) -> Vec<Vec<T>> {
    let workers = workers.max(1);
    let per_chunk = items.len().div_ceil(workers);
    let mut chunks: Vec<Vec<T>> = (0..workers)
        .map(|_| Vec::with_capacity(per_chunk))
        .collect();
    for (i, item) in items.iter().enumerate() {
        chunks[i % workers].push(item.clone());
    }
    chunks
}
