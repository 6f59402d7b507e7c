//! Parallel processing utilities.

use rayon::prelude::*;

/// Multiplier for number of chunks relative to worker threads.
/// Using 2x threads provides good load balancing when some chunks finish faster.
const CHUNKS_PER_THREAD: usize = 2;

/// Number of z-slices per chunk for parallel per-slice work.
///
/// Splits `depth` into roughly `threads * 2` chunks of the current rayon pool,
/// with a minimum of 1 slice per chunk.
#[inline]
pub fn slices_per_chunk(depth: usize) -> usize {
    let num_chunks = rayon::current_num_threads() * CHUNKS_PER_THREAD;
    (depth / num_chunks).max(1)
}

/// Apply a function to each index in parallel, writing the slice in place.
///
/// Chunks are disjoint, so every element is written by exactly one worker.
pub fn parallel_chunked<T, F>(data: &mut [T], f: F)
where
    T: Send + Sync,
    F: Fn(usize) -> T + Sync + Send,
{
    if data.is_empty() {
        return;
    }

    let num_chunks = rayon::current_num_threads() * CHUNKS_PER_THREAD;
    let chunk_size = (data.len() / num_chunks).max(1);

    data.par_chunks_mut(chunk_size)
        .enumerate()
        .for_each(|(chunk_idx, chunk)| {
            let start_idx = chunk_idx * chunk_size;
            for (i, val) in chunk.iter_mut().enumerate() {
                *val = f(start_idx + i);
            }
        });
}
