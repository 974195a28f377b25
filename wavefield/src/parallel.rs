//! Data-parallel slab primitive for grid sweeps.
//!
//! A sweep writes a whole output buffer while reading only shared state, so
//! the buffer can be split into contiguous slabs and processed on the compute
//! pool with no synchronization beyond the final join. With a single slab (or
//! a single-threaded pool) this degenerates to the sequential loop; callers
//! never rely on parallelism for correctness.

use bevy::tasks::{ComputeTaskPool, TaskPool};

/// Runs `op` on consecutive `slab_len`-sized chunks of `data`, one pool task
/// per slab. `op` receives the slab index and the mutable slab slice. Returns
/// only after every slab completed.
pub fn for_each_slab<T, F>(data: &mut [T], slab_len: usize, op: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if data.is_empty() || slab_len == 0 {
        return;
    }

    let pool = ComputeTaskPool::get_or_init(TaskPool::default);
    let op = &op;
    pool.scope(|scope| {
        for (slab_index, slab) in data.chunks_mut(slab_len).enumerate() {
            scope.spawn(async move {
                op(slab_index, slab);
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slabs_cover_the_whole_buffer() {
        let mut data = vec![0usize; 100];
        for_each_slab(&mut data, 7, |slab_index, slab| {
            for (i, value) in slab.iter_mut().enumerate() {
                *value = slab_index * 7 + i;
            }
        });
        for (i, value) in data.iter().enumerate() {
            assert_eq!(*value, i);
        }
    }

    #[test]
    fn test_matches_sequential_result() {
        let input: Vec<f32> = (0..64).map(|i| i as f32).collect();

        let mut parallel_out = vec![0.0f32; 64];
        for_each_slab(&mut parallel_out, 16, |slab_index, slab| {
            let base = slab_index * 16;
            for (i, out) in slab.iter_mut().enumerate() {
                *out = input[base + i] * 2.0 + 1.0;
            }
        });

        let sequential: Vec<f32> = input.iter().map(|v| v * 2.0 + 1.0).collect();
        assert_eq!(parallel_out, sequential);
    }

    #[test]
    fn test_empty_input_is_a_noop() {
        let mut data: Vec<u32> = Vec::new();
        for_each_slab(&mut data, 8, |_, _| panic!("no slabs expected"));
    }
}
