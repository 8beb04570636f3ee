//! Pools for temporary CSR workspaces and scratch float buffers.
//!
//! Each thread sees its own buckets, so a pooled object is never handed to two
//! concurrent calls. Buckets are keyed by power-of-two capacity class: a
//! released object lands in the class its capacity fully covers, and an
//! acquire looks in the class that covers the request.

use crate::config::ArithConfig;
use crate::util::POOL_BUCKET_LIMIT;
use sparith_core::Csr;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::OnceLock;
use thread_local::ThreadLocal;

#[derive(Debug)]
struct Buckets<T> {
    classes: HashMap<u32, Vec<T>>,
}

impl<T> Default for Buckets<T> {
    fn default() -> Self {
        Self {
            classes: HashMap::new(),
        }
    }
}

impl<T> Buckets<T> {
    fn take(&mut self, class: u32) -> Option<T> {
        self.classes.get_mut(&class).and_then(Vec::pop)
    }

    fn put(&mut self, class: u32, item: T, limit: usize) -> bool {
        let bucket = self.classes.entry(class).or_default();
        if bucket.len() < limit {
            bucket.push(item);
            true
        } else {
            false
        }
    }

    fn len(&self) -> usize {
        self.classes.values().map(Vec::len).sum()
    }
}

/// Smallest class whose size covers `n`.
#[inline]
fn request_class(n: usize) -> u32 {
    n.max(1).next_power_of_two().trailing_zeros()
}

/// Largest class fully covered by a capacity of `n`.
#[inline]
fn capacity_class(n: usize) -> u32 {
    if n == 0 {
        0
    } else {
        usize::BITS - 1 - n.leading_zeros()
    }
}

/// Thread-local pools of CSR workspaces and `f64` scratch buffers.
#[derive(Debug)]
pub struct WorkspacePool {
    matrices: ThreadLocal<RefCell<Buckets<Csr<f64, i64>>>>,
    floats: ThreadLocal<RefCell<Buckets<Vec<f64>>>>,
    limit: usize,
}

impl Default for WorkspacePool {
    fn default() -> Self {
        Self::new(POOL_BUCKET_LIMIT)
    }
}

impl WorkspacePool {
    /// Pool keeping at most `limit` objects per size class and thread.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            matrices: ThreadLocal::new(),
            floats: ThreadLocal::new(),
            limit,
        }
    }

    /// Pool sized by [`ArithConfig::pool_bucket_limit`].
    #[must_use]
    pub fn from_config(config: &ArithConfig) -> Self {
        Self::new(config.pool_bucket_limit)
    }

    /// The process-wide pool used by the free arithmetic functions.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<WorkspacePool> = OnceLock::new();
        GLOBAL.get_or_init(Self::default)
    }

    /// An empty `rows x cols` CSR skeleton with room for `nnz` entries.
    ///
    /// With `clear` unset, recycled row pointers past the first may hold stale
    /// values until each row is sealed.
    #[must_use]
    pub fn acquire(&self, rows: usize, cols: usize, nnz: usize, clear: bool) -> Csr<f64, i64> {
        let cell = self.matrices.get_or(|| RefCell::new(Buckets::default()));
        let recycled = cell.borrow_mut().take(request_class(nnz));
        match recycled {
            Some(mut m) => {
                m.reuse_as(rows, cols, nnz, clear);
                m
            }
            None => Csr::with_capacity(rows, cols, nnz),
        }
    }

    /// Returns a workspace to the calling thread's pool.
    pub fn release(&self, m: Csr<f64, i64>) {
        let class = capacity_class(m.indices.capacity().min(m.data.capacity()));
        let cell = self.matrices.get_or(|| RefCell::new(Buckets::default()));
        cell.borrow_mut().put(class, m, self.limit);
    }

    /// A scratch buffer of exactly `len` elements; zero-filled when `clear`
    /// is set, otherwise holding whatever a previous user left behind.
    #[must_use]
    pub fn acquire_floats(&self, len: usize, clear: bool) -> Vec<f64> {
        let cell = self.floats.get_or(|| RefCell::new(Buckets::default()));
        let recycled = cell.borrow_mut().take(request_class(len));
        let mut buf = recycled.unwrap_or_else(|| Vec::with_capacity(len));
        if clear {
            buf.clear();
        }
        buf.resize(len, 0.0);
        buf
    }

    pub fn release_floats(&self, buf: Vec<f64>) {
        let class = capacity_class(buf.capacity());
        let cell = self.floats.get_or(|| RefCell::new(Buckets::default()));
        cell.borrow_mut().put(class, buf, self.limit);
    }

    /// Workspaces currently pooled for the calling thread.
    #[must_use]
    pub fn pooled_matrices(&self) -> usize {
        self.matrices.get().map_or(0, |c| c.borrow().len())
    }

    /// Scratch buffers currently pooled for the calling thread.
    #[must_use]
    pub fn pooled_floats(&self) -> usize {
        self.floats.get().map_or(0, |c| c.borrow().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_round_the_right_way() {
        assert_eq!(request_class(0), 0);
        assert_eq!(request_class(5), 3);
        assert_eq!(request_class(8), 3);
        assert_eq!(capacity_class(8), 3);
        assert_eq!(capacity_class(15), 3);
        assert_eq!(capacity_class(16), 4);
    }

    #[test]
    fn released_workspace_is_recycled() {
        let pool = WorkspacePool::new(4);
        let mut m = pool.acquire(2, 2, 16, true);
        m.indices.extend([0, 1]);
        m.data.extend([1.0, 2.0]);
        let ptr = m.data.as_ptr();
        pool.release(m);
        assert_eq!(pool.pooled_matrices(), 1);

        let again = pool.acquire(3, 5, 9, true);
        assert_eq!(pool.pooled_matrices(), 0);
        assert_eq!(again.data.as_ptr(), ptr);
        assert_eq!(again.shape(), (3, 5));
        assert_eq!(again.indptr, vec![0; 4]);
        assert_eq!(again.nnz(), 0);
    }

    #[test]
    fn bucket_limit_drops_extras() {
        let pool = WorkspacePool::new(1);
        pool.release(Csr::with_capacity(1, 1, 4));
        pool.release(Csr::with_capacity(1, 1, 4));
        assert_eq!(pool.pooled_matrices(), 1);
    }

    #[test]
    fn config_sets_bucket_limit() {
        let pool = WorkspacePool::from_config(&ArithConfig::default().with_pool_bucket_limit(2));
        for _ in 0..3 {
            pool.release_floats(Vec::with_capacity(4));
        }
        assert_eq!(pool.pooled_floats(), 2);
    }

    #[test]
    fn float_buffers_honour_clear() {
        let pool = WorkspacePool::new(2);
        let mut buf = pool.acquire_floats(4, true);
        assert_eq!(buf, vec![0.0; 4]);
        buf.copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
        pool.release_floats(buf);

        let dirty = pool.acquire_floats(3, false);
        assert_eq!(dirty, vec![1.0, 2.0, 3.0]);
        pool.release_floats(dirty);
        let clean = pool.acquire_floats(3, true);
        assert_eq!(clean, vec![0.0; 3]);
    }

    #[test]
    fn pools_are_per_thread() {
        let pool = WorkspacePool::new(2);
        pool.release(Csr::with_capacity(1, 1, 4));
        std::thread::scope(|s| {
            s.spawn(|| assert_eq!(pool.pooled_matrices(), 0));
        });
        assert_eq!(pool.pooled_matrices(), 1);
    }
}
