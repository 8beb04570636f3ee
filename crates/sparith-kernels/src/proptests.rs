//! Property-based tests for the arithmetic entry points.
//!
//! Entries are small integers so every sum and product is exact in `f64`.

use proptest::prelude::*;

use crate::dispatch::{add, multiply, subtract};
use crate::operand::MatRef;
use sparith_core::{Csr, Dense};

fn entry() -> impl Strategy<Value = f64> {
    prop_oneof![3 => Just(0.0), 2 => (-3i32..=3).prop_map(f64::from)]
}

fn rows(r: usize, c: usize) -> impl Strategy<Value = Vec<Vec<f64>>> {
    proptest::collection::vec(proptest::collection::vec(entry(), c), r)
}

fn csr_from_rows(rows: &[Vec<f64>]) -> Csr<f64, i64> {
    let ncols = rows.first().map_or(0, Vec::len);
    let mut m = Csr::with_capacity(rows.len(), ncols, 0);
    for (i, r) in rows.iter().enumerate() {
        for (j, &v) in r.iter().enumerate() {
            if v != 0.0 {
                m.indices.push(crate::util::usize_to_i64(j));
                m.data.push(v);
            }
        }
        m.seal_row(i);
    }
    m
}

fn dense_product(a: &[Vec<f64>], b: &[Vec<f64>]) -> Vec<f64> {
    let (n, k, m) = (a.len(), b.len(), b[0].len());
    let mut out = vec![0.0; n * m];
    for i in 0..n {
        for p in 0..k {
            for j in 0..m {
                out[i * m + j] += a[i][p] * b[p][j];
            }
        }
    }
    out
}

fn no_stored_zeros(m: &Csr<f64, i64>) -> bool {
    m.data.iter().all(|&v| v != 0.0)
}

/// `(a, b)` with `a` of shape `n x k` and `b` of shape `k x m`.
fn conformant() -> impl Strategy<Value = (Vec<Vec<f64>>, Vec<Vec<f64>>)> {
    (1usize..6, 1usize..6, 1usize..6).prop_flat_map(|(n, k, m)| (rows(n, k), rows(k, m)))
}

/// Two matrices of the same shape.
fn same_shape() -> impl Strategy<Value = (Vec<Vec<f64>>, Vec<Vec<f64>>)> {
    (1usize..6, 1usize..6).prop_flat_map(|(n, m)| (rows(n, m), rows(n, m)))
}

proptest! {
    #[test]
    fn sparse_product_matches_dense_definition((a, b) in conformant()) {
        let (sa, sb) = (csr_from_rows(&a), csr_from_rows(&b));
        let mut c = Csr::default();
        multiply(&mut c, (&sa).into(), (&sb).into()).unwrap();
        prop_assert_eq!(c.to_dense().data, dense_product(&a, &b));
        prop_assert!(no_stored_zeros(&c));
    }

    #[test]
    fn every_kernel_agrees_with_gustavson((a, b) in conformant()) {
        let (sa, sb) = (csr_from_rows(&a), csr_from_rows(&b));
        let (da, db) = (Dense::from_rows(&a).unwrap(), Dense::from_rows(&b).unwrap());
        let mut expected = Csr::default();
        multiply(&mut expected, (&sa).into(), (&sb).into()).unwrap();
        let expected = expected.to_dense();

        let mut c = Csr::default();
        multiply(&mut c, (&sa).into(), (&db).into()).unwrap();
        prop_assert_eq!(&c.to_dense(), &expected);
        multiply(&mut c, (&da).into(), (&sb).into()).unwrap();
        prop_assert_eq!(&c.to_dense(), &expected);
        multiply(&mut c, (&da).into(), (&db).into()).unwrap();
        prop_assert_eq!(&c.to_dense(), &expected);
    }

    #[test]
    fn add_then_subtract_restores_left((a, b) in same_shape()) {
        let (sa, sb) = (csr_from_rows(&a), csr_from_rows(&b));
        let mut c = Csr::default();
        add(&mut c, (&sa).into(), (&sb).into()).unwrap();
        prop_assert!(no_stored_zeros(&c));
        subtract(&mut c, MatRef::Dst, (&sb).into()).unwrap();
        prop_assert_eq!(c.to_dense(), sa.to_dense());
        prop_assert!(no_stored_zeros(&c));
    }

    #[test]
    fn in_place_multiply_matches_fresh_destination(a in (1usize..6).prop_flat_map(|n| rows(n, n))) {
        let sa = csr_from_rows(&a);
        let mut fresh = Csr::default();
        multiply(&mut fresh, (&sa).into(), (&sa).into()).unwrap();

        let mut c = sa.clone();
        multiply(&mut c, MatRef::Dst, MatRef::Dst).unwrap();
        prop_assert_eq!(c.to_dense(), fresh.to_dense());
    }
}
