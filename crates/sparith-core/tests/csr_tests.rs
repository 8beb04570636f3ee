use sparith_core::{Coo, Csc, Csr, Dense, Dia, FormatError};

#[test]
fn from_parts_ok() {
    let nrows = 2usize;
    let ncols = 3usize;
    let indptr = vec![0i64, 2, 3];
    let indices = vec![2i64, 0, 1]; // unsorted within row 0 is fine
    let data = vec![2.0f64, 1.0, 3.0];
    let csr = Csr::from_parts(nrows, ncols, indptr, indices, data, true).unwrap();
    assert_eq!(csr.nnz(), 3);
    assert_eq!(csr.shape(), (2, 3));
    assert_eq!(csr.get(0, 0), 1.0);
    assert_eq!(csr.get(0, 2), 2.0);
    assert_eq!(csr.get(1, 0), 0.0);
}

#[test]
fn indptr_first_must_be_zero() {
    let indptr = vec![1i64, 1]; // length 2 and last == 1 == nnz, but first is not 0
    let err = Csr::from_parts(1, 3, indptr, vec![0], vec![1.0], true).unwrap_err();
    assert_eq!(err, FormatError::IndptrStart(1));
    assert!(err.to_string().contains("must be 0"));
}

#[test]
fn nnz_and_lengths_must_match() {
    let err = Csr::from_parts(1, 3, vec![0, 2], vec![0, 1], vec![1.0], true).unwrap_err();
    assert!(matches!(err, FormatError::LengthMismatch { .. }));
}

#[test]
fn last_element_must_equal_nnz() {
    let err = Csr::from_parts(1, 3, vec![0, 1], vec![0, 1], vec![1.0, 2.0], true).unwrap_err();
    assert!(matches!(err, FormatError::IndptrEnd { nnz: 2, got: 1 }));
}

#[test]
fn indptr_non_decreasing_per_row() {
    let err = Csr::from_parts(2, 3, vec![0, 2, 1], vec![0], vec![1.0], true).unwrap_err();
    assert!(matches!(err, FormatError::IndptrOrder(1)));
}

#[test]
fn duplicate_columns_rejected() {
    let err = Csr::from_parts(1, 3, vec![0, 2], vec![1, 1], vec![1.0, 2.0], true).unwrap_err();
    assert!(matches!(err, FormatError::DuplicateIndex { outer: 0, index: 1, .. }));
}

#[test]
fn same_column_in_different_rows_is_fine() {
    let csr = Csr::from_parts(2, 3, vec![0, 1, 2], vec![1, 1], vec![1.0, 2.0], true).unwrap();
    assert_eq!(csr.get(1, 1), 2.0);
}

#[test]
fn column_index_out_of_bounds() {
    let err = Csr::from_parts(1, 3, vec![0, 1], vec![3], vec![1.0], true).unwrap_err();
    assert!(err.to_string().contains("out of bounds"));
}

#[test]
fn reuse_as_resets_skeleton() {
    let mut csr = Csr::from_parts(1, 2, vec![0, 2], vec![0, 1], vec![1.0, 2.0], true).unwrap();
    csr.reuse_as(3, 4, 8, true);
    assert_eq!(csr.shape(), (3, 4));
    assert_eq!(csr.indptr, vec![0; 4]);
    assert_eq!(csr.nnz(), 0);
    assert!(csr.indices.capacity() >= 8);
}

#[test]
fn clone_from_csr_copies_everything() {
    let src = Csr::from_parts(2, 2, vec![0, 1, 2], vec![1, 0], vec![5.0, 6.0], true).unwrap();
    let mut dst = Csr::zeros(7, 7);
    dst.clone_from_csr(&src);
    assert_eq!(dst, src);
}

#[test]
fn to_dense_expands_rows() {
    let csr = Csr::from_parts(2, 2, vec![0, 1, 2], vec![1, 0], vec![5.0, 6.0], true).unwrap();
    let d = csr.to_dense();
    assert_eq!(d.data, vec![0.0, 5.0, 6.0, 0.0]);
}

#[test]
fn empty_means_unsized() {
    assert!(Csr::default().is_empty());
    assert!(!Csr::zeros(0, 3).is_empty());
}

#[test]
fn csc_and_coo_lookup() {
    // A = [[1,0],[2,3]]
    let csc = Csc::from_parts(2, 2, vec![0, 2, 3], vec![0, 1, 1], vec![1.0, 2.0, 3.0], true)
        .unwrap();
    assert_eq!(csc.get(1, 0), 2.0);
    assert_eq!(csc.get(0, 1), 0.0);

    let coo = Coo::from_parts(2, 2, vec![1, 1], vec![0, 0], vec![2.0, 0.5], true).unwrap();
    assert_eq!(coo.get(1, 0), 2.5);
    let err = Coo::from_parts(2, 2, vec![2], vec![0], vec![1.0], true).unwrap_err();
    assert!(matches!(err, FormatError::IndexOutOfBounds { axis: "row", .. }));
}

#[test]
fn dense_and_diagonal_constructors() {
    let d = Dense::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    assert_eq!(d.row(1), &[3.0, 4.0]);
    assert!(Dense::from_rows(&[vec![1.0], vec![1.0, 2.0]]).is_err());

    let strided = Dense::with_stride(2, 2, 3, vec![1.0, 2.0, 9.0, 3.0, 4.0]).unwrap();
    assert_eq!(strided.get(1, 1), 4.0);

    let dia = Dia::new(3, 2, vec![1.0]).unwrap();
    assert_eq!(dia.get(0, 0), 1.0);
    assert_eq!(dia.get(1, 1), 0.0);
    assert!(Dia::new(2, 2, vec![1.0, 2.0, 3.0]).is_err());
}
