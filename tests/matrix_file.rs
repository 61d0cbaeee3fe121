use std::io::Write;

use coalign::{AlignError, AlignerBuilder, SubstitutionMatrix};
use tempfile::NamedTempFile;

fn write_matrix(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const DNA_UPPER: &str = "\
# transition/transversion matrix
   A  C  G  T
A  5 -4 -1 -4
C     5 -4 -1
G        5 -4
T           5
";

#[test]
fn upper_triangle_file_loads_symmetric() {
    let file = write_matrix(DNA_UPPER);
    let m = SubstitutionMatrix::from_file(file.path()).unwrap();
    assert_eq!(m.symbols(), b"ACGT");
    assert_eq!(m.get(b'A', b'G'), Some(-1));
    assert_eq!(m.get(b'G', b'A'), Some(-1));
    assert_eq!(m.get(b'T', b'C'), Some(-1));
    assert_eq!(m.get(b'T', b'T'), Some(5));
    assert_eq!(m.get(b'A', b'N'), None);
}

#[test]
fn full_width_file_uses_upper_triangle() {
    // The lower triangle disagrees on purpose and must be ignored.
    let file = write_matrix("  X Y\nX 2 -3\nY 9 1\n");
    let m = SubstitutionMatrix::from_file(file.path()).unwrap();
    assert_eq!(m.get(b'Y', b'X'), Some(-3));
    assert_eq!(m.get(b'X', b'Y'), Some(-3));
}

#[test]
fn loaded_matrix_drives_alignment() {
    let file = write_matrix(DNA_UPPER);
    let m = SubstitutionMatrix::from_file(file.path()).unwrap();
    let engine = AlignerBuilder::new(m).gap_open(-6).gap_extend(-2).build();
    let set = engine.align(b"GATTACA", b"GATTACA").unwrap();
    assert_eq!(set.best_score, 35);
    assert_eq!(set.len(), 1);

    // A transition is cheaper than any gapped alternative.
    let set = engine.align(b"GATTACA", b"GATTGCA").unwrap();
    assert_eq!(set.best_score, 29);
    assert_eq!(set.len(), 1);
}

#[test]
fn malformed_file_reports_line() {
    let file = write_matrix("# header follows\n  A C\nA 1 x\nC 1\n");
    let err = SubstitutionMatrix::from_file(file.path()).unwrap_err();
    match err {
        AlignError::Matrix { line, msg } => {
            assert_eq!(line, 3);
            assert!(msg.contains("'x'"), "{msg}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn comment_only_file_is_empty() {
    let file = write_matrix("# nothing here\n\n   \n");
    let err = SubstitutionMatrix::from_file(file.path()).unwrap_err();
    assert!(matches!(err, AlignError::EmptyMatrix));
}

#[test]
fn truncated_file_names_missing_row() {
    let file = write_matrix("  A C G\nA 1 0 0\nC 1 0\n");
    let err = SubstitutionMatrix::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("missing row for symbol 'G'"), "{err}");
}
