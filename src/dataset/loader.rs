use crate::dataset::errors::DatasetError;
use ndarray::Array2;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Reads a whitespace separated matrix of `rows` x `cols` values, instance-major.
///
/// With `rows == 0` every value of the file is read and the row count follows from the
/// number of values. Otherwise only the first `rows * cols` values are used and a shorter
/// file is an error.
pub fn load(path: &Path, rows: usize, cols: usize) -> Result<Array2<f32>, DatasetError> {
    if cols == 0 {
        return Err(DatasetError::NoFeatures);
    }

    let mut file = File::open(path).map_err(|source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|source| DatasetError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let limit = if rows == 0 { usize::MAX } else { rows.saturating_mul(cols) };
    let values = text
        .split_whitespace()
        .take(limit)
        .enumerate()
        .map(|(position, token)| parse_value(path, position, token))
        .collect::<Result<Vec<f32>, _>>()?;

    let rows = if rows == 0 {
        if values.len() % cols != 0 {
            return Err(DatasetError::RaggedExtent {
                path: path.to_path_buf(),
                values: values.len(),
                features: cols,
            });
        }
        values.len() / cols
    } else {
        if values.len() < limit {
            return Err(DatasetError::ShortRead {
                path: path.to_path_buf(),
                expected: limit,
                found: values.len(),
            });
        }
        rows
    };

    debug!(path = %path.display(), rows, cols, "database read");
    let found = values.len();
    Array2::from_shape_vec((rows, cols), values).map_err(|_| DatasetError::ShortRead {
        path: path.to_path_buf(),
        expected: rows * cols,
        found,
    })
}

fn parse_value(path: &Path, position: usize, token: &str) -> Result<f32, DatasetError> {
    token
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| DatasetError::Parse {
            path: path.to_path_buf(),
            position,
            token: token.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn database(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write database");
        file
    }

    #[test]
    fn test_reads_row_major() {
        let file = database("1 2 3 4\n5 6 7 8\n9 10 11 12\n");
        let matrix = load(file.path(), 3, 4).unwrap();
        assert_eq!(matrix.dim(), (3, 4));
        assert_eq!(matrix[[0, 3]], 4.0);
        assert_eq!(matrix[[1, 0]], 5.0);
        assert_eq!(matrix.as_slice().unwrap()[2 * 4 + 1], 10.0);
    }

    #[test]
    fn test_layout_ignores_line_breaks() {
        let file = database("1 2\n3\t4 5 6\n   7 8");
        let matrix = load(file.path(), 2, 4).unwrap();
        assert_eq!(matrix.row(1).to_vec(), vec![5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_instance_count_is_a_cap() {
        let file = database("1 2 3 4 5 6 7 8 9 10 11 12");
        let matrix = load(file.path(), 2, 4).unwrap();
        assert_eq!(matrix.dim(), (2, 4));
    }

    #[test]
    fn test_zero_rows_reads_whole_file() {
        let file = database("1 2 3 4 5 6 7 8 9 10 11 12");
        assert_eq!(load(file.path(), 0, 4).unwrap().dim(), (3, 4));
        assert!(matches!(
            load(file.path(), 0, 5),
            Err(DatasetError::RaggedExtent { values: 12, .. })
        ));
    }

    #[test]
    fn test_short_file() {
        let file = database("1 2 3 4 5 6 7");
        assert!(matches!(
            load(file.path(), 2, 4),
            Err(DatasetError::ShortRead {
                expected: 8,
                found: 7,
                ..
            })
        ));
    }

    #[test]
    fn test_malformed_value() {
        let file = database("1 2 x 4");
        match load(file.path(), 1, 4) {
            Err(DatasetError::Parse {
                position, token, ..
            }) => {
                assert_eq!(position, 2);
                assert_eq!(token, "x");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        let file = database("1 2 nan 4");
        assert!(matches!(
            load(file.path(), 1, 4),
            Err(DatasetError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(matches!(
            load(&dir.path().join("missing.txt"), 1, 4),
            Err(DatasetError::Open { .. })
        ));
    }
}
