//! Adjacency-matrix serialization helpers.
//!
//! Matrices are stored as [ndarray::Array2] in memory but written out as
//! nested numeric arrays (row-major), which is what downstream consumers
//! load.
use ndarray::Array2;
use serde::{Serialize, Serializer};

/// Row-major nested representation of a matrix.
pub fn to_rows(matrix: &Array2<f32>) -> Vec<Vec<f32>> {
    matrix.rows().into_iter().map(|row| row.to_vec()).collect()
}

/// Serializes an [Array2] as nested arrays instead of ndarray's internal
/// representation.
pub fn serialize_rows<S>(matrix: &Array2<f32>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    to_rows(matrix).serialize(serializer)
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn rows_are_row_major() {
        let m = array![[0.0, 1.0], [2.0, 3.0]];
        assert_eq!(to_rows(&m), vec![vec![0.0, 1.0], vec![2.0, 3.0]]);
    }

    #[test]
    fn serializes_as_nested_arrays() {
        #[derive(Serialize)]
        struct Wrapper {
            #[serde(serialize_with = "super::serialize_rows")]
            matrix: Array2<f32>,
        }

        let wrapper = Wrapper {
            matrix: array![[0.0, 1.0], [1.0, 0.0]],
        };
        let value = serde_json::to_value(&wrapper).unwrap();
        assert_eq!(
            value["matrix"],
            serde_json::json!([[0.0, 1.0], [1.0, 0.0]])
        );
    }
}
