//! Matrix view of a two-factor aggregation.

use serde::Serialize;

use crate::analyzers::aggregate::Aggregation;

/// Rows are the first key's domain, columns the second key's, both in
/// aggregation order. Absent cells are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pivot<A, B> {
    pub rows: Vec<A>,
    pub columns: Vec<B>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl<A: Clone + PartialEq, B: Clone + PartialEq> Pivot<A, B> {
    /// Spreads `(row, column)` groups into a matrix.
    pub fn from_aggregation(agg: &Aggregation<(A, B)>) -> Self {
        let mut rows: Vec<A> = Vec::new();
        let mut columns: Vec<B> = Vec::new();

        for ((a, b), _) in &agg.groups {
            if !rows.contains(a) {
                rows.push(a.clone());
            }
            if !columns.contains(b) {
                columns.push(b.clone());
            }
        }

        let mut cells = vec![vec![None; columns.len()]; rows.len()];
        for ((a, b), stat) in &agg.groups {
            let (Some(i), Some(j)) = (
                rows.iter().position(|r| r == a),
                columns.iter().position(|c| c == b),
            ) else {
                continue;
            };
            cells[i][j] = stat.value;
        }

        Pivot { rows, columns, cells }
    }

    pub fn cell(&self, row: &A, column: &B) -> Option<f64> {
        let i = self.rows.iter().position(|r| r == row)?;
        let j = self.columns.iter().position(|c| c == column)?;
        self.cells[i][j]
    }

    /// Back to `((row, column), value)` pairs, row-major.
    pub fn flatten(&self) -> Vec<((A, B), Option<f64>)> {
        self.rows
            .iter()
            .zip(&self.cells)
            .flat_map(|(a, cells)| {
                self.columns
                    .iter()
                    .zip(cells)
                    .map(move |(b, value)| ((a.clone(), b.clone()), *value))
            })
            .collect()
    }

    /// Maps both axes through `f` and `g`, e.g. to their display labels.
    pub fn map_axes<C, D>(&self, f: impl Fn(&A) -> C, g: impl Fn(&B) -> D) -> Pivot<C, D> {
        Pivot {
            rows: self.rows.iter().map(f).collect(),
            columns: self.columns.iter().map(g).collect(),
            cells: self.cells.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::aggregate::{Domain, GroupKey, Reducer, aggregate_pair};

    fn delinquency_matrix(values: &[(u32, u32, f64)]) -> Aggregation<(u32, u32)> {
        aggregate_pair(
            values,
            |v| GroupKey::Known(v.0),
            &Domain::Observed,
            |v| GroupKey::Known(v.1),
            &Domain::Observed,
            |v| Some(v.2),
            Reducer::Rate,
        )
    }

    #[test]
    fn test_pivot_two_by_two() {
        let agg = delinquency_matrix(&[(0, 0, 0.0), (0, 1, 1.0), (1, 0, 1.0), (1, 1, 1.0)]);
        let pivot = Pivot::from_aggregation(&agg);

        assert_eq!(pivot.rows, vec![0, 1]);
        assert_eq!(pivot.columns, vec![0, 1]);
        assert_eq!(
            pivot.cells,
            vec![vec![Some(0.0), Some(100.0)], vec![Some(100.0), Some(100.0)]]
        );
        assert_eq!(pivot.cell(&1, &0), Some(100.0));
        assert_eq!(pivot.cell(&5, &0), None);
    }

    #[test]
    fn test_pivot_then_flatten_reproduces_cells() {
        let agg = delinquency_matrix(&[
            (0, 0, 0.0),
            (0, 0, 1.0),
            (0, 2, 1.0),
            (3, 1, 0.0),
            (1, 0, 1.0),
        ]);
        let pivot = Pivot::from_aggregation(&agg);

        let expected: Vec<_> = agg.groups.iter().map(|(k, s)| (*k, s.value)).collect();
        assert_eq!(pivot.flatten(), expected);
        assert_eq!(pivot.cell(&3, &0), None);
    }

    #[test]
    fn test_map_axes() {
        let agg = delinquency_matrix(&[(0, 0, 1.0)]);
        let labelled =
            Pivot::from_aggregation(&agg).map_axes(|a| a.to_string(), |b| format!("pr={b}"));

        assert_eq!(labelled.rows, vec!["0".to_string()]);
        assert_eq!(labelled.columns, vec!["pr=0".to_string()]);
        assert_eq!(labelled.cells, vec![vec![Some(100.0)]]);
    }
}
