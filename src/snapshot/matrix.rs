use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{NetevoError, NetevoResult};

/// Dense row-major matrix loaded from a comma-separated snapshot file.
///
/// Every row is one network node. All columns but the last form the weight matrix
/// (`weights[src][dst]`); the last column holds the node's activation function id.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl NetworkMatrix {
    /// Read and parse a snapshot file.
    pub fn load(path: &Path) -> NetevoResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read snapshot '{}'", path.display()))?;
        Self::parse(&text)
            .map_err(|e| NetevoError::parse(format!("'{}': {e}", path.display())))
    }

    /// Parse comma-separated rows of numbers. Blank lines are ignored.
    pub fn parse(text: &str) -> NetevoResult<Self> {
        let mut cols = None::<usize>;
        let mut rows = 0usize;
        let mut data = Vec::new();

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let before = data.len();
            for cell in line.split(',') {
                let cell = cell.trim();
                let v = cell.parse::<f64>().map_err(|_| {
                    NetevoError::parse(format!(
                        "line {}: '{cell}' is not a number",
                        line_no + 1
                    ))
                })?;
                data.push(v);
            }

            let width = data.len() - before;
            match cols {
                None => cols = Some(width),
                Some(c) if c != width => {
                    return Err(NetevoError::parse(format!(
                        "line {}: expected {c} columns, found {width}",
                        line_no + 1
                    )));
                }
                Some(_) => {}
            }
            rows += 1;
        }

        let Some(cols) = cols else {
            return Err(NetevoError::parse("snapshot contains no rows"));
        };
        if cols < 2 {
            return Err(NetevoError::parse(
                "snapshot needs at least one weight column plus the activation column",
            ));
        }

        Ok(Self { rows, cols, data })
    }

    /// Number of rows in the file.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns in the file, including the activation column.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Raw cell access.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.data[row * self.cols + col])
    }

    /// Width of the weight matrix (every column but the last).
    pub fn weight_cols(&self) -> usize {
        self.cols - 1
    }

    /// Weight from node `src` to node `dst`.
    pub fn weight(&self, src: usize, dst: usize) -> Option<f64> {
        if dst >= self.weight_cols() {
            return None;
        }
        self.get(src, dst)
    }

    /// The weight row of node `src`.
    pub fn weight_row(&self, src: usize) -> &[f64] {
        let start = src * self.cols;
        &self.data[start..start + self.weight_cols()]
    }

    /// Activation function id of every node (last column).
    pub fn activations(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.chunks_exact(self.cols).map(|row| row[row.len() - 1])
    }

    /// Number of nodes, i.e. rows.
    pub fn node_count(&self) -> usize {
        self.rows
    }

    /// Number of nonzero weight entries.
    ///
    /// NaN compares unequal to zero and is therefore counted.
    pub fn connection_count(&self) -> usize {
        (0..self.rows)
            .map(|r| self.weight_row(r).iter().filter(|w| **w != 0.0).count())
            .sum()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/snapshot/matrix.rs"]
mod tests;
