//! Definitions -- A tiny interface for the tumor phylogeny simulator.
//! The simulator passes every generated dataset around as plain, fixed-shape matrices together with the clone tree they were derived from.
//! All of them can be serialized into JSON via serde, so that a draw can be dumped as one object named [SimulatedDraw](SimulatedDraw).

use serde::{Deserialize, Serialize};

/// Binary clone-by-mutation presence matrix. Entries are 0 or 1.
pub type GenotypeMatrix = Matrix<u8>;
/// Sample-by-clone mixing proportions.
pub type MixtureMatrix = Matrix<f64>;
/// Sample-by-mutation expected variant allele frequencies.
pub type FrequencyMatrix = Matrix<f64>;
/// Sample-by-mutation read counts.
pub type CountMatrix = Matrix<u64>;

/// The error raised when the number of entries does not fit the declared shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeError {
    pub rows: usize,
    pub cols: usize,
    pub found: usize,
}

impl std::fmt::Display for ShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}x{} matrix needs {} entries, found {}",
            self.rows,
            self.cols,
            self.rows * self.cols,
            self.found
        )
    }
}

impl std::error::Error for ShapeError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MatrixRepr<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

/// Row-major dense matrix which carries its own dimensions.
/// The shape is checked whenever a matrix is built from raw data,
/// including deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatrixRepr<T>")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> TryFrom<MatrixRepr<T>> for Matrix<T> {
    type Error = ShapeError;
    fn try_from(repr: MatrixRepr<T>) -> Result<Self, Self::Error> {
        Self::from_vec(repr.rows, repr.cols, repr.data)
    }
}

impl<T: Clone + Default> Matrix<T> {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::default(); rows * cols],
        }
    }
}

impl<T> Matrix<T> {
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, ShapeError> {
        if data.len() != rows * cols {
            return Err(ShapeError {
                rows,
                cols,
                found: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }
    /// Build a matrix from its rows. Every row should have the same length as the first one.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, ShapeError> {
        let row_num = rows.len();
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let data: Vec<T> = rows.into_iter().flatten().collect();
        Self::from_vec(row_num, cols, data)
    }
    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn cols(&self) -> usize {
        self.cols
    }
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
    pub fn row(&self, i: usize) -> &[T] {
        assert!(i < self.rows, "row {} out of {}", i, self.rows);
        &self.data[i * self.cols..(i + 1) * self.cols]
    }
    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        assert!(i < self.rows, "row {} out of {}", i, self.rows);
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        // A matrix without columns has no data, so the chunk size never matters there.
        self.data.chunks(self.cols.max(1))
    }
    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> Matrix<U> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl<T: Copy> Matrix<T> {
    /// Overwrite the `to`-th row by the `from`-th row.
    pub fn copy_row(&mut self, from: usize, to: usize) {
        assert!(from < self.rows && to < self.rows);
        let cols = self.cols;
        self.data
            .copy_within(from * cols..(from + 1) * cols, to * cols);
    }
    pub fn column(&self, j: usize) -> Vec<T> {
        assert!(j < self.cols, "column {} out of {}", j, self.cols);
        (0..self.rows).map(|i| self.data[i * self.cols + j]).collect()
    }
}

impl<T> std::ops::Index<(usize, usize)> for Matrix<T> {
    type Output = T;
    fn index(&self, (i, j): (usize, usize)) -> &T {
        assert!(i < self.rows && j < self.cols);
        &self.data[i * self.cols + j]
    }
}

impl<T> std::ops::IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        assert!(i < self.rows && j < self.cols);
        &mut self.data[i * self.cols + j]
    }
}

/// Rooted tree over the clones (or mutations, when no clustering happens).
/// Nodes are attached one by one; a node should be attached only below a node already in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneTree {
    root: usize,
    /// parents[i] is the parent of the i-th node. The root, and nodes not yet attached, have `None`.
    parents: Vec<Option<usize>>,
}

impl CloneTree {
    /// Create a tree over `size` nodes, where only `root` is attached.
    pub fn with_root(size: usize, root: usize) -> Self {
        assert!(root < size);
        Self {
            root,
            parents: vec![None; size],
        }
    }
    pub fn attach(&mut self, child: usize, parent: usize) {
        assert!(child != self.root && self.parents[child].is_none());
        assert!(parent == self.root || self.parents[parent].is_some());
        self.parents[child] = Some(parent);
    }
    pub fn len(&self) -> usize {
        self.parents.len()
    }
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
    pub fn root(&self) -> usize {
        self.root
    }
    pub fn parent(&self, node: usize) -> Option<usize> {
        self.parents[node]
    }
    /// Return true if all the nodes are reachable from the root.
    pub fn is_complete(&self) -> bool {
        self.parents
            .iter()
            .enumerate()
            .all(|(node, p)| node == self.root || p.is_some())
    }
    /// Nodes never referenced as a parent, in ascending order.
    pub fn leaves(&self) -> Vec<usize> {
        let mut is_parent = vec![false; self.parents.len()];
        for &p in self.parents.iter().flatten() {
            is_parent[p] = true;
        }
        is_parent
            .iter()
            .enumerate()
            .filter_map(|(node, &is_parent)| (!is_parent).then_some(node))
            .collect()
    }
    /// The parent map with -1 as the root sentinel.
    pub fn to_parent_array(&self) -> Vec<i64> {
        self.parents
            .iter()
            .map(|p| p.map(|p| p as i64).unwrap_or(-1))
            .collect()
    }
}

/// Reference and variant read counts, sample-by-mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadCounts {
    pub reference: CountMatrix,
    pub variant: CountMatrix,
}

impl ReadCounts {
    pub fn new(reference: CountMatrix, variant: CountMatrix) -> Option<Self> {
        (reference.shape() == variant.shape()).then_some(Self { reference, variant })
    }
    pub fn samples(&self) -> usize {
        self.reference.rows()
    }
    pub fn mutations(&self) -> usize {
        self.reference.cols()
    }
    /// Total depth at the given cell.
    pub fn depth(&self, sample: usize, mutation: usize) -> u64 {
        self.reference[(sample, mutation)] + self.variant[(sample, mutation)]
    }
}

/// Everything generated in one draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedDraw {
    /// 0-index of the draw.
    pub index: usize,
    pub tree: CloneTree,
    pub leaves: Vec<usize>,
    /// B.
    pub genotypes: GenotypeMatrix,
    /// U.
    pub mixture: MixtureMatrix,
    /// F = 0.5 U B.
    pub frequencies: FrequencyMatrix,
    pub reads: ReadCounts,
}

impl SimulatedDraw {
    pub fn samples(&self) -> usize {
        self.mixture.rows()
    }
    pub fn clones(&self) -> usize {
        self.genotypes.rows()
    }
    pub fn mutations(&self) -> usize {
        self.genotypes.cols()
    }
}
