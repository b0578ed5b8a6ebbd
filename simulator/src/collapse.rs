//! Collapsing mutations into clusters, and the labels used in the output files.
use definitions::{GenotypeMatrix, Matrix};
use std::collections::HashMap;

/// Merge the mutation columns of `genotypes` that have the same clone-presence vector.
/// The clusters are ordered by their first mutation.
/// Return the collapsed matrix and, for each of its columns, the mutations merged into it.
pub fn collapse_columns(genotypes: &GenotypeMatrix) -> (GenotypeMatrix, Vec<Vec<usize>>) {
    let mut clusters: Vec<(Vec<u8>, Vec<usize>)> = vec![];
    let mut index: HashMap<Vec<u8>, usize> = HashMap::new();
    for j in 0..genotypes.cols() {
        let column = genotypes.column(j);
        match index.get(&column) {
            Some(&c) => clusters[c].1.push(j),
            None => {
                index.insert(column.clone(), clusters.len());
                clusters.push((column, vec![j]));
            }
        }
    }
    let (rows, cols) = (genotypes.rows(), clusters.len());
    let mut collapsed = Matrix::zeros(rows, cols);
    for (c, (column, _)) in clusters.iter().enumerate() {
        for (i, &b) in column.iter().enumerate() {
            collapsed[(i, c)] = b;
        }
    }
    let members = clusters.into_iter().map(|(_, members)| members).collect();
    (collapsed, members)
}

/// `0`, `1`, ..., the same labels as in the header of the read count table.
pub fn sample_labels(samples: usize) -> Vec<String> {
    (0..samples).map(|i| i.to_string()).collect()
}

/// `Mut_0`, `Mut_1`, ...
pub fn mutation_labels(mutations: usize) -> Vec<String> {
    (0..mutations).map(|j| format!("Mut_{j}")).collect()
}

/// The member mutations of each cluster, joined by `;`.
pub fn cluster_labels(members: &[Vec<usize>]) -> Vec<String> {
    members
        .iter()
        .map(|ms| {
            let ms: Vec<_> = ms.iter().map(|m| m.to_string()).collect();
            ms.join(";")
        })
        .collect()
}
