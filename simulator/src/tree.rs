//! Random clone trees and their genotype matrices.
//!
//! Both generators grow a random recursive tree: the nodes are visited in a random order,
//! and each node is attached below a uniformly chosen node visited before it.
//! A row of the genotype matrix is its parent's row plus the node's own mutations,
//! so every row contains all the mutations of its ancestors.
use definitions::{CloneTree, GenotypeMatrix};
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::Range;

/// Generate an n x n genotype matrix where each node carries exactly one mutation, the one with its own index.
pub fn generate_genotypes<R: Rng>(rng: &mut R, num: usize) -> (GenotypeMatrix, CloneTree) {
    let blocks: Vec<_> = (0..num).map(|i| i..i + 1).collect();
    grow_tree(rng, num, &blocks)
}

/// Generate a `clones` x `num` genotype matrix. The mutations are first split into `clones`
/// contiguous blocks (see [clone_mutation_map]), then the tree is grown on the clones.
pub fn generate_genotypes_with_cluster<R: Rng>(
    rng: &mut R,
    num: usize,
    clones: usize,
) -> (GenotypeMatrix, CloneTree) {
    assert!(0 < clones && clones <= num, "{} clones on {} mutations", clones, num);
    // The visiting order is drawn before the partition.
    let mut order: Vec<usize> = (0..clones).collect();
    order.shuffle(rng);
    let blocks = clone_mutation_map(rng, num, clones);
    attach_in_order(rng, &order, num, &blocks)
}

/// Randomly split 0..num into `clones` contiguous, non-empty blocks.
/// The i-th block is the set of mutations introduced by the i-th clone.
pub fn clone_mutation_map<R: Rng>(rng: &mut R, num: usize, clones: usize) -> Vec<Range<usize>> {
    assert!(0 < clones && clones <= num);
    let mut breaks: Vec<usize> = rand::seq::index::sample(rng, num - 1, clones - 1)
        .into_iter()
        .map(|x| x + 1)
        .collect();
    breaks.sort_unstable();
    let starts = std::iter::once(0).chain(breaks.iter().copied());
    let ends = breaks.iter().copied().chain(std::iter::once(num));
    starts.zip(ends).map(|(s, e)| s..e).collect()
}

fn grow_tree<R: Rng>(
    rng: &mut R,
    num: usize,
    blocks: &[Range<usize>],
) -> (GenotypeMatrix, CloneTree) {
    assert!(num > 0);
    let mut order: Vec<usize> = (0..blocks.len()).collect();
    order.shuffle(rng);
    attach_in_order(rng, &order, num, blocks)
}

fn attach_in_order<R: Rng>(
    rng: &mut R,
    order: &[usize],
    num: usize,
    blocks: &[Range<usize>],
) -> (GenotypeMatrix, CloneTree) {
    let mut genotypes = GenotypeMatrix::zeros(blocks.len(), num);
    let root = order[0];
    let mut tree = CloneTree::with_root(blocks.len(), root);
    genotypes.row_mut(root)[blocks[root].clone()].fill(1);
    for (rank, &node) in order.iter().enumerate().skip(1) {
        let parent = order[rng.gen_range(0..rank)];
        genotypes.copy_row(parent, node);
        genotypes.row_mut(node)[blocks[node].clone()].fill(1);
        tree.attach(node, parent);
    }
    trace!("TREE\t{:?}", tree.to_parent_array());
    (genotypes, tree)
}

/// Check that `genotypes` is a valid ancestry matrix for `tree`:
/// the root row is nonempty, and each row strictly contains its parent's row.
pub fn is_ancestry_matrix(genotypes: &GenotypeMatrix, tree: &CloneTree) -> bool {
    if genotypes.rows() != tree.len() || !tree.is_complete() {
        return false;
    }
    let root_row = genotypes.row(tree.root());
    if root_row.iter().all(|&b| b == 0) {
        return false;
    }
    (0..tree.len()).all(|node| match tree.parent(node) {
        Some(parent) => is_strict_superset(genotypes.row(node), genotypes.row(parent)),
        None => node == tree.root(),
    })
}

fn is_strict_superset(row: &[u8], parent: &[u8]) -> bool {
    let contains = row.iter().zip(parent).all(|(&x, &p)| x >= p);
    contains && row != parent
}
