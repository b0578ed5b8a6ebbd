//! Output files of a draw.
//!
//! - `sim_<i>.input`: the read count table, fed to the deconvolution program.
//! - `sim_<i>.true`: the ground truth, in the solution format of the deconvolution program.
//! - `sim_<i>.json`: (optional) the whole draw.
//!
//! The files of a draw are first written to temporary paths and renamed when all of them are complete,
//! so a failed draw leaves nothing behind.
use crate::collapse;
use crate::error::{Result, SimError};
use crate::reads::frequencies;
use definitions::{FrequencyMatrix, GenotypeMatrix, Matrix, MixtureMatrix, ReadCounts, SimulatedDraw};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write the read counts as a TSV. The header is `gene_id` followed by each sample label twice,
/// and each row has the reference and variant counts of each sample, one after another.
pub fn write_read_counts<W: Write>(wtr: &mut W, reads: &ReadCounts) -> std::io::Result<()> {
    let mut header = vec!["gene_id".to_string()];
    for label in collapse::sample_labels(reads.samples()) {
        header.push(label.clone());
        header.push(label);
    }
    writeln!(wtr, "{}", header.join("\t"))?;
    for (j, label) in collapse::mutation_labels(reads.mutations()).iter().enumerate() {
        write!(wtr, "{label}")?;
        for i in 0..reads.samples() {
            write!(wtr, "\t{}\t{}", reads.reference[(i, j)], reads.variant[(i, j)])?;
        }
        writeln!(wtr)?;
    }
    Ok(())
}

/// `rows`, `cols`, then each row with its entries followed by a space.
pub fn write_matrix<W: Write, T: std::fmt::Display>(
    wtr: &mut W,
    matrix: &Matrix<T>,
) -> std::io::Result<()> {
    writeln!(wtr, "{}", matrix.rows())?;
    writeln!(wtr, "{}", matrix.cols())?;
    for row in matrix.iter_rows() {
        for x in row {
            write!(wtr, "{x} ")?;
        }
        writeln!(wtr)?;
    }
    Ok(())
}

fn write_labels<W: Write>(wtr: &mut W, rows: &[String], cols: &[String]) -> std::io::Result<()> {
    writeln!(wtr, "{}", rows.join("\t"))?;
    writeln!(wtr, "{}", cols.join("\t"))
}

/// The ground truth of a draw, with mutations collapsed into clusters.
#[derive(Debug, Clone)]
pub struct Truth<'a> {
    pub mixture: &'a MixtureMatrix,
    pub frequencies: &'a FrequencyMatrix,
    pub collapsed_genotypes: GenotypeMatrix,
    /// For each collapsed column, its mutations joined by `;`.
    pub cluster_labels: Vec<String>,
    pub collapsed_frequencies: FrequencyMatrix,
    pub sample_labels: Vec<String>,
    pub mutation_labels: Vec<String>,
}

impl<'a> Truth<'a> {
    pub fn from_draw(draw: &'a SimulatedDraw) -> Self {
        let (collapsed_genotypes, members) = collapse::collapse_columns(&draw.genotypes);
        let collapsed_frequencies = frequencies(&draw.mixture, &collapsed_genotypes);
        Self {
            mixture: &draw.mixture,
            frequencies: &draw.frequencies,
            collapsed_genotypes,
            cluster_labels: collapse::cluster_labels(&members),
            collapsed_frequencies,
            sample_labels: collapse::sample_labels(draw.samples()),
            mutation_labels: collapse::mutation_labels(draw.mutations()),
        }
    }
}

/// Write the ground truth as a one-solution file: the input F with labels,
/// then the solution triple U, clone tree (as the collapsed B), and collapsed F with labels.
pub fn write_truth<W: Write>(wtr: &mut W, truth: &Truth) -> std::io::Result<()> {
    writeln!(wtr, "1 #sols")?;
    writeln!(wtr)?;
    write_matrix(wtr, truth.frequencies)?;
    write_labels(wtr, &truth.sample_labels, &truth.mutation_labels)?;
    writeln!(wtr)?;
    write_matrix(wtr, truth.mixture)?;
    write_matrix(wtr, &truth.collapsed_genotypes)?;
    write_matrix(wtr, &truth.collapsed_frequencies)?;
    write_labels(wtr, &truth.sample_labels, &truth.cluster_labels)?;
    writeln!(wtr)
}

/// A file written to its temporary path, waiting to be renamed.
#[derive(Debug)]
struct Staged {
    tmp: PathBuf,
    dest: PathBuf,
}

fn tmp_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn stage<F>(dest: PathBuf, write: F) -> Result<Staged>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let tmp = tmp_path(&dest);
    let written = File::create(&tmp)
        .map(BufWriter::new)
        .map_err(SimError::from)
        .and_then(|mut wtr| {
            write(&mut wtr)?;
            wtr.flush()?;
            Ok(())
        });
    match written {
        Ok(_) => Ok(Staged { tmp, dest }),
        Err(why) => {
            let _ = std::fs::remove_file(&tmp);
            Err(why)
        }
    }
}

fn stage_draw(
    staged: &mut Vec<Staged>,
    stem: &Path,
    draw: &SimulatedDraw,
    dump_json: bool,
) -> Result<()> {
    let truth = Truth::from_draw(draw);
    staged.push(stage(stem.with_extension("true"), |wtr| {
        Ok(write_truth(wtr, &truth)?)
    })?);
    staged.push(stage(stem.with_extension("input"), |wtr| {
        Ok(write_read_counts(wtr, &draw.reads)?)
    })?);
    if dump_json {
        staged.push(stage(stem.with_extension("json"), |wtr| {
            Ok(serde_json::ser::to_writer(wtr, draw)?)
        })?);
    }
    Ok(())
}

/// Write all the files of `draw` into `out_dir`. Return the paths written.
/// On error, no file of this draw remains.
pub fn persist_draw(out_dir: &Path, draw: &SimulatedDraw, dump_json: bool) -> Result<Vec<PathBuf>> {
    let stem = out_dir.join(format!("sim_{}", draw.index));
    let mut staged = vec![];
    if let Err(why) = stage_draw(&mut staged, &stem, draw, dump_json) {
        discard(&staged, &[]);
        return Err(why);
    }
    let mut committed = vec![];
    for file in staged.iter() {
        if let Err(why) = std::fs::rename(&file.tmp, &file.dest) {
            discard(&staged, &committed);
            return Err(why.into());
        }
        committed.push(file.dest.clone());
    }
    debug!("WRITE\t{}\t{}", draw.index, committed.len());
    Ok(committed)
}

fn discard(staged: &[Staged], committed: &[PathBuf]) {
    for path in staged.iter().map(|s| &s.tmp).chain(committed.iter()) {
        if path.exists() {
            if let Err(why) = std::fs::remove_file(path) {
                warn!("CLEANUP\t{}\t{}", path.display(), why);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use definitions::CloneTree;
    fn toy_draw(index: usize) -> SimulatedDraw {
        let mut tree = CloneTree::with_root(2, 0);
        tree.attach(1, 0);
        let genotypes = GenotypeMatrix::from_rows(vec![vec![1, 1, 0], vec![1, 1, 1]]).unwrap();
        let mixture = MixtureMatrix::from_rows(vec![vec![0.5, 0.25], vec![0.0, 0.5]]).unwrap();
        let frequencies = frequencies(&mixture, &genotypes);
        let reference = Matrix::from_rows(vec![vec![7, 8, 10], vec![9, 9, 8]]).unwrap();
        let variant = Matrix::from_rows(vec![vec![3, 2, 1], vec![2, 3, 3]]).unwrap();
        SimulatedDraw {
            index,
            leaves: tree.leaves(),
            tree,
            genotypes,
            mixture,
            frequencies,
            reads: ReadCounts::new(reference, variant).unwrap(),
        }
    }
    #[test]
    fn read_count_table() {
        let draw = toy_draw(0);
        let mut wtr = vec![];
        write_read_counts(&mut wtr, &draw.reads).unwrap();
        let table = String::from_utf8(wtr).unwrap();
        let answer = "gene_id\t0\t0\t1\t1\n\
                      Mut_0\t7\t3\t9\t2\n\
                      Mut_1\t8\t2\t9\t3\n\
                      Mut_2\t10\t1\t8\t3\n";
        assert_eq!(table, answer);
    }
    #[test]
    fn truth_file() {
        let draw = toy_draw(0);
        let truth = Truth::from_draw(&draw);
        assert_eq!(truth.cluster_labels, vec!["0;1", "2"]);
        let mut wtr = vec![];
        write_truth(&mut wtr, &truth).unwrap();
        let text = String::from_utf8(wtr).unwrap();
        let answer = "1 #sols\n\
                      \n\
                      2\n3\n0.375 0.375 0.125 \n0.25 0.25 0.25 \n\
                      0\t1\n\
                      Mut_0\tMut_1\tMut_2\n\
                      \n\
                      2\n2\n0.5 0.25 \n0 0.5 \n\
                      2\n2\n1 0 \n1 1 \n\
                      2\n2\n0.375 0.125 \n0.25 0.25 \n\
                      0\t1\n\
                      0;1\t2\n\
                      \n";
        assert_eq!(text, answer);
    }
    #[test]
    fn persist_and_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let draw = toy_draw(3);
        let written = persist_draw(dir.path(), &draw, true).unwrap();
        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["sim_3.true", "sim_3.input", "sim_3.json"]);
        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .filter(|e| {
                let name = e.as_ref().unwrap().file_name();
                name.to_str().unwrap().ends_with(".tmp")
            })
            .count();
        assert_eq!(leftovers, 0);
        let json = std::fs::read_to_string(dir.path().join("sim_3.json")).unwrap();
        let back: SimulatedDraw = serde_json::from_str(&json).unwrap();
        assert_eq!(back.reads, draw.reads);
    }
    #[test]
    fn failed_draw_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no_such_dir");
        assert!(persist_draw(&missing, &toy_draw(0), false).is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
