//! Whitespace-delimited text formats.
//!
//! * Pedigree: `<id> <sire> <dam>` per line, `0` for an unknown parent.
//! * Genotyped cross-reference: `<id> <id>` per line.
//!
//! Neither format has a header and rows are in ascending id order.
//! Downstream tools read the first token of each cross-reference line
//! as the id, so the layout must stay byte-for-byte stable.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{PedigreeError, Result};
use crate::GenotypedCohort;
use crate::Id;
use crate::Individual;
use crate::Pedigree;

fn parent_field(parent: Option<Id>) -> u32 {
    parent.map_or(0, |p| p.get())
}

pub fn write_pedigree<W: Write>(pedigree: &Pedigree, writer: &mut W) -> Result<()> {
    for individual in pedigree.iter() {
        writeln!(
            writer,
            "{} {} {}",
            individual.id,
            parent_field(individual.sire),
            parent_field(individual.dam)
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_genotyped<W: Write>(cohort: &GenotypedCohort, writer: &mut W) -> Result<()> {
    for id in cohort.iter() {
        writeln!(writer, "{id} {id}")?;
    }
    writer.flush()?;
    Ok(())
}

fn parse_u32(token: &str, line: usize, field: &str) -> Result<u32> {
    token
        .parse::<u32>()
        .map_err(|e| PedigreeError::parse(line, format!("invalid {field} {token:?}: {e}")))
}

fn parse_individual(text: &str, line: usize) -> Result<Individual> {
    let mut fields = text.split_whitespace();
    let mut next_field = |name: &str| match fields.next() {
        Some(token) => parse_u32(token, line, name),
        None => Err(PedigreeError::parse(line, format!("missing {name}"))),
    };
    let id = next_field("id")?;
    let sire = next_field("sire")?;
    let dam = next_field("dam")?;
    if fields.next().is_some() {
        return Err(PedigreeError::parse(line, "expected 3 fields"));
    }
    Ok(Individual {
        id: Id::new(id).ok_or_else(|| PedigreeError::parse(line, "id must be positive"))?,
        sire: Id::new(sire),
        dam: Id::new(dam),
    })
}

/// Parse a pedigree written by [`write_pedigree`].
///
/// Blank lines are skipped. Line numbers in errors are 1-based.
pub fn read_pedigree<R: BufRead>(reader: R) -> Result<Pedigree> {
    let mut individuals = vec![];
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        individuals.push(parse_individual(&line, index + 1)?);
    }
    Pedigree::from_individuals(individuals)
}

/// Read the first token of each line as an id.
pub fn read_genotyped_ids<R: BufRead>(reader: R) -> Result<Vec<Id>> {
    let mut ids = vec![];
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(token) = line.split_whitespace().next() else {
            continue;
        };
        let value = parse_u32(token, index + 1, "id")?;
        let id =
            Id::new(value).ok_or_else(|| PedigreeError::parse(index + 1, "id must be positive"))?;
        ids.push(id);
    }
    Ok(ids)
}

pub fn write_pedigree_file<P: AsRef<Path>>(pedigree: &Pedigree, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_pedigree(pedigree, &mut writer)
}

pub fn write_genotyped_file<P: AsRef<Path>>(cohort: &GenotypedCohort, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_genotyped(cohort, &mut writer)
}

pub fn read_pedigree_file<P: AsRef<Path>>(path: P) -> Result<Pedigree> {
    read_pedigree(BufReader::new(File::open(path)?))
}

pub fn read_genotyped_file<P: AsRef<Path>>(path: P) -> Result<Vec<Id>> {
    read_genotyped_ids(BufReader::new(File::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{select_genotyped, simulate_pedigree, GenerationOptions, PedigreeParameters};

    fn small_pedigree() -> Pedigree {
        let mut pedigree = Pedigree::new();
        for _ in 0..2 {
            pedigree.add_founder().unwrap();
        }
        let (a, b) = (Id::new(1).unwrap(), Id::new(2).unwrap());
        pedigree.add_offspring(a, b).unwrap();
        pedigree.add_offspring(b, Id::new(3).unwrap()).unwrap();
        pedigree
    }

    #[test]
    fn test_pedigree_format() {
        let mut buffer = vec![];
        write_pedigree(&small_pedigree(), &mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "1 0 0\n2 0 0\n3 1 2\n4 2 3\n"
        );
    }

    #[test]
    fn test_genotyped_format() {
        let params = PedigreeParameters::new(100, 5, 10, 2)
            .unwrap()
            .with_chunk_size(20)
            .unwrap();
        let generated = simulate_pedigree(params, GenerationOptions::default(), 7).unwrap();
        let cohort = select_genotyped(&generated.pedigree, params.n_genotyped).unwrap();
        let mut buffer = vec![];
        write_genotyped(&cohort, &mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer.clone()).unwrap(),
            "96 96\n97 97\n98 98\n99 99\n100 100\n"
        );
        let ids = read_genotyped_ids(buffer.as_slice()).unwrap();
        assert_eq!(
            ids.iter().map(|i| i.get()).collect::<Vec<_>>(),
            vec![96, 97, 98, 99, 100]
        );
    }

    #[test]
    fn test_round_trip() {
        let params = PedigreeParameters::new(1000, 10, 25, 4)
            .unwrap()
            .with_chunk_size(64)
            .unwrap();
        let generated = simulate_pedigree(params, GenerationOptions::default(), 31).unwrap();
        let mut buffer = vec![];
        write_pedigree(&generated.pedigree, &mut buffer).unwrap();
        let parsed = read_pedigree(buffer.as_slice()).unwrap();
        assert_eq!(parsed, generated.pedigree);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let ped_path = dir.path().join("pedigree.txt");
        let xref_path = dir.path().join("genotypes.txt_XrefID");
        let pedigree = small_pedigree();
        write_pedigree_file(&pedigree, &ped_path).unwrap();
        assert_eq!(read_pedigree_file(&ped_path).unwrap(), pedigree);

        let cohort = select_genotyped(&pedigree, 2).unwrap();
        write_genotyped_file(&cohort, &xref_path).unwrap();
        let ids = read_genotyped_file(&xref_path).unwrap();
        assert_eq!(ids, cohort.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_parse_errors() {
        let cases = [
            ("1 0 0\n2 0\n", 2),
            ("1 0 0\nx 0 0\n", 2),
            ("0 0 0\n", 1),
            ("1 0 0 9\n", 1),
        ];
        for (text, line) in cases {
            match read_pedigree(text.as_bytes()) {
                Err(PedigreeError::Parse { line: l, .. }) => assert_eq!(l, line, "{text:?}"),
                other => panic!("{text:?}: {other:?}"),
            }
        }
        // well formed, but the offspring predates its sire
        assert!(matches!(
            read_pedigree("1 0 0\n2 3 1\n3 0 0\n".as_bytes()),
            Err(PedigreeError::InvalidParentage { id: 2, .. })
        ));
        assert!(read_genotyped_ids("5 5\n-1 -1\n".as_bytes()).is_err());
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let pedigree = read_pedigree("1 0 0\n\n2 0 0\n3 2 1\n\n".as_bytes()).unwrap();
        assert_eq!(pedigree.len(), 3);
        let ids = read_genotyped_ids("\n3 3\n  \n4 4".as_bytes()).unwrap();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("pedigree.txt");
        assert!(matches!(
            write_pedigree_file(&small_pedigree(), path),
            Err(PedigreeError::Io(_))
        ));
    }
}
