use crate::error::{PedigreeError, Result};
use crate::Id;
use crate::Pedigree;

/// The most recently born individuals of a pedigree, as the
/// contiguous id range `first..=last`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GenotypedCohort {
    first: Id,
    last: Id,
}

impl GenotypedCohort {
    pub fn first(&self) -> Id {
        self.first
    }

    pub fn last(&self) -> Id {
        self.last
    }

    pub fn len(&self) -> usize {
        (self.last.get() - self.first.get()) as usize + 1
    }

    /// Always `false`: a cohort holds at least one id.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, id: Id) -> bool {
        self.first <= id && id <= self.last
    }

    /// Ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Id> {
        (self.first.get()..=self.last.get()).filter_map(Id::new)
    }
}

/// Select the last `n_genotyped` individuals of `pedigree`.
///
/// # Errors
///
/// A configuration error if `n_genotyped` is zero, and
/// [`PedigreeError::GenotypedExceedsPedigree`] if the pedigree holds
/// fewer individuals, which can happen after extinction.
pub fn select_genotyped(pedigree: &Pedigree, n_genotyped: u32) -> Result<GenotypedCohort> {
    if n_genotyped == 0 {
        return Err(PedigreeError::config("n_genotyped must be positive"));
    }
    let available = pedigree.len() as u32;
    let too_many = || PedigreeError::GenotypedExceedsPedigree {
        requested: n_genotyped,
        available,
    };
    let last = pedigree.last_id().ok_or_else(too_many)?;
    let first = last
        .get()
        .checked_sub(n_genotyped - 1)
        .and_then(Id::new)
        .ok_or_else(too_many)?;
    Ok(GenotypedCohort { first, last })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn founders(n: usize) -> Pedigree {
        let mut pedigree = Pedigree::new();
        for _ in 0..n {
            pedigree.add_founder().unwrap();
        }
        pedigree
    }

    #[test]
    fn test_most_recent_individuals() {
        let pedigree = founders(100);
        let cohort = select_genotyped(&pedigree, 5).unwrap();
        assert_eq!(cohort.len(), 5);
        assert!(!cohort.is_empty());
        assert_eq!(
            cohort.iter().map(|i| i.get()).collect::<Vec<_>>(),
            vec![96, 97, 98, 99, 100]
        );
        assert!(cohort.contains(Id::new(96).unwrap()));
        assert!(!cohort.contains(Id::new(95).unwrap()));
    }

    #[test]
    fn test_whole_pedigree() {
        let pedigree = founders(10);
        let cohort = select_genotyped(&pedigree, 10).unwrap();
        assert_eq!(cohort.first().get(), 1);
        assert_eq!(cohort.last().get(), 10);
    }

    #[test]
    fn test_too_many() {
        let pedigree = founders(10);
        assert!(matches!(
            select_genotyped(&pedigree, 11),
            Err(PedigreeError::GenotypedExceedsPedigree {
                requested: 11,
                available: 10
            })
        ));
        assert!(select_genotyped(&Pedigree::new(), 1).is_err());
        assert!(matches!(
            select_genotyped(&pedigree, 0),
            Err(PedigreeError::Config { .. })
        ));
    }
}
