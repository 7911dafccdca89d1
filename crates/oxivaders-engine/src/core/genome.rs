use std::ops::Index;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{GenomeError, core::action::Action};

/// A fixed-length sequence of defender actions.
///
/// A genome is the unit the genetic algorithm evolves: locus `i` is the action the defender
/// takes on tick `i` of an episode. Genomes are never empty, and every locus is a valid
/// [`Action`] by construction, so invalid symbols are rejected when a genome is built or
/// loaded rather than discovered while an episode is running.
///
/// # Serialization
///
/// A genome serializes as a plain list of action codes (`[3, 0, 0, 1]`). Deserialization goes
/// through [`Genome::try_from`], so out-of-range symbols and empty lists fail at load time.
/// [`Genome::to_bytes`] and [`Genome::from_bytes`] provide a compact one-byte-per-locus form.
///
/// # Example
///
/// ```
/// use oxivaders_engine::{Action, Genome};
///
/// let genome = Genome::from_symbols(&[3, 0, 0, 2]).unwrap();
/// assert_eq!(genome.len(), 4);
/// assert_eq!(genome[0], Action::Shoot);
///
/// assert!(Genome::from_symbols(&[0, 9]).is_err());
/// assert!(Genome::from_symbols(&[]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<Action>", try_from = "Vec<Action>")]
pub struct Genome {
    actions: Vec<Action>,
}

impl Genome {
    /// Creates a genome from a non-empty action sequence.
    pub fn new(actions: Vec<Action>) -> Result<Self, GenomeError> {
        if actions.is_empty() {
            return Err(GenomeError::Empty);
        }
        Ok(Self { actions })
    }

    /// Creates a genome from raw action codes, validating every symbol.
    pub fn from_symbols(symbols: &[u8]) -> Result<Self, GenomeError> {
        let actions = symbols
            .iter()
            .enumerate()
            .map(|(index, &symbol)| {
                Action::try_from(symbol).map_err(|source| GenomeError::InvalidSymbol { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(actions)
    }

    /// Decodes the one-byte-per-locus binary form produced by [`Self::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GenomeError> {
        Self::from_symbols(bytes)
    }

    /// Draws a genome of `len` loci, each uniform over the action alphabet.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    pub fn random<R>(rng: &mut R, len: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        assert!(len > 0, "genome length must be at least 1");
        let actions = (0..len).map(|_| rng.random()).collect();
        Self { actions }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Always `false`; genomes hold at least one action.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Mutable access to the loci. The length cannot change through this slice.
    pub fn actions_mut(&mut self) -> &mut [Action] {
        &mut self.actions
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.actions.iter().map(|a| a.code()).collect()
    }

    /// Renders the genome as one character per locus (see [`Action::as_char`]).
    #[must_use]
    pub fn to_compact_string(&self) -> String {
        self.actions.iter().map(|a| a.as_char()).collect()
    }
}

impl Index<usize> for Genome {
    type Output = Action;

    fn index(&self, index: usize) -> &Self::Output {
        &self.actions[index]
    }
}

impl TryFrom<Vec<Action>> for Genome {
    type Error = GenomeError;

    fn try_from(actions: Vec<Action>) -> Result<Self, Self::Error> {
        Self::new(actions)
    }
}

impl From<Genome> for Vec<Action> {
    fn from(genome: Genome) -> Self {
        genome.actions
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::InvalidActionError;

    #[test]
    fn test_json_roundtrip_preserves_actions() {
        let mut rng = Pcg32::seed_from_u64(42);
        let genome = Genome::random(&mut rng, 64);
        let json = serde_json::to_string(&genome).unwrap();
        let loaded: Genome = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, genome);
    }

    #[test]
    fn test_json_format_is_integer_list() {
        let genome = Genome::new(vec![Action::Shoot, Action::Stay, Action::Left]).unwrap();
        assert_eq!(serde_json::to_string(&genome).unwrap(), "[3,0,1]");
    }

    #[test]
    fn test_bytes_roundtrip_preserves_actions() {
        let mut rng = Pcg32::seed_from_u64(3);
        let genome = Genome::random(&mut rng, 200);
        assert_eq!(Genome::from_bytes(&genome.to_bytes()).unwrap(), genome);
    }

    #[test]
    fn test_rejects_invalid_symbol_with_position() {
        let err = Genome::from_symbols(&[0, 1, 2, 4]).unwrap_err();
        assert_eq!(
            err,
            GenomeError::InvalidSymbol {
                index: 3,
                source: InvalidActionError { symbol: 4 },
            }
        );
        assert!(serde_json::from_str::<Genome>("[0, 1, 5]").is_err());
    }

    #[test]
    fn test_rejects_empty_genome() {
        assert_eq!(Genome::new(vec![]), Err(GenomeError::Empty));
        assert!(serde_json::from_str::<Genome>("[]").is_err());
    }

    #[test]
    fn test_compact_string() {
        let genome = Genome::from_symbols(&[0, 1, 2, 3]).unwrap();
        assert_eq!(genome.to_compact_string(), ".<>^");
    }
}
