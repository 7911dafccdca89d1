use chrono::{DateTime, Utc};
use oxivaders_engine::Genome;
use serde::{Deserialize, Serialize};

/// A saved genome with optional training provenance.
///
/// Only `genome` is required when loading, so hand-written `{"genome": [...]}` files work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenomeFile {
    /// Action symbols (0 = stay, 1 = left, 2 = right, 3 = shoot)
    pub genome: Genome,
    /// Fitness recorded when the genome was saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitness: Option<f64>,
    /// Generation the genome was found at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<DateTime<Utc>>,
}

impl GenomeFile {
    pub fn new(genome: Genome) -> Self {
        Self {
            genome,
            fitness: None,
            generation: None,
            trained_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_file_loads() {
        let file: GenomeFile = serde_json::from_str(r#"{"genome": [0, 3, 1, 2]}"#).unwrap();
        assert_eq!(file.genome.to_bytes(), vec![0, 3, 1, 2]);
        assert_eq!(file.fitness, None);
    }

    #[test]
    fn test_invalid_symbol_is_rejected() {
        assert!(serde_json::from_str::<GenomeFile>(r#"{"genome": [0, 4]}"#).is_err());
        assert!(serde_json::from_str::<GenomeFile>(r#"{"genome": []}"#).is_err());
    }

    #[test]
    fn test_untrained_file_omits_provenance() {
        let genome = Genome::from_symbols(&[1, 1]).unwrap();
        let json = serde_json::to_string(&GenomeFile::new(genome)).unwrap();
        assert_eq!(json, r#"{"genome":[1,1]}"#);
    }
}
