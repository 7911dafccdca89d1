use std::{
    fs::{self, File},
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use oxivaders_engine::{EnvConfig, Genome};

use crate::schema::genome_file::GenomeFile;

/// Destination of a JSON document: stdout or a file.
#[derive(Debug)]
pub enum Output {
    Stdout(StdoutLock<'static>),
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    /// Writes `value` as pretty JSON to `path`, or to stdout when `path` is `None`.
    pub fn save_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        Output::create(path)?.write_json(value)
    }

    pub fn create(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Output::Stdout(io::stdout().lock()));
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    fn display_path(&self) -> String {
        match self {
            Output::Stdout(_) => "stdout".to_owned(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let write = |out: &mut Self| -> io::Result<()> {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
            out.flush()
        };
        write(self).with_context(|| format!("Failed to write JSON to {}", self.display_path()))
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(writer) => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(writer) => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read the environment configuration, falling back to the defaults when no path is given
///
/// Missing fields in the file take their default values.
///
/// # Errors
///
/// Returns error if the file cannot be opened or parsed
pub fn read_env_config(path: Option<&Path>) -> anyhow::Result<EnvConfig> {
    match path {
        Some(path) => read_json_file("environment config", path),
        None => Ok(EnvConfig::default()),
    }
}

/// Read a genome from a JSON genome file or, for `.bin` paths, a raw byte file
///
/// # Errors
///
/// Returns error if the file cannot be read or contains an invalid action symbol
pub fn read_genome_file<P>(path: P) -> anyhow::Result<Genome>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if is_binary_genome_path(path) {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read genome file: {}", path.display()))?;
        let genome = Genome::from_bytes(&bytes)
            .with_context(|| format!("Invalid genome in {}", path.display()))?;
        return Ok(genome);
    }
    let file: GenomeFile = read_json_file("genome", path)?;
    Ok(file.genome)
}

pub fn write_genome_bin<P>(genome: &Genome, path: P) -> anyhow::Result<()>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    fs::write(path, genome.to_bytes())
        .with_context(|| format!("Failed to write genome file: {}", path.display()))
}

fn is_binary_genome_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("bin"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genome_files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let genome = Genome::from_symbols(&[3, 0, 1, 2, 3]).unwrap();

        let json_path = dir.path().join("best.json");
        Output::save_json(&GenomeFile::new(genome.clone()), Some(json_path.as_path())).unwrap();
        assert_eq!(read_genome_file(&json_path).unwrap(), genome);

        let bin_path = dir.path().join("best.bin");
        write_genome_bin(&genome, &bin_path).unwrap();
        assert_eq!(fs::read(&bin_path).unwrap(), vec![3, 0, 1, 2, 3]);
        assert_eq!(read_genome_file(&bin_path).unwrap(), genome);
    }

    #[test]
    fn test_invalid_binary_genome_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.bin");
        fs::write(&path, [0, 1, 7]).unwrap();
        let err = read_genome_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid genome"));
    }

    #[test]
    fn test_partial_env_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("env.json");
        fs::write(&path, r#"{"rows": 8, "bomb_probability": 0.0}"#).unwrap();
        let config = read_env_config(Some(path.as_path())).unwrap();
        assert_eq!(config.rows, 8);
        assert_eq!(config.bomb_probability, 0.0);
        assert_eq!(config.cols, EnvConfig::default().cols);
        assert_eq!(read_env_config(None).unwrap(), EnvConfig::default());
    }
}
