pub mod genome_file;
pub mod run_metrics;
