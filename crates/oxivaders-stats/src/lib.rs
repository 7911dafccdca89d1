//! Statistical summaries for training metrics.
//!
//! - [`descriptive`]: min, max, mean, median, standard deviation and top-k of a dataset
//!
//! # Example
//!
//! ```
//! use oxivaders_stats::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new([4.0, 1.0, 3.0, 2.0]).unwrap();
//! assert_eq!(stats.min, 1.0);
//! assert_eq!(stats.median, 2.5);
//! ```

pub mod descriptive;
