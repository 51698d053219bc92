//! Worker registry
//!
//! The immutable, ordered list of workers an allocation is evaluated against,
//! plus a loader for the plain-text worker format:
//!
//! ```text
//! 3
//! 12.5,0.02
//! 9.0,0.05
//! 15.0,0.01
//! ```
//!
//! The first line holds the worker count, each following line a
//! `cost_rate,error_rate` pair.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// A worker with a per-unit cost rate and error rate
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    /// Position of the worker in its registry
    pub id: usize,
    /// Cost per assigned work unit
    pub cost_rate: f64,
    /// Expected errors per assigned work unit
    pub error_rate: f64,
}

/// Ordered, immutable collection of workers
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerRegistry {
    workers: Vec<Worker>,
}

impl WorkerRegistry {
    /// Build a registry from `(cost_rate, error_rate)` pairs; ids follow position
    pub fn new(rates: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let workers = rates
            .into_iter()
            .enumerate()
            .map(|(id, (cost_rate, error_rate))| Worker {
                id,
                cost_rate,
                error_rate,
            })
            .collect();
        Self { workers }
    }

    /// Parse the plain-text worker format
    pub fn parse(input: &str) -> Result<Self, RegistryError> {
        let lines: Vec<&str> = input.lines().collect();
        if lines.len() < 2 {
            return Err(RegistryError::MissingHeader);
        }

        let header = lines[0].trim();
        let declared: usize = header
            .parse()
            .map_err(|_| RegistryError::InvalidHeader(header.to_string()))?;

        let found = lines.len() - 1;
        if found < declared {
            return Err(RegistryError::TooFewLines { declared, found });
        }

        let mut rates = Vec::with_capacity(declared);
        for (offset, raw) in lines[1..=declared].iter().enumerate() {
            // 1-based line number in the input, header included
            let line = offset + 2;
            let invalid = || RegistryError::InvalidLine {
                line,
                content: raw.to_string(),
            };

            let fields: Vec<&str> = raw.trim().split(',').collect();
            if fields.len() != 2 {
                return Err(invalid());
            }
            let cost_rate: f64 = fields[0].trim().parse().map_err(|_| invalid())?;
            let error_rate: f64 = fields[1].trim().parse().map_err(|_| invalid())?;
            if !cost_rate.is_finite() || !error_rate.is_finite() {
                return Err(invalid());
            }
            if cost_rate < 0.0 || error_rate < 0.0 {
                return Err(RegistryError::NegativeRate { line });
            }
            rates.push((cost_rate, error_rate));
        }

        Ok(Self::new(rates))
    }

    /// Read and parse worker data from any reader
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, RegistryError> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Self::parse(&input)
    }

    /// Read and parse worker data from a file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let input = fs::read_to_string(path)?;
        Self::parse(&input)
    }

    /// Number of workers
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Check if the registry holds no workers
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Get a worker by position
    pub fn get(&self, index: usize) -> Option<&Worker> {
        self.workers.get(index)
    }

    /// Iterate over workers in registry order
    pub fn iter(&self) -> impl Iterator<Item = &Worker> {
        self.workers.iter()
    }

    /// All workers as a slice
    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_new_assigns_positional_ids() {
        let registry = WorkerRegistry::new(vec![(1.0, 5.0), (5.0, 1.0)]);
        assert_eq!(registry.len(), 2);
        for (i, worker) in registry.iter().enumerate() {
            assert_eq!(worker.id, i);
        }
        assert_eq!(registry.get(1).map(|w| w.cost_rate), Some(5.0));
    }

    #[test]
    fn test_parse_valid_input() {
        let registry = WorkerRegistry::parse("2\n12.5,0.02\n 9 , 0.05 \n").unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.workers()[0].cost_rate, 12.5);
        assert_eq!(registry.workers()[1].error_rate, 0.05);
    }

    #[test]
    fn test_parse_ignores_trailing_lines() {
        let registry = WorkerRegistry::parse("1\n1,2\n3,4\n").unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_parse_missing_header() {
        assert!(matches!(
            WorkerRegistry::parse("3"),
            Err(RegistryError::MissingHeader)
        ));
        assert!(matches!(
            WorkerRegistry::parse(""),
            Err(RegistryError::MissingHeader)
        ));
    }

    #[test]
    fn test_parse_invalid_header() {
        let err = WorkerRegistry::parse("three\n1,2\n").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidHeader(h) if h == "three"));
    }

    #[test]
    fn test_parse_too_few_lines() {
        let err = WorkerRegistry::parse("3\n1,2\n3,4\n").unwrap_err();
        assert!(matches!(
            err,
            RegistryError::TooFewLines {
                declared: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_parse_invalid_line_reports_line_number() {
        let err = WorkerRegistry::parse("2\n1,2\n3;4\n").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidLine { line: 3, .. }));

        let err = WorkerRegistry::parse("1\n1,abc\n").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidLine { line: 2, .. }));
    }

    #[test]
    fn test_parse_negative_rate() {
        let err = WorkerRegistry::parse("1\n-1,2\n").unwrap_err();
        assert!(matches!(err, RegistryError::NegativeRate { line: 2 }));
    }

    #[test]
    fn test_from_reader() {
        let registry = WorkerRegistry::from_reader("1\n4,0.5\n".as_bytes()).unwrap();
        assert_eq!(registry.workers()[0].cost_rate, 4.0);
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "2").unwrap();
        writeln!(file, "1.0,5.0").unwrap();
        writeln!(file, "5.0,1.0").unwrap();

        let registry = WorkerRegistry::from_path(file.path()).unwrap();
        assert_eq!(registry, WorkerRegistry::new(vec![(1.0, 5.0), (5.0, 1.0)]));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = WorkerRegistry::from_path("/definitely/not/here/workers.txt").unwrap_err();
        assert!(matches!(err, RegistryError::Io(_)));
    }
}
