//! Input-file grammar parser: `testcase<N>/input.txt` is a single stream
//! of whitespace-separated integers.
//!
//! `shmKey mainQueueKey numSolvers solverQueueKey_1 .. solverQueueKey_n
//! numDocks (category_d capacity_{d,1} .. capacity_{d,category_d})_{d=1..n}`

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::DockSpec;
use crate::error::CoreError;

#[derive(Debug, Clone)]
pub struct HarborConfig {
    pub shm_key: i32,
    pub main_queue_key: i32,
    pub solver_queue_keys: Vec<i32>,
    pub docks: Vec<DockSpec>,
}

impl HarborConfig {
    pub fn load(testcase: u32) -> Result<Self, CoreError> {
        let path = PathBuf::from(format!("testcase{testcase}/input.txt"));
        let text = fs::read_to_string(&path)
            .map_err(|e| CoreError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::parse(&text)
    }

    fn parse(text: &str) -> Result<Self, CoreError> {
        let mut tokens = text.split_ascii_whitespace();
        let mut next_int = |what: &str| -> Result<i32, CoreError> {
            tokens
                .next()
                .ok_or_else(|| CoreError::Config(format!("missing {what}")))?
                .parse::<i32>()
                .map_err(|e| CoreError::Config(format!("invalid {what}: {e}")))
        };

        let shm_key = next_int("shmKey")?;
        let main_queue_key = next_int("mainQueueKey")?;
        let num_solvers = next_int("numSolvers")?;
        if num_solvers < 0 {
            return Err(CoreError::Config("numSolvers must be non-negative".into()));
        }

        let mut solver_queue_keys = Vec::with_capacity(num_solvers as usize);
        for i in 0..num_solvers {
            solver_queue_keys.push(next_int(&format!("solverQueueKey_{i}"))?);
        }

        let num_docks = next_int("numDocks")?;
        if num_docks < 0 {
            return Err(CoreError::Config("numDocks must be non-negative".into()));
        }

        let mut docks = Vec::with_capacity(num_docks as usize);
        for d in 0..num_docks {
            let category = next_int(&format!("category_{d}"))?;
            if category < 0 {
                return Err(CoreError::Config(format!("category_{d} must be non-negative")));
            }
            let mut crane_capacities = Vec::with_capacity(category as usize);
            for c in 0..category {
                crane_capacities.push(next_int(&format!("capacity_{d}_{c}"))?);
            }
            docks.push(DockSpec {
                category,
                crane_capacities,
            });
        }

        Ok(Self {
            shm_key,
            main_queue_key,
            solver_queue_keys,
            docks,
        })
    }
}

/// Resolves the path convention used by `load`, exposed for callers that
/// want to check existence before committing to a testcase number.
pub fn input_path(testcase: u32) -> PathBuf {
    Path::new(&format!("testcase{testcase}")).join("input.txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_grammar() {
        let text = "1234 5678 2 111 222 1 3 10 5 7";
        let cfg = HarborConfig::parse(text).unwrap();
        assert_eq!(cfg.shm_key, 1234);
        assert_eq!(cfg.main_queue_key, 5678);
        assert_eq!(cfg.solver_queue_keys, vec![111, 222]);
        assert_eq!(cfg.docks.len(), 1);
        assert_eq!(cfg.docks[0].category, 3);
        assert_eq!(cfg.docks[0].crane_capacities, vec![10, 5, 7]);
    }

    #[test]
    fn parses_multiple_docks() {
        let text = "1 2 0 2 1 10 2 5 7";
        let cfg = HarborConfig::parse(text).unwrap();
        assert!(cfg.solver_queue_keys.is_empty());
        assert_eq!(cfg.docks.len(), 2);
        assert_eq!(cfg.docks[0].crane_capacities, vec![10]);
        assert_eq!(cfg.docks[1].crane_capacities, vec![5, 7]);
    }

    #[test]
    fn missing_token_is_a_config_error_not_a_panic() {
        let text = "1 2 0";
        let err = HarborConfig::parse(text).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }
}
