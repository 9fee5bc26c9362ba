use super::SettingsError;
use crate::algebra::{DenseFactorizationError, FloatT, MatrixConcatenationError};
use thiserror::Error;

/// Identifies the factorization that failed inside a KKT solver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorStage {
    /// Cholesky factorization of the `i`th Gram block
    Block(usize),
    /// Cholesky factorization of the coupling Schur complement
    Coupling,
    /// LDL factorization of the full KKT matrix
    Dense,
}

impl std::fmt::Display for FactorStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FactorStage::Block(i) => write!(f, "block {}", i),
            FactorStage::Coupling => write!(f, "coupling matrix"),
            FactorStage::Dense => write!(f, "dense KKT matrix"),
        }
    }
}

/// Error type returned by problem construction, factorization and solves
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KKTError {
    /// Input sizes inconsistent with the declared problem dimensions
    #[error("Dimension error: {0}")]
    Dimension(String),
    /// Non-square or asymmetric Gram matrix
    #[error("Shape error: {0}")]
    Shape(String),
    /// A matrix that should be positive definite (or quasidefinite)
    /// is not so numerically
    #[error("Factorization error: bad pivot {pivot} in {stage}")]
    Factorization { stage: FactorStage, pivot: usize },
    /// A scaling entry that is not strictly positive and finite
    #[error("Scaling error: entry {0} is not positive and finite")]
    Scaling(usize),
    /// An invalid scalar parameter or setting
    #[error("Bad parameter: {0}")]
    BadParameter(String),
    /// A solve whose refined result still fails the backward error test
    #[error("Accuracy error: {0}")]
    Accuracy(String),
}

impl KKTError {
    pub(crate) fn dimension(what: &str, expected: usize, found: usize) -> Self {
        KKTError::Dimension(format!("{what} has length {found}, expected {expected}"))
    }

    pub(crate) fn accuracy<T: FloatT>(berr: T, tol: T) -> Self {
        KKTError::Accuracy(format!(
            "componentwise backward error {berr:e} exceeds {tol:e}"
        ))
    }

    pub(crate) fn from_factorization(e: DenseFactorizationError, stage: FactorStage) -> Self {
        match e {
            DenseFactorizationError::Cholesky(pivot) | DenseFactorizationError::LDL(pivot) => {
                KKTError::Factorization { stage, pivot }
            }
            DenseFactorizationError::IncompatibleDimension => {
                KKTError::Dimension(format!("incompatible {stage} dimensions"))
            }
        }
    }
}

impl From<SettingsError> for KKTError {
    fn from(e: SettingsError) -> Self {
        KKTError::BadParameter(e.to_string())
    }
}

impl From<MatrixConcatenationError> for KKTError {
    fn from(e: MatrixConcatenationError) -> Self {
        KKTError::Dimension(e.to_string())
    }
}

#[test]
fn test_kkt_error_display() {
    let e = KKTError::from_factorization(DenseFactorizationError::Cholesky(3), FactorStage::Block(1));
    assert_eq!(
        e,
        KKTError::Factorization {
            stage: FactorStage::Block(1),
            pivot: 3
        }
    );
    assert_eq!(e.to_string(), "Factorization error: bad pivot 3 in block 1");

    let e = KKTError::dimension("z", 8, 7);
    assert_eq!(e.to_string(), "Dimension error: z has length 7, expected 8");

    let e = KKTError::accuracy(0.5, 1e-6);
    assert_eq!(
        e.to_string(),
        "Accuracy error: componentwise backward error 5e-1 exceeds 1e-6"
    );
}
