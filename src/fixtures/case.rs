#![allow(non_snake_case)]

use super::FixtureError;
use crate::algebra::*;
use crate::solver::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use std::io::{Read, Write};

/// One recorded KKT solve.
///
/// Matrices are stored as flat row-major sequences.  `x` and `z` hold
/// the right hand side and `expected_x`, `expected_z` the solution
/// `(ux, W uz)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixtureCase {
    pub name: String,
    pub n: usize,
    pub r: usize,
    pub gram: Vec<f64>,
    pub d: Vec<f64>,
    pub x: Vec<f64>,
    pub z: Vec<f64>,
    pub expected_x: Vec<f64>,
    pub expected_z: Vec<f64>,
}

impl FixtureCase {
    /// Builds the Gram block problem for this case.  The right hand
    /// side does not depend on the target coefficients or the
    /// regularization, so these are set to zero and one.
    pub fn problem(&self, settings: &KKTSettings<f64>) -> Result<GramProblem<f64>, KKTError> {
        let (n, r) = (self.n, self.r);
        if self.gram.len() != n * n {
            return Err(KKTError::dimension("gram", n * n, self.gram.len()));
        }
        let gram = Matrix::new_from_row_major((n, n), &self.gram);
        GramProblem::new(n, r, gram, &vec![0.; n * r], 1., settings)
    }

    /// Solves this case's right hand side with the solver selected by
    /// `settings`, returning `(x, z)`
    pub fn solve(&self, settings: &KKTSettings<f64>) -> Result<(Vec<f64>, Vec<f64>), KKTError> {
        let problem = self.problem(settings)?;
        let W = NonnegativeScaling::from_diagonal(&self.d)?;
        if W.dim() != problem.ncons() {
            return Err(KKTError::dimension("d", problem.ncons(), W.dim()));
        }

        let mut solver = SupportedKKTSolver::new(&problem, settings)?;
        let F = solver.factor(&W)?;

        let (mut x, mut z) = (self.x.clone(), self.z.clone());
        F.solve(&mut x, &mut [], &mut z, settings)?;
        Ok((x, z))
    }

    /// Average errors `(‖x - x*‖ / len(x), ‖z - z*‖ / len(z))` of a
    /// solution against the expected one.  Fails if the lengths differ
    /// from those of the expected solution.
    pub fn check(&self, x: &[f64], z: &[f64]) -> Result<(f64, f64), FixtureError> {
        if x.len() != self.expected_x.len() || z.len() != self.expected_z.len() {
            return Err(FixtureError::Case {
                case: self.name.clone(),
                source: KKTError::Dimension("expected solution has the wrong length".to_string()),
            });
        }
        let error_x = x.dist(&self.expected_x) / x.len() as f64;
        let error_z = z.dist(&self.expected_z) / z.len() as f64;
        Ok((error_x, error_z))
    }

    /// Solves the case and checks the result against the expected
    /// solution, failing if either average error exceeds `tol`
    pub fn verify(&self, settings: &KKTSettings<f64>, tol: f64) -> Result<(f64, f64), FixtureError> {
        let (x, z) = self.solve(settings).map_err(|source| FixtureError::Case {
            case: self.name.clone(),
            source,
        })?;

        let (error_x, error_z) = self.check(&x, &z)?;
        if !(error_x <= tol && error_z <= tol) {
            return Err(FixtureError::Tolerance {
                case: self.name.clone(),
                error_x,
                error_z,
                tol,
            });
        }
        Ok((error_x, error_z))
    }
}

/// Rounds `v` to 15 significant digits
pub fn round_digits(v: f64) -> f64 {
    format!("{:.14e}", v).parse().unwrap_or(v)
}

pub(crate) fn round_all(v: &mut [f64]) {
    v.scalarop(round_digits);
}

/// Writes a set of fixtures as a JSON array
#[cfg(feature = "serde")]
pub fn write_fixtures<W: Write>(writer: &mut W, cases: &[FixtureCase]) -> Result<(), FixtureError> {
    let json = serde_json::to_string_pretty(cases)?;
    writer.write_all(json.as_bytes())?;
    Ok(())
}

/// Reads a set of fixtures written by [`write_fixtures`]
#[cfg(feature = "serde")]
pub fn read_fixtures<R: Read>(reader: &mut R) -> Result<Vec<FixtureCase>, FixtureError> {
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer)?;
    let cases = serde_json::from_str(&buffer)?;
    Ok(cases)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_case() -> FixtureCase {
        let third = round_digits(1. / 3.);
        FixtureCase {
            name: "simple".to_string(),
            n: 2,
            r: 2,
            gram: vec![1., 0., 0., 1.],
            d: vec![1.; 8],
            x: vec![1.; 6],
            z: vec![0.; 8],
            expected_x: vec![third, third, third, third, 0.25, 0.25],
            expected_z: [[round_digits(-7. / 12.); 4], [round_digits(1. / 12.); 4]].concat(),
        }
    }

    #[test]
    fn test_round_digits() {
        assert_eq!(round_digits(1. / 3.), 0.333333333333333);
        assert_eq!(round_digits(-7. / 12.), -0.583333333333333);
        assert_eq!(round_digits(1. / 12.), 0.0833333333333333);
        assert_eq!(round_digits(0.25), 0.25);
        assert_eq!(round_digits(0.), 0.);
    }

    #[test]
    fn test_case_verify() {
        let case = simple_case();
        let settings = KKTSettings::default();
        let (ex, ez) = case.verify(&settings, 1e-12).unwrap();
        assert!(ex < 1e-15 && ez < 1e-15);

        let mut bad = case.clone();
        bad.expected_x[0] += 1e-3;
        assert!(matches!(
            bad.verify(&settings, 1e-12),
            Err(FixtureError::Tolerance { .. })
        ));

        // a wrong length is an error, not a panic
        assert!(case.check(&[0.; 5], &[0.; 8]).is_err());
        assert!(case.check(&[0.; 6], &[]).is_err());
        assert!(case.check(&[0.; 6], &[0.; 8]).is_ok());

        let mut bad = case;
        bad.d.pop();
        assert!(matches!(
            bad.verify(&settings, 1e-12),
            Err(FixtureError::Case {
                source: KKTError::Dimension(_),
                ..
            })
        ));
    }
}
