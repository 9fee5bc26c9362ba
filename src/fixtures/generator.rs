#![allow(non_snake_case)]

use super::*;
use crate::algebra::*;
use crate::io::{forward_print_target, ConfigurablePrintTarget, PrintTarget};
use crate::solver::KKTSettings;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use std::io::Write;

/// Produces [`FixtureCase`]s from [`FixtureConfig`]s.
///
/// The expected solution of each case is computed with the dense
/// solver.  The structured solver is then run on the same data and
/// generation fails if the two disagree by more than `tolerance`.
#[derive(Debug)]
pub struct FixtureGenerator {
    /// maximum average error between the dense and structured solutions
    pub tolerance: f64,
    settings: KKTSettings<f64>,
    output: PrintTarget,
}

impl Default for FixtureGenerator {
    fn default() -> Self {
        Self::new(KKTSettings::default())
    }
}

impl FixtureGenerator {
    pub fn new(settings: KKTSettings<f64>) -> Self {
        Self {
            tolerance: 1e-8,
            settings,
            output: PrintTarget::default(),
        }
    }

    /// Generates a single case
    pub fn generate(&mut self, config: &FixtureConfig) -> Result<FixtureCase, FixtureError> {
        let (n, r) = (config.n, config.r);
        let nr = n * r;
        let mut rng = Xoshiro256StarStar::seed_from_u64(config.seed);

        let mut gram = match config.gram {
            GramKind::Identity => Matrix::identity(n).to_row_major(),
            GramKind::RandomOuter => random_outer(&mut rng, n),
        };
        let mut d = match config.scaling {
            ScalingKind::Ones => vec![1.; 2 * nr],
            ScalingKind::Uniform => (0..2 * nr).map(|_| 1. - rng.gen::<f64>()).collect(),
        };
        let (mut x, mut z) = match config.rhs {
            RhsKind::OnesZeros => (vec![1.; nr + n], vec![0.; 2 * nr]),
            RhsKind::Uniform => {
                let x = (0..nr + n).map(|_| rng.gen()).collect();
                let z = (0..2 * nr).map(|_| rng.gen()).collect();
                (x, z)
            }
        };

        // round the inputs first, so that the stored case is self consistent
        for v in [&mut gram, &mut d, &mut x, &mut z] {
            round_all(v);
        }

        let mut case = FixtureCase {
            name: config.name.clone(),
            n,
            r,
            gram,
            d,
            x,
            z,
            expected_x: Vec::new(),
            expected_z: Vec::new(),
        };

        let case_error = |source| FixtureError::Case {
            case: config.name.clone(),
            source,
        };

        let mut settings = self.settings.clone();
        settings.verbose = false;

        settings.kkt_solve_method = "dense".to_string();
        let (mut ex, mut ez) = case.solve(&settings).map_err(case_error)?;
        round_all(&mut ex);
        round_all(&mut ez);
        case.expected_x = ex;
        case.expected_z = ez;

        settings.kkt_solve_method = "structured".to_string();
        let (sx, sz) = case.solve(&settings).map_err(case_error)?;
        let (error_x, error_z) = case.check(&sx, &sz)?;

        if self.settings.verbose {
            let _ = writeln!(
                self.output,
                "fixture {}: n = {}, r = {}, error_x = {:.3e}, error_z = {:.3e}",
                case.name, n, r, error_x, error_z
            );
        }
        if !(error_x <= self.tolerance && error_z <= self.tolerance) {
            return Err(FixtureError::Tolerance {
                case: case.name,
                error_x,
                error_z,
                tol: self.tolerance,
            });
        }
        Ok(case)
    }

    /// Generates every case in `configs`, stopping at the first failure
    pub fn generate_all(
        &mut self,
        configs: &[FixtureConfig],
    ) -> Result<Vec<FixtureCase>, FixtureError> {
        configs.iter().map(|c| self.generate(c)).collect()
    }
}

impl ConfigurablePrintTarget for FixtureGenerator {
    forward_print_target!(output);
}

// row-major entries of UUᵀ with U uniform on [0, 1)
fn random_outer(rng: &mut impl Rng, n: usize) -> Vec<f64> {
    let U: Vec<f64> = (0..n * n).map(|_| rng.gen()).collect();
    let U = Matrix::new_from_row_major((n, n), &U);
    let mut K = Matrix::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            K[(i, j)] = (0..n).map(|k| U[(i, k)] * U[(j, k)]).sum();
        }
    }
    K.to_row_major()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::KKTSettingsBuilder;

    #[test]
    fn test_generate_simple() {
        let mut gen = FixtureGenerator::default();
        let case = gen.generate(&standard_cases()[0]).unwrap();

        let third = round_digits(1. / 3.);
        assert_eq!(case.expected_x, [third, third, third, third, 0.25, 0.25]);
        assert_eq!(case.expected_z[..4], [round_digits(-7. / 12.); 4]);
        assert_eq!(case.expected_z[4..], [round_digits(1. / 12.); 4]);
    }

    #[test]
    fn test_generate_deterministic() {
        let config = FixtureConfigBuilder::default()
            .name("small")
            .seed(7)
            .n(3)
            .r(2)
            .gram(GramKind::RandomOuter)
            .build()
            .unwrap();

        let mut gen = FixtureGenerator::default();
        let a = gen.generate(&config).unwrap();
        let b = gen.generate(&config).unwrap();
        assert_eq!(a, b);

        // K = UUᵀ is symmetric and the scaling strictly positive
        let K = Matrix::new_from_row_major((3, 3), &a.gram);
        assert!(K.is_symmetric(0.));
        assert!(a.d.iter().all(|&d| d > 0. && d <= 1.));

        let config = FixtureConfig { seed: 8, ..config };
        let c = gen.generate(&config).unwrap();
        assert_ne!(a.gram, c.gram);
    }

    #[test]
    fn test_generator_verbose() {
        let settings = KKTSettingsBuilder::default().verbose(true).build().unwrap();
        let mut gen = FixtureGenerator::new(settings);
        gen.print_to_buffer();
        gen.generate(&standard_cases()[0]).unwrap();

        let out = gen.get_print_buffer().unwrap();
        assert!(out.starts_with("fixture simple: n = 2, r = 2"));
    }
}
