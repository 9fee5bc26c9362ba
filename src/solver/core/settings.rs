use crate::algebra::*;
use derive_builder::Builder;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Rejected settings value
pub enum SettingsError {
    /// Names the offending field
    #[error("Bad value for field \"{0}\"")]
    BadFieldValue(&'static str),
}

/// Settings for the KKT solvers.
///
/// Use [`KKTSettingsBuilder`] to construct a settings object with
/// non-default values:
///
/// ```no_run
/// use blockkkt::solver::KKTSettingsBuilder;
///
/// let settings = KKTSettingsBuilder::<f64>::default()
///     .verbose(true)
///     .kkt_solve_method("dense".to_string())
///     .build()
///     .unwrap();
/// ```

#[derive(Builder, Debug, Clone)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KKTSettings<T: FloatT> {
    ///print a summary after each factorization
    #[builder(default = "false")]
    pub verbose: bool,

    ///KKT solve method ("auto", "structured" or "dense")
    #[builder(default = r#""auto".to_string()"#)]
    pub kkt_solve_method: String,

    ///relative tolerance for the Gram matrix symmetry check
    #[builder(default = "(1e-10).as_T()")]
    pub symmetry_tol: T,

    ///relative pivot threshold for the dense factorizations
    #[builder(default = "(1e-13).as_T()")]
    pub factorization_pivot_tol: T,

    ///refine each solve against the unfactored KKT operator
    #[builder(default = "true")]
    pub iterative_refinement_enable: bool,

    ///refinement stops once the residual norm is below abstol + reltol * |rhs|
    #[builder(default = "(1e-13).as_T()")]
    pub iterative_refinement_reltol: T,

    ///see `iterative_refinement_reltol`
    #[builder(default = "(1e-12).as_T()")]
    pub iterative_refinement_abstol: T,

    ///maximum number of refinement steps per solve
    #[builder(default = "10")]
    pub iterative_refinement_max_iter: u32,

    ///refinement stops when a step improves the residual by less than this factor
    #[builder(default = "(5.0).as_T()")]
    pub iterative_refinement_stop_ratio: T,

    ///a solve fails unless max |b - Kx|ᵢ / (|b|ᵢ + (|K||x|)ᵢ) is at most this value
    #[builder(default = "(1e-6).as_T()")]
    pub backward_error_tol: T,
}

impl<T> Default for KKTSettings<T>
where
    T: FloatT,
{
    fn default() -> KKTSettings<T> {
        KKTSettingsBuilder::<T>::default().build().unwrap()
    }
}

impl<T> KKTSettings<T>
where
    T: FloatT,
{
    /// Checks that a settings object is valid.  Needed for objects
    /// modified after construction or built without the builder.
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_kkt_solve_method(&self.kkt_solve_method)?;
        validate_nonnegative(self.symmetry_tol, "symmetry_tol")?;
        validate_nonnegative(self.factorization_pivot_tol, "factorization_pivot_tol")?;
        validate_nonnegative(self.iterative_refinement_reltol, "iterative_refinement_reltol")?;
        validate_nonnegative(self.iterative_refinement_abstol, "iterative_refinement_abstol")?;
        validate_nonnegative(self.backward_error_tol, "backward_error_tol")?;
        Ok(())
    }
}

impl From<SettingsError> for KKTSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        KKTSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Checks run by `build()`
impl<T> KKTSettingsBuilder<T>
where
    T: FloatT,
{
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(ref kkt_solve_method) = self.kkt_solve_method {
            validate_kkt_solve_method(kkt_solve_method)?;
        }
        if let Some(v) = self.symmetry_tol {
            validate_nonnegative(v, "symmetry_tol")?;
        }
        if let Some(v) = self.factorization_pivot_tol {
            validate_nonnegative(v, "factorization_pivot_tol")?;
        }
        if let Some(v) = self.iterative_refinement_reltol {
            validate_nonnegative(v, "iterative_refinement_reltol")?;
        }
        if let Some(v) = self.iterative_refinement_abstol {
            validate_nonnegative(v, "iterative_refinement_abstol")?;
        }
        if let Some(v) = self.backward_error_tol {
            validate_nonnegative(v, "backward_error_tol")?;
        }
        Ok(())
    }
}

fn validate_kkt_solve_method(kkt_solve_method: &str) -> Result<(), SettingsError> {
    match kkt_solve_method {
        "auto" | "structured" | "dense" => Ok(()),
        _ => Err(SettingsError::BadFieldValue("kkt_solve_method")),
    }
}

fn validate_nonnegative<T: FloatT>(v: T, field: &'static str) -> Result<(), SettingsError> {
    if v >= T::zero() && v.is_finite() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue(field))
    }
}

#[test]
fn test_settings_validate() {
    // defaults
    KKTSettingsBuilder::<f64>::default().build().unwrap();

    for method in ["auto", "structured", "dense"] {
        KKTSettingsBuilder::<f64>::default()
            .kkt_solve_method(method.to_string())
            .build()
            .unwrap();
    }

    // fail on unknown method
    assert!(KKTSettingsBuilder::<f64>::default()
        .kkt_solve_method("foo".to_string())
        .build()
        .is_err());

    // fail on negative tolerance
    assert!(KKTSettingsBuilder::<f64>::default()
        .factorization_pivot_tol(-1.0)
        .build()
        .is_err());

    assert!(KKTSettingsBuilder::<f64>::default()
        .backward_error_tol(f64::INFINITY)
        .build()
        .is_err());

    // a post-construction change is caught by validate()
    let mut settings = KKTSettings::<f64>::default();
    assert!(settings.validate().is_ok());
    settings.symmetry_tol = f64::NAN;
    assert_eq!(
        settings.validate(),
        Err(SettingsError::BadFieldValue("symmetry_tol"))
    );
}
