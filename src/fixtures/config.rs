use derive_builder::Builder;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Gram matrix used by a fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GramKind {
    /// `K = I`
    Identity,
    /// `K = UUᵀ` for `U` uniform on `[0, 1)`
    RandomOuter,
}

/// Scaling diagonal used by a fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScalingKind {
    /// `d = 1`
    Ones,
    /// `d` uniform on `(0, 1]`
    Uniform,
}

/// Right hand side used by a fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RhsKind {
    /// `x = 1`, `z = 0`
    OnesZeros,
    /// `x` and `z` uniform on `[0, 1)`
    Uniform,
}

/// Description of a single fixture case.
///
/// ```no_run
/// use blockkkt::fixtures::*;
///
/// let config = FixtureConfigBuilder::default()
///     .name("small")
///     .seed(42)
///     .n(3)
///     .r(2)
///     .gram(GramKind::RandomOuter)
///     .build()
///     .unwrap();
/// ```
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixtureConfig {
    ///case name
    #[builder(setter(into))]
    pub name: String,

    ///random seed
    #[builder(default = "0")]
    pub seed: u64,

    ///block dimension
    pub n: usize,

    ///number of blocks
    pub r: usize,

    ///Gram matrix
    #[builder(default = "GramKind::Identity")]
    pub gram: GramKind,

    ///scaling diagonal
    #[builder(default = "ScalingKind::Uniform")]
    pub scaling: ScalingKind,

    ///right hand side
    #[builder(default = "RhsKind::Uniform")]
    pub rhs: RhsKind,
}

impl FixtureConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            if name.is_empty() {
                return Err("fixture name must not be empty".to_string());
            }
        }
        if let (Some(n), Some(r)) = (self.n, self.r) {
            if r < 1 || n < r {
                return Err(format!("require n ≥ r ≥ 1, got n = {n}, r = {r}"));
            }
        }
        Ok(())
    }
}

/// The four standard fixture cases
pub fn standard_cases() -> Vec<FixtureConfig> {
    let case = |name: &str, seed, n, r, gram, scaling, rhs| FixtureConfig {
        name: name.to_string(),
        seed,
        n,
        r,
        gram,
        scaling,
        rhs,
    };

    vec![
        case(
            "simple",
            0,
            2,
            2,
            GramKind::Identity,
            ScalingKind::Ones,
            RhsKind::OnesZeros,
        ),
        case(
            "diagonal_g",
            0,
            10,
            5,
            GramKind::Identity,
            ScalingKind::Uniform,
            RhsKind::Uniform,
        ),
        case(
            "diagonal_d",
            1,
            10,
            5,
            GramKind::RandomOuter,
            ScalingKind::Ones,
            RhsKind::Uniform,
        ),
        case(
            "random",
            10,
            10,
            5,
            GramKind::RandomOuter,
            ScalingKind::Uniform,
            RhsKind::Uniform,
        ),
    ]
}
