#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cone description for the inequality constraints `Gx + s = h, s ∈ 𝒦`
///
/// The KKT solvers in this crate support the nonnegative orthant only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SupportedConeT {
    /// The nonnegative orthant.
    NonnegativeConeT(usize),
}

impl SupportedConeT {
    /// Number of scalar entries of a vector in the cone
    pub fn nvars(&self) -> usize {
        match self {
            SupportedConeT::NonnegativeConeT(dim) => *dim,
        }
    }
}

impl std::fmt::Display for SupportedConeT {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SupportedConeT::NonnegativeConeT(dim) => write!(f, "NonnegativeConeT({dim})"),
        }
    }
}

/// Total dimension of a cone list
pub(crate) fn total_dim(cones: &[SupportedConeT]) -> usize {
    cones.iter().map(SupportedConeT::nvars).sum()
}

#[test]
fn test_cone_dims() {
    use SupportedConeT::*;
    assert_eq!(NonnegativeConeT(3).nvars(), 3);
    assert_eq!(total_dim(&[NonnegativeConeT(3), NonnegativeConeT(2)]), 5);
    assert_eq!(total_dim(&[]), 0);
    assert_eq!(NonnegativeConeT(4).to_string(), "NonnegativeConeT(4)");
}
