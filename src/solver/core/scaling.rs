#![allow(non_snake_case)]

use super::KKTError;
use crate::algebra::*;
use itertools::izip;

// -------------------------------------
// Nonnegative orthant scaling
// -------------------------------------

/// Diagonal scaling `W = diag(d)` of the nonnegative orthant.
///
/// `W` satisfies `W⁻¹ s = W z = λ` for the primal / dual slack pair
/// `(s, z)` it was computed from (Nesterov-Todd scaling).  The scaling
/// is supplied afresh by the interior point driver at every iteration
/// and only read by the KKT solvers.
#[derive(Debug, Clone)]
pub struct NonnegativeScaling<T> {
    d: Vec<T>,
    di: Vec<T>,
    λ: Vec<T>,
}

impl<T> NonnegativeScaling<T>
where
    T: FloatT,
{
    /// Identity scaling of dimension `dim`
    pub fn new(dim: usize) -> Self {
        Self {
            d: vec![T::one(); dim],
            di: vec![T::one(); dim],
            λ: vec![T::zero(); dim],
        }
    }

    /// Scaling with the given diagonal.  `λ` is left at zero.
    pub fn from_diagonal(d: &[T]) -> Result<Self, KKTError> {
        check_positive(d)?;
        let mut di = d.to_vec();
        di.recip();
        Ok(Self {
            d: d.to_vec(),
            di,
            λ: vec![T::zero(); d.len()],
        })
    }

    /// Scaling with the given inverse diagonal.  `λ` is left at zero.
    pub fn from_inverse_diagonal(di: &[T]) -> Result<Self, KKTError> {
        check_positive(di)?;
        let mut d = di.to_vec();
        d.recip();
        Ok(Self {
            d,
            di: di.to_vec(),
            λ: vec![T::zero(); di.len()],
        })
    }

    /// Nesterov-Todd scaling for the primal / dual pair `(s, z)`
    pub fn update_scaling(&mut self, s: &[T], z: &[T]) -> Result<(), KKTError> {
        let m = self.dim();
        if s.len() != m {
            return Err(KKTError::dimension("s", m, s.len()));
        }
        if z.len() != m {
            return Err(KKTError::dimension("z", m, z.len()));
        }
        check_positive(s)?;
        check_positive(z)?;

        for (λ, d, di, &s, &z) in izip!(&mut self.λ, &mut self.d, &mut self.di, s, z) {
            *λ = T::sqrt(s * z);
            *d = T::sqrt(s / z);
            *di = T::sqrt(z / s);
        }
        check_positive(&self.d)?;
        check_positive(&self.di)?;
        Ok(())
    }

    pub fn dim(&self) -> usize {
        self.d.len()
    }

    pub fn d(&self) -> &[T] {
        &self.d
    }

    pub fn di(&self) -> &[T] {
        &self.di
    }

    pub fn λ(&self) -> &[T] {
        &self.λ
    }

    /// `y = α W x + β y`
    pub fn mul_W(&self, y: &mut [T], x: &[T], α: T, β: T) {
        assert_eq!(y.len(), x.len());
        assert_eq!(y.len(), self.d.len());
        for (yi, &xi, &di) in izip!(y, x, &self.d) {
            *yi = α * (xi * di) + β * *yi;
        }
    }

    /// `y = α W⁻¹ x + β y`
    pub fn mul_Winv(&self, y: &mut [T], x: &[T], α: T, β: T) {
        assert_eq!(y.len(), x.len());
        assert_eq!(y.len(), self.di.len());
        for (yi, &xi, &dii) in izip!(y, x, &self.di) {
            *yi = α * (xi * dii) + β * *yi;
        }
    }
}

// every entry must be strictly positive and finite
fn check_positive<T: FloatT>(v: &[T]) -> Result<(), KKTError> {
    match v.iter().position(|&x| !(x > T::zero() && x.is_finite())) {
        Some(idx) => Err(KKTError::Scaling(idx)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::iter::zip;

    #[test]
    fn test_nt_scaling() {
        let s = vec![1., 4., 0.5, 1e-6];
        let z = vec![1., 1., 2., 1e2];

        let mut W = NonnegativeScaling::<f64>::new(4);
        W.update_scaling(&s, &z).unwrap();

        // W z = W⁻¹ s = λ
        let mut Wz = vec![0.; 4];
        let mut Winvs = vec![0.; 4];
        W.mul_W(&mut Wz, &z, 1., 0.);
        W.mul_Winv(&mut Winvs, &s, 1., 0.);

        for (a, b, l) in izip!(&Wz, &Winvs, W.λ()) {
            assert!((a - l).abs() <= 1e-14 * l);
            assert!((b - l).abs() <= 1e-14 * l);
        }
        for (d, di) in zip(W.d(), W.di()) {
            assert!((d * di - 1.).abs() < 1e-15);
        }
        assert_eq!(W.d()[1], 2.);
    }

    #[test]
    fn test_bad_scaling() {
        assert_eq!(
            NonnegativeScaling::from_diagonal(&[1., 0., 1.]).unwrap_err(),
            KKTError::Scaling(1)
        );
        assert_eq!(
            NonnegativeScaling::from_inverse_diagonal(&[1., f64::INFINITY]).unwrap_err(),
            KKTError::Scaling(1)
        );

        let mut W = NonnegativeScaling::<f64>::new(2);
        assert_eq!(
            W.update_scaling(&[1., -1.], &[1., 1.]).unwrap_err(),
            KKTError::Scaling(1)
        );
        assert!(matches!(
            W.update_scaling(&[1.], &[1., 1.]),
            Err(KKTError::Dimension(_))
        ));

        let W = NonnegativeScaling::from_inverse_diagonal(&[2., 4.]).unwrap();
        assert_eq!(W.d(), &[0.5, 0.25]);
    }
}
