use super::{FloatT, VectorMath};
use itertools::izip;

impl<T: FloatT> VectorMath for [T] {
    type T = T;

    fn copy_from(&mut self, src: &[T]) -> &mut Self {
        self.copy_from_slice(src);
        self
    }

    fn scalarop(&mut self, op: impl Fn(T) -> T) -> &mut Self {
        self.iter_mut().for_each(|x| *x = op(*x));
        self
    }

    fn set(&mut self, c: T) -> &mut Self {
        self.fill(c);
        self
    }

    fn scale(&mut self, c: T) -> &mut Self {
        self.scalarop(|x| c * x)
    }

    fn recip(&mut self) -> &mut Self {
        self.scalarop(T::recip)
    }

    fn negate(&mut self) -> &mut Self {
        self.scalarop(|x| -x)
    }

    fn hadamard(&mut self, y: &[T]) -> &mut Self {
        assert_eq!(self.len(), y.len());
        for (x, &y) in self.iter_mut().zip(y) {
            *x *= y;
        }
        self
    }

    fn dot(&self, y: &[T]) -> T {
        assert_eq!(self.len(), y.len());
        pairwise_sum(self.len(), &|i| self[i] * y[i])
    }

    fn dist(&self, y: &[T]) -> T {
        assert_eq!(self.len(), y.len());
        T::sqrt(pairwise_sum(self.len(), &|i| {
            let d = self[i] - y[i];
            d * d
        }))
    }

    fn norm(&self) -> T {
        T::sqrt(self.dot(self))
    }

    fn norm_inf(&self) -> T {
        if self.iter().any(|x| x.is_nan()) {
            return T::nan();
        }
        self.iter().fold(T::zero(), |acc, x| T::max(acc, x.abs()))
    }

    fn norm_inf_diff(&self, y: &[T]) -> T {
        assert_eq!(self.len(), y.len());
        self.iter()
            .zip(y)
            .fold(T::zero(), |acc, (&x, &y)| T::max(acc, (x - y).abs()))
    }

    fn is_finite(&self) -> bool {
        self.iter().copied().all(T::is_finite)
    }

    fn axpby(&mut self, a: T, x: &[T], b: T) -> &mut Self {
        assert_eq!(self.len(), x.len());
        for (y, &x) in self.iter_mut().zip(x) {
            *y = a * x + b * *y;
        }
        self
    }

    fn waxpby(&mut self, a: T, x: &[T], b: T, y: &[T]) -> &mut Self {
        assert_eq!(self.len(), x.len());
        assert_eq!(self.len(), y.len());
        for (w, &x, &y) in izip!(self.iter_mut(), x, y) {
            *w = a * x + b * y;
        }
        self
    }
}

// Sum of term(0..n), split recursively in halves to limit rounding
// error growth on long vectors
fn pairwise_sum<T: FloatT>(n: usize, term: &impl Fn(usize) -> T) -> T {
    fn inner<T: FloatT>(lo: usize, hi: usize, term: &impl Fn(usize) -> T) -> T {
        if hi - lo <= 16 {
            (lo..hi).fold(T::zero(), |acc, i| acc + term(i))
        } else {
            let mid = lo + (hi - lo) / 2;
            inner(lo, mid, term) + inner(mid, hi, term)
        }
    }
    inner(0, n, term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairwise_dot() {
        let x = vec![1., 2., 3., 4.];
        let y = vec![4., 5., 6., 7.];
        assert_eq!(x.dot(&y), 60.);

        // awkward length to cross the recursion threshold
        let x: Vec<f64> = (1..=901).map(|i| i as f64).collect();
        let ones = vec![1.; x.len()];
        assert_eq!(x.dot(&ones), 901. * 902. / 2.);
        assert_eq!(Vec::<f64>::new().dot(&[]), 0.);
    }

    #[test]
    fn test_dist_and_norms() {
        let x = vec![3., -4., 0.];
        assert_eq!(x.norm(), 5.);
        assert_eq!(x.dist(&[0., 0., 0.]), 5.);
        assert_eq!(x.norm_inf(), 4.);
        assert_eq!(x.norm_inf_diff(&[3., -3., 0.5]), 1.);
        assert!([1., f64::NAN].norm_inf().is_nan());
        assert!(![1., f64::INFINITY].is_finite());
    }

    #[test]
    fn test_axpby() {
        let mut y = vec![1., 1., 1.];
        let x = vec![1., 2., 3.];
        y.axpby(2., &x, -1.);
        assert_eq!(y, vec![1., 3., 5.]);

        let mut w = vec![0.; 3];
        w.waxpby(1., &x, -1., &y);
        assert_eq!(w, vec![0., -1., -2.]);

        w.set(2.).recip().negate().hadamard(&x);
        assert_eq!(w, vec![-0.5, -1., -1.5]);
    }
}
