use std::ops::{Add, Mul, RangeInclusive};

use ndarray::{Array1, Array2, Axis, Zip};
use rand::Rng;
use rand_distr::StandardNormal;

use super::TensorError;

/// Dense 2-D array of `f64` with fixed dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Array2<f64>,
}

impl Matrix {
    /// Build a matrix from row-major values
    pub fn new(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self, TensorError> {
        let expected = rows * cols;
        let actual = values.len();
        let data = Array2::from_shape_vec((rows, cols), values)
            .map_err(|_| TensorError::ValueCount { expected, actual })?;
        Ok(Self { data })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::zeros((rows, cols)),
        }
    }

    /// A single-row matrix
    pub fn row_vector(values: Vec<f64>) -> Self {
        Self {
            data: Array1::from(values).insert_axis(Axis(0)),
        }
    }

    /// Matrix filled with standard normal draws
    pub fn random_normal<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        Self {
            data: Array2::from_shape_fn((rows, cols), |_| rng.sample::<f64, _>(StandardNormal)),
        }
    }

    /// Matrix filled with uniform draws from `range`
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        range: RangeInclusive<f64>,
        rng: &mut R,
    ) -> Self {
        Self {
            data: Array2::from_shape_fn((rows, cols), |_| rng.gen_range(range.clone())),
        }
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// `(rows, cols)`
    pub fn dims(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Entries in row-major order
    pub fn values(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[[row, col]]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[[row, col]] = value;
    }

    pub fn row(&self, row: usize) -> Vec<f64> {
        self.data.row(row).to_vec()
    }

    pub fn col(&self, col: usize) -> Vec<f64> {
        self.data.column(col).to_vec()
    }

    /// Apply `f` to every entry
    pub fn map<F: FnMut(f64) -> f64>(&self, f: F) -> Self {
        Self {
            data: self.data.mapv(f),
        }
    }

    /// Combine two equally sized matrices entry by entry
    pub fn try_zip_map<F>(&self, other: &Matrix, mut f: F) -> Result<Self, TensorError>
    where
        F: FnMut(f64, f64) -> f64,
    {
        self.check_same_shape("zip_map", other)?;
        Ok(Self {
            data: Zip::from(&self.data)
                .and(&other.data)
                .map_collect(|&a, &b| f(a, b)),
        })
    }

    /// Matrix product `self · other`
    pub fn try_dot(&self, other: &Matrix) -> Result<Self, TensorError> {
        if self.cols() != other.rows() {
            return Err(self.mismatch("dot", other));
        }
        Ok(Self {
            data: self.data.dot(&other.data),
        })
    }

    /// Matrix product; panics if the inner dimensions differ
    pub fn dot(&self, other: &Matrix) -> Self {
        match self.try_dot(other) {
            Ok(product) => product,
            Err(err) => panic!("{err}"),
        }
    }

    /// Elementwise sum
    pub fn try_add(&self, other: &Matrix) -> Result<Self, TensorError> {
        self.check_same_shape("add", other)?;
        Ok(Self {
            data: &self.data + &other.data,
        })
    }

    fn check_same_shape(&self, op: &'static str, other: &Matrix) -> Result<(), TensorError> {
        if self.dims() != other.dims() {
            return Err(self.mismatch(op, other));
        }
        Ok(())
    }

    fn mismatch(&self, op: &'static str, other: &Matrix) -> TensorError {
        TensorError::DimensionMismatch {
            op,
            left_rows: self.rows(),
            left_cols: self.cols(),
            right_rows: other.rows(),
            right_cols: other.cols(),
        }
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: &Matrix) -> Matrix {
        self.dot(rhs)
    }
}

impl Add for &Matrix {
    type Output = Matrix;

    fn add(self, rhs: &Matrix) -> Matrix {
        match self.try_add(rhs) {
            Ok(sum) => sum,
            Err(err) => panic!("{err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn m(rows: usize, cols: usize, values: &[f64]) -> Matrix {
        Matrix::new(rows, cols, values.to_vec()).unwrap()
    }

    #[test]
    fn test_new_rejects_wrong_value_count() {
        let err = Matrix::new(2, 2, vec![1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, TensorError::ValueCount { expected: 4, actual: 3 });
    }

    #[test]
    fn test_dot_product_values() {
        let a = m(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = m(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);

        let c = &a * &b;
        assert_eq!(c.dims(), (2, 2));
        assert_eq!(c.values(), &[58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn test_dot_product_dimensions() {
        let mut rng = StdRng::seed_from_u64(1);
        for (m_, k, n) in [(1, 7, 4), (3, 3, 3), (5, 1, 2)] {
            let a = Matrix::random_normal(m_, k, &mut rng);
            let b = Matrix::random_normal(k, n, &mut rng);
            assert_eq!(a.dot(&b).dims(), (m_, n));
        }
    }

    #[test]
    fn test_dot_mismatch_is_an_error() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        assert!(matches!(
            a.try_dot(&b),
            Err(TensorError::DimensionMismatch { op: "dot", .. })
        ));
    }

    #[test]
    #[should_panic(expected = "incompatible dimensions")]
    fn test_dot_mismatch_panics() {
        let _ = &Matrix::zeros(1, 2) * &Matrix::zeros(3, 1);
    }

    #[test]
    fn test_add() {
        let a = m(1, 3, &[1.0, 2.0, 3.0]);
        let b = m(1, 3, &[0.5, -2.0, 1.0]);
        assert_eq!((&a + &b).values(), &[1.5, 0.0, 4.0]);
        assert!(matches!(
            a.try_add(&Matrix::zeros(3, 1)),
            Err(TensorError::DimensionMismatch { op: "add", .. })
        ));
    }

    #[test]
    fn test_map_and_accessors() {
        let a = m(2, 2, &[1.0, -2.0, 3.0, -4.0]);
        let relu = a.map(|x| x.max(0.0));
        assert_eq!(relu.values(), &[1.0, 0.0, 3.0, 0.0]);
        assert_eq!(a.row(1), &[3.0, -4.0]);
        assert_eq!(a.col(1), vec![-2.0, -4.0]);
        assert_eq!(a.get(1, 0), 3.0);
    }

    #[test]
    fn test_random_respects_range() {
        let mut rng = StdRng::seed_from_u64(5);
        let a = Matrix::random(4, 4, -0.5..=0.5, &mut rng);
        assert!(a.values().iter().all(|v| (-0.5..=0.5).contains(v)));
    }
}
