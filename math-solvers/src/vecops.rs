//! Dense vector arithmetic
//!
//! Every operation checks operand lengths and returns a new vector, except
//! [`axpy`] which updates its target in place.

use crate::error::{Result, check_len};
use crate::traits::RealField;
use ndarray::Array1;

/// Elementwise sum: z = x + y
pub fn add<T: RealField>(x: &Array1<T>, y: &Array1<T>) -> Result<Array1<T>> {
    check_len(x.len(), y.len())?;
    Ok(Array1::from_iter(
        x.iter().zip(y.iter()).map(|(&xi, &yi)| xi + yi),
    ))
}

/// Elementwise difference: z = x - y
pub fn subtract<T: RealField>(x: &Array1<T>, y: &Array1<T>) -> Result<Array1<T>> {
    check_len(x.len(), y.len())?;
    Ok(Array1::from_iter(
        x.iter().zip(y.iter()).map(|(&xi, &yi)| xi - yi),
    ))
}

/// Scalar multiple: z = α * x
#[inline]
pub fn scale<T: RealField>(alpha: T, x: &Array1<T>) -> Array1<T> {
    x.mapv(|xi| alpha * xi)
}

/// Inner product (x, y) = Σ x_i * y_i
///
/// Summation runs in index order so repeated solves are bitwise reproducible.
pub fn dot<T: RealField>(x: &Array1<T>, y: &Array1<T>) -> Result<T> {
    check_len(x.len(), y.len())?;
    let mut sum = T::zero();
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        sum += xi * yi;
    }
    Ok(sum)
}

/// Vector 2-norm: ||x||_2 = sqrt(x · x)
#[inline]
pub fn norm2<T: RealField>(x: &Array1<T>) -> T {
    let mut sum = T::zero();
    for &xi in x.iter() {
        sum += xi * xi;
    }
    sum.sqrt()
}

/// In-place axpy: y = α * x + y
pub fn axpy<T: RealField>(alpha: T, x: &Array1<T>, y: &mut Array1<T>) -> Result<()> {
    check_len(y.len(), x.len())?;
    for (yi, &xi) in y.iter_mut().zip(x.iter()) {
        *yi += alpha * xi;
    }
    Ok(())
}
