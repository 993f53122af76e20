//! Summary statistics of a temperature field

use ndarray::Array2;

/// Append the first column on the right so the periodic field is closed
pub fn close_periodic(field: &Array2<f64>) -> Array2<f64> {
    let (rows, cols) = field.dim();
    if cols == 0 {
        return field.clone();
    }
    Array2::from_shape_fn((rows, cols + 1), |(r, c)| field[[r, c % cols]])
}

/// Mean temperature of the periodically closed field, `None` if it is empty
pub fn mean_temperature(field: &Array2<f64>) -> Option<f64> {
    close_periodic(field).mean()
}

/// Smallest and largest temperature in the field
pub fn temperature_range(field: &Array2<f64>) -> Option<(f64, f64)> {
    field.iter().fold(None, |acc, &t| match acc {
        None => Some((t, t)),
        Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
    })
}
