use ndarray::Array2;

/// Copy of an instance-major matrix laid out feature-major: element `(j, i)` of the result is
/// element `(i, j)` of the input, stored contiguously.
pub fn to_feature_major(values: &Array2<f32>) -> Array2<f32> {
    values.t().as_standard_layout().into_owned()
}

/// Inverse of [`to_feature_major`].
pub fn to_instance_major(values: &Array2<f32>) -> Array2<f32> {
    to_feature_major(values)
}
