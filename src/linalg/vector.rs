use std::fmt;

/// Real vector of fixed length
///
/// Element access is lenient: reads outside the vector return 0 and
/// writes outside it are ignored. Binary operations between vectors of
/// different lengths work on the common prefix.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    /// Zero vector with `len` elements
    pub fn new(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
        }
    }

    pub fn from_vec(data: Vec<f64>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, index: usize) -> f64 {
        self.data.get(index).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, index: usize, value: f64) {
        if let Some(slot) = self.data.get_mut(index) {
            *slot = value;
        }
    }

    /// Set every element to `value`
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Copy as many leading elements of `src` as fit
    pub fn copy_from(&mut self, src: &Vector) {
        for (dst, &s) in self.data.iter_mut().zip(&src.data) {
            *dst = s;
        }
    }

    /// `self += other`
    pub fn add(&mut self, other: &Vector) {
        for (dst, &s) in self.data.iter_mut().zip(&other.data) {
            *dst += s;
        }
    }

    /// `self += value` elementwise
    pub fn add_scalar(&mut self, value: f64) {
        for dst in self.data.iter_mut() {
            *dst += value;
        }
    }

    /// `self += scale * other`
    pub fn add_scaled(&mut self, scale: f64, other: &Vector) {
        for (dst, &s) in self.data.iter_mut().zip(&other.data) {
            *dst += scale * s;
        }
    }

    /// `self -= other`
    pub fn sub(&mut self, other: &Vector) {
        for (dst, &s) in self.data.iter_mut().zip(&other.data) {
            *dst -= s;
        }
    }

    /// New vector `self - other`, keeping the length of `self`
    pub fn sub_new(&self, other: &Vector) -> Vector {
        let mut out = self.clone();
        out.sub(other);
        out
    }

    /// Elementwise `self *= other`
    pub fn mul(&mut self, other: &Vector) {
        for (dst, &s) in self.data.iter_mut().zip(&other.data) {
            *dst *= s;
        }
    }

    pub fn scale(&mut self, value: f64) {
        for dst in self.data.iter_mut() {
            *dst *= value;
        }
    }

    /// Divide every element by `value`; no guard against zero
    pub fn div(&mut self, value: f64) {
        for dst in self.data.iter_mut() {
            *dst /= value;
        }
    }

    /// Dot product over the common prefix
    pub fn dot(&self, other: &Vector) -> f64 {
        self.data.iter().zip(&other.data).map(|(a, b)| a * b).sum()
    }

    /// Squared Euclidean norm
    pub fn norm2(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum()
    }

    pub fn norm(&self) -> f64 {
        self.norm2().sqrt()
    }

    pub fn rms(&self) -> f64 {
        (self.norm2() / self.data.len() as f64).sqrt()
    }

    pub fn mean(&self) -> f64 {
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// Population variance
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        self.data
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>()
            / self.data.len() as f64
    }

    /// Population standard deviation
    pub fn sigma(&self) -> f64 {
        self.variance().sqrt()
    }
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Self::from_vec(data)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in &self.data {
            write!(f, "{}\t", v)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_lenient_access() {
        let mut v = Vector::new(3);
        v.set(1, 2.0);
        v.set(5, 9.0);
        assert_eq!(v.get(1), 2.0);
        assert_eq!(v.get(5), 0.0);
        assert_eq!(v.as_slice(), &[0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_arithmetic_on_common_prefix() {
        let mut a = Vector::from_vec(vec![1.0, 2.0, 3.0]);
        let b = Vector::from_vec(vec![10.0, 20.0]);
        a.add(&b);
        assert_eq!(a.as_slice(), &[11.0, 22.0, 3.0]);
        assert_eq!(a.dot(&b), 11.0 * 10.0 + 22.0 * 20.0);

        let d = a.sub_new(&b);
        assert_eq!(d.as_slice(), &[1.0, 2.0, 3.0]);
        a.add_scaled(-1.0, &b);
        assert_eq!(a, d);
    }

    #[test]
    fn test_statistics() {
        let v = Vector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        assert_abs_diff_eq!(v.mean(), 2.5);
        assert_abs_diff_eq!(v.variance(), 1.25);
        assert_abs_diff_eq!(v.sigma(), 1.25f64.sqrt());
        assert_abs_diff_eq!(v.norm2(), 30.0);
        assert_abs_diff_eq!(v.rms(), 7.5f64.sqrt());
    }

    #[test]
    fn test_display_is_tab_separated() {
        let v = Vector::from_vec(vec![1.0, 0.5]);
        assert_eq!(v.to_string(), "1\t0.5\t\n");
    }
}
