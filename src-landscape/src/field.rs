//! The peak field: positions, heights and widths of all peaks plus the
//! rotation angle used when the field changes.

use ndarray::{Array1, Array2, ArrayView1, Axis, concatenate, s};
use rand::Rng;

use crate::error::LandscapeError;
use crate::rotation::rotate_positions;

/// One peak of the landscape
#[derive(Debug, Clone, PartialEq)]
pub struct Peak {
    pub position: Array1<f64>,
    pub height: f64,
    pub width: f64,
}

impl Peak {
    /// Contribution of this peak at `x`: an inverted cone of height `height`
    /// whose slope is set by `width`
    pub fn value_at(&self, x: ArrayView1<'_, f64>) -> f64 {
        cone(self.height, self.width, x, self.position.view())
    }
}

fn cone(height: f64, width: f64, x: ArrayView1<'_, f64>, center: ArrayView1<'_, f64>) -> f64 {
    let dim = x.len() as f64;
    let sq: f64 = x.iter().zip(center.iter()).map(|(a, b)| (a - b).powi(2)).sum();
    height / (1.0 + width * (sq / dim).sqrt())
}

/// N peaks in D dimensions; positions are stored row-wise (N x D)
#[derive(Debug, Clone, PartialEq)]
pub struct PeakField {
    positions: Array2<f64>,
    heights: Array1<f64>,
    widths: Array1<f64>,
    theta: f64,
}

impl PeakField {
    pub fn new(
        positions: Array2<f64>,
        heights: Array1<f64>,
        widths: Array1<f64>,
        theta: f64,
    ) -> Result<Self, LandscapeError> {
        let n = positions.nrows();
        if n == 0 || positions.ncols() == 0 {
            return Err(LandscapeError::InvalidConfig(format!(
                "peak field needs at least one peak and one dimension, got {}x{}",
                n,
                positions.ncols()
            )));
        }
        if heights.len() != n || widths.len() != n {
            return Err(LandscapeError::InvalidConfig(format!(
                "{} peaks but {} heights and {} widths",
                n,
                heights.len(),
                widths.len()
            )));
        }
        Ok(Self { positions, heights, widths, theta })
    }

    pub fn dim(&self) -> usize {
        self.positions.ncols()
    }

    pub fn num_peaks(&self) -> usize {
        self.positions.nrows()
    }

    pub fn positions(&self) -> &Array2<f64> {
        &self.positions
    }

    pub fn heights(&self) -> &Array1<f64> {
        &self.heights
    }

    pub fn widths(&self) -> &Array1<f64> {
        &self.widths
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn peak(&self, i: usize) -> Option<Peak> {
        if i >= self.num_peaks() {
            return None;
        }
        Some(Peak {
            position: self.positions.row(i).to_owned(),
            height: self.heights[i],
            width: self.widths[i],
        })
    }

    pub fn peaks(&self) -> impl Iterator<Item = Peak> + '_ {
        (0..self.num_peaks()).filter_map(move |i| self.peak(i))
    }

    /// Best peak contribution at `x`
    pub fn fitness(&self, x: ArrayView1<'_, f64>) -> Result<f64, LandscapeError> {
        if x.len() != self.dim() {
            return Err(LandscapeError::DimensionMismatch { expected: self.dim(), got: x.len() });
        }
        let best = self
            .positions
            .outer_iter()
            .zip(self.heights.iter().zip(self.widths.iter()))
            .map(|(center, (&h, &w))| cone(h, w, x, center))
            .fold(f64::NEG_INFINITY, f64::max);
        Ok(best)
    }

    /// Rotate every peak by the current angle in freshly drawn planes
    pub fn rotate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.positions = rotate_positions(&self.positions, self.theta, rng);
    }

    /// Append one coordinate per peak
    pub fn grow(&mut self, column: ArrayView1<'_, f64>) -> Result<(), LandscapeError> {
        if column.len() != self.num_peaks() {
            return Err(LandscapeError::MissingSeedData(format!(
                "growth column has {} values for {} peaks",
                column.len(),
                self.num_peaks()
            )));
        }
        let grown = concatenate(Axis(1), &[self.positions.view(), column.view().insert_axis(Axis(1))])?;
        self.positions = grown;
        Ok(())
    }

    /// Drop the trailing coordinate of every peak
    pub fn shrink(&mut self) -> Result<(), LandscapeError> {
        let dim = self.dim();
        if dim <= 1 {
            return Err(LandscapeError::InvalidConfig("cannot shrink a one-dimensional field".to_string()));
        }
        self.positions = self.positions.slice(s![.., ..dim - 1]).to_owned();
        Ok(())
    }

    pub(crate) fn heights_mut(&mut self) -> &mut Array1<f64> {
        &mut self.heights
    }

    pub(crate) fn widths_mut(&mut self) -> &mut Array1<f64> {
        &mut self.widths
    }

    pub(crate) fn positions_mut(&mut self) -> &mut Array2<f64> {
        &mut self.positions
    }

    pub(crate) fn set_theta(&mut self, theta: f64) {
        self.theta = theta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn two_peaks() -> PeakField {
        PeakField::new(
            array![[0.0, 0.0], [3.0, 4.0]],
            array![50.0, 80.0],
            array![5.0, 1.0],
            0.0,
        )
        .unwrap()
    }

    #[test]
    fn test_fitness_at_peak_center_is_height() {
        let field = two_peaks();
        assert_eq!(field.fitness(array![0.0, 0.0].view()).unwrap(), 50.0);
        assert_eq!(field.fitness(array![3.0, 4.0].view()).unwrap(), 80.0);
    }

    #[test]
    fn test_fitness_takes_best_peak() {
        let field = two_peaks();
        let x = array![1.0, 1.0];
        // peak 0: 50 / (1 + 5 * sqrt(2 / 2)) = 50 / 6
        // peak 1: 80 / (1 + sqrt((4 + 9) / 2))
        let p1 = 80.0 / (1.0 + (13.0f64 / 2.0).sqrt());
        let f = field.fitness(x.view()).unwrap();
        assert!((f - p1.max(50.0 / 6.0)).abs() < 1e-12);
        assert_eq!(field.peak(1).unwrap().value_at(x.view()), p1);
    }

    #[test]
    fn test_fitness_rejects_wrong_dimension() {
        let field = two_peaks();
        let err = field.fitness(array![0.0, 0.0, 0.0].view()).unwrap_err();
        assert!(matches!(err, LandscapeError::DimensionMismatch { expected: 2, got: 3 }));
    }

    #[test]
    fn test_grow_and_shrink() {
        let mut field = two_peaks();
        field.grow(array![7.0, 8.0].view()).unwrap();
        assert_eq!(field.dim(), 3);
        assert_eq!(field.positions(), &array![[0.0, 0.0, 7.0], [3.0, 4.0, 8.0]]);
        field.shrink().unwrap();
        field.shrink().unwrap();
        assert_eq!(field.positions(), &array![[0.0], [3.0]]);
        assert!(field.shrink().is_err());
        assert!(field.grow(array![1.0].view()).is_err());
    }

    #[test]
    fn test_grow_from_short_lived_column() {
        let mut field = two_peaks();
        for k in 0..3 {
            let column = Array1::from_elem(2, k as f64);
            field.grow(column.view()).unwrap();
        }
        assert_eq!(field.dim(), 5);
        assert_eq!(field.positions().column(4), Array1::from_elem(2, 2.0));
        assert_eq!(field.fitness(array![0.0, 0.0, 0.0, 1.0, 2.0].view()).unwrap(), 50.0);
    }

    #[test]
    fn test_new_validates_shapes() {
        assert!(PeakField::new(array![[0.0, 0.0]], array![1.0, 2.0], array![1.0], 0.0).is_err());
        assert!(PeakField::new(Array2::zeros((0, 2)), Array1::zeros(0), Array1::zeros(0), 0.0).is_err());
    }
}
