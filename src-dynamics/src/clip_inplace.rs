use ndarray::{ArrayBase, DataMut, Dimension};

use crate::Bounds;

/// Clip every element of `u` into `bounds`
pub fn clip_inplace<S, D>(u: &mut ArrayBase<S, D>, bounds: Bounds)
where
    S: DataMut<Elem = f64>,
    D: Dimension,
{
    for ui in u.iter_mut() {
        if *ui < bounds.min {
            *ui = bounds.min;
        }
        if *ui > bounds.max {
            *ui = bounds.max;
        }
    }
}
