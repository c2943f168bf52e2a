//! Non-overlapping tile statistics.

use crate::matrix::{average, covariance, variance, Matrix};
use crate::util::math::ceil_div;
use crate::util::{SsimError, SsimResult};

use super::combine::LocalStats;
use super::StatisticsProvider;

/// Splits both images into `ws x ws` tiles starting at the origin and scores
/// each tile pair with unweighted moments.
///
/// Tiles on the right and bottom edges are truncated to what remains of the
/// image, so the map has `ceil(h / ws) x ceil(w / ws)` cells and every pixel
/// belongs to exactly one tile.
#[derive(Clone, Copy, Debug)]
pub struct BlockStats {
    window_size: usize,
}

impl BlockStats {
    pub fn new(window_size: usize) -> SsimResult<Self> {
        if window_size == 0 {
            return Err(SsimError::invalid_option("windowSize", "must be at least 1"));
        }
        Ok(Self { window_size })
    }
}

impl StatisticsProvider for BlockStats {
    fn name(&self) -> &'static str {
        "bezkrovny"
    }

    fn local_stats(&self, a: &Matrix, b: &Matrix) -> SsimResult<LocalStats> {
        a.same_shape(b)?;
        let ws = self.window_size;
        let (height, width) = a.size();
        let out_width = ceil_div(width, ws);
        let out_height = ceil_div(height, ws);
        let cells = out_width * out_height;

        let mut mean_x = Vec::with_capacity(cells);
        let mut mean_y = Vec::with_capacity(cells);
        let mut var_x = Vec::with_capacity(cells);
        let mut var_y = Vec::with_capacity(cells);
        let mut cov_xy = Vec::with_capacity(cells);

        for y in (0..height).step_by(ws) {
            let tile_height = ws.min(height - y);
            for x in (0..width).step_by(ws) {
                let tile_width = ws.min(width - x);
                let xs = a.sub_unchecked(y, x, tile_height, tile_width);
                let ys = b.sub_unchecked(y, x, tile_height, tile_width);
                let (xs, ys) = (xs.data(), ys.data());

                let ax = average(xs);
                let ay = average(ys);
                mean_x.push(ax);
                mean_y.push(ay);
                var_x.push(variance(xs, Some(ax)));
                var_y.push(variance(ys, Some(ay)));
                cov_xy.push(covariance(xs, ys, Some(ax), Some(ay)));
            }
        }

        let map = |data| Matrix::from_parts(data, out_width, out_height);
        Ok(LocalStats {
            mean_x: map(mean_x),
            mean_y: map(mean_y),
            var_x: map(var_x),
            var_y: map(var_y),
            cov_xy: map(cov_xy),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::BlockStats;
    use crate::matrix::Matrix;
    use crate::ssim::StatisticsProvider;

    #[test]
    fn truncated_tiles_cover_the_image() {
        let a = Matrix::new((0..35).map(f64::from).collect(), 7, 5).unwrap();
        let stats = BlockStats::new(3).unwrap().local_stats(&a, &a).unwrap();
        assert_eq!(stats.size(), (2, 3));
        // top-left 3x3 tile: 0 1 2 / 7 8 9 / 14 15 16
        assert_eq!(stats.mean_x.get(0, 0), Some(8.0));
        // bottom-right 2x1 tile: 27 / 34
        assert_eq!(stats.mean_x.get(1, 2), Some(30.5));
        assert_eq!(stats.var_x.get(1, 2), Some(12.25));
    }

    #[test]
    fn window_larger_than_image_is_one_tile() {
        let a = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        let stats = BlockStats::new(11).unwrap().local_stats(&a, &a).unwrap();
        assert_eq!(stats.size(), (1, 1));
        assert_eq!(stats.mean_x.data(), &[2.5]);
        assert_eq!(stats.var_x.data(), &[1.25]);
    }
}
