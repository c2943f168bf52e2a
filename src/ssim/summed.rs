//! Uniform sliding windows over summed-area tables.

use crate::matrix::Matrix;
use crate::sat::{MomentTables, SatWork};
use crate::trace::{trace_event, trace_span};
use crate::util::SsimResult;

use super::combine::{window_score, LocalStats, ScoreForm, Stabilizers};
use super::{SsimMap, StatisticsProvider};

/// Every `ws x ws` window position with unweighted moments, each answered in
/// constant time from five summed-area tables.
///
/// [`StatisticsProvider::similarity`] is fused: scores are combined as soon
/// as the moments of a window are known and the mean score accumulates in
/// the same pass.
///
/// A window larger than either image side yields an empty map and a `NaN`
/// mean.
#[derive(Clone, Copy, Debug)]
pub struct SummedAreaStats {
    window_size: usize,
}

impl SummedAreaStats {
    pub fn new(window_size: usize) -> Self {
        Self { window_size }
    }

    fn leaves_no_window(&self, a: &Matrix) -> bool {
        self.window_size > a.width() || self.window_size > a.height()
    }

    /// Fused map and mean, recording table work in `work`.
    pub fn similarity_with_work(
        &self,
        a: &Matrix,
        b: &Matrix,
        k: Stabilizers,
        work: &mut SatWork,
    ) -> SsimResult<SsimMap> {
        a.same_shape(b)?;
        if self.leaves_no_window(a) {
            return Ok(SsimMap {
                map: Matrix::from_parts(Vec::new(), 0, 0),
                mssim: Some(f64::NAN),
            });
        }
        let tables = MomentTables::build(a, b, self.window_size, work)?;
        let (height, width) = tables.output_size();
        let _span = trace_span!("summed_area_ssim", width = width, height = height).entered();

        let mut data = Vec::with_capacity(width * height);
        let mut total = 0.0;
        for row in 0..height {
            for col in 0..width {
                let moments = tables.moments(row, col, work);
                let score = window_score(&moments, k, ScoreForm::Stabilized);
                total += score;
                data.push(score);
            }
        }
        let mssim = total / (width * height) as f64;
        trace_event!(
            "summed_area_work",
            table_updates = work.table_updates,
            window_lookups = work.window_lookups
        );

        Ok(SsimMap {
            map: Matrix::from_parts(data, width, height),
            mssim: Some(mssim),
        })
    }
}

impl StatisticsProvider for SummedAreaStats {
    fn name(&self) -> &'static str {
        "weber"
    }

    fn local_stats(&self, a: &Matrix, b: &Matrix) -> SsimResult<LocalStats> {
        a.same_shape(b)?;
        if self.leaves_no_window(a) {
            let empty = Matrix::from_parts(Vec::new(), 0, 0);
            return Ok(LocalStats {
                mean_x: empty.clone(),
                mean_y: empty.clone(),
                var_x: empty.clone(),
                var_y: empty.clone(),
                cov_xy: empty,
            });
        }
        let mut work = SatWork::default();
        let tables = MomentTables::build(a, b, self.window_size, &mut work)?;
        let (height, width) = tables.output_size();
        let cells = width * height;
        let mut maps: [Vec<f64>; 5] = std::array::from_fn(|_| Vec::with_capacity(cells));
        for row in 0..height {
            for col in 0..width {
                let m = tables.moments(row, col, &mut work);
                maps[0].push(m.mean_x);
                maps[1].push(m.mean_y);
                maps[2].push(m.var_x);
                maps[3].push(m.var_y);
                maps[4].push(m.cov_xy);
            }
        }
        let [mean_x, mean_y, var_x, var_y, cov_xy] =
            maps.map(|data| Matrix::from_parts(data, width, height));
        Ok(LocalStats {
            mean_x,
            mean_y,
            var_x,
            var_y,
            cov_xy,
        })
    }

    fn similarity(&self, a: &Matrix, b: &Matrix, k: Stabilizers) -> SsimResult<SsimMap> {
        self.similarity_with_work(a, b, k, &mut SatWork::default())
    }
}
