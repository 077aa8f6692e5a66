//! Cooperative single-threaded mapping pass.
//!
//! A host loop that cannot block for a full frame calls
//! [`IncrementalPass::step`] with a pixel quota until the pass reports
//! [`PassStatus::Completed`], then [`IncrementalPass::commit`]s the result.
//! Output accumulates in a private scratch buffer, so the destination is
//! written once, whole, or not at all.
//!
//! If the mapper's curve is invalidated while the pass is running, the next
//! step reports [`PassStatus::Cancelled`] and the scratch buffer is dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use gamut_core::PixelLayout;
use tracing::{debug, warn};

use crate::pipeline::PixelPipeline;
use crate::{MapError, MapResult};

/// Progress of an [`IncrementalPass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStatus {
    /// More pixels remain.
    InProgress {
        /// Pixels mapped so far.
        done: usize,
        /// Pixels in the pass.
        total: usize,
    },
    /// Every pixel is mapped; ready to commit.
    Completed,
    /// The curve changed mid-pass; nothing will be committed.
    Cancelled,
}

impl PassStatus {
    /// True for `Completed` and `Cancelled`.
    #[inline]
    pub fn is_finished(self) -> bool {
        !matches!(self, PassStatus::InProgress { .. })
    }
}

/// Pass over a borrowed source buffer, advanced in bounded steps.
#[derive(Debug)]
pub struct IncrementalPass<'a> {
    pipeline: PixelPipeline,
    src: &'a [f32],
    scratch: Vec<f32>,
    channels: usize,
    scale: f32,
    cursor: usize,
    total: usize,
    generation: Arc<AtomicU64>,
    snapshot: u64,
    status: PassStatus,
}

impl<'a> IncrementalPass<'a> {
    pub(crate) fn new(
        pipeline: PixelPipeline,
        src: &'a [f32],
        layout: PixelLayout,
        scale: f32,
        generation: Arc<AtomicU64>,
        snapshot: u64,
    ) -> MapResult<Self> {
        let total = layout.pixel_count(src.len())?;
        Ok(Self {
            pipeline,
            src,
            scratch: vec![0.0; src.len()],
            channels: layout.channels(),
            scale,
            cursor: 0,
            total,
            generation,
            snapshot,
            status: PassStatus::InProgress { done: 0, total },
        })
    }

    /// Current status.
    #[inline]
    pub fn status(&self) -> PassStatus {
        self.status
    }

    /// Fraction of pixels mapped, in [0, 1].
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.cursor as f32 / self.total as f32
        }
    }

    fn is_stale(&self) -> bool {
        self.generation.load(Ordering::Acquire) != self.snapshot
    }

    /// Maps up to `quota` more pixels (at least one).
    pub fn step(&mut self, quota: usize) -> PassStatus {
        if self.status.is_finished() {
            return self.status;
        }
        if self.is_stale() {
            warn!(done = self.cursor, total = self.total, "curve changed mid-pass, cancelling");
            self.scratch = Vec::new();
            self.status = PassStatus::Cancelled;
            return self.status;
        }

        let end = (self.cursor + quota.max(1)).min(self.total);
        let ch = self.channels;
        let range = self.cursor * ch..end * ch;
        self.pipeline
            .map_slice(&self.src[range.clone()], &mut self.scratch[range], ch, self.scale);
        self.cursor = end;

        self.status = if end == self.total {
            debug!(pixels = self.total, "incremental pass completed");
            PassStatus::Completed
        } else {
            PassStatus::InProgress { done: end, total: self.total }
        };
        self.status
    }

    /// Steps until the pass finishes.
    pub fn run(&mut self, quota: usize) -> PassStatus {
        loop {
            let status = self.step(quota);
            if status.is_finished() {
                return status;
            }
        }
    }

    /// Copies the result into `dst`.
    ///
    /// Fails without touching `dst` if the pass is unfinished, was cancelled,
    /// or the curve changed after it completed.
    pub fn commit(self, dst: &mut [f32]) -> MapResult<()> {
        let out = self.into_output()?;
        if out.len() != dst.len() {
            return Err(gamut_core::Error::size_mismatch(out.len(), dst.len()).into());
        }
        dst.copy_from_slice(&out);
        Ok(())
    }

    /// Takes the mapped buffer.
    pub fn into_output(self) -> MapResult<Vec<f32>> {
        match self.status {
            PassStatus::InProgress { done, total } => Err(MapError::PassIncomplete { done, total }),
            PassStatus::Cancelled => Err(MapError::PassCancelled),
            PassStatus::Completed if self.is_stale() => Err(MapError::PassCancelled),
            PassStatus::Completed => Ok(self.scratch),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{GamutMapper, MapError, MapperConfig, PassStatus};
    use gamut_curve::CurveConfig;

    fn source(pixels: usize) -> Vec<f32> {
        (0..pixels * 3).map(|i| (i % 31) as f32 * 0.1).collect()
    }

    #[test]
    fn test_steps_report_progress() {
        let m = GamutMapper::new(MapperConfig::default()).unwrap();
        let src = source(10);
        let mut pass = m.start_pass(&src, 0.0).unwrap();
        assert_eq!(pass.step(4), PassStatus::InProgress { done: 4, total: 10 });
        assert_eq!(pass.step(4), PassStatus::InProgress { done: 8, total: 10 });
        assert_eq!(pass.step(4), PassStatus::Completed);
        assert_eq!(pass.step(4), PassStatus::Completed);
        assert_eq!(pass.progress(), 1.0);
    }

    #[test]
    fn test_matches_parallel_pass() {
        let m = GamutMapper::new(MapperConfig::default()).unwrap();
        let src = source(1000);
        let mut expect = vec![0.0; src.len()];
        m.map_buffer_into(&src, &mut expect, 0.5).unwrap();

        let mut pass = m.start_pass(&src, 0.5).unwrap();
        assert_eq!(pass.run(64), PassStatus::Completed);
        let mut dst = vec![0.0; src.len()];
        pass.commit(&mut dst).unwrap();
        assert_eq!(dst, expect);
    }

    #[test]
    fn test_cancel_on_param_change() {
        let mut m = GamutMapper::new(MapperConfig::default()).unwrap();
        let src = source(100);
        let mut pass = m.start_pass(&src, 0.0).unwrap();
        pass.step(10);
        m.set_curve_params(CurveConfig::default().with_slope(3.0)).unwrap();
        assert_eq!(pass.step(10), PassStatus::Cancelled);

        let mut dst = vec![-1.0; src.len()];
        assert!(matches!(pass.commit(&mut dst), Err(MapError::PassCancelled)));
        assert!(dst.iter().all(|&v| v == -1.0));
    }

    #[test]
    fn test_commit_requires_completion() {
        let m = GamutMapper::new(MapperConfig::default()).unwrap();
        let src = source(10);
        let mut pass = m.start_pass(&src, 0.0).unwrap();
        pass.step(3);
        let mut dst = vec![0.0; src.len()];
        assert!(matches!(
            pass.commit(&mut dst),
            Err(MapError::PassIncomplete { done: 3, total: 10 })
        ));
    }

    #[test]
    fn test_stale_after_completion() {
        let mut m = GamutMapper::new(MapperConfig::default()).unwrap();
        let src = source(5);
        let mut pass = m.start_pass(&src, 0.0).unwrap();
        assert_eq!(pass.run(100), PassStatus::Completed);
        m.invalidate().unwrap();
        assert!(matches!(pass.into_output(), Err(MapError::PassCancelled)));
    }

    #[test]
    fn test_empty_source() {
        let m = GamutMapper::new(MapperConfig::default()).unwrap();
        let mut pass = m.start_pass(&[], 0.0).unwrap();
        assert_eq!(pass.step(1), PassStatus::Completed);
        assert!(pass.into_output().unwrap().is_empty());
    }
}
