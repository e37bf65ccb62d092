use std::ops::Range;

use log::debug;
use md_core::{Error, FillValues, MorphOp, PixelBuffer, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::line::{LineScratch, apply_line_into};

const FALLBACK_WORKERS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Along every row.
    Horizontal,
    /// Along every column.
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub worker_count: usize,
    pub fill: FillValues,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_count: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(FALLBACK_WORKERS),
            fill: FillValues::default(),
        }
    }
}

/// Runs the line kernels over whole buffers on a fixed-size worker pool.
///
/// Each pass splits the lines into one contiguous range per worker; a worker
/// reads only its own lines and writes only their outputs, so passes need no
/// locking. A pass returns after every worker has joined.
#[derive(Debug)]
pub struct WindowEngine {
    config: EngineConfig,
    pool: rayon::ThreadPool,
}

impl WindowEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let config = EngineConfig {
            worker_count: config.worker_count.max(1),
            ..config
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_count)
            .thread_name(|i| format!("md-window-{i}"))
            .build()
            .map_err(|e| Error::WorkerPool(e.to_string()))?;

        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn fill(&self, op: MorphOp) -> u8 {
        self.config.fill.for_op(op)
    }

    /// Runs `f` inside the engine's pool so nested rayon work uses its workers.
    pub fn install<R, F>(&self, f: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        self.pool.install(f)
    }

    pub fn erode(&self, buf: &mut PixelBuffer, axis: Axis, size: usize) -> Result<()> {
        self.apply(buf, MorphOp::Erode, axis, size)
    }

    pub fn dilate(&self, buf: &mut PixelBuffer, axis: Axis, size: usize) -> Result<()> {
        self.apply(buf, MorphOp::Dilate, axis, size)
    }

    /// Applies a `size`-wide window of `op` along `axis`, in place.
    ///
    /// `size` must be odd; `1` leaves the buffer untouched.
    pub fn apply(&self, buf: &mut PixelBuffer, op: MorphOp, axis: Axis, size: usize) -> Result<()> {
        buf.ensure_single_channel()?;
        let len = match axis {
            Axis::Horizontal => buf.width(),
            Axis::Vertical => buf.height(),
        };
        if size % 2 == 0 {
            return Err(Error::InvalidWindow { size, len });
        }
        if size == 1 || buf.is_empty() {
            return Ok(());
        }

        debug!(
            "{op:?} {axis:?} size={size} on {}x{} with {} workers",
            buf.width(),
            buf.height(),
            self.config.worker_count
        );

        let fill = self.fill(op);
        match axis {
            Axis::Horizontal => self.rows(buf, op, size, fill),
            Axis::Vertical => self.cols(buf, op, size, fill),
        }
        Ok(())
    }

    fn rows(&self, buf: &mut PixelBuffer, op: MorphOp, size: usize, fill: u8) {
        let width = buf.width();
        let chunks = line_chunks(buf.height(), self.config.worker_count);

        let mut blocks = Vec::with_capacity(chunks.len());
        let mut rest: &mut [u8] = buf.data_mut();
        for range in &chunks {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len() * width);
            blocks.push(head);
            rest = tail;
        }

        self.pool.install(|| {
            blocks.into_par_iter().for_each(|block| {
                let mut scratch = LineScratch::new(size);
                let mut line = vec![0u8; width];
                for row in block.chunks_exact_mut(width) {
                    line.copy_from_slice(row);
                    apply_line_into(op, &line, size, fill, &mut scratch, row);
                }
            });
        });
    }

    fn cols(&self, buf: &mut PixelBuffer, op: MorphOp, size: usize, fill: u8) {
        let height = buf.height();
        let chunks = line_chunks(buf.width(), self.config.worker_count);
        let src = &*buf;

        let results: Vec<Vec<u8>> = self.pool.install(|| {
            chunks
                .par_iter()
                .map(|range| {
                    let mut scratch = LineScratch::new(size);
                    let mut line = vec![0u8; height];
                    let mut block = vec![0u8; range.len() * height];
                    for (x, out) in range.clone().zip(block.chunks_exact_mut(height)) {
                        src.column_into(x, &mut line);
                        apply_line_into(op, &line, size, fill, &mut scratch, out);
                    }
                    block
                })
                .collect()
        });

        for (range, block) in chunks.iter().zip(results) {
            for (x, column) in range.clone().zip(block.chunks_exact(height)) {
                buf.set_column(x, column);
            }
        }
    }
}

/// Splits `lines` into at most `workers` contiguous ranges covering every
/// line exactly once. The last range absorbs the remainder.
pub fn line_chunks(lines: usize, workers: usize) -> Vec<Range<usize>> {
    if lines == 0 {
        return Vec::new();
    }

    let workers = workers.clamp(1, lines);
    let chunk = lines / workers;
    (0..workers)
        .map(|i| {
            let start = i * chunk;
            let end = if i + 1 == workers { lines } else { start + chunk };
            start..end
        })
        .collect()
}
