use log::{debug, info};
use md_core::{MorphOp, PixelBuffer, Result};
use md_decomp::{Partition, PartitionQueue};
use md_window::{Axis, EngineConfig, WindowEngine};

use crate::sparse::sparse_pass;

/// Applies partitions to images with a [`WindowEngine`].
#[derive(Debug)]
pub struct Replayer {
    engine: WindowEngine,
}

impl Replayer {
    pub fn new(config: EngineConfig) -> Result<Self> {
        Ok(Self {
            engine: WindowEngine::new(config)?,
        })
    }

    pub fn with_engine(engine: WindowEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &WindowEngine {
        &self.engine
    }

    /// `op` by one partition's footprint, in place: the cubic factor as a
    /// horizontal then a vertical window, followed by the sparse taps.
    pub fn apply_partition(
        &self,
        img: &mut PixelBuffer,
        op: MorphOp,
        partition: &Partition,
    ) -> Result<()> {
        img.ensure_single_channel()?;
        if partition.cubic.width > 1 {
            self.engine
                .apply(img, op, Axis::Horizontal, partition.cubic.width)?;
        }
        if partition.cubic.height > 1 {
            self.engine
                .apply(img, op, Axis::Vertical, partition.cubic.height)?;
        }
        sparse_pass(&self.engine, img, op, &partition.sparse)
    }

    pub fn morph_opening(&self, img: &mut PixelBuffer, partition: &Partition) -> Result<()> {
        self.apply_partition(img, MorphOp::Erode, partition)?;
        self.apply_partition(img, MorphOp::Dilate, partition)
    }

    pub fn morph_closing(&self, img: &mut PixelBuffer, partition: &Partition) -> Result<()> {
        self.apply_partition(img, MorphOp::Dilate, partition)?;
        self.apply_partition(img, MorphOp::Erode, partition)
    }

    /// Drains `queue`, opening `img` by each partition in turn.
    pub fn cascade_opening(&self, img: &mut PixelBuffer, queue: PartitionQueue) -> Result<()> {
        self.cascade(img, queue, MorphOp::Erode)
    }

    /// Drains `queue`, closing `img` by each partition in turn.
    pub fn cascade_closing(&self, img: &mut PixelBuffer, queue: PartitionQueue) -> Result<()> {
        self.cascade(img, queue, MorphOp::Dilate)
    }

    fn cascade(
        &self,
        img: &mut PixelBuffer,
        mut queue: PartitionQueue,
        first: MorphOp,
    ) -> Result<()> {
        let mut index = 0usize;
        while let Some(partition) = queue.dequeue() {
            debug!("cascade step {index}: {partition:?}");
            match first {
                MorphOp::Erode => self.morph_opening(img, &partition)?,
                MorphOp::Dilate => self.morph_closing(img, &partition)?,
            }
            index += 1;
        }
        Ok(())
    }

    /// Erosion by the whole element `queue` was decomposed from.
    ///
    /// Each partition erodes its own padded copy of `img`; the results are
    /// combined pointwise and cropped back to the input size.
    pub fn erode(&self, img: &PixelBuffer, queue: &PartitionQueue) -> Result<PixelBuffer> {
        self.union(img, queue, MorphOp::Erode)
    }

    /// Dilation by the whole element `queue` was decomposed from.
    pub fn dilate(&self, img: &PixelBuffer, queue: &PartitionQueue) -> Result<PixelBuffer> {
        self.union(img, queue, MorphOp::Dilate)
    }

    pub fn opening(&self, img: &PixelBuffer, queue: &PartitionQueue) -> Result<PixelBuffer> {
        let eroded = self.erode(img, queue)?;
        self.dilate(&eroded, queue)
    }

    pub fn closing(&self, img: &PixelBuffer, queue: &PartitionQueue) -> Result<PixelBuffer> {
        let dilated = self.dilate(img, queue)?;
        self.erode(&dilated, queue)
    }

    fn union(
        &self,
        img: &PixelBuffer,
        queue: &PartitionQueue,
        op: MorphOp,
    ) -> Result<PixelBuffer> {
        img.ensure_single_channel()?;
        let (margin_y, margin_x) = queue.half_extent();
        let padded = img.padded(margin_x, margin_y, self.engine.fill(op))?;

        let mut acc: Option<PixelBuffer> = None;
        for partition in queue.iter() {
            let mut part = padded.clone();
            self.apply_partition(&mut part, op, partition)?;
            acc = Some(match acc.take() {
                Some(mut prev) => {
                    combine_into(&mut prev, &part, op);
                    prev
                }
                None => part,
            });
        }

        let Some(acc) = acc else {
            return Ok(img.clone());
        };
        info!(
            "{op:?} by {} partitions on {}x{} (margin {margin_x}x{margin_y})",
            queue.len(),
            img.width(),
            img.height()
        );
        acc.cropped(margin_x, margin_y, img.width(), img.height())
    }
}

fn combine_into(acc: &mut PixelBuffer, other: &PixelBuffer, op: MorphOp) {
    for (a, &b) in acc.data_mut().iter_mut().zip(other.data()) {
        *a = op.combine(*a, b);
    }
}

#[cfg(test)]
mod tests {
    use md_core::{Error, MorphOp, PixelBuffer};
    use md_decomp::{CubicFactor, Partition, PartitionQueue, SparseFactor, decompose, rect_se};
    use md_window::{Axis, EngineConfig};
    use rand::prelude::*;

    use super::Replayer;
    use crate::direct::{closing_direct, erode_direct, opening_direct};

    fn replayer() -> Replayer {
        Replayer::new(EngineConfig {
            worker_count: 3,
            ..Default::default()
        })
        .expect("pool")
    }

    fn random_image(width: usize, height: usize, seed: u64) -> PixelBuffer {
        let mut rng = StdRng::seed_from_u64(seed);
        let data = (0..width * height).map(|_| rng.r#gen::<u8>()).collect();
        PixelBuffer::from_vec(width, height, 1, data).expect("valid image")
    }

    fn square3() -> Partition {
        Partition {
            cubic: CubicFactor {
                width: 3,
                height: 3,
            },
            sparse: SparseFactor::default(),
        }
    }

    #[test]
    fn square_partition_matches_separable_erosion() {
        let r = replayer();
        let img = random_image(12, 9, 21);

        let mut separable = img.clone();
        r.engine()
            .erode(&mut separable, Axis::Horizontal, 3)
            .expect("pass");
        r.engine()
            .erode(&mut separable, Axis::Vertical, 3)
            .expect("pass");

        let mut replayed = img.clone();
        r.apply_partition(&mut replayed, MorphOp::Erode, &square3())
            .expect("replay");
        assert_eq!(replayed, separable);
        assert_eq!(
            replayed,
            erode_direct(&img, &rect_se(3, 3)).expect("direct")
        );
    }

    #[test]
    fn single_partition_cascade_equals_exact_replay() {
        let r = replayer();
        let img = random_image(15, 11, 4);
        let queue = decompose(&rect_se(5, 3)).expect("rect");

        let mut cascaded = img.clone();
        r.cascade_opening(&mut cascaded, queue.clone())
            .expect("cascade");
        assert_eq!(cascaded, r.opening(&img, &queue).expect("exact"));

        let mut cascaded = img.clone();
        r.cascade_closing(&mut cascaded, queue.clone())
            .expect("cascade");
        assert_eq!(cascaded, r.closing(&img, &queue).expect("exact"));
    }

    #[test]
    fn exact_replay_matches_direct_for_plus() {
        let mut data = vec![0u8; 9];
        for i in [1usize, 3, 4, 5, 7] {
            data[i] = 255;
        }
        let plus = PixelBuffer::from_vec(3, 3, 1, data).expect("valid se");
        let queue = decompose(&plus).expect("plus");
        let img = random_image(10, 8, 8);

        let r = replayer();
        assert_eq!(
            r.opening(&img, &queue).expect("exact"),
            opening_direct(&img, &plus).expect("direct")
        );
        assert_eq!(
            r.closing(&img, &queue).expect("exact"),
            closing_direct(&img, &plus).expect("direct")
        );
    }

    #[test]
    fn open_removes_single_pixel_speck() {
        let mut data = vec![0u8; 25];
        data[12] = 255;
        let img = PixelBuffer::from_vec(5, 5, 1, data).expect("valid image");

        let mut out = img.clone();
        replayer().morph_opening(&mut out, &square3()).expect("open");
        assert!(out.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn close_fills_single_pixel_hole() {
        let mut data = vec![255u8; 25];
        data[12] = 0;
        let img = PixelBuffer::from_vec(5, 5, 1, data).expect("valid image");

        let mut out = img.clone();
        replayer().morph_closing(&mut out, &square3()).expect("close");
        assert_eq!(out.data()[12], 255);
    }

    #[test]
    fn empty_queue_returns_input() {
        let img = random_image(4, 4, 2);
        let out = replayer()
            .opening(&img, &PartitionQueue::new())
            .expect("identity");
        assert_eq!(out, img);
    }

    #[test]
    fn color_input_is_rejected() {
        let rgb = PixelBuffer::from_vec(1, 1, 3, vec![1, 2, 3]).expect("valid image");
        let queue = decompose(&rect_se(3, 3)).expect("rect");
        assert!(matches!(
            replayer().erode(&rgb, &queue),
            Err(Error::UnsupportedChannels(3))
        ));
    }
}
