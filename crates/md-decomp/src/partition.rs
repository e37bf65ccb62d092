use std::collections::VecDeque;

use md_core::PixelBuffer;
use serde::{Deserialize, Serialize};

/// Rectangle replayed as a horizontal then a vertical sliding window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CubicFactor {
    pub width: usize,
    pub height: usize,
}

/// Offsets of the four taps replayed after the cubic factor.
///
/// `top`/`bottom` are row offsets above/below the centre, `left`/`right`
/// column offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SparseFactor {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl SparseFactor {
    pub fn is_identity(&self) -> bool {
        self.top == 0 && self.bottom == 0 && self.left == 0 && self.right == 0
    }

    /// `(row, col)` offsets of the up, down, left and right taps.
    pub fn taps(&self) -> [(isize, isize); 4] {
        [
            (-(self.top as isize), 0),
            (self.bottom as isize, 0),
            (0, -(self.left as isize)),
            (0, self.right as isize),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Partition {
    pub cubic: CubicFactor,
    pub sparse: SparseFactor,
}

impl Partition {
    /// Whether `(dy, dx)`, relative to the SE centre, lies in one of the four
    /// cubic rectangles placed at the sparse taps.
    pub fn covers(&self, dy: isize, dx: isize) -> bool {
        let hy = (self.cubic.height / 2) as isize;
        let hx = (self.cubic.width / 2) as isize;
        self.sparse
            .taps()
            .iter()
            .any(|&(ty, tx)| (dy - ty).abs() <= hy && (dx - tx).abs() <= hx)
    }

    /// `(rows, cols)` distance from the centre to the footprint's far edge.
    pub fn half_extent(&self) -> (usize, usize) {
        (
            self.sparse.top.max(self.sparse.bottom) + self.cubic.height / 2,
            self.sparse.left.max(self.sparse.right) + self.cubic.width / 2,
        )
    }

    /// All `(row, col)` offsets this partition stands for.
    pub fn footprint(&self) -> Vec<(isize, isize)> {
        let (ry, rx) = self.half_extent();
        let (ry, rx) = (ry as isize, rx as isize);
        let mut out = Vec::new();
        for dy in -ry..=ry {
            for dx in -rx..=rx {
                if self.covers(dy, dx) {
                    out.push((dy, dx));
                }
            }
        }
        out
    }

    /// Sets every footprint pixel of `mask`, centred on the mask's centre, to
    /// 255. Offsets outside the mask are skipped.
    pub fn paint(&self, mask: &mut PixelBuffer) {
        let cy = (mask.height() / 2) as isize;
        let cx = (mask.width() / 2) as isize;
        for (dy, dx) in self.footprint() {
            let (y, x) = (cy + dy, cx + dx);
            if y < 0 || x < 0 {
                continue;
            }
            if let Some(px) = mask.get_mut(x as usize, y as usize) {
                *px = u8::MAX;
            }
        }
    }
}

/// FIFO of partitions, in the order the decomposer peeled them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionQueue {
    items: VecDeque<Partition>,
}

impl PartitionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, partition: Partition) {
        self.items.push_back(partition);
    }

    pub fn dequeue(&mut self) -> Option<Partition> {
        self.items.pop_front()
    }

    pub fn front(&self) -> Option<&Partition> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Partition> {
        self.items.iter()
    }

    /// Largest half extent over all partitions, as `(rows, cols)`.
    pub fn half_extent(&self) -> (usize, usize) {
        self.items.iter().fold((0, 0), |(ry, rx), p| {
            let (py, px) = p.half_extent();
            (ry.max(py), rx.max(px))
        })
    }
}

impl FromIterator<Partition> for PartitionQueue {
    fn from_iter<I: IntoIterator<Item = Partition>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PartitionQueue {
    type Item = Partition;
    type IntoIter = std::collections::vec_deque::IntoIter<Partition>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
