use log::{debug, info};
use md_core::{Error, PixelBuffer, Result};

use crate::partition::{Partition, PartitionQueue};
use crate::shape::{Edge, ShapeAnalyzer, clear_run, scan_run};

/// Splits a symmetric binary structuring element into partitions whose
/// footprints together reproduce it exactly.
///
/// Each iteration analyzes the residual element, enqueues the resulting
/// partition and peels the residual's outermost runs. Peeling stops once the
/// residual is empty, or once the sparse offsets are at most 1 and the last
/// partition covers everything left.
///
/// Fails without returning a partial queue if any residual is not symmetric,
/// or with [`Error::InexactDecomposition`] if the footprints do not match the
/// element (for example a symmetric but non-convex shape).
pub fn decompose(se: &PixelBuffer) -> Result<PartitionQueue> {
    ShapeAnalyzer::new(se)?;

    let mut residual = se.to_binary(1);
    let mut queue = PartitionQueue::new();

    loop {
        let partition = ShapeAnalyzer::new(&residual)?.analyze()?;
        debug!(
            "partition {}: cubic {}x{}, sparse t{} b{} l{} r{}",
            queue.len(),
            partition.cubic.width,
            partition.cubic.height,
            partition.sparse.top,
            partition.sparse.bottom,
            partition.sparse.left,
            partition.sparse.right
        );
        queue.enqueue(partition);

        if partition.sparse.top <= 1
            && partition.sparse.left <= 1
            && covers_residual(&partition, &residual)
        {
            break;
        }

        remove_partition(&mut residual);
        if residual.foreground_count() == 0 {
            break;
        }
    }

    verify(se, &queue)?;
    info!(
        "decomposed {}x{} element into {} partitions",
        se.width(),
        se.height(),
        queue.len()
    );
    Ok(queue)
}

/// Clears the first maximal run from each edge, in peel order, re-scanning
/// the residual after every clear.
pub fn remove_partition(residual: &mut PixelBuffer) {
    for edge in Edge::PEEL_ORDER {
        if let Some(run) = scan_run(residual, edge) {
            clear_run(residual, &run);
        }
    }
}

fn covers_residual(partition: &Partition, residual: &PixelBuffer) -> bool {
    let cy = (residual.height() / 2) as isize;
    let cx = (residual.width() / 2) as isize;
    (0..residual.height()).all(|y| {
        residual
            .row(y)
            .iter()
            .enumerate()
            .all(|(x, &v)| v == 0 || partition.covers(y as isize - cy, x as isize - cx))
    })
}

/// Union of all footprints, painted on a canvas the size of `se`.
pub fn footprint_union(se: &PixelBuffer, queue: &PartitionQueue) -> PixelBuffer {
    let mut union = PixelBuffer::new_fill(se.width(), se.height(), 0);
    for partition in queue.iter() {
        partition.paint(&mut union);
    }
    union
}

fn verify(se: &PixelBuffer, queue: &PartitionQueue) -> Result<()> {
    let (qy, qx) = queue.half_extent();
    let (ry, rx) = (qy.max(se.height() / 2), qx.max(se.width() / 2));
    let (my, mx) = (ry - se.height() / 2, rx - se.width() / 2);

    let want = se.padded(mx, my, 0)?;
    let got = footprint_union(&want, queue);

    let (mut missing, mut extra) = (0usize, 0usize);
    for (&w, &g) in want.data().iter().zip(got.data()) {
        match (w != 0, g != 0) {
            (true, false) => missing += 1,
            (false, true) => extra += 1,
            _ => {}
        }
    }

    if missing > 0 || extra > 0 {
        return Err(Error::InexactDecomposition { missing, extra });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use md_core::{Error, PixelBuffer};

    use super::{decompose, footprint_union, remove_partition};
    use crate::se::{diamond_se, disc_se, rect_se};

    fn shape(width: usize, height: usize, rows: &[&str]) -> PixelBuffer {
        let data = rows
            .iter()
            .flat_map(|r| r.bytes().map(|b| if b == b'#' { 255 } else { 0 }))
            .collect();
        PixelBuffer::from_vec(width, height, 1, data).expect("valid shape")
    }

    fn summary(se: &PixelBuffer) -> Vec<(usize, usize, usize, usize)> {
        decompose(se)
            .expect("decomposable")
            .iter()
            .map(|p| (p.cubic.width, p.cubic.height, p.sparse.top, p.sparse.left))
            .collect()
    }

    #[test]
    fn square_is_single_cubic_partition() {
        assert_eq!(summary(&rect_se(3, 3)), vec![(3, 3, 0, 0)]);
        assert_eq!(summary(&rect_se(7, 3)), vec![(7, 3, 0, 0)]);
    }

    #[test]
    fn small_discs() {
        assert_eq!(summary(&disc_se(1)), vec![(1, 1, 0, 0)]);
        assert_eq!(summary(&disc_se(3)), vec![(5, 5, 0, 0)]);
        assert_eq!(summary(&disc_se(4)), vec![(5, 5, 1, 1)]);
    }

    #[test]
    fn disc_nine_peels_three_partitions() {
        assert_eq!(
            summary(&disc_se(9)),
            vec![(9, 9, 4, 4), (11, 11, 2, 2), (13, 13, 0, 0)]
        );
    }

    #[test]
    fn discs_terminate_with_strictly_shrinking_offsets() {
        for radius in 1..=15 {
            let se = disc_se(radius);
            let queue = decompose(&se).expect("disc decomposes");

            assert!(queue.len() <= radius, "radius {radius}: {}", queue.len());
            let offsets: Vec<usize> = queue.iter().map(|p| p.sparse.top).collect();
            assert!(
                offsets.windows(2).all(|w| w[0] > w[1]),
                "radius {radius}: {offsets:?}"
            );
            assert_eq!(footprint_union(&se, &queue), se, "radius {radius}");
        }
    }

    #[test]
    fn diamond_and_plus() {
        assert_eq!(summary(&diamond_se(2)), vec![(1, 1, 2, 2), (3, 3, 0, 0)]);

        let plus = shape(3, 3, &[".#.", "###", ".#."]);
        assert_eq!(summary(&plus), vec![(1, 1, 1, 1), (1, 1, 0, 0)]);
    }

    #[test]
    fn decomposition_is_deterministic() {
        let se = disc_se(12);
        assert_eq!(decompose(&se).expect("disc"), decompose(&se).expect("disc"));
    }

    #[test]
    fn rejects_asymmetric_and_degenerate_elements() {
        let l = shape(3, 3, &["#..", "#..", "###"]);
        assert!(matches!(decompose(&l), Err(Error::NonSymmetricShape { .. })));
        assert!(matches!(
            decompose(&PixelBuffer::new_fill(3, 3, 0)),
            Err(Error::EmptyShape)
        ));
        assert!(matches!(
            decompose(&PixelBuffer::new_fill(2, 2, 255)),
            Err(Error::EvenShape { .. })
        ));
    }

    #[test]
    fn ring_is_not_reproducible() {
        let ring = shape(
            5,
            5,
            &["#####", "#####", "##.##", "#####", "#####"],
        );
        assert!(matches!(
            decompose(&ring),
            Err(Error::InexactDecomposition {
                missing: 0,
                extra: 1
            })
        ));
    }

    #[test]
    fn peeling_clears_outer_runs() {
        let mut se = rect_se(3, 3);
        remove_partition(&mut se);
        assert_eq!(se.foreground_count(), 1);
        assert_eq!(se.get(1, 1), Some(255));
    }
}
