//! Loop nesting for the three band orderings.
//!
//! BSQ, BIL and BIP visit the same `(band, line, sample)` positions; they only
//! differ in which axis is the outer, middle and inner loop. A `Traversal`
//! takes that nesting as a descriptor instead of spelling out one loop nest
//! per ordering.

use crate::config::BandOrdering;

/// One axis of the cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Band,
    Line,
    Sample,
}

impl BandOrdering {
    /// Loop nesting, outer axis first.
    pub fn axes(&self) -> [Axis; 3] {
        match self {
            BandOrdering::BSQ => [Axis::Band, Axis::Line, Axis::Sample],
            BandOrdering::BIL => [Axis::Line, Axis::Band, Axis::Sample],
            BandOrdering::BIP => [Axis::Line, Axis::Sample, Axis::Band],
        }
    }
}

/// Iterator over `(band, line, sample)` in raw buffer order.
#[derive(Debug, Clone)]
pub struct Traversal {
    axes: [Axis; 3],
    extents: [usize; 3],
    counters: [usize; 3],
    remaining: usize,
}

impl Traversal {
    pub fn new(ordering: BandOrdering, bands: usize, lines: usize, samples: usize) -> Self {
        let axes = ordering.axes();
        let extent = |axis: Axis| match axis {
            Axis::Band => bands,
            Axis::Line => lines,
            Axis::Sample => samples,
        };
        Self {
            axes,
            extents: [extent(axes[0]), extent(axes[1]), extent(axes[2])],
            counters: [0; 3],
            remaining: bands * lines * samples,
        }
    }

    fn coords(&self) -> (usize, usize, usize) {
        let mut pos = (0, 0, 0);
        for (axis, &value) in self.axes.iter().zip(self.counters.iter()) {
            match axis {
                Axis::Band => pos.0 = value,
                Axis::Line => pos.1 = value,
                Axis::Sample => pos.2 = value,
            }
        }
        pos
    }

    fn advance(&mut self) {
        for level in (0..3).rev() {
            self.counters[level] += 1;
            if self.counters[level] < self.extents[level] {
                return;
            }
            self.counters[level] = 0;
        }
    }
}

impl Iterator for Traversal {
    type Item = (usize, usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let pos = self.coords();
        self.remaining -= 1;
        self.advance();
        Some(pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Traversal {}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested(ordering: BandOrdering, b: usize, l: usize, s: usize) -> Vec<(usize, usize, usize)> {
        let mut out = Vec::new();
        match ordering {
            BandOrdering::BSQ => {
                for band in 0..b {
                    for line in 0..l {
                        for sample in 0..s {
                            out.push((band, line, sample));
                        }
                    }
                }
            }
            BandOrdering::BIL => {
                for line in 0..l {
                    for band in 0..b {
                        for sample in 0..s {
                            out.push((band, line, sample));
                        }
                    }
                }
            }
            BandOrdering::BIP => {
                for line in 0..l {
                    for sample in 0..s {
                        for band in 0..b {
                            out.push((band, line, sample));
                        }
                    }
                }
            }
        }
        out
    }

    #[test]
    fn test_matches_explicit_loops() {
        for ordering in [BandOrdering::BSQ, BandOrdering::BIL, BandOrdering::BIP] {
            let visited: Vec<_> = Traversal::new(ordering, 3, 2, 4).collect();
            assert_eq!(visited, nested(ordering, 3, 2, 4), "ordering {}", ordering);
        }
    }

    #[test]
    fn test_bip_first_positions() {
        let visited: Vec<_> = Traversal::new(BandOrdering::BIP, 2, 2, 2).take(4).collect();
        assert_eq!(visited, vec![(0, 0, 0), (1, 0, 0), (0, 0, 1), (1, 0, 1)]);
    }

    #[test]
    fn test_empty_and_len() {
        assert_eq!(Traversal::new(BandOrdering::BSQ, 0, 5, 5).count(), 0);
        let t = Traversal::new(BandOrdering::BIL, 2, 3, 5);
        assert_eq!(t.len(), 30);
    }
}
