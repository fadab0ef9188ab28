use ndarray::Array2;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(i, j)` — column, then row.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    (a as CellCount).saturating_mul(b as CellCount)
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        let dim = self.dim();
        let size = (dim.0.try_into().unwrap(), dim.1.try_into().unwrap());
        NeighborIter::new(index, size)
    }
}

/// Iterator over the in-bounds Moore neighborhood of a cell: at most 8
/// positions, clipped at board edges and corners.
///
/// Positions are collected eagerly at construction, so the iterator holds
/// no borrow of the grid it came from.
#[derive(Debug)]
pub struct NeighborIter {
    items: [Coord2; 8],
    len: u8,
    index: u8,
}

impl NeighborIter {
    pub(crate) fn new(center: Coord2, bounds: Coord2) -> Self {
        let (ci, cj) = center;
        let (width, height) = bounds;

        let mut items = [(0, 0); 8];
        let mut len: u8 = 0;

        let i_hi = ci.saturating_add(1).min(width.saturating_sub(1));
        let j_hi = cj.saturating_add(1).min(height.saturating_sub(1));
        for i in ci.saturating_sub(1)..=i_hi {
            for j in cj.saturating_sub(1)..=j_hi {
                if (i, j) != center {
                    items[len as usize] = (i, j);
                    len += 1;
                }
            }
        }

        Self {
            items,
            len,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.len {
            let item = self.items[self.index as usize];
            self.index += 1;
            Some(item)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::from(self.len - self.index);
        (remaining, Some(remaining))
    }
}
