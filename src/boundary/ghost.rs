//! Ghost-plane copies along one direction.

use crate::field::GridField;
use crate::types::{CellIndex, Direction};

/// Copy the whole plane at index `src` along `dir` onto index `dst`, for
/// component `v`, optionally negating it.
pub(super) fn copy_plane(field: &mut GridField, v: usize, dir: Direction, dst: usize, src: usize, sign: f64) {
    let [nk, nj, ni] = field.shape;
    match dir {
        Direction::X1 => {
            for k in 0..nk {
                for j in 0..nj {
                    let row = field.offset(v, CellIndex::new(k, j, 0));
                    field.data[row + dst] = sign * field.data[row + src];
                }
            }
        }
        Direction::X2 => {
            for k in 0..nk {
                let to = field.offset(v, CellIndex::new(k, dst, 0));
                let from = field.offset(v, CellIndex::new(k, src, 0));
                copy_run(&mut field.data, from, to, ni, sign);
            }
        }
        Direction::X3 => {
            let to = field.offset(v, CellIndex::new(dst, 0, 0));
            let from = field.offset(v, CellIndex::new(src, 0, 0));
            copy_run(&mut field.data, from, to, nj * ni, sign);
        }
    }
}

fn copy_run(data: &mut [f64], from: usize, to: usize, len: usize, sign: f64) {
    data.copy_within(from..from + len, to);
    if sign != 1.0 {
        for value in &mut data[to..to + len] {
            *value *= sign;
        }
    }
}
