//! Square wall grid: generation and circle-versus-cell collision.

use arena_core::{MapTuning, Obstacles, Vec3};
use rand::Rng;

/// Side length, in cells, of each randomly placed block.
const BLOCK_SIDE: u32 = 2;

/// Re-rolls allowed per block before it is skipped.
const BLOCK_ATTEMPTS: u32 = 32;

/// Contents of one grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Walkable floor.
    #[default]
    Open,
    /// Solid wall block.
    Wall,
}

/// Arena layout indexed by `(column, row)`, where the column runs along `x`
/// and the row along `z`.
///
/// Cell `(i, j)` is centred at `(i * cell_size - offset, 0, j * cell_size - offset)`
/// with `offset = size * cell_size / 2`, so the grid straddles the origin.
#[derive(Clone, Debug)]
pub struct ArenaMap {
    size: u32,
    cell_size: f32,
    cells: Vec<Cell>,
    walls: Vec<Vec3>,
}

impl ArenaMap {
    /// Creates an all-open grid with the tuned dimensions.
    #[must_use]
    pub fn new(tuning: &MapTuning) -> Self {
        let size = tuning.size;
        Self {
            size,
            cell_size: tuning.cell_size,
            cells: vec![Cell::Open; (size as usize) * (size as usize)],
            walls: Vec::new(),
        }
    }

    /// Regenerates the layout: a closed border plus randomly placed 2x2 blocks.
    ///
    /// Blocks whose footprint would touch the square of `spawn_clearing` cells
    /// around the centre cell are re-rolled, keeping the player's spawn open.
    /// Returns the number of blocks placed.
    pub fn generate<R>(&mut self, tuning: &MapTuning, rng: &mut R) -> u32
    where
        R: Rng + ?Sized,
    {
        self.size = tuning.size;
        self.cell_size = tuning.cell_size;
        self.cells.clear();
        self.cells
            .resize((self.size as usize) * (self.size as usize), Cell::Open);

        let Some(last) = self.size.checked_sub(1) else {
            self.walls.clear();
            return 0;
        };
        for index in 0..self.size {
            self.set_wall(index, 0);
            self.set_wall(index, last);
            self.set_wall(0, index);
            self.set_wall(last, index);
        }

        let centre = self.size / 2;
        let clearing = tuning.spawn_clearing;
        let upper = self.size.saturating_sub(2);
        let mut placed = 0;
        for _ in 0..tuning.wall_blocks {
            if upper <= 2 {
                break;
            }
            for _ in 0..BLOCK_ATTEMPTS {
                let column = rng.gen_range(2..upper);
                let row = rng.gen_range(2..upper);
                if touches_clearing(column, centre, clearing)
                    && touches_clearing(row, centre, clearing)
                {
                    continue;
                }
                for dx in 0..BLOCK_SIDE {
                    for dz in 0..BLOCK_SIDE {
                        self.set_wall(column + dx, row + dz);
                    }
                }
                placed += 1;
                break;
            }
        }

        self.rebuild_walls();
        placed
    }

    /// Number of cells along each side.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Side length of a cell in world units.
    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Distance from the origin to the centre of cell zero along each axis.
    #[must_use]
    pub fn offset(&self) -> f32 {
        self.size as f32 * self.cell_size / 2.0
    }

    /// Contents of the cell, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, column: i64, row: i64) -> Option<Cell> {
        let size = i64::from(self.size);
        if column < 0 || row < 0 || column >= size || row >= size {
            return None;
        }
        self.cells.get((row * size + column) as usize).copied()
    }

    /// Reports whether the cell holds a wall. Cells outside the grid do not.
    #[must_use]
    pub fn is_wall(&self, column: i64, row: i64) -> bool {
        self.cell(column, row) == Some(Cell::Wall)
    }

    /// World-space centre of a cell.
    #[must_use]
    pub fn cell_center(&self, column: i64, row: i64) -> Vec3 {
        let offset = self.offset();
        Vec3::new(
            column as f32 * self.cell_size - offset,
            0.0,
            row as f32 * self.cell_size - offset,
        )
    }

    /// Grid coordinates whose cell origin lies nearest below the position.
    #[must_use]
    pub fn cell_at(&self, position: Vec3) -> (i64, i64) {
        let offset = self.offset();
        (
            ((position.x + offset) / self.cell_size).floor() as i64,
            ((position.z + offset) / self.cell_size).floor() as i64,
        )
    }

    /// World-space centres of every wall cell, in row-major order.
    #[must_use]
    pub fn walls(&self) -> &[Vec3] {
        &self.walls
    }

    /// Axis-aligned square test against the 3x3 neighbourhood of the
    /// position's cell. Overlap is strict, so touching edges do not collide.
    #[must_use]
    pub fn collides(&self, position: Vec3, radius: f32) -> bool {
        let half = self.cell_size / 2.0;
        // Far-off positions saturate in `cell_at`; pin them next to the grid.
        let limit = i64::from(self.size);
        let (column, row) = self.cell_at(position);
        let (column, row) = (column.clamp(-1, limit), row.clamp(-1, limit));

        for neighbour_column in column - 1..=column + 1 {
            for neighbour_row in row - 1..=row + 1 {
                if !self.is_wall(neighbour_column, neighbour_row) {
                    continue;
                }
                let wall = self.cell_center(neighbour_column, neighbour_row);
                if position.x - radius < wall.x + half
                    && position.x + radius > wall.x - half
                    && position.z - radius < wall.z + half
                    && position.z + radius > wall.z - half
                {
                    return true;
                }
            }
        }
        false
    }

    fn set_wall(&mut self, column: u32, row: u32) {
        let index = (row as usize) * (self.size as usize) + column as usize;
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = Cell::Wall;
        }
    }

    fn rebuild_walls(&mut self) {
        self.walls.clear();
        let size = i64::from(self.size);
        for row in 0..size {
            for column in 0..size {
                if self.is_wall(column, row) {
                    self.walls.push(self.cell_center(column, row));
                }
            }
        }
    }
}

impl Obstacles for ArenaMap {
    fn collides(&self, position: Vec3, radius: f32) -> bool {
        ArenaMap::collides(self, position, radius)
    }
}

/// Whether a block starting at `start` overlaps the clearing along one axis.
fn touches_clearing(start: u32, centre: u32, clearing: u32) -> bool {
    start + BLOCK_SIDE > centre.saturating_sub(clearing) && start <= centre + clearing
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn generated(seed: u64) -> ArenaMap {
        let tuning = MapTuning::default();
        let mut map = ArenaMap::new(&tuning);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let _ = map.generate(&tuning, &mut rng);
        map
    }

    #[test]
    fn border_is_closed() {
        let map = generated(1);
        let last = i64::from(map.size()) - 1;
        for index in 0..=last {
            assert!(map.is_wall(index, 0));
            assert!(map.is_wall(index, last));
            assert!(map.is_wall(0, index));
            assert!(map.is_wall(last, index));
        }
    }

    #[test]
    fn centre_stays_open_for_every_seed() {
        for seed in 0..64 {
            let map = generated(seed);
            assert!(!map.collides(Vec3::ZERO, 1.0), "seed {seed} blocked the spawn");
        }
    }

    #[test]
    fn every_requested_block_is_placed_with_default_tuning() {
        let tuning = MapTuning::default();
        let mut map = ArenaMap::new(&tuning);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        assert_eq!(map.generate(&tuning, &mut rng), tuning.wall_blocks);
    }

    #[test]
    fn wall_centre_collides_even_with_zero_radius() {
        let map = generated(2);
        for wall in map.walls() {
            assert!(map.collides(*wall, 0.0), "wall at {wall:?} missed");
        }
    }

    #[test]
    fn touching_a_wall_edge_is_not_a_collision() {
        let map = generated(3);
        // Column 1 is never covered by a random block, so only the border is near.
        let wall = map.cell_center(0, i64::from(map.size()) / 2);

        let touching = Vec3::new(wall.x + map.cell_size() / 2.0 + 1.0, 0.0, wall.z);
        let overlapping = Vec3::new(touching.x - 0.01, 0.0, wall.z);
        assert!(!map.collides(touching, 1.0));
        assert!(map.collides(overlapping, 1.0));
    }

    #[test]
    fn wall_list_matches_grid() {
        let map = generated(4);
        let size = i64::from(map.size());
        let mut count = 0;
        for row in 0..size {
            for column in 0..size {
                if map.is_wall(column, row) {
                    count += 1;
                }
            }
        }
        assert_eq!(map.walls().len(), count);
        assert!(map.walls().iter().all(|wall| wall.y == 0.0));
    }

    #[test]
    fn queries_outside_the_grid_never_collide() {
        let map = generated(5);
        assert!(!map.collides(Vec3::new(10_000.0, 0.0, -10_000.0), 1.0));
        assert_eq!(map.cell(-1, 0), None);
        assert!(!map.collides(Vec3::new(f32::NAN, 0.0, 0.0), 1.0));
        assert!(!map.collides(Vec3::new(1.0e30, 0.0, 0.0), 1.0));
        assert!(!map.collides(Vec3::new(-1.0e30, 0.0, 1.0e30), 1.0));
        assert!(!map.collides(Vec3::new(f32::INFINITY, 0.0, f32::NEG_INFINITY), 1.0));
    }
}
