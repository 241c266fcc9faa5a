use thiserror::Error;

/// Code reported for coordinates outside the grid.
pub const FILLER_CODE: u8 = b'.';

const LEGEND_SLOTS: usize = 128;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileKind {
    pub visual: Option<u16>,
    pub solid: bool,
}

impl TileKind {
    pub const EMPTY: TileKind = TileKind {
        visual: None,
        solid: false,
    };

    pub const fn solid(visual: u16) -> Self {
        Self {
            visual: Some(visual),
            solid: true,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LevelError {
    #[error("level has no rows")]
    Empty,
    #[error("level rows have zero width")]
    ZeroWidth,
    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row} column {column} holds non-ASCII tile code")]
    NonAsciiTile { row: usize, column: usize },
    #[error("legend code {code:?} is not ASCII")]
    NonAsciiLegendCode { code: char },
    #[error("legend code {code:?} is defined more than once")]
    DuplicateLegendCode { code: char },
    #[error("tile size must be a positive finite number, got {0}")]
    InvalidTileSize(f32),
}

/// Tile code to terrain lookup, one slot per ASCII code.
#[derive(Debug, Clone)]
pub struct Legend {
    slots: [Option<TileKind>; LEGEND_SLOTS],
}

impl Legend {
    pub fn new(entries: &[(char, TileKind)]) -> Result<Self, LevelError> {
        let mut slots = [None; LEGEND_SLOTS];
        for &(code, kind) in entries {
            let slot = legend_slot(code).ok_or(LevelError::NonAsciiLegendCode { code })?;
            if slots[slot].replace(kind).is_some() {
                return Err(LevelError::DuplicateLegendCode { code });
            }
        }
        Ok(Self { slots })
    }

    /// Unknown codes read as empty, non-solid terrain.
    pub fn kind(&self, code: u8) -> TileKind {
        self.slots
            .get(code as usize)
            .copied()
            .flatten()
            .unwrap_or(TileKind::EMPTY)
    }

    pub fn contains(&self, code: u8) -> bool {
        matches!(self.slots.get(code as usize), Some(Some(_)))
    }
}

fn legend_slot(code: char) -> Option<usize> {
    code.is_ascii().then_some(code as usize)
}

/// Immutable terrain grid. Columns grow rightward, rows grow downward.
#[derive(Debug, Clone)]
pub struct TileWorld {
    width: usize,
    height: usize,
    tile_size: f32,
    codes: Vec<u8>,
    legend: Legend,
}

impl TileWorld {
    pub fn new<S: AsRef<str>>(
        rows: &[S],
        legend: Legend,
        tile_size: f32,
    ) -> Result<Self, LevelError> {
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(LevelError::InvalidTileSize(tile_size));
        }
        let first = rows.first().ok_or(LevelError::Empty)?;
        let width = first.as_ref().len();
        if width == 0 {
            return Err(LevelError::ZeroWidth);
        }

        let mut codes = Vec::with_capacity(width * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if let Some(column) = row.chars().position(|code| !code.is_ascii()) {
                return Err(LevelError::NonAsciiTile {
                    row: row_index,
                    column,
                });
            }
            if row.len() != width {
                return Err(LevelError::RaggedRow {
                    row: row_index,
                    expected: width,
                    found: row.len(),
                });
            }
            codes.extend_from_slice(row.as_bytes());
        }

        Ok(Self {
            width,
            height: rows.len(),
            tile_size,
            codes,
            legend,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * self.tile_size
    }

    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * self.tile_size
    }

    pub fn tile_at(&self, column: i32, row: i32) -> u8 {
        self.index(column, row)
            .map_or(FILLER_CODE, |index| self.codes[index])
    }

    pub fn kind_at(&self, column: i32, row: i32) -> TileKind {
        self.legend.kind(self.tile_at(column, row))
    }

    pub fn is_solid(&self, column: i32, row: i32) -> bool {
        self.kind_at(column, row).solid
    }

    /// Tile index containing a world coordinate.
    pub fn tile_index(&self, coordinate: f32) -> i32 {
        (coordinate / self.tile_size).floor() as i32
    }

    pub fn solid_tile_count(&self) -> usize {
        self.codes
            .iter()
            .filter(|code| self.legend.kind(**code).solid)
            .count()
    }

    pub fn unknown_code_count(&self) -> usize {
        self.codes
            .iter()
            .filter(|code| !self.legend.contains(**code))
            .count()
    }

    fn index(&self, column: i32, row: i32) -> Option<usize> {
        let column = usize::try_from(column).ok()?;
        let row = usize::try_from(row).ok()?;
        (column < self.width && row < self.height).then(|| row * self.width + column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legend() -> Legend {
        Legend::new(&[('#', TileKind::solid(2)), ('.', TileKind::EMPTY)]).expect("legend")
    }

    #[test]
    fn lookups_follow_row_major_layout() {
        let world = TileWorld::new(&["..#", "#.."], legend(), 64.0).expect("world");
        assert_eq!((world.width(), world.height()), (3, 2));
        assert!(world.is_solid(2, 0));
        assert!(world.is_solid(0, 1));
        assert!(!world.is_solid(1, 1));
        assert_eq!(world.kind_at(2, 0).visual, Some(2));
        assert_eq!(world.pixel_width(), 192.0);
        assert_eq!(world.pixel_height(), 128.0);
    }

    #[test]
    fn out_of_bounds_reads_filler_and_is_not_solid() {
        let world = TileWorld::new(&["###"], legend(), 64.0).expect("world");
        for (column, row) in [(-1, 0), (3, 0), (0, -1), (0, 1), (i32::MIN, i32::MAX)] {
            assert_eq!(world.tile_at(column, row), FILLER_CODE);
            assert!(!world.is_solid(column, row));
        }
    }

    #[test]
    fn unknown_code_degrades_to_empty() {
        let world = TileWorld::new(&["#?"], legend(), 64.0).expect("world");
        assert_eq!(world.kind_at(1, 0), TileKind::EMPTY);
        assert_eq!(world.unknown_code_count(), 1);
        assert_eq!(world.solid_tile_count(), 1);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let error = TileWorld::new(&["###", "##"], legend(), 64.0).expect_err("ragged");
        assert_eq!(
            error,
            LevelError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn empty_level_and_bad_tile_size_are_rejected() {
        let no_rows: [&str; 0] = [];
        assert_eq!(
            TileWorld::new(&no_rows, legend(), 64.0).expect_err("empty"),
            LevelError::Empty
        );
        assert_eq!(
            TileWorld::new(&[""], legend(), 64.0).expect_err("zero width"),
            LevelError::ZeroWidth
        );
        assert!(matches!(
            TileWorld::new(&["#"], legend(), 0.0),
            Err(LevelError::InvalidTileSize(_))
        ));
    }

    #[test]
    fn non_ascii_tiles_are_rejected() {
        assert_eq!(
            TileWorld::new(&["#é"], legend(), 64.0).expect_err("non-ascii"),
            LevelError::NonAsciiTile { row: 0, column: 1 }
        );
    }

    #[test]
    fn legend_rejects_duplicates() {
        let error = Legend::new(&[('#', TileKind::solid(1)), ('#', TileKind::solid(2))])
            .expect_err("duplicate");
        assert_eq!(error, LevelError::DuplicateLegendCode { code: '#' });
    }

    #[test]
    fn tile_index_floors_negative_coordinates() {
        let world = TileWorld::new(&["#"], legend(), 64.0).expect("world");
        assert_eq!(world.tile_index(63.9), 0);
        assert_eq!(world.tile_index(64.0), 1);
        assert_eq!(world.tile_index(-0.5), -1);
    }
}
