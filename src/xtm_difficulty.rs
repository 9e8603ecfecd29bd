// Board dimensions and mine counts
// Presets, the editable custom slot and the clamping rules that keep a first-click safe zone

use std::error::Error;
use std::fmt;

use crate::xtm_grid::SAFE_ZONE_CELLS;

/// Smallest and largest side length accepted for a custom board
pub const CUSTOM_SIDE_MIN: usize = 4;
pub const CUSTOM_SIDE_MAX: usize = 128;

/// Number of entries in the picker: three presets plus the custom slot
pub const PRESET_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DifficultyError {
    IndexOutOfRange(usize),
}

impl fmt::Display for DifficultyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifficultyError::IndexOutOfRange(i) => {
                write!(f, "difficulty field index {} is out of range [0, 2]", i)
            }
        }
    }
}

impl Error for DifficultyError {}

/// Editable fields of a [`Difficulty`], in cursor order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyField {
    Width,
    Height,
    Mines,
}

impl DifficultyField {
    pub const ALL: [DifficultyField; 3] = [
        DifficultyField::Width,
        DifficultyField::Height,
        DifficultyField::Mines,
    ];
}

impl TryFrom<usize> for DifficultyField {
    type Error = DifficultyError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(DifficultyField::Width),
            1 => Ok(DifficultyField::Height),
            2 => Ok(DifficultyField::Mines),
            _ => Err(DifficultyError::IndexOutOfRange(index)),
        }
    }
}

/// Board size and mine count.
/// `mine_count` never exceeds [`Difficulty::possible_max_mines`] once clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Difficulty {
    pub width: usize,
    pub height: usize,
    pub mine_count: usize,
}

impl Difficulty {
    /// Create a difficulty, silently capping the mine count
    pub fn new(width: usize, height: usize, mine_count: usize) -> Self {
        let mut d = Difficulty {
            width: width.max(1),
            height: height.max(1),
            mine_count,
        };
        d.ensure_mines_limit();
        d
    }

    /// Create a difficulty from a mine density in `0.0..=1.0`
    pub fn from_ratio(width: usize, height: usize, ratio: f64) -> Self {
        let cells = width.saturating_mul(height) as f64;
        let mines = (cells * ratio.clamp(0.0, 1.0)).floor() as usize;
        Difficulty::new(width, height, mines)
    }

    /// Cell count, saturating instead of overflowing for absurd sizes
    pub fn cells(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// 90% of the board, reduced further so at least a 3x3 zone stays free
    pub fn possible_max_mines(&self) -> usize {
        let s = self.cells();
        let ninety = s / 10 * 9 + s % 10 * 9 / 10;
        if s - ninety < SAFE_ZONE_CELLS {
            s.saturating_sub(SAFE_ZONE_CELLS)
        } else {
            ninety
        }
    }

    /// Cap `mine_count` to [`Difficulty::possible_max_mines`]. Never raises it.
    pub fn ensure_mines_limit(&mut self) {
        let max = self.possible_max_mines();
        if self.mine_count > max {
            self.mine_count = max;
        }
    }

    /// Read a field by ordinal (0=width, 1=height, 2=mine_count)
    pub fn field(&self, index: usize) -> Result<usize, DifficultyError> {
        Ok(match DifficultyField::try_from(index)? {
            DifficultyField::Width => self.width,
            DifficultyField::Height => self.height,
            DifficultyField::Mines => self.mine_count,
        })
    }

    /// Mutable access to a field by ordinal. Callers re-clamp afterwards.
    pub fn field_mut(&mut self, index: usize) -> Result<&mut usize, DifficultyError> {
        Ok(match DifficultyField::try_from(index)? {
            DifficultyField::Width => &mut self.width,
            DifficultyField::Height => &mut self.height,
            DifficultyField::Mines => &mut self.mine_count,
        })
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Preset::Beginner.params()
    }
}

/// Difficulty presets and the custom slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Beginner,           // 8x8, 8 mines
    Intermediate,       // 16x16, 16 mines
    Expert,             // 28x20, 52 mines
    Custom(Difficulty), // user-edited
}

impl Preset {
    /// Board parameters for this preset
    pub fn params(&self) -> Difficulty {
        match self {
            Preset::Beginner => Difficulty::new(8, 8, 8),
            Preset::Intermediate => Difficulty::new(16, 16, 16),
            Preset::Expert => Difficulty::new(28, 20, 52),
            Preset::Custom(d) => *d,
        }
    }

    /// Stable identifier, used in config files and logs
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Beginner => "Beginner",
            Preset::Intermediate => "Intermediate",
            Preset::Expert => "Expert",
            Preset::Custom(_) => "Custom",
        }
    }

    /// Position in the picker (0-3)
    pub fn to_index(&self) -> usize {
        match self {
            Preset::Beginner => 0,
            Preset::Intermediate => 1,
            Preset::Expert => 2,
            Preset::Custom(_) => 3,
        }
    }

    /// Inverse of [`Preset::to_index`]; any index past the presets is the custom slot
    pub fn from_index(i: usize, custom: Difficulty) -> Preset {
        match i {
            0 => Preset::Beginner,
            1 => Preset::Intermediate,
            2 => Preset::Expert,
            _ => Preset::Custom(custom),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Preset::Custom(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_mines_is_ninety_percent_on_large_boards() {
        let d = Difficulty::new(10, 10, 0);
        assert_eq!(d.possible_max_mines(), 90);
        let d = Difficulty::new(30, 16, 0);
        assert_eq!(d.possible_max_mines(), 432);
    }

    #[test]
    fn max_mines_keeps_safe_zone_on_small_boards() {
        assert_eq!(Difficulty::new(4, 4, 0).possible_max_mines(), 7);
        assert_eq!(Difficulty::new(9, 9, 0).possible_max_mines(), 72);
        assert_eq!(Difficulty::new(2, 2, 0).possible_max_mines(), 0);
        for w in 1..20 {
            for h in 1..20 {
                let d = Difficulty::new(w, h, 0);
                assert!(d.possible_max_mines() <= (w * h).saturating_sub(9));
            }
        }
    }

    #[test]
    fn clamping_caps_and_is_idempotent() {
        let mut d = Difficulty {
            width: 8,
            height: 8,
            mine_count: 1000,
        };
        d.ensure_mines_limit();
        let once = d.mine_count;
        d.ensure_mines_limit();
        assert_eq!(d.mine_count, once);
        assert_eq!(once, 55);

        let mut small = Difficulty {
            width: 8,
            height: 8,
            mine_count: 3,
        };
        small.ensure_mines_limit();
        assert_eq!(small.mine_count, 3);
    }

    #[test]
    fn huge_sides_do_not_overflow() {
        let d = Difficulty::new(usize::MAX, usize::MAX, usize::MAX);
        assert_eq!(d.cells(), usize::MAX);
        assert!(d.mine_count < d.cells());
        assert_eq!(d.mine_count, d.possible_max_mines());
        let r = Difficulty::from_ratio(usize::MAX / 2, 3, 0.5);
        assert!(r.mine_count <= r.possible_max_mines());
    }

    #[test]
    fn field_access_by_index() {
        let mut d = Difficulty::new(12, 7, 20);
        assert_eq!(d.field(0), Ok(12));
        assert_eq!(d.field(1), Ok(7));
        assert_eq!(d.field(2), Ok(20));
        *d.field_mut(1).unwrap() = 9;
        assert_eq!(d.height, 9);
        assert_eq!(d.field(3), Err(DifficultyError::IndexOutOfRange(3)));
        assert!(d.field_mut(42).is_err());
    }

    #[test]
    fn from_ratio_is_clamped() {
        let d = Difficulty::from_ratio(9, 9, 0.2);
        assert_eq!(d.mine_count, 16);
        let d = Difficulty::from_ratio(9, 9, 1.0);
        assert_eq!(d.mine_count, d.possible_max_mines());
    }

    #[test]
    fn preset_index_round_trip() {
        let custom = Difficulty::new(20, 10, 30);
        for i in 0..PRESET_COUNT {
            assert_eq!(Preset::from_index(i, custom).to_index(), i);
        }
        assert_eq!(Preset::from_index(3, custom).params(), custom);
        assert_eq!(Preset::Beginner.params(), Difficulty::new(8, 8, 8));
        assert_eq!(Preset::Intermediate.params(), Difficulty::new(16, 16, 16));
        assert_eq!(Preset::Expert.params(), Difficulty::new(28, 20, 52));
        assert_eq!(Difficulty::default(), Preset::Beginner.params());
    }
}
