use std::fmt;

use nalgebra::Vector3;

use crate::{constants::PYRAMID_ORIGIN, pyramid::PyramidSpec};

/// Highest level with a dedicated layout. Anything past it uses the default layout.
pub const LAST_LEVEL: u32 = 6;

/// Level selector. The only transition is [`Level::next`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(pub u32);

/// What a level adds on top of the common pitch (plane, catapult, goal, cloth).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LevelLayout {
    pub pyramid: Option<PyramidSpec>,
    /// Windmill base position, if this level has one in the way.
    pub windmill: Option<Vector3<f32>>,
}

impl Level {
    pub fn next(self) -> Self {
        Level(self.0.saturating_add(1))
    }

    pub fn layout(self) -> LevelLayout {
        let pyramid = |size, box_size| Some(PyramidSpec::new(PYRAMID_ORIGIN.into(), size, box_size));

        match self.0 {
            0 => LevelLayout {
                pyramid: pyramid(20, 8.0),
                windmill: None,
            },
            1 => LevelLayout {
                pyramid: pyramid(25, 7.0),
                windmill: Some(Vector3::new(-20.0, 0.0, 0.0)),
            },
            2 => LevelLayout {
                pyramid: pyramid(26, 7.0),
                windmill: None,
            },
            // 1275 boxes
            3 => LevelLayout {
                pyramid: pyramid(50, 10.0),
                windmill: None,
            },
            // 2850 boxes
            4 => LevelLayout {
                pyramid: pyramid(75, 10.0),
                windmill: None,
            },
            // 5050 boxes
            5 => LevelLayout {
                pyramid: pyramid(100, 10.0),
                windmill: None,
            },
            // 20100 boxes
            6 => LevelLayout {
                pyramid: pyramid(200, 10.0),
                windmill: None,
            },
            _ => LevelLayout::default(),
        }
    }

    /// Name used when recording performance runs for this level.
    pub fn test_case(self) -> &'static str {
        match self.0 {
            0 => "level1",
            1 => "level2",
            2 => "level3",
            3 => "many_boxes_1",
            4 => "many_boxes_2",
            5 => "many_boxes_3",
            6 => "too_many_boxes",
            _ => "default",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level {} ({})", self.0, self.test_case())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pyramid_sizes_per_level() {
        let counts: Vec<usize> = (0..=LAST_LEVEL)
            .map(|l| Level(l).layout().pyramid.map_or(0, |p| p.box_count()))
            .collect();
        assert_eq!(counts, vec![210, 325, 351, 1275, 2850, 5050, 20100]);
    }

    #[test]
    fn only_level_one_has_a_windmill() {
        for l in 0..=LAST_LEVEL + 2 {
            assert_eq!(Level(l).layout().windmill.is_some(), l == 1);
        }
    }

    #[test]
    fn unknown_levels_fall_through_to_default() {
        assert_eq!(Level(LAST_LEVEL + 1).layout(), LevelLayout::default());
        assert_eq!(Level(u32::MAX).layout(), LevelLayout::default());
        assert_eq!(Level(42).test_case(), "default");
    }

    #[test]
    fn every_level_has_its_own_test_case() {
        let names: Vec<&str> = (0..=LAST_LEVEL).map(|l| Level(l).test_case()).collect();
        assert_eq!(
            names,
            vec![
                "level1",
                "level2",
                "level3",
                "many_boxes_1",
                "many_boxes_2",
                "many_boxes_3",
                "too_many_boxes"
            ]
        );
    }

    #[test]
    fn next_increments_and_saturates() {
        assert_eq!(Level(0).next(), Level(1));
        assert_eq!(Level(u32::MAX).next(), Level(u32::MAX));
    }
}
