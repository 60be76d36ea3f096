//! Inclusive rectangular areas and anchor-relative area parsing.

use std::fmt;

use swimlane_core::{parse_int_prefix, Coord};

/// An inclusive rectangle `from ..= to`.
///
/// An area whose `to` lies above or left of `from` covers nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Area {
    /// Top-left corner.
    pub from: Coord,
    /// Bottom-right corner.
    pub to: Coord,
}

impl Area {
    /// Create an area from two corners.
    pub const fn new(from: Coord, to: Coord) -> Self {
        Self { from, to }
    }

    /// The single-coordinate area at `coord`.
    pub const fn point(coord: Coord) -> Self {
        Self {
            from: coord,
            to: coord,
        }
    }

    /// Parse `"r1,c1,r2,c2"` relative to `anchor`.
    ///
    /// Each token is either absolute (`"3"`), relative to the matching
    /// ordinate of `anchor` (`"+2"`, `"-1"`), or missing/empty, which
    /// means the anchor's own ordinate. Tokens that fail to parse also
    /// fall back to the anchor's ordinate. Results saturate at zero.
    ///
    /// Returns `None` for an empty specification.
    ///
    /// ```
    /// use swimlane_core::Coord;
    /// use swimlane_grid::Area;
    ///
    /// let area = Area::parse(Coord::new(0, 2), "+1,,4,+1").unwrap();
    /// assert_eq!(area, Area::new(Coord::new(1, 2), Coord::new(4, 3)));
    /// ```
    pub fn parse(anchor: Coord, spec: &str) -> Option<Self> {
        if spec.is_empty() {
            return None;
        }
        let mut tokens = spec.split(',');
        let mut next = |ordinate: u32| resolve_token(ordinate, tokens.next());
        let r1 = next(anchor.row);
        let c1 = next(anchor.col);
        let r2 = next(anchor.row);
        let c2 = next(anchor.col);
        Some(Self::new(Coord::new(r1, c1), Coord::new(r2, c2)))
    }

    /// Grow the area so its `to` corner covers `coord` component-wise.
    pub fn extend_to(&mut self, coord: Coord) {
        self.to.row = self.to.row.max(coord.row);
        self.to.col = self.to.col.max(coord.col);
    }

    /// Whether `coord` lies inside the area.
    pub fn contains(&self, coord: Coord) -> bool {
        (self.from.row..=self.to.row).contains(&coord.row)
            && (self.from.col..=self.to.col).contains(&coord.col)
    }

    /// Whether the area covers no coordinate.
    pub fn is_empty(&self) -> bool {
        self.to.row < self.from.row || self.to.col < self.from.col
    }

    /// Every coordinate of the area, row-major.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let (from, to) = (self.from, self.to);
        (from.row..=to.row)
            .flat_map(move |row| (from.col..=to.col).map(move |col| Coord::new(row, col)))
    }
}

fn resolve_token(ordinate: u32, token: Option<&str>) -> u32 {
    let token = match token.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return ordinate,
    };
    let resolved = match parse_int_prefix(token) {
        Some(n) if token.starts_with('+') || token.starts_with('-') => i64::from(ordinate) + n,
        Some(n) => n,
        None => return ordinate,
    };
    resolved.clamp(0, i64::from(u32::MAX)) as u32
}

impl fmt::Display for Area {
    /// Absolute `"r1,c1,r2,c2"`, the form [`Area::parse`] reads back.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.from.row, self.from.col, self.to.row, self.to.col
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn absolute_tokens() {
        let area = Area::parse(Coord::new(5, 5), "1,2,3,4").unwrap();
        assert_eq!(area, Area::new(Coord::new(1, 2), Coord::new(3, 4)));
    }

    #[test]
    fn relative_and_missing_tokens() {
        let area = Area::parse(Coord::new(2, 3), "+1,-1").unwrap();
        assert_eq!(area, Area::new(Coord::new(3, 2), Coord::new(2, 3)));
    }

    #[test]
    fn relative_tokens_saturate_at_zero() {
        let area = Area::parse(Coord::new(1, 1), "-5,-5,+0,+0").unwrap();
        assert_eq!(area.from, Coord::new(0, 0));
        assert_eq!(area.to, Coord::new(1, 1));
    }

    #[test]
    fn garbage_tokens_fall_back_to_anchor() {
        let area = Area::parse(Coord::new(4, 2), "x,,+y,7").unwrap();
        assert_eq!(area, Area::new(Coord::new(4, 2), Coord::new(4, 7)));
    }

    #[test]
    fn empty_spec_is_none() {
        assert_eq!(Area::parse(Coord::new(0, 0), ""), None);
    }

    #[test]
    fn extend_takes_component_max() {
        let mut area = Area::point(Coord::new(1, 1));
        area.extend_to(Coord::new(3, 1));
        area.extend_to(Coord::new(2, 4));
        assert_eq!(area.to, Coord::new(3, 4));
        assert_eq!(area.from, Coord::new(1, 1));
    }

    #[test]
    fn inverted_area_is_empty() {
        let area = Area::new(Coord::new(3, 3), Coord::new(2, 3));
        assert!(area.is_empty());
        assert_eq!(area.coords().count(), 0);
    }

    #[test]
    fn coords_are_row_major() {
        let area = Area::new(Coord::new(0, 0), Coord::new(1, 1));
        let coords: Vec<Coord> = area.coords().collect();
        assert_eq!(
            coords,
            vec![
                Coord::new(0, 0),
                Coord::new(0, 1),
                Coord::new(1, 0),
                Coord::new(1, 1)
            ]
        );
    }

    proptest! {
        #[test]
        fn display_reparses_to_same_area(
            r1 in 0u32..50, c1 in 0u32..50, r2 in 0u32..50, c2 in 0u32..50,
            ar in 0u32..50, ac in 0u32..50,
        ) {
            let area = Area::new(Coord::new(r1, c1), Coord::new(r2, c2));
            let reparsed = Area::parse(Coord::new(ar, ac), &area.to_string());
            prop_assert_eq!(reparsed, Some(area));
        }

        #[test]
        fn contains_agrees_with_coords(r in 0u32..6, c in 0u32..6) {
            let area = Area::new(Coord::new(1, 1), Coord::new(3, 4));
            let coord = Coord::new(r, c);
            prop_assert_eq!(area.contains(coord), area.coords().any(|x| x == coord));
        }
    }
}
