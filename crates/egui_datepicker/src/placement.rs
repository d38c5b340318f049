//! Where to put the picker panel relative to its input.
//!
//! The panel is first tried at the preferred side of the anchor. If it overflows the
//! viewport or overlaps another tracked rectangle, other sides are tried in a fixed
//! order, at most [`MAX_ATTEMPTS`] times per open cycle. When nothing fits, the panel is
//! forced below the anchor, spanning the viewport.

use egui::{Align, Pos2, Rect, Vec2, pos2, vec2};
use serde::{Deserialize, Serialize};

/// How many times the panel is moved before giving up.
pub const MAX_ATTEMPTS: u8 = 4;

/// Which side of the anchor the panel is placed on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Side {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// A side plus how the panel is aligned along that side.
///
/// For [`Side::Top`] and [`Side::Bottom`] the alignment is horizontal
/// ([`Align::Min`] means left edges flush), for [`Side::Left`] and [`Side::Right`]
/// it is vertical.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Position {
    pub side: Side,
    pub align: Align,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            side: Side::Bottom,
            align: Align::Min,
        }
    }
}

impl Position {
    /// Below the anchor, centered. Used when nothing else fits.
    pub const CENTER_BOTTOM: Self = Self {
        side: Side::Bottom,
        align: Align::Center,
    };
}

/// Pick the side to try after `current` failed.
///
/// `tried` must already contain `current`. The opposite side comes first; if it was
/// tried, [`Side::Left`] is preferred for the vertical sides and [`Side::Bottom`] for
/// the horizontal ones. With everything exhausted this returns [`Side::Bottom`].
pub fn next_side(current: Side, tried: &[Side]) -> Side {
    let untried = |side: Side| !tried.contains(&side);

    let opposite = current.opposite();
    if untried(opposite) {
        return opposite;
    }

    let fallback = match current {
        Side::Top | Side::Bottom => Side::Left,
        Side::Left | Side::Right => Side::Bottom,
    };
    if untried(fallback) {
        fallback
    } else {
        Side::Bottom
    }
}

/// Everything [`place`] needs to know about the screen.
#[derive(Clone, Copy, Debug)]
pub struct PlacementRequest<'a> {
    /// The input the panel belongs to.
    pub anchor: Rect,

    /// Size of the panel, as measured last frame.
    pub panel_size: Vec2,

    /// The area the panel must stay inside.
    pub viewport: Rect,

    /// Other tracked rectangles the panel must not cover.
    pub obstacles: &'a [Rect],

    /// Where to try first.
    pub preferred: Position,

    /// Vertical gap between anchor and panel.
    pub v_offset: f32,

    /// Horizontal gap between anchor and panel.
    pub h_offset: f32,
}

impl PlacementRequest<'_> {
    /// The panel rectangle at `position`, relative to the anchor.
    pub fn rect_at(&self, position: Position) -> Rect {
        let anchor = self.anchor;
        let size = self.panel_size;

        let along_x = |align: Align| match align {
            Align::Min => anchor.left() + self.h_offset,
            Align::Center => anchor.center().x - size.x / 2.0,
            Align::Max => anchor.right() - size.x - self.h_offset,
        };
        let along_y = |align: Align| match align {
            Align::Min => anchor.top(),
            Align::Center => anchor.center().y - size.y / 2.0,
            Align::Max => anchor.bottom() - size.y,
        };

        let min: Pos2 = match position.side {
            Side::Bottom => pos2(along_x(position.align), anchor.bottom() + self.v_offset),
            Side::Top => pos2(
                along_x(position.align),
                anchor.top() - (size.y + self.v_offset),
            ),
            Side::Left => pos2(
                anchor.left() - (size.x + self.h_offset),
                along_y(position.align),
            ),
            Side::Right => pos2(anchor.right() + self.h_offset, along_y(position.align)),
        };
        Rect::from_min_size(min, size)
    }

    /// Inside the viewport and clear of every obstacle.
    pub fn fits(&self, rect: Rect) -> bool {
        self.viewport.contains_rect(rect)
            && !self
                .obstacles
                .iter()
                .any(|obstacle| obstacle.intersect(rect).is_positive())
    }

    fn forced(&self, attempts: u8) -> Placement {
        let width = (self.viewport.width() - 2.0 * self.h_offset).max(0.0);
        let min = pos2(
            self.viewport.left() + self.h_offset,
            self.anchor.bottom() + self.v_offset,
        );
        let rect = Rect::from_min_size(min, vec2(width, self.panel_size.y));
        Placement {
            position: Position::CENTER_BOTTOM,
            rect,
            fits: self.fits(rect),
            forced: true,
            attempts,
        }
    }
}

/// The outcome of [`place`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub position: Position,
    pub rect: Rect,

    /// The final rectangle is inside the viewport and clear of obstacles.
    pub fits: bool,

    /// No side fitted (or the panel is as wide as the viewport), so the panel was
    /// put below the anchor at viewport width.
    pub forced: bool,

    /// How many times the panel was moved.
    pub attempts: u8,
}

/// The placement search of one open cycle.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlacementState {
    tried: Vec<Side>,
    remaining: u8,
    current: Option<Position>,
}

impl Default for PlacementState {
    fn default() -> Self {
        Self {
            tried: Vec::new(),
            remaining: MAX_ATTEMPTS,
            current: None,
        }
    }
}

impl PlacementState {
    /// Forget everything tried so far. Call when the panel closes.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn tried(&self) -> &[Side] {
        &self.tried
    }

    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    /// The position settled on so far, if any.
    pub fn current(&self) -> Option<Position> {
        self.current
    }

    /// Find a position for the panel, continuing the search of this open cycle.
    pub fn place(&mut self, request: &PlacementRequest<'_>) -> Placement {
        if request.panel_size.x >= request.viewport.width() {
            self.remaining = 0;
            return request.forced(0);
        }

        let mut position = self.current.unwrap_or(request.preferred);
        let mut rect = request.rect_at(position);
        let mut attempts = 0;

        while !request.fits(rect) && self.remaining > 0 {
            self.tried.push(position.side);
            position.side = next_side(position.side, &self.tried);
            self.remaining -= 1;
            attempts += 1;
            rect = request.rect_at(position);
        }
        self.current = Some(position);

        if request.fits(rect) {
            Placement {
                position,
                rect,
                fits: true,
                forced: false,
                attempts,
            }
        } else {
            log::debug!("No room for the date picker panel after {attempts} attempts");
            request.forced(attempts)
        }
    }
}

/// Place a panel from scratch, given the sides already tried in this open cycle.
///
/// Pure: the same request and `tried` always give the same placement.
pub fn place(request: &PlacementRequest<'_>, tried: &[Side]) -> Placement {
    let mut state = PlacementState {
        tried: tried.to_vec(),
        remaining: MAX_ATTEMPTS.saturating_sub(tried.len().try_into().unwrap_or(u8::MAX)),
        current: None,
    };
    state.place(request)
}
