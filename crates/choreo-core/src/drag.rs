//! Drag session for moving the current selection.

use kurbo::{Point, Vec2};

/// State of an in-progress drag of the selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// World position where the drag started.
    pub start_point: Point,
    /// World position at the last applied tick.
    pub anchor: Point,
    active: bool,
}

impl DragSession {
    /// Start a drag anchored at `start_point`.
    pub fn new(start_point: Point) -> Self {
        Self {
            start_point,
            anchor: start_point,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// A session only moves anything while there is something selected.
    pub fn is_valid(&self, selection_count: usize) -> bool {
        self.active && selection_count > 0
    }

    /// Move the anchor to `current` and return the delta since the last tick.
    pub fn advance(&mut self, current: Point) -> Vec2 {
        let delta = current - self.anchor;
        self.anchor = current;
        delta
    }

    /// Total movement since the drag started.
    pub fn total_delta(&self) -> Vec2 {
        self.anchor - self.start_point
    }

    /// Mark the session finished.
    pub fn end(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_moves_anchor() {
        let mut drag = DragSession::new(Point::new(1.0, 1.0));

        let delta = drag.advance(Point::new(3.0, 0.5));
        assert_eq!(delta, Vec2::new(2.0, -0.5));
        assert_eq!(drag.anchor, Point::new(3.0, 0.5));

        let delta = drag.advance(Point::new(4.0, 0.5));
        assert_eq!(delta, Vec2::new(1.0, 0.0));
        assert_eq!(drag.total_delta(), Vec2::new(3.0, -0.5));
    }

    #[test]
    fn test_validity() {
        let mut drag = DragSession::new(Point::ZERO);
        assert!(drag.is_active());
        assert!(drag.is_valid(2));
        assert!(!drag.is_valid(0));

        drag.end();
        assert!(!drag.is_active());
        assert!(!drag.is_valid(2));
    }
}
