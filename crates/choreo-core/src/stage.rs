//! In-memory stage holding the dancers.

use crate::scene::{EntityId, EntityStore, SpatialIndex};
use kurbo::{Circle, Point, Rect, Shape, Size};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Default dancer radius in stage units.
pub const DEFAULT_DANCER_RADIUS: f64 = 0.4;

/// Serializable dancer color (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DancerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl DancerColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

impl Default for DancerColor {
    fn default() -> Self {
        Self::white()
    }
}

impl From<Color> for DancerColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<DancerColor> for Color {
    fn from(color: DancerColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// A dancer placed on the stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Dancer {
    pub id: EntityId,
    pub name: String,
    pub position: Point,
    pub radius: f64,
    pub color: DancerColor,
    /// Place in the formation, starting at 1.
    pub order_in_formation: usize,
    /// Selected look, driven by the manipulation controller.
    pub selected: bool,
}

impl Dancer {
    /// Create a new dancer with a fresh id.
    pub fn new(name: impl Into<String>, position: Point, radius: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            position,
            radius,
            color: DancerColor::default(),
            order_in_formation: 0,
            selected: false,
        }
    }

    /// Copy under a fresh id, named "<name> Copy" and unselected.
    pub fn copy(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: format!("{} Copy", self.name),
            selected: false,
            ..self.clone()
        }
    }

    /// Check if a point (in world coordinates) lies on this dancer.
    pub fn hit_test(&self, point: Point) -> bool {
        Circle::new(self.position, self.radius).contains(point)
    }
}

/// The stage: a bounded area with dancers in z-order (back to front).
#[derive(Debug, Clone)]
pub struct Stage {
    /// Stage extent in world units, origin at the top-left.
    pub size: Size,
    dancers: HashMap<EntityId, Dancer>,
    z_order: Vec<EntityId>,
    dancer_radius: f64,
    spawned: usize,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new(Size::new(16.0, 10.0))
    }
}

impl Stage {
    /// Create an empty stage.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            dancers: HashMap::new(),
            z_order: Vec::new(),
            dancer_radius: DEFAULT_DANCER_RADIUS,
            spawned: 0,
        }
    }

    /// Set the radius used for dancers created through [`EntityStore::create_at`].
    pub fn with_dancer_radius(mut self, radius: f64) -> Self {
        self.dancer_radius = radius;
        self
    }

    /// Create a stage with `count` dancers spread along its horizontal centre line.
    pub fn with_dancers(size: Size, count: usize, radius: f64) -> Self {
        let mut stage = Self::new(size).with_dancer_radius(radius);
        let spacing = size.width / (count as f64 + 1.0);
        for i in 0..count {
            let position = Point::new(spacing * (i as f64 + 1.0), size.height / 2.0);
            stage.create_at(position);
        }
        stage
    }

    /// Stage rectangle in world coordinates.
    pub fn bounds(&self) -> Rect {
        self.size.to_rect()
    }

    /// Add a dancer on top of the others.
    pub fn add_dancer(&mut self, dancer: Dancer) -> EntityId {
        let id = dancer.id;
        self.z_order.push(id);
        self.dancers.insert(id, dancer);
        id
    }

    pub fn dancer(&self, id: EntityId) -> Option<&Dancer> {
        self.dancers.get(&id)
    }

    /// Recolor a dancer. Unknown ids are ignored.
    pub fn set_color(&mut self, id: EntityId, color: impl Into<DancerColor>) {
        if let Some(dancer) = self.dancers.get_mut(&id) {
            dancer.color = color.into();
        }
    }

    /// Dancers in z-order (back to front).
    pub fn dancers(&self) -> impl Iterator<Item = &Dancer> {
        self.z_order.iter().filter_map(|id| self.dancers.get(id))
    }

    /// Dancers currently showing the selected look.
    pub fn selected_dancers(&self) -> impl Iterator<Item = &Dancer> {
        self.dancers().filter(|d| d.selected)
    }

    pub fn is_empty(&self) -> bool {
        self.dancers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dancers.len()
    }
}

impl SpatialIndex for Stage {
    fn hit_test(&self, point: Point) -> Option<EntityId> {
        // Front to back for selection priority
        self.z_order
            .iter()
            .rev()
            .find(|&&id| self.dancers.get(&id).is_some_and(|d| d.hit_test(point)))
            .copied()
    }
}

impl EntityStore for Stage {
    fn position(&self, id: EntityId) -> Option<Point> {
        self.dancers.get(&id).map(|d| d.position)
    }

    fn set_position(&mut self, id: EntityId, position: Point) {
        if let Some(dancer) = self.dancers.get_mut(&id) {
            dancer.position = position;
        }
    }

    fn set_selected_visual(&mut self, id: EntityId, selected: bool) {
        if let Some(dancer) = self.dancers.get_mut(&id) {
            dancer.selected = selected;
        }
    }

    fn destroy(&mut self, id: EntityId) {
        self.z_order.retain(|&dancer_id| dancer_id != id);
        self.dancers.remove(&id);
    }

    fn create_at(&mut self, position: Point) -> EntityId {
        self.spawned += 1;
        let mut dancer =
            Dancer::new(format!("Dancer {}", self.spawned), position, self.dancer_radius);
        dancer.order_in_formation = self.spawned;
        self.add_dancer(dancer)
    }

    fn duplicate(&mut self, id: EntityId) -> Option<EntityId> {
        let copy = self.dancers.get(&id)?.copy();
        Some(self.add_dancer(copy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_creation() {
        let stage = Stage::default();
        assert!(stage.is_empty());
        assert_eq!(stage.bounds(), Rect::new(0.0, 0.0, 16.0, 10.0));
    }

    #[test]
    fn test_create_and_destroy() {
        let mut stage = Stage::default();
        let id = stage.create_at(Point::new(2.0, 3.0));

        assert_eq!(stage.len(), 1);
        assert_eq!(stage.position(id), Some(Point::new(2.0, 3.0)));
        assert_eq!(stage.dancer(id).map(|d| d.name.as_str()), Some("Dancer 1"));

        stage.destroy(id);
        assert!(stage.is_empty());
        assert_eq!(stage.position(id), None);
    }

    #[test]
    fn test_hit_test_prefers_front() {
        let mut stage = Stage::default();
        let back = stage.create_at(Point::new(5.0, 5.0));
        let front = stage.create_at(Point::new(5.3, 5.0));

        assert_eq!(stage.hit_test(Point::new(5.15, 5.0)), Some(front));
        assert_eq!(stage.hit_test(Point::new(4.7, 5.0)), Some(back));
        assert_eq!(stage.hit_test(Point::new(9.0, 9.0)), None);
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let mut stage = Stage::default();
        let stray = Uuid::new_v4();

        stage.set_position(stray, Point::new(1.0, 1.0));
        stage.set_selected_visual(stray, true);
        stage.destroy(stray);

        assert!(stage.is_empty());
    }

    #[test]
    fn test_with_dancers_layout() {
        let stage = Stage::with_dancers(Size::new(10.0, 4.0), 4, 0.5);
        let xs: Vec<f64> = stage.dancers().map(|d| d.position.x).collect();
        assert_eq!(xs, vec![2.0, 4.0, 6.0, 8.0]);
        assert!(stage.dancers().all(|d| d.position.y == 2.0 && d.radius == 0.5));
        assert!(stage.dancers().all(|d| stage.bounds().contains(d.position)));
    }

    #[test]
    fn test_formation_order_follows_creation() {
        let stage = Stage::with_dancers(Size::new(10.0, 4.0), 3, 0.5);
        let order: Vec<usize> = stage.dancers().map(|d| d.order_in_formation).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_duplicate_copies_data() {
        let mut stage = Stage::default();
        let id = stage.create_at(Point::new(2.0, 3.0));
        stage.set_color(id, Color::from_rgba8(200, 40, 40, 255));
        stage.set_selected_visual(id, true);

        let copy_id = stage.duplicate(id).unwrap();
        assert_ne!(copy_id, id);
        let original = stage.dancer(id).unwrap();
        let copy = stage.dancer(copy_id).unwrap();
        assert_eq!(copy.name, "Dancer 1 Copy");
        assert_eq!(copy.color, DancerColor::new(200, 40, 40, 255));
        assert_eq!(copy.order_in_formation, original.order_in_formation);
        assert_eq!(copy.position, original.position);
        assert!(!copy.selected);

        // The copy is on top
        assert_eq!(stage.hit_test(Point::new(2.0, 3.0)), Some(copy_id));
        assert_eq!(stage.duplicate(Uuid::new_v4()), None);
    }

    #[test]
    fn test_color_conversion() {
        let color: Color = DancerColor::new(10, 20, 30, 255).into();
        assert_eq!(DancerColor::from(color), DancerColor::new(10, 20, 30, 255));
        assert_eq!(DancerColor::default(), DancerColor::white());
    }

    #[test]
    fn test_selected_visual() {
        let mut stage = Stage::default();
        let id = stage.create_at(Point::new(1.0, 1.0));
        stage.create_at(Point::new(3.0, 1.0));

        stage.set_selected_visual(id, true);
        let selected: Vec<EntityId> = stage.selected_dancers().map(|d| d.id).collect();
        assert_eq!(selected, vec![id]);
    }
}
