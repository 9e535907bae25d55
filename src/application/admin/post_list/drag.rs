//! Drag gesture handling for the sortable post list.
//!
//! The list script only reports a pointer drag once the pointer travels
//! [`POINTER_ACTIVATION_DISTANCE`] pixels, so a click on a card never starts
//! a reorder. Keyboard moves step over the rendered neighbour. Drop targets
//! are resolved among the rendered items only.

use serde::Deserialize;

use super::types::MoveDirection;

pub const POINTER_ACTIVATION_DISTANCE: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Bounding box of a rendered list item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemRect {
    pub id: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ItemRect {
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Nearest rendered item by center distance; ties go to the earlier item.
pub fn closest_center<'a>(pointer: Point, rects: &'a [ItemRect]) -> Option<&'a str> {
    let mut best: Option<(&ItemRect, f64)> = None;
    for rect in rects {
        let distance = pointer.distance_to(rect.center());
        match best {
            Some((_, current)) if current <= distance => {}
            _ => best = Some((rect, distance)),
        }
    }
    best.map(|(rect, _)| rect.id.as_str())
}

/// Neighbour of `id` among the rendered ids in `direction`.
pub fn keyboard_target<'a>(
    visible_ids: &'a [String],
    id: &str,
    direction: MoveDirection,
) -> Option<&'a str> {
    let index = visible_ids.iter().position(|candidate| candidate == id)?;
    let target = match direction {
        MoveDirection::Up => index.checked_sub(1)?,
        MoveDirection::Down => index + 1,
    };
    visible_ids.get(target).map(String::as_str)
}

/// Completed gesture handed to the list manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEnd {
    pub moved: String,
    pub target: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(ids: &[&str]) -> Vec<ItemRect> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| ItemRect {
                id: id.to_string(),
                left: 0.0,
                top: i as f64 * 100.0,
                width: 400.0,
                height: 90.0,
            })
            .collect()
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn closest_center_picks_the_nearest_rendered_item() {
        let rects = column(&["a", "b", "c"]);
        assert_eq!(closest_center(Point::new(200.0, 150.0), &rects), Some("b"));
        assert_eq!(closest_center(Point::new(200.0, 900.0), &rects), Some("c"));
        assert_eq!(closest_center(Point::new(0.0, 0.0), &[]), None);
    }

    #[test]
    fn closest_center_breaks_ties_towards_the_first_item() {
        let rects = column(&["a", "b"]);
        // Centers sit at y=45 and y=145.
        assert_eq!(closest_center(Point::new(200.0, 95.0), &rects), Some("a"));
    }

    #[test]
    fn keyboard_target_stops_at_the_edges() {
        let rendered = ids(&["a", "b"]);
        assert_eq!(keyboard_target(&rendered, "a", MoveDirection::Up), None);
        assert_eq!(
            keyboard_target(&rendered, "a", MoveDirection::Down),
            Some("b")
        );
        assert_eq!(keyboard_target(&rendered, "b", MoveDirection::Down), None);
        assert_eq!(keyboard_target(&rendered, "x", MoveDirection::Down), None);
    }
}
