use macroquad::math::{vec2, Rect, Vec2};

/// Outcome of the vertical resolution pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalContact {
    None,
    Landed,
    HeadBump,
}

/// Strict overlap test. Boxes that only share an edge do not collide, which
/// is what keeps a resolved box from re-triggering on the next pass.
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && b.x < a.x + a.w && a.y < b.y + b.h && b.y < a.y + a.h
}

pub fn center(r: &Rect) -> Vec2 {
    vec2(r.x + r.w / 2.0, r.y + r.h / 2.0)
}

pub fn translated(r: Rect, offset: Vec2) -> Rect {
    Rect::new(r.x + offset.x, r.y + offset.y, r.w, r.h)
}

/// Shift `r` back inside `bounds`. A box larger than the bounds on an axis is
/// centered on that axis.
pub fn clamp_inside(r: Rect, bounds: &Rect) -> Rect {
    let x = clamp_axis(r.x, r.w, bounds.x, bounds.w);
    let y = clamp_axis(r.y, r.h, bounds.y, bounds.h);
    Rect::new(x, y, r.w, r.h)
}

fn clamp_axis(pos: f32, size: f32, min: f32, span: f32) -> f32 {
    if size >= span {
        min + span / 2.0 - size / 2.0
    } else if pos < min {
        min
    } else if pos + size > min + span {
        min + span - size
    } else {
        pos
    }
}

/// Push `rect` out of every overlapping obstacle along X, in obstacle order.
/// The direction comes from `vx`; a box with no horizontal motion is left
/// where it is.
pub fn resolve_x<'a>(
    mut rect: Rect,
    vx: f32,
    obstacles: impl IntoIterator<Item = &'a Rect>,
) -> Rect {
    for obstacle in obstacles {
        if !intersects(&rect, obstacle) {
            continue;
        }
        if vx > 0.0 {
            rect.x = obstacle.x - rect.w;
        } else if vx < 0.0 {
            rect.x = obstacle.x + obstacle.w;
        }
    }
    rect
}

/// Push `rect` out of every overlapping obstacle along Y. Falling boxes land
/// on top, rising boxes bump their head on the underside.
pub fn resolve_y<'a>(
    mut rect: Rect,
    vy: f32,
    obstacles: impl IntoIterator<Item = &'a Rect>,
) -> (Rect, VerticalContact) {
    let mut contact = VerticalContact::None;
    for obstacle in obstacles {
        if !intersects(&rect, obstacle) {
            continue;
        }
        if vy > 0.0 {
            rect.y = obstacle.y - rect.h;
            contact = VerticalContact::Landed;
        } else if vy < 0.0 {
            rect.y = obstacle.y + obstacle.h;
            contact = VerticalContact::HeadBump;
        }
    }
    (rect, contact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 32.0, 32.0);
        let b = Rect::new(32.0, 0.0, 32.0, 32.0);
        assert!(!intersects(&a, &b));
        assert!(intersects(&a, &Rect::new(31.0, 31.0, 4.0, 4.0)));
    }

    #[test]
    fn resolve_x_moving_right_stops_at_left_edge() {
        let wall = Rect::new(100.0, 0.0, 32.0, 64.0);
        let moved = resolve_x(Rect::new(72.0, 10.0, 32.0, 32.0), 6.0, [&wall]);
        assert_eq!(moved.x, 68.0);
        assert!(!intersects(&moved, &wall));
    }

    #[test]
    fn resolve_x_moving_left_stops_at_right_edge() {
        let wall = Rect::new(100.0, 0.0, 32.0, 64.0);
        let moved = resolve_x(Rect::new(128.0, 10.0, 32.0, 32.0), -6.0, [&wall]);
        assert_eq!(moved.x, 132.0);
    }

    #[test]
    fn resolve_y_reports_landing_and_head_bump() {
        let floor = Rect::new(0.0, 100.0, 200.0, 32.0);
        let (landed, contact) = resolve_y(Rect::new(10.0, 75.0, 32.0, 32.0), 7.0, [&floor]);
        assert_eq!(contact, VerticalContact::Landed);
        assert_eq!(landed.y, 68.0);

        let (bumped, contact) = resolve_y(Rect::new(10.0, 120.0, 32.0, 32.0), -4.0, [&floor]);
        assert_eq!(contact, VerticalContact::HeadBump);
        assert_eq!(bumped.y, 132.0);
    }

    #[test]
    fn resolve_y_handles_every_overlap_after_first_landing() {
        let a = Rect::new(0.0, 100.0, 20.0, 32.0);
        let b = Rect::new(20.0, 96.0, 20.0, 32.0);
        let (r, contact) = resolve_y(Rect::new(10.0, 74.0, 32.0, 32.0), 5.0, [&a, &b]);
        assert_eq!(contact, VerticalContact::Landed);
        assert!(!intersects(&r, &a));
        assert!(!intersects(&r, &b));
    }

    #[test]
    fn clamp_keeps_box_in_bounds() {
        let bounds = Rect::new(0.0, 0.0, 960.0, 640.0);
        let r = clamp_inside(Rect::new(-5.0, 630.0, 32.0, 32.0), &bounds);
        assert_eq!((r.x, r.y), (0.0, 608.0));
        let inside = Rect::new(10.0, 10.0, 32.0, 32.0);
        assert_eq!(clamp_inside(inside, &bounds), inside);
    }
}
