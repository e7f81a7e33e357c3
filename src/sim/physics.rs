//! Per-frame motion: integration, viewport boundaries and pairwise collisions
//!
//! The loop is theme-agnostic. Anything a theme does differently goes through
//! its [`ThemeVariant`](crate::themes::ThemeVariant) motion policy.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{ShapeSet, Viewport};
use crate::config::ThemeTunings;
use crate::themes::BoundaryMode;

/// Re-entry velocity ranges for wrapping entities: (base, random span)
const REENTER_FROM_BOTTOM_VY: (f32, f32) = (-0.4, 0.3);
const REENTER_FROM_TOP_VY: (f32, f32) = (0.05, 0.25);
const REENTER_FROM_RIGHT_VX: (f32, f32) = (-0.3, 0.2);
const REENTER_FROM_LEFT_VX: (f32, f32) = (0.1, 0.2);

/// Advance every entity by one frame, then resolve collisions.
///
/// Returns `true` while there is something left to animate. An empty slice is
/// a no-op that returns `false`, so the caller stops requesting frames.
pub fn step(sets: &mut [ShapeSet], viewport: Option<Viewport>, tunings: &ThemeTunings, rng: &mut Pcg32) -> bool {
    if sets.is_empty() {
        return false;
    }

    let viewport = viewport.filter(|v| !v.is_degenerate());
    for set in sets.iter_mut() {
        advance(set, viewport, tunings, rng);
    }
    resolve_collisions(sets);
    true
}

fn advance(set: &mut ShapeSet, viewport: Option<Viewport>, tunings: &ThemeTunings, rng: &mut Pcg32) {
    let variant = set.kind.variant();

    set.advance_appear();
    set.primary.pos += set.vel;

    if let Some(vp) = viewport {
        match variant.boundary_mode() {
            BoundaryMode::Bounce => {
                // Zero-size geometry (first frame, mid-fade) is retried next frame
                if let Some(bbox) = variant.boundary_box(set) {
                    let padding = variant.extent_padding(tunings.get(set.kind));
                    bounce(set, bbox, padding, vp);
                }
            }
            BoundaryMode::Wrap { margin } => {
                if set.has_geometry() {
                    wrap(set, margin, vp, rng);
                }
            }
        }
    }

    variant.apply_motion_overlay(set, viewport, rng);
    variant.place_secondaries(set);
}

/// Allowed range for a box center on one axis, or `None` if the box does not fit
fn center_range(half: f32, extent: f32) -> Option<(f32, f32)> {
    let (lo, hi) = (half, extent - half);
    (lo <= hi).then_some((lo, hi))
}

/// Reflect one velocity component off the viewport edges
fn reflect_axis(center: f32, vel: f32, half: f32, extent: f32) -> (f32, f32) {
    match center_range(half, extent) {
        None => (extent / 2.0, vel),
        Some((lo, _)) if center <= lo => (lo, vel.abs()),
        Some((_, hi)) if center >= hi => (hi, -vel.abs()),
        Some(_) => (center, vel),
    }
}

fn bounce(set: &mut ShapeSet, bbox: Vec2, padding: f32, vp: Viewport) {
    let half = bbox / 2.0 + Vec2::splat(padding);
    let center = set.center();
    let (cx, vx) = reflect_axis(center.x, set.vel.x, half.x, vp.width);
    let (cy, vy) = reflect_axis(center.y, set.vel.y, half.y, vp.height);
    set.vel = Vec2::new(vx, vy);
    set.primary.pos += Vec2::new(cx, cy) - center;
}

fn reentry(rng: &mut Pcg32, (base, span): (f32, f32)) -> f32 {
    base + rng.random::<f32>() * span
}

/// Move an entity that drifted `margin` px off one edge to just beyond the opposite edge
fn wrap(set: &mut ShapeSet, margin: f32, vp: Viewport, rng: &mut Pcg32) {
    let width = set.measured_size().x;
    let pos = &mut set.primary.pos;

    if pos.y < -margin {
        pos.y = vp.height + rng.random::<f32>() * margin;
        set.vel.y = reentry(rng, REENTER_FROM_BOTTOM_VY);
    } else if pos.y > vp.height + margin {
        pos.y = -(rng.random::<f32>() * margin);
        set.vel.y = reentry(rng, REENTER_FROM_TOP_VY);
    }

    if pos.x < -width - margin {
        pos.x = vp.width + rng.random::<f32>() * margin * 0.5;
        set.vel.x = reentry(rng, REENTER_FROM_RIGHT_VX);
    } else if pos.x > vp.width + margin {
        pos.x = -(width + rng.random::<f32>() * margin * 0.5);
        set.vel.x = reentry(rng, REENTER_FROM_LEFT_VX);
    }
}

/// Resolve every unordered pair once
pub fn resolve_collisions(sets: &mut [ShapeSet]) {
    for i in 0..sets.len() {
        let (head, tail) = sets.split_at_mut(i + 1);
        let a = &mut head[i];
        if !a.has_geometry() {
            continue;
        }
        for b in tail.iter_mut().filter(|b| b.has_geometry()) {
            collide_pair(a, b);
        }
    }
}

/// Elastic bounce between two overlapping, closing entities.
///
/// Entities that overlap but are already separating are left alone.
/// Returns whether an impulse was applied.
pub fn collide_pair(a: &mut ShapeSet, b: &mut ShapeSet) -> bool {
    let delta = b.center() - a.center();
    let distance = delta.length();
    let min_distance = a.collision_radius() + b.collision_radius();
    if distance <= 0.0 || distance >= min_distance {
        return false;
    }

    let normal = delta / distance;
    let closing = (b.vel - a.vel).dot(normal);
    if closing >= 0.0 {
        return false;
    }

    a.vel += normal * closing;
    b.vel -= normal * closing;

    // Push apart by half the overlap each
    let separation = normal * (min_distance - distance) * 0.5;
    a.primary.pos -= separation;
    b.primary.pos += separation;
    true
}

/// Pull an entity back inside a (resized) viewport
pub fn clamp_into(set: &mut ShapeSet, vp: Viewport, padding: f32) {
    if vp.is_degenerate() {
        return;
    }
    let variant = set.kind.variant();
    let bbox = variant.boundary_box(set).unwrap_or_else(|| set.box_size());
    let half = bbox / 2.0 + Vec2::splat(padding);
    let center = set.center();
    let clamp = |c: f32, half: f32, extent: f32| match center_range(half, extent) {
        Some((lo, hi)) => c.clamp(lo, hi),
        None => extent / 2.0,
    };
    let target = Vec2::new(clamp(center.x, half.x, vp.width), clamp(center.y, half.y, vp.height));
    set.primary.pos += target - center;
    variant.place_secondaries(set);
}
