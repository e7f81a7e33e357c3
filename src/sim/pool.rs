//! Live entity pool
//!
//! Insertion-ordered, so the front is always the oldest entity. Capacity is
//! enforced by the caller through [`ShapePool::make_room`]; evicted entities
//! are handed back so the engine can fade them out.

use std::collections::VecDeque;

use rand_pcg::Pcg32;

use super::entity::ShapeSet;
use crate::themes::{ColoredOpacity, apply_color};

/// How many entities a color operation treats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCount {
    /// Up to this many aged entities
    Some(u32),
    /// Every aged entity, as a staggered cascade
    Wave,
}

impl ColorCount {
    /// Host-facing count where `-1` means a wave; other negatives treat nothing
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            -1 => ColorCount::Wave,
            n if n < 0 => ColorCount::Some(0),
            n => ColorCount::Some(n as u32),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShapePool {
    sets: VecDeque<ShapeSet>,
    next_id: u32,
}

impl ShapePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &ShapeSet> {
        self.sets.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ShapeSet> {
        self.sets.iter_mut()
    }

    /// Contiguous view for pairwise passes
    pub fn as_mut_slice(&mut self) -> &mut [ShapeSet] {
        self.sets.make_contiguous()
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut ShapeSet> {
        self.sets.iter_mut().find(|s| s.id == id)
    }

    pub fn birth_ticks(&self) -> Vec<u32> {
        self.sets.iter().map(|s| s.birth_tick).collect()
    }

    /// Allocate an id for a new entity
    pub fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn push(&mut self, set: ShapeSet) {
        self.sets.push_back(set);
    }

    /// Evict the oldest entities so `incoming` more fit under `capacity`
    pub fn make_room(&mut self, incoming: usize, capacity: usize) -> Vec<ShapeSet> {
        let excess = (self.sets.len() + incoming).saturating_sub(capacity);
        self.evict_oldest(excess)
    }

    /// Remove up to `count` oldest entities
    pub fn evict_oldest(&mut self, count: usize) -> Vec<ShapeSet> {
        let count = count.min(self.sets.len());
        self.sets.drain(..count).collect()
    }

    pub fn drain_all(&mut self) -> Vec<ShapeSet> {
        self.sets.drain(..).collect()
    }

    /// Color every aged entity that is still grayscale
    pub fn update_aging(&mut self, tick: u32, x: u32, opacity: ColoredOpacity, rng: &mut Pcg32) -> usize {
        let mut colored = 0;
        for set in self.sets.iter_mut() {
            if set.is_aged(tick, x) && !set.is_colored() {
                apply_color(set, opacity, rng);
                colored += 1;
            }
        }
        colored
    }

    /// Color (or recolor) every aged entity
    pub fn color_all_aged(&mut self, tick: u32, x: u32, opacity: ColoredOpacity, rng: &mut Pcg32) -> usize {
        let mut colored = 0;
        for set in self.sets.iter_mut().filter(|s| s.is_aged(tick, x)) {
            apply_color(set, opacity, rng);
            colored += 1;
        }
        colored
    }

    /// Color up to `count` aged entities, grayscale ones first, oldest first
    pub fn color_aged(&mut self, count: u32, tick: u32, x: u32, opacity: ColoredOpacity, rng: &mut Pcg32) -> usize {
        let order = self.treatment_order(tick, x, |s| s.is_colored());
        let mut colored = 0;
        for idx in order.into_iter().take(count as usize) {
            apply_color(&mut self.sets[idx], opacity, rng);
            colored += 1;
        }
        colored
    }

    /// Start the pulse animation on up to `count` aged entities, non-pulsing first
    pub fn pulse_aged(&mut self, count: u32, tick: u32, x: u32, rng: &mut Pcg32) -> usize {
        let order = self.treatment_order(tick, x, |s| s.visual.pulsing);
        let mut pulsed = 0;
        for idx in order.into_iter().take(count as usize) {
            let set = &mut self.sets[idx];
            set.visual.pulsing = true;
            set.kind.variant().on_pulse(set, rng);
            pulsed += 1;
        }
        pulsed
    }

    /// Ids of every aged entity, oldest first
    pub fn aged_ids(&self, tick: u32, x: u32) -> Vec<u32> {
        self.sets.iter().filter(|s| s.is_aged(tick, x)).map(|s| s.id).collect()
    }

    /// Indices of aged entities: untreated before treated, each oldest first
    fn treatment_order(&self, tick: u32, x: u32, treated: impl Fn(&ShapeSet) -> bool) -> Vec<usize> {
        let aged = || self.sets.iter().enumerate().filter(|(_, s)| s.is_aged(tick, x));
        let fresh = aged().filter(|(_, s)| !treated(*s)).map(|(i, _)| i);
        let stale = aged().filter(|(_, s)| treated(*s)).map(|(i, _)| i);
        fresh.chain(stale).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::test_support::square;
    use glam::Vec2;
    use rand::SeedableRng;

    fn pool_with_births(births: &[u32]) -> ShapePool {
        let mut pool = ShapePool::new();
        for &b in births {
            let id = pool.next_id();
            let mut set = square(id, Vec2::ZERO, 10.0, Vec2::ZERO);
            set.birth_tick = b;
            pool.push(set);
        }
        pool
    }

    #[test]
    fn test_make_room_evicts_oldest() {
        let mut pool = pool_with_births(&[1, 2, 3]);
        let evicted = pool.make_room(2, 4);
        assert_eq!(evicted.iter().map(|s| s.id).collect::<Vec<_>>(), vec![0]);
        assert_eq!(pool.len(), 2);
        assert!(pool.make_room(1, 4).is_empty());
    }

    #[test]
    fn test_evict_clamps() {
        let mut pool = pool_with_births(&[1, 2]);
        assert_eq!(pool.evict_oldest(10).len(), 2);
        assert!(pool.is_empty());
        assert!(pool.evict_oldest(1).is_empty());
    }

    #[test]
    fn test_update_aging_colors_only_aged() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pool = pool_with_births(&[1, 2, 6]);
        assert_eq!(pool.update_aging(7, 5, ColoredOpacity::default(), &mut rng), 2);
        let colored: Vec<bool> = pool.iter().map(|s| s.is_colored()).collect();
        assert_eq!(colored, vec![true, true, false]);
        // Already colored entities are not touched again
        assert_eq!(pool.update_aging(7, 5, ColoredOpacity::default(), &mut rng), 0);
    }

    #[test]
    fn test_color_prefers_grayscale() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut pool = pool_with_births(&[0, 0, 0]);
        pool.color_aged(1, 10, 5, ColoredOpacity::default(), &mut rng);
        pool.color_aged(1, 10, 5, ColoredOpacity::default(), &mut rng);
        let colored: Vec<bool> = pool.iter().map(|s| s.is_colored()).collect();
        assert_eq!(colored, vec![true, true, false]);
    }

    #[test]
    fn test_pulse_only_aged() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pool = pool_with_births(&[0, 9]);
        assert_eq!(pool.pulse_aged(5, 10, 5, &mut rng), 1);
        let pulsing: Vec<bool> = pool.iter().map(|s| s.visual.pulsing).collect();
        assert_eq!(pulsing, vec![true, false]);
        assert_eq!(pool.aged_ids(10, 5), vec![0]);
    }

    #[test]
    fn test_color_count_from_raw() {
        assert_eq!(ColorCount::from_raw(-1), ColorCount::Wave);
        assert_eq!(ColorCount::from_raw(-7), ColorCount::Some(0));
        assert_eq!(ColorCount::from_raw(3), ColorCount::Some(3));
    }
}
