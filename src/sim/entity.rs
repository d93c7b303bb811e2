//! Live entities and the arena that owns them
//!
//! Segments, hazards, items and debris all live in one flat arena indexed by a
//! monotonically increasing ID. IDs are never reused, so an entity that has
//! been removed can never come back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Ray, RayHit, ray_aabb};
use super::difficulty::DifficultyTier;

pub type EntityId = u32;

/// Ground columns reach down off-screen; platforms float
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    Ground,
    Platform,
}

/// The two colours a player (and a light gate) can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColourPhase {
    One,
    Two,
}

impl ColourPhase {
    pub fn toggled(self) -> Self {
        match self {
            ColourPhase::One => ColourPhase::Two,
            ColourPhase::Two => ColourPhase::One,
        }
    }

    pub fn from_coin(heads: bool) -> Self {
        if heads { ColourPhase::One } else { ColourPhase::Two }
    }
}

/// Which features a segment carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub obstacles: bool,
    pub health: bool,
    pub light_gate: bool,
}

impl FeatureFlags {
    pub fn count(&self) -> u32 {
        self.obstacles as u32 + self.health as u32 + self.light_gate as u32
    }
}

/// A ground or platform surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub template_id: String,
    pub tier: DifficultyTier,
    /// Y of the top surface
    pub ground_height: f32,
    /// Chance that this segment's successor is a platform
    pub platform_chance: f32,
    pub will_feature: FeatureFlags,
    pub has_generated_next: bool,
    pub at_max_height: bool,
    pub at_min_height: bool,
}

impl Segment {
    pub fn has_health(&self) -> bool {
        self.will_feature.health
    }

    pub fn has_light_gate(&self) -> bool {
        self.will_feature.light_gate
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub template_id: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LightGate {
    pub phase: ColourPhase,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HealthItem {
    /// Centre height the item bobs around
    pub rest_y: f32,
    pub bob_time: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Debris {
    pub vel: Vec2,
    pub age: f32,
    /// Accumulated spin (radians), for rendering
    pub rotation: f32,
}

/// What an entity is; dispatched with a single `match`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityKind {
    Segment(Segment),
    Obstacle(Obstacle),
    LightGate(LightGate),
    HealthItem(HealthItem),
    Debris(Debris),
}

/// Fieldless mirror of [`EntityKind`] used for collision filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColliderTag {
    Segment,
    Obstacle,
    LightGate,
    HealthItem,
    Debris,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub aabb: Aabb,
    pub kind: EntityKind,
}

impl Entity {
    pub fn tag(&self) -> ColliderTag {
        match self.kind {
            EntityKind::Segment(_) => ColliderTag::Segment,
            EntityKind::Obstacle(_) => ColliderTag::Obstacle,
            EntityKind::LightGate(_) => ColliderTag::LightGate,
            EntityKind::HealthItem(_) => ColliderTag::HealthItem,
            EntityKind::Debris(_) => ColliderTag::Debris,
        }
    }

    pub fn as_segment(&self) -> Option<&Segment> {
        match &self.kind {
            EntityKind::Segment(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_segment_mut(&mut self) -> Option<&mut Segment> {
        match &mut self.kind {
            EntityKind::Segment(s) => Some(s),
            _ => None,
        }
    }
}

/// Owner of every live entity, kept sorted by ID for deterministic iteration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    entities: Vec<Entity>,
    next_id: EntityId,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Arena {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert a new entity and return its ID
    pub fn spawn(&mut self, aabb: Aabb, kind: EntityKind) -> EntityId {
        let id = self.next_entity_id();
        // IDs are allocated in order, so pushing keeps the vector sorted
        self.entities.push(Entity { id, aabb, kind });
        id
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, |e| e.id).ok()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index_of(id).map(move |i| &mut self.entities[i])
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index_of(id).is_some()
    }

    /// Remove an entity. Removing an ID that is already gone returns `None`.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.index_of(id).map(|i| self.entities.remove(i))
    }

    /// Remove every entity matching `pred`, returning the removed IDs in order
    pub fn remove_where<F>(&mut self, mut pred: F) -> Vec<EntityId>
    where
        F: FnMut(&Entity) -> bool,
    {
        let mut removed = Vec::new();
        self.entities.retain(|e| {
            if pred(e) {
                removed.push(e.id);
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn count(&self, tag: ColliderTag) -> usize {
        self.entities.iter().filter(|e| e.tag() == tag).count()
    }

    pub fn segments(&self) -> impl Iterator<Item = (EntityId, &Aabb, &Segment)> {
        self.entities
            .iter()
            .filter_map(|e| e.as_segment().map(|s| (e.id, &e.aabb, s)))
    }

    /// Nearest entity hit by `ray` among those whose tag passes `filter`.
    ///
    /// Ties on distance go to the lowest ID.
    pub fn raycast<F>(&self, ray: &Ray, filter: F) -> Option<(EntityId, ColliderTag, RayHit)>
    where
        F: Fn(ColliderTag) -> bool,
    {
        let mut best: Option<(EntityId, ColliderTag, RayHit)> = None;
        for entity in &self.entities {
            let tag = entity.tag();
            if !filter(tag) {
                continue;
            }
            if let Some(hit) = ray_aabb(ray, &entity.aabb) {
                let closer = best.is_none_or(|(_, _, b)| hit.distance < b.distance);
                if closer {
                    best = Some((entity.id, tag, hit));
                }
            }
        }
        best
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obstacle_at(x: f32) -> (Aabb, EntityKind) {
        (
            Aabb::new(Vec2::new(x, 0.0), Vec2::splat(0.5)),
            EntityKind::Obstacle(Obstacle {
                template_id: "rock".into(),
            }),
        )
    }

    #[test]
    fn test_ids_monotonic_and_sorted() {
        let mut arena = Arena::new();
        let (a, k) = obstacle_at(1.0);
        let id1 = arena.spawn(a, k);
        let (a, k) = obstacle_at(2.0);
        let id2 = arena.spawn(a, k);
        assert!(id2 > id1);
        assert_eq!(arena.len(), 2);
        assert!(arena.iter().map(|e| e.id).is_sorted());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut arena = Arena::new();
        let (a, k) = obstacle_at(1.0);
        let id = arena.spawn(a, k);
        assert!(arena.remove(id).is_some());
        assert!(arena.remove(id).is_none());
        assert!(!arena.contains(id));

        // A fresh spawn never reuses the removed ID
        let (a, k) = obstacle_at(1.0);
        let id2 = arena.spawn(a, k);
        assert_ne!(id, id2);
    }

    #[test]
    fn test_raycast_nearest_and_filtered() {
        let mut arena = Arena::new();
        let (a, k) = obstacle_at(5.0);
        let far = arena.spawn(a, k);
        let (a, k) = obstacle_at(2.0);
        let near = arena.spawn(a, k);

        let ray = Ray::new(Vec2::ZERO, Vec2::X, 10.0);
        let (id, tag, hit) = arena.raycast(&ray, |_| true).unwrap();
        assert_eq!(id, near);
        assert_eq!(tag, ColliderTag::Obstacle);
        assert!((hit.distance - 1.5).abs() < 1e-5);

        assert!(arena.raycast(&ray, |t| t == ColliderTag::Segment).is_none());

        arena.remove(near);
        let (id, _, _) = arena.raycast(&ray, |_| true).unwrap();
        assert_eq!(id, far);
    }

    #[test]
    fn test_remove_where() {
        let mut arena = Arena::new();
        for x in [1.0, 2.0, 3.0] {
            let (a, k) = obstacle_at(x);
            arena.spawn(a, k);
        }
        let removed = arena.remove_where(|e| e.aabb.center.x < 2.5);
        assert_eq!(removed.len(), 2);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_colour_toggle() {
        assert_eq!(ColourPhase::One.toggled(), ColourPhase::Two);
        assert_eq!(ColourPhase::Two.toggled().toggled(), ColourPhase::Two);
    }
}
