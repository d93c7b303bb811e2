//! Procedural terrain generation
//!
//! Each segment spawns exactly one successor the first time its right edge
//! scrolls onto the screen. The successor's height and gap are sampled inside
//! the player's jump envelope at that moment, so every run stays traversable:
//!
//! 1. Pick ground vs platform (predecessor's platform chance), then a template
//!    from the current difficulty bucket.
//! 2. Sample the new top surface between the screen floor and
//!    `previous height + max jump height * height buffer`, then clamp to the
//!    allowed band.
//! 3. Sample the gap between `min_gap` and the distance covered while rising to
//!    the apex and falling to the new surface.
//! 4. Pick at most one feature kind and place it inside the safe area.

use glam::Vec2;
use rand::Rng;

use super::catalogue::{FeatureProfile, PrefabCatalogue, SegmentTemplate};
use super::collision::Aabb;
use super::difficulty::DifficultyTier;
use super::entity::{
    Arena, ColliderTag, ColourPhase, EntityId, EntityKind, FeatureFlags, HealthItem, LightGate,
    Obstacle, Segment, SegmentKind,
};
use super::kinematics::JumpKinematics;
use super::state::GameEvent;
use crate::consts::HEALTH_REST_FACTOR;
use crate::error::GenerationError;
use crate::sample_range;
use crate::screen::ScreenBounds;
use crate::tuning::TerrainTuning;

/// The parts of the player the generator reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub half_height: f32,
    pub health: u8,
    pub max_health: u8,
    pub kinematics: JumpKinematics,
}

/// Feature kinds a segment can carry (at most one per segment)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Obstacles,
    Health,
    LightGate,
}

impl Feature {
    pub const ALL: [Feature; 3] = [Feature::Obstacles, Feature::Health, Feature::LightGate];

    pub fn chance(&self, profile: &FeatureProfile) -> f32 {
        match self {
            Feature::Obstacles => profile.obstacle_chance,
            Feature::Health => profile.health_chance,
            Feature::LightGate => profile.light_gate_chance,
        }
    }
}

/// Which features a new segment may carry before any dice are rolled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Eligibility {
    pub obstacles: bool,
    pub health: bool,
    pub light_gate: bool,
}

impl Eligibility {
    /// Template permissions, player health, and no identical feature on the
    /// predecessor for health and light gates
    pub fn determine(
        profile: &FeatureProfile,
        player: &PlayerView,
        prev_has_health: bool,
        prev_has_light_gate: bool,
    ) -> Self {
        Self {
            obstacles: profile.can_obstacles && profile.max_obstacles > profile.min_obstacles,
            health: profile.can_health && player.health < player.max_health && !prev_has_health,
            light_gate: profile.can_light_gate && !prev_has_light_gate,
        }
    }

    pub fn allows(&self, feature: Feature) -> bool {
        match feature {
            Feature::Obstacles => self.obstacles,
            Feature::Health => self.health,
            Feature::LightGate => self.light_gate,
        }
    }
}

/// Roll every eligible feature once and keep a single winner.
///
/// The winner is the rolled feature with the highest configured chance; exact
/// ties are split uniformly at random. Rolls happen in a fixed order so the
/// result only depends on the RNG state.
pub fn choose_feature<R: Rng + ?Sized>(
    rng: &mut R,
    profile: &FeatureProfile,
    eligible: Eligibility,
) -> Option<Feature> {
    let rolled: Vec<Feature> = Feature::ALL
        .into_iter()
        .filter(|f| eligible.allows(*f))
        .filter(|f| rng.random::<f32>() < f.chance(profile))
        .collect();

    let best = rolled
        .iter()
        .map(|f| f.chance(profile))
        .fold(f32::NEG_INFINITY, f32::max);
    let top: Vec<Feature> = rolled
        .into_iter()
        .filter(|f| f.chance(profile) == best)
        .collect();

    match top.len() {
        0 => None,
        1 => Some(top[0]),
        n => Some(top[rng.random_range(0..n)]),
    }
}

/// Everything decided for one generated segment
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub predecessor: EntityId,
    pub segment: EntityId,
    pub kind: SegmentKind,
    pub tier: DifficultyTier,
    pub template_id: String,
    pub previous_height: f32,
    pub new_height_min: f32,
    pub new_height_max: f32,
    pub ground_height: f32,
    pub at_max_height: bool,
    pub at_min_height: bool,
    pub max_gap: f32,
    pub actual_gap: f32,
    /// `max_gap` fell below `min_gap` and the gap was pinned to `min_gap`
    pub gap_clamped: bool,
    /// Horizontal distance between the predecessor's right edge and the new left edge
    pub edge_gap: f32,
    pub features: FeatureFlags,
    pub spawned: Vec<EntityId>,
}

/// Endless terrain generator
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    tuning: TerrainTuning,
    catalogue: PrefabCatalogue,
    gap_clamp_warned: bool,
}

impl TerrainGenerator {
    /// Build a generator; the catalogue must be complete
    pub fn new(tuning: TerrainTuning, catalogue: PrefabCatalogue) -> Result<Self, GenerationError> {
        catalogue.validate()?;
        Ok(Self {
            tuning,
            catalogue,
            gap_clamp_warned: false,
        })
    }

    /// Forget per-session state before a new run
    pub fn reset(&mut self) {
        self.gap_clamp_warned = false;
    }

    pub fn catalogue(&self) -> &PrefabCatalogue {
        &self.catalogue
    }

    pub fn tuning(&self) -> &TerrainTuning {
        &self.tuning
    }

    /// Lowest allowed top surface
    pub fn floor_height(&self, screen: &ScreenBounds) -> f32 {
        screen.bottom + self.tuning.min_height_from_bottom
    }

    /// Highest allowed top surface
    pub fn ceiling_height(&self, screen: &ScreenBounds) -> f32 {
        screen.top - self.tuning.max_height_from_top
    }

    /// Spawn the segment the player starts on: flush with the left screen
    /// edge, top surface at the configured start height.
    pub fn spawn_start(&self, arena: &mut Arena, screen: &ScreenBounds) -> EntityId {
        let t = &self.catalogue.start;
        let height = self
            .tuning
            .start_height
            .min(self.ceiling_height(screen))
            .max(self.floor_height(screen));
        let center = Vec2::new(screen.left + t.half_width, height - t.half_height);
        let segment = Segment {
            kind: t.kind,
            template_id: t.id.clone(),
            tier: DifficultyTier::VeryEasy,
            ground_height: height,
            platform_chance: t.features.platform_chance,
            will_feature: FeatureFlags::default(),
            has_generated_next: false,
            at_max_height: false,
            at_min_height: false,
        };
        arena.spawn(
            Aabb::new(center, Vec2::new(t.half_width, t.half_height)),
            EntityKind::Segment(segment),
        )
    }

    /// Scroll the world left by `dx`, generate successors for segments that
    /// came fully into view, then drop everything that left the screen.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        arena: &mut Arena,
        dx: f32,
        screen: &ScreenBounds,
        player: &PlayerView,
        tier: DifficultyTier,
        events: &mut Vec<GameEvent>,
    ) -> Result<Vec<GenerationReport>, GenerationError> {
        // Debris flies in world space and does not scroll
        for entity in arena.iter_mut() {
            if !matches!(entity.kind, EntityKind::Debris(_)) {
                entity.aabb.center.x -= dx;
            }
        }

        let due: Vec<EntityId> = arena
            .segments()
            .filter(|(_, aabb, s)| !s.has_generated_next && aabb.right() <= screen.right)
            .map(|(id, _, _)| id)
            .collect();

        let mut reports = Vec::with_capacity(due.len());
        for id in due {
            let report = self.generate_next(rng, arena, id, player, tier, screen)?;
            events.push(GameEvent::SegmentSpawned {
                id: report.segment,
                kind: report.kind,
            });
            reports.push(report);
        }

        let gone =
            arena.remove_where(|e| e.tag() != ColliderTag::Debris && e.aabb.right() < screen.left);
        for id in gone {
            events.push(GameEvent::Despawned { id });
        }

        Ok(reports)
    }

    /// Generate the successor of segment `prev_id` and mark the predecessor
    /// as done once the successor exists. [`advance`](Self::advance) only
    /// calls this for segments that have not generated yet, so a failed
    /// attempt is retried on the next tick.
    pub fn generate_next<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        arena: &mut Arena,
        prev_id: EntityId,
        player: &PlayerView,
        tier: DifficultyTier,
        screen: &ScreenBounds,
    ) -> Result<GenerationReport, GenerationError> {
        let Some(prev_entity) = arena.get(prev_id) else {
            return Err(GenerationError::MissingPredecessor(prev_id));
        };
        let prev_right = prev_entity.aabb.right();
        let Some(prev) = prev_entity.as_segment() else {
            return Err(GenerationError::MissingPredecessor(prev_id));
        };
        let prev_height = prev.ground_height;
        let platform_chance = prev.platform_chance;
        let prev_has_health = prev.has_health();
        let prev_has_light_gate = prev.has_light_gate();

        // 1. Kind and template
        let kind = if rng.random::<f32>() < platform_chance {
            SegmentKind::Platform
        } else {
            SegmentKind::Ground
        };
        let template: SegmentTemplate = self.catalogue.pick_segment(rng, tier, kind)?.clone();

        // 2. Height
        let k = player.kinematics;
        let new_height_max = prev_height + k.max_jump_height() * self.tuning.jump_height_buffer;
        let new_height_min = self.floor_height(screen);
        let (mut ground_height, _) = sample_range(rng, new_height_min, new_height_max);
        let ceiling = self.ceiling_height(screen);
        let floor = self.floor_height(screen);
        let mut at_max_height = false;
        let mut at_min_height = false;
        if ground_height >= ceiling {
            ground_height = ceiling;
            at_max_height = true;
        }
        if ground_height <= floor {
            ground_height = floor;
            at_min_height = true;
        }

        // 3. Gap
        let drop = new_height_max - (ground_height - player.half_height);
        let total_time = k.time_to_reach_max_jump() + k.time_to_fall(drop);
        let max_gap = k.max_gap(total_time);
        let min_gap = self.tuning.min_gap;
        let gap_clamped = max_gap < min_gap;
        if gap_clamped && !self.gap_clamp_warned {
            log::warn!(
                "max gap {:.2} below min gap {:.2} (run speed {:.2}); pinning gaps to min",
                max_gap,
                min_gap,
                k.run_velocity
            );
            self.gap_clamp_warned = true;
        }
        let (actual_gap, _) = sample_range(rng, min_gap, max_gap);
        let edge_gap = actual_gap * self.tuning.jump_distance_buffer;
        let center = Vec2::new(
            prev_right + edge_gap + template.half_width,
            ground_height - template.half_height,
        );
        let half = Vec2::new(template.half_width, template.half_height);

        let segment_id = arena.spawn(
            Aabb::new(center, half),
            EntityKind::Segment(Segment {
                kind,
                template_id: template.id.clone(),
                tier,
                ground_height,
                platform_chance: template.features.platform_chance,
                will_feature: FeatureFlags::default(),
                has_generated_next: false,
                at_max_height,
                at_min_height,
            }),
        );
        if let Some(prev) = arena.get_mut(prev_id).and_then(|e| e.as_segment_mut()) {
            prev.has_generated_next = true;
        }

        // 4. Features
        let eligible = Eligibility::determine(
            &template.features,
            player,
            prev_has_health,
            prev_has_light_gate,
        );
        let chosen = choose_feature(rng, &template.features, eligible);
        let area = SafeArea::of(center.x, &template);
        let mut spawned = Vec::new();
        let mut features = FeatureFlags::default();
        match chosen {
            Some(Feature::Obstacles) => {
                let f = &template.features;
                let count = if f.min_obstacles < f.max_obstacles {
                    rng.random_range(f.min_obstacles..f.max_obstacles)
                } else {
                    f.min_obstacles
                };
                for _ in 0..count {
                    let o = self.catalogue.pick_obstacle(rng)?.clone();
                    let x = area.sample(rng, o.half_width);
                    spawned.push(arena.spawn(
                        Aabb::new(
                            Vec2::new(x, ground_height + o.half_height),
                            Vec2::new(o.half_width, o.half_height),
                        ),
                        EntityKind::Obstacle(Obstacle { template_id: o.id }),
                    ));
                }
                features.obstacles = count > 0;
            }
            Some(Feature::Health) => {
                let h = &self.catalogue.health_item;
                let x = area.sample(rng, h.half_width);
                let rest_y = ground_height + HEALTH_REST_FACTOR * h.half_height;
                spawned.push(arena.spawn(
                    Aabb::new(Vec2::new(x, rest_y), Vec2::new(h.half_width, h.half_height)),
                    EntityKind::HealthItem(HealthItem {
                        rest_y,
                        bob_time: 0.0,
                    }),
                ));
                features.health = true;
            }
            Some(Feature::LightGate) => {
                let g = &self.catalogue.light_gate;
                let x = area.anchor(rng.random_range(0..3), g.half_width);
                let phase = ColourPhase::from_coin(rng.random_bool(0.5));
                spawned.push(arena.spawn(
                    Aabb::new(
                        Vec2::new(x, ground_height + g.half_height),
                        Vec2::new(g.half_width, g.half_height),
                    ),
                    EntityKind::LightGate(LightGate { phase }),
                ));
                features.light_gate = true;
            }
            None => {}
        }

        if let Some(seg) = arena.get_mut(segment_id).and_then(|e| e.as_segment_mut()) {
            seg.will_feature = features;
        }

        log::debug!(
            "segment {} ({:?} `{}`, {:?}): height {:.2} in [{:.2}, {:.2}], gap {:.2}/{:.2}, {:?}",
            segment_id,
            kind,
            template.id,
            tier,
            ground_height,
            new_height_min,
            new_height_max,
            actual_gap,
            max_gap,
            features
        );

        Ok(GenerationReport {
            predecessor: prev_id,
            segment: segment_id,
            kind,
            tier,
            template_id: template.id,
            previous_height: prev_height,
            new_height_min,
            new_height_max,
            ground_height,
            at_max_height,
            at_min_height,
            max_gap,
            actual_gap,
            gap_clamped,
            edge_gap,
            features,
            spawned,
        })
    }
}

/// Horizontal band of a segment where features may go
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeArea {
    pub left: f32,
    pub right: f32,
}

impl SafeArea {
    pub fn of(center_x: f32, template: &SegmentTemplate) -> Self {
        let f = &template.features;
        Self {
            left: center_x - (1.0 - f.safe_area_left) * template.half_width,
            right: center_x + (1.0 - f.safe_area_right) * template.half_width,
        }
    }

    /// Uniform centre position for an item of `half_width` fully inside the band.
    /// Items wider than the band are centred on it.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, half_width: f32) -> f32 {
        let lo = self.left + half_width;
        let hi = self.right - half_width;
        if hi < lo {
            return 0.5 * (self.left + self.right);
        }
        sample_range(rng, lo, hi).0
    }

    /// One of three anchors: 0 = left, 1 = middle, 2 = right
    pub fn anchor(&self, slot: u32, half_width: f32) -> f32 {
        let mid = 0.5 * (self.left + self.right);
        let lo = (self.left + half_width).min(mid);
        let hi = (self.right - half_width).max(mid);
        match slot {
            0 => lo,
            1 => mid,
            _ => hi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn view(speed: f32, health: u8) -> PlayerView {
        PlayerView {
            half_height: 1.0,
            health,
            max_health: 3,
            kinematics: JumpKinematics::new(100.0, 20.0, 0.25 * speed / 50.0, speed),
        }
    }

    fn setup() -> (TerrainGenerator, Arena, ScreenBounds, EntityId) {
        let generator =
            TerrainGenerator::new(TerrainTuning::default(), PrefabCatalogue::default()).unwrap();
        let mut arena = Arena::new();
        let screen = ScreenBounds::default();
        let start = generator.spawn_start(&mut arena, &screen);
        (generator, arena, screen, start)
    }

    #[test]
    fn test_start_segment_flush_with_left_edge() {
        let (_, arena, screen, start) = setup();
        let e = arena.get(start).unwrap();
        assert!((e.aabb.left() - screen.left).abs() < 1e-4);
        assert_eq!(e.as_segment().unwrap().ground_height, 0.0);
        assert!((e.aabb.top() - 0.0).abs() < 1e-4);
    }

    #[test]
    fn test_generated_segment_within_envelope() {
        let (mut generator, mut arena, screen, start) = setup();
        let mut rng = Pcg32::seed_from_u64(42);
        let report = generator
            .generate_next(
                &mut rng,
                &mut arena,
                start,
                &view(50.0, 3),
                DifficultyTier::Medium,
                &screen,
            )
            .unwrap();

        assert!(report.ground_height <= report.new_height_max + 1e-4);
        assert!(report.ground_height >= generator.floor_height(&screen) - 1e-4);
        assert!(report.ground_height <= generator.ceiling_height(&screen) + 1e-4);
        assert!(!report.gap_clamped);
        assert!(report.actual_gap >= 10.0 && report.actual_gap <= report.max_gap);

        let prev = arena.get(start).unwrap();
        let next = arena.get(report.segment).unwrap();
        assert!(prev.as_segment().unwrap().has_generated_next);
        assert!((next.aabb.left() - prev.aabb.right() - report.edge_gap).abs() < 1e-3);
        assert!((next.aabb.top() - report.ground_height).abs() < 1e-4);
        assert_eq!(next.as_segment().unwrap().tier, DifficultyTier::Medium);
    }

    #[test]
    fn test_failed_generation_leaves_predecessor_pending() {
        let mut catalogue = PrefabCatalogue::default();
        for bucket in catalogue.tiers.iter_mut().filter(|b| b.tier == DifficultyTier::Medium) {
            bucket.grounds.clear();
            bucket.platforms.clear();
        }
        // Skip validation to reach the runtime lookup
        let mut generator = TerrainGenerator {
            tuning: TerrainTuning::default(),
            catalogue,
            gap_clamp_warned: false,
        };
        let mut arena = Arena::new();
        let screen = ScreenBounds::default();
        let start = generator.spawn_start(&mut arena, &screen);
        let mut rng = Pcg32::seed_from_u64(9);

        let err = generator
            .generate_next(
                &mut rng,
                &mut arena,
                start,
                &view(50.0, 3),
                DifficultyTier::Medium,
                &screen,
            )
            .unwrap_err();
        assert!(matches!(err, GenerationError::EmptyBucket { tier: DifficultyTier::Medium, .. }));
        assert_eq!(arena.len(), 1);
        let prev = arena.get(start).unwrap().as_segment().unwrap();
        assert!(!prev.has_generated_next);

        let report = generator
            .generate_next(
                &mut rng,
                &mut arena,
                start,
                &view(50.0, 3),
                DifficultyTier::Easy,
                &screen,
            )
            .unwrap();
        assert!(arena.get(start).unwrap().as_segment().unwrap().has_generated_next);
        assert!(arena.contains(report.segment));
    }

    #[test]
    fn test_slow_player_pins_gap_to_min() {
        let (mut generator, mut arena, screen, start) = setup();
        let mut rng = Pcg32::seed_from_u64(3);
        let report = generator
            .generate_next(
                &mut rng,
                &mut arena,
                start,
                &view(1.0, 3),
                DifficultyTier::VeryEasy,
                &screen,
            )
            .unwrap();
        assert!(report.gap_clamped);
        assert_eq!(report.actual_gap, 10.0);
        assert!(report.max_gap < 10.0);
    }

    #[test]
    fn test_height_clamped_to_ceiling() {
        let (mut generator, mut arena, screen, start) = setup();
        // Lift the start segment right under the ceiling
        let ceiling = generator.ceiling_height(&screen);
        {
            let e = arena.get_mut(start).unwrap();
            let half_h = e.aabb.half_extents.y;
            e.aabb.center.y = ceiling - half_h;
            e.as_segment_mut().unwrap().ground_height = ceiling;
        }
        let mut clamped = false;
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..50 {
            let mut a = arena.clone();
            let r = generator
                .generate_next(
                    &mut rng,
                    &mut a,
                    start,
                    &view(50.0, 3),
                    DifficultyTier::Easy,
                    &screen,
                )
                .unwrap();
            assert!(r.ground_height <= ceiling + 1e-4);
            clamped |= r.at_max_height;
        }
        assert!(clamped);
    }

    #[test]
    fn test_choose_feature_prefers_higher_chance() {
        let profile = FeatureProfile {
            can_obstacles: true,
            can_light_gate: true,
            can_health: true,
            min_obstacles: 1,
            max_obstacles: 3,
            obstacle_chance: 1.0,
            light_gate_chance: 0.99,
            health_chance: 0.98,
            ..FeatureProfile::default()
        };
        let all = Eligibility {
            obstacles: true,
            health: true,
            light_gate: true,
        };
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..100 {
            // Obstacles always roll (chance 1.0) and always win
            assert_eq!(choose_feature(&mut rng, &profile, all), Some(Feature::Obstacles));
        }
    }

    #[test]
    fn test_choose_feature_tie_splits() {
        let profile = FeatureProfile {
            obstacle_chance: 1.0,
            light_gate_chance: 1.0,
            ..FeatureProfile::default()
        };
        let eligible = Eligibility {
            obstacles: true,
            health: false,
            light_gate: true,
        };
        let mut rng = Pcg32::seed_from_u64(9);
        let mut obstacles = 0;
        let mut gates = 0;
        for _ in 0..400 {
            match choose_feature(&mut rng, &profile, eligible) {
                Some(Feature::Obstacles) => obstacles += 1,
                Some(Feature::LightGate) => gates += 1,
                other => panic!("unexpected {other:?}"),
            }
        }
        assert!(obstacles > 100 && gates > 100);
    }

    #[test]
    fn test_choose_feature_respects_eligibility() {
        let profile = FeatureProfile {
            obstacle_chance: 1.0,
            health_chance: 1.0,
            light_gate_chance: 1.0,
            ..FeatureProfile::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(choose_feature(&mut rng, &profile, Eligibility::default()), None);
        let only_health = Eligibility {
            health: true,
            ..Eligibility::default()
        };
        assert_eq!(choose_feature(&mut rng, &profile, only_health), Some(Feature::Health));
    }

    #[test]
    fn test_health_needs_missing_health_and_no_repeat() {
        let profile = FeatureProfile {
            can_health: true,
            ..FeatureProfile::default()
        };
        assert!(!Eligibility::determine(&profile, &view(50.0, 3), false, false).health);
        assert!(Eligibility::determine(&profile, &view(50.0, 2), false, false).health);
        assert!(!Eligibility::determine(&profile, &view(50.0, 2), true, false).health);
    }

    #[test]
    fn test_light_gate_not_back_to_back() {
        let profile = FeatureProfile {
            can_light_gate: true,
            ..FeatureProfile::default()
        };
        assert!(Eligibility::determine(&profile, &view(50.0, 3), false, false).light_gate);
        assert!(!Eligibility::determine(&profile, &view(50.0, 3), false, true).light_gate);
    }

    #[test]
    fn test_features_inside_safe_area() {
        let (mut generator, mut arena, screen, start) = setup();
        let mut rng = Pcg32::seed_from_u64(77);
        let mut prev = start;
        for _ in 0..200 {
            let r = generator
                .generate_next(
                    &mut rng,
                    &mut arena,
                    prev,
                    &view(50.0, 2),
                    DifficultyTier::Insane,
                    &screen,
                )
                .unwrap();
            assert!(r.features.count() <= 1);
            let seg = arena.get(r.segment).unwrap().clone();
            let template = generator
                .catalogue()
                .bucket(DifficultyTier::Insane, r.kind)
                .iter()
                .find(|t| t.id == r.template_id)
                .unwrap()
                .clone();
            let area = SafeArea::of(seg.aabb.center.x, &template);
            for id in &r.spawned {
                let item = arena.get(*id).unwrap();
                let centred = item.aabb.center.x == 0.5 * (area.left + area.right);
                assert!(item.aabb.left() >= area.left - 1e-3 || centred);
                assert!(item.aabb.right() <= area.right + 1e-3 || centred);
                assert!(item.aabb.bottom() >= r.ground_height - 1e-3);
            }
            prev = r.segment;
        }
    }

    #[test]
    fn test_advance_generates_once_and_recycles() {
        let (mut generator, mut arena, screen, start) = setup();
        let mut rng = Pcg32::seed_from_u64(8);
        let mut events = Vec::new();
        let v = view(50.0, 3);

        // Start segment is 80 wide and flush left, so its right edge is on the right screen edge
        let reports = generator
            .advance(&mut rng, &mut arena, 0.5, &screen, &v, DifficultyTier::VeryEasy, &mut events)
            .unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].predecessor, start);

        let reports = generator
            .advance(&mut rng, &mut arena, 0.5, &screen, &v, DifficultyTier::VeryEasy, &mut events)
            .unwrap();
        assert!(reports.iter().all(|r| r.predecessor != start));

        // Scroll the start segment completely off the left edge
        generator
            .advance(
                &mut rng,
                &mut arena,
                200.0,
                &screen,
                &v,
                DifficultyTier::VeryEasy,
                &mut events,
            )
            .unwrap();
        assert!(!arena.contains(start));
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::Despawned { id } if *id == start)));
    }
}
