//! Per-frame movement controller
//!
//! One [`CharacterMovementController::update`] call is one character's frame:
//!
//! 1. Read the pending auto-move vector
//! 2. Scale the per-frame distance by its direction (L1-normalized)
//! 3. Truncate and apply x
//! 4. Truncate and apply y from the moved box
//! 5. Notify the spatial index if the position changed
//! 6. Consume the *requested* step from the accumulator
//!
//! Facing is set once when the move command is issued, so turns made while
//! the character walks (scripts, touch reactions) stick.
//!
//! Consuming the requested rather than the achieved step means a character
//! that runs into a wall has its remaining command spent as if it had moved;
//! blocked commands are dropped, not retried.

use crate::character::{Character, CharacterId};
use crate::foundation::math::{round4, Vec2};
use crate::physics::{truncate_axis, Axis, AxisTruncation};
use crate::spatial::SpatialQuery;

use super::auto_move::AutoMove;
use super::bridge;
use super::MovementError;

/// What happened to one character during one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Step the accumulator asked for, before collision
    pub requested: (f64, f64),
    /// Displacement actually applied
    pub applied: (f64, f64),
    /// Position changed this frame
    pub moved: bool,
    /// Spatial index was notified
    pub indexed: bool,
    /// Characters whose boxes stopped this one
    pub touched: Vec<CharacterId>,
}

/// This frame's step toward the pending target
///
/// `distance` is split across the axes in proportion to the pending vector,
/// so `|dx| + |dy| == distance` (before rounding) whatever the angle.
pub fn frame_displacement(auto_move: &AutoMove, distance: f64) -> (f64, f64) {
    let (dx, dy) = auto_move.pending();
    let scalar = dx.abs() + dy.abs();
    if scalar == 0.0 {
        return (0.0, 0.0);
    }
    (round4(distance * dx / scalar), round4(distance * dy / scalar))
}

/// Drives auto-move for characters against a spatial index
pub struct CharacterMovementController {
    spatial: Option<Box<dyn SpatialQuery>>,
}

impl CharacterMovementController {
    /// Controller backed by `spatial`
    pub fn new(spatial: Box<dyn SpatialQuery>) -> Self {
        Self {
            spatial: Some(spatial),
        }
    }

    /// Controller with no index yet
    ///
    /// Characters move without collision and index updates are skipped until
    /// [`Self::attach_index`] is called.
    pub fn without_index() -> Self {
        Self { spatial: None }
    }

    /// Install (or replace) the spatial index, returning the previous one
    pub fn attach_index(&mut self, spatial: Box<dyn SpatialQuery>) -> Option<Box<dyn SpatialQuery>> {
        self.spatial.replace(spatial)
    }

    /// Current index
    pub fn spatial(&self) -> Option<&dyn SpatialQuery> {
        self.spatial.as_deref()
    }

    /// Current index (mutable)
    pub fn spatial_mut(&mut self) -> Option<&mut (dyn SpatialQuery + 'static)> {
        self.spatial.as_deref_mut()
    }

    /// Run one frame for `character`
    pub fn update(&mut self, character: &mut Character) -> Result<FrameReport, MovementError> {
        self.update_with(character, |_| {})
    }

    /// Run one frame, falling back to `grid_step` when auto-move is idle
    ///
    /// `grid_step` stands for the tile-snapped movement owned by the caller.
    /// It only runs when there is no pending auto-move, so at most one of the
    /// two moves a character in a given frame. Position changes it makes are
    /// indexed like any other.
    pub fn update_with<F>(&mut self, character: &mut Character, grid_step: F) -> Result<FrameReport, MovementError>
    where
        F: FnOnce(&mut Character),
    {
        let start = character.position();
        let mut report = FrameReport::default();
        let auto_moving = character.auto_move().is_active();

        if auto_moving {
            let (dx, dy) = frame_displacement(character.auto_move(), character.distance_per_frame());
            report.requested = (dx, dy);

            let x = self.truncate(character, dx, Axis::X);
            character.translate(x.delta, 0.0);
            let y = self.truncate(character, dy, Axis::Y);
            character.translate(0.0, y.delta);

            report.touched = touched_characters(character.id(), [&x, &y]);
        } else {
            grid_step(character);
        }

        let end = character.position();
        report.applied = (end.x - start.x, end.y - start.y);
        report.moved = end != start;
        if report.moved {
            report.indexed = bridge::notify_moved(self.spatial.as_deref_mut(), character)?;
        }

        if auto_moving {
            let (dx, dy) = report.requested;
            character.auto_move_mut().consume(dx, dy);
        }

        log::trace!(
            "{} frame: requested ({:.4}, {:.4}) applied ({:.4}, {:.4}) -> {}",
            character.id(),
            report.requested.0,
            report.requested.1,
            report.applied.0,
            report.applied.1,
            format_position(end)
        );
        Ok(report)
    }

    fn truncate(&self, character: &Character, delta: f64, axis: Axis) -> AxisTruncation {
        match self.spatial.as_deref() {
            Some(index) => truncate_axis(index, &character.hitbox(), delta, axis),
            None => AxisTruncation {
                delta,
                blockers: Vec::new(),
            },
        }
    }
}

fn touched_characters(mover: CharacterId, truncations: [&AxisTruncation; 2]) -> Vec<CharacterId> {
    let mut touched: Vec<CharacterId> = Vec::new();
    for owner in truncations
        .iter()
        .flat_map(|t| t.blockers.iter())
        .filter_map(|obstacle| obstacle.owner)
    {
        if owner != mover && !touched.contains(&owner) {
            touched.push(owner);
        }
    }
    touched
}

fn format_position(position: Vec2) -> String {
    format!("({:.4}, {:.4})", position.x, position.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{CharacterKind, Direction};
    use crate::config::FreeMoveConfig;
    use crate::physics::{Hitbox, COLLISION_EPSILON};
    use crate::spatial::GridSpatialIndex;
    use approx::assert_abs_diff_eq;

    fn setup(position: Vec2) -> (CharacterMovementController, Character) {
        let character = Character::new(CharacterKind::Player, position, &FreeMoveConfig::default());
        let mut index = GridSpatialIndex::new(1.0);
        index.insert(character.id(), character.hitbox()).unwrap();
        (CharacterMovementController::new(Box::new(index)), character)
    }

    #[test]
    fn test_frame_displacement_normalizes_diagonals() {
        let mut auto = AutoMove::new();
        auto.set_target(1.0, 1.0);
        let (dx, dy) = frame_displacement(&auto, 0.0625);
        assert_abs_diff_eq!(dx.abs() + dy.abs(), 0.0625, epsilon = 2e-4);
        assert_eq!(dx, dy);

        auto.set_target(-3.0, 1.0);
        let (dx, dy) = frame_displacement(&auto, 0.125);
        assert_eq!((dx, dy), (-0.0938, 0.0313));

        assert_eq!(frame_displacement(&AutoMove::new(), 0.125), (0.0, 0.0));
    }

    #[test]
    fn test_free_step_moves_and_reindexes() {
        let (mut controller, mut character) = setup(Vec2::new(5.0, 5.0));
        character.move_free(Direction::Right);

        let report = controller.update(&mut character).unwrap();
        assert!(report.moved);
        assert!(report.indexed);
        assert_eq!(report.requested, (0.0625, 0.0));
        assert_eq!(character.position(), Vec2::new(5.0625, 5.0));
        assert_eq!(
            controller.spatial().and_then(|s| s.get_hitbox(character.id())),
            Some(character.hitbox())
        );
        assert!(!character.auto_move().is_active());
    }

    #[test]
    fn test_move_straight_takes_sixteen_frames() {
        let (mut controller, mut character) = setup(Vec2::new(2.0, 2.0));
        character.move_straight(Direction::Down);
        let mut frames = 0;
        while character.auto_move().is_active() {
            controller.update(&mut character).unwrap();
            frames += 1;
            assert!(frames <= 16);
        }
        assert_eq!(frames, 16);
        assert_abs_diff_eq!(character.position().y, 3.0, epsilon = 1e-9);
        assert_eq!(character.facing(), Direction::Down);
    }

    #[test]
    fn test_idle_character_is_not_reindexed() {
        let (mut controller, mut character) = setup(Vec2::new(2.0, 2.0));
        let report = controller.update(&mut character).unwrap();
        assert_eq!(report, FrameReport::default());
    }

    #[test]
    fn test_wall_cancels_remaining_command() {
        let (mut controller, mut character) = setup(Vec2::new(5.0, 5.0));
        if let Some(index) = controller.spatial_mut() {
            index.add_static(Hitbox::new(6.02, 7.0, 5.0, 6.0));
        }
        character.move_by(0.5, 0.0);

        let mut frames = 0;
        while character.auto_move().is_active() {
            controller.update(&mut character).unwrap();
            frames += 1;
        }
        // 0.5 / 0.0625 frames are spent even though the wall stops the character early
        assert_eq!(frames, 8);
        assert_abs_diff_eq!(character.hitbox().x2, 6.02 - 0.0001, epsilon = 1e-9);
    }

    #[test]
    fn test_diagonal_into_wall_slides() {
        let (mut controller, mut character) = setup(Vec2::new(4.98, 5.0));
        if let Some(index) = controller.spatial_mut() {
            index.add_static(Hitbox::tile(6, 4));
            index.add_static(Hitbox::tile(6, 5));
            index.add_static(Hitbox::tile(6, 6));
        }
        character.move_by(1.0, 1.0);
        let report = controller.update(&mut character).unwrap();
        assert_eq!(report.requested, (0.0313, 0.0313));
        assert_abs_diff_eq!(report.applied.0, 0.0199, epsilon = 1e-9);
        assert_abs_diff_eq!(report.applied.1, 0.0313, epsilon = 1e-9);
    }

    #[test]
    fn test_flush_contact_backs_off_by_epsilon() {
        let (mut controller, mut character) = setup(Vec2::new(5.0, 5.0));
        if let Some(index) = controller.spatial_mut() {
            index.add_static(Hitbox::tile(6, 5));
        }
        character.move_free(Direction::Right);
        let report = controller.update(&mut character).unwrap();
        assert_abs_diff_eq!(report.applied.0, -COLLISION_EPSILON, epsilon = 1e-9);
    }

    #[test]
    fn test_turn_during_walk_survives_next_frame() {
        let (mut controller, mut character) = setup(Vec2::new(3.0, 3.0));
        character.move_straight(Direction::Right);
        controller.update(&mut character).unwrap();
        assert_eq!(character.facing(), Direction::Right);

        character.set_direction(Some(Direction::Up));
        controller.update(&mut character).unwrap();
        assert_eq!(character.facing(), Direction::Up);
        assert!(character.auto_move().is_active());
    }

    #[test]
    fn test_blocking_character_is_reported() {
        let (mut controller, mut character) = setup(Vec2::new(5.0, 5.0));
        let npc = Character::new(CharacterKind::Follower, Vec2::new(6.05, 5.0), &FreeMoveConfig::default());
        if let Some(index) = controller.spatial_mut() {
            index.insert(npc.id(), npc.hitbox()).unwrap();
        }
        character.move_free(Direction::Right);
        let report = controller.update(&mut character).unwrap();
        assert_eq!(report.touched, vec![npc.id()]);
        assert_abs_diff_eq!(report.applied.0, 0.0499, epsilon = 1e-9);
    }

    #[test]
    fn test_without_index_moves_freely() {
        let mut controller = CharacterMovementController::without_index();
        let mut character = Character::new(CharacterKind::Player, Vec2::new(0.0, 0.0), &FreeMoveConfig::default());
        character.move_free(Direction::Left);
        let report = controller.update(&mut character).unwrap();
        assert!(report.moved);
        assert!(!report.indexed);
        assert_eq!(character.position(), Vec2::new(-0.0625, 0.0));

        let mut index = GridSpatialIndex::new(1.0);
        index.insert(character.id(), character.hitbox()).unwrap();
        assert!(controller.attach_index(Box::new(index)).is_none());
        character.move_free(Direction::Left);
        assert!(controller.update(&mut character).unwrap().indexed);
    }

    #[test]
    fn test_grid_step_only_runs_when_idle() {
        let (mut controller, mut character) = setup(Vec2::new(1.0, 1.0));
        character.move_free(Direction::Up);
        let mut ran = false;
        controller
            .update_with(&mut character, |_| ran = true)
            .unwrap();
        assert!(!ran);

        let report = controller
            .update_with(&mut character, |c| c.set_position(Vec2::new(1.0, 0.0)))
            .unwrap();
        assert!(report.moved);
        assert!(report.indexed);
        assert_eq!(report.requested, (0.0, 0.0));
    }

    #[test]
    fn test_unindexed_mover_is_fatal() {
        let mut controller = CharacterMovementController::new(Box::new(GridSpatialIndex::new(1.0)));
        let mut character = Character::new(CharacterKind::Player, Vec2::new(0.0, 0.0), &FreeMoveConfig::default());
        character.move_free(Direction::Down);
        assert!(controller.update(&mut character).is_err());
    }
}
