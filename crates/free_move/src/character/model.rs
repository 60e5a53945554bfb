//! Character state and move commands

use bitflags::bitflags;

use crate::config::FreeMoveConfig;
use crate::foundation::math::{round4, Vec2};
use crate::movement::AutoMove;
use crate::physics::Hitbox;

use super::direction::{resolve_facing, Direction};
use super::id::CharacterId;

bitflags! {
    /// Capabilities and transient states that change how a character moves
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CharacterFlags: u32 {
        /// Drawn as a tile or an object sprite; always gets a full-tile hitbox
        const FULL_TILE = 1 << 0;
        /// Facing is locked
        const DIRECTION_FIXED = 1 << 1;
        /// Mid-jump
        const JUMPING = 1 << 2;
        /// The grid-step movement (not handled here) reports motion
        const LEGACY_MOVING = 1 << 3;
    }
}

/// What starts an event's script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTrigger {
    /// Player presses the action button next to it
    ActionButton = 0,
    /// Player walks into it
    PlayerTouch = 1,
    /// It walks into the player
    EventTouch = 2,
    /// Runs as soon as its page is active
    Autorun = 3,
    /// Runs alongside everything else
    Parallel = 4,
}

/// Event-specific state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventState {
    /// Start condition
    pub trigger: EventTrigger,
    /// Set by [`Character::start`], cleared by whoever runs the script
    pub starting: bool,
}

impl EventState {
    /// Not yet started
    pub fn new(trigger: EventTrigger) -> Self {
        Self {
            trigger,
            starting: false,
        }
    }
}

/// Concrete character variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterKind {
    /// The controlled character
    Player,
    /// Party member trailing the player
    Follower,
    /// Boat, ship or airship
    Vehicle,
    /// Map event / NPC
    Event(EventState),
}

/// Scene state a touch trigger needs to look at
#[derive(Debug, Clone, Copy, Default)]
pub struct TouchContext {
    /// An event script is already running on the map
    pub event_running: bool,
}

/// Lowest move speed level
const MIN_MOVE_SPEED: u8 = 1;
/// Highest move speed level
const MAX_MOVE_SPEED: u8 = 6;
/// Default move speed level (0.0625 tiles per frame)
const DEFAULT_MOVE_SPEED: u8 = 4;

/// A character on the map
#[derive(Debug, Clone)]
pub struct Character {
    id: CharacterId,
    kind: CharacterKind,
    flags: CharacterFlags,
    position: Vec2,
    facing: Direction,
    last_direction: Direction,
    hitbox_radius: f64,
    move_speed: u8,
    auto_move: AutoMove,
}

impl Character {
    /// Create a character at `position` with the configured default radius
    pub fn new(kind: CharacterKind, position: Vec2, config: &FreeMoveConfig) -> Self {
        Self {
            id: CharacterId::next(),
            kind,
            flags: CharacterFlags::empty(),
            position,
            facing: Direction::Down,
            last_direction: Direction::Down,
            hitbox_radius: config.hitbox_radius(),
            move_speed: DEFAULT_MOVE_SPEED,
            auto_move: AutoMove::new(),
        }
    }

    /// Override the hitbox radius; non-positive values are ignored
    pub fn with_radius(mut self, radius: f64) -> Self {
        if radius.is_finite() && radius > 0.0 {
            self.hitbox_radius = radius;
        } else {
            log::warn!("Character {}: ignoring hitbox radius {}", self.id, radius);
        }
        self
    }

    /// Set capability flags
    pub fn with_flags(mut self, flags: CharacterFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the move speed level (clamped to 1..=6)
    pub fn with_move_speed(mut self, speed: u8) -> Self {
        self.set_move_speed(speed);
        self
    }

    /// Stable identity
    pub fn id(&self) -> CharacterId {
        self.id
    }

    /// Variant
    pub fn kind(&self) -> &CharacterKind {
        &self.kind
    }

    /// Variant (mutable)
    pub fn kind_mut(&mut self) -> &mut CharacterKind {
        &mut self.kind
    }

    /// Capability flags
    pub fn flags(&self) -> CharacterFlags {
        self.flags
    }

    /// Turn flags on or off
    pub fn set_flag(&mut self, flag: CharacterFlags, enabled: bool) {
        self.flags.set(flag, enabled);
    }

    /// Is this the player
    pub fn is_player(&self) -> bool {
        matches!(self.kind, CharacterKind::Player)
    }

    /// Is this a map event
    pub fn is_event(&self) -> bool {
        matches!(self.kind, CharacterKind::Event(_))
    }

    /// Event whose trigger is one of `triggers`
    pub fn is_trigger_in(&self, triggers: &[EventTrigger]) -> bool {
        match &self.kind {
            CharacterKind::Event(event) => triggers.contains(&event.trigger),
            _ => false,
        }
    }

    /// Flag an event as starting; no effect on other kinds
    pub fn start(&mut self) {
        if let CharacterKind::Event(event) = &mut self.kind {
            event.starting = true;
            log::info!("Event {} starting ({:?})", self.id, event.trigger);
        }
    }

    /// Logical position in tiles
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Move the anchor without touching auto-move or the spatial index
    ///
    /// Use [`crate::scene::MapScene::teleport`] to keep the index in sync.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub(crate) fn translate(&mut self, dx: f64, dy: f64) {
        self.position.x += dx;
        self.position.y += dy;
    }

    /// Half-width of the hitbox
    pub fn radius(&self) -> f64 {
        if self.flags.contains(CharacterFlags::FULL_TILE) {
            0.5
        } else {
            self.hitbox_radius
        }
    }

    /// Current collision box
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::from_anchor(self.position, self.radius())
    }

    /// Sprite facing
    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// Last direction handed to [`Self::set_direction`]
    pub fn last_direction(&self) -> Direction {
        self.last_direction
    }

    /// Apply a direction change to the sprite facing
    ///
    /// Ignored when the facing is locked or there is no direction.
    pub fn set_direction(&mut self, direction: Option<Direction>) {
        let Some(direction) = direction else {
            return;
        };
        if self.flags.contains(CharacterFlags::DIRECTION_FIXED) {
            return;
        }
        self.facing = resolve_facing(self.facing, self.last_direction, direction);
        self.last_direction = direction;
    }

    /// Move speed level
    pub fn move_speed(&self) -> u8 {
        self.move_speed
    }

    /// Set the move speed level (clamped to 1..=6)
    pub fn set_move_speed(&mut self, speed: u8) {
        self.move_speed = speed.clamp(MIN_MOVE_SPEED, MAX_MOVE_SPEED);
    }

    /// Tiles travelled per frame at the current speed
    pub fn distance_per_frame(&self) -> f64 {
        2f64.powi(i32::from(self.move_speed)) / 256.0
    }

    /// Per-axis distance for a diagonal step of the same length
    pub fn distance_per_frame_diagonal(&self) -> f64 {
        round4(self.distance_per_frame() * std::f64::consts::SQRT_2 / 2.0)
    }

    /// Pending auto-move
    pub fn auto_move(&self) -> &AutoMove {
        &self.auto_move
    }

    pub(crate) fn auto_move_mut(&mut self) -> &mut AutoMove {
        &mut self.auto_move
    }

    /// Start travelling by `(dx, dy)`; a zero vector does nothing
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        self.set_direction(Direction::from_delta(dx, dy));
        self.auto_move.set_target(dx, dy);
    }

    /// Travel one frame's distance in `direction`
    pub fn move_free(&mut self, direction: Direction) {
        let distance = if direction.is_diagonal() {
            self.distance_per_frame_diagonal()
        } else {
            self.distance_per_frame()
        };
        let (sx, sy) = direction.axis_steps();
        self.move_by(sx * distance, sy * distance);
    }

    /// Travel one tile along each axis `direction` points on
    pub fn move_straight(&mut self, direction: Direction) {
        let (sx, sy) = direction.axis_steps();
        self.move_by(sx, sy);
    }

    /// Grid-step motion or auto-move in progress
    pub fn is_moving(&self) -> bool {
        self.flags.contains(CharacterFlags::LEGACY_MOVING) || self.auto_move.is_active()
    }

    /// Cancel pending auto-move (teleport, event interrupt)
    pub fn reset_auto_movement(&mut self) {
        self.auto_move.reset();
    }

    /// React to touching `other`
    ///
    /// Only the player reacts: if no script is running and it isn't jumping,
    /// touching a player-touch or event-touch event stops the player and
    /// starts the event. Returns whether an event was started.
    pub fn check_event_trigger_touch(&mut self, other: &mut Self, ctx: &TouchContext) -> bool {
        match self.kind {
            CharacterKind::Player => {
                if ctx.event_running || self.flags.contains(CharacterFlags::JUMPING) {
                    return false;
                }
                if other.is_trigger_in(&[EventTrigger::PlayerTouch, EventTrigger::EventTouch]) {
                    self.reset_auto_movement();
                    other.start();
                    return true;
                }
                false
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn player() -> Character {
        Character::new(CharacterKind::Player, Vec2::new(5.0, 5.0), &FreeMoveConfig::default())
    }

    fn event(trigger: EventTrigger) -> Character {
        Character::new(
            CharacterKind::Event(EventState::new(trigger)),
            Vec2::new(6.0, 5.0),
            &FreeMoveConfig::default(),
        )
    }

    #[test]
    fn test_full_tile_overrides_radius() {
        let character = player().with_radius(0.25);
        assert_eq!(character.radius(), 0.25);
        let character = character.with_flags(CharacterFlags::FULL_TILE);
        assert_eq!(character.radius(), 0.5);
    }

    #[test]
    fn test_invalid_radius_override_is_ignored() {
        let character = player().with_radius(-1.0);
        assert_eq!(character.radius(), 0.5);
    }

    #[test]
    fn test_distance_per_frame() {
        let character = player();
        assert_eq!(character.distance_per_frame(), 0.0625);
        assert_eq!(character.distance_per_frame_diagonal(), 0.0442);
        assert_eq!(player().with_move_speed(9).move_speed(), 6);
        assert_eq!(player().with_move_speed(0).move_speed(), 1);
    }

    #[test]
    fn test_move_free_diagonal_from_down_faces_left() {
        let mut character = player();
        assert_eq!(character.facing(), Direction::Down);
        character.move_free(Direction::DownLeft);
        assert_eq!(character.facing(), Direction::Left);
        assert_eq!(character.last_direction(), Direction::DownLeft);
        let (dx, dy) = character.auto_move().pending();
        assert_abs_diff_eq!(dx, -0.0442);
        assert_abs_diff_eq!(dy, 0.0442);
    }

    #[test]
    fn test_holding_a_diagonal_keeps_facing() {
        let mut character = player();
        character.move_free(Direction::DownLeft);
        character.move_free(Direction::DownLeft);
        assert_eq!(character.facing(), Direction::Left);
    }

    #[test]
    fn test_move_straight_is_one_tile() {
        let mut character = player();
        character.move_straight(Direction::Up);
        assert_eq!(character.auto_move().pending(), (0.0, -1.0));
        assert_eq!(character.facing(), Direction::Up);
        assert!(character.is_moving());
    }

    #[test]
    fn test_zero_move_keeps_pending() {
        let mut character = player();
        character.move_by(2.0, 0.0);
        character.move_by(0.0, 0.0);
        assert_eq!(character.auto_move().pending(), (2.0, 0.0));
        assert_eq!(character.facing(), Direction::Right);
    }

    #[test]
    fn test_fixed_direction_blocks_facing() {
        let mut character = player().with_flags(CharacterFlags::DIRECTION_FIXED);
        character.move_straight(Direction::Left);
        assert_eq!(character.facing(), Direction::Down);
        assert_eq!(character.last_direction(), Direction::Down);
        assert!(character.auto_move().is_active());
    }

    #[test]
    fn test_is_moving_includes_legacy_motion() {
        let mut character = player();
        assert!(!character.is_moving());
        character.set_flag(CharacterFlags::LEGACY_MOVING, true);
        assert!(character.is_moving());
    }

    #[test]
    fn test_player_touch_starts_event() {
        let mut player = player();
        player.move_straight(Direction::Right);
        let mut npc = event(EventTrigger::PlayerTouch);
        assert!(player.check_event_trigger_touch(&mut npc, &TouchContext::default()));
        assert!(!player.auto_move().is_active());
        assert_eq!(npc.kind(), &CharacterKind::Event(EventState { trigger: EventTrigger::PlayerTouch, starting: true }));
    }

    #[test]
    fn test_touch_gated_by_trigger_and_state() {
        let mut player = player();
        let mut action = event(EventTrigger::ActionButton);
        assert!(!player.check_event_trigger_touch(&mut action, &TouchContext::default()));

        let mut touch = event(EventTrigger::EventTouch);
        let busy = TouchContext { event_running: true };
        assert!(!player.check_event_trigger_touch(&mut touch, &busy));

        player.set_flag(CharacterFlags::JUMPING, true);
        assert!(!player.check_event_trigger_touch(&mut touch, &TouchContext::default()));
    }

    #[test]
    fn test_non_player_touch_is_noop() {
        let mut npc = event(EventTrigger::EventTouch);
        let mut other = event(EventTrigger::PlayerTouch);
        assert!(!npc.check_event_trigger_touch(&mut other, &TouchContext::default()));
        assert!(!other.is_trigger_in(&[EventTrigger::Autorun]));
    }
}
