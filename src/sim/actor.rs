//! The player-controlled actor
//!
//! Integer vertical physics: constant gravity per tick up to a fall cap,
//! a fixed upward impulse on jump, and hard clamping to the playable band.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{Body, EntityKind};
use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub rect: Rect,
    /// Vertical velocity in pixels per tick (positive = falling)
    pub velocity: i32,
}

impl Actor {
    pub fn new(x: i32, y: i32) -> Self {
        let mut actor = Self {
            rect: Rect::new(x, y, ACTOR_WIDTH, ACTOR_HEIGHT),
            velocity: ACTOR_START_VELOCITY,
        };
        actor.clamp_to_board();
        actor
    }

    /// Actor centred on the board, as placed at level start
    pub fn centered() -> Self {
        Self::new(
            BOARD_WIDTH / 2 - ACTOR_WIDTH / 2,
            BOARD_HEIGHT / 2 - ACTOR_HEIGHT / 2,
        )
    }

    /// Lowest y the actor's top edge may reach
    #[inline]
    pub fn max_y() -> i32 {
        BOARD_HEIGHT - GROUND_MARGIN - ACTOR_HEIGHT
    }

    /// Rightmost x the actor's left edge may reach
    #[inline]
    pub fn max_x() -> i32 {
        BOARD_WIDTH - ACTOR_WIDTH
    }

    pub fn pos(&self) -> IVec2 {
        self.rect.pos
    }

    /// Whether the actor is moving up
    pub fn is_rising(&self) -> bool {
        self.velocity < 0
    }

    /// Replace any current motion with a single upward impulse.
    /// Spamming jump never stacks beyond one impulse.
    pub fn jump(&mut self) {
        self.velocity = 0;
        self.velocity -= JUMP_IMPULSE;
    }

    fn clamp_to_board(&mut self) {
        self.rect.pos.x = self.rect.pos.x.clamp(0, Self::max_x());
        self.rect.pos.y = self.rect.pos.y.clamp(0, Self::max_y());
    }
}

impl Body for Actor {
    fn tick(&mut self) {
        if self.velocity < MAX_FALL_VELOCITY {
            self.velocity = (self.velocity + GRAVITY).min(MAX_FALL_VELOCITY);
        }
        self.rect.pos.y += self.velocity;
        self.clamp_to_board();
    }

    fn bounds(&self) -> Rect {
        self.rect
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Actor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_centered_start() {
        let actor = Actor::centered();
        assert_eq!(actor.pos(), IVec2::new(426, 282));
        assert_eq!(actor.velocity, ACTOR_START_VELOCITY);
        assert_eq!(actor.bounds().size, IVec2::new(48, 36));
    }

    #[test]
    fn test_falls_to_cap() {
        let mut actor = Actor::new(100, 0);
        for _ in 0..20 {
            actor.tick();
        }
        assert_eq!(actor.velocity, MAX_FALL_VELOCITY);
        actor.tick();
        assert_eq!(actor.velocity, MAX_FALL_VELOCITY);
    }

    #[test]
    fn test_jump_while_falling() {
        let mut actor = Actor::centered();
        actor.velocity = 6;
        actor.jump();
        assert_eq!(actor.velocity, -JUMP_IMPULSE);
        let y = actor.pos().y;
        actor.tick();
        assert_eq!(actor.velocity, -JUMP_IMPULSE + GRAVITY);
        assert_eq!(actor.pos().y, y - JUMP_IMPULSE + GRAVITY);
    }

    #[test]
    fn test_jump_spam_does_not_stack() {
        let mut actor = Actor::centered();
        actor.jump();
        actor.jump();
        actor.jump();
        assert_eq!(actor.velocity, -JUMP_IMPULSE);
    }

    #[test]
    fn test_ground_and_ceiling() {
        let mut actor = Actor::new(100, Actor::max_y());
        actor.velocity = MAX_FALL_VELOCITY;
        actor.tick();
        assert_eq!(actor.pos().y, Actor::max_y());

        let mut actor = Actor::new(100, 3);
        actor.jump();
        actor.tick();
        assert_eq!(actor.pos().y, 0);
    }

    proptest! {
        #[test]
        fn velocity_never_decreases_without_jump(start in -14i32..=8, ticks in 1usize..60) {
            let mut actor = Actor::centered();
            actor.velocity = start;
            let mut last = actor.velocity;
            for _ in 0..ticks {
                actor.tick();
                prop_assert!(actor.velocity >= last);
                prop_assert!(actor.velocity <= MAX_FALL_VELOCITY);
                if last == MAX_FALL_VELOCITY {
                    prop_assert_eq!(actor.velocity, MAX_FALL_VELOCITY);
                }
                last = actor.velocity;
            }
        }

        #[test]
        fn position_stays_in_band(
            x in -2000i32..2000,
            y in -2000i32..2000,
            velocity in -40i32..40,
            jumps in proptest::collection::vec(any::<bool>(), 1..40),
        ) {
            let mut actor = Actor::new(0, 0);
            actor.rect.pos = IVec2::new(x, y);
            actor.velocity = velocity;
            for jump in jumps {
                if jump {
                    actor.jump();
                }
                actor.tick();
                let pos = actor.pos();
                prop_assert!(pos.x >= 0 && pos.x <= Actor::max_x());
                prop_assert!(pos.y >= 0 && pos.y <= Actor::max_y());
            }
        }
    }
}
