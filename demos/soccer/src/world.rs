//! The toy pitch the demo behavior plays on.
//!
//! A single player, a ball, and a goal line on the right edge. The behavior
//! only writes `next_action`; `step()` applies it and moves the world — the
//! same read-symbols/write-one-action split a real robot host would have.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

// ── Symbols ───────────────────────────────────────────────────────────────────

/// What the player does with its body this cycle.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum PlayerAction {
    #[default]
    Nothing,
    /// Step one cell; components are clamped to -1..=1.
    Move(i32, i32),
    /// Shove the ball `power` cells toward the goal, with some scatter.
    Kick { power: i32, spread: i32 },
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Role {
    Striker,
    Sweeper,
}

// ── Pitch ─────────────────────────────────────────────────────────────────────

pub struct Pitch {
    pub width: i32,
    pub height: i32,
    /// Player position (input symbol).
    pub player: (i32, i32),
    /// Ball position (input symbol).
    pub ball: (i32, i32),
    pub role: Role,
    /// Output symbol, consumed and reset by [`step`][Self::step].
    pub next_action: PlayerAction,
    pub goals: u32,
    rng: SmallRng,
}

impl Pitch {
    pub fn new(seed: u64) -> Self {
        Pitch {
            width: 24,
            height: 9,
            player: (2, 4),
            ball: (12, 4),
            role: Role::Striker,
            next_action: PlayerAction::Nothing,
            goals: 0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Chebyshev distance from player to ball (diagonal steps count as one).
    pub fn ball_distance(&self) -> i32 {
        let dx = (self.ball.0 - self.player.0).abs();
        let dy = (self.ball.1 - self.player.1).abs();
        dx.max(dy)
    }

    /// Unit step from the player toward `(x, y)`.
    pub fn dir_to(&self, x: i32, y: i32) -> (i32, i32) {
        ((x - self.player.0).signum(), (y - self.player.1).signum())
    }

    pub fn dir_to_ball(&self) -> (i32, i32) {
        self.dir_to(self.ball.0, self.ball.1)
    }

    /// Apply `next_action` and advance the world by one tick.
    pub fn step(&mut self) {
        match self.next_action {
            PlayerAction::Nothing => {}
            PlayerAction::Move(dx, dy) => {
                self.player.0 = (self.player.0 + dx.clamp(-1, 1)).clamp(0, self.width - 1);
                self.player.1 = (self.player.1 + dy.clamp(-1, 1)).clamp(0, self.height - 1);
            }
            PlayerAction::Kick { power, spread } => {
                if self.ball_distance() <= 1 {
                    let scatter = if spread > 0 {
                        self.rng.gen_range(-spread..=spread)
                    } else {
                        0
                    };
                    self.ball.0 += power.max(1);
                    self.ball.1 = (self.ball.1 + scatter).clamp(0, self.height - 1);
                }
            }
        }
        self.next_action = PlayerAction::Nothing;

        if self.ball.0 >= self.width {
            self.goals += 1;
            self.ball = (self.width / 2, self.height / 2);
        }
    }
}
