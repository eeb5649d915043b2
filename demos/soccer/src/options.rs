//! The demo behavior: one root option and its sub-options.
//!
//! `play` dispatches on the player's role through a common transition, the
//! way a real behavior switches roles mid-game without re-entering the
//! role's option from scratch each time.

use crate::world::{Pitch, PlayerAction, Role};

ob_engine::option! {
    /// Root option: picks the sub-behavior matching the current role.
    pub play(pitch: Pitch, o) {
        common_transition {
            pitch.role == Role::Striker => strike,
            pitch.role == Role::Sweeper => hold,
        }
        initial_state strike {
            action {
                o.call(pitch, "striker");
            }
        }
        state hold {
            action {
                o.call(pitch, "hold_position");
            }
        }
    }
}

ob_engine::option! {
    /// Chases the ball, kicks it toward the goal, repeats.
    pub striker(pitch: Pitch, o) {
        vars(v) {
            kicks: u32 = 0,
        }
        initial_state fetch {
            transition {
                o.action_done() => shoot,
            }
            action {
                o.call(pitch, "go_to_ball");
            }
        }
        state shoot {
            transition {
                o.state_time() >= 1 => fetch,
            }
            action {
                v.kicks += 1;
                kick::call(pitch, o, kick::Args { power: 2 });
            }
        }
    }
}

ob_engine::option! {
    /// Walks one cell toward the ball per cycle; done when next to it.
    pub go_to_ball(pitch: Pitch, o) {
        defs(d) {
            close_enough: i32 = 1,
        }
        common_transition {
            pitch.ball_distance() <= d.close_enough => arrived,
        }
        initial_state walk {
            action {
                let (dx, dy) = pitch.dir_to_ball();
                pitch.next_action = PlayerAction::Move(dx, dy);
            }
        }
        target_state arrived {
            action {
                pitch.next_action = PlayerAction::Nothing;
            }
        }
    }
}

ob_engine::option! {
    /// Shoves the ball goalward. Kick strength comes from `kick.cfg`.
    pub kick(pitch: Pitch, o) {
        args(a) {
            power: i32 = 1,
        }
        load(d) {
            power_scale: i32,
            spread: i32,
        }
        initial_state wind_up {
            transition {
                true => release,
            }
        }
        target_state release {
            action {
                pitch.next_action = PlayerAction::Kick {
                    power: a.power * d.power_scale,
                    spread: d.spread,
                };
            }
        }
    }
}

ob_engine::option! {
    /// Parks the sweeper on its home spot.
    pub hold_position(pitch: Pitch, o) {
        defs(d) {
            home_x: i32 = 4,
            home_y: i32 = 4,
        }
        initial_state stand {
            action {
                let (dx, dy) = pitch.dir_to(d.home_x, d.home_y);
                pitch.next_action = PlayerAction::Move(dx, dy);
            }
        }
    }
}
