//! soccer — smallest demo for the rust_ob behavior framework.
//!
//! One striker on a 24×9 pitch: walk to the ball, kick it toward the right
//! edge, score, repeat. Each cycle prints the world state and the activation
//! graph, so the option/state progression is visible end to end:
//!
//! ```text
//! cycle 11  player (11, 4)  ball (12, 4)
//! play [strike, 11+11]
//!   striker [shoot, 11+0] (kicks = 0)
//!     kick [release, 0+0] (power = 2)
//! ```

mod options;
mod world;

use anyhow::Result;

use ob_engine::{Behavior, Cycle, OptionSet};

use world::Pitch;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED: u64 = 42;
const CYCLES: u32 = 40;

// Written next to the binary's other scratch data; `kick` loads it on the
// first begin_frame.
const KICK_CFG: &str = "power_scale: 3\nspread: 1\n";

fn main() -> Result<()> {
    let cfg_dir = std::env::temp_dir().join("rust-ob-soccer");
    std::fs::create_dir_all(&cfg_dir)?;
    std::fs::write(cfg_dir.join("kick.cfg"), KICK_CFG)?;

    let set = OptionSet::builder()
        .option(options::play::descriptor())
        .option(options::striker::descriptor())
        .option(options::go_to_ball::descriptor())
        .option(options::kick::descriptor())
        .option(options::hold_position::descriptor())
        .build()?;

    let mut behavior = Behavior::new(set)
        .record_activation_graph()
        .defs_dir(&cfg_dir);
    let mut pitch = Pitch::new(SEED);

    for t in 0..CYCLES {
        behavior.begin_frame(Cycle(t))?;
        behavior.execute(&mut pitch, "play");

        println!(
            "cycle {t:2}  player {:?}  ball {:?}",
            pitch.player, pitch.ball
        );
        if let Some(graph) = behavior.activation_graph() {
            print!("{graph}");
        }

        behavior.end_frame();
        pitch.step();
    }

    println!("goals scored: {}", pitch.goals);
    Ok(())
}
