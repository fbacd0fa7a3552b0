// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Simulation loop example
//!
//! Shows the full scheduler surface: a startup system spawning entities, a
//! fixed-update system advancing them, and a frame-update system reporting
//! state — ticked here by a plain loop standing in for the real clock.
//! Run with `RUST_LOG=trace` to see the world's lifecycle events.

use ecs_engine::app::{App, Schedule, SystemConfig};
use ecs_engine::ecs::{Component, EcsError};

#[derive(Debug)]
struct Position {
    x: f64,
}

impl Component for Position {}

#[derive(Debug)]
struct Velocity {
    dx: f64,
}

impl Component for Velocity {}

#[derive(Debug)]
struct Finished;

impl Component for Finished {}

const TRACK_LENGTH: f64 = 10.0;

fn main() -> Result<(), EcsError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut app = App::new();

    // Spawn four runners with different speeds.
    app.add_startup_system(|world| {
        for i in 1..=4 {
            let runner = world.create();
            world
                .insert(runner, Position { x: 0.0 })?
                .insert(runner, Velocity { dx: i as f64 })?;
        }
        Ok(())
    });

    // Fixed tick: advance every runner that hasn't finished.
    app.add_query_system::<(Position, Velocity), (Finished,), _>(
        |world, matched| {
            for &entity in matched {
                let step = world.get::<Velocity>(entity)?.dx;
                world.get_mut::<Position>(entity)?.x += step;
                if world.get::<Position>(entity)?.x >= TRACK_LENGTH {
                    world.insert(entity, Finished)?;
                }
            }
            Ok(())
        },
        SystemConfig::new(Schedule::Fixed),
    )?;

    // Frame tick: report progress.
    app.add_query_system::<(Position,), (), _>(
        |world, matched| {
            for &entity in matched {
                let position = world.get::<Position>(entity)?;
                let done = world.has::<Finished>(entity)?;
                println!(
                    "  {} at {:>5.1}{}",
                    entity,
                    position.x,
                    if done { "  [finished]" } else { "" }
                );
            }
            Ok(())
        },
        SystemConfig::new(Schedule::Frame),
    )?;

    app.run()?;

    // Stand-in for the excluded clock collaborator: one frame per two
    // fixed ticks until every runner is done.
    let mut tick = 0;
    loop {
        app.update_fixed()?;
        app.update_fixed()?;
        println!("frame {}:", tick);
        app.update_frame()?;
        tick += 1;

        let finished = app.world().query::<(Finished,), ()>()?.len();
        if finished == app.world().alive_count() {
            break;
        }
    }

    println!("\nAll runners finished after {} frames", tick);
    Ok(())
}
