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
//! Basic example demonstrating the ECS structure
//!
//! This example shows how to create a world, spawn entities, attach
//! components, and run include/exclude queries against them.

use ecs_engine::ecs::{Component, EcsError, World};

#[derive(Debug)]
struct Position {
    x: f32,
    y: f32,
}

impl Component for Position {}

#[derive(Debug)]
struct Velocity {
    dx: f32,
    dy: f32,
}

impl Component for Velocity {}

#[derive(Debug)]
struct Anchored;

impl Component for Anchored {}

fn main() -> Result<(), EcsError> {
    println!("ECS Engine - Basic Example");
    println!("==========================\n");

    let mut world = World::new();
    println!("Created new world");

    // A mover, a drifter, and an anchored marker.
    let mover = world.create();
    world
        .insert(mover, Position { x: 0.0, y: 0.0 })?
        .insert(mover, Velocity { dx: 1.5, dy: 0.0 })?;

    let drifter = world.create();
    world
        .insert(drifter, Position { x: 4.0, y: 2.0 })?
        .insert(drifter, Velocity { dx: 0.0, dy: -0.5 })?;

    let flag = world.create();
    world
        .insert(flag, Position { x: 9.0, y: 9.0 })?
        .insert(flag, Velocity { dx: 0.0, dy: 0.0 })?
        .insert(flag, Anchored)?;

    println!("Created {} entities:", world.alive_count());
    for &entity in world.alive_entities() {
        let position = world.get::<Position>(entity)?;
        println!("  - {} at ({}, {})", entity, position.x, position.y);
    }

    // Only entities that can move: have Position and Velocity, not Anchored.
    println!("\nMovable entities:");
    for (entity, (position, velocity)) in world.query::<(Position, Velocity), (Anchored,)>()? {
        println!(
            "  - {} at ({}, {}) moving ({}, {})",
            entity, position.x, position.y, velocity.dx, velocity.dy
        );
    }

    // Disabling drops an entity out of default queries without destroying it.
    world.disable(drifter)?;
    println!("\nAfter disabling {}:", drifter);
    for (entity, _) in world.query::<(Position, Velocity), (Anchored,)>()? {
        println!("  - {} is still active", entity);
    }

    // Destroying strips every component.
    world.destroy(mover)?;
    println!(
        "\nDestroyed {}; alive entities remaining: {}",
        mover,
        world.alive_count()
    );

    Ok(())
}
