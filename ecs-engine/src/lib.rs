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
//! # ECS Engine
//!
//! A cache-friendly ECS (Entity Component System) runtime core for
//! simulation-style applications: games, agent systems, anything that
//! iterates fast over heterogeneous entity sets.
//!
//! ## Features
//!
//! - **Paged sparse-set storage**: O(1) insert/remove/lookup with dense,
//!   contiguous component arrays for hot-loop iteration
//! - **Entity lifecycle**: monotonic identifiers that are never recycled,
//!   with independent alive and active states
//! - **Queries**: conjunctive include filters with optional exclude sets,
//!   evaluated over active or all alive entities
//! - **Scheduling**: ordered startup/frame/fixed system lanes driven by an
//!   external clock
//!
//! ## Example
//!
//! ```rust
//! use ecs_engine::ecs::{Component, World};
//!
//! struct Position { x: f64, y: f64 }
//! impl Component for Position {}
//!
//! struct Velocity { dx: f64, dy: f64 }
//! impl Component for Velocity {}
//!
//! let mut world = World::new();
//! let entity = world.create();
//! world
//!     .insert(entity, Position { x: 0.0, y: 0.0 })?
//!     .insert(entity, Velocity { dx: 1.0, dy: 0.0 })?;
//!
//! for (_entity, (position, velocity)) in world.query::<(Position, Velocity), ()>()? {
//!     let _ = position.x + velocity.dx;
//! }
//! # Ok::<(), ecs_engine::ecs::EcsError>(())
//! ```

#![warn(missing_docs)]

/// Entity Component System implementation
pub mod ecs;

/// Application shell and system scheduling
pub mod app;

pub use app::App;
pub use ecs::{Entity, World};
