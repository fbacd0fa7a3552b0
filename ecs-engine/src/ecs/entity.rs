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
//! Entity identifiers
//!
//! Entities are lightweight integer handles that tie components together.
//! Identifiers are allocated monotonically by the [`World`](crate::ecs::World)
//! and are never recycled: a destroyed entity's identifier stays dead for the
//! lifetime of the world, so a stale handle can never alias a newer entity.

use std::fmt;

/// Unique identifier for an entity
///
/// An `Entity` carries no data of its own; it is only meaningful together
/// with the [`World`](crate::ecs::World) that allocated it.
///
/// # Examples
///
/// ```
/// use ecs_engine::ecs::Entity;
///
/// let entity = Entity::from_raw(42);
/// assert_eq!(entity.raw(), 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u64);

impl Entity {
    /// Create an entity handle from a raw identifier
    ///
    /// Handles built this way are only valid against a world that has
    /// actually allocated the identifier; the constructor exists for tests,
    /// benches, and direct [`ComponentStore`](crate::ecs::ComponentStore)
    /// usage.
    pub const fn from_raw(id: u64) -> Self {
        Entity(id)
    }

    /// Get the raw identifier value
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Get the identifier as an index into sparse structures
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}
