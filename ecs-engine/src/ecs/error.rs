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
//! Error types for world and store operations
//!
//! Every validating operation fails fast at the first violated precondition
//! and leaves all structures untouched. Operations come in two families: the
//! strict family returns `Result<_, EcsError>`, while the `try_*` family
//! reports the same conditions as `bool`/`Option` for call sites that treat
//! them as expected (idempotent destroys, optional lookups).

use crate::ecs::Entity;
use thiserror::Error;

/// Errors raised by entity, component, and query operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EcsError {
    /// The identifier was never allocated by this world.
    #[error("{0} was never allocated by this world")]
    InvalidEntity(Entity),

    /// The entity has already been destroyed.
    #[error("{0} has been destroyed")]
    DeadEntity(Entity),

    /// `insert` was called for a component type the entity already has.
    #[error("{entity} already has a {component} component")]
    DuplicateComponent {
        /// The entity targeted by the insert.
        entity: Entity,
        /// Name of the component type already present.
        component: &'static str,
    },

    /// A component lookup, replace, or remove found no stored value.
    #[error("{entity} has no {component} component")]
    MissingComponent {
        /// The entity targeted by the operation.
        entity: Entity,
        /// Name of the absent component type.
        component: &'static str,
    },

    /// `activate` was called on an entity that is already active.
    #[error("{0} is already active")]
    AlreadyActive(Entity),

    /// `disable` was called on an entity that is already inactive.
    #[error("{0} is already inactive")]
    AlreadyInactive(Entity),

    /// The query's component sets are malformed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_entity() {
        let err = EcsError::DeadEntity(Entity::from_raw(3));
        assert_eq!(err.to_string(), "Entity(3) has been destroyed");

        let err = EcsError::MissingComponent {
            entity: Entity::from_raw(9),
            component: "Position",
        };
        assert_eq!(err.to_string(), "Entity(9) has no Position component");
    }
}
