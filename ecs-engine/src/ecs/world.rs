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
//! World management
//!
//! The World is the central container for all ECS data. It allocates
//! entity identifiers, tracks each entity's alive/active state, owns one
//! [`ComponentStore`] per component type, and coordinates the operations
//! that cut across stores (destruction, queries).
//!
//! Identifiers are handed out monotonically and never reused. Every entity
//! has two state bits: *alive* (not destroyed) and *active* (participating
//! in default query iteration). An entity can only be active while alive;
//! destruction clears both bits and strips the entity's components from
//! every registered store.

use crate::ecs::{Component, ComponentSet, ComponentStore, EcsError, Entity, ErasedStore, Query};
use std::any::{self, TypeId};
use std::collections::HashMap;
use tracing::{debug, trace};

/// The main ECS world container
///
/// # Examples
///
/// ```
/// use ecs_engine::ecs::{Component, World};
///
/// struct Position { x: f64, y: f64 }
/// impl Component for Position {}
///
/// struct Velocity { dx: f64, dy: f64 }
/// impl Component for Velocity {}
///
/// let mut world = World::new();
/// let entity = world.create();
/// world
///     .insert(entity, Position { x: 0.0, y: 0.0 })?
///     .insert(entity, Velocity { dx: 1.0, dy: 0.0 })?;
///
/// assert!(world.has::<Velocity>(entity)?);
/// # Ok::<(), ecs_engine::ecs::EcsError>(())
/// ```
pub struct World {
    next_id: u64,
    /// Alive bit per allocated identifier (index = raw id)
    alive_flags: Vec<bool>,
    /// Active bit per allocated identifier (index = raw id)
    active_flags: Vec<bool>,
    alive_list: Vec<Entity>,
    active_list: Vec<Entity>,
    /// One type-erased store per component type, created on first access
    stores: HashMap<TypeId, Box<dyn ErasedStore>>,
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("next_id", &self.next_id)
            .field("alive", &self.alive_list.len())
            .field("active", &self.active_list.len())
            .field("stores", &self.stores.len())
            .finish()
    }
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        World {
            next_id: 0,
            alive_flags: Vec::new(),
            active_flags: Vec::new(),
            alive_list: Vec::new(),
            active_list: Vec::new(),
            stores: HashMap::new(),
        }
    }

    // -- Entity lifecycle --

    /// Create a new entity, alive and active
    ///
    /// Never fails. The returned identifier is unique for the lifetime of
    /// the world.
    pub fn create(&mut self) -> Entity {
        let entity = Entity::from_raw(self.next_id);
        self.next_id += 1;
        self.alive_flags.push(true);
        self.active_flags.push(true);
        self.alive_list.push(entity);
        self.active_list.push(entity);
        trace!(entity = %entity, "created entity");
        entity
    }

    /// Destroy an entity, removing its components from every store
    ///
    /// Fails with [`EcsError::InvalidEntity`] for identifiers this world
    /// never allocated and [`EcsError::DeadEntity`] if the entity was
    /// already destroyed. Destruction is terminal; identifiers are not
    /// reused.
    ///
    /// List membership is removed with a linear scan plus swap-remove, so
    /// the relative order of the remaining alive/active entities is
    /// unspecified.
    pub fn destroy(&mut self, entity: Entity) -> Result<&mut Self, EcsError> {
        self.ensure_alive(entity)?;
        self.alive_flags[entity.index()] = false;
        self.active_flags[entity.index()] = false;
        Self::unordered_remove(&mut self.alive_list, entity);
        Self::unordered_remove(&mut self.active_list, entity);
        for store in self.stores.values_mut() {
            store.destroy(entity);
        }
        trace!(entity = %entity, "destroyed entity");
        Ok(self)
    }

    /// Destroy an entity if it is currently alive
    ///
    /// Returns `false`, with no side effect, for unknown or already
    /// destroyed entities; safe to call twice.
    pub fn try_destroy(&mut self, entity: Entity) -> bool {
        self.destroy(entity).is_ok()
    }

    /// Destroy every alive entity
    ///
    /// Operates on a snapshot of the alive list, so the sweep neither
    /// skips nor double-visits entries while the list shrinks underneath
    /// it.
    pub fn destroy_all(&mut self) -> &mut Self {
        let snapshot = self.alive_list.clone();
        debug!(count = snapshot.len(), "destroying all entities");
        for entity in snapshot {
            self.try_destroy(entity);
        }
        self
    }

    /// Mark an alive entity as active
    ///
    /// Fails with [`EcsError::AlreadyActive`] if it already is, and with
    /// the usual identifier/liveness errors otherwise.
    pub fn activate(&mut self, entity: Entity) -> Result<&mut Self, EcsError> {
        self.ensure_alive(entity)?;
        if self.active_flags[entity.index()] {
            return Err(EcsError::AlreadyActive(entity));
        }
        self.active_flags[entity.index()] = true;
        self.active_list.push(entity);
        trace!(entity = %entity, "activated entity");
        Ok(self)
    }

    /// Mark an alive entity as inactive
    ///
    /// Inactive entities keep their components but drop out of
    /// active-scoped queries. Fails with [`EcsError::AlreadyInactive`] if
    /// the entity is already inactive.
    pub fn disable(&mut self, entity: Entity) -> Result<&mut Self, EcsError> {
        self.ensure_alive(entity)?;
        if !self.active_flags[entity.index()] {
            return Err(EcsError::AlreadyInactive(entity));
        }
        self.active_flags[entity.index()] = false;
        Self::unordered_remove(&mut self.active_list, entity);
        trace!(entity = %entity, "disabled entity");
        Ok(self)
    }

    /// Activate the entity, reporting failure as `false` instead of an error
    pub fn try_activate(&mut self, entity: Entity) -> bool {
        self.activate(entity).is_ok()
    }

    /// Disable the entity, reporting failure as `false` instead of an error
    pub fn try_disable(&mut self, entity: Entity) -> bool {
        self.disable(entity).is_ok()
    }

    /// Activate every alive entity that is currently inactive
    pub fn activate_all(&mut self) -> &mut Self {
        let snapshot = self.alive_list.clone();
        debug!(count = snapshot.len(), "activating all entities");
        for entity in snapshot {
            self.try_activate(entity);
        }
        self
    }

    /// Disable every currently active entity
    pub fn disable_all(&mut self) -> &mut Self {
        let snapshot = self.active_list.clone();
        debug!(count = snapshot.len(), "disabling all entities");
        for entity in snapshot {
            self.try_disable(entity);
        }
        self
    }

    /// Check if an entity is alive
    ///
    /// Unknown identifiers are reported as not alive.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive_flags.get(entity.index()).copied().unwrap_or(false)
    }

    /// Check if an entity is alive and active
    pub fn is_active(&self, entity: Entity) -> bool {
        self.active_flags.get(entity.index()).copied().unwrap_or(false)
    }

    /// Get the total number of identifiers ever allocated
    pub fn entity_count(&self) -> usize {
        self.next_id as usize
    }

    /// Get the number of alive entities
    pub fn alive_count(&self) -> usize {
        self.alive_list.len()
    }

    /// Get the number of active entities
    pub fn active_count(&self) -> usize {
        self.active_list.len()
    }

    /// Get the alive entities, in unspecified order
    pub fn alive_entities(&self) -> &[Entity] {
        &self.alive_list
    }

    /// Get the active entities, in unspecified order
    pub fn active_entities(&self) -> &[Entity] {
        &self.active_list
    }

    // -- Components --

    /// Attach a component to an alive entity
    ///
    /// Fails with [`EcsError::DuplicateComponent`] if the entity already
    /// has a component of this type. Returns the world for chaining:
    /// `world.insert(e, a)?.insert(e, b)?`.
    pub fn insert<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Result<&mut Self, EcsError> {
        self.ensure_alive(entity)?;
        self.store_mut::<T>().insert(entity, component)?;
        Ok(self)
    }

    /// Overwrite an existing component on an alive entity
    ///
    /// Fails with [`EcsError::MissingComponent`] if the entity has no
    /// component of this type.
    pub fn replace<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Result<&mut Self, EcsError> {
        self.ensure_alive(entity)?;
        self.store_mut::<T>().replace(entity, component)?;
        Ok(self)
    }

    /// Attach or overwrite a component on an alive entity
    ///
    /// Only the entity checks can fail; presence of an existing component
    /// is handled by overwriting it.
    pub fn insert_or_replace<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Result<&mut Self, EcsError> {
        self.ensure_alive(entity)?;
        self.store_mut::<T>().insert_or_replace(entity, component);
        Ok(self)
    }

    /// Remove a component from an alive entity
    ///
    /// Fails with [`EcsError::MissingComponent`] if absent.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Result<&mut Self, EcsError> {
        self.ensure_alive(entity)?;
        self.store_mut::<T>().remove(entity)?;
        Ok(self)
    }

    /// Remove a component if the entity is alive and has one
    ///
    /// Returns the removed value, or `None` for unknown/dead entities and
    /// absent components alike.
    pub fn try_remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        if self.ensure_alive(entity).is_err() {
            return None;
        }
        self.store_mut::<T>().try_remove(entity)
    }

    /// Get a reference to an alive entity's component
    pub fn get<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        self.ensure_alive(entity)?;
        match self.peek_store::<T>() {
            Some(store) => store.get(entity),
            None => Err(EcsError::MissingComponent {
                entity,
                component: any::type_name::<T>(),
            }),
        }
    }

    /// Get a mutable reference to an alive entity's component
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.ensure_alive(entity)?;
        self.store_mut::<T>().get_mut(entity)
    }

    /// Get a reference to the component, or `None` on any failed precondition
    pub fn try_get<T: Component>(&self, entity: Entity) -> Option<&T> {
        if self.ensure_alive(entity).is_err() {
            return None;
        }
        self.peek_store::<T>()?.try_get(entity)
    }

    /// Get a mutable reference to the component, or `None` on any failed
    /// precondition
    pub fn try_get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        if self.ensure_alive(entity).is_err() {
            return None;
        }
        self.store_mut::<T>().try_get_mut(entity)
    }

    /// Check whether an alive entity has a component of type `T`
    pub fn has<T: Component>(&self, entity: Entity) -> Result<bool, EcsError> {
        self.ensure_alive(entity)?;
        Ok(self.store_contains::<T>(entity))
    }

    // -- Multi-component access --

    /// Get references to several components of an alive entity at once
    ///
    /// Fails with [`EcsError::MissingComponent`] naming the first absent
    /// type if the entity does not have the full set.
    ///
    /// # Examples
    ///
    /// ```
    /// use ecs_engine::ecs::{Component, World};
    ///
    /// struct Health(f32);
    /// impl Component for Health {}
    /// struct Armor(u32);
    /// impl Component for Armor {}
    ///
    /// let mut world = World::new();
    /// let entity = world.create();
    /// world.insert(entity, Health(10.0))?.insert(entity, Armor(5))?;
    ///
    /// let (health, armor) = world.fetch::<(Health, Armor)>(entity)?;
    /// assert_eq!(health.0, 10.0);
    /// assert_eq!(armor.0, 5);
    /// # Ok::<(), ecs_engine::ecs::EcsError>(())
    /// ```
    pub fn fetch<S: ComponentSet>(&self, entity: Entity) -> Result<S::Refs<'_>, EcsError> {
        self.ensure_alive(entity)?;
        match S::fetch(self, entity) {
            Some(refs) => Ok(refs),
            None => Err(EcsError::MissingComponent {
                entity,
                component: S::first_missing(self, entity).unwrap_or("unknown"),
            }),
        }
    }

    /// Get references to several components, or `None` on any failed
    /// precondition
    pub fn try_fetch<S: ComponentSet>(&self, entity: Entity) -> Option<S::Refs<'_>> {
        if self.ensure_alive(entity).is_err() {
            return None;
        }
        S::fetch(self, entity)
    }

    /// Check whether an alive entity has every component in the set
    pub fn has_all<S: ComponentSet>(&self, entity: Entity) -> Result<bool, EcsError> {
        self.ensure_alive(entity)?;
        Ok(S::contains_all(self, entity))
    }

    // -- Queries --

    /// Evaluate a query over the active entities
    ///
    /// Equivalent to constructing a [`Query<I, X>`] and calling
    /// [`Query::evaluate`]; see that type for the matching rules.
    pub fn query<I: ComponentSet, X: ComponentSet>(
        &self,
    ) -> Result<Vec<(Entity, I::Refs<'_>)>, EcsError> {
        Ok(Query::<I, X>::new()?.evaluate(self))
    }

    /// Evaluate a query over all alive entities, active or not
    pub fn query_all<I: ComponentSet, X: ComponentSet>(
        &self,
    ) -> Result<Vec<(Entity, I::Refs<'_>)>, EcsError> {
        Ok(Query::<I, X>::new()?.evaluate_all(self))
    }

    // -- Internals --

    fn ensure_alive(&self, entity: Entity) -> Result<(), EcsError> {
        if entity.raw() >= self.next_id {
            return Err(EcsError::InvalidEntity(entity));
        }
        if !self.alive_flags[entity.index()] {
            return Err(EcsError::DeadEntity(entity));
        }
        Ok(())
    }

    fn unordered_remove(list: &mut Vec<Entity>, entity: Entity) {
        if let Some(position) = list.iter().position(|&e| e == entity) {
            list.swap_remove(position);
        }
    }

    /// The store for `T`, created and registered on first access
    ///
    /// Exactly one store exists per component type for the lifetime of the
    /// world.
    fn store_mut<T: Component>(&mut self) -> &mut ComponentStore<T> {
        self.stores
            .entry(TypeId::of::<T>())
            .or_insert_with(|| {
                debug!(component = any::type_name::<T>(), "registered component store");
                Box::new(ComponentStore::<T>::new())
            })
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
            .expect("store registered under the TypeId of a different component type")
    }

    pub(crate) fn peek_store<T: Component>(&self) -> Option<&ComponentStore<T>> {
        self.stores
            .get(&TypeId::of::<T>())
            .and_then(|store| store.as_any().downcast_ref::<ComponentStore<T>>())
    }

    pub(crate) fn store_contains<T: Component>(&self, entity: Entity) -> bool {
        self.peek_store::<T>()
            .map_or(false, |store| store.contains(entity))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
