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
//! Query construction and evaluation
//!
//! A query names an *include* set of component types that matching
//! entities must carry and an *exclude* set they must not. Evaluation
//! scans a candidate entity list — the active entities or all alive ones —
//! and produces the matching entities together with references to their
//! included components.
//!
//! Results are recomputed from scratch on every evaluation. Nothing is
//! cached or incrementally maintained: a result reflects the world at the
//! moment of evaluation, and because it borrows the world immutably, no
//! structural mutation can happen while it is held.

use crate::ecs::{ComponentSet, EcsError, Entity, World};
use std::marker::PhantomData;

/// Candidate entity list a query evaluates against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryScope {
    /// Only entities that are alive and active (the default)
    #[default]
    Active,
    /// All alive entities, active or not
    Alive,
}

/// A validated include/exclude component filter
///
/// `I` is the include set (at least one component type), `X` the exclude
/// set (possibly `()`, the empty set). Both are tuples of component types;
/// [`Query::new`] rejects an empty include set and duplicate types within
/// either set.
///
/// # Examples
///
/// ```
/// use ecs_engine::ecs::{Component, Query, World};
///
/// struct Position(f64);
/// impl Component for Position {}
/// struct Velocity(f64);
/// impl Component for Velocity {}
/// struct Frozen;
/// impl Component for Frozen {}
///
/// let mut world = World::new();
/// let mover = world.create();
/// world.insert(mover, Position(0.0))?.insert(mover, Velocity(1.0))?;
/// let statue = world.create();
/// world
///     .insert(statue, Position(5.0))?
///     .insert(statue, Velocity(0.0))?
///     .insert(statue, Frozen)?;
///
/// let query = Query::<(Position, Velocity), (Frozen,)>::new()?;
/// let rows = query.evaluate(&world);
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].0, mover);
/// # Ok::<(), ecs_engine::ecs::EcsError>(())
/// ```
pub struct Query<I: ComponentSet, X: ComponentSet = ()> {
    marker: PhantomData<fn() -> (I, X)>,
}

impl<I: ComponentSet, X: ComponentSet> Query<I, X> {
    /// Build the query, validating both component sets
    ///
    /// Fails with [`EcsError::InvalidQuery`] if the include set is empty
    /// or a component type appears twice within the include or exclude
    /// set.
    pub fn new() -> Result<Self, EcsError> {
        if I::LEN == 0 {
            return Err(EcsError::InvalidQuery(
                "include set must name at least one component type".to_string(),
            ));
        }
        Self::ensure_unique::<I>("include")?;
        Self::ensure_unique::<X>("exclude")?;
        Ok(Query {
            marker: PhantomData,
        })
    }

    fn ensure_unique<S: ComponentSet>(which: &str) -> Result<(), EcsError> {
        let mut ids = Vec::with_capacity(S::LEN);
        S::push_type_ids(&mut ids);
        for (index, id) in ids.iter().enumerate() {
            if ids[..index].contains(id) {
                return Err(EcsError::InvalidQuery(format!(
                    "component type repeated in the {} set",
                    which
                )));
            }
        }
        Ok(())
    }

    /// Evaluate against the active entities
    pub fn evaluate<'w>(&self, world: &'w World) -> Vec<(Entity, I::Refs<'w>)> {
        self.evaluate_scoped(world, QueryScope::Active)
    }

    /// Evaluate against all alive entities
    pub fn evaluate_all<'w>(&self, world: &'w World) -> Vec<(Entity, I::Refs<'w>)> {
        self.evaluate_scoped(world, QueryScope::Alive)
    }

    /// Evaluate against the candidate list selected by `scope`
    ///
    /// Candidates are visited in the candidate list's current order and
    /// accepted when every include type is present and, if the exclude set
    /// is non-empty, no exclude type is.
    pub fn evaluate_scoped<'w>(
        &self,
        world: &'w World,
        scope: QueryScope,
    ) -> Vec<(Entity, I::Refs<'w>)> {
        let mut rows = Vec::new();
        for &entity in Self::candidates(world, scope) {
            if !Self::accepts(world, entity) {
                continue;
            }
            if let Some(refs) = I::fetch(world, entity) {
                rows.push((entity, refs));
            }
        }
        rows
    }

    /// Collect just the matching entities, in candidate order
    pub fn entities(&self, world: &World, scope: QueryScope) -> Vec<Entity> {
        Self::candidates(world, scope)
            .iter()
            .copied()
            .filter(|&entity| Self::accepts(world, entity))
            .collect()
    }

    fn candidates(world: &World, scope: QueryScope) -> &[Entity] {
        match scope {
            QueryScope::Active => world.active_entities(),
            QueryScope::Alive => world.alive_entities(),
        }
    }

    fn accepts(world: &World, entity: Entity) -> bool {
        I::contains_all(world, entity) && !(X::LEN > 0 && X::contains_any(world, entity))
    }
}

impl<I: ComponentSet, X: ComponentSet> Clone for Query<I, X> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I: ComponentSet, X: ComponentSet> Copy for Query<I, X> {}

impl<I: ComponentSet, X: ComponentSet> std::fmt::Debug for Query<I, X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct A(u32);
    impl crate::ecs::Component for A {}

    #[derive(Debug, PartialEq)]
    struct B(u32);
    impl crate::ecs::Component for B {}

    struct C;
    impl crate::ecs::Component for C {}

    /// Three entities: e1 has {A, B}, e2 has {A}, e3 has {A, B, C}.
    fn fixture() -> (World, Entity, Entity, Entity) {
        let mut world = World::new();
        let e1 = world.create();
        let e2 = world.create();
        let e3 = world.create();
        world.insert(e1, A(1)).unwrap().insert(e1, B(1)).unwrap();
        world.insert(e2, A(2)).unwrap();
        world
            .insert(e3, A(3))
            .unwrap()
            .insert(e3, B(3))
            .unwrap()
            .insert(e3, C)
            .unwrap();
        (world, e1, e2, e3)
    }

    #[test]
    fn test_include_exclude_intersection() {
        let (world, e1, _e2, _e3) = fixture();

        let query = Query::<(A, B), (C,)>::new().unwrap();
        let rows = query.evaluate(&world);

        assert_eq!(rows.len(), 1);
        let (entity, (a, b)) = &rows[0];
        assert_eq!(*entity, e1);
        assert_eq!(**a, A(1));
        assert_eq!(**b, B(1));
    }

    #[test]
    fn test_empty_exclude_set() {
        let (world, e1, _e2, e3) = fixture();

        let query = Query::<(A, B)>::new().unwrap();
        let matched: Vec<Entity> = query.evaluate(&world).into_iter().map(|(e, _)| e).collect();

        assert_eq!(matched, vec![e1, e3]);
    }

    #[test]
    fn test_candidate_order_is_preserved() {
        let (world, e1, e2, e3) = fixture();

        let query = Query::<(A,)>::new().unwrap();
        let matched = query.entities(&world, QueryScope::Active);

        assert_eq!(matched, vec![e1, e2, e3]);
    }

    #[test]
    fn test_active_scope_skips_disabled_entities() {
        let (mut world, e1, _e2, e3) = fixture();
        world.disable(e1).unwrap();

        let query = Query::<(A, B)>::new().unwrap();
        assert_eq!(query.entities(&world, QueryScope::Active), vec![e3]);

        let mut all = query.entities(&world, QueryScope::Alive);
        all.sort();
        assert_eq!(all, vec![e1, e3]);
    }

    #[test]
    fn test_destroyed_entities_never_match() {
        let (mut world, e1, _e2, _e3) = fixture();
        world.destroy(e1).unwrap();

        let query = Query::<(A, B), (C,)>::new().unwrap();
        assert!(query.evaluate(&world).is_empty());
    }

    #[test]
    fn test_duplicate_include_type_is_rejected() {
        let err = Query::<(A, A)>::new().unwrap_err();
        assert!(matches!(err, EcsError::InvalidQuery(_)));
    }

    #[test]
    fn test_duplicate_exclude_type_is_rejected() {
        let err = Query::<(A,), (C, C)>::new().unwrap_err();
        assert!(matches!(err, EcsError::InvalidQuery(_)));
    }

    #[test]
    fn test_empty_include_set_is_rejected() {
        let err = Query::<(), (C,)>::new().unwrap_err();
        assert!(matches!(err, EcsError::InvalidQuery(_)));
    }

    #[test]
    fn test_any_excluded_component_rejects() {
        // Exclusion triggers on any single excluded type being present,
        // not on the full exclude set.
        let (mut world, _e1, e2, _e3) = fixture();
        world.insert(e2, C).unwrap();

        let query = Query::<(A,), (B, C)>::new().unwrap();
        assert!(query.entities(&world, QueryScope::Active).is_empty());
    }

    #[test]
    fn test_results_reflect_the_moment_of_evaluation() {
        let (mut world, e1, _e2, _e3) = fixture();

        let query = Query::<(A, B), (C,)>::new().unwrap();
        assert_eq!(query.evaluate(&world).len(), 1);

        world.remove::<B>(e1).unwrap();
        assert!(query.evaluate(&world).is_empty());
    }

    #[test]
    fn test_world_query_sugar() {
        let (world, e1, _e2, _e3) = fixture();

        let rows = world.query::<(A, B), (C,)>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, e1);

        let rows = world.query_all::<(A,), ()>().unwrap();
        assert_eq!(rows.len(), 3);
    }
}
