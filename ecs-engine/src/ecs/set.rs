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
//! Component type sets
//!
//! [`ComponentSet`] abstracts over tuples of component types so that
//! multi-component lookups and query include/exclude lists share one
//! containment and fetch path. It is implemented for tuples of arity 1
//! through 8 and for the unit type `()`, which stands for the empty set
//! (used as the default exclude list).

use crate::ecs::{Component, Entity, World};
use std::any::{self, TypeId};

/// A set of component types examined together
///
/// Implementations are provided for `(A,)` through `(A, ..., H)` and for
/// `()`. The trait cannot usefully be implemented outside this crate: its
/// methods go through the world's internal store registry.
pub trait ComponentSet: 'static {
    /// Tuple of shared component references produced by [`fetch`](Self::fetch)
    type Refs<'w>;

    /// Number of component types in the set
    const LEN: usize;

    /// Append the [`TypeId`] of every type in the set, in declaration order
    fn push_type_ids(out: &mut Vec<TypeId>);

    /// Check that the entity has every component in the set
    fn contains_all(world: &World, entity: Entity) -> bool;

    /// Check that the entity has at least one component in the set
    fn contains_any(world: &World, entity: Entity) -> bool;

    /// Name of the first component type the entity is missing, if any
    fn first_missing(world: &World, entity: Entity) -> Option<&'static str>;

    /// Fetch references to every component in the set
    ///
    /// Returns `None` if any component is absent. Performs no entity
    /// validation; callers validate first.
    fn fetch(world: &World, entity: Entity) -> Option<Self::Refs<'_>>;
}

impl ComponentSet for () {
    type Refs<'w> = ();

    const LEN: usize = 0;

    fn push_type_ids(_out: &mut Vec<TypeId>) {}

    fn contains_all(_world: &World, _entity: Entity) -> bool {
        true
    }

    fn contains_any(_world: &World, _entity: Entity) -> bool {
        false
    }

    fn first_missing(_world: &World, _entity: Entity) -> Option<&'static str> {
        None
    }

    fn fetch(_world: &World, _entity: Entity) -> Option<Self::Refs<'_>> {
        Some(())
    }
}

macro_rules! impl_component_set {
    ($($ty:ident),+) => {
        impl<$($ty: Component),+> ComponentSet for ($($ty,)+) {
            type Refs<'w> = ($(&'w $ty,)+);

            const LEN: usize = [$(stringify!($ty)),+].len();

            fn push_type_ids(out: &mut Vec<TypeId>) {
                $(out.push(TypeId::of::<$ty>());)+
            }

            fn contains_all(world: &World, entity: Entity) -> bool {
                $(world.store_contains::<$ty>(entity))&&+
            }

            fn contains_any(world: &World, entity: Entity) -> bool {
                $(world.store_contains::<$ty>(entity))||+
            }

            fn first_missing(world: &World, entity: Entity) -> Option<&'static str> {
                $(
                    if !world.store_contains::<$ty>(entity) {
                        return Some(any::type_name::<$ty>());
                    }
                )+
                None
            }

            fn fetch(world: &World, entity: Entity) -> Option<Self::Refs<'_>> {
                Some(($(world.peek_store::<$ty>()?.try_get(entity)?,)+))
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);

#[cfg(test)]
mod tests {
    use super::*;

    struct Health(f32);
    impl Component for Health {}

    struct Armor(u32);
    impl Component for Armor {}

    struct Frozen;
    impl Component for Frozen {}

    fn fixture() -> (World, Entity) {
        let mut world = World::new();
        let entity = world.create();
        world.insert(entity, Health(10.0)).unwrap();
        world.insert(entity, Armor(5)).unwrap();
        (world, entity)
    }

    #[test]
    fn test_len_counts_types() {
        assert_eq!(<() as ComponentSet>::LEN, 0);
        assert_eq!(<(Health,) as ComponentSet>::LEN, 1);
        assert_eq!(<(Health, Armor, Frozen) as ComponentSet>::LEN, 3);
    }

    #[test]
    fn test_contains_all_is_conjunctive() {
        let (world, entity) = fixture();
        assert!(<(Health, Armor)>::contains_all(&world, entity));
        assert!(!<(Health, Frozen)>::contains_all(&world, entity));
    }

    #[test]
    fn test_contains_any_is_disjunctive() {
        let (world, entity) = fixture();
        assert!(<(Frozen, Armor)>::contains_any(&world, entity));
        assert!(!<(Frozen,)>::contains_any(&world, entity));
        assert!(!<()>::contains_any(&world, entity));
    }

    #[test]
    fn test_fetch_returns_all_references() {
        let (world, entity) = fixture();
        let (health, armor) = <(Health, Armor)>::fetch(&world, entity).unwrap();
        assert_eq!(health.0, 10.0);
        assert_eq!(armor.0, 5);
    }

    #[test]
    fn test_fetch_fails_when_any_component_absent() {
        let (world, entity) = fixture();
        assert!(<(Health, Frozen)>::fetch(&world, entity).is_none());
    }

    #[test]
    fn test_first_missing_names_the_absent_type() {
        let (world, entity) = fixture();
        let missing = <(Health, Frozen)>::first_missing(&world, entity).unwrap();
        assert!(missing.contains("Frozen"));
        assert!(<(Health, Armor)>::first_missing(&world, entity).is_none());
    }

    #[test]
    fn test_type_ids_in_declaration_order() {
        let mut ids = Vec::new();
        <(Health, Armor)>::push_type_ids(&mut ids);
        assert_eq!(ids, vec![TypeId::of::<Health>(), TypeId::of::<Armor>()]);
    }
}
