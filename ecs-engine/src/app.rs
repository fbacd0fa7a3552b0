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
//! Application shell and system scheduling
//!
//! The [`App`] owns a [`World`] and three ordered lanes of systems:
//! startup, frame-update, and fixed-update. [`App::run`] executes the
//! startup lane once; the frame and fixed lanes are driven by an external
//! clock through [`App::update_frame`] and [`App::update_fixed`], once per
//! tick. Within a lane, systems always execute in registration order, and
//! the first system error stops the lane.
//!
//! Systems are plain closures over `&mut World`. For the common
//! filter-then-act shape, [`App::add_query_system`] registers a system
//! together with an include/exclude component filter: the filter is
//! validated once at registration, re-evaluated on every invocation, and
//! the up-to-date matches are passed to the closure.

use crate::ecs::{ComponentSet, EcsError, Entity, Query, QueryScope, World};
use tracing::debug;

/// Lane a system is registered into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Runs once, when [`App::run`] is called
    Startup,
    /// Runs once per rendered frame
    Frame,
    /// Runs once per fixed-rate tick
    Fixed,
}

/// Registration settings for a query-driven system
///
/// # Examples
///
/// ```
/// use ecs_engine::app::{Schedule, SystemConfig};
/// use ecs_engine::ecs::QueryScope;
///
/// let config = SystemConfig::new(Schedule::Fixed).with_scope(QueryScope::Alive);
/// assert_eq!(config.schedule, Schedule::Fixed);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SystemConfig {
    /// Lane the system runs in.
    pub schedule: Schedule,
    /// Candidate entity list its query evaluates against.
    pub scope: QueryScope,
}

impl SystemConfig {
    /// Create a configuration for the given lane with the default
    /// active-entity scope
    pub fn new(schedule: Schedule) -> Self {
        SystemConfig {
            schedule,
            scope: QueryScope::Active,
        }
    }

    /// Set the candidate scope the system's query evaluates against
    pub fn with_scope(mut self, scope: QueryScope) -> Self {
        self.scope = scope;
        self
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self::new(Schedule::Frame)
    }
}

/// A registered system
///
/// No `Send`/`Sync` bound: the core is single-threaded and run-to-
/// completion by contract.
type BoxedSystem = Box<dyn FnMut(&mut World) -> Result<(), EcsError>>;

/// The application shell driving systems against a world
///
/// # Examples
///
/// ```
/// use ecs_engine::app::App;
/// use ecs_engine::ecs::Component;
///
/// struct Counter(u32);
/// impl Component for Counter {}
///
/// let mut app = App::new();
/// app.add_startup_system(|world| {
///     let entity = world.create();
///     world.insert(entity, Counter(0))?;
///     Ok(())
/// });
/// app.run()?;
/// assert_eq!(app.world().alive_count(), 1);
/// # Ok::<(), ecs_engine::ecs::EcsError>(())
/// ```
pub struct App {
    world: World,
    startup: Vec<BoxedSystem>,
    frame: Vec<BoxedSystem>,
    fixed: Vec<BoxedSystem>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("world", &self.world)
            .field("startup", &self.startup.len())
            .field("frame", &self.frame.len())
            .field("fixed", &self.fixed.len())
            .finish()
    }
}

impl App {
    /// Create an app with an empty world and no systems
    pub fn new() -> Self {
        App {
            world: World::new(),
            startup: Vec::new(),
            frame: Vec::new(),
            fixed: Vec::new(),
        }
    }

    /// Get the world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get the world mutably
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Register a system in the given lane
    ///
    /// Systems run in registration order within their lane.
    pub fn add_system<F>(&mut self, system: F, schedule: Schedule) -> &mut Self
    where
        F: FnMut(&mut World) -> Result<(), EcsError> + 'static,
    {
        self.lane_mut(schedule).push(Box::new(system));
        self
    }

    /// Register a system in the startup lane
    pub fn add_startup_system<F>(&mut self, system: F) -> &mut Self
    where
        F: FnMut(&mut World) -> Result<(), EcsError> + 'static,
    {
        self.add_system(system, Schedule::Startup)
    }

    /// Register a system driven by an include/exclude component filter
    ///
    /// The filter is built and validated here, at registration time; a
    /// malformed set (empty include, repeated type) is rejected before the
    /// system ever runs. On each invocation the core re-evaluates the
    /// filter against the scope configured in `config` and passes the
    /// matching entities, in candidate order, alongside the world.
    ///
    /// # Examples
    ///
    /// ```
    /// use ecs_engine::app::{App, SystemConfig};
    /// use ecs_engine::ecs::Component;
    ///
    /// struct Position(f64);
    /// impl Component for Position {}
    /// struct Velocity(f64);
    /// impl Component for Velocity {}
    ///
    /// let mut app = App::new();
    /// app.add_query_system::<(Position, Velocity), (), _>(
    ///     |world, matched| {
    ///         for &entity in matched {
    ///             let step = world.get::<Velocity>(entity)?.0;
    ///             world.get_mut::<Position>(entity)?.0 += step;
    ///         }
    ///         Ok(())
    ///     },
    ///     SystemConfig::default(),
    /// )?;
    /// # Ok::<(), ecs_engine::ecs::EcsError>(())
    /// ```
    pub fn add_query_system<I, X, F>(
        &mut self,
        mut system: F,
        config: SystemConfig,
    ) -> Result<&mut Self, EcsError>
    where
        I: ComponentSet,
        X: ComponentSet,
        F: FnMut(&mut World, &[Entity]) -> Result<(), EcsError> + 'static,
    {
        let query = Query::<I, X>::new()?;
        let scope = config.scope;
        self.lane_mut(config.schedule).push(Box::new(move |world| {
            let matched = query.entities(world, scope);
            system(world, &matched)
        }));
        Ok(self)
    }

    /// Get the number of systems registered in a lane
    pub fn system_count(&self, schedule: Schedule) -> usize {
        match schedule {
            Schedule::Startup => self.startup.len(),
            Schedule::Frame => self.frame.len(),
            Schedule::Fixed => self.fixed.len(),
        }
    }

    /// Execute the startup lane once, in registration order
    ///
    /// Synchronous; the first system error aborts the run and is returned
    /// to the caller. Intended to be called once, before the clock starts
    /// ticking the update lanes.
    pub fn run(&mut self) -> Result<(), EcsError> {
        debug!(systems = self.startup.len(), "running startup lane");
        Self::run_lane(&mut self.startup, &mut self.world)
    }

    /// Execute the frame-update lane, in registration order
    ///
    /// Called by the external clock once per frame.
    pub fn update_frame(&mut self) -> Result<(), EcsError> {
        Self::run_lane(&mut self.frame, &mut self.world)
    }

    /// Execute the fixed-update lane, in registration order
    ///
    /// Called by the external clock once per fixed tick.
    pub fn update_fixed(&mut self) -> Result<(), EcsError> {
        Self::run_lane(&mut self.fixed, &mut self.world)
    }

    fn lane_mut(&mut self, schedule: Schedule) -> &mut Vec<BoxedSystem> {
        match schedule {
            Schedule::Startup => &mut self.startup,
            Schedule::Frame => &mut self.frame,
            Schedule::Fixed => &mut self.fixed,
        }
    }

    fn run_lane(lane: &mut [BoxedSystem], world: &mut World) -> Result<(), EcsError> {
        for system in lane.iter_mut() {
            system(world)?;
        }
        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Component;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Position(f64);
    impl Component for Position {}

    struct Velocity(f64);
    impl Component for Velocity {}

    struct Frozen;
    impl Component for Frozen {}

    #[test]
    fn test_startup_systems_run_once_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut app = App::new();

        for label in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            app.add_startup_system(move |_world| {
                order.borrow_mut().push(label);
                Ok(())
            });
        }

        app.run().unwrap();
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_lane_stops_at_first_error() {
        let ran_after_failure = Rc::new(RefCell::new(false));
        let mut app = App::new();

        app.add_startup_system(|world| {
            // Destroying an unknown entity is the failure under test.
            world.destroy(Entity::from_raw(99)).map(|_| ())
        });
        let flag = Rc::clone(&ran_after_failure);
        app.add_startup_system(move |_world| {
            *flag.borrow_mut() = true;
            Ok(())
        });

        assert_eq!(
            app.run().unwrap_err(),
            EcsError::InvalidEntity(Entity::from_raw(99))
        );
        assert!(!*ran_after_failure.borrow());
    }

    #[test]
    fn test_update_lanes_are_separate() {
        let mut app = App::new();
        app.add_system(|_| Ok(()), Schedule::Frame);
        app.add_system(|_| Ok(()), Schedule::Fixed);
        app.add_system(|_| Ok(()), Schedule::Fixed);

        assert_eq!(app.system_count(Schedule::Startup), 0);
        assert_eq!(app.system_count(Schedule::Frame), 1);
        assert_eq!(app.system_count(Schedule::Fixed), 2);
    }

    #[test]
    fn test_query_system_receives_fresh_matches() {
        let mut app = App::new();

        let mover = app.world_mut().create();
        app.world_mut().insert(mover, Position(0.0)).unwrap();
        app.world_mut().insert(mover, Velocity(2.0)).unwrap();

        let statue = app.world_mut().create();
        app.world_mut().insert(statue, Position(0.0)).unwrap();
        app.world_mut().insert(statue, Velocity(2.0)).unwrap();
        app.world_mut().insert(statue, Frozen).unwrap();

        app.add_query_system::<(Position, Velocity), (Frozen,), _>(
            |world, matched| {
                for &entity in matched {
                    let step = world.get::<Velocity>(entity)?.0;
                    world.get_mut::<Position>(entity)?.0 += step;
                }
                Ok(())
            },
            SystemConfig::default(),
        )
        .unwrap();

        app.update_frame().unwrap();
        assert_eq!(app.world().get::<Position>(mover).unwrap().0, 2.0);
        assert_eq!(app.world().get::<Position>(statue).unwrap().0, 0.0);

        // Thawing the statue changes the next evaluation, not a cache.
        app.world_mut().remove::<Frozen>(statue).unwrap();
        app.update_frame().unwrap();
        assert_eq!(app.world().get::<Position>(mover).unwrap().0, 4.0);
        assert_eq!(app.world().get::<Position>(statue).unwrap().0, 2.0);
    }

    #[test]
    fn test_query_system_scope_selects_candidates() {
        let mut app = App::new();
        let seen = Rc::new(RefCell::new(0usize));

        let entity = app.world_mut().create();
        app.world_mut().insert(entity, Position(0.0)).unwrap();
        app.world_mut().disable(entity).unwrap();

        let seen_active = Rc::clone(&seen);
        app.add_query_system::<(Position,), (), _>(
            move |_world, matched| {
                *seen_active.borrow_mut() = matched.len();
                Ok(())
            },
            SystemConfig::new(Schedule::Frame),
        )
        .unwrap();
        app.update_frame().unwrap();
        assert_eq!(*seen.borrow(), 0);

        let seen_alive = Rc::clone(&seen);
        app.add_query_system::<(Position,), (), _>(
            move |_world, matched| {
                *seen_alive.borrow_mut() = matched.len();
                Ok(())
            },
            SystemConfig::new(Schedule::Frame).with_scope(QueryScope::Alive),
        )
        .unwrap();
        app.update_frame().unwrap();
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn test_query_system_rejects_malformed_filters() {
        let mut app = App::new();
        let result = app.add_query_system::<(Position, Position), (), _>(
            |_world, _matched| Ok(()),
            SystemConfig::default(),
        );
        assert!(matches!(result.unwrap_err(), EcsError::InvalidQuery(_)));
        assert_eq!(app.system_count(Schedule::Frame), 0);
    }

    #[test]
    fn test_empty_lanes_run_cleanly() {
        let mut app = App::new();
        app.run().unwrap();
        app.update_frame().unwrap();
        app.update_fixed().unwrap();
    }
}
