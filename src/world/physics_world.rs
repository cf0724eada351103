use log::{debug, trace, warn};
use slotmap::SlotMap;

use crate::collision::{BroadPhase, Contact, NarrowPhase, AABB};
use crate::config::WorldConfig;
use crate::error::{PhysicsError, PhysicsResult};
use crate::integration::integrator;
use crate::math::vec2::Vec2;
use crate::objects::{Body, BodyHandle};
use crate::shapes::WorldShape;
use crate::world::events::{CollisionObserver, ObserverId};
use crate::world::resolver::Resolver;

/// A contact plus the relative normal speed of its bodies before the solve.
#[derive(Debug, Clone, Copy)]
struct SolvedContact {
    contact: Contact,
    normal_speed_before: f64,
}

/// Broad-phase pairs for one step and the positions their boxes were built
/// around. Each box bounds its body for as long as the body stays within
/// `reach` of its anchor.
struct CandidatePairs {
    pairs: Vec<(usize, usize)>,
    anchors: Vec<Vec2>,
    reach: f64,
}

/// Owns every body and advances them with a fixed number of substeps per
/// `step`: integrate, detect and push apart, then rebuild velocities.
pub struct PhysicsWorld {
    bodies: SlotMap<BodyHandle, Body>,
    // Insertion order; pair enumeration follows it
    order: Vec<BodyHandle>,
    observers: SlotMap<ObserverId, Box<dyn CollisionObserver>>,
    // Every contact found during the last step
    contacts: Vec<Contact>,
    config: WorldConfig,
    resolver: Resolver,
    narrow_phase: Box<dyn NarrowPhase>,
    broad_phase: Box<dyn BroadPhase>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Creates a new, empty physics world with default settings.
    pub fn new() -> Self {
        Self::from_valid_config(WorldConfig::default())
    }

    pub fn with_config(config: WorldConfig) -> PhysicsResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: WorldConfig) -> Self {
        let narrow_phase = config.narrow_phase.build();
        let broad_phase = config.broad_phase.build();
        debug!(
            "creating world: narrow phase {}, broad phase {}, {} substeps",
            narrow_phase.name(),
            broad_phase.name(),
            config.substeps
        );
        PhysicsWorld {
            bodies: SlotMap::with_key(),
            order: Vec::new(),
            observers: SlotMap::with_key(),
            contacts: Vec::new(),
            resolver: Resolver::from_config(&config),
            config,
            narrow_phase,
            broad_phase,
        }
    }

    /// Adds a body to the world. The handle stays valid until the body is
    /// deleted and purged.
    pub fn add(&mut self, mut body: Body) -> BodyHandle {
        body.marked_for_deletion = false;
        body.previous_position = body.position;
        let kind = body.kind;
        let handle = self.bodies.insert(body);
        self.order.push(handle);
        debug!("added {kind:?} body {handle:?}");
        handle
    }

    /// Marks a body for removal at the start of the next step.
    pub fn delete(&mut self, handle: BodyHandle) -> PhysicsResult<()> {
        match self.bodies.get_mut(handle) {
            Some(body) if !body.marked_for_deletion => {
                body.marked_for_deletion = true;
                debug!("marked body {handle:?} for deletion");
                Ok(())
            }
            _ => Err(PhysicsError::AlreadyDeleted(handle)),
        }
    }

    /// Registers an observer for the contact list of every solve pass that
    /// found at least one contact.
    ///
    /// Pairs of two kinematic bodies are never tested, so a kinematic sensor
    /// only reports contacts with dynamic bodies.
    pub fn subscribe(&mut self, observer: impl CollisionObserver + 'static) -> ObserverId {
        let id = self.observers.insert(Box::new(observer));
        debug!("subscribed collision observer {id:?}");
        id
    }

    /// Removes an observer, handing it back. `None` if it was already removed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> Option<Box<dyn CollisionObserver>> {
        let observer = self.observers.remove(id);
        if observer.is_some() {
            debug!("unsubscribed collision observer {id:?}");
        }
        observer
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle)
    }

    /// Number of bodies not marked for deletion.
    pub fn len(&self) -> usize {
        self.bodies.values().filter(|body| !body.marked_for_deletion).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Handles of live bodies, in insertion order.
    pub fn handles(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.bodies().map(|(handle, _)| handle)
    }

    /// Live bodies with their handles, in insertion order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.order
            .iter()
            .filter_map(move |&handle| self.bodies.get(handle).map(|body| (handle, body)))
            .filter(|(_, body)| !body.marked_for_deletion)
    }

    /// Contacts found during the last step, in detection order.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Advances the simulation by `elapsed_millis` milliseconds.
    ///
    /// Bodies deleted since the last step are purged first. Negative or NaN
    /// durations advance nothing; durations above `max_step_millis` are
    /// clamped.
    pub fn step(&mut self, elapsed_millis: f64) {
        self.purge_deleted();
        self.contacts.clear();

        let millis = self.clamp_elapsed(elapsed_millis);
        if millis <= 0.0 || self.order.is_empty() {
            return;
        }

        let dt = millis / 1000.0;
        let h = dt / f64::from(self.config.substeps);
        let gravity = if self.config.gravity_enabled { self.config.gravity } else { Vec2::ZERO };
        // Slower approaches than two substeps of free fall are resting contacts
        let resting_speed = 2.0 * gravity.magnitude() * h;

        let mut candidates = self.candidate_pairs(dt, gravity);

        for _ in 0..self.config.substeps {
            // Pre-solve
            for handle in &self.order {
                if let Some(body) = self.bodies.get_mut(*handle) {
                    integrator::integrate_position(body, gravity, h);
                }
            }

            // Solve
            let mut solved = Vec::new();
            for _ in 0..self.config.solver_iterations {
                if self.has_left_box(&candidates) {
                    debug!("a body moved past its broad-phase margin, rebuilding pairs");
                    candidates = self.candidate_pairs(dt, gravity);
                }
                let found = self.solve_positions(&candidates.pairs, resting_speed);
                self.publish(&found);
                solved.extend(found);
            }

            // Post-solve
            for handle in &self.order {
                if let Some(body) = self.bodies.get_mut(*handle) {
                    integrator::reconstruct_velocity(body, h);
                }
            }
            for solved_contact in &solved {
                let contact = &solved_contact.contact;
                if let Some([body1, body2]) = self.bodies.get_disjoint_mut([contact.body1, contact.body2]) {
                    self.resolver.resolve_velocity(
                        body1,
                        body2,
                        contact,
                        solved_contact.normal_speed_before,
                        resting_speed,
                    );
                }
            }
        }
    }

    fn purge_deleted(&mut self) {
        let before = self.bodies.len();
        self.bodies.retain(|_, body| !body.marked_for_deletion);
        let purged = before - self.bodies.len();
        if purged > 0 {
            let bodies = &self.bodies;
            self.order.retain(|&handle| bodies.contains_key(handle));
            debug!("purged {purged} deleted bodies");
        }
    }

    fn clamp_elapsed(&self, elapsed_millis: f64) -> f64 {
        if elapsed_millis.is_nan() || elapsed_millis < 0.0 {
            warn!("ignoring invalid elapsed time {elapsed_millis} ms");
            return 0.0;
        }
        if elapsed_millis > self.config.max_step_millis {
            warn!(
                "clamping elapsed time {elapsed_millis} ms to {} ms",
                self.config.max_step_millis
            );
            return self.config.max_step_millis;
        }
        elapsed_millis
    }

    /// Broad phase over boxes that bound every position a body can reach
    /// during the step without outside pushes.
    fn candidate_pairs(&mut self, dt: f64, gravity: Vec2) -> CandidatePairs {
        let max_speed = self
            .order
            .iter()
            .filter_map(|handle| self.bodies.get(*handle))
            .map(|body| body.velocity.magnitude())
            .fold(0.0, f64::max);
        let reach = (max_speed + gravity.magnitude() * dt) * dt + self.config.penetration_slop;

        let mut anchors = Vec::with_capacity(self.order.len());
        let mut aabbs = Vec::with_capacity(self.order.len());
        for body in self.order.iter().filter_map(|handle| self.bodies.get(*handle)) {
            let extent = body.shape.bounding_radius() + reach;
            anchors.push(body.position);
            aabbs.push(AABB::new(body.position, body.position).inflated(extent));
        }
        let pairs = self.broad_phase.pairs(&aabbs);
        trace!("{} candidate pairs among {} bodies", pairs.len(), aabbs.len());
        CandidatePairs { pairs, anchors, reach }
    }

    /// Whether a body may have left its broad-phase box, for example after a
    /// deep overlap pushed it out.
    fn has_left_box(&self, candidates: &CandidatePairs) -> bool {
        self.order.iter().zip(&candidates.anchors).any(|(handle, anchor)| {
            self.bodies
                .get(*handle)
                .is_some_and(|body| body.position.distance(*anchor) > candidates.reach)
        })
    }

    /// One detection and position pass over the candidate pairs.
    fn solve_positions(
        &mut self,
        pairs: &[(usize, usize)],
        resting_speed: f64,
    ) -> Vec<SolvedContact> {
        let shapes: Vec<WorldShape> = self
            .order
            .iter()
            .map(|handle| self.bodies[*handle].bounding_shape_in_world_space())
            .collect();

        let mut found = Vec::new();
        for &(i, j) in pairs {
            let (handle1, handle2) = (self.order[i], self.order[j]);
            let (body1, body2) = (&self.bodies[handle1], &self.bodies[handle2]);
            // Kinematic bodies never respond, so their mutual contacts are skipped
            if !body1.is_dynamic() && !body2.is_dynamic() {
                continue;
            }
            match self.narrow_phase.collide(&shapes[i], &shapes[j]) {
                Ok(Some(penetration)) => {
                    let contact = Contact::new(handle1, handle2, penetration);
                    let normal_speed_before = (body1.velocity - body2.velocity).dot(contact.normal);
                    found.push(SolvedContact { contact, normal_speed_before });
                }
                Ok(None) => {}
                Err(err) => self.narrow_phase_failed(handle1, handle2, err),
            }
        }

        for solved in &found {
            let contact = &solved.contact;
            if let Some([body1, body2]) = self.bodies.get_disjoint_mut([contact.body1, contact.body2]) {
                self.resolver.resolve_position(
                    body1,
                    body2,
                    contact,
                    solved.normal_speed_before,
                    resting_speed,
                );
            }
        }
        found
    }

    fn narrow_phase_failed(&self, handle1: BodyHandle, handle2: BodyHandle, err: PhysicsError) {
        if self.config.strict {
            panic!(
                "narrow phase {} failed on {handle1:?} and {handle2:?}: {err}",
                self.narrow_phase.name()
            );
        }
        warn!("skipping pair {handle1:?}, {handle2:?}: {err}");
    }

    fn publish(&mut self, found: &[SolvedContact]) {
        if found.is_empty() {
            return;
        }
        let contacts: Vec<Contact> = found.iter().map(|solved| solved.contact).collect();
        trace!("{} contacts in solve pass", contacts.len());
        for observer in self.observers.values_mut() {
            observer.on_collisions(&contacts);
        }
        self.contacts.extend(contacts);
    }
}
