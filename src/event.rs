//! Lifecycle event types handed to predicates.
//!
//! Each event borrows the object(s) it concerns; predicates answer whether
//! an event of that shape would be dispatched to the control loop.

use crate::object::Object;

/// An object was created.
#[derive(Clone, Copy)]
pub struct CreateEvent<'a> {
    /// The created object.
    pub object: &'a dyn Object,
}

/// An object transitioned from an old to a new state.
#[derive(Clone, Copy)]
pub struct UpdateEvent<'a> {
    /// State before the transition.
    pub object_old: &'a dyn Object,
    /// State after the transition.
    pub object_new: &'a dyn Object,
}

/// An object was deleted.
#[derive(Clone, Copy)]
pub struct DeleteEvent<'a> {
    /// The deleted object.
    pub object: &'a dyn Object,
}

/// An event outside the create/update/delete lifecycle.
#[derive(Clone, Copy)]
pub struct GenericEvent<'a> {
    /// The object the event concerns.
    pub object: &'a dyn Object,
}
