//! Movement domain: system modules for controller updates.

pub(crate) mod controller;
pub(crate) mod input;
pub(crate) mod physics;

pub(crate) use controller::{
    apply_presentation, discard_unread_jump, fixed_tick_controllers, publish_presentation,
    run_scheduled_actions, tick_vfx_lifetimes,
};
pub(crate) use input::read_input;
