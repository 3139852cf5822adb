//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution: host inputs (camera, touches, ray
//! queries), the board session, configuration and bookkeeping. Each
//! submodule documents the semantics and intended usage of its resource(s).
//!
//! Overview
//! - `camera` – AR camera pose and projection helpers
//! - `gameconfig` – tunables loaded from an INI file
//! - `markerregistry` – marker id to proxy entity map
//! - `prefabs` – piece templates bound by the host
//! - `raycast` – scene ray query seam and a ground-plane provider
//! - `session` – board lifecycle, gesture accumulators, board affordances
//! - `subscriptions` – observer handles registered on activation
//! - `touch` – per-frame touch contacts
//! - `worldtime` – simulation time and delta
pub mod camera;
pub mod gameconfig;
pub mod markerregistry;
pub mod prefabs;
pub mod raycast;
pub mod session;
pub mod subscriptions;
pub mod touch;
pub mod worldtime;
