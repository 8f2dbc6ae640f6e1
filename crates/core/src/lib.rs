#![deny(unsafe_code)]
//! Core of the node-field renderer: a decorative background of drifting,
//! pulsing nodes joined by proximity edges and pushed away by the pointer.
//!
//! Provides the [`NodeField`] state with its initializer, simulation step and
//! renderer, the [`Surface`] drawing trait, the [`Effect`] trait, an explicit
//! [`FrameLoop`], the [`Mount`] listener bridge over a [`Host`], plus
//! [`FieldConfig`], [`Scene`], colors and the [`Xorshift64`] PRNG.

pub mod bridge;
pub mod color;
pub mod config;
pub mod effect;
pub mod error;
pub mod field;
pub mod frame;
pub mod node;
pub mod prng;
pub mod render;
pub mod scene;
pub mod sim;
pub mod surface;

pub use bridge::{Host, HostEvent, ListenerKind, Mount, SurfaceSize};
pub use color::{Rgb, Rgba};
pub use config::FieldConfig;
pub use effect::Effect;
pub use error::FieldError;
pub use field::NodeField;
pub use frame::{FrameLoop, FrameScheduler, LoopState};
pub use node::{Layer, Node};
pub use prng::{RandomSource, Xorshift64};
pub use scene::Scene;
pub use surface::{DrawCommand, DrawList, Surface};
