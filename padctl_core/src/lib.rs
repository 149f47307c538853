#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core controller logic (hardware-agnostic).
//!
//! All hardware interactions go through the scan and sink traits in
//! `padctl_traits`.
//!
//! ## Architecture
//!
//! - **Conditioning**: oversample, extended-range remap, EMA, hysteresis, quantize (`conditioner`)
//! - **Digital**: polarity-normalized line bitfield (`digital`)
//! - **Dispatch**: change-gated delivery against a baseline of accepted sends (`dispatch`)
//! - **Controller**: one `tick()` wiring the above together (`controller`, `builder`)
//! - **Runner**: fixed-cadence loop over a `Clock` (`runner`)
//! - **Replay**: offline trace replay through the same pipeline (`replay`)

pub mod aggregate;
pub mod builder;
pub mod conditioner;
pub mod config;
pub mod controller;
pub mod conversions;
pub mod digital;
pub mod dispatch;
pub mod error;
pub mod hw_error;
pub mod mocks;
pub mod replay;
pub mod runner;
pub mod status;
pub mod util;

pub use builder::{ControllerBuilder, Missing, PadController, Set, build_controller};
pub use conditioner::{AnalogChannelState, ChannelConditioner, Conditioner};
pub use config::{ChannelCfg, ConditionerCfg, DispatchCfg, LineCfg, TickCfg};
pub use controller::Controller;
pub use dispatch::{DispatchBaseline, DispatchEngine};
pub use error::{BuildError, PadError, Result};
pub use status::TickReport;
