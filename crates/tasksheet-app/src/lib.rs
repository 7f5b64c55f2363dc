// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod cell;
pub mod ids;
pub mod model;
pub mod nav;
pub mod sink;
pub mod state;
pub mod store;

pub use cell::*;
pub use ids::*;
pub use model::*;
pub use nav::*;
pub use sink::*;
pub use state::*;
pub use store::*;
