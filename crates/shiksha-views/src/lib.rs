// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod registry;
mod render;
mod search;
mod views;

pub use registry::*;
pub use render::*;
pub use search::*;
