// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod export;
mod format;
mod nav;
mod prefs;
mod snapshot;

pub use export::*;
pub use format::*;
pub use nav::*;
pub use prefs::*;
pub use snapshot::*;
