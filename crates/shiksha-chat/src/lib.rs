// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod format;
mod session;
mod transport;

pub use format::*;
pub use session::*;
pub use transport::*;
