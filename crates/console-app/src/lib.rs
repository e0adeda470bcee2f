// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod binding;
pub mod config;
pub mod crud;
pub mod error;
pub mod filter;
pub mod forms;
pub mod ids;
pub mod login;
pub mod model;
pub mod notify;
pub mod router;
pub mod state;

pub use binding::*;
pub use config::*;
pub use crud::*;
pub use error::*;
pub use filter::*;
pub use forms::*;
pub use ids::*;
pub use login::*;
pub use model::*;
pub use notify::*;
pub use router::*;
pub use state::*;
