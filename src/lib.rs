pub mod attach;
pub mod ctype;
pub mod error;
pub mod except;
pub mod ident;
mod key;
pub mod locals;
pub mod matcher;
pub mod multi;
pub mod param;
pub mod registry;
pub mod scope;
pub mod subst;
pub mod wrapper;

mod engine;

#[cfg(test)]
mod testutil;

pub use crate::ctype::TypeSystem;
pub use crate::engine::{Engine, EngineConfig};
pub use crate::error::{Result, TypemapError};
pub use crate::ident::Ident;
pub use crate::key::OpKey;
pub use crate::param::{AttrValue, KwArg, Param};
pub use crate::registry::TypemapEntry;
pub use crate::wrapper::LocalSink;
