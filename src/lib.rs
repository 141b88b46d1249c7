/*!
    firmware object registry

    a minimal introspection layer for bare-metal firmware: drivers are [object::Object]s registered in a [kernel::Kernel], exposing named typed [attribute::Attribute]s and [object::Interface]s that other drivers and external tools resolve by name at runtime. A bump [arena::Arena] provides monotonic memory and a table of named data blocks.

    nothing here allocates from a global heap, every table is bounded (see [config]).
*/
#![no_std]
#[cfg(feature = "std")]
extern crate std;

mod utils;

pub mod config;
pub mod error;
pub mod list;
pub mod arena;
pub mod attribute;
pub mod object;
pub mod kernel;

pub use error::Error;
