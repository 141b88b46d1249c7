/*!
    compile-time sizing of the registry

    every table in this crate is bounded, their capacities are set here. Exceeding one of them is reported as [crate::Error::CapacityExceeded]
*/

/// version of this crate, exposed by the kernel's `version` attribute
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// name of the kernel object, always first in the object list
pub const KERNEL_NAME: &str = "kernel";

/// default number of objects a kernel can hold beside itself
pub const MAX_OBJECTS: usize = 32;
/// attributes per object
pub const MAX_ATTRIBUTES: usize = 32;
/// interfaces per object
pub const MAX_INTERFACES: usize = 8;
/// port interfaces per object
pub const MAX_PORT_INTERFACES: usize = 8;

/// entries in the arena's named data table
pub const MAX_NAMED_DATA: usize = 16;
/// usable bytes of a named data entry's name, longer names are truncated
pub const NAMED_DATA_LEN: usize = 7;
/// arena allocations are rounded up to this
pub const ALIGNMENT: usize = 4;

/// bytes of text a string attribute can hold
pub const MAX_STRING: usize = 32;
/// bytes buffered per line of the diagnostic dump before it is flushed to the log
pub const DUMP_LINE: usize = 128;
