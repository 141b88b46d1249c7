/*!
    the kernel object, owner of the object list and driver of the startup

    The composition root boots the kernel on an arena, registers every object in the order they should be initialized, then starts the kernel:

    ```text
    Uninitialized --boot--> Constructed --init_objects--> Initialized --post_init_objects--> PostInitialized
    ```

    A failing phase moves the kernel to [State::Failed], from which nothing can be retried.

    The kernel itself is the object of index 0, registered objects follow in registration order.
*/

use core::fmt::{self, Write};
use bilge::prelude::*;
use log::*;
use crate::{
    config,
    error::Error,
    list::List,
    arena::Arena,
    attribute::{Attribute, Value},
    object::{Object, ObjectCore, Interface},
    pack_bilge,
    };


/// lifecycle of a [Kernel]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum State {
    /// no arena bound yet
    #[default]
    Uninitialized,
    /// objects can be registered
    Constructed,
    /// every object ran its [Object::init]
    Initialized,
    /// every object ran its [Object::post_init], the system is running
    PostInitialized,
    /// a startup phase failed, objects are partially initialized and every further phase is refused
    Failed,
}

/**
    position of an attribute in the registry, the `ID[object,attribute]` pair printed in the diagnostic dump

    this is how external interfaces address attributes on the wire
*/
#[bitsize(16)]
#[derive(Copy, Clone, FromBits, DebugBits, PartialEq, Default)]
pub struct AttributeAddress {
    /// index of the attribute in its object
    pub attribute: u8,
    /// index of the object in the kernel
    pub object: u8,
}
pack_bilge!(AttributeAddress);


/// registry of all objects, holding up to `N` objects beside itself
pub struct Kernel<'k, const N: usize = {config::MAX_OBJECTS}> {
    core: ObjectCore,
    objects: List<&'k mut dyn Object, N>,
    state: State,
    /// bytes allocated and available in the arena at boot
    heap: (usize, usize),
}

impl<'k, const N: usize> Kernel<'k, N> {
    /// kernel not yet bound to an arena, see [Self::boot]
    pub fn new() -> Self {
        Self {
            core: ObjectCore::new(config::KERNEL_NAME),
            objects: List::new(),
            state: State::Uninitialized,
            heap: (0, 0),
        }
    }
    /// initialize the arena and accept object registrations
    pub fn boot<const SIZE: usize>(&mut self, arena: &mut Arena<SIZE>) -> Result<(), Error> {
        if self.state != State::Uninitialized
            {return Err(Error::InvalidState("kernel already booted"))}
        arena.init();
        self.heap = (arena.allocated(), arena.capacity());
        self.state = State::Constructed;
        info!("kernel booted, {} objects max", N);
        Ok(())
    }
    pub fn state(&self) -> State {self.state}

    /// append an object to the list, only possible before [Self::init_objects]
    pub fn register(&mut self, object: &'k mut dyn Object) -> Result<(), Error> {
        if self.state != State::Constructed
            {return Err(Error::InvalidState("objects can only be registered after boot and before init"))}
        debug!("register object '{}'", object.name());
        self.objects.append(object)?;
        Ok(())
    }

    /// run [Object::init] on the kernel then on every object in registration order
    pub fn init_objects(&mut self) -> Result<(), Error> {
        if self.state != State::Constructed
            {return Err(Error::InvalidState("objects can only be initialized once, after boot"))}
        info!("init {} objects", self.len());
        self.state = State::Failed;
        Object::init(self)?;
        for object in self.objects.iter_mut() {
            debug!("init '{}'", object.name());
            object.init().inspect_err(|_| error!("init '{}' failed", object.name()))?;
        }
        self.state = State::Initialized;
        Ok(())
    }
    /// run [Object::post_init] on every object in registration order, then on the kernel which dumps the registry
    pub fn post_init_objects(&mut self) -> Result<(), Error> {
        if self.state != State::Initialized
            {return Err(Error::InvalidState("objects must be initialized before post init"))}
        info!("post init {} objects", self.len());
        self.state = State::Failed;
        for object in self.objects.iter_mut() {
            debug!("post init '{}'", object.name());
            object.post_init().inspect_err(|_| error!("post init '{}' failed", object.name()))?;
        }
        Object::post_init(self)?;
        self.state = State::PostInitialized;
        Ok(())
    }
    /// both startup phases
    pub fn start(&mut self) -> Result<(), Error> {
        self.init_objects()?;
        self.post_init_objects()
    }

    /// number of objects including the kernel
    pub fn len(&self) -> usize {
        1 + self.objects.len()
    }
    /// number of objects that can be registered beside the kernel
    pub const fn capacity(&self) -> usize {N}

    /// all objects, the kernel first
    pub fn objects(&self) -> impl Iterator<Item = &dyn Object> + '_ {
        core::iter::once(self as &dyn Object)
            .chain(self.objects.iter().map(|object| &**object as &dyn Object))
    }
    pub fn object_by_index(&self, index: usize) -> Option<&dyn Object> {
        match index {
            0 => Some(self as &dyn Object),
            _ => self.objects.get(index - 1).map(|object| &**object as &dyn Object),
        }
    }
    pub fn object_by_name(&self, name: &str) -> Option<&dyn Object> {
        self.object_index(name)
            .and_then(|index| self.object_by_index(index))
    }
    /// index of the most recently registered object with this name
    pub fn object_index(&self, name: &str) -> Option<usize> {
        self.objects().enumerate()
            .filter(|(_, object)| object.name() == name)
            .map(|(index, _)| index)
            .last()
    }
    pub fn object_interface(&self, object: &str, face: &str) -> Option<Interface> {
        self.object_by_name(object)?.interface(face)
    }
    pub fn object_port_interface(&self, object: &str, port: &str, face: &str) -> Option<Interface> {
        self.object_by_name(object)?.port_interface(port, face)
    }

    /// address of an attribute for external interfaces
    pub fn attribute_address(&self, object: &str, attribute: &str) -> Option<AttributeAddress> {
        let object_index = self.object_index(object)?;
        let attribute_index = self.object_by_index(object_index)?
            .core().attribute_index(attribute)?;
        Some(AttributeAddress::new(
            u8::try_from(attribute_index).ok()?,
            u8::try_from(object_index).ok()?,
            ))
    }
    /// byte level read of an attribute, through its `pre_read` hook
    pub fn read_attribute(&self, address: AttributeAddress, dst: &mut [u8]) -> Result<usize, Error> {
        self.object_by_index(usize::from(address.object()))
            .and_then(|object| object.attribute_by_index(usize::from(address.attribute())))
            .ok_or(Error::NotFound)?
            .read(dst)
    }
    /// byte level write request, forwarded to the owning object's [Object::modify_attribute]
    pub fn write_attribute(&mut self, address: AttributeAddress, data: &[u8]) -> Result<(), Error> {
        let index = usize::from(address.attribute());
        let object: &mut dyn Object = match usize::from(address.object()) {
            0 => self,
            object => &mut **self.objects.get_mut(object - 1).ok_or(Error::NotFound)?,
        };
        if object.attribute_by_index(index).is_none()
            {return Err(Error::NotFound)}
        object.modify_attribute(index, data)
    }

    /// write the attributes of every object in a human readable form
    pub fn dump(&self, out: &mut impl Write) -> fmt::Result {
        for (object_index, object) in self.objects().enumerate() {
            writeln!(out, "Attributes of class '{}':", object.name())?;
            for (attribute_index, attribute) in object.core().attributes().iter().enumerate() {
                write!(out, "ID[{},{}] => {}, {}, {}",
                    object_index, attribute_index,
                    attribute.name(), attribute.kind(), attribute.value())?;
                if let Some(description) = attribute.description() {
                    write!(out, ", {}", description)?;
                }
                writeln!(out)?;
            }
        }
        Ok(())
    }
    #[cfg(feature = "std")]
    pub fn dump_string(&self) -> std::string::String {
        let mut out = std::string::String::new();
        // writing to a String never fails
        let _ = self.dump(&mut out);
        out
    }
}

impl<const N: usize> Default for Kernel<'_, N> {
    fn default() -> Self {Self::new()}
}

impl<const N: usize> Object for Kernel<'_, N> {
    fn core(&self) -> &ObjectCore {&self.core}
    fn core_mut(&mut self) -> &mut ObjectCore {&mut self.core}

    /// register the diagnostic attributes
    fn init(&mut self) -> Result<(), Error> {
        let objects = u32::try_from(self.len()).unwrap_or(u32::MAX);
        let capacity = u32::try_from(N).unwrap_or(u32::MAX);
        let (heap, heap_capacity) = self.heap;
        self.core.register_attribute(Attribute::new("version")
            .with_value(Value::string(config::VERSION)?))?;
        self.core.register_attribute(Attribute::new("objects")
            .with_value(objects)
            .with_description("{\"Min\": 1}"))?;
        self.core.register_attribute(Attribute::new("capacity")
            .with_value(capacity))?;
        self.core.register_attribute(Attribute::new("heap")
            .with_value(u32::try_from(heap).unwrap_or(u32::MAX))
            .with_description("bytes allocated at boot"))?;
        self.core.register_attribute(Attribute::new("heap_capacity")
            .with_value(u32::try_from(heap_capacity).unwrap_or(u32::MAX)))?;
        Ok(())
    }
    /// log the diagnostic dump
    fn post_init(&mut self) -> Result<(), Error> {
        let mut log = LogLines::default();
        self.dump(&mut log)
            .map_err(|_| Error::InvalidState("diagnostic dump failed"))?;
        log.flush();
        Ok(())
    }
}


/// text sink emitting one log record per line
#[derive(Default)]
struct LogLines {
    line: heapless::String<{config::DUMP_LINE}>,
}
impl LogLines {
    fn flush(&mut self) {
        if !self.line.is_empty() {
            info!("{}", self.line);
            self.line.clear();
        }
    }
}
impl Write for LogLines {
    fn write_str(&mut self, text: &str) -> fmt::Result {
        for c in text.chars() {
            if c == '\n' {
                self.flush();
            }
            // overlong lines are split
            else if self.line.push(c).is_err() {
                self.flush();
                self.line.push(c).map_err(|_| fmt::Error)?;
            }
        }
        Ok(())
    }
}
