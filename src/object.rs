/*!
    named entities exposing attributes and interfaces

    a driver embeds an [ObjectCore] and implements [Object] on top of it. Once registered in a [crate::kernel::Kernel], it can be found by name or index, and its attributes and interfaces resolved by name.

    When several entries share a name, lookups resolve to the most recently registered one.
*/

use core::{
    any::Any,
    fmt,
    };
use log::*;
use crate::{
    config,
    error::Error,
    list::List,
    attribute::Attribute,
    };


/// capability record an object exposes under a face name
#[derive(Copy, Clone)]
pub struct Interface {
    face: &'static str,
    capability: &'static dyn Any,
}
impl Interface {
    pub fn new<T: Any>(face: &'static str, capability: &'static T) -> Self {
        Self {face, capability}
    }
    /// name of the contract this interface fulfills
    pub fn face(&self) -> &'static str {self.face}
    pub fn capability(&self) -> &'static dyn Any {self.capability}
    /// the capability as a concrete type, if it is one
    pub fn downcast<T: Any>(&self) -> Option<&'static T> {
        self.capability.downcast_ref()
    }
}
impl fmt::Debug for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interface").field("face", &self.face).finish_non_exhaustive()
    }
}

/// interface bound to a connection point, so an object can expose several interfaces of the same face
#[derive(Copy, Clone, Debug)]
pub struct PortInterface {
    pub port: &'static str,
    pub interface: Interface,
}

/// handle on an attribute registered in an [ObjectCore]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttributeId(usize);
impl AttributeId {
    /// position of the attribute in its object
    pub fn index(self) -> usize {self.0}
}


/// registry state shared by all objects
#[derive(Debug)]
pub struct ObjectCore {
    name: &'static str,
    attributes: List<Attribute, {config::MAX_ATTRIBUTES}>,
    interfaces: List<Interface, {config::MAX_INTERFACES}>,
    ports: List<PortInterface, {config::MAX_PORT_INTERFACES}>,
}

impl ObjectCore {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: List::new(),
            interfaces: List::new(),
            ports: List::new(),
        }
    }
    pub fn name(&self) -> &'static str {self.name}

    pub fn register_attribute(&mut self, attribute: Attribute) -> Result<AttributeId, Error> {
        debug!("'{}' registers attribute '{}'", self.name, attribute.name());
        self.attributes.append(attribute).map(AttributeId)
    }
    pub fn register_interface(&mut self, interface: Interface) -> Result<(), Error> {
        debug!("'{}' registers interface '{}'", self.name, interface.face());
        self.interfaces.append(interface)?;
        Ok(())
    }
    pub fn register_port_interface(&mut self, port: &'static str, interface: Interface) -> Result<(), Error> {
        debug!("'{}' registers interface '{}' on port '{}'", self.name, interface.face(), port);
        self.ports.append(PortInterface {port, interface})?;
        Ok(())
    }

    pub fn interface(&self, face: &str) -> Option<Interface> {
        self.interfaces.find_last(|interface| interface.face() == face)
            .map(|(_, interface)| *interface)
    }
    pub fn port_interface(&self, port: &str, face: &str) -> Option<Interface> {
        self.ports.find_last(|bound| bound.port == port && bound.interface.face() == face)
            .map(|(_, bound)| bound.interface)
    }
    pub fn interfaces(&self) -> &List<Interface, {config::MAX_INTERFACES}> {&self.interfaces}
    pub fn port_interfaces(&self) -> &List<PortInterface, {config::MAX_PORT_INTERFACES}> {&self.ports}

    pub fn attributes(&self) -> &List<Attribute, {config::MAX_ATTRIBUTES}> {&self.attributes}
    pub fn attribute_by_name(&self, name: &str) -> Option<&Attribute> {
        self.attribute_index(name)
            .and_then(|index| self.attributes.get(index))
    }
    pub fn attribute_by_name_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attribute_index(name)
            .and_then(|index| self.attributes.get_mut(index))
    }
    /// position of the attribute with this name
    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.find_last(|attribute| attribute.name() == name)
            .map(|(index, _)| index)
    }
    pub fn attribute_by_index(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }
    pub fn attribute_by_index_mut(&mut self, index: usize) -> Option<&mut Attribute> {
        self.attributes.get_mut(index)
    }
    pub fn attribute(&self, id: AttributeId) -> Result<&Attribute, Error> {
        self.attributes.get(id.0).ok_or(Error::NotFound)
    }
    pub fn attribute_mut(&mut self, id: AttributeId) -> Result<&mut Attribute, Error> {
        self.attributes.get_mut(id.0).ok_or(Error::NotFound)
    }

    /// apply a byte level write to an attribute, as expected from [Object::modify_attribute] implementations accepting remote writes
    pub fn write_attribute(&mut self, index: usize, data: &[u8]) -> Result<(), Error> {
        self.attributes.get_mut(index)
            .ok_or(Error::NotFound)?
            .write(data)
    }
}


/**
    an entity discoverable in the registry

    only [Self::core] and [Self::core_mut] are mandatory, lifecycle methods default to nothing.
*/
pub trait Object {
    fn core(&self) -> &ObjectCore;
    fn core_mut(&mut self) -> &mut ObjectCore;

    fn name(&self) -> &'static str {
        self.core().name()
    }
    /// first startup phase, when objects register their attributes and interfaces
    fn init(&mut self) -> Result<(), Error> {
        Ok(())
    }
    /// second startup phase, once every object is initialized
    fn post_init(&mut self) -> Result<(), Error> {
        Ok(())
    }
    /**
        request from an external interface to write an attribute with little-endian bytes

        ignored unless the object implements it, typically with [ObjectCore::write_attribute]
    */
    fn modify_attribute(&mut self, _index: usize, _data: &[u8]) -> Result<(), Error> {
        Ok(())
    }

    fn interface(&self, face: &str) -> Option<Interface> {
        self.core().interface(face)
    }
    fn port_interface(&self, port: &str, face: &str) -> Option<Interface> {
        self.core().port_interface(port, face)
    }
    fn attribute_by_name(&self, name: &str) -> Option<&Attribute> {
        self.core().attribute_by_name(name)
    }
    fn attribute_by_index(&self, index: usize) -> Option<&Attribute> {
        self.core().attribute_by_index(index)
    }
}
