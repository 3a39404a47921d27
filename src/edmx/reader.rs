//! Streaming EDMX reader producing a [`SchemaTree`].
//!
//! Elements are matched by local name, so both the v3
//! (`http://schemas.microsoft.com/ado/2009/11/edm`) and v4
//! (`http://docs.oasis-open.org/odata/ns/edm`) vocabularies are accepted.
//! Anything the engine has no use for (entity containers, annotations,
//! functions, actions) is skipped together with its children.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::trace;

use super::error::EdmxError;
use crate::base::Nullability;
use crate::schema::SchemaTree;
use crate::schema::raw::{
    RawAssociation, RawComplexType, RawEntityType, RawEnumType, RawNavigation, RawProperty,
    RawSchema,
};

/// Where the reader is in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Frame {
    Edmx,
    DataServices,
    Schema,
    EntityType,
    ComplexType,
    EnumType,
    Association,
    Key,
    /// Property, member, end and similar leaves.
    Leaf,
    /// An element (and its subtree) that is ignored.
    Skip,
}

/// The declaration currently being assembled.
#[derive(Debug)]
enum Pending {
    Entity(RawEntityType),
    Complex(RawComplexType),
    Enum(RawEnumType),
    Association(RawAssociation),
}

pub(super) struct EdmxReader {
    stack: Vec<Frame>,
    tree: SchemaTree,
    version: Option<String>,
    schema: Option<RawSchema>,
    pending: Option<Pending>,
    position: u64,
}

impl EdmxReader {
    pub(super) fn new() -> Self {
        Self {
            stack: Vec::new(),
            tree: SchemaTree::new(),
            version: None,
            schema: None,
            pending: None,
            position: 0,
        }
    }

    /// Read a whole document. Returns the tree and the `Version` attribute
    /// of the root `<edmx:Edmx>`, if any.
    pub(super) fn read(mut self, input: &[u8]) -> Result<(SchemaTree, Option<String>), EdmxError> {
        let mut reader = Reader::from_reader(input);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            self.position = reader.buffer_position();
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    self.handle_start(e)?;
                }
                Ok(Event::Empty(ref e)) => {
                    self.handle_start(e)?;
                    self.handle_end();
                }
                Ok(Event::End(_)) => {
                    self.handle_end();
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(EdmxError::xml(reader.error_position(), e.to_string()));
                }
                _ => {}
            }
            buf.clear();
        }

        if self.tree.schemas.is_empty() {
            return Err(EdmxError::MissingSchema);
        }
        Ok((self.tree, self.version))
    }

    fn handle_start(&mut self, e: &BytesStart<'_>) -> Result<(), EdmxError> {
        let local = e.local_name();
        let tag = std::str::from_utf8(local.as_ref())?;
        let parent = self.stack.last().copied();

        let frame = match (parent, tag) {
            (Some(Frame::Skip | Frame::Leaf), _) => Frame::Skip,
            (None, "Edmx") => {
                self.version = Attributes::read(e, self.position)?.take("Version");
                Frame::Edmx
            }
            (Some(Frame::Edmx), "DataServices") => Frame::DataServices,
            (None | Some(Frame::DataServices), "Schema") => {
                self.start_schema(e)?;
                Frame::Schema
            }
            (Some(Frame::Schema), "EntityType") => {
                let mut attrs = Attributes::read(e, self.position)?;
                let mut entity = RawEntityType::new(attrs.take("Name").unwrap_or_default());
                entity.base_type = attrs.take("BaseType");
                self.pending = Some(Pending::Entity(entity));
                Frame::EntityType
            }
            (Some(Frame::Schema), "ComplexType") => {
                let mut attrs = Attributes::read(e, self.position)?;
                let mut complex = RawComplexType::new(attrs.take("Name").unwrap_or_default());
                complex.base_type = attrs.take("BaseType");
                self.pending = Some(Pending::Complex(complex));
                Frame::ComplexType
            }
            (Some(Frame::Schema), "EnumType") => {
                let mut attrs = Attributes::read(e, self.position)?;
                let mut enum_type = RawEnumType::new(attrs.take("Name").unwrap_or_default());
                enum_type.underlying_type = attrs.take("UnderlyingType");
                enum_type.is_flags = attrs
                    .get("IsFlags")
                    .is_some_and(|v| v.eq_ignore_ascii_case("true"));
                self.pending = Some(Pending::Enum(enum_type));
                Frame::EnumType
            }
            (Some(Frame::Schema), "Association") => {
                let mut attrs = Attributes::read(e, self.position)?;
                let association = RawAssociation::new(attrs.take("Name").unwrap_or_default());
                self.pending = Some(Pending::Association(association));
                Frame::Association
            }
            (Some(Frame::EntityType), "Key") => Frame::Key,
            (Some(Frame::Key), "PropertyRef") => {
                let mut attrs = Attributes::read(e, self.position)?;
                if let (Some(Pending::Entity(entity)), Some(name)) =
                    (self.pending.as_mut(), attrs.take("Name"))
                {
                    entity.keys.push(name);
                }
                Frame::Leaf
            }
            (Some(Frame::EntityType | Frame::ComplexType), "Property") => {
                let property = read_property(Attributes::read(e, self.position)?);
                match self.pending.as_mut() {
                    Some(Pending::Entity(entity)) => entity.properties.push(property),
                    Some(Pending::Complex(complex)) => complex.properties.push(property),
                    _ => {}
                }
                Frame::Leaf
            }
            (Some(Frame::EntityType | Frame::ComplexType), "NavigationProperty") => {
                let navigation = read_navigation(Attributes::read(e, self.position)?);
                match self.pending.as_mut() {
                    Some(Pending::Entity(entity)) => entity.navigation.push(navigation),
                    Some(Pending::Complex(complex)) => complex.navigation.push(navigation),
                    _ => {}
                }
                Frame::Leaf
            }
            (Some(Frame::EnumType), "Member") => {
                let mut attrs = Attributes::read(e, self.position)?;
                if let Some(Pending::Enum(enum_type)) = self.pending.take() {
                    let name = attrs.take("Name").unwrap_or_default();
                    let enum_type = match attrs.take("Value") {
                        Some(value) => enum_type.with_member_value(name, value),
                        None => enum_type.with_member(name),
                    };
                    self.pending = Some(Pending::Enum(enum_type));
                }
                Frame::Leaf
            }
            (Some(Frame::Association), "End") => {
                let mut attrs = Attributes::read(e, self.position)?;
                if let Some(Pending::Association(association)) = self.pending.take() {
                    let association = association.with_end(
                        attrs.take("Role").unwrap_or_default(),
                        attrs.take("Type").unwrap_or_default(),
                        attrs.take("Multiplicity").unwrap_or_default(),
                    );
                    self.pending = Some(Pending::Association(association));
                }
                Frame::Leaf
            }
            (_, other) => {
                trace!("Skipping <{other}>");
                Frame::Skip
            }
        };

        self.stack.push(frame);
        Ok(())
    }

    fn start_schema(&mut self, e: &BytesStart<'_>) -> Result<(), EdmxError> {
        let mut attrs = Attributes::read(e, self.position)?;
        let namespace = attrs
            .take("Namespace")
            .filter(|ns| !ns.trim().is_empty())
            .ok_or(EdmxError::MissingAttribute {
                element: "Schema",
                attribute: "Namespace",
            })?;
        let mut schema = RawSchema::new(namespace);
        schema.alias = attrs.take("Alias");
        self.schema = Some(schema);
        Ok(())
    }

    fn handle_end(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame {
            Frame::EntityType | Frame::ComplexType | Frame::EnumType | Frame::Association => {
                if let (Some(schema), Some(pending)) = (self.schema.as_mut(), self.pending.take()) {
                    match pending {
                        Pending::Entity(entity) => schema.entity_types.push(entity),
                        Pending::Complex(complex) => schema.complex_types.push(complex),
                        Pending::Enum(enum_type) => schema.enum_types.push(enum_type),
                        Pending::Association(association) => schema.associations.push(association),
                    }
                }
            }
            Frame::Schema => {
                if let Some(schema) = self.schema.take() {
                    trace!("Read schema {}", schema.namespace);
                    self.tree.schemas.push(schema);
                }
            }
            _ => {}
        }
    }
}

fn read_property(mut attrs: Attributes) -> RawProperty {
    let mut property = RawProperty::new(
        attrs.take("Name").unwrap_or_default(),
        attrs.take("Type").unwrap_or_default(),
    );
    if let Some(nullable) = attrs.get("Nullable") {
        property.nullable = Nullability::parse_attribute(nullable);
    }
    property
}

fn read_navigation(mut attrs: Attributes) -> RawNavigation {
    let name = attrs.take("Name").unwrap_or_default();
    match (attrs.take("Type"), attrs.take("Relationship")) {
        (None, Some(relationship)) => RawNavigation::association(
            name,
            relationship,
            attrs.take("FromRole").unwrap_or_default(),
            attrs.take("ToRole").unwrap_or_default(),
        ),
        (type_ref, _) => {
            let mut navigation = RawNavigation::typed(name, type_ref.unwrap_or_default());
            if let Some(nullable) = attrs.get("Nullable") {
                navigation = navigation.with_nullable(Nullability::parse_attribute(nullable));
            }
            if let Some(partner) = attrs.take("Partner") {
                navigation = navigation.with_partner(partner);
            }
            navigation
        }
    }
}

/// Attributes of one element, keyed by local name.
struct Attributes(Vec<(String, String)>);

impl Attributes {
    fn read(e: &BytesStart<'_>, position: u64) -> Result<Self, EdmxError> {
        let mut values = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| EdmxError::xml(position, format!("attribute error: {err}")))?;
            let key = std::str::from_utf8(attr.key.local_name().as_ref())?.to_string();
            let value = attr
                .unescape_value()
                .map_err(|err| EdmxError::xml(position, format!("attribute value error: {err}")))?
                .into_owned();
            values.push((key, value));
        }
        Ok(Self(values))
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn take(&mut self, key: &str) -> Option<String> {
        let index = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.swap_remove(index).1)
    }
}
