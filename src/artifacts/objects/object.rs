use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use bytes::Bytes;
use std::io::BufRead;

pub trait Packable {
    /// Framed record bytes, header included
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    /// Parse the payload; the header has already been consumed
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn object_id(&self) -> Result<ObjectId> {
        Ok(ObjectId::from_content(&self.serialize()?))
    }
}
