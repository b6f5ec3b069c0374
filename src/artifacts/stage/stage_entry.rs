use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::anyhow;
use byteorder::{ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Read, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Addition,
    Removal,
}

impl EntryKind {
    fn as_byte(&self) -> u8 {
        match self {
            EntryKind::Addition => b'A',
            EntryKind::Removal => b'R',
        }
    }
}

impl TryFrom<u8> for EntryKind {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> anyhow::Result<Self> {
        match value {
            b'A' => Ok(EntryKind::Addition),
            b'R' => Ok(EntryKind::Removal),
            other => Err(anyhow!("Invalid stage entry kind: {other:#04x}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct StageEntry {
    pub kind: EntryKind,
    pub name: String,
    pub oid: ObjectId,
}

impl Packable for StageEntry {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let name_length = u16::try_from(self.name.len())
            .map_err(|_| anyhow!("File name too long to stage: {}", self.name))?;

        let mut bytes = Vec::new();
        bytes.write_u8(self.kind.as_byte())?;
        self.oid.write_h40_to(&mut bytes)?;
        bytes.write_u16::<byteorder::NetworkEndian>(name_length)?;
        bytes.write_all(self.name.as_bytes())?;

        Ok(Bytes::from(bytes))
    }
}

impl Unpackable for StageEntry {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let kind = EntryKind::try_from(reader.read_u8()?)?;
        let oid = ObjectId::read_h40_from(&mut reader)?;
        let name_length = reader.read_u16::<byteorder::NetworkEndian>()?;

        let mut name = vec![0u8; name_length as usize];
        reader.read_exact(&mut name)?;
        let name = String::from_utf8(name).map_err(|_| anyhow!("Stage entry name is not UTF-8"))?;

        Ok(StageEntry::new(kind, name, oid))
    }
}
