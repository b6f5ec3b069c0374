use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::stage::{HEADER_SIZE, SIGNATURE, VERSION};
use anyhow::anyhow;
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Read, Write};

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct StageHeader {
    pub marker: String,
    pub version: u32,
    pub additions: u32,
    pub removals: u32,
}

impl StageHeader {
    pub fn for_counts(additions: usize, removals: usize) -> anyhow::Result<Self> {
        Ok(StageHeader::new(
            String::from(SIGNATURE),
            VERSION,
            u32::try_from(additions)?,
            u32::try_from(removals)?,
        ))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.marker != SIGNATURE {
            return Err(anyhow!("Invalid stage signature: {}", self.marker));
        }
        if self.version != VERSION {
            return Err(anyhow!("Unsupported stage version: {}", self.version));
        }

        Ok(())
    }
}

impl Packable for StageHeader {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut bytes = Vec::new();
        bytes.write_all(self.marker.as_bytes())?;
        bytes.write_u32::<byteorder::NetworkEndian>(self.version)?;
        bytes.write_u32::<byteorder::NetworkEndian>(self.additions)?;
        bytes.write_u32::<byteorder::NetworkEndian>(self.removals)?;

        Ok(Bytes::from(bytes))
    }
}

impl Unpackable for StageHeader {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut bytes = [0u8; HEADER_SIZE];
        reader
            .read_exact(&mut bytes)
            .map_err(|_| anyhow!("Invalid header size"))?;

        let marker = String::from_utf8(bytes[0..4].to_vec())
            .map_err(|_| anyhow!("Invalid marker in stage header"))?;
        let version = byteorder::NetworkEndian::read_u32(&bytes[4..8]);
        let additions = byteorder::NetworkEndian::read_u32(&bytes[8..12]);
        let removals = byteorder::NetworkEndian::read_u32(&bytes[12..16]);

        Ok(StageHeader::new(marker, version, additions, removals))
    }
}
