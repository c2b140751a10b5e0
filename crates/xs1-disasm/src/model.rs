use anyhow::Result;
use std::path::Path;

use xs1_rs::Words;

#[derive(Debug, Clone)]
pub struct Segment {
    pub name: String,
    pub base: u32,
    pub bytes: Vec<u8>,
}

impl Segment {
    fn contains(&self, addr: u32) -> bool {
        let end = self.base.wrapping_add(self.bytes.len() as u32);
        addr >= self.base && addr < end
    }
}

#[derive(Debug, Clone)]
pub struct Image {
    pub segments: Vec<Segment>,
}

pub fn load_raw_bin(path: &Path, base: u32, skip: usize, len: Option<usize>) -> Result<Image> {
    let file = std::fs::read(path)?;
    Image::from_bytes(&file, base, skip, len)
}

impl Image {
    pub fn from_bytes(file: &[u8], base: u32, skip: usize, len: Option<usize>) -> Result<Image> {
        anyhow::ensure!(skip <= file.len(), "--skip exceeds file size");
        let mut payload = &file[skip..];
        if let Some(lim) = len {
            anyhow::ensure!(lim <= payload.len(), "--len exceeds remaining file size after skip");
            payload = &payload[..lim];
        }
        let seg = Segment { name: "segment0".into(), base, bytes: payload.to_vec() };
        Ok(Image { segments: vec![seg] })
    }
}

pub fn read_u8(img: &Image, addr: u32) -> Option<u8> {
    img.segments
        .iter()
        .find(|s| s.contains(addr))
        .map(|s| s.bytes[(addr - s.base) as usize])
}

pub fn read_u16(img: &Image, addr: u32) -> Option<u16> {
    let b0 = read_u8(img, addr)?;
    let b1 = read_u8(img, addr.wrapping_add(1))?;
    Some(u16::from_le_bytes([b0, b1]))
}

/// The word at `addr` and, when mapped, the one after it. The decoder works
/// out whether the second word belongs to the instruction.
pub fn read_words(img: &Image, addr: u32) -> Option<Words> {
    let low = read_u16(img, addr)?;
    Some(Words { low, high: read_u16(img, addr.wrapping_add(2)) })
}
