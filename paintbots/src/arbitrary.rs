use quickcheck::{Arbitrary, Gen};

use crate::{CacheEntry, Color, Direction, PALETTE};

impl Arbitrary for Color {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&PALETTE).unwrap()
    }
}

impl Arbitrary for Direction {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&Direction::ALL).unwrap()
    }
}

impl Arbitrary for CacheEntry {
    fn arbitrary(g: &mut Gen) -> Self {
        // Names are free text, ids never contain a colon or whitespace
        let name = String::arbitrary(g);
        let id = format!("{:08x}-{}", u32::arbitrary(g), u16::arbitrary(g));
        CacheEntry::new(name, id)
    }
}
