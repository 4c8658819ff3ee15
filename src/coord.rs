use std::fmt;

use itertools::Itertools;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};


pub const BOARD_SIZE: u8 = 8;


const fn const_char_sub(a: char, b: char) -> u8 {
    let a_idx = a as u32;
    let b_idx = b as u32;
    assert!(a_idx >= b_idx);
    let diff = a_idx - b_idx;
    assert!(diff <= u8::MAX as u32);
    diff as u8
}


// Vertical coordinate in the engine's canonical space. Rank 0 is White's home rank
// regardless of who is looking at the board.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Rank {
    idx: u8, // 0-based
}

impl Rank {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < BOARD_SIZE);
        Self { idx }
    }
    pub const fn from_algebraic(idx: char) -> Self {
        Self::from_zero_based(const_char_sub(idx, '1'))
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_algebraic(self) -> char { (self.idx + b'1') as char }
    pub fn all() -> impl Iterator<Item = Self> + Clone {
        (0..BOARD_SIZE).map(Self::from_zero_based)
    }
}


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct File {
    idx: u8, // 0-based
}

impl File {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < BOARD_SIZE);
        Self { idx }
    }
    pub const fn from_algebraic(idx: char) -> Self {
        Self::from_zero_based(const_char_sub(idx, 'a'))
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_algebraic(self) -> char { (self.idx + b'a') as char }
    pub fn all() -> impl Iterator<Item = Self> + Clone {
        (0..BOARD_SIZE).map(Self::from_zero_based)
    }
}


// A board square in logical coordinates. This is the only coordinate space the
// rules engine, the wire format and the renderable object table ever speak.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub file: File,
    pub rank: Rank,
}

impl Cell {
    pub const fn new(file: File, rank: Rank) -> Self { Self { file, rank } }

    pub fn from_algebraic(s: &str) -> Option<Self> {
        let (file, rank) = s.chars().collect_tuple()?;
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }
        Some(Cell {
            file: File::from_algebraic(file),
            rank: Rank::from_algebraic(rank),
        })
    }

    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file.to_algebraic(), self.rank.to_algebraic())
    }

    pub fn all() -> impl Iterator<Item = Cell> {
        Rank::all()
            .cartesian_product(File::all())
            .map(|(rank, file)| Cell { file, rank })
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({})", self.to_algebraic())
    }
}

// On the wire a cell is its algebraic name, e.g. "e2". Deserialization
// re-validates the 0..7 range for free.
impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_algebraic())
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Cell::from_algebraic(&s).ok_or_else(|| D::Error::custom(format!("invalid cell: {}", s)))
    }
}
