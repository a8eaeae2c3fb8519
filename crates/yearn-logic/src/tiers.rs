//! Resource tiers: the ordered material progression from Earth to Aetherstone.
//!
//! The declaration order is the conversion order: a crusher only ever turns
//! tier `i` into tier `i + 1`. Indices are stable and contiguous, so a tier can
//! be used directly as an index into the ledger's counter array.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step in the material progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ResourceTier {
    Earth,
    Stone,
    Hardstone,
    Rock,
    Marble,
    Quartz,
    Limestone,
    Granite,
    Sandstone,
    Quartzite,
    Obsidian,
    Diamondstone,
    Amethyst,
    Sapphire,
    Ruby,
    Emerald,
    Citrine,
    Onyx,
    Diamond,
    Basalt,
    Slate,
    Shale,
    Gneiss,
    Schist,
    Serpentine,
    Jade,
    Lapis,
    Malachite,
    Turquoise,
    Garnet,
    Topaz,
    Opal,
    Peridot,
    Tanzanite,
    Alexandrite,
    Moonstone,
    Sunstone,
    Bloodstone,
    Starstone,
    Voidstone,
    Mithril,
    Adamantite,
    Orichalcum,
    Celestite,
    Etherium,
    Aetherstone,
}

/// Number of tiers (and the length of every per-tier table).
pub const TIER_COUNT: usize = 46;

impl ResourceTier {
    /// Every tier in conversion order.
    pub const ALL: [ResourceTier; TIER_COUNT] = [
        ResourceTier::Earth,
        ResourceTier::Stone,
        ResourceTier::Hardstone,
        ResourceTier::Rock,
        ResourceTier::Marble,
        ResourceTier::Quartz,
        ResourceTier::Limestone,
        ResourceTier::Granite,
        ResourceTier::Sandstone,
        ResourceTier::Quartzite,
        ResourceTier::Obsidian,
        ResourceTier::Diamondstone,
        ResourceTier::Amethyst,
        ResourceTier::Sapphire,
        ResourceTier::Ruby,
        ResourceTier::Emerald,
        ResourceTier::Citrine,
        ResourceTier::Onyx,
        ResourceTier::Diamond,
        ResourceTier::Basalt,
        ResourceTier::Slate,
        ResourceTier::Shale,
        ResourceTier::Gneiss,
        ResourceTier::Schist,
        ResourceTier::Serpentine,
        ResourceTier::Jade,
        ResourceTier::Lapis,
        ResourceTier::Malachite,
        ResourceTier::Turquoise,
        ResourceTier::Garnet,
        ResourceTier::Topaz,
        ResourceTier::Opal,
        ResourceTier::Peridot,
        ResourceTier::Tanzanite,
        ResourceTier::Alexandrite,
        ResourceTier::Moonstone,
        ResourceTier::Sunstone,
        ResourceTier::Bloodstone,
        ResourceTier::Starstone,
        ResourceTier::Voidstone,
        ResourceTier::Mithril,
        ResourceTier::Adamantite,
        ResourceTier::Orichalcum,
        ResourceTier::Celestite,
        ResourceTier::Etherium,
        ResourceTier::Aetherstone,
    ];

    /// The tier miners dig out of the ground.
    pub const BASE: ResourceTier = ResourceTier::Earth;

    /// The rarest tier; nothing converts out of it.
    pub const TERMINAL: ResourceTier = ResourceTier::Aetherstone;

    /// Position in the progression (0 for Earth).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a tier by index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The tier this one compacts into, or `None` at the terminal tier.
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn is_terminal(self) -> bool {
        self == Self::TERMINAL
    }

    /// Human readable name.
    pub fn name(self) -> &'static str {
        TIER_NAMES[self.index()]
    }
}

impl fmt::Display for ResourceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static TIER_NAMES: [&str; TIER_COUNT] = [
    "Earth",
    "Stone",
    "Hardstone",
    "Rock",
    "Marble",
    "Quartz",
    "Limestone",
    "Granite",
    "Sandstone",
    "Quartzite",
    "Obsidian",
    "Diamondstone",
    "Amethyst",
    "Sapphire",
    "Ruby",
    "Emerald",
    "Citrine",
    "Onyx",
    "Diamond",
    "Basalt",
    "Slate",
    "Shale",
    "Gneiss",
    "Schist",
    "Serpentine",
    "Jade",
    "Lapis",
    "Malachite",
    "Turquoise",
    "Garnet",
    "Topaz",
    "Opal",
    "Peridot",
    "Tanzanite",
    "Alexandrite",
    "Moonstone",
    "Sunstone",
    "Bloodstone",
    "Starstone",
    "Voidstone",
    "Mithril",
    "Adamantite",
    "Orichalcum",
    "Celestite",
    "Etherium",
    "Aetherstone",
];
