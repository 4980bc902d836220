//! Monster and prop tables keyed by distance tier.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterKind {
    DungeonRat,
    Slime,
    Goblin,
    GoblinShaman,
    GoblinThrower,
    Spider,
    Mushroom,
    Bat,
    Skeleton,
    Wolf,
    Lizard,
    Eye,
    Badlama,
    CrawlerKiller,
    ShadowStalker,
    Mimic,
    FleshGolem,
    LivingArmor,
    PlagueBearer,
    LavaElemental,
    VoidSpawn,
    SkeletonLord,
    DragonKing,
    SpiderQueen,
    TheButcher,
    Mordecai,
    Mongo,
}

impl MonsterKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::DungeonRat => "dungeon_rat",
            Self::Slime => "slime",
            Self::Goblin => "goblin",
            Self::GoblinShaman => "goblin_shaman",
            Self::GoblinThrower => "goblin_thrower",
            Self::Spider => "spider",
            Self::Mushroom => "mushroom",
            Self::Bat => "bat",
            Self::Skeleton => "skeleton",
            Self::Wolf => "wolf",
            Self::Lizard => "lizard",
            Self::Eye => "eye",
            Self::Badlama => "badlama",
            Self::CrawlerKiller => "crawler_killer",
            Self::ShadowStalker => "shadow_stalker",
            Self::Mimic => "mimic",
            Self::FleshGolem => "flesh_golem",
            Self::LivingArmor => "living_armor",
            Self::PlagueBearer => "plague_bearer",
            Self::LavaElemental => "lava_elemental",
            Self::VoidSpawn => "void_spawn",
            Self::SkeletonLord => "skeleton_lord",
            Self::DragonKing => "dragon_king",
            Self::SpiderQueen => "spider_queen",
            Self::TheButcher => "the_butcher",
            Self::Mordecai => "mordecai",
            Self::Mongo => "mongo",
        }
    }

    pub fn is_boss(self) -> bool {
        BOSSES.contains(&self)
    }
}

const TIER_1: &[MonsterKind] = &[MonsterKind::DungeonRat, MonsterKind::Slime, MonsterKind::Goblin];
const TIER_2: &[MonsterKind] = &[
    MonsterKind::GoblinShaman,
    MonsterKind::GoblinThrower,
    MonsterKind::Spider,
    MonsterKind::Mushroom,
    MonsterKind::Bat,
];
const TIER_3: &[MonsterKind] = &[
    MonsterKind::Skeleton,
    MonsterKind::Wolf,
    MonsterKind::Lizard,
    MonsterKind::Eye,
    MonsterKind::Badlama,
];
const TIER_4: &[MonsterKind] = &[
    MonsterKind::CrawlerKiller,
    MonsterKind::ShadowStalker,
    MonsterKind::Mimic,
    MonsterKind::FleshGolem,
];
const TIER_5: &[MonsterKind] = &[
    MonsterKind::LivingArmor,
    MonsterKind::PlagueBearer,
    MonsterKind::LavaElemental,
    MonsterKind::VoidSpawn,
];

pub const BOSSES: &[MonsterKind] = &[
    MonsterKind::SkeletonLord,
    MonsterKind::DragonKing,
    MonsterKind::SpiderQueen,
    MonsterKind::TheButcher,
    MonsterKind::Mordecai,
    MonsterKind::Mongo,
];

const CLUSTER_LOW: &[MonsterKind] = &[
    MonsterKind::DungeonRat,
    MonsterKind::Slime,
    MonsterKind::Goblin,
    MonsterKind::GoblinShaman,
    MonsterKind::GoblinThrower,
    MonsterKind::Spider,
    MonsterKind::Mushroom,
    MonsterKind::Bat,
];
const CLUSTER_MID: &[MonsterKind] = &[
    MonsterKind::GoblinShaman,
    MonsterKind::GoblinThrower,
    MonsterKind::Spider,
    MonsterKind::Mushroom,
    MonsterKind::Bat,
    MonsterKind::Skeleton,
    MonsterKind::Wolf,
    MonsterKind::Lizard,
    MonsterKind::Eye,
    MonsterKind::Badlama,
];
const CLUSTER_HIGH: &[MonsterKind] = &[
    MonsterKind::Skeleton,
    MonsterKind::Wolf,
    MonsterKind::Lizard,
    MonsterKind::Eye,
    MonsterKind::Badlama,
    MonsterKind::CrawlerKiller,
    MonsterKind::ShadowStalker,
    MonsterKind::Mimic,
    MonsterKind::FleshGolem,
];

pub fn tier_pool(tier: u8) -> &'static [MonsterKind] {
    match tier {
        0 | 1 => TIER_1,
        2 => TIER_2,
        3 => TIER_3,
        4 => TIER_4,
        _ => TIER_5,
    }
}

/// Roaming packs blend neighboring tiers.
pub fn cluster_pool(tier: u8) -> &'static [MonsterKind] {
    match tier {
        0..=2 => CLUSTER_LOW,
        3 => CLUSTER_MID,
        _ => CLUSTER_HIGH,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropKind {
    Barrel,
    Crate,
    Pot,
    Torch,
    BonePile,
    SkullPile,
    RubbleHeap,
    Chest,
    TreasureChest,
    ScatteredCoins,
    AncientScroll,
    BloodPool,
    CoiledChains,
    Manacles,
    DiscardedSword,
    ForgottenShield,
    MossPatch,
    GlowingMushrooms,
    WaterPuddle,
    ThornyVines,
    Campfire,
    AbandonedCampfire,
    RatNest,
    MoldyBread,
}

impl PropKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Barrel => "barrel",
            Self::Crate => "crate",
            Self::Pot => "pot",
            Self::Torch => "torch",
            Self::BonePile => "bone_pile",
            Self::SkullPile => "skull_pile",
            Self::RubbleHeap => "rubble_heap",
            Self::Chest => "chest",
            Self::TreasureChest => "treasure_chest",
            Self::ScatteredCoins => "scattered_coins",
            Self::AncientScroll => "ancient_scroll",
            Self::BloodPool => "blood_pool",
            Self::CoiledChains => "coiled_chains",
            Self::Manacles => "manacles",
            Self::DiscardedSword => "discarded_sword",
            Self::ForgottenShield => "forgotten_shield",
            Self::MossPatch => "moss_patch",
            Self::GlowingMushrooms => "glowing_mushrooms",
            Self::WaterPuddle => "water_puddle",
            Self::ThornyVines => "thorny_vines",
            Self::Campfire => "campfire",
            Self::AbandonedCampfire => "abandoned_campfire",
            Self::RatNest => "rat_nest",
            Self::MoldyBread => "moldy_bread",
        }
    }
}

const DUNGEON_PROPS: &[PropKind] = &[
    PropKind::Barrel,
    PropKind::Crate,
    PropKind::Pot,
    PropKind::Torch,
    PropKind::BonePile,
    PropKind::SkullPile,
    PropKind::RubbleHeap,
];
const TREASURE_PROPS: &[PropKind] = &[
    PropKind::Chest,
    PropKind::TreasureChest,
    PropKind::ScatteredCoins,
    PropKind::AncientScroll,
];
const SPOOKY_PROPS: &[PropKind] = &[
    PropKind::BloodPool,
    PropKind::CoiledChains,
    PropKind::Manacles,
    PropKind::DiscardedSword,
    PropKind::ForgottenShield,
];
const NATURE_PROPS: &[PropKind] = &[
    PropKind::MossPatch,
    PropKind::GlowingMushrooms,
    PropKind::WaterPuddle,
    PropKind::ThornyVines,
];
const CAMP_PROPS: &[PropKind] =
    &[PropKind::Campfire, PropKind::AbandonedCampfire, PropKind::RatNest, PropKind::MoldyBread];

/// Theme groups for a prop at `distance` from the spawn room.
pub fn prop_themes(distance: f32) -> &'static [&'static [PropKind]] {
    if distance < 30.0 {
        &[DUNGEON_PROPS, CAMP_PROPS]
    } else if distance < 80.0 {
        &[DUNGEON_PROPS, NATURE_PROPS]
    } else if distance < 130.0 {
        &[DUNGEON_PROPS, SPOOKY_PROPS, TREASURE_PROPS]
    } else {
        &[SPOOKY_PROPS, TREASURE_PROPS]
    }
}
