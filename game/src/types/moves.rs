//! Move index table

/// Move id as stored in a party struct move slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(pub u8);

impl Move {
    pub const NONE: Move = Move(0x00);

    /// Canonical name, `None` for ids past STRUGGLE
    pub fn name(&self) -> Option<&'static str> {
        MOVE_NAMES.get(self.0 as usize).copied()
    }

    /// Empty move slot
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "MOVE_{:#04x}", self.0),
        }
    }
}

#[rustfmt::skip]
const MOVE_NAMES: [&str; 166] = [
    // 0x00
    "NO_MOVE", "POUND", "KARATE_CHOP", "DOUBLESLAP",
    // 0x04
    "COMET_PUNCH", "MEGA_PUNCH", "PAY_DAY", "FIRE_PUNCH",
    // 0x08
    "ICE_PUNCH", "THUNDERPUNCH", "SCRATCH", "VICEGRIP",
    // 0x0C
    "GUILLOTINE", "RAZOR_WIND", "SWORDS_DANCE", "CUT",
    // 0x10
    "GUST", "WING_ATTACK", "WHIRLWIND", "FLY",
    // 0x14
    "BIND", "SLAM", "VINE_WHIP", "STOMP",
    // 0x18
    "DOUBLE_KICK", "MEGA_KICK", "JUMP_KICK", "ROLLING_KICK",
    // 0x1C
    "SAND_ATTACK", "HEADBUTT", "HORN_ATTACK", "FURY_ATTACK",
    // 0x20
    "HORN_DRILL", "TACKLE", "BODY_SLAM", "WRAP",
    // 0x24
    "TAKE_DOWN", "THRASH", "DOUBLE_EDGE", "TAIL_WHIP",
    // 0x28
    "POISON_STING", "TWINEEDLE", "PIN_MISSILE", "LEER",
    // 0x2C
    "BITE", "GROWL", "ROAR", "SING",
    // 0x30
    "SUPERSONIC", "SONICBOOM", "DISABLE", "ACID",
    // 0x34
    "EMBER", "FLAMETHROWER", "MIST", "WATER_GUN",
    // 0x38
    "HYDRO_PUMP", "SURF", "ICE_BEAM", "BLIZZARD",
    // 0x3C
    "PSYBEAM", "BUBBLEBEAM", "AURORA_BEAM", "HYPER_BEAM",
    // 0x40
    "PECK", "DRILL_PECK", "SUBMISSION", "LOW_KICK",
    // 0x44
    "COUNTER", "SEISMIC_TOSS", "STRENGTH", "ABSORB",
    // 0x48
    "MEGA_DRAIN", "LEECH_SEED", "GROWTH", "RAZOR_LEAF",
    // 0x4C
    "SOLARBEAM", "POISONPOWDER", "STUN_SPORE", "SLEEP_POWDER",
    // 0x50
    "PETAL_DANCE", "STRING_SHOT", "DRAGON_RAGE", "FIRE_SPIN",
    // 0x54
    "THUNDERSHOCK", "THUNDERBOLT", "THUNDER_WAVE", "THUNDER",
    // 0x58
    "ROCK_THROW", "EARTHQUAKE", "FISSURE", "DIG",
    // 0x5C
    "TOXIC", "CONFUSION", "PSYCHIC_M", "HYPNOSIS",
    // 0x60
    "MEDITATE", "AGILITY", "QUICK_ATTACK", "RAGE",
    // 0x64
    "TELEPORT", "NIGHT_SHADE", "MIMIC", "SCREECH",
    // 0x68
    "DOUBLE_TEAM", "RECOVER", "HARDEN", "MINIMIZE",
    // 0x6C
    "SMOKESCREEN", "CONFUSE_RAY", "WITHDRAW", "DEFENSE_CURL",
    // 0x70
    "BARRIER", "LIGHT_SCREEN", "HAZE", "REFLECT",
    // 0x74
    "FOCUS_ENERGY", "BIDE", "METRONOME", "MIRROR_MOVE",
    // 0x78
    "SELFDESTRUCT", "EGG_BOMB", "LICK", "SMOG",
    // 0x7C
    "SLUDGE", "BONE_CLUB", "FIRE_BLAST", "WATERFALL",
    // 0x80
    "CLAMP", "SWIFT", "SKULL_BASH", "SPIKE_CANNON",
    // 0x84
    "CONSTRICT", "AMNESIA", "KINESIS", "SOFTBOILED",
    // 0x88
    "HI_JUMP_KICK", "GLARE", "DREAM_EATER", "POISON_GAS",
    // 0x8C
    "BARRAGE", "LEECH_LIFE", "LOVELY_KISS", "SKY_ATTACK",
    // 0x90
    "TRANSFORM", "BUBBLE", "DIZZY_PUNCH", "SPORE",
    // 0x94
    "FLASH", "PSYWAVE", "SPLASH", "ACID_ARMOR",
    // 0x98
    "CRABHAMMER", "EXPLOSION", "FURY_SWIPES", "BONEMERANG",
    // 0x9C
    "REST", "ROCK_SLIDE", "HYPER_FANG", "SHARPEN",
    // 0xA0
    "CONVERSION", "TRI_ATTACK", "SUPER_FANG", "SLASH",
    // 0xA4
    "SUBSTITUTE", "STRUGGLE",
];
