//! Species internal index table
//!
//! Gen I stores species by internal index, not Pokedex number.

/// Species id as stored in the party struct and battle data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Species(pub u8);

impl Species {
    /// Canonical name, `None` for ids past the last internal index
    pub fn name(&self) -> Option<&'static str> {
        SPECIES_NAMES.get(self.0 as usize).copied()
    }

    /// Empty party slot or unused index
    pub fn is_valid(&self) -> bool {
        matches!(self.name(), Some(name) if name != "NONE" && name != "MISSINGNO")
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "SPECIES_{:#04x}", self.0),
        }
    }
}

#[rustfmt::skip]
const SPECIES_NAMES: [&str; 191] = [
    // 0x00
    "NONE", "RHYDON", "KANGASKHAN", "NIDORAN_M",
    // 0x04
    "CLEFAIRY", "SPEAROW", "VOLTORB", "NIDOKING",
    // 0x08
    "SLOWBRO", "IVYSAUR", "EXEGGUTOR", "LICKITUNG",
    // 0x0C
    "EXEGGCUTE", "GRIMER", "GENGAR", "NIDORAN_F",
    // 0x10
    "NIDOQUEEN", "CUBONE", "RHYHORN", "LAPRAS",
    // 0x14
    "ARCANINE", "MEW", "GYARADOS", "SHELLDER",
    // 0x18
    "TENTACOOL", "GASTLY", "SCYTHER", "STARYU",
    // 0x1C
    "BLASTOISE", "PINSIR", "TANGELA", "MISSINGNO",
    // 0x20
    "MISSINGNO", "GROWLITHE", "ONIX", "FEAROW",
    // 0x24
    "PIDGEY", "SLOWPOKE", "KADABRA", "GRAVELER",
    // 0x28
    "CHANSEY", "MACHOKE", "MR_MIME", "HITMONLEE",
    // 0x2C
    "HITMONCHAN", "ARBOK", "PARASECT", "PSYDUCK",
    // 0x30
    "DROWZEE", "GOLEM", "MISSINGNO", "MAGMAR",
    // 0x34
    "MISSINGNO", "ELECTABUZZ", "MAGNETON", "KOFFING",
    // 0x38
    "MISSINGNO", "MANKEY", "SEEL", "DIGLETT",
    // 0x3C
    "TAUROS", "MISSINGNO", "MISSINGNO", "MISSINGNO",
    // 0x40
    "FARFETCHD", "VENONAT", "DRAGONITE", "MISSINGNO",
    // 0x44
    "MISSINGNO", "MISSINGNO", "DODUO", "POLIWAG",
    // 0x48
    "JYNX", "MOLTRES", "ARTICUNO", "ZAPDOS",
    // 0x4C
    "DITTO", "MEOWTH", "KRABBY", "MISSINGNO",
    // 0x50
    "MISSINGNO", "MISSINGNO", "VULPIX", "NINETALES",
    // 0x54
    "PIKACHU", "RAICHU", "MISSINGNO", "MISSINGNO",
    // 0x58
    "DRATINI", "DRAGONAIR", "KABUTO", "KABUTOPS",
    // 0x5C
    "HORSEA", "SEADRA", "MISSINGNO", "MISSINGNO",
    // 0x60
    "SANDSHREW", "SANDSLASH", "OMANYTE", "OMASTAR",
    // 0x64
    "JIGGLYPUFF", "WIGGLYTUFF", "EEVEE", "FLAREON",
    // 0x68
    "JOLTEON", "VAPOREON", "MACHOP", "ZUBAT",
    // 0x6C
    "EKANS", "PARAS", "POLIWHIRL", "POLIWRATH",
    // 0x70
    "WEEDLE", "KAKUNA", "BEEDRILL", "MISSINGNO",
    // 0x74
    "DODRIO", "PRIMEAPE", "DUGTRIO", "VENOMOTH",
    // 0x78
    "DEWGONG", "MISSINGNO", "MISSINGNO", "CATERPIE",
    // 0x7C
    "METAPOD", "BUTTERFREE", "MACHAMP", "MISSINGNO",
    // 0x80
    "GOLDUCK", "HYPNO", "GOLBAT", "MEWTWO",
    // 0x84
    "SNORLAX", "MAGIKARP", "MISSINGNO", "MISSINGNO",
    // 0x88
    "MUK", "MISSINGNO", "KINGLER", "CLOYSTER",
    // 0x8C
    "MISSINGNO", "ELECTRODE", "CLEFABLE", "WEEZING",
    // 0x90
    "PERSIAN", "MAROWAK", "MISSINGNO", "HAUNTER",
    // 0x94
    "ABRA", "ALAKAZAM", "PIDGEOTTO", "PIDGEOT",
    // 0x98
    "STARMIE", "BULBASAUR", "VENUSAUR", "TENTACRUEL",
    // 0x9C
    "MISSINGNO", "GOLDEEN", "SEAKING", "MISSINGNO",
    // 0xA0
    "MISSINGNO", "MISSINGNO", "MISSINGNO", "PONYTA",
    // 0xA4
    "RAPIDASH", "RATTATA", "RATICATE", "NIDORINO",
    // 0xA8
    "NIDORINA", "GEODUDE", "PORYGON", "AERODACTYL",
    // 0xAC
    "MISSINGNO", "MAGNEMITE", "MISSINGNO", "MISSINGNO",
    // 0xB0
    "CHARMANDER", "SQUIRTLE", "CHARMELEON", "WARTORTLE",
    // 0xB4
    "CHARIZARD", "MISSINGNO", "FOSSIL_KABUTOPS", "FOSSIL_AERODACTYL",
    // 0xB8
    "MON_GHOST", "ODDISH", "GLOOM", "VILEPLUME",
    // 0xBC
    "BELLSPROUT", "WEEPINBELL", "VICTREEBEL",
];
