//! Map ids for the towns, routes and starting buildings

#[rustfmt::skip]
const MAP_NAMES: [&str; 41] = [
    // 0x00
    "PALLET_TOWN", "VIRIDIAN_CITY", "PEWTER_CITY", "CERULEAN_CITY",
    // 0x04
    "LAVENDER_TOWN", "VERMILION_CITY", "CELADON_CITY", "FUCHSIA_CITY",
    // 0x08
    "CINNABAR_ISLAND", "INDIGO_PLATEAU", "SAFFRON_CITY", "UNUSED_MAP_0B",
    // 0x0C
    "ROUTE_1", "ROUTE_2", "ROUTE_3", "ROUTE_4",
    // 0x10
    "ROUTE_5", "ROUTE_6", "ROUTE_7", "ROUTE_8",
    // 0x14
    "ROUTE_9", "ROUTE_10", "ROUTE_11", "ROUTE_12",
    // 0x18
    "ROUTE_13", "ROUTE_14", "ROUTE_15", "ROUTE_16",
    // 0x1C
    "ROUTE_17", "ROUTE_18", "ROUTE_19", "ROUTE_20",
    // 0x20
    "ROUTE_21", "ROUTE_22", "ROUTE_23", "ROUTE_24",
    // 0x24
    "ROUTE_25", "REDS_HOUSE_1F", "REDS_HOUSE_2F", "BLUES_HOUSE",
    // 0x28
    "OAKS_LAB",
];

/// Name of a map id, `None` outside the known range
pub fn map_name(map_id: u8) -> Option<&'static str> {
    MAP_NAMES.get(map_id as usize).copied()
}
