use std::collections::HashMap;

/// Speed limit (km/h) assumed when the road class is unknown or no road was found
pub const DEFAULT_SPEED_LIMIT: u32 = 50;

const DEFAULT_DESCRIPTION: &str = "Road";

/// Infer a speed limit (km/h) from an OSM `highway` class
pub fn speed_limit_for(road_class: &str) -> u32 {
    ROAD_CLASSES
        .get(road_class)
        .map(|(limit, _)| *limit)
        .unwrap_or(DEFAULT_SPEED_LIMIT)
}

/// Human-readable description of an OSM `highway` class
pub fn describe_road_class(road_class: &str) -> &'static str {
    ROAD_CLASSES
        .get(road_class)
        .map(|(_, description)| *description)
        .unwrap_or(DEFAULT_DESCRIPTION)
}

lazy_static::lazy_static! {
    static ref ROAD_CLASSES: HashMap<&'static str, (u32, &'static str)> = {
        let mut m = HashMap::new();
        // Limited-access roads
        m.insert("motorway", (110, "Motorway"));
        m.insert("motorway_link", (80, "Motorway Ramp"));
        m.insert("trunk", (90, "Expressway"));
        m.insert("trunk_link", (70, "Expressway Ramp"));
        // Classified roads
        m.insert("primary", (80, "Primary Road"));
        m.insert("primary_link", (60, "Primary Road Ramp"));
        m.insert("secondary", (60, "Secondary Road"));
        m.insert("secondary_link", (50, "Secondary Road Ramp"));
        m.insert("tertiary", (50, "Tertiary Road"));
        m.insert("tertiary_link", (40, "Tertiary Road Ramp"));
        // Local streets
        m.insert("residential", (40, "Residential Street"));
        m.insert("living_street", (20, "Living Street"));
        m.insert("service", (20, "Service Road"));
        m.insert("unclassified", (50, "Unclassified Road"));
        m.insert("road", (50, DEFAULT_DESCRIPTION));
        m
    };
}
