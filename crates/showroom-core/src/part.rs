//! Car part metadata and the ordered part table

use serde::{Deserialize, Serialize};

/// Description used when a clicked node belongs to no known part
pub const UNKNOWN_PART_DESCRIPTION: &str = "No detailed information is available for this part.";
/// Name used when a clicked node has no name at all
pub const UNKNOWN_PART_NAME: &str = "Unknown part";
/// Characters of description carried in host notifications
pub const SNIPPET_CHARS: usize = 60;
/// Prefix of keys synthesized for unowned nodes; never valid in a part table
pub const ANONYMOUS_KEY_PREFIX: &str = "#node:";

/// Key for the ad hoc part standing in for an unowned node
pub fn anonymous_key(node_name: &str) -> String {
    format!("{}{}", ANONYMOUS_KEY_PREFIX, node_name)
}

/// Node name behind an anonymous key
pub fn anonymous_node_name(key: &str) -> Option<&str> {
    key.strip_prefix(ANONYMOUS_KEY_PREFIX)
}

/// One row of a part's spec table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSpec {
    pub label: String,
    pub value: String,
}

/// Semantic grouping of mesh nodes (engine, wheels, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarPart {
    /// Stable key (e.g. "engine")
    pub key: String,
    /// Display name
    pub name: String,
    pub description: String,
    /// Ordered spec rows
    #[serde(default)]
    pub specs: Vec<PartSpec>,
    /// Reference image path
    #[serde(default)]
    pub image: Option<String>,
    /// Node name substrings claiming ownership (case-insensitive)
    #[serde(default)]
    pub mesh_identifiers: Vec<String>,
    #[serde(skip)]
    anonymous: bool,
}

impl CarPart {
    pub fn new(key: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: description.into(),
            specs: Vec::new(),
            image: None,
            mesh_identifiers: Vec::new(),
            anonymous: false,
        }
    }

    pub fn with_identifiers<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mesh_identifiers = identifiers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_spec(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.specs.push(PartSpec {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Ad hoc part reported for a node no table entry claims.
    ///
    /// Carries the raw node name so every click still produces feedback.
    pub fn anonymous(node_name: &str) -> Self {
        let name = if node_name.is_empty() {
            UNKNOWN_PART_NAME
        } else {
            node_name
        };
        let mut part = Self::new(anonymous_key(node_name), name, UNKNOWN_PART_DESCRIPTION);
        part.anonymous = true;
        part
    }

    /// True for parts synthesized from a raw node name
    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    /// Case-insensitive substring test against a node name
    pub fn matches(&self, node_name: &str) -> bool {
        let lower = node_name.to_lowercase();
        self.mesh_identifiers
            .iter()
            .filter(|id| !id.is_empty())
            .any(|id| lower.contains(&id.to_lowercase()))
    }

    /// Description cut for toast-style notifications
    pub fn snippet(&self) -> String {
        snippet(&self.description, SNIPPET_CHARS)
    }
}

/// Truncate to `max_chars` characters, adding an ellipsis only when cut
pub fn snippet(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Ordered list of parts; order decides ownership when identifiers overlap
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartTable {
    parts: Vec<CarPart>,
}

impl PartTable {
    pub fn new(parts: Vec<CarPart>) -> Self {
        Self { parts }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CarPart> {
        self.parts.iter()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&CarPart> {
        self.parts.iter().find(|p| p.key == key)
    }

    /// First part, in table order, whose identifiers match the node name
    pub fn first_match(&self, node_name: &str) -> Option<&CarPart> {
        self.parts.iter().find(|p| p.matches(node_name))
    }

    /// Parts shipped with the viewer
    pub fn builtin() -> Self {
        Self::new(vec![
            CarPart::new(
                "body",
                "Body",
                "High-strength steel body with a modern aerodynamic shape",
            )
            .with_identifiers(["body"])
            .with_spec("Material", "High-strength steel")
            .with_spec("Drag coefficient", "0.32 Cd")
            .with_spec("Weight", "1,450 kg")
            .with_image("/images/car-body-detail.png"),
            CarPart::new(
                "headlight",
                "LED Headlights",
                "Smart LED headlight system with automatic levelling",
            )
            .with_identifiers(["headlight"])
            .with_spec("Technology", "LED Matrix")
            .with_spec("Auto levelling", "Yes")
            .with_spec("Modes", "Low, high, automatic")
            .with_image("/images/headlight-detail.png"),
            CarPart::new(
                "wheel",
                "Alloy Wheels",
                "Sporty 19-inch aluminium alloy wheels",
            )
            .with_identifiers(["wheel", "rim", "tire", "tyre"])
            .with_spec("Size", "19 inch")
            .with_spec("Material", "Aluminium alloy")
            .with_spec("Tyres", "Continental 245/45 R19")
            .with_image("/images/wheel-detail.png"),
            CarPart::new(
                "engine",
                "Engine",
                "Powerful 2.0L turbocharged engine producing 228 horsepower",
            )
            .with_identifiers(["engine", "motor"])
            .with_spec("Displacement", "2.0L Turbo")
            .with_spec("Power", "228 hp")
            .with_spec("Torque", "350 Nm")
            .with_spec("0-100 km/h", "7.1 s")
            .with_image("/images/engine-detail.png"),
            CarPart::new(
                "interior",
                "Interior",
                "Luxurious interior with premium leather seats and a modern infotainment system",
            )
            .with_identifiers(["interior", "seat"])
            .with_spec("Seat material", "Nappa leather")
            .with_spec("Infotainment", "10.4 inch")
            .with_spec("Audio", "13 Bose speakers")
            .with_spec("Climate", "Dual-zone")
            .with_image("/images/interior-detail.png"),
            CarPart::new(
                "dashboard",
                "Dashboard",
                "Digital dashboard with a 10.4-inch touchscreen",
            )
            .with_identifiers(["dashboard", "console"])
            .with_spec("Display", "10.4 inch touch")
            .with_spec("Connectivity", "Apple CarPlay, Android Auto")
            .with_spec("Controls", "Touch and voice")
            .with_spec("Operating system", "Showroom OS")
            .with_image("/images/dashboard-detail.png"),
            CarPart::new(
                "battery",
                "Battery System",
                "High-capacity lithium-ion battery with fast charging",
            )
            .with_identifiers(["battery"])
            .with_spec("Capacity", "70 kWh")
            .with_spec("Range", "420 km")
            .with_spec("Fast charge", "30 min (10-80%)")
            .with_spec("Warranty", "8 years or 160,000 km")
            .with_image("/images/battery-detail.png"),
            CarPart::new(
                "suspension",
                "Suspension",
                "Independent suspension that adapts to the selected drive mode",
            )
            .with_identifiers(["suspension", "shock", "spring"])
            .with_spec("Type", "Independent multi-link")
            .with_spec("Adjustment", "Electronic, per drive mode")
            .with_spec("Drive modes", "Eco, Comfort, Sport, Individual")
            .with_image("/images/suspension-detail.png"),
        ])
    }
}

impl FromIterator<CarPart> for PartTable {
    fn from_iter<T: IntoIterator<Item = CarPart>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_match() {
        let wheels = CarPart::new("wheels", "Wheels", "").with_identifiers(["Wheel"]);
        assert!(wheels.matches("wheel_fl"));
        assert!(wheels.matches("FrontWHEEL.001"));
        assert!(!wheels.matches("body_main"));
    }

    #[test]
    fn test_empty_identifier_never_matches() {
        let part = CarPart::new("ghost", "Ghost", "").with_identifiers([""]);
        assert!(!part.matches("anything"));
    }

    #[test]
    fn test_first_match_in_table_order() {
        let table: PartTable = [
            CarPart::new("lights", "Lights", "").with_identifiers(["light"]),
            CarPart::new("headlight", "Headlight", "").with_identifiers(["headlight"]),
        ]
        .into_iter()
        .collect();

        assert_eq!(table.first_match("headlight_l").unwrap().key, "lights");
        assert!(table.first_match("mirror").is_none());
    }

    #[test]
    fn test_anonymous_part() {
        let part = CarPart::anonymous("body_main");
        assert_eq!(part.name, "body_main");
        assert_eq!(part.key, "#node:body_main");
        assert_eq!(anonymous_node_name(&part.key), Some("body_main"));
        assert!(part.specs.is_empty());
        assert!(part.is_anonymous());
        assert_eq!(part.description, UNKNOWN_PART_DESCRIPTION);

        assert_eq!(CarPart::anonymous("").name, UNKNOWN_PART_NAME);
    }

    #[test]
    fn test_catalog_part_without_identifiers_is_not_anonymous() {
        let part: CarPart = toml::from_str(
            r#"
key = "trunk"
name = "Trunk"
description = "520 litres of luggage space"
"#,
        )
        .unwrap();
        assert!(part.mesh_identifiers.is_empty());
        assert!(!part.is_anonymous());
        assert!(!CarPart::new("doors", "Doors", "").is_anonymous());
    }

    #[test]
    fn test_snippet() {
        assert_eq!(snippet("short", 60), "short");
        let long = "a".repeat(61);
        assert_eq!(snippet(&long, 60), format!("{}...", "a".repeat(60)));
        // Multi-byte characters are counted, not bytes
        assert_eq!(snippet("động cơ", 4), "động...");
    }

    #[test]
    fn test_builtin_table() {
        let table = PartTable::builtin();
        assert_eq!(table.len(), 8);
        let engine = table.get("engine").unwrap();
        assert_eq!(engine.specs[0].label, "Displacement");
        assert_eq!(engine.specs.len(), 4);
        assert_eq!(table.first_match("Wheel_RR").unwrap().key, "wheel");
    }
}
