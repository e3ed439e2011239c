use std::path::Path;

use crate::mob::{ContentCatalog, Hazard, SprayType, StatusStateChange, StatusType};

use super::diagnostics::ContentLoadError;
use super::xml::{name_list, parse_document, read_file, XmlFile};

pub fn load_catalog_file(path: &Path) -> Result<ContentCatalog, ContentLoadError> {
    let raw = read_file(path)?;
    parse_catalog_document(path, &raw)
}

/// Reads a `<Catalog>` of status types, hazards, sprays and particle
/// generator names.
pub fn parse_catalog_document(path: &Path, raw: &str) -> Result<ContentCatalog, ContentLoadError> {
    let doc = parse_document(path, raw)?;
    let xml = XmlFile { path, doc: &doc };
    let root = xml.expect_root("Catalog")?;

    let mut catalog = ContentCatalog::default();
    for node in root.children().filter(|node| node.is_element()) {
        let name = xml.required_attr(node, "name")?;
        match node.tag_name().name() {
            "statusType" => {
                let state_change = match node.attribute("stateChange").unwrap_or("none") {
                    "none" => StatusStateChange::None,
                    "flailing" => StatusStateChange::Flailing,
                    "helpless" => StatusStateChange::Helpless,
                    "panic" => StatusStateChange::Panic,
                    other => return Err(xml.invalid(node, "stateChange", other)),
                };
                catalog.add_status_type(StatusType {
                    name: name.to_string(),
                    state_change,
                    turns_inedible: xml.attr(node, "turnsInedible", false)?,
                    removable_with_whistle: xml.attr(node, "removableWithWhistle", false)?,
                    health_change_per_second: xml.attr(node, "healthChangePerSecond", 0.0)?,
                    duration: xml.attr(node, "duration", 0.0)?,
                });
            }
            "hazard" => catalog.add_hazard(Hazard {
                name: name.to_string(),
                effects: node.attribute("effects").map(name_list).unwrap_or_default(),
            }),
            "spray" => catalog.add_spray(SprayType {
                name: name.to_string(),
                effects: node.attribute("effects").map(name_list).unwrap_or_default(),
                buries_pikmin: xml.attr(node, "buriesPikmin", false)?,
            }),
            "particleGenerator" => {
                catalog.particle_generators.insert(name.to_string());
            }
            _ => return Err(xml.unknown_field(node)),
        }
    }

    for effect in catalog
        .hazards
        .values()
        .flat_map(|hazard| &hazard.effects)
        .chain(catalog.sprays.values().flat_map(|spray| &spray.effects))
    {
        if catalog.status_type(effect).is_none() {
            return Err(xml.invalid(root, "effects", effect));
        }
    }

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_entries_are_read() {
        let raw = r#"<Catalog>
            <statusType name="burning" stateChange="panic" healthChangePerSecond="-2" duration="4"/>
            <hazard name="fire" effects="burning"/>
            <spray name="ultra_spicy" effects="burning" buriesPikmin="false"/>
            <particleGenerator name="smoke"/>
        </Catalog>"#;
        let catalog = parse_catalog_document(Path::new("catalog.xml"), raw).expect("catalog");
        let burning = catalog.status_type("burning").expect("status");
        assert_eq!(burning.state_change, StatusStateChange::Panic);
        assert_eq!(burning.health_change_per_second, -2.0);
        assert_eq!(catalog.hazard("fire").map(|h| h.effects.len()), Some(1));
        assert!(catalog.spray("ultra_spicy").is_some());
        assert!(catalog.particle_generators.contains("smoke"));
    }

    #[test]
    fn effects_must_name_known_statuses() {
        let raw = r#"<Catalog><hazard name="water" effects="drowning"/></Catalog>"#;
        let err = parse_catalog_document(Path::new("catalog.xml"), raw).expect_err("effect");
        assert!(matches!(
            err,
            ContentLoadError::InvalidValue { ref value, .. } if value == "drowning"
        ));
    }
}
