//! OpenSextant category -> (entity type, mention type) mapping.
//!
//! OpenSextant labels each annotation with a dotted hierarchy such as
//! `Geo.featureType.PopulatedPlace`. The table below is editorial: it says
//! which categories count as entities at all, and whether a match is usually
//! a proper name or a descriptive nominal.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::models::{EntityType, MentionType};

type Mapping = Option<(EntityType, MentionType)>;

static ENTITY_TYPES: LazyLock<HashMap<&'static str, Mapping>> = LazyLock::new(|| {
    use EntityType::*;
    use MentionType::*;

    [
        // most events are unnamed
        ("Action", Some((Event, Nom))),
        ("Attribute.attribute.measurableCharacteristic", None),
        ("Attribute.weight", None),
        // descriptive attributes
        ("Geo.area", Some((Loc, Nom))),
        ("Geo.distance", Some((Loc, Nom))),
        ("Geo.weather", Some((Loc, Nom))),
        // named geographic features
        ("Geo.featureType.AdminRegion", Some((Loc, Name))),
        ("Geo.featureType.Area", Some((Loc, Name))),
        ("Geo.featureType.Hydro", Some((Loc, Name))),
        ("Geo.featureType.Hypso", Some((Loc, Name))),
        ("Geo.featureType.Misc", Some((Loc, Name))),
        ("Geo.featureType.PopulatedPlace", Some((Loc, Name))),
        ("Geo.featureType.Street", Some((Loc, Name))),
        ("Geo.featureType.Undersea", Some((Loc, Name))),
        ("Geo.featureType.Vegetation", Some((Loc, Name))),
        ("Geo.place.geocoordinate", Some((Loc, Name))),
        ("Geo.place.namedPlace", Some((Loc, Name))),
        // usually named facilities
        ("Geo.featureType.SpotFeature", Some((Fac, Name))),
        ("Geo.facilityComponents", Some((Fac, Name))),
        ("Idea", None),
        ("Information", None),
        ("Object", None),
        ("Organization", Some((Org, Name))),
        ("Person", Some((Per, Name))),
        // would be better expressed as relations
        ("Person.attitude.emotion", None),
        ("Person.attitude.emotion.negativeEmotion", None),
        ("Person.attitude.emotion.positiveEmotion", None),
        ("Person.bodyPart", None),
        ("Person.ethnicity", None),
        ("Person.health", None),
        ("Person.health.disease", None),
        ("Person.health.injury", None),
        ("Person.jobOrRole", None),
        ("Person.language", None),
        ("Person.name.personName", Some((Per, Name))),
        ("Person.name.title.corporateTitle", Some((Per, Nom))),
        ("Person.name.title.governmentTitle", Some((Per, Nom))),
        ("Person.name.title.hereditaryTitle", Some((Per, Nom))),
        ("Person.name.title.militaryTitle", Some((Per, Nom))),
        ("Person.name.title.personalTitle", Some((Per, Nom))),
        ("Person.name.title.religiousTitle", Some((Per, Nom))),
        ("Person.relative", None),
        ("Substance", None),
        ("Time", None),
    ]
    .into_iter()
    .collect()
});

/// Every category in the OpenSextant general-purpose taxonomy.
pub static KNOWN_CATEGORIES: &[&str] = &[
    "Action.event",
    "Action.event.crime",
    "Action.event.disaster",
    "Action.event.legalEvent",
    "Action.event.meetingEvent",
    "Action.event.militaryEvent",
    "Action.event.movement",
    "Action.event.politicalEvent",
    "Action.event.socialEvent",
    "Action.event.violentEvent",
    "Attribute.attribute.measurableCharacteristic",
    "Attribute.weight",
    "Geo.area",
    "Geo.distance",
    "Geo.facilityComponents",
    "Geo.featureType.AdminRegion",
    "Geo.featureType.Area",
    "Geo.featureType.Hydro",
    "Geo.featureType.Hypso",
    "Geo.featureType.Misc",
    "Geo.featureType.PopulatedPlace",
    "Geo.featureType.SpotFeature",
    "Geo.featureType.Street",
    "Geo.featureType.Undersea",
    "Geo.featureType.Vegetation",
    "Geo.place.geocoordinate",
    "Geo.place.namedPlace",
    "Geo.weather",
    "Idea.fieldOfStudy",
    "Idea.idea",
    "Idea.ideology.politicalIdealogy",
    "Idea.ideology.socialIdealogy",
    "Information",
    "Information.identifier",
    "Information.identifier.documentTitle",
    "Information.identifier.MACAddress",
    "Information.identifier.telephoneNumber",
    "Information.informationArtifact",
    "Information.software",
    "Information.web.emailAddress",
    "Information.web.IPAddress",
    "Information.web.url",
    "Information.web.webSite",
    "Object",
    "Object.animal",
    "Object.clothing",
    "Object.container",
    "Object.debris",
    "Object.electronics",
    "Object.equipment",
    "Object.equipment.constructionEquipment",
    "Object.equipment.tool",
    "Object.finance.financialInstrument",
    "Object.finance.money",
    "Object.food",
    "Object.vehicle",
    "Object.vehicle.aircraft",
    "Object.vehicle.aircraft.combatAircraft",
    "Object.vehicle.aircraft.combatSupportAircraft",
    "Object.vehicle.aircraft.helicopter",
    "Object.vehicle.emergencyVehicle",
    "Object.vehicle.militaryVehicle",
    "Object.vehicle.militaryVehicle.armoredVehicle",
    "Object.vehicle.ship",
    "Object.vehicle.spacecraft",
    "Object.vehicle.submarine",
    "Object.weapon",
    "Object.weapon.explosive",
    "Object.weapon.firearm",
    "Object.weapon.weaponOfMassDestruction",
    "Organization",
    "Organization.corporateOrganization",
    "Organization.criminalOrganization",
    "Organization.governmentOrganization",
    "Organization.governmentOrganization.politicalParty",
    "Organization.governmentOrganization.USGovernmentOrganization",
    "Organization.informalOrganization",
    "Organization.internationalOrganization",
    "Organization.media.newspaper",
    "Organization.militantGroup",
    "Organization.militaryOrganization",
    "Organization.religion",
    "Organization.terroristGroup",
    "Person",
    "Person.attitude.emotion",
    "Person.attitude.emotion.negativeEmotion",
    "Person.attitude.emotion.positiveEmotion",
    "Person.bodyPart",
    "Person.ethnicity",
    "Person.health",
    "Person.health.disease",
    "Person.health.injury",
    "Person.jobOrRole",
    "Person.language",
    "Person.name.personName",
    "Person.name.title.corporateTitle",
    "Person.name.title.governmentTitle",
    "Person.name.title.hereditaryTitle",
    "Person.name.title.militaryTitle",
    "Person.name.title.personalTitle",
    "Person.name.title.religiousTitle",
    "Person.relative",
    "Substance",
    "Substance.chemical",
    "Substance.drug",
    "Substance.material",
    "Time.date",
    "Time.dayOfTheWeek",
    "Time.holiday",
    "Time.lengthOfTime",
    "Time.month",
    "Time.season",
    "Time.time",
    "Time.timePhrase",
];

static KNOWN_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| KNOWN_CATEGORIES.iter().copied().collect());

/// Resolve a dotted category to entity and mention types.
///
/// An exact entry wins, including an entry that suppresses the category.
/// Only when the full string has no entry is the top-level segment tried.
pub fn resolve(category: &str) -> Option<(EntityType, MentionType)> {
    if let Some(mapping) = ENTITY_TYPES.get(category) {
        return *mapping;
    }
    let top = category.split('.').next().unwrap_or(category);
    ENTITY_TYPES.get(top).copied().flatten()
}

/// Whether the category appears in the OpenSextant taxonomy.
pub fn is_known_category(category: &str) -> bool {
    KNOWN_SET.contains(category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert_eq!(
            resolve("Geo.featureType.PopulatedPlace"),
            Some((EntityType::Loc, MentionType::Name))
        );
        assert_eq!(
            resolve("Person.name.title.militaryTitle"),
            Some((EntityType::Per, MentionType::Nom))
        );
        assert_eq!(
            resolve("Geo.featureType.SpotFeature"),
            Some((EntityType::Fac, MentionType::Name))
        );
    }

    #[test]
    fn test_exact_match_beats_top_level() {
        assert_eq!(resolve("Person"), Some((EntityType::Per, MentionType::Name)));
        assert_ne!(resolve("Person.name.title.corporateTitle"), resolve("Person"));
        assert_ne!(resolve("Person.jobOrRole"), resolve("Person"));
        assert_ne!(resolve("Geo.featureType.PopulatedPlace"), resolve("Geo"));
    }

    #[test]
    fn test_top_level_fallback() {
        assert_eq!(
            resolve("Organization.terroristGroup"),
            Some((EntityType::Org, MentionType::Name))
        );
        assert_eq!(
            resolve("Person.someUnlistedThing"),
            Some((EntityType::Per, MentionType::Name))
        );
    }

    #[test]
    fn test_explicit_suppression() {
        assert_eq!(resolve("Object"), None);
        assert_eq!(resolve("Object.vehicle.ship"), None);
        assert_eq!(resolve("Time.date"), None);
        // suppressed even though "Person" maps to a name
        assert_eq!(resolve("Person.jobOrRole"), None);
        assert_eq!(resolve("Person.health.disease"), None);
    }

    #[test]
    fn test_unmapped() {
        assert_eq!(resolve("Geo"), None);
        assert_eq!(resolve("Geo.unheardOf"), None);
        assert_eq!(resolve(""), None);
        assert_eq!(resolve("Nonsense.category"), None);
    }

    #[test]
    fn test_table_size() {
        assert_eq!(ENTITY_TYPES.len(), 44);
        let mapped = ENTITY_TYPES.values().filter(|m| m.is_some()).count();
        assert_eq!(mapped, 26);
    }

    #[test]
    fn test_known_categories() {
        assert!(is_known_category("Geo.featureType.PopulatedPlace"));
        assert!(is_known_category("Time.holiday"));
        assert!(!is_known_category("Geo"));
        assert_eq!(KNOWN_SET.len(), KNOWN_CATEGORIES.len());
    }
}
