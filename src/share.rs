//! Sharing helpers: map links, share text and social post templates

use serde::Serialize;

use crate::plant::{Plant, PlantKind};

/// Google Maps link centred on a point
pub fn map_link(lat: f64, lon: f64) -> String {
    format!("https://www.google.com/maps?q={lat},{lon}&ll={lat},{lon}&z=15")
}

/// `lat, lon` at the given precision
pub fn format_coordinates(lat: f64, lon: f64, decimals: usize) -> String {
    format!("{:.*}, {:.*}", decimals, lat, decimals, lon)
}

/// Plain-text message for sharing an arbitrary location
pub fn share_text(label: &str, address: Option<&str>, lat: f64, lon: f64) -> String {
    let location = match address {
        Some(address) => address.to_string(),
        None => format_coordinates(lat, lon, 6),
    };
    format!("📍 {}\n🗺️ {}\n🔗 {}", label, location, map_link(lat, lon))
}

/// One post per platform/style
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostTemplates {
    pub short: String,
    pub inspirational: String,
    pub social: String,
    pub instagram: String,
    pub detailed: String,
    pub whatsapp: String,
    pub youtube: String,
    pub professional: String,
    pub twitter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PlantKind,
    pub emoji: &'static str,
    pub address: String,
    pub landmarks: Vec<String>,
    pub coordinates: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SocialPosts {
    pub templates: PostTemplates,
    pub map_link: String,
    pub plant_info: PlantInfo,
}

/// Render every post template for a plant
pub fn social_posts(plant: &Plant) -> SocialPosts {
    let lat = plant.latitude();
    let lon = plant.longitude();
    let link = map_link(lat, lon);
    let kind = plant.kind();
    let kind_label = kind.label();
    let emoji = kind.marker();
    let name = plant.clean_name();
    let coordinates = format_coordinates(lat, lon, 4);
    let location = plant.address.clone().unwrap_or_else(|| coordinates.clone());

    let landmarks_text = if plant.landmarks.is_empty() {
        String::new()
    } else {
        let first_two: Vec<&str> = plant.landmarks.iter().take(2).map(String::as_str).collect();
        format!("Near: {}", first_two.join(", "))
    };
    let detailed_landmarks = if landmarks_text.is_empty() {
        String::new()
    } else {
        format!("🏞️ {}", landmarks_text)
    };

    let templates = PostTemplates {
        short: format!(
            "Just planted a new {kind_label} today! 🌿{emoji}\nOne small step for a greener tomorrow. 🌍✨\n\n📍 {name}\n🗺️ {link}"
        ),
        inspirational: format!(
            "Today I planted a {kind_label}, a tiny act of kindness for our planet.\nLet's grow more green together! 🌱💚\n\n📍 {name}\n🗺️ {location}\n🔗 {link}\n\n#PlantMore #GoGreen #DigitalPlanter"
        ),
        social: format!(
            "New plant baby added to my garden! {emoji}🌱\nEvery plant is a promise for a better future.\n\n📍 {name}\n🗺️ {location}\n{landmarks_text}\n🔗 {link}\n\n#NatureLove #PlantationDrive #GreenLife #EcoWarrior"
        ),
        instagram: format!(
            "Planted something beautiful today.\nHoping it grows strong and bright, just like dreams. ✨🌱\n\n{emoji} {name}\n📍 {location}\n{landmarks_text}\n\nView on map: {link}\n\n#GardenVibes #PlantingDay #NatureMagic #GreenThumb #EcoFriendly"
        ),
        detailed: format!(
            "🌱 I planted a {kind_label} today!\n\n📍 {name}\n🗺️ {location}\n📌 Coordinates: {coordinates}\n{detailed_landmarks}\n\nView on map: {link}\n\n#DigitalPlanter #PlantATree #GreenEarth #SaveThePlanet #ClimateAction"
        ),
        whatsapp: format!(
            "Planted a new {kind_label} today {emoji}\nLet's make the Earth greener, one plant at a time!\n\n📍 {name}\n{link}"
        ),
        youtube: format!(
            "Planting a new {kind_label} today! 🌱\nJoin me in making the world greener.\n\n📍 {name}\n🗺️ {location}\n{link}\n\nLike, share, and comment what plant I should grow next! 🌿✨\n#shorts #planting #green #ecofriendly #nature"
        ),
        professional: format!(
            "I planted a new {kind_label} today as part of my commitment to environmental care.\nSmall actions create big impacts. 🌱🌍\n\n📍 Location: {name}\n🗺️ {location}\n🔗 {link}\n\n#Sustainability #EcoFriendly #CorporateResponsibility #GreenInitiative"
        ),
        twitter: format!("🌱 Just planted a {kind_label}!\n\n📍 {name}\n🗺️ {link}\n\n#PlantATree #GoGreen"),
    };

    SocialPosts {
        templates,
        map_link: link,
        plant_info: PlantInfo {
            name,
            kind,
            emoji,
            address: location,
            landmarks: plant.landmarks.clone(),
            coordinates,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plant::Coordinates;

    #[test]
    fn test_map_link() {
        assert_eq!(
            map_link(40.7829, -73.9654),
            "https://www.google.com/maps?q=40.7829,-73.9654&ll=40.7829,-73.9654&z=15"
        );
    }

    #[test]
    fn test_share_text_falls_back_to_coordinates() {
        let text = share_text("Shared Location", None, 12.5, -3.25);
        assert!(text.starts_with("📍 Shared Location\n🗺️ 12.500000, -3.250000\n🔗 https://"));

        let text = share_text("Home", Some("1 Garden Lane"), 12.5, -3.25);
        assert!(text.contains("🗺️ 1 Garden Lane\n"));
    }

    #[test]
    fn test_social_posts_for_tree_with_landmarks() {
        let plant = Plant {
            address: Some("Lodhi Road, New Delhi".to_string()),
            landmarks: vec!["Lodhi Road".into(), "Lodhi Colony".into(), "New Delhi".into()],
            is_user_planted: true,
            ..Plant::curated("p1", "Neem 🌳", Coordinates::new(28.5933, 77.2197))
        };

        let posts = social_posts(&plant);
        assert_eq!(posts.plant_info.name, "Neem");
        assert_eq!(posts.plant_info.kind, PlantKind::Tree);
        assert_eq!(posts.plant_info.emoji, "🌳");
        assert_eq!(posts.plant_info.coordinates, "28.5933, 77.2197");
        assert!(posts.templates.twitter.starts_with("🌱 Just planted a tree!"));
        assert!(posts.templates.social.contains("Near: Lodhi Road, Lodhi Colony\n"));
        assert!(!posts.templates.social.contains("New Delhi\n🔗"));
        assert!(posts.templates.detailed.contains("🏞️ Near: Lodhi Road, Lodhi Colony"));
        assert!(posts.templates.inspirational.contains("🗺️ Lodhi Road, New Delhi"));
    }

    #[test]
    fn test_social_posts_without_address() {
        let plant = Plant::curated("p2", "Rose 🌸", Coordinates::new(1.0, 2.0));
        let posts = social_posts(&plant);

        assert_eq!(posts.plant_info.address, "1.0000, 2.0000");
        assert!(posts.templates.detailed.contains("Coordinates: 1.0000, 2.0000\n\n\nView on map"));
        let json = serde_json::to_value(&posts).unwrap();
        assert_eq!(json["plant_info"]["type"], "flower");
    }
}
