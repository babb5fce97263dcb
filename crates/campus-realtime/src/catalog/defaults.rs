//! Built-in campus catalog used when configuration lists no zones.

use campus_core::config::zones::ZoneConfig;

fn zone(
    id: &str,
    display_name: &str,
    description: &str,
    zone_type: &str,
    (x, y): (f64, f64),
    capacity: u32,
) -> ZoneConfig {
    ZoneConfig {
        id: id.to_string(),
        display_name: display_name.to_string(),
        description: Some(description.to_string()),
        capacity,
        zone_type: zone_type.to_string(),
        x,
        y,
        is_active: true,
        rooms: Vec::new(),
    }
}

/// The nine landmark zones of the Berkeley campus map.
pub fn campus_zones() -> Vec<ZoneConfig> {
    vec![
        zone("campanile", "Campanile", "The iconic UC Berkeley bell tower", "landmark", (400.0, 300.0), 50),
        zone("doe-library", "Doe Library", "Main library on campus", "academic", (350.0, 250.0), 200),
        zone("sather-gate", "Sather Gate", "Historic entrance to campus", "landmark", (200.0, 400.0), 30),
        zone("wheeler-hall", "Wheeler Hall", "Humanities and social sciences", "academic", (300.0, 200.0), 100),
        zone("evans-hall", "Evans Hall", "Mathematics and statistics", "academic", (450.0, 180.0), 80),
        zone("student-union", "Student Union", "Student activities and dining", "student-life", (320.0, 350.0), 150),
        zone("sproul-plaza", "Sproul Plaza", "Central gathering space", "student-life", (280.0, 380.0), 200),
        zone("memorial-stadium", "Memorial Stadium", "Home of Cal Bears football", "athletics", (600.0, 200.0), 300),
        zone(
            "berkeley-art-museum",
            "Art Museum",
            "Berkeley Art Museum and Pacific Film Archive",
            "cultural",
            (500.0, 350.0),
            60,
        ),
    ]
}
