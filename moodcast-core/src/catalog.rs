//! Static mood tables keyed by the provider's weather category.

use serde::Serialize;

const EMBED_BASE: &str = "https://open.spotify.com/embed/track";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Track {
    pub id: &'static str,
    pub title: &'static str,
}

impl Track {
    const fn new(id: &'static str, title: &'static str) -> Self {
        Self { id, title }
    }

    pub fn embed_url(&self) -> String {
        format!("{EMBED_BASE}/{}", self.id)
    }
}

const CLEAR: &[Track] = &[
    Track::new("1rqqCSm0Qe4I9rUvWncaom", "High Hopes - Panic! At The Disco"),
    Track::new("0VjIjW4GlUZAMYd2vXMi3b", "Blinding Lights - The Weeknd"),
];
const CLOUDS: &[Track] = &[
    Track::new("3n3Ppam7vgaVa1iaRUc9Lp", "Mr. Brightside - The Killers"),
    Track::new("7LVHVU3tWfcxj5aiPFEW4Q", "Fix You - Coldplay"),
];
const RAIN: &[Track] = &[
    Track::new("1zwMYTA5nlNjZxYrvBB2pV", "Someone Like You - Adele"),
    Track::new("0JmiBCpWc1IAc0et7Xm7FL", "Let Her Go - Passenger"),
];
const DRIZZLE: &[Track] = &[Track::new("1lkvpmrCaXK8QtliFDcHBO", "Bubbly - Colbie Caillat")];
const THUNDERSTORM: &[Track] =
    &[Track::new("7ouMYWpwJ422jRcDASZB7P", "Knights of Cydonia - Muse")];
const SNOW: &[Track] = &[Track::new("6b8Be6ljOzmkOmFslEb23P", "Let It Go - Idina Menzel")];
pub const DEFAULT_PLAYLIST: &[Track] =
    &[Track::new("3n3Ppam7vgaVa1iaRUc9Lp", "Mr. Brightside - The Killers")];

/// Categories that have a dedicated playlist.
pub const PLAYLIST_CATEGORIES: &[&str] =
    &["Clear", "Clouds", "Rain", "Drizzle", "Thunderstorm", "Snow"];

pub const DEFAULT_ACTIVITY: &str = "🎧 Nikmati harimu sambil mendengarkan musik favoritmu.";

/// Exact, case-sensitive lookup; unknown or absent categories get the default list.
pub fn select_playlist(category: Option<&str>) -> &'static [Track] {
    match category {
        Some("Clear") => CLEAR,
        Some("Clouds") => CLOUDS,
        Some("Rain") => RAIN,
        Some("Drizzle") => DRIZZLE,
        Some("Thunderstorm") => THUNDERSTORM,
        Some("Snow") => SNOW,
        _ => DEFAULT_PLAYLIST,
    }
}

pub fn select_activity(category: Option<&str>) -> &'static str {
    match category {
        Some("Clear") => "☀️ Cuaca cerah, saatnya jalan-jalan di taman atau bersepeda!",
        Some("Clouds") => "☁️ Langit berawan, cocok untuk ngopi santai di kafe.",
        Some("Rain") => "🌧️ Sedang hujan, lebih baik di rumah sambil membaca buku.",
        Some("Drizzle") => "🌦️ Gerimis ringan, jangan lupa bawa payung kalau keluar.",
        Some("Thunderstorm") => "⛈️ Ada badai petir, tetap di dalam ruangan dan tetap aman.",
        Some("Snow") => "❄️ Turun salju, waktunya membuat boneka salju!",
        Some("Mist" | "Fog" | "Haze") => "🌫️ Jarak pandang terbatas, berkendaralah dengan hati-hati.",
        _ => DEFAULT_ACTIVITY,
    }
}

/// Split a suggestion into its leading emoji marker and the message.
///
/// The marker runs up to the first space; a suggestion without one is all message.
pub fn split_activity(suggestion: &str) -> (&str, &str) {
    match suggestion.split_once(' ') {
        Some((marker, message)) if !marker.chars().any(char::is_alphanumeric) => {
            (marker, message.trim_start())
        }
        _ => ("", suggestion),
    }
}
