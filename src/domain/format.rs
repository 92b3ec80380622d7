//! Plain-text rendering of search results for MCP text content blocks

use crate::config::LinkPolicy;
use crate::domain::utils::{format_count, truncate_description};
use crate::radio_client::{Podcast, SearchResults, Station};

pub const CALL_TO_ACTION: &str = "Tap a link above to start listening.";

pub fn no_results_message(query: &str) -> String {
    format!(
        "No results found for \"{query}\". Try searching by station name, country, language, or genre."
    )
}

pub fn render_search_results(query: &str, results: &SearchResults, links: &LinkPolicy) -> String {
    if results.is_empty() {
        return no_results_message(query);
    }

    let mut sections = vec![format!("Search results for \"{query}\":")];

    if !results.stations.is_empty() {
        let entries = results
            .stations
            .iter()
            .enumerate()
            .map(|(index, station)| render_station(index + 1, station, links))
            .collect::<Vec<_>>();
        sections.push(format!(
            "RADIO STATIONS ({}):\n\n{}",
            entries.len(),
            entries.join("\n\n")
        ));
    }

    if !results.podcasts.is_empty() {
        let entries = results
            .podcasts
            .iter()
            .enumerate()
            .map(|(index, podcast)| render_podcast(index + 1, podcast, links))
            .collect::<Vec<_>>();
        sections.push(format!(
            "PODCASTS ({}):\n\n{}",
            entries.len(),
            entries.join("\n\n")
        ));
    }

    sections.push(CALL_TO_ACTION.to_string());
    sections.join("\n\n")
}

pub fn render_station(index: usize, station: &Station, links: &LinkPolicy) -> String {
    let mut lines = vec![format!("{index}. {}", station.name)];

    let location = [&station.city, &station.state, &station.country]
        .into_iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>();
    if !location.is_empty() {
        lines.push(format!("   Location: {}", location.join(", ")));
    }

    lines.push(format!("   Language: {}", or_unknown(&station.language)));
    lines.push(format!("   Genre: {}", or_unknown(&station.genre)));
    if let Some(frequency) = &station.frequency {
        lines.push(format!("   Frequency: {frequency}"));
    }
    lines.push(format!(
        "   Stream: {} @ {} kbps",
        or_unknown(&station.stream_type),
        station.bitrate
    ));
    lines.push(format!("   Plays: {}", format_count(station.play_count)));
    lines.push(format!(
        "   Listen: {}",
        links.resolve(&station.deeplink, station.short_code.as_deref())
    ));

    lines.join("\n")
}

pub fn render_podcast(index: usize, podcast: &Podcast, links: &LinkPolicy) -> String {
    let mut lines = vec![
        format!("{index}. {}", podcast.name),
        format!("   Category: {}", or_unknown(&podcast.category)),
        format!("   Language: {}", or_unknown(&podcast.language)),
    ];

    if let Some(description) = &podcast.description {
        lines.push(format!("   Description: {}", truncate_description(description)));
    }
    lines.push(format!("   Streams: {}", format_count(podcast.total_streams)));
    lines.push(format!(
        "   Listen: {}",
        links.resolve(&podcast.deeplink, podcast.short_code.as_deref())
    ));

    lines.join("\n")
}

fn or_unknown(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() {
        "Unknown"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(name: &str) -> Station {
        Station {
            name: name.to_string(),
            city: "Austin".to_string(),
            state: "".to_string(),
            country: "United States".to_string(),
            language: "English".to_string(),
            genre: "Jazz".to_string(),
            frequency: Some("90.5 FM".to_string()),
            stream_type: "AAC".to_string(),
            bitrate: 64,
            play_count: 1_234_567,
            favorite_count: 10,
            deeplink: format!("https://example.test/radio/{name}"),
            short_code: Some(name.to_lowercase()),
            website: None,
        }
    }

    fn podcast(description: Option<String>) -> Podcast {
        Podcast {
            name: "Night Talk".to_string(),
            category: "Society".to_string(),
            language: "".to_string(),
            description,
            total_streams: 4_200,
            deeplink: "https://example.test/podcast/9".to_string(),
            short_code: None,
        }
    }

    #[test]
    fn renders_station_lines() {
        let text = render_station(1, &station("KUTX"), &LinkPolicy::Deeplink);
        assert_eq!(
            text,
            "1. KUTX\n   Location: Austin, United States\n   Language: English\n   Genre: Jazz\n   Frequency: 90.5 FM\n   Stream: AAC @ 64 kbps\n   Plays: 1,234,567\n   Listen: https://example.test/radio/KUTX"
        );
    }

    #[test]
    fn omits_frequency_when_absent() {
        let mut entry = station("KUTX");
        entry.frequency = None;
        let text = render_station(1, &entry, &LinkPolicy::Deeplink);
        assert!(!text.contains("Frequency"));
    }

    #[test]
    fn station_link_follows_short_url_policy() {
        let policy = LinkPolicy::ShortUrl {
            base: "https://example.test/play".to_string(),
        };
        let text = render_station(3, &station("KUTX"), &policy);
        assert!(text.ends_with("Listen: https://example.test/play/kutx"));
    }

    #[test]
    fn renders_podcast_without_description() {
        let text = render_podcast(2, &podcast(None), &LinkPolicy::Deeplink);
        assert_eq!(
            text,
            "2. Night Talk\n   Category: Society\n   Language: Unknown\n   Streams: 4,200\n   Listen: https://example.test/podcast/9"
        );
    }

    #[test]
    fn truncates_long_podcast_description() {
        let text = render_podcast(1, &podcast(Some("x".repeat(150))), &LinkPolicy::Deeplink);
        assert!(text.contains(&format!("   Description: {}...\n", "x".repeat(100))));
    }

    #[test]
    fn truncates_description_with_trailing_whitespace() {
        let description = format!("{} ", "z".repeat(100));
        let text = render_podcast(1, &podcast(Some(description)), &LinkPolicy::Deeplink);
        assert!(text.contains(&format!("   Description: {}...\n", "z".repeat(100))));
    }

    #[test]
    fn keeps_description_at_threshold() {
        let description = "y".repeat(100);
        let text = render_podcast(1, &podcast(Some(description.clone())), &LinkPolicy::Deeplink);
        assert!(text.contains(&format!("   Description: {description}\n")));
        assert!(!text.contains("..."));
    }

    #[test]
    fn renders_sections_in_order() {
        let results = SearchResults {
            stations: vec![station("First"), station("Second")],
            podcasts: vec![podcast(None)],
        };
        let text = render_search_results("jazz", &results, &LinkPolicy::Deeplink);

        assert!(text.starts_with("Search results for \"jazz\":\n\nRADIO STATIONS (2):\n\n1. First"));
        let first = text.find("1. First").expect("first station");
        let second = text.find("2. Second").expect("second station");
        let podcasts = text.find("PODCASTS (1):").expect("podcast section");
        assert!(first < second && second < podcasts);
        assert!(text.ends_with(CALL_TO_ACTION));
    }

    #[test]
    fn empty_results_render_guidance() {
        let text = render_search_results("zzz", &SearchResults::default(), &LinkPolicy::Deeplink);
        assert_eq!(text, no_results_message("zzz"));
        assert!(text.contains("\"zzz\""));
    }
}
