//! Reply text for each intent.

use super::intent::Intent;
use crate::facade::Source;
use crate::provider::music::UNKNOWN_FIELD;
use crate::provider::{GeneratedText, ProfileRecord, TextKind, TrackRecord};

/// Longest generated text shown in a reply, in characters.
pub const MAX_GENERATED_CHARS: usize = 500;

/// Top tracks shown in an artist reply.
const PROFILE_TRACKS: usize = 5;

/// Albums shown in an artist reply.
const PROFILE_ALBUMS: usize = 3;

/// Fixed answer for unrecognized input.
pub const OVERVIEW: &str = "Welcome to the music chat! I can help you with:
• \"What's trending?\" - get current popular songs
• \"Search for [song name]\" - find specific songs
• \"Lyrics for [song] by [artist]\" - AI-generated original lyrics
• \"Tell me about [artist]\" - get artist information
• \"Analyze [song] by [artist]\" - a short musical analysis
What would you like to explore today?";

/// Fixed answer when resolution fails unexpectedly.
pub const APOLOGY: &str = "Sorry, something went wrong while answering that, please try again.";

/// Question asked when a required entity is missing.
pub fn clarification(intent: Intent) -> &'static str {
    match intent {
        Intent::ArtistInfo => {
            "Please specify which artist you'd like to know about! Example: 'Tell me about Taylor Swift'"
        }
        Intent::Lyrics => {
            "Please specify which song you'd like lyrics for! Example: 'Lyrics for My Song by Artist Name'"
        }
        Intent::Analysis => {
            "Please specify which song to analyze! Example: 'Analyze Flowers by Miley Cyrus'"
        }
        Intent::Search => "Please specify what song you're looking for! Example: 'Search for Heat Waves'",
        Intent::Trending | Intent::SmallTalk | Intent::Unknown => OVERVIEW,
    }
}

fn or_unknown(value: &str) -> &str {
    if value.trim().is_empty() {
        UNKNOWN_FIELD
    } else {
        value
    }
}

fn push_track(out: &mut String, position: u32, track: &TrackRecord) {
    out.push_str(&format!(
        "{position}. {} by {}\n",
        or_unknown(&track.title),
        or_unknown(&track.artist)
    ));
    out.push_str(&format!("   Album: {}\n", or_unknown(&track.album)));
    out.push_str(&format!("   Duration: {}\n", track.duration_label()));
    out.push_str(&format!("   Popularity: {}/100\n", track.popularity));
    out.push('\n');
}

/// Numbered trending list.
pub fn trending(tracks: &[TrackRecord], source: Source) -> String {
    let mut out = format!(
        "Here are the top {} trending songs right now:\n\n",
        tracks.len()
    );
    for (index, track) in tracks.iter().enumerate() {
        push_track(&mut out, track.rank.unwrap_or(index as u32 + 1), track);
    }
    if source == Source::Synthetic {
        out.push_str("(Live chart data is unavailable, so these are curated picks.)\n");
    }
    out.push_str("Would you like more details about any of these songs, or their lyrics?");
    out
}

/// Numbered search results.
pub fn search_results(query: &str, tracks: &[TrackRecord]) -> String {
    if tracks.is_empty() {
        return format!(
            "I couldn't find any songs matching '{query}'. Please try a different search term."
        );
    }

    let mut out = format!("Found {} songs matching '{query}':\n\n", tracks.len());
    for (index, track) in tracks.iter().enumerate() {
        push_track(&mut out, index as u32 + 1, track);
    }
    out.push_str("Would you like more details about any of these songs?");
    out
}

/// Artist summary with top tracks and recent albums.
pub fn artist_profile(profile: &ProfileRecord) -> String {
    let mut out = format!("{}\n\n", or_unknown(&profile.name));
    out.push_str(&format!("Followers: {}\n", group_thousands(profile.followers)));
    out.push_str(&format!("Popularity: {}/100\n", profile.popularity));
    let genres = if profile.genres.is_empty() {
        UNKNOWN_FIELD.to_string()
    } else {
        profile.genres.join(", ")
    };
    out.push_str(&format!("Genres: {genres}\n"));

    if !profile.top_tracks.is_empty() {
        out.push_str("\nTop Tracks:\n");
        for track in profile.top_tracks.iter().take(PROFILE_TRACKS) {
            out.push_str(&format!(
                "   • {} (Popularity: {}/100)\n",
                or_unknown(&track.title),
                track.popularity
            ));
        }
    }

    if !profile.albums.is_empty() {
        out.push_str("\nRecent Albums:\n");
        for album in profile.albums.iter().take(PROFILE_ALBUMS) {
            out.push_str(&format!(
                "   • {} ({})\n",
                or_unknown(&album.name),
                or_unknown(&album.release_date)
            ));
        }
    }

    out.push_str(&format!("\nListen: {}", or_unknown(&profile.url)));
    out
}

/// Truncates to [`MAX_GENERATED_CHARS`] characters, marking the cut.
pub fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_GENERATED_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX_GENERATED_CHARS).collect();
    format!("{cut}...")
}

/// Generated lyrics or analysis with attribution.
pub fn generated(text: &GeneratedText) -> String {
    let mut out = match text.kind {
        TextKind::Lyrics => format!(
            "Lyrics for '{}' by {}:\n\n{}",
            text.topic,
            text.artist,
            truncate(&text.text)
        ),
        TextKind::Analysis => format!(
            "Analysis of '{}' by {}:\n\n{}",
            text.topic,
            text.artist,
            truncate(&text.text)
        ),
        TextKind::Chat => return text.text.clone(),
    };

    out.push_str(&format!("\n\nGenerated by: {}", text.generated_by));
    if let Some(note) = &text.note {
        out.push_str(&format!("\n{note}"));
    }
    out
}

/// Formats an integer with comma thousands separators.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}
