//! Pure helpers that reconcile independently fetched collections and clean up
//! upstream text before it reaches the screens.
use std::collections::HashMap;

use crate::catalog::{EntryId, Episode, LanguageProfile, QualityProfile, QueueItem};

/// An episode together with the download currently feeding it, if any.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EpisodeRow {
    pub episode: Episode,
    pub download: Option<QueueItem>,
}

/// Completion fraction of a queue entry in `[0, 1]`.
///
/// A zero (or nonsensical) size counts as no progress.
pub fn download_progress(item: &QueueItem) -> f64 {
    if item.size.is_nan() || item.size <= 0.0 {
        return 0.0;
    }
    let progress = (item.size - item.size_left) / item.size;
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// Attaches to each episode the queue entry that references it.
///
/// When several entries reference the same episode the one furthest along
/// wins; on equal progress the first one seen is kept.
pub fn correlate_queue(episodes: Vec<Episode>, queue: &[QueueItem]) -> Vec<EpisodeRow> {
    let mut best: HashMap<EntryId, &QueueItem> = HashMap::new();
    for item in queue {
        let Some(episode_id) = item.episode_id else {
            continue;
        };
        match best.get(&episode_id) {
            Some(current) if download_progress(item) <= download_progress(current) => {}
            _ => {
                best.insert(episode_id, item);
            }
        }
    }

    episodes
        .into_iter()
        .map(|episode| {
            let download = best.get(&episode.id).map(|item| (*item).clone());
            EpisodeRow { episode, download }
        })
        .collect()
}

/// A named table entry referenced by id from a series.
pub trait Profile {
    fn id(&self) -> EntryId;
    fn name(&self) -> &str;
}

impl Profile for QualityProfile {
    fn id(&self) -> EntryId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Profile for LanguageProfile {
    fn id(&self) -> EntryId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Result of looking up a profile by id.
#[derive(Debug, PartialEq, Eq)]
pub enum ProfileRef<'a, P> {
    Known(&'a P),
    Unknown,
}

impl<P> Clone for ProfileRef<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for ProfileRef<'_, P> {}

impl<P: Profile> ProfileRef<'_, P> {
    pub fn name(&self) -> &str {
        match self {
            ProfileRef::Known(profile) => profile.name(),
            ProfileRef::Unknown => "Unknown",
        }
    }
}

pub fn resolve_profile<P: Profile>(table: &[P], id: Option<EntryId>) -> ProfileRef<'_, P> {
    id.and_then(|id| table.iter().find(|p| p.id() == id))
        .map_or(ProfileRef::Unknown, ProfileRef::Known)
}

/// Binary size with IEC units, e.g. `1.5 GiB`.
pub fn format_size(bytes: i64) -> String {
    const UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];
    let mut value = bytes.max(0) as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{value} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Replaces every whitespace code point with a plain space.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect()
}

/// Flattens an overview onto one line and spaces out run-together sentences.
pub fn sanitize_overview(overview: &str) -> String {
    let flat: Vec<char> = overview
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\t'))
        .collect();

    let mut out = String::with_capacity(flat.len() + 8);
    for (i, &c) in flat.iter().enumerate() {
        out.push(c);
        if matches!(c, ',' | '.' | ':') {
            if let Some(next) = flat.get(i + 1) {
                if !next.is_whitespace() {
                    out.push(' ');
                }
            }
        }
    }
    out.trim().to_string()
}

/// Stable ascending sort by a string key.
pub fn sort_by_key<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| key(a).cmp(key(b)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(id: EntryId) -> Episode {
        Episode {
            id,
            episode_number: id as i32,
            ..Episode::default()
        }
    }

    fn queued(id: EntryId, episode_id: EntryId, size: f64, size_left: f64) -> QueueItem {
        QueueItem {
            id,
            episode_id: Some(episode_id),
            size,
            size_left,
            ..QueueItem::default()
        }
    }

    #[test]
    fn picks_download_with_most_progress() {
        let queue = vec![queued(1, 7, 100.0, 50.0), queued(2, 7, 100.0, 90.0)];
        let rows = correlate_queue(vec![episode(7)], &queue);
        assert_eq!(rows[0].download.as_ref().map(|d| d.id), Some(1));

        let queue = vec![queued(1, 7, 100.0, 90.0), queued(2, 7, 100.0, 50.0)];
        let rows = correlate_queue(vec![episode(7)], &queue);
        assert_eq!(rows[0].download.as_ref().map(|d| d.id), Some(2));
    }

    #[test]
    fn zero_size_counts_as_no_progress_and_first_wins_ties() {
        let queue = vec![queued(1, 3, 0.0, 0.0), queued(2, 3, 0.0, 10.0)];
        let rows = correlate_queue(vec![episode(3)], &queue);
        assert_eq!(rows[0].download.as_ref().map(|d| d.id), Some(1));
        assert_eq!(download_progress(&queue[0]), 0.0);
    }

    #[test]
    fn zero_size_entry_loses_to_any_real_progress() {
        let queue = vec![queued(1, 3, 0.0, 0.0), queued(2, 3, 10.0, 9.0)];
        let rows = correlate_queue(vec![episode(3)], &queue);
        assert_eq!(rows[0].download.as_ref().map(|d| d.id), Some(2));
    }

    #[test]
    fn unmatched_episodes_stay_uncorrelated() {
        let queue = vec![
            queued(1, 99, 10.0, 5.0),
            QueueItem {
                id: 2,
                episode_id: None,
                ..QueueItem::default()
            },
        ];
        let rows = correlate_queue(vec![episode(1), episode(2)], &queue);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.download.is_none()));
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(download_progress(&queued(1, 1, 10.0, -5.0)), 1.0);
        assert_eq!(download_progress(&queued(1, 1, 10.0, 20.0)), 0.0);
        assert_eq!(download_progress(&queued(1, 1, 200.0, 50.0)), 0.75);
    }

    #[test]
    fn unresolved_profiles_are_unknown() {
        let empty: &[QualityProfile] = &[];
        assert_eq!(resolve_profile(empty, Some(4)), ProfileRef::Unknown);
        assert_eq!(resolve_profile(empty, None).name(), "Unknown");

        let table = vec![QualityProfile {
            id: 4,
            name: "HD-1080p".into(),
        }];
        assert_eq!(resolve_profile(&table, Some(4)).name(), "HD-1080p");
        assert_eq!(resolve_profile(&table, Some(5)), ProfileRef::Unknown);
        assert_eq!(resolve_profile(&table, None), ProfileRef::Unknown);
    }

    #[test]
    fn language_profiles_resolve_the_same_way() {
        let table = vec![
            LanguageProfile {
                id: 1,
                name: "English".into(),
            },
            LanguageProfile {
                id: 2,
                name: "Deutsch".into(),
            },
        ];
        assert_eq!(resolve_profile(&table, Some(2)).name(), "Deutsch");
        assert_eq!(resolve_profile(&table, Some(3)).name(), "Unknown");
        assert_eq!(resolve_profile(&table, None).name(), "Unknown");
    }

    #[test]
    fn sizes_use_binary_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KiB");
        assert_eq!(format_size(1_073_741_824), "1.0 GiB");
        assert_eq!(format_size(-5), "0 B");
    }

    #[test]
    fn titles_use_plain_spaces() {
        assert_eq!(sanitize_title("The\u{a0}Show\tName\n"), "The Show Name ");
    }

    #[test]
    fn overview_is_flattened_and_spaced() {
        assert_eq!(
            sanitize_overview("  First line.\nSecond,third:fourth\r\n"),
            "First line. Second, third: fourth"
        );
        assert_eq!(sanitize_overview("Ends with a dot."), "Ends with a dot.");
        assert_eq!(sanitize_overview("a,,b"), "a, , b");
        assert_eq!(sanitize_overview("3.5 stars"), "3. 5 stars");
    }

    #[test]
    fn overview_sanitizing_is_idempotent() {
        let samples = [
            "",
            " ",
            "\n\t\r",
            "plain",
            "a.b.c",
            "a,,b",
            "trailing.  ",
            "x:\ty",
            "mixed.\u{a0}spaces,\u{2003}here",
            "..::,,",
            "line one.\nline two.\n\nthree:four",
            "  . leading dot",
        ];
        for s in samples {
            let once = sanitize_overview(s);
            assert_eq!(sanitize_overview(&once), once, "input {s:?}");
        }
    }

    #[test]
    fn sorts_by_key_stably() {
        let mut titles = vec!["Zeta", "Alpha"];
        sort_by_key(&mut titles, |t| *t);
        assert_eq!(titles, vec!["Alpha", "Zeta"]);

        let mut pairs = vec![("b", 1), ("a", 2), ("b", 3), ("a", 4)];
        sort_by_key(&mut pairs, |p| p.0);
        assert_eq!(pairs, vec![("a", 2), ("a", 4), ("b", 1), ("b", 3)]);
    }
}
