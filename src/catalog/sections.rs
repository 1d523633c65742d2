use std::cmp::Reverse;

use crate::api::{Video, VideosByGenre};

pub const NEWEST_TITLE: &str = "New on Videoflix";
pub const NEWEST_SLUG: &str = "new";
pub const NEWEST_LIMIT: usize = 10;

/// One horizontal row on the catalog page.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    /// `None` for the synthetic "newest" row.
    pub genre_id: Option<u64>,
    pub genre_slug: String,
    pub items: Vec<Video>,
}

/// Builds the catalog rows: the newest videos across all genres first, then
/// one row per genre in key order.
pub fn sections(by_genre: &VideosByGenre) -> Vec<Section> {
    let genre_rows: Vec<Section> = by_genre
        .iter()
        .map(|(name, group)| Section {
            title: name.clone(),
            genre_id: Some(group.genre_id),
            genre_slug: group.genre_slug.clone(),
            items: group.videos.clone(),
        })
        .collect();

    let mut newest: Vec<Video> = genre_rows
        .iter()
        .flat_map(|row| row.items.iter().cloned())
        .collect();
    if newest.is_empty() {
        return genre_rows;
    }
    // unparseable timestamps sort last
    newest.sort_by_key(|v| Reverse(v.created_at().map(|t| t.unix_timestamp_nanos())));
    newest.truncate(NEWEST_LIMIT);

    let mut rows = Vec::with_capacity(genre_rows.len() + 1);
    rows.push(Section {
        title: NEWEST_TITLE.to_string(),
        genre_id: None,
        genre_slug: NEWEST_SLUG.to_string(),
        items: newest,
    });
    rows.extend(genre_rows);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GenreGroup;
    use crate::api::models::fixtures::video;
    use crate::common::VideoId;

    fn group(id: u64, slug: &str, videos: Vec<Video>) -> GenreGroup {
        GenreGroup {
            genre_id: id,
            genre_slug: slug.to_string(),
            videos,
        }
    }

    #[test]
    fn test_empty_catalog_has_no_rows() {
        assert!(sections(&VideosByGenre::new()).is_empty());

        let mut by_genre = VideosByGenre::new();
        by_genre.insert("Drama".into(), group(1, "drama", vec![]));
        let rows = sections(&by_genre);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Drama");
    }

    #[test]
    fn test_newest_row_leads() {
        let mut by_genre = VideosByGenre::new();
        by_genre.insert(
            "Drama".into(),
            group(
                1,
                "drama",
                vec![
                    video(1, "Drama", "2025-01-01T10:00:00Z"),
                    video(2, "Drama", "2025-03-01T10:00:00Z"),
                ],
            ),
        );
        by_genre.insert(
            "Action".into(),
            group(2, "action", vec![video(3, "Action", "2025-02-01T10:00:00+01:00")]),
        );

        let rows = sections(&by_genre);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].title, NEWEST_TITLE);
        assert_eq!(rows[0].genre_id, None);
        assert_eq!(rows[0].genre_slug, "new");
        let ids: Vec<VideoId> = rows[0].items.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![VideoId(2), VideoId(3), VideoId(1)]);
        assert_eq!(rows[1].title, "Action");
        assert_eq!(rows[2].genre_id, Some(1));
    }

    #[test]
    fn test_newest_row_is_capped() {
        let videos = (1..=14)
            .map(|i| video(i, "Drama", &format!("2025-01-{:02}T00:00:00Z", i)))
            .collect();
        let mut by_genre = VideosByGenre::new();
        by_genre.insert("Drama".into(), group(1, "drama", videos));
        by_genre.insert(
            "Noise".into(),
            group(2, "noise", vec![video(99, "Noise", "not a date")]),
        );

        let newest = &sections(&by_genre)[0];
        assert_eq!(newest.items.len(), NEWEST_LIMIT);
        assert_eq!(newest.items[0].id, VideoId(14));
        assert_eq!(newest.items[9].id, VideoId(5));
    }
}
