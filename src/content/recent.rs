//! Recent writings selection
//!
//! Projects a writing collection onto [`PostRecord`]s, orders them newest
//! first and keeps the head of the list. The input order is irrelevant and
//! the input is never modified.

use chrono::{DateTime, Utc};

use super::{ContentError, PostRecord};

/// Number of writings shown on the homepage
pub const RECENT_WRITINGS_LIMIT: usize = 3;

/// Select the most recent writings for the homepage
///
/// Equivalent to [`select_recent`] with [`RECENT_WRITINGS_LIMIT`].
pub fn select<'a, T>(
    posts: impl IntoIterator<Item = &'a T>,
) -> Result<Vec<PostRecord>, ContentError>
where
    T: 'a,
    PostRecord: From<&'a T>,
{
    select_recent(posts, RECENT_WRITINGS_LIMIT)
}

/// Select at most `limit` records ordered by `publishedAt`, newest first
///
/// Records with the same instant keep their input order. Every timestamp is
/// parsed before anything is ordered, so a single malformed `publishedAt`
/// fails the whole selection with [`ContentError::MalformedTimestamp`].
pub fn select_recent<'a, T>(
    posts: impl IntoIterator<Item = &'a T>,
    limit: usize,
) -> Result<Vec<PostRecord>, ContentError>
where
    T: 'a,
    PostRecord: From<&'a T>,
{
    let mut dated: Vec<(DateTime<Utc>, PostRecord)> = posts
        .into_iter()
        .map(|post| {
            let record = PostRecord::from(post);
            let published = record.published_instant()?;
            Ok((published, record))
        })
        .collect::<Result<_, ContentError>>()?;

    // sort_by is stable
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    dated.truncate(limit);

    Ok(dated.into_iter().map(|(_, record)| record).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Writing;

    fn record(slug: &str, published_at: &str) -> PostRecord {
        PostRecord {
            slug: slug.to_string(),
            title: format!("Title {}", slug),
            summary: format!("Summary {}", slug),
            published_at: published_at.to_string(),
        }
    }

    fn slugs(records: &[PostRecord]) -> Vec<&str> {
        records.iter().map(|r| r.slug.as_str()).collect()
    }

    fn sample() -> Vec<PostRecord> {
        vec![
            record("a", "2023-01-01"),
            record("b", "2024-06-01"),
            record("c", "2022-05-05"),
            record("d", "2024-01-01"),
        ]
    }

    #[test]
    fn test_top_three_newest_first() {
        let selected = select(&sample()).unwrap();
        assert_eq!(slugs(&selected), vec!["b", "d", "a"]);
    }

    #[test]
    fn test_single_record() {
        let posts = vec![record("only", "2021-03-04")];
        let selected = select(&posts).unwrap();
        assert_eq!(selected, posts);
    }

    #[test]
    fn test_empty_collection() {
        let posts: Vec<PostRecord> = Vec::new();
        assert!(select(&posts).unwrap().is_empty());
    }

    #[test]
    fn test_length_is_min_of_three_and_input() {
        let dates = [
            "2020-01-01",
            "2021-07-14",
            "2019-12-31",
            "2024-02-29",
            "2022-10-10",
            "2023-03-03",
            "2018-08-08",
        ];
        for n in 0..=dates.len() {
            let posts: Vec<_> = dates[..n]
                .iter()
                .enumerate()
                .map(|(i, d)| record(&i.to_string(), d))
                .collect();
            let selected = select(&posts).unwrap();
            assert_eq!(selected.len(), n.min(3), "input of {} records", n);
        }
    }

    #[test]
    fn test_output_is_descending() {
        let posts = vec![
            record("a", "2022-01-01T08:00:00Z"),
            record("b", "2022-01-01"),
            record("c", "2022-01-01T23:59:59+02:00"),
            record("d", "2021-12-31 23:00"),
            record("e", "2022/01/02"),
        ];
        let selected = select_recent(&posts, posts.len()).unwrap();
        for pair in selected.windows(2) {
            let newer = pair[0].published_instant().unwrap();
            let older = pair[1].published_instant().unwrap();
            assert!(newer >= older, "{} before {}", pair[0].slug, pair[1].slug);
        }
        assert_eq!(slugs(&selected), vec!["e", "c", "a", "b", "d"]);
    }

    #[test]
    fn test_fields_are_not_altered() {
        let posts = sample();
        let selected = select(&posts).unwrap();
        for chosen in &selected {
            assert!(posts.contains(chosen));
        }
    }

    #[test]
    fn test_ties_keep_input_order() {
        let posts = vec![
            record("first", "2024-05-05"),
            record("older", "2020-01-01"),
            record("second", "2024-05-05"),
            record("third", "2024-05-05T00:00:00Z"),
        ];
        let selected = select(&posts).unwrap();
        assert_eq!(slugs(&selected), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_is_idempotent() {
        let posts = sample();
        let first = select(&posts).unwrap();
        let second = select(&posts).unwrap();
        assert_eq!(first, second);
        assert_eq!(posts, sample());
    }

    #[test]
    fn test_malformed_timestamp_fails_fast() {
        let posts = vec![
            record("good", "2024-01-01"),
            record("bad", "not a date"),
            record("also-good", "2023-01-01"),
        ];
        let err = select(&posts).unwrap_err();
        assert_eq!(
            err,
            ContentError::MalformedTimestamp {
                slug: "bad".to_string(),
                value: "not a date".to_string(),
            }
        );
    }

    #[test]
    fn test_malformed_timestamp_outside_window_still_fails() {
        let posts = vec![
            record("a", "2024-01-01"),
            record("b", "2024-01-02"),
            record("c", "2024-01-03"),
            record("d", "2024-13-40"),
        ];
        assert!(select(&posts).is_err());
    }

    #[test]
    fn test_selects_from_full_writings() {
        let mut newest = Writing::new(
            "newest".to_string(),
            "Newest".to_string(),
            "2025-02-01".to_string(),
            "writing/newest.md".to_string(),
        );
        newest.raw = "body".to_string();
        let oldest = Writing::new(
            "oldest".to_string(),
            "Oldest".to_string(),
            "2019-02-01".to_string(),
            "writing/oldest.md".to_string(),
        );

        let writings = vec![oldest, newest];
        let selected = select(&writings).unwrap();
        assert_eq!(slugs(&selected), vec!["newest", "oldest"]);
        assert_eq!(selected[0].title, "Newest");
    }

    #[test]
    fn test_custom_limit() {
        let posts = sample();
        assert_eq!(slugs(&select_recent(&posts, 1).unwrap()), vec!["b"]);
        assert!(select_recent(&posts, 0).unwrap().is_empty());
        assert_eq!(select_recent(&posts, 10).unwrap().len(), 4);
    }
}
