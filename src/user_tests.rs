// User session tests: loading matches from a dataset, regenerating the queue
// and handing songs to a playback sink

use crate::dataset::ScanPolicy;
use crate::playlist::{Preferences, SortField};
use crate::user::{MockPlaybackSink, User};

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;
    use mockall::predicate::function;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::io::Cursor;

    const DATASET: &str = "\
\ttrack_id\tartists\talbum_name\ttrack_name\tpopularity\tduration_ms\texplicit\tdanceability\tenergy\tkey\tloudness\tmode\tspeechiness\tacousticness\tinstrumentalness\tliveness\tvalence\ttempo\ttime_signature\ttrack_genre
0\tt0\tArtistA\tAlbumX\tTrackY\t85\t200000\tFALSE\t0.5\t0.6\t4\t-5.0\t0\t0.06\t0.1\t0.0\t0.7\t0.5\t120.0\t4\tPop
1\tt1\tArtistB\tAlbumZ\tSunrise\t60\t180000\tTRUE\t0.5\t0.6\t4\t-5.0\t0\t0.06\t0.1\t0.0\t0.7\t0.5\t98.0\t4\tPop
2\tt2\tArtistC\tHeavy\tThunder\t91\t320000\tTRUE\t0.5\t0.6\t4\t-5.0\t0\t0.06\t0.1\t0.0\t0.7\t0.5\t150.0\t4\tRock
this line is broken
3\tt3\tArtistD\tCover\tTrackY\t88\t210000\tFALSE\t0.5\t0.6\t4\t-5.0\t0\t0.06\t0.1\t0.0\t0.7\t0.5\t121.0\t4\tPop
4\tt4\tArtistE\tLate\tMoonlight\t99\t240000\tFALSE\t0.5\t0.6\t4\t-5.0\t0\t0.06\t0.1\t0.0\t0.7\t0.5\t90.0\t4\tPop
";

    fn pop_user(min_popularity: &str) -> User {
        let popularity = format!("popularity={min_popularity}");
        let preferences = Preferences::from_assignments(["genre=Pop", popularity.as_str()]).unwrap();
        User::new("tester", preferences)
    }

    #[test]
    fn test_load_matches_filters_and_deduplicates() {
        let mut user = pop_user("80");

        let report = user
            .load_matches(Cursor::new(DATASET), ScanPolicy::SkipMalformed)
            .unwrap();

        assert_eq!(report.scanned, 5);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.matched, 3);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.added, 2);

        let names: Vec<(&str, &str)> = user
            .playlist
            .iter()
            .map(|s| (s.artists.as_str(), s.track_name.as_str()))
            .collect();
        assert_eq!(names, vec![("ArtistA", "TrackY"), ("ArtistE", "Moonlight")]);
    }

    #[test]
    fn test_load_matches_without_preferences_keeps_everything_unique() {
        let mut user = User::new("open", Preferences::default());
        let report = user
            .load_matches(Cursor::new(DATASET), ScanPolicy::SkipMalformed)
            .unwrap();

        assert_eq!(report.matched, 5);
        assert_eq!(user.playlist.len(), 4);
    }

    #[test]
    fn test_strict_load_keeps_songs_before_failure() {
        let mut user = User::new("strict", Preferences::default());
        let result = user.load_matches(Cursor::new(DATASET), ScanPolicy::Strict);

        assert!(result.is_err());
        assert_eq!(user.playlist.len(), 3);
    }

    #[test]
    fn test_partial_load_still_builds_a_queue() {
        let mut user = User::new("partial", Preferences::default());
        let report = user.load_matches_keeping_partial(Cursor::new(DATASET), ScanPolicy::Strict);

        assert_eq!(report.scanned, 3);
        assert_eq!(report.added, 3);
        assert_eq!(user.playlist.len(), 3);

        let mut rng = StdRng::seed_from_u64(1);
        let queue = user.refresh_queue(Some(SortField::Popularity), 10, false, &mut rng);
        let popularity: Vec<u8> = queue.iter().map(|s| s.popularity).collect();
        assert_eq!(popularity, vec![60, 85, 91]);
    }

    #[test]
    fn test_load_matches_from_missing_path() {
        let mut user = pop_user("0");
        assert!(
            user.load_matches_from_path("/nonexistent/dataset.tsv", ScanPolicy::SkipMalformed)
                .is_err()
        );
        assert!(user.playlist.is_empty());
    }

    #[test]
    fn test_load_matches_from_path() {
        let path = std::env::temp_dir().join(format!("dataset-{}.tsv", std::process::id()));
        std::fs::write(&path, DATASET).unwrap();

        let mut user = pop_user("50");
        let report = user.load_matches_from_path(&path, ScanPolicy::SkipMalformed);
        std::fs::remove_file(&path).ok();

        assert_eq!(report.unwrap().added, 3);
    }

    #[test]
    fn test_load_matches_from_path_keeps_partial_read() {
        let path = std::env::temp_dir().join(format!("dataset-strict-{}.tsv", std::process::id()));
        std::fs::write(&path, DATASET).unwrap();

        let mut user = pop_user("0");
        let report = user.load_matches_from_path(&path, ScanPolicy::Strict);
        std::fs::remove_file(&path).ok();

        let report = report.unwrap();
        assert_eq!(report.scanned, 3);
        assert_eq!(report.added, 2);
        assert_eq!(user.playlist.len(), 2);
    }

    #[test]
    fn test_refresh_queue_replaces_previous_queue() {
        let mut user = pop_user("0");
        user.load_matches(Cursor::new(DATASET), ScanPolicy::SkipMalformed)
            .unwrap();
        let playlist_len = user.playlist.len();
        let mut rng = StdRng::seed_from_u64(11);

        let queue = user.refresh_queue(Some(SortField::Popularity), 2, true, &mut rng);
        let top: Vec<u8> = queue.iter().map(|s| s.popularity).collect();
        assert_eq!(top, vec![99, 85]);

        let queue = user.refresh_queue(None, 10, false, &mut rng);
        assert_eq!(queue.len(), playlist_len);
    }

    #[test]
    fn test_play_next_sends_songs_in_queue_order() {
        let mut user = pop_user("0");
        user.load_matches(Cursor::new(DATASET), ScanPolicy::SkipMalformed)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        user.refresh_queue(Some(SortField::Popularity), 2, true, &mut rng);

        let mut sink = MockPlaybackSink::new();
        let mut seq = Sequence::new();
        sink.expect_play()
            .with(function(|s: &crate::models::Song| s.track_name == "Moonlight"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        sink.expect_play()
            .with(function(|s: &crate::models::Song| s.track_name == "TrackY"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        assert_eq!(user.play_next(&mut sink).unwrap().unwrap().track_name, "Moonlight");
        assert_eq!(user.play_next(&mut sink).unwrap().unwrap().track_name, "TrackY");
        // Empty queue does not reach the sink
        assert!(user.play_next(&mut sink).unwrap().is_none());
    }

    #[test]
    fn test_play_next_keeps_song_when_sink_fails() {
        let mut user = pop_user("0");
        user.load_matches(Cursor::new(DATASET), ScanPolicy::SkipMalformed)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        user.refresh_queue(Some(SortField::Popularity), 3, true, &mut rng);

        let mut sink = MockPlaybackSink::new();
        sink.expect_play()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("device unavailable")));

        assert!(user.play_next(&mut sink).is_err());
        assert_eq!(user.queue.len(), 3);
        assert_eq!(user.queue.now_playing().unwrap().track_name, "Moonlight");
    }
}
