//! Player integration tests
//!
//! Drive the public `Player` handle against a recording device.

mod common;

use common::{build_playlist, create_test_track, path_of, MockDevice};
use crossbeam_channel::unbounded;
use encore_playback::{
    PlaybackError, Player, PlayerConfig, PlayerEvent, Playlist, Track, TrackLoader,
};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

const EVENT_TIMEOUT: Duration = Duration::from_secs(2);

fn player_with(numbers: &[u64]) -> (Player, MockDevice) {
    let device = MockDevice::new();
    let player = Player::new(device.clone(), build_playlist(numbers));
    (player, device)
}

// ===== Traversal =====

#[test]
fn test_next() {
    let (player, device) = player_with(&[0, 1, 2]);

    assert_eq!(device.path(), None);
    assert!(device.is_paused());

    player.next();
    assert_eq!(device.path(), Some(path_of(0)));
    player.next();
    assert_eq!(device.path(), Some(path_of(1)));
    player.next();
    assert_eq!(device.path(), Some(path_of(2)));

    // End of list: stays on the last track
    player.next();
    assert_eq!(device.path(), Some(path_of(2)));
    assert_eq!(player.selection_index(), Some(2));

    player.set_repeat_mode(true);
    player.next();
    assert_eq!(device.path(), Some(path_of(0)));
    assert_eq!(player.selection_index(), Some(0));
}

#[test]
fn test_previous() {
    let (player, device) = player_with(&[0, 1, 2]);

    assert!(player.select(0));
    assert_eq!(device.path(), Some(path_of(0)));

    player.previous();
    assert_eq!(device.path(), Some(path_of(0)));

    player.set_repeat_mode(true);
    player.previous();
    assert_eq!(device.path(), Some(path_of(2)));
    player.previous();
    assert_eq!(device.path(), Some(path_of(1)));
}

#[test]
fn test_repeat_cycles_through_whole_list() {
    let (player, _device) = player_with(&[0, 1, 2]);
    player.set_repeat_mode(true);
    player.select(2);

    let mut seen = Vec::new();
    for _ in 0..3 {
        player.next();
        seen.push(player.selection_index());
    }

    assert_eq!(seen, vec![Some(0), Some(1), Some(2)]);
}

#[test]
fn test_next_skips_unplayable_tracks() {
    let device = MockDevice::refusing(&[1, 2]);
    let player = Player::new(device.clone(), build_playlist(&[0, 1, 2, 3]));

    player.next();
    assert_eq!(player.selection_index(), Some(0));
    player.next();
    assert_eq!(player.selection_index(), Some(3));
    assert_eq!(device.path(), Some(path_of(3)));

    player.previous();
    assert_eq!(player.selection_index(), Some(0));
}

#[test]
fn test_fully_unplayable_list_with_repeat_terminates() {
    let device = MockDevice::refusing(&[0, 1, 2]);
    let player = Player::with_config(
        device.clone(),
        build_playlist(&[0, 1, 2]),
        PlayerConfig {
            repeat: true,
            random: false,
        },
    );

    player.next();
    assert_eq!(player.selection_index(), None);
    // One pass plus exactly one wrap-around pass
    assert_eq!(device.state().open_calls, 6);

    player.play();
    assert!(!player.is_playing());
}

#[test]
fn test_next_keeps_playing_state() {
    let (player, device) = player_with(&[0, 1, 2]);

    player.play();
    assert!(player.is_playing());
    assert!(!device.is_paused());

    player.next();
    assert!(player.is_playing());
    assert!(!device.is_paused());
    assert_eq!(device.path(), Some(path_of(1)));

    // Falling off the end with repeat off stops playback
    player.next();
    player.next();
    assert!(!player.is_playing());
    assert!(device.is_paused());
}

// ===== Play / Pause / Stop =====

#[test]
fn test_play_selects_first_track() {
    let (player, device) = player_with(&[0, 1, 2]);

    player.play();
    assert!(player.is_playing());
    assert_eq!(player.selection_index(), Some(0));
    assert_eq!(device.path(), Some(path_of(0)));
    assert_eq!(player.current_track(), Some(create_test_track(0)));
}

#[test]
fn test_play_on_empty_playlist() {
    let device = MockDevice::new();
    let player = Player::new(device.clone(), Playlist::new());

    player.play();
    assert!(!player.is_playing());
    assert_eq!(player.selection_index(), None);
    assert!(device.is_paused());
}

#[test]
fn test_pause_keeps_position_and_stop_rewinds() {
    let (player, device) = player_with(&[0, 1]);

    player.play();
    assert_eq!(player.elapsed(), Duration::from_secs(1));

    player.pause();
    assert!(!player.is_playing());
    assert!(device.is_paused());
    assert_eq!(player.elapsed(), Duration::from_secs(1));

    player.stop();
    assert_eq!(player.elapsed(), Duration::ZERO);
    assert_eq!(player.selection_index(), Some(0));
}

#[test]
fn test_stop_rewinds_even_when_paused() {
    let (player, device) = player_with(&[0]);

    player.select(0);
    device.state().elapsed = Duration::from_secs(7);
    player.stop();
    assert_eq!(player.elapsed(), Duration::ZERO);
}

// ===== Select =====

#[test]
fn test_select_clamps_to_last_track() {
    let (player, device) = player_with(&[0, 1, 2]);

    assert!(player.select(10));
    assert_eq!(player.selection_index(), Some(2));
    assert_eq!(device.path(), Some(path_of(2)));
}

#[test]
fn test_select_on_empty_playlist() {
    let device = MockDevice::new();
    let player = Player::new(device, Playlist::new());

    assert!(!player.select(0));
    assert_eq!(player.selection_index(), None);
}

#[test]
fn test_select_resumes_playback() {
    let (player, device) = player_with(&[0, 1, 2]);

    player.play();
    assert!(player.select(2));
    assert!(player.is_playing());
    assert!(!device.is_paused());
    assert_eq!(device.path(), Some(path_of(2)));
}

#[test]
fn test_select_unplayable_track_keeps_selection() {
    let device = MockDevice::refusing(&[1]);
    let player = Player::new(device.clone(), build_playlist(&[0, 1, 2]));

    assert!(player.select(0));
    assert!(!player.select(1));
    assert_eq!(player.selection_index(), Some(0));
}

// ===== Device Notifications =====

#[test]
fn test_on_track_finished() {
    let (player, device) = player_with(&[0, 1, 2, 3]);
    let (tx, rx) = unbounded();
    player.set_on_selection_changed(move |event| {
        tx.send(event.clone()).ok();
    });

    player.play();
    assert_eq!(device.path(), Some(path_of(0)));
    assert!(!device.is_paused());

    device.finish();
    let event = rx.recv_timeout(EVENT_TIMEOUT).unwrap();
    assert_eq!(
        event,
        PlayerEvent::SelectionChanged {
            index: Some(1),
            track: Some(create_test_track(1)),
        }
    );
    assert_eq!(device.path(), Some(path_of(1)));
    assert!(!device.is_paused());
    assert!(player.is_playing());
}

#[test]
fn test_last_track_finished_reports_end() {
    let (player, device) = player_with(&[0, 1]);
    let (tx, rx) = unbounded();
    player.set_on_selection_changed(move |event| {
        tx.send(event.clone()).ok();
    });

    player.select(1);
    player.play();
    device.finish();

    let event = rx.recv_timeout(EVENT_TIMEOUT).unwrap();
    assert_eq!(event, PlayerEvent::PlaylistEnded { index: Some(1) });
    assert!(!player.is_playing());
}

#[test]
fn test_finished_while_paused_reports_selection_change() {
    let (player, device) = player_with(&[0, 1, 2]);
    let (tx, rx) = unbounded();
    player.set_on_selection_changed(move |event| {
        tx.send(event.clone()).ok();
    });

    player.play();
    player.pause();
    device.finish();

    let event = rx.recv_timeout(EVENT_TIMEOUT).unwrap();
    assert_eq!(
        event,
        PlayerEvent::SelectionChanged {
            index: Some(1),
            track: Some(create_test_track(1)),
        }
    );
    assert!(!player.is_playing());
    assert_eq!(player.selection_index(), Some(1));
}

#[test]
fn test_cleared_observer_is_not_called() {
    let (player, device) = player_with(&[0, 1, 2]);
    let (tx, rx) = unbounded::<PlayerEvent>();
    player.set_on_selection_changed(move |event| {
        tx.send(event.clone()).ok();
    });
    player.clear_on_selection_changed();

    player.play();
    device.finish();

    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    // The advance itself still happened on the event thread
    assert_eq!(player.selection_index(), Some(1));
}

#[test]
fn test_manual_advance_does_not_notify() {
    let (player, _device) = player_with(&[0, 1, 2]);
    let (tx, rx) = unbounded::<PlayerEvent>();
    player.set_on_selection_changed(move |event| {
        tx.send(event.clone()).ok();
    });

    player.play();
    player.next();
    player.select(0);

    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
}

#[test]
fn test_observer_may_call_back_into_player() {
    let device = MockDevice::new();
    let player = std::sync::Arc::new(Player::new(device.clone(), build_playlist(&[0, 1, 2])));
    let (tx, rx) = unbounded();

    let handle = std::sync::Arc::downgrade(&player);
    player.set_on_selection_changed(move |_event| {
        if let Some(player) = handle.upgrade() {
            tx.send(player.status()).ok();
        }
    });

    player.play();
    device.finish();

    let status = rx.recv_timeout(EVENT_TIMEOUT).unwrap();
    assert_eq!(status.selection, Some(1));
    assert!(status.playing);
}

// ===== Random Mode =====

#[test]
fn test_random_previous_retraces_next() {
    let (player, device) = player_with(&[0, 1, 2, 3]);

    player.set_random_mode(true);
    player.select(0);

    let mut paths = Vec::new();
    for _ in 0..4 {
        paths.push(device.path());
        player.next();
    }
    for i in (0..4).rev() {
        assert_eq!(paths[i], device.path());
        player.previous();
    }
    assert_eq!(paths[0], device.path());

    let unique: HashSet<_> = paths.into_iter().collect();
    assert_eq!(unique.len(), 4);
}

#[test]
fn test_enabling_random_keeps_selected_track() {
    let (player, device) = player_with(&[0, 1, 2]);

    player.select(1);
    player.set_random_mode(true);

    assert_eq!(player.selection_index(), Some(1));
    assert_eq!(player.current_track(), Some(create_test_track(1)));
    assert_eq!(player.shuffled_tracks()[0].track, create_test_track(1));
    assert_eq!(device.path(), Some(path_of(1)));
}

#[test]
fn test_random_mode_visits_every_track_once() {
    let (player, _device) = player_with(&[0, 1, 2, 3, 4, 5]);
    player.set_random_mode(true);

    let mut seen = HashSet::new();
    for _ in 0..6 {
        player.next();
        seen.insert(player.selection_index());
    }
    assert_eq!(seen.len(), 6);

    // Exhausted with repeat off: selection stays on the last one
    let last = player.selection_index();
    player.next();
    assert_eq!(player.selection_index(), last);
}

#[test]
fn test_disabling_random_continues_in_display_order() {
    let (player, _device) = player_with(&[0, 1, 2, 3]);

    player.set_random_mode(true);
    player.next();
    player.next();
    let track = player.current_track();
    let index = player.selection_index();

    player.set_random_mode(false);
    assert_eq!(player.current_track(), track);
    assert_eq!(player.selection_index(), index);
}

#[test]
fn test_random_insert_lands_after_current() {
    let (player, _device) = player_with(&[0, 1, 2, 3]);
    player.set_random_mode(true);
    player.next();
    player.next();

    let current = player.current_track();
    player.push_back(create_test_track(9));

    let shuffled = player.shuffled_tracks();
    let current_pos = shuffled
        .iter()
        .position(|entry| Some(&entry.track) == current.as_ref())
        .unwrap();
    let new_pos = shuffled
        .iter()
        .position(|entry| entry.track == create_test_track(9))
        .unwrap();
    assert!(new_pos > current_pos);
    assert_eq!(player.current_track(), current);
}

// ===== Playlist Editing =====

#[test]
fn test_insert_at_shifts_selection() {
    let (player, device) = player_with(&[0, 2, 3]);

    player.select(2);
    assert_eq!(device.path(), Some(path_of(3)));

    player.insert_at(1, create_test_track(1));
    assert_eq!(player.selection_index(), Some(3));

    player.previous();
    assert_eq!(device.path(), Some(path_of(2)));
}

#[test]
fn test_insert_at_clamps_position() {
    let (player, _device) = player_with(&[0, 1]);

    player.insert_at(42, create_test_track(2));
    assert_eq!(player.len(), 3);
    assert_eq!(player.track(2), Some(create_test_track(2)));
}

#[test]
fn test_remove_before_selection() {
    let (player, device) = player_with(&[0, 1, 2, 3]);

    player.select(2);
    assert_eq!(device.path(), Some(path_of(2)));

    assert_eq!(player.remove(1), Some(create_test_track(1)));
    assert_eq!(player.selection_index(), Some(1));

    player.previous();
    assert_eq!(device.path(), Some(path_of(0)));
}

#[test]
fn test_remove_selected_entry() {
    let (player, _device) = player_with(&[0, 1, 2]);

    player.select(1);
    player.remove(1);
    assert_eq!(player.selection_index(), Some(1));
    assert_eq!(player.current_track(), Some(create_test_track(2)));

    // Removing the selected last entry clears the selection
    player.remove(1);
    assert_eq!(player.selection_index(), None);
}

#[test]
fn test_remove_out_of_range_is_ignored() {
    let (player, _device) = player_with(&[0, 1]);

    assert_eq!(player.remove(2), None);
    assert_eq!(player.len(), 2);
}

#[test]
fn test_move() {
    let (player, device) = player_with(&[0, 1, 2, 3]);

    player.select(2);
    assert_eq!(device.path(), Some(path_of(2)));

    assert!(player.move_track(1, 2)); // 0, 2, 1, 3
    player.previous();
    assert_eq!(device.path(), Some(path_of(0)));
    player.next();
    assert_eq!(device.path(), Some(path_of(2)));

    assert!(player.move_track(0, 3)); // 2, 1, 3, 0
    player.next();
    assert_eq!(device.path(), Some(path_of(1)));
    player.previous();
    assert_eq!(device.path(), Some(path_of(2)));

    assert!(player.move_track(0, 3)); // 1, 3, 0, 2
    player.previous();
    assert_eq!(device.path(), Some(path_of(0)));
    player.next();
    assert_eq!(device.path(), Some(path_of(2)));

    assert!(!player.move_track(0, 4));
    assert!(!player.move_track(1, 1));
}

#[test]
fn test_remove_duplicates_follows_selection() {
    let (player, _device) = player_with(&[0, 1, 0, 2, 1]);

    player.select(3);
    player.remove_duplicates();

    let tracks: Vec<Track> = player.tracks().into_iter().map(|entry| entry.track).collect();
    assert_eq!(
        tracks,
        vec![create_test_track(0), create_test_track(1), create_test_track(2)]
    );
    assert_eq!(player.selection_index(), Some(2));
    assert_eq!(player.current_track(), Some(create_test_track(2)));
}

#[test]
fn test_remove_duplicates_selected_duplicate_falls_back_to_survivor() {
    let (player, _device) = player_with(&[0, 1, 0]);

    player.select(2);
    player.remove_duplicates();

    assert_eq!(player.len(), 2);
    assert_eq!(player.selection_index(), Some(0));
}

#[test]
fn test_edits_keep_orderings_in_sync() {
    let (player, _device) = player_with(&[0, 1, 2, 3]);
    player.set_random_mode(true);
    player.next();

    player.push_back(create_test_track(4));
    player.insert_at(0, create_test_track(5));
    player.remove(2);
    player.move_track(0, 3);

    let displayed: HashSet<_> = player.tracks().into_iter().map(|entry| entry.id).collect();
    let shuffled: HashSet<_> = player
        .shuffled_tracks()
        .into_iter()
        .map(|entry| entry.id)
        .collect();
    assert_eq!(displayed, shuffled);
    assert_eq!(displayed.len(), 5);
}

// ===== Loading =====

struct FixedLoader;

impl TrackLoader for FixedLoader {
    fn load(&self, locator: &Path) -> encore_playback::Result<Track> {
        if locator == Path::new("missing") {
            return Err(PlaybackError::TrackNotFound(locator.to_path_buf()));
        }
        Ok(Track::new(locator, "Loaded", Duration::from_secs(3)))
    }
}

#[test]
fn test_add_from_loader() {
    let (player, _device) = player_with(&[0, 1]);

    player.add_from(&FixedLoader, Path::new("new"), Some(0)).unwrap();
    player.add_from(&FixedLoader, Path::new("last"), None).unwrap();

    assert_eq!(player.len(), 4);
    assert_eq!(player.track(0).unwrap().title, "Loaded");
    assert_eq!(player.track(3).unwrap().locator, Path::new("last"));
}

#[test]
fn test_add_from_failure_leaves_playlist_untouched() {
    let (player, _device) = player_with(&[0, 1]);
    player.select(1);

    let result = player.add_from(&FixedLoader, Path::new("missing"), Some(0));
    assert!(matches!(result, Err(PlaybackError::TrackNotFound(_))));
    assert_eq!(player.len(), 2);
    assert_eq!(player.selection_index(), Some(1));
}

// ===== Status =====

#[test]
fn test_status_snapshot() {
    let device = MockDevice::new();
    let player = Player::with_config(
        device,
        build_playlist(&[0, 1, 2]),
        PlayerConfig {
            repeat: true,
            random: false,
        },
    );

    player.play();
    let status = player.status();
    assert!(status.playing);
    assert!(status.repeat);
    assert!(!status.random);
    assert_eq!(status.selection, Some(0));
    assert_eq!(status.track, Some(create_test_track(0)));
    assert_eq!(status.len, 3);
    assert_eq!(
        player.describe_tracks(),
        "Tracks: 3\n- Title0\n- Title1\n- Title2"
    );
}
