use std::cell::RefCell;
use std::io::Write;

use filmstrip_core::config::FilmstripConfig;
use filmstrip_core::room::room_control::RoomControl;
use filmstrip_core::scenario::{Scenario, ScenarioRunner};

#[derive(Default)]
struct RecordingRoomControl {
    selected: RefCell<Vec<String>>,
}

impl RoomControl for &RecordingRoomControl {
    fn set_selected_peer(&self, peer_id: &str) {
        self.selected.borrow_mut().push(peer_id.to_string());
    }
}

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

const ROOM: &str = r#"{
    "my_id": "me",
    "steps": [
        { "step": "mount",
          "window": { "width": 1600, "height": 1000 },
          "container": { "width": 1000, "height": 800 } },
        { "step": "update",
          "peers": [
              { "id": "p1" }, { "id": "p2" }, { "id": "p3" },
              { "id": "p4", "consumers": ["p4-screen"] }, { "id": "p5" }
          ],
          "consumers": [{ "id": "p4-screen", "source": "screen" }],
          "spotlights": ["p1", "p2", "p4"] },
        { "step": "update", "active_speaker_id": "me" },
        { "step": "update", "active_speaker_id": "p4" },
        { "step": "select", "peer_id": "p2" },
        { "step": "update", "selected_peer_id": "p2" },
        { "step": "update", "spotlights": ["p1", "p2", "p3", "p4", "p5"] },
        { "step": "resize",
          "window": { "width": 1600, "height": 700 },
          "container": { "width": 1000, "height": 500 } },
        { "step": "resize",
          "window": { "width": 1600, "height": 700 },
          "container": { "width": 1200, "height": 500 } },
        { "step": "advance", "ms": 249 },
        { "step": "advance", "ms": 1 },
        { "step": "unmount" },
        { "step": "resize",
          "window": { "width": 800, "height": 700 },
          "container": { "width": 800, "height": 500 } },
        { "step": "advance", "ms": 500 }
    ]
}"#;

#[test]
fn test_replay_from_files() {
    let scenario_file = write_temp(ROOM);
    let config_file = write_temp(r#"{"layout": {"margin_width": 0, "margin_height": 0}}"#);

    let scenario = Scenario::load(scenario_file.path()).unwrap();
    let config = FilmstripConfig::load(config_file.path()).unwrap();
    let room_control = RecordingRoomControl::default();

    let mut runner = ScenarioRunner::new(config, &scenario.my_id, &room_control).unwrap();
    let reports = runner.run(&scenario);
    assert_eq!(reports.len(), 14);

    // Mount with an empty room: sized, but nobody to show.
    assert_eq!(reports[0].recomputations, 1);
    assert!(reports[0].view.speaker.is_none());

    // p1 is the default speaker, two participants are hidden.
    let joined = &reports[1].view;
    assert_eq!(joined.active_peer_id.as_deref(), Some("p1"));
    assert_eq!(joined.speaker.as_ref().unwrap().dimensions.width, 1000.0);
    assert_eq!(joined.hidden_peers.map(|b| b.count), Some(2));

    // The local participant speaking changes nothing visible.
    assert_eq!(reports[2].view.active_peer_id.as_deref(), Some("p1"));
    assert_eq!(reports[2].recomputations, reports[1].recomputations + 1);

    // p4 shares a screen, the tile halves.
    let p4 = reports[3].view.speaker.as_ref().unwrap();
    assert_eq!((p4.id.as_str(), p4.dimensions.width, p4.dimensions.height), ("p4", 500.0, 375.0));

    // Clicking only asks the room, the store echo applies the selection.
    assert_eq!(reports[4].view.active_peer_id.as_deref(), Some("p4"));
    assert_eq!(*room_control.selected.borrow(), vec!["p2".to_string()]);
    assert_eq!(reports[5].view.active_peer_id.as_deref(), Some("p2"));
    assert_eq!(reports[5].view.speaker.as_ref().unwrap().dimensions.width, 1000.0);

    // Everybody spotlighted: no badge.
    assert!(reports[6].view.hidden_peers.is_none());
    assert_eq!(reports[6].view.thumbnails.len(), 5);

    // Resize burst: thumbnails follow at once, the tile waits for 250ms.
    let thumb = reports[7].view.me.size.unwrap();
    assert_eq!((thumb.width, thumb.height), (168.0, 126.0));
    assert!(!reports[9].reacted);
    assert_eq!(reports[9].recomputations, reports[6].recomputations);
    assert!(reports[10].reacted);
    assert_eq!(reports[10].recomputations, reports[6].recomputations + 1);
    let settled = reports[10].view.speaker.as_ref().unwrap().dimensions;
    assert_eq!(settled.height, 500.0);
    assert!((settled.width - 500.0 / 3.0 * 4.0).abs() < 1e-9);

    // Unmounted: resizes are ignored, thumbnails keep their last size.
    assert_eq!(reports[12].view.me.size, reports[11].view.me.size);
    assert_eq!(reports[13].elapsed_ms, 750);
    assert!(!reports[13].reacted);
    assert_eq!(reports[13].recomputations, reports[10].recomputations);
    assert!(!runner.filmstrip().is_mounted());
    assert_eq!(runner.filmstrip().last_speaker(), Some("p4"));
}
