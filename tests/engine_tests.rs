mod common;

use std::time::Duration;

use common::ScriptedRandom;
use serde_json::json;
use vibe_check_lib::{
    checkins::{RandomSource, SeedKind},
    vibe::{FeedEvent, VIBE_UPDATE_EVENT},
    DashboardEvent, EngineSettings, LightMode, VenueEngine,
};

fn settings(seed: SeedKind) -> EngineSettings {
    EngineSettings {
        seed,
        ..EngineSettings::default()
    }
}

fn vibe(hype: f64, energy: f64) -> FeedEvent {
    FeedEvent::Message {
        event: VIBE_UPDATE_EVENT.to_string(),
        payload: json!({ "hypeScore": hype, "meanEnergy": energy, "fps": 20.0 }),
    }
}

#[tokio::test(start_paused = true)]
async fn test_quiet_ticks_age_every_record() {
    let engine = VenueEngine::new(settings(SeedKind::Demo)).unwrap();
    let before: Vec<f64> = engine
        .recent_checkins(10)
        .await
        .iter()
        .map(|c| c.age_minutes())
        .collect();

    engine
        .start_checkins(Box::new(ScriptedRandom::quiet()))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5 * 3_000 + 100)).await;

    let snapshot = engine.dashboard().await;
    assert_eq!(snapshot.board.ticks, 5);
    assert_eq!(snapshot.board.total_checkins, 47);
    for (record, before) in snapshot.board.recent.iter().zip(before) {
        assert!((record.age_minutes() - before - 0.25).abs() < 1e-9);
    }

    engine.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_first_tick_waits_one_period() {
    let engine = VenueEngine::new(settings(SeedKind::Empty)).unwrap();
    engine
        .start_checkins(Box::new(ScriptedRandom::quiet()))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(2_900)).await;
    assert_eq!(engine.dashboard().await.board.ticks, 0);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(engine.dashboard().await.board.ticks, 1);

    engine.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_arrival_reaches_ranking_log_and_events() {
    let engine = VenueEngine::new(settings(SeedKind::Empty)).unwrap();
    let mut events = engine.subscribe();

    // "Casey B." picking Deep House, Tech House, Melodic Techno.
    let rng = ScriptedRandom::quiet().with_arrival(3, [0, 1, 5]);
    engine.start_checkins(Box::new(rng)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(3_100)).await;

    assert_eq!(engine.total_checkins().await, 1);

    let recent = engine.recent_checkins(3).await;
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].guest_name(), "Casey B.");

    let top = engine.genre_ranking(3).await;
    assert_eq!(top[0].name, "Deep House");
    assert_eq!(top[0].count, 25);
    assert_eq!(top[1].count, 22);

    match events.try_recv().unwrap() {
        DashboardEvent::CheckinArrived {
            record,
            total_checkins,
        } => {
            assert_eq!(record.id(), recent[0].id());
            assert_eq!(total_checkins, 1);
        }
        other => panic!("unexpected event {other:?}"),
    }

    engine.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_no_ticks_after_shutdown() {
    let engine = VenueEngine::new(settings(SeedKind::Demo)).unwrap();
    engine
        .start_checkins(Box::new(ScriptedRandom::quiet()))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(3_100)).await;
    engine.shutdown().await.unwrap();
    let ticks = engine.dashboard().await.board.ticks;
    assert_eq!(ticks, 1);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(engine.dashboard().await.board.ticks, ticks);
}

struct PanickingRandom;

impl RandomSource for PanickingRandom {
    fn chance(&mut self, _probability: f64) -> bool {
        panic!("random source exploded");
    }

    fn index(&mut self, _len: usize) -> usize {
        0
    }

    fn distinct_indices(&mut self, _len: usize, _amount: usize) -> Vec<usize> {
        vec![0, 1, 2]
    }
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_survives_panicked_ticker() {
    let engine = VenueEngine::new(settings(SeedKind::Empty)).unwrap();
    engine
        .start_checkins(Box::new(PanickingRandom))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(3_100)).await;
    engine.shutdown().await.unwrap();

    let board = engine.dashboard().await.board;
    assert_eq!(board.total_checkins, 0);
}

#[tokio::test]
async fn test_feed_drives_scene_and_connection() {
    let engine = VenueEngine::new(settings(SeedKind::Empty)).unwrap();
    assert_eq!(engine.current_light_scene().mode, LightMode::Ambient);
    assert!(engine.latest_vibe_frame().is_none());

    let mut events = engine.subscribe();
    let tx = engine.attach_feed().await.unwrap();
    tx.send(FeedEvent::Connected).await.unwrap();
    tx.send(vibe(0.75, 3.0)).await.unwrap();

    let scene = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match events.recv().await {
                Ok(DashboardEvent::SceneChanged(scene)) => break scene,
                Ok(_) => continue,
                Err(err) => panic!("event bus closed: {err}"),
            }
        }
    })
    .await
    .unwrap();

    assert_eq!(scene.mode, LightMode::Strobe);
    assert_eq!(scene.bpm, 140);
    assert!(engine.connected());
    assert_eq!(engine.current_light_scene(), scene);
    assert_eq!(engine.latest_vibe_frame().unwrap().fps, Some(20.0));

    engine.shutdown().await.unwrap();
    assert!(!engine.connected());
}

#[tokio::test]
async fn test_messages_after_shutdown_are_ignored() {
    let engine = VenueEngine::new(settings(SeedKind::Empty)).unwrap();
    let tx = engine.attach_feed().await.unwrap();

    engine.shutdown().await.unwrap();
    let _ = tx.send(vibe(0.9, 12.0)).await;
    tokio::task::yield_now().await;

    assert!(engine.latest_vibe_frame().is_none());
    assert_eq!(engine.current_light_scene().mode, LightMode::Ambient);
    assert!(engine
        .feed_adapter()
        .deliver(VIBE_UPDATE_EVENT, json!({ "hypeScore": 0.9 }))
        .is_err());
}

#[tokio::test]
async fn test_invalid_settings_rejected() {
    let bad = EngineSettings {
        recent_capacity: 0,
        ..EngineSettings::default()
    };
    assert!(VenueEngine::new(bad).is_err());
}
