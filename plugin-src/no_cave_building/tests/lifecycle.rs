mod common;

use std::sync::Arc;

use common::{Harness, at};
use no_cave_building::NoCaveBuildingPlugin;
use no_cave_building::config::Edition;
use no_cave_building::events::{BlockPlaceEvent, EventHandler};
use no_cave_building::lang::MessageKey;
use no_cave_building::permission;
use no_cave_building::plugin::{Context, Plugin};
use no_cave_building::ports::NearbyObject;
use uuid::Uuid;

fn context(harness: &Harness, data_folder: &std::path::Path) -> Arc<Context> {
    Arc::new(Context::new(
        data_folder,
        harness.world.clone(),
        harness.permissions.clone(),
        harness.messenger.clone(),
    ))
}

fn formation_world() -> Harness {
    Harness::new(vec![NearbyObject::world("rock_formation_overhang", at(0.0, 6.0, 0.0))])
}

#[tokio::test]
async fn load_writes_config_and_registers_permission() {
    let dir = tempfile::tempdir().unwrap();
    let harness = formation_world();
    let mut plugin = NoCaveBuildingPlugin::default();
    assert!(plugin.place_handler().is_none());

    plugin.on_load(context(&harness, dir.path())).await.unwrap();

    assert!(dir.path().join("config.toml").exists());
    let registered = harness.permissions.registered.lock().unwrap().clone();
    assert_eq!(registered.len(), 1);
    assert_eq!(registered[0].node, permission::IGNORE);
    assert!(plugin.place_handler().is_some());
}

#[tokio::test]
async fn reload_picks_up_config_changes() {
    let dir = tempfile::tempdir().unwrap();
    let harness = formation_world();
    let ctx = context(&harness, dir.path());
    let mut plugin = NoCaveBuildingPlugin::new(Edition::Extended);
    plugin.on_load(ctx.clone()).await.unwrap();
    let handler = plugin.place_handler().unwrap();
    let player = Some(Uuid::new_v4());

    // Formation check is off by default.
    let mut event = BlockPlaceEvent::new(player, Some(at(0.0, 0.0, 0.0)));
    handler.handle_blocking(&mut event).await;
    assert!(!event.cancelled);

    std::fs::write(
        dir.path().join("config.toml"),
        concat!(
            "version = \"1.1.0\"\n",
            "detection_radius = 10.0\n",
            "prevent_building_in_caves = true\n",
            "prevent_building_under_rock_formations = true\n",
        ),
    )
    .unwrap();
    plugin.reload(&ctx).await.unwrap();

    let mut event = BlockPlaceEvent::new(player, Some(at(0.0, 0.0, 0.0)));
    handler.handle_blocking(&mut event).await;
    assert!(event.cancelled);
    assert_eq!(
        harness.messenger.sent(),
        vec![(player.unwrap(), MessageKey::CannotBuildUnderRockFormation)]
    );
}

#[tokio::test]
async fn baseline_edition_ignores_formation_setting() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        concat!(
            "version = \"1.0.0\"\n",
            "detection_radius = 10.0\n",
            "prevent_building_in_caves = true\n",
            "prevent_building_under_rock_formations = true\n",
        ),
    )
    .unwrap();
    let harness = formation_world();
    let mut plugin = NoCaveBuildingPlugin::new(Edition::Baseline);
    plugin.on_load(context(&harness, dir.path())).await.unwrap();

    let mut event = BlockPlaceEvent::new(Some(Uuid::new_v4()), Some(at(0.0, 0.0, 0.0)));
    plugin.place_handler().unwrap().handle_blocking(&mut event).await;

    assert!(!event.cancelled);
}

#[tokio::test]
async fn invalid_config_fails_load() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "version = \"1.1.0\"\ndetection_radius = 0.0\n",
    )
    .unwrap();
    let harness = formation_world();
    let mut plugin = NoCaveBuildingPlugin::default();

    let err = plugin.on_load(context(&harness, dir.path())).await.unwrap_err();

    assert!(err.contains("detection_radius"));
    assert!(plugin.place_handler().is_none());
}

#[tokio::test]
async fn unload_drops_handler_and_reload_requires_load() {
    let dir = tempfile::tempdir().unwrap();
    let harness = formation_world();
    let ctx = context(&harness, dir.path());
    let mut plugin = NoCaveBuildingPlugin::default();

    assert!(plugin.reload(&ctx).await.is_err());
    plugin.on_load(ctx.clone()).await.unwrap();
    plugin.on_unload(ctx.clone()).await.unwrap();

    assert!(plugin.place_handler().is_none());
    assert!(plugin.reload(&ctx).await.is_err());
}
