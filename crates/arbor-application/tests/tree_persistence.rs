//! Save → load round-trips through the JSON file store.

use arbor_application::ExplorerService;
use arbor_core::kinds::ResourceKind;
use arbor_core::remote::ResourceItem;
use arbor_core::{NodeOperation, ViewFilter};
use arbor_infrastructure::{DocumentMigration, JsonFileTreeStore, MigrationChain};
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;

fn file_service(dir: &TempDir) -> ExplorerService {
    let store = Arc::new(JsonFileTreeStore::new(dir.path().join("tree.json")));
    ExplorerService::with_default_registry(store)
}

#[tokio::test]
async fn test_round_trip_through_file() {
    let dir = TempDir::new().unwrap();
    let service = file_service(&dir);

    let scripts = service.add_root("Folder", "Scripts").await.unwrap();
    let deploy = service.add_child(scripts, "BashScript", "Deploy").await.unwrap();
    service
        .set_property(deploy, "Script", json!("echo hi"))
        .await
        .unwrap();
    service.set_favorite(deploy, true).await.unwrap();
    service
        .set_profile(scripts, Some("prod".to_string()))
        .await
        .unwrap();
    service
        .track_resource(
            ResourceKind::S3Bucket,
            ResourceItem::new("eu-west-1", "assets"),
            None,
        )
        .await
        .unwrap();
    service.save().await.unwrap();

    let raw: Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("tree.json")).unwrap())
            .unwrap();
    assert_eq!(raw["version"], json!(1));
    assert_eq!(raw["nodes"][0]["_type"], json!("Folder"));
    assert_eq!(
        raw["nodes"][0]["_children"][0]["_properties"]["Script"],
        json!("echo hi")
    );
    assert_eq!(raw["nodes"][1]["_properties"]["BucketName"], json!("assets"));

    let reloaded = file_service(&dir);
    assert_eq!(reloaded.load().await.unwrap(), 3);

    let all = reloaded
        .visible_tree(&ViewFilter::default().for_profile("prod"))
        .await;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].label, "Scripts");
    assert_eq!(all[0].profile.as_deref(), Some("prod"));
    assert_eq!(all[0].children[0].label, "Deploy");
    assert!(all[0].children[0].is_favorite);
    assert_eq!(all[1].kind, "S3Bucket");

    // Other profiles lose the tagged folder but keep untagged nodes.
    let dev = reloaded
        .visible_tree(&ViewFilter::default().for_profile("dev"))
        .await;
    assert_eq!(dev.len(), 1);
    assert_eq!(dev[0].label, "assets");
}

#[tokio::test]
async fn test_restored_script_keeps_its_behavior() {
    let dir = TempDir::new().unwrap();
    let service = file_service(&dir);
    let deploy = service.add_root("BashScript", "Deploy").await.unwrap();
    let id = service.read(|f| f.node(deploy).unwrap().id().to_string()).await;
    service.save().await.unwrap();

    let reloaded = file_service(&dir);
    reloaded.load().await.unwrap();
    let key = reloaded.resolve(&id).await.unwrap();

    reloaded.fire(key, NodeOperation::Run).await.unwrap();
    let err = reloaded.fire(key, NodeOperation::Run).await.unwrap_err();
    assert!(err.is_busy());
    reloaded.fire(key, NodeOperation::Stop).await.unwrap();
    reloaded.fire(key, NodeOperation::Run).await.unwrap();
}

#[tokio::test]
async fn test_missing_and_corrupt_files_load_empty() {
    let dir = TempDir::new().unwrap();
    let service = file_service(&dir);
    assert_eq!(service.load().await.unwrap(), 0);

    std::fs::write(dir.path().join("tree.json"), "{ not json").unwrap();
    assert_eq!(service.load().await.unwrap(), 0);
}

#[tokio::test]
async fn test_removal_persists_after_explicit_save() {
    let dir = TempDir::new().unwrap();
    let service = file_service(&dir);
    let keep = service.add_root("Folder", "keep").await.unwrap();
    let doomed = service.add_root("Folder", "drop").await.unwrap();
    service.add_child(doomed, "Note", "inside").await.unwrap();
    service.save().await.unwrap();

    service.remove_node(doomed).await.unwrap();
    service.save().await.unwrap();

    let reloaded = file_service(&dir);
    assert_eq!(reloaded.load().await.unwrap(), 1);
    let views = reloaded.visible_tree(&ViewFilter::default()).await;
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].label, "keep");
    assert!(service.read(|f| f.contains(keep)).await);
}

#[tokio::test]
async fn test_deep_tree_survives_edit_cycles() {
    let dir = TempDir::new().unwrap();
    let service = file_service(&dir);
    let mut parent = service.add_root("Folder", "depth-0").await.unwrap();
    for depth in 1..100 {
        parent = service
            .add_child(parent, "Folder", &format!("depth-{}", depth))
            .await
            .unwrap();
    }
    let deepest = service.read(|f| f.node(parent).unwrap().id().to_string()).await;
    service.save().await.unwrap();

    // load, edit, save: the usual CLI cycle must not lose the chain.
    let reloaded = file_service(&dir);
    assert_eq!(reloaded.load().await.unwrap(), 100);
    reloaded.add_root("Note", "later").await.unwrap();
    reloaded.save().await.unwrap();

    let again = file_service(&dir);
    assert_eq!(again.load().await.unwrap(), 101);
    let key = again.resolve(&deepest).await.unwrap();
    assert_eq!(again.read(|f| f.depth(key)).await, 99);
}

#[tokio::test]
async fn test_malformed_children_in_file_keep_their_siblings() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("tree.json"),
        json!({
            "version": 1,
            "nodes": [
                {
                    "_type": "Folder", "_id": "root", "_label": "root",
                    "_children": [
                        { "_label": "no type" },
                        { "_type": "Folder", "_id": "kept", "_label": "kept" },
                        { "_type": "Note", "_id": "nameless", "_label": null }
                    ]
                },
                { "_type": "Folder", "_id": "sibling", "_label": "sibling" }
            ]
        })
        .to_string(),
    )
    .unwrap();

    let service = file_service(&dir);
    assert_eq!(service.load().await.unwrap(), 4);
    assert!(service.find("kept").await.is_some());
    assert!(service.find("nameless").await.is_some());
    assert!(service.find("sibling").await.is_some());

    // Saving writes back only what survived.
    service.save().await.unwrap();
    let reloaded = file_service(&dir);
    assert_eq!(reloaded.load().await.unwrap(), 4);
}

#[tokio::test]
async fn test_repeated_load_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let service = file_service(&dir);
    let logs = service.add_root("Folder", "logs").await.unwrap();
    service
        .track_resource(
            ResourceKind::LogGroup,
            ResourceItem::new("us-east-1", "/aws/lambda/api"),
            Some(logs),
        )
        .await
        .unwrap();
    service.save().await.unwrap();

    let first = service.load().await.unwrap();
    let first_view = service.visible_tree(&ViewFilter::default()).await;
    let second = service.load().await.unwrap();
    let second_view = service.visible_tree(&ViewFilter::default()).await;

    assert_eq!(first, 2);
    assert_eq!(first, second);
    assert_eq!(first_view, second_view);
}

#[derive(Debug)]
struct LegacyFavorites;

impl DocumentMigration for LegacyFavorites {
    fn from_version(&self) -> u32 {
        0
    }

    fn to_version(&self) -> u32 {
        1
    }

    fn description(&self) -> &str {
        "move starred flag into _properties"
    }

    fn migrate(&self, mut document: Value) -> anyhow::Result<Value> {
        if let Some(nodes) = document["nodes"].as_array_mut() {
            for node in nodes {
                if let Some(starred) = node.as_object_mut().and_then(|o| o.remove("starred")) {
                    node["_properties"] = json!({ "IsFavorite": starred });
                }
            }
        }
        document["version"] = json!(1);
        Ok(document)
    }
}

#[tokio::test]
async fn test_legacy_document_is_migrated_on_load() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("tree.json"),
        json!({
            "nodes": [{ "_type": "Folder", "_id": "legacy", "_label": "old", "starred": true }]
        })
        .to_string(),
    )
    .unwrap();

    let mut chain = MigrationChain::new(1);
    chain.register(Arc::new(LegacyFavorites)).unwrap();
    let service = file_service(&dir).with_migrations(chain);

    assert_eq!(service.load().await.unwrap(), 1);
    let views = service
        .visible_tree(&ViewFilter::default().favorites_only())
        .await;
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].id, "legacy");
}
