//! Subcommand implementations. Every mutation ends with an explicit save.

use crate::AddCommand;
use anyhow::Result;
use arbor_application::ExplorerService;
use arbor_core::kinds::{BASH_SCRIPT, FOLDER, NOTE};
use arbor_core::node::serializable_fields;
use arbor_core::{TreeView, ViewFilter};
use serde_json::json;

pub async fn show(service: &ExplorerService, filter: &ViewFilter) {
    let views = service.visible_tree(filter).await;
    if views.is_empty() {
        println!("(empty)");
        return;
    }
    for view in &views {
        print_view(view, 0);
    }
}

fn print_view(view: &TreeView, depth: usize) {
    let mut markers = String::new();
    if view.is_favorite {
        markers.push_str(" *");
    }
    if view.is_hidden {
        markers.push_str(" (hidden)");
    }
    if let Some(profile) = &view.profile {
        markers.push_str(&format!(" @{}", profile));
    }
    println!(
        "{}{} [{}]{}  {}",
        "  ".repeat(depth),
        view.label,
        view.kind,
        markers,
        view.id
    );
    for child in &view.children {
        print_view(child, depth + 1);
    }
}

pub async fn add(service: &ExplorerService, command: AddCommand) -> Result<()> {
    let (tag, label, parent) = match &command {
        AddCommand::Folder { label, parent } => (FOLDER.tag, label, parent),
        AddCommand::Note { label, parent, .. } => (NOTE.tag, label, parent),
        AddCommand::Script { label, parent, .. } => (BASH_SCRIPT.tag, label, parent),
    };

    let key = match parent {
        Some(id) => {
            let parent = service.resolve(id).await?;
            service.add_child(parent, tag, label).await?
        }
        None => service.add_root(tag, label).await?,
    };

    match command {
        AddCommand::Note {
            content: Some(content),
            ..
        } => service.set_property(key, "Content", json!(content)).await?,
        AddCommand::Script { script, shell, .. } => {
            service.set_property(key, "Script", json!(script)).await?;
            if let Some(shell) = shell {
                service.set_property(key, "Shell", json!(shell)).await?;
            }
        }
        _ => {}
    }

    service.save().await?;
    let id = service
        .read(|forest| forest.node(key).map(|n| n.id().to_string()))
        .await?;
    println!("{}", id);
    Ok(())
}

pub async fn remove(service: &ExplorerService, id: &str) -> Result<()> {
    let key = service.resolve(id).await?;
    service.remove_node(key).await?;
    service.save().await?;
    Ok(())
}

pub async fn favorite(service: &ExplorerService, id: &str, on: bool) -> Result<()> {
    let key = service.resolve(id).await?;
    service.set_favorite(key, on).await?;
    service.save().await?;
    Ok(())
}

pub async fn hide(service: &ExplorerService, id: &str, on: bool) -> Result<()> {
    let key = service.resolve(id).await?;
    service.set_hidden(key, on).await?;
    service.save().await?;
    Ok(())
}

pub async fn rename(service: &ExplorerService, id: &str, label: &str) -> Result<()> {
    let key = service.resolve(id).await?;
    service.rename(key, label).await?;
    service.save().await?;
    Ok(())
}

pub fn kinds(service: &ExplorerService) {
    let registry = service.registry();
    for tag in registry.tags() {
        let fields = registry
            .descriptor(&tag)
            .map(|descriptor| serializable_fields(descriptor).join(", "))
            .unwrap_or_default();
        println!("{:<16} {}", tag, fields);
    }
}
