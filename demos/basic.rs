//! A walkthrough of the core API: build a document, query it, and sync it.
//!
//! This runs against an in-memory endpoint so it works out of the box; swap the
//! [`MockRemote`] for a [`chalkboard::client::Client`] pointed at your own endpoint
//! URL to sync for real.

use chrono::Local;

use chalkboard::mock_remote::MockRemote;
use chalkboard::store::Store;
use chalkboard::{NewTask, Provider, TaskFilter};

#[tokio::main]
async fn main() {
    env_logger::init();

    let folder = std::env::temp_dir().join("chalkboard-demo");
    let store = Store::new(&folder);
    let mut provider = Provider::new(store, Some(MockRemote::new()));

    let today = Local::now().date_naive();
    let homework = provider
        .document_mut()
        .add_class("Homework", "#e11d48")
        .unwrap();
    provider
        .document_mut()
        .add_task(NewTask {
            title: "Finish calculus worksheet".to_string(),
            date: today.format("%Y-%m-%d").to_string(),
            class_id: homework.id().clone(),
            ..NewTask::default()
        })
        .unwrap();
    let reading = provider
        .document_mut()
        .add_task(NewTask {
            title: "Read 20 pages of history".to_string(),
            date: today.format("%Y-%m-%d").to_string(),
            class_id: homework.id().clone(),
            ..NewTask::default()
        })
        .unwrap();
    provider.document_mut().toggle_task(reading.id());
    provider.commit().unwrap();

    println!("Tasks for {}:", today);
    let todays = TaskFilter::default().on_date(today);
    for task in provider.document().tasks_matching(&todays) {
        let mark = if task.done() { "✓" } else { " " };
        println!("  {} {}", mark, task.title());
    }
    println!(
        "{}% done today, streak of {} day(s)",
        provider.document().completion_percent(today),
        provider.document().streak(),
    );

    // In a real application a SyncScheduler would trigger this automatically
    let outcome = provider.sync().await;
    println!("{}", outcome);
}
