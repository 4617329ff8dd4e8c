//! Sighting and telemetry queries against a file store.

use serde_json::{Value, json};
use tempfile::TempDir;

use mergulho_core::sightings::{self, SightingFilter};
use mergulho_core::telemetry::{self, TelemetryFilter};
use mergulho_core::{DocumentStore, Fields};
use mergulho_file::FileStore;

fn fields(value: Value) -> Fields {
    value.as_object().cloned().unwrap()
}

async fn seed_sightings(store: &FileStore) {
    for i in 1..=25 {
        let registro = format!("R{:03}", i);
        let year = if i % 5 == 0 { "2023" } else { "2024" };
        store
            .set(
                "avistamentos",
                &registro,
                fields(json!({
                    "registro": registro,
                    "dia_registro": (i % 28 + 1).to_string(),
                    "mes_registro": "1",
                    "ano_registro": year,
                })),
            )
            .await
            .unwrap();
    }
}

async fn seed_telemetry(store: &FileStore) {
    let fixes = [
        ("shark-7", 1_705_276_800),
        ("shark-7", 1_705_300_000),
        ("shark-7", 1_705_363_199),
        ("shark-7", 1_705_363_200),
        ("turtle-2", 1_705_300_000),
    ];
    for (oid, date) in fixes {
        store
            .add(
                "telemetria",
                fields(json!({"oid": oid, "date": date, "latitude": -20.5, "longitude": -40.1})),
            )
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn second_page_of_twenty_five_sightings() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    for i in 1..=25 {
        let registro = format!("R{:03}", i);
        store
            .set(
                "avistamentos",
                &registro,
                fields(json!({"registro": registro, "ano_registro": "2024"})),
            )
            .await
            .unwrap();
    }

    let filter = SightingFilter {
        year: Some(2024),
        ..Default::default()
    };
    let page = sightings::query_many(&store, 2, 10, &filter).await.unwrap();

    let ids: Vec<_> = page.items.iter().map(|d| d.id.as_str()).collect();
    let expected: Vec<_> = (11..=20).map(|i| format!("R{:03}", i)).collect();
    assert_eq!(ids, expected);
    assert_eq!(page.page, 2);
    assert!(page.has_more);

    let last = sightings::query_many(&store, 3, 10, &filter).await.unwrap();
    assert_eq!(last.items.len(), 5);
    assert!(!last.has_more);
}

#[tokio::test]
async fn sighting_filters_combine() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    seed_sightings(&store).await;

    let filter = SightingFilter {
        year: Some(2023),
        ..Default::default()
    };
    assert_eq!(sightings::count_many(&store, &filter).await.unwrap(), 5);

    let filter = SightingFilter {
        day: Some(11),
        month: Some(1),
        year: Some(2023),
    };
    let page = sightings::query_many(&store, 1, 10, &filter).await.unwrap();
    let ids: Vec<_> = page.items.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["R010"]);
}

#[tokio::test]
async fn integer_stored_years_do_not_match() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    store
        .set(
            "avistamentos",
            "R100",
            fields(json!({"registro": "R100", "ano_registro": 2024})),
        )
        .await
        .unwrap();

    let filter = SightingFilter {
        year: Some(2024),
        ..Default::default()
    };
    assert_eq!(sightings::count_many(&store, &filter).await.unwrap(), 0);
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    seed_sightings(&store).await;

    let page = sightings::query_many(&store, 50, 10, &SightingFilter::default())
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert!(!page.has_more);
}

#[tokio::test]
async fn count_telemetry_by_oid() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    seed_telemetry(&store).await;

    let filter = TelemetryFilter {
        oid: Some("shark-7".to_string()),
        ..Default::default()
    };
    assert_eq!(telemetry::count_many(&store, &filter).await.unwrap(), 4);

    let filter = TelemetryFilter {
        oid: Some("whale-1".to_string()),
        ..Default::default()
    };
    assert_eq!(telemetry::count_many(&store, &filter).await.unwrap(), 0);
}

#[tokio::test]
async fn telemetry_day_is_a_closed_interval() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    seed_telemetry(&store).await;

    let filter = TelemetryFilter {
        oid: Some("shark-7".to_string()),
        date_start: telemetry::parse_date_param(Some("2024-01-15"), false),
        date_end: telemetry::parse_date_param(Some("2024-01-15"), true),
    };
    let page = telemetry::query_many(&store, 1, 10, &filter).await.unwrap();

    let dates: Vec<_> = page
        .items
        .iter()
        .map(|d| d.get("date").and_then(Value::as_i64).unwrap())
        .collect();
    assert_eq!(dates, [1_705_276_800, 1_705_300_000, 1_705_363_199]);
    assert!(!page.has_more);
}

#[tokio::test]
async fn telemetry_without_date_is_not_listed() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    seed_telemetry(&store).await;
    store
        .add("telemetria", fields(json!({"oid": "shark-7", "date": null})))
        .await
        .unwrap();
    store
        .add("telemetria", fields(json!({"oid": "shark-7"})))
        .await
        .unwrap();

    let filter = TelemetryFilter {
        oid: Some("shark-7".to_string()),
        ..Default::default()
    };
    let page = telemetry::query_many(&store, 1, 100, &filter).await.unwrap();
    // A null date still orders first; a missing date is excluded.
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.items[0].get("date"), Some(&Value::Null));
    assert_eq!(telemetry::count_many(&store, &filter).await.unwrap(), 5);
}
