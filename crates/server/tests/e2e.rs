use std::net::SocketAddr;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use configs::SweeperConfig;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use server::{startup, state::ServerState};

struct TestApp {
    base_url: String,
    stop: Option<oneshot::Sender<()>>,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl TestApp {
    async fn stop(mut self) -> anyhow::Result<()> {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
        self.handle.await?
    }
}

async fn start_server(sweeper: SweeperConfig) -> anyhow::Result<TestApp> {
    let db = models::db::connect_in_memory().await?;
    let state = ServerState::new(db);

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        startup::serve(listener, state, &sweeper, async move {
            let _ = rx.await;
        })
        .await
    });

    Ok(TestApp { base_url, stop: Some(tx), handle })
}

fn no_sweeper() -> SweeperConfig {
    SweeperConfig { enabled: false, ..Default::default() }
}

fn wire(dt: chrono::NaiveDateTime) -> String {
    models::wire_time::format(&dt)
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server(no_sweeper()).await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    app.stop().await
}

#[tokio::test]
async fn e2e_pickup_lifecycle() -> anyhow::Result<()> {
    let app = start_server(no_sweeper()).await?;
    let c = reqwest::Client::new();
    let when = wire(models::pickup::now() + ChronoDuration::days(2));

    let res = c
        .post(format!("{}/api/pickups", app.base_url))
        .json(&json!({
            "wasteType": "electronic",
            "pickupLocation": "88 Orchard Ln",
            "pickupDateTime": when,
            "userName": "lena"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<Value>().await?;
    assert_eq!(created["wasteType"], "Electronic");
    assert_eq!(created["status"], "Pending");
    assert_eq!(created["pickupDateTime"], when.as_str());
    let id = created["id"].as_i64().unwrap();

    let res = c
        .put(format!("{}/api/pickups/{id}", app.base_url))
        .json(&json!({"status": "Scheduled"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let updated = res.json::<Value>().await?;
    assert_eq!(updated["status"], "Scheduled");
    assert_eq!(updated["userName"], "lena");

    let res = c
        .put(format!("{}/pickups/{id}", app.base_url))
        .json(&json!({"status": "Pending"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = c.delete(format!("{}/pickups/{id}", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = c.delete(format!("{}/pickups/{id}", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    app.stop().await
}

#[tokio::test]
async fn e2e_sweeper_completes_overdue_and_feeds_impact() -> anyhow::Result<()> {
    let app = start_server(SweeperConfig { enabled: true, interval_secs: 1 }).await?;
    let c = reqwest::Client::new();
    let past = wire(models::pickup::now() - ChronoDuration::hours(1));
    let future = wire(models::pickup::now() + ChronoDuration::days(1));

    for (waste_type, at) in [("Plastic", &past), ("Electronic", &past), ("Organic", &future)] {
        let res = c
            .post(format!("{}/pickups", app.base_url))
            .json(&json!({
                "wasteType": waste_type,
                "pickupLocation": "Recycling Center",
                "pickupDateTime": at,
                "userName": "milo"
            }))
            .send()
            .await?;
        assert_eq!(res.status(), HttpStatusCode::CREATED);
    }

    let mut completed = Vec::new();
    for _ in 0..50 {
        completed = c
            .get(format!("{}/pickups?status=Completed", app.base_url))
            .send()
            .await?
            .json::<Vec<Value>>()
            .await?;
        if completed.len() == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(completed.len(), 2, "sweeper should complete both overdue pickups");

    let report = c
        .get(format!("{}/environmental-impact", app.base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(report["totalRecycledWasteKg"], 7.5);
    assert_eq!(report["co2ReductionKg"], 25.0);
    assert_eq!(report["totalCompletedPickups"], 2);
    assert_eq!(report["wasteTypeDistribution"], json!({"Plastic": 1, "Electronic": 1}));

    app.stop().await
}
