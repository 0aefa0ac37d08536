//! Live API tests. Set `APP_ID` and `APP_SECRET` (a `.env` file works) to run
//! them; without credentials every test returns early.
//!
//! The write tests change the charge and discharge schedule of the first unit,
//! so they only run with `cargo test -- --ignored`.

use alphaess_rs::{EssClient, TimeWindow};

fn client() -> Option<EssClient> {
    let _ = dotenvy::dotenv();
    let _ = env_logger::builder().is_test(true).try_init();

    let app_id = std::env::var("APP_ID").ok()?;
    let app_secret = std::env::var("APP_SECRET").ok()?;
    Some(EssClient::new(app_id, app_secret).expect("failed to build the client"))
}

async fn first_serial(client: &EssClient) -> Option<String> {
    client
        .get_ess_list()
        .await?
        .into_iter()
        .find_map(|unit| unit.serial().map(str::to_owned))
}

#[tokio::test]
async fn fetches_ess_list() {
    let client = match client() {
        Some(client) => client,
        None => return,
    };

    assert!(client.get_ess_list().await.is_some());
    assert!(client.authenticate().await);
}

#[tokio::test]
async fn fetches_last_power_data() {
    let client = match client() {
        Some(client) => client,
        None => return,
    };

    if let Some(serial) = first_serial(&client).await {
        assert!(client.get_last_power_data(&serial).await.is_some());
    }
}

#[tokio::test]
async fn fetches_charge_config_info() {
    let client = match client() {
        Some(client) => client,
        None => return,
    };

    if let Some(serial) = first_serial(&client).await {
        assert!(client.get_charge_config_info(&serial).await.is_some());
    }
}

#[tokio::test]
#[ignore = "changes the schedule of a live unit"]
async fn sets_battery_charge() {
    let client = match client() {
        Some(client) => client,
        None => return,
    };

    if let Some(serial) = first_serial(&client).await {
        let first = TimeWindow::new("08:00", "09:00");
        let second = TimeWindow::new("10:00", "11:00");
        client
            .set_battery_charge(&serial, true, &first, &second, 80)
            .await
            .unwrap();
    }
}

#[tokio::test]
#[ignore = "changes the schedule of a live unit"]
async fn sets_battery_discharge() {
    let client = match client() {
        Some(client) => client,
        None => return,
    };

    if let Some(serial) = first_serial(&client).await {
        let first = TimeWindow::new("08:00", "09:00");
        let second = TimeWindow::new("10:00", "11:00");
        client
            .set_battery_discharge(&serial, true, &first, &second, 80)
            .await
            .unwrap();
    }
}
