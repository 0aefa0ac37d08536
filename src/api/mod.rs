pub mod endpoint;
pub mod error;
pub mod policy;
pub mod response;
pub mod signature;
pub mod transport;

use crate::model::{ChargeSettings, Credentials, DischargeSettings, EssUnit, TimeWindow};
use crate::settings::Settings;
pub use error::Error;
pub use policy::{FailurePolicy, RetryPolicy, Throttle};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use signature::SignedHeaders;
use std::time::Duration;
pub use transport::{HttpTransport, Transport, DEFAULT_TIMEOUT};

const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Date actually sent to date-scoped endpoints: anything but `today` is
/// replaced with `today`.
pub fn effective_query_date(requested: chrono::NaiveDate, today: chrono::NaiveDate) -> chrono::NaiveDate {
    if requested == today {
        requested
    } else {
        today
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// Client for the AlphaESS open API.
///
/// Reads are fail-soft: any failure is logged and comes back as `None`.
/// Writes are fail-hard and return the error.
pub struct EssClient<T = HttpTransport> {
    credentials: Credentials,
    transport: T,
    retry_policy: RetryPolicy,
}

impl EssClient<HttpTransport> {
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Result<Self, Error> {
        Self::with_timeout(app_id, app_secret, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let transport = HttpTransport::new(endpoint::BASE_URL, timeout)?;
        Ok(Self::with_transport(Credentials::new(app_id, app_secret), transport))
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, Error> {
        let transport = HttpTransport::new(settings.base_url.to_owned(), settings.timeout())?;
        Ok(Self::with_transport(
            Credentials::new(settings.app_id.to_owned(), settings.app_secret.to_owned()),
            transport,
        )
        .with_retry_policy(settings.retry_policy()))
    }
}

impl<T: Transport> EssClient<T> {
    pub fn with_transport(credentials: Credentials, transport: T) -> Self {
        Self {
            credentials,
            transport,
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Issue one signed request and validate its envelope, retrying rate-limited
    /// calls as the retry policy allows. Every attempt is signed anew.
    async fn call<R: DeserializeOwned>(&self, path: &str, body: Option<&Value>) -> Result<Option<R>, Error> {
        let mut attempt = 0;
        loop {
            let headers = SignedHeaders::now(&self.credentials);
            let result = match body {
                Some(body) => self.transport.post(path, &headers, body).await,
                None => self.transport.get(path, &headers).await,
            }
            .and_then(response::parse::<R>);

            match result {
                Err(e) => match self.retry_policy.backoff(attempt, &e) {
                    Some(delay) => {
                        log::warn!(
                            "{} when calling {}, retrying in {:?} (attempt {})",
                            e,
                            path,
                            delay,
                            attempt + 1
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => return Err(e),
                },
                ok => return ok,
            }
        }
    }

    /// Signed GET, fail-soft. Missing `data` counts as a failure.
    async fn get<R: DeserializeOwned>(&self, path: &str) -> Option<R> {
        log::debug!("Trying to call {}", path);
        let result = self.call::<R>(path, None).await.and_then(|data| {
            data.map(Some)
                .ok_or_else(|| Error::EmptyData(path.to_string()))
        });
        FailurePolicy::FailSoft.resolve(path, result).ok().flatten()
    }

    /// Signed POST, fail-hard. `data` may legitimately be `null`.
    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<(), Error> {
        let body = serde_json::to_value(body).map_err(|e| Error::InternalError(e.to_string()))?;
        log::debug!("Trying to call {} with settings {}", path, body);
        let result = self.call::<Value>(path, Some(&body)).await;
        FailurePolicy::FailHard.resolve(path, result).map(|_| ())
    }

    pub async fn get_ess_list(&self) -> Option<Vec<EssUnit>> {
        self.get(endpoint::ESS_LIST).await
    }

    pub async fn get_last_power_data(&self, sys_sn: &str) -> Option<Value> {
        self.get_by_serial(endpoint::LAST_POWER_DATA, sys_sn).await
    }

    /// Power samples for one day. Only today can be queried: any other
    /// `query_date` is replaced with today's local date.
    pub async fn get_one_day_power_by_sn(
        &self,
        sys_sn: &str,
        query_date: chrono::NaiveDate,
    ) -> Option<Value> {
        self.get_by_date(endpoint::ONE_DAY_POWER, sys_sn, query_date)
            .await
    }

    pub async fn get_sum_data_for_customer(&self, sys_sn: &str) -> Option<Value> {
        self.get_by_serial(endpoint::SUM_DATA_FOR_CUSTOMER, sys_sn).await
    }

    /// Energy totals for one day. Only today can be queried: any other
    /// `query_date` is replaced with today's local date.
    pub async fn get_one_date_energy_by_sn(
        &self,
        sys_sn: &str,
        query_date: chrono::NaiveDate,
    ) -> Option<Value> {
        self.get_by_date(endpoint::ONE_DATE_ENERGY, sys_sn, query_date)
            .await
    }

    pub async fn get_charge_config_info(&self, sys_sn: &str) -> Option<Value> {
        self.get_by_serial(endpoint::CHARGE_CONFIG, sys_sn).await
    }

    pub async fn get_dis_charge_config_info(&self, sys_sn: &str) -> Option<Value> {
        self.get_by_serial(endpoint::DISCHARGE_CONFIG, sys_sn).await
    }

    async fn get_by_date(
        &self,
        resource: &endpoint::Endpoint,
        sys_sn: &str,
        query_date: chrono::NaiveDate,
    ) -> Option<Value> {
        let query_date = effective_query_date(query_date, today());
        let path = endpoint::by_serial_and_date(
            resource,
            sys_sn,
            &query_date.format(QUERY_DATE_FORMAT).to_string(),
        );
        self.get_path(resource, path).await
    }

    async fn get_by_serial(&self, resource: &endpoint::Endpoint, sys_sn: &str) -> Option<Value> {
        self.get_path(resource, endpoint::by_serial(resource, sys_sn))
            .await
    }

    async fn get_path(
        &self,
        resource: &endpoint::Endpoint,
        path: Result<String, Error>,
    ) -> Option<Value> {
        match path {
            Ok(path) => self.get(&path).await,
            Err(e) => FailurePolicy::FailSoft
                .resolve::<Value>(resource, Err(e))
                .ok()
                .flatten(),
        }
    }

    pub async fn update_charge_config_info(&self, settings: &ChargeSettings) -> Result<(), Error> {
        self.post(endpoint::UPDATE_CHARGE_CONFIG, settings).await
    }

    pub async fn update_dis_charge_config_info(
        &self,
        settings: &DischargeSettings,
    ) -> Result<(), Error> {
        self.post(endpoint::UPDATE_DISCHARGE_CONFIG, settings)
            .await
    }

    /// Set battery grid charging: `enabled` toggles it, charging stops at
    /// `charge_stop_soc` percent.
    pub async fn set_battery_charge(
        &self,
        serial: &str,
        enabled: bool,
        first: &TimeWindow,
        second: &TimeWindow,
        charge_stop_soc: u8,
    ) -> Result<(), Error> {
        log::debug!("Trying to set charge settings for system {}", serial);
        let settings = ChargeSettings::new(serial, enabled, first, second, charge_stop_soc);
        self.update_charge_config_info(&settings).await
    }

    /// Set battery discharging: `enabled` toggles it, discharging stops at
    /// `discharge_cutoff_soc` percent.
    pub async fn set_battery_discharge(
        &self,
        serial: &str,
        enabled: bool,
        first: &TimeWindow,
        second: &TimeWindow,
        discharge_cutoff_soc: u8,
    ) -> Result<(), Error> {
        log::debug!("Trying to set discharge settings for system {}", serial);
        let settings = DischargeSettings::new(serial, enabled, first, second, discharge_cutoff_soc);
        self.update_dis_charge_config_info(&settings).await
    }

    /// Fetch a full snapshot of every unit.
    ///
    /// Calls are made one at a time, pausing per `throttle` between the calls
    /// for a unit. A failed call leaves the matching field empty; if the list
    /// itself can't be fetched, no units are returned. Units without a serial
    /// number are skipped.
    pub async fn get_data(&self, throttle: &Throttle) -> Vec<EssUnit> {
        let units = match self.get_ess_list().await {
            Some(units) => units,
            None => return Vec::new(),
        };

        let mut all_data = Vec::with_capacity(units.len());
        for mut unit in units {
            let serial = match unit.serial() {
                Some(serial) => serial.to_owned(),
                None => {
                    log::warn!("Skipping unit without a serial number: {:?}", unit.details);
                    continue;
                }
            };

            unit.sum_data = self.get_sum_data_for_customer(&serial).await;
            throttle.pause().await;
            unit.one_date_energy = self.get_one_date_energy_by_sn(&serial, today()).await;
            throttle.pause().await;
            unit.last_power = self.get_last_power_data(&serial).await;
            throttle.pause().await;
            unit.charge_config = self.get_charge_config_info(&serial).await;
            throttle.pause().await;
            unit.discharge_config = self.get_dis_charge_config_info(&serial).await;

            log::debug!("Collected data for system {}", serial);
            all_data.push(unit);
        }

        all_data
    }

    /// Smoke-test the credentials: true if the list contains at least one unit
    /// with a serial number.
    pub async fn authenticate(&self) -> bool {
        self.get_ess_list()
            .await
            .map(|units| units.iter().any(|unit| unit.serial().is_some()))
            .unwrap_or(false)
    }
}
