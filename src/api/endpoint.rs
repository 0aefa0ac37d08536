use super::Error;

pub type Endpoint = str;

pub const BASE_URL: &str = "https://openapi.alphaess.com/api";

pub const ESS_LIST: &Endpoint = "/getEssList";
pub const LAST_POWER_DATA: &Endpoint = "/getLastPowerData";
pub const ONE_DAY_POWER: &Endpoint = "/getOneDayPowerBySn";
pub const SUM_DATA_FOR_CUSTOMER: &Endpoint = "/getSumDataForCustomer";
pub const ONE_DATE_ENERGY: &Endpoint = "/getOneDateEnergyBySn";
pub const CHARGE_CONFIG: &Endpoint = "/getChargeConfigInfo";
pub const DISCHARGE_CONFIG: &Endpoint = "/getDisChargeConfigInfo";
pub const UPDATE_CHARGE_CONFIG: &Endpoint = "/updateChargeConfigInfo";
pub const UPDATE_DISCHARGE_CONFIG: &Endpoint = "/updateDisChargeConfigInfo";

#[derive(serde::Serialize)]
struct Query<'a> {
    #[serde(rename = "sysSn")]
    sys_sn: &'a str,
    #[serde(rename = "queryDate", skip_serializing_if = "Option::is_none")]
    query_date: Option<&'a str>,
}

/* Serial numbers come from the caller: let serde_qs percent-encode them */
fn with_query(endpoint: &Endpoint, query: &Query<'_>) -> Result<String, Error> {
    serde_qs::to_string(query)
        .map(|query| format!("{}?{}", endpoint, query))
        .map_err(|e| Error::InternalError(format!("cannot build query for {}: {}", endpoint, e)))
}

/// `{endpoint}?sysSn={sys_sn}`
pub fn by_serial(endpoint: &Endpoint, sys_sn: &str) -> Result<String, Error> {
    with_query(
        endpoint,
        &Query {
            sys_sn,
            query_date: None,
        },
    )
}

/// `{endpoint}?sysSn={sys_sn}&queryDate={query_date}`
pub fn by_serial_and_date(
    endpoint: &Endpoint,
    sys_sn: &str,
    query_date: &str,
) -> Result<String, Error> {
    with_query(
        endpoint,
        &Query {
            sys_sn,
            query_date: Some(query_date),
        },
    )
}
