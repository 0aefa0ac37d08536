use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::serde_as;
use std::fmt;

type Percent = u8;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub app_id: String,
    pub app_secret: String,
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
        }
    }
}

/* Keep the secret out of logs */
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .finish()
    }
}

/// A single energy storage system as listed by `/getEssList`.
///
/// Whatever the list endpoint reports about the unit is kept in `details`; the
/// remaining fields are filled in by [`crate::EssClient::get_data`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EssUnit {
    #[serde(rename = "sysSn", default, skip_serializing_if = "Option::is_none")]
    pub sys_sn: Option<String>,
    #[serde(rename = "SumData", default, skip_serializing_if = "Option::is_none")]
    pub sum_data: Option<Value>,
    #[serde(rename = "OneDateEnergy", default, skip_serializing_if = "Option::is_none")]
    pub one_date_energy: Option<Value>,
    #[serde(rename = "LastPower", default, skip_serializing_if = "Option::is_none")]
    pub last_power: Option<Value>,
    #[serde(rename = "ChargeConfig", default, skip_serializing_if = "Option::is_none")]
    pub charge_config: Option<Value>,
    #[serde(rename = "DisChargeConfig", default, skip_serializing_if = "Option::is_none")]
    pub discharge_config: Option<Value>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl EssUnit {
    /// Serial number, if the API reported a non-empty one.
    pub fn serial(&self) -> Option<&str> {
        self.sys_sn.as_deref().filter(|sn| !sn.is_empty())
    }
}

/// Start and end of a charge or discharge period, both `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: String,
    pub end: String,
}

impl TimeWindow {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Body of `/updateChargeConfigInfo`.
///
/// `timeChaf*` is where a grid-charging period starts, `timeChae*` where it ends.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeSettings {
    pub sys_sn: String,
    #[serde_as(as = "serde_with::BoolFromInt")]
    pub grid_charge: bool,
    pub time_chaf1: String,
    pub time_chae1: String,
    pub time_chaf2: String,
    pub time_chae2: String,
    /// Stop charging once this state of charge is reached.
    pub bat_high_cap: Percent,
}

impl ChargeSettings {
    pub fn new(
        sys_sn: impl Into<String>,
        enabled: bool,
        first: &TimeWindow,
        second: &TimeWindow,
        charge_stop_soc: Percent,
    ) -> Self {
        Self {
            sys_sn: sys_sn.into(),
            grid_charge: enabled,
            time_chaf1: first.start.clone(),
            time_chae1: first.end.clone(),
            time_chaf2: second.start.clone(),
            time_chae2: second.end.clone(),
            bat_high_cap: charge_stop_soc,
        }
    }
}

/// Body of `/updateDisChargeConfigInfo`.
///
/// `timeDisf*` is where a discharging period starts, `timeDise*` where it ends.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DischargeSettings {
    pub sys_sn: String,
    #[serde_as(as = "serde_with::BoolFromInt")]
    pub ctr_dis: bool,
    pub time_disf1: String,
    pub time_dise1: String,
    pub time_disf2: String,
    pub time_dise2: String,
    /// Stop discharging below this state of charge.
    pub bat_use_cap: Percent,
}

impl DischargeSettings {
    pub fn new(
        sys_sn: impl Into<String>,
        enabled: bool,
        first: &TimeWindow,
        second: &TimeWindow,
        discharge_cutoff_soc: Percent,
    ) -> Self {
        Self {
            sys_sn: sys_sn.into(),
            ctr_dis: enabled,
            time_disf1: first.start.clone(),
            time_dise1: first.end.clone(),
            time_disf2: second.start.clone(),
            time_dise2: second.end.clone(),
            bat_use_cap: discharge_cutoff_soc,
        }
    }
}
