use crate::models::Activity;
use crate::visualisation::schedule::number_plates;
use anyhow::{Context, Result};
use chrono::Duration;
use serde::Serialize;
use std::path::Path;

/// 单辆车的排班统计，时长以秒为单位
///
/// 依赖ActivityType/TripID/TimeBetweenService等扩展列的字段，
/// 在优化器没有输出这些列时为空
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleStats {
    #[serde(rename = "NumberPlate")]
    pub number_plate: String,
    #[serde(rename = "minChargingDuration")]
    pub min_charging_duration: Option<i64>,
    #[serde(rename = "numTrips")]
    pub num_trips: usize,
    #[serde(rename = "numService")]
    pub num_service: usize,
    #[serde(rename = "totalUtilisationTime")]
    pub total_utilisation_time: i64,
    #[serde(rename = "totalIdleTime")]
    pub total_idle_time: i64,
    #[serde(rename = "percentageIdleTime")]
    pub percentage_idle_time: Option<f64>,
    #[serde(rename = "longestIdleTime")]
    pub longest_idle_time: Option<i64>,
    #[serde(rename = "longestTimeBetweenService")]
    pub longest_time_between_service: Option<f64>,
}

fn is_category(activity: &Activity, category: &str) -> bool {
    activity
        .activity_category
        .as_deref()
        .is_some_and(|c| c.eq_ignore_ascii_case(category))
}

/// 按车牌（首次出现顺序）统计每辆车的指标
pub fn compute_vehicle_stats(activities: &[Activity]) -> Vec<VehicleStats> {
    number_plates(activities)
        .into_iter()
        .map(|plate| {
            let vehicle: Vec<&Activity> = activities
                .iter()
                .filter(|a| a.number_plate == plate)
                .collect();

            let utilisation: Duration = vehicle.iter().map(|a| a.duration).sum();
            let idle: Duration = vehicle.iter().filter_map(|a| a.changeover).sum();
            let percentage_idle_time = if utilisation.is_zero() {
                None
            } else {
                Some(idle.num_seconds() as f64 / utilisation.num_seconds() as f64)
            };

            VehicleStats {
                min_charging_duration: vehicle
                    .iter()
                    .filter(|a| is_category(a, "Charging"))
                    .map(|a| a.duration.num_seconds())
                    .min(),
                num_trips: vehicle.iter().filter(|a| a.trip_id.is_some()).count(),
                num_service: vehicle.iter().filter(|a| is_category(a, "Service")).count(),
                total_utilisation_time: utilisation.num_seconds(),
                total_idle_time: idle.num_seconds(),
                percentage_idle_time,
                longest_idle_time: vehicle
                    .iter()
                    .filter_map(|a| a.changeover)
                    .max()
                    .map(|d| d.num_seconds()),
                longest_time_between_service: vehicle
                    .iter()
                    .filter_map(|a| a.time_between_service)
                    .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v)))),
                number_plate: plate,
            }
        })
        .collect()
}

/// 写出 statsVehicles.csv
pub fn write_vehicle_stats(stats: &[VehicleStats], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create stats file: {}", path.display()))?;

    for row in stats {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write stats row for {}", row.number_plate))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush stats file: {}", path.display()))?;
    Ok(())
}
