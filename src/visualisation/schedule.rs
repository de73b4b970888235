use crate::models::{Activity, ActivityType, ScheduleRow, UnallocatedTripRow, number_plate};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, FixedOffset};
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// 优化器输出的时间格式，例如 "2023-01-01 06:00:00+0000"
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%z";

/// 未分配行程所在的虚拟车辆
pub const UNALLOCATED_VEHICLE_ID: &str = "U";

pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
        .with_context(|| format!("Invalid timestamp '{}', expected {}", value, TIMESTAMP_FORMAT))
}

/// 读取带表头的CSV文件为行列表
fn read_csv_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| {
            row.with_context(|| format!("Failed to parse row {} of {}", i + 1, path.display()))
        })
        .collect()
}

pub fn read_schedule(path: &Path) -> Result<Vec<ScheduleRow>> {
    read_csv_rows(path)
}

pub fn read_unallocated_trips(path: &Path) -> Result<Vec<UnallocatedTripRow>> {
    read_csv_rows(path)
}

/// 预处理车辆排班：
/// 只保留至少有一行带Type的车辆，计算时长、空闲时间、车牌、颜色和条高度
pub fn prepare_schedule(rows: &[ScheduleRow]) -> Result<Vec<Activity>> {
    let active_vehicles: HashSet<&str> = rows
        .iter()
        .filter(|row| row.activity_type.as_deref().is_some_and(|t| !t.is_empty()))
        .map(|row| row.vehicle_id.as_str())
        .collect();

    let mut activities = Vec::new();
    for row in rows.iter().filter(|r| active_vehicles.contains(r.vehicle_id.as_str())) {
        let start = parse_timestamp(&row.start_time)?;
        let end = parse_timestamp(&row.end_time)?;
        let activity_type = ActivityType::from_tag(row.activity_type.as_deref());

        activities.push(Activity {
            vehicle_id: row.vehicle_id.clone(),
            number_plate: number_plate(&row.vehicle_id),
            start,
            end,
            duration: end - start,
            changeover: None,
            activity_type,
            colour: activity_type.colour(),
            bar_height: activity_type.bar_height(),
            activity_category: row.activity_category.clone(),
            trip_id: row.trip_id.clone().filter(|t| !t.is_empty()),
            start_soc: row.start_soc,
            time_between_service: row.time_between_service,
        });
    }

    fill_changeover_times(&mut activities);
    Ok(activities)
}

/// 每个活动到同一车辆下一个活动开始之间的空闲时间，行的原始顺序不变
fn fill_changeover_times(activities: &mut [Activity]) {
    let changeovers: Vec<(usize, Duration)> = {
        let mut by_vehicle: HashMap<&str, Vec<usize>> = HashMap::new();
        for (idx, activity) in activities.iter().enumerate() {
            by_vehicle.entry(activity.vehicle_id.as_str()).or_default().push(idx);
        }

        let mut changeovers = Vec::new();
        for indices in by_vehicle.values_mut() {
            indices.sort_by_key(|&i| activities[i].start);
            for pair in indices.windows(2) {
                let (current, next) = (pair[0], pair[1]);
                changeovers.push((current, activities[next].start - activities[current].end));
            }
        }
        changeovers
    };

    for (idx, changeover) in changeovers {
        activities[idx].changeover = Some(changeover);
    }
}

/// 未分配行程转换为虚拟车辆 "U" 上的TRIP活动
pub fn prepare_unallocated_trips(rows: &[UnallocatedTripRow]) -> Result<Vec<Activity>> {
    rows.iter()
        .map(|row| {
            let start = parse_timestamp(&row.start_time)?;
            let end = parse_timestamp(&row.end_time)?;
            let activity_type = ActivityType::Trip;
            Ok(Activity {
                vehicle_id: UNALLOCATED_VEHICLE_ID.to_string(),
                number_plate: number_plate(UNALLOCATED_VEHICLE_ID),
                start,
                end,
                duration: end - start,
                changeover: None,
                activity_type,
                colour: activity_type.colour(),
                bar_height: activity_type.bar_height(),
                activity_category: None,
                trip_id: row.trip_id.clone().filter(|t| !t.is_empty()),
                start_soc: None,
                time_between_service: None,
            })
        })
        .collect()
}

/// 合并排班和未分配行程；未分配为空时返回原排班
pub fn merge(schedule: Vec<Activity>, unallocated: Vec<Activity>) -> Vec<Activity> {
    if unallocated.is_empty() {
        return schedule;
    }
    let mut merged = schedule;
    merged.extend(unallocated);
    merged
}

/// 按首次出现顺序返回车牌列表
pub fn number_plates(activities: &[Activity]) -> Vec<String> {
    let mut seen = HashSet::new();
    activities
        .iter()
        .filter(|a| seen.insert(a.number_plate.as_str()))
        .map(|a| a.number_plate.clone())
        .collect()
}
