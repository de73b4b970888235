use chrono::{DateTime, Duration, FixedOffset};
use serde::Deserialize;
use std::fmt;

/// 车辆排班中的活动类型（对应优化器输出的Type列）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityType {
    Deadleg,
    Trip,
    Charging,
    Maintenance,
    PutOnCharge,
    TakeOffCharge,
    StartSchedule,
    OutOfRotation,
    Undefined, // 缺失或无法识别的类型
}

impl ActivityType {
    /// 图例中出现的类型，按绘制顺序
    pub const ALL: [ActivityType; 8] = [
        ActivityType::Deadleg,
        ActivityType::Trip,
        ActivityType::Charging,
        ActivityType::Maintenance,
        ActivityType::PutOnCharge,
        ActivityType::TakeOffCharge,
        ActivityType::StartSchedule,
        ActivityType::OutOfRotation,
    ];

    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(str::trim) {
            Some("DEADLEG") => ActivityType::Deadleg,
            Some("TRIP") => ActivityType::Trip,
            Some("CHARGING") => ActivityType::Charging,
            Some("MAINTENANCE") => ActivityType::Maintenance,
            Some("PUT_ON_CHARGE") => ActivityType::PutOnCharge,
            Some("TAKE_OFF_CHARGE") => ActivityType::TakeOffCharge,
            Some("START_SCHEDULE") => ActivityType::StartSchedule,
            Some("OUT_OF_ROTATION") => ActivityType::OutOfRotation,
            _ => ActivityType::Undefined,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ActivityType::Deadleg => "DEADLEG",
            ActivityType::Trip => "TRIP",
            ActivityType::Charging => "CHARGING",
            ActivityType::Maintenance => "MAINTENANCE",
            ActivityType::PutOnCharge => "PUT_ON_CHARGE",
            ActivityType::TakeOffCharge => "TAKE_OFF_CHARGE",
            ActivityType::StartSchedule => "START_SCHEDULE",
            ActivityType::OutOfRotation => "OUT_OF_ROTATION",
            ActivityType::Undefined => "UNDEFINED",
        }
    }

    /// 甘特图中的颜色
    pub fn colour(&self) -> &'static str {
        match self {
            ActivityType::Deadleg => "#D3D3D3",
            ActivityType::Trip => "#C8A2C8",
            ActivityType::Charging => "#758E4F",
            ActivityType::Maintenance => "#F4A900",
            ActivityType::PutOnCharge | ActivityType::TakeOffCharge => "#758E75",
            ActivityType::StartSchedule => "#000000",
            ActivityType::OutOfRotation => "#F5F5DC",
            ActivityType::Undefined => "#FFFFFF",
        }
    }

    /// 甘特图中的条高度
    pub fn bar_height(&self) -> f64 {
        match self {
            ActivityType::Deadleg | ActivityType::OutOfRotation => 0.6,
            ActivityType::Undefined => 0.0,
            _ => 0.8,
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// VS_Output.csv 的一行
///
/// ActivityType、TripID、StartSOC、TimeBetweenService 属于优化器输出的扩展列，
/// 缺失时为None
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleRow {
    #[serde(rename = "VehicleID")]
    pub vehicle_id: String,
    #[serde(rename = "StartTime")]
    pub start_time: String,
    #[serde(rename = "EndTime")]
    pub end_time: String,
    #[serde(rename = "Type", default)]
    pub activity_type: Option<String>,
    #[serde(rename = "ActivityType", default)]
    pub activity_category: Option<String>,
    #[serde(rename = "TripID", default)]
    pub trip_id: Option<String>,
    #[serde(rename = "StartSOC", alias = "SoC", default, deserialize_with = "csv::invalid_option")]
    pub start_soc: Option<f64>,
    #[serde(rename = "TimeBetweenService", default, deserialize_with = "csv::invalid_option")]
    pub time_between_service: Option<f64>,
}

/// VS_UnallocatedTrips.csv 的一行
#[derive(Debug, Clone, Deserialize)]
pub struct UnallocatedTripRow {
    #[serde(rename = "TripID", default)]
    pub trip_id: Option<String>,
    #[serde(rename = "StartTime")]
    pub start_time: String,
    #[serde(rename = "EndTime")]
    pub end_time: String,
}

/// 预处理后的活动，带派生字段
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub vehicle_id: String,
    pub number_plate: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub duration: Duration,
    // 到同一车辆下一个活动开始的空闲时间，最后一个活动为None
    pub changeover: Option<Duration>,
    pub activity_type: ActivityType,
    pub colour: &'static str,
    pub bar_height: f64,
    pub activity_category: Option<String>,
    pub trip_id: Option<String>,
    pub start_soc: Option<f64>,
    pub time_between_service: Option<f64>,
}

/// 车牌号格式："Bus <VehicleID>"
pub fn number_plate(vehicle_id: &str) -> String {
    format!("Bus {}", vehicle_id)
}
