use crate::models::{Activity, ActivityType};
use crate::visualisation::schedule::number_plates;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, FixedOffset};
use plotters::prelude::*;
use std::path::Path;

const X_LABEL_FORMAT: &str = "%Y-%b-%d %H:%M";
const SOC_LINE: RGBColor = RGBColor(173, 216, 230);
// 每行最多的车辆面板数
const PANELS_PER_ROW: usize = 4;

/// 解析 "#RRGGBB" 颜色，无法解析时为白色
pub fn hex_colour(hex: &str) -> RGBColor {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 {
        return WHITE;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => RGBColor(r, g, b),
        _ => WHITE,
    }
}

/// 充电面板网格：行数 = ceil(n / 4)，列数 = ceil(n / 行数)
pub fn charging_grid(vehicles: usize) -> (usize, usize) {
    if vehicles == 0 {
        return (1, 1);
    }
    let rows = vehicles.div_ceil(PANELS_PER_ROW);
    (rows, vehicles.div_ceil(rows))
}

/// 车辆排班甘特图：每个车牌一条泳道，x轴为时间
pub fn render_schedule(activities: &[Activity], path: &Path, size: (u32, u32)) -> Result<()> {
    let plates = number_plates(activities);
    let origin = activities.iter().map(|a| a.start).min();
    let minutes_since = |t: DateTime<FixedOffset>| match origin {
        Some(o) => (t - o).num_seconds() as f64 / 60.0,
        None => 0.0,
    };
    let lane = |plate: &str| plates.iter().position(|p| p == plate).unwrap_or(0) as f64;

    let x_max = activities
        .iter()
        .map(|a| minutes_since(a.end))
        .fold(1.0_f64, f64::max);
    let y_max = plates.len().max(1) as f64 - 0.5;

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Vehicle schedule", ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(80)
        .y_label_area_size(120)
        .build_cartesian_2d(0.0..x_max * 1.02, -0.5..y_max)?;

    let format_x = |x: &f64| match origin {
        Some(o) => (o + Duration::seconds((x * 60.0) as i64))
            .format(X_LABEL_FORMAT)
            .to_string(),
        None => String::new(),
    };
    let format_y = |y: &f64| {
        let rounded = y.round();
        if (y - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        plates.get(rounded as usize).cloned().unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc("Time")
        .x_labels(12)
        .y_labels(plates.len().max(1) * 2 + 1)
        .x_label_formatter(&format_x)
        .y_label_formatter(&format_y)
        .draw()?;

    chart.draw_series(activities.iter().map(|a| {
        let y = lane(&a.number_plate);
        let half = a.bar_height / 2.0;
        Rectangle::new(
            [(minutes_since(a.start), y - half), (minutes_since(a.end), y + half)],
            hex_colour(a.colour).filled(),
        )
    }))?;

    // 图例：每个类型画一个空序列
    for activity_type in ActivityType::ALL {
        let colour = hex_colour(activity_type.colour());
        chart
            .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())?
            .label(activity_type.tag())
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 16, y + 6)], colour.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()
        .with_context(|| format!("Failed to write schedule chart: {}", path.display()))?;
    Ok(())
}

/// 每辆车的电量随活动序号变化，网格排列
pub fn render_charging(activities: &[Activity], path: &Path, panel_size: u32) -> Result<()> {
    let plates = number_plates(activities);
    let (rows, cols) = charging_grid(plates.len());
    let size = (panel_size * cols as u32, panel_size * rows as u32);

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((rows, cols));

    for (plate, panel) in plates.iter().zip(panels.iter()) {
        let mut own: Vec<&Activity> = activities
            .iter()
            .filter(|a| &a.number_plate == plate)
            .collect();
        own.sort_by_key(|a| (a.start, a.end));

        let points: Vec<(f64, f64, &'static str)> = own
            .iter()
            .enumerate()
            .filter_map(|(idx, a)| a.start_soc.map(|soc| (idx as f64, soc, a.colour)))
            .collect();

        let x_max = points.iter().map(|p| p.0).fold(1.0_f64, f64::max);
        let y_max = points.iter().map(|p| p.1).fold(1.0_f64, f64::max) * 1.05;

        let mut chart = ChartBuilder::on(panel)
            .caption(plate, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(40)
            .build_cartesian_2d(-0.5..x_max + 0.5, 0.0..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Activity")
            .y_desc("SOC")
            .draw()?;

        chart.draw_series(std::iter::once(PathElement::new(
            points.iter().map(|&(x, y, _)| (x, y)).collect::<Vec<_>>(),
            SOC_LINE.stroke_width(2),
        )))?;

        chart.draw_series(
            points
                .iter()
                .map(|&(x, y, colour)| Circle::new((x, y), 4, hex_colour(colour).filled())),
        )?;
    }

    root.present()
        .with_context(|| format!("Failed to write charging chart: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduleRow;
    use crate::visualisation::fixtures::SCHEDULE_CSV;
    use crate::visualisation::schedule::prepare_schedule;
    use std::fs;
    use tempfile::tempdir;

    fn activities() -> Vec<Activity> {
        let mut reader = csv::Reader::from_reader(SCHEDULE_CSV.as_bytes());
        let rows: Vec<ScheduleRow> = reader.deserialize().map(|r| r.unwrap()).collect();
        prepare_schedule(&rows).unwrap()
    }

    #[test]
    fn test_hex_colour() {
        assert_eq!(hex_colour("#C8A2C8"), RGBColor(200, 162, 200));
        assert_eq!(hex_colour("000000"), RGBColor(0, 0, 0));
        assert_eq!(hex_colour("#XYZ123"), WHITE);
        assert_eq!(hex_colour(""), WHITE);
    }

    #[test]
    fn test_charging_grid() {
        assert_eq!(charging_grid(0), (1, 1));
        assert_eq!(charging_grid(1), (1, 1));
        assert_eq!(charging_grid(4), (1, 4));
        assert_eq!(charging_grid(5), (2, 3));
        assert_eq!(charging_grid(9), (3, 3));
        assert_eq!(charging_grid(13), (4, 4));
    }

    #[test]
    fn test_render_schedule() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("schedule.svg");

        render_schedule(&activities(), &path, (1600, 900)).unwrap();

        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Vehicle schedule"));
        assert!(svg.contains("OUT_OF_ROTATION"));
    }

    #[test]
    fn test_render_charging() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("charging.svg");

        render_charging(&activities(), &path, 300).unwrap();

        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Bus 1"));
        // 三个活动各有一个电量点
        assert_eq!(svg.matches("<circle").count(), 3);
    }

    #[test]
    fn test_render_charging_orders_by_start_time() {
        let temp_dir = tempdir().unwrap();
        let ordered = temp_dir.path().join("ordered.svg");
        let reversed = temp_dir.path().join("reversed.svg");

        let mut shuffled = activities();
        shuffled.reverse();
        render_charging(&activities(), &ordered, 300).unwrap();
        render_charging(&shuffled, &reversed, 300).unwrap();

        assert_eq!(
            fs::read_to_string(&ordered).unwrap(),
            fs::read_to_string(&reversed).unwrap()
        );
    }

    #[test]
    fn test_render_empty_schedule() {
        let temp_dir = tempdir().unwrap();
        let schedule_path = temp_dir.path().join("schedule.svg");
        let charging_path = temp_dir.path().join("charging.svg");

        render_schedule(&[], &schedule_path, (800, 600)).unwrap();
        render_charging(&[], &charging_path, 300).unwrap();
        assert!(schedule_path.is_file());
        assert!(charging_path.is_file());
    }
}
