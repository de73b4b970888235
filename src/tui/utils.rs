use ratatui::style::Color;

/// 配置中的颜色名转换为终端颜色，未知名称为白色
pub fn parse_color(color_str: &str) -> Color {
    match color_str.trim().to_lowercase().replace('-', "_").as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "dark_gray" | "dark_grey" => Color::DarkGray,
        _ => Color::White,
    }
}

/// 计算选项网格的列数和列间距
pub fn calculate_list_layout(
    max_name_length: usize,
    num_names: usize,
    area_width: u16,
) -> (usize, usize) {
    let cols = calculate_optimal_columns(area_width, max_name_length, num_names);
    if cols <= 1 {
        return (1, 1);
    }

    let spacing = ((area_width as f64 - (cols * max_name_length) as f64) / (cols - 1) as f64)
        .floor()
        .max(1f64) as usize;

    (cols, spacing)
}

/// 计算最优列数，不超过选项数
fn calculate_optimal_columns(area_width: u16, max_name_length: usize, num_names: usize) -> usize {
    let mut best_cols = 1;

    for cols in 2..area_width.into() {
        let col_width = area_width as f64 / cols as f64;
        if col_width <= max_name_length as f64 {
            break;
        }
        best_cols = cols;
    }

    best_cols.min(num_names.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("red"), Color::Red);
        assert_eq!(parse_color("green"), Color::Green);
        assert_eq!(parse_color("cyan"), Color::Cyan);
        assert_eq!(parse_color("yellow"), Color::Yellow);
        assert_eq!(parse_color("dark_grey"), Color::DarkGray);
        assert_eq!(parse_color("dark-gray"), Color::DarkGray);
        assert_eq!(parse_color("light_red"), Color::White); // 不支持亮色
        assert_eq!(parse_color("invalid"), Color::White); // 默认颜色
        assert_eq!(parse_color("RED"), Color::Red); // 测试大小写不敏感
    }

    #[test]
    fn test_calculate_optimal_columns() {
        // 测试基本情况
        assert_eq!(calculate_optimal_columns(80, 10, 20), 7); // 80宽度，每个名称10字符
        assert_eq!(calculate_optimal_columns(40, 15, 3), 2); // 40宽度，每个名称15字符
        assert_eq!(calculate_optimal_columns(100, 20, 10), 4); // 100宽度，每个名称20字符

        // 列数不超过选项数
        assert_eq!(calculate_optimal_columns(80, 10, 3), 3);
        assert_eq!(calculate_optimal_columns(80, 10, 0), 1);

        // 测试无法放下多列的情况
        assert_eq!(calculate_optimal_columns(15, 10, 5), 1); // 宽度不够，只能1列
    }

    #[test]
    fn test_calculate_list_layout() {
        assert_eq!(calculate_list_layout(10, 5, 10), (1, 1)); // 10宽度只能1列
        assert_eq!(calculate_list_layout(10, 20, 80), (7, 1)); // 80宽度 -> 7列，1个空格
        assert_eq!(calculate_list_layout(15, 3, 40), (2, 10)); // 40宽度 -> 2列，10个空格
        assert_eq!(calculate_list_layout(20, 10, 100), (4, 6)); // 100宽度 -> 4列，6个空格
        assert_eq!(calculate_list_layout(30, 1, 100), (1, 1)); // 只有一个选项
    }
}
